use crate::{
    compilation::{compile_validators, context::CompilationContext, JsonSchema},
    error::{error, no_error, ErrorIterator, ValidationError, ValidationErrors},
    keywords::CompilationResult,
    paths::{InstancePath, JsonPointer},
    validator::{format_nodes, SchemaNode, Validate},
    value::{JsonValue, Object, Value},
};
use std::{fmt, sync::Arc};

pub(crate) struct OneOfValidator {
    schemas: Vec<Arc<SchemaNode>>,
    schema_path: JsonPointer,
}

impl OneOfValidator {
    #[inline]
    pub(crate) fn compile(items: &[JsonValue], context: &CompilationContext) -> CompilationResult {
        let keyword_context = context.with_path("oneOf");
        let mut errors = ValidationErrors::default();
        let mut schemas = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let item_context = keyword_context.with_path(idx);
            match compile_validators(item, &item_context) {
                Ok(node) => schemas.push(node),
                Err(child_errors) => errors.extend(child_errors),
            }
        }
        if errors.is_empty() {
            Ok(Box::new(OneOfValidator {
                schemas,
                schema_path: keyword_context.as_pointer(),
            }))
        } else {
            Err(errors)
        }
    }

    fn get_first_valid(&self, schema: &JsonSchema, instance: &JsonValue) -> Option<usize> {
        self.schemas
            .iter()
            .position(|node| node.is_valid(schema, instance))
    }

    fn are_others_valid(&self, schema: &JsonSchema, instance: &JsonValue, idx: usize) -> bool {
        self.schemas
            .iter()
            .skip(idx + 1)
            .any(|node| node.is_valid(schema, instance))
    }
}

impl Validate for OneOfValidator {
    fn is_valid(&self, schema: &JsonSchema, instance: &JsonValue) -> bool {
        self.get_first_valid(schema, instance)
            .map_or(false, |idx| !self.are_others_valid(schema, instance, idx))
    }

    fn validate(
        &self,
        schema: &JsonSchema,
        instance: &JsonValue,
        instance_path: &InstancePath,
    ) -> ErrorIterator {
        // Only the count of successes matters; branch errors are not kept.
        match self.get_first_valid(schema, instance) {
            Some(idx) if self.are_others_valid(schema, instance, idx) => {
                error(ValidationError::one_of_multiple_valid(
                    self.schema_path.clone(),
                    instance_path.into(),
                    instance,
                ))
            }
            Some(_) => no_error(),
            None => error(ValidationError::one_of_not_valid(
                self.schema_path.clone(),
                instance_path.into(),
                instance,
            )),
        }
    }
}

impl fmt::Display for OneOfValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "oneOf: [{}]", format_nodes(&self.schemas))
    }
}

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    match &schema.value {
        Value::Array(items) => Some(OneOfValidator::compile(items, context)),
        _ => Some(Err(ValidationError::schema(schema).into())),
    }
}
