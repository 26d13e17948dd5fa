use crate::{
    compilation::{compile_validators, context::CompilationContext, JsonSchema},
    error::{error, no_error, ErrorIterator, ValidationError, ValidationErrors},
    keywords::CompilationResult,
    paths::{InstancePath, JsonPointer},
    validator::{format_nodes, SchemaNode, Validate},
    value::{JsonValue, Object, Value},
};
use std::{fmt, sync::Arc};

pub(crate) struct AnyOfValidator {
    schemas: Vec<Arc<SchemaNode>>,
    schema_path: JsonPointer,
}

impl AnyOfValidator {
    #[inline]
    pub(crate) fn compile(items: &[JsonValue], context: &CompilationContext) -> CompilationResult {
        let keyword_context = context.with_path("anyOf");
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
            Ok(Box::new(AnyOfValidator {
                schemas,
                schema_path: keyword_context.as_pointer(),
            }))
        } else {
            Err(errors)
        }
    }
}

impl Validate for AnyOfValidator {
    fn is_valid(&self, schema: &JsonSchema, instance: &JsonValue) -> bool {
        self.schemas.iter().any(|node| node.is_valid(schema, instance))
    }

    fn validate(
        &self,
        schema: &JsonSchema,
        instance: &JsonValue,
        instance_path: &InstancePath,
    ) -> ErrorIterator {
        // Branch errors are discarded as soon as one branch succeeds.
        if self.is_valid(schema, instance) {
            no_error()
        } else {
            error(ValidationError::any_of(
                self.schema_path.clone(),
                instance_path.into(),
                instance,
            ))
        }
    }
}

impl fmt::Display for AnyOfValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anyOf: [{}]", format_nodes(&self.schemas))
    }
}

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    match &schema.value {
        Value::Array(items) => Some(AnyOfValidator::compile(items, context)),
        _ => Some(Err(ValidationError::schema(schema).into())),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use test_case::test_case;

    const SCHEMA: &str = r#"{"anyOf": [{"type": "integer"}, {"minimum": 2}]}"#;

    #[test_case(SCHEMA, "1"; "first branch only")]
    #[test_case(SCHEMA, "2.5"; "second branch only")]
    #[test_case(SCHEMA, "3"; "both branches")]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test]
    fn is_not_valid() {
        tests_util::is_not_valid(SCHEMA, "1.5");
    }

    #[test]
    fn a_single_error_on_failure() {
        let schema = crate::JsonSchema::compile(SCHEMA).unwrap();
        let errors = schema.validate("1.5").unwrap_err();
        assert_eq!(errors.len(), 1);
    }
}
