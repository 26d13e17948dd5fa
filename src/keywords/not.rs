use crate::{
    compilation::{compile_validators, context::CompilationContext, JsonSchema},
    error::{error, no_error, ErrorIterator},
    keywords::CompilationResult,
    paths::{InstancePath, JsonPointer},
    validator::{SchemaNode, Validate},
    value::{JsonValue, Object},
};
use crate::error::ValidationError;
use std::{fmt, sync::Arc};

pub(crate) struct NotValidator {
    node: Arc<SchemaNode>,
    schema_path: JsonPointer,
}

impl NotValidator {
    #[inline]
    pub(crate) fn compile(schema: &JsonValue, context: &CompilationContext) -> CompilationResult {
        let keyword_context = context.with_path("not");
        let node = compile_validators(schema, &keyword_context)?;
        Ok(Box::new(NotValidator {
            node,
            schema_path: keyword_context.as_pointer(),
        }))
    }
}

impl Validate for NotValidator {
    fn is_valid(&self, schema: &JsonSchema, instance: &JsonValue) -> bool {
        !self.node.is_valid(schema, instance)
    }

    fn validate(
        &self,
        schema: &JsonSchema,
        instance: &JsonValue,
        instance_path: &InstancePath,
    ) -> ErrorIterator {
        if self.is_valid(schema, instance) {
            no_error()
        } else {
            error(ValidationError::not(
                self.schema_path.clone(),
                instance_path.into(),
                instance,
            ))
        }
    }
}

impl fmt::Display for NotValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not: {}", self.node)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    Some(NotValidator::compile(schema, context))
}
