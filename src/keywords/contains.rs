use crate::{
    compilation::{compile_validators, context::CompilationContext, JsonSchema},
    error::{error, no_error, ErrorIterator, ValidationError},
    keywords::CompilationResult,
    paths::{InstancePath, JsonPointer},
    validator::{SchemaNode, Validate},
    value::{JsonValue, Object, Value},
};
use std::{fmt, sync::Arc};

pub(crate) struct ContainsValidator {
    node: Arc<SchemaNode>,
    schema_path: JsonPointer,
}

impl ContainsValidator {
    #[inline]
    pub(crate) fn compile(schema: &JsonValue, context: &CompilationContext) -> CompilationResult {
        let keyword_context = context.with_path("contains");
        let node = compile_validators(schema, &keyword_context)?;
        Ok(Box::new(ContainsValidator {
            node,
            schema_path: keyword_context.as_pointer(),
        }))
    }
}

impl Validate for ContainsValidator {
    fn is_valid(&self, schema: &JsonSchema, instance: &JsonValue) -> bool {
        if let Value::Array(items) = &instance.value {
            items.iter().any(|item| self.node.is_valid(schema, item))
        } else {
            true
        }
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
            error(ValidationError::contains(
                self.schema_path.clone(),
                instance_path.into(),
                instance,
            ))
        }
    }
}

impl fmt::Display for ContainsValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "contains: {}", self.node)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    Some(ContainsValidator::compile(schema, context))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use test_case::test_case;

    const SCHEMA: &str = r#"{"contains": {"type": "integer"}}"#;

    #[test_case(SCHEMA, r#"["a", 1]"#)]
    #[test_case(SCHEMA, "[1]")]
    #[test_case(SCHEMA, "\"no array\""; "not applicable to strings")]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(SCHEMA, "[]"; "empty array contains nothing")]
    #[test_case(SCHEMA, r#"["a", 1.5]"#)]
    fn is_not_valid(schema: &str, instance: &str) {
        tests_util::is_not_valid(schema, instance)
    }
}
