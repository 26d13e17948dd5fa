use crate::{
    compilation::{context::CompilationContext, JsonSchema},
    error::{error, no_error, ErrorIterator, ValidationError},
    keywords::{helpers::equal, CompilationResult},
    paths::{InstancePath, JsonPointer},
    validator::Validate,
    value::{JsonValue, Object},
};
use std::fmt;

pub(crate) struct ConstValidator {
    expected: JsonValue,
    schema_path: JsonPointer,
}

impl Validate for ConstValidator {
    fn is_valid(&self, _: &JsonSchema, instance: &JsonValue) -> bool {
        equal(&self.expected, instance)
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
            error(ValidationError::constant(
                self.schema_path.clone(),
                instance_path.into(),
                instance,
                &self.expected,
            ))
        }
    }
}

impl fmt::Display for ConstValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "const: {}", self.expected)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    // Any JSON value is a legal constant.
    Some(Ok(Box::new(ConstValidator {
        expected: schema.clone(),
        schema_path: context.as_pointer_with("const"),
    })))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use test_case::test_case;

    #[test_case(r#"{"const": 2}"#, "2")]
    #[test_case(r#"{"const": null}"#, "null")]
    #[test_case(r#"{"const": {"a": [1]}}"#, r#"{"a": [1]}"#)]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(r#"{"const": 2}"#, "3")]
    #[test_case(r#"{"const": 2}"#, "2.0"; "float does not match integer constant")]
    #[test_case(r#"{"const": {"a": [1]}}"#, r#"{"a": [1.0]}"#)]
    fn is_not_valid(schema: &str, instance: &str) {
        tests_util::is_not_valid(schema, instance)
    }
}
