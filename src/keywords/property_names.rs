use crate::{
    compilation::{compile_validators, context::CompilationContext, JsonSchema},
    error::{no_error, ErrorIterator},
    keywords::CompilationResult,
    paths::InstancePath,
    validator::{SchemaNode, Validate},
    value::{JsonValue, Object, Value},
};
use std::{fmt, sync::Arc};

/// Validates every key of an object, as a string instance, against the
/// inner schema. Keys carry their own positions, so failures point at the
/// key itself.
pub(crate) struct PropertyNamesValidator {
    node: Arc<SchemaNode>,
}

impl PropertyNamesValidator {
    #[inline]
    pub(crate) fn compile(schema: &JsonValue, context: &CompilationContext) -> CompilationResult {
        let keyword_context = context.with_path("propertyNames");
        let node = compile_validators(schema, &keyword_context)?;
        Ok(Box::new(PropertyNamesValidator { node }))
    }
}

impl Validate for PropertyNamesValidator {
    fn is_valid(&self, schema: &JsonSchema, instance: &JsonValue) -> bool {
        if let Value::Object(item) = &instance.value {
            item.keys().all(|key| self.node.is_valid(schema, key))
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
        if let Value::Object(item) = &instance.value {
            let mut errors = Vec::new();
            for key in item.keys() {
                let name = key.as_str().expect("object keys are strings");
                let key_path = instance_path.push(name);
                errors.extend(self.node.validate(schema, key, &key_path));
            }
            Box::new(errors.into_iter())
        } else {
            no_error()
        }
    }
}

impl fmt::Display for PropertyNamesValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "propertyNames: {}", self.node)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    Some(PropertyNamesValidator::compile(schema, context))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use test_case::test_case;

    const SCHEMA: &str = r#"{"propertyNames": {"maxLength": 3}}"#;

    #[test_case(SCHEMA, r#"{"ab": 1, "abc": 2}"#)]
    #[test_case(SCHEMA, "{}")]
    #[test_case(SCHEMA, "[1]"; "not applicable to arrays")]
    #[test_case(r#"{"propertyNames": false}"#, "{}"; "false allows only empty objects")]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(SCHEMA, r#"{"abcd": 1}"#)]
    #[test_case(r#"{"propertyNames": false}"#, r#"{"a": 1}"#)]
    fn is_not_valid(schema: &str, instance: &str) {
        tests_util::is_not_valid(schema, instance)
    }
}
