use crate::{
    compilation::JsonSchema,
    error::{error, ErrorIterator, ValidationError},
    paths::{InstancePath, JsonPointer},
    validator::{BoxedValidator, Validate},
    value::JsonValue,
};
use std::fmt;

/// The `false` schema: rejects every instance.
pub(crate) struct FalseValidator {
    schema_path: JsonPointer,
}

impl FalseValidator {
    #[inline]
    pub(crate) fn compile(schema_path: JsonPointer) -> BoxedValidator {
        Box::new(FalseValidator { schema_path })
    }
}

impl Validate for FalseValidator {
    fn is_valid(&self, _: &JsonSchema, _: &JsonValue) -> bool {
        false
    }

    fn validate(
        &self,
        _: &JsonSchema,
        instance: &JsonValue,
        instance_path: &InstancePath,
    ) -> ErrorIterator {
        error(ValidationError::false_schema(
            self.schema_path.clone(),
            instance_path.into(),
            instance,
        ))
    }
}

impl fmt::Display for FalseValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("false")
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;

    #[test]
    fn false_rejects_everything() {
        for instance in ["null", "1", "1.0", "\"x\"", "[]", "{}", "false"] {
            tests_util::is_not_valid("false", instance);
        }
    }

    #[test]
    fn true_accepts_everything() {
        for instance in ["null", "1", "1.0", "\"x\"", "[]", "{}", "false"] {
            tests_util::is_valid("true", instance);
        }
    }
}
