use crate::{
    compilation::{context::CompilationContext, JsonSchema},
    error::{error, no_error, ErrorIterator, ValidationError},
    keywords::CompilationResult,
    paths::{InstancePath, JsonPointer},
    validator::Validate,
    value::{JsonValue, Object, Value},
};
use std::fmt;

pub(crate) struct MinPropertiesValidator {
    limit: u64,
    schema_path: JsonPointer,
}

impl Validate for MinPropertiesValidator {
    fn is_valid(&self, _: &JsonSchema, instance: &JsonValue) -> bool {
        if let Value::Object(item) = &instance.value {
            if (item.len() as u64) < self.limit {
                return false;
            }
        }
        true
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
            error(ValidationError::min_properties(
                self.schema_path.clone(),
                instance_path.into(),
                instance,
                self.limit,
            ))
        }
    }
}

impl fmt::Display for MinPropertiesValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "minProperties: {}", self.limit)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    let schema_path = context.as_pointer_with("minProperties");
    match schema.value {
        Value::Integer(limit) if limit >= 0 => Some(Ok(Box::new(MinPropertiesValidator {
            limit: limit as u64,
            schema_path,
        }))),
        _ => Some(Err(ValidationError::schema(schema).into())),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use test_case::test_case;

    #[test_case(r#"{"minProperties": 1}"#, r#"{"a": 1}"#)]
    #[test_case(r#"{"minProperties": 1}"#, "null"; "not applicable to null")]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test]
    fn is_not_valid() {
        tests_util::is_not_valid(r#"{"minProperties": 1}"#, "{}");
    }
}
