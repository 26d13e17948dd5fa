use crate::{
    compilation::{context::CompilationContext, JsonSchema},
    error::{error, no_error, ErrorIterator, ValidationError},
    keywords::CompilationResult,
    paths::{InstancePath, JsonPointer},
    validator::Validate,
    value::{JsonValue, Object, Value},
};
use std::fmt;

pub(crate) struct MinItemsValidator {
    limit: u64,
    schema_path: JsonPointer,
}

impl Validate for MinItemsValidator {
    fn is_valid(&self, _: &JsonSchema, instance: &JsonValue) -> bool {
        if let Value::Array(items) = &instance.value {
            if (items.len() as u64) < self.limit {
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
            error(ValidationError::min_items(
                self.schema_path.clone(),
                instance_path.into(),
                instance,
                self.limit,
            ))
        }
    }
}

impl fmt::Display for MinItemsValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "minItems: {}", self.limit)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    let schema_path = context.as_pointer_with("minItems");
    match schema.value {
        Value::Integer(limit) if limit >= 0 => Some(Ok(Box::new(MinItemsValidator {
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

    #[test_case(r#"{"minItems": 1}"#, "[1]")]
    #[test_case(r#"{"minItems": 1}"#, "{}"; "not applicable to objects")]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test]
    fn is_not_valid() {
        tests_util::is_not_valid(r#"{"minItems": 1}"#, "[]");
    }
}
