use crate::{
    compilation::{context::CompilationContext, JsonSchema},
    error::{error, no_error, ErrorIterator, ValidationError},
    keywords::CompilationResult,
    paths::{InstancePath, JsonPointer},
    validator::Validate,
    value::{JsonValue, Object, Value},
};
use std::fmt;

pub(crate) struct MaxLengthValidator {
    limit: u64,
    schema_path: JsonPointer,
}

impl MaxLengthValidator {
    #[inline]
    pub(crate) fn compile(limit: u64, schema_path: JsonPointer) -> CompilationResult {
        Ok(Box::new(MaxLengthValidator { limit, schema_path }))
    }
}

impl Validate for MaxLengthValidator {
    fn is_valid(&self, _: &JsonSchema, instance: &JsonValue) -> bool {
        if let Value::String(item) = &instance.value {
            // Lengths are counted in Unicode scalars, not bytes.
            if (item.chars().count() as u64) > self.limit {
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
            error(ValidationError::max_length(
                self.schema_path.clone(),
                instance_path.into(),
                instance,
                self.limit,
            ))
        }
    }
}

impl fmt::Display for MaxLengthValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "maxLength: {}", self.limit)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    let schema_path = context.as_pointer_with("maxLength");
    match schema.value {
        Value::Integer(limit) if limit >= 0 => {
            Some(MaxLengthValidator::compile(limit as u64, schema_path))
        }
        _ => Some(Err(ValidationError::schema(schema).into())),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use test_case::test_case;

    #[test_case(r#"{"maxLength": 3}"#, "\"abc\"")]
    #[test_case(r#"{"maxLength": 3}"#, "\"é¡€\""; "scalars not bytes")]
    #[test_case(r#"{"maxLength": 3}"#, "12345"; "not applicable to numbers")]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test]
    fn is_not_valid() {
        tests_util::is_not_valid(r#"{"maxLength": 3}"#, "\"abcd\"");
    }
}
