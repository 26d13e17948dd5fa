use crate::{
    compilation::{context::CompilationContext, JsonSchema},
    error::{error, no_error, ErrorIterator, ValidationError},
    keywords::CompilationResult,
    paths::{InstancePath, JsonPointer},
    validator::Validate,
    value::{JsonValue, Object, Value},
};
use std::fmt;

// Tolerance of the remainder check. Remainders this close to zero (or to
// the divisor itself) count as exact multiples.
const TOLERANCE: f64 = 1e-8;

pub(crate) struct MultipleOfValidator {
    multiple_of: f64,
    schema_path: JsonPointer,
}

impl Validate for MultipleOfValidator {
    fn is_valid(&self, _: &JsonSchema, instance: &JsonValue) -> bool {
        let item = match instance.value {
            Value::Integer(item) => item as f64,
            Value::Float(item) => item,
            _ => return true,
        };
        let remainder = (item % self.multiple_of).abs();
        remainder < TOLERANCE || (self.multiple_of.abs() - remainder).abs() < TOLERANCE
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
            error(ValidationError::multiple_of(
                self.schema_path.clone(),
                instance_path.into(),
                instance,
                self.multiple_of,
            ))
        }
    }
}

impl fmt::Display for MultipleOfValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "multipleOf: {}", self.multiple_of)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    let schema_path = context.as_pointer_with("multipleOf");
    match schema.value {
        Value::Integer(multiple_of) => Some(Ok(Box::new(MultipleOfValidator {
            multiple_of: multiple_of as f64,
            schema_path,
        }))),
        Value::Float(multiple_of) => Some(Ok(Box::new(MultipleOfValidator {
            multiple_of,
            schema_path,
        }))),
        _ => Some(Err(ValidationError::schema(schema).into())),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use test_case::test_case;

    #[test_case(r#"{"multipleOf": 2}"#, "4")]
    #[test_case(r#"{"multipleOf": 2}"#, "-8")]
    #[test_case(r#"{"multipleOf": 0.1}"#, "0.3")]
    #[test_case(r#"{"multipleOf": 0.01}"#, "1.02")]
    #[test_case(r#"{"multipleOf": 1.5}"#, "4.5")]
    #[test_case(r#"{"multipleOf": 2}"#, "\"4\""; "not applicable to strings")]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(r#"{"multipleOf": 2}"#, "5")]
    #[test_case(r#"{"multipleOf": 0.1}"#, "0.35")]
    #[test_case(r#"{"multipleOf": 1.5}"#, "4")]
    fn is_not_valid(schema: &str, instance: &str) {
        tests_util::is_not_valid(schema, instance)
    }
}
