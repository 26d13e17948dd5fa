use crate::{
    compilation::{context::CompilationContext, JsonSchema},
    error::{error, no_error, ErrorIterator, ValidationError},
    keywords::CompilationResult,
    paths::{InstancePath, JsonPointer},
    validator::Validate,
    value::{JsonValue, Object, Value},
};
use num_cmp::NumCmp;
use std::fmt;

pub(crate) struct MaximumI64Validator {
    limit: i64,
    schema_path: JsonPointer,
}
pub(crate) struct MaximumF64Validator {
    limit: f64,
    schema_path: JsonPointer,
}

macro_rules! validate {
    ($validator: ty) => {
        impl Validate for $validator {
            fn validate(
                &self,
                schema: &JsonSchema,
                instance: &JsonValue,
                instance_path: &InstancePath,
            ) -> ErrorIterator {
                if self.is_valid(schema, instance) {
                    no_error()
                } else {
                    error(ValidationError::maximum(
                        self.schema_path.clone(),
                        instance_path.into(),
                        instance,
                        self.limit as f64,
                    )) // do not cast
                }
            }

            fn is_valid(&self, _: &JsonSchema, instance: &JsonValue) -> bool {
                match instance.value {
                    Value::Integer(item) => !NumCmp::num_gt(item, self.limit),
                    Value::Float(item) => !NumCmp::num_gt(item, self.limit),
                    _ => true,
                }
            }
        }

        impl fmt::Display for $validator {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "maximum: {}", self.limit)
            }
        }
    };
}

validate!(MaximumI64Validator);
validate!(MaximumF64Validator);

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    let schema_path = context.as_pointer_with("maximum");
    match schema.value {
        Value::Integer(limit) => Some(Ok(Box::new(MaximumI64Validator { limit, schema_path }))),
        Value::Float(limit) => Some(Ok(Box::new(MaximumF64Validator { limit, schema_path }))),
        _ => Some(Err(ValidationError::schema(schema).into())),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use test_case::test_case;

    #[test_case(r#"{"maximum": 5}"#, "5")]
    #[test_case(r#"{"maximum": 5}"#, "4.9")]
    #[test_case(r#"{"maximum": 5.5}"#, "5")]
    #[test_case(r#"{"maximum": 5}"#, "\"6\""; "not applicable to strings")]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(r#"{"maximum": 5}"#, "6")]
    #[test_case(r#"{"maximum": 5}"#, "5.1")]
    #[test_case(r#"{"maximum": -2.5}"#, "-2")]
    fn is_not_valid(schema: &str, instance: &str) {
        tests_util::is_not_valid(schema, instance)
    }

    #[test]
    fn message_mentions_the_bound() {
        tests_util::expect_errors(
            r#"{"maximum": 10}"#,
            "11",
            &["11 must be less than or equal to 10"],
        )
    }

    #[test]
    fn non_numeric_bound_is_a_compile_error() {
        assert!(crate::JsonSchema::compile(r#"{"maximum": "5"}"#).is_err());
    }
}
