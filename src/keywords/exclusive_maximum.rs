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

pub(crate) struct ExclusiveMaximumI64Validator {
    limit: i64,
    schema_path: JsonPointer,
}
pub(crate) struct ExclusiveMaximumF64Validator {
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
                    error(ValidationError::exclusive_maximum(
                        self.schema_path.clone(),
                        instance_path.into(),
                        instance,
                        self.limit as f64,
                    ))
                }
            }

            fn is_valid(&self, _: &JsonSchema, instance: &JsonValue) -> bool {
                match instance.value {
                    Value::Integer(item) => !NumCmp::num_ge(item, self.limit),
                    Value::Float(item) => !NumCmp::num_ge(item, self.limit),
                    _ => true,
                }
            }
        }

        impl fmt::Display for $validator {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "exclusiveMaximum: {}", self.limit)
            }
        }
    };
}

validate!(ExclusiveMaximumI64Validator);
validate!(ExclusiveMaximumF64Validator);

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    let schema_path = context.as_pointer_with("exclusiveMaximum");
    match schema.value {
        Value::Integer(limit) => Some(Ok(Box::new(ExclusiveMaximumI64Validator {
            limit,
            schema_path,
        }))),
        Value::Float(limit) => Some(Ok(Box::new(ExclusiveMaximumF64Validator {
            limit,
            schema_path,
        }))),
        _ => Some(Err(ValidationError::schema(schema).into())),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use test_case::test_case;

    #[test_case(r#"{"exclusiveMaximum": 5}"#, "4")]
    #[test_case(r#"{"exclusiveMaximum": 5}"#, "4.999")]
    #[test_case(r#"{"exclusiveMaximum": 5}"#, "true"; "not applicable to booleans")]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(r#"{"exclusiveMaximum": 5}"#, "5")]
    #[test_case(r#"{"exclusiveMaximum": 5}"#, "5.0")]
    #[test_case(r#"{"exclusiveMaximum": 5}"#, "6")]
    fn is_not_valid(schema: &str, instance: &str) {
        tests_util::is_not_valid(schema, instance)
    }
}
