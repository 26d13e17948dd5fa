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

pub(crate) struct ExclusiveMinimumI64Validator {
    limit: i64,
    schema_path: JsonPointer,
}
pub(crate) struct ExclusiveMinimumF64Validator {
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
                    error(ValidationError::exclusive_minimum(
                        self.schema_path.clone(),
                        instance_path.into(),
                        instance,
                        self.limit as f64,
                    ))
                }
            }

            fn is_valid(&self, _: &JsonSchema, instance: &JsonValue) -> bool {
                match instance.value {
                    Value::Integer(item) => !NumCmp::num_le(item, self.limit),
                    Value::Float(item) => !NumCmp::num_le(item, self.limit),
                    _ => true,
                }
            }
        }

        impl fmt::Display for $validator {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "exclusiveMinimum: {}", self.limit)
            }
        }
    };
}

validate!(ExclusiveMinimumI64Validator);
validate!(ExclusiveMinimumF64Validator);

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    let schema_path = context.as_pointer_with("exclusiveMinimum");
    match schema.value {
        Value::Integer(limit) => Some(Ok(Box::new(ExclusiveMinimumI64Validator {
            limit,
            schema_path,
        }))),
        Value::Float(limit) => Some(Ok(Box::new(ExclusiveMinimumF64Validator {
            limit,
            schema_path,
        }))),
        _ => Some(Err(ValidationError::schema(schema).into())),
    }
}
