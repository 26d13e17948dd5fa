use crate::{
    compilation::{context::CompilationContext, JsonSchema},
    error::{error, no_error, ErrorIterator, ValidationError},
    keywords::{helpers::equal, CompilationResult},
    paths::{InstancePath, JsonPointer},
    validator::Validate,
    value::{JsonValue, Object, Value},
};
use std::fmt;

pub(crate) struct EnumValidator {
    options: JsonValue,
    items: Vec<JsonValue>,
    schema_path: JsonPointer,
}

impl EnumValidator {
    #[inline]
    pub(crate) fn compile(
        schema: &JsonValue,
        items: &[JsonValue],
        schema_path: JsonPointer,
    ) -> CompilationResult {
        Ok(Box::new(EnumValidator {
            options: schema.clone(),
            items: items.to_vec(),
            schema_path,
        }))
    }
}

impl Validate for EnumValidator {
    fn is_valid(&self, _: &JsonSchema, instance: &JsonValue) -> bool {
        self.items.iter().any(|item| equal(item, instance))
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
            error(ValidationError::enumeration(
                self.schema_path.clone(),
                instance_path.into(),
                instance,
                &self.options,
            ))
        }
    }
}

impl fmt::Display for EnumValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enum: {}", self.options)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    let schema_path = context.as_pointer_with("enum");
    match &schema.value {
        Value::Array(items) => Some(EnumValidator::compile(schema, items, schema_path)),
        _ => Some(Err(ValidationError::schema(schema).into())),
    }
}
