use crate::{
    compilation::{context::CompilationContext, JsonSchema},
    error::{error, no_error, ErrorIterator, ValidationError},
    keywords::CompilationResult,
    paths::{InstancePath, JsonPointer},
    primitive_type::{PrimitiveType, PrimitiveTypesBitMap},
    validator::Validate,
    value::{JsonValue, Object, Value},
};
use std::{convert::TryFrom, fmt};

pub(crate) struct MultipleTypesValidator {
    types: PrimitiveTypesBitMap,
    schema_path: JsonPointer,
}

impl MultipleTypesValidator {
    #[inline]
    pub(crate) fn compile(items: &[JsonValue], schema_path: JsonPointer) -> CompilationResult {
        let mut types = PrimitiveTypesBitMap::new();
        for item in items {
            match item.as_str().and_then(|name| PrimitiveType::try_from(name).ok()) {
                Some(primitive_type) => types |= primitive_type,
                None => return Err(ValidationError::schema(item).into()),
            }
        }
        Ok(Box::new(MultipleTypesValidator { types, schema_path }))
    }
}

impl Validate for MultipleTypesValidator {
    fn is_valid(&self, _: &JsonSchema, instance: &JsonValue) -> bool {
        match &instance.value {
            Value::Null => self.types.contains_type(PrimitiveType::Null),
            Value::Boolean(_) => self.types.contains_type(PrimitiveType::Boolean),
            Value::Integer(_) => {
                self.types.contains_type(PrimitiveType::Integer)
                    || self.types.contains_type(PrimitiveType::Number)
            }
            Value::Float(_) => self.types.contains_type(PrimitiveType::Number),
            Value::String(_) => self.types.contains_type(PrimitiveType::String),
            Value::Array(_) => self.types.contains_type(PrimitiveType::Array),
            Value::Object(_) => self.types.contains_type(PrimitiveType::Object),
        }
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
            error(ValidationError::multiple_type_error(
                self.schema_path.clone(),
                instance_path.into(),
                instance,
                self.types,
            ))
        }
    }
}

impl fmt::Display for MultipleTypesValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type: [{}]",
            self.types
                .into_iter()
                .map(|type_| format!("{}", type_))
                .collect::<Vec<String>>()
                .join(", ")
        )
    }
}

pub(crate) struct SingleTypeValidator {
    type_: PrimitiveType,
    schema_path: JsonPointer,
}

impl SingleTypeValidator {
    #[inline]
    pub(crate) fn compile(type_: PrimitiveType, schema_path: JsonPointer) -> CompilationResult {
        Ok(Box::new(SingleTypeValidator { type_, schema_path }))
    }
}

impl Validate for SingleTypeValidator {
    fn is_valid(&self, _: &JsonSchema, instance: &JsonValue) -> bool {
        match self.type_ {
            PrimitiveType::Null => matches!(instance.value, Value::Null),
            PrimitiveType::Boolean => matches!(instance.value, Value::Boolean(_)),
            // "number" accepts both numeric variants, "integer" only the
            // integer one; `1.0` is not an integer here.
            PrimitiveType::Integer => matches!(instance.value, Value::Integer(_)),
            PrimitiveType::Number => {
                matches!(instance.value, Value::Integer(_) | Value::Float(_))
            }
            PrimitiveType::String => matches!(instance.value, Value::String(_)),
            PrimitiveType::Array => matches!(instance.value, Value::Array(_)),
            PrimitiveType::Object => matches!(instance.value, Value::Object(_)),
        }
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
            error(ValidationError::single_type_error(
                self.schema_path.clone(),
                instance_path.into(),
                instance,
                self.type_,
            ))
        }
    }
}

impl fmt::Display for SingleTypeValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type: {}", self.type_)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    let schema_path = context.as_pointer_with("type");
    match &schema.value {
        Value::String(item) => match PrimitiveType::try_from(item.as_str()) {
            Ok(type_) => Some(SingleTypeValidator::compile(type_, schema_path)),
            Err(()) => Some(Err(ValidationError::schema(schema).into())),
        },
        Value::Array(items) => Some(MultipleTypesValidator::compile(items, schema_path)),
        _ => Some(Err(ValidationError::schema(schema).into())),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use test_case::test_case;

    #[test_case(r#"{"type": "integer"}"#, "1")]
    #[test_case(r#"{"type": "number"}"#, "1")]
    #[test_case(r#"{"type": "number"}"#, "1.5")]
    #[test_case(r#"{"type": "string"}"#, "\"s\"")]
    #[test_case(r#"{"type": "null"}"#, "null")]
    #[test_case(r#"{"type": ["integer", "string"]}"#, "\"s\"")]
    #[test_case(r#"{"type": ["null", "number"]}"#, "1.5")]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(r#"{"type": "integer"}"#, "1.0"; "float is not integer")]
    #[test_case(r#"{"type": "integer"}"#, "\"1\"")]
    #[test_case(r#"{"type": "string"}"#, "null")]
    #[test_case(r#"{"type": "boolean"}"#, "0")]
    #[test_case(r#"{"type": ["integer", "string"]}"#, "[]")]
    fn is_not_valid(schema: &str, instance: &str) {
        tests_util::is_not_valid(schema, instance)
    }

    #[test]
    fn message_mentions_the_type() {
        tests_util::expect_errors(
            r#"{"type": "integer"}"#,
            "\"5\"",
            &["\"5\" is not of type \"integer\""],
        )
    }

    #[test_case(r#"{"type": "float"}"#; "unknown type name")]
    #[test_case(r#"{"type": [5]}"#; "non string entry")]
    #[test_case(r#"{"type": 12}"#; "non string type")]
    fn invalid_schemas(schema: &str) {
        assert!(crate::JsonSchema::compile(schema).is_err());
    }
}
