use crate::{
    compilation::{context::CompilationContext, JsonSchema},
    error::{no_error, ErrorIterator, ValidationError, ValidationErrors},
    keywords::CompilationResult,
    paths::{InstancePath, JsonPointer},
    validator::Validate,
    value::{JsonValue, Object, Value},
};
use std::fmt;

pub(crate) struct RequiredValidator {
    required: Vec<String>,
    schema_path: JsonPointer,
}

impl RequiredValidator {
    #[inline]
    pub(crate) fn compile(items: &[JsonValue], schema_path: JsonPointer) -> CompilationResult {
        let mut required = Vec::with_capacity(items.len());
        let mut errors = ValidationErrors::default();
        for item in items {
            match item.as_str() {
                Some(name) => required.push(name.to_owned()),
                None => errors.push(ValidationError::schema(item)),
            }
        }
        if errors.is_empty() {
            Ok(Box::new(RequiredValidator {
                required,
                schema_path,
            }))
        } else {
            Err(errors)
        }
    }
}

impl Validate for RequiredValidator {
    fn is_valid(&self, _: &JsonSchema, instance: &JsonValue) -> bool {
        if let Value::Object(item) = &instance.value {
            self.required.iter().all(|name| item.contains_key(name))
        } else {
            true
        }
    }

    fn validate(
        &self,
        _: &JsonSchema,
        instance: &JsonValue,
        instance_path: &InstancePath,
    ) -> ErrorIterator {
        if let Value::Object(item) = &instance.value {
            let errors: Vec<_> = self
                .required
                .iter()
                .filter(|name| !item.contains_key(name))
                .map(|name| {
                    ValidationError::required(
                        self.schema_path.clone(),
                        instance_path.into(),
                        instance,
                        name.clone(),
                    )
                })
                .collect();
            Box::new(errors.into_iter())
        } else {
            no_error()
        }
    }
}

impl fmt::Display for RequiredValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "required: [{}]", self.required.join(", "))
    }
}

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    let schema_path = context.as_pointer_with("required");
    match &schema.value {
        Value::Array(items) => Some(RequiredValidator::compile(items, schema_path)),
        _ => Some(Err(ValidationError::schema(schema).into())),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use test_case::test_case;

    const SCHEMA: &str = r#"{"required": ["a", "b"]}"#;

    #[test_case(SCHEMA, r#"{"a": 1, "b": 2}"#)]
    #[test_case(SCHEMA, r#"{"a": 1, "b": 2, "c": 3}"#)]
    #[test_case(SCHEMA, "\"ab\""; "not applicable to strings")]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(SCHEMA, "{}")]
    #[test_case(SCHEMA, r#"{"a": 1}"#)]
    fn is_not_valid(schema: &str, instance: &str) {
        tests_util::is_not_valid(schema, instance)
    }

    #[test]
    fn every_missing_property_is_reported() {
        tests_util::expect_errors(
            SCHEMA,
            "{}",
            &[
                "\"a\" is a required property",
                "\"b\" is a required property",
            ],
        )
    }
}
