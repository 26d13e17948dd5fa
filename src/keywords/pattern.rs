use crate::{
    compilation::{context::CompilationContext, JsonSchema},
    error::{error, no_error, ErrorIterator, ValidationError},
    keywords::CompilationResult,
    paths::{InstancePath, JsonPointer},
    validator::Validate,
    value::{JsonValue, Object, Value},
};
use regex::Regex;
use std::fmt;

pub(crate) struct PatternValidator {
    original: String,
    pattern: Regex,
    schema_path: JsonPointer,
}

impl Validate for PatternValidator {
    fn is_valid(&self, _: &JsonSchema, instance: &JsonValue) -> bool {
        if let Value::String(item) = &instance.value {
            // The pattern is unanchored: a match anywhere in the string
            // is enough.
            return self.pattern.is_match(item);
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
            error(ValidationError::pattern(
                self.schema_path.clone(),
                instance_path.into(),
                instance,
                self.original.clone(),
            ))
        }
    }
}

impl fmt::Display for PatternValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pattern: {}", self.original)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    let schema_path = context.as_pointer_with("pattern");
    match schema.as_str() {
        Some(item) => match Regex::new(item) {
            Ok(pattern) => Some(Ok(Box::new(PatternValidator {
                original: item.to_owned(),
                pattern,
                schema_path,
            }))),
            Err(_) => Some(Err(ValidationError::invalid_regex(
                schema_path,
                schema,
                item.to_owned(),
            )
            .into())),
        },
        None => Some(Err(ValidationError::schema(schema).into())),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use test_case::test_case;

    #[test_case(r#"{"pattern": "a+"}"#, "\"baac\""; "match anywhere")]
    #[test_case(r#"{"pattern": "^a"}"#, "\"abc\"")]
    #[test_case(r#"{"pattern": "a"}"#, "1"; "not applicable to numbers")]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(r#"{"pattern": "^a"}"#, "\"ba\"")]
    #[test_case(r#"{"pattern": "\\d{3}"}"#, "\"12\"")]
    fn is_not_valid(schema: &str, instance: &str) {
        tests_util::is_not_valid(schema, instance)
    }

    #[test]
    fn invalid_regex_is_a_compile_error() {
        assert!(crate::JsonSchema::compile(r#"{"pattern": "[unclosed"}"#).is_err());
    }
}
