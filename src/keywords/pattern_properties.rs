use crate::{
    compilation::{compile_validators, context::CompilationContext, JsonSchema},
    error::{no_error, ErrorIterator, ValidationError, ValidationErrors},
    keywords::CompilationResult,
    paths::InstancePath,
    validator::{SchemaNode, Validate},
    value::{JsonValue, Object, Value},
};
use regex::Regex;
use std::{fmt, sync::Arc};

pub(crate) struct PatternPropertiesValidator {
    patterns: Vec<(String, Regex, Arc<SchemaNode>)>,
}

impl PatternPropertiesValidator {
    #[inline]
    pub(crate) fn compile(schema: &JsonValue, context: &CompilationContext) -> CompilationResult {
        match &schema.value {
            Value::Object(map) => {
                let keyword_context = context.with_path("patternProperties");
                let mut errors = ValidationErrors::default();
                let mut patterns = Vec::with_capacity(map.len());
                for (key, subschema) in map.iter() {
                    let source = key.as_str().expect("object keys are strings");
                    let pattern_context = keyword_context.with_path(source);
                    let pattern = match Regex::new(source) {
                        Ok(pattern) => Some(pattern),
                        Err(_) => {
                            // The error points at the key itself.
                            errors.push(ValidationError::invalid_regex(
                                keyword_context.as_pointer(),
                                key,
                                source.to_owned(),
                            ));
                            None
                        }
                    };
                    match compile_validators(subschema, &pattern_context) {
                        Ok(node) => {
                            if let Some(pattern) = pattern {
                                patterns.push((source.to_owned(), pattern, node));
                            }
                        }
                        Err(child_errors) => errors.extend(child_errors),
                    }
                }
                if errors.is_empty() {
                    Ok(Box::new(PatternPropertiesValidator { patterns }))
                } else {
                    Err(errors)
                }
            }
            _ => Err(ValidationError::schema(schema).into()),
        }
    }
}

impl Validate for PatternPropertiesValidator {
    fn is_valid(&self, schema: &JsonSchema, instance: &JsonValue) -> bool {
        if let Value::Object(item) = &instance.value {
            self.patterns.iter().all(|(_, pattern, node)| {
                item.iter()
                    .filter(|(key, _)| {
                        key.as_str().map_or(false, |name| pattern.is_match(name))
                    })
                    .all(|(_, property)| node.is_valid(schema, property))
            })
        } else {
            true
        }
    }

    fn validate(
        &self,
        schema: &JsonSchema,
        instance: &JsonValue,
        instance_path: &InstancePath,
    ) -> ErrorIterator {
        if let Value::Object(item) = &instance.value {
            let mut errors = Vec::new();
            for (_, pattern, node) in &self.patterns {
                for (key, property) in item.iter() {
                    let name = key.as_str().expect("object keys are strings");
                    if pattern.is_match(name) {
                        let property_path = instance_path.push(name);
                        errors.extend(node.validate(schema, property, &property_path));
                    }
                }
            }
            Box::new(errors.into_iter())
        } else {
            no_error()
        }
    }
}

impl fmt::Display for PatternPropertiesValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "patternProperties: {{{}}}",
            self.patterns
                .iter()
                .map(|(source, _, node)| format!("{}: {}", source, node))
                .collect::<Vec<String>>()
                .join(", ")
        )
    }
}

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    Some(PatternPropertiesValidator::compile(schema, context))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use test_case::test_case;

    const SCHEMA: &str = r#"{"patternProperties": {"^x-": {"type": "integer"}}}"#;

    #[test_case(SCHEMA, r#"{"x-a": 1, "x-b": 2}"#)]
    #[test_case(SCHEMA, r#"{"other": "ignored"}"#)]
    #[test_case(SCHEMA, "1"; "not applicable to numbers")]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test]
    fn is_not_valid() {
        tests_util::is_not_valid(SCHEMA, r#"{"x-a": "nope"}"#);
    }

    #[test]
    fn invalid_regex_key_is_a_compile_error() {
        let errors =
            crate::JsonSchema::compile(r#"{"patternProperties": {"[bad": {}}}"#).unwrap_err();
        assert!(errors
            .errors()
            .iter()
            .any(|error| error.to_string().contains("not a valid regular expression")));
    }
}
