use crate::{
    compilation::{compile_validators, context::CompilationContext, JsonSchema},
    error::{no_error, ErrorIterator},
    keywords::CompilationResult,
    paths::InstancePath,
    validator::{SchemaNode, Validate},
    value::{JsonValue, Object, Value},
};
use regex::Regex;
use std::{fmt, sync::Arc};

/// Applies its schema to every property not claimed by a sibling
/// `properties` entry or a matching `patternProperties` regex.
pub(crate) struct AdditionalPropertiesValidator {
    properties: Vec<String>,
    patterns: Vec<Regex>,
    node: Arc<SchemaNode>,
}

impl AdditionalPropertiesValidator {
    #[inline]
    pub(crate) fn compile(
        parent: &Object,
        schema: &JsonValue,
        context: &CompilationContext,
    ) -> CompilationResult {
        let properties = parent
            .get("properties")
            .and_then(JsonValue::as_object)
            .map(|map| {
                map.keys()
                    .filter_map(JsonValue::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        // Unparsable sibling regexes are reported by `patternProperties`
        // itself; here they simply claim no keys.
        let patterns = parent
            .get("patternProperties")
            .and_then(JsonValue::as_object)
            .map(|map| {
                map.keys()
                    .filter_map(JsonValue::as_str)
                    .filter_map(|source| Regex::new(source).ok())
                    .collect()
            })
            .unwrap_or_default();
        let keyword_context = context.with_path("additionalProperties");
        let node = compile_validators(schema, &keyword_context)?;
        Ok(Box::new(AdditionalPropertiesValidator {
            properties,
            patterns,
            node,
        }))
    }

    fn is_additional(&self, name: &str) -> bool {
        !self.properties.iter().any(|known| known == name)
            && !self.patterns.iter().any(|pattern| pattern.is_match(name))
    }
}

impl Validate for AdditionalPropertiesValidator {
    fn is_valid(&self, schema: &JsonSchema, instance: &JsonValue) -> bool {
        if let Value::Object(item) = &instance.value {
            item.iter()
                .filter(|(key, _)| {
                    key.as_str().map_or(false, |name| self.is_additional(name))
                })
                .all(|(_, property)| self.node.is_valid(schema, property))
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
            for (key, property) in item.iter() {
                let name = key.as_str().expect("object keys are strings");
                if self.is_additional(name) {
                    let property_path = instance_path.push(name);
                    errors.extend(self.node.validate(schema, property, &property_path));
                }
            }
            Box::new(errors.into_iter())
        } else {
            no_error()
        }
    }
}

impl fmt::Display for AdditionalPropertiesValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "additionalProperties: {}", self.node)
    }
}

#[inline]
pub(crate) fn compile(
    parent: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    Some(AdditionalPropertiesValidator::compile(
        parent, schema, context,
    ))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use test_case::test_case;

    const FALSE_SCHEMA: &str =
        r#"{"properties": {"n": {"type": "number"}}, "additionalProperties": false}"#;
    const TYPED_SCHEMA: &str = r#"{
        "properties": {"n": true},
        "patternProperties": {"^x-": true},
        "additionalProperties": {"type": "string"}
    }"#;

    #[test_case(FALSE_SCHEMA, r#"{"n": 1}"#)]
    #[test_case(FALSE_SCHEMA, "{}")]
    #[test_case(TYPED_SCHEMA, r#"{"n": 1, "x-a": [], "extra": "ok"}"#)]
    #[test_case(TYPED_SCHEMA, "42"; "not applicable to numbers")]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(FALSE_SCHEMA, r#"{"n": 1, "x": 2}"#)]
    #[test_case(TYPED_SCHEMA, r#"{"extra": 1}"#)]
    fn is_not_valid(schema: &str, instance: &str) {
        tests_util::is_not_valid(schema, instance)
    }

    #[test]
    fn every_extra_property_is_reported() {
        let schema = crate::JsonSchema::compile(FALSE_SCHEMA).unwrap();
        let errors = schema.validate(r#"{"a": 1, "b": 2}"#).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
