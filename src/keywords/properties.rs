use crate::{
    compilation::{compile_validators, context::CompilationContext, JsonSchema},
    error::{no_error, ErrorIterator, ValidationError, ValidationErrors},
    keywords::CompilationResult,
    paths::InstancePath,
    validator::{format_key_value_nodes, SchemaNode, Validate},
    value::{JsonValue, Object, Value},
};
use std::{fmt, sync::Arc};

pub(crate) struct PropertiesValidator {
    properties: Vec<(String, Arc<SchemaNode>)>,
}

impl PropertiesValidator {
    #[inline]
    pub(crate) fn compile(schema: &JsonValue, context: &CompilationContext) -> CompilationResult {
        match &schema.value {
            Value::Object(map) => {
                let keyword_context = context.with_path("properties");
                let mut errors = ValidationErrors::default();
                let mut properties = Vec::with_capacity(map.len());
                for (key, subschema) in map.iter() {
                    let name = key.as_str().expect("object keys are strings");
                    let property_context = keyword_context.with_path(name);
                    match compile_validators(subschema, &property_context) {
                        Ok(node) => properties.push((name.to_owned(), node)),
                        Err(child_errors) => errors.extend(child_errors),
                    }
                }
                if errors.is_empty() {
                    Ok(Box::new(PropertiesValidator { properties }))
                } else {
                    Err(errors)
                }
            }
            _ => Err(ValidationError::schema(schema).into()),
        }
    }
}

impl Validate for PropertiesValidator {
    fn is_valid(&self, schema: &JsonSchema, instance: &JsonValue) -> bool {
        if let Value::Object(item) = &instance.value {
            self.properties.iter().all(|(name, node)| {
                item.get(name)
                    .map_or(true, |property| node.is_valid(schema, property))
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
            let errors: Vec<_> = self
                .properties
                .iter()
                .filter_map(|(name, node)| item.get(name).map(|property| (name, node, property)))
                .flat_map(|(name, node, property)| {
                    let property_path = instance_path.push(name.clone());
                    node.validate(schema, property, &property_path)
                        .collect::<Vec<_>>()
                })
                .collect();
            Box::new(errors.into_iter())
        } else {
            no_error()
        }
    }
}

impl fmt::Display for PropertiesValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "properties: {{{}}}",
            format_key_value_nodes(&self.properties)
        )
    }
}

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    Some(PropertiesValidator::compile(schema, context))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use test_case::test_case;

    const SCHEMA: &str = r#"{"properties": {"n": {"type": "number"}, "s": {"type": "string"}}}"#;

    #[test_case(SCHEMA, r#"{"n": 1, "s": "x"}"#)]
    #[test_case(SCHEMA, r#"{"n": 1}"#; "missing properties are fine")]
    #[test_case(SCHEMA, r#"{"other": null}"#)]
    #[test_case(SCHEMA, "[]"; "not applicable to arrays")]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(SCHEMA, r#"{"n": "one"}"#)]
    #[test_case(SCHEMA, r#"{"n": 1, "s": 2}"#)]
    fn is_not_valid(schema: &str, instance: &str) {
        tests_util::is_not_valid(schema, instance)
    }

    #[test]
    fn failures_accumulate_across_properties() {
        let schema = crate::JsonSchema::compile(SCHEMA).unwrap();
        let errors = schema.validate(r#"{"n": "one", "s": 2}"#).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
