use crate::{
    compilation::{compile_validators, context::CompilationContext, JsonSchema},
    error::{no_error, ErrorIterator, ValidationError, ValidationErrors},
    keywords::CompilationResult,
    paths::InstancePath,
    validator::{format_nodes, SchemaNode, Validate},
    value::{JsonValue, Object, Value},
};
use std::{fmt, sync::Arc};

/// `items` with a single schema: every element must conform.
pub(crate) struct ItemsObjectValidator {
    node: Arc<SchemaNode>,
}

impl ItemsObjectValidator {
    #[inline]
    pub(crate) fn compile(schema: &JsonValue, context: &CompilationContext) -> CompilationResult {
        let keyword_context = context.with_path("items");
        let node = compile_validators(schema, &keyword_context)?;
        Ok(Box::new(ItemsObjectValidator { node }))
    }
}

impl Validate for ItemsObjectValidator {
    fn is_valid(&self, schema: &JsonSchema, instance: &JsonValue) -> bool {
        if let Value::Array(items) = &instance.value {
            items.iter().all(|item| self.node.is_valid(schema, item))
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
        if let Value::Array(items) = &instance.value {
            let mut errors = Vec::new();
            for (idx, item) in items.iter().enumerate() {
                let item_path = instance_path.push(idx);
                errors.extend(self.node.validate(schema, item, &item_path));
            }
            Box::new(errors.into_iter())
        } else {
            no_error()
        }
    }
}

impl fmt::Display for ItemsObjectValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "items: {}", self.node)
    }
}

/// `items` with an array of schemas: the i-th element must conform to the
/// i-th schema; excess elements are accepted here and policed by
/// `additionalItems`.
pub(crate) struct ItemsArrayValidator {
    items: Vec<Arc<SchemaNode>>,
}

impl ItemsArrayValidator {
    #[inline]
    pub(crate) fn compile(schemas: &[JsonValue], context: &CompilationContext) -> CompilationResult {
        let keyword_context = context.with_path("items");
        let mut errors = ValidationErrors::default();
        let mut items = Vec::with_capacity(schemas.len());
        for (idx, item) in schemas.iter().enumerate() {
            let item_context = keyword_context.with_path(idx);
            match compile_validators(item, &item_context) {
                Ok(node) => items.push(node),
                Err(child_errors) => errors.extend(child_errors),
            }
        }
        if errors.is_empty() {
            Ok(Box::new(ItemsArrayValidator { items }))
        } else {
            Err(errors)
        }
    }
}

impl Validate for ItemsArrayValidator {
    fn is_valid(&self, schema: &JsonSchema, instance: &JsonValue) -> bool {
        if let Value::Array(items) = &instance.value {
            items
                .iter()
                .zip(self.items.iter())
                .all(|(item, node)| node.is_valid(schema, item))
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
        if let Value::Array(items) = &instance.value {
            let mut errors = Vec::new();
            for (idx, (item, node)) in items.iter().zip(self.items.iter()).enumerate() {
                let item_path = instance_path.push(idx);
                errors.extend(node.validate(schema, item, &item_path));
            }
            Box::new(errors.into_iter())
        } else {
            no_error()
        }
    }
}

impl fmt::Display for ItemsArrayValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "items: [{}]", format_nodes(&self.items))
    }
}

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    match &schema.value {
        Value::Array(items) => Some(ItemsArrayValidator::compile(items, context)),
        Value::Object(_) | Value::Boolean(_) => Some(ItemsObjectValidator::compile(schema, context)),
        _ => Some(Err(ValidationError::schema(schema).into())),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use test_case::test_case;

    #[test_case(r#"{"items": {"type": "string"}}"#, r#"["a", "b"]"#)]
    #[test_case(r#"{"items": {"type": "string"}}"#, "[]")]
    #[test_case(r#"{"items": [{"type": "integer"}, {"type": "string"}]}"#, r#"[1, "a"]"#)]
    #[test_case(r#"{"items": [{"type": "integer"}]}"#, r#"[1, "anything", null]"#; "excess elements accepted")]
    #[test_case(r#"{"items": true}"#, "[null]")]
    #[test_case(r#"{"items": false}"#, "[]"; "false schema with empty array")]
    #[test_case(r#"{"items": {"type": "string"}}"#, r#"{"0": 1}"#; "not applicable to objects")]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(r#"{"items": {"type": "string"}}"#, r#"["a", 1]"#)]
    #[test_case(r#"{"items": [{"type": "integer"}, {"type": "string"}]}"#, r#"["a", 1]"#)]
    #[test_case(r#"{"items": false}"#, "[null]"; "false schema rejects any element")]
    fn is_not_valid(schema: &str, instance: &str) {
        tests_util::is_not_valid(schema, instance)
    }

    #[test]
    fn every_failing_element_is_reported() {
        let schema = crate::JsonSchema::compile(r#"{"items": {"type": "string"}}"#).unwrap();
        let errors = schema.validate("[1, \"ok\", 2]").unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
