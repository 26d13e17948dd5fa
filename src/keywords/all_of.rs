use crate::{
    compilation::{compile_validators, context::CompilationContext, JsonSchema},
    error::{ErrorIterator, ValidationError, ValidationErrors},
    keywords::CompilationResult,
    paths::InstancePath,
    validator::{format_nodes, SchemaNode, Validate},
    value::{JsonValue, Object, Value},
};
use std::{fmt, sync::Arc};

pub(crate) struct AllOfValidator {
    schemas: Vec<Arc<SchemaNode>>,
}

impl AllOfValidator {
    #[inline]
    pub(crate) fn compile(items: &[JsonValue], context: &CompilationContext) -> CompilationResult {
        let keyword_context = context.with_path("allOf");
        let mut errors = ValidationErrors::default();
        let mut schemas = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let item_context = keyword_context.with_path(idx);
            match compile_validators(item, &item_context) {
                Ok(node) => schemas.push(node),
                Err(child_errors) => errors.extend(child_errors),
            }
        }
        if errors.is_empty() {
            Ok(Box::new(AllOfValidator { schemas }))
        } else {
            Err(errors)
        }
    }
}

impl Validate for AllOfValidator {
    fn is_valid(&self, schema: &JsonSchema, instance: &JsonValue) -> bool {
        self.schemas.iter().all(|node| node.is_valid(schema, instance))
    }

    fn validate(
        &self,
        schema: &JsonSchema,
        instance: &JsonValue,
        instance_path: &InstancePath,
    ) -> ErrorIterator {
        // Every failing branch contributes its errors.
        let errors: Vec<_> = self
            .schemas
            .iter()
            .flat_map(|node| node.validate(schema, instance, instance_path))
            .collect();
        Box::new(errors.into_iter())
    }
}

impl fmt::Display for AllOfValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "allOf: [{}]", format_nodes(&self.schemas))
    }
}

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    match &schema.value {
        Value::Array(items) => Some(AllOfValidator::compile(items, context)),
        _ => Some(Err(ValidationError::schema(schema).into())),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use test_case::test_case;

    const SCHEMA: &str = r#"{"allOf": [{"type": "integer"}, {"minimum": 2}]}"#;

    #[test_case(SCHEMA, "2")]
    #[test_case(SCHEMA, "100")]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(SCHEMA, "1")]
    #[test_case(SCHEMA, "\"2\"")]
    #[test_case(SCHEMA, "1.5"; "fails both branches")]
    fn is_not_valid(schema: &str, instance: &str) {
        tests_util::is_not_valid(schema, instance)
    }

    #[test]
    fn failing_branches_accumulate() {
        let schema = crate::JsonSchema::compile(SCHEMA).unwrap();
        let errors = schema.validate("1.5").unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
