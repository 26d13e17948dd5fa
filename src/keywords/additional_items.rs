use crate::{
    compilation::{compile_validators, context::CompilationContext, JsonSchema},
    error::{error, no_error, ErrorIterator, ValidationError},
    keywords::CompilationResult,
    paths::{InstancePath, JsonPointer},
    validator::{SchemaNode, Validate},
    value::{JsonValue, Object, Value},
};
use std::{fmt, sync::Arc};

/// `additionalItems` as a schema, applied to elements past the sibling
/// `items` array prefix.
pub(crate) struct AdditionalItemsObjectValidator {
    node: Arc<SchemaNode>,
    items_count: usize,
}

impl Validate for AdditionalItemsObjectValidator {
    fn is_valid(&self, schema: &JsonSchema, instance: &JsonValue) -> bool {
        if let Value::Array(items) = &instance.value {
            items
                .iter()
                .skip(self.items_count)
                .all(|item| self.node.is_valid(schema, item))
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
            for (idx, item) in items.iter().enumerate().skip(self.items_count) {
                let item_path = instance_path.push(idx);
                errors.extend(self.node.validate(schema, item, &item_path));
            }
            Box::new(errors.into_iter())
        } else {
            no_error()
        }
    }
}

impl fmt::Display for AdditionalItemsObjectValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "additionalItems: {}", self.node)
    }
}

/// `additionalItems: false`: the array may not be longer than the sibling
/// `items` array.
pub(crate) struct AdditionalItemsBooleanValidator {
    items_count: usize,
    schema_path: JsonPointer,
}

impl Validate for AdditionalItemsBooleanValidator {
    fn is_valid(&self, _: &JsonSchema, instance: &JsonValue) -> bool {
        if let Value::Array(items) = &instance.value {
            if items.len() > self.items_count {
                return false;
            }
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
            error(ValidationError::additional_items(
                self.schema_path.clone(),
                instance_path.into(),
                instance,
                self.items_count,
            ))
        }
    }
}

impl fmt::Display for AdditionalItemsBooleanValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("additionalItems: false")
    }
}

#[inline]
pub(crate) fn compile(
    parent: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    // Only meaningful when the sibling `items` is in array form; a single
    // `items` schema already covers every element.
    let items_count = match parent.get("items").map(|items| &items.value) {
        Some(Value::Array(items)) => items.len(),
        _ => return None,
    };
    match &schema.value {
        Value::Boolean(true) => None,
        Value::Boolean(false) => Some(Ok(Box::new(AdditionalItemsBooleanValidator {
            items_count,
            schema_path: context.as_pointer_with("additionalItems"),
        }))),
        Value::Object(_) => {
            let keyword_context = context.with_path("additionalItems");
            match compile_validators(schema, &keyword_context) {
                Ok(node) => Some(Ok(Box::new(AdditionalItemsObjectValidator {
                    node,
                    items_count,
                }))),
                Err(child_errors) => Some(Err(child_errors)),
            }
        }
        _ => Some(Err(ValidationError::schema(schema).into())),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use test_case::test_case;

    const FALSE_SCHEMA: &str =
        r#"{"items": [{"type": "integer"}], "additionalItems": false}"#;
    const TYPED_SCHEMA: &str =
        r#"{"items": [{"type": "integer"}], "additionalItems": {"type": "string"}}"#;

    #[test_case(FALSE_SCHEMA, "[1]")]
    #[test_case(FALSE_SCHEMA, "[]")]
    #[test_case(TYPED_SCHEMA, r#"[1, "a", "b"]"#)]
    #[test_case(r#"{"items": {"type": "integer"}, "additionalItems": false}"#, "[1, 2, 3]"; "ignored when items is a single schema")]
    #[test_case(r#"{"additionalItems": false}"#, "[1, 2, 3]"; "ignored without items")]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(FALSE_SCHEMA, "[1, 2]")]
    #[test_case(TYPED_SCHEMA, "[1, 2]")]
    fn is_not_valid(schema: &str, instance: &str) {
        tests_util::is_not_valid(schema, instance)
    }
}
