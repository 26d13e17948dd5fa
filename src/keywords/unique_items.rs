use crate::{
    compilation::{context::CompilationContext, JsonSchema},
    error::{error, no_error, ErrorIterator, ValidationError},
    keywords::{helpers::equal, CompilationResult},
    paths::{InstancePath, JsonPointer},
    validator::Validate,
    value::{JsonValue, Object, Value},
};
use ahash::{AHashSet, AHasher};
use std::{
    fmt,
    hash::{Hash, Hasher},
};

// Deep hash matching the structural (variant-sensitive) equality used for
// uniqueness: integers and floats hash differently on purpose.
#[derive(PartialEq)]
pub(crate) struct HashedValue<'a>(&'a JsonValue);

impl Eq for HashedValue<'_> {}

impl Hash for HashedValue<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.0.value {
            Value::Null => state.write_u32(3_221_225_473), // chosen randomly
            Value::Boolean(item) => item.hash(state),
            Value::Integer(item) => item.hash(state),
            Value::Float(item) => item.to_bits().hash(state),
            Value::String(item) => item.hash(state),
            Value::Array(items) => {
                for item in items {
                    HashedValue(item).hash(state);
                }
            }
            Value::Object(items) => {
                let mut hash = 0;
                for (key, value) in items.iter() {
                    // We have no way of building a new hasher of type `H`, so we
                    // hardcode using the default hasher of a hash map.
                    let mut item_hasher = AHasher::default();
                    key.as_str().hash(&mut item_hasher);
                    HashedValue(value).hash(&mut item_hasher);
                    hash ^= item_hasher.finish();
                }
                state.write_u64(hash);
            }
        }
    }
}

// Empirically calculated threshold after which the validator resorts to hashing.
const ITEMS_SIZE_THRESHOLD: usize = 11;

#[inline]
pub(crate) fn is_unique(items: &[JsonValue]) -> bool {
    let size = items.len();
    if size <= 1 {
        // Empty arrays and one-element arrays always contain unique elements
        true
    } else if size <= ITEMS_SIZE_THRESHOLD {
        // Comparing all elements pairwise is faster than hashing for
        // small arrays, even though the algorithm is O(N^2)
        for (idx, item) in items.iter().enumerate() {
            for other_item in items.iter().skip(idx + 1) {
                if equal(item, other_item) {
                    return false;
                }
            }
        }
        true
    } else {
        let mut seen = AHashSet::with_capacity(size);
        items.iter().map(HashedValue).all(move |item| seen.insert(item))
    }
}

pub(crate) struct UniqueItemsValidator {
    schema_path: JsonPointer,
}

impl Validate for UniqueItemsValidator {
    fn is_valid(&self, _: &JsonSchema, instance: &JsonValue) -> bool {
        if let Value::Array(items) = &instance.value {
            if !is_unique(items) {
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
            error(ValidationError::unique_items(
                self.schema_path.clone(),
                instance_path.into(),
                instance,
            ))
        }
    }
}

impl fmt::Display for UniqueItemsValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("uniqueItems: true")
    }
}

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> Option<CompilationResult> {
    match schema.value {
        Value::Boolean(true) => Some(Ok(Box::new(UniqueItemsValidator {
            schema_path: context.as_pointer_with("uniqueItems"),
        }))),
        Value::Boolean(false) => None,
        _ => Some(Err(ValidationError::schema(schema).into())),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use test_case::test_case;

    const SCHEMA: &str = r#"{"uniqueItems": true}"#;

    #[test_case(SCHEMA, r#"["a", "b", "c"]"#)]
    #[test_case(SCHEMA, "[]")]
    #[test_case(SCHEMA, "[1, 1.0]"; "integer and float are distinct")]
    #[test_case(SCHEMA, "[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]"; "hashed path")]
    #[test_case(r#"{"uniqueItems": false}"#, "[1, 1]")]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(SCHEMA, "[1, 1]")]
    #[test_case(SCHEMA, r#"[{"a": 1}, {"a": 1}]"#)]
    #[test_case(SCHEMA, r#"[[1, 2], [1, 2]]"#)]
    #[test_case(SCHEMA, "[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 1]"; "hashed path duplicate")]
    fn is_not_valid(schema: &str, instance: &str) {
        tests_util::is_not_valid(schema, instance)
    }
}
