use crate::{
    compilation::{compile_validators, context::CompilationContext, JsonSchema},
    error::{no_error, ErrorIterator, ValidationError, ValidationErrors},
    keywords::CompilationResult,
    paths::{InstancePath, JsonPointer},
    validator::{SchemaNode, Validate},
    value::{JsonValue, Object, Value},
};
use std::{fmt, sync::Arc};

enum Dependency {
    /// An array of property names that must be present alongside the key.
    Required(Vec<String>),
    /// A schema the whole object must satisfy when the key is present.
    Schema(Arc<SchemaNode>),
}

pub(crate) struct DependenciesValidator {
    dependencies: Vec<(String, Dependency)>,
    schema_path: JsonPointer,
}

impl DependenciesValidator {
    #[inline]
    pub(crate) fn compile(schema: &JsonValue, context: &CompilationContext) -> CompilationResult {
        let map = match schema.as_object() {
            Some(map) => map,
            None => return Err(ValidationError::schema(schema).into()),
        };
        let keyword_context = context.with_path("dependencies");
        let mut errors = ValidationErrors::default();
        let mut dependencies = Vec::with_capacity(map.len());
        for (key, dependency) in map.iter() {
            let name = key.as_str().expect("object keys are strings");
            match &dependency.value {
                Value::Array(items) => {
                    let mut required = Vec::with_capacity(items.len());
                    for item in items {
                        match item.as_str() {
                            Some(property) => required.push(property.to_owned()),
                            None => errors.push(ValidationError::schema(item)),
                        }
                    }
                    dependencies.push((name.to_owned(), Dependency::Required(required)));
                }
                _ => {
                    let dependency_context = keyword_context.with_path(name);
                    match compile_validators(dependency, &dependency_context) {
                        Ok(node) => {
                            dependencies.push((name.to_owned(), Dependency::Schema(node)))
                        }
                        Err(child_errors) => errors.extend(child_errors),
                    }
                }
            }
        }
        if errors.is_empty() {
            Ok(Box::new(DependenciesValidator {
                dependencies,
                schema_path: keyword_context.as_pointer(),
            }))
        } else {
            Err(errors)
        }
    }
}

impl Validate for DependenciesValidator {
    fn is_valid(&self, schema: &JsonSchema, instance: &JsonValue) -> bool {
        if let Value::Object(item) = &instance.value {
            self.dependencies
                .iter()
                .filter(|(name, _)| item.contains_key(name))
                .all(|(_, dependency)| match dependency {
                    Dependency::Required(required) => {
                        required.iter().all(|property| item.contains_key(property))
                    }
                    Dependency::Schema(node) => node.is_valid(schema, instance),
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
            for (_, dependency) in self
                .dependencies
                .iter()
                .filter(|(name, _)| item.contains_key(name))
            {
                match dependency {
                    Dependency::Required(required) => {
                        for property in required.iter().filter(|property| !item.contains_key(property))
                        {
                            errors.push(ValidationError::required(
                                self.schema_path.clone(),
                                instance_path.into(),
                                instance,
                                property.clone(),
                            ));
                        }
                    }
                    Dependency::Schema(node) => {
                        errors.extend(node.validate(schema, instance, instance_path));
                    }
                }
            }
            Box::new(errors.into_iter())
        } else {
            no_error()
        }
    }
}

impl fmt::Display for DependenciesValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dependencies: [{}]",
            self.dependencies
                .iter()
                .map(|(name, _)| name.as_str())
                .collect::<Vec<_>>()
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
    Some(DependenciesValidator::compile(schema, context))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use test_case::test_case;

    const REQUIRED_SCHEMA: &str = r#"{"dependencies": {"a": ["b", "c"]}}"#;
    const SCHEMA_SCHEMA: &str = r#"{"dependencies": {"a": {"maxProperties": 2}}}"#;

    #[test_case(REQUIRED_SCHEMA, r#"{"a": 1, "b": 2, "c": 3}"#)]
    #[test_case(REQUIRED_SCHEMA, r#"{"b": 2}"#; "trigger key absent")]
    #[test_case(SCHEMA_SCHEMA, r#"{"a": 1, "b": 2}"#)]
    #[test_case(SCHEMA_SCHEMA, r#"{"x": 1, "y": 2, "z": 3}"#; "schema dependency without trigger")]
    #[test_case(REQUIRED_SCHEMA, "[1]"; "not applicable to arrays")]
    fn is_valid(schema: &str, instance: &str) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(REQUIRED_SCHEMA, r#"{"a": 1, "b": 2}"#; "one required dependency missing")]
    #[test_case(SCHEMA_SCHEMA, r#"{"a": 1, "b": 2, "c": 3}"#)]
    fn is_not_valid(schema: &str, instance: &str) {
        tests_util::is_not_valid(schema, instance)
    }
}
