//! The runtime side of a compiled schema: the `Validate` trait and the
//! node type grouping the validators compiled for one schema location.
use crate::{
    compilation::JsonSchema,
    error::{ErrorIterator, ValidationError},
    paths::InstancePath,
    value::JsonValue,
};
use std::fmt;

pub(crate) trait Validate: Send + Sync + fmt::Display {
    fn validate(
        &self,
        schema: &JsonSchema,
        instance: &JsonValue,
        instance_path: &InstancePath,
    ) -> ErrorIterator;
    // The same as above, but does not construct `ErrorIterator`.
    // It is faster for cases when the result is not needed (like `anyOf`),
    // since errors are not constructed.
    fn is_valid(&self, schema: &JsonSchema, instance: &JsonValue) -> bool;
}

impl fmt::Debug for dyn Validate + Send + Sync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string())
    }
}

pub(crate) type BoxedValidator = Box<dyn Validate + Send + Sync>;
pub(crate) type Validators = Vec<BoxedValidator>;

/// All validators compiled for a single schema location, executed in
/// keyword order. Shared between the owning parent and the reference
/// registry.
pub(crate) struct SchemaNode {
    validators: Validators,
}

impl SchemaNode {
    pub(crate) fn new(validators: Validators) -> SchemaNode {
        SchemaNode { validators }
    }

    pub(crate) fn validators(&self) -> &[BoxedValidator] {
        &self.validators
    }

    pub(crate) fn is_valid(&self, schema: &JsonSchema, instance: &JsonValue) -> bool {
        self.validators
            .iter()
            .all(|validator| validator.is_valid(schema, instance))
    }

    pub(crate) fn validate(
        &self,
        schema: &JsonSchema,
        instance: &JsonValue,
        instance_path: &InstancePath,
    ) -> ErrorIterator {
        let errors: Vec<ValidationError> = self
            .validators
            .iter()
            .flat_map(|validator| validator.validate(schema, instance, instance_path))
            .collect();
        Box::new(errors.into_iter())
    }
}

impl fmt::Debug for SchemaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_validators(&self.validators))
    }
}

impl fmt::Display for SchemaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_validators(&self.validators))
    }
}

pub(crate) fn format_validators(validators: &[BoxedValidator]) -> String {
    match validators.len() {
        0 => "{}".to_string(),
        1 => {
            let name = validators[0].to_string();
            match name.as_str() {
                // boolean validators are represented as is, without brackets because if they
                // occur in a vector, then the schema is not a key/value mapping
                "true" | "false" => name,
                _ => format!("{{{}}}", name),
            }
        }
        _ => format!(
            "{{{}}}",
            validators
                .iter()
                .map(|validator| format!("{:?}", validator))
                .collect::<Vec<String>>()
                .join(", ")
        ),
    }
}

pub(crate) fn format_nodes(nodes: &[std::sync::Arc<SchemaNode>]) -> String {
    nodes
        .iter()
        .map(|node| node.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

pub(crate) fn format_key_value_nodes(nodes: &[(String, std::sync::Arc<SchemaNode>)]) -> String {
    nodes
        .iter()
        .map(|(name, node)| format!("{}: {}", name, node))
        .collect::<Vec<String>>()
        .join(", ")
}
