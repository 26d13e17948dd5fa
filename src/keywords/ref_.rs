use crate::{
    compilation::{context::CompilationContext, JsonSchema},
    error::{error, ErrorIterator, ValidationError},
    keywords::CompilationResult,
    paths::{InstancePath, JsonPointer},
    resolver::{resolve_reference, ResolvedReference},
    validator::Validate,
    value::{JsonValue, Object},
};
use std::fmt;

/// The `$ref` indirection. The reference was queued during compilation and
/// checked by the end-of-compile sweep, so at validation time resolution
/// is a pure registry lookup.
pub(crate) struct RefValidator {
    reference: String,
    #[allow(dead_code)]
    schema_path: JsonPointer,
}

impl Validate for RefValidator {
    fn is_valid(&self, schema: &JsonSchema, instance: &JsonValue) -> bool {
        match resolve_reference(schema, &self.reference) {
            Some(ResolvedReference::Local(node)) => node.is_valid(schema, instance),
            // Nested lookups inside a remote document go through that
            // document's own resolver.
            Some(ResolvedReference::Remote(node, remote)) => node.is_valid(&remote, instance),
            None => false,
        }
    }

    fn validate(
        &self,
        schema: &JsonSchema,
        instance: &JsonValue,
        instance_path: &InstancePath,
    ) -> ErrorIterator {
        match resolve_reference(schema, &self.reference) {
            Some(ResolvedReference::Local(node)) => node.validate(schema, instance, instance_path),
            Some(ResolvedReference::Remote(node, remote)) => {
                node.validate(&remote, instance, instance_path)
            }
            None => error(ValidationError::unexpected(
                instance,
                &format!("$ref: {}", self.reference),
            )),
        }
    }
}

impl fmt::Display for RefValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$ref: {}", self.reference)
    }
}

#[inline]
pub(crate) fn compile(
    _: &Object,
    schema: &JsonValue,
    context: &CompilationContext,
) -> CompilationResult {
    match schema.as_str() {
        Some(reference) => {
            context
                .resolver
                .add_pending(reference.to_owned(), schema.position.clone());
            Ok(Box::new(RefValidator {
                reference: reference.to_owned(),
                schema_path: context.as_pointer_with("$ref"),
            }))
        }
        None => Err(ValidationError::schema(schema).into()),
    }
}
