use crate::{
    compilation::options::CompilationOptions,
    paths::{InstancePath, JsonPointer, PathChunk},
    resolver::RefResolver,
    validator::SchemaNode,
};
use std::sync::Arc;

/// Context threaded through compilation: the root's resolver, the active
/// configuration, and the pointer path of the schema location being
/// compiled.
#[derive(Debug)]
pub(crate) struct CompilationContext<'a> {
    pub(crate) resolver: &'a Arc<RefResolver>,
    pub(crate) config: &'a Arc<CompilationOptions>,
    pub(crate) schema_path: InstancePath<'a>,
}

impl<'a> CompilationContext<'a> {
    pub(crate) const fn new(
        resolver: &'a Arc<RefResolver>,
        config: &'a Arc<CompilationOptions>,
    ) -> Self {
        CompilationContext {
            resolver,
            config,
            schema_path: InstancePath::new(),
        }
    }

    #[inline]
    pub(crate) fn with_path(&'a self, chunk: impl Into<PathChunk>) -> Self {
        CompilationContext {
            resolver: self.resolver,
            config: self.config,
            schema_path: self.schema_path.push(chunk),
        }
    }

    /// The JSON Pointer of the current location.
    #[inline]
    pub(crate) fn as_pointer(&self) -> JsonPointer {
        (&self.schema_path).into()
    }

    /// The JSON Pointer of the current location extended with one chunk.
    #[inline]
    pub(crate) fn as_pointer_with(&self, chunk: impl Into<PathChunk>) -> JsonPointer {
        let path = self.schema_path.push(chunk);
        JsonPointer::from(&path)
    }

    /// Register a compiled node under the current location's fragment.
    pub(crate) fn register(&self, node: &Arc<SchemaNode>) {
        self.resolver
            .add_reference(self.as_pointer().to_fragment(), node);
    }
}
