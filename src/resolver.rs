//! Reference resolver. Implements the registry behind the `$ref` keyword.
//!
//! Every root schema owns one [`RefResolver`]. During compilation each
//! compiled node registers itself under its escaped JSON-Pointer fragment
//! (`#`, `#/properties/x`, ...) and under its `$id` when it has one, while
//! every encountered `$ref` is queued. The queue is drained once when root
//! compilation finishes; after that every lookup is a read.
use crate::{
    compilation::JsonSchema,
    paths::{unescape_segment, PathChunk},
    validator::SchemaNode,
    value::{JsonValue, SourcePosition, Value},
};
use ahash::AHashMap;
use parking_lot::RwLock;
use std::{fmt, sync::Arc};

/// Loads the raw bytes of a remote schema document.
///
/// The default implementation performs a blocking HTTP GET; tests and
/// embedders can inject anything else (a fixture map, a local file layer).
pub trait DocumentFetcher: Send + Sync {
    /// Fetch the document behind `url`.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>>;
}

#[cfg(feature = "reqwest")]
pub(crate) struct HttpFetcher;

#[cfg(feature = "reqwest")]
impl DocumentFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
        let response = reqwest::blocking::get(url)?;
        Ok(response.bytes()?.to_vec())
    }
}

/// Used when the `reqwest` feature is disabled and no fetcher was injected.
#[cfg(not(feature = "reqwest"))]
pub(crate) struct NoFetcher;

#[cfg(not(feature = "reqwest"))]
impl DocumentFetcher for NoFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("no document fetcher is configured to load \"{}\"", url).into())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PendingReference {
    pub(crate) reference: String,
    pub(crate) position: SourcePosition,
}

pub(crate) struct RefResolver {
    // Escaped pointer fragments and `$id` anchors/URIs to compiled nodes.
    // Redefinition of a fragment silently overwrites.
    references: RwLock<AHashMap<String, Arc<SchemaNode>>>,
    // References seen during compilation, checked once at the end.
    pending: RwLock<Vec<PendingReference>>,
    // URL-keyed standalone schemas, populated only during compilation.
    remote_cache: RwLock<AHashMap<String, Arc<JsonSchema>>>,
}

impl RefResolver {
    pub(crate) fn new() -> RefResolver {
        RefResolver {
            references: RwLock::new(AHashMap::new()),
            pending: RwLock::new(Vec::new()),
            remote_cache: RwLock::new(AHashMap::new()),
        }
    }

    pub(crate) fn add_reference(&self, fragment: String, node: &Arc<SchemaNode>) {
        self.references.write().insert(fragment, Arc::clone(node));
    }

    pub(crate) fn get_reference(&self, fragment: &str) -> Option<Arc<SchemaNode>> {
        self.references.read().get(fragment).map(Arc::clone)
    }

    pub(crate) fn add_pending(&self, reference: String, position: SourcePosition) {
        self.pending.write().push(PendingReference {
            reference,
            position,
        });
    }

    pub(crate) fn take_pending(&self) -> Vec<PendingReference> {
        std::mem::take(&mut *self.pending.write())
    }

    pub(crate) fn cache_remote(&self, url: String, schema: &Arc<JsonSchema>) {
        self.remote_cache.write().insert(url, Arc::clone(schema));
    }

    pub(crate) fn get_remote(&self, url: &str) -> Option<Arc<JsonSchema>> {
        self.remote_cache.read().get(url).map(Arc::clone)
    }
}

impl fmt::Debug for RefResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefResolver")
            .field("references", &self.references.read().len())
            .field("pending", &self.pending.read().len())
            .field("remote_cache", &self.remote_cache.read().len())
            .finish()
    }
}

/// Percent-decode a reference so that `%25`-style escapes match the raw
/// fragments the registry is keyed by.
pub(crate) fn normalize_reference(reference: &str) -> String {
    percent_encoding::percent_decode_str(reference)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| reference.to_owned())
}

/// A reference looked up at validation time: the target node plus, for
/// cross-document references, the schema whose resolver must serve any
/// nested lookups.
pub(crate) enum ResolvedReference {
    Local(Arc<SchemaNode>),
    Remote(Arc<SchemaNode>, Arc<JsonSchema>),
}

/// Read-only lookup used by the `$ref` validator. All the registration and
/// fetching happened during compilation, so a miss here means the schema
/// graph is inconsistent.
pub(crate) fn resolve_reference(
    schema: &JsonSchema,
    reference: &str,
) -> Option<ResolvedReference> {
    let normalized = normalize_reference(reference);
    if normalized.starts_with('#') {
        return schema
            .resolver
            .get_reference(&normalized)
            .map(ResolvedReference::Local);
    }
    // An exact hit covers schemas registered under an absolute `$id`.
    if let Some(node) = schema.resolver.get_reference(&normalized) {
        return Some(ResolvedReference::Local(node));
    }
    let (url, fragment) = match normalized.split_once('#') {
        Some((url, fragment)) => (url, fragment),
        None => (normalized.as_str(), ""),
    };
    let remote = schema.resolver.get_remote(url)?;
    let node = remote.resolver.get_reference(&format!("#{}", fragment))?;
    Some(ResolvedReference::Remote(node, remote))
}

/// Resolve an escaped `#/...` fragment against a parsed document, returning
/// the target node and the path chunks leading to it.
pub(crate) fn lookup_value<'a>(
    document: &'a JsonValue,
    fragment: &str,
) -> Option<(&'a JsonValue, Vec<PathChunk>)> {
    let pointer = fragment.strip_prefix('#')?;
    if pointer.is_empty() {
        return Some((document, Vec::new()));
    }
    let pointer = pointer.strip_prefix('/')?;
    let mut target = document;
    let mut chunks = Vec::new();
    for segment in pointer.split('/') {
        let segment = unescape_segment(segment);
        match &target.value {
            Value::Object(object) => {
                target = object.get(&segment)?;
                chunks.push(PathChunk::Name(segment));
            }
            Value::Array(items) => {
                let index = parse_index(&segment)?;
                target = items.get(index)?;
                chunks.push(PathChunk::Index(index));
            }
            _ => return None,
        }
    }
    Some((target, chunks))
}

fn parse_index(segment: &str) -> Option<usize> {
    if segment.starts_with('+') || (segment.starts_with('0') && segment.len() != 1) {
        None
    } else {
        segment.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::{lookup_value, normalize_reference};
    use crate::parser::parse;
    use crate::paths::PathChunk;

    #[test]
    fn pointer_lookup() {
        let document =
            parse(r#"{"definitions": {"a~b": {"items": [{"type": "integer"}, 2]}}}"#).unwrap();
        let (target, chunks) = lookup_value(&document, "#/definitions/a~0b/items/1").unwrap();
        assert_eq!(target.as_i64(), Some(2));
        assert_eq!(
            chunks,
            vec![
                PathChunk::Name("definitions".to_owned()),
                PathChunk::Name("a~b".to_owned()),
                PathChunk::Name("items".to_owned()),
                PathChunk::Index(1),
            ]
        );
    }

    #[test]
    fn root_pointer() {
        let document = parse("{}").unwrap();
        let (target, chunks) = lookup_value(&document, "#").unwrap();
        assert!(target.as_object().unwrap().is_empty());
        assert!(chunks.is_empty());
    }

    #[test]
    fn missing_target() {
        let document = parse(r#"{"a": 1}"#).unwrap();
        assert!(lookup_value(&document, "#/b").is_none());
        assert!(lookup_value(&document, "#/a/b").is_none());
    }

    #[test]
    fn index_rules() {
        let document = parse("[1, 2, 3]").unwrap();
        assert!(lookup_value(&document, "#/01").is_none());
        assert!(lookup_value(&document, "#/+1").is_none());
        assert!(lookup_value(&document, "#/2").is_some());
    }

    #[test]
    fn percent_decoding() {
        assert_eq!(normalize_reference("#/a%25b"), "#/a%b");
        assert_eq!(normalize_reference("#/plain"), "#/plain");
    }
}
