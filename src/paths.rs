//! Facilities for working with paths within schemas or validated instances.
use std::fmt;

/// JSON Pointer as a wrapper around individual path components.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct JsonPointer(Vec<PathChunk>);

impl JsonPointer {
    /// JSON pointer as a vector of strings. Each component is cast to `String`.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
            .into_iter()
            .map(|item| match item {
                PathChunk::Name(value) => value,
                PathChunk::Index(idx) => idx.to_string(),
            })
            .collect()
    }

    /// Render as a `#`-prefixed fragment with RFC 6901 segment escaping,
    /// the form the reference registry is keyed by.
    #[must_use]
    pub fn to_fragment(&self) -> String {
        let mut fragment = String::from("#");
        for chunk in &self.0 {
            fragment.push('/');
            match chunk {
                PathChunk::Name(value) => fragment.push_str(&escape_segment(value)),
                PathChunk::Index(idx) => fragment.push_str(&idx.to_string()),
            }
        }
        fragment
    }

}

/// Escape a pointer segment: `~` → `~0`, `/` → `~1`.
pub(crate) fn escape_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Undo [`escape_segment`].
pub(crate) fn unescape_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in &self.0 {
            f.write_str("/")?;
            match chunk {
                PathChunk::Name(value) => f.write_str(value)?,
                PathChunk::Index(idx) => write!(f, "{}", idx)?,
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum PathChunk {
    Name(String),
    Index(usize),
}

/// A node in a linked list of path components, cheap to extend while
/// walking a tree and converted to a [`JsonPointer`] only when an error
/// is actually produced.
#[derive(Clone, Debug)]
pub(crate) struct InstancePath<'a> {
    pub(crate) chunk: Option<PathChunk>,
    pub(crate) parent: Option<&'a InstancePath<'a>>,
}

impl<'a> InstancePath<'a> {
    pub(crate) const fn new() -> Self {
        InstancePath {
            chunk: None,
            parent: None,
        }
    }

    pub(crate) fn push(&'a self, chunk: impl Into<PathChunk>) -> Self {
        InstancePath {
            chunk: Some(chunk.into()),
            parent: Some(self),
        }
    }

    pub(crate) fn to_vec(&'a self) -> Vec<PathChunk> {
        // The path capacity should be the average depth so we avoid extra allocations
        let mut result = Vec::with_capacity(6);
        let mut current = self;
        if let Some(chunk) = &current.chunk {
            result.push(chunk.clone())
        }
        while let Some(next) = current.parent {
            current = next;
            if let Some(chunk) = &current.chunk {
                result.push(chunk.clone())
            }
        }
        result.reverse();
        result
    }
}

impl From<String> for PathChunk {
    #[inline]
    fn from(value: String) -> Self {
        PathChunk::Name(value)
    }
}
impl From<&str> for PathChunk {
    #[inline]
    fn from(value: &str) -> Self {
        PathChunk::Name(value.to_owned())
    }
}
impl From<usize> for PathChunk {
    #[inline]
    fn from(value: usize) -> Self {
        PathChunk::Index(value)
    }
}

impl<'a> From<&'a InstancePath<'a>> for JsonPointer {
    #[inline]
    fn from(path: &'a InstancePath<'a>) -> Self {
        JsonPointer(path.to_vec())
    }
}

impl From<&[&str]> for JsonPointer {
    #[inline]
    fn from(path: &[&str]) -> Self {
        JsonPointer(
            path.iter()
                .map(|item| PathChunk::Name((*item).to_owned()))
                .collect(),
        )
    }
}
impl From<&[PathChunk]> for JsonPointer {
    #[inline]
    fn from(path: &[PathChunk]) -> Self {
        JsonPointer(path.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::{escape_segment, unescape_segment, InstancePath, JsonPointer};

    #[test]
    fn display_and_fragment() {
        let root = InstancePath::new();
        let first = root.push("properties");
        let second = first.push("a/b");
        let third = second.push(0_usize);
        let pointer: JsonPointer = (&third).into();
        assert_eq!(pointer.to_string(), "/properties/a/b/0");
        assert_eq!(pointer.to_fragment(), "#/properties/a~1b/0");
    }

    #[test]
    fn root_fragment() {
        assert_eq!(JsonPointer::default().to_fragment(), "#");
        assert_eq!(JsonPointer::default().to_string(), "");
    }

    #[test]
    fn escaping_round_trips() {
        for segment in ["plain", "ti~lde", "sla/sh", "~1", "~0/"] {
            assert_eq!(unescape_segment(&escape_segment(segment)), segment);
        }
    }
}
