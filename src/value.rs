//! The position-tagged JSON value model.
//!
//! Every node produced by the parser carries the [`SourcePosition`] where it
//! started in the input, which is what allows validation errors to point at
//! an exact line and column of the offending value.
use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// A location within the original source text.
///
/// Lines and columns are 0-based internally and rendered 1-based by
/// `Display`. Synthetic nodes (e.g. values materialized while resolving
/// references) carry [`SourcePosition::unknown`].
#[derive(Debug, Clone)]
pub struct SourcePosition {
    /// 0-based line number.
    pub line: usize,
    /// 0-based column number, counted in Unicode scalars.
    pub column: usize,
    source: Arc<str>,
}

impl SourcePosition {
    pub(crate) fn new(line: usize, column: usize, source: Arc<str>) -> SourcePosition {
        SourcePosition {
            line,
            column,
            source,
        }
    }

    /// The sentinel position used where no source location exists.
    #[must_use]
    pub fn unknown() -> SourcePosition {
        SourcePosition {
            line: usize::MAX,
            column: usize::MAX,
            source: Arc::from(""),
        }
    }

    /// Whether this position refers to a real place in some source text.
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.line != usize::MAX
    }

    /// The full source text this position points into.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The text of the line this position points at, if any.
    #[must_use]
    pub fn line_text(&self) -> Option<&str> {
        if self.is_known() {
            self.source.lines().nth(self.line)
        } else {
            None
        }
    }
}

// Two positions are the same place regardless of which `Arc` clone of the
// source they hang on to.
impl PartialEq for SourcePosition {
    fn eq(&self, other: &Self) -> bool {
        self.line == other.line && self.column == other.column
    }
}
impl Eq for SourcePosition {}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "line {}, column {}", self.line + 1, self.column + 1)
        } else {
            f.write_str("unknown position")
        }
    }
}

/// The payload of a JSON node.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(Object),
}

/// A JSON value together with the source position where it started.
///
/// Equality ignores positions entirely and is variant-sensitive for
/// numbers: `1` and `1.0` are different values.
#[derive(Debug, Clone)]
pub struct JsonValue {
    pub value: Value,
    pub position: SourcePosition,
}

impl JsonValue {
    #[must_use]
    pub fn new(value: Value, position: SourcePosition) -> JsonValue {
        JsonValue { value, position }
    }

    /// A value with no source location attached.
    #[must_use]
    pub fn synthetic(value: Value) -> JsonValue {
        JsonValue {
            value,
            position: SourcePosition::unknown(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(string) = &self.value {
            Some(string)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Boolean(value) = self.value {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        if let Value::Integer(value) = self.value {
            Some(value)
        } else {
            None
        }
    }

    /// Numeric view of the value; integers widen to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self.value {
            Value::Integer(value) => Some(value as f64),
            Value::Float(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[JsonValue]> {
        if let Value::Array(items) = &self.value {
            Some(items)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        if let Value::Object(object) = &self.value {
            Some(object)
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.value, Value::Null)
    }

    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self.value, Value::Integer(_) | Value::Float(_))
    }
}

impl PartialEq for JsonValue {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(left), Value::Boolean(right)) => left == right,
            (Value::Integer(left), Value::Integer(right)) => left == right,
            (Value::Float(left), Value::Float(right)) => left == right,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::Array(left), Value::Array(right)) => {
                left.len() == right.len()
                    && left.iter().zip(right.iter()).all(|(a, b)| a == b)
            }
            (Value::Object(left), Value::Object(right)) => left == right,
            (_, _) => false,
        }
    }
}

// Only strings are legal object keys, so only strings get a real hash.
// Everything else contributes a fixed sentinel, which keeps `Hash`/`Eq`
// consistent without pretending non-key variants are hashable.
impl Hash for JsonValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.value {
            Value::String(string) => string.hash(state),
            _ => state.write_u32(0xC0DE_F00D),
        }
    }
}

/// An insertion-ordered JSON object.
///
/// Keys are full [`JsonValue`] strings so that error messages can point at
/// the key's own location. Inserting an existing key replaces the earlier
/// entry (last-wins), preserving its slot.
#[derive(Debug, Clone, Default)]
pub struct Object {
    entries: Vec<(JsonValue, JsonValue)>,
}

impl Object {
    #[must_use]
    pub fn new() -> Object {
        Object {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Object {
        Object {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, key: JsonValue, value: JsonValue) {
        let name = key.as_str().map(str::to_owned).unwrap_or_default();
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.as_str() == Some(name.as_str()))
        {
            *entry = (key, value);
        } else {
            self.entries.push((key, value));
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.entries
            .iter()
            .find(|(key, _)| key.as_str() == Some(name))
            .map(|(_, value)| value)
    }

    /// The full entry, including the key node with its position.
    #[must_use]
    pub fn get_entry(&self, name: &str) -> Option<(&JsonValue, &JsonValue)> {
        self.entries
            .iter()
            .find(|(key, _)| key.as_str() == Some(name))
            .map(|(key, value)| (key, value))
    }

    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&JsonValue, &JsonValue)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &JsonValue> {
        self.entries.iter().map(|(key, _)| key)
    }
}

// Objects compare as mappings: same key set, equal values, order ignored.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(key, value)| {
                key.as_str()
                    .and_then(|name| other.get(name))
                    .map_or(false, |found| found == value)
            })
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, string: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in string.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{8}' => f.write_str("\\b")?,
            '\u{c}' => f.write_str("\\f")?,
            ch if (ch as u32) < 0x20 => write!(f, "\\u{:04x}", ch as u32)?,
            ch => write!(f, "{}", ch)?,
        }
    }
    f.write_str("\"")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(true) => f.write_str("true"),
            Value::Boolean(false) => f.write_str("false"),
            Value::Integer(value) => write!(f, "{}", value),
            Value::Float(value) => {
                // Keep the float marker so the output re-parses as a float.
                if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
                    write!(f, "{:.1}", value)
                } else {
                    write!(f, "{}", value)
                }
            }
            Value::String(string) => write_escaped(f, string),
            Value::Array(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Object(object) => {
                f.write_str("{")?;
                for (idx, (key, value)) in object.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write_escaped(f, key.as_str().unwrap_or_default())?;
                    f.write_str(":")?;
                    write!(f, "{}", value)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonValue, Value};
    use crate::parser::parse;
    use test_case::test_case;

    #[test_case("1", "1.0"; "integer vs float")]
    #[test_case("[2]", "[2.0]"; "nested integer vs float")]
    #[test_case(r#"{"a": 1}"#, r#"{"a": 1.0}"#; "object member integer vs float")]
    #[test_case("[]", r#"["foo"]"#; "length mismatch")]
    fn are_not_equal(left: &str, right: &str) {
        assert_ne!(parse(left).unwrap(), parse(right).unwrap());
    }

    #[test_case("1", "1")]
    #[test_case("1.0", "1.00")]
    #[test_case(r#"{"a": 1, "b": 2}"#, r#"{"b": 2, "a": 1}"#; "object order ignored")]
    #[test_case(r#"[null, true, "x"]"#, "[null,true,\"x\"]")]
    fn are_equal(left: &str, right: &str) {
        assert_eq!(parse(left).unwrap(), parse(right).unwrap());
    }

    #[test]
    fn positions_do_not_affect_equality() {
        assert_eq!(parse("  42").unwrap(), parse("42").unwrap());
    }

    #[test_case("null")]
    #[test_case("true")]
    #[test_case("-12")]
    #[test_case("3.5")]
    #[test_case(r#""a\"b\\c\nd""#)]
    #[test_case(r#"[1,[2.5,"x"],{}]"#)]
    #[test_case(r#"{"k":{"nested":[null,false]}}"#)]
    fn display_round_trips(source: &str) {
        let value = parse(source).unwrap();
        let printed = value.to_string();
        assert_eq!(parse(&printed).unwrap(), value, "{}", printed);
    }

    #[test]
    fn float_display_keeps_marker() {
        let value = JsonValue::synthetic(Value::Float(1.0));
        assert_eq!(value.to_string(), "1.0");
    }

    #[test]
    fn last_wins_on_duplicate_keys() {
        let object = parse(r#"{"a": 1, "a": 2}"#).unwrap();
        let object = object.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object.get("a").and_then(JsonValue::as_i64), Some(2));
    }
}
