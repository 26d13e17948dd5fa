//! # spanned-jsonschema
//!
//! JSON Schema Draft 7 validation on top of a position-preserving JSON
//! parser: every parsed value remembers its line and column, and every
//! validation error points back at the exact location of the offending
//! value in the input.
//!
//! A schema is compiled once into a validation tree and can then check any
//! number of instances:
//!
//! ```rust
//! use spanned_jsonschema::JsonSchema;
//!
//! let schema = JsonSchema::compile(r#"{"maxLength": 5}"#).expect("A valid schema");
//! if let Err(errors) = schema.validate(r#""too long indeed""#) {
//!     for (message, position) in errors.to_pairs() {
//!         println!("{} ({})", message, position);
//!     }
//! }
//! ```
//!
//! Compilation validates the schema document against the bundled Draft 7
//! meta-schema (disable with
//! [`CompilationOptions::without_schema_validation`]), resolves every
//! `$ref` up front, and accumulates all problems it can find instead of
//! stopping at the first one.
#![warn(
    clippy::cast_possible_truncation,
    clippy::doc_markdown,
    clippy::explicit_iter_loop,
    clippy::map_unwrap_or,
    clippy::match_same_arms,
    clippy::needless_borrow,
    clippy::print_stdout,
    clippy::redundant_closure,
    clippy::trivially_copy_pass_by_ref,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unreachable_pub,
    variant_size_differences
)]
#![allow(clippy::unnecessary_wraps, clippy::needless_collect)]
mod compilation;
pub mod error;
mod keywords;
mod lexer;
pub mod parser;
pub mod paths;
pub mod primitive_type;
mod resolver;
mod stream;
mod validator;
pub mod value;

pub use compilation::{options::CompilationOptions, JsonSchema};
pub use error::{
    ErrorIterator, ParseError, ParseErrorKind, ValidationError, ValidationErrorKind,
    ValidationErrors,
};
pub use parser::{parse, parse_bytes};
pub use resolver::DocumentFetcher;
pub use value::{JsonValue, Object, SourcePosition, Value};

/// A shortcut for validating `instance` against `schema`.
///
/// ```rust
/// use spanned_jsonschema::is_valid;
///
/// assert!(is_valid(r#"{"maxLength": 5}"#, r#""foo""#));
/// ```
///
/// This function panics if an invalid schema is passed.
#[must_use]
#[inline]
pub fn is_valid(schema: &str, instance: &str) -> bool {
    let compiled = JsonSchema::compile(schema).expect("Invalid schema");
    compiled.is_valid(instance)
}

#[cfg(test)]
pub(crate) mod tests_util {
    use super::JsonSchema;

    pub(crate) fn is_not_valid(schema: &str, instance: &str) {
        let compiled = JsonSchema::compile(schema).unwrap();
        assert!(
            !compiled.is_valid(instance),
            "{} should not be valid (via is_valid)",
            instance
        );
        assert!(
            compiled.validate(instance).is_err(),
            "{} should not be valid (via validate)",
            instance
        );
    }

    pub(crate) fn is_valid(schema: &str, instance: &str) {
        let compiled = JsonSchema::compile(schema).unwrap();
        assert!(
            compiled.is_valid(instance),
            "{} should be valid (via is_valid)",
            instance
        );
        assert!(
            compiled.validate(instance).is_ok(),
            "{} should be valid (via validate)",
            instance
        );
    }

    pub(crate) fn expect_errors(schema: &str, instance: &str, errors: &[&str]) {
        assert_eq!(
            JsonSchema::compile(schema)
                .expect("Should be a valid schema")
                .validate(instance)
                .expect_err(format!("{} should not be valid", instance).as_str())
                .iter()
                .map(|error| error.to_string())
                .collect::<Vec<String>>(),
            errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{is_valid, JsonSchema};

    #[test]
    fn test_is_valid() {
        let schema = r#"{"minLength": 5}"#;
        assert!(is_valid(schema, "\"foobar\""));
        assert!(!is_valid(schema, "\"foo\""));
    }

    #[test]
    fn empty_enum_compiles() {
        // Regression guard: enums with no options are legal schemas.
        for schema in [r#"{"enum": [0, 0.0]}"#, r#"{"enum": []}"#] {
            assert!(JsonSchema::compile(schema).is_ok());
        }
    }

    #[test]
    fn incomplete_escape_in_pattern() {
        let schema = r#"{"pattern": "\\u"}"#;
        assert!(JsonSchema::compile(schema).is_err());
    }
}
