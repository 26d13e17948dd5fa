//! Error types
use crate::{
    paths::JsonPointer,
    primitive_type::{PrimitiveType, PrimitiveTypesBitMap},
    value::{JsonValue, SourcePosition, Value},
};
use std::{
    error, fmt,
    iter::{empty, once},
};

/// What went wrong while turning text into a value tree.
///
/// Covers both the lexer (bad escapes, malformed numbers, unterminated
/// strings) and the parser (misplaced tokens, trailing content).
#[derive(Debug, Clone)]
pub enum ParseErrorKind {
    UnexpectedCharacter(char),
    UnknownEscape(char),
    InvalidEscape,
    LoneSurrogate(u32),
    UnterminatedString,
    MalformedNumber(String),
    UnexpectedToken(String),
    InvalidKey(String),
    InvalidValue(String),
    ExpectedColon,
    TrailingComma,
    TrailingContent,
    UnexpectedEnd,
    /// Byte input that is not valid UTF-8.
    InvalidData,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnexpectedCharacter(ch) => {
                write!(f, "Unexpected character {:?}", ch)
            }
            ParseErrorKind::UnknownEscape(ch) => write!(f, "Unknown escape sequence '\\{}'", ch),
            ParseErrorKind::InvalidEscape => f.write_str("Invalid escape sequence"),
            ParseErrorKind::LoneSurrogate(unit) => write!(f, "Lone surrogate \\u{:04X}", unit),
            ParseErrorKind::UnterminatedString => f.write_str("Unterminated string"),
            ParseErrorKind::MalformedNumber(lexeme) => write!(f, "Malformed number '{}'", lexeme),
            ParseErrorKind::UnexpectedToken(token) => write!(f, "Unexpected token '{}'", token),
            ParseErrorKind::InvalidKey(token) => {
                write!(f, "Object keys must be strings, got '{}'", token)
            }
            ParseErrorKind::InvalidValue(symbol) => write!(f, "Invalid value '{}'", symbol),
            ParseErrorKind::ExpectedColon => f.write_str("Expected ':' after object key"),
            ParseErrorKind::TrailingComma => f.write_str("Trailing commas are not allowed"),
            ParseErrorKind::TrailingContent => f.write_str("Unexpected trailing content"),
            ParseErrorKind::UnexpectedEnd => f.write_str("Unexpected end of input"),
            ParseErrorKind::InvalidData => f.write_str("Input is not valid UTF-8"),
        }
    }
}

/// A lexer or parser failure, localized in the input.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: SourcePosition,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, position: SourcePosition) -> ParseError {
        ParseError { kind, position }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.position.is_known() {
            write!(f, "{} at {}", self.kind, self.position)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

impl error::Error for ParseError {}

/// An error that can occur during validation or schema compilation.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The offending node: the instance value that failed, or the schema
    /// node for compile-time errors. Its position localizes the error.
    pub instance: Box<JsonValue>,
    /// Type of validation error.
    pub kind: ValidationErrorKind,
    /// Path of the offending node within the validated instance.
    pub instance_path: JsonPointer,
    /// Path of the triggering keyword within the schema.
    pub schema_path: JsonPointer,
}

/// An iterator over validation failures for a single instance.
pub type ErrorIterator = Box<dyn Iterator<Item = ValidationError> + Send + Sync>;

// Empty iterator means no error happened
pub(crate) fn no_error() -> ErrorIterator {
    Box::new(empty())
}
// A wrapper for one error
pub(crate) fn error(instance: ValidationError) -> ErrorIterator {
    Box::new(once(instance))
}

/// Kinds of errors that may happen during validation
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub enum ValidationErrorKind {
    /// The input array contains more items than the `items` array allows.
    AdditionalItems { limit: usize },
    /// The input value is not valid under any of the given schemas.
    AnyOf,
    /// The input value doesn't match the expected constant.
    Constant { expected: JsonValue },
    /// The input array doesn't contain items conforming to the specified schema.
    Contains,
    /// The input value doesn't match any of the specified options.
    Enum { options: JsonValue },
    /// Value is too large.
    ExclusiveMaximum { limit: f64 },
    /// Value is too small.
    ExclusiveMinimum { limit: f64 },
    /// Everything is invalid for the `false` schema.
    FalseSchema,
    /// Byte input that is not valid UTF-8.
    InvalidData,
    /// The input could not be parsed as JSON.
    JsonParse { error: ParseError },
    /// A reference that cannot be resolved.
    InvalidReference { reference: String },
    /// A `pattern`/`patternProperties` value that is not a valid regex.
    InvalidRegex { pattern: String },
    /// Too many items in an array.
    MaxItems { limit: u64 },
    /// Value is too large.
    Maximum { limit: f64 },
    /// String is too long.
    MaxLength { limit: u64 },
    /// Too many properties in an object.
    MaxProperties { limit: u64 },
    /// Too few items in an array.
    MinItems { limit: u64 },
    /// Value is too small.
    Minimum { limit: f64 },
    /// String is too short.
    MinLength { limit: u64 },
    /// Not enough properties in an object.
    MinProperties { limit: u64 },
    /// Some number is not a multiple of another number.
    MultipleOf { multiple_of: f64 },
    /// The negated schema failed validation.
    Not,
    /// The given value is valid under more than one of the given schemas.
    OneOfMultipleValid,
    /// The given value is not valid under any of the given schemas.
    OneOfNotValid,
    /// The input doesn't match the pattern.
    Pattern { pattern: String },
    /// A required property is missing.
    Required { property: String },
    /// A remote document could not be fetched.
    Fetch { url: String, reason: String },
    /// The schema document itself is malformed.
    Schema,
    /// The input value doesn't match one or multiple required types.
    Type { kind: TypeKind },
    /// The input array has non-unique elements.
    UniqueItems,
    /// A reference uses a scheme the engine cannot load.
    UnknownReferenceScheme { scheme: String },
    /// Unexpected error. This usually represents a bug in the validation.
    Unexpected { validator_representation: String },
}

#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub enum TypeKind {
    Single(PrimitiveType),
    Multiple(PrimitiveTypesBitMap),
}

/// Shortcuts for creation of specific error kinds.
impl ValidationError {
    fn new(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
        kind: ValidationErrorKind,
    ) -> ValidationError {
        ValidationError {
            instance: Box::new(instance.clone()),
            kind,
            instance_path,
            schema_path,
        }
    }

    /// The source position of the offending node.
    #[must_use]
    pub fn position(&self) -> &SourcePosition {
        &self.instance.position
    }

    pub(crate) fn additional_items(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
        limit: usize,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::AdditionalItems { limit },
        )
    }

    pub(crate) fn any_of(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::AnyOf,
        )
    }

    pub(crate) fn constant(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
        expected: &JsonValue,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::Constant {
                expected: expected.clone(),
            },
        )
    }

    pub(crate) fn contains(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::Contains,
        )
    }

    pub(crate) fn enumeration(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
        options: &JsonValue,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::Enum {
                options: options.clone(),
            },
        )
    }

    pub(crate) fn exclusive_maximum(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
        limit: f64,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::ExclusiveMaximum { limit },
        )
    }

    pub(crate) fn exclusive_minimum(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
        limit: f64,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::ExclusiveMinimum { limit },
        )
    }

    pub(crate) fn false_schema(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::FalseSchema,
        )
    }

    pub(crate) fn invalid_data() -> ValidationError {
        ValidationError {
            instance: Box::new(JsonValue::synthetic(Value::Null)),
            kind: ValidationErrorKind::InvalidData,
            instance_path: JsonPointer::default(),
            schema_path: JsonPointer::default(),
        }
    }

    pub(crate) fn json_parse(error: ParseError) -> ValidationError {
        ValidationError {
            instance: Box::new(JsonValue::new(Value::Null, error.position.clone())),
            kind: ValidationErrorKind::JsonParse { error },
            instance_path: JsonPointer::default(),
            schema_path: JsonPointer::default(),
        }
    }

    pub(crate) fn invalid_reference(
        reference: String,
        position: SourcePosition,
    ) -> ValidationError {
        ValidationError {
            instance: Box::new(JsonValue::new(Value::String(reference.clone()), position)),
            kind: ValidationErrorKind::InvalidReference { reference },
            instance_path: JsonPointer::default(),
            schema_path: JsonPointer::default(),
        }
    }

    pub(crate) fn invalid_regex(
        schema_path: JsonPointer,
        node: &JsonValue,
        pattern: String,
    ) -> ValidationError {
        Self::new(
            schema_path,
            JsonPointer::default(),
            node,
            ValidationErrorKind::InvalidRegex { pattern },
        )
    }

    pub(crate) fn max_items(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
        limit: u64,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::MaxItems { limit },
        )
    }

    pub(crate) fn maximum(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
        limit: f64,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::Maximum { limit },
        )
    }

    pub(crate) fn max_length(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
        limit: u64,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::MaxLength { limit },
        )
    }

    pub(crate) fn max_properties(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
        limit: u64,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::MaxProperties { limit },
        )
    }

    pub(crate) fn min_items(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
        limit: u64,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::MinItems { limit },
        )
    }

    pub(crate) fn minimum(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
        limit: f64,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::Minimum { limit },
        )
    }

    pub(crate) fn min_length(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
        limit: u64,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::MinLength { limit },
        )
    }

    pub(crate) fn min_properties(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
        limit: u64,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::MinProperties { limit },
        )
    }

    pub(crate) fn multiple_of(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
        multiple_of: f64,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::MultipleOf { multiple_of },
        )
    }

    pub(crate) fn not(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
    ) -> ValidationError {
        Self::new(schema_path, instance_path, instance, ValidationErrorKind::Not)
    }

    pub(crate) fn one_of_multiple_valid(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::OneOfMultipleValid,
        )
    }

    pub(crate) fn one_of_not_valid(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::OneOfNotValid,
        )
    }

    pub(crate) fn pattern(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
        pattern: String,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::Pattern { pattern },
        )
    }

    pub(crate) fn required(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
        property: String,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::Required { property },
        )
    }

    pub(crate) fn fetch(url: String, reason: String, position: SourcePosition) -> ValidationError {
        ValidationError {
            instance: Box::new(JsonValue::new(Value::String(url.clone()), position)),
            kind: ValidationErrorKind::Fetch { url, reason },
            instance_path: JsonPointer::default(),
            schema_path: JsonPointer::default(),
        }
    }

    pub(crate) fn schema(node: &JsonValue) -> ValidationError {
        Self::new(
            JsonPointer::default(),
            JsonPointer::default(),
            node,
            ValidationErrorKind::Schema,
        )
    }

    pub(crate) fn single_type_error(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
        type_name: PrimitiveType,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::Type {
                kind: TypeKind::Single(type_name),
            },
        )
    }

    pub(crate) fn multiple_type_error(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
        types: PrimitiveTypesBitMap,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::Type {
                kind: TypeKind::Multiple(types),
            },
        )
    }

    pub(crate) fn unique_items(
        schema_path: JsonPointer,
        instance_path: JsonPointer,
        instance: &JsonValue,
    ) -> ValidationError {
        Self::new(
            schema_path,
            instance_path,
            instance,
            ValidationErrorKind::UniqueItems,
        )
    }

    pub(crate) fn unknown_reference_scheme(
        scheme: String,
        reference: String,
        position: SourcePosition,
    ) -> ValidationError {
        ValidationError {
            instance: Box::new(JsonValue::new(Value::String(reference), position)),
            kind: ValidationErrorKind::UnknownReferenceScheme { scheme },
            instance_path: JsonPointer::default(),
            schema_path: JsonPointer::default(),
        }
    }

    pub(crate) fn unexpected(
        instance: &JsonValue,
        validator_representation: &str,
    ) -> ValidationError {
        Self::new(
            JsonPointer::default(),
            JsonPointer::default(),
            instance,
            ValidationErrorKind::Unexpected {
                validator_representation: validator_representation.to_owned(),
            },
        )
    }
}

impl error::Error for ValidationError {}

impl fmt::Display for ValidationError {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValidationErrorKind::AdditionalItems { limit } => write!(
                f,
                "Additional items are not allowed ({} items at most)",
                limit
            ),
            ValidationErrorKind::AnyOf | ValidationErrorKind::OneOfNotValid => write!(
                f,
                "{} is not valid under any of the given schemas",
                self.instance
            ),
            ValidationErrorKind::Constant { expected } => write!(f, "{} was expected", expected),
            ValidationErrorKind::Contains => write!(
                f,
                "None of the items in {} are valid under the given schema",
                self.instance
            ),
            ValidationErrorKind::Enum { options } => {
                write!(f, "{} is not one of {}", self.instance, options)
            }
            ValidationErrorKind::ExclusiveMaximum { limit } => {
                write!(f, "{} must be less than {}", self.instance, limit)
            }
            ValidationErrorKind::ExclusiveMinimum { limit } => {
                write!(f, "{} must be greater than {}", self.instance, limit)
            }
            ValidationErrorKind::FalseSchema => {
                write!(f, "False schema does not allow {}", self.instance)
            }
            ValidationErrorKind::InvalidData => f.write_str("Input is not valid UTF-8"),
            ValidationErrorKind::JsonParse { error } => write!(f, "{}", error),
            ValidationErrorKind::InvalidReference { reference } => {
                write!(f, "Unresolvable reference: {}", reference)
            }
            ValidationErrorKind::InvalidRegex { pattern } => {
                write!(f, "\"{}\" is not a valid regular expression", pattern)
            }
            ValidationErrorKind::MaxItems { limit } => {
                write!(f, "{} has more than {} items", self.instance, limit)
            }
            ValidationErrorKind::Maximum { limit } => write!(
                f,
                "{} must be less than or equal to {}",
                self.instance, limit
            ),
            ValidationErrorKind::MaxLength { limit } => {
                write!(f, "{} is longer than {} characters", self.instance, limit)
            }
            ValidationErrorKind::MaxProperties { limit } => {
                write!(f, "{} has more than {} properties", self.instance, limit)
            }
            ValidationErrorKind::MinItems { limit } => {
                write!(f, "{} has less than {} items", self.instance, limit)
            }
            ValidationErrorKind::Minimum { limit } => write!(
                f,
                "{} must be greater than or equal to {}",
                self.instance, limit
            ),
            ValidationErrorKind::MinLength { limit } => {
                write!(f, "{} is shorter than {} characters", self.instance, limit)
            }
            ValidationErrorKind::MinProperties { limit } => {
                write!(f, "{} has less than {} properties", self.instance, limit)
            }
            ValidationErrorKind::MultipleOf { multiple_of } => {
                write!(f, "{} is not a multiple of {}", self.instance, multiple_of)
            }
            ValidationErrorKind::Not => write!(
                f,
                "{} must not be valid under the given schema",
                self.instance
            ),
            ValidationErrorKind::OneOfMultipleValid => write!(
                f,
                "{} is valid under more than one of the given schemas",
                self.instance
            ),
            ValidationErrorKind::Pattern { pattern } => {
                write!(f, "{} does not match \"{}\"", self.instance, pattern)
            }
            ValidationErrorKind::Required { property } => {
                write!(f, "\"{}\" is a required property", property)
            }
            ValidationErrorKind::Fetch { url, reason } => {
                write!(f, "Failed to load \"{}\": {}", url, reason)
            }
            ValidationErrorKind::Schema => f.write_str("Invalid schema"),
            ValidationErrorKind::Type { kind } => match kind {
                TypeKind::Single(type_name) => {
                    write!(f, "{} is not of type \"{}\"", self.instance, type_name)
                }
                TypeKind::Multiple(types) => {
                    write!(f, "{} is not of types ", self.instance)?;
                    let mut first = true;
                    for type_name in *types {
                        if first {
                            first = false;
                        } else {
                            f.write_str(", ")?;
                        }
                        write!(f, "\"{}\"", type_name)?;
                    }
                    Ok(())
                }
            },
            ValidationErrorKind::UniqueItems => {
                write!(f, "{} has non-unique elements", self.instance)
            }
            ValidationErrorKind::UnknownReferenceScheme { scheme } => {
                write!(f, "Unknown scheme: {}", scheme)
            }
            ValidationErrorKind::Unexpected {
                validator_representation,
            } => write!(
                f,
                "Unexpected validation failure in {}",
                validator_representation
            ),
        }
    }
}

/// An ordered collection of validation failures.
///
/// Compilation returns every problem it can find in one pass; validation
/// returns every failing keyword across the instance.
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub(crate) fn new(errors: Vec<ValidationError>) -> ValidationErrors {
        ValidationErrors { errors }
    }

    pub(crate) fn single(error: ValidationError) -> ValidationErrors {
        ValidationErrors {
            errors: vec![error],
        }
    }

    pub(crate) fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub(crate) fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The failures, in the order they were discovered.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Render each failure as a `(message, position)` pair.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, SourcePosition)> {
        self.errors
            .iter()
            .map(|error| (error.to_string(), error.position().clone()))
            .collect()
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, error) in self.errors.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            if error.position().is_known() {
                write!(f, "{}, at {}", error, error.position())?;
            } else {
                write!(f, "{}", error)?;
            }
        }
        Ok(())
    }
}

impl error::Error for ValidationErrors {}

impl From<ParseError> for ValidationErrors {
    fn from(error: ParseError) -> Self {
        ValidationErrors::single(ValidationError::json_parse(error))
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        ValidationErrors::single(error)
    }
}
