//! Recursive-descent parser turning the token stream into a [`JsonValue`]
//! tree. Every node keeps the position of the token that started it.
use crate::{
    error::{ParseError, ParseErrorKind},
    lexer::{tokenize, Token, TokenKind},
    stream::StringStream,
    value::{JsonValue, Object, SourcePosition, Value},
};

/// Parse a single JSON document from text.
///
/// Exactly one top-level value is accepted; anything after it is a
/// trailing-content error.
pub fn parse(source: &str) -> Result<JsonValue, ParseError> {
    parse_with_comments(source, false)
}

/// Parse a single JSON document from bytes, decoding UTF-8 first.
pub fn parse_bytes(source: &[u8]) -> Result<JsonValue, ParseError> {
    let text = std::str::from_utf8(source)
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidData, SourcePosition::unknown()))?;
    parse(text)
}

pub(crate) fn parse_with_comments(
    source: &str,
    allow_comments: bool,
) -> Result<JsonValue, ParseError> {
    let tokens = tokenize(source, allow_comments)?;
    if tokens.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::UnexpectedEnd,
            StringStream::new(source).position(),
        ));
    }
    let mut parser = Parser { tokens, index: 0 };
    let value = parser.parse_value()?;
    if let Some(extra) = parser.current() {
        return Err(ParseError::new(
            ParseErrorKind::TrailingContent,
            extra.position.clone(),
        ));
    }
    Ok(value)
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn end_position(&self) -> SourcePosition {
        self.tokens
            .last()
            .map(|token| token.position.clone())
            .unwrap_or_else(SourcePosition::unknown)
    }

    fn parse_value(&mut self) -> Result<JsonValue, ParseError> {
        let token = self
            .advance()
            .ok_or_else(|| ParseError::new(ParseErrorKind::UnexpectedEnd, self.end_position()))?;
        let position = token.position.clone();
        match token.kind {
            TokenKind::LeftBrace => self.parse_object(position),
            TokenKind::LeftBracket => self.parse_array(position),
            TokenKind::String(string) => Ok(JsonValue::new(Value::String(string), position)),
            TokenKind::Integer(value) => Ok(JsonValue::new(Value::Integer(value), position)),
            TokenKind::Float(value) => Ok(JsonValue::new(Value::Float(value), position)),
            TokenKind::Symbol(symbol) => match symbol.as_str() {
                "true" => Ok(JsonValue::new(Value::Boolean(true), position)),
                "false" => Ok(JsonValue::new(Value::Boolean(false), position)),
                "null" => Ok(JsonValue::new(Value::Null, position)),
                _ => Err(ParseError::new(
                    ParseErrorKind::InvalidValue(symbol),
                    position,
                )),
            },
            TokenKind::RightBrace
            | TokenKind::RightBracket
            | TokenKind::Comma
            | TokenKind::Colon => Err(ParseError::new(
                ParseErrorKind::UnexpectedToken(render(&token.kind)),
                position,
            )),
        }
    }

    fn parse_object(&mut self, position: SourcePosition) -> Result<JsonValue, ParseError> {
        let mut object = Object::new();
        if matches!(self.current().map(|token| &token.kind), Some(TokenKind::RightBrace)) {
            self.advance();
            return Ok(JsonValue::new(Value::Object(object), position));
        }
        loop {
            let key_token = self.advance().ok_or_else(|| {
                ParseError::new(ParseErrorKind::UnexpectedEnd, self.end_position())
            })?;
            let key = match key_token.kind {
                TokenKind::String(name) => {
                    JsonValue::new(Value::String(name), key_token.position)
                }
                other => {
                    return Err(ParseError::new(
                        ParseErrorKind::InvalidKey(render(&other)),
                        key_token.position,
                    ))
                }
            };
            match self.advance() {
                Some(Token {
                    kind: TokenKind::Colon,
                    ..
                }) => {}
                Some(token) => {
                    return Err(ParseError::new(
                        ParseErrorKind::ExpectedColon,
                        token.position,
                    ))
                }
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedEnd,
                        self.end_position(),
                    ))
                }
            }
            let value = self.parse_value()?;
            // Duplicate keys follow last-wins semantics.
            object.insert(key, value);
            match self.advance() {
                Some(Token {
                    kind: TokenKind::RightBrace,
                    ..
                }) => return Ok(JsonValue::new(Value::Object(object), position)),
                Some(Token {
                    kind: TokenKind::Comma,
                    position: comma_position,
                }) => {
                    if matches!(
                        self.current().map(|token| &token.kind),
                        Some(TokenKind::RightBrace)
                    ) {
                        return Err(ParseError::new(
                            ParseErrorKind::TrailingComma,
                            comma_position,
                        ));
                    }
                }
                Some(token) => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedToken(render(&token.kind)),
                        token.position,
                    ))
                }
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedEnd,
                        self.end_position(),
                    ))
                }
            }
        }
    }

    fn parse_array(&mut self, position: SourcePosition) -> Result<JsonValue, ParseError> {
        let mut items = Vec::new();
        if matches!(
            self.current().map(|token| &token.kind),
            Some(TokenKind::RightBracket)
        ) {
            self.advance();
            return Ok(JsonValue::new(Value::Array(items), position));
        }
        loop {
            items.push(self.parse_value()?);
            match self.advance() {
                Some(Token {
                    kind: TokenKind::RightBracket,
                    ..
                }) => return Ok(JsonValue::new(Value::Array(items), position)),
                Some(Token {
                    kind: TokenKind::Comma,
                    position: comma_position,
                }) => {
                    if matches!(
                        self.current().map(|token| &token.kind),
                        Some(TokenKind::RightBracket)
                    ) {
                        return Err(ParseError::new(
                            ParseErrorKind::TrailingComma,
                            comma_position,
                        ));
                    }
                }
                Some(token) => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedToken(render(&token.kind)),
                        token.position,
                    ))
                }
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedEnd,
                        self.end_position(),
                    ))
                }
            }
        }
    }
}

fn render(kind: &TokenKind) -> String {
    match kind {
        TokenKind::LeftBrace => "{".to_owned(),
        TokenKind::RightBrace => "}".to_owned(),
        TokenKind::LeftBracket => "[".to_owned(),
        TokenKind::RightBracket => "]".to_owned(),
        TokenKind::Comma => ",".to_owned(),
        TokenKind::Colon => ":".to_owned(),
        TokenKind::Integer(value) => value.to_string(),
        TokenKind::Float(value) => value.to_string(),
        TokenKind::String(value) => format!("\"{}\"", value),
        TokenKind::Symbol(value) => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse, parse_bytes, parse_with_comments};
    use crate::error::ParseErrorKind;
    use crate::value::{JsonValue, Value};
    use test_case::test_case;

    #[test]
    fn scalars() {
        assert!(matches!(parse("null").unwrap().value, Value::Null));
        assert_eq!(parse("true").unwrap().as_bool(), Some(true));
        assert_eq!(parse("-7").unwrap().as_i64(), Some(-7));
        assert_eq!(parse("2.5").unwrap().as_f64(), Some(2.5));
        assert_eq!(parse(r#""hi""#).unwrap().as_str(), Some("hi"));
    }

    #[test]
    fn nested_structure() {
        let value = parse(r#"{"items": [1, {"deep": null}], "flag": false}"#).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        let items = object.get("items").unwrap().as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[1].as_object().unwrap().get("deep").unwrap().is_null());
    }

    #[test]
    fn node_positions() {
        let value = parse("{\n  \"a\": [10, 20]\n}").unwrap();
        assert_eq!((value.position.line, value.position.column), (0, 0));
        let object = value.as_object().unwrap();
        let (key, array) = object.get_entry("a").unwrap();
        assert_eq!((key.position.line, key.position.column), (1, 2));
        assert_eq!((array.position.line, array.position.column), (1, 7));
        let items = array.as_array().unwrap();
        assert_eq!((items[0].position.line, items[0].position.column), (1, 8));
        assert_eq!((items[1].position.line, items[1].position.column), (1, 12));
    }

    #[test]
    fn positions_are_monotonic() {
        let value = parse(r#"[1, [2, 3], {"k": 4}]"#).unwrap();
        let items = value.as_array().unwrap();
        let mut columns: Vec<usize> = items.iter().map(|item| item.position.column).collect();
        let sorted = {
            let mut copy = columns.clone();
            copy.sort_unstable();
            copy
        };
        assert_eq!(columns, sorted);
        columns.dedup();
        assert_eq!(columns.len(), items.len());
    }

    #[test_case("[1, 2,]", ParseErrorKind::TrailingComma; "array trailing comma")]
    #[test_case(r#"{"a": 1,}"#, ParseErrorKind::TrailingComma; "object trailing comma")]
    #[test_case("1 2", ParseErrorKind::TrailingContent; "trailing content")]
    #[test_case("", ParseErrorKind::UnexpectedEnd; "empty input")]
    #[test_case("[1", ParseErrorKind::UnexpectedEnd; "unclosed array")]
    #[test_case(r#"{"a" 1}"#, ParseErrorKind::ExpectedColon; "missing colon")]
    fn parser_errors(source: &str, expected: ParseErrorKind) {
        let error = parse(source).unwrap_err();
        assert_eq!(
            std::mem::discriminant(&error.kind),
            std::mem::discriminant(&expected),
            "{:?}",
            error
        );
    }

    #[test]
    fn non_string_key_is_rejected() {
        let error = parse("{1: 2}").unwrap_err();
        assert!(matches!(error.kind, ParseErrorKind::InvalidKey(_)));
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        let error = parse("nil").unwrap_err();
        assert!(matches!(error.kind, ParseErrorKind::InvalidValue(_)));
    }

    #[test]
    fn trailing_comma_error_points_at_the_comma() {
        let error = parse("[1, 2 ,]").unwrap_err();
        assert_eq!((error.position.line, error.position.column), (0, 6));
    }

    #[test]
    fn duplicate_keys_keep_the_last_value() {
        let value = parse(r#"{"k": "first", "k": "second"}"#).unwrap();
        assert_eq!(
            value.as_object().unwrap().get("k").and_then(JsonValue::as_str),
            Some("second")
        );
    }

    #[test]
    fn bytes_entry_point() {
        assert_eq!(parse_bytes(b"42").unwrap().as_i64(), Some(42));
        let error = parse_bytes(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(error.kind, ParseErrorKind::InvalidData));
    }

    #[test]
    fn comments_only_with_flag() {
        assert!(parse("; header\n{}").is_err());
        let value = parse_with_comments("; header\n{} ; footer", true).unwrap();
        assert!(value.as_object().unwrap().is_empty());
    }
}
