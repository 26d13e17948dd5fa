//! Tokenizer for the position-preserving JSON parser.
//!
//! The input is scanned by a fixed table of matchers, tried in order for
//! every token start. Each produced token records the position of its
//! first scalar.
use crate::{
    error::{ParseError, ParseErrorKind},
    stream::StringStream,
    value::SourcePosition,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Colon,
    Integer(i64),
    Float(f64),
    String(String),
    /// A bare identifier such as `true`, `false` or `null`. Anything else
    /// is rejected by the parser, not here.
    Symbol(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) position: SourcePosition,
}

type Matcher = fn(&mut StringStream) -> Option<Result<TokenKind, ParseError>>;

// Tried in order for every token; the first matcher that recognizes the
// current scalar wins.
const MATCHERS: [Matcher; 9] = [
    match_left_brace,
    match_right_brace,
    match_left_bracket,
    match_right_bracket,
    match_comma,
    match_colon,
    match_number,
    match_string,
    match_symbol,
];

pub(crate) fn tokenize(source: &str, allow_comments: bool) -> Result<Vec<Token>, ParseError> {
    let mut stream = StringStream::new(source);
    let mut tokens = Vec::new();
    'outer: loop {
        stream.eat_whitespace();
        if allow_comments && stream.current() == Some(';') {
            while !matches!(stream.current(), None | Some('\n')) {
                stream.advance();
            }
            continue;
        }
        if stream.is_at_end() {
            return Ok(tokens);
        }
        let position = stream.position();
        for matcher in MATCHERS {
            if let Some(result) = matcher(&mut stream) {
                tokens.push(Token {
                    kind: result?,
                    position,
                });
                continue 'outer;
            }
        }
        let character = stream.current().expect("not at end");
        return Err(ParseError::new(
            ParseErrorKind::UnexpectedCharacter(character),
            position,
        ));
    }
}

macro_rules! single_char_matcher {
    ($name:ident, $char:literal, $kind:expr) => {
        fn $name(stream: &mut StringStream) -> Option<Result<TokenKind, ParseError>> {
            if stream.current() == Some($char) {
                stream.advance();
                Some(Ok($kind))
            } else {
                None
            }
        }
    };
}

single_char_matcher!(match_left_brace, '{', TokenKind::LeftBrace);
single_char_matcher!(match_right_brace, '}', TokenKind::RightBrace);
single_char_matcher!(match_left_bracket, '[', TokenKind::LeftBracket);
single_char_matcher!(match_right_bracket, ']', TokenKind::RightBracket);
single_char_matcher!(match_comma, ',', TokenKind::Comma);
single_char_matcher!(match_colon, ':', TokenKind::Colon);

fn match_number(stream: &mut StringStream) -> Option<Result<TokenKind, ParseError>> {
    match stream.current() {
        Some(ch) if ch == '-' || ch.is_ascii_digit() => {}
        _ => return None,
    }
    let position = stream.position();
    let mut lexeme = String::new();
    if stream.current() == Some('-') {
        lexeme.push('-');
        stream.advance();
    }
    let mut is_float = false;
    while let Some(ch) = stream.current() {
        if ch.is_ascii_digit() || ch == '.' {
            is_float |= ch == '.';
            lexeme.push(ch);
            stream.advance();
        } else {
            break;
        }
    }
    // Exponent notation is accepted on top of the digits-and-dot core and
    // always produces a float.
    if matches!(stream.current(), Some('e' | 'E')) {
        is_float = true;
        lexeme.push(stream.advance().expect("not at end"));
        if matches!(stream.current(), Some('+' | '-')) {
            lexeme.push(stream.advance().expect("not at end"));
        }
        while matches!(stream.current(), Some(ch) if ch.is_ascii_digit()) {
            lexeme.push(stream.advance().expect("not at end"));
        }
    }
    let kind = if is_float {
        match lexeme.parse::<f64>() {
            Ok(value) => TokenKind::Float(value),
            Err(_) => {
                return Some(Err(ParseError::new(
                    ParseErrorKind::MalformedNumber(lexeme),
                    position,
                )))
            }
        }
    } else {
        match lexeme.parse::<i64>() {
            Ok(value) => TokenKind::Integer(value),
            // Out of i64 range; keep the value as a float.
            Err(_) => match lexeme.parse::<f64>() {
                Ok(value) => TokenKind::Float(value),
                Err(_) => {
                    return Some(Err(ParseError::new(
                        ParseErrorKind::MalformedNumber(lexeme),
                        position,
                    )))
                }
            },
        }
    };
    Some(Ok(kind))
}

fn match_string(stream: &mut StringStream) -> Option<Result<TokenKind, ParseError>> {
    if stream.current() != Some('"') {
        return None;
    }
    let start = stream.position();
    stream.advance();
    let mut contents = String::new();
    loop {
        match stream.current() {
            None => {
                return Some(Err(ParseError::new(
                    ParseErrorKind::UnterminatedString,
                    start,
                )))
            }
            Some('"') => {
                stream.advance();
                return Some(Ok(TokenKind::String(contents)));
            }
            Some('\\') => {
                let escape_position = stream.position();
                stream.advance();
                match read_escape(stream, escape_position) {
                    Ok(ch) => contents.push(ch),
                    Err(error) => return Some(Err(error)),
                }
            }
            Some(ch) => {
                contents.push(ch);
                stream.advance();
            }
        }
    }
}

fn read_escape(stream: &mut StringStream, position: SourcePosition) -> Result<char, ParseError> {
    let designator = stream
        .advance()
        .ok_or_else(|| ParseError::new(ParseErrorKind::UnterminatedString, position.clone()))?;
    match designator {
        '"' => Ok('"'),
        '\\' => Ok('\\'),
        '/' => Ok('/'),
        'b' => Ok('\u{8}'),
        'f' => Ok('\u{c}'),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        't' => Ok('\t'),
        'x' => {
            let byte = read_hex(stream, 2, &position)?;
            char::from_u32(byte).ok_or_else(|| {
                ParseError::new(ParseErrorKind::InvalidEscape, position.clone())
            })
        }
        'u' => {
            let unit = read_hex(stream, 4, &position)?;
            if (0xD800..=0xDBFF).contains(&unit) {
                // A high surrogate must be immediately followed by a low
                // one; together they form a supplementary-plane scalar.
                if stream.current() == Some('\\') && stream.peek_next() == Some('u') {
                    stream.advance();
                    stream.advance();
                    let low = read_hex(stream, 4, &position)?;
                    if (0xDC00..=0xDFFF).contains(&low) {
                        let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                        return char::from_u32(combined).ok_or_else(|| {
                            ParseError::new(ParseErrorKind::LoneSurrogate(unit), position.clone())
                        });
                    }
                }
                Err(ParseError::new(
                    ParseErrorKind::LoneSurrogate(unit),
                    position,
                ))
            } else if (0xDC00..=0xDFFF).contains(&unit) {
                Err(ParseError::new(
                    ParseErrorKind::LoneSurrogate(unit),
                    position,
                ))
            } else {
                char::from_u32(unit)
                    .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidEscape, position.clone()))
            }
        }
        other => Err(ParseError::new(
            ParseErrorKind::UnknownEscape(other),
            position,
        )),
    }
}

fn read_hex(
    stream: &mut StringStream,
    digits: usize,
    position: &SourcePosition,
) -> Result<u32, ParseError> {
    let mut value = 0;
    for _ in 0..digits {
        let digit = stream
            .advance()
            .and_then(|ch| ch.to_digit(16))
            .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidEscape, position.clone()))?;
        value = value * 16 + digit;
    }
    Ok(value)
}

fn is_symbol_char(ch: char) -> bool {
    if matches!(ch, '{' | '}' | '[' | ']' | ',' | ':' | '"') {
        return false;
    }
    ch.is_alphanumeric() || ch == '_' || ch.is_ascii_punctuation()
}

fn match_symbol(stream: &mut StringStream) -> Option<Result<TokenKind, ParseError>> {
    if !matches!(stream.current(), Some(ch) if is_symbol_char(ch)) {
        return None;
    }
    let mut lexeme = String::new();
    while matches!(stream.current(), Some(ch) if is_symbol_char(ch)) {
        lexeme.push(stream.advance().expect("not at end"));
    }
    Some(Ok(TokenKind::Symbol(lexeme)))
}

#[cfg(test)]
mod tests {
    use super::{tokenize, TokenKind};
    use crate::error::ParseErrorKind;
    use test_case::test_case;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source, false)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn structural_tokens() {
        assert_eq!(
            kinds("{}[],:"),
            vec![
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::Comma,
                TokenKind::Colon,
            ]
        );
    }

    #[test_case("0", TokenKind::Integer(0))]
    #[test_case("-42", TokenKind::Integer(-42))]
    #[test_case("3.25", TokenKind::Float(3.25))]
    #[test_case("-0.5", TokenKind::Float(-0.5))]
    #[test_case("1e2", TokenKind::Float(100.0))]
    #[test_case("1.5e-3", TokenKind::Float(0.0015))]
    #[test_case("100000000000000000000", TokenKind::Float(1e20); "i64 overflow becomes float")]
    fn numbers(source: &str, expected: TokenKind) {
        assert_eq!(kinds(source), vec![expected]);
    }

    #[test_case(r#""plain""#, "plain")]
    #[test_case(r#""a\"b""#, "a\"b")]
    #[test_case(r#""line\nbreak""#, "line\nbreak")]
    #[test_case(r#""tab\there""#, "tab\there")]
    #[test_case(r#""\\ and \/""#, "\\ and /")]
    #[test_case(r#""\x41\x42""#, "AB")]
    #[test_case(r#""\u0041""#, "A"; "basic plane escape")]
    #[test_case(r#""\uD83D\uDE00""#, "\u{1F600}"; "surrogate pair combined")]
    fn strings(source: &str, expected: &str) {
        assert_eq!(kinds(source), vec![TokenKind::String(expected.to_owned())]);
    }

    #[test]
    fn symbols() {
        assert_eq!(
            kinds("true false null"),
            vec![
                TokenKind::Symbol("true".to_owned()),
                TokenKind::Symbol("false".to_owned()),
                TokenKind::Symbol("null".to_owned()),
            ]
        );
    }

    #[test_case(r#""\q""#; "unknown escape")]
    #[test_case(r#""\uD800""#; "lone high surrogate")]
    #[test_case(r#""\uDC00""#; "lone low surrogate")]
    #[test_case(r#""\uD800A""#; "high surrogate without low")]
    #[test_case(r#""\uZZZZ""#; "bad hex digits")]
    #[test_case(r#""open"#; "unterminated string")]
    #[test_case("-"; "bare minus")]
    #[test_case("1.2.3"; "double dot")]
    fn lexer_errors(source: &str) {
        assert!(tokenize(source, false).is_err());
    }

    #[test]
    fn comments_rejected_by_default() {
        let error = tokenize("; note\n1", false).unwrap_err();
        assert!(matches!(
            error.kind,
            ParseErrorKind::UnexpectedCharacter(';')
        ));
    }

    #[test]
    fn comments_tolerated_when_enabled() {
        assert_eq!(kinds_with_comments("; note\n1 ; trailing"), vec![TokenKind::Integer(1)]);
    }

    fn kinds_with_comments(source: &str) -> Vec<TokenKind> {
        tokenize(source, true)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn token_positions_point_at_token_start() {
        let tokens = tokenize("{\n  \"a\": 10\n}", false).unwrap();
        let positions: Vec<_> = tokens
            .iter()
            .map(|token| (token.position.line, token.position.column))
            .collect();
        assert_eq!(positions, vec![(0, 0), (1, 2), (1, 5), (1, 7), (2, 0)]);
    }
}
