use crate::value::JsonValue;

/// Structural equality as used by `enum`, `const` and `uniqueItems`.
///
/// Equality is variant-sensitive: the integer `1` and the float `1.0` are
/// different values here, and source positions never matter.
#[inline]
pub(crate) fn equal(left: &JsonValue, right: &JsonValue) -> bool {
    left == right
}

#[cfg(test)]
mod tests {
    use super::equal;
    use crate::parser::parse;
    use test_case::test_case;

    #[test_case("1", "1")]
    #[test_case("1.0", "1.0")]
    #[test_case(r#"[1, "a"]"#, r#"[1, "a"]"#)]
    #[test_case(r#"{"a": 1, "b": 2}"#, r#"{"b": 2, "a": 1}"#)]
    fn are_equal(left: &str, right: &str) {
        assert!(equal(&parse(left).unwrap(), &parse(right).unwrap()))
    }

    #[test_case("1", "1.0"; "numeric equality is variant sensitive")]
    #[test_case("[2]", "[2.0]")]
    #[test_case(r#"{"a": 1}"#, r#"{"a": 1.0, "b": 2}"#)]
    #[test_case("null", "false")]
    fn are_not_equal(left: &str, right: &str) {
        assert!(!equal(&parse(left).unwrap(), &parse(right).unwrap()))
    }
}
