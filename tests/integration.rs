use spanned_jsonschema::{is_valid, DocumentFetcher, JsonSchema};
use std::sync::Arc;
use test_case::test_case;

#[test_case(r#"{"type": "integer", "minimum": 0, "maximum": 10}"#, "5", true)]
#[test_case(r#"{"type": "integer", "minimum": 0, "maximum": 10}"#, "11", false)]
#[test_case(r#"{"type": "integer", "minimum": 0, "maximum": 10}"#, "\"5\"", false)]
#[test_case(r#"{"type": "array", "items": {"type": "string"}, "uniqueItems": true}"#, r#"["a", "b", "c"]"#, true)]
#[test_case(r#"{"type": "array", "items": {"type": "string"}, "uniqueItems": true}"#, r#"["a", "b", "a"]"#, false)]
#[test_case("true", "null", true)]
#[test_case("true", r#"{"anything": [1]}"#, true)]
#[test_case("false", "null", false)]
#[test_case(r#"{"oneOf": [{"type": "integer"}, {"type": "number"}]}"#, "1", false; "integer matches both branches")]
#[test_case(r#"{"oneOf": [{"type": "integer"}, {"type": "number"}]}"#, "1.5", true; "float matches only the number branch")]
fn validation_outcomes(schema: &str, instance: &str, expected: bool) {
    assert_eq!(is_valid(schema, instance), expected);
}

#[test]
fn bound_violation_message() {
    let schema = JsonSchema::compile(r#"{"type": "integer", "minimum": 0, "maximum": 10}"#).unwrap();
    let errors = schema.validate("11").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.errors()[0].to_string().contains("less than or equal to 10"));
}

#[test]
fn type_violation_message() {
    let schema = JsonSchema::compile(r#"{"type": "integer", "minimum": 0, "maximum": 10}"#).unwrap();
    let errors = schema.validate("\"5\"").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.errors()[0].to_string().contains("integer"));
}

#[test]
fn object_schema_scenarios() {
    let schema = JsonSchema::compile(
        r#"{
            "properties": {"n": {"type": "number"}},
            "required": ["n"],
            "additionalProperties": false
        }"#,
    )
    .unwrap();
    assert!(schema.validate(r#"{"n": 1}"#).is_ok());

    let missing = schema.validate("{}").unwrap_err();
    assert!(missing.errors()[0].to_string().contains("required"));

    let additional = schema.validate(r#"{"n": 1, "x": 2}"#).unwrap_err();
    assert_eq!(additional.len(), 1);

    let wrong_type = schema.validate(r#"{"n": "one"}"#).unwrap_err();
    assert!(wrong_type.errors()[0].to_string().contains("number"));
}

#[test]
fn definitions_reference_scenario() {
    let schema = JsonSchema::compile(
        r##"{
            "definitions": {"pos": {"type": "integer", "minimum": 1}},
            "$ref": "#/definitions/pos"
        }"##,
    )
    .unwrap();
    assert!(schema.validate("3").is_ok());
    assert!(schema.validate("0").is_err());
    assert!(schema.validate("\"3\"").is_err());
}

#[test]
fn error_positions_point_into_the_instance() {
    let schema =
        JsonSchema::compile(r#"{"type": "object", "properties": {"a": {"type": "integer"}}}"#)
            .unwrap();
    let errors = schema.validate("{\n  \"a\": \"x\"\n}").unwrap_err();
    let position = errors.errors()[0].position();
    assert_eq!((position.line, position.column), (1, 7));
}

#[test]
fn error_pairs_carry_messages_and_positions() {
    let schema = JsonSchema::compile(r#"{"items": {"type": "integer"}}"#).unwrap();
    let errors = schema.validate("[1, \"x\", 3.5]").unwrap_err();
    let pairs = errors.to_pairs();
    assert_eq!(pairs.len(), 2);
    assert!(pairs[0].0.contains("integer"));
    assert_eq!((pairs[0].1.line, pairs[0].1.column), (0, 4));
    assert_eq!((pairs[1].1.line, pairs[1].1.column), (0, 9));
}

#[test]
fn compilation_is_deterministic() {
    let source = r##"{
        "type": "object",
        "properties": {
            "a": {"$ref": "#/definitions/num"},
            "b": {"allOf": [{"minimum": 0}, {"maximum": 10}]}
        },
        "definitions": {"num": {"type": "number"}}
    }"##;
    let first = JsonSchema::compile(source).unwrap();
    let second = JsonSchema::compile(source).unwrap();
    for instance in [
        r#"{"a": 1, "b": 5}"#,
        r#"{"a": "x"}"#,
        r#"{"b": 11}"#,
        "null",
    ] {
        assert_eq!(first.is_valid(instance), second.is_valid(instance));
        let first_errors = first
            .validate(instance)
            .err()
            .map(|errors| errors.to_pairs());
        let second_errors = second
            .validate(instance)
            .err()
            .map(|errors| errors.to_pairs());
        assert_eq!(first_errors, second_errors);
    }
}

#[test]
fn meta_schema_accepts_itself() {
    let schema = JsonSchema::compile(include_str!("../meta_schemas/draft7.json")).unwrap();
    assert!(schema
        .validate(include_str!("../meta_schemas/draft7.json"))
        .is_ok());
}

#[test]
fn reference_indirection_preserves_outcomes() {
    let inline = JsonSchema::compile(r#"{"items": {"type": "integer", "minimum": 1}}"#).unwrap();
    let indirect = JsonSchema::compile(
        r##"{
            "items": {"$ref": "#/definitions/x"},
            "definitions": {"x": {"type": "integer", "minimum": 1}}
        }"##,
    )
    .unwrap();
    for instance in ["[1, 2]", "[0]", r#"["a"]"#, "[]", "7", "{}"] {
        assert_eq!(inline.is_valid(instance), indirect.is_valid(instance));
    }
}

#[test]
fn invalid_schema_documents() {
    assert!(JsonSchema::compile("42").is_err());
    assert!(JsonSchema::compile("\"not a schema\"").is_err());
    assert!(JsonSchema::compile("[]").is_err());
    assert!(JsonSchema::compile("{not json").is_err());
}

#[test]
fn meta_validation_rejects_bad_keyword_values() {
    // `minimum` must be a number per the meta-schema.
    let errors = JsonSchema::compile(r#"{"minimum": "zero"}"#).unwrap_err();
    assert!(!errors.is_empty());
    // With schema validation off, the keyword compiler still rejects it.
    let errors = JsonSchema::options()
        .without_schema_validation()
        .compile(r#"{"minimum": "zero"}"#)
        .unwrap_err();
    assert!(!errors.is_empty());
}

#[test]
fn bytes_entry_points() {
    let schema = JsonSchema::compile_bytes(br#"{"type": "integer"}"#).unwrap();
    assert!(schema.validate_bytes(b"3").is_ok());
    assert!(schema.validate_bytes(b"3.5").is_err());
    assert!(schema.validate_bytes(&[0xff, 0xfe]).is_err());
    assert!(JsonSchema::compile_bytes(&[0xff, 0xfe]).is_err());
}

#[test]
fn line_comments_are_opt_in() {
    let source = "; schema header\n{\"type\": \"integer\"}";
    assert!(JsonSchema::compile(source).is_err());
    let schema = JsonSchema::options()
        .with_line_comments()
        .compile(source)
        .unwrap();
    assert!(schema.validate("; instance comment\n3").is_ok());
}

#[test]
fn duplicate_keys_last_wins() {
    let schema = JsonSchema::compile(r#"{"minimum": 1, "minimum": 5}"#).unwrap();
    assert!(schema.validate("3").is_err());
    assert!(schema.validate("5").is_ok());
}

struct StubFetcher;

impl DocumentFetcher for StubFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
        match url {
            "http://example.com/item.json" => Ok(
                br#"{"definitions": {"pos": {"type": "integer", "minimum": 1}}}"#.to_vec(),
            ),
            other => Err(format!("unknown document: {}", other).into()),
        }
    }
}

#[test]
fn remote_references_resolve_through_the_fetcher() {
    let schema = JsonSchema::options()
        .with_document_fetcher(Arc::new(StubFetcher))
        .compile(r#"{"$ref": "http://example.com/item.json#/definitions/pos"}"#)
        .unwrap();
    assert!(schema.validate("3").is_ok());
    assert!(schema.validate("0").is_err());
    assert!(schema.validate("\"3\"").is_err());
}

#[test]
fn unreachable_remote_reference_fails_compilation() {
    let errors = JsonSchema::options()
        .with_document_fetcher(Arc::new(StubFetcher))
        .compile(r#"{"$ref": "http://example.com/missing.json"}"#)
        .unwrap_err();
    assert!(errors.errors()[0].to_string().contains("Failed to load"));
}

#[test]
fn unknown_reference_scheme_fails_compilation() {
    let errors = JsonSchema::options()
        .with_document_fetcher(Arc::new(StubFetcher))
        .compile(r#"{"$ref": "ftp://example.com/schema.json"}"#)
        .unwrap_err();
    assert!(errors.errors()[0].to_string().contains("Unknown scheme"));
}

#[test]
fn absolute_id_short_circuits_fetching() {
    // The target carries an absolute `$id`, so no fetch happens even
    // though the reference looks remote.
    let schema = JsonSchema::options()
        .with_document_fetcher(Arc::new(StubFetcher))
        .compile(
            r#"{
                "definitions": {
                    "named": {"$id": "http://example.com/named.json", "type": "string"}
                },
                "$ref": "http://example.com/named.json"
            }"#,
        )
        .unwrap();
    assert!(schema.validate("\"s\"").is_ok());
    assert!(schema.validate("1").is_err());
}

#[test]
fn schema_true_false_from_booleans() {
    assert!(is_valid("true", "3"));
    assert!(!is_valid("false", "3"));
    // Nested boolean schemas behave the same way.
    assert!(is_valid(r#"{"properties": {"a": true}}"#, r#"{"a": 1}"#));
    assert!(!is_valid(r#"{"properties": {"a": false}}"#, r#"{"a": 1}"#));
}

#[test]
fn multi_error_accumulation_across_keywords() {
    let schema = JsonSchema::compile(
        r#"{
            "type": "object",
            "properties": {
                "a": {"type": "integer"},
                "b": {"type": "string"}
            },
            "required": ["c"]
        }"#,
    )
    .unwrap();
    let errors = schema.validate(r#"{"a": "x", "b": 2}"#).unwrap_err();
    assert_eq!(errors.len(), 3);
}

#[test]
fn display_renders_positions() {
    let schema = JsonSchema::compile(r#"{"type": "string"}"#).unwrap();
    let errors = schema.validate("42").unwrap_err();
    let rendered = errors.to_string();
    assert!(rendered.contains("is not of type \"string\""));
    assert!(rendered.contains("line 1, column 1"));
}
