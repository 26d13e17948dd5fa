use crate::{
    compilation::JsonSchema,
    error::{ValidationError, ValidationErrors},
    parser::parse_with_comments,
    resolver::DocumentFetcher,
    value::JsonValue,
};
use once_cell::sync::Lazy;
use std::{fmt, sync::Arc};

const EXPECT_MESSAGE: &str = "Valid meta-schema!";

// The bundled Draft 7 meta-schema, compiled once per process. Compiling it
// with schema validation suppressed is what breaks the otherwise infinite
// "validate the meta-schema against itself first" recursion.
static DRAFT7: Lazy<JsonSchema> = Lazy::new(|| {
    let mut options = CompilationOptions::default();
    options.without_schema_validation();
    options
        .compile(include_str!("../../meta_schemas/draft7.json"))
        .expect(EXPECT_MESSAGE)
});

pub(crate) fn meta_schema() -> &'static JsonSchema {
    &DRAFT7
}

/// Full configuration to guide `JsonSchema` compilation.
///
/// ```rust
/// # use spanned_jsonschema::JsonSchema;
/// let schema = JsonSchema::options()
///     .without_schema_validation()
///     .compile(r#"{"maxLength": 5}"#)
///     .expect("A valid schema");
/// ```
#[derive(Clone)]
pub struct CompilationOptions {
    validate_schema: bool,
    allow_comments: bool,
    fetcher: Option<Arc<dyn DocumentFetcher>>,
}

impl Default for CompilationOptions {
    fn default() -> Self {
        CompilationOptions {
            validate_schema: true,
            allow_comments: false,
            fetcher: None,
        }
    }
}

impl fmt::Debug for CompilationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompilationOptions")
            .field("validate_schema", &self.validate_schema)
            .field("allow_comments", &self.allow_comments)
            .field("fetcher", &self.fetcher.as_ref().map(|_| "custom"))
            .finish()
    }
}

impl CompilationOptions {
    /// Compile `source` into a `JsonSchema` using the currently defined options.
    pub fn compile(&self, source: &str) -> Result<JsonSchema, ValidationErrors> {
        let document =
            parse_with_comments(source, self.allow_comments).map_err(ValidationErrors::from)?;
        self.compile_value(document)
    }

    /// Compile a schema from raw bytes, decoding UTF-8 first.
    pub fn compile_bytes(&self, source: &[u8]) -> Result<JsonSchema, ValidationErrors> {
        let text = std::str::from_utf8(source)
            .map_err(|_| ValidationErrors::single(ValidationError::invalid_data()))?;
        self.compile(text)
    }

    /// Compile an already parsed schema document.
    pub fn compile_value(&self, document: JsonValue) -> Result<JsonSchema, ValidationErrors> {
        crate::compilation::compile_root(self, document)
    }

    /// Skip validating the schema document against the bundled Draft 7
    /// meta-schema.
    pub fn without_schema_validation(&mut self) -> &mut Self {
        self.validate_schema = false;
        self
    }

    /// Tolerate `;`-prefixed line comments in schema and instance input.
    ///
    /// This is a compatibility switch for documents produced by tooling
    /// that embeds such comments; standard JSON input never needs it.
    pub fn with_line_comments(&mut self) -> &mut Self {
        self.allow_comments = true;
        self
    }

    /// Load remote `$ref` documents through `fetcher` instead of the
    /// built-in HTTP client.
    pub fn with_document_fetcher(&mut self, fetcher: Arc<dyn DocumentFetcher>) -> &mut Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub(crate) fn validate_schema(&self) -> bool {
        self.validate_schema
    }

    pub(crate) fn allow_comments(&self) -> bool {
        self.allow_comments
    }

    pub(crate) fn fetcher(&self) -> Arc<dyn DocumentFetcher> {
        if let Some(fetcher) = &self.fetcher {
            return Arc::clone(fetcher);
        }
        #[cfg(feature = "reqwest")]
        {
            Arc::new(crate::resolver::HttpFetcher)
        }
        #[cfg(not(feature = "reqwest"))]
        {
            Arc::new(crate::resolver::NoFetcher)
        }
    }
}
