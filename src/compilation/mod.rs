//! Schema compilation.
//! The main idea is to compile the input JSON Schema to a validators tree
//! that will contain everything needed to perform such validation in
//! runtime.
pub(crate) mod context;
pub(crate) mod options;

use crate::{
    error::{ValidationError, ValidationErrors},
    keywords,
    parser::parse_with_comments,
    paths::PathChunk,
    resolver::{lookup_value, normalize_reference, PendingReference, RefResolver},
    validator::SchemaNode,
    value::{JsonValue, Value},
};
use context::CompilationContext;
use options::{meta_schema, CompilationOptions};
use std::{fmt, sync::Arc};
use url::Url;

/// A JSON Schema compiled into a validation tree.
///
/// The structure is immutable once compilation finishes and can be shared
/// between threads for parallel validation.
pub struct JsonSchema {
    pub(crate) root: Arc<SchemaNode>,
    pub(crate) resolver: Arc<RefResolver>,
    pub(crate) config: Arc<CompilationOptions>,
    pub(crate) document: Arc<JsonValue>,
}

impl JsonSchema {
    /// Return a default `CompilationOptions` that can configure
    /// `JsonSchema` compilation flow.
    #[must_use]
    pub fn options() -> CompilationOptions {
        CompilationOptions::default()
    }

    /// Compile the input schema into a validation tree.
    ///
    /// The method is equivalent to `JsonSchema::options().compile(source)`.
    pub fn compile(source: &str) -> Result<JsonSchema, ValidationErrors> {
        Self::options().compile(source)
    }

    /// Compile a schema from raw bytes, decoding UTF-8 first.
    pub fn compile_bytes(source: &[u8]) -> Result<JsonSchema, ValidationErrors> {
        Self::options().compile_bytes(source)
    }

    /// Parse `instance_source` and run validation against it, collecting
    /// every failing keyword.
    pub fn validate(&self, instance_source: &str) -> Result<(), ValidationErrors> {
        let instance = parse_with_comments(instance_source, self.config.allow_comments())
            .map_err(ValidationErrors::from)?;
        self.validate_value(&instance)
    }

    /// The bytes flavour of [`JsonSchema::validate`].
    pub fn validate_bytes(&self, instance_source: &[u8]) -> Result<(), ValidationErrors> {
        let text = std::str::from_utf8(instance_source)
            .map_err(|_| ValidationErrors::single(ValidationError::invalid_data()))?;
        self.validate(text)
    }

    /// Run validation against an already parsed instance.
    pub fn validate_value(&self, instance: &JsonValue) -> Result<(), ValidationErrors> {
        let instance_path = crate::paths::InstancePath::new();
        let errors: Vec<ValidationError> =
            self.root.validate(self, instance, &instance_path).collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors::new(errors))
        }
    }

    /// Boolean-only validation; faster than [`JsonSchema::validate`] since
    /// no errors are constructed. Unparsable input is simply invalid.
    #[must_use]
    pub fn is_valid(&self, instance_source: &str) -> bool {
        match parse_with_comments(instance_source, self.config.allow_comments()) {
            Ok(instance) => self.is_valid_value(&instance),
            Err(_) => false,
        }
    }

    /// The parsed-value flavour of [`JsonSchema::is_valid`].
    #[must_use]
    pub fn is_valid_value(&self, instance: &JsonValue) -> bool {
        self.root.is_valid(self, instance)
    }

    /// The parsed schema document this tree was compiled from.
    #[must_use]
    pub fn document(&self) -> &JsonValue {
        &self.document
    }

    /// The schema's `title`, if present.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.annotation("title")
    }

    /// The schema's `description`, if present.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.annotation("description")
    }

    /// The `$schema` the document declares, if any.
    #[must_use]
    pub fn schema_uri(&self) -> Option<&str> {
        self.annotation("$schema")
    }

    /// The root `$id`, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.annotation("$id").or_else(|| self.annotation("id"))
    }

    fn annotation(&self, keyword: &str) -> Option<&str> {
        self.document
            .as_object()
            .and_then(|object| object.get(keyword))
            .and_then(JsonValue::as_str)
    }
}

impl fmt::Debug for JsonSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchema")
            .field("root", &self.root)
            .field("resolver", &self.resolver)
            .finish()
    }
}

pub(crate) fn compile_root(
    options: &CompilationOptions,
    document: JsonValue,
) -> Result<JsonSchema, ValidationErrors> {
    let document = Arc::new(document);
    let config = Arc::new(options.clone());
    let resolver = Arc::new(RefResolver::new());
    let mut errors = ValidationErrors::default();
    {
        let context = CompilationContext::new(&resolver, &config);
        if let Err(compile_errors) = compile_validators(&document, &context) {
            errors.extend(compile_errors);
        }
    }
    // Every queued reference must resolve before the schema is usable;
    // runtime lookups never compile anything.
    resolve_pending(&document, &config, &resolver, &mut errors);
    if config.validate_schema() {
        if let Err(meta_errors) = meta_schema().validate_value(&document) {
            errors.extend(meta_errors);
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }
    let root = resolver
        .get_reference("#")
        .expect("the root registers itself during compilation");
    Ok(JsonSchema {
        root,
        resolver,
        config,
        document,
    })
}

/// Compile one schema location into a node of keyword validators,
/// registering it (and everything below it) in the resolver.
///
/// Errors are accumulated: a failing keyword does not stop its siblings
/// from being compiled and reported.
pub(crate) fn compile_validators(
    schema: &JsonValue,
    context: &CompilationContext,
) -> Result<Arc<SchemaNode>, ValidationErrors> {
    match &schema.value {
        // A bare `true` accepts everything, a bare `false` rejects
        // everything.
        Value::Boolean(true) => {
            let node = Arc::new(SchemaNode::new(Vec::new()));
            context.register(&node);
            Ok(node)
        }
        Value::Boolean(false) => {
            let validator = keywords::boolean::FalseValidator::compile(context.as_pointer());
            let node = Arc::new(SchemaNode::new(vec![validator]));
            context.register(&node);
            Ok(node)
        }
        Value::Object(object) => {
            let mut errors = ValidationErrors::default();
            let mut validators = Vec::with_capacity(object.len());
            let mut reference = None;
            for (key, subschema) in object.iter() {
                let keyword = key.as_str().expect("object keys are strings");
                if keyword == "$ref" {
                    match keywords::ref_::compile(object, subschema, context) {
                        Ok(validator) => reference = Some(validator),
                        Err(keyword_errors) => errors.extend(keyword_errors),
                    }
                    continue;
                }
                if keyword == "definitions" {
                    // Asserts nothing, but each child compiles and becomes
                    // addressable as `#/definitions/<name>`.
                    if let Err(definition_errors) = compile_definitions(subschema, context) {
                        errors.extend(definition_errors);
                    }
                    continue;
                }
                if let Some(compile) = keywords::get_validator(keyword) {
                    match compile(object, subschema, context) {
                        Some(Ok(validator)) => validators.push(validator),
                        Some(Err(keyword_errors)) => errors.extend(keyword_errors),
                        None => {}
                    }
                }
                // Anything else is an annotation or a custom container;
                // locations under it stay addressable through the
                // end-of-compile reference sweep.
            }
            // Draft 7: the presence of `$ref` hides every sibling keyword
            // at runtime, although they were still compiled above.
            let validators = match reference {
                Some(ref_validator) => vec![ref_validator],
                None => validators,
            };
            let node = Arc::new(SchemaNode::new(validators));
            context.register(&node);
            register_id(object, &node, context);
            if errors.is_empty() {
                Ok(node)
            } else {
                Err(errors)
            }
        }
        _ => Err(ValidationError::schema(schema).into()),
    }
}

fn compile_definitions(
    subschema: &JsonValue,
    context: &CompilationContext,
) -> Result<(), ValidationErrors> {
    let object = match subschema.as_object() {
        Some(object) => object,
        None => return Err(ValidationError::schema(subschema).into()),
    };
    let definitions_context = context.with_path("definitions");
    let mut errors = ValidationErrors::default();
    for (key, definition) in object.iter() {
        let name = key.as_str().expect("object keys are strings");
        let definition_context = definitions_context.with_path(name);
        if let Err(definition_errors) = compile_validators(definition, &definition_context) {
            errors.extend(definition_errors);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// Schemas carrying a string `$id` are additionally addressable by that
// anchor or absolute URI, which lets same-document references short-circuit
// the remote fetch.
fn register_id(
    object: &crate::value::Object,
    node: &Arc<SchemaNode>,
    context: &CompilationContext,
) {
    let id = object
        .get("$id")
        .or_else(|| object.get("id"))
        .and_then(JsonValue::as_str);
    if let Some(id) = id {
        if id.starts_with('#') {
            if id.len() > 1 {
                context.resolver.add_reference(id.to_owned(), node);
            }
        } else if let Ok(mut url) = Url::parse(id) {
            if url.fragment() == Some("") {
                url.set_fragment(None);
            }
            context.resolver.add_reference(url.to_string(), node);
        }
    }
}

fn resolve_pending(
    document: &Arc<JsonValue>,
    config: &Arc<CompilationOptions>,
    resolver: &Arc<RefResolver>,
    errors: &mut ValidationErrors,
) {
    // Resolving a reference may compile new subtrees which queue further
    // references; sweep until the queue stays empty.
    loop {
        let pending = resolver.take_pending();
        if pending.is_empty() {
            return;
        }
        for entry in pending {
            if let Err(reference_errors) = resolve_single(&entry, document, config, resolver) {
                errors.extend(reference_errors);
            }
        }
    }
}

fn resolve_single(
    entry: &PendingReference,
    document: &Arc<JsonValue>,
    config: &Arc<CompilationOptions>,
    resolver: &Arc<RefResolver>,
) -> Result<(), ValidationErrors> {
    let normalized = normalize_reference(&entry.reference);
    if normalized.starts_with('#') {
        if resolver.get_reference(&normalized).is_some() {
            return Ok(());
        }
        // The fragment points below an unrecognized member; compile the
        // target on demand so it becomes a registered schema.
        let (target, chunks) = lookup_value(document, &normalized).ok_or_else(|| {
            ValidationErrors::single(ValidationError::invalid_reference(
                entry.reference.clone(),
                entry.position.clone(),
            ))
        })?;
        let context = CompilationContext::new(resolver, config);
        return compile_at_path(target, &chunks, &context);
    }
    // Absolute URIs registered via `$id` resolve without any fetching.
    if resolver.get_reference(&normalized).is_some() {
        return Ok(());
    }
    let (url, fragment) = match normalized.split_once('#') {
        Some((url, fragment)) => (url, fragment),
        None => (normalized.as_str(), ""),
    };
    let remote = match resolver.get_remote(url) {
        Some(remote) => remote,
        None => {
            let remote = compile_remote(url, entry, config)?;
            resolver.cache_remote(url.to_owned(), &remote);
            remote
        }
    };
    ensure_fragment(&remote, &format!("#{}", fragment), entry)
}

fn compile_remote(
    url: &str,
    entry: &PendingReference,
    config: &Arc<CompilationOptions>,
) -> Result<Arc<JsonSchema>, ValidationErrors> {
    let parsed = Url::parse(url).map_err(|_| {
        ValidationErrors::single(ValidationError::invalid_reference(
            entry.reference.clone(),
            entry.position.clone(),
        ))
    })?;
    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ValidationErrors::single(
                ValidationError::unknown_reference_scheme(
                    scheme.to_owned(),
                    entry.reference.clone(),
                    entry.position.clone(),
                ),
            ))
        }
    }
    let bytes = config.fetcher().fetch(url).map_err(|fetch_error| {
        ValidationErrors::single(ValidationError::fetch(
            url.to_owned(),
            fetch_error.to_string(),
            entry.position.clone(),
        ))
    })?;
    let text = String::from_utf8(bytes).map_err(|_| {
        ValidationErrors::single(ValidationError::fetch(
            url.to_owned(),
            "response is not valid UTF-8".to_owned(),
            entry.position.clone(),
        ))
    })?;
    let remote_document =
        parse_with_comments(&text, config.allow_comments()).map_err(ValidationErrors::from)?;
    // Remote documents skip meta-validation; only the user's own schema
    // gets that treatment.
    let mut remote_options = (**config).clone();
    remote_options.without_schema_validation();
    Ok(Arc::new(remote_options.compile_value(remote_document)?))
}

fn ensure_fragment(
    remote: &Arc<JsonSchema>,
    fragment: &str,
    entry: &PendingReference,
) -> Result<(), ValidationErrors> {
    if remote.resolver.get_reference(fragment).is_some() {
        return Ok(());
    }
    let (target, chunks) = lookup_value(&remote.document, fragment).ok_or_else(|| {
        ValidationErrors::single(ValidationError::invalid_reference(
            entry.reference.clone(),
            entry.position.clone(),
        ))
    })?;
    {
        let context = CompilationContext::new(&remote.resolver, &remote.config);
        compile_at_path(target, &chunks, &context)?;
    }
    let mut errors = ValidationErrors::default();
    resolve_pending(&remote.document, &remote.config, &remote.resolver, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// Rebuild the borrow-linked schema path from owned chunks, then compile.
fn compile_at_path(
    target: &JsonValue,
    chunks: &[PathChunk],
    context: &CompilationContext,
) -> Result<(), ValidationErrors> {
    match chunks.split_first() {
        None => compile_validators(target, context).map(|_| ()),
        Some((first, rest)) => {
            let nested = context.with_path(first.clone());
            compile_at_path(target, rest, &nested)
        }
    }
}
