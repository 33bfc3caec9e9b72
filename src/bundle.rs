//! Self-contained schema compilation for schemas cut out of a larger document.
//!
//! OpenAPI schemas point at their siblings with document-relative `$ref`s
//! (`#/definitions/Pet`), but each schema is compiled on its own. The
//! [`ReferenceBundle`] copies every internally referenced subtree into one
//! schema resource with a fixed `$id`; before compiling, a target schema's
//! internal refs are rewritten to point into that resource.

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, Retrieve, Uri, Validator};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::ApplicationError;
use crate::path::{LocationPath, PathSegment, get_pointer};
use crate::types::ValidationOptions;

/// `$id` of the bundle holding every internally referenced definition.
pub const REFS_ID: &str = "https://openapi-examples-validator.local/refs";

/// `$id` given to each schema compiled by [`compile_validate`].
pub const SCHEMA_ID: &str = "https://openapi-examples-validator.local/schema";

// ─── Bundle ─────────────────────────────────────────────────────────────────

/// Every `#/...` reference target of a document, stored at its own pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceBundle {
    schema: Value,
}

impl ReferenceBundle {
    /// Walks `document` once, collecting each internal `$ref` target.
    /// References that do not resolve are left out; compiling a schema that
    /// uses one reports the failure.
    pub fn build(document: &Value) -> Self {
        let mut refs = Vec::new();
        collect_internal_refs(document, &mut refs);

        let mut bundle = Value::Object(Map::new());
        for reference in refs {
            let Some(target) = get_pointer(document, &reference) else {
                debug!(reference = %reference, "unresolvable internal reference");
                continue;
            };
            let Some(path) = LocationPath::parse_pointer(&reference) else {
                continue;
            };
            insert_at(&mut bundle, &path, target.clone());
        }
        if let Value::Object(map) = &mut bundle {
            map.insert("$id".to_string(), Value::String(REFS_ID.to_string()));
        }
        ReferenceBundle { schema: bundle }
    }

    pub fn as_value(&self) -> &Value {
        &self.schema
    }
}

fn collect_internal_refs(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(r)) = map.get("$ref")
                && r.starts_with('#')
                && !out.contains(r)
            {
                out.push(r.clone());
            }
            for child in map.values() {
                collect_internal_refs(child, out);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_internal_refs(child, out);
            }
        }
        _ => {}
    }
}

fn insert_at(root: &mut Value, path: &LocationPath, value: Value) {
    if path.is_root() {
        *root = value;
        return;
    }
    let mut current = root;
    for seg in path.segments() {
        let key = match seg {
            PathSegment::Name(n) => n.clone(),
            PathSegment::Index(i) => i.to_string(),
        };
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Value::Object(map) = current else {
            return;
        };
        current = map.entry(key).or_insert(Value::Null);
    }
    *current = value;
}

// ─── Validator factory ──────────────────────────────────────────────────────

/// Serves the bundle to the validator without touching the network.
struct BundleRetriever {
    bundle: Value,
}

impl Retrieve for BundleRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str().trim_end_matches('#');
        if uri_str == REFS_ID {
            Ok(self.bundle.clone())
        } else {
            Err(format!("schema '{uri_str}' is not part of the document").into())
        }
    }
}

/// Builds fresh validator engines with the document's bundle registered.
#[derive(Clone, Debug)]
pub struct ValidatorFactory {
    bundle: ReferenceBundle,
    options: ValidationOptions,
}

impl ValidatorFactory {
    pub fn new(document: &Value, options: &ValidationOptions) -> Self {
        let mut bundle = ReferenceBundle::build(document);
        apply_strictness(&mut bundle.schema, options);
        ValidatorFactory {
            bundle,
            options: options.clone(),
        }
    }

    pub fn bundle(&self) -> &ReferenceBundle {
        &self.bundle
    }

    /// A new engine; nothing is shared between engines.
    pub fn engine(&self) -> jsonschema::ValidationOptions {
        let mut engine = jsonschema::options();
        engine.with_draft(Draft::Draft7);
        engine.with_retriever(BundleRetriever {
            bundle: self.bundle.schema.clone(),
        });
        for format in &self.options.ignore_formats {
            engine.with_format(format.clone(), |_: &str| true);
        }
        engine
    }
}

/// Compiles `schema` against the bundle of `factory`.
///
/// The schema is cloned, tagged with [`SCHEMA_ID`] and its internal refs are
/// redirected to [`REFS_ID`]; the caller's value is untouched. Returns the
/// prepared schema alongside the validator so violations can be described.
pub fn compile_validate(
    factory: &ValidatorFactory,
    schema: &Value,
) -> Result<(Validator, Value), ApplicationError> {
    let mut prepared = schema.clone();
    rewrite_internal_refs(&mut prepared);
    apply_strictness(&mut prepared, &factory.options);
    if let Value::Object(map) = &mut prepared {
        map.insert("$id".to_string(), Value::String(SCHEMA_ID.to_string()));
    }

    let validator = factory
        .engine()
        .build(&prepared)
        .map_err(|e| ApplicationError::other(format!("Schema could not be compiled: {e}")))?;
    Ok((validator, prepared))
}

fn rewrite_internal_refs(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(r)) = map.get_mut("$ref")
                && r.starts_with('#')
            {
                *r = format!("{REFS_ID}{r}");
            }
            for child in map.values_mut() {
                rewrite_internal_refs(child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(rewrite_internal_refs),
        _ => {}
    }
}

// ─── Strictness ─────────────────────────────────────────────────────────────

fn apply_strictness(value: &mut Value, options: &ValidationOptions) {
    if !options.no_additional_properties && !options.all_properties_required {
        return;
    }
    tighten(value, options);
}

fn tighten(value: &mut Value, options: &ValidationOptions) {
    match value {
        Value::Object(map) => {
            let is_object_schema = map.get("type").and_then(Value::as_str) == Some("object")
                || map.get("properties").is_some_and(Value::is_object);
            if is_object_schema {
                if options.no_additional_properties && !map.contains_key("additionalProperties") {
                    map.insert("additionalProperties".to_string(), Value::Bool(false));
                }
                if options.all_properties_required {
                    require_all_properties(map);
                }
            }
            for (key, child) in map.iter_mut() {
                match (key.as_str(), child) {
                    // instance data, not schemas
                    ("enum" | "const" | "default" | "example" | "examples", _) => {}
                    // name -> schema maps; the map itself is never a schema
                    (
                        "properties" | "patternProperties" | "definitions" | "$defs" | "schemas",
                        Value::Object(named),
                    ) => named.values_mut().for_each(|v| tighten(v, options)),
                    (_, child) => tighten(child, options),
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|v| tighten(v, options)),
        _ => {}
    }
}

fn require_all_properties(map: &mut Map<String, Value>) {
    let Some(Value::Object(properties)) = map.get("properties") else {
        return;
    };
    let mut required: Vec<Value> = map
        .get("required")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    for name in properties.keys() {
        let name = Value::String(name.clone());
        if !required.contains(&name) {
            required.push(name);
        }
    }
    if !required.is_empty() {
        map.insert("required".to_string(), Value::Array(required));
    }
}

// ─── Violations ─────────────────────────────────────────────────────────────

/// Runs `validator` against `example` and describes every violation.
///
/// `prepared` is the schema returned by [`compile_validate`]; `params` hold
/// the value of the failing keyword, looked up through `$ref`s into `bundle`.
pub fn violations(
    validator: &Validator,
    prepared: &Value,
    bundle: &ReferenceBundle,
    example: &Value,
) -> Vec<ApplicationError> {
    validator
        .iter_errors(example)
        .map(|e| {
            let schema_path = e.schema_path.to_string();
            let keyword = keyword_of(&schema_path);
            let params = match &e.kind {
                ValidationErrorKind::Required { property, .. } => {
                    json!({ "missingProperty": property })
                }
                ValidationErrorKind::AdditionalProperties { unexpected, .. } => {
                    json!({ "additionalProperty": unexpected })
                }
                _ => {
                    let mut params = Map::new();
                    if let Some(v) = keyword_value(prepared, bundle.as_value(), &schema_path) {
                        params.insert(keyword.clone(), v.clone());
                    }
                    Value::Object(params)
                }
            };
            ApplicationError::validation(
                e.to_string(),
                data_path_of(&e.instance_path.to_string(), example),
                schema_path,
                keyword,
                params,
            )
        })
        .collect()
}

/// The keyword that failed: the last schema path segment that is not an
/// array index.
fn keyword_of(schema_path: &str) -> String {
    schema_path
        .rsplit('/')
        .find(|s| !s.is_empty() && s.parse::<usize>().is_err())
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .unwrap_or_default()
}

/// Follows a validator schema path through `schema`, jumping into the
/// bundle at every `$ref` segment.
fn keyword_value<'a>(
    schema: &'a Value,
    bundle: &'a Value,
    schema_path: &str,
) -> Option<&'a Value> {
    let path = LocationPath::parse_pointer(schema_path)?;
    let mut current = schema;
    for seg in path.segments() {
        let name = match seg {
            PathSegment::Name(n) => n.as_str(),
            PathSegment::Index(_) => return None,
        };
        if name == "$ref"
            && let Some(Value::String(reference)) = current.get("$ref")
        {
            let pointer = reference.strip_prefix(REFS_ID).unwrap_or(reference);
            if !pointer.starts_with('#') {
                return None;
            }
            current = get_pointer(bundle, pointer)?;
            continue;
        }
        current = match current {
            Value::Object(map) => map.get(name)?,
            Value::Array(items) => items.get(name.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Converts an instance pointer (`/versions/0/id`) to the dotted form
/// (`.versions[0].id`). Array indices are bracketed; object keys that are
/// not identifiers are quoted (`.responses['200']`).
fn data_path_of(pointer: &str, instance: &Value) -> String {
    let Some(path) = LocationPath::parse_pointer(pointer) else {
        return pointer.to_string();
    };
    let mut out = String::new();
    let mut current = Some(instance);
    for seg in path.segments() {
        let name = match seg {
            PathSegment::Name(n) => n.clone(),
            PathSegment::Index(i) => i.to_string(),
        };
        match current {
            Some(Value::Array(items)) => {
                out.push('[');
                out.push_str(&name);
                out.push(']');
                current = name.parse::<usize>().ok().and_then(|i| items.get(i));
            }
            _ => {
                if is_identifier(&name) {
                    out.push('.');
                    out.push_str(&name);
                } else {
                    out.push_str("['");
                    out.push_str(&name.replace('\\', "\\\\").replace('\'', "\\'"));
                    out.push_str("']");
                }
                current = current.and_then(|v| v.get(&name));
            }
        }
    }
    out
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
