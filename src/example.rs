//! Example extraction, following example values that are references.

use serde_json::Value;

use crate::error::ApplicationError;
use crate::path::{LocationPath, flatten, get, get_pointer, query_values};

/// Example at `location`, or `None` if there is no location or nothing
/// lives there.
///
/// A string starting with `#` is a reference to a named example: it is
/// replaced by the `value` field of the node it points at. A string that
/// does not point at such a node is returned as is.
pub fn resolve_example(location: Option<&LocationPath>, document: &Value) -> Option<Value> {
    let location = location?;
    get(document, location).map(|v| dereference(v, document))
}

/// Example(s) matched by a path expression. Several matches collapse into
/// one array value.
pub fn resolve_example_at(
    expression: &str,
    document: &Value,
) -> Result<Option<Value>, ApplicationError> {
    if expression.is_empty() {
        return Ok(None);
    }
    let values = query_values(document, expression)?
        .into_iter()
        .map(|v| dereference(v, document))
        .collect();
    Ok(flatten(values))
}

fn dereference(value: &Value, document: &Value) -> Value {
    if let Value::String(s) = value
        && s.starts_with('#')
        && let Some(target) = get_pointer(document, s).and_then(|t| t.get("value"))
    {
        return target.clone();
    }
    value.clone()
}
