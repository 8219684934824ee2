//! Response decoding and document traversal

use crate::error::{ApiError, ViddlerError};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A decoded API response
///
/// Responses have no fixed schema, so the document wraps the raw JSON tree and
/// offers path lookups that return `None` when a field is missing or has the
/// wrong shape. Known shapes can be decoded into typed structs with
/// [`Document::decode`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document(Value);

impl Document {
    /// Wrap an already parsed JSON value
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Look up a top-level field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Follow a path of object keys (or array indices) from the root
    ///
    /// ```
    /// use viddler_api::Document;
    /// use serde_json::json;
    ///
    /// let document = Document::new(json!({"list_result": {"videos": [{"id": "abc"}]}}));
    /// let id = document.lookup(&["list_result", "videos", "0", "id"]);
    /// assert_eq!(id, Some(&json!("abc")));
    /// assert_eq!(document.lookup(&["list_result", "missing"]), None);
    /// ```
    pub fn lookup(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.0, |node, segment| match node {
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => node.get(*segment),
        })
    }

    /// Follow a path and return the value only if it is a string
    pub fn str_at(&self, path: &[&str]) -> Option<&str> {
        self.lookup(path).and_then(Value::as_str)
    }

    /// Decode the whole document into a typed response
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ViddlerError> {
        T::deserialize(&self.0).map_err(|source| ViddlerError::Decode { source })
    }

    /// Decode the value found at `path` into a typed response
    ///
    /// A missing path decodes as JSON `null`, so `Option<T>` targets yield `None`.
    pub fn decode_at<T: DeserializeOwned>(&self, path: &[&str]) -> Result<T, ViddlerError> {
        T::deserialize(self.lookup(path).unwrap_or(&Value::Null))
            .map_err(|source| ViddlerError::Decode { source })
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Parse a raw response body
///
/// A top-level `error` key turns the document into [`ViddlerError::Api`]; the
/// HTTP status code plays no part in the decision.
pub(crate) fn decode_body(body: &[u8]) -> Result<Document, ViddlerError> {
    let document = Document(
        serde_json::from_slice(body).map_err(|source| ViddlerError::Decode { source })?,
    );

    let Some(error) = document.get("error") else {
        return Ok(document);
    };

    let code = text_field(error, "code");
    let description = error
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();
    let details = text_field(error, "details");

    Err(ApiError {
        code,
        description,
        details,
        document,
    }
    .into())
}

/// Render a scalar field as text; missing or structured values become empty
fn text_field(object: &Value, key: &str) -> String {
    match object.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}
