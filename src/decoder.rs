use log::warn;
use serde_json::{Map, Value};
use std::collections::HashMap;

pub type Attributes = HashMap<String, String>;

/// Shape of a decoded campaign cookie payload.
#[derive(Debug, Clone, PartialEq)]
pub enum CookieShape {
    Object(Map<String, Value>),
    /// Single object wrapped in an array, as the tracking script emits it.
    WrappedObject(Map<String, Value>),
    /// Valid JSON with nothing usable in it.
    Unusable,
    Malformed(String),
}

impl CookieShape {
    pub fn into_attributes(self) -> Attributes {
        match self {
            CookieShape::Object(map) | CookieShape::WrappedObject(map) => {
                map.into_iter().map(|(k, v)| (k, render_value(v))).collect()
            }
            CookieShape::Unusable | CookieShape::Malformed(_) => Attributes::new(),
        }
    }
}

/// Percent-decodes the cookie (`+` stays literal) and sorts the JSON into a [`CookieShape`].
pub fn classify(encoded: &str) -> CookieShape {
    let bytes = urlencoding::decode_binary(encoded.as_bytes());
    let text = String::from_utf8_lossy(&bytes);
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => CookieShape::Object(map),
        Ok(Value::Array(items)) => match items.into_iter().next() {
            Some(Value::Object(map)) => CookieShape::WrappedObject(map),
            _ => CookieShape::Unusable,
        },
        Ok(_) => CookieShape::Unusable,
        Err(e) => CookieShape::Malformed(e.to_string()),
    }
}

/// Decodes a campaign cookie into its attributes. Any failure yields an empty map.
pub fn decode(encoded: &str) -> Attributes {
    let shape = classify(encoded);
    if let CookieShape::Malformed(reason) = &shape {
        warn!("Failed to decode campaign cookie JSON: {}", reason);
    }
    shape.into_attributes()
}

fn render_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
