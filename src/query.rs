//! Query-string construction for query methods.
//!
//! Keys and values are written as-is, without percent-encoding. Payload
//! values containing `&`, `=`, `#` or spaces therefore produce a URL the
//! server may split differently than intended.

use serde_json::{Map, Value};

use crate::transform::is_truthy;

/// Append every payload entry to `url` as `key=value`.
///
/// Falsy values (`null`, `false`, `0`, `""`) are written as an empty value.
///
/// The first separator is `?` unless `url` already carries a query, in which
/// case every appended pair is joined with `&`. Entries keep the payload's
/// insertion order.
pub fn encode(url: &str, payload: &Map<String, Value>) -> String {
    let mut separator = if url.contains('?') { '&' } else { '?' };
    let mut encoded = String::from(url);

    for (key, value) in payload {
        encoded.push(separator);
        encoded.push_str(key);
        encoded.push('=');
        encoded.push_str(&render(value));
        separator = '&';
    }

    encoded
}

fn render(value: &Value) -> String {
    if is_truthy(value) {
        render_item(value)
    } else {
        String::new()
    }
}

// Array items join like JavaScript's `Array::toString`: only null is blank.
fn render_item(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render_item).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_encode_onto_bare_url() {
        assert_eq!(encode("/x", &map(json!({"a": 1, "b": 2}))), "/x?a=1&b=2");
    }

    #[test]
    fn test_encode_onto_existing_query() {
        assert_eq!(
            encode("/x?y=1", &map(json!({"a": 1, "b": 2}))),
            "/x?y=1&a=1&b=2"
        );
    }

    #[test]
    fn test_empty_payload_leaves_url() {
        assert_eq!(encode("/x", &Map::new()), "/x");
    }

    #[test]
    fn test_insertion_order_is_kept() {
        assert_eq!(
            encode("/s", &map(json!({"zeta": "z", "alpha": "a"}))),
            "/s?zeta=z&alpha=a"
        );
    }

    #[test]
    fn test_value_rendering() {
        let payload = map(json!({
            "none": null,
            "text": "nujabes",
            "flag": true,
            "zero": 0,
            "off": false,
            "blank": "",
            "list": ["a", 0, false, null],
            "nested": {"k": "v"}
        }));
        assert_eq!(
            encode("/q", &payload),
            r#"/q?none=&text=nujabes&flag=true&zero=&off=&blank=&list=a,0,false,&nested={"k":"v"}"#
        );
    }

    #[test]
    fn test_values_are_not_escaped() {
        assert_eq!(
            encode("/q", &map(json!({"term": "a b&c=d"}))),
            "/q?term=a b&c=d"
        );
    }
}
