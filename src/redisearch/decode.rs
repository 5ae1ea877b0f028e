//! Native reply decoding / 原生响应解码
//!
//! `FT.SEARCH ... DIALECT 3` answers with a flat array:
//! `[total, key1, [field, value, ...], key2, [...], ...]`. Each hit's
//! field list holds the marker `$` followed by the JSON encoded document.

use serde_json::Value;

use super::connection::Reply;
use crate::error::{AdapterError, Result};
use crate::schema::Document;

/// Key marking the whole-document payload / 整个文档的标记键
const ROOT_MARKER: &str = "$";

/// Decoded search reply / 解码后的搜索响应
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReply {
    pub total: u64,
    pub hits: Vec<Document>,
}

/// Decode an `FT.SEARCH` reply / 解码搜索响应
pub fn decode_search_reply(reply: &Reply) -> Result<SearchReply> {
    let Reply::Array(items) = reply else {
        return Err(AdapterError::Decode(format!(
            "FT.SEARCH returned a non-array reply: {:?}",
            reply
        )));
    };

    let total = items
        .first()
        .and_then(Reply::as_int)
        .ok_or_else(|| AdapterError::Decode("FT.SEARCH reply has no total count".to_string()))?;

    let mut hits = Vec::new();
    for item in items.iter().skip(1) {
        let Reply::Array(values) = item else {
            continue;
        };

        let mut previous: Option<&str> = None;
        for value in values {
            if previous == Some(ROOT_MARKER) {
                if let Some(payload) = value.as_str() {
                    match decode_payload(payload)? {
                        Some(document) => hits.push(document),
                        None => tracing::warn!("Skipping empty search hit payload"),
                    }
                }
            }
            previous = value.as_str();
        }
    }

    Ok(SearchReply {
        total: total.max(0) as u64,
        hits,
    })
}

/// Decode a `JSON.GET` reply, `None` when the key does not exist / 解码单文档响应
pub fn decode_get_reply(reply: &Reply) -> Result<Option<Document>> {
    match reply {
        Reply::Nil => Ok(None),
        other => {
            let payload = other.as_str().ok_or_else(|| {
                AdapterError::Decode(format!("JSON.GET returned an unexpected reply: {:?}", other))
            })?;
            decode_payload(payload)
        }
    }
}

/// JSON payload -> document; path queries wrap the document in an array / 解析JSON文档
fn decode_payload(payload: &str) -> Result<Option<Document>> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| AdapterError::Decode(format!("invalid JSON document: {}", e)))?;

    let value = match value {
        Value::Array(mut items) => {
            if items.is_empty() {
                return Ok(None);
            }
            items.swap_remove(0)
        }
        other => other,
    };

    match value {
        Value::Object(document) => Ok(Some(document)),
        Value::Null => Ok(None),
        other => Err(AdapterError::Decode(format!(
            "stored value is not a JSON object: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bulk(s: &str) -> Reply {
        Reply::Bulk(s.to_string())
    }

    #[test]
    fn test_decode_search_reply() {
        let reply = Reply::Array(vec![
            Reply::Int(5),
            bulk("news:1"),
            Reply::Array(vec![bulk("$"), bulk(r#"[{"id":"1","title":"One"}]"#)]),
            bulk("news:2"),
            Reply::Array(vec![
                bulk("title"),
                bulk("Two"),
                bulk("$"),
                bulk(r#"[{"id":"2","title":"Two"}]"#),
            ]),
        ]);

        let decoded = decode_search_reply(&reply).unwrap();
        assert_eq!(decoded.total, 5);
        assert_eq!(decoded.hits.len(), 2);
        assert_eq!(Value::Object(decoded.hits[0].clone()), json!({"id": "1", "title": "One"}));
        assert_eq!(Value::Object(decoded.hits[1].clone()), json!({"id": "2", "title": "Two"}));
    }

    #[test]
    fn test_decode_search_reply_without_hits() {
        let decoded = decode_search_reply(&Reply::Array(vec![Reply::Int(0)])).unwrap();
        assert_eq!(decoded, SearchReply { total: 0, hits: vec![] });

        assert!(decode_search_reply(&Reply::Ok).is_err());
        assert!(decode_search_reply(&Reply::Array(vec![])).is_err());
    }

    #[test]
    fn test_decode_invalid_payload() {
        let reply = Reply::Array(vec![
            Reply::Int(1),
            bulk("news:1"),
            Reply::Array(vec![bulk("$"), bulk("{not json")]),
        ]);
        assert!(matches!(decode_search_reply(&reply), Err(AdapterError::Decode(_))));
    }

    #[test]
    fn test_decode_get_reply() {
        assert_eq!(decode_get_reply(&Reply::Nil).unwrap(), None);

        let document = decode_get_reply(&bulk(r#"{"id":"1","rating":2.5}"#)).unwrap().unwrap();
        assert_eq!(Value::Object(document), json!({"id": "1", "rating": 2.5}));

        assert!(decode_get_reply(&bulk("42")).is_err());
        assert!(decode_get_reply(&Reply::Int(1)).is_err());
    }
}
