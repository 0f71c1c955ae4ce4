//! SharePayload JSON codec
//!
//! Wire form (v1):
//! ```text
//! {"v":1,"note":{"title":"..","content":"..","bgColor":"..","textColor":"..","updatedAt":1700000000000}}
//! ```
//!
//! Reads are forward compatible: unknown fields are ignored. Required fields
//! (`v`, `note.title`, `note.content`, `note.updatedAt`) are checked strictly;
//! an optional field of the wrong type is dropped, not rejected.
//! A new schema gets a new `v` and its own arm in [`validate`].

use noteshare_core::{ShareError, ShareResult, SharePayload, SharedNote};
use serde_json::{Map, Value};

/// Encode a payload as UTF-8 JSON.
pub fn serialize(payload: &SharePayload) -> ShareResult<Vec<u8>> {
    serde_json::to_vec(payload).map_err(|e| ShareError::Serialization(format!("payload: {e}")))
}

/// Parse and validate payload bytes. Any failure is a `SchemaMismatch`.
pub fn deserialize(bytes: &[u8]) -> ShareResult<SharePayload> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| ShareError::SchemaMismatch(format!("not JSON: {e}")))?;
    validate(&value)
}

/// Check the shape of an already-parsed JSON value.
pub fn validate(value: &Value) -> ShareResult<SharePayload> {
    let obj = value
        .as_object()
        .ok_or_else(|| mismatch("payload is not an object"))?;

    match obj.get("v") {
        Some(v) if v.as_f64() == Some(f64::from(SharePayload::VERSION)) => validate_v1(obj),
        Some(other) => Err(mismatch(format!("unsupported payload version {other}"))),
        None => Err(mismatch("missing payload version")),
    }
}

fn validate_v1(obj: &Map<String, Value>) -> ShareResult<SharePayload> {
    let note = obj
        .get("note")
        .and_then(Value::as_object)
        .ok_or_else(|| mismatch("note is not an object"))?;

    require(note, "title", Value::is_string, "a string")?;
    require(note, "content", Value::is_string, "a string")?;
    require(note, "updatedAt", Value::is_number, "a number")?;

    let text = |field: &str| {
        note.get(field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned()
    };

    Ok(SharePayload::new(SharedNote {
        title: text("title"),
        content: text("content"),
        bg_color: optional_str(note, "bgColor"),
        text_color: optional_str(note, "textColor"),
        id: optional_str(note, "id"),
        tags: optional_tags(note),
        updated_at: match note.get("updatedAt") {
            Some(Value::Number(n)) => n.clone(),
            _ => return Err(mismatch("note.updatedAt must be a number")),
        },
    }))
}

/// Optional fields of the wrong type read as absent.
fn optional_str(note: &Map<String, Value>, field: &str) -> Option<String> {
    note.get(field).and_then(Value::as_str).map(str::to_owned)
}

fn optional_tags(note: &Map<String, Value>) -> Option<Vec<String>> {
    note.get("tags")?
        .as_array()?
        .iter()
        .map(|tag| tag.as_str().map(str::to_owned))
        .collect()
}

fn require(
    note: &Map<String, Value>,
    field: &str,
    check: fn(&Value) -> bool,
    expected: &str,
) -> ShareResult<()> {
    match note.get(field) {
        Some(v) if check(v) => Ok(()),
        Some(_) => Err(mismatch(format!("note.{field} must be {expected}"))),
        None => Err(mismatch(format!("note.{field} is missing"))),
    }
}

fn mismatch(msg: impl Into<String>) -> ShareError {
    ShareError::SchemaMismatch(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn sample() -> SharePayload {
        let mut note = SharedNote::new("Hello", "World", 1_700_000_000_000);
        note.bg_color = Some("#FFF8C5".into());
        note.text_color = Some("#222222".into());
        SharePayload::new(note)
    }

    fn assert_mismatch(value: Value) {
        assert!(
            matches!(validate(&value), Err(ShareError::SchemaMismatch(_))),
            "{value} must be rejected"
        );
    }

    #[test]
    fn test_roundtrip() {
        let payload = sample();
        let bytes = serialize(&payload).unwrap();
        assert_eq!(deserialize(&bytes).unwrap(), payload);
    }

    #[test]
    fn test_empty_strings_are_valid() {
        let payload = SharePayload::new(SharedNote::new("", "", 0));
        let bytes = serialize(&payload).unwrap();
        assert_eq!(deserialize(&bytes).unwrap(), payload);
    }

    #[test]
    fn test_all_optional_fields() {
        let value = json!({
            "v": 1,
            "note": {
                "id": "abc",
                "title": "t",
                "content": "c",
                "bgColor": "#fff",
                "textColor": "#000",
                "tags": ["work", "todo"],
                "updatedAt": 1
            }
        });
        let payload = validate(&value).unwrap();
        assert_eq!(payload.note.id.as_deref(), Some("abc"));
        assert_eq!(payload.note.tags, Some(vec!["work".into(), "todo".into()]));
    }

    #[test]
    fn test_unknown_fields_tolerated() {
        let value = json!({
            "v": 1,
            "extra": true,
            "note": {"title": "t", "content": "c", "updatedAt": 5, "pinned": true}
        });
        assert_eq!(validate(&value).unwrap().note.title, "t");
    }

    #[test]
    fn test_fractional_timestamp_preserved() {
        let bytes = br#"{"v":1,"note":{"title":"t","content":"c","updatedAt":1700000000000.5}}"#;
        let payload = deserialize(bytes).unwrap();
        assert_eq!(payload.note.updated_at.as_f64(), Some(1_700_000_000_000.5));
    }

    #[test]
    fn test_wrong_version_rejected() {
        assert_mismatch(json!({"v": 2, "note": {"title": "t", "content": "c", "updatedAt": 1}}));
        assert_mismatch(json!({"v": "1", "note": {"title": "t", "content": "c", "updatedAt": 1}}));
        assert_mismatch(json!({"note": {"title": "t", "content": "c", "updatedAt": 1}}));
    }

    #[test]
    fn test_required_fields_checked() {
        assert_mismatch(json!({"v": 1}));
        assert_mismatch(json!({"v": 1, "note": null}));
        assert_mismatch(json!({"v": 1, "note": "text"}));
        assert_mismatch(json!({"v": 1, "note": {"content": "c", "updatedAt": 1}}));
        assert_mismatch(json!({"v": 1, "note": {"title": 3, "content": "c", "updatedAt": 1}}));
        assert_mismatch(json!({"v": 1, "note": {"title": "t", "updatedAt": 1}}));
        assert_mismatch(json!({"v": 1, "note": {"title": "t", "content": "c"}}));
        assert_mismatch(json!({"v": 1, "note": {"title": "t", "content": "c", "updatedAt": "1"}}));
    }

    #[test]
    fn test_mistyped_optional_fields_read_as_absent() {
        let value = json!({
            "v": 1,
            "note": {
                "title": "t",
                "content": "c",
                "updatedAt": 1,
                "tags": "work",
                "bgColor": 5,
                "textColor": ["#000"],
                "id": 42
            }
        });
        let note = validate(&value).unwrap().note;
        assert_eq!(note.title, "t");
        assert_eq!(note.tags, None);
        assert_eq!(note.bg_color, None);
        assert_eq!(note.text_color, None);
        assert_eq!(note.id, None);
    }

    #[test]
    fn test_tags_with_non_string_entry_dropped() {
        let value = json!({
            "v": 1,
            "note": {"title": "t", "content": "c", "updatedAt": 1, "tags": ["ok", 3]}
        });
        assert_eq!(validate(&value).unwrap().note.tags, None);
    }

    #[test]
    fn test_null_optional_field_reads_as_absent() {
        let value = json!({
            "v": 1,
            "note": {"title": "t", "content": "c", "updatedAt": 1, "bgColor": null}
        });
        assert_eq!(validate(&value).unwrap().note.bg_color, None);
    }

    #[test]
    fn test_non_object_and_non_json() {
        assert_mismatch(json!([1, 2]));
        assert_mismatch(Value::Null);
        assert!(matches!(deserialize(b"{not json"), Err(ShareError::SchemaMismatch(_))));
        assert!(matches!(deserialize(&[0xff, 0xfe]), Err(ShareError::SchemaMismatch(_))));
    }

    proptest! {
        #[test]
        fn roundtrip_arbitrary_notes(
            title in ".{0,40}",
            content in ".{0,400}",
            updated_at in any::<i64>(),
            bg in proptest::option::of("#[0-9A-F]{6}"),
        ) {
            let mut note = SharedNote::new(title, content, updated_at);
            note.bg_color = bg;
            let payload = SharePayload::new(note);
            let bytes = serialize(&payload).unwrap();
            prop_assert_eq!(deserialize(&bytes).unwrap(), payload);
        }
    }
}
