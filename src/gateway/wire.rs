//! Page records as the content API sends them.
//!
//! The API uses numeric ids and ISO-8601 timestamps; the rest of the crate
//! uses string ids and epoch milliseconds.

use chrono::DateTime;
use serde::Deserialize;
use tracing::warn;

use super::GatewayError;
use crate::pages::{Page, PageId};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WirePage {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub created_at: String,
    pub updated_at: String,
}

fn epoch_millis(field: &str, value: &str) -> Result<i64, GatewayError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.timestamp_millis())
        .map_err(|err| GatewayError::Malformed(format!("{field} {value:?}: {err}")))
}

impl TryFrom<WirePage> for Page {
    type Error = GatewayError;

    fn try_from(wire: WirePage) -> Result<Self, Self::Error> {
        let created_at = epoch_millis("createdAt", &wire.created_at)?;
        let mut updated_at = epoch_millis("updatedAt", &wire.updated_at)?;
        if updated_at < created_at {
            warn!(id = wire.id, "updatedAt precedes createdAt; clamping");
            updated_at = created_at;
        }
        Ok(Self {
            id: PageId::new(wire.id.to_string()),
            title: wire.title,
            body: wire.body,
            created_at,
            updated_at,
        })
    }
}

/// Decode a single page record.
pub(super) fn decode_page(bytes: &[u8]) -> Result<Page, GatewayError> {
    let wire: WirePage =
        serde_json::from_slice(bytes).map_err(|err| GatewayError::Malformed(err.to_string()))?;
    Page::try_from(wire)
}

/// Decode a list of page records; one bad record rejects the whole list.
pub(super) fn decode_pages(bytes: &[u8]) -> Result<Vec<Page>, GatewayError> {
    let wire: Vec<WirePage> =
        serde_json::from_slice(bytes).map_err(|err| GatewayError::Malformed(err.to_string()))?;
    wire.into_iter().map(Page::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{
        "id": 42,
        "title": "Groceries",
        "body": "eggs, milk, flour",
        "createdAt": "2024-05-01T10:00:00.000Z",
        "updatedAt": "2024-05-01T10:30:00.000Z"
    }"#;

    #[test]
    fn test_decode_converts_id_and_timestamps() {
        let page = decode_page(RECORD.as_bytes()).unwrap();
        assert_eq!(page.id, PageId::new("42"));
        assert_eq!(page.title, "Groceries");
        assert_eq!(page.created_at, 1_714_557_600_000);
        assert_eq!(page.updated_at, 1_714_559_400_000);
    }

    #[test]
    fn test_decode_accepts_offsets() {
        let json = r#"{"id":1,"title":"t","body":"b",
            "createdAt":"2024-05-01T12:00:00+02:00","updatedAt":"2024-05-01T10:00:00Z"}"#;
        let page = decode_page(json.as_bytes()).unwrap();
        assert_eq!(page.created_at, page.updated_at);
    }

    #[test]
    fn test_decode_rejects_bad_timestamp() {
        let json = r#"{"id":1,"title":"t","body":"b",
            "createdAt":"yesterday","updatedAt":"2024-05-01T10:00:00Z"}"#;
        let err = decode_page(json.as_bytes()).unwrap_err();
        assert!(matches!(err, GatewayError::Malformed(msg) if msg.contains("createdAt")));
    }

    #[test]
    fn test_decode_rejects_string_id() {
        let json = r#"{"id":"x","title":"t","body":"b",
            "createdAt":"2024-05-01T10:00:00Z","updatedAt":"2024-05-01T10:00:00Z"}"#;
        assert!(matches!(
            decode_page(json.as_bytes()),
            Err(GatewayError::Malformed(_))
        ));
    }

    #[test]
    fn test_updated_before_created_is_clamped() {
        let json = r#"{"id":7,"title":"t","body":"b",
            "createdAt":"2024-05-02T00:00:00Z","updatedAt":"2024-05-01T00:00:00Z"}"#;
        let page = decode_page(json.as_bytes()).unwrap();
        assert_eq!(page.updated_at, page.created_at);
    }

    #[test]
    fn test_decode_list_keeps_order() {
        let json = format!("[{RECORD}, {}]", RECORD.replace("42", "43"));
        let pages = decode_pages(json.as_bytes()).unwrap();
        let ids: Vec<_> = pages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["42", "43"]);
    }
}
