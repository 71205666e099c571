//! Snapshot fingerprints for change detection
//!
//! A fingerprint is the canonical JSON encoding of a snapshot: object keys
//! are sorted, array order is preserved. Two snapshots with equal
//! fingerprints are structurally equal, so a fingerprint comparison never
//! reports a change as "no change".

use anyhow::{Context, Result};
use serde::Serialize;

/// Opaque, comparable summary of a snapshot. Only useful for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of any serializable snapshot
    pub fn of<S: Serialize + ?Sized>(snapshot: &S) -> Result<Self> {
        // serde_json::Value keeps object keys in a sorted map, which makes
        // the encoding independent of field insertion order.
        let value = serde_json::to_value(snapshot).context("Failed to encode snapshot")?;
        let canonical = serde_json::to_string(&value).context("Failed to encode snapshot")?;
        Ok(Self(canonical))
    }

    /// Length of the canonical encoding in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Whether two snapshots are structurally equal
pub fn snapshots_equal<A, B>(a: &A, b: &B) -> Result<bool>
where
    A: Serialize + ?Sized,
    B: Serialize + ?Sized,
{
    Ok(Fingerprint::of(a)? == Fingerprint::of(b)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Message, MessageId, Origin, Ticket, TicketId, TicketStatus};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn ticket(id: u64, messages: Vec<Message>) -> Ticket {
        Ticket::new(TicketId::new(id), "Lamp", "u1").with_messages(messages)
    }

    fn message(id: u64, text: &str) -> Message {
        Message::builder(MessageId::new(id), Origin::Admin)
            .text(text)
            .sent_at(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
            .build()
    }

    #[test]
    fn test_key_order_is_ignored() {
        let a = json!({"id": 1, "status": "open", "messages": []});
        let b = json!({"messages": [], "status": "open", "id": 1});
        assert!(snapshots_equal(&a, &b).unwrap());

        let a: serde_json::Value =
            serde_json::from_str(r#"{"id":1,"status":"open"}"#).unwrap();
        let b: serde_json::Value =
            serde_json::from_str(r#"{"status":"open","id":1}"#).unwrap();
        assert_eq!(Fingerprint::of(&a).unwrap(), Fingerprint::of(&b).unwrap());
    }

    #[test]
    fn test_array_order_matters() {
        let a = vec![ticket(1, vec![]), ticket(2, vec![])];
        let b = vec![ticket(2, vec![]), ticket(1, vec![])];
        assert!(!snapshots_equal(&a, &b).unwrap());
    }

    #[test]
    fn test_field_changes_detected() {
        let before = vec![ticket(1, vec![message(1, "hi")])];

        let mut new_message = before.clone();
        new_message[0].messages.push(message(2, "anything else?"));
        assert!(!snapshots_equal(&before, &new_message).unwrap());

        let mut closed = before.clone();
        closed[0].status = TicketStatus::Closed;
        assert!(!snapshots_equal(&before, &closed).unwrap());

        let mut deleted = before.clone();
        deleted[0].messages[0].deleted = true;
        assert!(!snapshots_equal(&before, &deleted).unwrap());

        assert!(snapshots_equal(&before, &before.clone()).unwrap());
    }

    #[test]
    fn test_null_and_missing_differ_from_empty() {
        let a = json!({"text": null});
        let b = json!({"text": ""});
        let c = json!({});
        assert!(!snapshots_equal(&a, &b).unwrap());
        assert!(!snapshots_equal(&a, &c).unwrap());
    }

    #[test]
    fn test_unrepresentable_snapshot_is_error() {
        use std::collections::HashMap;
        let mut bad: HashMap<Vec<u8>, u32> = HashMap::new();
        bad.insert(vec![1, 2], 3);
        assert!(Fingerprint::of(&bad).is_err());
    }
}
