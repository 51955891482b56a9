use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Keyset pagination cursor for the message list.
///
/// Encodes the `(created_at, id)` of the last item on the previous page;
/// the next page continues strictly below it. The encoding is opaque to
/// clients but stable across restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageCursor {
    pub created_at: DateTime<Utc>,
    pub id: Uuid,
}

impl MessageCursor {
    pub fn encode(&self) -> String {
        format!("{}.{}", self.created_at.timestamp_micros(), self.id.simple())
    }

    /// Decode a client-supplied cursor. Malformed input yields `None`;
    /// the caller treats that as an absent cursor rather than an error.
    pub fn decode(raw: &str) -> Option<Self> {
        let (micros_part, id_part) = raw.split_once('.')?;
        let micros: i64 = micros_part.parse().ok()?;
        let created_at = DateTime::from_timestamp_micros(micros)?;
        let id = Uuid::parse_str(id_part).ok()?;

        Some(Self { created_at, id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_cursor_round_trip() {
        let cursor = MessageCursor {
            created_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap(),
            id: Uuid::new_v4(),
        };

        let decoded = MessageCursor::decode(&cursor.encode()).unwrap();
        assert_eq!(decoded, cursor);
    }

    #[test]
    fn test_malformed_cursor_is_none() {
        assert!(MessageCursor::decode("").is_none());
        assert!(MessageCursor::decode("not-a-cursor").is_none());
        assert!(MessageCursor::decode("12345.not-a-uuid").is_none());
        assert!(MessageCursor::decode("abc.00000000000000000000000000000000").is_none());
    }
}
