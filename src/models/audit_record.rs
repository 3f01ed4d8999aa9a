use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Display format of `timestamp` on the wire (local clock, minute resolution).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One immutable entry of the activity log.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: i64,
    pub subject: String,
    pub action: String,
    pub actor_role: String,
    pub occurred_at: DateTime<Utc>,
}

/// A record that has been stamped but not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditRecord {
    pub(crate) subject: String,
    pub(crate) action: String,
    pub(crate) actor_role: String,
    pub(crate) occurred_at: DateTime<Utc>,
}

impl NewAuditRecord {
    /// Stamps the record with the current time. Callers never choose `occurred_at`.
    pub fn stamped(subject: &str, action: &str, actor_role: &str) -> Self {
        Self {
            subject: subject.to_string(),
            action: action.to_string(),
            actor_role: actor_role.to_string(),
            occurred_at: Utc::now(),
        }
    }

    #[cfg(test)]
    pub(crate) fn stamped_at(
        subject: &str,
        action: &str,
        actor_role: &str,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            occurred_at,
            ..Self::stamped(subject, action, actor_role)
        }
    }

    pub fn with_id(self, id: i64) -> AuditRecord {
        AuditRecord {
            id,
            subject: self.subject,
            action: self.action,
            actor_role: self.actor_role,
            occurred_at: self.occurred_at,
        }
    }
}

/// Shape served by `GET /api/admin/logs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecordView {
    pub id: i64,
    pub username: String,
    pub action: String,
    pub role: String,
    pub timestamp: String,
}

impl From<AuditRecord> for AuditRecordView {
    fn from(record: AuditRecord) -> Self {
        Self {
            id: record.id,
            timestamp: format_timestamp(record.occurred_at),
            username: record.subject,
            action: record.action,
            role: record.actor_role,
        }
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, TimeZone};

    #[test]
    fn view_renames_fields_for_the_wire() {
        let record = NewAuditRecord::stamped("alice", "User created", "student").with_id(7);
        let view = AuditRecordView::from(record.clone());

        assert_eq!(view.id, 7);
        assert_eq!(view.username, "alice");
        assert_eq!(view.action, "User created");
        assert_eq!(view.role, "student");
        assert_eq!(view.timestamp, format_timestamp(record.occurred_at));
    }

    #[test]
    fn timestamp_has_minute_resolution() {
        let local = NaiveDateTime::parse_from_str("2024-10-25 14:30:59", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        let at = Local
            .from_local_datetime(&local)
            .single()
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(format_timestamp(at), "2024-10-25 14:30");
    }

    #[test]
    fn stamping_uses_the_current_time() {
        let before = Utc::now();
        let record = NewAuditRecord::stamped("", "", "");
        let after = Utc::now();

        assert!(record.occurred_at >= before && record.occurred_at <= after);
    }
}
