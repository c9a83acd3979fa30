use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::{NfcCard, PinCode};

/// A temporary visitor with a bounded access window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visitor {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub access_policy_ids: Vec<String>,
    pub nfc_cards: Vec<NfcCard>,
    pub pin_codes: Vec<PinCode>,
    /// The sponsoring user, when the visit was created on someone's behalf.
    pub sponsor_user_id: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Visitor {
    /// The visitor's full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether the access window is open right now.
    pub fn is_valid(&self) -> bool {
        let now = Utc::now();
        self.is_active && self.start_date <= now && now <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn visitor(start: DateTime<Utc>, end: DateTime<Utc>, is_active: bool) -> Visitor {
        Visitor {
            id: "v1".into(),
            first_name: "Jo".into(),
            last_name: "Walker".into(),
            start_date: start,
            end_date: end,
            email: None,
            phone: None,
            access_policy_ids: Vec::new(),
            nfc_cards: Vec::new(),
            pin_codes: Vec::new(),
            sponsor_user_id: None,
            notes: None,
            is_active,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn validity_requires_an_open_window_and_active_status() {
        let now = Utc::now();

        let current = visitor(now - Duration::hours(1), now + Duration::hours(1), true);
        assert!(current.is_valid());

        let expired = visitor(now - Duration::hours(2), now - Duration::hours(1), true);
        assert!(!expired.is_valid());

        let upcoming = visitor(now + Duration::hours(1), now + Duration::hours(2), true);
        assert!(!upcoming.is_valid());

        let inactive = visitor(now - Duration::hours(1), now + Duration::hours(1), false);
        assert!(!inactive.is_valid());
    }
}
