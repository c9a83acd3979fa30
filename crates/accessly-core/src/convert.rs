// ── API-to-domain conversions ──
//
// Maps the controller's raw JSON onto `model` types. The vendor payloads
// are irregular: visitors carry Unix-second timestamps while users carry
// ISO-8601 strings, device names live in `alias`, policy membership hides
// inside a `resources` array. All of that is normalized here and nowhere
// else.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::CoreError;
use crate::model::{
    AccessEvent, AccessPolicy, CredentialType, Device, DeviceType, Door, DoorGroup, HolidayGroup,
    NfcCard, PinCode, Schedule, SystemLog, TouchPass, User, UserRole, Visitor,
};

// ── Helpers ────────────────────────────────────────────────────────

fn required_str(data: &Value, key: &str) -> Result<String, CoreError> {
    data.get(key)
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| CoreError::Payload {
            message: format!("missing required field '{key}'"),
        })
}

fn opt_str(data: &Value, key: &str) -> Option<String> {
    data.get(key).and_then(Value::as_str).map(ToOwned::to_owned)
}

/// Like [`opt_str`], but empty strings collapse to `None` (the controller
/// sends `""` for unset visitor contact fields).
fn opt_nonempty_str(data: &Value, key: &str) -> Option<String> {
    opt_str(data, key).filter(|s| !s.is_empty())
}

fn opt_bool(data: &Value, key: &str, default: bool) -> bool {
    data.get(key).and_then(Value::as_bool).unwrap_or(default)
}

fn str_array(data: &Value, key: &str) -> Vec<String> {
    data.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(ToOwned::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

/// Parse an ISO-8601 datetime field. Unparseable values are dropped.
fn parse_datetime(data: &Value, key: &str) -> Option<DateTime<Utc>> {
    data.get(key)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a Unix-seconds timestamp field (visitor endpoints use epochs).
fn parse_epoch(data: &Value, key: &str) -> Option<DateTime<Utc>> {
    data.get(key)
        .and_then(Value::as_i64)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

/// Collect ids out of the `resources` array for one resource type.
fn resource_ids(data: &Value, resource_type: &str) -> Vec<String> {
    data.get("resources")
        .and_then(Value::as_array)
        .map(|resources| {
            resources
                .iter()
                .filter(|r| r.get("type").and_then(Value::as_str) == Some(resource_type))
                .filter_map(|r| r.get("id").and_then(Value::as_str).map(ToOwned::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

fn parse_each<T>(
    data: &Value,
    key: &str,
    parse: impl Fn(&Value) -> Result<T, CoreError>,
) -> Result<Vec<T>, CoreError> {
    data.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().map(&parse).collect())
        .unwrap_or_else(|| Ok(Vec::new()))
}

// ── Credentials ─────────────────────────────────────────────────────

pub fn parse_nfc_card(data: &Value) -> Result<NfcCard, CoreError> {
    Ok(NfcCard {
        id: required_str(data, "id")?,
        card_number: required_str(data, "card_number")?,
        facility_code: opt_str(data, "facility_code"),
        is_active: opt_bool(data, "is_active", true),
        created_at: parse_datetime(data, "created_at"),
        updated_at: parse_datetime(data, "updated_at"),
    })
}

pub fn parse_pin_code(data: &Value) -> Result<PinCode, CoreError> {
    Ok(PinCode {
        id: required_str(data, "id")?,
        pin: required_str(data, "pin")?,
        is_active: opt_bool(data, "is_active", true),
        created_at: parse_datetime(data, "created_at"),
        updated_at: parse_datetime(data, "updated_at"),
    })
}

pub fn parse_touch_pass(data: &Value) -> Result<TouchPass, CoreError> {
    Ok(TouchPass {
        id: required_str(data, "id")?,
        device_id: required_str(data, "device_id")?,
        is_active: opt_bool(data, "is_active", true),
        created_at: parse_datetime(data, "created_at"),
        updated_at: parse_datetime(data, "updated_at"),
    })
}

// ── Users ───────────────────────────────────────────────────────────

pub fn parse_user(data: &Value) -> Result<User, CoreError> {
    Ok(User {
        id: required_str(data, "id")?,
        first_name: required_str(data, "first_name")?,
        last_name: required_str(data, "last_name")?,
        email: opt_str(data, "email"),
        phone: opt_str(data, "phone"),
        role: data
            .get("role")
            .and_then(Value::as_str)
            .map(UserRole::from_api)
            .unwrap_or_default(),
        access_policy_ids: str_array(data, "access_policy_ids"),
        nfc_cards: parse_each(data, "nfc_cards", parse_nfc_card)?,
        pin_codes: parse_each(data, "pin_codes", parse_pin_code)?,
        touch_passes: parse_each(data, "touch_passes", parse_touch_pass)?,
        is_active: opt_bool(data, "is_active", true),
        start_date: parse_datetime(data, "start_date"),
        end_date: parse_datetime(data, "end_date"),
        created_at: parse_datetime(data, "created_at"),
        updated_at: parse_datetime(data, "updated_at"),
    })
}

// ── Visitors ────────────────────────────────────────────────────────

pub fn parse_visitor(data: &Value) -> Result<Visitor, CoreError> {
    let id = required_str(data, "id")?;

    // The API reports an assigned PIN as an object but never echoes the
    // digits back, so it surfaces masked.
    let pin_codes = if data.get("pin_code").is_some_and(Value::is_object) {
        vec![PinCode {
            id: id.clone(),
            pin: "****".into(),
            is_active: true,
            created_at: None,
            updated_at: None,
        }]
    } else {
        Vec::new()
    };

    let status = data.get("status").and_then(Value::as_str);

    Ok(Visitor {
        first_name: required_str(data, "first_name")?,
        last_name: required_str(data, "last_name")?,
        email: opt_nonempty_str(data, "email"),
        phone: opt_nonempty_str(data, "mobile_phone"),
        access_policy_ids: resource_ids(data, "door_group"),
        nfc_cards: parse_each(data, "nfc_cards", parse_nfc_card)?,
        pin_codes,
        start_date: parse_epoch(data, "start_time").unwrap_or_else(Utc::now),
        end_date: parse_epoch(data, "end_time").unwrap_or_else(Utc::now),
        sponsor_user_id: opt_nonempty_str(data, "inviter_id"),
        notes: opt_nonempty_str(data, "remarks"),
        is_active: matches!(status, Some("UPCOMING" | "VISITING")),
        created_at: parse_epoch(data, "create_time"),
        updated_at: None,
        id,
    })
}

// ── Doors & devices ─────────────────────────────────────────────────

pub fn parse_door(data: &Value) -> Result<Door, CoreError> {
    Ok(Door {
        id: required_str(data, "id")?,
        name: required_str(data, "name")?,
        // `full_name` is the hierarchical location string; the API has no
        // separate description field.
        description: opt_str(data, "full_name"),
        device_id: opt_str(data, "floor_id").unwrap_or_default(),
        is_locked: data.get("door_lock_relay_status").and_then(Value::as_str) == Some("lock"),
        is_online: opt_bool(data, "is_bind_hub", true),
        battery_level: None,
        signal_strength: None,
        firmware_version: None,
        location: opt_str(data, "full_name"),
        created_at: None,
        updated_at: None,
    })
}

/// Infer the device class from the vendor `type` string.
fn infer_device_type(api_type: &str) -> DeviceType {
    if api_type.contains("UAH") {
        DeviceType::AccessHub
    } else if api_type.contains("CAMERA") {
        DeviceType::Camera
    } else {
        // UA-G2 readers and anything unrecognized
        DeviceType::DoorReader
    }
}

pub fn parse_device(data: &Value) -> Result<Device, CoreError> {
    let id = required_str(data, "id")?;
    let name = opt_nonempty_str(data, "alias")
        .map(Ok)
        .unwrap_or_else(|| required_str(data, "name"))?;

    Ok(Device {
        device_type: infer_device_type(
            data.get("type").and_then(Value::as_str).unwrap_or_default(),
        ),
        name,
        // The API does not report a MAC; the device id stands in for it.
        mac_address: id.clone(),
        ip_address: None,
        firmware_version: None,
        is_online: true,
        battery_level: None,
        signal_strength: None,
        location: opt_str(data, "location_id"),
        door_id: opt_str(data, "location_id"),
        created_at: None,
        updated_at: None,
        id,
    })
}

pub fn parse_door_group(data: &Value) -> Result<DoorGroup, CoreError> {
    let group_type = opt_str(data, "type").unwrap_or_default();

    Ok(DoorGroup {
        id: required_str(data, "id")?,
        name: required_str(data, "name")?,
        description: Some(format!("{group_type} group").trim().to_owned()),
        door_ids: resource_ids(data, "door"),
        is_active: true,
        created_at: None,
        updated_at: None,
    })
}

// ── Policies & schedules ────────────────────────────────────────────

pub fn parse_access_policy(data: &Value) -> Result<AccessPolicy, CoreError> {
    Ok(AccessPolicy {
        id: required_str(data, "id")?,
        name: required_str(data, "name")?,
        description: None,
        schedule_id: opt_str(data, "schedule_id"),
        holiday_group_id: None,
        door_ids: resource_ids(data, "door"),
        door_group_ids: resource_ids(data, "door_group"),
        is_active: true,
        created_at: None,
        updated_at: None,
    })
}

pub fn parse_schedule(data: &Value) -> Result<Schedule, CoreError> {
    Ok(Schedule {
        id: required_str(data, "id")?,
        name: required_str(data, "name")?,
        description: opt_str(data, "description"),
        time_ranges: data
            .get("time_ranges")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        days_of_week: data
            .get("days_of_week")
            .and_then(Value::as_array)
            .map(|days| {
                days.iter()
                    .filter_map(Value::as_u64)
                    .filter_map(|d| u8::try_from(d).ok())
                    .collect()
            })
            .unwrap_or_default(),
        is_active: opt_bool(data, "is_active", true),
        created_at: parse_datetime(data, "created_at"),
        updated_at: parse_datetime(data, "updated_at"),
    })
}

pub fn parse_holiday_group(data: &Value) -> Result<HolidayGroup, CoreError> {
    Ok(HolidayGroup {
        id: required_str(data, "id")?,
        name: required_str(data, "name")?,
        description: opt_str(data, "description"),
        holidays: data
            .get("holidays")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        is_active: opt_bool(data, "is_active", true),
        created_at: parse_datetime(data, "created_at"),
        updated_at: parse_datetime(data, "updated_at"),
    })
}

// ── Events & logs ───────────────────────────────────────────────────

pub fn parse_access_event(data: &Value) -> Result<AccessEvent, CoreError> {
    Ok(AccessEvent {
        id: required_str(data, "id")?,
        timestamp: parse_datetime(data, "timestamp").unwrap_or_else(Utc::now),
        event_type: required_str(data, "event_type")?,
        door_id: required_str(data, "door_id")?,
        device_id: required_str(data, "device_id")?,
        result: required_str(data, "result")?,
        user_id: opt_str(data, "user_id"),
        visitor_id: opt_str(data, "visitor_id"),
        credential_type: data
            .get("credential_type")
            .and_then(Value::as_str)
            .and_then(CredentialType::from_api),
        credential_id: opt_str(data, "credential_id"),
        reason: opt_str(data, "reason"),
        ip_address: opt_str(data, "ip_address"),
    })
}

pub fn parse_system_log(data: &Value) -> Result<SystemLog, CoreError> {
    Ok(SystemLog {
        id: required_str(data, "id")?,
        timestamp: parse_datetime(data, "timestamp").unwrap_or_else(Utc::now),
        level: required_str(data, "level")?,
        category: required_str(data, "category")?,
        message: required_str(data, "message")?,
        details: data.get("details").cloned(),
        device_id: opt_str(data, "device_id"),
        user_id: opt_str(data, "user_id"),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn user_parses_with_nested_credentials() {
        let data = json!({
            "id": "u1",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "role": "admin",
            "access_policy_ids": ["p1", "p2"],
            "nfc_cards": [{"id": "c1", "card_number": "0042"}],
            "pin_codes": [{"id": "p1", "pin": "1234"}],
            "start_date": "2026-01-01T00:00:00Z"
        });

        let user = parse_user(&data).expect("valid user");
        assert_eq!(user.full_name(), "Ada Lovelace");
        assert_eq!(user.role, UserRole::Admin);
        assert_eq!(user.nfc_cards.len(), 1);
        assert_eq!(user.nfc_cards[0].card_number, "0042");
        assert_eq!(user.pin_codes.len(), 1);
        assert!(user.is_active);
        assert!(user.start_date.is_some());
        assert!(user.end_date.is_none());
    }

    #[test]
    fn unknown_role_falls_back_to_user() {
        let data = json!({"id": "u1", "first_name": "A", "last_name": "B", "role": "owner"});
        assert_eq!(parse_user(&data).expect("valid").role, UserRole::User);
    }

    #[test]
    fn missing_required_field_is_a_payload_error() {
        let data = json!({"first_name": "A", "last_name": "B"});
        let err = parse_user(&data).expect_err("id is required");
        assert!(matches!(err, CoreError::Payload { .. }));
    }

    #[test]
    fn visitor_maps_epochs_resources_and_status() {
        let data = json!({
            "id": "v1",
            "first_name": "Jo",
            "last_name": "Walker",
            "email": "",
            "mobile_phone": "555-0100",
            "start_time": 1_767_225_600,
            "end_time": 1_767_312_000,
            "create_time": 1_767_139_200,
            "status": "VISITING",
            "inviter_id": "u7",
            "remarks": "contractor",
            "pin_code": {"token": "opaque"},
            "resources": [
                {"type": "door_group", "id": "dg1"},
                {"type": "door", "id": "d9"}
            ]
        });

        let visitor = parse_visitor(&data).expect("valid visitor");
        assert!(visitor.is_active);
        assert_eq!(visitor.email, None, "empty strings collapse to None");
        assert_eq!(visitor.phone.as_deref(), Some("555-0100"));
        assert_eq!(visitor.access_policy_ids, vec!["dg1"]);
        assert_eq!(visitor.sponsor_user_id.as_deref(), Some("u7"));
        assert_eq!(visitor.notes.as_deref(), Some("contractor"));
        assert_eq!(visitor.start_date.timestamp(), 1_767_225_600);
        assert_eq!(visitor.created_at.map(|t| t.timestamp()), Some(1_767_139_200));
        // The PIN exists but is masked.
        assert_eq!(visitor.pin_codes.len(), 1);
        assert_eq!(visitor.pin_codes[0].pin, "****");
    }

    #[test]
    fn expired_visitor_is_inactive() {
        let data = json!({
            "id": "v2", "first_name": "A", "last_name": "B",
            "status": "VISITED"
        });
        assert!(!parse_visitor(&data).expect("valid").is_active);
    }

    #[test]
    fn door_derives_lock_state_from_relay_status() {
        let data = json!({
            "id": "d1",
            "name": "Front",
            "full_name": "HQ - Floor 1 - Front",
            "floor_id": "f1",
            "door_lock_relay_status": "lock",
            "is_bind_hub": true
        });

        let door = parse_door(&data).expect("valid door");
        assert!(door.is_locked);
        assert!(door.is_online);
        assert_eq!(door.device_id, "f1");
        assert_eq!(door.description.as_deref(), Some("HQ - Floor 1 - Front"));

        let unlocked = json!({"id": "d2", "name": "Back", "door_lock_relay_status": "unlock"});
        assert!(!parse_door(&unlocked).expect("valid door").is_locked);
    }

    #[test]
    fn device_prefers_alias_and_infers_type() {
        let hub = json!({"id": "dev1", "name": "UAH", "alias": "Lobby Hub", "type": "UAH"});
        let device = parse_device(&hub).expect("valid device");
        assert_eq!(device.name, "Lobby Hub");
        assert_eq!(device.device_type, DeviceType::AccessHub);
        assert_eq!(device.mac_address, "dev1");

        let reader = json!({"id": "dev2", "name": "Reader", "type": "UA-G2-PRO"});
        assert_eq!(
            parse_device(&reader).expect("valid").device_type,
            DeviceType::DoorReader
        );
    }

    #[test]
    fn policy_splits_resources_by_type() {
        let data = json!({
            "id": "p1",
            "name": "Staff",
            "schedule_id": "s1",
            "resources": [
                {"type": "door", "id": "d1"},
                {"type": "door_group", "id": "g1"},
                {"type": "door", "id": "d2"}
            ]
        });

        let policy = parse_access_policy(&data).expect("valid policy");
        assert_eq!(policy.door_ids, vec!["d1", "d2"]);
        assert_eq!(policy.door_group_ids, vec!["g1"]);
        assert_eq!(policy.schedule_id.as_deref(), Some("s1"));
    }

    #[test]
    fn access_event_parses_credential_type() {
        let data = json!({
            "id": "e1",
            "timestamp": "2026-02-01T08:00:00Z",
            "event_type": "door_access",
            "door_id": "d1",
            "device_id": "dev1",
            "result": "granted",
            "credential_type": "nfc_card"
        });

        let event = parse_access_event(&data).expect("valid event");
        assert_eq!(event.credential_type, Some(CredentialType::NfcCard));
        assert_eq!(event.result, "granted");
    }
}
