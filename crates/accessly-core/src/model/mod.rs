// ── Domain model ──
//
// Canonical records for the Access system. These are what consumers see;
// the vendor's JSON field names and quirks stay inside `convert`.

pub mod device;
pub mod door;
pub mod event;
pub mod policy;
pub mod user;
pub mod visitor;

pub use device::{Device, DeviceType};
pub use door::{Door, DoorGroup};
pub use event::{AccessEvent, CredentialType, SystemLog};
pub use policy::{AccessPolicy, HolidayGroup, Schedule};
pub use user::{NfcCard, PinCode, TouchPass, User, UserRole};
pub use visitor::Visitor;
