//! Relationship, hiring, conversation, notification and post-interaction
//! operations. Each operation validates its input before touching the store,
//! relies on store constraints for uniqueness, and publishes the resulting
//! change on the gateway.

pub mod conversations;
pub mod follows;
pub mod hiring;
pub mod interactions;
pub mod notifications;
pub mod users;
