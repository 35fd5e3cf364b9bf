//! Well-known role and claim name constants.
//!
//! Role names must match the seed data in `20260301000001_create_roles_and_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Custom claim key granting the creator capability.
pub const CLAIM_CREATOR: &str = "creator";
