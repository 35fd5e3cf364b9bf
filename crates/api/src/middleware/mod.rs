//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated caller from a JWT Bearer token.
//!
//! Role checks are not done here: each handler passes the caller to
//! `ideaforge_core::policy::authorize` (directly or through a core service).

pub mod auth;
