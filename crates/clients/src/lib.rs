//! HTTP clients for the external services: the text-generation API, the
//! public idea feed and the payment provider.
//!
//! Each client implements the matching trait from `ideaforge_core::providers`.

pub mod checkout;
pub mod error;
pub mod feed;
pub mod generation;
