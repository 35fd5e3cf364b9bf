//! Domain logic for the idea-generation backend.
//!
//! This crate has no I/O of its own: persistence, identity, the generation
//! backend and the source feed are reached through the traits in
//! [`providers`].

pub mod billing;
pub mod classifier;
pub mod error;
pub mod generator;
pub mod idea;
pub mod normalizer;
pub mod policy;
pub mod prompts;
pub mod providers;
pub mod quota;
pub mod role_authority;
pub mod roles;
pub mod types;

#[cfg(test)]
mod test_support;
