//! Scheduled jobs: daily feed classification and the monthly quota reset.

pub mod config;
pub mod jobs;
pub mod schedule;
