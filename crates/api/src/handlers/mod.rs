pub mod admin;
pub mod billing;
pub mod catalog;
pub mod ideas;
pub mod me;
