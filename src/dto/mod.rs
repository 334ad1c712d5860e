//! Validated request payloads and response projections.

pub mod health;
pub mod matches;
pub mod stats;
pub mod timesheets;
pub mod users;
pub mod validation;
