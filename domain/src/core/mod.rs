//! Core domain concepts shared across all subdomains.
//!
//! - [`ids::PlayerId`] / [`ids::RoundId`] — identifier value objects
//! - [`error::GameError`] — domain-level errors
//! - [`catalog`] — built-in location and AI name lists

pub mod catalog;
pub mod error;
pub mod ids;
