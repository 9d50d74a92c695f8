//! Persistence-facing model contracts.
//!
//! # Responsibility
//! - Define how records map onto storage (`Entity`).
//! - Define pagination request/response shapes.

pub mod entity;
pub mod page;
