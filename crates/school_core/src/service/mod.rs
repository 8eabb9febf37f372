//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs (sign-in,
//!   analytics, report data).
//! - Keep CLI/UI layers decoupled from store details.

pub mod analytics_service;
pub mod auth_service;
pub mod report_service;
