//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into use-case level APIs.
//! - Keep client layers decoupled from addressing and request details.

pub mod todo_service;
