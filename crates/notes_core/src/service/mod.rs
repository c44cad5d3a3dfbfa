//! Core use-case services.
//!
//! # Responsibility
//! - Enforce domain rules before delegating to repositories.
//! - Keep boundary layers decoupled from storage details.

pub mod note_service;
