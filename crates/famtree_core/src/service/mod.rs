//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store, synthesis, rendering and editing into use cases.
//! - Keep callers (CLI, UI shells) decoupled from storage details.

pub mod family_service;
pub mod tree_view;
