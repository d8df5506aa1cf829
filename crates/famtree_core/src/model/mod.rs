//! Family domain model.
//!
//! # Responsibility
//! - Define the person record shared by storage, synthesis and editing.
//! - Build the id-keyed person index consumed by the synthesizer.
//!
//! # Invariants
//! - Every rendered person is identified by a non-blank `PersonId`.
//! - The person index is rebuilt wholesale, never patched in place.

pub mod family;
pub mod person;
