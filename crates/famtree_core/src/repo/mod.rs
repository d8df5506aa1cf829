//! Person store contracts and implementations.
//!
//! # Responsibility
//! - Define the bulk-read / insert / full-replace store interface.
//! - Keep SQL and allocation details out of services and the editor.
//!
//! # Invariants
//! - Write paths validate drafts before mutating anything.
//! - `update` of an unknown id is `NotFound`, never an implicit insert.

pub mod memory_repo;
pub mod person_repo;
