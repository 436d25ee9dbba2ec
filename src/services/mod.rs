//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the placement workflow and the calls out to external
//! collaborators so route handlers can stay focused on protocol translation.

pub mod probe;
pub mod removal;
pub mod session;
