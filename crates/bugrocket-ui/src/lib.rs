//! egui front end for BugRocket.
//!
//! Panels render straight from the runtime's `Session`; `UiState` only holds
//! what the runtime does not know about (input text, staged files, notices).

pub mod attachments;
pub mod panels;
pub mod state;
pub mod theme;
