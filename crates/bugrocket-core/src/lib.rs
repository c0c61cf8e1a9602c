//! BugRocket core: everything between the UI and the browser.
//!
//! Nothing in here touches `web-sys`; adapters for the ports live in
//! `bugrocket-platform`.

pub mod archive;
pub mod clock;
pub mod event_bus;
pub mod fragments;
pub mod ports;
pub mod runtime;
pub mod scanner;
pub mod session;
pub mod thread;
