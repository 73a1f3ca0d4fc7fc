//! Terminal client for the Pitchside processing server.
//!
//! This crate provides:
//! - A terminal renderer for the staged progress display and analytics
//! - The `pitchside` binary wiring file selection, live uploads, and
//!   sample runs to the orchestrator

pub mod presenter;

pub use presenter::TerminalPresenter;
