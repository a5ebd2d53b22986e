//! Infrastructure adapters. Implement ports.
//!
//! Landmark streams, file-backed stores, terminal UI. Map errors to DomainError.

pub mod persistence;
pub mod source;
pub mod ui;
