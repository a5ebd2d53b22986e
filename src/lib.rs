//! posture-watch: real-time posture monitoring over a pose-landmark stream.
//!
//! Smooths landmarks, derives scale-invariant posture angles, classifies them
//! against a calibrated baseline and tracks focused/unfocused time per session.
//! Hexagonal layout: `domain` is pure, `ports` are the async boundaries,
//! `usecases` orchestrate, `adapters` implement the ports.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
