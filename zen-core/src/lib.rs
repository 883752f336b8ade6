//! Core morphing point-cloud library.
//!
//! Main components:
//! - [`shape`] — the closed set of target geometries.
//! - [`generator`] — stochastic point-cloud synthesis per shape.
//! - [`interaction`] — tension/expansion values and their smoothing rule.
//! - [`mailbox`] — latest-value-wins hand-off from a gesture source to the tick.
//! - [`gesture`] — gesture sources running on their own threads.
//! - [`morph`] — per-tick integrator phases.
//! - [`engine`] — [`engine::MorphEngine`], owner of the live particle buffer.
//! - [`frame`] — rendered positions handed to the render surface.
//! - [`config`] — integrator and render configuration.
//! - [`error`] — construction and parsing errors.
//! - [`types`] — shared type aliases and IDs.

pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod generator;
pub mod gesture;
pub mod interaction;
pub mod mailbox;
pub mod morph;
pub mod shape;
pub mod types;
