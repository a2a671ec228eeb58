//! Core palm tree generation library.
//!
//! Main components:
//! - [`generator`] — the recursive branch generator.
//! - [`segment`] — drawable segments and the generated tree.
//! - [`params`] — generation parameters and their config-file form.
//! - [`input`] — text-field parsing and normalization of parameters.
//! - [`random`] — injectable random sources.
//! - [`render`] — the drawing surface interface consumed by viewers.
//! - [`stats`] — summary statistics over a generated tree.
//! - [`error`] — error types for the input boundary.
//! - [`types`] — shared type aliases and IDs.

pub mod error;
pub mod generator;
pub mod input;
pub mod params;
pub mod random;
pub mod render;
pub mod segment;
pub mod stats;
pub mod types;
