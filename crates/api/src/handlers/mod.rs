//! HTTP handlers, one module per resource.

pub mod builds;
pub mod pieces;
