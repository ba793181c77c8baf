//! Frame rendering: contain fit, the surface abstraction and the CPU raster surface.

/// CPU raster surface.
pub mod cpu;
/// Clear-and-draw of a single frame.
pub mod draw;
/// Aspect-preserving contain fit.
pub mod fit;
/// Surface trait and recording/readback helpers.
pub mod surface;
