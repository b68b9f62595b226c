//! Scene render pipelines: shader sources and location-resolved programs.
//!
//! Each scene pipeline pairs a vertex/fragment WGSL source with a struct
//! holding the compiled program handle and its resolved attribute/uniform
//! locations, mirroring the shape of the shaders they feed:
//!
//! - `segment` draws line segments with per-vertex colors
//! - `triangle` draws flat-shaded, double-sided triangles with per-vertex
//!   colors and per-triangle normals
//! - `textured` draws triangles sampling a procedurally generated texture,
//!   with the same flat shading factor carried into the fragment stage
//!
//! Location resolution failures here are contract violations between the
//! static sources and this module's expectations, not runtime conditions,
//! and panic rather than return.

pub mod segment;
pub mod textured;
pub mod triangle;

use crate::gpu::GpuBackend;

pub(crate) fn resolve_attribute<B: GpuBackend>(
    gpu: &mut B,
    program: &B::Program,
    name: &str,
) -> B::Location {
    match gpu.attribute_location(program, name) {
        Some(location) => location,
        None => panic!("compiled program is missing the `{name}` attribute"),
    }
}

pub(crate) fn resolve_uniform<B: GpuBackend>(
    gpu: &mut B,
    program: &B::Program,
    name: &str,
) -> B::Location {
    match gpu.uniform_location(program, name) {
        Some(location) => location,
        None => panic!("compiled program is missing the `{name}` uniform"),
    }
}
