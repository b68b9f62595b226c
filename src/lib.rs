//! trivex
//!
//! A scene-to-GPU data pipeline for JSON scene documents composed of line
//! segments, plain triangles and textured triangles, with a procedural
//! texture generator that compiles small per-channel color expressions into
//! shader programs and rasterizes them offscreen. The crate owns the data
//! model, the flattening of structured geometry into upload-ready attribute
//! arrays, shader synthesis, and draw orchestration; windowing, device
//! acquisition and presentation stay with the embedding application.
//!
//! High-level modules
//! - `data_structures`: the scene document model and geometry flattening
//! - `gpu`: the GPU resource binding contract and its wgpu implementation
//! - `pipelines`: shader sources and compiled-program structs for the
//!   segment, triangle and textured-triangle pipelines
//! - `texgen`: expression-to-shader synthesis and the offscreen texture
//!   rasterizer
//! - `binding`: composition of shaders, uniforms and scene geometry into
//!   drawable bindings
//! - `error`: the error taxonomy
//!

pub mod binding;
pub mod data_structures;
pub mod error;
pub mod gpu;
pub mod pipelines;
pub mod texgen;

// Re-exports commonly used types for convenience in downstream code.
pub use binding::{Binding, SegmentBinding, TriangleBinding, UniformState};
pub use data_structures::document::SceneDocument;
pub use data_structures::texture::TextureDefinition;
pub use error::{BindingError, CompileError};
pub use gpu::{GpuBackend, wgpu_backend::WgpuBackend};
pub use texgen::{TEX_SIZE, TextureGenerator};
