//! The textured-triangle pipeline.
//!
//! Geometry carries positions, normals and UVs; the fragment stage samples
//! the element's procedurally generated texture through texture unit 0.

use crate::error::CompileError;
use crate::gpu::GpuBackend;
use crate::pipelines::{resolve_attribute, resolve_uniform};

/// Compiled textured-triangle program with its attribute and uniform
/// locations.
pub struct TexturedShader<B: GpuBackend> {
    pub program: B::Program,
    pub position_attr: B::Location,
    pub normal_attr: B::Location,
    pub uv_attr: B::Location,
    pub model_uni: B::Location,
    pub view_uni: B::Location,
    pub projection_uni: B::Location,
    pub light_uni: B::Location,
    pub ambient_uni: B::Location,
}

impl<B: GpuBackend> TexturedShader<B> {
    pub fn new(gpu: &mut B) -> Result<Self, CompileError> {
        let program = gpu.compile_program(
            include_str!("textured.vert.wgsl"),
            include_str!("textured.frag.wgsl"),
        )?;
        Ok(Self {
            position_attr: resolve_attribute(gpu, &program, "position"),
            normal_attr: resolve_attribute(gpu, &program, "normal"),
            uv_attr: resolve_attribute(gpu, &program, "uv"),
            model_uni: resolve_uniform(gpu, &program, "model"),
            view_uni: resolve_uniform(gpu, &program, "view"),
            projection_uni: resolve_uniform(gpu, &program, "projection"),
            light_uni: resolve_uniform(gpu, &program, "light"),
            ambient_uni: resolve_uniform(gpu, &program, "ambient"),
            program,
        })
    }
}
