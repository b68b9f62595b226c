//! The triangle pipeline: flat-shaded, double-sided triangles.

use crate::error::CompileError;
use crate::gpu::GpuBackend;
use crate::pipelines::{resolve_attribute, resolve_uniform};

/// Compiled triangle program with its attribute and uniform locations.
pub struct TriangleShader<B: GpuBackend> {
    pub program: B::Program,
    pub position_attr: B::Location,
    pub color_attr: B::Location,
    pub normal_attr: B::Location,
    pub model_uni: B::Location,
    pub view_uni: B::Location,
    pub projection_uni: B::Location,
    pub light_uni: B::Location,
    pub ambient_uni: B::Location,
}

impl<B: GpuBackend> TriangleShader<B> {
    pub fn new(gpu: &mut B) -> Result<Self, CompileError> {
        let program = gpu.compile_program(
            include_str!("triangle.vert.wgsl"),
            include_str!("triangle.frag.wgsl"),
        )?;
        Ok(Self {
            position_attr: resolve_attribute(gpu, &program, "position"),
            color_attr: resolve_attribute(gpu, &program, "color"),
            normal_attr: resolve_attribute(gpu, &program, "normal"),
            model_uni: resolve_uniform(gpu, &program, "model"),
            view_uni: resolve_uniform(gpu, &program, "view"),
            projection_uni: resolve_uniform(gpu, &program, "projection"),
            light_uni: resolve_uniform(gpu, &program, "light"),
            ambient_uni: resolve_uniform(gpu, &program, "ambient"),
            program,
        })
    }
}
