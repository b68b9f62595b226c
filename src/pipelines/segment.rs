//! The segment pipeline: line segments with per-vertex colors.

use crate::error::CompileError;
use crate::gpu::GpuBackend;
use crate::pipelines::{resolve_attribute, resolve_uniform};

/// Compiled segment program with its attribute and uniform locations.
pub struct SegmentShader<B: GpuBackend> {
    pub program: B::Program,
    pub position_attr: B::Location,
    pub color_attr: B::Location,
    pub model_uni: B::Location,
    pub view_uni: B::Location,
    pub projection_uni: B::Location,
}

impl<B: GpuBackend> SegmentShader<B> {
    pub fn new(gpu: &mut B) -> Result<Self, CompileError> {
        let program = gpu.compile_program(
            include_str!("segment.vert.wgsl"),
            include_str!("segment.frag.wgsl"),
        )?;
        Ok(Self {
            position_attr: resolve_attribute(gpu, &program, "position"),
            color_attr: resolve_attribute(gpu, &program, "color"),
            model_uni: resolve_uniform(gpu, &program, "model"),
            view_uni: resolve_uniform(gpu, &program, "view"),
            projection_uni: resolve_uniform(gpu, &program, "projection"),
            program,
        })
    }
}
