//! GPU resource binding layer.
//!
//! The rest of the crate issues GPU work through the [`GpuBackend`] trait:
//! an opaque, handle-based service owning buffer/texture/program/framebuffer
//! lifecycles and draw dispatch. The trait mirrors a classic bind-then-draw
//! command model so that the flattening, texture generation and binding
//! layers stay independent of any concrete graphics API.
//!
//! [`wgpu_backend::WgpuBackend`] is the concrete implementation; tests drive
//! the same code paths through a recording stub.
//!
//! All operations are issued from the single logical thread that owns the
//! GPU context. The backend mutates shared state (bound program, bound
//! framebuffer, bound texture, viewport) without locking; `&mut self`
//! receivers make that exclusivity explicit in the type system.

pub mod mipmap;
pub mod wgpu_backend;

use std::fmt::Debug;

use crate::error::CompileError;

/// Storage format for allocated texture images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    /// 8-bit RGBA, the format procedural textures are rasterized into.
    Rgba8,
}

/// One vertex attribute fetch: which buffer feeds which shader location and
/// how many f32 components each vertex consumes from it.
pub struct VertexAttribute<'a, B: GpuBackend> {
    pub location: B::Location,
    pub buffer: &'a B::Buffer,
    pub components: u32,
}

/// The GPU resource binding layer contract.
///
/// Handles are opaque; a handle is only meaningful to the backend that
/// created it. Location lookups return `None` when the compiled program does
/// not expose the named attribute or uniform; callers that *require* a
/// location treat `None` as a fatal contract violation, not a runtime error.
pub trait GpuBackend: Sized {
    type Buffer: Clone + PartialEq + Debug;
    type Texture: Clone + PartialEq + Debug;
    type Program: Clone + PartialEq + Debug;
    type Framebuffer: Clone + PartialEq + Debug;
    type Location: Copy + PartialEq + Debug;

    fn create_buffer(&mut self) -> Self::Buffer;
    fn upload_buffer_data(&mut self, buffer: &Self::Buffer, bytes: &[u8]);
    fn delete_buffers(&mut self, buffers: &[Self::Buffer]);

    fn create_texture(&mut self) -> Self::Texture;
    fn allocate_texture_storage(
        &mut self,
        texture: &Self::Texture,
        width: u32,
        height: u32,
        format: TextureFormat,
    );
    fn generate_mipmaps(&mut self, texture: &Self::Texture);
    /// Bind `texture` to texture unit 0, the single unit all textured draws
    /// are multiplexed through.
    fn bind_texture(&mut self, texture: &Self::Texture);
    fn delete_textures(&mut self, textures: &[Self::Texture]);

    fn compile_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self::Program, CompileError>;
    fn use_program(&mut self, program: &Self::Program);
    fn delete_program(&mut self, program: &Self::Program);
    fn attribute_location(&mut self, program: &Self::Program, name: &str)
    -> Option<Self::Location>;
    fn uniform_location(&mut self, program: &Self::Program, name: &str) -> Option<Self::Location>;

    /// Uniform setters apply to the program the location was resolved from.
    fn set_uniform_f32(&mut self, location: Self::Location, value: f32);
    fn set_uniform_i32(&mut self, location: Self::Location, value: i32);
    fn set_uniform_vec3(&mut self, location: Self::Location, value: [f32; 3]);
    fn set_uniform_mat4(&mut self, location: Self::Location, value: [[f32; 4]; 4]);

    /// Replace the bound vertex layout with `attributes`.
    fn bind_vertex_layout(&mut self, attributes: &[VertexAttribute<'_, Self>]);

    fn draw_points(&mut self, count: u32);
    fn draw_lines(&mut self, count: u32);
    fn draw_triangles(&mut self, count: u32);

    fn create_framebuffer(&mut self) -> Self::Framebuffer;
    fn bind_framebuffer(&mut self, framebuffer: &Self::Framebuffer);
    fn attach_texture(&mut self, framebuffer: &Self::Framebuffer, texture: &Self::Texture);
    /// Handle of the currently bound framebuffer (the default render target
    /// when none is bound), for save-before/restore-after discipline.
    fn current_framebuffer(&self) -> Self::Framebuffer;

    fn viewport(&self) -> [i32; 4];
    fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
}
