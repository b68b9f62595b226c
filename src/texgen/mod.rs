//! Procedural texture generation.
//!
//! A texture definition's four channel expressions are compiled into a
//! point-rasterizing shader program ([`shader`]) and evaluated offscreen,
//! one point per pixel, into a square RGBA texture. The pass draws
//! `TEX_SIZE + 4` rows of `TEX_SIZE + 4` points: the two-pixel margin on
//! every edge keeps mip filtering free of edge artifacts and is part of the
//! format, not an optimization to drop.
//!
//! [`TextureGenerator`] carries the resources shared by all generated
//! textures (the `h` coordinate stream buffer and the offscreen
//! framebuffer), created lazily on first use and reused afterwards. One
//! generator per GPU context; generation runs to completion on the calling
//! thread and leaves the bound framebuffer and viewport as it found them.

pub mod shader;

use crate::data_structures::texture::TextureDefinition;
use crate::error::CompileError;
use crate::gpu::{GpuBackend, TextureFormat, VertexAttribute};
use crate::texgen::shader::{GENERATOR_FRAGMENT_SHADER, generator_vertex_shader, h_stream};

/// Side length in pixels of every generated texture.
pub const TEX_SIZE: u32 = 256;

/// Extra rows/columns rasterized around the texture square.
pub const TEX_MARGIN: u32 = 4;

/// Rasterizer context for procedural textures.
pub struct TextureGenerator<B: GpuBackend> {
    h_buffer: Option<B::Buffer>,
    framebuffer: Option<B::Framebuffer>,
}

impl<B: GpuBackend> Default for TextureGenerator<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: GpuBackend> TextureGenerator<B> {
    pub fn new() -> Self {
        Self {
            h_buffer: None,
            framebuffer: None,
        }
    }

    /// Rasterize `def` into a new `TEX_SIZE` x `TEX_SIZE` texture and return
    /// its handle.
    ///
    /// Fails with [`CompileError`] when the synthesized program does not
    /// compile (a data-dependent, recoverable condition). Panics if the
    /// compiled program does not expose the `h` attribute or `v` uniform the
    /// pass depends on: that is a contract violation between the generated
    /// source and this module, not bad input. The panic fires before any
    /// global state is saved or mutated, so the bound framebuffer and
    /// viewport are restored on every non-panicking path.
    pub fn generate(
        &mut self,
        gpu: &mut B,
        def: &TextureDefinition,
    ) -> Result<B::Texture, CompileError> {
        let program = gpu.compile_program(&generator_vertex_shader(def), GENERATOR_FRAGMENT_SHADER)?;
        let Some(h_attr) = gpu.attribute_location(&program, "h") else {
            panic!("generator program is missing the `h` attribute");
        };
        let Some(v_uni) = gpu.uniform_location(&program, "v") else {
            panic!("generator program is missing the `v` uniform");
        };

        if self.h_buffer.is_none() {
            let buffer = gpu.create_buffer();
            gpu.upload_buffer_data(&buffer, bytemuck::cast_slice(&h_stream()));
            self.h_buffer = Some(buffer);
        }
        if self.framebuffer.is_none() {
            self.framebuffer = Some(gpu.create_framebuffer());
        }
        let Some(h_buffer) = self.h_buffer.as_ref() else {
            unreachable!("h buffer initialized above");
        };
        let Some(framebuffer) = self.framebuffer.as_ref() else {
            unreachable!("framebuffer initialized above");
        };

        let texture = gpu.create_texture();
        gpu.allocate_texture_storage(&texture, TEX_SIZE, TEX_SIZE, TextureFormat::Rgba8);

        let saved_framebuffer = gpu.current_framebuffer();
        let saved_viewport = gpu.viewport();

        gpu.use_program(&program);
        gpu.bind_framebuffer(framebuffer);
        gpu.set_viewport(0, 0, TEX_SIZE as i32, TEX_SIZE as i32);
        gpu.attach_texture(framebuffer, &texture);
        gpu.bind_vertex_layout(&[VertexAttribute {
            location: h_attr,
            buffer: h_buffer,
            components: 1,
        }]);

        for j in 0..TEX_SIZE + TEX_MARGIN {
            gpu.set_uniform_f32(v_uni, j as f32 - 2.0);
            gpu.draw_points(TEX_SIZE + TEX_MARGIN);
        }

        gpu.generate_mipmaps(&texture);

        gpu.bind_framebuffer(&saved_framebuffer);
        gpu.set_viewport(
            saved_viewport[0],
            saved_viewport[1],
            saved_viewport[2],
            saved_viewport[3],
        );
        gpu.delete_program(&program);

        log::info!("generated texture for definition `{}`", def.label);
        Ok(texture)
    }

    /// Release the shared resources. The generator is unusable afterwards.
    pub fn delete(self, gpu: &mut B) {
        if let Some(buffer) = self.h_buffer {
            gpu.delete_buffers(&[buffer]);
        }
    }
}
