//! A recording stub of the GPU backend contract.
//!
//! Every operation is recorded so tests can assert on exactly which GPU
//! calls a code path issued (or, for skipped empty elements, did not
//! issue). Compilation can be forced to fail and location lookups can be
//! made to miss to exercise the error and panic paths.

// Not every test binary exercises every recorded channel.
#![allow(dead_code)]

use trivex::error::CompileError;
use trivex::gpu::{GpuBackend, TextureFormat, VertexAttribute};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StubLocation(pub u32);

#[derive(Default)]
pub struct StubGpu {
    next_handle: u32,
    location_names: Vec<String>,

    pub compiled: Vec<(String, String)>,
    pub used_programs: Vec<u32>,
    pub deleted_programs: Vec<u32>,

    pub buffers_created: u32,
    pub uploads: Vec<(u32, usize)>,
    pub deleted_buffers: Vec<u32>,

    pub textures_created: u32,
    pub allocated: Vec<(u32, u32, u32)>,
    pub mipmapped: Vec<u32>,
    pub bound_textures: Vec<u32>,
    pub deleted_textures: Vec<u32>,

    pub uniform_f32_writes: Vec<(String, f32)>,
    pub uniform_i32_writes: Vec<(String, i32)>,
    pub uniform_vec3_writes: Vec<(String, [f32; 3])>,
    pub uniform_mat4_writes: Vec<String>,

    pub bound_layouts: Vec<Vec<(u32, u32, u32)>>,
    pub draw_points_calls: Vec<u32>,
    pub draw_lines_calls: Vec<u32>,
    pub draw_triangles_calls: Vec<u32>,

    pub framebuffers_created: u32,
    pub framebuffer_binds: Vec<u32>,
    pub attachments: Vec<(u32, u32)>,
    pub viewport_sets: Vec<[i32; 4]>,

    pub fail_compile: bool,
    pub missing_attributes: Vec<String>,
    pub missing_uniforms: Vec<String>,

    bound_framebuffer: u32,
    viewport: [i32; 4],
}

impl StubGpu {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    fn intern(&mut self, name: &str) -> StubLocation {
        if let Some(index) = self.location_names.iter().position(|n| n == name) {
            return StubLocation(index as u32);
        }
        self.location_names.push(name.to_string());
        StubLocation(self.location_names.len() as u32 - 1)
    }

    fn location_name(&self, location: StubLocation) -> String {
        self.location_names
            .get(location.0 as usize)
            .cloned()
            .unwrap_or_default()
    }

    /// Total draw calls of any topology.
    pub fn draw_calls(&self) -> usize {
        self.draw_points_calls.len() + self.draw_lines_calls.len() + self.draw_triangles_calls.len()
    }
}

impl GpuBackend for StubGpu {
    type Buffer = u32;
    type Texture = u32;
    type Program = u32;
    type Framebuffer = u32;
    type Location = StubLocation;

    fn create_buffer(&mut self) -> u32 {
        self.buffers_created += 1;
        self.fresh_handle()
    }

    fn upload_buffer_data(&mut self, buffer: &u32, bytes: &[u8]) {
        self.uploads.push((*buffer, bytes.len()));
    }

    fn delete_buffers(&mut self, buffers: &[u32]) {
        self.deleted_buffers.extend_from_slice(buffers);
    }

    fn create_texture(&mut self) -> u32 {
        self.textures_created += 1;
        self.fresh_handle()
    }

    fn allocate_texture_storage(
        &mut self,
        texture: &u32,
        width: u32,
        height: u32,
        _format: TextureFormat,
    ) {
        self.allocated.push((*texture, width, height));
    }

    fn generate_mipmaps(&mut self, texture: &u32) {
        self.mipmapped.push(*texture);
    }

    fn bind_texture(&mut self, texture: &u32) {
        self.bound_textures.push(*texture);
    }

    fn delete_textures(&mut self, textures: &[u32]) {
        self.deleted_textures.extend_from_slice(textures);
    }

    fn compile_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<u32, CompileError> {
        if self.fail_compile {
            return Err(CompileError::new("stub compile failure"));
        }
        self.compiled
            .push((vertex_source.to_string(), fragment_source.to_string()));
        Ok(self.compiled.len() as u32 - 1)
    }

    fn use_program(&mut self, program: &u32) {
        self.used_programs.push(*program);
    }

    fn delete_program(&mut self, program: &u32) {
        self.deleted_programs.push(*program);
    }

    fn attribute_location(&mut self, _program: &u32, name: &str) -> Option<StubLocation> {
        if self.missing_attributes.iter().any(|n| n == name) {
            return None;
        }
        Some(self.intern(name))
    }

    fn uniform_location(&mut self, _program: &u32, name: &str) -> Option<StubLocation> {
        if self.missing_uniforms.iter().any(|n| n == name) {
            return None;
        }
        Some(self.intern(name))
    }

    fn set_uniform_f32(&mut self, location: StubLocation, value: f32) {
        let name = self.location_name(location);
        self.uniform_f32_writes.push((name, value));
    }

    fn set_uniform_i32(&mut self, location: StubLocation, value: i32) {
        let name = self.location_name(location);
        self.uniform_i32_writes.push((name, value));
    }

    fn set_uniform_vec3(&mut self, location: StubLocation, value: [f32; 3]) {
        let name = self.location_name(location);
        self.uniform_vec3_writes.push((name, value));
    }

    fn set_uniform_mat4(&mut self, location: StubLocation, _value: [[f32; 4]; 4]) {
        let name = self.location_name(location);
        self.uniform_mat4_writes.push(name);
    }

    fn bind_vertex_layout(&mut self, attributes: &[VertexAttribute<'_, Self>]) {
        self.bound_layouts.push(
            attributes
                .iter()
                .map(|a| (a.location.0, *a.buffer, a.components))
                .collect(),
        );
    }

    fn draw_points(&mut self, count: u32) {
        self.draw_points_calls.push(count);
    }

    fn draw_lines(&mut self, count: u32) {
        self.draw_lines_calls.push(count);
    }

    fn draw_triangles(&mut self, count: u32) {
        self.draw_triangles_calls.push(count);
    }

    fn create_framebuffer(&mut self) -> u32 {
        self.framebuffers_created += 1;
        self.fresh_handle()
    }

    fn bind_framebuffer(&mut self, framebuffer: &u32) {
        self.bound_framebuffer = *framebuffer;
        self.framebuffer_binds.push(*framebuffer);
    }

    fn attach_texture(&mut self, framebuffer: &u32, texture: &u32) {
        self.attachments.push((*framebuffer, *texture));
    }

    fn current_framebuffer(&self) -> u32 {
        self.bound_framebuffer
    }

    fn viewport(&self) -> [i32; 4] {
        self.viewport
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.viewport = [x, y, width, height];
        self.viewport_sets.push(self.viewport);
    }
}
