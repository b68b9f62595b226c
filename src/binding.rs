//! Binding: pairing compiled shaders, uniform state, and scene geometry
//! into drawable GPU resources.
//!
//! A binding borrows its shader and uniform snapshot (the rendering session
//! owns both and outlives every binding) and owns the GPU buffers uploaded
//! from one scene document's flattened geometry. Elements with zero
//! vertices never touch the GPU: their buffers are created but left
//! unloaded, and drawing skips them without issuing a call.

use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::data_structures::document::{Light, SceneDocument, Segment, Triangle};
use crate::data_structures::flatten::{
    SegmentArrays, TriangleArrays, triangle_normals, triangle_positions, triangles_of, uv_array,
};
use crate::data_structures::texture::TextureElement;
use crate::error::BindingError;
use crate::gpu::{GpuBackend, VertexAttribute};
use crate::pipelines::segment::SegmentShader;
use crate::pipelines::textured::TexturedShader;
use crate::pipelines::triangle::TriangleShader;
use crate::texgen::TextureGenerator;

/// Snapshot of the uniform values pushed to the scene programs each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformState {
    pub model: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub light: Vector3<f32>,
    pub ambient: f32,
}

impl Default for UniformState {
    fn default() -> Self {
        Self {
            model: Matrix4::identity(),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            light: Vector3::unit_z(),
            // Fully ambient until a document light is applied: geometry is
            // visible even without shading setup.
            ambient: 1.0,
        }
    }
}

impl UniformState {
    /// Take the light direction and ambient fraction from a document.
    pub fn set_light(&mut self, light: &Light) {
        self.light = light.vector.into();
        self.ambient = light.ambient_fraction;
    }
}

/// GPU buffers for a model's plain triangles.
pub struct TriangleBuffers<B: GpuBackend> {
    pub vertex_count: u32,
    pub position_buf: B::Buffer,
    pub color_buf: B::Buffer,
    pub normal_buf: B::Buffer,
}

impl<B: GpuBackend> TriangleBuffers<B> {
    pub fn new(gpu: &mut B, triangles: &[Triangle]) -> Self {
        let mut buffers = Self {
            vertex_count: 0,
            position_buf: gpu.create_buffer(),
            color_buf: gpu.create_buffer(),
            normal_buf: gpu.create_buffer(),
        };
        buffers.load(gpu, triangles);
        buffers
    }

    /// Re-flatten and upload `triangles`. Zero triangles leave the buffers
    /// unloaded: empty uploads are never issued.
    pub fn load(&mut self, gpu: &mut B, triangles: &[Triangle]) {
        self.vertex_count = 3 * triangles.len() as u32;
        if self.vertex_count == 0 {
            return;
        }
        let arrays = TriangleArrays::of(triangles);
        gpu.upload_buffer_data(&self.position_buf, bytemuck::cast_slice(&arrays.positions));
        gpu.upload_buffer_data(&self.color_buf, bytemuck::cast_slice(&arrays.colors));
        gpu.upload_buffer_data(&self.normal_buf, bytemuck::cast_slice(&arrays.normals));
    }

    pub fn delete(self, gpu: &mut B) {
        gpu.delete_buffers(&[self.position_buf, self.color_buf, self.normal_buf]);
    }
}

/// GPU buffers for a model's segments.
pub struct SegmentBuffers<B: GpuBackend> {
    pub vertex_count: u32,
    pub position_buf: B::Buffer,
    pub color_buf: B::Buffer,
}

impl<B: GpuBackend> SegmentBuffers<B> {
    pub fn new(gpu: &mut B, segments: &[Segment]) -> Self {
        let mut buffers = Self {
            vertex_count: 0,
            position_buf: gpu.create_buffer(),
            color_buf: gpu.create_buffer(),
        };
        buffers.load(gpu, segments);
        buffers
    }

    pub fn load(&mut self, gpu: &mut B, segments: &[Segment]) {
        self.vertex_count = 2 * segments.len() as u32;
        if self.vertex_count == 0 {
            return;
        }
        let arrays = SegmentArrays::of(segments);
        gpu.upload_buffer_data(&self.position_buf, bytemuck::cast_slice(&arrays.positions));
        gpu.upload_buffer_data(&self.color_buf, bytemuck::cast_slice(&arrays.colors));
    }

    pub fn delete(self, gpu: &mut B) {
        gpu.delete_buffers(&[self.position_buf, self.color_buf]);
    }
}

/// GPU resources of one texture element: the generated texture plus the
/// geometry buffers of the triangles textured by it.
pub struct ElementData<B: GpuBackend> {
    pub texture: B::Texture,
    pub vertex_count: u32,
    pub position_buf: B::Buffer,
    pub normal_buf: B::Buffer,
    pub uv_buf: B::Buffer,
}

impl<B: GpuBackend> ElementData<B> {
    pub fn new(
        gpu: &mut B,
        generator: &mut TextureGenerator<B>,
        element: &TextureElement,
    ) -> Result<Self, BindingError> {
        let triangles = triangles_of(&element.textured_triangles);
        let vertex_count = 3 * triangles.len() as u32;
        let position_buf = gpu.create_buffer();
        let normal_buf = gpu.create_buffer();
        let uv_buf = gpu.create_buffer();
        if vertex_count > 0 {
            gpu.upload_buffer_data(
                &position_buf,
                bytemuck::cast_slice(&triangle_positions(&triangles)),
            );
            gpu.upload_buffer_data(
                &normal_buf,
                bytemuck::cast_slice(&triangle_normals(&triangles)),
            );
            gpu.upload_buffer_data(
                &uv_buf,
                bytemuck::cast_slice(&uv_array(&element.textured_triangles)),
            );
        }
        let texture = generator.generate(gpu, &element.def)?;
        Ok(Self {
            texture,
            vertex_count,
            position_buf,
            normal_buf,
            uv_buf,
        })
    }

    pub fn delete(self, gpu: &mut B) {
        gpu.delete_buffers(&[self.position_buf, self.normal_buf, self.uv_buf]);
        gpu.delete_textures(&[self.texture]);
    }
}

/// Binding of the textured-triangle pipeline for one scene document: one
/// compiled shader, one uniform snapshot, and per-texture-element GPU
/// resources.
pub struct Binding<'a, B: GpuBackend> {
    shader: &'a TexturedShader<B>,
    uniforms: &'a UniformState,
    document: &'a SceneDocument,
    pub elements: Vec<ElementData<B>>,
}

impl<'a, B: GpuBackend> Binding<'a, B> {
    /// Build the per-element resources for `document`'s texture aggregate.
    ///
    /// A document without one yields [`BindingError::MissingTexture`] before
    /// any GPU resource is created; a texture definition that does not
    /// compile propagates as [`BindingError::Compile`].
    pub fn new(
        gpu: &mut B,
        generator: &mut TextureGenerator<B>,
        shader: &'a TexturedShader<B>,
        uniforms: &'a UniformState,
        document: &'a SceneDocument,
    ) -> Result<Self, BindingError> {
        let texture = document.texture.as_ref().ok_or(BindingError::MissingTexture)?;
        let mut elements = Vec::with_capacity(texture.elements.len());
        for element in &texture.elements {
            elements.push(ElementData::new(gpu, generator, element)?);
        }
        Ok(Self {
            shader,
            uniforms,
            document,
            elements,
        })
    }

    /// Rebuild the element geometry buffers from the bound document without
    /// regenerating textures.
    pub fn reload_geometry(&mut self, gpu: &mut B) {
        let Some(texture) = self.document.texture.as_ref() else {
            return;
        };
        for (data, element) in self.elements.iter_mut().zip(&texture.elements) {
            let triangles = triangles_of(&element.textured_triangles);
            data.vertex_count = 3 * triangles.len() as u32;
            if data.vertex_count == 0 {
                continue;
            }
            gpu.upload_buffer_data(
                &data.position_buf,
                bytemuck::cast_slice(&triangle_positions(&triangles)),
            );
            gpu.upload_buffer_data(
                &data.normal_buf,
                bytemuck::cast_slice(&triangle_normals(&triangles)),
            );
            gpu.upload_buffer_data(
                &data.uv_buf,
                bytemuck::cast_slice(&uv_array(&element.textured_triangles)),
            );
        }
    }

    pub fn push_model(&self, gpu: &mut B) {
        gpu.use_program(&self.shader.program);
        gpu.set_uniform_mat4(self.shader.model_uni, self.uniforms.model.into());
    }

    pub fn push_view(&self, gpu: &mut B) {
        gpu.use_program(&self.shader.program);
        gpu.set_uniform_mat4(self.shader.view_uni, self.uniforms.view.into());
    }

    pub fn push_projection(&self, gpu: &mut B) {
        gpu.use_program(&self.shader.program);
        gpu.set_uniform_mat4(self.shader.projection_uni, self.uniforms.projection.into());
    }

    pub fn push_light(&self, gpu: &mut B) {
        gpu.use_program(&self.shader.program);
        gpu.set_uniform_vec3(self.shader.light_uni, self.uniforms.light.into());
        gpu.set_uniform_f32(self.shader.ambient_uni, self.uniforms.ambient);
    }

    /// Push the per-frame uniforms: projection, view and light.
    pub fn frame_setup(&self, gpu: &mut B) {
        self.push_projection(gpu);
        self.push_view(gpu);
        self.push_light(gpu);
    }

    /// Draw every non-empty element: bind its texture and geometry, then
    /// issue one triangle draw. Empty elements are skipped without any GPU
    /// call.
    pub fn draw(&self, gpu: &mut B) {
        gpu.use_program(&self.shader.program);
        self.push_model(gpu);
        for element in &self.elements {
            if element.vertex_count == 0 {
                continue;
            }
            gpu.bind_texture(&element.texture);
            gpu.bind_vertex_layout(&[
                VertexAttribute {
                    location: self.shader.position_attr,
                    buffer: &element.position_buf,
                    components: 3,
                },
                VertexAttribute {
                    location: self.shader.normal_attr,
                    buffer: &element.normal_buf,
                    components: 3,
                },
                VertexAttribute {
                    location: self.shader.uv_attr,
                    buffer: &element.uv_buf,
                    components: 2,
                },
            ]);
            gpu.draw_triangles(element.vertex_count);
        }
    }

    pub fn draw_with_frame_setup(&self, gpu: &mut B) {
        self.frame_setup(gpu);
        self.draw(gpu);
    }

    pub fn delete(self, gpu: &mut B) {
        for element in self.elements {
            element.delete(gpu);
        }
    }
}

/// Binding of the plain-triangle pipeline for one scene document.
pub struct TriangleBinding<'a, B: GpuBackend> {
    shader: &'a TriangleShader<B>,
    uniforms: &'a UniformState,
    pub buffers: TriangleBuffers<B>,
}

impl<'a, B: GpuBackend> TriangleBinding<'a, B> {
    pub fn new(
        gpu: &mut B,
        shader: &'a TriangleShader<B>,
        uniforms: &'a UniformState,
        document: &SceneDocument,
    ) -> Self {
        let buffers = TriangleBuffers::new(gpu, &document.model.triangles);
        Self {
            shader,
            uniforms,
            buffers,
        }
    }

    pub fn frame_setup(&self, gpu: &mut B) {
        gpu.use_program(&self.shader.program);
        gpu.set_uniform_mat4(self.shader.projection_uni, self.uniforms.projection.into());
        gpu.set_uniform_mat4(self.shader.view_uni, self.uniforms.view.into());
        gpu.set_uniform_vec3(self.shader.light_uni, self.uniforms.light.into());
        gpu.set_uniform_f32(self.shader.ambient_uni, self.uniforms.ambient);
    }

    pub fn draw(&self, gpu: &mut B) {
        if self.buffers.vertex_count == 0 {
            return;
        }
        gpu.use_program(&self.shader.program);
        gpu.set_uniform_mat4(self.shader.model_uni, self.uniforms.model.into());
        gpu.bind_vertex_layout(&[
            VertexAttribute {
                location: self.shader.position_attr,
                buffer: &self.buffers.position_buf,
                components: 3,
            },
            VertexAttribute {
                location: self.shader.color_attr,
                buffer: &self.buffers.color_buf,
                components: 3,
            },
            VertexAttribute {
                location: self.shader.normal_attr,
                buffer: &self.buffers.normal_buf,
                components: 3,
            },
        ]);
        gpu.draw_triangles(self.buffers.vertex_count);
    }

    pub fn draw_with_frame_setup(&self, gpu: &mut B) {
        self.frame_setup(gpu);
        self.draw(gpu);
    }

    pub fn delete(self, gpu: &mut B) {
        self.buffers.delete(gpu);
    }
}

/// Binding of the segment pipeline for one scene document.
pub struct SegmentBinding<'a, B: GpuBackend> {
    shader: &'a SegmentShader<B>,
    uniforms: &'a UniformState,
    pub buffers: SegmentBuffers<B>,
}

impl<'a, B: GpuBackend> SegmentBinding<'a, B> {
    pub fn new(
        gpu: &mut B,
        shader: &'a SegmentShader<B>,
        uniforms: &'a UniformState,
        document: &SceneDocument,
    ) -> Self {
        let buffers = SegmentBuffers::new(gpu, &document.model.segments);
        Self {
            shader,
            uniforms,
            buffers,
        }
    }

    pub fn frame_setup(&self, gpu: &mut B) {
        gpu.use_program(&self.shader.program);
        gpu.set_uniform_mat4(self.shader.projection_uni, self.uniforms.projection.into());
        gpu.set_uniform_mat4(self.shader.view_uni, self.uniforms.view.into());
    }

    pub fn draw(&self, gpu: &mut B) {
        if self.buffers.vertex_count == 0 {
            return;
        }
        gpu.use_program(&self.shader.program);
        gpu.set_uniform_mat4(self.shader.model_uni, self.uniforms.model.into());
        gpu.bind_vertex_layout(&[
            VertexAttribute {
                location: self.shader.position_attr,
                buffer: &self.buffers.position_buf,
                components: 3,
            },
            VertexAttribute {
                location: self.shader.color_attr,
                buffer: &self.buffers.color_buf,
                components: 3,
            },
        ]);
        gpu.draw_lines(self.buffers.vertex_count);
    }

    pub fn draw_with_frame_setup(&self, gpu: &mut B) {
        self.frame_setup(gpu);
        self.draw(gpu);
    }

    pub fn delete(self, gpu: &mut B) {
        self.buffers.delete(gpu);
    }
}
