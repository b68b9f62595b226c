//! A wgpu implementation of the [`GpuBackend`] contract.
//!
//! The backend owns a caller-provided device/queue pair; surface and window
//! management stay with the embedding application, which hands the backend
//! the current frame's target view via [`WgpuBackend::set_frame_target`].
//!
//! Handles are integer ids into slot tables. The bind-then-draw command
//! model is mapped onto wgpu as follows:
//!
//! - every `var<uniform>` declaration in a program's WGSL source gets its
//!   own small uniform buffer in bind group 0, at the binding index the
//!   source declares; uniform "locations" address these buffers
//! - attribute "locations" are the `@location(..)` indices scanned from the
//!   `vs_main` parameter list
//! - texture unit 0 is the backend's current texture, bound together with a
//!   default sampler at group 1 (bindings 0 and 1) for programs whose
//!   source samples a `texture_2d<f32>`
//! - render pipelines are created lazily per (program, topology, vertex
//!   layout, target format) and cached
//!
//! Draws load the existing target contents (no implicit clear), which is
//! what lets the texture rasterizer accumulate one row of points per draw
//! call across a whole offscreen pass.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::error::CompileError;
use crate::gpu::mipmap::MipmapGenerator;
use crate::gpu::{GpuBackend, TextureFormat, VertexAttribute};

/// Handle of a vertex buffer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferId(u32);

/// Handle of a texture slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureId(u32);

/// Handle of a compiled program slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramId(u32);

/// Handle of a framebuffer slot. Id 0 is the default render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocationKind {
    Attribute,
    Uniform,
}

/// An attribute or uniform location resolved from a compiled program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WgpuLocation {
    program: u32,
    kind: LocationKind,
    index: u32,
}

#[derive(Debug, Default)]
struct BufferSlot {
    raw: Option<wgpu::Buffer>,
}

#[derive(Debug)]
struct TextureSlot {
    format: wgpu::TextureFormat,
    mip_level_count: u32,
    raw: Option<wgpu::Texture>,
    /// View over the full mip chain, for sampling.
    sample_view: Option<wgpu::TextureView>,
    /// View over mip level 0 only, for render attachment.
    attachment_view: Option<wgpu::TextureView>,
}

struct UniformSlot {
    name: String,
    binding: u32,
    buffer: wgpu::Buffer,
}

struct ProgramSlot {
    module: wgpu::ShaderModule,
    attributes: Vec<(String, u32)>,
    uniforms: Vec<UniformSlot>,
    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: Option<wgpu::BindGroupLayout>,
    pipeline_layout: wgpu::PipelineLayout,
}

#[derive(Debug, Default)]
struct FramebufferSlot {
    color: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
struct BoundAttribute {
    shader_location: u32,
    buffer: u32,
    components: u32,
}

#[derive(Debug, Default)]
struct BoundState {
    program: Option<u32>,
    framebuffer: u32,
    texture: Option<u32>,
    attributes: Vec<BoundAttribute>,
    viewport: [i32; 4],
}

#[derive(PartialEq, Eq, Hash)]
struct PipelineKey {
    program: u32,
    topology: wgpu::PrimitiveTopology,
    format: wgpu::TextureFormat,
    attributes: Vec<(u32, u32)>,
}

pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    target_format: wgpu::TextureFormat,
    frame_target: Option<wgpu::TextureView>,
    sampler: wgpu::Sampler,
    mipmap: MipmapGenerator,
    buffers: Vec<BufferSlot>,
    textures: Vec<Option<TextureSlot>>,
    programs: Vec<Option<ProgramSlot>>,
    framebuffers: Vec<FramebufferSlot>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    bound: BoundState,
}

impl WgpuBackend {
    /// Wrap an existing device/queue pair. `target_format` is the format of
    /// the default render target (typically the surface format) and
    /// `size` its initial extent, which seeds the viewport.
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        target_format: wgpu::TextureFormat,
        size: [u32; 2],
    ) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Default sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });
        let mipmap = MipmapGenerator::new(&device);
        Self {
            device,
            queue,
            target_format,
            frame_target: None,
            sampler,
            mipmap,
            buffers: Vec::new(),
            textures: Vec::new(),
            programs: Vec::new(),
            framebuffers: Vec::new(),
            pipelines: HashMap::new(),
            bound: BoundState {
                viewport: [0, 0, size[0] as i32, size[1] as i32],
                ..Default::default()
            },
        }
    }

    /// Set the view draws to the default framebuffer should land in for the
    /// current frame. Call once per frame with the acquired surface view.
    pub fn set_frame_target(&mut self, view: wgpu::TextureView) {
        self.frame_target = Some(view);
    }

    /// Drop the per-frame target view after presenting.
    pub fn clear_frame_target(&mut self) {
        self.frame_target = None;
    }

    fn program_slot(&self, id: u32) -> Option<&ProgramSlot> {
        self.programs.get(id as usize).and_then(|p| p.as_ref())
    }

    fn texture_slot(&self, id: u32) -> Option<&TextureSlot> {
        self.textures.get(id as usize).and_then(|t| t.as_ref())
    }

    /// Resolve the current render target: its view (cloned, cheap) and
    /// format.
    fn target(&self) -> Option<(wgpu::TextureView, wgpu::TextureFormat)> {
        if self.bound.framebuffer == 0 {
            let view = self.frame_target.as_ref()?;
            return Some((view.clone(), self.target_format));
        }
        let slot = self.framebuffers.get(self.bound.framebuffer as usize - 1)?;
        let texture = self.texture_slot(slot.color?)?;
        let view = texture.attachment_view.as_ref()?;
        Some((view.clone(), texture.format))
    }

    fn pipeline(
        &mut self,
        program: u32,
        topology: wgpu::PrimitiveTopology,
        format: wgpu::TextureFormat,
    ) -> Option<wgpu::RenderPipeline> {
        let key = PipelineKey {
            program,
            topology,
            format,
            attributes: self
                .bound
                .attributes
                .iter()
                .map(|a| (a.shader_location, a.components))
                .collect(),
        };
        if let Some(pipeline) = self.pipelines.get(&key) {
            return Some(pipeline.clone());
        }

        let slot = self.programs.get(program as usize).and_then(|p| p.as_ref())?;
        let attribute_descs: Vec<[wgpu::VertexAttribute; 1]> = self
            .bound
            .attributes
            .iter()
            .map(|a| {
                [wgpu::VertexAttribute {
                    format: component_format(a.components),
                    offset: 0,
                    shader_location: a.shader_location,
                }]
            })
            .collect();
        let vertex_layouts: Vec<wgpu::VertexBufferLayout> = self
            .bound
            .attributes
            .iter()
            .zip(&attribute_descs)
            .map(|(a, desc)| wgpu::VertexBufferLayout {
                array_stride: u64::from(a.components) * 4,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: desc,
            })
            .collect();

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                cache: None,
                label: Some("Backend pipeline"),
                layout: Some(&slot.pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &slot.module,
                    entry_point: Some("vs_main"),
                    buffers: &vertex_layouts,
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &slot.module,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState {
                            alpha: wgpu::BlendComponent::REPLACE,
                            color: wgpu::BlendComponent::REPLACE,
                        }),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // Scene triangles are double-sided.
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview_mask: None,
            });
        self.pipelines.insert(key, pipeline.clone());
        Some(pipeline)
    }

    fn draw(&mut self, topology: wgpu::PrimitiveTopology, count: u32) {
        let Some(program) = self.bound.program else {
            log::error!("draw issued with no program bound");
            return;
        };
        let Some((view, format)) = self.target() else {
            log::error!("draw issued with no render target available");
            return;
        };
        let Some(pipeline) = self.pipeline(program, topology, format) else {
            log::error!("draw issued with a deleted program");
            return;
        };
        let Some(slot) = self.program_slot(program) else {
            return;
        };

        let uniform_entries: Vec<wgpu::BindGroupEntry> = slot
            .uniforms
            .iter()
            .map(|u| wgpu::BindGroupEntry {
                binding: u.binding,
                resource: u.buffer.as_entire_binding(),
            })
            .collect();
        let uniform_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform bind group"),
            layout: &slot.uniform_layout,
            entries: &uniform_entries,
        });

        let texture_group = match (&slot.texture_layout, self.bound.texture) {
            (Some(layout), Some(texture)) => {
                let Some(texture) = self.texture_slot(texture) else {
                    log::error!("draw issued with a deleted texture bound");
                    return;
                };
                let Some(sample_view) = texture.sample_view.as_ref() else {
                    log::error!("draw issued with an unallocated texture bound");
                    return;
                };
                Some(self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Texture bind group"),
                    layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(sample_view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(&self.sampler),
                        },
                    ],
                }))
            }
            (Some(_), None) => {
                log::error!("program samples a texture but none is bound");
                return;
            }
            (None, _) => None,
        };

        let vertex_buffers: Vec<wgpu::Buffer> = self
            .bound
            .attributes
            .iter()
            .filter_map(|a| {
                self.buffers
                    .get(a.buffer as usize)
                    .and_then(|b| b.raw.clone())
            })
            .collect();
        if vertex_buffers.len() != self.bound.attributes.len() {
            log::error!("draw issued with unloaded vertex buffers in the bound layout");
            return;
        }

        let [x, y, width, height] = self.bound.viewport;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Backend draw encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Backend draw pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });
            render_pass.set_viewport(x as f32, y as f32, width as f32, height as f32, 0.0, 1.0);
            render_pass.set_pipeline(&pipeline);
            render_pass.set_bind_group(0, &uniform_group, &[]);
            if let Some(group) = &texture_group {
                render_pass.set_bind_group(1, group, &[]);
            }
            for (i, buffer) in vertex_buffers.iter().enumerate() {
                render_pass.set_vertex_buffer(i as u32, buffer.slice(..));
            }
            render_pass.draw(0..count, 0..1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl GpuBackend for WgpuBackend {
    type Buffer = BufferId;
    type Texture = TextureId;
    type Program = ProgramId;
    type Framebuffer = FramebufferId;
    type Location = WgpuLocation;

    fn create_buffer(&mut self) -> BufferId {
        self.buffers.push(BufferSlot::default());
        BufferId(self.buffers.len() as u32 - 1)
    }

    fn upload_buffer_data(&mut self, buffer: &BufferId, bytes: &[u8]) {
        let Some(slot) = self.buffers.get_mut(buffer.0 as usize) else {
            log::error!("upload to unknown buffer {buffer:?}");
            return;
        };
        slot.raw = Some(self.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Vertex buffer"),
                contents: bytes,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            },
        ));
    }

    fn delete_buffers(&mut self, buffers: &[BufferId]) {
        for buffer in buffers {
            if let Some(slot) = self.buffers.get_mut(buffer.0 as usize) {
                slot.raw = None;
            }
        }
    }

    fn create_texture(&mut self) -> TextureId {
        self.textures.push(None);
        TextureId(self.textures.len() as u32 - 1)
    }

    fn allocate_texture_storage(
        &mut self,
        texture: &TextureId,
        width: u32,
        height: u32,
        format: TextureFormat,
    ) {
        let format = match format {
            TextureFormat::Rgba8 => wgpu::TextureFormat::Rgba8Unorm,
        };
        let mip_level_count = width.max(height).max(1).ilog2() + 1;
        let raw = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Allocated texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let sample_view = raw.create_view(&wgpu::TextureViewDescriptor::default());
        let attachment_view = raw.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Attachment view"),
            base_mip_level: 0,
            mip_level_count: Some(1),
            ..Default::default()
        });
        let Some(slot) = self.textures.get_mut(texture.0 as usize) else {
            log::error!("allocation for unknown texture {texture:?}");
            return;
        };
        *slot = Some(TextureSlot {
            format,
            mip_level_count,
            raw: Some(raw),
            sample_view: Some(sample_view),
            attachment_view: Some(attachment_view),
        });
    }

    fn generate_mipmaps(&mut self, texture: &TextureId) {
        let Some(slot) = self.textures.get(texture.0 as usize).and_then(|t| t.as_ref()) else {
            log::error!("mipmap generation for unknown texture {texture:?}");
            return;
        };
        let Some(raw) = slot.raw.clone() else {
            return;
        };
        let (format, mip_level_count) = (slot.format, slot.mip_level_count);
        self.mipmap
            .generate(&self.device, &self.queue, &raw, format, mip_level_count);
    }

    fn bind_texture(&mut self, texture: &TextureId) {
        self.bound.texture = Some(texture.0);
    }

    fn delete_textures(&mut self, textures: &[TextureId]) {
        for texture in textures {
            if let Some(slot) = self.textures.get_mut(texture.0 as usize) {
                *slot = None;
            }
        }
    }

    fn compile_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramId, CompileError> {
        let source = format!("{vertex_source}\n{fragment_source}");

        let error_scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Backend shader"),
                source: wgpu::ShaderSource::Wgsl(source.as_str().into()),
            });
        let scope = error_scope.pop();
        if self.device.poll(wgpu::PollType::Poll).is_err() {
            log::warn!("device poll failed while resolving shader validation");
        }
        if let Some(error) = pollster::block_on(scope) {
            return Err(CompileError::new(error.to_string()));
        }

        let attributes = scan_vertex_attributes(vertex_source);
        let uniform_names = scan_uniforms(&source);
        let samples_texture = source.contains("texture_2d<f32>");

        let uniforms: Vec<UniformSlot> = uniform_names
            .into_iter()
            .map(|(name, binding)| UniformSlot {
                buffer: self.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(&format!("Uniform buffer `{name}`")),
                    size: 64,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                }),
                name,
                binding,
            })
            .collect();

        let uniform_entries: Vec<wgpu::BindGroupLayoutEntry> = uniforms
            .iter()
            .map(|u| wgpu::BindGroupLayoutEntry {
                binding: u.binding,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            })
            .collect();
        let uniform_layout = self
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform bind group layout"),
                entries: &uniform_entries,
            });

        let texture_layout = samples_texture.then(|| {
            self.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("Texture bind group layout"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                multisampled: false,
                                view_dimension: wgpu::TextureViewDimension::D2,
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ],
                })
        });

        let mut group_layouts = vec![Some(&uniform_layout)];
        if let Some(layout) = &texture_layout {
            group_layouts.push(Some(layout));
        }
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Backend pipeline layout"),
                bind_group_layouts: &group_layouts,
                immediate_size: 0,
            });

        self.programs.push(Some(ProgramSlot {
            module,
            attributes,
            uniforms,
            uniform_layout,
            texture_layout,
            pipeline_layout,
        }));
        Ok(ProgramId(self.programs.len() as u32 - 1))
    }

    fn use_program(&mut self, program: &ProgramId) {
        self.bound.program = Some(program.0);
    }

    fn delete_program(&mut self, program: &ProgramId) {
        if let Some(slot) = self.programs.get_mut(program.0 as usize) {
            *slot = None;
        }
        self.pipelines.retain(|key, _| key.program != program.0);
        if self.bound.program == Some(program.0) {
            self.bound.program = None;
        }
    }

    fn attribute_location(&mut self, program: &ProgramId, name: &str) -> Option<WgpuLocation> {
        let slot = self.program_slot(program.0)?;
        let (_, shader_location) = slot.attributes.iter().find(|(n, _)| n == name)?;
        Some(WgpuLocation {
            program: program.0,
            kind: LocationKind::Attribute,
            index: *shader_location,
        })
    }

    fn uniform_location(&mut self, program: &ProgramId, name: &str) -> Option<WgpuLocation> {
        let slot = self.program_slot(program.0)?;
        let index = slot.uniforms.iter().position(|u| u.name == name)?;
        Some(WgpuLocation {
            program: program.0,
            kind: LocationKind::Uniform,
            index: index as u32,
        })
    }

    fn set_uniform_f32(&mut self, location: WgpuLocation, value: f32) {
        self.write_uniform(location, bytemuck::bytes_of(&value));
    }

    fn set_uniform_i32(&mut self, location: WgpuLocation, value: i32) {
        self.write_uniform(location, bytemuck::bytes_of(&value));
    }

    fn set_uniform_vec3(&mut self, location: WgpuLocation, value: [f32; 3]) {
        self.write_uniform(location, bytemuck::bytes_of(&value));
    }

    fn set_uniform_mat4(&mut self, location: WgpuLocation, value: [[f32; 4]; 4]) {
        self.write_uniform(location, bytemuck::bytes_of(&value));
    }

    fn bind_vertex_layout(&mut self, attributes: &[VertexAttribute<'_, Self>]) {
        self.bound.attributes.clear();
        for attribute in attributes {
            if attribute.location.kind != LocationKind::Attribute {
                log::error!(
                    "uniform location {:?} bound as a vertex attribute",
                    attribute.location
                );
                continue;
            }
            self.bound.attributes.push(BoundAttribute {
                shader_location: attribute.location.index,
                buffer: attribute.buffer.0,
                components: attribute.components,
            });
        }
    }

    fn draw_points(&mut self, count: u32) {
        self.draw(wgpu::PrimitiveTopology::PointList, count);
    }

    fn draw_lines(&mut self, count: u32) {
        self.draw(wgpu::PrimitiveTopology::LineList, count);
    }

    fn draw_triangles(&mut self, count: u32) {
        self.draw(wgpu::PrimitiveTopology::TriangleList, count);
    }

    fn create_framebuffer(&mut self) -> FramebufferId {
        self.framebuffers.push(FramebufferSlot::default());
        FramebufferId(self.framebuffers.len() as u32)
    }

    fn bind_framebuffer(&mut self, framebuffer: &FramebufferId) {
        self.bound.framebuffer = framebuffer.0;
    }

    fn attach_texture(&mut self, framebuffer: &FramebufferId, texture: &TextureId) {
        if framebuffer.0 == 0 {
            log::error!("cannot attach a texture to the default framebuffer");
            return;
        }
        let Some(slot) = self.framebuffers.get_mut(framebuffer.0 as usize - 1) else {
            log::error!("attachment to unknown framebuffer {framebuffer:?}");
            return;
        };
        slot.color = Some(texture.0);
    }

    fn current_framebuffer(&self) -> FramebufferId {
        FramebufferId(self.bound.framebuffer)
    }

    fn viewport(&self) -> [i32; 4] {
        self.bound.viewport
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.bound.viewport = [x, y, width, height];
    }
}

impl WgpuBackend {
    fn write_uniform(&mut self, location: WgpuLocation, bytes: &[u8]) {
        if location.kind != LocationKind::Uniform {
            log::error!("attribute location {location:?} used as a uniform");
            return;
        }
        let Some(slot) = self.program_slot(location.program) else {
            log::error!("uniform write to a deleted program");
            return;
        };
        let Some(uniform) = slot.uniforms.get(location.index as usize) else {
            log::error!("uniform write to unknown location {location:?}");
            return;
        };
        self.queue.write_buffer(&uniform.buffer, 0, bytes);
    }
}

fn component_format(components: u32) -> wgpu::VertexFormat {
    match components {
        1 => wgpu::VertexFormat::Float32,
        2 => wgpu::VertexFormat::Float32x2,
        _ => wgpu::VertexFormat::Float32x3,
    }
}

/// Scan the `vs_main` parameter list for `@location(n) name` attribute
/// declarations.
fn scan_vertex_attributes(vertex_source: &str) -> Vec<(String, u32)> {
    let Some(start) = vertex_source.find("fn vs_main(") else {
        return Vec::new();
    };
    let rest = &vertex_source[start + "fn vs_main(".len()..];
    // The parameter list nests parentheses inside @location(..)/@builtin(..),
    // so the closing paren has to be found by depth, not by position.
    let mut depth = 1usize;
    let mut end = rest.len();
    for (i, c) in rest.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    end = i;
                    break;
                }
            }
            _ => {}
        }
    }
    let mut params = &rest[..end];

    let mut attributes = Vec::new();
    while let Some(at) = params.find("@location(") {
        params = &params[at + "@location(".len()..];
        let Some(close) = params.find(')') else {
            break;
        };
        let Ok(location) = params[..close].trim().parse::<u32>() else {
            break;
        };
        params = &params[close + 1..];
        let name: String = params
            .trim_start()
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if !name.is_empty() {
            attributes.push((name, location));
        }
    }
    attributes
}

/// Scan a WGSL module for `@binding(n) var<uniform> name` declarations.
fn scan_uniforms(source: &str) -> Vec<(String, u32)> {
    let mut uniforms = Vec::new();
    for line in source.lines() {
        let Some(var_at) = line.find("var<uniform>") else {
            continue;
        };
        let Some(binding_at) = line.find("@binding(") else {
            continue;
        };
        let after = &line[binding_at + "@binding(".len()..];
        let Some(close) = after.find(')') else {
            continue;
        };
        let Ok(binding) = after[..close].trim().parse::<u32>() else {
            continue;
        };
        let name: String = line[var_at + "var<uniform>".len()..]
            .trim_start()
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if !name.is_empty() {
            uniforms.push((name, binding));
        }
    }
    uniforms
}

#[cfg(test)]
mod tests {
    use super::{scan_uniforms, scan_vertex_attributes};

    #[test]
    fn scans_vs_main_parameters_only() {
        let source = "struct VsOut { @location(0) color: vec3<f32> };\n\
                      @vertex\n\
                      fn vs_main(@location(0) position: vec3<f32>, @location(2) uv: vec2<f32>) -> VsOut {\n\
                      }";
        let attributes = scan_vertex_attributes(source);
        assert_eq!(
            attributes,
            vec![("position".to_string(), 0), ("uv".to_string(), 2)]
        );
    }

    #[test]
    fn scans_uniform_bindings() {
        let source = "@group(0) @binding(0) var<uniform> model: mat4x4<f32>;\n\
                      @group(0) @binding(3) var<uniform> light: vec3<f32>;\n\
                      @group(1) @binding(0) var tex_color: texture_2d<f32>;";
        let uniforms = scan_uniforms(source);
        assert_eq!(
            uniforms,
            vec![("model".to_string(), 0), ("light".to_string(), 3)]
        );
    }
}
