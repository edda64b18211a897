//! Forward Renderer
//!
//! A compact single-pass forward renderer: clear, draw every character
//! primitive (skinned or not, one pipeline), resolve MSAA, then the photo
//! overlay. Scene data stays CPU-side; this module owns all GPU resources.

pub mod context;
pub mod overlay;
pub mod settings;

pub use context::WgpuContext;
pub use settings::RenderSettings;

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::errors::Result;
use crate::scene::{ImageData, LightKind, NodeHandle, Primitive, Scene, SkeletonKey};
use crate::render::overlay::OverlayPass;

const MAX_DIRECTIONAL_LIGHTS: usize = 3;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
    joints: [u16; 4],
    weights: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
        3 => Uint16x4,
        4 => Float32x4,
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct GlobalUniforms {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    hemi_sky: [f32; 4],
    hemi_ground: [f32; 4],
    light_dirs: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    light_colors: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    light_count: [u32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ObjectUniforms {
    model: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct MaterialUniforms {
    base_color: [f32; 4],
}

/// GPU resources for one mesh primitive.
struct GpuPrimitive {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    object_buffer: wgpu::Buffer,
    joints_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    material_bind_group: wgpu::BindGroup,
    /// Node carrying this primitive (model matrix source).
    node: NodeHandle,
    skin: Option<SkeletonKey>,
}

pub struct Renderer {
    settings: RenderSettings,
    ctx: Option<WgpuContext>,

    pipeline: Option<wgpu::RenderPipeline>,
    object_layout: Option<wgpu::BindGroupLayout>,
    material_layout: Option<wgpu::BindGroupLayout>,

    globals_buffer: Option<wgpu::Buffer>,
    globals_bind_group: Option<wgpu::BindGroup>,

    sampler: Option<wgpu::Sampler>,
    white_texture_view: Option<wgpu::TextureView>,

    primitives: Vec<GpuPrimitive>,
    overlay: Option<OverlayPass>,
}

impl Renderer {
    #[must_use]
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            ctx: None,
            pipeline: None,
            object_layout: None,
            material_layout: None,
            globals_buffer: None,
            globals_bind_group: None,
            sampler: None,
            white_texture_view: None,
            primitives: Vec::new(),
            overlay: None,
        }
    }

    pub async fn init(&mut self, window: Arc<Window>, width: u32, height: u32) -> Result<()> {
        let ctx = WgpuContext::new(window, &self.settings, width, height).await?;
        let device = &ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Character Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/character.wgsl").into()),
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Character Pipeline Layout"),
            bind_group_layouts: &[&globals_layout, &object_layout, &material_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Character Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.color_format(),
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: ctx.depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: ctx.msaa_samples,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview_mask: None,
            cache: None,
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globals Buffer"),
            contents: bytemuck::bytes_of(&GlobalUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Linear Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            ..Default::default()
        });

        let white = ImageData {
            width: 1,
            height: 1,
            rgba8: vec![0xFF; 4],
        };
        let white_texture_view = create_texture(device, &ctx.queue, &white, "White Texture");

        let overlay = OverlayPass::new(
            device,
            ctx.color_format(),
            ctx.depth_format,
            ctx.msaa_samples,
        );

        self.ctx = Some(ctx);
        self.pipeline = Some(pipeline);
        self.object_layout = Some(object_layout);
        self.material_layout = Some(material_layout);
        self.globals_buffer = Some(globals_buffer);
        self.globals_bind_group = Some(globals_bind_group);
        self.sampler = Some(sampler);
        self.white_texture_view = Some(white_texture_view);
        self.overlay = Some(overlay);

        log::info!("Renderer initialized");
        Ok(())
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.ctx.is_some()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(ctx) = &mut self.ctx {
            ctx.resize(width, height);
        }
    }

    /// Uploads every mesh-bearing node of the scene to the GPU. Called once,
    /// when the character has been bound into the scene graph.
    pub fn upload_character(&mut self, scene: &Scene) {
        let (Some(ctx), Some(object_layout), Some(material_layout), Some(sampler), Some(white)) = (
            &self.ctx,
            &self.object_layout,
            &self.material_layout,
            &self.sampler,
            &self.white_texture_view,
        ) else {
            return;
        };

        self.primitives.clear();
        for (handle, node) in &scene.nodes {
            let Some(mesh_key) = node.mesh else { continue };
            let Some(mesh) = scene.meshes.get(mesh_key) else {
                continue;
            };

            let joint_count = node
                .skin
                .and_then(|key| scene.skins.get(key))
                .map_or(1, crate::scene::Skeleton::joint_count);

            for primitive in &mesh.primitives {
                self.primitives.push(upload_primitive(
                    ctx,
                    object_layout,
                    material_layout,
                    sampler,
                    white,
                    primitive,
                    handle,
                    node.skin,
                    joint_count,
                ));
            }
        }

        log::info!("Uploaded {} primitives", self.primitives.len());
    }

    /// Installs the decoded photo as the overlay texture.
    pub fn set_photo(&mut self, image: &ImageData) {
        let (Some(ctx), Some(overlay)) = (&self.ctx, &mut self.overlay) else {
            return;
        };
        overlay.set_photo(&ctx.device, &ctx.queue, image);
    }

    /// Renders one frame: globals, per-object uniforms, the forward pass and
    /// the overlay.
    pub fn render(&mut self, scene: &Scene) -> Result<()> {
        let Some(ctx) = &self.ctx else {
            return Ok(());
        };
        let (Some(pipeline), Some(globals_buffer), Some(globals_bind_group)) = (
            &self.pipeline,
            &self.globals_buffer,
            &self.globals_bind_group,
        ) else {
            return Ok(());
        };

        ctx.queue
            .write_buffer(globals_buffer, 0, bytemuck::bytes_of(&gather_globals(scene)));

        for prim in &self.primitives {
            let Some(node) = scene.get_node(prim.node) else {
                continue;
            };
            let object = ObjectUniforms {
                model: node.transform.world_matrix_as_mat4().to_cols_array_2d(),
            };
            ctx.queue
                .write_buffer(&prim.object_buffer, 0, bytemuck::bytes_of(&object));

            if let Some(skeleton) = prim.skin.and_then(|key| scene.skins.get(key)) {
                ctx.queue.write_buffer(
                    &prim.joints_buffer,
                    0,
                    bytemuck::cast_slice(skeleton.joint_matrices()),
                );
            }
        }

        let frame = ctx.surface.get_current_texture()?;
        let surface_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (color_view, resolve_target, store_op) = match &ctx.msaa_view {
            Some(msaa) => (msaa, Some(&surface_view), wgpu::StoreOp::Discard),
            None => (&surface_view, None, wgpu::StoreOp::Store),
        };

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Forward Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(ctx.clear_color),
                        store: store_op,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, globals_bind_group, &[]);

            for prim in &self.primitives {
                pass.set_bind_group(1, &prim.object_bind_group, &[]);
                pass.set_bind_group(2, &prim.material_bind_group, &[]);
                pass.set_vertex_buffer(0, prim.vertex_buffer.slice(..));
                pass.set_index_buffer(prim.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..prim.index_count, 0, 0..1);
            }

            if let Some(overlay) = &self.overlay {
                overlay.draw(&mut pass, &ctx.queue, ctx.size());
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// Collects camera and light state into the per-frame uniform block.
fn gather_globals(scene: &Scene) -> GlobalUniforms {
    let mut globals = GlobalUniforms::zeroed();

    if let Some(camera) = scene.active_camera_component() {
        globals.view_proj = camera.view_projection().to_cols_array_2d();
    }
    if let Some(node) = scene.active_camera.and_then(|h| scene.get_node(h)) {
        let pos: Vec3 = node.transform.world_matrix.translation.into();
        globals.camera_pos = pos.extend(1.0).to_array();
    }

    let mut dir_count = 0_usize;
    for (light, world) in scene.iter_lights() {
        match &light.kind {
            LightKind::Hemisphere(hemi) => {
                globals.hemi_sky = light.color.extend(light.intensity).to_array();
                globals.hemi_ground = hemi.ground_color.extend(0.0).to_array();
            }
            LightKind::Directional(dir) => {
                if dir_count >= MAX_DIRECTIONAL_LIGHTS {
                    continue;
                }
                let position: Vec3 = world.translation.into();
                let target: Vec3 = dir
                    .target
                    .and_then(|t| scene.get_node(t))
                    .map_or(position + Vec3::NEG_Y, |n| {
                        n.transform.world_matrix.translation.into()
                    });
                let direction = (target - position).normalize_or(Vec3::NEG_Y);
                globals.light_dirs[dir_count] = direction.extend(0.0).to_array();
                globals.light_colors[dir_count] = light.color.extend(light.intensity).to_array();
                dir_count += 1;
            }
        }
    }
    globals.light_count[0] = dir_count as u32;

    globals
}

fn upload_primitive(
    ctx: &WgpuContext,
    object_layout: &wgpu::BindGroupLayout,
    material_layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    white: &wgpu::TextureView,
    primitive: &Primitive,
    node: NodeHandle,
    skin: Option<SkeletonKey>,
    joint_count: usize,
) -> GpuPrimitive {
    let device = &ctx.device;

    let vertices: Vec<Vertex> = (0..primitive.vertex_count())
        .map(|i| Vertex {
            position: primitive.positions[i],
            normal: primitive.normals[i],
            uv: primitive.uvs[i],
            joints: primitive.joints[i],
            weights: primitive.weights[i],
        })
        .collect();

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Primitive Vertices"),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Primitive Indices"),
        contents: bytemuck::cast_slice(&primitive.indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    let object_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Object Uniforms"),
        contents: bytemuck::bytes_of(&ObjectUniforms {
            model: Mat4::IDENTITY.to_cols_array_2d(),
        }),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let identity_palette = vec![Mat4::IDENTITY; joint_count.max(1)];
    let joints_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Joint Palette"),
        contents: bytemuck::cast_slice(&identity_palette),
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
    });

    let object_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Object Bind Group"),
        layout: object_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: object_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: joints_buffer.as_entire_binding(),
            },
        ],
    });

    let material_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Material Uniforms"),
        contents: bytemuck::bytes_of(&MaterialUniforms {
            base_color: primitive.material.base_color_factor,
        }),
        usage: wgpu::BufferUsages::UNIFORM,
    });

    let texture_view = primitive
        .material
        .base_color_image
        .as_ref()
        .map(|image| create_texture(device, &ctx.queue, image, "Base Color Texture"));

    let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Material Bind Group"),
        layout: material_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: material_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(
                    texture_view.as_ref().unwrap_or(white),
                ),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    GpuPrimitive {
        vertex_buffer,
        index_buffer,
        index_count: primitive.indices.len() as u32,
        object_buffer,
        joints_buffer,
        object_bind_group,
        material_bind_group,
        node,
        skin,
    }
}

/// Uploads RGBA8 pixels as an sRGB texture.
pub(crate) fn create_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &ImageData,
    label: &str,
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: image.width,
        height: image.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &image.rgba8,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width),
            rows_per_image: Some(image.height),
        },
        size,
    );

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
