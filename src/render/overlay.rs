//! Photo preview overlay.
//!
//! Draws the user-chosen photo as a textured quad in the top-left corner of
//! the frame, after the scene has been rendered. Inactive until a photo is
//! installed via [`OverlayPass::set_photo`].

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::render::create_texture;
use crate::scene::ImageData;

/// Fraction of the surface width the overlay occupies.
const OVERLAY_WIDTH_RATIO: f32 = 0.25;
const OVERLAY_MARGIN_PX: f32 = 16.0;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct OverlayRect {
    rect: [f32; 4],
}

pub struct OverlayPass {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    rect_buffer: wgpu::Buffer,
    photo: Option<Photo>,
}

struct Photo {
    bind_group: wgpu::BindGroup,
    aspect: f32,
}

impl OverlayPass {
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        msaa_samples: u32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Overlay Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/overlay.wgsl").into()),
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Overlay Layout"),
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Overlay Pipeline Layout"),
            bind_group_layouts: &[&layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Overlay Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: msaa_samples,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview_mask: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Overlay Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            ..Default::default()
        });

        let rect_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Rect"),
            contents: bytemuck::bytes_of(&OverlayRect::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            pipeline,
            layout,
            sampler,
            rect_buffer,
            photo: None,
        }
    }

    /// Replaces the current photo. Subsequent frames draw the new image.
    pub fn set_photo(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, image: &ImageData) {
        let view = create_texture(device, queue, image, "Photo Texture");
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Overlay Bind Group"),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.rect_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        self.photo = Some(Photo {
            bind_group,
            aspect: image.height as f32 / image.width.max(1) as f32,
        });
        log::info!("Photo preview updated ({}x{})", image.width, image.height);
    }

    /// Records the overlay draw. No-op while no photo is set.
    pub fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        queue: &wgpu::Queue,
        surface_size: (u32, u32),
    ) {
        let Some(photo) = &self.photo else {
            return;
        };

        let (sw, sh) = (surface_size.0 as f32, surface_size.1 as f32);
        if sw <= 0.0 || sh <= 0.0 {
            return;
        }

        let width_px = sw * OVERLAY_WIDTH_RATIO;
        let height_px = width_px * photo.aspect;

        let w = 2.0 * width_px / sw;
        let h = 2.0 * height_px / sh;
        let x = -1.0 + 2.0 * OVERLAY_MARGIN_PX / sw;
        let y = 1.0 - 2.0 * OVERLAY_MARGIN_PX / sh - h;

        queue.write_buffer(
            &self.rect_buffer,
            0,
            bytemuck::bytes_of(&OverlayRect {
                rect: [x, y, w, h],
            }),
        );

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &photo.bind_group, &[]);
        pass.draw(0..6, 0..1);
    }
}
