use app_core::{project, Camera, BACKGROUND_COLOR, CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR, GLOBE_RADIUS, MARKER_COLOR};
use glam::{Mat4, Vec3};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

const SPHERE_STACKS: u32 = 64;
const SPHERE_SLICES: u32 = 64;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    mvp: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    // rgb tint; w = 1 samples the base texture, 0 uses the flat tint
    tint: [f32; 4],
    light_dir: [f32; 4],
}

/// UV-sphere mesh sharing the projection's orientation, so the
/// equirectangular texture and projected markers line up by construction.
fn build_sphere_mesh(radius: f32) -> (Vec<Vertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(((SPHERE_STACKS + 1) * (SPHERE_SLICES + 1)) as usize);
    for i in 0..=SPHERE_STACKS {
        let v = i as f32 / SPHERE_STACKS as f32;
        let lat = 90.0 - 180.0 * v;
        for j in 0..=SPHERE_SLICES {
            let u = j as f32 / SPHERE_SLICES as f32;
            let long = -180.0 + 360.0 * u;
            let pos = project(lat, long, radius);
            let normal = pos.normalize_or_zero();
            vertices.push(Vertex {
                position: pos.to_array(),
                normal: normal.to_array(),
                uv: [u, v],
            });
        }
    }
    let mut indices = Vec::with_capacity((SPHERE_STACKS * SPHERE_SLICES * 6) as usize);
    let row = SPHERE_SLICES + 1;
    for i in 0..SPHERE_STACKS {
        for j in 0..SPHERE_SLICES {
            let a = i * row + j;
            let b = a + row;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    (vertices, indices)
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,

    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,

    globe_uniforms: wgpu::Buffer,
    marker_uniforms: wgpu::Buffer,
    globe_bind_group: wgpu::BindGroup,
    marker_bind_group: wgpu::BindGroup,

    depth_view: wgpu::TextureView,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
    cam_eye: Vec3,
    marker_model: Option<Mat4>,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, width, height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("globe_shader"),
            source: wgpu::ShaderSource::Wgsl(app_core::GLOBE_WGSL.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globe_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
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
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
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
            label: Some("globe_pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("globe_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x3,
                            offset: 0,
                            shader_location: 0,
                        },
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x3,
                            offset: 12,
                            shader_location: 1,
                        },
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x2,
                            offset: 24,
                            shader_location: 2,
                        },
                    ],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let (vertices, indices) = build_sphere_mesh(GLOBE_RADIUS);
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sphere_vertices"),
            size: (vertices.len() * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sphere_indices"),
            size: (indices.len() * std::mem::size_of::<u32>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&index_buffer, 0, bytemuck::cast_slice(&indices));

        let globe_uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globe_uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let marker_uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("marker_uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("earth_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        // Start on the procedural fallback; the fetched earth texture
        // replaces it when (and if) the load succeeds.
        let (pixels, tex_w, tex_h) = fallback_texture();
        let texture_view = create_base_texture(&device, &queue, &pixels, tex_w, tex_h);
        let (globe_bind_group, marker_bind_group) = create_bind_groups(
            &device,
            &bind_group_layout,
            &globe_uniforms,
            &marker_uniforms,
            &texture_view,
            &sampler,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            bind_group_layout,
            sampler,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            globe_uniforms,
            marker_uniforms,
            globe_bind_group,
            marker_bind_group,
            depth_view,
            width,
            height,
            clear_color: wgpu::Color {
                r: BACKGROUND_COLOR[0] as f64,
                g: BACKGROUND_COLOR[1] as f64,
                b: BACKGROUND_COLOR[2] as f64,
                a: 1.0,
            },
            cam_eye: Vec3::new(0.0, 0.0, GLOBE_RADIUS * app_core::CAMERA_DISTANCE_FACTOR),
            marker_model: None,
        })
    }

    pub fn set_camera(&mut self, eye: Vec3) {
        self.cam_eye = eye;
    }

    pub fn set_marker(&mut self, model: Mat4) {
        self.marker_model = Some(model);
    }

    pub fn set_earth_texture(&mut self, pixels: &[u8], width: u32, height: u32) {
        let view = create_base_texture(&self.device, &self.queue, pixels, width, height);
        let (globe_bg, marker_bg) = create_bind_groups(
            &self.device,
            &self.bind_group_layout,
            &self.globe_uniforms,
            &self.marker_uniforms,
            &view,
            &self.sampler,
        );
        self.globe_bind_group = globe_bg;
        self.marker_bind_group = marker_bg;
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, width, height);
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let camera = Camera {
            eye: self.cam_eye,
            aspect: self.width as f32 / (self.height as f32).max(1.0),
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        };
        let view_proj = camera.projection_matrix() * camera.view_matrix();
        let light_dir = [1.0, 0.0, 1.0, 0.0];

        let globe = Uniforms {
            mvp: view_proj.to_cols_array_2d(),
            model: Mat4::IDENTITY.to_cols_array_2d(),
            tint: [1.0, 1.0, 1.0, 1.0],
            light_dir,
        };
        self.queue
            .write_buffer(&self.globe_uniforms, 0, bytemuck::bytes_of(&globe));
        if let Some(model) = self.marker_model {
            let marker = Uniforms {
                mvp: (view_proj * model).to_cols_array_2d(),
                model: model.to_cols_array_2d(),
                tint: [MARKER_COLOR[0], MARKER_COLOR[1], MARKER_COLOR[2], 0.0],
                light_dir,
            };
            self.queue
                .write_buffer(&self.marker_uniforms, 0, bytemuck::bytes_of(&marker));
        }

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("globe_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            rpass.set_bind_group(0, &self.globe_bind_group, &[]);
            rpass.draw_indexed(0..self.index_count, 0, 0..1);
            if self.marker_model.is_some() {
                rpass.set_bind_group(0, &self.marker_bind_group, &[]);
                rpass.draw_indexed(0..self.index_count, 0, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let depth = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    depth.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_base_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    pixels: &[u8],
    width: u32,
    height: u32,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("earth_texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
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
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_bind_groups(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    globe_uniforms: &wgpu::Buffer,
    marker_uniforms: &wgpu::Buffer,
    texture_view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> (wgpu::BindGroup, wgpu::BindGroup) {
    let make = |label: &str, uniforms: &wgpu::Buffer| {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    };
    (make("globe_bg", globe_uniforms), make("marker_bg", marker_uniforms))
}

/// Flat ocean-blue fallback with a lighter equatorial band, used until the
/// real earth texture loads (or forever, if it never does).
fn fallback_texture() -> (Vec<u8>, u32, u32) {
    let (w, h) = (64u32, 32u32);
    let mut pixels = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        let band = 1.0 - ((y as f32 / h as f32) - 0.5).abs() * 1.2;
        for _ in 0..w {
            pixels.push((20.0 + 30.0 * band) as u8);
            pixels.push((60.0 + 50.0 * band) as u8);
            pixels.push((110.0 + 60.0 * band) as u8);
            pixels.push(255);
        }
    }
    (pixels, w, h)
}

/// Fetch the equirectangular earth texture through an image element and a 2d
/// canvas, returning raw RGBA. `None` on any failure; the caller keeps the
/// fallback texture in that case.
pub async fn load_earth_texture(url: &str) -> Option<(Vec<u8>, u32, u32)> {
    let document = crate::dom::window_document()?;
    let img = web::HtmlImageElement::new().ok()?;
    img.set_cross_origin(Some("anonymous"));
    img.set_src(url);
    if let Err(err) = JsFuture::from(img.decode()).await {
        log::warn!("earth texture load failed: {err:?}");
        return None;
    }
    let width = img.natural_width();
    let height = img.natural_height();
    if width == 0 || height == 0 {
        return None;
    }
    let canvas = document
        .create_element("canvas")
        .ok()?
        .dyn_into::<web::HtmlCanvasElement>()
        .ok()?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx = canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .ok()?;
    ctx.draw_image_with_html_image_element(&img, 0.0, 0.0).ok()?;
    let data = ctx
        .get_image_data(0.0, 0.0, width as f64, height as f64)
        .ok()?;
    Some((data.data().0, width, height))
}
