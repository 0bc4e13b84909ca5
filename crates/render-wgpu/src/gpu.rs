use crate::shaders;
use crate::texture::NormalMap;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::path::Path;
use vitrine_camera::OrbitCamera;
use vitrine_scene::{Material, MeshData, Node, NodeKind, Scene};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    ambient: [f32; 4],
    hemi_sky: [f32; 4],
    hemi_ground: [f32; 4],
    sun_dir: [f32; 4],
    sun_color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct MeshUniforms {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    params: [f32; 4],
    flags: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct LineVertex {
    position: [f32; 3],
    color: [f32; 4],
}

fn interleave(mesh: &MeshData) -> Vec<Vertex> {
    mesh.positions
        .iter()
        .zip(&mesh.normals)
        .zip(&mesh.uvs)
        .map(|((p, n), uv)| Vertex {
            position: p.to_array(),
            normal: n.to_array(),
            uv: uv.to_array(),
        })
        .collect()
}

fn mesh_uniforms(node: &Node) -> MeshUniforms {
    let NodeKind::Mesh { material, .. } = &node.kind else {
        unreachable!("mesh draws are built from mesh nodes only");
    };
    let color = material.color();
    let (params, has_map) = match material {
        Material::Standard(m) => ([0.5, 0.0, 0.0, 0.2], m.normal_map.is_some()),
        Material::Physical(m) => (
            [m.roughness, m.metalness, m.clearcoat, m.reflectivity],
            false,
        ),
    };
    MeshUniforms {
        model: node.transform.matrix().to_cols_array_2d(),
        color: [color.r, color.g, color.b, 1.0],
        params,
        flags: [if has_map { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
    }
}

/// Line vertices for the world axes gizmo and the directional light helper.
fn helper_lines(scene: &Scene) -> Vec<LineVertex> {
    let mut verts = Vec::new();
    let mut line = |a: Vec3, b: Vec3, color: [f32; 4]| {
        verts.push(LineVertex {
            position: a.to_array(),
            color,
        });
        verts.push(LineVertex {
            position: b.to_array(),
            color,
        });
    };

    // World axes, 100 units each
    line(Vec3::ZERO, Vec3::X * 100.0, [1.0, 0.0, 0.0, 1.0]);
    line(Vec3::ZERO, Vec3::Y * 100.0, [0.0, 1.0, 0.0, 1.0]);
    line(Vec3::ZERO, Vec3::Z * 100.0, [0.0, 0.0, 1.0, 1.0]);

    for node in scene.nodes() {
        if let NodeKind::LightHelper(helper) = &node.kind {
            let pos = node.transform.position;
            let color = [helper.color.r, helper.color.g, helper.color.b, 1.0];
            let s = helper.size;
            // Cross marking the light position
            line(pos - Vec3::X * s, pos + Vec3::X * s, color);
            line(pos - Vec3::Y * s, pos + Vec3::Y * s, color);
            line(pos - Vec3::Z * s, pos + Vec3::Z * s, color);
            // Aim line toward the target
            let dir = (-pos).normalize_or_zero();
            line(pos, pos + dir * s * 4.0, color);
        }
    }
    verts
}

struct MeshDraw {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// wgpu-based scene renderer.
///
/// All GPU resources are created in `new` and live for the process lifetime;
/// `render` only writes uniforms and records one pass.
pub struct SceneRenderer {
    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    meshes: Vec<MeshDraw>,
    line_vertex_buffer: wgpu::Buffer,
    line_vertex_count: u32,
    depth_texture: wgpu::TextureView,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        scene: &Scene,
        width: u32,
        height: u32,
    ) -> Self {
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals_buffer"),
            contents: bytemuck::bytes_of(&Globals::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bind_group_layout"),
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

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let mesh_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mesh_bind_group_layout"),
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

        let mesh_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[&globals_layout, &mesh_layout],
            push_constant_ranges: &[],
        });

        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MESH_SHADER.into()),
        });

        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&mesh_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &mesh_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x2,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &mesh_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let line_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("line_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::LINE_SHADER.into()),
        });

        let line_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("line_pipeline_layout"),
            bind_group_layouts: &[&globals_layout],
            push_constant_ranges: &[],
        });

        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("line_pipeline"),
            layout: Some(&line_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &line_shader,
                entry_point: Some("vs_line"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LineVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x4,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &line_shader,
                entry_point: Some("fs_line"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("normal_map_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let meshes = scene
            .meshes()
            .map(|node| {
                let NodeKind::Mesh { mesh, material } = &node.kind else {
                    unreachable!("Scene::meshes yields mesh nodes");
                };

                let vertices = interleave(mesh);
                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(node.label),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(node.label),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });

                let normal_map = material
                    .normal_map()
                    .map_or_else(NormalMap::flat, |path| NormalMap::load(Path::new(path)));
                let texture_view = upload_normal_map(device, queue, node.label, &normal_map);

                let uniform_buffer =
                    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(node.label),
                        contents: bytemuck::bytes_of(&mesh_uniforms(node)),
                        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    });

                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(node.label),
                    layout: &mesh_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: uniform_buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::TextureView(&texture_view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::Sampler(&sampler),
                        },
                    ],
                });

                MeshDraw {
                    vertex_buffer,
                    index_buffer,
                    index_count: mesh.indices.len() as u32,
                    uniform_buffer,
                    bind_group,
                }
            })
            .collect();

        let line_verts = helper_lines(scene);
        let line_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("helper_lines"),
            contents: bytemuck::cast_slice(&line_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let depth_texture = create_depth_texture(device, width, height);

        Self {
            mesh_pipeline,
            line_pipeline,
            globals_buffer,
            globals_bind_group,
            meshes,
            line_vertex_buffer,
            line_vertex_count: line_verts.len() as u32,
            depth_texture,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = create_depth_texture(device, width, height);
    }

    /// Render one frame of the scene through the camera.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        scene: &Scene,
        camera: &OrbitCamera,
    ) {
        let ambient = scene
            .ambient()
            .map_or([0.0; 4], |l| l.color.scaled(l.intensity));
        let (hemi_sky, hemi_ground) = scene.hemisphere().map_or(([0.0; 4], [0.0; 4]), |l| {
            (
                l.sky_color.scaled(l.intensity),
                l.ground_color.scaled(l.intensity),
            )
        });
        let (sun_dir, sun_color) = scene.directional().map_or(([0.0; 4], [0.0; 4]), |l| {
            let d = l.direction();
            ([d.x, d.y, d.z, 0.0], l.color.scaled(l.intensity))
        });

        queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals {
                view_proj: camera.view_projection().to_cols_array_2d(),
                camera_pos: [camera.position.x, camera.position.y, camera.position.z, 1.0],
                ambient,
                hemi_sky,
                hemi_ground,
                sun_dir,
                sun_color,
            }),
        );

        // Mesh order is stable, so draws pair with nodes by position
        for (draw, node) in self.meshes.iter().zip(scene.meshes()) {
            queue.write_buffer(
                &draw.uniform_buffer,
                0,
                bytemuck::bytes_of(&mesh_uniforms(node)),
            );
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let bg = scene.background;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg.r as f64,
                            g: bg.g as f64,
                            b: bg.b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.mesh_pipeline);
            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            for draw in &self.meshes {
                pass.set_bind_group(1, &draw.bind_group, &[]);
                pass.set_vertex_buffer(0, draw.vertex_buffer.slice(..));
                pass.set_index_buffer(draw.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..draw.index_count, 0, 0..1);
            }

            pass.set_pipeline(&self.line_pipeline);
            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            pass.set_vertex_buffer(0, self.line_vertex_buffer.slice(..));
            pass.draw(0..self.line_vertex_count, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

fn upload_normal_map(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    map: &NormalMap,
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: map.width,
        height: map.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        // Normal data is not color; keep it linear
        format: wgpu::TextureFormat::Rgba8Unorm,
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
        &map.pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * map.width),
            rows_per_image: Some(map.height),
        },
        size,
    );
    texture.create_view(&Default::default())
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
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
    texture.create_view(&Default::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleave_preserves_counts() {
        let mesh = vitrine_scene::plane(200.0, 200.0);
        let verts = interleave(&mesh);
        assert_eq!(verts.len(), mesh.vertex_count());
        assert_eq!(verts[0].position, mesh.positions[0].to_array());
        assert_eq!(verts[0].normal, mesh.normals[0].to_array());
    }

    #[test]
    fn helper_lines_cover_axes_and_light() {
        let scene = Scene::assemble();
        let verts = helper_lines(&scene);
        // 3 axes + 3 cross segments + 1 aim line, 2 vertices each
        assert_eq!(verts.len(), (3 + 4) * 2);
    }

    #[test]
    fn mesh_uniforms_flag_normal_maps() {
        let scene = Scene::assemble();
        let torus = scene.node("torus_knot").unwrap();
        assert_eq!(mesh_uniforms(torus).flags[0], 1.0);
        let plane = scene.node("ground_plane").unwrap();
        assert_eq!(mesh_uniforms(plane).flags[0], 0.0);
    }

    #[test]
    fn plane_uniforms_carry_material_parameters() {
        let scene = Scene::assemble();
        let plane = scene.node("ground_plane").unwrap();
        let u = mesh_uniforms(plane);
        assert_eq!(u.params, [0.3, 0.46, 0.49, 0.35]);
    }

    #[test]
    fn rotating_mesh_uniforms_track_the_transform() {
        let mut scene = Scene::assemble();
        let before = mesh_uniforms(&scene.nodes()[scene.rotating_index()]).model;
        scene.rotating_transform_mut().rotation = glam::Quat::from_rotation_y(0.5);
        let after = mesh_uniforms(&scene.nodes()[scene.rotating_index()]).model;
        assert_ne!(before, after);
    }
}
