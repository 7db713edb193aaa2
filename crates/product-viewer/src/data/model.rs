use crate::camera::OrbitCamera;
use crate::data::types::{MeshVertex, ModelGpu, PrimitiveGpu};
use anyhow::{Context, Result};
use glam::{Mat3, Mat4, Vec3};
use gltf::Gltf;
use rayon::prelude::*;
use std::path::Path;
use wgpu::util::DeviceExt;

/// Read a glTF model from disk and upload it to the GPU (one vertex/index
/// buffer pair per primitive, plus the per-frame scene UBO).
///
/// The default scene's node transforms are flattened on the CPU so every
/// vertex reaches the GPU in world space; the material base color is baked
/// into the vertices.
pub fn load_gltf_model(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    camera: &OrbitCamera,
    path: &Path,
    ambient_intensity: f32,
) -> Result<ModelGpu> {
    let gltf = Gltf::open(path)
        .with_context(|| format!("Failed to open glTF file {}", path.display()))?;

    let buffers = load_buffers(&gltf, path)?;

    // Flatten the default scene graph into (mesh, world transform) pairs.
    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .context("glTF file contains no scene")?;

    let mut mesh_nodes = Vec::new();
    for node in scene.nodes() {
        collect_mesh_nodes(&node, Mat4::IDENTITY, &mut mesh_nodes);
    }

    let mut primitives = Vec::new();
    let mut vertex_count = 0usize;

    for (mesh, transform) in &mesh_nodes {
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(buffers[buffer.index()].as_slice()));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .context("Mesh primitive is missing positions")?
                .collect();

            let normals: Vec<[f32; 3]> = match reader.read_normals() {
                Some(normals) => normals.collect(),
                None => vec![[0.0, 1.0, 0.0]; positions.len()],
            };

            let base_color = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_factor();

            let vertices = build_vertices(&positions, &normals, base_color, *transform);

            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..vertices.len() as u32).collect(),
            };

            log::debug!(
                "Primitive: {} vertices, {} indices, base color {:?}",
                vertices.len(),
                indices.len(),
                base_color
            );

            let vtx = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Model Vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let idx = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Model Indices"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });

            vertex_count += vertices.len();
            primitives.push(PrimitiveGpu {
                vtx,
                idx,
                index_count: indices.len() as u32,
            });
        }
    }

    let name = path
        .parent()
        .and_then(|dir| dir.file_name())
        .and_then(|s| s.to_str())
        .unwrap_or("model")
        .to_string();

    log::info!(
        "Loaded model '{}': {} primitives, {} vertices.",
        name,
        primitives.len(),
        vertex_count
    );

    // Initial scene UBO, consistent with the camera at load time; rewritten
    // every frame before drawing.
    let scene_uniform = camera.make_scene_uniform(ambient_intensity);
    let ubo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Scene UBO"),
        contents: bytemuck::bytes_of(&scene_uniform),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let bind = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Scene BindGroup"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: ubo.as_entire_binding(),
        }],
    });

    Ok(ModelGpu {
        name,
        primitives,
        vertex_count,
        ubo,
        bind,
    })
}

/// Resolve every buffer the glTF document references, logging progress as
/// each one arrives.
fn load_buffers(gltf: &Gltf, path: &Path) -> Result<Vec<Vec<u8>>> {
    let total = gltf.buffers().count();
    let mut buffers = Vec::with_capacity(total);

    for (i, buffer) in gltf.buffers().enumerate() {
        let data = match buffer.source() {
            gltf::buffer::Source::Bin => gltf
                .blob
                .as_deref()
                .context("glTF declares an embedded buffer but carries no blob")?
                .to_vec(),
            gltf::buffer::Source::Uri(uri) => {
                let buffer_path = path.parent().unwrap_or(Path::new(".")).join(uri);
                std::fs::read(&buffer_path)
                    .with_context(|| format!("Failed to read buffer {}", buffer_path.display()))?
            }
        };

        log::info!(
            "Loaded buffer {}/{} ({} bytes) for {}",
            i + 1,
            total,
            data.len(),
            path.display()
        );
        buffers.push(data);
    }

    Ok(buffers)
}

/// Depth-first walk accumulating world transforms for every node with a mesh.
fn collect_mesh_nodes<'a>(
    node: &gltf::Node<'a>,
    parent: Mat4,
    out: &mut Vec<(gltf::Mesh<'a>, Mat4)>,
) {
    let transform = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        out.push((mesh, transform));
    }
    for child in node.children() {
        collect_mesh_nodes(&child, transform, out);
    }
}

/// Transforms positions and normals into world space and bakes the base
/// color, producing the final GPU vertices.
fn build_vertices(
    positions: &[[f32; 3]],
    normals: &[[f32; 3]],
    color: [f32; 4],
    transform: Mat4,
) -> Vec<MeshVertex> {
    // Normals transform by the inverse-transpose so non-uniform scale keeps
    // them perpendicular to the surface.
    let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();

    (0..positions.len())
        .into_par_iter()
        .map(|i| {
            let position = transform.transform_point3(Vec3::from(positions[i]));
            let normal = (normal_matrix * Vec3::from(normals[i])).normalize_or_zero();
            MeshVertex {
                position: position.to_array(),
                normal: normal.to_array(),
                color,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn build_vertices_applies_world_transform() {
        let positions = [[1.0, 0.0, 0.0], [0.0, 2.0, 0.0]];
        let normals = [[0.0, 1.0, 0.0], [1.0, 0.0, 0.0]];
        let color = [0.5, 0.25, 0.125, 1.0];
        let transform = Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0));

        let vertices = build_vertices(&positions, &normals, color, transform);

        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[0].position, [1.0, 0.0, -3.0]);
        assert_eq!(vertices[1].position, [0.0, 2.0, -3.0]);
        // Translation must not bend normals.
        assert_eq!(vertices[0].normal, [0.0, 1.0, 0.0]);
        assert_eq!(vertices[0].color, color);
    }

    #[test]
    fn build_vertices_renormalizes_scaled_normals() {
        let positions = [[0.0, 1.0, 0.0]];
        let normals = [[0.0, 1.0, 0.0]];
        let transform = Mat4::from_scale(Vec3::new(1.0, 4.0, 1.0));

        let vertices = build_vertices(&positions, &normals, [1.0; 4], transform);

        let n = Vec3::from(vertices[0].normal);
        assert!((n.length() - 1.0).abs() < EPS);
        assert!(n.abs_diff_eq(Vec3::Y, EPS));
    }
}
