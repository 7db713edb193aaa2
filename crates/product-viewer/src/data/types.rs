//! Core data types for the viewer, focused on GPU data representation.

/// Per-vertex data uploaded to the GPU vertex buffer.
/// Must match the vertex inputs in `mesh.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct MeshVertex {
    /// World-space position; node transforms are flattened at load time.
    pub position: [f32; 3],
    /// World-space unit normal.
    pub normal: [f32; 3],
    /// Material base color, baked per vertex.
    pub color: [f32; 4],
}

/// Per-frame scene uniform, respecting std140 layout.
/// Must match the layout of `SceneUniform` in `mesh.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniformStd140 {
    /// Combined view-projection matrix for the current frame.
    pub view_proj: [[f32; 4]; 4],
    /// Unit direction from the scene toward the key light.
    pub light_dir: [f32; 3],
    pub _pad0: f32,
    pub light_color: [f32; 3],
    pub _pad1: f32,
    pub ambient_color: [f32; 3],
    /// Per-preset ambient multiplier.
    pub ambient_intensity: f32,
}

// Compile-time safety check: buffer size must match the WGSL-reflected size.
const _: [(); 112] = [(); core::mem::size_of::<SceneUniformStd140>()];

/// One indexed triangle batch of the model.
#[derive(Debug)]
pub struct PrimitiveGpu {
    /// Vertex buffer containing `MeshVertex` data.
    pub vtx: wgpu::Buffer,
    pub idx: wgpu::Buffer,
    pub index_count: u32,
}

/// Holds all GPU resources and metadata for a loaded model.
#[derive(Debug)]
pub struct ModelGpu {
    pub name: String,
    pub primitives: Vec<PrimitiveGpu>,
    pub vertex_count: usize,

    /// Uniform buffer containing `SceneUniformStd140` data.
    pub ubo: wgpu::Buffer,
    /// Bind group connecting the UBO to the pipeline.
    pub bind: wgpu::BindGroup,
}
