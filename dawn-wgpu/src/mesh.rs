use anyhow::{Context, Result};
use dawn_scene::{
    scene_uploads, BufferFactory, BufferFormat, BufferUpload, BufferUsage, MeshUpload, Scene,
};
use wgpu::util::DeviceExt;

use crate::layout::wgpu_index_format;

/// GPU buffers for one scene mesh.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_format: wgpu::IndexFormat,
    pub index_count: u32,
    pub vertex_count: u32,
}

/// Usage flags for an upload. Dynamic buffers can be rewritten through the queue.
pub fn buffer_usages(upload: &BufferUpload) -> wgpu::BufferUsages {
    let usage = match upload.format {
        BufferFormat::VertexBuffer => wgpu::BufferUsages::VERTEX,
        BufferFormat::IndexBuffer => wgpu::BufferUsages::INDEX,
    };
    match upload.usage {
        BufferUsage::Static => usage,
        BufferUsage::Dynamic => usage | wgpu::BufferUsages::COPY_DST,
    }
}

/// Creates initialized wgpu buffers from scene uploads.
pub struct WgpuBufferFactory<'a> {
    device: &'a wgpu::Device,
}

impl<'a> WgpuBufferFactory<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }
}

impl BufferFactory for WgpuBufferFactory<'_> {
    type Handle = wgpu::Buffer;
    type Error = std::convert::Infallible;

    fn create_buffer(&mut self, upload: &BufferUpload) -> Result<wgpu::Buffer, Self::Error> {
        let label = match upload.format {
            BufferFormat::VertexBuffer => "DWN Surface Vertex Buffer",
            BufferFormat::IndexBuffer => "DWN Index Buffer",
        };
        log::debug!("creating {label} ({} bytes)", upload.content.len());
        Ok(self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: &upload.content,
                usage: buffer_usages(upload),
            }))
    }
}

fn upload_mesh(factory: &mut WgpuBufferFactory<'_>, upload: &MeshUpload) -> Result<GpuMesh> {
    let (vertex_buffer, index_buffer) = upload.create(factory)?;
    Ok(GpuMesh {
        vertex_buffer,
        index_buffer,
        index_format: wgpu_index_format(upload.index_format),
        index_count: u32::try_from(upload.index_count).context("index count exceeds u32")?,
        vertex_count: u32::try_from(upload.vertex_count).context("vertex count exceeds u32")?,
    })
}

/// Transcodes every mesh in `scene` and uploads it, in mesh order.
pub fn upload_scene(device: &wgpu::Device, scene: &Scene) -> Result<Vec<GpuMesh>> {
    let uploads = scene_uploads(scene).context("failed to prepare mesh buffers")?;
    let mut factory = WgpuBufferFactory::new(device);
    let meshes = uploads
        .iter()
        .enumerate()
        .map(|(i, upload)| upload_mesh(&mut factory, upload).with_context(|| format!("mesh {i}")))
        .collect::<Result<Vec<_>>>()?;
    log::info!("uploaded {} meshes", meshes.len());
    Ok(meshes)
}
