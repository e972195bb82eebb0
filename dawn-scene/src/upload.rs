//! GPU-ready byte blobs and the narrow interface used to hand them over.
//!
//! Nothing in this crate creates GPU objects. A renderer implements
//! [`BufferFactory`] and feeds it the [`BufferUpload`]s built here.

use crate::error::{Result, SceneError};
use crate::format::ComponentType;
use crate::scene::{Mesh, Scene};
use crate::transcode::transcode_vertices;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferUsage {
    Static,
    Dynamic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferFormat {
    IndexBuffer,
    VertexBuffer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexFormat {
    Uint16,
    Uint32,
}

impl IndexFormat {
    pub fn size(self) -> usize {
        match self {
            IndexFormat::Uint16 => 2,
            IndexFormat::Uint32 => 4,
        }
    }
}

/// Contents plus usage and format hints for one GPU buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct BufferUpload {
    pub content: Vec<u8>,
    pub usage: BufferUsage,
    pub format: BufferFormat,
}

/// Creates GPU buffers from uploads and returns opaque handles.
pub trait BufferFactory {
    type Handle;
    type Error;

    fn create_buffer(&mut self, upload: &BufferUpload) -> std::result::Result<Self::Handle, Self::Error>;
}

/// A mesh's index list packed tightly as little-endian integers.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexData {
    pub bytes: Vec<u8>,
    pub format: IndexFormat,
    pub count: usize,
}

/// Gathers the mesh's strided index accessor into a packed index list.
pub fn extract_indices(mesh: &Mesh) -> Result<IndexData> {
    let accessor = &mesh.index_accessor;
    let format = match (accessor.component_type, accessor.component_count) {
        (ComponentType::Uint16, 1) => IndexFormat::Uint16,
        (ComponentType::Uint32, 1) => IndexFormat::Uint32,
        (component_type, component_count) => {
            return Err(SceneError::UnsupportedConversion {
                component_type,
                component_count,
                target: "index buffer",
            })
        }
    };

    let count = accessor.element_count();
    let mut bytes = Vec::with_capacity(count * format.size());
    for element in accessor.elements() {
        bytes.extend_from_slice(element);
    }
    Ok(IndexData {
        bytes,
        format,
        count,
    })
}

/// Everything needed to draw one mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshUpload {
    pub vertices: BufferUpload,
    pub indices: BufferUpload,
    pub index_format: IndexFormat,
    pub index_count: usize,
    pub vertex_count: usize,
}

impl MeshUpload {
    pub fn from_mesh(mesh: &Mesh) -> Result<Self> {
        let vertices = transcode_vertices(&mesh.vertex_layout)?;
        let indices = extract_indices(mesh)?;
        Ok(Self {
            vertex_count: vertices.vertex_count(),
            vertices: BufferUpload {
                content: vertices.as_bytes().to_vec(),
                usage: BufferUsage::Static,
                format: BufferFormat::VertexBuffer,
            },
            index_format: indices.format,
            index_count: indices.count,
            indices: BufferUpload {
                content: indices.bytes,
                usage: BufferUsage::Static,
                format: BufferFormat::IndexBuffer,
            },
        })
    }

    /// Hands both buffers to `factory`, vertices first.
    pub fn create<F: BufferFactory>(
        &self,
        factory: &mut F,
    ) -> std::result::Result<(F::Handle, F::Handle), F::Error> {
        let vertices = factory.create_buffer(&self.vertices)?;
        let indices = factory.create_buffer(&self.indices)?;
        Ok((vertices, indices))
    }
}

/// Uploads for every mesh in the scene, in mesh order.
pub fn scene_uploads(scene: &Scene) -> Result<Vec<MeshUpload>> {
    scene
        .meshes()
        .iter()
        .map(|mesh| MeshUpload::from_mesh(mesh))
        .collect()
}
