//! Reader, resolver and vertex transcoder for DWNSCENE scene files.
//!
//! A file is decoded in two steps. [`decode_records`] reads the chunk
//! container into flat records linked by integer index, and [`resolve`] turns
//! those into an immutable [`Scene`] graph. [`deserialize`] does both.
//! Meshes are then turned into GPU-ready blobs with [`transcode_vertices`] or
//! [`MeshUpload`].

mod container;
mod cursor;
mod error;
mod format;
mod resolve;
mod scene;
mod sections;
mod transcode;
mod transform;
mod upload;
mod writer;

pub use container::{decode_file, decode_records, read_file_header, ChunkInfo, DecodedFile, FileHeader, SceneRecords};
pub use cursor::ByteCursor;
pub use error::{IndexKind, Result, SceneError};
pub use format::{
    ChunkTag, ComponentType, ObjectType, SemanticType, ACCESSOR_RECORD_SIZE, CHUNK_HEADER_SIZE,
    FILE_HEADER_SIZE, FILE_TAG, FILE_VERSION, MESH_RECORD_SIZE, OBJECT_RECORD_SIZE,
};
pub use resolve::resolve;
pub use scene::{
    Accessor, Ancestors, Buffer, DepthFirst, Mesh, NodeId, Object, Scene, TransformNode,
    VertexAttribute, VertexLayout,
};
pub use sections::{
    AccessorRecord, MeshRecord, ObjectRecord, TransformNodeRecord, VertexAttributeRecord,
    VertexLayoutRecord,
};
pub use transcode::{
    pack_snorm, pack_unorm, transcode_vertices, unpack_snorm, SurfaceVertex, TranscodedVertices,
    SURFACE_VERTEX_STRIDE,
};
pub use transform::{Bivector3, Rotor3, Transform};
pub use upload::{
    extract_indices, scene_uploads, BufferFactory, BufferFormat, BufferUpload, BufferUsage,
    IndexData, IndexFormat, MeshUpload,
};
pub use writer::SceneWriter;

/// Decodes and resolves a complete file.
///
/// Fails without returning any partial scene if the container is malformed
/// or any cross-reference does not resolve.
pub fn deserialize(data: &[u8]) -> Result<Scene> {
    let records = decode_records(data)?;
    resolve(records)
}
