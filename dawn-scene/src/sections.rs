//! Per-chunk decoders.
//!
//! Each decoder turns one chunk payload into flat records that still refer to
//! each other by raw integer index. Nothing here checks cross-references;
//! that is the resolver's job.

use glam::Vec3;

use crate::cursor::ByteCursor;
use crate::error::{Result, SceneError};
use crate::format::{
    ChunkTag, ComponentType, ObjectType, SemanticType, ACCESSOR_RECORD_SIZE, MESH_RECORD_SIZE,
    OBJECT_RECORD_SIZE,
};
use crate::scene::Buffer;
use crate::transform::{Bivector3, Rotor3, Transform};

// ── Records ──

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessorRecord {
    pub byte_count: u32,
    pub byte_index: u32,
    pub byte_stride: u16,
    pub buffer_index: u16,
    pub component_count: u8,
    pub component_type: ComponentType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttributeRecord {
    pub accessor_index: u16,
    pub semantic: SemanticType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexLayoutRecord {
    pub attributes: Vec<VertexAttributeRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshRecord {
    pub index_accessor_index: u16,
    pub material_index: u16,
    pub vertex_layout_index: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectRecord {
    pub content_index: u16,
    pub object_type: ObjectType,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransformNodeRecord {
    pub transform: Transform,
    pub object_index: u16,
    pub child_indices: Vec<u16>,
}

// ── Decoders ──

/// Record count for fixed-size records, rejecting a ragged tail.
fn fixed_record_count(c: &ByteCursor, chunk: ChunkTag, record_size: usize) -> Result<usize> {
    let len = c.remaining();
    if len % record_size != 0 {
        return Err(SceneError::malformed(
            chunk,
            len / record_size,
            "chunk byte count",
            format!("{len} is not a multiple of the {record_size}-byte record size"),
        ));
    }
    Ok(len / record_size)
}

/// BUFF: u16 count, then (u32 byte count, raw bytes) per buffer.
pub(crate) fn decode_buffers(c: &mut ByteCursor, out: &mut Vec<Buffer>) -> Result<()> {
    let count = c.read_u16()? as usize;
    out.reserve(count);
    for _ in 0..count {
        let byte_count = c.read_u32()? as usize;
        let bytes = c.read_bytes(byte_count)?;
        out.push(Buffer::new(bytes));
    }
    Ok(())
}

/// ACCE: 14-byte records, count derived from the chunk length.
pub(crate) fn decode_accessors(c: &mut ByteCursor, out: &mut Vec<AccessorRecord>) -> Result<()> {
    let count = fixed_record_count(c, ChunkTag::ACCESSORS, ACCESSOR_RECORD_SIZE)?;
    out.reserve(count);
    for _ in 0..count {
        let record = out.len();
        let byte_count = c.read_u32()?;
        let byte_index = c.read_u32()?;
        let byte_stride = c.read_u16()?;
        let buffer_index = c.read_u16()?;
        let component_count = c.read_u8()?;
        let raw_type = c.read_u8()?;

        let malformed = |field: &'static str, reason: String| SceneError::MalformedAccessor {
            record,
            field,
            reason,
        };
        if byte_count == 0 {
            return Err(malformed("byteCount", "is zero".into()));
        }
        if byte_stride == 0 {
            return Err(malformed("byteStride", "is zero".into()));
        }
        if component_count == 0 {
            return Err(malformed("componentCount", "is zero".into()));
        }
        let component_type = ComponentType::from_raw(raw_type)
            .ok_or_else(|| malformed("componentType", format!("has unrecognized value {raw_type}")))?;
        let element_size = component_count as usize * component_type.size();
        if element_size > byte_stride as usize {
            return Err(malformed(
                "byteStride",
                format!("{byte_stride} is smaller than the {element_size}-byte element"),
            ));
        }

        out.push(AccessorRecord {
            byte_count,
            byte_index,
            byte_stride,
            buffer_index,
            component_count,
            component_type,
        });
    }
    Ok(())
}

/// VERT: u16 layout count; per layout a u16 attribute count and
/// (u16 accessor index, u8 semantic) pairs.
pub(crate) fn decode_vertex_layouts(
    c: &mut ByteCursor,
    out: &mut Vec<VertexLayoutRecord>,
) -> Result<()> {
    let count = c.read_u16()? as usize;
    out.reserve(count);
    for _ in 0..count {
        let record = out.len();
        let attribute_count = c.read_u16()? as usize;
        if attribute_count == 0 {
            return Err(SceneError::malformed(
                ChunkTag::VERTEX_LAYOUTS,
                record,
                "attributeCount",
                "is zero",
            ));
        }
        let mut attributes = Vec::with_capacity(attribute_count);
        for _ in 0..attribute_count {
            let accessor_index = c.read_u16()?;
            let raw = c.read_u8()?;
            let semantic = SemanticType::from_raw(raw).ok_or(SceneError::InvalidEnumValue {
                chunk: ChunkTag::VERTEX_LAYOUTS,
                record,
                field: "semanticType",
                value: raw,
            })?;
            attributes.push(VertexAttributeRecord {
                accessor_index,
                semantic,
            });
        }
        out.push(VertexLayoutRecord { attributes });
    }
    Ok(())
}

/// MESH: 6-byte records.
pub(crate) fn decode_meshes(c: &mut ByteCursor, out: &mut Vec<MeshRecord>) -> Result<()> {
    let count = fixed_record_count(c, ChunkTag::MESHES, MESH_RECORD_SIZE)?;
    out.reserve(count);
    for _ in 0..count {
        out.push(MeshRecord {
            index_accessor_index: c.read_u16()?,
            material_index: c.read_u16()?,
            vertex_layout_index: c.read_u16()?,
        });
    }
    Ok(())
}

/// OBJE: 4-byte records, the last byte reserved.
pub(crate) fn decode_objects(c: &mut ByteCursor, out: &mut Vec<ObjectRecord>) -> Result<()> {
    let count = fixed_record_count(c, ChunkTag::OBJECTS, OBJECT_RECORD_SIZE)?;
    out.reserve(count);
    for _ in 0..count {
        let record = out.len();
        let content_index = c.read_u16()?;
        let raw = c.read_u8()?;
        c.skip_bytes(1)?;
        let object_type = ObjectType::from_raw(raw).ok_or(SceneError::InvalidEnumValue {
            chunk: ChunkTag::OBJECTS,
            record,
            field: "objectType",
            value: raw,
        })?;
        out.push(ObjectRecord {
            content_index,
            object_type,
        });
    }
    Ok(())
}

/// TRAN: u16 count; per node a rotor, position, scale, object index and a
/// counted list of child indices.
pub(crate) fn decode_transform_nodes(
    c: &mut ByteCursor,
    out: &mut Vec<TransformNodeRecord>,
) -> Result<()> {
    let count = c.read_u16()? as usize;
    out.reserve(count);
    for _ in 0..count {
        let r = c.read_f32_array(4)?;
        let p = c.read_f32_array(3)?;
        let s = c.read_f32_array(3)?;
        let object_index = c.read_u16()?;
        let child_count = c.read_u16()? as usize;
        let child_indices = c.read_u16_array(child_count)?;

        out.push(TransformNodeRecord {
            transform: Transform {
                orientation: Rotor3::new(r[0], Bivector3::new(r[1], r[2], r[3])),
                position: Vec3::new(p[0], p[1], p[2]),
                scale: Vec3::new(s[0], s[1], s[2]),
            },
            object_index,
            child_indices,
        });
    }
    Ok(())
}
