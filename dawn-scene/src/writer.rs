//! Encoder for version-1 scene files.

use crate::container::SceneRecords;
use crate::error::{Result, SceneError};
use crate::format::{ChunkTag, FILE_HEADER_SIZE, FILE_TAG, FILE_VERSION};
use crate::sections::{
    AccessorRecord, MeshRecord, ObjectRecord, TransformNodeRecord, VertexLayoutRecord,
};

fn count_u16(what: &'static str, count: usize) -> Result<u16> {
    u16::try_from(count).map_err(|_| SceneError::CountOverflow {
        what,
        count,
        limit: u16::MAX as usize,
    })
}

fn count_u32(what: &'static str, count: usize) -> Result<u32> {
    u32::try_from(count).map_err(|_| SceneError::CountOverflow {
        what,
        count,
        limit: u32::MAX as usize,
    })
}

/// Accumulates chunks and produces the finished file.
#[derive(Debug, Default)]
pub struct SceneWriter {
    content: Vec<u8>,
}

impl SceneWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one chunk verbatim. Readers skip tags they do not know, so
    /// this is also how extension data gets into a file.
    pub fn write_chunk(&mut self, tag: ChunkTag, payload: &[u8]) -> Result<()> {
        let len = count_u32("chunk bytes", payload.len())?;
        self.content.extend_from_slice(&tag.0);
        self.content.extend_from_slice(&len.to_le_bytes());
        self.content.extend_from_slice(payload);
        log::trace!("wrote {tag} chunk ({len} bytes)");
        Ok(())
    }

    /// Writes every non-empty record list as one chunk, in dependency order.
    pub fn write_records(&mut self, records: &SceneRecords) -> Result<()> {
        if !records.buffers.is_empty() {
            let mut p = Vec::new();
            p.extend_from_slice(&count_u16("buffers", records.buffers.len())?.to_le_bytes());
            for buffer in &records.buffers {
                p.extend_from_slice(&count_u32("buffer bytes", buffer.len())?.to_le_bytes());
                p.extend_from_slice(buffer.as_bytes());
            }
            self.write_chunk(ChunkTag::BUFFERS, &p)?;
        }
        if !records.accessors.is_empty() {
            let mut p = Vec::new();
            for a in &records.accessors {
                encode_accessor(&mut p, a);
            }
            self.write_chunk(ChunkTag::ACCESSORS, &p)?;
        }
        if !records.vertex_layouts.is_empty() {
            let p = encode_vertex_layouts(&records.vertex_layouts)?;
            self.write_chunk(ChunkTag::VERTEX_LAYOUTS, &p)?;
        }
        if !records.meshes.is_empty() {
            let mut p = Vec::new();
            for m in &records.meshes {
                encode_mesh(&mut p, m);
            }
            self.write_chunk(ChunkTag::MESHES, &p)?;
        }
        if !records.objects.is_empty() {
            let mut p = Vec::new();
            for o in &records.objects {
                encode_object(&mut p, o);
            }
            self.write_chunk(ChunkTag::OBJECTS, &p)?;
        }
        if !records.transform_nodes.is_empty() {
            let p = encode_transform_nodes(&records.transform_nodes)?;
            self.write_chunk(ChunkTag::TRANSFORM_NODES, &p)?;
        }
        Ok(())
    }

    /// Prepends the file header.
    pub fn finish(self) -> Result<Vec<u8>> {
        let content_len = count_u32("content bytes", self.content.len())?;
        let mut out = Vec::with_capacity(FILE_HEADER_SIZE + self.content.len());
        out.extend_from_slice(&FILE_TAG);
        out.extend_from_slice(&FILE_VERSION.to_le_bytes());
        out.extend_from_slice(&content_len.to_le_bytes());
        out.extend_from_slice(&self.content);
        Ok(out)
    }
}

impl SceneRecords {
    /// Encodes these records as a complete file.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut writer = SceneWriter::new();
        writer.write_records(self)?;
        writer.finish()
    }
}

fn encode_accessor(p: &mut Vec<u8>, a: &AccessorRecord) {
    p.extend_from_slice(&a.byte_count.to_le_bytes());
    p.extend_from_slice(&a.byte_index.to_le_bytes());
    p.extend_from_slice(&a.byte_stride.to_le_bytes());
    p.extend_from_slice(&a.buffer_index.to_le_bytes());
    p.push(a.component_count);
    p.push(a.component_type as u8);
}

fn encode_vertex_layouts(layouts: &[VertexLayoutRecord]) -> Result<Vec<u8>> {
    let mut p = Vec::new();
    p.extend_from_slice(&count_u16("vertex layouts", layouts.len())?.to_le_bytes());
    for layout in layouts {
        p.extend_from_slice(&count_u16("vertex attributes", layout.attributes.len())?.to_le_bytes());
        for attribute in &layout.attributes {
            p.extend_from_slice(&attribute.accessor_index.to_le_bytes());
            p.push(attribute.semantic as u8);
        }
    }
    Ok(p)
}

fn encode_mesh(p: &mut Vec<u8>, m: &MeshRecord) {
    p.extend_from_slice(&m.index_accessor_index.to_le_bytes());
    p.extend_from_slice(&m.material_index.to_le_bytes());
    p.extend_from_slice(&m.vertex_layout_index.to_le_bytes());
}

fn encode_object(p: &mut Vec<u8>, o: &ObjectRecord) {
    p.extend_from_slice(&o.content_index.to_le_bytes());
    p.push(o.object_type as u8);
    p.push(0);
}

fn encode_transform_nodes(nodes: &[TransformNodeRecord]) -> Result<Vec<u8>> {
    let mut p = Vec::new();
    p.extend_from_slice(&count_u16("transform nodes", nodes.len())?.to_le_bytes());
    for node in nodes {
        let t = &node.transform;
        let r = t.orientation;
        let floats = [
            r.scalar,
            r.bivector.xy,
            r.bivector.xz,
            r.bivector.yz,
            t.position.x,
            t.position.y,
            t.position.z,
            t.scale.x,
            t.scale.y,
            t.scale.z,
        ];
        for f in floats {
            p.extend_from_slice(&f.to_le_bytes());
        }
        p.extend_from_slice(&node.object_index.to_le_bytes());
        p.extend_from_slice(&count_u16("child indices", node.child_indices.len())?.to_le_bytes());
        for child in &node.child_indices {
            p.extend_from_slice(&child.to_le_bytes());
        }
    }
    Ok(p)
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};

    use super::*;
    use crate::container::{decode_file, decode_records};
    use crate::format::{ComponentType, ObjectType, SemanticType};
    use crate::scene::Buffer;
    use crate::sections::VertexAttributeRecord;
    use crate::transform::{Rotor3, Transform};

    fn sample_records() -> SceneRecords {
        SceneRecords {
            buffers: vec![Buffer::new(vec![1u8, 2, 3, 4, 5, 6, 7, 8]), Buffer::new(Vec::new())],
            accessors: vec![AccessorRecord {
                byte_count: 8,
                byte_index: 0,
                byte_stride: 4,
                buffer_index: 0,
                component_count: 2,
                component_type: ComponentType::Uint16,
            }],
            vertex_layouts: vec![VertexLayoutRecord {
                attributes: vec![
                    VertexAttributeRecord {
                        accessor_index: 0,
                        semantic: SemanticType::Position,
                    },
                    VertexAttributeRecord {
                        accessor_index: 0,
                        semantic: SemanticType::Texcoord,
                    },
                ],
            }],
            meshes: vec![MeshRecord {
                index_accessor_index: 0,
                material_index: 7,
                vertex_layout_index: 0,
            }],
            objects: vec![ObjectRecord {
                content_index: 0,
                object_type: ObjectType::Mesh,
            }],
            transform_nodes: vec![
                TransformNodeRecord {
                    transform: Transform {
                        orientation: Rotor3::from_quat(Quat::from_rotation_y(0.5)),
                        position: Vec3::new(1.0, -2.0, 3.5),
                        scale: Vec3::splat(2.0),
                    },
                    object_index: 0,
                    child_indices: vec![1],
                },
                TransformNodeRecord {
                    transform: Transform::IDENTITY,
                    object_index: 0,
                    child_indices: Vec::new(),
                },
            ],
        }
    }

    #[test]
    fn test_round_trip() {
        let records = sample_records();
        let bytes = records.encode().unwrap();
        assert_eq!(decode_records(&bytes).unwrap(), records);
    }

    #[test]
    fn test_chunk_order_and_header() {
        let bytes = sample_records().encode().unwrap();
        assert_eq!(&bytes[..8], b"DWNSCENE");
        let declared = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]) as usize;
        assert_eq!(declared, bytes.len() - FILE_HEADER_SIZE);

        let tags: Vec<ChunkTag> = decode_file(&bytes).unwrap().chunks.iter().map(|c| c.tag).collect();
        assert_eq!(
            tags,
            vec![
                ChunkTag::BUFFERS,
                ChunkTag::ACCESSORS,
                ChunkTag::VERTEX_LAYOUTS,
                ChunkTag::MESHES,
                ChunkTag::OBJECTS,
                ChunkTag::TRANSFORM_NODES,
            ]
        );
    }

    #[test]
    fn test_empty_lists_are_omitted() {
        let bytes = SceneRecords::default().encode().unwrap();
        assert_eq!(bytes.len(), FILE_HEADER_SIZE);
    }

    #[test]
    fn test_extension_chunk_is_skipped_on_read() {
        let mut writer = SceneWriter::new();
        writer.write_chunk(ChunkTag(*b"NOTE"), b"hello").unwrap();
        writer.write_records(&sample_records()).unwrap();
        let file = decode_file(&writer.finish().unwrap()).unwrap();
        assert_eq!(file.chunks[0].tag, ChunkTag(*b"NOTE"));
        assert_eq!(file.records, sample_records());
    }

    #[test]
    fn test_too_many_children() {
        let mut records = sample_records();
        records.transform_nodes[0].child_indices = vec![0; u16::MAX as usize + 1];
        assert!(matches!(
            records.encode(),
            Err(SceneError::CountOverflow { what: "child indices", .. })
        ));
    }
}
