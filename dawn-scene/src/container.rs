use crate::cursor::ByteCursor;
use crate::error::{Result, SceneError};
use crate::format::{ChunkTag, FILE_TAG, FILE_VERSION};
use crate::scene::Buffer;
use crate::sections::{
    self, AccessorRecord, MeshRecord, ObjectRecord, TransformNodeRecord, VertexLayoutRecord,
};

/// Parsed 16-byte file header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileHeader {
    pub version: u32,
    pub content_byte_count: u32,
}

/// Where a chunk sat in the file. Kept for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkInfo {
    pub tag: ChunkTag,
    /// Absolute offset of the chunk payload.
    pub offset: usize,
    pub byte_count: u32,
}

/// Everything a file holds, still linked by raw indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneRecords {
    pub buffers: Vec<Buffer>,
    pub accessors: Vec<AccessorRecord>,
    pub vertex_layouts: Vec<VertexLayoutRecord>,
    pub meshes: Vec<MeshRecord>,
    pub objects: Vec<ObjectRecord>,
    pub transform_nodes: Vec<TransformNodeRecord>,
}

/// A decoded file: header, chunk table and the flat records.
#[derive(Clone, Debug)]
pub struct DecodedFile {
    pub header: FileHeader,
    pub chunks: Vec<ChunkInfo>,
    pub records: SceneRecords,
}

pub fn read_file_header(c: &mut ByteCursor) -> Result<FileHeader> {
    c.set_section("file header");
    let tag: [u8; 8] = c.read_tag()?;
    let version = c.read_u32()?;
    let content_byte_count = c.read_u32()?;

    if tag != FILE_TAG {
        return Err(SceneError::BadMagic { found: tag });
    }
    if version != FILE_VERSION {
        return Err(SceneError::UnsupportedVersion {
            found: version,
            supported: FILE_VERSION,
        });
    }
    if content_byte_count as usize > c.remaining() {
        return Err(SceneError::TruncatedFile {
            declared: content_byte_count,
            available: c.remaining(),
        });
    }

    Ok(FileHeader {
        version,
        content_byte_count,
    })
}

fn section_name(tag: ChunkTag) -> &'static str {
    match tag {
        ChunkTag::BUFFERS => "BUFF chunk",
        ChunkTag::ACCESSORS => "ACCE chunk",
        ChunkTag::VERTEX_LAYOUTS => "VERT chunk",
        ChunkTag::MESHES => "MESH chunk",
        ChunkTag::OBJECTS => "OBJE chunk",
        ChunkTag::TRANSFORM_NODES => "TRAN chunk",
        _ => "unknown chunk",
    }
}

/// Reads the header and every chunk into flat records.
///
/// Each known chunk is decoded from a cursor limited to its own payload, and
/// must consume that payload exactly. Unknown tags are skipped.
pub fn decode_file(data: &[u8]) -> Result<DecodedFile> {
    let mut c = ByteCursor::new(data);
    let header = read_file_header(&mut c)?;

    let mut chunks = Vec::new();
    let mut records = SceneRecords::default();

    while !c.at_end() {
        c.set_section("chunk header");
        let tag = ChunkTag(c.read_tag()?);
        let byte_count = c.read_u32()?;
        let offset = c.offset();

        c.set_section(section_name(tag));
        let payload = c.read_bytes(byte_count as usize)?;
        chunks.push(ChunkInfo {
            tag,
            offset,
            byte_count,
        });

        let mut chunk = ByteCursor::with_base(payload, offset, section_name(tag));
        match tag {
            ChunkTag::BUFFERS => sections::decode_buffers(&mut chunk, &mut records.buffers)?,
            ChunkTag::ACCESSORS => sections::decode_accessors(&mut chunk, &mut records.accessors)?,
            ChunkTag::VERTEX_LAYOUTS => {
                sections::decode_vertex_layouts(&mut chunk, &mut records.vertex_layouts)?
            }
            ChunkTag::MESHES => sections::decode_meshes(&mut chunk, &mut records.meshes)?,
            ChunkTag::OBJECTS => sections::decode_objects(&mut chunk, &mut records.objects)?,
            ChunkTag::TRANSFORM_NODES => {
                sections::decode_transform_nodes(&mut chunk, &mut records.transform_nodes)?
            }
            _ => {
                log::debug!("skipping unknown chunk {tag} ({byte_count} bytes at {offset})");
                continue;
            }
        }
        log::trace!("decoded {tag} chunk ({byte_count} bytes at {offset})");

        if !chunk.at_end() {
            return Err(SceneError::malformed(
                tag,
                0,
                "chunk byte count",
                format!("{} trailing bytes were not consumed", chunk.remaining()),
            ));
        }
    }

    Ok(DecodedFile {
        header,
        chunks,
        records,
    })
}

/// Decodes the flat records of a file without resolving them.
pub fn decode_records(data: &[u8]) -> Result<SceneRecords> {
    decode_file(data).map(|file| file.records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{CHUNK_HEADER_SIZE, FILE_HEADER_SIZE};

    fn build_header(version: u32, content_len: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"DWNSCENE");
        buf.extend_from_slice(&version.to_le_bytes());
        buf.extend_from_slice(&content_len.to_le_bytes());
        buf
    }

    fn build_file(chunks: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
        let mut content = Vec::new();
        for (tag, payload) in chunks {
            content.extend_from_slice(*tag);
            content.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            content.extend_from_slice(payload);
        }
        let mut data = build_header(1, content.len() as u32);
        data.extend_from_slice(&content);
        data
    }

    #[test]
    fn test_empty_file_decodes() {
        let data = build_header(1, 0);
        let file = decode_file(&data).unwrap();
        assert_eq!(file.header.version, 1);
        assert!(file.chunks.is_empty());
        assert_eq!(file.records, SceneRecords::default());
    }

    #[test]
    fn test_bad_magic() {
        let mut data = build_header(1, 0);
        data[0] = b'X';
        assert!(matches!(decode_file(&data), Err(SceneError::BadMagic { .. })));
    }

    #[test]
    fn test_wrong_version() {
        let data = build_header(2, 0);
        assert!(matches!(
            decode_file(&data),
            Err(SceneError::UnsupportedVersion { found: 2, supported: 1 })
        ));
    }

    #[test]
    fn test_header_too_short() {
        let data = build_header(1, 0);
        let err = decode_file(&data[..FILE_HEADER_SIZE - 1]).unwrap_err();
        assert!(matches!(
            err,
            SceneError::UnexpectedEndOfData { section: "file header", .. }
        ));
    }

    #[test]
    fn test_declared_size_exceeds_data() {
        let mut data = build_header(1, 10);
        data.extend_from_slice(&[0; 9]);
        assert!(matches!(
            decode_file(&data),
            Err(SceneError::TruncatedFile { declared: 10, available: 9 })
        ));
    }

    #[test]
    fn test_unknown_chunk_skipped() {
        let objects = vec![0u8, 0, 1, 0];
        let data = build_file(&[(b"LITE", vec![9; 5]), (b"OBJE", objects)]);
        let file = decode_file(&data).unwrap();
        assert_eq!(file.chunks.len(), 2);
        assert_eq!(file.chunks[0].tag, ChunkTag(*b"LITE"));
        assert_eq!(file.chunks[1].offset, FILE_HEADER_SIZE + 8 + 5 + 8);
        assert_eq!(file.records.objects.len(), 1);
    }

    #[test]
    fn test_unknown_chunk_past_end() {
        let mut data = build_file(&[(b"LITE", vec![9; 5])]);
        data.truncate(data.len() - 1);
        let len = (data.len() - FILE_HEADER_SIZE) as u32;
        data[12..16].copy_from_slice(&len.to_le_bytes());
        assert!(matches!(
            decode_file(&data),
            Err(SceneError::UnexpectedEndOfData { .. })
        ));
    }

    #[test]
    fn test_chunk_payload_cannot_run_into_next_chunk() {
        // 4 bytes is less than one mesh record; the following chunk must not
        // be read as its tail.
        let data = build_file(&[(b"MESH", vec![0; 4]), (b"OBJE", vec![0, 0, 1, 0])]);
        assert!(matches!(
            decode_file(&data),
            Err(SceneError::MalformedRecord { chunk: ChunkTag::MESHES, .. })
        ));
    }

    #[test]
    fn test_trailing_bytes_inside_chunk_rejected() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&0u16.to_le_bytes());
        payload.push(0xaa);
        let data = build_file(&[(b"BUFF", payload)]);
        assert!(matches!(
            decode_file(&data),
            Err(SceneError::MalformedRecord { chunk: ChunkTag::BUFFERS, field: "chunk byte count", .. })
        ));
    }

    #[test]
    fn test_repeated_chunks_append() {
        let data = build_file(&[
            (b"OBJE", vec![0, 0, 1, 0]),
            (b"OBJE", vec![1, 0, 1, 0, 2, 0, 1, 0]),
        ]);
        let records = decode_records(&data).unwrap();
        let contents: Vec<u16> = records.objects.iter().map(|o| o.content_index).collect();
        assert_eq!(contents, vec![0, 1, 2]);
    }

    #[test]
    fn test_error_offset_is_absolute() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&1u16.to_le_bytes());
        payload.extend_from_slice(&4u32.to_le_bytes());
        payload.extend_from_slice(&[1, 2]);
        let data = build_file(&[(b"BUFF", payload)]);
        match decode_file(&data).unwrap_err() {
            SceneError::UnexpectedEndOfData { offset, section, .. } => {
                assert_eq!(offset, FILE_HEADER_SIZE + CHUNK_HEADER_SIZE + 6);
                assert_eq!(section, "BUFF chunk");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
