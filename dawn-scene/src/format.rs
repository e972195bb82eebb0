//! DWNSCENE binary format definitions.
//!
//! A file is a 16-byte header followed by tagged, length-prefixed chunks.
//! All multi-byte values are little-endian.

use std::fmt;

/// Tag at the start of every .dwn file.
pub const FILE_TAG: [u8; 8] = *b"DWNSCENE";
pub const FILE_VERSION: u32 = 1;

/// File header: tag (8) + version (4) + content byte count (4).
pub const FILE_HEADER_SIZE: usize = 16;
/// Chunk header: tag (4) + payload byte count (4).
pub const CHUNK_HEADER_SIZE: usize = 8;

pub const ACCESSOR_RECORD_SIZE: usize = 14;
pub const MESH_RECORD_SIZE: usize = 6;
pub const OBJECT_RECORD_SIZE: usize = 4;

/// Four-byte ASCII chunk tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkTag(pub [u8; 4]);

impl ChunkTag {
    pub const BUFFERS: ChunkTag = ChunkTag(*b"BUFF");
    pub const ACCESSORS: ChunkTag = ChunkTag(*b"ACCE");
    pub const VERTEX_LAYOUTS: ChunkTag = ChunkTag(*b"VERT");
    pub const MESHES: ChunkTag = ChunkTag(*b"MESH");
    pub const OBJECTS: ChunkTag = ChunkTag(*b"OBJE");
    pub const TRANSFORM_NODES: ChunkTag = ChunkTag(*b"TRAN");

    pub fn is_known(&self) -> bool {
        matches!(
            *self,
            Self::BUFFERS
                | Self::ACCESSORS
                | Self::VERTEX_LAYOUTS
                | Self::MESHES
                | Self::OBJECTS
                | Self::TRANSFORM_NODES
        )
    }
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkTag({self})")
    }
}

/// Storage type of a single accessor component.
///
/// Integer codes match the exporter's enumeration. Float data always uses
/// code 1; the component count lives in its own field.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Float32 = 1,
    Int8 = 5,
    Int16 = 6,
    Int32 = 7,
    Uint8 = 8,
    Uint16 = 9,
    Uint32 = 10,
}

impl ComponentType {
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Float32),
            5 => Some(Self::Int8),
            6 => Some(Self::Int16),
            7 => Some(Self::Int32),
            8 => Some(Self::Uint8),
            9 => Some(Self::Uint16),
            10 => Some(Self::Uint32),
            _ => None,
        }
    }

    /// Size of one component in bytes.
    pub fn size(self) -> usize {
        match self {
            Self::Int8 | Self::Uint8 => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Float32 | Self::Int32 | Self::Uint32 => 4,
        }
    }
}

/// Meaning of a vertex attribute, independent of how it is stored.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Normal = 1,
    Position = 2,
    Texcoord = 3,
    Color = 4,
}

impl SemanticType {
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Normal),
            2 => Some(Self::Position),
            3 => Some(Self::Texcoord),
            4 => Some(Self::Color),
            _ => None,
        }
    }
}

/// Discriminant of a renderable object record.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Mesh = 1,
}

impl ObjectType {
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Mesh),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_type_codes() {
        for raw in 0..=u8::MAX {
            if let Some(ty) = ComponentType::from_raw(raw) {
                assert_eq!(ty as u8, raw);
            }
        }
        assert_eq!(ComponentType::from_raw(0), None);
        assert_eq!(ComponentType::from_raw(2), None);
        assert_eq!(ComponentType::from_raw(255), None);
        assert_eq!(ComponentType::Uint16.size(), 2);
        assert_eq!(ComponentType::Float32.size(), 4);
    }

    #[test]
    fn test_semantic_and_object_codes() {
        assert_eq!(SemanticType::from_raw(2), Some(SemanticType::Position));
        assert_eq!(SemanticType::from_raw(4), Some(SemanticType::Color));
        assert_eq!(SemanticType::from_raw(0), None);
        assert_eq!(ObjectType::from_raw(1), Some(ObjectType::Mesh));
        assert_eq!(ObjectType::from_raw(2), None);
    }

    #[test]
    fn test_chunk_tag_display() {
        assert_eq!(ChunkTag::TRANSFORM_NODES.to_string(), "TRAN");
        assert_eq!(ChunkTag([b'X', 0, b'Y', 0xff]).to_string(), "X\\x00Y\\xff");
        assert!(ChunkTag::MESHES.is_known());
        assert!(!ChunkTag(*b"LITE").is_known());
    }
}
