use std::fmt;

use thiserror::Error;

use crate::format::{ChunkTag, ComponentType, SemanticType};

pub type Result<T> = std::result::Result<T, SceneError>;

/// The flat list a cross-reference points into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexKind {
    Buffer,
    Accessor,
    VertexLayout,
    Mesh,
    Object,
    TransformNode,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Buffer => "buffer",
            Self::Accessor => "accessor",
            Self::VertexLayout => "vertex layout",
            Self::Mesh => "mesh",
            Self::Object => "object",
            Self::TransformNode => "transform node",
        };
        f.write_str(name)
    }
}

/// Errors from reading, resolving, transcoding and writing scene files.
///
/// Decoding is all-or-nothing: any of these aborts the whole call and no
/// partially built scene escapes.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("unexpected end of data at byte {offset} in {section}: {what}")]
    UnexpectedEndOfData {
        offset: usize,
        section: &'static str,
        what: String,
    },

    #[error("file tag is {found:?}, expected \"DWNSCENE\"")]
    BadMagic { found: [u8; 8] },

    #[error("format version {found} is not supported (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("header declares {declared} content bytes but only {available} follow")]
    TruncatedFile { declared: u32, available: usize },

    #[error("accessor {record}: {field} {reason}")]
    MalformedAccessor {
        record: usize,
        field: &'static str,
        reason: String,
    },

    #[error("{chunk} record {record}: {field} {reason}")]
    MalformedRecord {
        chunk: ChunkTag,
        record: usize,
        field: &'static str,
        reason: String,
    },

    #[error("{chunk} record {record}: {field} has unrecognized value {value}")]
    InvalidEnumValue {
        chunk: ChunkTag,
        record: usize,
        field: &'static str,
        value: u8,
    },

    #[error("{kind} index {index} is out of bounds (have {bound})")]
    IndexOutOfBounds {
        kind: IndexKind,
        index: usize,
        bound: usize,
    },

    #[error("accessor {accessor} ends at byte {end} but its buffer holds {buffer_len}")]
    AccessorOutOfRange {
        accessor: usize,
        end: usize,
        buffer_len: usize,
    },

    #[error("transform node {child} is claimed by both node {first_parent} and node {second_parent}")]
    DuplicateChild {
        child: usize,
        first_parent: usize,
        second_parent: usize,
    },

    #[error("transform node {node} is its own ancestor")]
    CyclicHierarchy { node: usize },

    #[error("vertex layout {layout}: {semantic:?} attribute has {found} elements, expected {expected}")]
    AttributeLengthMismatch {
        layout: usize,
        semantic: SemanticType,
        expected: usize,
        found: usize,
    },

    #[error("vertex layout has no {semantic:?} attribute")]
    MissingAttribute { semantic: SemanticType },

    #[error("cannot convert {component_count} x {component_type:?} into {target}")]
    UnsupportedConversion {
        component_type: ComponentType,
        component_count: u8,
        target: &'static str,
    },

    #[error("cannot encode {count} {what}: the format allows at most {limit}")]
    CountOverflow {
        what: &'static str,
        count: usize,
        limit: usize,
    },
}

impl SceneError {
    pub(crate) fn malformed(
        chunk: ChunkTag,
        record: usize,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedRecord {
            chunk,
            record,
            field,
            reason: reason.into(),
        }
    }
}
