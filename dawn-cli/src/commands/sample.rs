use std::path::PathBuf;

use anyhow::Context;
use dawn_scene::{
    AccessorRecord, Buffer, ComponentType, MeshRecord, ObjectRecord, ObjectType, SceneRecords,
    SemanticType, Transform, TransformNodeRecord, VertexAttributeRecord, VertexLayoutRecord,
};

const POSITIONS: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
const NORMALS: [f32; 9] = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
const COLORS: [u8; 12] = [255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255];
const INDICES: [u16; 3] = [0, 1, 2];

fn accessor(
    byte_index: usize,
    byte_count: usize,
    byte_stride: u16,
    component_count: u8,
    component_type: ComponentType,
) -> AccessorRecord {
    AccessorRecord {
        byte_count: byte_count as u32,
        byte_index: byte_index as u32,
        byte_stride,
        buffer_index: 0,
        component_count,
        component_type,
    }
}

/// One RGB triangle in the z = 0 plane, facing +z. All attributes share a
/// single buffer.
pub fn sample_records() -> SceneRecords {
    let mut bytes = Vec::new();
    let positions = bytes.len();
    bytes.extend(POSITIONS.iter().flat_map(|v| v.to_le_bytes()));
    let normals = bytes.len();
    bytes.extend(NORMALS.iter().flat_map(|v| v.to_le_bytes()));
    let colors = bytes.len();
    bytes.extend_from_slice(&COLORS);
    let indices = bytes.len();
    bytes.extend(INDICES.iter().flat_map(|v| v.to_le_bytes()));

    SceneRecords {
        buffers: vec![Buffer::new(bytes)],
        accessors: vec![
            accessor(positions, 36, 12, 3, ComponentType::Float32),
            accessor(normals, 36, 12, 3, ComponentType::Float32),
            accessor(colors, 12, 4, 4, ComponentType::Uint8),
            accessor(indices, 6, 2, 1, ComponentType::Uint16),
        ],
        vertex_layouts: vec![VertexLayoutRecord {
            attributes: [
                (0, SemanticType::Position),
                (1, SemanticType::Normal),
                (2, SemanticType::Color),
            ]
            .into_iter()
            .map(|(accessor_index, semantic)| VertexAttributeRecord {
                accessor_index,
                semantic,
            })
            .collect(),
        }],
        meshes: vec![MeshRecord {
            index_accessor_index: 3,
            material_index: 0,
            vertex_layout_index: 0,
        }],
        objects: vec![ObjectRecord {
            content_index: 0,
            object_type: ObjectType::Mesh,
        }],
        transform_nodes: vec![TransformNodeRecord {
            transform: Transform::IDENTITY,
            object_index: 0,
            child_indices: Vec::new(),
        }],
    }
}

pub async fn run(file: PathBuf) -> anyhow::Result<()> {
    let bytes = sample_records().encode().context("failed to encode sample scene")?;
    tokio::fs::write(&file, &bytes)
        .await
        .with_context(|| format!("failed to write {}", file.display()))?;
    println!("Wrote sample scene: {} ({} bytes)", file.display(), bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dawn_scene::{deserialize, scene_uploads};

    #[test]
    fn test_sample_scene_loads_and_transcodes() {
        let bytes = sample_records().encode().unwrap();
        let scene = deserialize(&bytes).unwrap();
        assert_eq!(scene.roots().len(), 1);

        let uploads = scene_uploads(&scene).unwrap();
        assert_eq!(uploads[0].vertex_count, 3);
        assert_eq!(uploads[0].index_count, 3);
        // First vertex: red, normal +z.
        assert_eq!(&uploads[0].vertices.content[12..20], &[0, 0, 127, 0, 255, 0, 0, 255]);
    }
}
