//! Re-encodes a vertex layout's attribute streams into the fixed surface
//! vertex format uploaded to the GPU.

use bytemuck::{Pod, Zeroable};

use crate::error::{Result, SceneError};
use crate::format::{ComponentType, SemanticType};
use crate::scene::{Accessor, VertexLayout};

/// Byte size of one [`SurfaceVertex`].
pub const SURFACE_VERTEX_STRIDE: usize = 20;

/// One packed vertex: float position, snorm8 normal, unorm8 color.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SurfaceVertex {
    pub position: [f32; 3],
    pub normal: [u8; 4],
    pub color: [u8; 4],
}

const POSITION_TARGET: &str = "Float32x3 position";
const NORMAL_TARGET: &str = "Snorm8x4 normal";
const COLOR_TARGET: &str = "Unorm8x4 color";

/// Color channels a source does not provide.
const COLOR_PADDING: [u8; 4] = [0, 0, 0, 255];

/// Interleaved output of [`transcode_vertices`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TranscodedVertices {
    pub vertices: Vec<SurfaceVertex>,
}

impl TranscodedVertices {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn stride(&self) -> usize {
        SURFACE_VERTEX_STRIDE
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Quantizes a float in [-1, 1] to a signed-normalized byte (two's complement).
pub fn pack_snorm(value: f32) -> u8 {
    (127.5 * value).round().clamp(-128.0, 127.0) as i8 as u8
}

/// Inverse of [`pack_snorm`], to within one quantization step.
pub fn unpack_snorm(byte: u8) -> f32 {
    byte as i8 as f32 / 127.5
}

/// Quantizes a float to an unsigned-normalized byte, clamping to [0, 1] first.
pub fn pack_unorm(value: f32) -> u8 {
    (255.0 * value.clamp(0.0, 1.0)).round() as u8
}

/// Looks up the attribute for `semantic` and checks its storage is one the
/// target accepts.
fn source<'a>(
    layout: &'a VertexLayout,
    semantic: SemanticType,
    target: &'static str,
    accepted: &[ComponentType],
    max_components: u8,
) -> Result<&'a Accessor> {
    let attribute = layout
        .find(semantic)
        .ok_or(SceneError::MissingAttribute { semantic })?;
    let accessor = attribute.accessor.as_ref();
    if !accepted.contains(&accessor.component_type) || accessor.component_count > max_components {
        return Err(SceneError::UnsupportedConversion {
            component_type: accessor.component_type,
            component_count: accessor.component_count,
            target,
        });
    }
    Ok(accessor)
}

fn floats(element: &[u8]) -> impl Iterator<Item = f32> + '_ {
    element
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

fn position(accessor: &Accessor, index: usize) -> [f32; 3] {
    let mut out = [0.0; 3];
    if let Some(element) = accessor.element(index) {
        for (dst, v) in out.iter_mut().zip(floats(element)) {
            *dst = v;
        }
    }
    out
}

fn normal(accessor: &Accessor, index: usize) -> [u8; 4] {
    let mut out = [0; 4];
    let Some(element) = accessor.element(index) else {
        return out;
    };
    match accessor.component_type {
        ComponentType::Float32 => {
            for (dst, v) in out.iter_mut().zip(floats(element)) {
                *dst = pack_snorm(v);
            }
        }
        _ => {
            for (dst, &b) in out.iter_mut().zip(element) {
                *dst = b;
            }
        }
    }
    out
}

fn color(accessor: &Accessor, index: usize) -> [u8; 4] {
    let mut out = COLOR_PADDING;
    let Some(element) = accessor.element(index) else {
        return out;
    };
    match accessor.component_type {
        ComponentType::Float32 => {
            for (dst, v) in out.iter_mut().zip(floats(element)) {
                *dst = pack_unorm(v);
            }
        }
        _ => {
            for (dst, &b) in out.iter_mut().zip(element) {
                *dst = b;
            }
        }
    }
    out
}

/// Interleaves a layout's Position, Normal and Color attributes into
/// [`SurfaceVertex`] records, one per vertex.
///
/// All three attributes are required. Sources with fewer components than the
/// target are padded: zero for position and normal, opaque black for color.
/// Texcoord attributes have no slot in the surface format and are ignored.
pub fn transcode_vertices(layout: &VertexLayout) -> Result<TranscodedVertices> {
    let positions = source(
        layout,
        SemanticType::Position,
        POSITION_TARGET,
        &[ComponentType::Float32],
        3,
    )?;
    let normals = source(
        layout,
        SemanticType::Normal,
        NORMAL_TARGET,
        &[ComponentType::Float32, ComponentType::Int8],
        4,
    )?;
    let colors = source(
        layout,
        SemanticType::Color,
        COLOR_TARGET,
        &[ComponentType::Uint8, ComponentType::Float32],
        4,
    )?;

    let count = layout.element_count();
    let vertices = (0..count)
        .map(|i| SurfaceVertex {
            position: position(positions, i),
            normal: normal(normals, i),
            color: color(colors, i),
        })
        .collect::<Vec<_>>();

    log::trace!("transcoded {count} vertices");
    Ok(TranscodedVertices { vertices })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::scene::{Buffer, VertexAttribute};

    fn accessor(bytes: Vec<u8>, stride: usize, components: u8, ty: ComponentType) -> Arc<Accessor> {
        Arc::new(Accessor {
            byte_count: bytes.len(),
            buffer: Buffer::new(bytes),
            byte_offset: 0,
            byte_stride: stride,
            component_count: components,
            component_type: ty,
        })
    }

    fn f32_bytes(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn layout(attributes: Vec<(SemanticType, Arc<Accessor>)>) -> VertexLayout {
        VertexLayout {
            attributes: attributes
                .into_iter()
                .map(|(semantic, accessor)| VertexAttribute { accessor, semantic })
                .collect(),
        }
    }

    fn two_vertex_layout() -> VertexLayout {
        layout(vec![
            (
                SemanticType::Position,
                accessor(f32_bytes(&[1.0, 2.0, 3.0, -1.0, -2.0, -3.0]), 12, 3, ComponentType::Float32),
            ),
            (
                SemanticType::Normal,
                accessor(f32_bytes(&[0.0, 1.0, 0.0, 0.0, 0.0, -1.0]), 12, 3, ComponentType::Float32),
            ),
            (
                SemanticType::Color,
                accessor(vec![255, 0, 0, 128, 0, 255, 0, 64], 4, 4, ComponentType::Uint8),
            ),
        ])
    }

    #[test]
    fn test_surface_vertex_layout() {
        assert_eq!(std::mem::size_of::<SurfaceVertex>(), SURFACE_VERTEX_STRIDE);
        assert_eq!(std::mem::offset_of!(SurfaceVertex, normal), 12);
        assert_eq!(std::mem::offset_of!(SurfaceVertex, color), 16);
    }

    #[test]
    fn test_transcode_interleaves() {
        let out = transcode_vertices(&two_vertex_layout()).unwrap();
        assert_eq!(out.vertex_count(), 2);
        assert_eq!(out.as_bytes().len(), 2 * SURFACE_VERTEX_STRIDE);
        assert_eq!(
            out.vertices[0],
            SurfaceVertex {
                position: [1.0, 2.0, 3.0],
                normal: [0, 127, 0, 0],
                color: [255, 0, 0, 128],
            }
        );
        assert_eq!(out.vertices[1].normal, [0, 0, 0x80, 0]);
        assert_eq!(out.vertices[1].color, [0, 255, 0, 64]);
        assert_eq!(&out.as_bytes()[20..24], &(-1.0f32).to_le_bytes());
    }

    #[test]
    fn test_strided_sources() {
        // Positions sit in a 16-byte stride with 4 bytes of unrelated data.
        let position = f32_bytes(&[1.0, 1.0, 1.0, 99.0, 2.0, 2.0, 2.0, 99.0]);
        let mut layout = two_vertex_layout();
        layout.attributes[0].accessor = accessor(position, 16, 3, ComponentType::Float32);
        let out = transcode_vertices(&layout).unwrap();
        assert_eq!(out.vertices[1].position, [2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_padding() {
        let layout = layout(vec![
            (SemanticType::Position, accessor(f32_bytes(&[5.0, 6.0]), 8, 2, ComponentType::Float32)),
            (SemanticType::Normal, accessor(vec![100, 156], 2, 2, ComponentType::Int8)),
            (SemanticType::Color, accessor(f32_bytes(&[1.0, 0.5, 2.0]), 12, 3, ComponentType::Float32)),
        ]);
        let v = transcode_vertices(&layout).unwrap().vertices[0];
        assert_eq!(v.position, [5.0, 6.0, 0.0]);
        assert_eq!(v.normal, [100, 156, 0, 0]);
        assert_eq!(v.color, [255, 128, 255, 255]);
    }

    #[test]
    fn test_missing_attribute() {
        let mut layout = two_vertex_layout();
        layout.attributes.retain(|a| a.semantic != SemanticType::Color);
        assert!(matches!(
            transcode_vertices(&layout),
            Err(SceneError::MissingAttribute { semantic: SemanticType::Color })
        ));
    }

    #[test]
    fn test_unsupported_conversions() {
        let mut layout = two_vertex_layout();
        layout.attributes[0].accessor = accessor(vec![0; 12], 6, 3, ComponentType::Int16);
        assert!(matches!(
            transcode_vertices(&layout),
            Err(SceneError::UnsupportedConversion { component_type: ComponentType::Int16, target: POSITION_TARGET, .. })
        ));

        let mut layout = two_vertex_layout();
        layout.attributes[0].accessor =
            accessor(f32_bytes(&[0.0; 8]), 16, 4, ComponentType::Float32);
        assert!(matches!(
            transcode_vertices(&layout),
            Err(SceneError::UnsupportedConversion { component_count: 4, .. })
        ));

        let mut layout = two_vertex_layout();
        layout.attributes[2].accessor = accessor(vec![0; 8], 4, 2, ComponentType::Uint16);
        assert!(matches!(
            transcode_vertices(&layout),
            Err(SceneError::UnsupportedConversion { target: COLOR_TARGET, .. })
        ));
    }

    #[test]
    fn test_texcoord_ignored() {
        let mut layout = two_vertex_layout();
        layout.attributes.push(VertexAttribute {
            accessor: accessor(vec![0; 4], 2, 2, ComponentType::Uint8),
            semantic: SemanticType::Texcoord,
        });
        assert_eq!(transcode_vertices(&layout).unwrap().vertex_count(), 2);
    }

    #[test]
    fn test_snorm_quantization_law() {
        let step = 1.0 / 127.5;
        for i in 0..=2000 {
            let v = -1.0 + i as f32 * 0.001;
            let back = unpack_snorm(pack_snorm(v));
            assert!((back - v).abs() <= step, "{v} came back as {back}");
        }
        assert_eq!(pack_snorm(1.0), 127);
        assert_eq!(pack_snorm(-1.0), 0x80);
        assert_eq!(pack_snorm(0.0), 0);
    }

    #[test]
    fn test_unorm_clamps() {
        assert_eq!(pack_unorm(-0.5), 0);
        assert_eq!(pack_unorm(0.5), 128);
        assert_eq!(pack_unorm(3.0), 255);
    }
}
