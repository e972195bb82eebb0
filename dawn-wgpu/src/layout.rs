use dawn_scene::{IndexFormat, SURFACE_VERTEX_STRIDE};

/// Position, normal and color of a `SurfaceVertex`, at shader locations 0..=2.
pub static SURFACE_VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    // location 0: position vec3<f32>
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    // location 1: normal, snorm8x4 read as vec4<f32>
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Snorm8x4,
        offset: 12,
        shader_location: 1,
    },
    // location 2: color, unorm8x4 read as vec4<f32>
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Unorm8x4,
        offset: 16,
        shader_location: 2,
    },
];

/// Vertex buffer layout matching transcoded surface vertices.
pub fn surface_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: SURFACE_VERTEX_STRIDE as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &SURFACE_VERTEX_ATTRIBUTES,
    }
}

pub fn wgpu_index_format(format: IndexFormat) -> wgpu::IndexFormat {
    match format {
        IndexFormat::Uint16 => wgpu::IndexFormat::Uint16,
        IndexFormat::Uint32 => wgpu::IndexFormat::Uint32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dawn_scene::SurfaceVertex;

    #[test]
    fn test_layout_matches_surface_vertex() {
        let layout = surface_vertex_layout();
        assert_eq!(layout.array_stride as usize, std::mem::size_of::<SurfaceVertex>());

        let offsets: Vec<u64> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(
            offsets,
            vec![
                std::mem::offset_of!(SurfaceVertex, position) as u64,
                std::mem::offset_of!(SurfaceVertex, normal) as u64,
                std::mem::offset_of!(SurfaceVertex, color) as u64,
            ]
        );

        let end = layout
            .attributes
            .iter()
            .map(|a| a.offset + a.format.size())
            .max();
        assert_eq!(end, Some(layout.array_stride));
    }

    #[test]
    fn test_shader_locations_are_sequential() {
        let locations: Vec<u32> = SURFACE_VERTEX_ATTRIBUTES
            .iter()
            .map(|a| a.shader_location)
            .collect();
        assert_eq!(locations, vec![0, 1, 2]);
    }

    #[test]
    fn test_index_format() {
        assert_eq!(wgpu_index_format(IndexFormat::Uint16), wgpu::IndexFormat::Uint16);
        assert_eq!(wgpu_index_format(IndexFormat::Uint32), wgpu::IndexFormat::Uint32);
    }
}
