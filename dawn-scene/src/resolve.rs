//! Turns flat, index-linked records into the linked [`Scene`] graph.
//!
//! Stages run in dependency order and each only looks at lists resolved
//! before it: buffers, accessors, vertex layouts, meshes, objects, transform
//! nodes, then the parent/child linking pass.

use std::sync::Arc;

use crate::container::SceneRecords;
use crate::error::{IndexKind, Result, SceneError};
use crate::format::ObjectType;
use crate::scene::{
    Accessor, Mesh, NodeId, Object, Scene, TransformNode, VertexAttribute, VertexLayout,
};

/// Bounds-checks a raw cross-reference against the list it points into.
fn checked<T>(list: &[T], kind: IndexKind, index: u16) -> Result<&T> {
    list.get(index as usize).ok_or(SceneError::IndexOutOfBounds {
        kind,
        index: index as usize,
        bound: list.len(),
    })
}

pub fn resolve(records: SceneRecords) -> Result<Scene> {
    let SceneRecords {
        buffers,
        accessors: accessor_records,
        vertex_layouts: layout_records,
        meshes: mesh_records,
        objects: object_records,
        transform_nodes: node_records,
    } = records;

    let mut accessors = Vec::with_capacity(accessor_records.len());
    for (i, r) in accessor_records.iter().enumerate() {
        let buffer = checked(&buffers, IndexKind::Buffer, r.buffer_index)?;
        let end = r.byte_index as usize + r.byte_count as usize;
        if end > buffer.len() {
            return Err(SceneError::AccessorOutOfRange {
                accessor: i,
                end,
                buffer_len: buffer.len(),
            });
        }
        accessors.push(Arc::new(Accessor {
            buffer: buffer.clone(),
            byte_offset: r.byte_index as usize,
            byte_stride: r.byte_stride as usize,
            byte_count: r.byte_count as usize,
            component_count: r.component_count,
            component_type: r.component_type,
        }));
    }

    let mut vertex_layouts = Vec::with_capacity(layout_records.len());
    for (i, r) in layout_records.iter().enumerate() {
        let attributes = r
            .attributes
            .iter()
            .map(|a| {
                Ok(VertexAttribute {
                    accessor: checked(&accessors, IndexKind::Accessor, a.accessor_index)?.clone(),
                    semantic: a.semantic,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let layout = VertexLayout { attributes };
        check_attribute_lengths(i, &layout)?;
        vertex_layouts.push(Arc::new(layout));
    }

    let meshes = mesh_records
        .iter()
        .map(|r| {
            Ok(Arc::new(Mesh {
                index_accessor: checked(&accessors, IndexKind::Accessor, r.index_accessor_index)?
                    .clone(),
                vertex_layout: checked(&vertex_layouts, IndexKind::VertexLayout, r.vertex_layout_index)?
                    .clone(),
                material_index: r.material_index,
            }))
        })
        .collect::<Result<Vec<_>>>()?;

    let objects = object_records
        .iter()
        .map(|r| {
            let object = match r.object_type {
                ObjectType::Mesh => {
                    Object::Mesh(checked(&meshes, IndexKind::Mesh, r.content_index)?.clone())
                }
            };
            Ok(Arc::new(object))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut nodes = node_records
        .iter()
        .map(|r| {
            Ok(TransformNode {
                transform: r.transform,
                object: checked(&objects, IndexKind::Object, r.object_index)?.clone(),
                children: Vec::with_capacity(r.child_indices.len()),
                parent: None,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    for (i, r) in node_records.iter().enumerate() {
        for &child in &r.child_indices {
            let c = child as usize;
            checked(&node_records, IndexKind::TransformNode, child)?;
            if c == i {
                return Err(SceneError::CyclicHierarchy { node: i });
            }
            if let Some(first) = nodes[c].parent {
                return Err(SceneError::DuplicateChild {
                    child: c,
                    first_parent: first.0,
                    second_parent: i,
                });
            }
            nodes[c].parent = Some(NodeId(i));
            nodes[i].children.push(NodeId(c));
        }
    }
    check_acyclic(&nodes)?;

    let roots = nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.parent.is_none())
        .map(|(i, _)| NodeId(i))
        .collect::<Vec<_>>();

    log::debug!(
        "resolved scene: {} buffers, {} accessors, {} layouts, {} meshes, {} objects, {} nodes ({} roots)",
        buffers.len(),
        accessors.len(),
        vertex_layouts.len(),
        meshes.len(),
        objects.len(),
        nodes.len(),
        roots.len()
    );

    Ok(Scene {
        buffers,
        accessors,
        vertex_layouts,
        meshes,
        objects,
        nodes,
        roots,
    })
}

/// Every attribute must cover as many elements as the layout's vertex count.
fn check_attribute_lengths(layout_index: usize, layout: &VertexLayout) -> Result<()> {
    let expected = layout.element_count();
    for attribute in &layout.attributes {
        let found = attribute.accessor.element_count();
        if found != expected {
            return Err(SceneError::AttributeLengthMismatch {
                layout: layout_index,
                semantic: attribute.semantic,
                expected,
                found,
            });
        }
    }
    Ok(())
}

/// With at most one parent per node, a cycle is a parent chain that never
/// reaches a root.
fn check_acyclic(nodes: &[TransformNode]) -> Result<()> {
    const UNSEEN: u8 = 0;
    const ON_PATH: u8 = 1;
    const DONE: u8 = 2;

    let mut state = vec![UNSEEN; nodes.len()];
    let mut path = Vec::new();
    for start in 0..nodes.len() {
        let mut current = Some(start);
        while let Some(i) = current {
            match state[i] {
                DONE => break,
                ON_PATH => return Err(SceneError::CyclicHierarchy { node: i }),
                _ => {
                    state[i] = ON_PATH;
                    path.push(i);
                    current = nodes[i].parent.map(|p| p.0);
                }
            }
        }
        for i in path.drain(..) {
            state[i] = DONE;
        }
    }
    Ok(())
}
