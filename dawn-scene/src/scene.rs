//! The resolved, immutable scene graph.
//!
//! Buffers are shared byte blobs; accessors, vertex layouts, meshes and objects
//! are shared through `Arc` so several owners can point at the same record.
//! Transform nodes live in an arena and link to each other by [`NodeId`].

use std::fmt;
use std::sync::Arc;

use glam::Mat4;

use crate::format::{ComponentType, SemanticType};
use crate::transform::Transform;

/// An opaque blob of bytes lifted verbatim out of a BUFF chunk.
///
/// Cloning is cheap and never copies the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Buffer(Arc<[u8]>);

impl Buffer {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when both handles share the same allocation.
    pub fn ptr_eq(&self, other: &Buffer) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Buffer({} bytes)", self.0.len())
    }
}

/// Strided, typed view into one buffer.
#[derive(Clone, Debug)]
pub struct Accessor {
    pub buffer: Buffer,
    pub byte_offset: usize,
    pub byte_stride: usize,
    pub byte_count: usize,
    pub component_count: u8,
    pub component_type: ComponentType,
}

impl Accessor {
    pub fn element_count(&self) -> usize {
        self.byte_count.checked_div(self.byte_stride).unwrap_or(0)
    }

    /// Bytes occupied by one element's components (at most `byte_stride`).
    pub fn element_size(&self) -> usize {
        self.component_count as usize * self.component_type.size()
    }

    /// Component bytes of element `index`, or `None` past the end.
    pub fn element(&self, index: usize) -> Option<&[u8]> {
        if index >= self.element_count() {
            return None;
        }
        let start = self.byte_offset + index * self.byte_stride;
        self.buffer.as_bytes().get(start..start + self.element_size())
    }

    pub fn elements(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.element_count()).filter_map(move |i| self.element(i))
    }
}

#[derive(Clone, Debug)]
pub struct VertexAttribute {
    pub accessor: Arc<Accessor>,
    pub semantic: SemanticType,
}

/// Ordered set of attributes making up a mesh's vertices.
#[derive(Clone, Debug)]
pub struct VertexLayout {
    pub attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    /// First attribute with the given meaning.
    pub fn find(&self, semantic: SemanticType) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.semantic == semantic)
    }

    /// Vertex count, taken from the position attribute when there is one.
    pub fn element_count(&self) -> usize {
        self.find(SemanticType::Position)
            .or_else(|| self.attributes.first())
            .map_or(0, |a| a.accessor.element_count())
    }
}

#[derive(Clone, Debug)]
pub struct Mesh {
    pub index_accessor: Arc<Accessor>,
    pub vertex_layout: Arc<VertexLayout>,
    /// Carried through from the file; nothing consumes materials yet.
    pub material_index: u16,
}

impl Mesh {
    pub fn index_count(&self) -> usize {
        self.index_accessor.element_count()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_layout.element_count()
    }
}

/// A renderable thing a transform node can carry.
#[derive(Clone, Debug)]
pub enum Object {
    Mesh(Arc<Mesh>),
}

impl Object {
    pub fn as_mesh(&self) -> Option<&Arc<Mesh>> {
        match self {
            Object::Mesh(mesh) => Some(mesh),
        }
    }
}

/// Index of a node in [`Scene::nodes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct TransformNode {
    pub transform: Transform,
    pub object: Arc<Object>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl TransformNode {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// A fully linked scene. Immutable once built, so it can be shared freely
/// between threads.
#[derive(Clone, Debug)]
pub struct Scene {
    pub(crate) buffers: Vec<Buffer>,
    pub(crate) accessors: Vec<Arc<Accessor>>,
    pub(crate) vertex_layouts: Vec<Arc<VertexLayout>>,
    pub(crate) meshes: Vec<Arc<Mesh>>,
    pub(crate) objects: Vec<Arc<Object>>,
    pub(crate) nodes: Vec<TransformNode>,
    pub(crate) roots: Vec<NodeId>,
}

impl Scene {
    pub fn buffers(&self) -> &[Buffer] {
        &self.buffers
    }

    pub fn accessors(&self) -> &[Arc<Accessor>] {
        &self.accessors
    }

    pub fn vertex_layouts(&self) -> &[Arc<VertexLayout>] {
        &self.vertex_layouts
    }

    pub fn meshes(&self) -> &[Arc<Mesh>] {
        &self.meshes
    }

    pub fn objects(&self) -> &[Arc<Object>] {
        &self.objects
    }

    pub fn nodes(&self) -> &[TransformNode] {
        &self.nodes
    }

    /// Nodes without a parent, in file order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn get(&self, id: NodeId) -> Option<&TransformNode> {
        self.nodes.get(id.0)
    }

    /// # Panics
    /// If `id` did not come from this scene.
    pub fn node(&self, id: NodeId) -> &TransformNode {
        &self.nodes[id.0]
    }

    /// Parent, grandparent and so on up to the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            scene: self,
            next: self.get(id).and_then(|n| n.parent),
        }
    }

    /// Pre-order walk over every tree, roots and children in file order.
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            scene: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    /// Depth of a node; roots are at depth 0.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Local-to-world matrix of a node, composed along its ancestor chain.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let local = self.node(id).transform.to_matrix();
        self.ancestors(id)
            .fold(local, |m, ancestor| self.node(ancestor).transform.to_matrix() * m)
    }
}

pub struct Ancestors<'a> {
    scene: &'a Scene,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.scene.get(current).and_then(|n| n.parent);
        Some(current)
    }
}

pub struct DepthFirst<'a> {
    scene: &'a Scene,
    stack: Vec<NodeId>,
}

impl Iterator for DepthFirst<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.scene.node(id).children.iter().rev().copied());
        Some(id)
    }
}
