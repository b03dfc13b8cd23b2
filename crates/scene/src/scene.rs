use std::collections::BTreeMap;

use tandem_common::{Color, ObjectId, Transform};

use crate::geometry::{Geometry, MeshData};
use crate::material::MaterialDesc;

/// A built mesh: descriptor plus tessellated data.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    pub geometry: Geometry,
    pub mesh: MeshData,
    pub material: MaterialDesc,
    /// Morph target influences, written by animation mixers.
    pub morph_weights: Vec<f32>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl MeshNode {
    pub fn new(geometry: Geometry, material: MaterialDesc) -> Self {
        let mesh = geometry.tessellate();
        Self {
            geometry,
            mesh,
            material,
            morph_weights: Vec::new(),
            cast_shadow: false,
            receive_shadow: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Ambient,
    Point,
    Directional,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    Mesh(MeshNode),
    Light(Light),
    Empty,
}

/// A scene graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: ObjectId,
    pub name: String,
    pub transform: Transform,
    /// Whether the node carries an orientation worth syncing from physics.
    pub rotatable: bool,
    pub visible: bool,
    pub content: NodeContent,
}

impl Node {
    pub fn mesh(name: impl Into<String>, mesh: MeshNode) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            transform: Transform::default(),
            rotatable: true,
            visible: true,
            content: NodeContent::Mesh(mesh),
        }
    }

    /// Ambient and point lights have no meaningful orientation.
    pub fn light(name: impl Into<String>, light: Light) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            transform: Transform::default(),
            rotatable: light.kind == LightKind::Directional,
            visible: true,
            content: NodeContent::Light(light),
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            transform: Transform::default(),
            rotatable: true,
            visible: true,
            content: NodeContent::Empty,
        }
    }

    pub fn as_mesh(&self) -> Option<&MeshNode> {
        match &self.content {
            NodeContent::Mesh(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut MeshNode> {
        match &mut self.content {
            NodeContent::Mesh(m) => Some(m),
            _ => None,
        }
    }
}

/// The visual scene graph. Owns every node added to it.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: BTreeMap<ObjectId, Node>,
    pub background: Color,
    pub shadows: bool,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node and return its id.
    pub fn add(&mut self, node: Node) -> ObjectId {
        let id = node.id;
        tracing::debug!(id = %id.short(), name = %node.name, "node added");
        self.nodes.insert(id, node);
        id
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<Node> {
        let node = self.nodes.remove(&id);
        if node.is_some() {
            tracing::debug!(id = %id.short(), "node removed");
        }
        node
    }

    pub fn get(&self, id: ObjectId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total triangles across all visible meshes.
    pub fn triangle_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|n| n.visible)
            .filter_map(Node::as_mesh)
            .map(|m| m.mesh.triangle_count())
            .sum()
    }
}
