//! Node-tree scene container
//!
//! Nodes live in a slotmap arena. Parents own the keys of their children and
//! nothing points upward, so the structure is a strict tree rooted at
//! [`Scene::root`]. World poses are derived on demand by walking down from the
//! root; holders of a [`NodeKey`] keep no ownership of the node.

use std::collections::HashMap;
use std::sync::Arc;

use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

use crate::foundation::math::{Mat4, Quat, Transform};
use crate::render::{Material, Mesh};

use super::{RenderLayers, VisibilityOverrides};

new_key_type! {
    /// Handle to a node in a [`Scene`]
    pub struct NodeKey;
}

/// Scene errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Key does not refer to a node in this scene
    #[error("Unknown scene node: {0:?}")]
    UnknownNode(NodeKey),

    /// Another node already uses this name
    #[error("Duplicate node name: {0}")]
    DuplicateName(String),
}

/// Drawable payload of a node
#[derive(Debug, Clone)]
pub struct Renderable {
    /// Geometry in node-local space
    pub mesh: Arc<Mesh>,

    /// Surface appearance
    pub material: Material,
}

/// One node of the scene tree
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Lookup name; empty names are not indexed
    pub name: String,

    /// Pose relative to the parent
    pub transform: Transform,

    /// Geometry drawn at this node, if any
    pub renderable: Option<Renderable>,

    /// Layers this node is drawn on
    pub layers: RenderLayers,

    /// Invisible nodes are skipped together with their subtree
    pub visible: bool,

    children: Vec<NodeKey>,
}

impl SceneNode {
    /// Empty transform-only node
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
            renderable: None,
            layers: RenderLayers::default(),
            visible: true,
            children: Vec::new(),
        }
    }

    /// Builder: set the local transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Builder: attach geometry
    pub fn with_mesh(mut self, mesh: impl Into<Arc<Mesh>>, material: Material) -> Self {
        self.renderable = Some(Renderable {
            mesh: mesh.into(),
            material,
        });
        self
    }

    /// Builder: set render layers
    pub fn with_layers(mut self, layers: RenderLayers) -> Self {
        self.layers = layers;
        self
    }

    /// Keys of direct children
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }
}

/// Strict-tree scene
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: SlotMap<NodeKey, SceneNode>,
    names: HashMap<String, NodeKey>,
    root: NodeKey,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Scene holding only an unnamed root
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new(""));
        Self {
            nodes,
            names: HashMap::new(),
            root,
        }
    }

    /// Root node key
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Number of nodes including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the root exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Insert `node` as the last child of `parent`
    pub fn add(&mut self, parent: NodeKey, node: SceneNode) -> Result<NodeKey, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        if !node.name.is_empty() && self.names.contains_key(&node.name) {
            return Err(SceneError::DuplicateName(node.name));
        }

        let name = node.name.clone();
        let key = self.nodes.insert(node);
        if !name.is_empty() {
            self.names.insert(name, key);
        }
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(key);
        }

        log::trace!("Added scene node {:?} under {:?}", key, parent);
        Ok(key)
    }

    /// Insert `node` directly under the root
    pub fn add_to_root(&mut self, node: SceneNode) -> Result<NodeKey, SceneError> {
        self.add(self.root, node)
    }

    /// Node by key
    pub fn get(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    /// Mutable node by key
    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut SceneNode> {
        self.nodes.get_mut(key)
    }

    /// Node key by name
    pub fn find(&self, name: &str) -> Option<NodeKey> {
        self.names.get(name).copied()
    }

    /// Replace a node's local rotation
    pub fn set_rotation(&mut self, key: NodeKey, rotation: Quat) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(key).ok_or(SceneError::UnknownNode(key))?;
        node.transform.rotation = rotation;
        Ok(())
    }

    /// Replace a node's local transform
    pub fn set_transform(&mut self, key: NodeKey, transform: Transform) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(key).ok_or(SceneError::UnknownNode(key))?;
        node.transform = transform;
        Ok(())
    }

    /// Keys from the root down to `key`, both inclusive
    pub fn path_to(&self, key: NodeKey) -> Option<Vec<NodeKey>> {
        if !self.nodes.contains_key(key) {
            return None;
        }
        let mut path = vec![self.root];
        if self.search(self.root, key, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    fn search(&self, current: NodeKey, wanted: NodeKey, path: &mut Vec<NodeKey>) -> bool {
        if current == wanted {
            return true;
        }
        let Some(node) = self.nodes.get(current) else {
            return false;
        };
        for &child in &node.children {
            path.push(child);
            if self.search(child, wanted, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    /// Pose of `key` in world space
    pub fn world_transform(&self, key: NodeKey) -> Result<Transform, SceneError> {
        let path = self.path_to(key).ok_or(SceneError::UnknownNode(key))?;
        Ok(path
            .iter()
            .filter_map(|k| self.nodes.get(*k))
            .fold(Transform::identity(), |world, node| world.combine(&node.transform)))
    }

    /// Visit every drawable node that is visible in a pass, depth first
    ///
    /// A node that is invisible or hidden by `overrides` prunes its whole
    /// subtree. The callback receives the node and its world matrix.
    pub fn for_each_visible<F>(&self, overrides: &VisibilityOverrides, mut visit: F)
    where
        F: FnMut(NodeKey, &SceneNode, &Mat4),
    {
        let mut stack = vec![(self.root, Mat4::identity())];
        while let Some((key, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get(key) else {
                continue;
            };
            if !node.visible || overrides.hides(key, node.layers) {
                continue;
            }

            let world = parent_world * node.transform.to_matrix();
            if node.renderable.is_some() {
                visit(key, node, &world);
            }
            // Reverse so children come off the stack in insertion order
            for &child in node.children.iter().rev() {
                stack.push((child, world));
            }
        }
    }
}
