//! Asset loading
//!
//! The rig asks for its meshes by logical name ("bottom", "servo", "upper")
//! through the [`MeshSource`] trait. [`ObjDirectory`] resolves names to OBJ
//! files on disk; [`MeshLibrary`] serves meshes registered in memory.

pub mod obj_loader;

pub use obj_loader::ObjLoader;

use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::render::Mesh;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// IO error while reading an asset file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed numeric or index data
    #[error("Parse error: {0}")]
    Parse(String),

    /// Structurally invalid asset
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// No asset is registered under the requested name
    #[error("Asset not found: {0}")]
    NotFound(String),
}

/// Supplies meshes by logical name
pub trait MeshSource {
    /// Load the mesh registered as `name`
    fn load_mesh(&self, name: &str) -> Result<Mesh, AssetError>;
}

/// Resolves `name` to `<root>/<name>.obj`
#[derive(Debug, Clone)]
pub struct ObjDirectory {
    root: PathBuf,
}

impl ObjDirectory {
    /// Serve OBJ files from `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path a logical name resolves to
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.obj", name))
    }
}

impl MeshSource for ObjDirectory {
    fn load_mesh(&self, name: &str) -> Result<Mesh, AssetError> {
        let path = self.path_for(name);
        log::debug!("Loading mesh '{}' from {}", name, path.display());

        let mesh = ObjLoader::load_obj(&path).map_err(|e| match e {
            AssetError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                AssetError::NotFound(path.display().to_string())
            }
            other => other,
        })?;

        log::info!("Loaded mesh '{}' with {} vertices and {} triangles",
                   name, mesh.vertices.len(), mesh.triangle_count());
        Ok(mesh)
    }
}

/// In-memory mesh registry
#[derive(Debug, Clone, Default)]
pub struct MeshLibrary {
    meshes: HashMap<String, Mesh>,
}

impl MeshLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mesh, replacing any previous one with the same name
    pub fn insert(&mut self, name: impl Into<String>, mesh: Mesh) {
        self.meshes.insert(name.into(), mesh);
    }

    /// Builder-style [`MeshLibrary::insert`]
    pub fn with(mut self, name: impl Into<String>, mesh: Mesh) -> Self {
        self.insert(name, mesh);
        self
    }
}

impl MeshSource for MeshLibrary {
    fn load_mesh(&self, name: &str) -> Result<Mesh, AssetError> {
        self.meshes
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(name.to_string()))
    }
}
