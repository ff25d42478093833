//! OBJ file loader for rig and prop meshes

use crate::assets::AssetError;
use crate::render::{Mesh, Vertex};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Minimal Wavefront OBJ reader (positions, normals, texture coordinates, polygon faces)
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file and return a mesh
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, AssetError> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    /// Parse OBJ text from any buffered reader
    pub fn parse<R: BufRead>(reader: R) -> Result<Mesh, AssetError> {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut tex_coords: Vec<[f32; 2]> = Vec::new();
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();

            match parts[0] {
                "v" if parts.len() >= 4 => {
                    positions.push(parse_floats::<3>(&parts[1..4], line_number, "vertex")?);
                }
                "vn" if parts.len() >= 4 => {
                    normals.push(parse_floats::<3>(&parts[1..4], line_number, "normal")?);
                }
                "vt" if parts.len() >= 3 => {
                    tex_coords.push(parse_floats::<2>(&parts[1..3], line_number, "tex coord")?);
                }
                "f" if parts.len() >= 4 => {
                    let mut face_indices = Vec::with_capacity(parts.len() - 1);

                    for vertex_data in &parts[1..] {
                        let mut fields = vertex_data.split('/');

                        let pos_idx = resolve_index(fields.next(), positions.len(), line_number)?
                            .ok_or_else(|| AssetError::Parse(format!("line {}: face vertex without position", line_number + 1)))?;
                        let tex_idx = resolve_index(fields.next(), tex_coords.len(), line_number)?;
                        let normal_idx = resolve_index(fields.next(), normals.len(), line_number)?;

                        let position = positions[pos_idx];
                        let tex_coord = tex_idx.map_or([0.0, 0.0], |idx| tex_coords[idx]);
                        let normal = normal_idx.map_or([0.0, 1.0, 0.0], |idx| normals[idx]);

                        vertices.push(Vertex::new(position, normal, tex_coord));
                        face_indices.push((vertices.len() - 1) as u32);
                    }

                    // Fan triangulation
                    for i in 1..(face_indices.len() - 1) {
                        indices.push(face_indices[0]);
                        indices.push(face_indices[i]);
                        indices.push(face_indices[i + 1]);
                    }
                }
                _ => {
                    // Groups, materials and smoothing are not needed
                }
            }
        }

        if vertices.is_empty() {
            return Err(AssetError::InvalidFormat("No faces found in OBJ data".to_string()));
        }

        Ok(Mesh::new(vertices, indices))
    }
}

fn parse_floats<const N: usize>(fields: &[&str], line_number: usize, what: &str) -> Result<[f32; N], AssetError> {
    let mut values = [0.0; N];
    for (value, field) in values.iter_mut().zip(fields) {
        *value = field.parse().map_err(|_| {
            AssetError::Parse(format!("line {}: invalid {} component '{}'", line_number + 1, what, field))
        })?;
    }
    Ok(values)
}

/// Resolve a 1-based (or negative, relative) OBJ index to a 0-based index
fn resolve_index(field: Option<&str>, available: usize, line_number: usize) -> Result<Option<usize>, AssetError> {
    let Some(field) = field.filter(|f| !f.is_empty()) else {
        return Ok(None);
    };

    let raw: i64 = field
        .parse()
        .map_err(|_| AssetError::Parse(format!("line {}: invalid index '{}'", line_number + 1, field)))?;

    let resolved = if raw > 0 {
        raw - 1
    } else {
        available as i64 + raw
    };

    if raw == 0 || resolved < 0 || resolved >= available as i64 {
        return Err(AssetError::InvalidFormat(format!(
            "line {}: index {} out of bounds ({} available)",
            line_number + 1, raw, available
        )));
    }

    Ok(Some(resolved as usize))
}
