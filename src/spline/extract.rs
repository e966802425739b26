//! Extraction of ordered path points from authored line geometry.
//!
//! Paths are authored as curves in a DCC tool and exported to glTF as line
//! meshes. The vertex buffer order is the traversal order of the path.

use bevy::{
    gltf::{Gltf, GltfMesh, GltfNode},
    mesh::{PrimitiveTopology, VertexAttributeValues},
    platform::collections::HashMap,
    prelude::*,
};

use crate::error::{FlythroughError, Result};

/// Turn a flat `[x, y, z, x, y, z, ...]` buffer into world-space points.
///
/// Every triple is transformed by `world`. The output keeps the buffer order.
/// A missing or empty buffer is a [`FlythroughError::MissingPath`], a buffer
/// whose length is not a multiple of three is [`FlythroughError::MalformedGeometry`].
pub fn extract_points(buffer: Option<&[f32]>, world: &Mat4) -> Result<Vec<Vec3>> {
    let buffer = match buffer {
        Some(buffer) if !buffer.is_empty() => buffer,
        _ => return Err(FlythroughError::MissingPath),
    };

    if buffer.len() % 3 != 0 {
        return Err(FlythroughError::MalformedGeometry { len: buffer.len() });
    }

    Ok(buffer
        .chunks_exact(3)
        .map(|xyz| world.transform_point3(Vec3::new(xyz[0], xyz[1], xyz[2])))
        .collect())
}

/// Flatten the vertex positions of a line mesh.
///
/// Returns `None` for meshes that are not lines or carry no positions.
pub fn line_positions(mesh: &Mesh) -> Option<Vec<f32>> {
    if !matches!(
        mesh.primitive_topology(),
        PrimitiveTopology::LineList | PrimitiveTopology::LineStrip
    ) {
        return None;
    }

    match mesh.attribute(Mesh::ATTRIBUTE_POSITION)? {
        VertexAttributeValues::Float32x3(positions) => {
            Some(positions.iter().flatten().copied().collect())
        }
        _ => None,
    }
}

/// One node of a path document, reduced to what path lookup needs.
#[derive(Debug, Clone, Default)]
pub struct PathNode {
    /// Transform relative to the parent node.
    pub local: Mat4,
    /// Document indices of the child nodes.
    pub children: Vec<usize>,
    /// Flattened positions, if the node carries line geometry.
    pub lines: Option<Vec<f32>>,
}

/// Find the first node, in document order, that carries line geometry.
///
/// Returns its buffer with its world matrix, composed from the hierarchy root
/// down through every parent's local transform.
pub fn first_line_node(nodes: &[PathNode]) -> Option<(Vec<f32>, Mat4)> {
    let mut parents = vec![None; nodes.len()];
    for (index, node) in nodes.iter().enumerate() {
        for &child in &node.children {
            if let Some(parent) = parents.get_mut(child) {
                *parent = Some(index);
            }
        }
    }

    let (index, lines) = nodes
        .iter()
        .enumerate()
        .find_map(|(index, node)| Some((index, node.lines.clone()?)))?;

    let mut world = nodes[index].local;
    let mut current = index;
    // A malformed document may contain a cycle; no chain is longer than the node count
    for _ in 0..nodes.len() {
        let Some(parent) = parents[current] else {
            break;
        };
        world = nodes[parent].local * world;
        current = parent;
    }

    Some((lines, world))
}

/// Find the first node of a glTF document that carries line geometry.
///
/// Nodes are visited in document order and the first line primitive of each
/// node's mesh is used. The returned matrix places the node in world space.
pub fn find_line_geometry(
    gltf: &Gltf,
    nodes: &Assets<GltfNode>,
    gltf_meshes: &Assets<GltfMesh>,
    meshes: &Assets<Mesh>,
) -> Option<(Vec<f32>, Mat4)> {
    let indices: HashMap<AssetId<GltfNode>, usize> = gltf
        .nodes
        .iter()
        .enumerate()
        .map(|(index, handle)| (handle.id(), index))
        .collect();

    let path_nodes: Vec<PathNode> = gltf
        .nodes
        .iter()
        .map(|handle| {
            let Some(node) = nodes.get(handle) else {
                return PathNode::default();
            };

            let lines = node
                .mesh
                .as_ref()
                .and_then(|mesh| gltf_meshes.get(mesh))
                .and_then(|gltf_mesh| {
                    gltf_mesh
                        .primitives
                        .iter()
                        .find_map(|primitive| line_positions(meshes.get(&primitive.mesh)?))
                });

            PathNode {
                local: node.transform.to_matrix(),
                children: node
                    .children
                    .iter()
                    .filter_map(|child| indices.get(&child.id()).copied())
                    .collect(),
                lines,
            }
        })
        .collect();

    first_line_node(&path_nodes)
}
