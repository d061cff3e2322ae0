// Static mesh combination
//
// Several child meshes are merged into one mesh owned by their parent,
// baked into world space, and the children are switched off.

use glam::{Mat3, Mat4, Vec3};

/// Errors produced while combining meshes
#[derive(Debug, thiserror::Error)]
pub enum CombineError {
    #[error("Group '{0}' has no active child meshes to combine")]
    NoMeshes(String),

    #[error("Combined mesh has {0} vertices, more than 32-bit indices can address")]
    IndexOverflow(usize),
}

/// Indexed triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Triangle list, three indices per triangle
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Axis-aligned box centered on the origin
    pub fn cuboid(half_extents: Vec3) -> Self {
        let faces = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];
        let mut mesh = Self::default();

        for normal in faces {
            // Two axes spanning the face, ordered so triangles wind outward
            let u = if normal.y.abs() > 0.5 { Vec3::Z } else { Vec3::Y };
            let v = normal.cross(u);
            let base = mesh.positions.len() as u32;

            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let corner = normal + u * su + v * sv;
                mesh.positions.push(corner * half_extents);
                mesh.normals.push(normal);
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        mesh
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Copy of the mesh with `transform` applied. Normals use the
    /// inverse-transpose so non-uniform scale keeps them perpendicular.
    pub fn transformed(&self, transform: Mat4) -> Self {
        let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();
        Self {
            positions: self
                .positions
                .iter()
                .map(|p| transform.transform_point3(*p))
                .collect(),
            normals: self
                .normals
                .iter()
                .map(|n| (normal_matrix * *n).normalize_or_zero())
                .collect(),
            indices: self.indices.clone(),
        }
    }

    /// Axis-aligned bounds as `(min, max)`, `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }
}

/// A scene node carrying an optional mesh
#[derive(Debug, Clone)]
pub struct MeshNode {
    pub name: String,
    pub mesh: Option<Mesh>,
    /// Local space to world space
    pub local_to_world: Mat4,
    pub material: Option<String>,
    pub active: bool,
}

impl MeshNode {
    pub fn new(name: &str, local_to_world: Mat4) -> Self {
        Self {
            name: name.to_string(),
            mesh: None,
            local_to_world,
            material: None,
            active: true,
        }
    }

    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_material(mut self, material: &str) -> Self {
        self.material = Some(material.to_string());
        self
    }
}

/// A parent node and its direct children
#[derive(Debug, Clone)]
pub struct MeshGroup {
    pub root: MeshNode,
    pub children: Vec<MeshNode>,
}

impl MeshGroup {
    pub fn new(root: MeshNode) -> Self {
        Self {
            root,
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: MeshNode) {
        self.children.push(child);
    }

    /// Merge every active child mesh into the root.
    ///
    /// Child vertices are baked with each child's local-to-world transform.
    /// The root takes the first child's material and the merged children are
    /// deactivated. The root's own mesh never takes part.
    pub fn combine(&mut self) -> Result<&Mesh, CombineError> {
        let sources: Vec<usize> = self
            .children
            .iter()
            .enumerate()
            .filter(|(_, child)| child.active && child.mesh.is_some())
            .map(|(index, _)| index)
            .collect();

        let Some(&first) = sources.first() else {
            return Err(CombineError::NoMeshes(self.root.name.clone()));
        };

        let total_vertices: usize = sources
            .iter()
            .filter_map(|&i| self.children[i].mesh.as_ref())
            .map(Mesh::vertex_count)
            .sum();
        if total_vertices > u32::MAX as usize {
            return Err(CombineError::IndexOverflow(total_vertices));
        }

        let mut combined = Mesh::default();
        for &index in &sources {
            let child = &self.children[index];
            let Some(mesh) = child.mesh.as_ref() else {
                continue;
            };
            let baked = mesh.transformed(child.local_to_world);
            let offset = combined.positions.len() as u32;
            combined.positions.extend(baked.positions);
            combined.normals.extend(baked.normals);
            combined
                .indices
                .extend(baked.indices.iter().map(|i| i + offset));
        }

        self.root.material = self.children[first].material.clone();
        for &index in &sources {
            self.children[index].active = false;
        }

        log::info!(
            "Meshes combined successfully! '{}': {} children, {} vertices, {} triangles",
            self.root.name,
            sources.len(),
            combined.vertex_count(),
            combined.triangle_count()
        );

        Ok(self.root.mesh.insert(combined))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn post(name: &str, x: f32) -> MeshNode {
        MeshNode::new(name, Mat4::from_translation(Vec3::new(x, 0.75, 5.0)))
            .with_mesh(Mesh::cuboid(Vec3::new(0.1, 0.75, 0.1)))
            .with_material("wood")
    }

    #[test]
    fn test_cuboid_shape() {
        let mesh = Mesh::cuboid(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(
            mesh.bounds(),
            Some((Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0)))
        );
    }

    #[test]
    fn test_cuboid_winds_outward() {
        let mesh = Mesh::cuboid(Vec3::ONE);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| mesh.positions[tri[k] as usize]);
            let face_normal = (b - a).cross(c - a).normalize();
            let expected = mesh.normals[tri[0] as usize];
            assert_abs_diff_eq!(face_normal.dot(expected), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_combine_bakes_world_transforms() {
        let mut group = MeshGroup::new(MeshNode::new("Fence", Mat4::IDENTITY));
        group.add_child(post("PostLeft", -3.0));
        group.add_child(post("PostRight", 3.0));

        let combined = group.combine().expect("two posts to combine");
        assert_eq!(combined.vertex_count(), 48);
        assert_eq!(combined.triangle_count(), 24);

        let (min, max) = combined.bounds().expect("non-empty");
        assert_abs_diff_eq!(min.x, -3.1, epsilon = 1e-5);
        assert_abs_diff_eq!(max.x, 3.1, epsilon = 1e-5);
        assert_abs_diff_eq!(max.y, 1.5, epsilon = 1e-5);
    }

    #[test]
    fn test_combine_offsets_indices() {
        let mut group = MeshGroup::new(MeshNode::new("Fence", Mat4::IDENTITY));
        group.add_child(post("PostLeft", -3.0));
        group.add_child(post("PostRight", 3.0));

        let combined = group.combine().expect("two posts to combine");
        assert!(combined.indices[36..].iter().all(|&i| i >= 24));
        assert!(combined.indices.iter().all(|&i| (i as usize) < 48));
    }

    #[test]
    fn test_combine_hands_over_material_and_deactivates() {
        let mut group = MeshGroup::new(MeshNode::new("Fence", Mat4::IDENTITY));
        group.add_child(MeshNode::new("Marker", Mat4::IDENTITY));
        group.add_child(post("PostLeft", -3.0).with_material("oak"));
        group.add_child(post("PostRight", 3.0));

        group.combine().expect("posts to combine");
        assert_eq!(group.root.material.as_deref(), Some("oak"));
        assert!(group.children[0].active);
        assert!(!group.children[1].active);
        assert!(!group.children[2].active);
    }

    #[test]
    fn test_root_mesh_is_not_merged() {
        let mut group = MeshGroup::new(
            MeshNode::new("Fence", Mat4::IDENTITY).with_mesh(Mesh::cuboid(Vec3::splat(10.0))),
        );
        group.add_child(post("Post", 0.0));

        let combined = group.combine().expect("one post");
        assert_eq!(combined.vertex_count(), 24);
    }

    #[test]
    fn test_combine_without_children_fails() {
        let mut group = MeshGroup::new(MeshNode::new("Empty", Mat4::IDENTITY));
        group.add_child(post("Hidden", 0.0));
        group.children[0].active = false;

        assert!(matches!(group.combine(), Err(CombineError::NoMeshes(_))));
        assert!(group.root.mesh.is_none());
    }

    #[test]
    fn test_scaled_normals_stay_unit() {
        let mesh = Mesh::cuboid(Vec3::ONE)
            .transformed(Mat4::from_scale(Vec3::new(4.0, 1.0, 0.5)));
        for normal in &mesh.normals {
            assert_abs_diff_eq!(normal.length(), 1.0, epsilon = 1e-5);
        }
    }
}
