use crate::scene::material::Material;
use crate::scene::mesh::{Mesh, ReferenceMesh, WorldMesh};
use nalgebra::Matrix4;

/// Represents an instance of a mesh in the scene with its own transformation.
pub struct SceneObject {
    pub reference: ReferenceMesh,
    /// Derived from `reference` by [`SceneObject::update_world`].
    pub world: WorldMesh,
    /// Base placement (model to world) before any animation.
    pub transform: Matrix4<f32>,
    pub material: Material,
}

impl SceneObject {
    pub fn new(mesh: Mesh, transform: Matrix4<f32>, material: Material) -> Self {
        let reference = ReferenceMesh::new(mesh);
        let world = reference.to_world(&transform);
        Self {
            reference,
            world,
            transform,
            material,
        }
    }

    /// Re-derives the world mesh with `model_rotation` applied in model space,
    /// before the base transform.
    pub fn update_world(&mut self, model_rotation: &Matrix4<f32>) {
        let world_matrix = self.transform * model_rotation;
        self.reference.transform_into(&world_matrix, &mut self.world);
    }

    pub fn mesh(&self) -> &Mesh {
        self.reference.mesh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::transform::TransformFactory;
    use nalgebra::{Point3, Vector3};

    #[test]
    fn rotation_spins_in_place() {
        let translation = TransformFactory::translation(&Vector3::new(0.0, 0.0, 10.0));
        let mut object = SceneObject::new(Mesh::create_quad(1.0, 0.0), translation, Material::default());
        assert!((object.world.vertices[0].position - Point3::new(-1.0, 1.0, 10.0)).norm() < 1e-5);

        object.update_world(&TransformFactory::rotation_y(std::f32::consts::PI));
        let p = object.world.vertices[0].position;
        assert!((p - Point3::new(1.0, 1.0, 10.0)).norm() < 1e-5);
        assert_eq!(object.mesh().vertices[0].position, Point3::new(-1.0, 1.0, 0.0));
    }
}
