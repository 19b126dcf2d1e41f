use crate::core::color::ColorRGB;
use crate::core::geometry::{PrimitiveTopology, Vertex};
use nalgebra::{Matrix4, Point3, Vector2, Vector3};
use rayon::prelude::*;

/// A collection of vertices and indices representing a 3D object.
///
/// Front faces wind clockwise when seen from the side their normal points to.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub name: String,
    /// List of vertices; the position in this list is the vertex index.
    pub vertices: Vec<Vertex>,
    /// Triangle indices, read according to `topology`.
    pub indices: Vec<u32>,
    pub topology: PrimitiveTopology,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            name: String::new(),
            vertices,
            indices,
            topology: PrimitiveTopology::TriangleList,
        }
    }

    pub fn with_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Resolves the index list into triangles.
    ///
    /// Strip triangles at odd offsets swap their last two vertices so every
    /// triangle keeps the strip's winding. Triangles repeating an index (strip
    /// restarts) and triangles referencing missing vertices are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        let vertex_count = self.vertices.len();
        let resolved: Box<dyn Iterator<Item = [u32; 3]> + '_> = match self.topology {
            PrimitiveTopology::TriangleList => Box::new(
                self.indices
                    .chunks_exact(3)
                    .map(|tri| [tri[0], tri[1], tri[2]]),
            ),
            PrimitiveTopology::TriangleStrip => {
                Box::new(self.indices.windows(3).enumerate().map(|(i, tri)| {
                    if i % 2 == 0 {
                        [tri[0], tri[1], tri[2]]
                    } else {
                        [tri[0], tri[2], tri[1]]
                    }
                }))
            }
        };

        resolved.filter(move |&[a, b, c]| {
            a != b
                && b != c
                && a != c
                && [a, b, c].iter().all(|&i| (i as usize) < vertex_count)
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles().count()
    }

    /// Creates a simple triangle facing -Z, for testing purposes.
    pub fn create_test_triangle() -> Self {
        let normal = -Vector3::z();
        let vertices = vec![
            Vertex::new(Point3::new(0.0, 0.5, 0.0), normal, Vector2::new(0.5, 0.0))
                .with_color(ColorRGB::new(1.0, 0.0, 0.0)),
            Vertex::new(Point3::new(0.5, -0.5, 0.0), normal, Vector2::new(1.0, 1.0))
                .with_color(ColorRGB::new(0.0, 0.0, 1.0)),
            Vertex::new(Point3::new(-0.5, -0.5, 0.0), normal, Vector2::new(0.0, 1.0))
                .with_color(ColorRGB::new(0.0, 1.0, 0.0)),
        ];

        Self::new(vertices, vec![0, 1, 2]).with_name("triangle")
    }

    /// Axis-aligned square in the plane `z`, facing -Z, drawn as a two-triangle
    /// strip. UV (0, 0) is the top-left corner.
    pub fn create_quad(half_size: f32, z: f32) -> Self {
        let normal = -Vector3::z();
        let tangent = Vector3::x();
        let corner = |x: f32, y: f32, u: f32, v: f32| {
            Vertex::new(
                Point3::new(x * half_size, y * half_size, z),
                normal,
                Vector2::new(u, v),
            )
            .with_tangent(tangent)
        };

        let vertices = vec![
            corner(-1.0, 1.0, 0.0, 0.0),
            corner(1.0, 1.0, 1.0, 0.0),
            corner(-1.0, -1.0, 0.0, 1.0),
            corner(1.0, -1.0, 1.0, 1.0),
        ];

        Self::new(vertices, vec![0, 1, 2, 3])
            .with_topology(PrimitiveTopology::TriangleStrip)
            .with_name("quad")
    }

    /// 3x3 vertex grid spanning [-3, 3] in X and Y, as one strip with degenerate
    /// triangles joining its two rows of quads.
    pub fn create_grid_strip(z: f32) -> Self {
        Self::new(
            Self::grid_vertices(z),
            vec![3, 0, 4, 1, 5, 2, 2, 6, 6, 3, 7, 4, 8, 5],
        )
        .with_topology(PrimitiveTopology::TriangleStrip)
        .with_name("grid strip")
    }

    /// Same grid as [`Mesh::create_grid_strip`], as a triangle list.
    pub fn create_grid_list(z: f32) -> Self {
        Self::new(
            Self::grid_vertices(z),
            vec![
                3, 0, 1, 1, 4, 3, 4, 1, 2, 2, 5, 4, 6, 3, 4, 4, 7, 6, 7, 4, 5, 5, 8, 7,
            ],
        )
        .with_name("grid list")
    }

    fn grid_vertices(z: f32) -> Vec<Vertex> {
        let normal = -Vector3::z();
        (0..3)
            .flat_map(|row| {
                (0..3).map(move |col| {
                    let u = col as f32 * 0.5;
                    let v = row as f32 * 0.5;
                    Vertex::new(
                        Point3::new(-3.0 + 3.0 * col as f32, 3.0 - 3.0 * row as f32, z),
                        normal,
                        Vector2::new(u, v),
                    )
                    .with_tangent(Vector3::x())
                })
            })
            .collect()
    }
}

/// Mesh data as loaded. Never modified after construction; every frame's world
/// geometry is derived from it.
#[derive(Debug, Clone)]
pub struct ReferenceMesh {
    mesh: Mesh,
}

impl ReferenceMesh {
    pub fn new(mesh: Mesh) -> Self {
        Self { mesh }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Writes the reference vertices transformed by `world_matrix` into `out`,
    /// reusing its allocation.
    pub fn transform_into(&self, world_matrix: &Matrix4<f32>, out: &mut WorldMesh) {
        out.world_matrix = *world_matrix;
        self.mesh
            .vertices
            .par_iter()
            .map(|v| Vertex {
                position: world_matrix.transform_point(&v.position),
                normal: transform_direction(world_matrix, &v.normal),
                tangent: transform_direction(world_matrix, &v.tangent),
                ..*v
            })
            .collect_into_vec(&mut out.vertices);
    }

    pub fn to_world(&self, world_matrix: &Matrix4<f32>) -> WorldMesh {
        let mut world = WorldMesh::default();
        self.transform_into(world_matrix, &mut world);
        world
    }
}

/// World-space working copy of a [`ReferenceMesh`] for the current frame.
#[derive(Debug, Clone)]
pub struct WorldMesh {
    pub vertices: Vec<Vertex>,
    pub world_matrix: Matrix4<f32>,
}

impl Default for WorldMesh {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            world_matrix: Matrix4::identity(),
        }
    }
}

fn transform_direction(m: &Matrix4<f32>, v: &Vector3<f32>) -> Vector3<f32> {
    let t = m.transform_vector(v);
    t.try_normalize(1e-12).unwrap_or(t)
}
