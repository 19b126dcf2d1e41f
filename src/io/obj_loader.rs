use crate::core::geometry::Vertex;
use crate::error::{RenderError, Result};
use crate::scene::mesh::Mesh;
use log::{info, warn};
use nalgebra::{Point3, Vector2, Vector3};
use std::path::Path;

/// Loads an OBJ file and returns a unified triangle-list Mesh.
///
/// OBJ data is right-handed with counter-clockwise front faces and a bottom-left
/// texture origin. Z is negated, each triangle's winding is reversed and V is
/// flipped so the mesh matches the renderer's left-handed, clockwise, top-left
/// conventions. Missing normals are generated from the faces; tangents are always
/// generated from the UV layout.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    info!("Loading OBJ file: {:?}", path);

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };

    // Materials (MTL) are not used; textures come from the scene config.
    let (models, _materials) =
        tobj::load_obj(path, &load_options).map_err(|source| RenderError::Obj {
            path: path.to_path_buf(),
            source,
        })?;

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mesh = mesh_from_models(&models, &name)?;

    info!(
        "OBJ loaded successfully. Total vertices: {}, Total triangles: {}",
        mesh.vertices.len(),
        mesh.indices.len() / 3
    );
    Ok(mesh)
}

/// Merges every model of an OBJ into one mesh.
pub fn mesh_from_models(models: &[tobj::Model], name: &str) -> Result<Mesh> {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut missing_normals = false;

    for model in models {
        let mesh = &model.mesh;
        let index_offset = vertices.len() as u32;
        let num_vertices = mesh.positions.len() / 3;

        let has_normals = mesh.normals.len() == mesh.positions.len();
        let has_texcoords = mesh.texcoords.len() / 2 == num_vertices;

        if !has_normals {
            warn!("Mesh '{}' is missing normals. Generating face normals.", model.name);
            missing_normals = true;
        }
        if !has_texcoords {
            warn!("Mesh '{}' is missing texture coordinates.", model.name);
        }

        for i in 0..num_vertices {
            let position = Point3::new(
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                -mesh.positions[i * 3 + 2],
            );
            let normal = if has_normals {
                Vector3::new(
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    -mesh.normals[i * 3 + 2],
                )
            } else {
                Vector3::zeros()
            };
            let uv = if has_texcoords {
                Vector2::new(mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1])
            } else {
                Vector2::zeros()
            };

            vertices.push(Vertex::new(position, normal, uv));
        }

        for tri in mesh.indices.chunks_exact(3) {
            indices.extend_from_slice(&[
                tri[0] + index_offset,
                tri[2] + index_offset,
                tri[1] + index_offset,
            ]);
        }
    }

    let mut mesh = Mesh::new(vertices, indices).with_name(name);
    if mesh.triangle_count() == 0 {
        return Err(RenderError::EmptyMesh(name.to_string()));
    }

    if missing_normals {
        generate_normals(&mut mesh);
    }
    generate_tangents(&mut mesh);
    Ok(mesh)
}

/// Fills zero normals with the area-weighted average of the adjacent face normals.
pub fn generate_normals(mesh: &mut Mesh) {
    let mut accumulated = vec![Vector3::zeros(); mesh.vertices.len()];
    for [a, b, c] in mesh.triangles() {
        let (a, b, c) = (a as usize, b as usize, c as usize);
        let p0 = mesh.vertices[a].position;
        let face = (mesh.vertices[b].position - p0).cross(&(mesh.vertices[c].position - p0));
        for i in [a, b, c] {
            accumulated[i] += face;
        }
    }

    for (vertex, n) in mesh.vertices.iter_mut().zip(accumulated) {
        if vertex.normal == Vector3::zeros() {
            vertex.normal = n.try_normalize(1e-12).unwrap_or_else(Vector3::zeros);
        }
    }
}

/// Computes per-vertex tangents (direction of increasing U) from the UV layout,
/// orthogonalized against the vertex normal.
pub fn generate_tangents(mesh: &mut Mesh) {
    let mut accumulated = vec![Vector3::zeros(); mesh.vertices.len()];
    for [a, b, c] in mesh.triangles() {
        let (a, b, c) = (a as usize, b as usize, c as usize);
        let (v0, v1, v2) = (&mesh.vertices[a], &mesh.vertices[b], &mesh.vertices[c]);

        let edge1 = v1.position - v0.position;
        let edge2 = v2.position - v0.position;
        let duv1 = v1.uv - v0.uv;
        let duv2 = v2.uv - v0.uv;

        let det = duv1.x * duv2.y - duv1.y * duv2.x;
        if det.abs() < 1e-12 {
            continue;
        }
        let tangent = (edge1 * duv2.y - edge2 * duv1.y) / det;
        for i in [a, b, c] {
            accumulated[i] += tangent;
        }
    }

    for (vertex, t) in mesh.vertices.iter_mut().zip(accumulated) {
        let n = vertex.normal;
        let orthogonal = t - n * n.dot(&t);
        vertex.tangent = orthogonal.try_normalize(1e-12).unwrap_or_else(Vector3::zeros);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const QUAD_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    fn write_obj(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".obj").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn converts_to_left_handed_clockwise() {
        let file = write_obj(QUAD_OBJ);
        let mesh = load_obj(file.path()).unwrap();

        assert_eq!(mesh.triangle_count(), 2);
        for v in &mesh.vertices {
            assert!((v.normal - -Vector3::z()).norm() < 1e-6);
        }
        for [a, b, c] in mesh.triangles() {
            let p = |i: u32| mesh.vertices[i as usize].position;
            let winding = (p(b) - p(a)).cross(&(p(c) - p(a)));
            assert!(winding.z < 0.0);
        }
    }

    #[test]
    fn flips_v_and_builds_tangents() {
        let file = write_obj(QUAD_OBJ);
        let mesh = load_obj(file.path()).unwrap();

        let origin = mesh
            .vertices
            .iter()
            .find(|v| v.position == Point3::new(0.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(origin.uv, Vector2::new(0.0, 1.0));

        for v in &mesh.vertices {
            assert!((v.tangent - Vector3::x()).norm() < 1e-5);
        }
    }

    #[test]
    fn generates_missing_normals() {
        let file = write_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        let mesh = load_obj(file.path()).unwrap();
        for v in &mesh.vertices {
            assert!((v.normal - -Vector3::z()).norm() < 1e-6);
        }
    }

    #[test]
    fn empty_file_is_rejected() {
        let file = write_obj("# nothing here\n");
        assert!(load_obj(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_an_obj_error() {
        let err = load_obj("no/such/model.obj").unwrap_err();
        assert!(matches!(err, RenderError::Obj { .. }));
    }
}
