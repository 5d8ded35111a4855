use std::collections::HashMap;

use nalgebra::{Point3, Vector3};
use rand::Rng;

/// Fraction of the rock's size used as the per-axis displacement bound.
const DISPLACEMENT: f32 = 0.05;

/// Raw buffers for the companion rock, ready to be handed to the renderer.
/// Kept engine-free so generation can be tested without a GL context.
pub struct RockMesh {
    pub coords: Vec<Point3<f32>>,
    pub faces: Vec<Point3<u16>>,
    pub normals: Vec<Vector3<f32>>,
}

/// An irregular rock: an icosphere with every vertex coordinate nudged by
/// a uniform draw from `[-0.05·size, +0.05·size)`, then freshly computed
/// shading normals. The randomness comes from the caller, so a seeded rng
/// reproduces the exact same rock.
pub fn generate_rock<R: Rng>(size: f32, rng: &mut R) -> RockMesh {
    let mut mesh = icosphere(size);

    let amplitude = DISPLACEMENT * size;
    for vertex in mesh.coords.iter_mut() {
        vertex.x += rng.gen_range(-amplitude..amplitude);
        vertex.y += rng.gen_range(-amplitude..amplitude);
        vertex.z += rng.gen_range(-amplitude..amplitude);
    }

    // The old normals described the sphere we just deformed away from.
    mesh.normals = vertex_normals(&mesh.coords, &mesh.faces);
    mesh
}

/// A regular icosahedron subdivided once (42 vertices, 80 faces), projected
/// onto a sphere of the given radius.
pub fn icosphere(size: f32) -> RockMesh {
    // Icosahedron vertices live on three orthogonal golden rectangles.
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    #[rustfmt::skip]
    let mut coords: Vec<Point3<f32>> = vec![
        Point3::new(-1.0,  t,  0.0), Point3::new( 1.0,  t,  0.0),
        Point3::new(-1.0, -t,  0.0), Point3::new( 1.0, -t,  0.0),
        Point3::new( 0.0, -1.0,  t), Point3::new( 0.0,  1.0,  t),
        Point3::new( 0.0, -1.0, -t), Point3::new( 0.0,  1.0, -t),
        Point3::new( t,  0.0, -1.0), Point3::new( t,  0.0,  1.0),
        Point3::new(-t,  0.0, -1.0), Point3::new(-t,  0.0,  1.0),
    ];
    #[rustfmt::skip]
    let base_faces: [(u16, u16, u16); 20] = [
        (0, 11, 5), (0, 5, 1), (0, 1, 7), (0, 7, 10), (0, 10, 11),
        (1, 5, 9), (5, 11, 4), (11, 10, 2), (10, 7, 6), (7, 1, 8),
        (3, 9, 4), (3, 4, 2), (3, 2, 6), (3, 6, 8), (3, 8, 9),
        (4, 9, 5), (2, 4, 11), (6, 2, 10), (8, 6, 7), (9, 8, 1),
    ];

    for vertex in coords.iter_mut() {
        vertex.coords.normalize_mut();
        vertex.coords *= size;
    }

    // One subdivision pass: split each face into four, caching edge
    // midpoints so shared edges share the new vertex.
    let mut midpoints: HashMap<(u16, u16), u16> = HashMap::new();
    let mut midpoint = |a: u16, b: u16, coords: &mut Vec<Point3<f32>>| -> u16 {
        let key = (u16::min(a, b), u16::max(a, b));
        *midpoints.entry(key).or_insert_with(|| {
            let mid = nalgebra::center(&coords[a as usize], &coords[b as usize]);
            let on_sphere = Point3::from(mid.coords.normalize() * size);
            coords.push(on_sphere);
            (coords.len() - 1) as u16
        })
    };

    let mut faces = Vec::with_capacity(base_faces.len() * 4);
    for &(a, b, c) in base_faces.iter() {
        let ab = midpoint(a, b, &mut coords);
        let bc = midpoint(b, c, &mut coords);
        let ca = midpoint(c, a, &mut coords);

        faces.push(Point3::new(a, ab, ca));
        faces.push(Point3::new(b, bc, ab));
        faces.push(Point3::new(c, ca, bc));
        faces.push(Point3::new(ab, bc, ca));
    }

    let normals = vertex_normals(&coords, &faces);
    RockMesh {
        coords,
        faces,
        normals,
    }
}

/// Area-weighted vertex normals computed from scratch.
fn vertex_normals(coords: &[Point3<f32>], faces: &[Point3<u16>]) -> Vec<Vector3<f32>> {
    let mut normals = vec![Vector3::zeros(); coords.len()];
    for face in faces {
        let a = coords[face.x as usize];
        let b = coords[face.y as usize];
        let c = coords[face.z as usize];
        let face_normal = (b - a).cross(&(c - a));
        for index in [face.x, face.y, face.z] {
            normals[index as usize] += face_normal;
        }
    }

    for (normal, vertex) in normals.iter_mut().zip(coords) {
        if normal.normalize_mut() < 1e-9 {
            // Degenerate neighborhood; fall back to the radial direction.
            *normal = vertex.coords.normalize();
        }
    }
    normals
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_icosphere_shape() {
        let mesh = icosphere(2.0);
        assert_eq!(mesh.coords.len(), 42);
        assert_eq!(mesh.faces.len(), 80);
        assert_eq!(mesh.normals.len(), 42);

        for vertex in &mesh.coords {
            approx::assert_relative_eq!(vertex.coords.norm(), 2.0, max_relative = 1e-5);
        }
    }

    #[test]
    fn test_same_seed_same_rock() {
        let a = generate_rock(1.5, &mut StdRng::seed_from_u64(42));
        let b = generate_rock(1.5, &mut StdRng::seed_from_u64(42));
        assert_eq!(a.coords, b.coords);
        assert_eq!(a.faces, b.faces);
        assert_eq!(a.normals, b.normals);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate_rock(1.5, &mut StdRng::seed_from_u64(1));
        let b = generate_rock(1.5, &mut StdRng::seed_from_u64(2));
        assert_ne!(a.coords, b.coords);
    }

    #[test]
    fn test_displacement_is_bounded() {
        let size = 3.0;
        let base = icosphere(size);
        let rock = generate_rock(size, &mut StdRng::seed_from_u64(1234));

        for (displaced, original) in rock.coords.iter().zip(&base.coords) {
            let delta = displaced - original;
            assert!(delta.x.abs() <= DISPLACEMENT * size);
            assert!(delta.y.abs() <= DISPLACEMENT * size);
            assert!(delta.z.abs() <= DISPLACEMENT * size);
        }
    }

    #[test]
    fn test_normals_are_unit_length() {
        let rock = generate_rock(1.0, &mut StdRng::seed_from_u64(5));
        for normal in &rock.normals {
            approx::assert_relative_eq!(normal.norm(), 1.0, max_relative = 1e-5);
        }
    }
}
