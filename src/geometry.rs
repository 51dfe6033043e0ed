//! Procedural mesh generation.
//!
//! Every generator here is a pure function: the same parameters always
//! produce the same arrays. Geometry is kept as separate attribute streams
//! ([`MeshData`]) rather than interleaved vertices because each attribute is
//! uploaded to its own GPU buffer (see [`Renderable`](crate::Renderable)).
//!
//! Generators clamp out-of-range segment counts to their documented ranges
//! instead of producing degenerate meshes. The upper bound of 255 segments
//! per axis keeps every grid within reach of the u16 index streams
//! (256 * 256 vertices at most).

use glam::Vec3;

/// CPU-side mesh geometry as parallel attribute streams.
///
/// Invariants, upheld by every generator:
/// - `positions.len() / 3 == normals.len() / 3 == uvs.len() / 2`
/// - every index is `< positions.len() / 3`
/// - triangle winding is counter-clockwise seen from the outward normal
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    /// Vertex positions, three floats per vertex.
    pub positions: Vec<f32>,
    /// Triangle indices into the vertex streams.
    pub indices: Vec<u16>,
    /// Texture coordinates, two floats per vertex.
    pub uvs: Vec<f32>,
    /// Vertex normals, three floats per vertex.
    pub normals: Vec<f32>,
}

impl MeshData {
    /// Number of vertices in the streams.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles described by the index stream.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Generates a unit plane on the XY axis subdivided into a grid.
///
/// The grid spans [-0.5, 0.5] on both axes, centered at the origin, with all
/// normals facing +Z. Row 0 sits at y = +0.5; `u` runs 0..1 across the width
/// and `v` runs 1..0 down the height (top-left texture origin). Segment
/// counts are clamped to 1..=255.
///
/// Produces `(width_segments + 1) * (height_segments + 1)` vertices and
/// `2 * width_segments * height_segments` triangles.
pub fn plane(width_segments: u32, height_segments: u32) -> MeshData {
    let ws = width_segments.clamp(1, 255);
    let hs = height_segments.clamp(1, 255);

    let mut mesh = MeshData::default();

    for i in 0..=hs {
        let v = i as f32 / hs as f32;
        let y = 0.5 - v;

        for j in 0..=ws {
            let u = j as f32 / ws as f32;
            let x = u - 0.5;

            mesh.positions.extend_from_slice(&[x, y, 0.0]);
            mesh.normals.extend_from_slice(&[0.0, 0.0, 1.0]);
            mesh.uvs.extend_from_slice(&[u, 1.0 - v]);
        }
    }

    for i in 0..hs {
        for j in 0..ws {
            let a = (j + (ws + 1) * i) as u16;
            let b = (j + (ws + 1) * (i + 1)) as u16;
            let c = (j + 1 + (ws + 1) * (i + 1)) as u16;
            let d = (j + 1 + (ws + 1) * i) as u16;

            // two triangles for the grid cell at (i, j)
            mesh.indices.extend_from_slice(&[a, b, d]);
            mesh.indices.extend_from_slice(&[b, c, d]);
        }
    }

    mesh
}

/// Generates a UV sphere of the given radius.
///
/// Built ring by ring from pole to pole; each vertex normal is its position
/// direction from the center. The pole rings get a half-texel `u` offset to
/// hide the UV seam, and each pole quad emits a single triangle so no
/// zero-area geometry reaches the GPU.
///
/// `width_segments` is clamped to 3..=255 and `height_segments` to 2..=255.
/// Produces `2 * width_segments * (height_segments - 1)` triangles.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let ws = width_segments.clamp(3, 255);
    let hs = height_segments.clamp(2, 255);

    let mut mesh = MeshData::default();
    let mut grid: Vec<Vec<u16>> = Vec::with_capacity(hs as usize + 1);

    for j in 0..=hs {
        let v = j as f32 / hs as f32;

        // half-texel shift at the poles to avoid seam artifacts
        let u_offset = if j == 0 {
            0.5 / ws as f32
        } else if j == hs {
            -0.5 / ws as f32
        } else {
            0.0
        };

        let mut row = Vec::with_capacity(ws as usize + 1);

        for i in 0..=ws {
            let u = i as f32 / ws as f32;

            let position = Vec3::new(
                -radius * (u * std::f32::consts::TAU).cos() * (v * std::f32::consts::PI).sin(),
                radius * (v * std::f32::consts::PI).cos(),
                radius * (u * std::f32::consts::TAU).sin() * (v * std::f32::consts::PI).sin(),
            );
            let normal = position.normalize_or_zero();

            mesh.positions
                .extend_from_slice(&[position.x, position.y, position.z]);
            mesh.normals
                .extend_from_slice(&[normal.x, normal.y, normal.z]);
            mesh.uvs.extend_from_slice(&[u + u_offset, 1.0 - v]);

            row.push((j * (ws + 1) + i) as u16);
        }

        grid.push(row);
    }

    for j in 0..hs as usize {
        for i in 0..ws as usize {
            let a = grid[j][i + 1];
            let b = grid[j][i];
            let c = grid[j + 1][i];
            let d = grid[j + 1][i + 1];

            // each pole quad collapses to one triangle
            if j != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if j != hs as usize - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_in_range(mesh: &MeshData) {
        let count = mesh.vertex_count();
        for &i in &mesh.indices {
            assert!((i as usize) < count, "index {} out of range {}", i, count);
        }
    }

    fn triangle_area(mesh: &MeshData, tri: &[u16]) -> f32 {
        let p = |i: u16| {
            let i = i as usize * 3;
            Vec3::new(
                mesh.positions[i],
                mesh.positions[i + 1],
                mesh.positions[i + 2],
            )
        };
        let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
        (b - a).cross(c - a).length() * 0.5
    }

    #[test]
    fn plane_counts() {
        for (ws, hs) in [(1, 1), (2, 2), (3, 1), (30, 30)] {
            let mesh = plane(ws, hs);
            assert_eq!(mesh.vertex_count(), ((ws + 1) * (hs + 1)) as usize);
            assert_eq!(mesh.indices.len(), (6 * ws * hs) as usize);
            assert_eq!(mesh.uvs.len(), mesh.vertex_count() * 2);
            assert_eq!(mesh.normals.len(), mesh.vertex_count() * 3);
            assert_indices_in_range(&mesh);
        }
    }

    #[test]
    fn plane_2x2_scenario() {
        let mesh = plane(2, 2);
        assert_eq!(mesh.vertex_count(), 9);
        assert_eq!(mesh.indices.len(), 24);

        for n in mesh.normals.chunks(3) {
            assert_eq!(n, &[0.0, 0.0, 1.0]);
        }

        // corner vertices: 0 = top-left, 2 = top-right, 6 = bottom-left,
        // 8 = bottom-right
        let uv = |i: usize| (mesh.uvs[i * 2], mesh.uvs[i * 2 + 1]);
        assert_eq!(uv(0), (0.0, 1.0));
        assert_eq!(uv(2), (1.0, 1.0));
        assert_eq!(uv(6), (0.0, 0.0));
        assert_eq!(uv(8), (1.0, 0.0));
    }

    #[test]
    fn plane_spans_unit_square() {
        let mesh = plane(4, 3);
        let xs: Vec<f32> = mesh.positions.chunks(3).map(|p| p[0]).collect();
        let ys: Vec<f32> = mesh.positions.chunks(3).map(|p| p[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::INFINITY, f32::min), -0.5);
        assert_eq!(xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max), 0.5);
        assert_eq!(ys.iter().cloned().fold(f32::INFINITY, f32::min), -0.5);
        assert_eq!(ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max), 0.5);
    }

    #[test]
    fn plane_has_no_duplicate_triangles() {
        let mesh = plane(3, 3);
        let mut seen = std::collections::HashSet::new();
        for tri in mesh.indices.chunks(3) {
            assert!(seen.insert([tri[0], tri[1], tri[2]]));
        }
    }

    #[test]
    fn plane_clamps_zero_segments() {
        let clamped = plane(0, 0);
        let minimum = plane(1, 1);
        assert_eq!(clamped.positions, minimum.positions);
        assert_eq!(clamped.indices, minimum.indices);
    }

    #[test]
    fn plane_clamps_oversized_segments() {
        // 256 segments per axis would need 257 * 257 vertices, past what u16
        // indices can address; the clamp caps the grid at 256 * 256.
        let mesh = plane(256, 256);
        assert_eq!(mesh.vertex_count(), 65536);
        assert_indices_in_range(&mesh);
        let max = mesh.indices.iter().copied().max().unwrap();
        assert_eq!(max as usize, mesh.vertex_count() - 1);
    }

    #[test]
    fn sphere_clamps_oversized_segments() {
        let mesh = sphere(1.0, 300, 300);
        assert_eq!(mesh.vertex_count(), 65536);
        assert_indices_in_range(&mesh);
    }

    #[test]
    fn sphere_counts() {
        for (ws, hs) in [(3, 2), (8, 6), (20, 20)] {
            let mesh = sphere(1.0, ws, hs);
            assert_eq!(mesh.vertex_count(), ((ws + 1) * (hs + 1)) as usize);
            assert_eq!(mesh.triangle_count(), (2 * ws * (hs - 1)) as usize);
            assert_indices_in_range(&mesh);
        }
    }

    #[test]
    fn sphere_normals_are_unit_length() {
        let mesh = sphere(50.0, 20, 20);
        for n in mesh.normals.chunks(3) {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn sphere_normals_match_position_direction() {
        let radius = 7.5;
        let mesh = sphere(radius, 12, 8);
        for (p, n) in mesh.positions.chunks(3).zip(mesh.normals.chunks(3)) {
            let pos = Vec3::new(p[0], p[1], p[2]);
            let norm = Vec3::new(n[0], n[1], n[2]);
            assert!((pos - norm * radius).length() < 1e-4);
        }
    }

    #[test]
    fn sphere_emits_no_zero_area_triangles() {
        for (ws, hs) in [(3, 2), (5, 3), (20, 20)] {
            let mesh = sphere(1.0, ws, hs);
            for tri in mesh.indices.chunks(3) {
                assert!(triangle_area(&mesh, tri) > 1e-7);
            }
        }
    }

    #[test]
    fn sphere_minimum_resolution_is_two_pole_fans() {
        // hs == 2: both rows touch a pole, so each quad contributes exactly
        // one triangle.
        let mesh = sphere(1.0, 4, 2);
        assert_eq!(mesh.triangle_count(), 8);
    }

    #[test]
    fn sphere_clamps_segment_minimums() {
        let clamped = sphere(2.0, 1, 0);
        let minimum = sphere(2.0, 3, 2);
        assert_eq!(clamped.positions, minimum.positions);
        assert_eq!(clamped.indices, minimum.indices);
    }

    #[test]
    fn sphere_pole_u_offset() {
        let ws = 8;
        let mesh = sphere(1.0, ws, 4);
        // first vertex of the top ring carries the +half-texel shift
        assert!((mesh.uvs[0] - 0.5 / ws as f32).abs() < 1e-6);
        // first vertex of an interior ring does not
        let interior = (ws as usize + 1) * 2;
        assert_eq!(mesh.uvs[interior * 2], 0.0);
    }
}
