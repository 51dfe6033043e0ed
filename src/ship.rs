//! Procedural ship hull geometry.
//!
//! The ship is a fixed catalog of axis-aligned boxes — hull sections, masts,
//! yards, furled sails, rigging, deck structures, boats, anchors — merged
//! into one mesh. Each box contributes 24 vertices (4 per face, unshared so
//! every face keeps a flat normal and its own UV quad) and 12 triangles.

use crate::geometry::MeshData;

/// Accumulates boxes into a single combined attribute/index stream.
struct HullBuilder {
    mesh: MeshData,
    index_offset: u16,
    box_count: usize,
}

impl HullBuilder {
    fn new() -> Self {
        Self {
            mesh: MeshData::default(),
            index_offset: 0,
            box_count: 0,
        }
    }

    /// Appends one box centered at `(x, y, z)` with the given extents.
    /// Face UVs map to `[0, uv_scale]` on both axes.
    fn push_box(&mut self, x: f32, y: f32, z: f32, width: f32, height: f32, depth: f32, uv_scale: f32) {
        let hw = width / 2.0;
        let hh = height / 2.0;
        let hd = depth / 2.0;

        #[rustfmt::skip]
        let corners: [[f32; 3]; 24] = [
            // front (z+)
            [x - hw, y - hh, z + hd], [x + hw, y - hh, z + hd],
            [x + hw, y + hh, z + hd], [x - hw, y + hh, z + hd],
            // back (z-)
            [x + hw, y - hh, z - hd], [x - hw, y - hh, z - hd],
            [x - hw, y + hh, z - hd], [x + hw, y + hh, z - hd],
            // top (y+)
            [x - hw, y + hh, z - hd], [x - hw, y + hh, z + hd],
            [x + hw, y + hh, z + hd], [x + hw, y + hh, z - hd],
            // bottom (y-)
            [x - hw, y - hh, z + hd], [x - hw, y - hh, z - hd],
            [x + hw, y - hh, z - hd], [x + hw, y - hh, z + hd],
            // right (x+)
            [x + hw, y - hh, z + hd], [x + hw, y - hh, z - hd],
            [x + hw, y + hh, z - hd], [x + hw, y + hh, z + hd],
            // left (x-)
            [x - hw, y - hh, z - hd], [x - hw, y - hh, z + hd],
            [x - hw, y + hh, z + hd], [x - hw, y + hh, z - hd],
        ];

        for corner in &corners {
            self.mesh.positions.extend_from_slice(corner);
        }

        const FACE_NORMALS: [[f32; 3]; 6] = [
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
        ];

        for normal in &FACE_NORMALS {
            for _ in 0..4 {
                self.mesh.normals.extend_from_slice(normal);
            }
            self.mesh.uvs.extend_from_slice(&[
                0.0, 0.0, uv_scale, 0.0, uv_scale, uv_scale, 0.0, uv_scale,
            ]);
        }

        for face in 0..6u16 {
            let base = self.index_offset + face * 4;
            self.mesh
                .indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        self.index_offset += 24;
        self.box_count += 1;
    }
}

/// Generates the complete ship hull as one combined mesh.
///
/// The catalog is deterministic: 48 boxes, 1152 vertices, 576 triangles.
pub fn ship_hull() -> MeshData {
    let mut hull = HullBuilder::new();

    // main hull
    hull.push_box(0.0, 0.0, 0.0, 18.0, 2.5, 5.5, 2.0);
    hull.push_box(8.0, 0.2, 0.0, 5.0, 2.0, 4.5, 1.5); // forward section
    hull.push_box(-8.0, 0.2, 0.0, 5.0, 2.0, 4.5, 1.5); // aft section

    // hull details
    hull.push_box(12.0, -0.5, 0.0, 3.0, 1.5, 3.5, 1.0); // bow section
    hull.push_box(14.0, -0.3, 0.0, 1.5, 1.0, 2.0, 0.5); // bow point
    hull.push_box(-12.0, -0.3, 0.0, 3.0, 2.0, 4.0, 1.0); // stern section

    // deck planking
    for i in (-8..=8).step_by(2) {
        hull.push_box(i as f32, 1.3, 0.0, 1.8, 0.1, 5.0, 0.5);
    }

    // masts
    hull.push_box(6.0, 8.0, 0.0, 0.4, 16.0, 0.4, 0.2); // main mast
    hull.push_box(10.0, 7.0, 0.0, 0.35, 14.0, 0.35, 0.2); // fore mast
    hull.push_box(-2.0, 6.0, 0.0, 0.3, 12.0, 0.3, 0.2); // mizzen mast

    // yards and booms
    hull.push_box(6.0, 11.0, 0.0, 5.0, 0.25, 0.25, 0.3); // main top yard
    hull.push_box(6.0, 9.0, 0.0, 4.5, 0.25, 0.25, 0.3); // main upper yard
    hull.push_box(6.0, 6.0, 0.0, 4.0, 0.25, 0.25, 0.3); // main lower yard
    hull.push_box(6.0, 3.0, 0.0, 3.5, 0.25, 0.25, 0.3); // main boom
    hull.push_box(10.0, 9.0, 0.0, 3.5, 0.2, 0.2, 0.3); // fore upper yard
    hull.push_box(10.0, 6.5, 0.0, 3.0, 0.2, 0.2, 0.3); // fore lower yard
    hull.push_box(10.0, 4.0, 0.0, 2.5, 0.2, 0.2, 0.3); // fore boom
    hull.push_box(-2.0, 8.0, 0.0, 2.5, 0.2, 0.2, 0.3); // mizzen yard
    hull.push_box(-2.0, 5.0, 0.0, 2.0, 0.2, 0.2, 0.3); // mizzen boom

    // furled sails bundled on the yards
    hull.push_box(6.0, 11.0, 0.0, 4.5, 0.8, 0.6, 0.5); // main topsail
    hull.push_box(6.0, 9.0, 0.0, 4.0, 0.9, 0.7, 0.5); // main course
    hull.push_box(10.0, 9.0, 0.0, 3.0, 0.7, 0.5, 0.5); // fore topsail
    hull.push_box(10.0, 6.5, 0.0, 2.5, 0.8, 0.6, 0.5); // fore course
    hull.push_box(-2.0, 8.0, 0.0, 2.0, 0.6, 0.4, 0.5); // mizzen sail

    // rigging
    hull.push_box(8.0, 4.0, 0.0, 4.0, 0.05, 0.05, 0.1); // forward stay
    hull.push_box(2.0, 4.0, 0.0, 8.0, 0.05, 0.05, 0.1); // main stay
    hull.push_box(8.0, 6.0, 1.5, 0.05, 0.05, 3.0, 0.1); // port shrouds
    hull.push_box(8.0, 6.0, -1.5, 0.05, 0.05, 3.0, 0.1); // starboard shrouds

    // deck structures
    hull.push_box(4.0, 2.0, 0.0, 3.0, 2.0, 3.0, 1.0); // main cabin
    hull.push_box(4.0, 3.0, 0.0, 2.5, 0.8, 2.5, 0.5); // cabin roof
    hull.push_box(5.0, 3.5, 0.0, 1.0, 0.5, 1.0, 0.3); // cabin chimney
    hull.push_box(-5.0, 1.8, 0.0, 2.5, 1.5, 2.5, 0.8); // aft cabin
    hull.push_box(-5.0, 2.8, 0.0, 2.0, 0.6, 2.0, 0.4); // aft cabin roof
    hull.push_box(9.0, 1.5, 0.0, 2.0, 1.0, 2.0, 0.6); // forward structure
    hull.push_box(0.0, 1.6, 2.0, 1.0, 0.8, 0.5, 0.3); // port rail
    hull.push_box(0.0, 1.6, -2.0, 1.0, 0.8, 0.5, 0.3); // starboard rail

    // ship's boats
    hull.push_box(2.0, 2.5, 1.8, 3.0, 0.8, 1.0, 0.4);
    hull.push_box(2.0, 2.5, -1.8, 3.0, 0.8, 1.0, 0.4);

    // anchors
    hull.push_box(13.0, 0.5, 1.5, 0.5, 1.5, 0.3, 0.2);
    hull.push_box(13.0, 0.5, -1.5, 0.5, 1.5, 0.3, 0.2);

    debug_assert_eq!(hull.box_count, 48);
    hull.mesh
}
