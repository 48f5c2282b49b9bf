//! Vertex data for the demo scenes.
//!
//! Everything here returns plain element vectors; a [`crate::layout::VertexLayout`]
//! says how the elements group into vertices. Index lists come back as their
//! own vectors, ready for an index buffer upload.

/// A triangle in clip space, xy positions only.
pub fn triangle() -> Vec<f32> {
    vec![0.0, 0.5, -0.5, -0.5, 0.5, -0.5]
}

/// A quad as a 4-vertex triangle strip, xy position and uv interleaved
/// (stride 4, uv at offset 2).
pub fn quad_uv() -> Vec<f32> {
    vec![
        -0.5, 0.5, 0.0, 1.0, //
        -0.5, -0.5, 0.0, 0.0, //
        0.5, 0.5, 1.0, 1.0, //
        0.5, -0.5, 1.0, 0.0, //
    ]
}

/// A triangle with a color per vertex, interleaved xy + rgb (stride 5,
/// color at offset 2).
pub fn colored_triangle() -> Vec<f32> {
    vec![
        0.0, 0.5, 1.0, 0.0, 0.0, //
        -0.5, -0.5, 0.0, 1.0, 0.0, //
        0.5, -0.5, 0.0, 0.0, 1.0, //
    ]
}

/// Three overlapping triangles staggered along z, interleaved xyz + rgb
/// (stride 6, color at offset 3). `depths[0]` is the green back triangle,
/// `depths[2]` the blue front one.
pub fn staggered_triangles(depths: [f32; 3]) -> Vec<f32> {
    let xy: [[f32; 6]; 3] = [
        [0.0, 0.5, -0.5, -0.5, 0.5, -0.5],
        [0.5, 0.4, -0.5, 0.4, 0.0, -0.6],
        [0.0, 0.5, -0.5, -0.5, 0.5, -0.5],
    ];
    let rgb: [[f32; 9]; 3] = [
        [0.4, 1.0, 0.4, 0.4, 1.0, 0.4, 1.0, 0.4, 0.4],
        [1.0, 0.4, 0.4, 1.0, 1.0, 0.4, 1.0, 1.0, 0.4],
        [0.4, 0.4, 1.0, 0.4, 0.4, 1.0, 1.0, 0.4, 0.4],
    ];
    let mut data = Vec::with_capacity(9 * 6);
    for t in 0..3 {
        for v in 0..3 {
            data.extend_from_slice(&[xy[t][v * 2], xy[t][v * 2 + 1], depths[t]]);
            data.extend_from_slice(&rgb[t][v * 3..v * 3 + 3]);
        }
    }
    data
}

/// A cube from 8 shared corners, one color per corner, interleaved xyz + rgb
/// (stride 6, color at offset 3), plus triangle indices.
///
/// ```text
///    v6----- v5
///   /|      /|
///  v1------v0|
///  | |     | |
///  | |v7---|-|v4
///  |/      |/
///  v2------v3
/// ```
pub fn cube() -> (Vec<f32>, Vec<u16>) {
    let vertices = vec![
        1.0, 1.0, 1.0, 1.0, 1.0, 1.0, // v0 white
        -1.0, 1.0, 1.0, 1.0, 0.0, 1.0, // v1 magenta
        -1.0, -1.0, 1.0, 1.0, 0.0, 0.0, // v2 red
        1.0, -1.0, 1.0, 1.0, 1.0, 0.0, // v3 yellow
        1.0, -1.0, -1.0, 0.0, 1.0, 0.0, // v4 green
        1.0, 1.0, -1.0, 0.0, 1.0, 1.0, // v5 cyan
        -1.0, 1.0, -1.0, 0.0, 0.0, 1.0, // v6 blue
        -1.0, -1.0, -1.0, 0.0, 0.0, 0.0, // v7 black
    ];
    let indices = vec![
        0, 1, 2, 0, 2, 3, // front
        0, 3, 4, 0, 4, 5, // right
        0, 5, 6, 0, 6, 1, // up
        1, 6, 7, 1, 7, 2, // left
        7, 4, 3, 7, 3, 2, // down
        4, 7, 6, 4, 6, 5, // back
    ];
    (vertices, indices)
}

/// A cube with corners duplicated per face so every face carries a flat
/// normal. Positions, colors and normals are separate tightly packed
/// position streams (24 vertices of three elements each).
pub struct FacedCube {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u16>,
}

/// Face-duplicated cube data: front, right, up, left, down, back.
pub fn cube_faces() -> FacedCube {
    let positions = vec![
        1.0, 1.0, 1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, 1.0, // v0-v1-v2-v3 front
        1.0, 1.0, 1.0, 1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, // v0-v3-v4-v5 right
        1.0, 1.0, 1.0, 1.0, 1.0, -1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, // v0-v5-v6-v1 up
        -1.0, 1.0, 1.0, -1.0, 1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, 1.0, // v1-v6-v7-v2 left
        -1.0, -1.0, -1.0, 1.0, -1.0, -1.0, 1.0, -1.0, 1.0, -1.0, -1.0, 1.0, // v7-v4-v3-v2 down
        1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0, // v4-v7-v6-v5 back
    ];
    let colors = [1.0, 0.0, 0.0].repeat(24);
    let normals = vec![
        0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, // front
        1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, // right
        0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, // up
        -1.0, 0.0, 0.0, -1.0, 0.0, 0.0, -1.0, 0.0, 0.0, -1.0, 0.0, 0.0, // left
        0.0, -1.0, 0.0, 0.0, -1.0, 0.0, 0.0, -1.0, 0.0, 0.0, -1.0, 0.0, // down
        0.0, 0.0, -1.0, 0.0, 0.0, -1.0, 0.0, 0.0, -1.0, 0.0, 0.0, -1.0, // back
    ];
    let indices = vec![
        0, 1, 2, 0, 2, 3, // front
        4, 5, 6, 4, 6, 7, // right
        8, 9, 10, 8, 10, 11, // up
        12, 13, 14, 12, 14, 15, // left
        16, 17, 18, 16, 18, 19, // down
        20, 21, 22, 20, 22, 23, // back
    ];
    FacedCube {
        positions,
        colors,
        normals,
        indices,
    }
}

/// A unit UV sphere with `bands` latitude and longitude divisions.
///
/// Returns tightly packed xyz positions and triangle indices. Every
/// position sits on the unit sphere, so the same buffer doubles as the
/// normal stream.
pub fn uv_sphere(bands: u32) -> (Vec<f32>, Vec<u32>) {
    let bands = bands.max(2);
    let ring = bands + 1;

    let mut positions = Vec::with_capacity((ring * ring * 3) as usize);
    for j in 0..ring {
        let aj = j as f32 * std::f32::consts::PI / bands as f32;
        let (sj, cj) = aj.sin_cos();
        for i in 0..ring {
            let ai = i as f32 * 2.0 * std::f32::consts::PI / bands as f32;
            let (si, ci) = ai.sin_cos();
            positions.push(si * sj);
            positions.push(cj);
            positions.push(ci * sj);
        }
    }

    let mut indices = Vec::with_capacity((bands * bands * 6) as usize);
    for j in 0..bands {
        for i in 0..bands {
            let p1 = j * ring + i;
            let p2 = p1 + ring;
            indices.extend_from_slice(&[p1, p2, p1 + 1, p1 + 1, p2, p2 + 1]);
        }
    }
    (positions, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn triangle_and_quad_sizes() {
        assert_eq!(triangle().len(), 6);
        assert_eq!(quad_uv().len(), 16);
        assert_eq!(colored_triangle().len(), 15);
    }

    #[test]
    fn staggered_triangles_inject_depths() {
        let data = staggered_triangles([-0.4, -0.2, 0.0]);
        assert_eq!(data.len(), 54);
        // z lives at element 2 of each six-element vertex
        assert_relative_eq!(data[2], -0.4);
        assert_relative_eq!(data[3 * 6 + 2], -0.2);
        assert_relative_eq!(data[6 * 6 + 2], 0.0);
        // back triangle keeps its green lead vertex
        assert_relative_eq!(data[3], 0.4);
        assert_relative_eq!(data[4], 1.0);
    }

    #[test]
    fn cube_indices_cover_eight_corners() {
        let (vertices, indices) = cube();
        assert_eq!(vertices.len(), 8 * 6);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| i < 8));
        assert!((0..8).all(|c| indices.contains(&c)));
    }

    #[test]
    fn faced_cube_streams_agree() {
        let cube = cube_faces();
        assert_eq!(cube.positions.len(), 24 * 3);
        assert_eq!(cube.colors.len(), 24 * 3);
        assert_eq!(cube.normals.len(), 24 * 3);
        assert_eq!(cube.indices.len(), 36);
        assert!(cube.indices.iter().all(|&i| i < 24));
        // every face normal is unit length and axis aligned
        for n in cube.normals.chunks(3) {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert_relative_eq!(len, 1.0);
        }
    }

    #[test]
    fn sphere_counts_match_band_count() {
        let (positions, indices) = uv_sphere(13);
        assert_eq!(positions.len(), 14 * 14 * 3);
        assert_eq!(indices.len(), 13 * 13 * 6);
        let vertex_count = (positions.len() / 3) as u32;
        assert!(indices.iter().all(|&i| i < vertex_count));
    }

    #[test]
    fn sphere_positions_are_unit_length() {
        let (positions, _) = uv_sphere(8);
        for p in positions.chunks(3) {
            let len = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert_relative_eq!(len, 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn degenerate_band_counts_are_clamped() {
        let (positions, indices) = uv_sphere(0);
        assert_eq!(positions.len(), 3 * 3 * 3);
        assert_eq!(indices.len(), 2 * 2 * 6);
    }
}
