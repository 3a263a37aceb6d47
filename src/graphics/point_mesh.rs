use crate::prelude::*;
use bevy::{
    prelude::*,
    render::{
        mesh::{Indices, PrimitiveTopology},
        render_asset::RenderAssetUsages,
    },
};
use rayon::prelude::*;

/// Quad corners in billboard space, counter-clockwise.
const CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Expands every particle into a camera-facing quad.
///
/// All four vertices of a quad share the particle position and color; the
/// UV attribute carries the corner, which the vertex shader scales by the
/// point size in view space. Reads the flat stride-3 views of `buffers`.
pub fn billboard_mesh(buffers: &GalaxyBuffers) -> Mesh {
    let count = buffers.len();

    let mut positions = vec![[0.0f32; 3]; count * 4];
    let mut corners = vec![[0.0f32; 2]; count * 4];
    let mut colors = vec![[0.0f32; 4]; count * 4];
    let mut indices = vec![0u32; count * 6];

    positions
        .par_chunks_exact_mut(4)
        .zip(corners.par_chunks_exact_mut(4))
        .zip(colors.par_chunks_exact_mut(4))
        .zip(indices.par_chunks_exact_mut(6))
        .zip(buffers.flat_positions().par_chunks_exact(3))
        .zip(buffers.flat_colors().par_chunks_exact(3))
        .enumerate()
        .for_each(|(i, (((((position, corner), color), index), xyz), rgb))| {
            position.fill([xyz[0], xyz[1], xyz[2]]);
            corner.copy_from_slice(&CORNERS);
            color.fill([rgb[0], rgb[1], rgb[2], 1.0]);

            let base = i as u32 * 4;
            for (dst, src) in index.iter_mut().zip(QUAD_INDICES) {
                *dst = base + src;
            }
        });

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, corners)
    .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
    .with_inserted_indices(Indices::U32(indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;

    fn buffers() -> GalaxyBuffers {
        GalaxyBuffers {
            positions: vec![[1.0, 2.0, 3.0], [-4.0, 0.5, 6.0]],
            colors: vec![[1.0, 0.0, 0.0], [0.0, 0.25, 1.0]],
        }
    }

    #[test]
    fn four_vertices_and_six_indices_per_particle() {
        let mesh = billboard_mesh(&buffers());
        assert_eq!(mesh.count_vertices(), 8);
        assert_eq!(mesh.indices().map(Indices::len), Some(12));
    }

    #[test]
    fn quads_share_particle_data() {
        let mesh = billboard_mesh(&buffers());

        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("positions missing");
        };
        assert!(positions[..4].iter().all(|p| *p == [1.0, 2.0, 3.0]));
        assert!(positions[4..].iter().all(|p| *p == [-4.0, 0.5, 6.0]));

        let Some(VertexAttributeValues::Float32x4(colors)) =
            mesh.attribute(Mesh::ATTRIBUTE_COLOR)
        else {
            panic!("colors missing");
        };
        assert!(colors[4..].iter().all(|c| *c == [0.0, 0.25, 1.0, 1.0]));
    }

    #[test]
    fn indices_stay_inside_their_quad() {
        let mesh = billboard_mesh(&buffers());
        let Some(Indices::U32(indices)) = mesh.indices() else {
            panic!("expected u32 indices");
        };
        assert_eq!(indices[..6], [0, 1, 2, 0, 2, 3]);
        assert_eq!(indices[6..], [4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn empty_buffers_give_empty_mesh() {
        let mesh = billboard_mesh(&GalaxyBuffers::default());
        assert_eq!(mesh.count_vertices(), 0);
    }
}
