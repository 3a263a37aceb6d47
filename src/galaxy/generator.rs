use super::GalaxyParams;
use bevy::{color::Mix, prelude::*};
use rand::prelude::*;
use rayon::prelude::*;
use std::f32::consts::TAU;

/// Particles per parallel work item. Each chunk gets its own rng.
const CHUNK_SIZE: usize = 4096;

/// Per-particle positions and colors, index aligned.
///
/// Both buffers hold `count` xyz / rgb triples, so their flat views are
/// always `3 * count` floats long.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GalaxyBuffers {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
}

impl GalaxyBuffers {
    /// Number of particles.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions as a flat stride-3 float buffer.
    pub fn flat_positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Colors as a flat stride-3 float buffer.
    pub fn flat_colors(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }
}

/// `u^power` with a fair random sign.
fn signed_pow<R: Rng + ?Sized>(rng: &mut R, power: f32) -> f32 {
    let magnitude = rng.random::<f32>().powf(power);
    if rng.random_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}

/// Angle of the arm particle `index` belongs to. Arms are assigned round-robin.
pub fn branch_angle(index: usize, branches: u32) -> f32 {
    let branches = branches.max(1) as usize;
    (index % branches) as f32 / branches as f32 * TAU
}

/// Color interpolation end points, already in linear space.
struct ColorRamp {
    inside: LinearRgba,
    outside: LinearRgba,
}

impl ColorRamp {
    fn new(params: &GalaxyParams) -> Self {
        Self {
            inside: params.inside_color.into(),
            outside: params.outside_color.into(),
        }
    }

    fn sample(&self, t: f32) -> [f32; 3] {
        let c = self.inside.mix(&self.outside, t);
        [c.red, c.green, c.blue]
    }
}

fn fill_chunk<R: Rng>(
    rng: &mut R,
    params: &GalaxyParams,
    ramp: &ColorRamp,
    first_index: usize,
    positions: &mut [[f32; 3]],
    colors: &mut [[f32; 3]],
) {
    let branches = params.branch_count();

    for (offset, (position, color)) in positions.iter_mut().zip(colors.iter_mut()).enumerate() {
        let r = rng.random::<f32>() * params.radius;
        let angle = branch_angle(first_index + offset, branches);

        let jitter_scale = params.randomness * r;
        let jitter_x = signed_pow(rng, params.randomness_power) * jitter_scale;
        let jitter_y = signed_pow(rng, params.randomness_power) * jitter_scale;
        let jitter_z = signed_pow(rng, params.randomness_power) * jitter_scale;

        *position = [
            angle.cos() * r + jitter_x,
            jitter_y,
            angle.sin() * r + jitter_z,
        ];

        let t = if params.radius > 0.0 {
            r / params.radius
        } else {
            0.0
        };
        *color = ramp.sample(t);
    }
}

/// Generates a fresh galaxy sample.
///
/// The output only depends on `params` and the state of `rng`: the rng seeds
/// one [`StdRng`] per chunk, in chunk order, and the chunks are then filled
/// in parallel.
///
/// Parameters are not validated. Keeping them inside [`GalaxyParams::MIN`] and
/// [`GalaxyParams::MAX`] is the caller's job; only a zero branch count is
/// folded onto a single arm.
pub fn generate<R: Rng + ?Sized>(params: &GalaxyParams, rng: &mut R) -> GalaxyBuffers {
    let count = params.count as usize;
    let mut buffers = GalaxyBuffers {
        positions: vec![[0.0; 3]; count],
        colors: vec![[0.0; 3]; count],
    };

    let seeds: Vec<u64> = (0..count.div_ceil(CHUNK_SIZE))
        .map(|_| rng.next_u64())
        .collect();
    let ramp = ColorRamp::new(params);

    buffers
        .positions
        .par_chunks_mut(CHUNK_SIZE)
        .zip(buffers.colors.par_chunks_mut(CHUNK_SIZE))
        .zip(seeds.par_iter())
        .enumerate()
        .for_each(|(chunk, ((positions, colors), seed))| {
            let mut chunk_rng = StdRng::seed_from_u64(*seed);
            fill_chunk(
                &mut chunk_rng,
                params,
                &ramp,
                chunk * CHUNK_SIZE,
                positions,
                colors,
            );
        });

    buffers
}
