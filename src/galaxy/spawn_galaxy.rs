use super::{GalaxyGenerator, GalaxyParams};
use crate::graphics::{billboard_mesh, GalaxyPointsMaterial};
use bevy::{pbr::NotShadowCaster, prelude::*, render::view::NoFrustumCulling};
use rand::prelude::*;
use std::num::ParseIntError;
use std::time::{Duration, Instant};

/// Environment variable holding an optional `u64` rng seed.
const SEED_VAR: &str = "GALAXY_SEED";

pub struct SpawnGalaxyPlugin;

impl Plugin for SpawnGalaxyPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GalaxyState(GalaxyGenerator::new(galaxy_rng())))
            .init_resource::<GalaxyStats>()
            .add_event::<RegenerateGalaxy>()
            .add_systems(Update, regenerate_galaxy);
    }
}

/// Request to throw away the current galaxy and build one from these
/// parameters.
#[derive(Event, Clone, Copy, Debug)]
pub struct RegenerateGalaxy(pub GalaxyParams);

/// Everything the renderer owns for one generated galaxy.
#[derive(Debug)]
pub struct GalaxyPoints {
    pub entity: Entity,
    pub mesh: Handle<Mesh>,
    pub material: Handle<GalaxyPointsMaterial>,
}

#[derive(Resource, Default, Debug)]
pub struct GalaxyStats {
    pub count: usize,
    pub generation: u64,
    pub last_duration: Duration,
}

#[derive(Resource, Deref, DerefMut)]
struct GalaxyState(GalaxyGenerator<StdRng, GalaxyPoints>);

fn parse_seed(raw: Option<&str>) -> Result<Option<u64>, ParseIntError> {
    raw.map(|raw| raw.trim().parse()).transpose()
}

fn galaxy_rng() -> StdRng {
    let raw = std::env::var(SEED_VAR).ok();
    match parse_seed(raw.as_deref()) {
        Ok(Some(seed)) => {
            info!(seed, "Seeding galaxy generator from {SEED_VAR}");
            StdRng::seed_from_u64(seed)
        }
        Ok(None) => StdRng::from_os_rng(),
        Err(err) => {
            warn!("Ignoring {SEED_VAR}={raw:?}: {err}");
            StdRng::from_os_rng()
        }
    }
}

fn release(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<GalaxyPointsMaterial>,
    points: GalaxyPoints,
) {
    debug!("Releasing galaxy entity {}", points.entity);
    commands.entity(points.entity).despawn();
    meshes.remove(&points.mesh);
    materials.remove(&points.material);
}

/// Rebuilds the point cloud whenever a regenerate request arrives.
/// Several requests in one frame collapse into the latest one.
fn regenerate_galaxy(
    mut commands: Commands,
    mut requests: EventReader<RegenerateGalaxy>,
    mut galaxy: ResMut<GalaxyState>,
    mut stats: ResMut<GalaxyStats>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<GalaxyPointsMaterial>>,
) {
    let Some(&RegenerateGalaxy(params)) = requests.read().last() else {
        return;
    };

    let started = Instant::now();
    let (buffers, disposal) = galaxy.regenerate(&params);
    if let Some(previous) = disposal.into_inner() {
        release(&mut commands, &mut meshes, &mut materials, previous);
    }

    stats.count = buffers.len();
    stats.generation = galaxy.generation();

    if !buffers.is_empty() {
        let mesh = meshes.add(billboard_mesh(&buffers));
        let material = materials.add(GalaxyPointsMaterial::new(params.size));
        let entity = commands
            .spawn((
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::IDENTITY,
                Visibility::Inherited,
                NotShadowCaster,
                // quads extend past the particle positions the bounds are computed from
                NoFrustumCulling,
            ))
            .id();

        let stale = galaxy.attach(GalaxyPoints {
            entity,
            mesh,
            material,
        });
        if let Some(stale) = stale.into_inner() {
            release(&mut commands, &mut meshes, &mut materials, stale);
        }
    }

    stats.last_duration = started.elapsed();
    info!(
        count = stats.count,
        generation = stats.generation,
        "Galaxy regenerated in {:.1} ms",
        stats.last_duration.as_secs_f64() * 1000.0
    );
}
