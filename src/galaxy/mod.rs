mod galaxy_params;
mod generator;
mod lifecycle;
mod spawn_galaxy;

pub use galaxy_params::GalaxyParams;
pub use generator::{generate, GalaxyBuffers};
pub use lifecycle::GalaxyGenerator;
pub use spawn_galaxy::{GalaxyStats, RegenerateGalaxy, SpawnGalaxyPlugin};
