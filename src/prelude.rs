pub use crate::galaxy::{GalaxyBuffers, GalaxyParams, GalaxyStats, RegenerateGalaxy};
