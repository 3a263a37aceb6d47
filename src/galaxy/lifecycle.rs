use super::{generate, GalaxyBuffers, GalaxyParams};
use rand::prelude::*;

/// Render resources that were attached before a regeneration.
///
/// Whoever receives this must release what it holds before attaching the
/// resources built from the new buffers.
#[must_use = "previously attached galaxy resources must be released"]
#[derive(Debug, PartialEq)]
pub struct Disposal<T>(Option<T>);

impl<T> Disposal<T> {
    pub fn into_inner(self) -> Option<T> {
        self.0
    }
}

/// Owns the rng and whatever the renderer built from the last buffers.
///
/// `T` is opaque here; the app stores its mesh, material and entity handles
/// in it.
pub struct GalaxyGenerator<R, T> {
    rng: R,
    attached: Option<T>,
    generation: u64,
}

impl<R: Rng, T> GalaxyGenerator<R, T> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            attached: None,
            generation: 0,
        }
    }

    /// Number of completed regenerations.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Generates new buffers and detaches the current resources.
    pub fn regenerate(&mut self, params: &GalaxyParams) -> (GalaxyBuffers, Disposal<T>) {
        let buffers = generate(params, &mut self.rng);
        self.generation += 1;
        (buffers, Disposal(self.attached.take()))
    }

    /// Records the resources built from the latest buffers.
    ///
    /// Returns anything that was attached without going through
    /// [`Self::regenerate`] first, so it can still be released.
    pub fn attach(&mut self, resources: T) -> Disposal<T> {
        Disposal(self.attached.replace(resources))
    }
}
