use bevy::prelude::*;

mod point_mesh;
mod points_material;

pub use point_mesh::billboard_mesh;
pub use points_material::GalaxyPointsMaterial;

pub struct GraphicsPlugin;

impl Plugin for GraphicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<GalaxyPointsMaterial>::default());
    }
}
