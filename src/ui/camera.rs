use bevy::{
    core_pipeline::tonemapping::Tonemapping,
    input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel},
    prelude::*,
    transform::TransformSystem,
};
use bevy_egui::EguiContexts;
use std::f32::consts::{FRAC_PI_2, TAU};

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(
                PostUpdate,
                camera_control_system.before(TransformSystem::TransformPropagate),
            );
    }
}

fn spawn_camera(mut commands: Commands, mut clearcolor: ResMut<ClearColor>) {
    *clearcolor = ClearColor(Color::BLACK);

    let orbit = OrbitCamera::looking_from(Vec3::new(3.0, 3.0, 3.0), Vec3::ZERO);
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 75f32.to_radians(),
            near: 0.1,
            far: 100.0,
            ..default()
        }),
        // additive colors should land on screen as picked
        Tonemapping::None,
        Transform::from_translation(orbit.translation()).looking_at(orbit.target, Vec3::Y),
        orbit,
    ));
}

/// Damped orbit around a target point.
///
/// Input accumulates into velocities, [`OrbitCamera::update`] applies a
/// fraction of them every frame and decays the rest.
#[derive(Component, Clone, Debug)]
pub struct OrbitCamera {
    target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    smooth_zoom_buffer: f32,
}

impl OrbitCamera {
    const DAMPING: f32 = 0.05;
    const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;
    const MIN_DISTANCE: f32 = 0.1;
    const MAX_DISTANCE: f32 = 50.0;

    pub fn looking_from(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
        Self {
            target,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance)
                .clamp(-1.0, 1.0)
                .asin()
                .clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT),
            distance,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            smooth_zoom_buffer: 0.0,
        }
    }

    pub fn translation(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    /// Drag by `delta` pixels; a drag over the full viewport height is one turn.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.yaw_velocity -= TAU * delta.x / viewport_height;
        self.pitch_velocity += TAU * delta.y / viewport_height;
    }

    /// Positive zooms in.
    pub fn zoom(&mut self, amount: f32) {
        self.smooth_zoom_buffer += amount;
    }

    pub fn update(&mut self) {
        self.yaw += self.yaw_velocity * Self::DAMPING;
        self.pitch = (self.pitch + self.pitch_velocity * Self::DAMPING)
            .clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        self.yaw_velocity *= 1.0 - Self::DAMPING;
        self.pitch_velocity *= 1.0 - Self::DAMPING;

        // scroll delta is cached to a buffer
        // buffer is converted to actual zoom over time for a smooth zooming effect
        let smooth_zoom_min = 0.001f32;
        let smooth_zoom_factor = 0.2f32;

        let smooth_zoom_amount = if self.smooth_zoom_buffer < 0.0 {
            f32::min(
                self.smooth_zoom_buffer * smooth_zoom_factor,
                (-smooth_zoom_min).max(self.smooth_zoom_buffer),
            )
        } else {
            f32::max(
                self.smooth_zoom_buffer * smooth_zoom_factor,
                smooth_zoom_min.min(self.smooth_zoom_buffer),
            )
        };
        self.smooth_zoom_buffer -= smooth_zoom_amount;
        self.distance = (self.distance * (-smooth_zoom_amount).exp())
            .clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }
}

pub fn camera_control_system(
    mut query: Query<(&mut Transform, &mut OrbitCamera)>,
    windows: Query<&Window>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut motion_evr: EventReader<MouseMotion>,
    mut scroll_evr: EventReader<MouseWheel>,
    mut contexts: EguiContexts,
) -> Result {
    let (mut transform, mut orbit) = query.single_mut()?;
    let window = windows.single()?;

    let ctx = contexts.ctx_mut();
    let over_panel = ctx.wants_pointer_input() || ctx.is_pointer_over_area();

    let motion: Vec2 = motion_evr.read().map(|ev| ev.delta).sum();
    if !over_panel && mouse_buttons.pressed(MouseButton::Left) {
        orbit.rotate(motion, window.height());
    }

    for ev in scroll_evr.read() {
        if over_panel {
            continue;
        }
        match ev.unit {
            MouseScrollUnit::Line => orbit.zoom(ev.y * 0.05),
            MouseScrollUnit::Pixel => orbit.zoom(ev.y * 0.002),
        }
    }

    orbit.update();
    transform.translation = orbit.translation();
    transform.look_at(orbit.target, Vec3::Y);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_is_reproduced() {
        let start = Vec3::new(3.0, 3.0, 3.0);
        let orbit = OrbitCamera::looking_from(start, Vec3::ZERO);
        assert!(orbit.translation().distance(start) < 1e-4);
    }

    #[test]
    fn pitch_stops_short_of_the_pole() {
        let mut orbit = OrbitCamera::looking_from(Vec3::new(3.0, 3.0, 3.0), Vec3::ZERO);
        orbit.rotate(Vec2::new(0.0, 10_000.0), 100.0);
        for _ in 0..500 {
            orbit.update();
        }
        assert!(orbit.pitch <= OrbitCamera::PITCH_LIMIT);
        assert!(orbit.translation().is_finite());
    }

    #[test]
    fn damping_settles_rotation() {
        let mut orbit = OrbitCamera::looking_from(Vec3::new(0.0, 1.0, 5.0), Vec3::ZERO);
        orbit.rotate(Vec2::new(50.0, 0.0), 600.0);
        for _ in 0..500 {
            orbit.update();
        }
        let yaw = orbit.yaw;
        orbit.update();
        assert!((orbit.yaw - yaw).abs() < 1e-6);
        assert!(orbit.yaw_velocity.abs() < 1e-6);
    }

    #[test]
    fn zoom_is_smoothed_and_clamped() {
        let mut orbit = OrbitCamera::looking_from(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        orbit.zoom(1.0);
        orbit.update();
        let after_one_frame = orbit.distance;
        assert!(after_one_frame < 5.0);
        assert!(after_one_frame > 5.0 * (-1.0f32).exp());

        orbit.zoom(1_000.0);
        for _ in 0..1_000 {
            orbit.update();
        }
        assert_eq!(orbit.distance, OrbitCamera::MIN_DISTANCE);
    }
}
