use bevy::prelude::*;

/// Snapshot of everything the generator and the point material read.
///
/// The UI owns the live copy and hands a snapshot to the generator on every
/// committed edit, see [`super::RegenerateGalaxy`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GalaxyParams {
    pub count: u32,
    pub size: f32,
    pub radius: f32,
    pub branches: u32,
    /// Not consumed by the generator yet. Kept so the panel and the
    /// parameter snapshot stay complete.
    pub spin: f32,
    pub randomness: f32,
    pub randomness_power: f32,
    pub inside_color: Srgba,
    pub outside_color: Srgba,
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            count: 100_000,
            size: 0.01,
            radius: 5.0,
            branches: 3,
            spin: 1.0,
            randomness: 0.2,
            randomness_power: 3.0,
            inside_color: Srgba::rgb_u8(0xff, 0x60, 0x30),
            outside_color: Srgba::rgb_u8(0x1b, 0x39, 0x84),
        }
    }
}

impl GalaxyParams {
    pub const MIN: Self = Self {
        count: 100,
        size: 0.001,
        radius: 0.01,
        branches: 2,
        spin: -5.0,
        randomness: 0.0,
        randomness_power: 1.0,
        inside_color: Srgba::BLACK,
        outside_color: Srgba::BLACK,
    };
    pub const MAX: Self = Self {
        count: 1_000_000,
        size: 0.1,
        radius: 20.0,
        branches: 20,
        spin: 5.0,
        randomness: 2.0,
        randomness_power: 10.0,
        inside_color: Srgba::WHITE,
        outside_color: Srgba::WHITE,
    };
    // colors have no step, the pickers are continuous
    pub const STEP: Self = Self {
        count: 100,
        size: 0.001,
        radius: 0.01,
        branches: 1,
        spin: 0.001,
        randomness: 0.01,
        randomness_power: 0.01,
        inside_color: Srgba::NONE,
        outside_color: Srgba::NONE,
    };

    /// Branch count with the zero case folded onto a single arm.
    pub fn branch_count(&self) -> u32 {
        self.branches.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_sit_inside_ui_ranges() {
        let params = GalaxyParams::default();
        let (min, max) = (GalaxyParams::MIN, GalaxyParams::MAX);

        assert!((min.count..=max.count).contains(&params.count));
        assert!((min.size..=max.size).contains(&params.size));
        assert!((min.radius..=max.radius).contains(&params.radius));
        assert!((min.branches..=max.branches).contains(&params.branches));
        assert!((min.spin..=max.spin).contains(&params.spin));
        assert!((min.randomness..=max.randomness).contains(&params.randomness));
        assert!(
            (min.randomness_power..=max.randomness_power).contains(&params.randomness_power)
        );
    }

    #[test]
    fn default_colors_match_hex() {
        let params = GalaxyParams::default();
        assert_eq!(params.inside_color.to_hex(), "#FF6030");
        assert_eq!(params.outside_color.to_hex(), "#1B3984");
    }

    #[test]
    fn zero_branches_fold_to_one() {
        let params = GalaxyParams {
            branches: 0,
            ..default()
        };
        assert_eq!(params.branch_count(), 1);
    }
}
