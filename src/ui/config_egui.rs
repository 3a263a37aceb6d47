use crate::prelude::*;
use bevy::{color::ColorToPacked, prelude::*};
use bevy_egui::{egui, EguiContexts};

pub struct ConfigEguiPlugin;

impl Plugin for ConfigEguiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GalaxyParamsDraft>()
            .add_systems(Startup, (configure_visuals_system, commit_initial_params))
            .add_systems(Update, ui_system);
    }
}

/// The parameters as the panel shows them.
///
/// Edits only reach the generator once they settle, see [`Self::settle`].
#[derive(Resource, Default)]
pub struct GalaxyParamsDraft {
    pub params: GalaxyParams,
    dirty: bool,
}

impl GalaxyParamsDraft {
    pub fn mark_edited(&mut self) {
        self.dirty = true;
    }

    /// Hands out the edited parameters once no pointer button is held.
    pub fn settle(&mut self, pointer_held: bool) -> Option<GalaxyParams> {
        if self.dirty && !pointer_held {
            self.dirty = false;
            Some(self.params)
        } else {
            None
        }
    }
}

fn configure_visuals_system(mut contexts: EguiContexts) {
    contexts.ctx_mut().set_visuals(egui::Visuals {
        window_corner_radius: 0.0.into(),
        ..Default::default()
    });
}

fn commit_initial_params(
    draft: Res<GalaxyParamsDraft>,
    mut requests: EventWriter<RegenerateGalaxy>,
) {
    requests.write(RegenerateGalaxy(draft.params));
}

fn color_ui(ui: &mut egui::Ui, label: &str, color: &mut Srgba) -> bool {
    ui.horizontal(|ui| {
        let [r, g, b, _] = color.to_u8_array();
        let mut rgb = [r, g, b];
        let changed = ui.color_edit_button_srgb(&mut rgb).changed();
        ui.label(label);
        if changed {
            *color = Srgba::rgb_u8(rgb[0], rgb[1], rgb[2]);
        }
        changed
    })
    .inner
}

fn params_ui(params: &mut GalaxyParams, ui: &mut egui::Ui) -> bool {
    let minval = GalaxyParams::MIN;
    let maxval = GalaxyParams::MAX;
    let step = GalaxyParams::STEP;

    let mut changed = false;
    changed |= ui
        .add(
            egui::Slider::new(&mut params.count, minval.count..=maxval.count)
                .step_by(step.count as f64)
                .logarithmic(true)
                .text("Count"),
        )
        .changed();
    changed |= ui
        .add(
            egui::Slider::new(&mut params.size, minval.size..=maxval.size)
                .step_by(step.size as f64)
                .text("Size"),
        )
        .changed();
    changed |= ui
        .add(
            egui::Slider::new(&mut params.radius, minval.radius..=maxval.radius)
                .step_by(step.radius as f64)
                .text("Radius"),
        )
        .changed();
    changed |= ui
        .add(
            egui::Slider::new(&mut params.branches, minval.branches..=maxval.branches)
                .text("Branches"),
        )
        .changed();
    changed |= ui
        .add(
            egui::Slider::new(&mut params.spin, minval.spin..=maxval.spin)
                .step_by(step.spin as f64)
                .text("Spin"),
        )
        .on_hover_text("Not used by the generator yet")
        .changed();
    changed |= ui
        .add(
            egui::Slider::new(
                &mut params.randomness,
                minval.randomness..=maxval.randomness,
            )
            .step_by(step.randomness as f64)
            .text("Randomness"),
        )
        .changed();
    changed |= ui
        .add(
            egui::Slider::new(
                &mut params.randomness_power,
                minval.randomness_power..=maxval.randomness_power,
            )
            .step_by(step.randomness_power as f64)
            .text("Randomness Power"),
        )
        .changed();
    ui.separator();
    changed |= color_ui(ui, "Inside Color", &mut params.inside_color);
    changed |= color_ui(ui, "Outside Color", &mut params.outside_color);
    changed
}

fn ui_system(
    mut contexts: EguiContexts,
    mut draft: ResMut<GalaxyParamsDraft>,
    mut requests: EventWriter<RegenerateGalaxy>,
) {
    let ctx = contexts.ctx_mut();
    let draft = &mut *draft;

    egui::SidePanel::left("side_panel")
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Galaxy");
            if params_ui(&mut draft.params, ui) {
                draft.mark_edited();
            }
            ui.separator();
            // same parameters, fresh sample
            if ui.button("Regenerate").clicked() {
                draft.mark_edited();
            }
        });

    let pointer_held = ctx.input(|input| input.pointer.any_down());
    if let Some(params) = draft.settle(pointer_held) {
        debug!("Galaxy parameters committed: {params:?}");
        requests.write(RegenerateGalaxy(params));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_draft_never_commits() {
        let mut draft = GalaxyParamsDraft::default();
        assert_eq!(draft.settle(false), None);
    }

    #[test]
    fn edits_wait_for_pointer_release() {
        let mut draft = GalaxyParamsDraft::default();
        draft.params.count = 500;
        draft.mark_edited();

        assert_eq!(draft.settle(true), None);
        draft.params.count = 600;
        assert_eq!(draft.settle(true), None);

        let committed = draft.settle(false).map(|params| params.count);
        assert_eq!(committed, Some(600));
    }

    #[test]
    fn commits_once_per_edit() {
        let mut draft = GalaxyParamsDraft::default();
        draft.mark_edited();
        assert!(draft.settle(false).is_some());
        assert!(draft.settle(false).is_none());
    }
}
