//! Create/edit form for a single demand window.

use egui::{Color32, RichText};

use crate::models::demand::{DemandForm, DemandRecord, WeekdayApplicability};
use crate::ui_egui::drag::SlotSelection;

const FORM_LABEL_WIDTH: f32 = 130.0;

/// State for the demand editing dialog
#[derive(Debug, Clone, PartialEq)]
pub struct DemandDialogState {
    pub demand_id: Option<i64>,
    pub form: DemandForm,
    pub error_message: Option<String>,
}

impl DemandDialogState {
    /// Blank form for the explicit "new demand" action.
    pub fn new_demand() -> Self {
        Self {
            demand_id: None,
            form: DemandForm::default(),
            error_message: None,
        }
    }

    /// New demand pre-filled from a drag selection.
    pub fn from_selection(selection: &SlotSelection) -> Self {
        Self {
            demand_id: None,
            form: DemandForm::for_range(selection.start_time.clone(), selection.end_time.clone()),
            error_message: None,
        }
    }

    pub fn from_record(record: &DemandRecord) -> Self {
        Self {
            demand_id: Some(record.id),
            form: DemandForm::from_record(record),
            error_message: None,
        }
    }

    pub fn title(&self) -> &'static str {
        if self.demand_id.is_some() {
            "Edit Demand"
        } else {
            "New Demand"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemandDialogAction {
    Save,
    Delete(i64),
    Cancel,
}

/// Draw the dialog window. In read-only mode the form is shown but cannot be
/// saved or deleted.
pub fn render_demand_dialog(
    ctx: &egui::Context,
    state: &mut DemandDialogState,
    read_only: bool,
) -> Option<DemandDialogAction> {
    let mut action = None;
    let mut open = true;
    let editable = !read_only;

    egui::Window::new(state.title())
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            if let Some(error) = &state.error_message {
                ui.label(RichText::new(format!("⚠ {}", error)).color(Color32::from_rgb(220, 60, 60)));
                ui.add_space(6.0);
            }

            ui.add_enabled_ui(editable, |ui| render_fields(ui, &mut state.form));

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.add_enabled(editable, egui::Button::new("Save")).clicked() {
                    action = Some(DemandDialogAction::Save);
                }
                if let Some(id) = state.demand_id {
                    if ui.add_enabled(editable, egui::Button::new("Delete")).clicked() {
                        action = Some(DemandDialogAction::Delete(id));
                    }
                }
                if ui.button("Cancel").clicked() {
                    action = Some(DemandDialogAction::Cancel);
                }
            });
        });

    if !open {
        action = Some(DemandDialogAction::Cancel);
    }
    action
}

fn render_fields(ui: &mut egui::Ui, form: &mut DemandForm) {
    egui::Grid::new("demand_form_grid")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .min_col_width(FORM_LABEL_WIDTH)
        .show(ui, |ui| {
            ui.label("Name");
            ui.text_edit_singleline(&mut form.name);
            ui.end_row();

            ui.label("Description");
            ui.text_edit_multiline(&mut form.description);
            ui.end_row();

            ui.label("Start time (HH:MM)");
            ui.text_edit_singleline(&mut form.start_time);
            ui.end_row();

            ui.label("End time (HH:MM)");
            ui.text_edit_singleline(&mut form.end_time);
            ui.end_row();

            ui.label("Start month");
            ui.text_edit_singleline(&mut form.start_month);
            ui.end_row();

            ui.label("End month");
            ui.text_edit_singleline(&mut form.end_month);
            ui.end_row();

            ui.label("Lookback days");
            ui.text_edit_singleline(&mut form.lookback_days);
            ui.end_row();

            ui.label("Price base");
            ui.text_edit_singleline(&mut form.price_base);
            ui.end_row();

            ui.label("Applies to");
            egui::ComboBox::from_id_source("demand_weekday_applicability")
                .selected_text(form.weekday_applicability.label())
                .show_ui(ui, |ui| {
                    for option in WeekdayApplicability::ALL {
                        ui.selectable_value(&mut form.weekday_applicability, option, option.label());
                    }
                });
            ui.end_row();
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui_egui::drag::SlotDragController;

    fn selection(start: &str, end: &str) -> SlotSelection {
        SlotSelection {
            start_slot: 0,
            end_slot: 0,
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    #[test]
    fn test_from_selection_prefills_times() {
        let state = DemandDialogState::from_selection(&selection("02:30", "05:30"));
        assert_eq!(state.demand_id, None);
        assert_eq!(state.form.start_time, "02:30");
        assert_eq!(state.form.end_time, "05:30");
        assert_eq!(state.title(), "New Demand");
    }

    #[test]
    fn test_from_selection_keeps_end_of_day() {
        let state = DemandDialogState::from_selection(&selection("22:00", "24:00"));
        assert_eq!(state.form.end_time, "24:00");
    }

    #[test]
    fn test_whole_day_drag_validates() {
        let mut controller = SlotDragController::default();
        assert!(controller.pointer_down(0, false));
        controller.pointer_enter(47);
        let selection = controller.pointer_up(Some(47)).unwrap();
        assert_eq!(selection.start_time, "00:00");
        assert_eq!(selection.end_time, "24:00");

        let mut state = DemandDialogState::from_selection(&selection);
        state.form.name = "All day".to_string();
        state.form.price_base = "0.2".to_string();
        let payload = state.form.validate().unwrap();
        assert_eq!(payload.start_time, "00:00");
        assert_eq!(payload.end_time, "24:00");
    }

    #[test]
    fn test_new_demand_is_blank() {
        let state = DemandDialogState::new_demand();
        assert!(state.form.name.is_empty());
        assert!(state.error_message.is_none());
    }
}
