//! Demand editor page.
//!
//! Owns the loaded demand rows, the drag controller, the open dialog and the
//! busy flag. All persistence goes through a `DemandStore`; its errors are
//! shown as-is.
//!
//! Store calls are synchronous and finish within the frame that triggers
//! them. The busy flag is only held for the duration of a call, so the grid
//! and page actions reject re-entry but no in-progress state is ever drawn.

use crate::models::demand::DemandRecord;
use crate::services::demand::DemandStore;
use crate::ui_egui::demand_dialog::DemandDialogState;
use crate::ui_egui::drag::{GridEvent, SlotDragController};
use crate::ui_egui::views::demand_grid::DemandGridView;
use crate::utils::time::SlotGrid;

pub struct DemandEditorPage {
    scheme_id: i64,
    records: Vec<DemandRecord>,
    controller: SlotDragController,
    dialog: Option<DemandDialogState>,
    saving: bool,
    read_only: bool,
    /// Page-level failure (e.g. reload), separate from the dialog's message
    status_message: Option<String>,
}

impl DemandEditorPage {
    pub fn new(scheme_id: i64, grid: SlotGrid, read_only: bool) -> Self {
        let mut controller = SlotDragController::new(grid);
        controller.set_interaction(false, read_only);
        Self {
            scheme_id,
            records: Vec::new(),
            controller,
            dialog: None,
            saving: false,
            read_only,
            status_message: None,
        }
    }

    pub fn scheme_id(&self) -> i64 {
        self.scheme_id
    }

    pub fn records(&self) -> &[DemandRecord] {
        &self.records
    }

    pub fn dialog(&self) -> Option<&DemandDialogState> {
        self.dialog.as_ref()
    }

    pub fn dialog_mut(&mut self) -> Option<&mut DemandDialogState> {
        self.dialog.as_mut()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn controller(&self) -> &SlotDragController {
        &self.controller
    }

    fn set_saving(&mut self, saving: bool) {
        self.saving = saving;
        self.controller.set_interaction(saving, self.read_only);
    }

    /// Reload the scheme's demands. Returns false and records the error on
    /// failure, leaving the previous rows in place.
    pub fn reload(&mut self, store: &dyn DemandStore) -> bool {
        match store.list_for_scheme(self.scheme_id) {
            Ok(records) => {
                self.records = records;
                self.status_message = None;
                true
            }
            Err(e) => {
                log::error!("Failed to load demands for scheme {}: {}", self.scheme_id, e);
                self.status_message = Some(e.to_string());
                false
            }
        }
    }

    /// Draw the grid and route any event it emits.
    pub fn show_grid(&mut self, ui: &mut egui::Ui) {
        // Keep pointer state out of the grid while a dialog is open.
        if self.dialog.is_some() {
            self.controller.cancel();
            ui.add_enabled_ui(false, |ui| {
                DemandGridView::show(ui, &mut self.controller, &self.records);
            });
            return;
        }

        if let Some(event) = DemandGridView::show(ui, &mut self.controller, &self.records) {
            self.handle_grid_event(event);
        }
    }

    pub fn handle_grid_event(&mut self, event: GridEvent) {
        match event {
            GridEvent::CreateDemandFromRange(selection) => {
                if self.read_only {
                    return;
                }
                self.dialog = Some(DemandDialogState::from_selection(&selection));
            }
            GridEvent::EditDemand(record) => {
                self.dialog = Some(DemandDialogState::from_record(&record));
            }
        }
    }

    /// Explicit "new demand" action.
    pub fn open_new_demand(&mut self) {
        if !self.read_only && !self.saving {
            self.dialog = Some(DemandDialogState::new_demand());
        }
    }

    pub fn close_dialog(&mut self) {
        if !self.saving {
            self.dialog = None;
        }
    }

    /// Validate the open form and persist it.
    ///
    /// Returns true when the demand was saved. Validation and store errors
    /// are written to the dialog and the form is kept for correction.
    pub fn submit(&mut self, store: &dyn DemandStore) -> bool {
        if self.read_only || self.saving {
            return false;
        }
        let Some(dialog) = self.dialog.as_mut() else {
            return false;
        };

        let payload = match dialog.form.validate() {
            Ok(payload) => payload,
            Err(e) => {
                dialog.error_message = Some(e.to_string());
                return false;
            }
        };
        let demand_id = dialog.demand_id;

        self.set_saving(true);
        let result = match demand_id {
            Some(id) => store.update(id, &payload),
            None => store.create(self.scheme_id, &payload),
        };
        self.set_saving(false);

        match result {
            Ok(saved) => {
                log::info!("Saved demand {} '{}'", saved.id, saved.name);
                self.dialog = None;
                self.reload(store);
                true
            }
            Err(e) => {
                log::warn!("Failed to save demand '{}': {}", payload.name, e);
                if let Some(dialog) = self.dialog.as_mut() {
                    dialog.error_message = Some(e.to_string());
                }
                false
            }
        }
    }

    /// Delete a demand and refresh the rows.
    pub fn delete(&mut self, store: &dyn DemandStore, id: i64) -> bool {
        if self.read_only || self.saving {
            return false;
        }

        self.set_saving(true);
        let result = store.delete(id);
        self.set_saving(false);

        match result {
            Ok(()) => {
                if self.dialog.as_ref().is_some_and(|d| d.demand_id == Some(id)) {
                    self.dialog = None;
                }
                self.reload(store);
                true
            }
            Err(e) => {
                log::warn!("Failed to delete demand {}: {}", id, e);
                match self.dialog.as_mut() {
                    Some(dialog) => dialog.error_message = Some(e.to_string()),
                    None => self.status_message = Some(e.to_string()),
                }
                false
            }
        }
    }
}
