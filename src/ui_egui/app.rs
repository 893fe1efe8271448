use egui::{Color32, RichText};

use crate::models::scheme::PricingScheme;
use crate::models::settings::AppConfig;
use crate::services::database::Database;
use crate::services::demand::DemandService;
use crate::ui_egui::demand_dialog::{render_demand_dialog, DemandDialogAction};
use crate::ui_egui::demand_editor::DemandEditorPage;
use crate::utils::time::SlotGrid;

pub struct TariffApp {
    /// Leaked for the 'static lifetime eframe needs
    database: &'static Database,
    scheme: PricingScheme,
    page: DemandEditorPage,
}

impl eframe::App for TariffApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render_top_bar(ctx);
        self.render_grid(ctx);
        self.render_dialog(ctx);
    }
}

impl TariffApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        database: &'static Database,
        config: &AppConfig,
        grid: SlotGrid,
        scheme: PricingScheme,
    ) -> Self {
        let mut page = DemandEditorPage::new(scheme.id, grid, config.editor.read_only);
        page.reload(&DemandService::new(database.connection()));
        log::info!(
            "Editing scheme '{}' with {} demand(s), {}-minute slots",
            scheme.name,
            page.records().len(),
            grid.slot_minutes()
        );

        Self {
            database,
            scheme,
            page,
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("demand_top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(&self.scheme.name);
                ui.separator();
                ui.label(format!("{} demand window(s)", self.page.records().len()));
                ui.separator();

                if ui.add_enabled(!self.page.is_read_only(), egui::Button::new("➕ New demand")).clicked() {
                    self.page.open_new_demand();
                }
                if ui.button("⟳ Reload").clicked() {
                    self.page.reload(&DemandService::new(self.database.connection()));
                }
                if self.page.is_read_only() {
                    ui.label(RichText::new("Read-only").italics());
                }
            });

            if let Some(message) = self.page.status_message() {
                ui.label(RichText::new(message).color(Color32::from_rgb(220, 60, 60)));
            }
        });
    }

    fn render_grid(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(
                RichText::new("Drag across empty slots to add a demand window. Click a window to edit it.")
                    .small()
                    .weak(),
            );
            ui.add_space(6.0);
            egui::ScrollArea::both().show(ui, |ui| {
                self.page.show_grid(ui);
            });
        });
    }

    fn render_dialog(&mut self, ctx: &egui::Context) {
        let read_only = self.page.is_read_only();
        let Some(dialog) = self.page.dialog_mut() else {
            return;
        };

        let action = render_demand_dialog(ctx, dialog, read_only);
        let store = DemandService::new(self.database.connection());
        match action {
            Some(DemandDialogAction::Save) => {
                self.page.submit(&store);
            }
            Some(DemandDialogAction::Delete(id)) => {
                self.page.delete(&store, id);
            }
            Some(DemandDialogAction::Cancel) => self.page.close_dialog(),
            None => {}
        }
    }
}
