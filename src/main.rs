// Tariff Demand Editor
// Main entry point

use anyhow::{anyhow, Context, Result};
use tariff_ui::services::database::Database;
use tariff_ui::services::scheme::SchemeService;
use tariff_ui::services::settings::SettingsService;
use tariff_ui::ui_egui::TariffApp;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting Tariff Demand Editor");

    let config = SettingsService::load().context("Invalid configuration")?;
    let grid = config.slot_grid()?;

    let db_path = SettingsService::database_path(&config)?;
    let database = Database::new(&db_path.to_string_lossy())?;
    database.initialize_schema()?;
    let database: &'static Database = Box::leak(Box::new(database));

    let scheme = SchemeService::new(database.connection())
        .get_or_create(&config.editor.scheme_name)
        .context("Failed to open pricing scheme")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 640.0])
            .with_min_inner_size([800.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Tariff Demand Editor",
        options,
        Box::new(move |cc| Ok(Box::new(TariffApp::new(cc, database, &config, grid, scheme)))),
    )
    .map_err(|e| anyhow!("Failed to run editor: {}", e))
}
