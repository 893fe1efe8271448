mod app;
pub mod demand_dialog;
pub mod demand_editor;
pub mod drag;
pub mod views;

pub use app::TariffApp;
