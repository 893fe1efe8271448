// Module exports for models

pub mod demand;
pub mod scheme;
pub mod settings;
