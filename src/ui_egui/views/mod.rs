//! Views for the demand editor.

pub mod demand_grid;
mod palette;
