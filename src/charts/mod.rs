//! Charts module - chart descriptions and their renderers

pub mod model;
mod plotter;
mod renderer;

pub use model::{Chart, ChartKind};
pub use plotter::ChartPlotter;
pub use renderer::{StaticChartRenderer, DEFAULT_SIZE};

#[cfg(test)]
pub(crate) use renderer::font_unavailable;
