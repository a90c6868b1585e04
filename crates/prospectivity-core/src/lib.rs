pub mod colormap;
pub mod config;
pub mod grid;
pub mod render;
pub mod score;
pub mod summary;
pub mod survey;
pub mod synth;

pub use config::{ConfigError, DemoConfig};
pub use grid::{CellRect, Grid, GridShape};
pub use survey::{Survey, SurveyError};
