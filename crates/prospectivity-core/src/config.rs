use crate::grid::{CellRect, GridShape};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Additive anomaly injected into the geochemical layer after its draw.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Perturbation {
    pub region: CellRect,
    pub bias: f64,
}

impl Default for Perturbation {
    fn default() -> Self {
        Self {
            region: CellRect::new(20, 30, 20, 30),
            bias: 3.0,
        }
    }
}

/// Per-layer weights of the composite score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub magnetic: f64,
    pub gravity: f64,
    pub geochem: f64,
}

impl ScoreWeights {
    pub fn total(&self) -> f64 {
        self.magnetic + self.gravity + self.geochem
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            magnetic: 0.4,
            gravity: 0.3,
            geochem: 0.3,
        }
    }
}

/// Thresholds turning each layer into a 0/1 indicator.
///
/// Magnetic lows count (`value < magnetic_below`), gravity and geochemical
/// highs count (`value > *_above`). All comparisons are strict.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreThresholds {
    pub magnetic_below: f64,
    pub gravity_above: f64,
    pub geochem_above: f64,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            magnetic_below: -1.0,
            gravity_above: 1.0,
            geochem_above: 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringRule {
    pub weights: ScoreWeights,
    pub thresholds: ScoreThresholds,
}

/// Output figure geometry. Pixel size is `inches * dpi`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
}

impl RenderConfig {
    pub const MAX_PIXELS: u64 = 8192 * 8192;

    /// `(width, height)` in pixels, or `None` if either side is not finite,
    /// not positive, or does not fit in `u32`.
    pub fn pixel_size(&self) -> Option<(u32, u32)> {
        let side = |inches: f64| {
            let px = (inches * self.dpi as f64).round();
            (px.is_finite() && px >= 1.0 && px <= u32::MAX as f64).then_some(px as u32)
        };
        Some((side(self.width_in)?, side(self.height_in)?))
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width_in: 12.0,
            height_in: 10.0,
            dpi: 300,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub shape: GridShape,
    pub seed: u64,
    pub perturbation: Perturbation,
    pub scoring: ScoringRule,
    pub render: RenderConfig,
    pub output_path: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            shape: GridShape::new(50, 50),
            seed: 42,
            perturbation: Perturbation::default(),
            scoring: ScoringRule::default(),
            render: RenderConfig::default(),
            output_path: "prospectivity_demo.png".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be positive (got {rows}x{cols})")]
    EmptyGrid { rows: usize, cols: usize },
    #[error("grid of {rows}x{cols} cells exceeds supported maximum ({max} cells)")]
    GridTooLarge { rows: usize, cols: usize, max: usize },
    #[error("perturbation region {region} is empty")]
    EmptyRegion { region: CellRect },
    #[error("perturbation region {region} lies outside the {rows}x{cols} grid")]
    RegionOutOfBounds {
        region: CellRect,
        rows: usize,
        cols: usize,
    },
    #[error("perturbation bias must be finite (got {0})")]
    NonFiniteBias(f64),
    #[error("score weight `{name}` must be finite and non-negative (got {value})")]
    InvalidWeight { name: &'static str, value: f64 },
    #[error("score weights sum to {0}, which exceeds 1.0")]
    WeightsExceedOne(f64),
    #[error("score threshold `{name}` must be finite (got {value})")]
    NonFiniteThreshold { name: &'static str, value: f64 },
    #[error("figure of {width_in}x{height_in} in at {dpi} dpi is outside the renderable size range")]
    InvalidFigure { width_in: f64, height_in: f64, dpi: u32 },
    #[error("output path must not be empty")]
    EmptyOutputPath,
}

impl GridShape {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        match self.cell_count() {
            Some(n) if n <= GridShape::MAX_CELLS => Ok(()),
            _ => Err(ConfigError::GridTooLarge {
                rows: self.rows,
                cols: self.cols,
                max: GridShape::MAX_CELLS,
            }),
        }
    }
}

impl Perturbation {
    pub fn validate(&self, shape: GridShape) -> Result<(), ConfigError> {
        if self.region.is_empty() {
            return Err(ConfigError::EmptyRegion {
                region: self.region,
            });
        }
        if !self.region.fits_within(shape) {
            return Err(ConfigError::RegionOutOfBounds {
                region: self.region,
                rows: shape.rows,
                cols: shape.cols,
            });
        }
        if !self.bias.is_finite() {
            return Err(ConfigError::NonFiniteBias(self.bias));
        }
        Ok(())
    }
}

impl ScoringRule {
    /// Floating-point slack allowed when checking that weights sum to at most one.
    const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.weights;
        for (name, value) in [
            ("magnetic", w.magnetic),
            ("gravity", w.gravity),
            ("geochem", w.geochem),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        let total = w.total();
        if total > 1.0 + Self::WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightsExceedOne(total));
        }

        let t = &self.thresholds;
        for (name, value) in [
            ("magnetic_below", t.magnetic_below),
            ("gravity_above", t.gravity_above),
            ("geochem_above", t.geochem_above),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteThreshold { name, value });
            }
        }
        Ok(())
    }
}

impl RenderConfig {
    /// Checked pixel size of the figure.
    pub fn validated_size(&self) -> Result<(u32, u32), ConfigError> {
        let invalid = || ConfigError::InvalidFigure {
            width_in: self.width_in,
            height_in: self.height_in,
            dpi: self.dpi,
        };
        // Zero dpi, non-positive or NaN sizes all yield `None` here.
        let (w, h) = self.pixel_size().ok_or_else(invalid)?;
        // Each of the four panels needs at least a few pixels to draw into.
        if w < 16 || h < 16 || w as u64 * h as u64 > Self::MAX_PIXELS {
            return Err(invalid());
        }
        Ok((w, h))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validated_size().map(|_| ())
    }
}

impl DemoConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shape.validate()?;
        self.perturbation.validate(self.shape)?;
        self.scoring.validate()?;
        self.render.validate()?;
        if self.output_path.trim().is_empty() {
            return Err(ConfigError::EmptyOutputPath);
        }
        Ok(())
    }
}
