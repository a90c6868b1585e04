//! Synthetic magnetic, gravity and geochemical layers.
//!
//! All three layers are drawn from one generator in a fixed order
//! (magnetic, gravity, geochem), each filled row-major. Changing that order
//! changes every layer after the first for a given seed.

use crate::config::{ConfigError, DemoConfig, Perturbation};
use crate::grid::{Grid, GridShape};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use rand_distr::StandardNormal;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    #[error("invalid synthesis input: {0}")]
    Config(#[from] ConfigError),
}

/// The three raw survey layers.
#[derive(Clone, Debug, PartialEq)]
pub struct Layers {
    pub magnetic: Grid,
    pub gravity: Grid,
    pub geochem: Grid,
}

impl Layers {
    pub fn shape(&self) -> GridShape {
        self.magnetic.shape()
    }
}

/// Fill a grid with independent N(0, 1) draws in row-major order.
pub fn draw_normal_grid<R: Rng + ?Sized>(rng: &mut R, shape: GridShape) -> Grid {
    Grid::from_fn(shape, |_, _| rng.sample::<f64, _>(StandardNormal))
}

/// Draw the three layers from `rng` and inject the geochemical anomaly.
pub fn synthesize_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    shape: GridShape,
    perturbation: &Perturbation,
) -> Result<Layers, SynthError> {
    shape.validate()?;
    perturbation.validate(shape)?;
    Ok(draw_layers(rng, shape, perturbation))
}

/// Unchecked core of [`synthesize_with_rng`]; `shape` and `perturbation`
/// must already be validated.
pub(crate) fn draw_layers<R: Rng + ?Sized>(
    rng: &mut R,
    shape: GridShape,
    perturbation: &Perturbation,
) -> Layers {
    let magnetic = draw_normal_grid(rng, shape);
    let gravity = draw_normal_grid(rng, shape);
    let mut geochem = draw_normal_grid(rng, shape);
    geochem.add_to_region(&perturbation.region, perturbation.bias);

    debug!(
        %shape,
        region = %perturbation.region,
        bias = perturbation.bias,
        "synthesized survey layers"
    );
    Layers {
        magnetic,
        gravity,
        geochem,
    }
}

/// Generator for the layer draws of a run seeded with `seed`.
pub fn seeded_rng(seed: u64) -> ChaCha12Rng {
    ChaCha12Rng::seed_from_u64(seed)
}

/// Synthesize layers from a generator seeded with `config.seed`.
pub fn synthesize(config: &DemoConfig) -> Result<Layers, SynthError> {
    synthesize_with_rng(&mut seeded_rng(config.seed), config.shape, &config.perturbation)
}
