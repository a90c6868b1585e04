use crate::config::{ConfigError, DemoConfig};
use crate::grid::{Grid, GridShape};
use crate::score::{score, ScoreError};
use crate::summary::favourable_cells;
use crate::synth::{draw_layers, seeded_rng, Layers};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurveyError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Score(#[from] ScoreError),
}

/// Raw layers plus the composite score derived from them.
#[derive(Clone, Debug, PartialEq)]
pub struct Survey {
    pub layers: Layers,
    pub prospectivity: Grid,
}

impl Survey {
    /// Validate `config`, synthesize the layers and score them.
    ///
    /// Every configuration problem is reported as [`SurveyError::Config`].
    pub fn generate(config: &DemoConfig) -> Result<Self, SurveyError> {
        config.validate()?;
        let layers = draw_layers(&mut seeded_rng(config.seed), config.shape, &config.perturbation);
        let prospectivity = score(&layers, &config.scoring)?;

        info!(
            seed = config.seed,
            shape = %config.shape,
            favourable_cells = favourable_cells(&prospectivity),
            "survey generated"
        );
        Ok(Self {
            layers,
            prospectivity,
        })
    }

    pub fn shape(&self) -> GridShape {
        self.prospectivity.shape()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellRect;
    use crate::synth::{draw_normal_grid, synthesize};

    #[test]
    fn reference_run_end_to_end() {
        let config = DemoConfig::default();
        let survey = Survey::generate(&config).unwrap();
        assert_eq!(survey.shape(), GridShape::new(50, 50));
        for grid in [
            &survey.layers.magnetic,
            &survey.layers.gravity,
            &survey.layers.geochem,
            &survey.prospectivity,
        ] {
            assert_eq!(grid.shape(), config.shape);
        }

        // Replay the stream to recover the raw geochem draw.
        let mut rng = seeded_rng(config.seed);
        let _ = draw_normal_grid(&mut rng, config.shape);
        let _ = draw_normal_grid(&mut rng, config.shape);
        let raw_geochem = draw_normal_grid(&mut rng, config.shape);

        let region = CellRect::new(20, 30, 20, 30);
        let (zone, background) = survey.layers.geochem.region_means(&region);
        let (raw_zone, _) = raw_geochem.region_means(&region);
        assert!((zone - raw_zone - 3.0).abs() < 1e-9);
        assert!(
            zone - background >= 3.0,
            "zone mean {zone} vs background {background}"
        );
    }

    #[test]
    fn matches_standalone_synthesis() {
        let config = DemoConfig::default();
        let survey = Survey::generate(&config).unwrap();
        assert_eq!(survey.layers, synthesize(&config).unwrap());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let config = DemoConfig::default();
        assert_eq!(
            Survey::generate(&config).unwrap(),
            Survey::generate(&config).unwrap()
        );
    }

    #[test]
    fn layer_config_errors_use_the_config_variant() {
        let out_of_bounds = DemoConfig {
            shape: GridShape::new(10, 10),
            ..DemoConfig::default()
        };
        assert!(matches!(
            Survey::generate(&out_of_bounds),
            Err(SurveyError::Config(ConfigError::RegionOutOfBounds { .. }))
        ));

        let empty = DemoConfig {
            shape: GridShape::new(0, 50),
            ..DemoConfig::default()
        };
        assert_eq!(
            Survey::generate(&empty),
            Err(SurveyError::Config(ConfigError::EmptyGrid { rows: 0, cols: 50 }))
        );
    }

    #[test]
    fn zone_cells_are_mostly_geochem_anomalous() {
        let config = DemoConfig::default();
        let survey = Survey::generate(&config).unwrap();
        let region = config.perturbation.region;
        let mut hits = 0;
        for r in region.row_start..region.row_end {
            for c in region.col_start..region.col_end {
                if survey.layers.geochem.get(r, c) > 2.0 {
                    hits += 1;
                }
            }
        }
        // P(N(3, 1) > 2) is about 0.84.
        assert!(hits > 60, "only {hits} anomalous cells in zone");
    }
}
