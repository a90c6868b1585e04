use crate::config::ScoringRule;
use crate::grid::{Grid, GridShape};
use crate::synth::Layers;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("{layer} layer is {actual} but magnetic layer is {expected}")]
    ShapeMismatch {
        layer: &'static str,
        expected: GridShape,
        actual: GridShape,
    },
}

pub fn indicator(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

impl ScoringRule {
    /// Weighted indicator sum for one cell. Comparisons are strict, so a value
    /// sitting exactly on a threshold does not count.
    pub fn cell_score(&self, magnetic: f64, gravity: f64, geochem: f64) -> f64 {
        let w = &self.weights;
        let t = &self.thresholds;
        w.magnetic * indicator(magnetic < t.magnetic_below)
            + w.gravity * indicator(gravity > t.gravity_above)
            + w.geochem * indicator(geochem > t.geochem_above)
    }
}

/// Composite prospectivity score over three grids of identical shape.
pub fn score_grids(
    magnetic: &Grid,
    gravity: &Grid,
    geochem: &Grid,
    rule: &ScoringRule,
) -> Result<Grid, ScoreError> {
    let expected = magnetic.shape();
    for (layer, grid) in [("gravity", gravity), ("geochem", geochem)] {
        if grid.shape() != expected {
            return Err(ScoreError::ShapeMismatch {
                layer,
                expected,
                actual: grid.shape(),
            });
        }
    }
    Ok(Grid::from_fn(expected, |r, c| {
        rule.cell_score(magnetic.get(r, c), gravity.get(r, c), geochem.get(r, c))
    }))
}

pub fn score(layers: &Layers, rule: &ScoringRule) -> Result<Grid, ScoreError> {
    score_grids(&layers.magnetic, &layers.gravity, &layers.geochem, rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DemoConfig;
    use crate::synth::synthesize;

    const LEVELS: [f64; 6] = [0.0, 0.3, 0.4, 0.6, 0.7, 1.0];

    fn single(v: f64) -> Grid {
        Grid::filled(GridShape::new(1, 1), v)
    }

    fn is_level(v: f64) -> bool {
        LEVELS.iter().any(|l| (v - l).abs() < 1e-12)
    }

    #[test]
    fn reference_weights_and_thresholds() {
        let rule = ScoringRule::default();
        assert_eq!(rule.cell_score(-1.5, 0.0, 0.0), 0.4);
        assert_eq!(rule.cell_score(0.0, 1.5, 0.0), 0.3);
        assert_eq!(rule.cell_score(0.0, 0.0, 2.5), 0.3);
        assert!((rule.cell_score(-1.5, 1.5, 2.5) - 1.0).abs() < 1e-12);
        assert_eq!(rule.cell_score(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn boundary_values_do_not_count() {
        let rule = ScoringRule::default();
        assert_eq!(rule.cell_score(-1.0, 0.0, 0.0), 0.0);
        assert_eq!(rule.cell_score(0.0, 1.0, 0.0), 0.0);
        assert_eq!(rule.cell_score(0.0, 0.0, 2.0), 0.0);
        assert_eq!(rule.cell_score(-1.0, 1.0, 2.0), 0.0);

        let out = score_grids(&single(-1.0), &single(1.0), &single(2.0), &rule).unwrap();
        assert_eq!(out.get(0, 0), 0.0);
    }

    #[test]
    fn every_cell_is_a_known_level() {
        let config = DemoConfig::default();
        let layers = synthesize(&config).unwrap();
        let out = score(&layers, &config.scoring).unwrap();
        assert_eq!(out.shape(), config.shape);
        for v in out.iter() {
            assert!((0.0..=1.0).contains(&v), "score {v} outside [0, 1]");
            assert!(is_level(v), "unexpected score {v}");
        }
    }

    #[test]
    fn custom_rule_changes_scores() {
        let mut rule = ScoringRule::default();
        rule.weights.magnetic = 0.0;
        rule.thresholds.gravity_above = 0.5;
        assert_eq!(rule.cell_score(-5.0, 0.75, 0.0), 0.3);
    }

    #[test]
    fn mismatched_shapes_fail() {
        let a = Grid::filled(GridShape::new(3, 3), 0.0);
        let b = Grid::filled(GridShape::new(3, 4), 0.0);
        let rule = ScoringRule::default();

        assert_eq!(
            score_grids(&a, &b, &a, &rule),
            Err(ScoreError::ShapeMismatch {
                layer: "gravity",
                expected: GridShape::new(3, 3),
                actual: GridShape::new(3, 4),
            })
        );
        assert!(matches!(
            score_grids(&a, &a, &b, &rule),
            Err(ScoreError::ShapeMismatch { layer: "geochem", .. })
        ));
        // Transposed shapes hold the same number of cells but are still rejected.
        let t = Grid::filled(GridShape::new(4, 3), 0.0);
        assert!(score_grids(&b, &t, &b, &rule).is_err());
    }
}
