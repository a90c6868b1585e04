use crate::config::DemoConfig;
use crate::grid::Grid;
use crate::survey::Survey;
use serde::{Deserialize, Serialize};

/// Scores at or above this count as favourable in the summary.
pub const FAVOURABLE_SCORE: f64 = 0.6;

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerStats {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
}

impl LayerStats {
    pub fn of(name: &str, grid: &Grid) -> Self {
        let (min, max) = grid.min_max();
        Self {
            name: name.to_string(),
            min,
            max,
            mean: grid.mean(),
            std: grid.std_dev(),
        }
    }
}

/// Geochemical contrast between the injected zone and the rest of the grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneContrast {
    pub zone_mean: f64,
    pub background_mean: f64,
    pub difference: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreBin {
    pub score: f64,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DemoSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub seed: u64,
    pub rows: usize,
    pub cols: usize,
    pub layers: Vec<LayerStats>,
    pub anomaly_zone: ZoneContrast,
    /// Distinct score levels in ascending order with their cell counts.
    pub score_histogram: Vec<ScoreBin>,
    pub favourable_cells: usize,
}

/// Score levels closer than this are counted as the same bin.
const LEVEL_EPSILON: f64 = 1e-9;

/// Cells scoring at least [`FAVOURABLE_SCORE`]. A sum landing a rounding step
/// below the level still counts.
pub fn favourable_cells(scores: &Grid) -> usize {
    scores
        .iter()
        .filter(|&v| v >= FAVOURABLE_SCORE - LEVEL_EPSILON)
        .count()
}

fn score_histogram(grid: &Grid) -> Vec<ScoreBin> {
    let mut values: Vec<f64> = grid.iter().collect();
    values.sort_by(f64::total_cmp);
    let mut bins: Vec<ScoreBin> = Vec::new();
    for v in values {
        match bins.last_mut() {
            Some(bin) if (v - bin.score).abs() <= LEVEL_EPSILON => bin.count += 1,
            _ => bins.push(ScoreBin { score: v, count: 1 }),
        }
    }
    bins
}

impl DemoSummary {
    pub fn from_survey(survey: &Survey, config: &DemoConfig) -> Self {
        let shape = survey.shape();
        let layers = vec![
            LayerStats::of("magnetic", &survey.layers.magnetic),
            LayerStats::of("gravity", &survey.layers.gravity),
            LayerStats::of("geochem", &survey.layers.geochem),
            LayerStats::of("prospectivity", &survey.prospectivity),
        ];
        let (zone_mean, background_mean) = survey
            .layers
            .geochem
            .region_means(&config.perturbation.region);
        Self {
            schema_version: 1,
            seed: config.seed,
            rows: shape.rows,
            cols: shape.cols,
            layers,
            anomaly_zone: ZoneContrast {
                zone_mean,
                background_mean,
                difference: zone_mean - background_mean,
            },
            score_histogram: score_histogram(&survey.prospectivity),
            favourable_cells: favourable_cells(&survey.prospectivity),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridShape;

    #[test]
    fn histogram_groups_levels() {
        let g = Grid::from_fn(GridShape::new(2, 3), |r, c| [0.0, 0.3, 0.0, 0.7, 0.3, 0.0][r * 3 + c]);
        let bins = score_histogram(&g);
        assert_eq!(
            bins,
            vec![
                ScoreBin { score: 0.0, count: 3 },
                ScoreBin { score: 0.3, count: 2 },
                ScoreBin { score: 0.7, count: 1 },
            ]
        );
    }

    #[test]
    fn summary_of_reference_run() {
        let config = DemoConfig::default();
        let survey = Survey::generate(&config).unwrap();
        let summary = DemoSummary::from_survey(&survey, &config);

        assert_eq!(summary.schema_version, 1);
        assert_eq!((summary.rows, summary.cols), (50, 50));
        assert_eq!(summary.layers.len(), 4);
        let total: usize = summary.score_histogram.iter().map(|b| b.count).sum();
        assert_eq!(total, 2500);
        assert!(summary
            .score_histogram
            .windows(2)
            .all(|w| w[0].score < w[1].score));
        assert!(summary.anomaly_zone.difference >= 3.0);
        // Reference weights only reach 0.6, 0.7 and 1.0 at or above the level.
        let from_bins: usize = summary
            .score_histogram
            .iter()
            .filter(|b| [0.6, 0.7, 1.0].contains(&b.score))
            .map(|b| b.count)
            .sum();
        assert_eq!(summary.favourable_cells, from_bins);
    }

    #[test]
    fn favourable_cells_counts_level_and_rounding_neighbours() {
        let six = 0.3 + 0.3;
        assert_eq!(six, 0.6);
        let just_below = f64::from_bits(0.6f64.to_bits() - 1);
        let clearly_below = 0.6 - 1e-6;
        let values = [six, just_below, clearly_below, 0.4, 0.7, 1.0, 0.0, 0.3];
        let g = Grid::from_fn(GridShape::new(2, 4), |r, c| values[r * 4 + c]);
        // 0.6, 0.6 - 1 ulp, 0.7 and 1.0.
        assert_eq!(favourable_cells(&g), 4);
    }

    #[test]
    fn json_round_trip_and_default_schema() {
        let config = DemoConfig {
            shape: GridShape::new(30, 30),
            ..DemoConfig::default()
        };
        let survey = Survey::generate(&config).unwrap();
        let summary = DemoSummary::from_survey(&survey, &config);
        let json = summary.to_json_pretty().unwrap();
        let back: DemoSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, summary.seed);
        assert_eq!((back.rows, back.cols), (30, 30));
        assert_eq!(back.favourable_cells, summary.favourable_cells);
        let counts = |s: &DemoSummary| s.score_histogram.iter().map(|b| b.count).collect::<Vec<_>>();
        assert_eq!(counts(&back), counts(&summary));
        assert!((back.anomaly_zone.difference - summary.anomaly_zone.difference).abs() < 1e-12);

        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value.as_object_mut().unwrap().remove("schema_version");
        let back: DemoSummary = serde_json::from_value(value).unwrap();
        assert_eq!(back.schema_version, 1);
    }
}
