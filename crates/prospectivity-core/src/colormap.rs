/// Colormaps used by the figure, sampled as piecewise-linear ramps through
/// the same anchor colors matplotlib uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Colormap {
    Coolwarm,
    YlGnBu,
    Hot,
}

// Evenly spaced anchors, 0.0..=1.0.
const COOLWARM: [[u8; 3]; 9] = [
    [59, 76, 192],
    [98, 130, 234],
    [141, 176, 254],
    [184, 208, 249],
    [221, 221, 221],
    [245, 196, 173],
    [244, 154, 123],
    [222, 96, 77],
    [180, 4, 38],
];

// ColorBrewer YlGnBu, 9 classes.
const YLGNBU: [[u8; 3]; 9] = [
    [255, 255, 217],
    [237, 248, 177],
    [199, 233, 180],
    [127, 205, 187],
    [65, 182, 196],
    [29, 145, 192],
    [34, 94, 168],
    [37, 52, 148],
    [8, 29, 88],
];

impl Colormap {
    /// Color at `t`, clamped into [0, 1]. NaN maps to the low end.
    pub fn sample(self, t: f64) -> [u8; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Colormap::Coolwarm => ramp(&COOLWARM, t),
            Colormap::YlGnBu => ramp(&YLGNBU, t),
            Colormap::Hot => hot(t),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Colormap::Coolwarm => "coolwarm",
            Colormap::YlGnBu => "YlGnBu",
            Colormap::Hot => "hot",
        }
    }
}

fn ramp(anchors: &[[u8; 3]], t: f64) -> [u8; 3] {
    let last = anchors.len() - 1;
    let pos = t * last as f64;
    let i = (pos.floor() as usize).min(last - 1);
    let frac = pos - i as f64;
    let (a, b) = (anchors[i], anchors[i + 1]);
    let mut out = [0u8; 3];
    for k in 0..3 {
        let v = a[k] as f64 + (b[k] as f64 - a[k] as f64) * frac;
        out[k] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Black through red and yellow to white, with matplotlib's channel breakpoints.
fn hot(t: f64) -> [u8; 3] {
    const RED_START: f64 = 0.0416;
    const RED_FULL: f64 = 0.365079;
    const GREEN_FULL: f64 = 0.746032;

    let r = RED_START + (1.0 - RED_START) * (t / RED_FULL).min(1.0);
    let g = ((t - RED_FULL) / (GREEN_FULL - RED_FULL)).clamp(0.0, 1.0);
    let b = ((t - GREEN_FULL) / (1.0 - GREEN_FULL)).clamp(0.0, 1.0);
    [r, g, b].map(|c| (c * 255.0).round() as u8)
}

/// Maps `value` into [0, 1] relative to `[lo, hi]`. A degenerate range maps to 0.
pub fn normalize(value: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        (value - lo) / (hi - lo)
    } else {
        0.0
    }
}
