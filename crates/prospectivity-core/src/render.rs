//! 2x2 figure of the survey layers, written as PNG.
//!
//! Panels are laid out like a `subplots(2, 2)` figure with axes hidden:
//! magnetic and gravity on top, geochem and the composite score below. Each
//! panel is a nearest-neighbour upscale of its grid with row 0 at the top,
//! normalized to the panel's own value range. Only the score panel carries a
//! color legend.

use crate::colormap::{normalize, Colormap};
use crate::config::{ConfigError, RenderConfig};
use crate::grid::{Grid, GridShape};
use crate::survey::Survey;
use image::{ImageFormat, Rgb, RgbImage};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to write figure: {0}")]
    Image(#[from] image::ImageError),
}

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const OUTLINE: Rgb<u8> = Rgb([0, 0, 0]);

/// Padding around each axes box, as a fraction of its quadrant.
const QUADRANT_PAD: f64 = 0.06;
/// Legend width and gap, as fractions of the parent axes width.
const COLORBAR_FRACTION: f64 = 0.046;
const COLORBAR_PAD: f64 = 0.04;

#[derive(Clone, Copy, Debug)]
pub struct Panel {
    pub title: &'static str,
    pub colormap: Colormap,
    pub colorbar: bool,
}

pub const PANELS: [Panel; 4] = [
    Panel {
        title: "Simulated Magnetic Anomaly",
        colormap: Colormap::Coolwarm,
        colorbar: false,
    },
    Panel {
        title: "Simulated Gravity Anomaly",
        colormap: Colormap::Coolwarm,
        colorbar: false,
    },
    Panel {
        title: "Simulated Geochemical Enrichment",
        colormap: Colormap::YlGnBu,
        colorbar: false,
    },
    Panel {
        title: "Composite Prospectivity Score",
        colormap: Colormap::Hot,
        colorbar: true,
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    fn right(&self) -> u32 {
        self.x + self.width
    }

    fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelLayout {
    pub image: PixelRect,
    pub colorbar: Option<PixelRect>,
}

/// Pixel placement of panel `index` (0..4, row-major) in a `width x height` figure.
pub fn panel_layout(
    width: u32,
    height: u32,
    index: usize,
    shape: GridShape,
    with_colorbar: bool,
) -> PanelLayout {
    let (qw, qh) = (width / 2, height / 2);
    let qx = (index % 2) as u32 * qw;
    let qy = (index / 2) as u32 * qh;
    let pad_x = (qw as f64 * QUADRANT_PAD).round() as u32;
    let pad_y = (qh as f64 * QUADRANT_PAD).round() as u32;

    let axes_w = qw.saturating_sub(2 * pad_x).max(1);
    let axes_h = qh.saturating_sub(2 * pad_y).max(1);

    // The legend steals its width and gap from the parent axes.
    let (bar_w, bar_gap) = if with_colorbar {
        (
            ((axes_w as f64 * COLORBAR_FRACTION).round() as u32).max(1),
            (axes_w as f64 * COLORBAR_PAD).round() as u32,
        )
    } else {
        (0, 0)
    };
    let image_area_w = axes_w.saturating_sub(bar_w + bar_gap).max(1);

    let image = fit_aspect(
        PixelRect {
            x: qx + pad_x,
            y: qy + pad_y,
            width: image_area_w,
            height: axes_h,
        },
        shape,
    );
    let colorbar = with_colorbar.then(|| PixelRect {
        x: image.right() + bar_gap,
        y: image.y,
        width: bar_w,
        height: image.height,
    });
    PanelLayout { image, colorbar }
}

/// Largest rectangle with the grid's aspect ratio centered inside `area`.
fn fit_aspect(area: PixelRect, shape: GridShape) -> PixelRect {
    let aspect = shape.cols as f64 / shape.rows as f64;
    let (mut w, mut h) = (area.width as f64, area.width as f64 / aspect);
    if h > area.height as f64 {
        h = area.height as f64;
        w = h * aspect;
    }
    let (w, h) = ((w.floor() as u32).max(1), (h.floor() as u32).max(1));
    PixelRect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

/// Label of the score legend. Text is not rasterized, so it is reported in the log.
pub const COLORBAR_LABEL: &str = "Prospectivity Score";

/// Value range a panel is normalized to; the colorbar spans the same range.
pub fn value_range(grid: &Grid) -> (f64, f64) {
    grid.min_max()
}

fn draw_grid(img: &mut RgbImage, grid: &Grid, rect: PixelRect, colormap: Colormap) {
    let (lo, hi) = value_range(grid);
    let (rows, cols) = (grid.rows() as u64, grid.cols() as u64);
    for py in 0..rect.height {
        let row = (py as u64 * rows / rect.height as u64) as usize;
        for px in 0..rect.width {
            let col = (px as u64 * cols / rect.width as u64) as usize;
            let t = normalize(grid.get(row, col), lo, hi);
            img.put_pixel(rect.x + px, rect.y + py, Rgb(colormap.sample(t)));
        }
    }
}

fn draw_colorbar(img: &mut RgbImage, rect: PixelRect, colormap: Colormap, line: u32) {
    let span = rect.height.saturating_sub(1).max(1) as f64;
    for py in 0..rect.height {
        let color = Rgb(colormap.sample(1.0 - py as f64 / span));
        for px in 0..rect.width {
            img.put_pixel(rect.x + px, rect.y + py, color);
        }
    }
    draw_outline(img, rect, line);
}

fn draw_outline(img: &mut RgbImage, rect: PixelRect, line: u32) {
    let line = line.min(rect.width / 2).min(rect.height / 2).max(1);
    for py in rect.y..rect.bottom() {
        for px in rect.x..rect.right() {
            let edge = px < rect.x + line
                || px >= rect.right().saturating_sub(line)
                || py < rect.y + line
                || py >= rect.bottom().saturating_sub(line);
            if edge {
                img.put_pixel(px, py, OUTLINE);
            }
        }
    }
}

/// Render the four survey panels into an in-memory image.
pub fn render_figure(survey: &Survey, config: &RenderConfig) -> Result<RgbImage, RenderError> {
    let (width, height) = config.validated_size()?;
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    let line = (config.dpi / 100).max(1);

    let grids = [
        &survey.layers.magnetic,
        &survey.layers.gravity,
        &survey.layers.geochem,
        &survey.prospectivity,
    ];
    for (index, (panel, grid)) in PANELS.iter().zip(grids).enumerate() {
        let layout = panel_layout(width, height, index, grid.shape(), panel.colorbar);
        draw_grid(&mut img, grid, layout.image, panel.colormap);
        if let Some(bar) = layout.colorbar {
            draw_colorbar(&mut img, bar, panel.colormap, line);
            let (min, max) = value_range(grid);
            info!(
                panel = panel.title,
                label = COLORBAR_LABEL,
                min,
                max,
                "colorbar drawn without tick labels; bottom is min, top is max"
            );
        }
        debug!(
            panel = panel.title,
            colormap = panel.colormap.name(),
            x = layout.image.x,
            y = layout.image.y,
            width = layout.image.width,
            height = layout.image.height,
            "rendered panel"
        );
    }
    Ok(img)
}

/// Render the figure and write it to `path` as PNG.
pub fn save_figure(
    survey: &Survey,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> Result<(), RenderError> {
    let path = path.as_ref();
    let img = render_figure(survey, config)?;
    img.save_with_format(path, ImageFormat::Png)?;
    info!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        dpi = config.dpi,
        "figure saved"
    );
    Ok(())
}
