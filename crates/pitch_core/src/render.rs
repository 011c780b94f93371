//! # Density Renderer
//!
//! Composites a density surface over a pitch background.
//!
//! The background is stretched to the full pitch bounds and every output
//! pixel is mapped back to pitch meters through [`PitchBounds`], so the
//! overlay and the pitch markings always share one linear mapping.
//! Colours, opacity and band count are cosmetic and come from
//! [`RenderConfig`].
//!
//! The finished image frames the pitch area with white margins carrying the
//! title above and the axis labels below and to the left.

use ab_glyph::{FontRef, PxScale};
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

use crate::config::RenderConfig;
use crate::density::{estimate_density, DensityGrid};
use crate::error::{LoadError, RenderError};
use crate::pitch::{is_on_marking, PitchBounds, PitchThird};
use crate::trajectory::{Period, PlayerTrace};

const GRASS: Rgba<u8> = Rgba([58, 125, 68, 255]);
const LINE: Rgba<u8> = Rgba([240, 240, 240, 255]);
const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);
const INK: Rgba<u8> = Rgba([20, 20, 20, 255]);

/// DejaVu Sans, see `assets/DejaVuSans-LICENSE`.
static ANNOTATION_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

pub const X_AXIS_LABEL: &str = "X Coordinate (meters)";
pub const Y_AXIS_LABEL: &str = "Y Coordinate (meters)";

/// ColorBrewer "Reds", light to dark.
const REDS: [[u8; 3]; 9] = [
    [255, 245, 240],
    [254, 224, 210],
    [252, 187, 161],
    [252, 146, 114],
    [251, 106, 74],
    [239, 59, 44],
    [203, 24, 29],
    [165, 15, 21],
    [103, 0, 13],
];

/// Sample the Reds ramp at `t` in [0, 1].
pub fn reds(t: f64) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0) * (REDS.len() - 1) as f64;
    let lo = t.floor() as usize;
    let hi = (lo + 1).min(REDS.len() - 1);
    let frac = t - lo as f64;

    let mut out = [0u8; 3];
    for c in 0..3 {
        let a = REDS[lo][c] as f64;
        let b = REDS[hi][c] as f64;
        out[c] = (a + (b - a) * frac).round() as u8;
    }
    out
}

/// Pitch image already stretched to the output size.
#[derive(Debug, Clone)]
pub struct Background {
    image: RgbaImage,
}

impl Background {
    /// Load an image from disk and stretch it to `width` x `height`.
    pub fn load(path: &Path, width: u32, height: u32) -> Result<Self, LoadError> {
        let source = image::open(path)
            .map_err(|source| LoadError::PitchImage { path: path.to_path_buf(), source })?
            .to_rgba8();
        debug!(
            path = %path.display(),
            src_width = source.width(),
            src_height = source.height(),
            "pitch image loaded"
        );
        Ok(Self::from_image(&source, width, height))
    }

    pub fn from_image(source: &RgbaImage, width: u32, height: u32) -> Self {
        let image = if source.dimensions() == (width, height) {
            source.clone()
        } else {
            imageops::resize(source, width, height, FilterType::Triangle)
        };
        Self { image }
    }

    /// Draw a standard pitch in the same mapping the overlay uses.
    pub fn procedural(bounds: &PitchBounds, width: u32, height: u32) -> Self {
        let meters_per_px = (bounds.width_m() / width as f64).max(bounds.height_m() / height as f64);
        let half_width_m = (meters_per_px * 0.75).max(0.12);

        let mut image = RgbaImage::from_pixel(width, height, GRASS);
        for (col, row, pixel) in image.enumerate_pixels_mut() {
            let (x, y) = bounds.pixel_center(col, row, width, height);
            if is_on_marking(bounds, x, y, half_width_m) {
                *pixel = LINE;
            }
        }
        Self { image }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// White space around the pitch area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Margins {
    /// Title strip
    pub top: u32,
    /// X axis label strip
    pub bottom: u32,
    /// Y axis label strip
    pub left: u32,
}

impl Margins {
    /// Text height scales with the pitch height, never below 12 px.
    fn text_scale(pitch_height: u32) -> f32 {
        (pitch_height as f32 * 0.04).max(12.0)
    }

    pub fn for_pitch_height(pitch_height: u32) -> Self {
        let scale = Self::text_scale(pitch_height);
        let label = (scale * 1.6).ceil() as u32;
        Self { top: (scale * 2.0).ceil() as u32, bottom: label, left: label }
    }
}

/// Frame `pitch` with the title and axis labels.
fn annotate(pitch: &RgbaImage, title: &str) -> Result<(RgbaImage, Margins), RenderError> {
    let font = FontRef::try_from_slice(ANNOTATION_FONT)?;
    let (width, height) = pitch.dimensions();
    let margins = Margins::for_pitch_height(height);
    let scale = PxScale::from(Margins::text_scale(height));

    let mut canvas = RgbaImage::from_pixel(width + margins.left, height + margins.top + margins.bottom, PAPER);
    imageops::overlay(&mut canvas, pitch, margins.left as i64, margins.top as i64);

    // Centred over the pitch area, clipped on the left if too wide
    let centred = |strip_width: u32, strip_height: u32, text: &str| {
        let (tw, th) = text_size(scale, &font, text);
        (
            (strip_width.saturating_sub(tw) / 2) as i32,
            (strip_height.saturating_sub(th) / 2) as i32,
        )
    };

    let (x, y) = centred(width, margins.top, title);
    draw_text_mut(&mut canvas, INK, margins.left as i32 + x, y, scale, &font, title);

    let (x, y) = centred(width, margins.bottom, X_AXIS_LABEL);
    let baseline = (margins.top + height) as i32;
    draw_text_mut(&mut canvas, INK, margins.left as i32 + x, baseline + y, scale, &font, X_AXIS_LABEL);

    // Drawn horizontally, then turned to read bottom to top
    let mut strip = RgbaImage::from_pixel(height, margins.left, PAPER);
    let (x, y) = centred(height, margins.left, Y_AXIS_LABEL);
    draw_text_mut(&mut strip, INK, x, y, scale, &font, Y_AXIS_LABEL);
    imageops::overlay(&mut canvas, &imageops::rotate270(&strip), 0, margins.top as i64);

    Ok((canvas, margins))
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactMetadata {
    pub title: String,
    pub trackable_object: String,
    pub period: u8,
    pub sample_count: usize,
    pub width: u32,
    pub height: u32,
    /// Space around the pitch area inside `width` x `height`
    pub margins: Margins,
    pub bounds: PitchBounds,
    /// Densest cell centre, pitch meters; absent when nothing landed on the pitch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak: Option<(f64, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_third: Option<PitchThird>,
    /// Kernel standard deviation along x and y (meters)
    pub bandwidth_std_m: (f64, f64),
    pub created_at: String,
}

/// One rendered heatmap for a (player, period).
#[derive(Debug, Clone)]
pub struct HeatmapArtifact {
    pub title: String,
    pub trackable_object: String,
    pub period: Period,
    /// Annotated image: pitch area plus margins
    pub image: RgbaImage,
    pub margins: Margins,
    pub density: DensityGrid,
}

impl HeatmapArtifact {
    pub fn sample_count(&self) -> usize {
        self.density.sample_count()
    }

    /// The pitch area alone, without title or axis labels.
    pub fn pitch_area(&self) -> RgbaImage {
        let width = self.image.width() - self.margins.left;
        let height = self.image.height() - self.margins.top - self.margins.bottom;
        imageops::crop_imm(&self.image, self.margins.left, self.margins.top, width, height).to_image()
    }

    pub fn metadata(&self) -> ArtifactMetadata {
        let peak = self.density.peak();
        let bandwidth = self.density.bandwidth();
        ArtifactMetadata {
            title: self.title.clone(),
            trackable_object: self.trackable_object.clone(),
            period: self.period.number(),
            sample_count: self.sample_count(),
            width: self.image.width(),
            height: self.image.height(),
            margins: self.margins,
            bounds: *self.density.bounds(),
            peak,
            peak_third: peak.map(|(x, _)| self.density.bounds().third(x)),
            bandwidth_std_m: (bandwidth.std_x(), bandwidth.std_y()),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn save_png(&self, path: &Path) -> Result<(), RenderError> {
        let file = File::create(path)
            .map_err(|source| RenderError::Io { path: path.to_path_buf(), source })?;
        let encoder = PngEncoder::new(BufWriter::new(file));
        encoder.write_image(
            self.image.as_raw(),
            self.image.width(),
            self.image.height(),
            ExtendedColorType::Rgba8,
        )?;
        Ok(())
    }

    pub fn save_metadata(&self, path: &Path) -> Result<(), RenderError> {
        let json = serde_json::to_string_pretty(&self.metadata())?;
        fs::write(path, json).map_err(|source| RenderError::Io { path: path.to_path_buf(), source })
    }
}

#[derive(Debug, Clone)]
pub enum RenderOutcome {
    Rendered(HeatmapArtifact),
    /// The player has no samples in this period
    NoData { period: Period },
}

impl RenderOutcome {
    pub fn artifact(&self) -> Option<&HeatmapArtifact> {
        match self {
            RenderOutcome::Rendered(artifact) => Some(artifact),
            RenderOutcome::NoData { .. } => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, RenderOutcome::NoData { .. })
    }
}

/// User-facing notice for an empty period.
pub fn no_data_message(period: Period) -> String {
    format!("No tracking data found for {period} for the selected player.")
}

/// `"Heatmap for <label> - Period <n>"`
pub fn heatmap_title(label: &str, period: Period) -> String {
    format!("Heatmap for {label} - {}", period.label())
}

#[derive(Debug, Clone)]
pub struct Renderer {
    config: RenderConfig,
    bounds: PitchBounds,
    background: Background,
}

impl Renderer {
    /// `background` is stretched again if its size differs from the config.
    pub fn new(config: RenderConfig, background: Background) -> Self {
        let background = if background.dimensions() == (config.width, config.height) {
            background
        } else {
            Background::from_image(background.image(), config.width, config.height)
        };
        Self { config, bounds: PitchBounds::STANDARD, background }
    }

    /// Renderer over a drawn pitch.
    pub fn with_procedural_pitch(config: RenderConfig) -> Self {
        let background = Background::procedural(&PitchBounds::STANDARD, config.width, config.height);
        Self { config, bounds: PitchBounds::STANDARD, background }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn bounds(&self) -> &PitchBounds {
        &self.bounds
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    /// Render one period of `trace`, or report that it has no data.
    pub fn render(
        &self,
        trace: &PlayerTrace,
        period: Period,
        label: &str,
    ) -> Result<RenderOutcome, RenderError> {
        let series = trace.period(period);
        if series.is_empty() {
            info!(trackable_object = %trace.trackable_object, %period, "no tracking data");
            return Ok(RenderOutcome::NoData { period });
        }

        let density = estimate_density(series, &self.bounds, &self.config.density)?;
        let title = heatmap_title(label, period);
        let (image, margins) = annotate(&self.composite(&density), &title)?;

        Ok(RenderOutcome::Rendered(HeatmapArtifact {
            title,
            trackable_object: trace.trackable_object.clone(),
            period,
            image,
            margins,
            density,
        }))
    }

    /// Blend banded density colours over the background (pitch area only).
    pub fn composite(&self, density: &DensityGrid) -> RgbaImage {
        let mut image = self.background.image().clone();
        let max = density.max_value();
        if max <= 0.0 {
            return image;
        }

        let (width, height) = image.dimensions();
        let threshold = self.config.threshold;
        let levels = self.config.levels as f64;
        let alpha = self.config.alpha as f64;

        for (col, row, pixel) in image.enumerate_pixels_mut() {
            let (x, y) = self.bounds.pixel_center(col, row, width, height);
            let level = density.value_at(x, y) / max;
            if level < threshold {
                continue;
            }

            let band = ((level - threshold) / (1.0 - threshold) * levels).floor().min(levels - 1.0);
            let color = reds((band + 1.0) / levels);
            for c in 0..3 {
                let bg = pixel.0[c] as f64;
                pixel.0[c] = (bg * (1.0 - alpha) + color[c] as f64 * alpha).round() as u8;
            }
        }

        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeatmapConfig;
    use crate::trajectory::CoordinateSeries;
    use tempfile::TempDir;

    fn renderer() -> Renderer {
        Renderer::with_procedural_pitch(HeatmapConfig::preview().render)
    }

    fn trace_with(period_1: &[(f64, f64)], period_2: &[(f64, f64)]) -> PlayerTrace {
        PlayerTrace {
            trackable_object: "7".to_string(),
            period_1: CoordinateSeries::from_points(period_1.iter().copied()),
            period_2: CoordinateSeries::from_points(period_2.iter().copied()),
        }
    }

    /// Uniform grey background, so the darkest overlay band has the lowest green.
    fn plain_renderer() -> Renderer {
        let config = HeatmapConfig::preview().render;
        let grey = RgbaImage::from_pixel(config.width, config.height, Rgba([128, 128, 128, 255]));
        let background = Background::from_image(&grey, config.width, config.height);
        Renderer::new(config, background)
    }

    fn hottest_pixel(image: &RgbaImage) -> (u32, u32) {
        let mut best = (0, 0, u8::MAX);
        for (col, row, p) in image.enumerate_pixels() {
            if p.0[1] < best.2 {
                best = (col, row, p.0[1]);
            }
        }
        (best.0, best.1)
    }

    #[test]
    fn test_reds_ramp_endpoints() {
        assert_eq!(reds(0.0), REDS[0]);
        assert_eq!(reds(1.0), REDS[8]);
        assert_eq!(reds(2.0), REDS[8]);
    }

    #[test]
    fn test_empty_period_reports_no_data() {
        let outcome = renderer().render(&trace_with(&[(1.0, 1.0)], &[]), Period::Second, "A B (Team INT)").unwrap();
        assert!(outcome.is_no_data());
        assert_eq!(
            no_data_message(Period::Second),
            "No tracking data found for period 2 for the selected player."
        );
    }

    #[test]
    fn test_single_point_renders_hot_spot_at_point() {
        let r = plain_renderer();
        let outcome = r.render(&trace_with(&[(10.0, 5.0)], &[]), Period::First, "A B (Team INT)").unwrap();
        let artifact = outcome.artifact().expect("rendered");

        assert_eq!(artifact.title, "Heatmap for A B (Team INT) - Period 1");
        assert_eq!(artifact.sample_count(), 1);

        let pitch = artifact.pitch_area();
        assert_eq!(pitch.dimensions(), (r.config().width, r.config().height));

        let (col, row) = hottest_pixel(&pitch);
        let (x, y) = r.bounds().pixel_center(col, row, pitch.width(), pitch.height());
        let std = artifact.density.bandwidth().std_x();
        assert!((x - 10.0).abs() <= std && (y - 5.0).abs() <= std, "hot spot at ({x}, {y})");
    }

    #[test]
    fn test_attacking_third_hot_spot_lands_in_right_third() {
        let points: Vec<(f64, f64)> = (0..60).map(|i| (40.0 + (i % 6) as f64, -10.0 + (i / 6) as f64)).collect();
        let r = plain_renderer();
        let outcome = r.render(&trace_with(&[], &points), Period::Second, "X").unwrap();
        let artifact = outcome.artifact().unwrap();
        let pitch = artifact.pitch_area();

        let (col, row) = hottest_pixel(&pitch);
        assert!(col > pitch.width() * 2 / 3);
        // y = -5 is below the halfway row
        assert!(row > pitch.height() / 2);
        assert_eq!(artifact.metadata().peak_third, Some(PitchThird::Attacking));
    }

    #[test]
    fn test_background_outside_overlay_untouched() {
        let r = renderer();
        let outcome = r.render(&trace_with(&[(40.0, 20.0)], &[]), Period::First, "X").unwrap();
        let pitch = outcome.artifact().unwrap().pitch_area();
        let corner = pitch.height() - 5;
        assert_eq!(pitch.get_pixel(5, corner), r.background().image().get_pixel(5, corner));
    }

    #[test]
    fn test_background_is_stretched_to_output() {
        let source = RgbaImage::from_pixel(50, 30, Rgba([0, 0, 255, 255]));
        let config = HeatmapConfig::preview().render;
        let r = Renderer::new(config.clone(), Background::from_image(&source, 10, 10));
        assert_eq!(r.background().dimensions(), (config.width, config.height));
    }

    #[test]
    fn test_save_png_and_metadata() {
        let dir = TempDir::new().unwrap();
        let outcome = renderer().render(&trace_with(&[(0.0, 0.0), (3.0, 1.0), (-2.0, 4.0)], &[]), Period::First, "X").unwrap();
        let artifact = outcome.artifact().unwrap();

        let png = dir.path().join("heatmap.png");
        let meta = dir.path().join("heatmap.json");
        artifact.save_png(&png).unwrap();
        artifact.save_metadata(&meta).unwrap();

        let reloaded = image::open(&png).unwrap();
        assert_eq!(reloaded.width(), artifact.image.width());
        assert_eq!(reloaded.height(), artifact.image.height());

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&meta).unwrap()).unwrap();
        assert_eq!(json["period"], 1);
        assert_eq!(json["sample_count"], 3);
        assert_eq!(json["title"], "Heatmap for X - Period 1");
        assert!(json["peak"].is_array());
    }

    fn has_ink(image: &RgbaImage, x0: u32, y0: u32, w: u32, h: u32) -> bool {
        imageops::crop_imm(image, x0, y0, w, h)
            .to_image()
            .pixels()
            .any(|p| p.0[0] < 100 && p.0[1] < 100 && p.0[2] < 100)
    }

    #[test]
    fn test_title_and_axis_labels_are_drawn() {
        let dir = TempDir::new().unwrap();
        let r = plain_renderer();
        let first = r.render(&trace_with(&[(0.0, 0.0)], &[]), Period::First, "A B (Team INT)").unwrap();
        let artifact = first.artifact().unwrap();
        let m = artifact.margins;
        let (w, h) = (r.config().width, r.config().height);

        assert_eq!(artifact.image.dimensions(), (w + m.left, h + m.top + m.bottom));

        // Written file keeps the annotations
        let png = dir.path().join("heatmap.png");
        artifact.save_png(&png).unwrap();
        let written = image::open(&png).unwrap().to_rgba8();
        assert_eq!(written, artifact.image);

        assert!(has_ink(&written, m.left, 0, w, m.top), "title strip is blank");
        assert!(has_ink(&written, m.left, m.top + h, w, m.bottom), "x label strip is blank");
        assert!(has_ink(&written, 0, m.top, m.left, h), "y label strip is blank");

        // Different period, different title pixels
        let trace = trace_with(&[(0.0, 0.0)], &[(0.0, 0.0)]);
        let second = r.render(&trace, Period::Second, "A B (Team INT)").unwrap();
        let title_strip = |a: &HeatmapArtifact| imageops::crop_imm(&a.image, 0, 0, a.image.width(), m.top).to_image();
        assert_ne!(title_strip(artifact), title_strip(second.artifact().unwrap()));
    }

    #[test]
    fn test_metadata_omits_peak_when_nothing_lands_on_pitch() {
        let outcome = renderer().render(&trace_with(&[(500.0, 0.0)], &[]), Period::First, "X").unwrap();
        let meta = outcome.artifact().unwrap().metadata();

        assert_eq!(meta.peak, None);
        assert_eq!(meta.peak_third, None);
        let json = serde_json::to_value(&meta).unwrap();
        assert!(json.get("peak").is_none());
    }

    #[test]
    fn test_missing_pitch_image_is_load_error() {
        let err = Background::load(Path::new("/nonexistent/pitch.png"), 10, 10).unwrap_err();
        assert!(matches!(err, LoadError::PitchImage { .. }));
    }
}
