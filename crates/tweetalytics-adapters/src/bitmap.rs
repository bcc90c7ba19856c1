//! Local PNG rendering of chart requests with plotters.
//!
//! Charts are drawn without text so rendering never depends on system fonts.
//! Both pie kinds are drawn as a flat pie.

use async_trait::async_trait;
use image::{DynamicImage, ImageOutputFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::f64::consts::TAU;
use std::io::Cursor;
use tracing::debug;
use tweetalytics_common::{Result, TweetalyticsError};
use tweetalytics_engine::{ChartDataset, ChartRenderer, ChartRequest, RenderedChart};

const MARGIN: i32 = 12;
const PIE_SEGMENT_STEP: f64 = TAU / 180.0;

const PALETTE: [RGBColor; 8] = [
    RGBColor(51, 102, 204),
    RGBColor(220, 57, 18),
    RGBColor(255, 153, 0),
    RGBColor(16, 150, 24),
    RGBColor(153, 0, 153),
    RGBColor(0, 153, 198),
    RGBColor(221, 68, 119),
    RGBColor(102, 170, 0),
];

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

fn draw_error<E>(err: E) -> TweetalyticsError
where
    E: std::error::Error + Send + Sync + 'static,
{
    TweetalyticsError::render_with_source("Failed to draw chart", err)
}

/// Renders chart requests to PNG bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapChartRenderer;

impl BitmapChartRenderer {
    /// Creates a renderer.
    pub fn new() -> Self {
        Self
    }

    /// Draws the chart and encodes it as PNG.
    pub fn render_png(&self, request: &ChartRequest) -> Result<Vec<u8>> {
        let (width, height) = (request.canvas.width, request.canvas.height);
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_error)?;
            if request.kind.is_pie() {
                draw_pie(&root, &request.dataset.values, width, height)?;
            } else {
                draw_bars(&root, &request.dataset, width, height)?;
            }
            root.present().map_err(draw_error)?;
        }
        encode_png(buffer, width, height)
    }
}

fn draw_bars(root: &Area<'_>, dataset: &ChartDataset, width: u32, height: u32) -> Result<()> {
    let left = MARGIN;
    let bottom = height as i32 - MARGIN;
    let plot_width = (width as i32 - 2 * MARGIN).max(1);
    let plot_height = (height as i32 - 2 * MARGIN).max(1);

    let axes = PathElement::new(
        vec![(left, MARGIN), (left, bottom), (left + plot_width, bottom)],
        BLACK,
    );
    root.draw(&axes).map_err(draw_error)?;

    if dataset.values.is_empty() || dataset.max == 0 {
        return Ok(());
    }

    let slot = plot_width as f64 / dataset.values.len() as f64;
    let gap = (slot * 0.15).max(1.0);
    for (i, value) in dataset.values.iter().enumerate() {
        let bar_height = (*value as f64 / dataset.max as f64 * plot_height as f64).round() as i32;
        if bar_height == 0 {
            continue;
        }
        let x0 = left + (i as f64 * slot + gap).round() as i32;
        let x1 = left + ((i + 1) as f64 * slot - gap).round() as i32;
        let bar = Rectangle::new(
            [(x0, bottom - bar_height), (x1.max(x0 + 1), bottom - 1)],
            PALETTE[0].filled(),
        );
        root.draw(&bar).map_err(draw_error)?;
    }
    Ok(())
}

fn draw_pie(root: &Area<'_>, values: &[u64], width: u32, height: u32) -> Result<()> {
    let total: u64 = values.iter().sum();
    if total == 0 {
        return Ok(());
    }

    let center = (width as f64 / 2.0, height as f64 / 2.0);
    let radius = (width.min(height) as f64 / 2.0 - MARGIN as f64).max(1.0);
    let point = |angle: f64| {
        (
            (center.0 + radius * angle.cos()).round() as i32,
            (center.1 + radius * angle.sin()).round() as i32,
        )
    };

    // Start at twelve o'clock, clockwise.
    let mut start = -TAU / 4.0;
    for (i, value) in values.iter().enumerate() {
        if *value == 0 {
            continue;
        }
        let sweep = *value as f64 / total as f64 * TAU;
        let end = start + sweep;

        let mut outline = vec![(center.0.round() as i32, center.1.round() as i32)];
        let mut angle = start;
        while angle < end {
            outline.push(point(angle));
            angle += PIE_SEGMENT_STEP;
        }
        outline.push(point(end));

        let slice = Polygon::new(outline, PALETTE[i % PALETTE.len()].filled());
        root.draw(&slice).map_err(draw_error)?;
        start = end;
    }
    Ok(())
}

fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>> {
    let image = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| TweetalyticsError::render("Pixel buffer does not match canvas size"))?;

    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .map_err(|e| TweetalyticsError::render_with_source("Failed to encode PNG", e))?;
    Ok(bytes)
}

#[async_trait]
impl ChartRenderer for BitmapChartRenderer {
    async fn render(&self, request: &ChartRequest) -> Result<RenderedChart> {
        let png = self.render_png(request)?;
        debug!(kind = %request.kind, canvas = %request.canvas, bytes = png.len(), "Rendered PNG chart");
        Ok(RenderedChart::Png(png))
    }

    fn name(&self) -> &'static str {
        "bitmap"
    }
}
