//! Risk distribution bar chart.
//!
//! The chart is rasterized straight into an RGB buffer and encoded as PNG.
//! Text uses a small built-in 3x5 glyph set, which covers the upper-cased
//! risk labels, digits and axis titles.

use image::{codecs::png::PngEncoder, ColorType, ImageEncoder, ImageResult, Rgb, RgbImage};

use crate::constants::{CHART_HEIGHT, CHART_TITLE, CHART_WIDTH};
use crate::db::Store;
use crate::error::Result;
use crate::models::RiskDistribution;

const BACKGROUND: Rgb<u8> = Rgb([245, 255, 250]); // mintcream
const BAR: Rgb<u8> = Rgb([0, 100, 0]); // darkgreen
const AXIS: Rgb<u8> = Rgb([40, 40, 40]);
const GRID: Rgb<u8> = Rgb([200, 215, 205]);
const TEXT: Rgb<u8> = Rgb([20, 20, 20]);

const MARGIN_LEFT: i64 = 90;
const MARGIN_RIGHT: i64 = 30;
const MARGIN_TOP: i64 = 80;
const MARGIN_BOTTOM: i64 = 90;

const MAX_TICKS: i64 = 10;

const GLYPH_WIDTH: i64 = 3;
const GLYPH_HEIGHT: i64 = 5;

/// Aggregate the current permits by risk and render them as a PNG
pub async fn render_risk_chart(store: &Store) -> Result<Vec<u8>> {
    let distribution = store.aggregate_by_risk().await?;

    tracing::debug!(
        "Rendering risk chart: {} categories, {} permits",
        distribution.risks.len(),
        distribution.total()
    );

    let png = tokio::task::spawn_blocking(move || draw_risk_chart(&distribution)).await??;
    Ok(png)
}

/// Draw one bar per risk category with an integer-only vertical axis
pub fn draw_risk_chart(distribution: &RiskDistribution) -> ImageResult<Vec<u8>> {
    let mut canvas = Canvas::new(CHART_WIDTH, CHART_HEIGHT);
    let layout = Layout::new(distribution.max_count());

    canvas.draw_text_centered(canvas.width() / 2, 24, CHART_TITLE, 4, TEXT);

    // Horizontal grid and y tick labels
    let mut value = 0;
    while value <= layout.axis_max {
        let y = layout.y_for(value);
        canvas.fill_rect(layout.left, y, layout.right - layout.left, 1, GRID);

        let label = value.to_string();
        let x = layout.left - 10 - text_width(&label, 2);
        canvas.draw_text(x, y - GLYPH_HEIGHT, &label, 2, TEXT);

        value += layout.step;
    }

    // Bars and category labels
    let categories = distribution.risks.len() as i64;
    if categories > 0 {
        let slot = (layout.right - layout.left) / categories;
        let bar_width = (slot * 3 / 5).max(1);
        let max_chars = (slot / ((GLYPH_WIDTH + 1) * 2)).max(1) as usize;

        for (i, (risk, count)) in distribution.iter().enumerate() {
            let center = layout.left + slot * i as i64 + slot / 2;
            let top = layout.y_for(count);
            canvas.fill_rect(center - bar_width / 2, top, bar_width, layout.bottom - top, BAR);

            let label: String = risk.chars().take(max_chars).collect();
            canvas.draw_text_centered(center, layout.bottom + 14, &label, 2, TEXT);
        }
    }

    // Axes
    canvas.fill_rect(layout.left, layout.top, 2, layout.bottom - layout.top + 1, AXIS);
    canvas.fill_rect(layout.left, layout.bottom, layout.right - layout.left, 2, AXIS);

    canvas.draw_text_centered(
        (layout.left + layout.right) / 2,
        canvas.height() - 34,
        "RIESGOS",
        3,
        TEXT,
    );
    canvas.draw_text(12, layout.top - 28, "N. PERSONAS", 2, TEXT);

    canvas.encode_png()
}

/// Plot area and vertical scale
#[derive(Debug, Clone, Copy)]
struct Layout {
    left: i64,
    right: i64,
    top: i64,
    bottom: i64,
    step: i64,
    axis_max: i64,
}

impl Layout {
    fn new(max_count: i64) -> Self {
        let step = tick_step(max_count);
        let axis_max = ((max_count + step - 1) / step).max(1) * step;

        Self {
            left: MARGIN_LEFT,
            right: CHART_WIDTH as i64 - MARGIN_RIGHT,
            top: MARGIN_TOP,
            bottom: CHART_HEIGHT as i64 - MARGIN_BOTTOM,
            step,
            axis_max,
        }
    }

    fn y_for(&self, value: i64) -> i64 {
        self.bottom - value * (self.bottom - self.top) / self.axis_max
    }
}

/// Smallest 1/2/5 x 10^k integer step giving at most `MAX_TICKS` intervals
fn tick_step(max_count: i64) -> i64 {
    let mut magnitude = 1;
    loop {
        for factor in [1, 2, 5] {
            let step = magnitude * factor;
            if max_count / step <= MAX_TICKS {
                return step;
            }
        }
        magnitude *= 10;
    }
}

fn text_width(text: &str, scale: i64) -> i64 {
    let chars = text.chars().count() as i64;
    if chars == 0 {
        0
    } else {
        chars * (GLYPH_WIDTH + 1) * scale - scale
    }
}

struct Canvas {
    image: RgbImage,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, BACKGROUND),
        }
    }

    fn width(&self) -> i64 {
        self.image.width() as i64
    }

    fn height(&self) -> i64 {
        self.image.height() as i64
    }

    /// Fill a rectangle, clipped to the image bounds
    fn fill_rect(&mut self, x: i64, y: i64, w: i64, h: i64, color: Rgb<u8>) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width());
        let y1 = (y + h).min(self.height());

        for py in y0..y1 {
            for px in x0..x1 {
                self.image.put_pixel(px as u32, py as u32, color);
            }
        }
    }

    fn draw_text(&mut self, x: i64, y: i64, text: &str, scale: i64, color: Rgb<u8>) {
        let mut cursor = x;
        for c in text.chars() {
            for (row, bits) in glyph(c).iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                        self.fill_rect(
                            cursor + col * scale,
                            y + row as i64 * scale,
                            scale,
                            scale,
                            color,
                        );
                    }
                }
            }
            cursor += (GLYPH_WIDTH + 1) * scale;
        }
    }

    fn draw_text_centered(&mut self, center: i64, y: i64, text: &str, scale: i64, color: Rgb<u8>) {
        let x = center - text_width(text, scale) / 2;
        self.draw_text(x, y, text, scale, color);
    }

    fn encode_png(&self) -> ImageResult<Vec<u8>> {
        let mut png = Vec::new();
        PngEncoder::new(&mut png).write_image(
            self.image.as_raw(),
            self.image.width(),
            self.image.height(),
            ColorType::Rgb8,
        )?;
        Ok(png)
    }
}

/// 3x5 bitmap rows, most significant of the low three bits is the left column
fn glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' | 'Ñ' | 'ñ' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        _ => [0; 5],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn decode(png: &[u8]) -> RgbImage {
        image::load_from_memory(png).unwrap().to_rgb8()
    }

    #[test]
    fn test_tick_step_is_integer_and_bounded() {
        assert_eq!(tick_step(0), 1);
        assert_eq!(tick_step(3), 1);
        assert_eq!(tick_step(10), 1);
        assert_eq!(tick_step(11), 2);
        assert_eq!(tick_step(45), 5);
        assert_eq!(tick_step(230), 50);

        for max in [0, 1, 7, 19, 99, 1234] {
            let layout = Layout::new(max);
            assert!(layout.axis_max >= max.max(1));
            assert_eq!(layout.axis_max % layout.step, 0);
            assert!(layout.axis_max / layout.step <= MAX_TICKS + 1);
        }
    }

    #[test]
    fn test_renders_png_with_bars() {
        let distribution: RiskDistribution = vec![("ALTO".to_string(), 3), ("BAJO".to_string(), 1)]
            .into_iter()
            .collect();

        let png = draw_risk_chart(&distribution).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);

        let image = decode(&png);
        assert_eq!(image.dimensions(), (CHART_WIDTH, CHART_HEIGHT));

        // Centre of the first slot, just above the x axis, is inside the tallest bar
        let layout = Layout::new(3);
        let slot = (layout.right - layout.left) / 2;
        let x = (layout.left + slot / 2) as u32;
        assert_eq!(*image.get_pixel(x, (layout.bottom - 3) as u32), BAR);
        assert_eq!(*image.get_pixel(x, (layout.top + 3) as u32), BAR);
    }

    #[test]
    fn test_renders_empty_distribution() {
        let png = draw_risk_chart(&RiskDistribution::default()).unwrap();
        let image = decode(&png);

        assert_eq!(image.dimensions(), (CHART_WIDTH, CHART_HEIGHT));
        assert!(!image.pixels().any(|p| *p == BAR));
    }

    #[test]
    fn test_unknown_glyphs_are_blank() {
        assert_eq!(glyph('@'), [0; 5]);
        assert_eq!(glyph('a'), glyph('A'));
        assert_ne!(glyph('7'), [0; 5]);
    }
}
