//! Figure rendering to raster images (PNG, JPEG, BMP, TIFF) and SVG.
//!
//! The renderer only sees a [`Figure`]: primitives in data space plus the
//! axis parameters. Both backends implement [`Surface`] and share the same
//! drawing pass, so the output formats only differ in how rectangles and
//! text are emitted.

use crate::error::{IdeogramError, Result};
use crate::layout::{Axes, DrawPrimitive, Figure, Rgb};
use image::{ImageFormat, RgbImage};
use log::{debug, info};
use std::io::Cursor;
use std::path::Path;

/// 12 in at 300 dpi.
pub const CANVAS_SIZE: u32 = 3600;

const MARGIN_LEFT: f64 = 360.0;
const MARGIN_TOP: f64 = 200.0;
const MARGIN_BOTTOM: f64 = 120.0;
/// Space right of the plot, holding the legend.
const MARGIN_RIGHT: f64 = 1000.0;

const TITLE_SIZE: f64 = 48.0;
const AXIS_LABEL_SIZE: f64 = 40.0;
const TEXT_SIZE: f64 = 32.0;

const BLACK: Rgb = (0, 0, 0);

/// 5x8 bitmap font, ASCII only.
static FONT_5X8: [[u8; 8]; 128] = {
    let mut font = [[0u8; 8]; 128];
    font[b' ' as usize] = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    font[b'!' as usize] = [0x20, 0x20, 0x20, 0x20, 0x20, 0x00, 0x20, 0x00];
    font[b'"' as usize] = [0x50, 0x50, 0x50, 0x00, 0x00, 0x00, 0x00, 0x00];
    font[b'#' as usize] = [0x50, 0x50, 0xF8, 0x50, 0xF8, 0x50, 0x50, 0x00];
    font[b'$' as usize] = [0x20, 0x78, 0xA0, 0x70, 0x28, 0xF0, 0x20, 0x00];
    font[b'%' as usize] = [0xC0, 0xC8, 0x10, 0x20, 0x40, 0x98, 0x18, 0x00];
    font[b'&' as usize] = [0x40, 0xA0, 0xA0, 0x40, 0xA8, 0x90, 0x68, 0x00];
    font[b'\'' as usize] = [0x20, 0x20, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00];
    font[b'(' as usize] = [0x10, 0x20, 0x40, 0x40, 0x40, 0x20, 0x10, 0x00];
    font[b')' as usize] = [0x40, 0x20, 0x10, 0x10, 0x10, 0x20, 0x40, 0x00];
    font[b'*' as usize] = [0x00, 0x20, 0xA8, 0x70, 0xA8, 0x20, 0x00, 0x00];
    font[b'+' as usize] = [0x00, 0x20, 0x20, 0xF8, 0x20, 0x20, 0x00, 0x00];
    font[b',' as usize] = [0x00, 0x00, 0x00, 0x00, 0x00, 0x20, 0x20, 0x40];
    font[b'-' as usize] = [0x00, 0x00, 0x00, 0xF8, 0x00, 0x00, 0x00, 0x00];
    font[b'.' as usize] = [0x00, 0x00, 0x00, 0x00, 0x00, 0x20, 0x20, 0x00];
    font[b'/' as usize] = [0x00, 0x08, 0x10, 0x20, 0x40, 0x80, 0x00, 0x00];
    font[b'0' as usize] = [0x70, 0x88, 0x98, 0xA8, 0xC8, 0x88, 0x70, 0x00];
    font[b'1' as usize] = [0x20, 0x60, 0x20, 0x20, 0x20, 0x20, 0x70, 0x00];
    font[b'2' as usize] = [0x70, 0x88, 0x08, 0x30, 0x40, 0x80, 0xF8, 0x00];
    font[b'3' as usize] = [0xF8, 0x10, 0x20, 0x10, 0x08, 0x88, 0x70, 0x00];
    font[b'4' as usize] = [0x10, 0x30, 0x50, 0x90, 0xF8, 0x10, 0x10, 0x00];
    font[b'5' as usize] = [0xF8, 0x80, 0xF0, 0x08, 0x08, 0x88, 0x70, 0x00];
    font[b'6' as usize] = [0x30, 0x40, 0x80, 0xF0, 0x88, 0x88, 0x70, 0x00];
    font[b'7' as usize] = [0xF8, 0x08, 0x10, 0x20, 0x40, 0x40, 0x40, 0x00];
    font[b'8' as usize] = [0x70, 0x88, 0x88, 0x70, 0x88, 0x88, 0x70, 0x00];
    font[b'9' as usize] = [0x70, 0x88, 0x88, 0x78, 0x08, 0x10, 0x60, 0x00];
    font[b':' as usize] = [0x00, 0x00, 0x20, 0x00, 0x00, 0x20, 0x00, 0x00];
    font[b';' as usize] = [0x00, 0x00, 0x20, 0x00, 0x00, 0x20, 0x20, 0x40];
    font[b'<' as usize] = [0x08, 0x10, 0x20, 0x40, 0x20, 0x10, 0x08, 0x00];
    font[b'=' as usize] = [0x00, 0x00, 0xF8, 0x00, 0xF8, 0x00, 0x00, 0x00];
    font[b'>' as usize] = [0x80, 0x40, 0x20, 0x10, 0x20, 0x40, 0x80, 0x00];
    font[b'?' as usize] = [0x70, 0x88, 0x08, 0x10, 0x20, 0x00, 0x20, 0x00];
    font[b'@' as usize] = [0x70, 0x88, 0xB8, 0xA8, 0xB8, 0x80, 0x70, 0x00];
    font[b'A' as usize] = [0x70, 0x88, 0x88, 0xF8, 0x88, 0x88, 0x88, 0x00];
    font[b'B' as usize] = [0xF0, 0x88, 0x88, 0xF0, 0x88, 0x88, 0xF0, 0x00];
    font[b'C' as usize] = [0x70, 0x88, 0x80, 0x80, 0x80, 0x88, 0x70, 0x00];
    font[b'D' as usize] = [0xE0, 0x90, 0x88, 0x88, 0x88, 0x90, 0xE0, 0x00];
    font[b'E' as usize] = [0xF8, 0x80, 0x80, 0xF0, 0x80, 0x80, 0xF8, 0x00];
    font[b'F' as usize] = [0xF8, 0x80, 0x80, 0xF0, 0x80, 0x80, 0x80, 0x00];
    font[b'G' as usize] = [0x70, 0x88, 0x80, 0xB8, 0x88, 0x88, 0x70, 0x00];
    font[b'H' as usize] = [0x88, 0x88, 0x88, 0xF8, 0x88, 0x88, 0x88, 0x00];
    font[b'I' as usize] = [0x70, 0x20, 0x20, 0x20, 0x20, 0x20, 0x70, 0x00];
    font[b'J' as usize] = [0x38, 0x10, 0x10, 0x10, 0x10, 0x90, 0x60, 0x00];
    font[b'K' as usize] = [0x88, 0x90, 0xA0, 0xC0, 0xA0, 0x90, 0x88, 0x00];
    font[b'L' as usize] = [0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0xF8, 0x00];
    font[b'M' as usize] = [0x88, 0xD8, 0xA8, 0xA8, 0x88, 0x88, 0x88, 0x00];
    font[b'N' as usize] = [0x88, 0xC8, 0xA8, 0x98, 0x88, 0x88, 0x88, 0x00];
    font[b'O' as usize] = [0x70, 0x88, 0x88, 0x88, 0x88, 0x88, 0x70, 0x00];
    font[b'P' as usize] = [0xF0, 0x88, 0x88, 0xF0, 0x80, 0x80, 0x80, 0x00];
    font[b'Q' as usize] = [0x70, 0x88, 0x88, 0x88, 0xA8, 0x90, 0x68, 0x00];
    font[b'R' as usize] = [0xF0, 0x88, 0x88, 0xF0, 0xA0, 0x90, 0x88, 0x00];
    font[b'S' as usize] = [0x70, 0x88, 0x80, 0x70, 0x08, 0x88, 0x70, 0x00];
    font[b'T' as usize] = [0xF8, 0x20, 0x20, 0x20, 0x20, 0x20, 0x20, 0x00];
    font[b'U' as usize] = [0x88, 0x88, 0x88, 0x88, 0x88, 0x88, 0x70, 0x00];
    font[b'V' as usize] = [0x88, 0x88, 0x88, 0x88, 0x88, 0x50, 0x20, 0x00];
    font[b'W' as usize] = [0x88, 0x88, 0x88, 0xA8, 0xA8, 0xD8, 0x88, 0x00];
    font[b'X' as usize] = [0x88, 0x88, 0x50, 0x20, 0x50, 0x88, 0x88, 0x00];
    font[b'Y' as usize] = [0x88, 0x88, 0x50, 0x20, 0x20, 0x20, 0x20, 0x00];
    font[b'Z' as usize] = [0xF8, 0x08, 0x10, 0x20, 0x40, 0x80, 0xF8, 0x00];
    font[b'[' as usize] = [0x70, 0x40, 0x40, 0x40, 0x40, 0x40, 0x70, 0x00];
    font[b'\\' as usize] = [0x00, 0x80, 0x40, 0x20, 0x10, 0x08, 0x00, 0x00];
    font[b']' as usize] = [0x70, 0x10, 0x10, 0x10, 0x10, 0x10, 0x70, 0x00];
    font[b'^' as usize] = [0x20, 0x50, 0x88, 0x00, 0x00, 0x00, 0x00, 0x00];
    font[b'_' as usize] = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF8, 0x00];
    font[b'`' as usize] = [0x40, 0x20, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00];
    font[b'a' as usize] = [0x00, 0x00, 0x70, 0x08, 0x78, 0x88, 0x78, 0x00];
    font[b'b' as usize] = [0x80, 0x80, 0xB0, 0xC8, 0x88, 0x88, 0xF0, 0x00];
    font[b'c' as usize] = [0x00, 0x00, 0x70, 0x80, 0x80, 0x88, 0x70, 0x00];
    font[b'd' as usize] = [0x08, 0x08, 0x68, 0x98, 0x88, 0x88, 0x78, 0x00];
    font[b'e' as usize] = [0x00, 0x00, 0x70, 0x88, 0xF8, 0x80, 0x70, 0x00];
    font[b'f' as usize] = [0x30, 0x48, 0x40, 0xE0, 0x40, 0x40, 0x40, 0x00];
    font[b'g' as usize] = [0x00, 0x00, 0x78, 0x88, 0x78, 0x08, 0x70, 0x00];
    font[b'h' as usize] = [0x80, 0x80, 0xB0, 0xC8, 0x88, 0x88, 0x88, 0x00];
    font[b'i' as usize] = [0x20, 0x00, 0x60, 0x20, 0x20, 0x20, 0x70, 0x00];
    font[b'j' as usize] = [0x10, 0x00, 0x30, 0x10, 0x10, 0x90, 0x60, 0x00];
    font[b'k' as usize] = [0x80, 0x80, 0x90, 0xA0, 0xC0, 0xA0, 0x90, 0x00];
    font[b'l' as usize] = [0x60, 0x20, 0x20, 0x20, 0x20, 0x20, 0x70, 0x00];
    font[b'm' as usize] = [0x00, 0x00, 0xD0, 0xA8, 0xA8, 0xA8, 0xA8, 0x00];
    font[b'n' as usize] = [0x00, 0x00, 0xB0, 0xC8, 0x88, 0x88, 0x88, 0x00];
    font[b'o' as usize] = [0x00, 0x00, 0x70, 0x88, 0x88, 0x88, 0x70, 0x00];
    font[b'p' as usize] = [0x00, 0x00, 0xF0, 0x88, 0xF0, 0x80, 0x80, 0x00];
    font[b'q' as usize] = [0x00, 0x00, 0x78, 0x88, 0x78, 0x08, 0x08, 0x00];
    font[b'r' as usize] = [0x00, 0x00, 0xB0, 0xC8, 0x80, 0x80, 0x80, 0x00];
    font[b's' as usize] = [0x00, 0x00, 0x70, 0x80, 0x70, 0x08, 0xF0, 0x00];
    font[b't' as usize] = [0x40, 0x40, 0xE0, 0x40, 0x40, 0x48, 0x30, 0x00];
    font[b'u' as usize] = [0x00, 0x00, 0x88, 0x88, 0x88, 0x98, 0x68, 0x00];
    font[b'v' as usize] = [0x00, 0x00, 0x88, 0x88, 0x88, 0x50, 0x20, 0x00];
    font[b'w' as usize] = [0x00, 0x00, 0x88, 0x88, 0xA8, 0xA8, 0x50, 0x00];
    font[b'x' as usize] = [0x00, 0x00, 0x88, 0x50, 0x20, 0x50, 0x88, 0x00];
    font[b'y' as usize] = [0x00, 0x00, 0x88, 0x88, 0x78, 0x08, 0x70, 0x00];
    font[b'z' as usize] = [0x00, 0x00, 0xF8, 0x10, 0x20, 0x40, 0xF8, 0x00];
    font[b'{' as usize] = [0x10, 0x20, 0x20, 0x40, 0x20, 0x20, 0x10, 0x00];
    font[b'|' as usize] = [0x20, 0x20, 0x20, 0x20, 0x20, 0x20, 0x20, 0x00];
    font[b'}' as usize] = [0x40, 0x20, 0x20, 0x10, 0x20, 0x20, 0x40, 0x00];
    font[b'~' as usize] = [0x00, 0x00, 0x40, 0xA8, 0x10, 0x00, 0x00, 0x00];
    font
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    /// Distance from the anchor point back to the start of a run of `extent` length.
    fn offset(self, extent: f64) -> f64 {
        match self {
            Anchor::Start => 0.0,
            Anchor::Middle => extent / 2.0,
            Anchor::End => extent,
        }
    }

    fn svg(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Pixel-space drawing operations a backend must provide.
trait Surface {
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb);

    /// Draw `text` with its top edge at `y` (left edge at `x` when `vertical`,
    /// reading bottom to top).
    fn text(&mut self, x: f64, y: f64, text: &str, size: f64, anchor: Anchor, vertical: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Svg,
    Raster(ImageFormat),
}

impl OutputFormat {
    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Raster(ImageFormat::Png)),
            "jpg" | "jpeg" => Ok(OutputFormat::Raster(ImageFormat::Jpeg)),
            "bmp" => Ok(OutputFormat::Raster(ImageFormat::Bmp)),
            "tif" | "tiff" => Ok(OutputFormat::Raster(ImageFormat::Tiff)),
            "" => Err(IdeogramError::UnsupportedFormat(format!("{:?} has no file extension", path))),
            other => Err(IdeogramError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Maps data coordinates into the plot area of the canvas.
struct Frame<'a> {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    axes: &'a Axes,
}

impl<'a> Frame<'a> {
    fn new(axes: &'a Axes, canvas: u32) -> Self {
        let canvas = canvas as f64;
        Frame {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: canvas - MARGIN_LEFT - MARGIN_RIGHT,
            height: canvas - MARGIN_TOP - MARGIN_BOTTOM,
            axes,
        }
    }

    fn x_scale(&self) -> f64 {
        self.width / (self.axes.x_max - self.axes.x_min)
    }

    fn y_scale(&self) -> f64 {
        self.height / self.axes.y_max
    }

    fn x_px(&self, x: f64) -> f64 {
        self.left + (x - self.axes.x_min) * self.x_scale()
    }

    /// Coordinate 0 is at the top of the plot.
    fn y_px(&self, y: f64) -> f64 {
        self.top + y * self.y_scale()
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Tick label in the largest unit that divides the tick step.
fn format_tick(value: u64, step: u64) -> String {
    if step % 1_000_000 == 0 {
        format!("{} Mb", value / 1_000_000)
    } else if step % 1_000 == 0 {
        format!("{} kb", value / 1_000)
    } else {
        value.to_string()
    }
}

fn draw_y_axis(surface: &mut dyn Surface, frame: &Frame) {
    let axes = frame.axes;
    let limit = axes.y_max.floor() as u64;
    let minor = axes.minor_tick.max(1);

    for value in (0..=limit).step_by(minor as usize) {
        let y = frame.y_px(value as f64);
        if value % axes.major_tick.max(1) == 0 {
            surface.fill_rect(frame.left - 20.0, y - 1.5, 20.0, 3.0, BLACK);
            surface.text(
                frame.left - 28.0,
                y - TEXT_SIZE / 2.0,
                &format_tick(value, axes.major_tick),
                TEXT_SIZE,
                Anchor::End,
                false,
            );
        } else {
            surface.fill_rect(frame.left - 10.0, y - 1.0, 10.0, 2.0, BLACK);
        }
    }

    surface.text(
        40.0,
        frame.top + frame.height / 2.0,
        &axes.y_label,
        AXIS_LABEL_SIZE,
        Anchor::Middle,
        true,
    );
}

fn draw_spines(surface: &mut dyn Surface, frame: &Frame) {
    let w = 3.0;
    surface.fill_rect(frame.left - w, frame.top - w, frame.width + 2.0 * w, w, BLACK);
    surface.fill_rect(frame.left - w, frame.bottom(), frame.width + 2.0 * w, w, BLACK);
    surface.fill_rect(frame.left - w, frame.top, w, frame.height, BLACK);
    surface.fill_rect(frame.right(), frame.top, w, frame.height, BLACK);
}

/// Legend box just right of the plot, its bottom edge at the plot's mid-height.
fn draw_legend(surface: &mut dyn Surface, frame: &Frame, entries: &[(Rgb, &str)]) {
    if entries.is_empty() {
        return;
    }

    let padding = 30.0;
    let row_height = 70.0;
    let swatch_width = 80.0;
    let swatch_height = 40.0;
    let longest = entries.iter().map(|(_, label)| label.chars().count()).max().unwrap_or(0);

    let width = padding * 3.0 + swatch_width + longest as f64 * TEXT_SIZE;
    let height = padding * 2.0 + entries.len() as f64 * row_height;
    let left = frame.right() + 40.0;
    let top = frame.top + frame.height / 2.0 - height;

    let border = 2.0;
    surface.fill_rect(left, top, width, border, BLACK);
    surface.fill_rect(left, top + height - border, width, border, BLACK);
    surface.fill_rect(left, top, border, height, BLACK);
    surface.fill_rect(left + width - border, top, border, height, BLACK);

    for (i, (color, label)) in entries.iter().enumerate() {
        let row_top = top + padding + i as f64 * row_height;
        let swatch_top = row_top + (row_height - swatch_height) / 2.0;
        surface.fill_rect(left + padding, swatch_top, swatch_width, swatch_height, *color);
        surface.text(
            left + padding * 2.0 + swatch_width,
            row_top + (row_height - TEXT_SIZE) / 2.0,
            label,
            TEXT_SIZE,
            Anchor::Start,
            false,
        );
    }
}

/// Draw the whole figure onto a surface of `canvas` x `canvas` pixels.
fn draw(figure: &Figure, surface: &mut dyn Surface, canvas: u32) {
    let frame = Frame::new(&figure.axes, canvas);
    let mut legend: Vec<(Rgb, &str)> = Vec::new();
    let mut rect_count = 0usize;

    surface.text(
        frame.left + frame.width / 2.0,
        (MARGIN_TOP - TITLE_SIZE) / 2.0,
        &figure.axes.title,
        TITLE_SIZE,
        Anchor::Middle,
        false,
    );
    draw_y_axis(surface, &frame);

    for primitive in &figure.primitives {
        match primitive {
            DrawPrimitive::FilledRect { x, y, width, height, color } => {
                surface.fill_rect(
                    frame.x_px(*x),
                    frame.y_px(*y),
                    width * frame.x_scale(),
                    height * frame.y_scale(),
                    *color,
                );
                rect_count += 1;
            }
            DrawPrimitive::Label { x, y, text } => {
                surface.text(frame.x_px(*x), frame.y_px(*y), text, TEXT_SIZE, Anchor::Middle, false);
            }
            DrawPrimitive::LegendEntry { color, label } => legend.push((*color, label.as_str())),
        }
    }

    draw_spines(surface, &frame);
    draw_legend(surface, &frame, &legend);

    debug!("Drew {} rectangles, {} legend entries", rect_count, legend.len());
}

/// In-memory RGB canvas using the bitmap font for text.
struct RasterSurface {
    image: RgbImage,
}

impl RasterSurface {
    fn new(size: u32) -> Self {
        RasterSurface { image: RgbImage::from_pixel(size, size, image::Rgb([255, 255, 255])) }
    }

    fn fill_block(&mut self, x: i64, y: i64, width: i64, height: i64, color: Rgb) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width).min(self.image.width() as i64);
        let y1 = (y + height).min(self.image.height() as i64);
        let (r, g, b) = color;
        for py in y0..y1 {
            for px in x0..x1 {
                self.image.put_pixel(px as u32, py as u32, image::Rgb([r, g, b]));
            }
        }
    }

    /// Horizontal glyphs hang from `(x, y)`; vertical glyphs are rotated a
    /// quarter turn counter-clockwise and sit on `(x, y)` as their bottom-left corner.
    fn write_char(&mut self, x: i64, y: i64, char_data: &[u8; 8], char_size: u32, color: Rgb, vertical: bool) {
        let ratio = (char_size / 8) as i64;
        for (j, &row) in char_data.iter().enumerate() {
            let j = j as i64;
            for z in (0..8i64).rev() {
                if (row >> z) & 1 == 1 {
                    let col = 7 - z;
                    let (px, py) = if vertical {
                        (x + j * ratio, y - (col + 1) * ratio)
                    } else {
                        (x + col * ratio, y + j * ratio)
                    };
                    self.fill_block(px, py, ratio, ratio, color);
                }
            }
        }
    }

    fn encode(self, format: ImageFormat) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image.write_to(&mut Cursor::new(&mut bytes), format)?;
        Ok(bytes)
    }
}

impl Surface for RasterSurface {
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb) {
        let x0 = x.round() as i64;
        let y0 = y.round() as i64;
        // Features narrower than a pixel still get one.
        let x1 = ((x + width).round() as i64).max(x0 + 1);
        let y1 = ((y + height).round() as i64).max(y0 + 1);
        self.fill_block(x0, y0, x1 - x0, y1 - y0, color);
    }

    fn text(&mut self, x: f64, y: f64, text: &str, size: f64, anchor: Anchor, vertical: bool) {
        let char_size = ((size / 8.0).round().max(1.0) as u32) * 8;
        let advance = char_size as f64;
        let extent = text.chars().count() as f64 * advance;
        let start = -anchor.offset(extent);

        for (i, c) in text.chars().enumerate() {
            let c_byte = c as usize;
            let char_data = if c_byte < 128 { &FONT_5X8[c_byte] } else { &FONT_5X8[b'?' as usize] };
            let along = start + i as f64 * advance;
            let (gx, gy) = if vertical { (x, y - along) } else { (x + along, y) };
            self.write_char(gx.round() as i64, gy.round() as i64, char_data, char_size, BLACK, vertical);
        }
    }
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

struct SvgSurface {
    svg: String,
}

impl SvgSurface {
    fn new(size: u32) -> Self {
        let svg = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<style>
  text {{ font-family: 'DejaVu Sans', Arial, sans-serif; dominant-baseline: hanging; }}
</style>
<rect width="100%" height="100%" fill="white"/>
"#,
            size, size, size, size
        );
        SvgSurface { svg }
    }

    fn finish(mut self) -> String {
        self.svg.push_str("</svg>\n");
        self.svg
    }
}

impl Surface for SvgSurface {
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb) {
        self.svg.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="rgb({},{},{})"/>"#,
            x, y, width, height, color.0, color.1, color.2
        ));
        self.svg.push('\n');
    }

    fn text(&mut self, x: f64, y: f64, text: &str, size: f64, anchor: Anchor, vertical: bool) {
        let transform = if vertical {
            format!(r#" transform="rotate(-90 {:.2} {:.2})""#, x, y)
        } else {
            String::new()
        };
        self.svg.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-size="{}" text-anchor="{}"{}>{}</text>"#,
            x,
            y,
            size,
            anchor.svg(),
            transform,
            escape_xml(text)
        ));
        self.svg.push('\n');
    }
}

/// Render `figure` and write it to `path`, the format chosen by the extension.
///
/// The image is composed in memory first; nothing is written when the format
/// is unsupported or encoding fails.
pub fn render(figure: &Figure, path: &Path) -> Result<()> {
    let format = OutputFormat::from_path(path)?;

    let bytes = match format {
        OutputFormat::Svg => {
            info!("Rendering SVG...");
            let mut surface = SvgSurface::new(CANVAS_SIZE);
            draw(figure, &mut surface, CANVAS_SIZE);
            surface.finish().into_bytes()
        }
        OutputFormat::Raster(image_format) => {
            info!("Rendering image...");
            let mut surface = RasterSurface::new(CANVAS_SIZE);
            draw(figure, &mut surface, CANVAS_SIZE);
            surface.encode(image_format)?
        }
    };

    info!("Saving to {:?}...", path);
    std::fs::write(path, bytes).map_err(|e| IdeogramError::io(path, e))?;
    Ok(())
}
