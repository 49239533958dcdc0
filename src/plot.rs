//! Figure model and the drawing pass.
//!
//! A [`Figure`] is a list of panels, each with a title, shared data bounds
//! and the series drawn inside it. Drawing goes through the [`Canvas`] trait
//! so the layout can be exercised without opening a window.
//!
//! Screen coordinates have their origin at the top-left corner with y
//! growing downwards; data coordinates have y growing upwards.

use crate::bounds::{BoundingBox, EmptyInputError};
use crate::common::{Point, Segment, PointSequence};

/// Panels per row before the grid wraps.
pub const MAX_COLUMNS: usize = 4;
/// Approximate gridline count per axis.
const TICKS_PER_AXIS: usize = 5;

const MARGIN_LEFT: f64 = 80.;
const MARGIN_RIGHT: f64 = 12.;
const MARGIN_TOP: f64 = 28.;
const MARGIN_BOTTOM: f64 = 44.;

const TITLE_SIZE: u32 = 14;
const LABEL_SIZE: u32 = 11;
const TICK_SIZE: u32 = 10;

const SERIES_WIDTH: f64 = 1.5;
const MARKER_RADIUS: f64 = 3.;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const BLUE: Color = Color([0.0, 0.0, 1.0, 1.0]);
    pub const GREEN: Color = Color([0.0, 0.5, 0.0, 1.0]);
    pub const RED: Color = Color([1.0, 0.0, 0.0, 1.0]);
    pub const CYAN: Color = Color([0.0, 0.75, 0.75, 1.0]);
    pub const MAGENTA: Color = Color([0.75, 0.0, 0.75, 1.0]);
    pub const YELLOW: Color = Color([0.75, 0.75, 0.0, 1.0]);
    pub const BLACK: Color = Color([0.0, 0.0, 0.0, 1.0]);
    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);
    pub const GRAY: Color = Color([0.5, 0.5, 0.5, 1.0]);
    pub const GRID: Color = Color([0.85, 0.85, 0.85, 1.0]);

    /// Looks up a color by name, single letter abbreviation or `#rrggbb`.
    pub fn named(name: &str) -> Option<Color> {
        let color = match name.trim().to_lowercase().as_str() {
            "b" | "blue" => Color::BLUE,
            "g" | "green" => Color::GREEN,
            "r" | "red" => Color::RED,
            "c" | "cyan" => Color::CYAN,
            "m" | "magenta" => Color::MAGENTA,
            "y" | "yellow" => Color::YELLOW,
            "k" | "black" => Color::BLACK,
            "w" | "white" => Color::WHITE,
            "gray" | "grey" => Color::GRAY,
            hex => return Color::from_hex(hex),
        };
        Some(color)
    }

    fn from_hex(text: &str) -> Option<Color> {
        let digits = text.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i .. i + 2], 16).ok().map(|v| v as f32 / 255.);
        Some(Color([channel(0)?, channel(2)?, channel(4)?, 1.0]))
    }
}

/// Series colors used when no explicit color is configured. White is left
/// out since it is the background.
pub const PALETTE: [Color; 7] = [
    Color::BLUE,
    Color::GREEN,
    Color::RED,
    Color::CYAN,
    Color::MAGENTA,
    Color::YELLOW,
    Color::BLACK,
];

fn palette(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct PlotConfig {
    /// Repeat the first point of every sequence at its end.
    pub close_loop: bool,
    /// Overrides every series color.
    pub color: Option<Color>,
    /// One panel per sequence followed by a combined panel.
    pub tile_subplots: bool,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Series {
    pub points: Vec<Point>,
    pub color: Color,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Panel {
    pub title: String,
    pub bounds: BoundingBox,
    pub series: Vec<Series>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Figure {
    pub panels: Vec<Panel>,
}

/// Drawing primitives a backend has to provide. Coordinates are in screen
/// pixels.
pub trait Canvas {
    type Error;

    fn line(&mut self, color: Color, width: f64, from: [f64; 2], to: [f64; 2]);

    fn marker(&mut self, color: Color, center: [f64; 2], radius: f64);

    /// Draws `text` with its baseline starting at `at`.
    fn text(&mut self, color: Color, size: u32, at: [f64; 2], text: &str) -> Result<(), Self::Error>;

    /// Rendered width of `text`; backends without font metrics keep the
    /// average glyph estimate.
    fn text_width(&mut self, size: u32, text: &str) -> f64 {
        text.chars().count() as f64 * size as f64 * 0.6
    }
}

impl Figure {
    /// A single panel with one two-point series per segment.
    pub fn of_segments(segments: &[Segment], config: &PlotConfig) -> Result<Figure, EmptyInputError> {
        let bounds = BoundingBox::around(segments.iter().flat_map(|s| vec![&s.src, &s.dst]))?;
        let series = segments.iter()
            .enumerate()
            .map(|(i, s)| Series {
                points: s.points().to_vec(),
                color: config.color.unwrap_or_else(|| palette(i)),
            })
            .collect();
        Ok(Figure {
            panels: vec![Panel { title: "Line Plot".to_string(), bounds, series, }],
        })
    }

    pub fn of_sequences(sequences: &[PointSequence], config: &PlotConfig) -> Result<Figure, EmptyInputError> {
        let sequences: Vec<PointSequence> = sequences.iter()
            .map(|seq| if config.close_loop { seq.closed() } else { seq.clone() })
            .collect();
        let bounds = BoundingBox::around(sequences.iter().flat_map(|seq| seq.points.iter()))?;

        let mut panels = Vec::with_capacity(sequences.len() + 1);
        let combined = if config.tile_subplots {
            for (i, seq) in sequences.iter().enumerate() {
                panels.push(Panel {
                    title: format!("Line {}", i + 1),
                    bounds,
                    series: vec![Series { points: seq.points.clone(), color: config.color.unwrap_or(Color::RED), }],
                });
            }
            sequences.into_iter()
                .map(|seq| Series { points: seq.points, color: config.color.unwrap_or(Color::BLUE), })
                .collect()
        } else {
            sequences.into_iter()
                .enumerate()
                .map(|(i, seq)| Series { points: seq.points, color: config.color.unwrap_or_else(|| palette(i)), })
                .collect()
        };
        panels.push(Panel { title: "Combined Plot".to_string(), bounds, series: combined, });
        Ok(Figure { panels, })
    }

    pub fn draw<C>(&self, canvas: &mut C, size: [f64; 2]) -> Result<(), C::Error> where C: Canvas {
        for (panel, cell) in self.panels.iter().zip(grid_cells(self.panels.len(), size)) {
            panel.draw(canvas, cell)?;
        }
        Ok(())
    }
}

impl Panel {
    fn draw<C>(&self, canvas: &mut C, cell: Rect) -> Result<(), C::Error> where C: Canvas {
        let frame = Rect {
            x: cell.x + MARGIN_LEFT,
            y: cell.y + MARGIN_TOP,
            w: cell.w - MARGIN_LEFT - MARGIN_RIGHT,
            h: cell.h - MARGIN_TOP - MARGIN_BOTTOM,
        };
        let view = match Viewport::fit(self.bounds, frame) {
            Some(view) =>
                view,
            None => {
                debug!("panel `{}` does not fit into {:?}, skipped", self.title, cell);
                return Ok(());
            },
        };
        let area = view.area;
        let (left, right, top, bottom) = (area.x, area.x + area.w, area.y, area.y + area.h);

        let x_ticks = ticks(self.bounds.x_min, self.bounds.x_max, TICKS_PER_AXIS);
        let x_step = tick_step(&x_ticks);
        for &x in &x_ticks {
            let [sx, _] = view.to_screen(&Point { x, y: self.bounds.y_min, });
            canvas.line(Color::GRID, 1., [sx, top], [sx, bottom]);
            let label = tick_label(x, x_step);
            let width = canvas.text_width(TICK_SIZE, &label);
            canvas.text(Color::BLACK, TICK_SIZE, [sx - width / 2., bottom + 14.], &label)?;
        }
        let y_ticks = ticks(self.bounds.y_min, self.bounds.y_max, TICKS_PER_AXIS);
        let y_step = tick_step(&y_ticks);
        for &y in &y_ticks {
            let [_, sy] = view.to_screen(&Point { x: self.bounds.x_min, y, });
            canvas.line(Color::GRID, 1., [left, sy], [right, sy]);
            let label = tick_label(y, y_step);
            let width = canvas.text_width(TICK_SIZE, &label);
            canvas.text(Color::BLACK, TICK_SIZE, [left - 4. - width, sy + 4.], &label)?;
        }

        for &(from, to) in &[
            ([left, top], [right, top]),
            ([right, top], [right, bottom]),
            ([right, bottom], [left, bottom]),
            ([left, bottom], [left, top]),
        ] {
            canvas.line(Color::BLACK, 1., from, to);
        }

        for series in &self.series {
            let screen: Vec<_> = series.points.iter().map(|p| view.to_screen(p)).collect();
            for pair in screen.windows(2) {
                canvas.line(series.color, SERIES_WIDTH, pair[0], pair[1]);
            }
            for &center in &screen {
                canvas.marker(series.color, center, MARKER_RADIUS);
            }
        }

        let center = left + area.w / 2.;
        let title_width = canvas.text_width(TITLE_SIZE, &self.title);
        canvas.text(Color::BLACK, TITLE_SIZE, [center - title_width / 2., top - 8.], &self.title)?;
        let label_width = canvas.text_width(LABEL_SIZE, "X-axis");
        canvas.text(Color::BLACK, LABEL_SIZE, [center - label_width / 2., bottom + 32.], "X-axis")?;
        canvas.text(Color::BLACK, LABEL_SIZE, [cell.x + 4., top + area.h / 2.], "Y-axis")?;
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Splits a `size` window into cells for `count` panels, row by row.
pub fn grid_cells(count: usize, size: [f64; 2]) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let columns = count.min(MAX_COLUMNS);
    let rows = (count + columns - 1) / columns;
    let (w, h) = (size[0] / columns as f64, size[1] / rows as f64);
    (0 .. count)
        .map(|i| Rect {
            x: (i % columns) as f64 * w,
            y: (i / columns) as f64 * h,
            w,
            h,
        })
        .collect()
}

/// Maps data bounds onto a screen area with one scale for both axes.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Viewport {
    pub bounds: BoundingBox,
    pub area: Rect,
    pub scale: f64,
}

impl Viewport {
    /// Largest equal-aspect area for `bounds` centered in `frame`, or `None`
    /// when nothing can be drawn.
    pub fn fit(bounds: BoundingBox, frame: Rect) -> Option<Viewport> {
        let scale = (frame.w / bounds.width()).min(frame.h / bounds.height());
        if !scale.is_finite() || scale <= 0. {
            return None;
        }
        let (w, h) = (bounds.width() * scale, bounds.height() * scale);
        let area = Rect {
            x: frame.x + (frame.w - w) / 2.,
            y: frame.y + (frame.h - h) / 2.,
            w,
            h,
        };
        Some(Viewport { bounds, area, scale, })
    }

    pub fn to_screen(&self, point: &Point) -> [f64; 2] {
        [
            self.area.x + (point.x - self.bounds.x_min) * self.scale,
            self.area.y + (self.bounds.y_max - point.y) * self.scale,
        ]
    }
}

/// Round tick values inside `[min, max]`, stepping by 1, 2 or 5 times a
/// power of ten.
pub fn ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    let span = max - min;
    if !(span > 0.) || !span.is_finite() || target == 0 {
        return Vec::new();
    }
    let step = nice_step(span / target as f64);
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first ..= last).map(|k| k as f64 * step).collect()
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1. {
        1.
    } else if fraction <= 2. {
        2.
    } else if fraction <= 5. {
        5.
    } else {
        10.
    };
    nice * magnitude
}

fn tick_step(ticks: &[f64]) -> f64 {
    match ticks {
        [a, b, ..] => b - a,
        _ => 1.,
    }
}

fn tick_label(value: f64, step: f64) -> String {
    let decimals = (-step.log10().floor()).max(0.) as usize;
    format!("{:.*}", decimals, value)
}
