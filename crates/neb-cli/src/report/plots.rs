use nebpp::core::models::point::{Point, point_from};
use nebpp::core::scenario::{PlotFrame, Scenario};
use nebpp::core::surface::PotentialSurface;
use nebpp::engine::hooks::ReportError;
use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::fmt::Display;
use std::ops::Range;
use std::path::Path;

pub const MAP_SIZE: (u32, u32) = (800, 800);
pub const CURVE_SIZE: (u32, u32) = (900, 600);

const BAND_COLOR: RGBColor = RGBColor(220, 40, 40);

/// Stops of the contour palette, from low to high energy.
const PALETTE: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

fn render_err<E: Display>(e: E) -> ReportError {
    ReportError::Render(e.to_string())
}

/// Color of contour level `level` out of `count`, interpolated along the palette.
pub fn level_color(level: usize, count: usize) -> RGBColor {
    let t = if count <= 1 {
        0.0
    } else {
        (level.min(count - 1) as f64) / (count - 1) as f64
    };
    let scaled = t * (PALETTE.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(PALETTE.len() - 2);
    let frac = scaled - lower as f64;
    let (a, b) = (PALETTE[lower], PALETTE[lower + 1]);
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Energies sampled on a scenario's plot grid, quantized into filled contour levels.
#[derive(Debug, Clone)]
pub struct EnergyMap {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Row-major over `ys`, then `xs`.
    energies: Vec<f64>,
    min: f64,
    max: f64,
    levels: usize,
}

impl EnergyMap {
    pub fn sample<S: PotentialSurface + ?Sized>(surface: &S, frame: &PlotFrame) -> Self {
        let xs = frame.grid.xs();
        let ys = frame.grid.ys();
        let points: Vec<Point> = ys
            .iter()
            .flat_map(|&y| xs.iter().map(move |&x| point_from(&[x, y])))
            .collect();
        let energies = surface.batched_energy(&points);

        let (min, max) = energies
            .iter()
            .filter(|e| e.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &e| {
                (lo.min(e), hi.max(e))
            });

        Self {
            xs,
            ys,
            energies,
            min,
            max,
            levels: frame.levels.max(1),
        }
    }

    pub fn range(&self) -> Option<(f64, f64)> {
        (self.min <= self.max).then_some((self.min, self.max))
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Contour level of an energy; non-finite values land in the top level.
    pub fn level_of(&self, energy: f64) -> usize {
        let Some((min, max)) = self.range() else {
            return 0;
        };
        if !energy.is_finite() || max - min <= 0.0 {
            return if energy.is_finite() { 0 } else { self.levels - 1 };
        }
        let t = (energy - min) / (max - min);
        ((t * self.levels as f64) as usize).min(self.levels - 1)
    }

    fn spacing(values: &[f64], index: usize) -> (f64, f64) {
        let left = if index > 0 {
            (values[index] - values[index - 1]) / 2.0
        } else if values.len() > 1 {
            (values[1] - values[0]) / 2.0
        } else {
            0.0
        };
        let right = if index + 1 < values.len() {
            (values[index + 1] - values[index]) / 2.0
        } else {
            left
        };
        (values[index] - left, values[index] + right)
    }

    /// Filled cells clipped to `bounds`: `((x0, y0), (x1, y1), level)`.
    pub fn cells(&self, bounds: [f64; 4]) -> Vec<((f64, f64), (f64, f64), usize)> {
        let [x_min, x_max, y_min, y_max] = bounds;
        let mut cells = Vec::with_capacity(self.energies.len());
        for (j, &y) in self.ys.iter().enumerate() {
            if y < y_min || y > y_max {
                continue;
            }
            let (y0, y1) = Self::spacing(&self.ys, j);
            for (i, &x) in self.xs.iter().enumerate() {
                if x < x_min || x > x_max {
                    continue;
                }
                let (x0, x1) = Self::spacing(&self.xs, i);
                let level = self.level_of(self.energies[j * self.xs.len() + i]);
                cells.push((
                    (x0.max(x_min), y0.max(y_min)),
                    (x1.min(x_max), y1.min(y_max)),
                    level,
                ));
            }
        }
        cells
    }
}

/// Everything needed to draw a band over a scenario's energy landscape.
#[derive(Debug, Clone)]
pub struct MapContext {
    pub title: String,
    pub frame: PlotFrame,
    pub map: EnergyMap,
    pub saddle: Option<Point>,
}

impl MapContext {
    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self {
            title: scenario.name.to_string(),
            map: EnergyMap::sample(&scenario.surface, &scenario.frame),
            frame: scenario.frame.clone(),
            saddle: Some(scenario.saddle.clone()),
        }
    }
}

fn planar(points: &[Point]) -> Result<Vec<(f64, f64)>, ReportError> {
    points
        .iter()
        .map(|p| {
            if p.len() == 2 {
                Ok((p[0], p[1]))
            } else {
                Err(ReportError::Render(format!(
                    "path maps need 2-D images, found dimension {}",
                    p.len()
                )))
            }
        })
        .collect()
}

/// Linear axis labelled exactly at a fixed list of tick values.
///
/// Ticks outside the axis range are dropped. With no ticks left it falls back to the
/// linear axis' own key points.
struct TickedAxis {
    linear: RangedCoordf64,
    ticks: Vec<f64>,
}

impl TickedAxis {
    fn new(range: Range<f64>, ticks: &[f64]) -> Self {
        let slack = 1e-9 * (range.end - range.start).abs();
        let ticks = ticks
            .iter()
            .copied()
            .filter(|t| *t >= range.start - slack && *t <= range.end + slack)
            .collect();
        Self {
            linear: range.into(),
            ticks,
        }
    }
}

impl Ranged for TickedAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.linear.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        if self.ticks.is_empty() {
            self.linear.key_points(hint)
        } else if hint.weight().allow_light_points() {
            Vec::new()
        } else {
            self.ticks.clone()
        }
    }

    fn range(&self) -> Range<f64> {
        self.linear.range()
    }
}

/// Draws the band (images joined in order) over the filled energy contours.
pub fn draw_path_map(
    path: &Path,
    context: &MapContext,
    band: &[Point],
    caption: &str,
) -> Result<(), ReportError> {
    let coords = planar(band)?;
    let [x_min, x_max, y_min, y_max] = context.frame.bounds;

    let root = SVGBackend::new(path, MAP_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(
            TickedAxis::new(x_min..x_max, &context.frame.x_ticks),
            TickedAxis::new(y_min..y_max, &context.frame.y_ticks),
        )
        .map_err(render_err)?;

    let levels = context.map.levels();
    chart
        .draw_series(
            context
                .map
                .cells(context.frame.bounds)
                .into_iter()
                .map(|(a, b, level)| Rectangle::new([a, b], level_color(level, levels).filled())),
        )
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_label_formatter(&|x| format!("{:.1}", x))
        .y_label_formatter(&|y| format!("{:.1}", y))
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(coords.iter().copied(), BAND_COLOR.stroke_width(2)))
        .map_err(render_err)?
        .label("band")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BAND_COLOR));
    chart
        .draw_series(coords.iter().map(|&c| Circle::new(c, 4, BAND_COLOR.filled())))
        .map_err(render_err)?;

    if let Some(saddle) = context.saddle.as_ref().filter(|s| s.len() == 2) {
        chart
            .draw_series(std::iter::once(Cross::new(
                (saddle[0], saddle[1]),
                7,
                BLACK.stroke_width(2),
            )))
            .map_err(render_err)?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return (0.0, 1.0);
    }
    let pad = if hi - lo > 0.0 { 0.05 * (hi - lo) } else { 0.5 };
    (lo - pad, hi + pad)
}

/// Convergence curve: `log10` of the largest force norm per iteration.
pub fn draw_loss_curve(path: &Path, title: &str, max_forces: &[f64]) -> Result<(), ReportError> {
    let points: Vec<(f64, f64)> = max_forces
        .iter()
        .enumerate()
        .filter(|(_, f)| **f > 0.0 && f.is_finite())
        .map(|(i, f)| (i as f64, f.log10()))
        .collect();
    let x_max = (max_forces.len().max(2) - 1) as f64;
    let (y_min, y_max) = padded_range(points.iter().map(|p| p.1));

    let root = SVGBackend::new(path, CURVE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{} - convergence", title), ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, y_min..y_max)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("iteration")
        .y_desc("log10 max |F|")
        .draw()
        .map_err(render_err)?;
    chart
        .draw_series(LineSeries::new(points, BLUE.stroke_width(2)))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Energy of each image against its arc-length reaction coordinate.
pub fn draw_energy_profile(
    path: &Path,
    title: &str,
    coordinates: &[f64],
    energies: &[f64],
) -> Result<(), ReportError> {
    if coordinates.len() != energies.len() {
        return Err(ReportError::Render(format!(
            "profile needs one energy per image ({} coordinates, {} energies)",
            coordinates.len(),
            energies.len()
        )));
    }
    let points: Vec<(f64, f64)> = coordinates
        .iter()
        .copied()
        .zip(energies.iter().copied())
        .collect();
    let (x_min, x_max) = padded_range(coordinates.iter().copied());
    let (y_min, y_max) = padded_range(energies.iter().copied());

    let root = SVGBackend::new(path, CURVE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{} - energy profile", title), ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("reaction coordinate")
        .y_desc("energy")
        .draw()
        .map_err(render_err)?;
    chart
        .draw_series(LineSeries::new(points.iter().copied(), BAND_COLOR.stroke_width(2)))
        .map_err(render_err)?;
    chart
        .draw_series(points.iter().map(|&p| Circle::new(p, 4, BAND_COLOR.filled())))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}
