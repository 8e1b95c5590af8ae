use super::models::point::{Point, point_from};
use super::surface::PotentialSurface;
use super::surface::leps::Leps;
use super::surface::muller_brown::MullerBrown;
use phf::{Map, phf_map};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("Unknown scenario '{key}' (available: {available})")]
    Unknown { key: String, available: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    Leps,
    BrownMuller,
}

#[rustfmt::skip]
static SCENARIO_KEYS: Map<&'static str, ScenarioKind> = phf_map! {
    "leps"         => ScenarioKind::Leps,
    "brown-muller" => ScenarioKind::BrownMuller,
    "muller-brown" => ScenarioKind::BrownMuller,
};

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 2] = [ScenarioKind::Leps, ScenarioKind::BrownMuller];

    /// Canonical registry key.
    pub fn key(&self) -> &'static str {
        match self {
            ScenarioKind::Leps => "leps",
            ScenarioKind::BrownMuller => "brown-muller",
        }
    }

    /// Case-insensitive lookup; accepts aliases such as `muller-brown`.
    pub fn lookup(key: &str) -> Result<Self, ScenarioError> {
        let normalized = key.trim().to_ascii_lowercase().replace('_', "-");
        SCENARIO_KEYS
            .get(normalized.as_str())
            .copied()
            .ok_or_else(|| ScenarioError::Unknown {
                key: key.to_string(),
                available: available().join(", "),
            })
    }

    pub fn scenario(&self) -> Scenario {
        match self {
            ScenarioKind::Leps => leps(),
            ScenarioKind::BrownMuller => brown_muller(),
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ScenarioKind {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s)
    }
}

/// Canonical keys of every registered scenario.
pub fn available() -> Vec<&'static str> {
    ScenarioKind::ALL.iter().map(ScenarioKind::key).collect()
}

pub fn lookup(key: &str) -> Result<Scenario, ScenarioError> {
    ScenarioKind::lookup(key).map(|kind| kind.scenario())
}

/// The potential a scenario runs on.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioSurface {
    Leps(Leps),
    MullerBrown(MullerBrown),
}

impl ScenarioSurface {
    fn inner(&self) -> &dyn PotentialSurface {
        match self {
            ScenarioSurface::Leps(surface) => surface,
            ScenarioSurface::MullerBrown(surface) => surface,
        }
    }
}

impl PotentialSurface for ScenarioSurface {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn dimension(&self) -> Option<usize> {
        self.inner().dimension()
    }

    fn energy(&self, point: &Point) -> f64 {
        self.inner().energy(point)
    }

    fn batched_energy(&self, points: &[Point]) -> Vec<f64> {
        self.inner().batched_energy(points)
    }

    fn gradient(&self, point: &Point) -> Point {
        self.inner().gradient(point)
    }
}

/// Sampling grid for contour rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub points: usize,
}

impl GridSpec {
    pub fn xs(&self) -> Vec<f64> {
        linspace(self.x_range, self.points)
    }

    pub fn ys(&self) -> Vec<f64> {
        linspace(self.y_range, self.points)
    }
}

fn linspace((start, end): (f64, f64), points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        n => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

fn ticks(start: f64, end: f64, step: f64) -> Vec<f64> {
    let count = ((end - start) / step).round() as usize;
    (0..=count).map(|i| start + step * i as f64).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotFrame {
    /// `[x_min, x_max, y_min, y_max]`
    pub bounds: [f64; 4],
    pub x_ticks: Vec<f64>,
    pub y_ticks: Vec<f64>,
    pub grid: GridSpec,
    pub levels: usize,
}

/// Run parameters a scenario is known to relax well with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendedRun {
    pub images: usize,
    pub spring_constant: f64,
    pub mass: f64,
    pub time_step: f64,
    pub iterations: usize,
}

/// A potential together with its reaction endpoints, known saddle, plot frame, and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub kind: ScenarioKind,
    pub name: &'static str,
    pub surface: ScenarioSurface,
    pub initial: Point,
    pub terminal: Point,
    pub saddle: Point,
    pub frame: PlotFrame,
    pub defaults: RecommendedRun,
}

impl Scenario {
    pub fn key(&self) -> &'static str {
        self.kind.key()
    }
}

fn leps() -> Scenario {
    Scenario {
        kind: ScenarioKind::Leps,
        name: "LEPS",
        surface: ScenarioSurface::Leps(Leps::new()),
        initial: point_from(&[0.75, 4.0]),
        terminal: point_from(&[4.0, 0.75]),
        saddle: point_from(&[1.15, 0.85]),
        frame: PlotFrame {
            bounds: [0.3, 4.0, 0.3, 4.0],
            x_ticks: ticks(0.5, 4.0, 0.5),
            y_ticks: ticks(0.5, 4.0, 0.5),
            grid: GridSpec {
                x_range: (0.3, 4.0),
                y_range: (0.3, 4.0),
                points: 60,
            },
            levels: 105,
        },
        defaults: RecommendedRun {
            images: 20,
            spring_constant: 1.0,
            mass: 1.0,
            time_step: 0.03,
            iterations: 150,
        },
    }
}

fn brown_muller() -> Scenario {
    Scenario {
        kind: ScenarioKind::BrownMuller,
        name: "Brown-Müller",
        surface: ScenarioSurface::MullerBrown(MullerBrown::new()),
        initial: point_from(&[-0.53, 1.47]),
        terminal: point_from(&[0.65, 0.04]),
        saddle: point_from(&[-0.825, 0.6]),
        frame: PlotFrame {
            bounds: [-1.5, 1.0, -0.5, 2.0],
            x_ticks: ticks(-1.5, 1.0, 0.5),
            y_ticks: ticks(-0.5, 2.0, 0.5),
            grid: GridSpec {
                x_range: (-1.5, 1.1),
                y_range: (-0.5, 2.0),
                points: 60,
            },
            levels: 180,
        },
        defaults: RecommendedRun {
            images: 15,
            spring_constant: 1.0,
            mass: 1.0,
            time_step: 0.003,
            iterations: 250,
        },
    }
}
