use super::integrator::IntegratorKind;
use crate::core::forces::tangent::TangentScheme;
use crate::core::scenario::RecommendedRun;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_FORCE_THRESHOLD: f64 = 1e-3;
pub const DEFAULT_ENERGY_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{parameter}': {value} ({reason})")]
    InvalidValue {
        parameter: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// When and where the climbing-image modification is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "mode")]
pub enum ClimbingImage {
    #[default]
    Disabled,
    /// The highest interior image climbs once this many iterations have elapsed.
    Automatic { after_iterations: usize },
    /// A fixed interior image (full band numbering) climbs from the first iteration.
    Fixed { index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Number of interior images `N`.
    pub image_count: usize,
    pub spring_constant: f64,
    pub mass: f64,
    pub time_step: f64,
    pub max_iterations: usize,
    /// The run converges once the largest effective-force norm drops below this value.
    pub force_threshold: f64,
    pub tangent: TangentScheme,
    pub energy_tolerance: f64,
    pub climbing: ClimbingImage,
    pub integrator: IntegratorKind,
}

fn positive(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            parameter,
            value: value.to_string(),
            reason: "must be finite and positive",
        })
    }
}

fn non_negative(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            parameter,
            value: value.to_string(),
            reason: "must be finite and non-negative",
        })
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_count == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "image_count",
                value: "0".to_string(),
                reason: "a band needs at least one interior image",
            });
        }
        positive("mass", self.mass)?;
        positive("time_step", self.time_step)?;
        non_negative("spring_constant", self.spring_constant)?;
        non_negative("force_threshold", self.force_threshold)?;
        non_negative("energy_tolerance", self.energy_tolerance)?;

        if let ClimbingImage::Fixed { index } = self.climbing {
            if index == 0 || index > self.image_count {
                return Err(ConfigError::InvalidValue {
                    parameter: "climbing.index",
                    value: index.to_string(),
                    reason: "must name an interior image",
                });
            }
        }
        Ok(())
    }

    /// Total number of images including both endpoints.
    #[inline]
    pub fn band_len(&self) -> usize {
        self.image_count + 2
    }
}

#[derive(Default, Clone)]
pub struct RunConfigBuilder {
    image_count: Option<usize>,
    spring_constant: Option<f64>,
    mass: Option<f64>,
    time_step: Option<f64>,
    max_iterations: Option<usize>,
    force_threshold: Option<f64>,
    tangent: Option<TangentScheme>,
    energy_tolerance: Option<f64>,
    climbing: Option<ClimbingImage>,
    integrator: Option<IntegratorKind>,
}

impl RunConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image_count(mut self, n: usize) -> Self {
        self.image_count = Some(n);
        self
    }
    pub fn spring_constant(mut self, k: f64) -> Self {
        self.spring_constant = Some(k);
        self
    }
    pub fn mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }
    pub fn time_step(mut self, dt: f64) -> Self {
        self.time_step = Some(dt);
        self
    }
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }
    pub fn force_threshold(mut self, threshold: f64) -> Self {
        self.force_threshold = Some(threshold);
        self
    }
    pub fn tangent(mut self, scheme: TangentScheme) -> Self {
        self.tangent = Some(scheme);
        self
    }
    pub fn energy_tolerance(mut self, tolerance: f64) -> Self {
        self.energy_tolerance = Some(tolerance);
        self
    }
    pub fn climbing(mut self, climbing: ClimbingImage) -> Self {
        self.climbing = Some(climbing);
        self
    }
    pub fn integrator(mut self, kind: IntegratorKind) -> Self {
        self.integrator = Some(kind);
        self
    }

    pub fn build(self) -> Result<RunConfig, ConfigError> {
        let config = RunConfig {
            image_count: self
                .image_count
                .ok_or(ConfigError::MissingParameter("image_count"))?,
            spring_constant: self
                .spring_constant
                .ok_or(ConfigError::MissingParameter("spring_constant"))?,
            mass: self.mass.ok_or(ConfigError::MissingParameter("mass"))?,
            time_step: self
                .time_step
                .ok_or(ConfigError::MissingParameter("time_step"))?,
            max_iterations: self
                .max_iterations
                .ok_or(ConfigError::MissingParameter("max_iterations"))?,
            force_threshold: self.force_threshold.unwrap_or(DEFAULT_FORCE_THRESHOLD),
            tangent: self.tangent.unwrap_or_default(),
            energy_tolerance: self.energy_tolerance.unwrap_or(DEFAULT_ENERGY_TOLERANCE),
            climbing: self.climbing.unwrap_or_default(),
            integrator: self.integrator.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}

impl From<&RecommendedRun> for RunConfigBuilder {
    fn from(run: &RecommendedRun) -> Self {
        RunConfigBuilder::new()
            .image_count(run.images)
            .spring_constant(run.spring_constant)
            .mass(run.mass)
            .time_step(run.time_step)
            .max_iterations(run.iterations)
    }
}
