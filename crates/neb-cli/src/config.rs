use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use nebpp::core::forces::tangent::TangentScheme;
use nebpp::core::scenario::{self, Scenario};
use nebpp::engine::config::{ClimbingImage, RunConfig, RunConfigBuilder};
use nebpp::engine::integrator::IntegratorKind;
use serde::Deserialize;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

pub const DEFAULT_SCENARIO: &str = "leps";
pub const DEFAULT_OUTPUT_DIR: &str = "neb-output";
pub const DEFAULT_PLOT_EVERY: usize = 10;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialBandConfig {
    images: Option<usize>,
    #[serde(rename = "spring-constant")]
    spring_constant: Option<f64>,
    tangent: Option<TangentScheme>,
    #[serde(rename = "energy-tolerance")]
    energy_tolerance: Option<f64>,
    #[serde(rename = "climbing-after")]
    climbing_after: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialDynamicsConfig {
    integrator: Option<IntegratorKind>,
    mass: Option<f64>,
    #[serde(rename = "time-step")]
    time_step: Option<f64>,
    #[serde(rename = "max-iterations")]
    max_iterations: Option<usize>,
    #[serde(rename = "force-threshold")]
    force_threshold: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialOutputConfig {
    directory: Option<PathBuf>,
    #[serde(rename = "plot-every")]
    plot_every: Option<usize>,
    plotting: Option<bool>,
    last: Option<bool>,
    loss: Option<bool>,
    reaction: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialRunConfig {
    scenario: Option<String>,
    band: Option<PartialBandConfig>,
    dynamics: Option<PartialDynamicsConfig>,
    output: Option<PartialOutputConfig>,
}

/// Which artifacts a run writes, and where.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub directory: PathBuf,
    pub plot_every: usize,
    pub plotting: bool,
    pub last: bool,
    pub loss: bool,
    pub reaction: bool,
}

impl OutputSettings {
    /// Whether the final path map is rendered.
    pub fn wants_path_map(&self) -> bool {
        self.plotting || self.last
    }
}

#[derive(Debug)]
pub struct RunSettings {
    pub scenario: Scenario,
    pub config: RunConfig,
    pub output: OutputSettings,
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value.trim().parse().map_err(|e| {
        CliError::Config(format!("Invalid value for {}: '{}' ({})", key, value, e))
    })
}

impl PartialRunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Resolves the final settings. CLI flags win over `--set` values, which win over the
    /// file, which wins over the scenario's recommended parameters.
    pub fn merge_with_cli(mut self, args: &RunArgs) -> Result<RunSettings> {
        self.apply_set_values(&args.set_values)?;

        let band = self.band.take().unwrap_or_default();
        let dynamics = self.dynamics.take().unwrap_or_default();
        let output = self.output.take().unwrap_or_default();

        let scenario_key = args
            .scenario
            .as_deref()
            .or(self.scenario.as_deref())
            .unwrap_or(DEFAULT_SCENARIO);
        let scenario = scenario::lookup(scenario_key)?;
        debug!("Resolved scenario '{}'.", scenario.key());

        let mut builder = RunConfigBuilder::from(&scenario.defaults);
        if let Some(n) = args.images.or(band.images) {
            builder = builder.image_count(n);
        }
        if let Some(k) = args.spring_constant.or(band.spring_constant) {
            builder = builder.spring_constant(k);
        }
        if let Some(scheme) = args.tangent.or(band.tangent) {
            builder = builder.tangent(scheme);
        }
        if let Some(tolerance) = band.energy_tolerance {
            builder = builder.energy_tolerance(tolerance);
        }
        if let Some(after) = args.climbing_after.or(band.climbing_after) {
            builder = builder.climbing(ClimbingImage::Automatic {
                after_iterations: after,
            });
        }
        if let Some(kind) = args.integrator.or(dynamics.integrator) {
            builder = builder.integrator(kind);
        }
        if let Some(mass) = args.mass.or(dynamics.mass) {
            builder = builder.mass(mass);
        }
        if let Some(dt) = args.dt.or(dynamics.time_step) {
            builder = builder.time_step(dt);
        }
        if let Some(iterations) = args.iterations.or(dynamics.max_iterations) {
            builder = builder.max_iterations(iterations);
        }
        if let Some(threshold) = args.force_threshold.or(dynamics.force_threshold) {
            builder = builder.force_threshold(threshold);
        }
        let config = builder.build()?;

        let plot_every = args
            .plot_every
            .or(output.plot_every)
            .unwrap_or(DEFAULT_PLOT_EVERY);
        if plot_every == 0 {
            return Err(CliError::Config(
                "`output.plot-every` must be at least 1".to_string(),
            ));
        }
        let output = OutputSettings {
            directory: args
                .output_dir
                .clone()
                .or(output.directory)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            plot_every,
            plotting: args.plotting || output.plotting.unwrap_or(false),
            last: args.last || output.last.unwrap_or(false),
            loss: args.loss || output.loss.unwrap_or(false),
            reaction: args.reaction || output.reaction.unwrap_or(false),
        };

        Ok(RunSettings {
            scenario,
            config,
            output,
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let key = key.trim();

            match key {
                "scenario" => self.scenario = Some(value.trim().to_string()),
                "band.images" => {
                    self.band.get_or_insert_with(Default::default).images =
                        Some(parse_value(key, value)?);
                }
                "band.spring-constant" => {
                    self.band.get_or_insert_with(Default::default).spring_constant =
                        Some(parse_value(key, value)?);
                }
                "band.tangent" => {
                    self.band.get_or_insert_with(Default::default).tangent =
                        Some(parse_value(key, value)?);
                }
                "band.energy-tolerance" => {
                    self.band.get_or_insert_with(Default::default).energy_tolerance =
                        Some(parse_value(key, value)?);
                }
                "band.climbing-after" => {
                    self.band.get_or_insert_with(Default::default).climbing_after =
                        Some(parse_value(key, value)?);
                }
                "dynamics.integrator" => {
                    self.dynamics.get_or_insert_with(Default::default).integrator =
                        Some(parse_value(key, value)?);
                }
                "dynamics.mass" => {
                    self.dynamics.get_or_insert_with(Default::default).mass =
                        Some(parse_value(key, value)?);
                }
                "dynamics.time-step" => {
                    self.dynamics.get_or_insert_with(Default::default).time_step =
                        Some(parse_value(key, value)?);
                }
                "dynamics.max-iterations" => {
                    self.dynamics.get_or_insert_with(Default::default).max_iterations =
                        Some(parse_value(key, value)?);
                }
                "dynamics.force-threshold" => {
                    self.dynamics.get_or_insert_with(Default::default).force_threshold =
                        Some(parse_value(key, value)?);
                }
                "output.directory" => {
                    self.output.get_or_insert_with(Default::default).directory =
                        Some(PathBuf::from(value.trim()));
                }
                "output.plot-every" => {
                    self.output.get_or_insert_with(Default::default).plot_every =
                        Some(parse_value(key, value)?);
                }
                "output.plotting" => {
                    self.output.get_or_insert_with(Default::default).plotting =
                        Some(parse_value(key, value)?);
                }
                "output.last" => {
                    self.output.get_or_insert_with(Default::default).last =
                        Some(parse_value(key, value)?);
                }
                "output.loss" => {
                    self.output.get_or_insert_with(Default::default).loss =
                        Some(parse_value(key, value)?);
                }
                "output.reaction" => {
                    self.output.get_or_insert_with(Default::default).reaction =
                        Some(parse_value(key, value)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
