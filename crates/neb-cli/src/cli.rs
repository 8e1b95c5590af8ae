use clap::{Args, Parser, Subcommand};
use nebpp::core::forces::tangent::TangentScheme;
use nebpp::engine::integrator::IntegratorKind;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu",
    version,
    about = "NEB++ CLI - Locate minimum-energy paths and transition states with the nudged elastic band method.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE).
    /// Directives in NEB_LOG (e.g. `nebpp=trace`) take precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all console log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Also write DEBUG-level engine logs, with span timings, to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel energy evaluation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Relax a nudged elastic band on one of the built-in scenarios.
    Run(RunArgs),
    /// List the built-in scenarios and their recommended parameters.
    Scenarios,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    // --- Scenario ---
    /// Scenario to run (e.g., 'leps', 'brown-muller').
    #[arg(short, long, value_name = "NAME")]
    pub scenario: Option<String>,

    /// Path to a run configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Band ---
    /// Number of interior images.
    #[arg(short = 'n', long, value_name = "INT")]
    pub images: Option<usize>,

    /// Spring constant between neighboring images.
    #[arg(short = 'k', long = "k", value_name = "FLOAT")]
    pub spring_constant: Option<f64>,

    /// Tangent estimate: 'energy-weighted' or 'bisector'.
    #[arg(long, value_name = "SCHEME")]
    pub tangent: Option<TangentScheme>,

    /// Turn the highest image into a climbing image after this many iterations.
    #[arg(long, value_name = "INT")]
    pub climbing_after: Option<usize>,

    // --- Dynamics ---
    /// Mass of every image.
    #[arg(short, long, value_name = "FLOAT")]
    pub mass: Option<f64>,

    /// Integration time step.
    #[arg(long, value_name = "FLOAT")]
    pub dt: Option<f64>,

    /// Maximum number of iterations.
    #[arg(short, long, value_name = "INT")]
    pub iterations: Option<usize>,

    /// Stop once the largest force on any image falls below this value.
    #[arg(long, value_name = "FLOAT")]
    pub force_threshold: Option<f64>,

    /// Integrator: 'quick-min' or 'steepest-descent'.
    #[arg(long, value_name = "NAME")]
    pub integrator: Option<IntegratorKind>,

    // --- Output ---
    /// Directory for CSV and SVG outputs.
    #[arg(short, long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Save a snapshot of the band every N iterations while relaxing, plus the final path map.
    #[arg(long)]
    pub plotting: bool,

    /// Save only the final path map.
    #[arg(long)]
    pub last: bool,

    /// Save the max-force convergence curve.
    #[arg(long)]
    pub loss: bool,

    /// Save the energy profile along the reaction coordinate.
    #[arg(long)]
    pub reaction: bool,

    /// Iterations between live band snapshots.
    #[arg(long, value_name = "INT")]
    pub plot_every: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S dynamics.time-step=0.01
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_flags_parse_into_typed_values() {
        let cli = Cli::parse_from([
            "neb",
            "-v",
            "run",
            "--scenario",
            "leps",
            "-n",
            "12",
            "--k",
            "0.5",
            "--dt",
            "0.02",
            "--integrator",
            "sd",
            "--tangent",
            "bisector",
            "--loss",
            "-S",
            "dynamics.mass=2",
        ]);
        assert_eq!(cli.verbose, 1);
        let Commands::Run(args) = cli.command else {
            panic!("expected the run subcommand");
        };
        assert_eq!(args.scenario.as_deref(), Some("leps"));
        assert_eq!(args.images, Some(12));
        assert_eq!(args.spring_constant, Some(0.5));
        assert_eq!(args.dt, Some(0.02));
        assert_eq!(args.integrator, Some(IntegratorKind::SteepestDescent));
        assert_eq!(args.tangent, Some(TangentScheme::Bisector));
        assert!(args.loss);
        assert!(!args.plotting);
        assert_eq!(args.set_values, vec!["dynamics.mass=2"]);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["neb", "-q", "-v", "scenarios"]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_integrator_is_rejected_by_the_parser() {
        let result = Cli::try_parse_from(["neb", "run", "--integrator", "verlet"]);
        assert!(result.is_err());
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
