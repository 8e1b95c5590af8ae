use crate::cli::RunArgs;
use crate::config::{OutputSettings, PartialRunConfig, RunSettings};
use crate::error::Result;
use crate::report::RunSummary;
use crate::report::hooks::{
    CsvExportHook, FRAMES_DIR, LOSS_SVG, LivePlotHook, LossCurveHook, PATH_MAP_SVG, PROFILE_SVG,
    PathMapHook, ProfileHook,
};
use crate::report::plots::MapContext;
use crate::utils::progress::CliProgressHandler;
use nebpp::engine::progress::ProgressReporter;
use nebpp::engine::state::RunOutcome;
use nebpp::workflows::relax::{self, RunDriver};
use std::fs;
use tracing::{debug, info};

pub fn run(args: RunArgs) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialRunConfig::from_file(path)?,
        None => PartialRunConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let settings = partial_config.merge_with_cli(&args)?;
    debug!(config = ?settings.config, output = ?settings.output, "Resolved run settings.");

    let progress_handler = CliProgressHandler::new(settings.config.force_threshold);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Relaxing a {}-image band on the {} surface...",
        settings.config.image_count, settings.scenario.name
    );
    let outcome = execute(&settings, &reporter)?;

    let summary = RunSummary::new(&settings.scenario, &outcome);
    summary.log();
    println!("\n{}", summary);
    println!("Results written to {:?}", settings.output.directory);
    Ok(())
}

/// Builds the band and the report hooks the output settings ask for, then runs the driver.
pub fn execute(settings: &RunSettings, reporter: &ProgressReporter) -> Result<RunOutcome> {
    let RunSettings {
        scenario,
        config,
        output,
    } = settings;
    fs::create_dir_all(&output.directory)?;

    let context = needs_map(output).then(|| {
        info!("Sampling the energy landscape for path maps...");
        MapContext::from_scenario(scenario)
    });

    let mut band = relax::build_band(
        config,
        scenario.initial.clone(),
        scenario.terminal.clone(),
        &scenario.surface,
    )?;

    let mut driver =
        RunDriver::new(config.clone())?.with_hook(CsvExportHook::new(&output.directory));
    if let Some(context) = &context {
        if output.plotting {
            driver = driver.with_hook(LivePlotHook::new(
                context,
                output.directory.join(FRAMES_DIR),
                output.plot_every,
            ));
        }
        if output.wants_path_map() {
            let path = output.directory.join(PATH_MAP_SVG);
            driver = driver.with_hook(PathMapHook::new(context, path));
        }
    }
    if output.loss {
        driver = driver.with_hook(LossCurveHook::new(
            scenario.name,
            output.directory.join(LOSS_SVG),
        ));
    }
    if output.reaction {
        driver = driver.with_hook(ProfileHook::new(
            scenario.name,
            output.directory.join(PROFILE_SVG),
        ));
    }

    Ok(driver.run(&mut band, reporter)?)
}

fn needs_map(output: &OutputSettings) -> bool {
    output.plotting || output.wants_path_map()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::report::hooks::{BAND_CSV, HISTORY_CSV};
    use clap::Parser;
    use tempfile::tempdir;

    fn settings(extra: &[&str]) -> RunSettings {
        let mut argv = vec!["neb", "run"];
        argv.extend_from_slice(extra);
        let Commands::Run(args) = Cli::parse_from(argv).command else {
            panic!("expected the run subcommand");
        };
        PartialRunConfig::default().merge_with_cli(&args).unwrap()
    }

    #[test]
    fn default_run_writes_only_csv_results() {
        let dir = tempdir().unwrap();
        let out = dir.path().to_str().unwrap();
        let settings = settings(&["-n", "4", "-i", "3", "-o", out]);

        let outcome = execute(&settings, &ProgressReporter::new()).unwrap();
        assert_eq!(outcome.history.len(), 3);
        assert!(dir.path().join(BAND_CSV).exists());
        assert!(dir.path().join(HISTORY_CSV).exists());
        assert!(!dir.path().join(PATH_MAP_SVG).exists());
        assert!(!dir.path().join(FRAMES_DIR).exists());
    }

    #[test]
    fn toggles_add_their_plots() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested");
        let out = out.to_str().unwrap();
        let settings = settings(&[
            "-s",
            "brown-muller",
            "-n",
            "3",
            "-i",
            "2",
            "-o",
            out,
            "--last",
            "--loss",
            "--reaction",
            "-S",
            "output.plot-every=1",
        ]);

        execute(&settings, &ProgressReporter::new()).unwrap();
        let root = dir.path().join("nested");
        for name in [BAND_CSV, HISTORY_CSV, PATH_MAP_SVG, LOSS_SVG, PROFILE_SVG] {
            assert!(root.join(name).exists(), "{} missing", name);
        }
        assert!(!root.join(FRAMES_DIR).exists());
    }

    #[test]
    fn needs_map_follows_plot_toggles() {
        let mut output = settings(&[]).output;
        assert!(!needs_map(&output));
        output.last = true;
        assert!(needs_map(&output));
        output.last = false;
        output.plotting = true;
        assert!(needs_map(&output));
    }
}
