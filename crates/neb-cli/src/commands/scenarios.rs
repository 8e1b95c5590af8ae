use crate::error::Result;
use nebpp::core::models::point::Point;
use nebpp::core::scenario::{Scenario, ScenarioKind};
use nebpp::core::surface::PotentialSurface;
use std::fmt::Write;

fn format_point(p: &Point) -> String {
    let coords: Vec<String> = p.iter().map(|c| c.to_string()).collect();
    format!("({})", coords.join(", "))
}

/// Human-readable description of one registry entry.
pub fn describe(scenario: &Scenario) -> String {
    let mut text = String::new();
    let d = &scenario.defaults;
    let _ = writeln!(text, "{} ({})", scenario.key(), scenario.name);
    let _ = writeln!(text, "  surface:   {}", scenario.surface.name());
    let _ = writeln!(text, "  initial:   {}", format_point(&scenario.initial));
    let _ = writeln!(text, "  final:     {}", format_point(&scenario.terminal));
    let _ = writeln!(text, "  saddle:    {}", format_point(&scenario.saddle));
    let _ = write!(
        text,
        "  defaults:  images={} k={} mass={} dt={} iterations={}",
        d.images, d.spring_constant, d.mass, d.time_step, d.iterations
    );
    text
}

pub fn run() -> Result<()> {
    println!("Available scenarios:\n");
    for kind in ScenarioKind::ALL {
        println!("{}\n", describe(&kind.scenario()));
    }
    Ok(())
}
