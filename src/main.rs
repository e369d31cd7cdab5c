use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{info, warn};

use ascent_sim::io::{self, csv, json, AscentSummary, ReferenceTelemetry};
use ascent_sim::types::{Integrator, MassUpdate, TrajectorySample};
use ascent_sim::{presets, Scenario};

#[derive(Parser)]
#[command(author, version, about = "Point-mass rocket ascent simulator")]
struct Cli {
    /// Scenario TOML (defaults to the built-in Kerbin gravity turn)
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Override the scenario's integrator
    #[arg(long, value_enum)]
    method: Option<Method>,

    /// Euler step size in seconds
    #[arg(long)]
    dt: Option<f64>,

    /// RK45 output sample count
    #[arg(long)]
    samples: Option<usize>,

    /// Override the simulated end time in seconds
    #[arg(long)]
    end_time: Option<f64>,

    /// Write the full trajectory as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write a JSON summary (with comparison totals when --telemetry is given)
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Recorded flight telemetry (JSON) to compare against
    #[arg(long)]
    telemetry: Option<PathBuf>,

    /// Rows printed in the trajectory table
    #[arg(long, default_value_t = 30)]
    rows: usize,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum Method {
    Euler,
    Rk45,
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut scenario = match &cli.scenario {
        Some(path) => Scenario::load(path)?,
        None => presets::kerbin_gravity_turn(),
    };
    apply_overrides(&mut scenario, &cli);
    info!("running scenario '{}' with {}", scenario.name, scenario.sim.integrator.name());

    let trajectory = scenario.run()?;
    let summary = AscentSummary::from_trajectory(&trajectory, scenario.vehicle.dry_mass)
        .ok_or("simulation produced no samples")?;

    let comparison = match &cli.telemetry {
        Some(path) => {
            let reference = ReferenceTelemetry::load(path)?;
            info!("loaded {} telemetry records from {}", reference.len(), path.display());
            Some(io::compare(&trajectory, &reference))
        }
        None => None,
    };

    print_report(&scenario, &trajectory, &summary, cli.rows);
    if let Some(cmp) = &comparison {
        print_comparison(cmp);
    }

    if let Some(path) = &cli.csv {
        csv::write_trajectory_file(path, &trajectory)?;
        info!("trajectory written to {}", path.display());
    }
    if let Some(path) = &cli.summary {
        json::write_summary_file(path, &scenario.name, &summary, comparison.as_ref())?;
        info!("summary written to {}", path.display());
    }
    Ok(())
}

fn apply_overrides(scenario: &mut Scenario, cli: &Cli) {
    if let Some(end_time) = cli.end_time {
        scenario.sim.end_time = end_time;
    }

    let current = scenario.sim.integrator;
    scenario.sim.integrator = match (cli.method, current) {
        (Some(Method::Euler), Integrator::Euler { dt, mass_update }) | (None, Integrator::Euler { dt, mass_update }) => {
            Integrator::Euler { dt: cli.dt.unwrap_or(dt), mass_update }
        }
        (Some(Method::Euler), Integrator::Rk45 { .. }) => Integrator::Euler {
            dt: cli.dt.unwrap_or(1.0),
            mass_update: MassUpdate::default(),
        },
        (Some(Method::Rk45), Integrator::Rk45 { samples, rtol, atol })
        | (None, Integrator::Rk45 { samples, rtol, atol }) => Integrator::Rk45 {
            samples: cli.samples.unwrap_or(samples),
            rtol,
            atol,
        },
        (Some(Method::Rk45), Integrator::Euler { .. }) => Integrator::rk45(cli.samples.unwrap_or(1000)),
    };

    if let Some(flag) = ignored_flag(cli, &scenario.sim.integrator) {
        warn!("{flag} has no effect with the {} integrator", scenario.sim.integrator.name());
    }
}

/// Step-size flag given on the command line that the chosen integrator ignores.
fn ignored_flag(cli: &Cli, integrator: &Integrator) -> Option<&'static str> {
    match integrator {
        Integrator::Euler { .. } if cli.samples.is_some() => Some("--samples"),
        Integrator::Rk45 { .. } if cli.dt.is_some() => Some("--dt"),
        _ => None,
    }
}

fn print_report(scenario: &Scenario, trajectory: &[TrajectorySample], summary: &AscentSummary, rows: usize) {
    let v = &scenario.vehicle;

    println!();
    println!("====================================================================");
    println!("  ASCENT SIMULATION: {}", scenario.name);
    println!("====================================================================");
    println!();
    println!("  Vehicle Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Dry mass:      {:>10.0} kg    Propellant:   {:>10.0} kg",
        v.dry_mass, v.propellant_mass
    );
    println!(
        "  Launch mass:   {:>10.0} kg    TWR:          {:>10.2}",
        scenario.initial.mass,
        v.twr()
    );
    println!(
        "  Max thrust:    {:>10.0} N     Throttled:    {:>10.2}",
        v.max_thrust, v.throttled_fraction
    );
    println!(
        "  Burn rate:     {:>10.1} kg/s  Burn time:    {:>10.1} s",
        v.burn_rate,
        v.burn_time()
    );
    println!("  Area:          {:>10.2} m^2   Radius:       {:>10.0} m", v.area, v.planet_radius);
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Max altitude:  {:>10.0} m     ({:.2} km)",
        summary.max_altitude,
        summary.max_altitude / 1000.0
    );
    println!("  Max velocity:  {:>10.1} m/s   (Mach {:.2})", summary.max_velocity, summary.max_mach);
    println!("  Max drag:      {:>10.0} N     at t={:.1} s", summary.max_drag, summary.max_drag_time);
    match summary.burnout_time {
        Some(t) => println!("  Burnout:       {:>10.1} s", t),
        None => println!("  Burnout:       {:>10}", "not reached"),
    }
    println!(
        "  Final state:   t={:.1} s  h={:.0} m  v={:.1} m/s  m={:.0} kg",
        summary.final_time, summary.final_altitude, summary.final_velocity, summary.final_mass
    );
    println!();

    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>10}  {:>9}  {:>10}  {:>7}  {:>10}  {:>6}",
        "t (s)", "alt (m)", "vel (m/s)", "mass (kg)", "pitch", "drag (N)", "Mach"
    );
    println!("  {}", "─".repeat(72));

    let interval = (trajectory.len() / rows.max(1)).max(1);
    for (i, s) in trajectory.iter().enumerate() {
        if i % interval != 0 && i != trajectory.len() - 1 {
            continue;
        }
        println!(
            "  {:>7.2}  {:>10.1}  {:>9.1}  {:>10.1}  {:>7.2}  {:>10.1}  {:>6.2}",
            s.time, s.altitude, s.velocity, s.mass, s.pitch_deg, s.drag, s.mach
        );
    }

    println!();
    println!(
        "  Integrator: {}, {} samples to t={} s",
        scenario.sim.integrator.name(),
        trajectory.len(),
        scenario.sim.end_time
    );
    println!("====================================================================");
    println!();
}

fn print_comparison(cmp: &io::Comparison) {
    println!("  Telemetry Comparison ({} points)", cmp.residuals.len());
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  RMS altitude:  {:>10.2} m", cmp.rms_altitude);
    println!("  RMS velocity:  {:>10.2} m/s", cmp.rms_velocity);
    println!("  RMS drag:      {:>10.2} N", cmp.rms_drag);
    if let Some(rms_mass) = cmp.rms_mass {
        println!("  RMS mass:      {:>10.2} kg", rms_mass);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ascent-sim").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn dt_applies_to_euler() {
        let args = cli(&["--dt", "0.5"]);
        let mut scenario = presets::kerbin_gravity_turn();
        apply_overrides(&mut scenario, &args);
        assert_eq!(scenario.sim.integrator, Integrator::euler(0.5));
        assert_eq!(ignored_flag(&args, &scenario.sim.integrator), None);
    }

    #[test]
    fn dt_is_flagged_under_rk45() {
        let args = cli(&["--method", "rk45", "--dt", "0.5", "--samples", "300"]);
        let mut scenario = presets::kerbin_gravity_turn();
        apply_overrides(&mut scenario, &args);
        assert_eq!(scenario.sim.integrator, Integrator::rk45(300));
        assert_eq!(ignored_flag(&args, &scenario.sim.integrator), Some("--dt"));
    }

    #[test]
    fn samples_is_flagged_under_euler() {
        let args = cli(&["--samples", "300"]);
        let mut scenario = presets::kerbin_gravity_turn();
        apply_overrides(&mut scenario, &args);
        assert_eq!(scenario.sim.integrator, Integrator::euler(1.0));
        assert_eq!(ignored_flag(&args, &scenario.sim.integrator), Some("--samples"));
    }
}
