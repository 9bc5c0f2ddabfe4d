//! # Bar Bending Schedule CLI
//!
//! Loads a `.bbs` project file, computes its schedule, and prints it either
//! as a table or as JSON.
//!
//! ```text
//! bbs_cli schedule site.bbs --profile bs-8666
//! bbs_cli schedule site.bbs --json > schedule.json
//! bbs_cli breakdown site.bbs
//! bbs_cli profiles
//! ```
//!
//! Logs go to stderr (`RUST_LOG`, default `warn`; `-v` for debug). On
//! failure the error is printed as JSON on stderr and the exit code is 1.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use bbs_core::aggregation::GroupTotals;
use bbs_core::calculations::breakdown::{verify_bar, StepOp, Verification};
use bbs_core::calculations::Schedule;
use bbs_core::errors::{BbsError, BbsResult};
use bbs_core::file_io::load_project;
use bbs_core::profiles::{registry, validate_profile};
use bbs_core::project::Project;

#[derive(Parser, Debug)]
#[command(name = "bbs_cli")]
#[command(about = "Bar bending schedule calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute and print the schedule for a project file
    Schedule {
        /// Path to the project file
        path: PathBuf,

        /// Apply this code profile before computing
        #[arg(short, long)]
        profile: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the step-by-step length of every canonical-shape bar
    Breakdown {
        /// Path to the project file
        path: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the built-in code profiles
    Profiles,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> BbsResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| BbsError::SerializationError {
        reason: e.to_string(),
    })?;
    println!("{}", json);
    Ok(())
}

fn open_project(path: &Path, profile: Option<&str>) -> BbsResult<Project> {
    let mut project = load_project(path)?;
    if let Some(id) = profile {
        for warning in project.apply_profile(id)? {
            tracing::warn!(%warning, "profile warning");
        }
    }
    Ok(project)
}

fn print_groups<K: std::fmt::Display>(title: &str, groups: &[GroupTotals<K>]) {
    println!("{}", title);
    for group in groups {
        println!(
            "  {:<24} {:>4} lines {:>7} bars {:>10.2} m {:>10.2} kg",
            group.key.to_string(),
            group.totals.entries,
            group.totals.total_bars,
            group.totals.total_length_m,
            group.totals.total_weight_kg
        );
    }
    println!();
}

fn print_schedule(project: &Project, schedule: &Schedule) {
    println!("═══════════════════════════════════════════════════════════════════════════");
    println!(
        "  BAR BENDING SCHEDULE  {} / {}  ({})",
        project.meta.job_id, project.meta.client, project.settings.source_profile
    );
    println!("═══════════════════════════════════════════════════════════════════════════");
    println!(
        "{:<6} {:<5} {:<28} {:>4} {:>8} {:>5} {:>6} {:>9} {:>9}",
        "Member", "Mark", "Bar", "Dia", "Cut mm", "Bends", "No.", "Len m", "Wt kg"
    );
    for bar in &schedule.bars {
        println!(
            "{:<6} {:<5} {:<28} {:>4} {:>8.0} {:>5} {:>6} {:>9.2} {:>9.2}{}",
            bar.member_mark,
            bar.bar_mark,
            bar.label,
            bar.diameter.mm(),
            bar.cut_length_mm,
            bar.bend_count,
            bar.total_bars,
            bar.total_length_m,
            bar.total_weight_kg,
            if bar.low_confidence { "  (?)" } else { "" }
        );
    }
    println!();

    print_groups("By diameter:", &schedule.by_diameter);
    print_groups("By shape:", &schedule.by_shape);
    print_groups("By member type:", &schedule.by_member_type);

    println!("═══════════════════════════════════════════════════════════════════════════");
    println!(
        "  TOTAL: {} bars, {:.2} m, {:.2} kg",
        schedule.grand_total.total_bars, schedule.grand_total.total_length_m, schedule.grand_total.total_weight_kg
    );
    println!("═══════════════════════════════════════════════════════════════════════════");

    let unrecognised = schedule.low_confidence_count();
    if unrecognised > 0 {
        println!("(?) {} bar label(s) not recognised; measured as bare span", unrecognised);
    }
}

fn run_schedule(path: &Path, profile: Option<&str>, json: bool) -> BbsResult<()> {
    let project = open_project(path, profile)?;
    for (bar_id, warning) in project.limit_warnings() {
        tracing::warn!(%bar_id, %warning, "limit check");
    }
    let schedule = project.schedule()?;
    if json {
        print_json(&schedule)
    } else {
        print_schedule(&project, &schedule);
        Ok(())
    }
}

#[derive(Serialize)]
struct BarBreakdown<'a> {
    member: &'a str,
    bar: &'a str,
    verification: Verification,
}

fn run_breakdown(path: &Path, json: bool) -> BbsResult<()> {
    let project = open_project(path, None)?;
    let params = &project.settings.parameters;

    let mut breakdowns = Vec::new();
    for (member, bar) in project.bars() {
        if let Some(verification) = verify_bar(bar, params)? {
            breakdowns.push(BarBreakdown {
                member: &member.mark,
                bar: &bar.mark,
                verification,
            });
        }
    }

    if json {
        return print_json(&breakdowns);
    }

    for entry in &breakdowns {
        let v = &entry.verification;
        println!("{} / {}  {}  = {}", entry.member, entry.bar, v.breakdown.shape, v.breakdown.formula);
        for step in &v.breakdown.steps {
            let sign = match step.op {
                StepOp::Constant => " ",
                StepOp::Add | StepOp::Sqrt => "+",
                StepOp::Subtract => "-",
            };
            println!("    {} {:>10.2}  {}", sign, step.value, step.description);
        }
        println!(
            "    = {:>10.2}  {}",
            v.step_sum,
            if v.matches { "✓" } else { "✗ does not match formula" }
        );
        println!();
    }
    Ok(())
}

fn run_profiles() -> BbsResult<()> {
    for profile in registry::all() {
        let report = validate_profile(profile);
        let p = &profile.parameters;
        println!(
            "{:<8} {:<22} cover {:>3} mm  h {:>4}  m45 {}  m90 {}  m135 {}{}",
            profile.id,
            profile.name,
            p.cover_mm,
            p.hook_multiplier,
            p.bends.deg45,
            p.bends.deg90,
            p.bends.deg135,
            if profile.editable { "  (editable)" } else { "" }
        );
        for issue in &report.issues {
            println!("           {:?}: {}", issue.severity, issue);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Schedule { path, profile, json } => run_schedule(path, profile.as_deref(), *json),
        Commands::Breakdown { path, json } => run_breakdown(path, *json),
        Commands::Profiles => run_profiles(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}
