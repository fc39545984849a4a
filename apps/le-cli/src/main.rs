use clap::{Parser, Subcommand};
use le_app::{
    AppResult, RunOptions, RunProgressEvent, RunRequest, RunStage, project_service, query,
    run_service,
};
use le_core::ReachId;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "leffect")]
#[command(about = "leffect - hourly exposure export and population effect runs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a run configuration and its concentration series
    Validate {
        /// Path to the run configuration (YAML or JSON)
        config_path: PathBuf,
    },
    /// Export concentrations, run the simulator and collect its results
    Run {
        /// Path to the run configuration (YAML or JSON)
        config_path: PathBuf,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
        /// Model identifier overriding the configured one
        #[arg(long)]
        model: Option<String>,
        /// Number of runs per multiplication factor (population models only)
        #[arg(long)]
        runs: Option<u32>,
    },
    /// List cached runs of a configuration
    Runs {
        /// Path to the run configuration
        config_path: PathBuf,
    },
    /// Show the result arrays of a cached run
    ShowRun {
        /// Path to the run configuration
        config_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export one temporal series of a result as CSV
    ExportSeries {
        /// Path to the run configuration
        config_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Result name (e.g. AdultMetaPopulation, GutsSurvivalReaches)
        result: String,
        /// Multiplication factor number (1-based)
        #[arg(long)]
        factor: usize,
        /// Run number (1-based; population results only)
        #[arg(long, default_value_t = 1)]
        run: usize,
        /// Reach identifier (per-reach results only)
        #[arg(long)]
        reach: Option<i64>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Run {
            config_path,
            no_cache,
            model,
            runs,
        } => cmd_run(&config_path, !no_cache, model, runs),
        Commands::Runs { config_path } => cmd_runs(&config_path),
        Commands::ShowRun {
            config_path,
            run_id,
        } => cmd_show_run(&config_path, &run_id),
        Commands::ExportSeries {
            config_path,
            run_id,
            result,
            factor,
            run,
            reach,
            output,
        } => cmd_export_series(
            &config_path,
            &run_id,
            &result,
            factor,
            run,
            reach.map(ReachId::new),
            output.as_deref(),
        ),
    }
}

fn cmd_validate(config_path: &Path) -> AppResult<()> {
    println!("Validating configuration: {}", config_path.display());
    let config = project_service::load_config(config_path)?;
    let summary = project_service::summarize_config(&config, config_path)?;
    println!("✓ Configuration is valid");
    println!("  Name: {}", summary.name);
    println!("  Model: {}", summary.model);
    println!("  Multiplication factors: {:?}", summary.multiplication_factors);
    if let Some(runs) = summary.number_runs {
        println!("  Runs per factor: {}", runs);
    }
    println!("  Reaches: {}", summary.reach_count);
    println!("  Hours: {}", summary.hours);
    println!(
        "  Simulated years: {} - {} ({} days)",
        summary.simulated_years.0, summary.simulated_years.1, summary.total_days
    );
    println!(
        "  Application years: {} - {}",
        summary.application_years.0, summary.application_years.1
    );
    Ok(())
}

fn cmd_run(
    config_path: &Path,
    use_cache: bool,
    model: Option<String>,
    runs: Option<u32>,
) -> AppResult<()> {
    println!("Running configuration: {}", config_path.display());

    let request = RunRequest {
        config_path,
        options: RunOptions {
            use_cache,
            model,
            number_runs: runs,
            ..RunOptions::default()
        },
    };

    let mut last_emit = Instant::now();
    let mut last_stage = None;
    let response = run_service::ensure_run(
        &request,
        Some(&mut |event| {
            let emit_now = last_stage != Some(event.stage) || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_stage = Some(event.stage);
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Run completed: {}", response.run_id);
    }
    println!("  Total time: {:.2}s", response.total_time_s);
    println!("  Results: {}", response.manifest.arrays.join(", "));

    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    let spinner = ['|', '/', '-', '\\'];
    let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
    let mut line = format!(
        "\r{} {}  elapsed={:.2}s",
        spinner[spin_idx],
        event.stage.label(),
        event.elapsed_wall_s
    );
    if let (RunStage::RunningSimulator, Some(year)) = (event.stage, event.year) {
        line.push_str(&format!("  year={}", year));
    }
    if let Some(msg) = &event.message {
        line.push_str(&format!("  {}", msg));
    }
    print!("{}", line);
    let _ = io::stdout().flush();
}

fn cmd_runs(config_path: &Path) -> AppResult<()> {
    let runs = run_service::list_runs(config_path)?;

    if runs.is_empty() {
        println!("No cached runs found for {}", config_path.display());
    } else {
        println!("Cached runs for '{}':", config_path.display());
        for manifest in runs {
            println!(
                "  {} ({}, {})",
                manifest.run_id, manifest.model, manifest.timestamp
            );
        }
    }
    Ok(())
}

fn cmd_show_run(config_path: &Path, run_id: &str) -> AppResult<()> {
    println!("Loading run: {}", run_id);

    let (manifest, arrays) = run_service::load_run(config_path, run_id)?;

    println!("\nRun Summary:");
    println!("  Configuration: {}", manifest.config_name);
    println!("  Model: {}", manifest.model);
    println!(
        "  Simulated years: {} - {}",
        manifest.window.simulated_first_year(),
        manifest.window.simulated_last_year()
    );
    println!("  Reaches: {}", manifest.reaches.len());
    println!("  Multiplication factors: {:?}", manifest.multiplication_factors);
    if let Some(runs) = manifest.number_runs {
        println!("  Runs per factor: {}", runs);
    }

    println!("\nResults:");
    for array in &arrays {
        let summary = query::summarize(array);
        println!(
            "  {} {:?} [{}]  {} .. {}  min={} max={}",
            summary.name,
            summary.shape,
            summary.scales.join(", "),
            summary.first,
            summary.last,
            summary.min,
            summary.max
        );
    }

    Ok(())
}

fn cmd_export_series(
    config_path: &Path,
    run_id: &str,
    result: &str,
    factor: usize,
    run: usize,
    reach: Option<ReachId>,
    output: Option<&Path>,
) -> AppResult<()> {
    let array = run_service::load_array(config_path, run_id, result)?;
    let series = query::extract_series(&array, factor, run, reach)?;

    // Build CSV
    let mut csv = String::from("time,value\n");
    for point in &series {
        csv.push_str(&format!("{},{}\n", point.label, point.value));
    }

    // Write to file or stdout
    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} data points to {}",
            series.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}
