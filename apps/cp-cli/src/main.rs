use clap::{Args, Parser, Subcommand};
use cp_app::{
    AppError, AppResult, RunOverrides, RunProgressEvent, RunRequest, RunStage, ScenarioSource,
    compile_scenario, run_service, scenario_service,
};
use cp_controls::ControlPolicy;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "cp-cli")]
#[command(about = "Cart-pole regulation simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scenario file and check that it compiles
    Validate {
        /// Path to the scenario file (YAML, or JSON by extension)
        scenario_path: PathBuf,
    },
    /// List built-in presets
    Presets,
    /// Print or write a built-in preset as a scenario file
    Preset {
        /// Preset name
        name: String,
        /// Output file (optional, defaults to YAML on stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a scenario to completion and summarize it
    Run {
        #[command(flatten)]
        source: SourceArgs,
        /// Override the time step in seconds
        #[arg(long)]
        dt: Option<f64>,
        /// Override the end time in seconds
        #[arg(long)]
        t_end: Option<f64>,
        /// Print every N-th step as a table row
        #[arg(long)]
        print_every: Option<usize>,
        /// Report per-stage tick timing
        #[arg(long)]
        timing: bool,
    },
    /// Play a scenario in real time with a live readout
    Play {
        #[command(flatten)]
        source: SourceArgs,
        /// Wall-clock seconds to play (defaults to the scenario end time)
        #[arg(long)]
        seconds: Option<f64>,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Path to the scenario file
    #[arg(required_unless_present = "preset")]
    scenario_path: Option<PathBuf>,
    /// Use a built-in preset instead of a file
    #[arg(long, conflicts_with = "scenario_path")]
    preset: Option<String>,
}

impl SourceArgs {
    fn into_source(self) -> AppResult<ScenarioSource> {
        match (self.scenario_path, self.preset) {
            (Some(path), None) => Ok(ScenarioSource::File(path)),
            (None, Some(name)) => Ok(ScenarioSource::Preset(name)),
            _ => Err(AppError::InvalidInput(
                "give either a scenario file or --preset".to_string(),
            )),
        }
    }
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Presets => cmd_presets(),
        Commands::Preset { name, output } => cmd_preset(&name, output.as_deref()),
        Commands::Run {
            source,
            dt,
            t_end,
            print_every,
            timing,
        } => {
            if timing {
                cp_core::timing::enable_timing();
            }
            let request = RunRequest {
                source: source.into_source()?,
                overrides: RunOverrides {
                    dt_s: dt,
                    t_end_s: t_end,
                    record_every: print_every,
                },
            };
            cmd_run(&request, print_every.is_some())
        }
        Commands::Play { source, seconds } => cmd_play(&source.into_source()?, seconds),
    }
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = scenario_service::load_scenario(scenario_path)?;
    let compiled = compile_scenario(&scenario)?;
    println!(
        "✓ Scenario '{}' is valid ({})",
        compiled.name,
        compiled.session.policy().name()
    );
    Ok(())
}

fn cmd_presets() -> AppResult<()> {
    println!("Built-in presets:");
    for preset in scenario_service::list_presets() {
        println!(
            "  {:<16} {:<10} {}",
            preset.name, preset.controller, preset.description
        );
    }
    Ok(())
}

fn cmd_preset(name: &str, output: Option<&Path>) -> AppResult<()> {
    let scenario =
        scenario_service::resolve_scenario(&ScenarioSource::Preset(name.to_string()))?;

    if let Some(path) = output {
        scenario_service::save_scenario(path, &scenario)?;
        println!("✓ Wrote preset '{}' to {}", name, path.display());
    } else {
        let yaml = serde_yaml::to_string(&scenario)
            .map_err(|e| AppError::Scenario(format!("Failed to serialize scenario: {}", e)))?;
        print!("{}", yaml);
    }
    Ok(())
}

fn cmd_run(request: &RunRequest, print_table: bool) -> AppResult<()> {
    let mut last_emit = Instant::now();
    let mut last_fraction = -1.0f64;
    let response = run_service::run_scenario(
        request,
        Some(&mut |event| {
            let fraction = event
                .simulation
                .as_ref()
                .map(|s| s.fraction_complete)
                .unwrap_or(-1.0);
            let emit_now = (fraction >= 0.0 && (fraction - last_fraction).abs() >= 0.005)
                || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                if fraction >= 0.0 {
                    last_fraction = fraction;
                }
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    println!("✓ Simulation completed: {}", response.scenario_name);

    if print_table {
        println!(
            "\n{:>9} {:>10} {:>10} {:>10} {:>10} {:>9}",
            "t [s]", "x [m]", "v [m/s]", "θ [deg]", "ω [rad/s]", "F [N]"
        );
        for ((t, s), f) in response
            .record
            .t
            .iter()
            .zip(&response.record.x)
            .zip(&response.record.force)
        {
            println!(
                "{:>9.3} {:>+10.4} {:>+10.4} {:>+10.3} {:>+10.4} {:>+9.3}",
                t,
                s.x,
                s.x_dot,
                s.theta.to_degrees(),
                s.theta_dot,
                f
            );
        }
    }

    let summary = &response.summary;
    println!("\nRun summary:");
    println!("  Time points: {}", summary.record_count);
    println!(
        "  Time range: {:.3} - {:.3} s",
        summary.time_range.0, summary.time_range.1
    );
    println!(
        "  Final state: x={:+.4} m  v={:+.4} m/s  θ={:+.3}°  ω={:+.4} rad/s",
        summary.final_state.x,
        summary.final_state.x_dot,
        summary.final_state.theta.to_degrees(),
        summary.final_state.theta_dot
    );
    println!(
        "  Peaks: |θ|={:.3}°  |x|={:.4} m  |F|={:.3} N",
        summary.max_abs_theta.to_degrees(),
        summary.max_abs_x,
        summary.max_abs_force
    );

    print_metrics(&response.metrics);
    print_timing_summary(&response.timing);
    Ok(())
}

fn print_metrics(metrics: &cp_app::LoopMetrics) {
    if !metrics.has_data() {
        return;
    }
    let show = |label: &str, value: Option<f64>, unit: &str| match value {
        Some(v) => println!("  {:<20} {:.3}{}", label, v, unit),
        None => println!("  {:<20} -", label),
    };
    println!("\nAngle loop metrics:");
    show("Rise time (10%):", metrics.rise_time_10_s, " s");
    show("Rise time (90%):", metrics.rise_time_90_s, " s");
    show("Settling time (2%):", metrics.settling_time_2pct_s, " s");
    show("Overshoot:", metrics.overshoot_pct, " %");
    show(
        "Steady-state error:",
        metrics.steady_state_error.map(f64::to_degrees),
        "°",
    );
    show("Force saturation:", metrics.saturation_pct, " %");
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (&event.stage, &event.simulation) {
        (RunStage::Running, Some(s)) => {
            let width = 28usize;
            let filled = ((s.fraction_complete * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] {:>6.2}%  t={:.3}/{:.3}s  step={}  elapsed={:.1}s",
                bar,
                s.fraction_complete * 100.0,
                s.sim_time_s,
                s.t_end_s,
                s.step,
                event.elapsed_wall_s
            );
        }
        _ => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            let mut line = format!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str(&format!("  {}", msg));
            }
            print!("{}", line);
        }
    }
    let _ = io::stdout().flush();
}

fn print_timing_summary(timing: &cp_app::RunTimingSummary) {
    let total = timing.total_time_s.max(1.0e-12);
    println!("\nTiming summary:");
    println!(
        "  Compile: {:.3}s ({:.1}%)",
        timing.compile_time_s,
        100.0 * timing.compile_time_s / total
    );
    println!(
        "  Run:     {:.3}s ({:.1}%)",
        timing.run_time_s,
        100.0 * timing.run_time_s / total
    );
    println!("  Total:   {:.3}s", timing.total_time_s);
    println!("  Steps:   {} ({:.2} µs/tick)", timing.steps, timing.avg_tick_us);
}

/// Half-width of the readout track when the scenario has no travel limit.
const DEFAULT_TRACK_HALF_WIDTH_M: f64 = 3.0;
const READOUT_PERIOD_S: f64 = 0.05;

fn cmd_play(source: &ScenarioSource, seconds: Option<f64>) -> AppResult<()> {
    let scenario = scenario_service::resolve_scenario(source)?;
    let mut compiled = compile_scenario(&scenario)?;
    let duration = seconds.unwrap_or(compiled.options.t_end);
    if !(duration.is_finite() && duration >= 0.0) {
        return Err(AppError::InvalidInput(format!(
            "--seconds must be non-negative, got {}",
            duration
        )));
    }

    let session = &mut compiled.session;
    let dt = session.dt();
    let half_width = session
        .config()
        .travel_limit
        .unwrap_or(DEFAULT_TRACK_HALF_WIDTH_M);
    let ticks = (duration / dt - 1e-9).ceil().max(0.0) as u64;
    let readout_every = ((READOUT_PERIOD_S / dt).round() as u64).max(1);

    println!(
        "Playing '{}' ({}) for {:.1} s at dt = {} s",
        compiled.name,
        session.policy().name(),
        duration,
        dt
    );
    render_readout(&session.snapshot(), half_width);

    let started = Instant::now();
    let mut late_ticks = 0u64;
    for n in 1..=ticks {
        session.tick();
        if n % readout_every == 0 || n == ticks {
            render_readout(&session.snapshot(), half_width);
        }

        let deadline = started + Duration::from_secs_f64(n as f64 * dt);
        match deadline.checked_duration_since(Instant::now()) {
            Some(wait) => thread::sleep(wait),
            None => late_ticks += 1,
        }
    }
    println!();

    if late_ticks > 0 {
        tracing::warn!(late_ticks, ticks, "playback fell behind the wall clock");
    }
    Ok(())
}

fn render_readout(snap: &cp_sim::Snapshot, half_width: f64) {
    let width = 41usize;
    let frac = ((snap.state.x + half_width) / (2.0 * half_width)).clamp(0.0, 1.0);
    let pos = (frac * (width - 1) as f64).round() as usize;
    let track: String = (0..width)
        .map(|i| if i == pos { 'o' } else { '-' })
        .collect();
    print!(
        "\rt={:>7.2}s  x={:>+7.3} m  θ={:>+8.2}°  F={:>+7.2} N  |{}|",
        snap.time,
        snap.state.x,
        snap.state.wrapped_theta().to_degrees(),
        snap.applied_force,
        track
    );
    let _ = io::stdout().flush();
}
