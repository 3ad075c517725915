use std::path::PathBuf;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use strata_bench::report::{self, Baseline};
use strata_bench::runner::BenchmarkRunner;
use strata_bench::scenes;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;
    let mut iterations = 50usize;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--baseline" => {
                i += 1;
                baseline_path = Some(PathBuf::from(&args[i]));
            }
            "--output" => {
                i += 1;
                output_path = Some(PathBuf::from(&args[i]));
            }
            "--regression-threshold" => {
                i += 1;
                regression_threshold = args[i]
                    .parse()
                    .expect("invalid --regression-threshold value");
            }
            "--iterations" => {
                i += 1;
                iterations = args[i].parse().expect("invalid --iterations value");
            }
            "--help" | "-h" => {
                eprintln!("Usage: bench-runner [OPTIONS]");
                eprintln!("  --baseline <path>              Load baseline JSON for comparison");
                eprintln!("  --output <path>                Save current results as JSON baseline");
                eprintln!(
                    "  --regression-threshold <pct>   Regression threshold percentage (default: 10)"
                );
                eprintln!("  --iterations <n>               Iterations per scene (default: 50)");
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                process::exit(1);
            }
        }
        i += 1;
    }

    let runner = BenchmarkRunner::new(iterations);
    let configs = scenes::standard_scenes();
    let results = runner.run_all(&configs);

    println!("{}", report::format_markdown(&results));

    let mut failed = results.iter().any(|r| !r.meets_target);
    if failed {
        log::warn!("one or more scenes missed the per-chunk meshing target");
    }

    if let Some(path) = &baseline_path {
        match report::load_baseline(path) {
            Some(baseline) => {
                let regressions = report::compare(&results, &baseline, regression_threshold);
                println!("{}", report::format_comparison(&regressions, regression_threshold));
                if !regressions.is_empty() {
                    failed = true;
                }
            }
            None => log::warn!("baseline {} missing or unreadable", path.display()),
        }
    }

    if let Some(path) = &output_path {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let baseline = Baseline { timestamp, results };
        match report::save_baseline(path, &baseline) {
            Ok(()) => log::info!("baseline written to {}", path.display()),
            Err(e) => {
                log::error!("failed to write baseline: {e}");
                failed = true;
            }
        }
    }

    if failed {
        process::exit(1);
    }
}
