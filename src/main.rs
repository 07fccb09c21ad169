use std::io;

use fdfe_bench::config::BenchmarkConfig;
use fdfe_bench::report::BenchmarkReport;
use fdfe_bench::scenario::{benchmark_problem, RadiusSquared};
use fdfe_bench::solver::benchmark::ErrorBenchmark;
use tracing::{info, info_span};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    // fdfe-bench [config.json]
    let config = match std::env::args().nth(1) {
        Some(path) => BenchmarkConfig::from_json_file(path)?,
        None => BenchmarkConfig::default(),
    };

    let problem = benchmark_problem();
    let reference = RadiusSquared;
    let mut report = BenchmarkReport::new(&config);

    let run_span = info_span!("benchmark", trials = config.num_trials).entered();
    let start_time = std::time::Instant::now();

    for &method in &config.methods {
        let results = ErrorBenchmark::new(config.domain, &problem, &reference, method, config.num_trials)?
            .with_lu_options(config.lu)
            .with_failure_policy(config.on_failure)
            .run(&config.exponents)?;
        report.push(method, &results);
    }

    info!("Benchmark finished in {:.2}s", start_time.elapsed().as_secs_f64());
    drop(run_span);

    report.write_json(io::stdout().lock())?;
    println!();
    Ok(())
}
