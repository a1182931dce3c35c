//! Demo entry point — evaluates one scenario and prints the financial report.

use std::path::Path;
use std::process;

use solar_econ::config::ScenarioConfig;
use solar_econ::dispatch::simulate;
use solar_econ::io::export::export_trace_csv;
use solar_econ::oracle::{ClearSkyOracle, GenerationOracle};
use solar_econ::runner::{RunOptions, run};
use solar_econ::series::GenerationSeries;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    trace_out: Option<String>,
}

fn print_help() {
    eprintln!("solar-econ — solar project economics evaluator");
    eprintln!();
    eprintln!("Usage: solar-econ [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>    Load scenario from TOML config file");
    eprintln!("  --trace-out <path>   Export the dispatch trace to CSV");
    eprintln!("  --help               Show this help message");
    eprintln!();
    eprintln!("If no --scenario is given, the built-in baseline scenario is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        trace_out: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--trace-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --trace-out requires a path argument");
                    process::exit(1);
                }
                cli.trace_out = Some(args[i].clone());
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = parse_args();

    let scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    let site = scenario.build_site();
    let system = scenario.build_system();
    let tariff = scenario.build_tariff();
    let demand = match scenario.build_demand() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    let oracle = ClearSkyOracle::new();
    let options = RunOptions {
        oracle: &oracle,
        site,
        projection: scenario.projection(),
    };

    let report = match run(&demand, &system, &tariff, scenario.capital_cost(), &options) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    println!("{report}");

    if let Some(ref path) = cli.trace_out {
        let trace = oracle
            .generate(&options.site, system.panel_kw, demand.timestamps())
            .and_then(|values| GenerationSeries::for_demand(&demand, values))
            .and_then(|generation| simulate(&demand, &generation, &system));
        match trace {
            Ok(trace) => {
                if let Err(e) = export_trace_csv(&trace, Path::new(path)) {
                    eprintln!("error: failed to write CSV: {e}");
                    process::exit(1);
                }
                eprintln!("Dispatch trace written to {path}");
            }
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        }
    }
}
