//! # Estimator CLI
//!
//! Command-line front end for `estimator_core`: element calculators, the
//! whole-building budget and rate catalog maintenance.
//!
//! Every command prints a short summary followed by the JSON result, or
//! JSON only with `--json`. Logs go to stderr and are filtered by `RUST_LOG`.

mod cli;

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use estimator_core::budget::{self, BudgetInput, EstimationResult};
use estimator_core::calculations::{
    concrete, flooring, plaster, wall, ConcreteInput, FlooringInput, PlasterInput, WallInput,
};
use estimator_core::rates::{RateCatalog, RateEntry};
use estimator_core::{load_catalog, update_rate_file, CalcError, CalcResult, EstimatorSettings};

use cli::{Cli, Command, RatesCommand};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "estimator_cli=info,estimator_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> CalcResult<()> {
    match &cli.command {
        Command::Wall(args) => {
            let input = WallInput {
                label: args.label.clone(),
                length_ft: args.length,
                height_ft: args.height,
                thickness: args.thickness,
                ratio: args.ratio.clone(),
            };
            let result = wall::calculate(&input)?;
            emit(cli.json, &result, || {
                banner("WALL");
                println!("  {} x {} ft, {}, mortar {}", input.length_ft, input.height_ft, input.thickness, input.ratio);
                println!();
                println!("  Bricks:       {}", result.bricks);
                println!("  Cement:       {} bags", result.cement_bags);
                println!("  Sand:         {:.1} cft ({:.2} m3)", result.sand_cft, result.sand_m3);
            })
        }
        Command::Concrete(args) => {
            let input = ConcreteInput {
                label: args.label.clone(),
                length_ft: args.length,
                width_ft: args.width,
                thickness_in: args.thickness,
                grade: args.grade,
                ratio: args.ratio.clone(),
                structure_type: args.structure,
                include_rebar: !args.no_rebar,
            };
            let result = concrete::calculate(&input)?;
            emit(cli.json, &result, || {
                banner("CONCRETE");
                println!("  {} {} x {} ft x {} in, mix {}", result.structure_type, input.length_ft, input.width_ft, input.thickness_in, result.mix);
                println!();
                println!("  Volume:       {:.2} m3 ({:.2} cft)", result.volume_m3, result.volume_cft);
                println!("  Cement:       {} bags", result.cement_bags);
                println!("  Sand:         {:.2} cft", result.sand_cft);
                println!("  Aggregate:    {:.2} cft", result.aggregate_cft);
                println!("  Steel:        {:.2} kg", result.rebar_kg);
            })
        }
        Command::Plaster(args) => {
            let input = PlasterInput {
                label: args.label.clone(),
                area_sqft: args.area,
                thickness_mm: args.thickness_mm,
                ratio: args.ratio.clone(),
            };
            let result = plaster::calculate(&input)?;
            emit(cli.json, &result, || {
                banner("PLASTER");
                println!("  {} sqft at {} mm, mix {}", input.area_sqft, input.thickness_mm, input.ratio);
                println!();
                println!("  Cement:       {} bags", result.cement_bags);
                println!("  Sand:         {:.2} cft", result.sand_cft);
            })
        }
        Command::Flooring(args) => {
            let input = FlooringInput {
                label: args.label.clone(),
                area_sqft: args.area,
                thickness_in: args.thickness,
            };
            let result = flooring::calculate(&input)?;
            emit(cli.json, &result, || {
                banner("FLOORING (PCC 1:2:4)");
                println!("  {} sqft at {} in", input.area_sqft, input.thickness_in);
                println!();
                println!("  Cement:       {} bags", result.cement_bags);
                println!("  Sand:         {:.2} cft", result.sand_cft);
                println!("  Aggregate:    {:.2} cft", result.aggregate_cft);
            })
        }
        Command::Budget(args) => {
            let request = read_request(args.request.as_deref())?;
            let input: BudgetInput = serde_json::from_str(&request).map_err(|e| CalcError::SerializationError {
                reason: format!("Invalid budget request: {}", e),
            })?;
            let settings = read_settings(cli.settings.as_deref())?;
            let catalog = open_catalog(cli.rates.as_deref())?;

            let result = budget::calculate_with(&input, &catalog.snapshot(), &settings)?;
            emit(cli.json, &result, || print_budget(&result))
        }
        Command::Rates(RatesCommand::List) => {
            let catalog = open_catalog(cli.rates.as_deref())?;
            let rates = catalog.list();
            emit(cli.json, &rates, || print_rates(&rates))
        }
        Command::Rates(RatesCommand::Update { id, price, user }) => {
            let updated = match cli.rates.as_deref() {
                Some(path) => update_rate_file(path, id, *price, user)?,
                None => {
                    warn!("no --rates file given, the change is not saved");
                    RateCatalog::with_defaults().update(id, *price)?
                }
            };
            emit(cli.json, &updated, || {
                banner("RATE UPDATED");
                print_rates(std::slice::from_ref(&updated));
            })
        }
    }
}

/// Print the summary block (unless JSON-only) and the JSON result.
fn emit<T: Serialize>(json_only: bool, value: &T, summary: impl FnOnce()) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;

    if !json_only {
        summary();
        println!();
        println!("JSON Output:");
    }
    println!("{}", json);
    Ok(())
}

fn banner(title: &str) {
    println!("═══════════════════════════════════════");
    println!("  {}", title);
    println!("═══════════════════════════════════════");
}

fn print_budget(result: &EstimationResult) {
    let q = &result.quantities;
    let t = &result.totals;
    let s = &result.summary;

    banner("BUDGET ESTIMATE");
    println!("  {} floor(s), {:.0} sqft, {} quality", s.floors, s.total_area_sqft, s.quality);
    println!("  {} rooms, {} doors, {} windows", s.rooms, s.doors, s.windows);
    println!("  Duration:     ~{} months", s.duration_months);
    println!();
    println!("Materials (incl. wastage):");
    println!("  Cement:       {} bags", q.cement_bags);
    println!("  Sand:         {:.2} cft", q.sand_cft);
    println!("  Aggregate:    {:.2} cft", q.aggregate_cft);
    println!("  Bricks:       {}", q.bricks);
    println!("  Steel:        {:.2} kg", q.rod_kg);
    println!();
    println!("Costs:");
    println!("  Structure:    {:>14.2}", t.structure);
    println!("  MEP:          {:>14.2}", t.mep);
    println!("  Finishing:    {:>14.2}", t.finishing);
    println!("  TOTAL:        {:>14.2}", t.all);
}

fn print_rates(rates: &[RateEntry]) {
    for rate in rates {
        println!(
            "  {:<20} {:<28} {:>10.2} / {:<5} [{}]",
            rate.id,
            rate.label,
            rate.price,
            rate.unit,
            rate.category.display_name()
        );
    }
}

/// Catalog from a rate file, or the compiled-in defaults.
fn open_catalog(path: Option<&Path>) -> CalcResult<RateCatalog> {
    match path {
        Some(path) if path.exists() => load_catalog(path),
        Some(path) => {
            info!(path = %path.display(), "rate file not found, starting from defaults");
            Ok(RateCatalog::with_defaults())
        }
        None => Ok(RateCatalog::with_defaults()),
    }
}

fn read_settings(path: Option<&Path>) -> CalcResult<EstimatorSettings> {
    let Some(path) = path else {
        return Ok(EstimatorSettings::default());
    };
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read settings", path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid settings in {}: {}", path.display(), e),
    })
}

fn read_request(path: Option<&Path>) -> CalcResult<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read request", path.display().to_string(), e.to_string())),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| CalcError::file_error("read request", "<stdin>", e.to_string()))?;
            Ok(buffer)
        }
    }
}
