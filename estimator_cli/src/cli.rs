//! Command-line parsing for the construction estimator.
//!
//! Argument parsing lives here; `main.rs` only dispatches and prints.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use estimator_core::calculations::{StructureType, WallThickness};
use estimator_core::mix_ratio::ConcreteGrade;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "estimator", version, about = "Construction material and cost estimator")]
pub struct Cli {
    /// JSON rate file to price from (compiled-in defaults when omitted).
    #[arg(long, global = true)]
    pub rates: Option<PathBuf>,

    /// JSON settings file overriding wastage and floor heuristics.
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Print JSON only, without the summary block.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Bricks, cement and sand for a brick wall.
    Wall(WallArgs),
    /// Cement, sand, aggregate and steel for a slab, beam, column or footing.
    Concrete(ConcreteArgs),
    /// Cement and sand for a plaster coat.
    Plaster(PlasterArgs),
    /// Cement, sand and aggregate for a PCC floor bed.
    Flooring(FlooringArgs),
    /// Whole-building budget from a JSON request (file path, or stdin when omitted).
    Budget(BudgetArgs),
    /// Inspect or change the rate catalog.
    #[command(subcommand)]
    Rates(RatesCommand),
}

#[derive(Debug, Args)]
pub struct WallArgs {
    /// Wall length (ft).
    #[arg(long)]
    pub length: f64,

    /// Wall height (ft).
    #[arg(long)]
    pub height: f64,

    /// 9_INCH or 4_INCH.
    #[arg(long, value_parser = parse_wall_thickness, default_value = "9_INCH")]
    pub thickness: WallThickness,

    /// Mortar cement:sand ratio.
    #[arg(long, default_value = "1:6")]
    pub ratio: String,

    #[arg(long, default_value = "")]
    pub label: String,
}

#[derive(Debug, Args)]
pub struct ConcreteArgs {
    /// Length (ft); height for a column.
    #[arg(long)]
    pub length: f64,

    /// Width (ft).
    #[arg(long)]
    pub width: f64,

    /// Thickness or depth (in).
    #[arg(long)]
    pub thickness: f64,

    /// M25, M20, M15 or M10.
    #[arg(long, value_parser = parse_grade, default_value = "M20")]
    pub grade: ConcreteGrade,

    /// Explicit cement:sand:aggregate ratio; overrides --grade.
    #[arg(long)]
    pub ratio: Option<String>,

    /// SLAB, BEAM, COLUMN or FOOTING.
    #[arg(long, value_parser = parse_structure_type, default_value = "SLAB")]
    pub structure: StructureType,

    /// Skip reinforcement steel.
    #[arg(long)]
    pub no_rebar: bool,

    #[arg(long, default_value = "")]
    pub label: String,
}

#[derive(Debug, Args)]
pub struct PlasterArgs {
    /// Surface area (sq ft).
    #[arg(long)]
    pub area: f64,

    /// Coat thickness (mm).
    #[arg(long, default_value_t = 12.0)]
    pub thickness_mm: f64,

    /// Cement:sand ratio.
    #[arg(long, default_value = "1:4")]
    pub ratio: String,

    #[arg(long, default_value = "")]
    pub label: String,
}

#[derive(Debug, Args)]
pub struct FlooringArgs {
    /// Floor area (sq ft).
    #[arg(long)]
    pub area: f64,

    /// Bed thickness (in).
    #[arg(long, default_value_t = 2.0)]
    pub thickness: f64,

    #[arg(long, default_value = "")]
    pub label: String,
}

#[derive(Debug, Args)]
pub struct BudgetArgs {
    /// Request file; reads stdin when omitted or "-".
    pub request: Option<PathBuf>,
}

/// Rate catalog subcommands.
#[derive(Debug, Subcommand)]
pub enum RatesCommand {
    /// List every rate, grouped by category.
    List,
    /// Change one price and write the rate file back.
    Update {
        /// Rate identifier (e.g., CEMENT).
        id: String,
        /// New unit price.
        price: f64,
        /// Name shown to anyone else editing the rate file meanwhile.
        #[arg(long, env = "USER", default_value = "estimator")]
        user: String,
    },
}

fn parse_wall_thickness(s: &str) -> Result<WallThickness, String> {
    WallThickness::from_str_flexible(s).map_err(|e| e.to_string())
}

fn parse_grade(s: &str) -> Result<ConcreteGrade, String> {
    ConcreteGrade::from_str_flexible(s).map_err(|e| e.to_string())
}

fn parse_structure_type(s: &str) -> Result<StructureType, String> {
    StructureType::from_str_flexible(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_wall() {
        let cli = Cli::parse_from(["estimator", "wall", "--length", "10", "--height", "10", "--thickness", "4.5"]);
        match cli.command {
            Command::Wall(args) => {
                assert_eq!(args.thickness, WallThickness::FourAndHalfInch);
                assert_eq!(args.ratio, "1:6");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rates_update_with_global_flags() {
        let cli = Cli::parse_from(["estimator", "rates", "update", "CEMENT", "800", "--rates", "rates.json", "--json"]);
        assert!(cli.json);
        assert_eq!(cli.rates, Some(PathBuf::from("rates.json")));
        assert!(matches!(cli.command, Command::Rates(RatesCommand::Update { price, .. }) if price == 800.0));
    }

    #[test]
    fn test_bad_grade_rejected() {
        let result = Cli::try_parse_from([
            "estimator", "concrete", "--length", "1", "--width", "1", "--thickness", "4", "--grade", "M99",
        ]);
        assert!(result.is_err());
    }
}
