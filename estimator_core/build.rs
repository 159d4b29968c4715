//! Build script: compiles `data/rates.toml` into Rust constants.
//!
//! The default rate catalog is kept as TOML so it can be reviewed and edited
//! without touching code. The generated file lives in `OUT_DIR` and is pulled
//! in by `src/generated.rs`.

use std::collections::HashSet;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RateFile {
    rate: Vec<RateRow>,
}

#[derive(Debug, Deserialize)]
struct RateRow {
    id: String,
    label: String,
    unit: String,
    category: String,
    price: f64,
}

fn category_variant(category: &str) -> &'static str {
    match category {
        "MATERIAL" => "RateCategory::Material",
        "LABOR" => "RateCategory::Labor",
        "OVERHEAD" => "RateCategory::Overhead",
        other => panic!("rates.toml: unknown category '{}'", other),
    }
}

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let source = Path::new(&manifest_dir).join("data").join("rates.toml");
    println!("cargo:rerun-if-changed={}", source.display());

    let text = fs::read_to_string(&source)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", source.display(), e));
    let table: RateFile =
        toml::from_str(&text).unwrap_or_else(|e| panic!("invalid rates.toml: {}", e));

    let mut seen = HashSet::new();
    let mut out = String::new();
    out.push_str("// @generated by build.rs from data/rates.toml. Do not edit.\n\n");
    out.push_str("pub const DEFAULT_RATES: &[RateSeed] = &[\n");
    for row in &table.rate {
        if !seen.insert(row.id.clone()) {
            panic!("rates.toml: duplicate rate id '{}'", row.id);
        }
        if !row.price.is_finite() || row.price < 0.0 {
            panic!("rates.toml: rate '{}' has invalid price {}", row.id, row.price);
        }
        writeln!(
            out,
            "    RateSeed {{ id: {:?}, label: {:?}, unit: {:?}, category: {}, price: {:?} }},",
            row.id,
            row.label,
            row.unit,
            category_variant(&row.category),
            row.price,
        )
        .expect("writing to a String cannot fail");
    }
    out.push_str("];\n");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let dest = Path::new(&out_dir).join("rate_data.rs");
    fs::write(&dest, out).unwrap_or_else(|e| panic!("failed to write {}: {}", dest.display(), e));
}
