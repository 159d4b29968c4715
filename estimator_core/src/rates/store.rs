//! # Rate File Storage
//!
//! A rate file is a JSON snapshot of a [`RateCatalog`] shared by everyone
//! who maintains prices. Two rules keep it consistent:
//!
//! - saves go to `<file>.tmp` and are renamed into place, so a reader sees
//!   either the old file or the new one
//! - a price change is a read-modify-write cycle done while holding a
//!   [`RateFileGuard`], so two editors cannot lose each other's update
//!
//! The estimation engine itself never touches the file; callers load a
//! catalog once and hand snapshots to the calculators.
//!
//! ## Example
//!
//! ```rust,no_run
//! use estimator_core::rates::store::{load_catalog, update_rate_file};
//! use estimator_core::rates::ids;
//! use std::path::Path;
//!
//! let path = Path::new("rates.json");
//! let entry = update_rate_file(path, ids::CEMENT, 780.0, "site-office")?;
//! assert_eq!(load_catalog(path)?.get(ids::CEMENT)?.price, entry.price);
//! # Ok::<(), estimator_core::errors::CalcError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{RateCatalog, RateEntry};
use crate::errors::{CalcError, CalcResult};

/// Rate file layout version written by this crate
pub const SCHEMA_VERSION: &str = "0.1.0";

/// On-disk layout of a rate file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateFile {
    pub version: String,
    pub saved_at: DateTime<Utc>,
    pub rates: Vec<RateEntry>,
}

/// Exclusive hold on a rate file for one read-modify-write cycle.
///
/// The OS lock sits on a `<file>.guard` companion that is never deleted, so
/// every editor locks the same inode. The guard records who holds it; a
/// refused editor gets that name back in [`CalcError::FileLocked`].
/// Dropping the guard releases the lock.
#[derive(Debug)]
pub struct RateFileGuard {
    rates_path: PathBuf,
    file: File,
}

impl RateFileGuard {
    /// Take the guard or fail at once with [`CalcError::FileLocked`].
    pub fn acquire(rates_path: &Path, holder: &str) -> CalcResult<Self> {
        let guard_path = guard_path_for(rates_path);
        let guard_error = |op: &str, e: io::Error| CalcError::file_error(op, guard_path.display().to_string(), e.to_string());

        // the holder's record stays intact until the lock is ours
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&guard_path)
            .map_err(|e| guard_error("open guard", e))?;

        if file.try_lock_exclusive().is_err() {
            let mut record = String::new();
            let _ = file.read_to_string(&mut record);
            let (held_by, since) = parse_holder(&record);
            return Err(CalcError::file_locked(rates_path.display().to_string(), held_by, since));
        }

        record_holder(&mut file, holder).map_err(|e| guard_error("record holder", e))?;

        debug!(path = %rates_path.display(), holder, "rate file guard taken");
        Ok(RateFileGuard {
            rates_path: rates_path.to_path_buf(),
            file,
        })
    }

    /// The rate file this guard protects
    pub fn rates_path(&self) -> &Path {
        &self.rates_path
    }
}

impl Drop for RateFileGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn record_holder(file: &mut File, holder: &str) -> io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    writeln!(file, "{}\t{}", holder, Utc::now().to_rfc3339())?;
    file.sync_data()
}

/// `holder\tsince` as written by [`record_holder`].
fn parse_holder(record: &str) -> (String, String) {
    match record.trim().split_once('\t') {
        Some((holder, since)) if !holder.is_empty() => (holder.to_string(), since.to_string()),
        _ => ("another editor".to_string(), "unknown".to_string()),
    }
}

fn guard_path_for(rates_path: &Path) -> PathBuf {
    with_suffix(rates_path, ".guard")
}

fn tmp_path_for(rates_path: &Path) -> PathBuf {
    with_suffix(rates_path, ".tmp")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Change one price in a rate file.
///
/// Holds the [`RateFileGuard`] across load, update and save. A missing file
/// starts from the compiled-in defaults and is created.
pub fn update_rate_file(path: &Path, id: &str, price: f64, holder: &str) -> CalcResult<RateEntry> {
    let _guard = RateFileGuard::acquire(path, holder)?;

    let catalog = if path.exists() {
        load_catalog(path)?
    } else {
        info!(path = %path.display(), "rate file not found, seeding from defaults");
        RateCatalog::with_defaults()
    };
    let entry = catalog.update(id, price)?;
    save_catalog(&catalog, path)?;
    Ok(entry)
}

/// Write a catalog to `path` atomically.
pub fn save_catalog(catalog: &RateCatalog, path: &Path) -> CalcResult<()> {
    let file = RateFile {
        version: SCHEMA_VERSION.to_string(),
        saved_at: Utc::now(),
        rates: catalog.list(),
    };
    let json = serde_json::to_vec_pretty(&file).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;

    replace_file(path, &json)
        .map_err(|e| CalcError::file_error("save rates", path.display().to_string(), e.to_string()))?;

    info!(path = %path.display(), rates = file.rates.len(), "rate file saved");
    Ok(())
}

/// Write `contents` beside `path`, flush it to disk, then rename over `path`.
fn replace_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let tmp_path = tmp_path_for(path);
    let written = File::create(&tmp_path)
        .and_then(|mut tmp| tmp.write_all(contents).and_then(|_| tmp.sync_all()))
        .and_then(|_| fs::rename(&tmp_path, path));
    if written.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    written
}

/// Read a catalog from a rate file.
///
/// Fails with [`CalcError::VersionMismatch`] for files from an incompatible
/// layout, [`CalcError::SerializationError`] for invalid JSON and
/// [`CalcError::InvalidRate`] when a stored price is negative.
pub fn load_catalog(path: &Path) -> CalcResult<RateCatalog> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("load rates", path.display().to_string(), e.to_string()))?;

    let file: RateFile = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid rate file {}: {}", path.display(), e),
    })?;
    check_schema(&file.version)?;

    debug!(path = %path.display(), rates = file.rates.len(), "rate file loaded");
    RateCatalog::from_entries(file.rates)
}

/// Same major version, and a minor no newer than ours.
fn check_schema(found: &str) -> CalcResult<()> {
    fn major_minor(version: &str) -> Option<(u32, u32)> {
        let mut parts = version.split('.');
        Some((parts.next()?.parse().ok()?, parts.next()?.parse().ok()?))
    }

    match (major_minor(found), major_minor(SCHEMA_VERSION)) {
        (Some((major, minor)), Some((ours_major, ours_minor))) if major == ours_major && minor <= ours_minor => Ok(()),
        _ => Err(CalcError::VersionMismatch {
            file_version: found.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        }),
    }
}
