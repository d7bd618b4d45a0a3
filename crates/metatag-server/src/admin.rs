//! Offline admin commands: snapshot import, store validation and one-off
//! resolution from the command line.

use std::path::Path;

use anyhow::Context;
use tracing::{error, info};

use metatag_core::MetatagConfig;
use metatag_store::{ContentSnapshot, ImportReport, SqliteStore, StoreStats};

use crate::state::AppState;

/// Result of checking a data directory.
#[derive(Debug)]
pub struct ValidationReport {
    pub db_valid: bool,
    pub stats: Option<StoreStats>,
    /// Rules whose stored domain list cannot be parsed.
    pub malformed_rules: Vec<i64>,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.db_valid && self.errors.is_empty() && self.malformed_rules.is_empty()
    }
}

/// Load a content snapshot file into the store under `data_dir`.
pub fn run_import(snapshot_path: &Path, data_dir: &Path) -> anyhow::Result<ImportReport> {
    let raw = std::fs::read_to_string(snapshot_path)
        .with_context(|| format!("Failed to read {}", snapshot_path.display()))?;
    let snapshot: ContentSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid snapshot {}", snapshot_path.display()))?;

    let config = MetatagConfig::from_env(data_dir)?;
    let store = SqliteStore::open(&config.data_paths.db)
        .map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))?;

    info!("Importing {} into {}", snapshot_path.display(), store.db_path().display());
    let report = store
        .import_snapshot(&snapshot, &config.base_url)
        .map_err(|e| anyhow::anyhow!("Import failed: {}", e))?;
    Ok(report)
}

/// Validate the store under `data_dir` without creating one.
pub fn validate(data_dir: &Path) -> ValidationReport {
    let mut report = ValidationReport {
        db_valid: false,
        stats: None,
        malformed_rules: Vec::new(),
        errors: Vec::new(),
    };

    let db_dir = data_dir.join("db");
    let db_path = db_dir.join("metatag.db");
    if !db_path.exists() {
        report
            .errors
            .push(format!("Database not found: {}", db_path.display()));
        return report;
    }

    let store = match SqliteStore::open(&db_dir) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open store: {}", e);
            report.errors.push(format!("Failed to open database: {}", e));
            return report;
        }
    };
    report.db_valid = true;

    match store.get_stats() {
        Ok(stats) => report.stats = Some(stats),
        Err(e) => report.errors.push(format!("Failed to read stats: {}", e)),
    }
    match store.malformed_rule_ids() {
        Ok(ids) => report.malformed_rules = ids,
        Err(e) => report.errors.push(format!("Failed to scan rules: {}", e)),
    }

    report
}

/// Resolve one path offline and render the result as pretty JSON.
pub fn resolve_once(
    data_dir: &Path,
    path: &str,
    language: Option<&str>,
    domain: Option<&str>,
) -> anyhow::Result<String> {
    let config = MetatagConfig::from_env(data_dir)?;
    let store = SqliteStore::open(&config.data_paths.db)
        .map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))?;
    let state = AppState::new(config, store);

    let ctx = state.request_context(path, language, domain.unwrap_or_default());
    let resolution = state.resolve(&ctx);
    Ok(serde_json::to_string_pretty(&resolution)?)
}

pub fn print_import_report(report: &ImportReport) {
    println!("=== Metatag Import Report ===");
    println!();
    println!("Assets:             {}", report.assets);
    println!("Reference fields:   {}", report.fields);
    println!("Taxonomy terms:     {}", report.terms);
    println!("Content items:      {}", report.content_items);
    println!("Term references:    {}", report.references);
    println!("Override rules:     {}", report.rules);
    println!("Metadata records:   {}", report.records);

    if !report.skipped.is_empty() {
        println!();
        println!("Skipped:");
        for s in &report.skipped {
            println!("  - {}", s);
        }
    }
}

pub fn print_validation_report(report: &ValidationReport) {
    println!("=== Metatag Store Report ===");
    println!();
    println!("Database valid:     {}", if report.db_valid { "YES" } else { "NO" });
    if let Some(stats) = &report.stats {
        println!("Database:           {}", stats.db_path);
        println!("Rules:              {} ({} active)", stats.total_rules, stats.active_rules);
        println!("Metadata records:   {}", stats.entity_records);
        println!("Content items:      {}", stats.content_items);
        println!("Taxonomy terms:     {}", stats.taxonomy_terms);
        println!("Assets:             {}", stats.assets);
        println!("Reference fields:   {}", stats.reference_fields);
    }

    if !report.malformed_rules.is_empty() {
        println!();
        println!("Rules with malformed domain lists (ignored during resolution):");
        for id in &report.malformed_rules {
            println!("  - rule {}", id);
        }
    }

    if !report.errors.is_empty() {
        println!();
        println!("Errors:");
        for e in &report.errors {
            println!("  - {}", e);
        }
    }

    println!();
    if report.is_ok() {
        println!("Status: OK");
    } else {
        println!("Status: PROBLEMS FOUND");
    }
}
