//! Simple validation example: check a diagram snapshot and print results.

use wirecheck::prelude::*;
use std::path::Path;

fn main() -> Result<(), WireCheckError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/mismatched_page.json".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example simple_validation [path/to/snapshot.json]");
        std::process::exit(1);
    }

    let result = WireCheckCore::default().check_snapshot(path)?;

    println!("DRC results for: {}", result.file.display());
    println!(
        "Checked {} wires, skipped {} dangling",
        result.stats.connections_checked, result.stats.connections_skipped
    );
    println!("Total issues: {}", result.total_issues());
    println!();

    for issue in result.report.issues() {
        let label = match issue.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        println!("  {} [{}] {}", label, issue.connection_id, issue.message);
    }

    if result.has_errors() {
        println!("\nDRC failed.");
        std::process::exit(1);
    }

    println!("\nDRC passed.");
    Ok(())
}
