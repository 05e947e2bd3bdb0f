use super::load_site;
use blog_kit_validator::{ValidationReport, validate_site};
use std::path::PathBuf;

pub async fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating site at: {}", path.display());

    let config = load_site(&path)?;

    println!("✓ site.toml valid");
    println!("  Site: {} ({})", config.title, config.language);
    println!("  Nav entries: {}", config.theme.nav.len());

    let report = validate_site(&config, &path);
    print_report(&report);

    if !report.is_ok() {
        anyhow::bail!("Validation failed with {} error(s)", report.errors.len());
    }

    println!("\n✅ Site is valid");
    Ok(())
}

/// Print a validation report, errors and warnings to stderr
pub fn print_report(report: &ValidationReport) {
    for line in &report.info {
        println!("  {}", line);
    }
    for warning in &report.warnings {
        eprintln!("  ⚠ {}", warning);
    }
    for error in &report.errors {
        eprintln!("  ✗ {}", error);
    }
}
