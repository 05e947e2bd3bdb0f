use super::validate::print_report;
use super::{build_options, load_site};
use anyhow::{Context, Result};
use blog_kit_core::config::PUBLIC_DIR;
use blog_kit_generator::generate_site;
use blog_kit_validator::validate_site;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Write the generator configuration, the shell page and public assets
pub async fn run(path: PathBuf, output: PathBuf, base: Option<String>) -> Result<()> {
    println!("🔨 Building site configuration...");
    println!("   Source: {}", path.display());
    println!("   Output: {}", output.display());
    println!();

    let options = build_options(base)?;
    let config = load_site(&path)?;

    println!("✓ Loaded: {}", config.title);
    println!("  Language: {}", config.language);
    println!("  Base: {}", options.effective_base(&config));
    println!();

    let public_dir = path.join(PUBLIC_DIR);
    if public_dir.exists() && resolve_path(&output)?.starts_with(public_dir.canonicalize()?) {
        anyhow::bail!(
            "Output directory {} is inside {}, choose a path outside the public assets",
            output.display(),
            public_dir.display()
        );
    }

    println!("🔎 Validating...");
    let report = validate_site(&config, &path);
    print_report(&report);
    if !report.is_ok() {
        anyhow::bail!(
            "Validation failed with {} error(s), nothing was written",
            report.errors.len()
        );
    }
    println!("   ✓ No errors");

    println!("📁 Creating output directory...");
    fs::create_dir_all(&output).context("Failed to create output directory")?;

    println!("📄 Generating files...");
    let site = generate_site(&config, &options)?;
    for (name, html) in &site.pages {
        fs::write(output.join(name), html).with_context(|| format!("Failed to write {}", name))?;
        println!("   ✓ Generated {}", name);
    }
    for (name, data) in &site.assets {
        fs::write(output.join(name), data).with_context(|| format!("Failed to write {}", name))?;
        println!("   ✓ Generated {}", name);
    }

    println!("🎨 Copying public assets...");
    let generated: Vec<&str> = site
        .pages
        .iter()
        .map(|(name, _)| name.as_str())
        .chain(site.assets.iter().map(|(name, _)| name.as_str()))
        .collect();
    let copied = copy_public(&public_dir, &output, &generated)?;
    println!("   ✓ Copied {} file(s)", copied);

    println!();
    println!("✅ Build complete!");
    println!("   Output: {}", output.display());
    println!();

    Ok(())
}

/// Absolute form of `path` with symlinks resolved, for a path that may not exist yet
fn resolve_path(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut existing = absolute.as_path();
    let mut rest = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }

    let mut resolved = existing.canonicalize()?;
    for name in rest.iter().rev() {
        resolved.push(name);
    }
    Ok(resolved)
}

/// Copy everything under `public_dir` into `output`, keeping relative paths.
/// Files named like a generated output are skipped with a warning.
fn copy_public(public_dir: &Path, output: &Path, generated: &[&str]) -> Result<usize> {
    if !public_dir.exists() {
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(public_dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(public_dir)?;
        if generated.iter().any(|name| relative == Path::new(name)) {
            eprintln!(
                "   ⚠ Skipping {}: it would overwrite a generated file",
                entry.path().display()
            );
            continue;
        }
        let dst = output.join(relative);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &dst)
            .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
        copied += 1;
    }

    Ok(copied)
}
