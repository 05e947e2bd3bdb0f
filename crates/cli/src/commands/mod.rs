pub mod build;
pub mod init;
pub mod preview;
pub mod show;
pub mod validate;

use anyhow::{Context, Result};
use blog_kit_core::config::{SITE_TOML, normalize_base, parse_site_toml};
use blog_kit_core::{BuildOptions, SiteConfig};
use std::path::Path;

/// Load site.toml from a site directory with user-facing errors
pub fn load_site(path: &Path) -> Result<SiteConfig> {
    if !path.exists() {
        anyhow::bail!(
            "Site directory does not exist: {}\nRun 'blog-kit init {}' first",
            path.display(),
            path.display()
        );
    }

    let site_toml_path = path.join(SITE_TOML);
    if !site_toml_path.exists() {
        anyhow::bail!(
            "{} not found in {}\nRun 'blog-kit init {}' first",
            SITE_TOML,
            path.display(),
            path.display()
        );
    }

    parse_site_toml(&site_toml_path).with_context(|| format!("Failed to parse {}", SITE_TOML))
}

/// Turn the `--base` flag into build options
pub fn build_options(base: Option<String>) -> Result<BuildOptions> {
    let base = base
        .as_deref()
        .map(normalize_base)
        .transpose()
        .context("Invalid --base")?;
    Ok(BuildOptions { base })
}
