use crate::error::{Error, Result};
use crate::types::*;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Configuration file at the root of a site directory
pub const SITE_TOML: &str = "site.toml";
/// Markdown content, one page per route
pub const CONTENT_DIR: &str = "docs";
/// Static files served from the site root (`/favicon.ico` -> `public/favicon.ico`)
pub const PUBLIC_DIR: &str = "public";

/// Raw TOML configuration structure
/// This matches the site.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    lang: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    last_updated: bool,
    base: Option<String>,
    #[serde(default)]
    head: Vec<HeadTag>,
    theme: RawThemeConfig,
}

#[derive(Debug, Deserialize)]
struct RawThemeConfig {
    logo: Option<String>,
    return_to_top_label: String,
    sidebar_menu_label: String,
    last_updated_text: String,
    outline: RawOutline,
    #[serde(default)]
    nav: Vec<NavEntry>,
    #[serde(default)]
    social_links: Vec<SocialLink>,
}

#[derive(Debug, Deserialize)]
struct RawOutline {
    levels: Vec<u8>, // Collapsed into a set after range checks
    label: String,
}

/// Parse site.toml from a file path
pub fn parse_site_toml<P: AsRef<Path>>(path: P) -> Result<SiteConfig> {
    let content = fs::read_to_string(path)?;
    parse_site_toml_str(&content)
}

/// Parse site.toml from a string (useful for testing)
pub fn parse_site_toml_str(content: &str) -> Result<SiteConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    let base = raw.base.as_deref().map(normalize_base).transpose()?;

    for (i, tag) in raw.head.iter().enumerate() {
        if tag.tag.trim().is_empty() || !tag.tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::ConfigParse(format!(
                "Invalid tag name in 'head[{}]': '{}'",
                i, tag.tag
            )));
        }
        if let Some(path) = tag.asset_path() {
            validate_site_path(path, &format!("head[{}]", i))?;
        }
    }

    let logo = if let Some(logo) = raw.theme.logo {
        Some(validate_site_path(&logo, "theme.logo")?)
    } else {
        None
    };

    let levels = outline_levels(&raw.theme.outline.levels)?;

    for entry in &raw.theme.nav {
        for link in entry.links() {
            validate_link(&link.link, &format!("theme.nav '{}'", link.text))?;
        }
    }

    for social in &raw.theme.social_links {
        if !is_external_link(&social.link) {
            return Err(Error::ConfigParse(format!(
                "Social link '{}' must be an absolute URL: '{}'",
                social.icon, social.link
            )));
        }
    }

    Ok(SiteConfig {
        language: raw.lang,
        title: raw.title,
        description: raw.description,
        last_updated: raw.last_updated,
        base,
        head: raw.head,
        theme: ThemeConfig {
            logo,
            return_to_top_label: raw.theme.return_to_top_label,
            sidebar_menu_label: raw.theme.sidebar_menu_label,
            last_updated_text: raw.theme.last_updated_text,
            outline: Outline {
                levels,
                label: raw.theme.outline.label,
            },
            nav: raw.theme.nav,
            social_links: raw.theme.social_links,
        },
    })
}

impl SiteConfig {
    /// Serialize back into the site.toml layout
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Write `config` as site.toml inside `dir`
pub fn write_site_toml(dir: &Path, config: &SiteConfig) -> Result<()> {
    fs::write(dir.join(SITE_TOML), config.to_toml_string()?)?;
    Ok(())
}

/// Normalize a deployment base path to `/segment/.../`.
///
/// `""` and `"/"` both mean the site root. Parent directory references and
/// full URLs are rejected.
pub fn normalize_base(base: &str) -> Result<String> {
    let trimmed = base.trim().trim_matches('/');

    if trimmed.contains("://") {
        return Err(Error::ConfigParse(format!(
            "Base must be a path, not a URL: '{}'",
            base
        )));
    }

    if trimmed.is_empty() {
        return Ok("/".to_string());
    }

    if trimmed.split('/').any(|segment| segment == ".." || segment.is_empty()) {
        return Err(Error::ConfigParse(format!("Invalid base path: '{}'", base)));
    }

    Ok(format!("/{}/", trimmed))
}

/// Validate a path served from the site root (logo, favicon, ...).
///
/// Site paths are resolved against `public/`, so they must start with `/`
/// and must not climb out of it with `..`.
fn validate_site_path(path: &str, field_name: &str) -> Result<String> {
    if path.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    if !path.starts_with('/') {
        return Err(Error::ConfigParse(format!(
            "Site paths must start with '/' in '{}': '{}'",
            field_name, path
        )));
    }

    if path.split('/').any(|segment| segment == "..") {
        return Err(Error::ConfigParse(format!(
            "Parent directory references (..) not allowed in '{}': '{}'",
            field_name, path
        )));
    }

    Ok(path.to_string())
}

/// Check the shape of a nav link.
///
/// Empty links pass here and are reported by the validator together with
/// the other content problems.
fn validate_link(link: &str, field_name: &str) -> Result<()> {
    if link.is_empty() || is_external_link(link) {
        return Ok(());
    }

    if link.contains("://") {
        return Err(Error::ConfigParse(format!(
            "Unsupported link scheme in {}: '{}'",
            field_name, link
        )));
    }

    validate_site_path(link, field_name).map(|_| ())
}

fn outline_levels(levels: &[u8]) -> Result<BTreeSet<u8>> {
    if levels.is_empty() {
        return Err(Error::ConfigParse(
            "theme.outline.levels must list at least one heading level".to_string(),
        ));
    }

    if let Some(level) = levels.iter().find(|l| !(1..=6).contains(*l)) {
        return Err(Error::ConfigParse(format!(
            "Heading level {} in theme.outline.levels is outside 1-6",
            level
        )));
    }

    Ok(levels.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::produce_configuration;

    const MINIMAL: &str = r##"
lang = "en-us"
title = "Test Blog"
last_updated = false

[[head]]
tag = "link"
attrs = { rel = "icon", href = "/favicon.ico" }

[theme]
logo = "/logo.png"
return_to_top_label = "Top"
sidebar_menu_label = "Menu"
last_updated_text = "Updated"

[theme.outline]
levels = [3, 2, 2]
label = "On this page"

[[theme.nav]]
text = "Home"
link = "/"

[[theme.nav]]
text = "Notes"
items = [
    { text = "Rust", link = "/notes/rust" },
    { text = "Go", link = "/notes/go/" },
]

[[theme.social_links]]
icon = "github"
link = "https://github.com/example"
"##;

    fn with_replaced(from: &str, to: &str) -> String {
        assert!(MINIMAL.contains(from), "fixture does not contain '{}'", from);
        MINIMAL.replace(from, to)
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_site_toml_str(MINIMAL).unwrap();
        assert_eq!(config.language, "en-us");
        assert_eq!(config.title, "Test Blog");
        assert_eq!(config.description, "");
        assert_eq!(config.base, None);
        assert_eq!(config.theme.outline.levels, BTreeSet::from([2, 3]));
        assert_eq!(config.theme.nav.len(), 2);
        assert!(matches!(config.theme.nav[0], NavEntry::Leaf(_)));
        match &config.theme.nav[1] {
            NavEntry::Group(group) => {
                assert_eq!(group.text, "Notes");
                assert_eq!(group.items[1].link, "/notes/go/");
            }
            NavEntry::Leaf(_) => panic!("expected a group"),
        }
    }

    #[test]
    fn test_head_attrs_keep_file_order() {
        let config = parse_site_toml_str(MINIMAL).unwrap();
        let keys: Vec<&str> = config.head[0].attrs.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["rel", "href"]);
    }

    #[test]
    fn test_builtin_config_survives_toml() {
        let config = produce_configuration();
        let toml = config.to_toml_string().unwrap();
        assert!(toml.contains("lang = \"zh-cn\""));
        assert_eq!(parse_site_toml_str(&toml).unwrap(), config);
    }

    #[test]
    fn test_parse_rejects_logo_traversal() {
        let result = parse_site_toml_str(&with_replaced("/logo.png", "/../secret.png"));
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Parent directory references"));
        assert!(message.contains("theme.logo"));
    }

    #[test]
    fn test_parse_rejects_relative_logo() {
        let result = parse_site_toml_str(&with_replaced("/logo.png", "logo.png"));
        assert!(result.unwrap_err().to_string().contains("must start with '/'"));
    }

    #[test]
    fn test_parse_rejects_nav_link_traversal() {
        let result = parse_site_toml_str(&with_replaced("/notes/rust", "/notes/../../etc"));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Parent directory references"));
        assert!(message.contains("Rust"));
    }

    #[test]
    fn test_parse_rejects_nav_link_with_items() {
        let result = parse_site_toml_str(&with_replaced(
            "text = \"Home\"\nlink = \"/\"",
            "text = \"Home\"\nlink = \"/\"\nitems = []",
        ));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("sets both `link` and `items`"));
        assert!(message.contains("Home"));
    }

    #[test]
    fn test_parse_rejects_nav_entry_without_target() {
        let result = parse_site_toml_str(&with_replaced(
            "text = \"Home\"\nlink = \"/\"",
            "text = \"Home\"",
        ));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("needs either `link` or `items`"));
        assert!(message.contains("Home"));
    }

    #[test]
    fn test_parse_rejects_misspelled_nav_key() {
        let result = parse_site_toml_str(&with_replaced(
            "text = \"Home\"\nlink = \"/\"",
            "text = \"Home\"\nlnk = \"/\"",
        ));
        assert!(result.unwrap_err().to_string().contains("lnk"));

        let result = parse_site_toml_str(&with_replaced(
            "{ text = \"Go\", link = \"/notes/go/\" }",
            "{ text = \"Go\", lnk = \"/notes/go/\" }",
        ));
        assert!(result.unwrap_err().to_string().contains("lnk"));
    }

    #[test]
    fn test_parse_rejects_unknown_scheme() {
        let result = parse_site_toml_str(&with_replaced("/notes/rust", "ftp://files.example.com"));
        assert!(result.unwrap_err().to_string().contains("Unsupported link scheme"));
    }

    #[test]
    fn test_parse_accepts_external_nav_link() {
        let config =
            parse_site_toml_str(&with_replaced("/notes/rust", "https://doc.rust-lang.org")).unwrap();
        assert!(config.nav_links().any(NavLink::is_external));
    }

    #[test]
    fn test_parse_rejects_outline_level_out_of_range() {
        let result = parse_site_toml_str(&with_replaced("levels = [3, 2, 2]", "levels = [2, 7]"));
        assert!(result.unwrap_err().to_string().contains("outside 1-6"));

        let result = parse_site_toml_str(&with_replaced("levels = [3, 2, 2]", "levels = []"));
        assert!(result.unwrap_err().to_string().contains("at least one"));
    }

    #[test]
    fn test_parse_rejects_relative_social_link() {
        let result =
            parse_site_toml_str(&with_replaced("https://github.com/example", "/github"));
        assert!(result.unwrap_err().to_string().contains("absolute URL"));
    }

    #[test]
    fn test_parse_rejects_bad_head_tag() {
        let result = parse_site_toml_str(&with_replaced("tag = \"link\"", "tag = \"li nk\""));
        assert!(result.unwrap_err().to_string().contains("head[0]"));
    }

    #[test]
    fn test_parse_normalizes_base() {
        let toml = with_replaced("last_updated = false", "last_updated = false\nbase = \"blog\"");
        let config = parse_site_toml_str(&toml).unwrap();
        assert_eq!(config.base.as_deref(), Some("/blog/"));
    }

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base("").unwrap(), "/");
        assert_eq!(normalize_base("/").unwrap(), "/");
        assert_eq!(normalize_base("docs").unwrap(), "/docs/");
        assert_eq!(normalize_base("/my/blog").unwrap(), "/my/blog/");
        assert!(normalize_base("/a/../b").is_err());
        assert!(normalize_base("a//b").is_err());
        assert!(normalize_base("https://example.com/blog").is_err());
    }

    #[test]
    fn test_missing_required_field() {
        let result = parse_site_toml_str(&with_replaced("title = \"Test Blog\"", ""));
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_write_site_toml() {
        let dir = tempfile::tempdir().unwrap();

        write_site_toml(dir.path(), &produce_configuration()).unwrap();
        let config = parse_site_toml(dir.path().join(SITE_TOML)).unwrap();
        assert_eq!(config.title, crate::descriptor::TITLE);
    }
}
