//! Content checks for a site directory.
//!
//! Loading `site.toml` only guarantees the record is well formed. This crate
//! checks it against the files it points at: every internal nav link must
//! resolve to a Markdown page under `docs/`, and referenced assets must exist
//! under `public/`.

use blog_kit_core::config::{CONTENT_DIR, PUBLIC_DIR};
use blog_kit_core::{NavEntry, SiteConfig};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use walkdir::WalkDir;

/// Icons the theme ships for social links
const KNOWN_SOCIAL_ICONS: &[&str] = &[
    "discord", "facebook", "github", "instagram", "linkedin", "mastodon", "npm", "slack",
    "twitter", "x", "youtube", "bilibili", "weibo", "zhihu", "gitee",
];

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "ico", "bmp"];

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate `config` against the site directory at `site_root`.
pub fn validate_site(config: &SiteConfig, site_root: &Path) -> ValidationReport {
    let mut report = ValidationReport::default();

    if config.title.trim().is_empty() {
        report.warnings.push("Site title is empty".to_string());
    }

    check_nav_shape(config, &mut report);

    let routes = collect_routes(&site_root.join(CONTENT_DIR));
    check_nav_routes(config, &routes, &mut report);
    check_assets(config, &site_root.join(PUBLIC_DIR), &mut report);

    for social in &config.theme.social_links {
        if !KNOWN_SOCIAL_ICONS.contains(&social.icon.as_str()) {
            report.warnings.push(format!(
                "Unknown social icon '{}' for {}",
                social.icon, social.link
            ));
        }
    }

    report
}

fn check_nav_shape(config: &SiteConfig, report: &mut ValidationReport) {
    let mut seen = HashSet::new();

    for (i, entry) in config.theme.nav.iter().enumerate() {
        if entry.text().trim().is_empty() {
            report.errors.push(format!("Nav entry #{} has no text", i + 1));
        } else if !seen.insert(entry.text()) {
            report
                .warnings
                .push(format!("Duplicate nav entry '{}'", entry.text()));
        }

        if let NavEntry::Group(group) = entry
            && group.items.is_empty()
        {
            report
                .errors
                .push(format!("Nav group '{}' has no items", group.text));
        }

        for link in entry.links() {
            if link.text.trim().is_empty() {
                report.errors.push(format!(
                    "Nav link '{}' under '{}' has no text",
                    link.link,
                    entry.text()
                ));
            }
            if link.link.trim().is_empty() {
                report.errors.push(format!(
                    "Nav link '{}' under '{}' has no target",
                    link.text,
                    entry.text()
                ));
            }
        }
    }
}

fn check_nav_routes(config: &SiteConfig, routes: &BTreeSet<String>, report: &mut ValidationReport) {
    let mut linked = HashSet::new();
    let mut external = 0;

    for link in config.nav_links() {
        if link.link.trim().is_empty() {
            continue;
        }
        if link.is_external() {
            external += 1;
            continue;
        }

        match resolve_route(&link.link, routes) {
            Some(route) => {
                linked.insert(route);
            }
            None => report.errors.push(format!(
                "Nav link '{}' points to '{}' but no page exists under {}/",
                link.text, link.link, CONTENT_DIR
            )),
        }
    }

    let unlinked = routes.iter().filter(|r| !linked.contains(r.as_str())).count();

    report.info.push(format!("{} content page(s)", routes.len()));
    report
        .info
        .push(format!("{} nav entries", config.theme.nav.len()));
    report.info.push(format!("{} external link(s)", external));
    if unlinked > 0 {
        report
            .info
            .push(format!("{} page(s) not reachable from the nav", unlinked));
    }
}

fn check_assets(config: &SiteConfig, public_dir: &Path, report: &mut ValidationReport) {
    for asset in config.asset_paths() {
        // `/favicon.ico?v=2` is served from `public/favicon.ico`
        let file = asset.split(['#', '?']).next().unwrap_or_default();
        let path = public_dir.join(file.trim_start_matches('/'));
        if !path.is_file() {
            report.warnings.push(format!(
                "Asset '{}' not found at {}",
                asset,
                path.display()
            ));
            continue;
        }

        if config.theme.logo.as_deref() == Some(asset) {
            check_image(asset, &path, report);
        }
    }
}

fn check_image(asset: &str, path: &Path, report: &mut ValidationReport) {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        report
            .warnings
            .push(format!("Logo '{}' is not a raster image, skipping decode", asset));
        return;
    }

    let dimensions = image::ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| e.to_string())
        .and_then(|reader| reader.into_dimensions().map_err(|e| e.to_string()));

    match dimensions {
        Ok((width, height)) => report
            .info
            .push(format!("Logo {} is {}x{}", asset, width, height)),
        Err(e) => report
            .errors
            .push(format!("Logo '{}' is not a readable image: {}", asset, e)),
    }
}

/// Collect page routes from Markdown files under `content_dir`.
///
/// `docs/index.md` becomes `/index`, `docs/ai/mcp/index.md` becomes
/// `/ai/mcp/index`. A missing content directory yields no routes.
pub fn collect_routes(content_dir: &Path) -> BTreeSet<String> {
    WalkDir::new(content_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("md"))
        .filter_map(|e| {
            let relative = e.path().strip_prefix(content_dir).ok()?;
            let stem = relative.with_extension("");
            let parts: Vec<String> = stem
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            Some(format!("/{}", parts.join("/")))
        })
        .collect()
}

/// Route a site-root link names.
///
/// Query strings and fragments are ignored, `.html`/`.md` suffixes are
/// dropped and a trailing `/` means the directory's `index` page.
pub fn link_route(link: &str) -> String {
    let path = link.split(['#', '?']).next().unwrap_or_default();
    let path = path
        .strip_suffix(".html")
        .or_else(|| path.strip_suffix(".md"))
        .unwrap_or(path);

    if path.ends_with('/') {
        format!("{}index", path)
    } else {
        path.to_string()
    }
}

/// Resolve an internal link to one of `routes`, falling back from `/x` to
/// `/x/index`.
pub fn resolve_route(link: &str, routes: &BTreeSet<String>) -> Option<String> {
    let route = link_route(link);
    if routes.contains(&route) {
        return Some(route);
    }

    let index = format!("{}/index", route);
    routes.contains(&index).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_kit_core::{HeadTag, NavGroup, NavLink, produce_configuration};
    use std::fs;
    use std::path::PathBuf;

    fn write_page(root: &Path, route: &str) {
        let path = root
            .join(CONTENT_DIR)
            .join(format!("{}.md", route.trim_start_matches('/')));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "# page\n").unwrap();
    }

    /// A site directory with a page behind every nav link of the built-in config
    fn complete_site() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        write_page(&root, "/index");
        for link in produce_configuration().nav_links() {
            if link.link != "/" {
                write_page(&root, &link.link);
            }
        }
        fs::create_dir_all(root.join(PUBLIC_DIR)).unwrap();
        (dir, root)
    }

    fn routes(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_route() {
        let routes = routes(&["/index", "/game/index", "/notes/rust"]);
        assert_eq!(resolve_route("/", &routes).as_deref(), Some("/index"));
        assert_eq!(resolve_route("/game/", &routes).as_deref(), Some("/game/index"));
        assert_eq!(resolve_route("/game", &routes).as_deref(), Some("/game/index"));
        assert_eq!(resolve_route("/game/index.html", &routes).as_deref(), Some("/game/index"));
        assert_eq!(resolve_route("/notes/rust#setup", &routes).as_deref(), Some("/notes/rust"));
        assert_eq!(resolve_route("/notes/rust.md?x=1", &routes).as_deref(), Some("/notes/rust"));
        assert_eq!(resolve_route("/notes/go", &routes), None);
    }

    #[test]
    fn test_link_route() {
        assert_eq!(link_route("/"), "/index");
        assert_eq!(link_route("/ai/mcp/"), "/ai/mcp/index");
        assert_eq!(link_route("/ai/mcp/index"), "/ai/mcp/index");
        assert_eq!(link_route("/plan.html#q1"), "/plan");
    }

    #[test]
    fn test_collect_routes() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), "/index");
        write_page(dir.path(), "/ai/mcp/index");
        fs::write(dir.path().join(CONTENT_DIR).join("notes.txt"), "skip").unwrap();

        let found = collect_routes(&dir.path().join(CONTENT_DIR));
        assert_eq!(found, routes(&["/ai/mcp/index", "/index"]));
    }

    #[test]
    fn test_collect_routes_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_routes(&dir.path().join(CONTENT_DIR)).is_empty());
    }

    #[test]
    fn test_builtin_config_on_complete_site() {
        let (_dir, root) = complete_site();
        let report = validate_site(&produce_configuration(), &root);
        assert!(report.is_ok(), "unexpected errors: {:?}", report.errors);
        // favicon and logo were not copied in
        assert_eq!(report.warnings.len(), 2);
        assert!(report.info.iter().any(|i| i == "0 external link(s)"));
    }

    #[test]
    fn test_missing_page_is_error() {
        let (_dir, root) = complete_site();
        fs::remove_file(root.join(CONTENT_DIR).join("ai/mcp/index.md")).unwrap();

        let report = validate_site(&produce_configuration(), &root);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("/ai/mcp/index"));
    }

    #[test]
    fn test_empty_group_and_blank_leaf() {
        let (_dir, root) = complete_site();
        let mut config = produce_configuration();
        config.theme.nav.push(NavEntry::Group(NavGroup {
            text: "Empty".to_string(),
            items: vec![],
        }));
        config.theme.nav.push(NavEntry::Leaf(NavLink::new("Nowhere", "")));

        let report = validate_site(&config, &root);
        assert!(report.errors.iter().any(|e| e.contains("'Empty' has no items")));
        assert!(report.errors.iter().any(|e| e.contains("'Nowhere'") && e.contains("no target")));
    }

    #[test]
    fn test_external_links_are_not_resolved() {
        let (_dir, root) = complete_site();
        let mut config = produce_configuration();
        config
            .theme
            .nav
            .push(NavEntry::Leaf(NavLink::new("Docs", "https://doc.rust-lang.org")));

        let report = validate_site(&config, &root);
        assert!(report.is_ok());
        assert!(report.info.iter().any(|i| i == "1 external link(s)"));
    }

    #[test]
    fn test_duplicate_nav_text_warns() {
        let (_dir, root) = complete_site();
        let mut config = produce_configuration();
        config
            .theme
            .nav
            .push(NavEntry::Leaf(NavLink::new("关于", "/about/index")));

        let report = validate_site(&config, &root);
        assert!(report.is_ok());
        assert!(report.warnings.iter().any(|w| w.contains("Duplicate nav entry '关于'")));
    }

    #[test]
    fn test_unreadable_logo_is_error() {
        let (_dir, root) = complete_site();
        fs::write(root.join(PUBLIC_DIR).join("logo.jpg"), b"not really a jpeg").unwrap();
        fs::write(root.join(PUBLIC_DIR).join("favicon.ico"), b"icon").unwrap();

        let report = validate_site(&produce_configuration(), &root);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("not a readable image"));
    }

    #[test]
    fn test_asset_query_and_fragment_ignored() {
        let (_dir, root) = complete_site();
        fs::write(root.join(PUBLIC_DIR).join("favicon.ico"), b"icon").unwrap();
        let mut config = produce_configuration();
        config.theme.logo = None;
        config.head[0]
            .attrs
            .insert("href".to_string(), "/favicon.ico?v=2".to_string());
        config.head.push(HeadTag::link("manifest", "/site.webmanifest#main"));

        let report = validate_site(&config, &root);
        assert_eq!(report.warnings.len(), 1, "{:?}", report.warnings);
        assert!(report.warnings[0].contains("/site.webmanifest#main"));
        assert!(report.warnings[0].contains("site.webmanifest"));
        assert!(!report.warnings[0].contains("favicon"));
    }

    #[test]
    fn test_unknown_social_icon_warns() {
        let (_dir, root) = complete_site();
        let mut config = produce_configuration();
        config.theme.social_links[0].icon = "myspace".to_string();

        let report = validate_site(&config, &root);
        assert!(report.warnings.iter().any(|w| w.contains("myspace")));
    }

    #[test]
    fn test_unlinked_pages_reported() {
        let (_dir, root) = complete_site();
        write_page(&root, "/drafts/wip");

        let report = validate_site(&produce_configuration(), &root);
        assert!(report.info.iter().any(|i| i == "1 page(s) not reachable from the nav"));
    }
}
