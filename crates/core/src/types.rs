use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Complete site configuration handed to the site generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteConfig {
    /// Locale tag for generated text (e.g. "zh-cn")
    #[serde(rename = "lang")]
    pub language: String,
    pub title: String,
    pub description: String,
    pub last_updated: bool,
    /// Deployment base path, always with leading and trailing `/`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub head: Vec<HeadTag>,
    pub theme: ThemeConfig,
}

impl SiteConfig {
    /// All leaf links in display order, nested group items included
    pub fn nav_links(&self) -> impl Iterator<Item = &NavLink> {
        self.theme.nav.iter().flat_map(NavEntry::links)
    }

    /// Site-root asset paths referenced by the record (logo, head hrefs)
    pub fn asset_paths(&self) -> Vec<&str> {
        let mut assets = Vec::new();
        if let Some(logo) = &self.theme.logo {
            assets.push(logo.as_str());
        }
        for tag in &self.head {
            if let Some(path) = tag.asset_path() {
                assets.push(path);
            }
        }
        assets
    }
}

/// Extra element injected into every page's `<head>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadTag {
    pub tag: String,
    /// Attributes in declaration order
    #[serde(default)]
    pub attrs: IndexMap<String, String>,
}

impl HeadTag {
    pub fn link(rel: &str, href: &str) -> Self {
        let mut attrs = IndexMap::new();
        attrs.insert("rel".to_string(), rel.to_string());
        attrs.insert("href".to_string(), href.to_string());
        Self {
            tag: "link".to_string(),
            attrs,
        }
    }

    /// The `href` or `src` attribute when it points at a site-root file
    pub fn asset_path(&self) -> Option<&str> {
        self.attrs
            .get("href")
            .or_else(|| self.attrs.get("src"))
            .map(String::as_str)
            .filter(|p| p.starts_with('/') && !p.starts_with("//"))
    }
}

/// Theme display settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub return_to_top_label: String,
    pub sidebar_menu_label: String,
    pub last_updated_text: String,
    pub outline: Outline,
    pub nav: Vec<NavEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub social_links: Vec<SocialLink>,
}

/// In-page table of contents settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outline {
    /// Heading levels listed in the outline
    pub levels: BTreeSet<u8>,
    pub label: String,
}

/// One entry of the top navigation bar
///
/// A table with `items` is a group, one with `link` is a plain link.
/// Setting both, or neither, is rejected with the entry's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, try_from = "NavEntryFields")]
pub enum NavEntry {
    Group(NavGroup),
    Leaf(NavLink),
}

/// Flat view of a nav table before it is sorted into a link or a group
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NavEntryFields {
    text: String,
    link: Option<String>,
    active_match: Option<String>,
    items: Option<Vec<NavLink>>,
}

impl TryFrom<NavEntryFields> for NavEntry {
    type Error = String;

    fn try_from(fields: NavEntryFields) -> Result<Self, Self::Error> {
        match (fields.link, fields.items) {
            (Some(_), Some(_)) => Err(format!(
                "nav entry '{}' sets both `link` and `items`",
                fields.text
            )),
            (None, None) => Err(format!(
                "nav entry '{}' needs either `link` or `items`",
                fields.text
            )),
            (None, Some(_)) if fields.active_match.is_some() => Err(format!(
                "nav group '{}' cannot set `active_match`",
                fields.text
            )),
            (Some(link), None) => Ok(NavEntry::Leaf(NavLink {
                text: fields.text,
                link,
                active_match: fields.active_match,
            })),
            (None, Some(items)) => Ok(NavEntry::Group(NavGroup {
                text: fields.text,
                items,
            })),
        }
    }
}

impl NavEntry {
    pub fn text(&self) -> &str {
        match self {
            NavEntry::Group(group) => &group.text,
            NavEntry::Leaf(link) => &link.text,
        }
    }

    /// Leaf links under this entry, in display order
    pub fn links(&self) -> std::slice::Iter<'_, NavLink> {
        match self {
            NavEntry::Group(group) => group.items.iter(),
            NavEntry::Leaf(link) => std::slice::from_ref(link).iter(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavLink {
    pub text: String,
    pub link: String,
    /// Route pattern that marks this entry active in the nav bar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_match: Option<String>,
}

impl NavLink {
    pub fn new(text: &str, link: &str) -> Self {
        Self {
            text: text.to_string(),
            link: link.to_string(),
            active_match: None,
        }
    }

    /// True for links that leave the site (`https://`, `mailto:`, ...)
    pub fn is_external(&self) -> bool {
        is_external_link(&self.link)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavGroup {
    pub text: String,
    pub items: Vec<NavLink>,
}

/// External profile link shown in the nav bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub icon: String,
    pub link: String,
}

/// Options supplied per build rather than stored in the record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Overrides `SiteConfig::base` when set
    pub base: Option<String>,
}

impl BuildOptions {
    /// Base path in effect for `config`, `/` when none is configured
    pub fn effective_base<'a>(&'a self, config: &'a SiteConfig) -> &'a str {
        self.base
            .as_deref()
            .or(config.base.as_deref())
            .unwrap_or("/")
    }
}

pub fn is_external_link(link: &str) -> bool {
    link.starts_with("http://")
        || link.starts_with("https://")
        || link.starts_with("mailto:")
        || link.starts_with("//")
}
