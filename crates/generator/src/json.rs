use blog_kit_core::{BuildOptions, HeadTag, NavEntry, NavLink, SiteConfig};
use serde::Serialize;
use serde_json::{Value, json};

/// Site record in the camelCase layout the external site generator reads
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneratorConfig<'a> {
    lang: &'a str,
    title: &'a str,
    description: &'a str,
    last_updated: bool,
    base: &'a str,
    head: Vec<Value>,
    theme_config: ThemeConfigJson<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThemeConfigJson<'a> {
    outline: OutlineJson<'a>,
    return_to_top_label: &'a str,
    sidebar_menu_label: &'a str,
    last_updated_text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    logo: Option<&'a str>,
    nav: Vec<Value>,
    social_links: Vec<Value>,
}

#[derive(Serialize)]
struct OutlineJson<'a> {
    level: Vec<u8>,
    label: &'a str,
}

/// Convert `config` into the generator's JSON configuration.
///
/// Head tags become `[tag, {attrs}]` pairs and nav groups keep their
/// `items`; every sequence keeps its declared order.
pub fn generator_config_json(config: &SiteConfig, options: &BuildOptions) -> serde_json::Result<Value> {
    let theme = &config.theme;

    serde_json::to_value(GeneratorConfig {
        lang: &config.language,
        title: &config.title,
        description: &config.description,
        last_updated: config.last_updated,
        base: options.effective_base(config),
        head: config.head.iter().map(head_tag).collect(),
        theme_config: ThemeConfigJson {
            outline: OutlineJson {
                level: theme.outline.levels.iter().copied().collect(),
                label: &theme.outline.label,
            },
            return_to_top_label: &theme.return_to_top_label,
            sidebar_menu_label: &theme.sidebar_menu_label,
            last_updated_text: &theme.last_updated_text,
            logo: theme.logo.as_deref(),
            nav: theme.nav.iter().map(nav_entry).collect(),
            social_links: theme
                .social_links
                .iter()
                .map(|s| json!({ "icon": s.icon, "link": s.link }))
                .collect(),
        },
    })
}

fn head_tag(tag: &HeadTag) -> Value {
    json!([tag.tag, tag.attrs])
}

fn nav_entry(entry: &NavEntry) -> Value {
    match entry {
        NavEntry::Leaf(link) => nav_link(link),
        NavEntry::Group(group) => json!({
            "text": group.text,
            "items": group.items.iter().map(nav_link).collect::<Vec<_>>(),
        }),
    }
}

fn nav_link(link: &NavLink) -> Value {
    let mut value = json!({ "text": link.text, "link": link.link });
    if let Some(active) = &link.active_match {
        value["activeMatch"] = json!(active);
    }
    value
}
