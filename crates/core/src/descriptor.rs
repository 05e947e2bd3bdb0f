//! Built-in configuration of the blog.
//!
//! [`produce_configuration`] is the single source of the site settings: it
//! is what `init` writes to `site.toml` and what `show` prints.

use crate::types::*;
use std::collections::BTreeSet;

pub const LANGUAGE: &str = "zh-cn";
pub const TITLE: &str = "小站日记";
pub const FAVICON: &str = "/favicon.ico";
pub const LOGO: &str = "/logo.jpg";

/// Build the blog's site configuration.
///
/// Pure and deterministic: every call returns an equal record and nothing
/// is read from the filesystem or the environment. A deployment base path
/// is not set here; pass one through [`BuildOptions`] or `site.toml`.
pub fn produce_configuration() -> SiteConfig {
    SiteConfig {
        language: LANGUAGE.to_string(),
        title: TITLE.to_string(),
        description: String::new(),
        last_updated: true,
        base: None,
        head: vec![HeadTag::link("icon", FAVICON)],
        theme: ThemeConfig {
            logo: Some(LOGO.to_string()),
            return_to_top_label: "回到顶部".to_string(),
            sidebar_menu_label: "菜单".to_string(),
            last_updated_text: "最后更新于".to_string(),
            outline: Outline {
                levels: BTreeSet::from([2, 3]),
                label: "页面导航".to_string(),
            },
            nav: navigation(),
            social_links: vec![SocialLink {
                icon: "github".to_string(),
                link: "https://github.com/vuejs/vitepress".to_string(),
            }],
        },
    }
}

fn navigation() -> Vec<NavEntry> {
    vec![
        NavEntry::Leaf(NavLink::new("首页", "/")),
        group(
            "日常",
            &[("游戏", "/game/index"), ("生活随笔", "/life/index")],
        ),
        NavEntry::Leaf(NavLink::new("半年计划", "/plan/index")),
        group(
            "AI学习",
            &[("MCP", "/ai/mcp/index"), ("提示词工程", "/ai/prompt/index")],
        ),
        group(
            "后端",
            &[
                ("Rust", "/backend/rust/index"),
                ("数据库", "/backend/database/index"),
                ("消息队列", "/backend/mq/index"),
            ],
        ),
        NavEntry::Leaf(NavLink::new("对接文档", "/docking/index")),
        NavEntry::Leaf(NavLink::new("关于", "/about/index")),
    ]
}

fn group(text: &str, items: &[(&str, &str)]) -> NavEntry {
    NavEntry::Group(NavGroup {
        text: text.to_string(),
        items: items
            .iter()
            .map(|(text, link)| NavLink::new(text, link))
            .collect(),
    })
}
