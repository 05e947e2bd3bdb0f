use blog_kit_core::{BuildOptions, NavEntry, NavLink, SiteConfig};

/// Head elements written without a closing tag
const VOID_ELEMENTS: &[&str] = &["base", "link", "meta"];

/// HTML-escape a string to prevent XSS attacks
///
/// Escapes: & < > " '
pub fn html_escape(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#x27;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Prefix a site-root link with the deployment base.
///
/// External links are returned unchanged.
pub fn with_base(link: &str, base: &str) -> String {
    if blog_kit_core::is_external_link(link) || !link.starts_with('/') {
        return link.to_string();
    }
    format!("{}{}", base.trim_end_matches('/'), link)
}

/// Render the top navigation bar.
///
/// Entries appear in declared order; groups become nested lists.
pub fn render_nav_html(nav: &[NavEntry], base: &str) -> String {
    let items: String = nav
        .iter()
        .map(|entry| match entry {
            NavEntry::Leaf(link) => format!(
                r#"<li class="nav-item">{}</li>"#,
                render_link(link, base)
            ),
            NavEntry::Group(group) => {
                let children: String = group
                    .items
                    .iter()
                    .map(|link| format!("<li>{}</li>", render_link(link, base)))
                    .collect();
                format!(
                    r#"<li class="nav-item nav-group"><span class="nav-group-title">{}</span><ul class="nav-group-items">{}</ul></li>"#,
                    html_escape(&group.text),
                    children
                )
            }
        })
        .collect();

    format!(r#"<nav class="nav-bar"><ul class="nav-items">{}</ul></nav>"#, items)
}

fn render_link(link: &NavLink, base: &str) -> String {
    let external = if link.is_external() {
        r#" target="_blank" rel="noreferrer""#
    } else {
        ""
    };
    format!(
        r#"<a href="{}"{}>{}</a>"#,
        html_escape(&with_base(&link.link, base)),
        external,
        html_escape(&link.text)
    )
}

fn render_head_tags(config: &SiteConfig, base: &str) -> String {
    config
        .head
        .iter()
        .map(|tag| {
            let attrs: String = tag
                .attrs
                .iter()
                .map(|(name, value)| {
                    let value = if name == "href" || name == "src" {
                        with_base(value, base)
                    } else {
                        value.clone()
                    };
                    format!(r#" {}="{}""#, html_escape(name), html_escape(&value))
                })
                .collect();
            if VOID_ELEMENTS.contains(&tag.tag.to_ascii_lowercase().as_str()) {
                format!("<{}{}>", tag.tag, attrs)
            } else {
                format!("<{}{}></{}>", tag.tag, attrs, tag.tag)
            }
        })
        .collect::<Vec<_>>()
        .join("\n    ")
}

/// Generate the site shell page: logo, title, nav bar and social links.
///
/// The same template backs `build` and `preview`, so the preview shows
/// exactly what gets written.
///
/// # Arguments
///
/// * `config` - Site configuration
/// * `options` - Per-build options (base path)
/// * `is_preview` - Whether this is for preview mode (adds SSE reload)
pub fn generate_html(config: &SiteConfig, options: &BuildOptions, is_preview: bool) -> String {
    let base = options.effective_base(config);
    let theme = &config.theme;

    let logo_html = theme
        .logo
        .as_deref()
        .map(|logo| {
            format!(
                r#"<img class="logo" src="{}" alt="{}">"#,
                html_escape(&with_base(logo, base)),
                html_escape(&config.title)
            )
        })
        .unwrap_or_default();

    let social_html: String = theme
        .social_links
        .iter()
        .map(|s| {
            format!(
                r#"<a class="social-link" href="{}" aria-label="{}" target="_blank" rel="noreferrer">{}</a>"#,
                html_escape(&s.link),
                html_escape(&s.icon),
                html_escape(&s.icon)
            )
        })
        .collect();

    let levels = theme
        .outline
        .levels
        .iter()
        .map(|l| format!("h{}", l))
        .collect::<Vec<_>>()
        .join(", ");

    let description_html = if config.description.is_empty() {
        String::new()
    } else {
        format!(
            r#"<p class="description">{}</p>"#,
            html_escape(&config.description)
        )
    };

    let reload_script = if is_preview {
        r#"<script>
        // Hot reload via Server-Sent Events
        const eventSource = new EventSource('/_reload');
        eventSource.onmessage = () => location.reload();
        eventSource.onerror = () => eventSource.close();
    </script>"#
    } else {
        ""
    };

    let preview_badge = if is_preview {
        r#"<div class="preview-badge">PREVIEW MODE - Live Reload Active</div>"#
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    {head}
    <style>
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; color: #333; }}
        header {{ display: flex; align-items: center; gap: 1.5rem; padding: 0.75rem 2rem; border-bottom: 1px solid #eee; }}
        .logo {{ height: 32px; border-radius: 4px; }}
        .site-title {{ font-weight: 600; color: #222; text-decoration: none; }}
        .nav-items {{ display: flex; gap: 1.25rem; list-style: none; }}
        .nav-group {{ position: relative; }}
        .nav-group-items {{ display: none; position: absolute; list-style: none; background: white; padding: 0.5rem 1rem; box-shadow: 0 2px 8px rgba(0,0,0,0.1); }}
        .nav-group:hover .nav-group-items {{ display: block; }}
        .nav-bar a {{ color: #333; text-decoration: none; white-space: nowrap; }}
        .social-link {{ color: #666; }}
        main {{ max-width: 800px; margin: 2rem auto; padding: 0 2rem; }}
        .preview-badge {{ background: #3eaf7c; color: white; padding: 0.5rem 1rem; border-radius: 4px; display: inline-block; margin-bottom: 1rem; font-weight: bold; }}
        dl {{ display: grid; grid-template-columns: max-content 1fr; gap: 0.25rem 1rem; margin-top: 1rem; }}
        dt {{ color: #999; }}
    </style>
</head>
<body>
    <header>
        {logo}
        <a class="site-title" href="{home}">{title}</a>
        {nav}
        <div class="social-links">{social}</div>
    </header>
    <main>
        {badge}
        {description}
        <dl>
            <dt>{outline_label}</dt><dd>{levels}</dd>
            <dt>{sidebar_label}</dt><dd>{return_label}</dd>
            <dt>{updated_label}</dt><dd>{last_updated}</dd>
        </dl>
    </main>
    {script}
</body>
</html>"#,
        lang = html_escape(&config.language),
        title = html_escape(&config.title),
        head = render_head_tags(config, base),
        logo = logo_html,
        home = html_escape(base),
        nav = render_nav_html(&theme.nav, base),
        social = social_html,
        badge = preview_badge,
        description = description_html,
        outline_label = html_escape(&theme.outline.label),
        levels = levels,
        sidebar_label = html_escape(&theme.sidebar_menu_label),
        return_label = html_escape(&theme.return_to_top_label),
        updated_label = html_escape(&theme.last_updated_text),
        last_updated = if config.last_updated { "on" } else { "off" },
        script = reload_script,
    )
}
