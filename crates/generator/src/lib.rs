// Output for the external site generator and the local preview

pub mod html;
pub mod json;

pub use html::{generate_html, html_escape, render_nav_html, with_base};
pub use json::generator_config_json;

use blog_kit_core::{BuildOptions, SiteConfig};

/// File the external site generator loads its configuration from
pub const CONFIG_JSON: &str = "config.json";

pub struct GeneratedSite {
    pub pages: Vec<(String, String)>,   // (path, html)
    pub assets: Vec<(String, Vec<u8>)>, // (path, data)
}

pub fn generate_site(config: &SiteConfig, options: &BuildOptions) -> anyhow::Result<GeneratedSite> {
    let config_json = serde_json::to_vec_pretty(&generator_config_json(config, options)?)?;

    Ok(GeneratedSite {
        pages: vec![(
            "index.html".to_string(),
            generate_html(config, options, false),
        )],
        assets: vec![(CONFIG_JSON.to_string(), config_json)],
    })
}
