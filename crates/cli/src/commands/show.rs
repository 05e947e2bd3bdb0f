use super::build_options;
use anyhow::Result;
use blog_kit_core::produce_configuration;
use blog_kit_generator::generator_config_json;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    /// site.toml layout
    Toml,
    /// JSON handed to the site generator
    Json,
}

/// Print the built-in site configuration
pub async fn run(format: Format, base: Option<String>) -> Result<()> {
    println!("{}", render(format, base)?);
    Ok(())
}

fn render(format: Format, base: Option<String>) -> Result<String> {
    let config = produce_configuration();
    match format {
        Format::Toml => Ok(config.to_toml_string()?),
        Format::Json => {
            let options = build_options(base)?;
            Ok(serde_json::to_string_pretty(&generator_config_json(
                &config, &options,
            )?)?)
        }
    }
}
