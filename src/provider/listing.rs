//! Model listing and discovery.
//!
//! Displays available models grouped by provider for the `models`
//! subcommand. Isolates display concerns from the provider core.

use anyhow::Result;
use colored::Colorize;

use super::factory::ProviderFactory;
use crate::config::Config;

/// List all available models, grouped by provider.
pub async fn list_models(config: &Config) -> Result<()> {
    let mut factory = ProviderFactory::from_credentials(&config.settings.providers)?;
    if factory.is_empty() {
        println!(
            "{} no providers configured -- add an API key to {}",
            "warning:".yellow().bold(),
            config.paths.config.display()
        );
        return Ok(());
    }

    let current = &config.settings.general.default_model;
    let catalog = factory.fetch_models().await;

    println!("Available models:");
    for (provider, models) in catalog.iter() {
        println!("\n  {}:", provider.bold());
        if models.is_empty() {
            println!("    {}", "(none -- listing failed or returned nothing)".dimmed());
            continue;
        }
        for model in models {
            let id = format!("{provider}/{model}");
            let marker = if &id == current { " (default)" } else { "" };
            println!("    {id}{marker}");
        }
    }

    Ok(())
}
