//! Catalog Command
//!
//! List the APIs the discovery directory publishes.
//!
//! Usage:
//!   apiscribe catalog [--format json] [--filter drive]

use console::style;

use crate::config::ConfigLoader;
use crate::discovery::DirectoryClient;
use crate::types::{Result, ServiceDescriptor};

pub async fn run(format: &str, filter: Option<&str>) -> Result<()> {
    let config = ConfigLoader::load()?;
    let client = DirectoryClient::from_config(&config.discovery)?;

    let services = filter_services(client.list_services().await?, filter);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&services)?);
        return Ok(());
    }

    println!("{}", style("Available APIs").bold().underlined());
    println!();
    let width = services.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for service in &services {
        println!(
            "  {:<width$}  {:<8}  {}",
            style(&service.name).cyan(),
            service.version,
            service.display_title(),
            width = width
        );
    }
    println!();
    println!("{} APIs", services.len());
    Ok(())
}

fn filter_services(services: Vec<ServiceDescriptor>, filter: Option<&str>) -> Vec<ServiceDescriptor> {
    let Some(needle) = filter.map(str::to_lowercase) else {
        return services;
    };
    services
        .into_iter()
        .filter(|s| {
            s.name.to_lowercase().contains(&needle) || s.title.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_matches_name_or_title() {
        let services = vec![
            ServiceDescriptor::new("drive", "Google Drive API", "v3"),
            ServiceDescriptor::new("gmail", "Gmail API", "v1"),
        ];

        assert_eq!(filter_services(services.clone(), None).len(), 2);

        let by_title = filter_services(services.clone(), Some("GOOGLE"));
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].name, "drive");

        assert!(filter_services(services, Some("calendar")).is_empty());
    }
}
