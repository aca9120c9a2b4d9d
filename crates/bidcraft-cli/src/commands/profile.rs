//! Profile command - save and list general contractor profiles.

use colored::Colorize;

use bidcraft::{ContractorProfile, ProfileRegistry};

use crate::cli::ProfileAction;
use crate::workspace::Workspace;

pub fn run(ws: &Workspace, action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = ws.open_profiles()?;

    match action {
        ProfileAction::Save {
            name,
            specialty,
            license,
            region,
        } => {
            let profile = ContractorProfile::new(specialty)
                .with_license(license)
                .with_region(region);
            registry.save_profile(&name, profile)?;
            println!("{} profile for {}", "Saved".green().bold(), name.white().bold());
        }

        ProfileAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&profiles_json(&registry)?)?);
                return Ok(());
            }

            if registry.is_empty() {
                println!(
                    "No profiles saved. Use {} to add one.",
                    "bidcraft profile save <NAME>".cyan()
                );
                return Ok(());
            }

            println!("{}", "Contractor Profiles:".yellow().bold());
            for (name, profile) in registry.iter() {
                println!("  {} [{}]", name.white().bold(), profile.specialty);
                if !profile.license.is_empty() {
                    println!("    License: {}", profile.license);
                }
                if !profile.region.is_empty() {
                    println!("    Region:  {}", profile.region);
                }
            }
        }
    }

    Ok(())
}

/// Profiles keyed by company name, in the order they were first saved.
fn profiles_json(registry: &ProfileRegistry) -> serde_json::Result<serde_json::Value> {
    let profiles = registry
        .iter()
        .map(|(name, profile)| Ok((name.clone(), serde_json::to_value(profile)?)))
        .collect::<serde_json::Result<serde_json::Map<String, serde_json::Value>>>()?;
    Ok(serde_json::Value::Object(profiles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidcraft::{JsonFileStore, Specialty};
    use tempfile::TempDir;

    #[test]
    fn test_json_listing_keeps_save_order() {
        let dir = TempDir::new().unwrap();
        {
            let mut registry = ProfileRegistry::open(JsonFileStore::new(dir.path())).unwrap();
            registry
                .save_profile("Zephyr Paint", ContractorProfile::new(Specialty::Paint))
                .unwrap();
            registry
                .save_profile("Acme Builders", ContractorProfile::new(Specialty::Framing))
                .unwrap();
        }

        let registry = ProfileRegistry::open(JsonFileStore::new(dir.path())).unwrap();
        let listing = profiles_json(&registry).unwrap();
        let names: Vec<&String> = listing.as_object().unwrap().keys().collect();
        assert_eq!(names, vec!["Zephyr Paint", "Acme Builders"]);
        assert_eq!(listing["Acme Builders"]["specialty"], "Framing");

        let text = serde_json::to_string_pretty(&listing).unwrap();
        assert!(text.find("Zephyr Paint").unwrap() < text.find("Acme Builders").unwrap());
    }
}
