//! Validate combat content files
//!
//! Loads a spell catalog (and optionally combat rules and field types) and
//! prints a summary per spell. Any malformed entry fails the command.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;

use combat_content::{ConfigLoader, ContentFactory, FieldLoader, SpellLoader};

/// Load and validate combat content files
#[derive(Parser)]
pub struct CheckContent {
    /// Spell catalog (RON)
    #[arg(short, long, value_name = "FILE")]
    spells: PathBuf,

    /// Combat rules (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Field item types (RON); enables created-item checks
    #[arg(short, long, value_name = "FILE")]
    fields: Option<PathBuf>,
}

impl CheckContent {
    pub fn execute(self) -> Result<()> {
        if let Some(path) = &self.config {
            let config = ConfigLoader::load(path)
                .with_context(|| format!("Failed to load combat rules from {}", path.display()))?;
            println!("{} {}", style("Rules:").bold().cyan(), path.display());
            println!("  World type: {}", config.world_type);
            println!("  Protection level: {}", config.protection_level);
            println!("  PvP damage: {}%", config.pvp_damage_percent);
            println!(
                "  Alliance protection: party={} guild={}",
                config.alliance.party, config.alliance.guild
            );
            println!();
        }

        let book = SpellLoader::load(&self.spells)?;
        println!(
            "{} {} ({} spells)",
            style("Spells:").bold().cyan(),
            self.spells.display(),
            book.len()
        );
        for (name, combat) in book.iter() {
            let params = combat.params();
            let shape = match combat.area() {
                Some(area) if area.has_ext_area() => "shape+diagonals",
                Some(_) => "shape",
                None => "single tile",
            };
            println!(
                "  {} {:<20} {:<12} {:<16} formula={}",
                style("✓").green().bold(),
                name,
                params.combat_type,
                shape,
                combat.formula().kind
            );
        }

        if let Some(path) = &self.fields {
            let fields = FieldLoader::load(path)
                .with_context(|| format!("Failed to load field types from {}", path.display()))?;
            let missing = ContentFactory::unknown_field_items(&book, &fields);
            println!();
            println!(
                "{} {} ({} types)",
                style("Fields:").bold().cyan(),
                path.display(),
                fields.len()
            );
            if !missing.is_empty() {
                for (name, item_id) in &missing {
                    eprintln!(
                        "  {} spell `{}` creates unknown field item {}",
                        style("✗").red().bold(),
                        name,
                        item_id
                    );
                }
                anyhow::bail!("{} spell(s) reference unknown field items", missing.len());
            }
        }

        println!();
        println!("{}", style("Content is valid").bold().green());
        Ok(())
    }
}
