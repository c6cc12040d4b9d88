//! Combat rules loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for server combat rules from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load combat rules from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse combat config TOML: {}", e))?;

        if config.pvp_damage_percent > 100 {
            anyhow::bail!(
                "pvp_damage_percent must be at most 100, got {}",
                config.pvp_damage_percent
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::WorldType;

    #[test]
    fn partial_files_keep_defaults() {
        let config = ConfigLoader::parse(
            r#"
            world_type = "no-pvp"

            [alliance]
            guild = false
            "#,
        )
        .unwrap();

        assert_eq!(config.world_type, WorldType::NoPvp);
        assert_eq!(config.pvp_damage_percent, CombatConfig::DEFAULT_PVP_DAMAGE_PERCENT);
        assert!(config.alliance.party);
        assert!(!config.alliance.guild);
    }

    #[test]
    fn out_of_range_percent_is_rejected() {
        assert!(ConfigLoader::parse("pvp_damage_percent = 150").is_err());
        assert!(ConfigLoader::parse("world_type = \"chaos\"").is_err());
    }
}
