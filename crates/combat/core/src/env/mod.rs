//! Interfaces to the systems a cast reads from and writes to.
//!
//! The live world and the effect broadcast are borrowed mutably per cast; the
//! read-only oracles (item types, scripts, randomness) and the combat rules are
//! bundled in [`CombatEnv`] so the engine never couples to a concrete server.
mod effects;
mod error;
mod items;
mod rng;
mod scripts;
mod world;

pub use effects::{EffectSink, NullEffects};
pub use error::OracleError;
pub use items::{FieldType, ItemTypeOracle};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use scripts::{ScriptError, ScriptHost};
pub use world::{
    Condition, CreatureView, PlayerFlags, TileCreatures, TileFlags, TileView, WorldModel, zone_at,
};

use crate::config::CombatConfig;

/// Read-only oracles and rules shared by every cast.
#[derive(Clone, Copy)]
pub struct CombatEnv<'a> {
    config: &'a CombatConfig,
    items: Option<&'a dyn ItemTypeOracle>,
    scripts: Option<&'a dyn ScriptHost>,
    rng: Option<&'a dyn RngOracle>,
    seed: u64,
}

impl<'a> CombatEnv<'a> {
    pub fn new(
        config: &'a CombatConfig,
        items: Option<&'a dyn ItemTypeOracle>,
        scripts: Option<&'a dyn ScriptHost>,
        rng: Option<&'a dyn RngOracle>,
    ) -> Self {
        Self {
            config,
            items,
            scripts,
            rng,
            seed: 0,
        }
    }

    pub fn with_all(
        config: &'a CombatConfig,
        items: &'a dyn ItemTypeOracle,
        scripts: &'a dyn ScriptHost,
        rng: &'a dyn RngOracle,
    ) -> Self {
        Self::new(config, Some(items), Some(scripts), Some(rng))
    }

    /// Rules only. Damage rolls fail until an rng is supplied.
    pub fn bare(config: &'a CombatConfig) -> Self {
        Self::new(config, None, None, None)
    }

    /// Sets the server seed mixed into every roll.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn config(&self) -> &'a CombatConfig {
        self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// # Errors
    ///
    /// Returns `OracleError::ItemsNotAvailable` if no item oracle was provided.
    pub fn items(&self) -> Result<&'a dyn ItemTypeOracle, OracleError> {
        self.items.ok_or(OracleError::ItemsNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::ScriptsNotAvailable` if no script host was provided.
    pub fn scripts(&self) -> Result<&'a dyn ScriptHost, OracleError> {
        self.scripts.ok_or(OracleError::ScriptsNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::RngNotAvailable` if no rng oracle was provided.
    pub fn rng(&self) -> Result<&'a dyn RngOracle, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }
}

impl core::fmt::Debug for CombatEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CombatEnv")
            .field("config", self.config)
            .field("items", &self.items.is_some())
            .field("scripts", &self.scripts.is_some())
            .field("rng", &self.rng.is_some())
            .field("seed", &self.seed)
            .finish()
    }
}
