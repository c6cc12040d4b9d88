//! Spell catalog loader.
//!
//! A spell is a named combat definition: optional shape, parameter overrides,
//! conditions, damage formula and script hooks. Each entry is turned into a
//! [`Combat`] and frozen behind a [`SharedCombat`].

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use combat_core::{
    AreaAnchor, AreaCombat, AreaDescription, Combat, CombatHook, CombatOrigin, CombatParam,
    CombatType, Condition, ConditionType, DistanceEffect, FormulaHook, HookKey, LinearFormula,
    MagicEffect, SharedCombat, SoundEffect, TargetHook, TargetKinds, TileHook,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

/// Shape of a spell, in its authored facing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaSpec {
    /// South-facing grid. Diagonal casts use the nearest cardinal.
    Matrix { rows: u32, cells: Vec<u32> },
    /// South-facing grid plus a south-east grid for diagonal casts.
    ExtMatrix {
        base: AreaDescription,
        diagonal: AreaDescription,
    },
    Cone { length: i32, spread: i32 },
    Circle { radius: i32 },
}

impl AreaSpec {
    pub fn build(&self) -> LoadResult<AreaCombat> {
        let mut area = AreaCombat::new();
        match self {
            Self::Matrix { rows, cells } => {
                area.setup_area(&AreaDescription::new(*rows, cells.clone()))?;
            }
            Self::ExtMatrix { base, diagonal } => {
                area.setup_area(base)?;
                area.setup_ext_area(diagonal)
                    .context("Invalid diagonal shape")?;
            }
            Self::Cone { length, spread } => area.setup_cone(*length, *spread)?,
            Self::Circle { radius } => area.setup_circle(*radius)?,
        }
        Ok(area)
    }
}

/// Parameter overrides. Absent entries keep the engine defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamsSpec {
    pub combat_type: Option<CombatType>,
    pub origin: Option<CombatOrigin>,
    pub effect: Option<MagicEffect>,
    pub distance_effect: Option<DistanceEffect>,
    pub sound_effect: Option<SoundEffect>,
    pub block_armor: Option<bool>,
    pub block_shield: Option<bool>,
    pub target_caster_or_top_most: Option<bool>,
    pub item_id: Option<u16>,
    pub aggressive: Option<bool>,
    pub dispel: Option<ConditionType>,
    pub use_charges: Option<bool>,
    pub valid_targets: Option<TargetKinds>,
    pub anchor: Option<AreaAnchor>,
}

impl ParamsSpec {
    /// Parameter assignments in declaration order.
    pub fn assignments(&self) -> Vec<CombatParam> {
        let optional = [
            self.combat_type.map(CombatParam::Type),
            self.effect.map(CombatParam::Effect),
            self.distance_effect.map(CombatParam::DistanceEffect),
            self.sound_effect.map(CombatParam::SoundEffect),
            self.block_armor.map(CombatParam::BlockArmor),
            self.block_shield.map(CombatParam::BlockShield),
            self.target_caster_or_top_most.map(CombatParam::TargetCasterOrTopMost),
            self.item_id.map(CombatParam::CreateItem),
            self.aggressive.map(CombatParam::Aggressive),
            self.dispel.map(CombatParam::Dispel),
            self.use_charges.map(CombatParam::UseCharges),
            self.valid_targets.map(CombatParam::ValidTargets),
            self.anchor.map(CombatParam::Anchor),
        ];
        optional.into_iter().flatten().collect()
    }
}

/// Script callback keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HooksSpec {
    pub formula: Option<HookKey>,
    pub tile: Option<HookKey>,
    pub target: Option<HookKey>,
}

impl HooksSpec {
    fn hooks(&self) -> impl Iterator<Item = CombatHook> {
        [
            self.formula.map(|key| CombatHook::Formula(FormulaHook::new(key))),
            self.tile.map(|key| CombatHook::Tile(TileHook::new(key))),
            self.target.map(|key| CombatHook::Target(TargetHook::new(key))),
        ]
        .into_iter()
        .flatten()
    }
}

/// One spell entry of a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellSpec {
    pub name: String,
    #[serde(default)]
    pub area: Option<AreaSpec>,
    #[serde(default)]
    pub params: ParamsSpec,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub formula: Option<LinearFormula>,
    #[serde(default)]
    pub hooks: HooksSpec,
}

impl SpellSpec {
    /// Builds the combat definition, validating shape and formula.
    pub fn build(&self) -> LoadResult<Combat> {
        let mut combat = Combat::new();
        for param in self.params.assignments() {
            combat.set_param(param);
        }
        if let Some(origin) = self.params.origin {
            combat.set_origin(origin);
        }
        if let Some(area) = &self.area {
            combat.set_area(area.build()?);
        }
        for condition in &self.conditions {
            combat.add_condition(condition.clone());
        }
        if let Some(formula) = &self.formula {
            combat.set_player_combat_values(
                formula.kind,
                formula.mina,
                formula.minb,
                formula.maxa,
                formula.maxb,
            )?;
        }
        for hook in self.hooks.hooks() {
            combat.set_callback(hook);
        }
        Ok(combat)
    }
}

/// Spell catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SpellCatalog {
    spells: Vec<SpellSpec>,
}

/// Frozen spell definitions keyed by name.
#[derive(Debug, Clone, Default)]
pub struct SpellBook {
    spells: BTreeMap<String, SharedCombat>,
}

impl SpellBook {
    pub fn get(&self, name: &str) -> Option<&SharedCombat> {
        self.spells.get(name)
    }

    /// Spell names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.spells.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SharedCombat)> {
        self.spells.iter().map(|(name, combat)| (name.as_str(), combat))
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}

/// Loader for spell catalogs from RON files.
pub struct SpellLoader;

impl SpellLoader {
    /// Load and build every spell of a RON catalog.
    pub fn load(path: &Path) -> LoadResult<SpellBook> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("In spell catalog {}", path.display()))
    }

    /// Raw entries, without building them.
    pub fn parse_specs(content: &str) -> LoadResult<Vec<SpellSpec>> {
        let catalog: SpellCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse spell catalog RON: {}", e))?;
        Ok(catalog.spells)
    }

    /// Any malformed or duplicate spell fails the whole load.
    pub fn parse(content: &str) -> LoadResult<SpellBook> {
        let mut spells = BTreeMap::new();
        for spec in Self::parse_specs(content)? {
            let combat = spec
                .build()
                .with_context(|| format!("Invalid spell `{}`", spec.name))?;
            if spells.contains_key(&spec.name) {
                anyhow::bail!("Duplicate spell `{}`", spec.name);
            }
            debug!(
                target: "combat::content",
                spell = %spec.name,
                has_area = combat.has_area(),
                "spell loaded"
            );
            spells.insert(spec.name, Arc::new(combat));
        }
        Ok(SpellBook { spells })
    }
}
