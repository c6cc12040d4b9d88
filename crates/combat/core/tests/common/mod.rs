//! In-memory world, effect recorder, and script stub shared by the
//! integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use combat_core::{
    CombatDamage, CombatType, Condition, ConditionType, CreatureId, CreatureView, DamageBounds,
    DistanceEffect, EffectSink, FieldType, HookKey, HookVerdict, ItemTypeOracle, MagicEffect,
    Position, ScriptError, ScriptHost, SoundEffect, TileFlags, TileView, WorldModel, WorldType,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HealthChange {
    pub caster: Option<CreatureId>,
    pub target: CreatureId,
    pub damage: CombatDamage,
}

#[derive(Default)]
pub struct MemoryWorld {
    pub world_type: WorldType,
    pub tiles: HashMap<Position, TileView>,
    pub creatures: HashMap<CreatureId, CreatureView>,
    pub immunities: HashSet<(CreatureId, ConditionType)>,
    pub conditions: HashMap<CreatureId, Vec<Condition>>,
    pub fields: Vec<(Position, u16, Option<CreatureId>)>,
    pub health_changes: Vec<HealthChange>,
    pub mana_changes: Vec<HealthChange>,
    pub blocked_sight: HashSet<Position>,
}

impl MemoryWorld {
    pub fn new(world_type: WorldType) -> Self {
        Self {
            world_type,
            ..Self::default()
        }
    }

    /// Open floor covering `[x0, x1] x [y0, y1]` on floor `z`.
    pub fn with_floor(mut self, x0: i32, x1: i32, y0: i32, y1: i32, z: u8) -> Self {
        for x in x0..=x1 {
            for y in y0..=y1 {
                let position = Position::new(x, y, z);
                self.tiles.insert(position, TileView::empty(position));
            }
        }
        self
    }

    pub fn flag(&mut self, position: Position, flags: TileFlags) {
        self.tiles
            .entry(position)
            .or_insert_with(|| TileView::empty(position))
            .flags |= flags;
    }

    /// Places `creature` on top of its tile's stack.
    pub fn spawn(&mut self, creature: CreatureView) {
        let tile = self
            .tiles
            .entry(creature.position)
            .or_insert_with(|| TileView::empty(creature.position));
        tile.creatures.insert(0, creature.id);
        self.creatures.insert(creature.id, creature);
    }

    pub fn health(&self, id: CreatureId) -> i32 {
        self.creatures[&id].health
    }

    pub fn conditions_of(&self, id: CreatureId) -> &[Condition] {
        self.conditions.get(&id).map_or(&[], Vec::as_slice)
    }
}

impl WorldModel for MemoryWorld {
    fn world_type(&self) -> WorldType {
        self.world_type
    }

    fn tile(&self, position: Position) -> Option<TileView> {
        self.tiles.get(&position).cloned()
    }

    fn creature(&self, id: CreatureId) -> Option<CreatureView> {
        self.creatures.get(&id).cloned()
    }

    fn is_sight_clear(&self, _from: Position, to: Position) -> bool {
        !self.blocked_sight.contains(&to)
    }

    fn is_immune(&self, id: CreatureId, kind: ConditionType) -> bool {
        self.immunities.contains(&(id, kind))
    }

    fn change_health(
        &mut self,
        caster: Option<CreatureId>,
        target: CreatureId,
        damage: &CombatDamage,
    ) -> bool {
        let Some(creature) = self.creatures.get_mut(&target) else {
            return false;
        };
        let delta = damage.primary.value + damage.secondary.value;
        creature.health = (creature.health + delta).min(creature.max_health);
        self.health_changes.push(HealthChange {
            caster,
            target,
            damage: *damage,
        });
        true
    }

    fn change_mana(
        &mut self,
        caster: Option<CreatureId>,
        target: CreatureId,
        damage: &CombatDamage,
    ) -> bool {
        let Some(creature) = self.creatures.get_mut(&target) else {
            return false;
        };
        creature.mana = (creature.mana + damage.primary.value).max(0);
        self.mana_changes.push(HealthChange {
            caster,
            target,
            damage: *damage,
        });
        true
    }

    fn add_condition(&mut self, target: CreatureId, condition: Condition) -> bool {
        self.conditions.entry(target).or_default().push(condition);
        true
    }

    fn remove_condition(&mut self, target: CreatureId, kind: ConditionType) -> bool {
        let Some(list) = self.conditions.get_mut(&target) else {
            return false;
        };
        let before = list.len();
        list.retain(|condition| condition.kind != kind);
        list.len() != before
    }

    fn add_field(&mut self, position: Position, item_id: u16, owner: Option<CreatureId>) -> bool {
        self.fields.push((position, item_id, owner));
        true
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Magic(Position, MagicEffect),
    Distance(Position, Position, DistanceEffect),
    Sound(Position, SoundEffect),
}

#[derive(Default)]
pub struct RecordingSink {
    pub effects: Vec<Effect>,
}

impl RecordingSink {
    pub fn magic_at(&self) -> Vec<Position> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Magic(position, _) => Some(*position),
                _ => None,
            })
            .collect()
    }

    pub fn count_distance(&self) -> usize {
        self.effects
            .iter()
            .filter(|effect| matches!(effect, Effect::Distance(..)))
            .count()
    }
}

impl EffectSink for RecordingSink {
    fn magic_effect(&mut self, position: Position, effect: MagicEffect) {
        self.effects.push(Effect::Magic(position, effect));
    }

    fn distance_effect(&mut self, from: Position, to: Position, effect: DistanceEffect) {
        self.effects.push(Effect::Distance(from, to, effect));
    }

    fn sound_effect(&mut self, position: Position, sound: SoundEffect) {
        self.effects.push(Effect::Sound(position, sound));
    }
}

/// Script host with canned answers per key. Unknown keys fail.
#[derive(Default)]
pub struct StubScripts {
    pub formulas: HashMap<HookKey, DamageBounds>,
    pub denied_tiles: HashSet<Position>,
    pub denied_targets: HashSet<CreatureId>,
    pub tile_keys: HashSet<HookKey>,
    pub target_keys: HashSet<HookKey>,
    pub charges_used: Mutex<u32>,
}

impl ScriptHost for StubScripts {
    fn min_max_values(
        &self,
        key: HookKey,
        _caster: Option<&CreatureView>,
        use_charges: bool,
    ) -> Result<DamageBounds, ScriptError> {
        if use_charges {
            if let Ok(mut charges) = self.charges_used.lock() {
                *charges += 1;
            }
        }
        self.formulas
            .get(&key)
            .copied()
            .ok_or(ScriptError::UnknownKey(key))
    }

    fn on_tile_combat(
        &self,
        key: HookKey,
        _caster: Option<&CreatureView>,
        tile: &TileView,
    ) -> Result<HookVerdict, ScriptError> {
        if !self.tile_keys.contains(&key) {
            return Err(ScriptError::Runtime {
                key,
                message: "attempt to index a nil value".to_string(),
            });
        }
        Ok(if self.denied_tiles.contains(&tile.position) {
            HookVerdict::Deny
        } else {
            HookVerdict::Allow
        })
    }

    fn on_target_combat(
        &self,
        key: HookKey,
        _caster: Option<&CreatureView>,
        target: &CreatureView,
    ) -> Result<HookVerdict, ScriptError> {
        if !self.target_keys.contains(&key) {
            return Err(ScriptError::UnknownKey(key));
        }
        Ok(if self.denied_targets.contains(&target.id) {
            HookVerdict::Deny
        } else {
            HookVerdict::Allow
        })
    }
}

pub const FIRE_FIELD: u16 = 1492;
pub const FIRE_FIELD_NO_PVP: u16 = 1500;
pub const POISON_FIELD: u16 = 1496;

/// Item types for the two field families used in the tests.
#[derive(Default)]
pub struct StaticItems;

impl ItemTypeOracle for StaticItems {
    fn field_type(&self, item_id: u16) -> Option<FieldType> {
        match item_id {
            FIRE_FIELD => Some(
                FieldType::new(FIRE_FIELD, CombatType::Fire)
                    .with_condition(Condition::new(ConditionType::Fire, 8_000).with_damage(-160))
                    .with_no_pvp_variant(FIRE_FIELD_NO_PVP),
            ),
            FIRE_FIELD_NO_PVP => Some(
                FieldType::new(FIRE_FIELD_NO_PVP, CombatType::Fire)
                    .with_condition(Condition::new(ConditionType::Fire, 8_000).with_damage(-160)),
            ),
            POISON_FIELD => Some(
                FieldType::new(POISON_FIELD, CombatType::Earth)
                    .with_condition(Condition::new(ConditionType::Poison, 10_000).with_damage(-100))
                    .with_replaceable(false),
            ),
            _ => None,
        }
    }
}

pub fn player(id: u32, position: Position) -> CreatureView {
    let mut view = CreatureView::player(CreatureId(id), position);
    view.level = 50;
    view.magic_level = 20;
    view.mana = 500;
    view.health = 500;
    view.max_health = 500;
    view
}

pub fn monster(id: u32, position: Position) -> CreatureView {
    let mut view = CreatureView::monster(CreatureId(id), position);
    view.health = 1_000;
    view.max_health = 1_000;
    view
}

/// Installs a test subscriber once so `RUST_LOG` shows engine traces.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
