use super::Condition;
use crate::types::CombatType;

/// Item type data consulted for fields.
pub trait ItemTypeOracle: Send + Sync {
    fn field_type(&self, item_id: u16) -> Option<FieldType>;
}

/// Static description of a magic field item type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldType {
    pub item_id: u16,
    /// Whether other items may replace this field on its tile.
    pub replaceable: bool,
    pub combat_type: CombatType,
    /// Applied to creatures stepping onto the field.
    pub condition: Option<Condition>,
    /// Item created instead when a player casts it in a no-PvP situation.
    pub no_pvp_variant: Option<u16>,
}

impl FieldType {
    pub fn new(item_id: u16, combat_type: CombatType) -> Self {
        Self {
            item_id,
            replaceable: true,
            combat_type,
            condition: None,
            no_pvp_variant: None,
        }
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    #[must_use]
    pub fn with_no_pvp_variant(mut self, item_id: u16) -> Self {
        self.no_pvp_variant = Some(item_id);
        self
    }

    #[must_use]
    pub fn with_replaceable(mut self, replaceable: bool) -> Self {
        self.replaceable = replaceable;
        self
    }
}
