use crate::damage::CombatDamage;
use crate::env::OracleError;
use crate::error::{CombatError, ErrorSeverity};
use crate::types::{CreatureId, Position};

/// Why a tile or creature was not affected by a cast.
///
/// Rejections are normal outcomes of the targeting rules, not failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatRejection {
    #[error("creature {0} is dead or no longer in the world")]
    TargetGone(CreatureId),

    #[error("effect does not apply to this kind of creature")]
    InvalidTargetKind,

    #[error("an aggressive effect cannot target its caster")]
    SelfTarget,

    #[error("there is not enough room")]
    NotEnoughRoom,

    #[error("first go downstairs")]
    FirstGoDownstairs,

    #[error("first go upstairs")]
    FirstGoUpstairs,

    #[error("action not permitted in a protection zone")]
    ProtectionZone,

    #[error("you may not attack a person while you are in a protection zone")]
    CasterInProtectionZone,

    #[error("action not permitted in a non-PvP zone")]
    NoPvpZone,

    #[error("you may not attack this player")]
    CannotAttackPlayer,

    #[error("you may not attack this creature")]
    CannotAttackCreature,

    #[error("the target is a member of your party or guild")]
    Ally,

    #[error("a summon cannot harm its master")]
    OwnMaster,

    #[error("turn secure mode off to attack unmarked players")]
    SecureMode,

    #[error("rejected by script")]
    VetoedByScript,

    #[error(transparent)]
    MissingOracle(#[from] OracleError),
}

impl CombatError for CombatRejection {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingOracle(error) => error.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TargetGone(_) => "REJECT_TARGET_GONE",
            Self::InvalidTargetKind => "REJECT_INVALID_TARGET_KIND",
            Self::SelfTarget => "REJECT_SELF_TARGET",
            Self::NotEnoughRoom => "REJECT_NOT_ENOUGH_ROOM",
            Self::FirstGoDownstairs => "REJECT_FIRST_GO_DOWNSTAIRS",
            Self::FirstGoUpstairs => "REJECT_FIRST_GO_UPSTAIRS",
            Self::ProtectionZone => "REJECT_PROTECTION_ZONE",
            Self::CasterInProtectionZone => "REJECT_CASTER_IN_PROTECTION_ZONE",
            Self::NoPvpZone => "REJECT_NO_PVP_ZONE",
            Self::CannotAttackPlayer => "REJECT_CANNOT_ATTACK_PLAYER",
            Self::CannotAttackCreature => "REJECT_CANNOT_ATTACK_CREATURE",
            Self::Ally => "REJECT_ALLY",
            Self::OwnMaster => "REJECT_OWN_MASTER",
            Self::SecureMode => "REJECT_SECURE_MODE",
            Self::VetoedByScript => "REJECT_VETOED_BY_SCRIPT",
            Self::MissingOracle(error) => error.error_code(),
        }
    }
}

/// Result of applying an effect to one creature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetOutcome {
    pub target: CreatureId,
    /// Damage handed to the world, for health and mana effects.
    pub damage: Option<CombatDamage>,
    /// Whether the world accepted the health/mana change.
    pub changed: bool,
    /// Conditions the world accepted.
    pub conditions: usize,
    pub dispelled: bool,
}

impl TargetOutcome {
    pub(crate) fn new(target: CreatureId) -> Self {
        Self {
            target,
            damage: None,
            changed: false,
            conditions: 0,
            dispelled: false,
        }
    }
}

/// A tile or creature an area cast skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rejected {
    pub position: Position,
    /// `None` when the whole tile was skipped.
    pub creature: Option<CreatureId>,
    pub reason: CombatRejection,
}

/// Result of one area cast.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AreaOutcome {
    /// Tiles that passed validation, in visit order.
    pub tiles: Vec<Position>,
    pub hits: Vec<TargetOutcome>,
    pub rejections: Vec<Rejected>,
}

impl AreaOutcome {
    pub fn hit(&self, id: CreatureId) -> Option<&TargetOutcome> {
        self.hits.iter().find(|hit| hit.target == id)
    }

    pub fn rejection(&self, id: CreatureId) -> Option<CombatRejection> {
        self.rejections
            .iter()
            .find(|r| r.creature == Some(id))
            .map(|r| r.reason)
    }
}
