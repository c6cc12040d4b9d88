//! Damage values, bounds, and the linear damage formula.

use strum::{Display, EnumString};

use crate::env::{CreatureView, RngOracle};
use crate::error::{CombatError, ErrorSeverity};
use crate::types::{CombatOrigin, CombatType};

/// One typed component of a damage value. Negative damages, positive heals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageComponent {
    pub kind: CombatType,
    pub value: i32,
}

impl DamageComponent {
    pub const fn new(kind: CombatType, value: i32) -> Self {
        Self { kind, value }
    }
}

/// Damage handed to the world for a single target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CombatDamage {
    pub primary: DamageComponent,
    pub secondary: DamageComponent,
    pub origin: CombatOrigin,
    pub blocked_by_armor: bool,
    pub blocked_by_shield: bool,
}

impl CombatDamage {
    pub const fn new(kind: CombatType, value: i32, origin: CombatOrigin) -> Self {
        Self {
            primary: DamageComponent::new(kind, value),
            secondary: DamageComponent::new(CombatType::None, 0),
            origin,
            blocked_by_armor: false,
            blocked_by_shield: false,
        }
    }

    pub const fn is_healing(&self) -> bool {
        self.primary.kind.is_healing()
    }

    /// Keeps `percent` of both components, rounding toward zero and
    /// saturating at the `i32` range.
    pub fn scale(&mut self, percent: u32) {
        let scale = |value: i32| {
            let scaled = i64::from(value) * i64::from(percent) / 100;
            scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
        };
        self.primary.value = scale(self.primary.value);
        self.secondary.value = scale(self.secondary.value);
    }
}

/// Inclusive range a damage value is rolled from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageBounds {
    pub min: i32,
    pub max: i32,
}

impl DamageBounds {
    pub const ZERO: Self = Self { min: 0, max: 0 };

    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Same range with `min <= max`.
    #[must_use]
    pub fn ordered(self) -> Self {
        Self {
            min: self.min.min(self.max),
            max: self.min.max(self.max),
        }
    }

    pub fn roll(self, rng: &dyn RngOracle, seed: u64) -> i32 {
        let Self { min, max } = self.ordered();
        rng.range(seed, min, max)
    }
}

/// Caster attribute the linear coefficients are multiplied with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum FormulaType {
    /// No formula; bounds are zero.
    #[default]
    Undefined,
    /// `level * 2 + magic_level * 3`.
    LevelMagic,
    /// Maximum weapon damage from level, skill, and weapon attack.
    Skill,
    /// Coefficients `mina`/`maxa` are the bounds themselves.
    Damage,
}

/// `min = mina * a + minb`, `max = maxa * a + maxb` over a caster attribute `a`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearFormula {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: FormulaType,
    pub mina: f64,
    pub minb: f64,
    pub maxa: f64,
    pub maxb: f64,
}

impl LinearFormula {
    /// # Errors
    ///
    /// Returns `ConfigError::NonFiniteCoefficient` for NaN or infinite coefficients.
    pub fn new(
        kind: FormulaType,
        mina: f64,
        minb: f64,
        maxa: f64,
        maxb: f64,
    ) -> Result<Self, ConfigError> {
        for (name, value) in [("mina", mina), ("minb", minb), ("maxa", maxa), ("maxb", maxb)] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteCoefficient { name, value });
            }
        }
        Ok(Self {
            kind,
            mina,
            minb,
            maxa,
            maxb,
        })
    }

    pub fn is_defined(&self) -> bool {
        self.kind != FormulaType::Undefined
    }

    /// Attribute value `a` for `caster`, or `None` when the formula needs none.
    pub fn input(&self, caster: &CreatureView) -> Option<f64> {
        match self.kind {
            FormulaType::Undefined | FormulaType::Damage => None,
            FormulaType::LevelMagic => {
                Some(f64::from(caster.level) * 2.0 + f64::from(caster.magic_level) * 3.0)
            }
            FormulaType::Skill => Some(max_weapon_damage(
                caster.level,
                caster.skill,
                caster.attack,
            )),
        }
    }

    /// Bounds for an explicit attribute value.
    pub fn bounds_for(&self, a: f64) -> DamageBounds {
        match self.kind {
            FormulaType::Undefined => DamageBounds::ZERO,
            FormulaType::Damage => DamageBounds::new(to_damage(self.mina), to_damage(self.maxa)),
            FormulaType::LevelMagic | FormulaType::Skill => DamageBounds::new(
                to_damage(self.mina.mul_add(a, self.minb)),
                to_damage(self.maxa.mul_add(a, self.maxb)),
            ),
        }
    }

    /// Bounds for `caster`. Attribute-based formulas yield zero without a caster.
    pub fn bounds(&self, caster: Option<&CreatureView>) -> DamageBounds {
        match (self.kind, caster) {
            (FormulaType::Damage, _) => self.bounds_for(1.0),
            (_, Some(caster)) => self
                .input(caster)
                .map_or(DamageBounds::ZERO, |a| self.bounds_for(a)),
            (_, None) => DamageBounds::ZERO,
        }
    }
}

fn max_weapon_damage(level: u32, skill: u32, attack: u32) -> f64 {
    let level = f64::from(level / 5);
    let skill = f64::from(skill) / 4.0 + 1.0;
    let attack = f64::from(attack) / 3.0;
    (level + skill * attack * 1.03).round()
}

/// Truncates toward zero, saturating at the `i32` range.
fn to_damage(value: f64) -> i32 {
    value as i32
}

/// Invalid combat definition detected while building an engine.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("formula coefficient {name} must be finite, got {value}")]
    NonFiniteCoefficient { name: &'static str, value: f64 },

    #[error(transparent)]
    Area(#[from] crate::area::AreaError),
}

impl CombatError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NonFiniteCoefficient { .. } => ErrorSeverity::Validation,
            Self::Area(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NonFiniteCoefficient { .. } => "CONFIG_NON_FINITE_COEFFICIENT",
            Self::Area(error) => error.error_code(),
        }
    }
}
