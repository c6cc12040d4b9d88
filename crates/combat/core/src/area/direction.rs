use strum::{Display, EnumCount, EnumIter};

/// Facing of a shape variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    North,
    East,
    South,
    West,
    SouthWest,
    SouthEast,
    NorthWest,
    NorthEast,
}

impl Direction {
    pub const CARDINALS: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];
    pub const DIAGONALS: [Direction; 4] = [
        Self::SouthWest,
        Self::SouthEast,
        Self::NorthWest,
        Self::NorthEast,
    ];

    /// Slot index inside a shape set.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Self::SouthWest | Self::SouthEast | Self::NorthWest | Self::NorthEast
        )
    }

    /// Decision table from the signs of the caster→target offset.
    ///
    /// `dx == 0 && dy == 0` resolves to `South`.
    pub const fn resolve(sign_x: i32, sign_y: i32, extended: bool) -> Self {
        match (sign_x.signum(), sign_y.signum(), extended) {
            (-1, -1, true) => Self::NorthWest,
            (1, -1, true) => Self::NorthEast,
            (-1, 1, true) => Self::SouthWest,
            (1, 1, true) => Self::SouthEast,
            (-1, _, _) => Self::West,
            (1, _, _) => Self::East,
            (0, -1, _) => Self::North,
            _ => Self::South,
        }
    }
}
