use strum::EnumCount;

use super::{AreaError, Direction, MatrixArea, MatrixOperation};
use crate::config::CombatConfig;
use crate::env::{TileView, WorldModel};
use crate::types::{MAP_MAX_LAYERS, Position};

/// Meaning of one integer in an authored shape description.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Empty,
    Affected,
    /// The caster's cell, not itself affected.
    Center,
    /// The caster's cell, also affected.
    AffectedCenter,
}

impl CellKind {
    pub const fn from_value(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Empty),
            1 => Some(Self::Affected),
            2 => Some(Self::Center),
            3 => Some(Self::AffectedCenter),
            _ => None,
        }
    }

    const fn is_affected(self) -> bool {
        matches!(self, Self::Affected | Self::AffectedCenter)
    }

    const fn is_center(self) -> bool {
        matches!(self, Self::Center | Self::AffectedCenter)
    }
}

/// Row-major integer grid as written by content authors.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaDescription {
    pub rows: u32,
    pub cells: Vec<u32>,
}

impl AreaDescription {
    pub fn new(rows: u32, cells: Vec<u32>) -> Self {
        Self { rows, cells }
    }

    /// Parses the description into a single grid in its authored facing.
    pub fn to_matrix(&self) -> Result<MatrixArea, AreaError> {
        if self.cells.is_empty() {
            return Err(AreaError::EmptyDescription);
        }
        let len = self.cells.len();
        if self.rows == 0 || len % self.rows as usize != 0 {
            return Err(AreaError::RaggedDescription {
                len,
                rows: self.rows,
            });
        }

        let cols = (len / self.rows as usize) as u32;
        let mut grid = MatrixArea::new();
        grid.setup_area(self.rows, cols)?;

        let mut centers = 0;
        for (index, &value) in self.cells.iter().enumerate() {
            let row = index as u32 / cols;
            let col = index as u32 % cols;
            let kind = CellKind::from_value(value).ok_or(AreaError::InvalidCell {
                value,
                row,
                col,
            })?;

            if kind.is_affected() {
                grid.set_value(row, col, true)?;
            }
            if kind.is_center() {
                centers += 1;
                grid.set_center(row, col)?;
            }
        }

        match centers {
            0 => Err(AreaError::MissingCenter),
            1 => Ok(grid),
            count => Err(AreaError::MultipleCenters { count }),
        }
    }
}

/// Directional shape set: one grid per facing.
///
/// Cardinal slots are always populated together; diagonal slots only after
/// [`AreaCombat::setup_ext_area`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AreaCombat {
    areas: [MatrixArea; Direction::COUNT],
    has_ext_area: bool,
}

impl AreaCombat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the four cardinal variants from a south-facing description.
    pub fn setup_area(&mut self, description: &AreaDescription) -> Result<(), AreaError> {
        let south = description.to_matrix()?;
        self.install_cardinals(south)
    }

    /// Builds the four diagonal variants from a south-east-facing description.
    ///
    /// The cardinal variants must already be built, through
    /// [`AreaCombat::setup_area`] or a parametric shape.
    pub fn setup_ext_area(&mut self, description: &AreaDescription) -> Result<(), AreaError> {
        if !self.areas[Direction::South.index()].is_initialized() {
            return Err(AreaError::MissingCardinals);
        }
        let south_east = description.to_matrix()?;

        let mut south_west = MatrixArea::new();
        south_west.copy_from(&south_east, MatrixOperation::Mirror)?;
        let mut north_east = MatrixArea::new();
        north_east.copy_from(&south_east, MatrixOperation::Flip)?;
        let mut north_west = MatrixArea::new();
        north_west.copy_from(&south_east, MatrixOperation::Rotate180)?;

        self.areas[Direction::SouthEast.index()] = south_east;
        self.areas[Direction::SouthWest.index()] = south_west;
        self.areas[Direction::NorthEast.index()] = north_east;
        self.areas[Direction::NorthWest.index()] = north_west;
        self.has_ext_area = true;
        Ok(())
    }

    /// Triangular wave: `length` rows in front of the caster, each row's
    /// half-width growing by one every `spread` rows (`0` keeps a straight line).
    pub fn setup_cone(&mut self, length: i32, spread: i32) -> Result<(), AreaError> {
        if !(1..=CombatConfig::MAX_CONE_LENGTH).contains(&length) {
            return Err(AreaError::InvalidLength(length));
        }
        if spread < 0 {
            return Err(AreaError::InvalidSpread(spread));
        }

        let length = length as u32;
        let spread = spread as u32;
        let max_half = cone_half_width(length - 1, spread);
        let cols = 2 * max_half + 1;

        let mut south = MatrixArea::new();
        south.setup_area(length + 1, cols)?;
        south.set_center(0, max_half)?;

        for distance in 0..length {
            let half = cone_half_width(distance, spread);
            for col in (max_half - half)..=(max_half + half) {
                south.set_value(distance + 1, col, true)?;
            }
        }

        self.install_cardinals(south)
    }

    /// Filled disc centered on the caster, caster cell included.
    pub fn setup_circle(&mut self, radius: i32) -> Result<(), AreaError> {
        if !(0..=CombatConfig::MAX_CIRCLE_RADIUS).contains(&radius) {
            return Err(AreaError::InvalidRadius(radius));
        }

        let side = 2 * radius as u32 + 1;
        let mut south = MatrixArea::new();
        south.setup_area(side, side)?;
        south.set_center(radius as u32, radius as u32)?;

        let limit = i64::from(radius) * i64::from(radius);
        for row in 0..side {
            for col in 0..side {
                let dy = i64::from(row) - i64::from(radius);
                let dx = i64::from(col) - i64::from(radius);
                if dx * dx + dy * dy <= limit {
                    south.set_value(row, col, true)?;
                }
            }
        }

        self.install_cardinals(south)
    }

    /// Drops every variant.
    pub fn clear(&mut self) {
        for area in &mut self.areas {
            area.clear();
        }
        self.has_ext_area = false;
    }

    pub fn has_ext_area(&self) -> bool {
        self.has_ext_area
    }

    /// Deep copy built through the grid transform path.
    pub fn try_clone(&self) -> Result<Self, AreaError> {
        let mut copy = Self::new();
        for (slot, area) in copy.areas.iter_mut().zip(&self.areas) {
            if area.is_initialized() {
                slot.copy_from(area, MatrixOperation::Copy)?;
            }
        }
        copy.has_ext_area = self.has_ext_area;
        Ok(copy)
    }

    /// Grid stored for `direction`, if built.
    pub fn area(&self, direction: Direction) -> Option<&MatrixArea> {
        let area = &self.areas[direction.index()];
        area.is_initialized().then_some(area)
    }

    /// Facing chosen for a cast from `center` towards `target`.
    pub fn direction(&self, center: Position, target: Position) -> Direction {
        Direction::resolve(
            target.offset_x(center),
            target.offset_y(center),
            self.has_ext_area,
        )
    }

    /// Grid for a cast from `center` towards `target`; `None` means the effect
    /// has no shape for that facing.
    pub fn get_area(&self, center: Position, target: Position) -> Option<&MatrixArea> {
        self.area(self.direction(center, target))
    }

    /// Affected world cells, grid center placed on `center`.
    pub fn cells(&self, center: Position, target: Position) -> Vec<Position> {
        self.cells_anchored(center, target, center)
    }

    /// Affected world cells for the facing `center → target`, grid center
    /// placed on `anchor`. Order follows the grid's row-major scan.
    pub fn cells_anchored(
        &self,
        center: Position,
        target: Position,
        anchor: Position,
    ) -> Vec<Position> {
        if target.z >= MAP_MAX_LAYERS {
            return Vec::new();
        }
        let Some(area) = self.get_area(center, target) else {
            return Vec::new();
        };

        let (center_row, center_col) = area.center();
        let mut cells = Vec::with_capacity(area.count());
        for row in 0..area.rows() {
            for col in 0..area.cols() {
                if area.get_value_unchecked(row, col) {
                    let dx = col as i32 - center_col as i32;
                    let dy = row as i32 - center_row as i32;
                    cells.push(anchor.offset(dx, dy));
                }
            }
        }
        cells
    }

    /// Tiles affected by a cast from `center` towards `target`, anchored on `center`.
    pub fn get_list<W>(&self, center: Position, target: Position, world: &W) -> Vec<TileView>
    where
        W: WorldModel + ?Sized,
    {
        self.get_list_anchored(center, target, center, world)
    }

    /// Tiles for the facing `center → target` anchored on `anchor`. Cells
    /// without line of sight from the anchor are dropped; cells without a
    /// stored tile yield an empty tile.
    pub fn get_list_anchored<W>(
        &self,
        center: Position,
        target: Position,
        anchor: Position,
        world: &W,
    ) -> Vec<TileView>
    where
        W: WorldModel + ?Sized,
    {
        self.cells_anchored(center, target, anchor)
            .into_iter()
            .filter(|&cell| world.is_sight_clear(anchor, cell))
            .map(|cell| world.tile(cell).unwrap_or_else(|| TileView::empty(cell)))
            .collect()
    }

    fn install_cardinals(&mut self, south: MatrixArea) -> Result<(), AreaError> {
        let mut north = MatrixArea::new();
        north.copy_from(&south, MatrixOperation::Rotate180)?;
        let mut east = MatrixArea::new();
        east.copy_from(&south, MatrixOperation::Rotate270)?;
        let mut west = MatrixArea::new();
        west.copy_from(&south, MatrixOperation::Rotate90)?;

        self.areas[Direction::South.index()] = south;
        self.areas[Direction::North.index()] = north;
        self.areas[Direction::East.index()] = east;
        self.areas[Direction::West.index()] = west;
        Ok(())
    }
}

/// Half-width of the cone row `distance` cells in front of the caster.
const fn cone_half_width(distance: u32, spread: u32) -> u32 {
    if spread == 0 {
        0
    } else {
        (distance + 1) / spread
    }
}
