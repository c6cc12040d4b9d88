//! Render spell shapes as ASCII grids
//!
//! Legend: `#` affected, `@` caster center, `*` affected center, `.` empty.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;

use combat_content::SpellLoader;
use combat_core::{AreaCombat, Direction, MatrixArea};

/// Render the directional variants of a spell's shape
#[derive(Parser)]
pub struct PreviewArea {
    /// Spell catalog (RON)
    #[arg(short, long, value_name = "FILE")]
    spells: PathBuf,

    /// Spell to render
    #[arg(short, long, value_name = "NAME")]
    name: String,

    /// Only render this facing
    #[arg(short, long, value_enum)]
    direction: Option<Facing>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Facing {
    North,
    East,
    South,
    West,
    SouthWest,
    SouthEast,
    NorthWest,
    NorthEast,
}

impl From<Facing> for Direction {
    fn from(facing: Facing) -> Self {
        match facing {
            Facing::North => Direction::North,
            Facing::East => Direction::East,
            Facing::South => Direction::South,
            Facing::West => Direction::West,
            Facing::SouthWest => Direction::SouthWest,
            Facing::SouthEast => Direction::SouthEast,
            Facing::NorthWest => Direction::NorthWest,
            Facing::NorthEast => Direction::NorthEast,
        }
    }
}

impl PreviewArea {
    pub fn execute(self) -> Result<()> {
        let book = SpellLoader::load(&self.spells)
            .with_context(|| format!("Failed to load spells from {}", self.spells.display()))?;
        let combat = book
            .get(&self.name)
            .with_context(|| format!("Spell `{}` not found", self.name))?;
        let Some(area) = combat.area() else {
            anyhow::bail!("Spell `{}` has no shape; it affects a single tile", self.name);
        };

        println!("{} {}", style("Spell:").bold().cyan(), self.name);
        println!();

        let directions: Vec<Direction> = match self.direction {
            Some(facing) => vec![facing.into()],
            None => Direction::CARDINALS
                .into_iter()
                .chain(Direction::DIAGONALS)
                .collect(),
        };

        for direction in directions {
            render_direction(area, direction);
        }
        Ok(())
    }
}

fn render_direction(area: &AreaCombat, direction: Direction) {
    println!("{}", style(direction).bold().yellow());
    match area.area(direction) {
        Some(grid) => {
            for line in render(grid) {
                println!("  {line}");
            }
        }
        None => println!("  {}", style("(no variant)").dim()),
    }
    println!();
}

fn render(grid: &MatrixArea) -> Vec<String> {
    let center = grid.center();
    (0..grid.rows())
        .map(|row| {
            (0..grid.cols())
                .map(|col| match ((row, col) == center, grid.get_value(row, col)) {
                    (true, true) => '*',
                    (true, false) => '@',
                    (false, true) => '#',
                    (false, false) => '.',
                })
                .collect()
        })
        .collect()
}
