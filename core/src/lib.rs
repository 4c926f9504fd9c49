#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use listener::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod listener;
mod tile;
mod types;

/// Player-selectable difficulty; the board side is always [`GRID_SIZE`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Hard,
}

impl Difficulty {
    pub const fn mines(self) -> CellCount {
        match self {
            Self::Easy => 10,
            Self::Hard => 20,
        }
    }

    pub const fn config(self) -> GameConfig {
        GameConfig::new_unchecked(GRID_SIZE, self.mines())
    }
}

/// Square board side and mine count for one game.
///
/// Always holds `mines < side * side`, so there is at least one safe cell to move a mine to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedGameConfig")]
pub struct GameConfig {
    side: Coord,
    mines: CellCount,
}

#[derive(Deserialize)]
struct UncheckedGameConfig {
    side: Coord,
    mines: CellCount,
}

impl TryFrom<UncheckedGameConfig> for GameConfig {
    type Error = GameError;

    fn try_from(config: UncheckedGameConfig) -> Result<Self> {
        Self::new(config.side, config.mines)
    }
}

impl GameConfig {
    pub(crate) const fn new_unchecked(side: Coord, mines: CellCount) -> Self {
        Self { side, mines }
    }

    pub fn new(side: Coord, mines: CellCount) -> Result<Self> {
        if side == 0 {
            return Err(GameError::InvalidBoardShape);
        }
        let total = mult(side, side);
        if mines >= total {
            log::warn!("Rejected config: {} mines do not fit a board of {} cells", mines, total);
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(side, mines))
    }

    pub const fn side(&self) -> Coord {
        self.side
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.side, self.side)
    }

    pub const fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mines
    }

    pub fn validate_index(&self, index: CellIndex) -> Result<CellIndex> {
        if index < self.total_cells() {
            Ok(index)
        } else {
            Err(GameError::InvalidIndex)
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Difficulty::default().config()
    }
}

/// Where the mines of one game are, before any cell is opened.
#[derive(Clone, Debug, PartialEq)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    config: GameConfig,
}

impl MineLayout {
    pub(crate) fn new_unchecked(mine_mask: Array2<bool>, config: GameConfig) -> Self {
        Self { mine_mask, config }
    }

    /// Builds a fixed layout, mostly useful for deterministic boards. Duplicate indices count once.
    pub fn from_mine_indices(side: Coord, mine_indices: &[CellIndex]) -> Result<Self> {
        let empty = GameConfig::new(side, 0)?;
        let mut mine_mask: Array2<bool> = Array2::default((side, side).to_nd_index());

        for &index in mine_indices {
            let index = empty.validate_index(index)?;
            mine_mask[index_to_coords(index, side).to_nd_index()] = true;
        }

        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .map_err(|_| GameError::TooManyMines)?;
        let config = GameConfig::new(side, mine_count)?;

        Ok(Self::new_unchecked(mine_mask, config))
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines()
    }

    pub fn contains_mine(&self, index: CellIndex) -> bool {
        self.config.validate_index(index).is_ok()
            && self.mine_mask[index_to_coords(index, self.config.side()).to_nd_index()]
    }

    /// Mine indices in ascending order.
    pub fn mine_indices(&self) -> Vec<CellIndex> {
        (0..self.config.total_cells())
            .filter(|&index| self.contains_mine(index))
            .collect()
    }

    pub(crate) fn into_field(self) -> Array2<CellState> {
        self.mine_mask
            .map(|&is_mine| if is_mine { CellState::Mine } else { CellState::Hidden })
    }
}

/// A cell revealed by one open, with the number of mines around it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenedCell {
    pub index: CellIndex,
    pub adjacent_mines: u8,
}

/// What a single [`MinefieldEngine::open_cell`] call did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenOutcome {
    /// The game is not in progress, nothing was processed.
    NoChange,
    /// Cells were revealed (possibly none, when re-opening a revealed cell).
    Opened { cells: Vec<OpenedCell> },
    /// Cells were revealed and no safe cell is left hidden.
    Won { cells: Vec<OpenedCell> },
    /// A mine was opened; lists every mine on the board.
    Lost { mines: Vec<CellIndex> },
}

impl OpenOutcome {
    /// Whether this outcome could have caused an update to the game
    pub fn has_update(&self) -> bool {
        use OpenOutcome::*;
        match self {
            NoChange => false,
            Opened { cells } => !cells.is_empty(),
            Won { .. } => true,
            Lost { .. } => true,
        }
    }

    pub const fn is_final(&self) -> bool {
        matches!(self, Self::Won { .. } | Self::Lost { .. })
    }

    pub fn opened_cells(&self) -> &[OpenedCell] {
        match self {
            Self::Opened { cells } | Self::Won { cells } => cells.as_slice(),
            Self::NoChange | Self::Lost { .. } => &[],
        }
    }
}
