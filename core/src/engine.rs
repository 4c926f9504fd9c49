use alloc::collections::VecDeque;
use alloc::vec::Vec;
use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// No game has been initialized yet.
    Idle,
    Playing,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Game state of one Minesweeper session.
///
/// Owns the board and the random source used to place and relocate mines. Every call runs to
/// completion; outcomes are returned rather than pushed to a stored observer.
#[derive(Clone, Debug)]
pub struct MinefieldEngine {
    config: GameConfig,
    field: Array2<CellState>,
    cells_left: CellCount,
    first_cell_open: bool,
    state: EngineState,
    rng: SmallRng,
}

impl MinefieldEngine {
    /// Creates an idle engine, call [`MinefieldEngine::initialize`] to start a game.
    pub fn new(seed: u64) -> Self {
        let config = GameConfig::default();
        Self {
            config,
            field: Array2::default((config.side(), config.side()).to_nd_index()),
            cells_left: config.total_cells(),
            first_cell_open: false,
            state: EngineState::Idle,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Starts a game on a fixed layout instead of a random one.
    pub fn from_layout(mine_layout: MineLayout, seed: u64) -> Self {
        let mut engine = Self::new(seed);
        engine.start(mine_layout);
        engine
    }

    /// Discards any current game and starts a new one on a [`GRID_SIZE`] board.
    pub fn initialize(&mut self, difficulty: Difficulty) {
        let mine_layout = RejectionSampler::new(&mut self.rng).generate(difficulty.config());
        log::debug!("New {:?} game with {} mines", difficulty, mine_layout.mine_count());
        self.start(mine_layout);
    }

    fn start(&mut self, mine_layout: MineLayout) {
        self.config = mine_layout.config();
        self.field = mine_layout.into_field();
        self.cells_left = self.config.total_cells();
        self.first_cell_open = false;
        self.state = EngineState::Playing;
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// Side of the square board.
    pub fn field_size(&self) -> Coord {
        self.config.side()
    }

    /// Mine count the game was configured with, flags are not tracked.
    pub fn mines_count(&self) -> CellCount {
        self.config.mines()
    }

    /// Cells not revealed yet, mines included.
    pub fn cells_left(&self) -> CellCount {
        self.cells_left
    }

    pub fn is_playable(&self) -> bool {
        self.state.is_playing()
    }

    pub fn is_revealed(&self, index: CellIndex) -> bool {
        self.adjacent_mines(index).is_some()
    }

    /// Adjacent mine count of a revealed cell, `None` when hidden or outside the board.
    pub fn adjacent_mines(&self, index: CellIndex) -> Option<u8> {
        let index = self.config.validate_index(index).ok()?;
        self.cell(index).adjacent_mines()
    }

    /// Opens a cell, cascading through zero-count regions.
    ///
    /// Ignored with [`OpenOutcome::NoChange`] while no game is in progress. The first open of a
    /// game never hits a mine: a mine under it is moved to another free cell first.
    pub fn open_cell(&mut self, index: CellIndex) -> Result<OpenOutcome> {
        let index = self.config.validate_index(index)?;

        if self.state.is_finished() {
            log::trace!("Game already over, ignoring open at {}", index);
            return Ok(OpenOutcome::NoChange);
        }
        if !self.state.is_playing() {
            log::trace!("No game in progress, ignoring open at {}", index);
            return Ok(OpenOutcome::NoChange);
        }

        let mut is_hit = self.cell(index).is_mine();
        if !self.first_cell_open {
            self.first_cell_open = true;
            if is_hit {
                is_hit = !self.relocate_mine(index);
            }
        }

        if is_hit {
            let mines = self.mine_indices();
            log::debug!("Hit mine at {}, game lost", index);
            self.state = EngineState::Lost;
            return Ok(OpenOutcome::Lost { mines });
        }

        let cells = self.reveal_from(index);

        let revealed = self.config.total_cells() - self.cells_left;
        if revealed == self.config.safe_cell_count() {
            log::debug!("Last safe cell opened, game won");
            self.state = EngineState::Won;
            Ok(OpenOutcome::Won { cells })
        } else {
            Ok(OpenOutcome::Opened { cells })
        }
    }

    /// Same as [`MinefieldEngine::open_cell`], also replaying the outcome on `listener`.
    pub fn open_cell_with<L: GameListener + ?Sized>(
        &mut self,
        index: CellIndex,
        listener: &mut L,
    ) -> Result<OpenOutcome> {
        let outcome = self.open_cell(index)?;
        outcome.notify(listener);
        Ok(outcome)
    }

    /// Moves the mine at `from` onto a uniformly chosen hidden cell.
    ///
    /// Picks the k-th hidden cell rather than resampling, so it finishes in one pass for any
    /// valid config. Returns false if no hidden cell is available.
    fn relocate_mine(&mut self, from: CellIndex) -> bool {
        let free_cells = self.field.iter().filter(|cell| cell.is_hidden()).count();
        if free_cells == 0 {
            log::warn!("No free cell to move the mine at {} to", from);
            return false;
        }

        let pick = self.rng.random_range(0..free_cells);
        let Some(to) = (0..self.config.total_cells())
            .filter(|&index| self.cell(index).is_hidden())
            .nth(pick)
        else {
            return false;
        };

        self.set_cell(to, CellState::Mine);
        self.set_cell(from, CellState::Hidden);
        log::debug!("First open hit a mine, moved it from {} to {}", from, to);
        true
    }

    fn reveal_from(&mut self, start: CellIndex) -> Vec<OpenedCell> {
        let mut cells = Vec::new();
        let mut to_visit = VecDeque::from([start]);

        while let Some(index) = to_visit.pop_front() {
            // already revealed cells are the visited set
            if !self.cell(index).is_hidden() {
                continue;
            }

            let adjacent_mines = self.count_adjacent_mines(index);
            self.set_cell(index, CellState::Revealed(adjacent_mines));
            self.cells_left -= 1;
            cells.push(OpenedCell {
                index,
                adjacent_mines,
            });
            log::trace!("Opened cell {}, adjacent mines: {}", index, adjacent_mines);

            if adjacent_mines == 0 {
                to_visit.extend(
                    self.iter_neighbors(index)
                        .filter(|&pos| self.cell(pos).is_hidden()),
                );
            }
        }

        cells
    }

    fn count_adjacent_mines(&self, index: CellIndex) -> u8 {
        self.iter_neighbors(index)
            .filter(|&pos| self.cell(pos).is_mine())
            .count()
            .try_into()
            .unwrap_or(u8::MAX)
    }

    pub(crate) fn mine_indices(&self) -> Vec<CellIndex> {
        (0..self.config.total_cells())
            .filter(|&index| self.cell(index).is_mine())
            .collect()
    }

    fn iter_neighbors(&self, index: CellIndex) -> NeighborIter {
        NeighborIter::new(index, self.config.side())
    }

    fn cell(&self, index: CellIndex) -> CellState {
        self.field[index_to_coords(index, self.config.side()).to_nd_index()]
    }

    fn set_cell(&mut self, index: CellIndex, cell: CellState) {
        self.field[index_to_coords(index, self.config.side()).to_nd_index()] = cell;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::tests::{Event, Recorder};
    use alloc::collections::BTreeSet;
    use alloc::vec;

    fn engine(side: Coord, mines: &[CellIndex]) -> MinefieldEngine {
        MinefieldEngine::from_layout(MineLayout::from_mine_indices(side, mines).unwrap(), 0)
    }

    fn indices(cells: &[OpenedCell]) -> BTreeSet<CellIndex> {
        cells.iter().map(|cell| cell.index).collect()
    }

    #[test]
    fn idle_engine_ignores_opens() {
        let mut engine = MinefieldEngine::new(1);

        assert!(!engine.is_playable());
        assert!(!engine.state().is_finished());
        assert_eq!(engine.open_cell(0).unwrap(), OpenOutcome::NoChange);
        assert_eq!(engine.cells_left(), 100);
    }

    #[test]
    fn initialize_places_configured_mines() {
        let mut engine = MinefieldEngine::new(3);

        for difficulty in [Difficulty::Easy, Difficulty::Hard] {
            engine.initialize(difficulty);

            assert!(engine.is_playable());
            assert_eq!(engine.field_size(), GRID_SIZE);
            assert_eq!(engine.cells_left(), 100);
            assert_eq!(engine.mines_count(), difficulty.mines());
            assert_eq!(engine.mine_indices().len(), usize::from(difficulty.mines()));
        }
    }

    #[test]
    fn initialize_mid_game_starts_over() {
        let mut engine = MinefieldEngine::new(5);
        engine.initialize(Difficulty::Easy);
        let safe = (0..100).find(|&index| !engine.cell(index).is_mine()).unwrap();
        engine.open_cell(safe).unwrap();

        engine.initialize(Difficulty::Hard);

        assert_eq!(engine.cells_left(), 100);
        assert!(!engine.is_revealed(safe));
        assert_eq!(engine.mines_count(), 20);
        assert!(engine.is_playable());
    }

    #[test]
    fn open_far_corner_cascades_to_win() {
        let mut engine = engine(4, &[0]);

        let outcome = engine.open_cell(15).unwrap();

        let OpenOutcome::Won { cells } = outcome else {
            panic!("expected a win, got {:?}", outcome);
        };
        assert_eq!(cells.len(), 15);
        for cell in &cells {
            let expected = if matches!(cell.index, 1 | 4 | 5) { 1 } else { 0 };
            assert_eq!(cell.adjacent_mines, expected, "cell {}", cell.index);
        }
        assert!(!indices(&cells).contains(&0));
        assert_eq!(engine.cells_left(), 1);
        assert!(!engine.is_playable());
    }

    #[test]
    fn first_open_on_mine_relocates_it() {
        let mut engine = engine(4, &[0]);

        let outcome = engine.open_cell(0).unwrap();

        assert!(!matches!(outcome, OpenOutcome::Lost { .. }));
        let mines = engine.mine_indices();
        assert_eq!(mines.len(), 1);
        assert_ne!(mines[0], 0);

        let expected = u8::from(matches!(mines[0], 1 | 4 | 5));
        assert_eq!(
            outcome.opened_cells()[0],
            OpenedCell {
                index: 0,
                adjacent_mines: expected,
            }
        );
        assert_eq!(engine.adjacent_mines(0), Some(expected));
    }

    #[test]
    fn first_open_is_always_safe() {
        for seed in 0..64 {
            let mut engine = MinefieldEngine::new(seed);
            engine.initialize(Difficulty::Hard);
            let mine = engine.mine_indices()[0];

            let outcome = engine.open_cell(mine).unwrap();

            assert!(!matches!(outcome, OpenOutcome::Lost { .. }), "seed {}", seed);
            assert_eq!(engine.mine_indices().len(), 20);
            assert!(engine.is_revealed(mine));
        }
    }

    #[test]
    fn later_open_on_mine_loses() {
        let mut engine = engine(4, &[0, 15]);

        assert_eq!(
            engine.open_cell(5).unwrap(),
            OpenOutcome::Opened {
                cells: vec![OpenedCell {
                    index: 5,
                    adjacent_mines: 1,
                }],
            }
        );

        let outcome = engine.open_cell(0).unwrap();

        assert_eq!(outcome, OpenOutcome::Lost { mines: vec![0, 15] });
        assert_eq!(engine.state(), EngineState::Lost);
        assert!(engine.state().is_finished());
        assert!(!engine.is_playable());
        assert_eq!(engine.open_cell(10).unwrap(), OpenOutcome::NoChange);
        assert!(!engine.is_revealed(10));
    }

    #[test]
    fn reopening_revealed_cell_gives_empty_batch() {
        let mut engine = engine(4, &[0, 15]);
        engine.open_cell(5).unwrap();
        let cells_left = engine.cells_left();

        let outcome = engine.open_cell(5).unwrap();

        assert_eq!(outcome, OpenOutcome::Opened { cells: vec![] });
        assert!(!outcome.has_update());
        assert_eq!(engine.cells_left(), cells_left);
    }

    #[test]
    fn flood_fill_stops_at_numbered_border() {
        // a wall of mines down the middle column of a 5x5 board
        let mut engine = engine(5, &[2, 7, 12, 17, 22]);

        let outcome = engine.open_cell(0).unwrap();
        let cells = outcome.opened_cells();

        assert!(matches!(outcome, OpenOutcome::Opened { .. }));
        assert_eq!(
            indices(cells),
            BTreeSet::from([0, 1, 5, 6, 10, 11, 15, 16, 20, 21])
        );
        for cell in cells {
            let expected = match cell.index {
                0 | 5 | 10 | 15 | 20 => 0,
                1 | 21 => 2,
                _ => 3,
            };
            assert_eq!(cell.adjacent_mines, expected, "cell {}", cell.index);
        }
        assert_eq!(engine.cells_left(), 15);
        assert!(!engine.is_revealed(3));

        let outcome = engine.open_cell(4).unwrap();

        assert_eq!(outcome.opened_cells().len(), 10);
        assert!(matches!(outcome, OpenOutcome::Won { .. }));
        assert_eq!(engine.cells_left(), 5);
    }

    #[test]
    fn numbered_cell_does_not_cascade() {
        let mut engine = engine(4, &[0]);

        let outcome = engine.open_cell(5).unwrap();

        assert_eq!(outcome.opened_cells().len(), 1);
        assert_eq!(engine.cells_left(), 15);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut engine = engine(4, &[0]);

        assert_eq!(engine.open_cell(16), Err(GameError::InvalidIndex));
        assert!(engine.is_playable());
        assert_eq!(engine.adjacent_mines(16), None);
    }

    #[test]
    fn playing_every_safe_cell_wins_once() {
        for seed in 0..16 {
            let mut engine = MinefieldEngine::new(seed);
            engine.initialize(Difficulty::Easy);
            let mut recorder = Recorder::default();

            engine.open_cell_with(0, &mut recorder).unwrap();
            let mines = engine.mine_indices();

            for index in 0..100 {
                if mines.contains(&index) || engine.is_revealed(index) {
                    continue;
                }
                let before = engine.cells_left();
                let outcome = engine.open_cell_with(index, &mut recorder).unwrap();
                let opened = CellCount::try_from(outcome.opened_cells().len()).unwrap();

                assert!(opened > 0);
                assert_eq!(engine.cells_left(), before - opened);
            }

            let wins = recorder
                .events
                .iter()
                .filter(|event| matches!(event, Event::Win))
                .count();
            assert_eq!(wins, 1, "seed {}", seed);
            assert_eq!(recorder.events.last(), Some(&Event::Win));
            assert_eq!(engine.cells_left(), 10);
            assert_eq!(engine.state(), EngineState::Won);
            assert_eq!(engine.open_cell(mines[0]).unwrap(), OpenOutcome::NoChange);
        }
    }

    #[test]
    fn lose_reports_every_mine_to_listener() {
        let mut engine = engine(4, &[0, 15]);
        let mut recorder = Recorder::default();

        engine.open_cell_with(5, &mut recorder).unwrap();
        engine.open_cell_with(15, &mut recorder).unwrap();

        assert_eq!(recorder.events.len(), 2);
        assert_eq!(recorder.events[1], Event::Lose(vec![0, 15]));
    }
}
