use crate::*;

/// Receives game events as callbacks, for presentation layers that prefer being notified over
/// inspecting an [`OpenOutcome`].
pub trait GameListener {
    fn on_cells_opened(&mut self, cells: &[OpenedCell]);

    fn on_win(&mut self);

    fn on_lose(&mut self, mines: &[CellIndex]);
}

impl OpenOutcome {
    /// Replays this outcome on `listener`.
    ///
    /// A processed open fires either `on_lose` alone, or `on_cells_opened` followed by `on_win` when
    /// it finished the game. [`OpenOutcome::NoChange`] fires nothing.
    pub fn notify<L: GameListener + ?Sized>(&self, listener: &mut L) {
        match self {
            Self::NoChange => {}
            Self::Opened { cells } => listener.on_cells_opened(cells),
            Self::Won { cells } => {
                listener.on_cells_opened(cells);
                listener.on_win();
            }
            Self::Lost { mines } => listener.on_lose(mines),
        }
    }
}
