use ndarray::Array2;
use rand::Rng;

use super::*;

/// Places mines by drawing uniformly random cells and redrawing whenever a cell already holds a mine.
///
/// Retries stay cheap while mines are a small share of the board, which holds for every [`Difficulty`].
#[derive(Debug)]
pub struct RejectionSampler<R> {
    rng: R,
}

impl<R: Rng> RejectionSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> MineGenerator for RejectionSampler<R> {
    fn generate(&mut self, config: GameConfig) -> MineLayout {
        let side = config.side();
        let total_cells = config.total_cells();
        let mut mine_mask: Array2<bool> = Array2::default((side, side).to_nd_index());
        let mut mines_placed: CellCount = 0;
        let mut draws: u32 = 0;

        while mines_placed < config.mines() {
            let index: CellIndex = self.rng.random_range(0..total_cells);
            draws += 1;

            let cell = &mut mine_mask[index_to_coords(index, side).to_nd_index()];
            if *cell {
                continue;
            }
            *cell = true;
            mines_placed += 1;
        }

        log::trace!(
            "Placed {} mines on {} cells in {} draws",
            mines_placed,
            total_cells,
            draws
        );
        MineLayout::new_unchecked(mine_mask, config)
    }
}
