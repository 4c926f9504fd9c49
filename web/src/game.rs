use mines_core::{CellCount, CellIndex, Coord, MinefieldEngine};
use wasm_bindgen::prelude::*;

use crate::listener::{JsGameListener, ListenerBridge};

#[wasm_bindgen]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Hard,
}

impl From<Difficulty> for mines_core::Difficulty {
    fn from(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self::Easy,
            Difficulty::Hard => Self::Hard,
        }
    }
}

fn random_seed() -> u64 {
    let noise = (js_sys::Math::random() * (u32::MAX as f64)) as u64;
    let now = js_sys::Date::now() as u64;
    (noise << 32) ^ now
}

/// One game session driven by the page.
#[wasm_bindgen]
pub struct MinesGame {
    engine: MinefieldEngine,
}

#[wasm_bindgen]
impl MinesGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> MinesGame {
        let seed = crate::forced_seed().unwrap_or_else(random_seed);
        Self::with_seed(seed)
    }

    #[wasm_bindgen(js_name = withSeed)]
    pub fn with_seed(seed: u64) -> MinesGame {
        log::debug!("Game created with seed {}", seed);
        Self {
            engine: MinefieldEngine::new(seed),
        }
    }

    pub fn initialize(&mut self, difficulty: Difficulty) {
        self.engine.initialize(difficulty.into());
    }

    /// Opens a cell, reporting what happened to `listener` before returning.
    #[wasm_bindgen(js_name = openCell)]
    pub fn open_cell(&mut self, index: CellIndex, listener: &JsGameListener) -> Result<(), JsValue> {
        let mut bridge = ListenerBridge::new(listener);
        let outcome = self
            .engine
            .open_cell_with(index, &mut bridge)
            .map_err(JsError::from)?;
        if outcome.is_final() {
            log::debug!("Game over after opening {}: {:?}", index, self.engine.state());
        }
        bridge.finish()
    }

    #[wasm_bindgen(js_name = fieldSize)]
    pub fn field_size(&self) -> Coord {
        self.engine.field_size()
    }

    #[wasm_bindgen(js_name = cellsLeft)]
    pub fn cells_left(&self) -> CellCount {
        self.engine.cells_left()
    }

    #[wasm_bindgen(js_name = minesCount)]
    pub fn mines_count(&self) -> CellCount {
        self.engine.mines_count()
    }

    #[wasm_bindgen(js_name = isPlayable)]
    pub fn is_playable(&self) -> bool {
        self.engine.is_playable()
    }
}

impl Default for MinesGame {
    fn default() -> Self {
        Self::new()
    }
}
