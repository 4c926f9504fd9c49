use mines_core::{CellIndex, GameListener, OpenedCell};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(typescript_custom_section)]
const GAME_LISTENER: &'static str = r#"
export interface OpenedCell {
    index: number;
    adjacent_mines: number;
}

export interface GameListener {
    onCellsOpened(cells: OpenedCell[]): void;
    onWinGame(): void;
    onLoseGame(mineIds: Uint16Array): void;
}
"#;

#[wasm_bindgen]
extern "C" {
    /// Presentation-side object receiving game events.
    #[wasm_bindgen(typescript_type = "GameListener")]
    pub type JsGameListener;

    #[wasm_bindgen(method, catch, js_name = onCellsOpened)]
    fn on_cells_opened(this: &JsGameListener, cells: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = onWinGame)]
    fn on_win_game(this: &JsGameListener) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = onLoseGame)]
    fn on_lose_game(this: &JsGameListener, mine_ids: Vec<CellIndex>) -> Result<(), JsValue>;
}

/// Forwards engine events to a [`JsGameListener`], keeping the first exception it throws.
pub(crate) struct ListenerBridge<'a> {
    listener: &'a JsGameListener,
    error: Option<JsValue>,
}

impl<'a> ListenerBridge<'a> {
    pub(crate) fn new(listener: &'a JsGameListener) -> Self {
        Self {
            listener,
            error: None,
        }
    }

    pub(crate) fn finish(self) -> Result<(), JsValue> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn record(&mut self, result: Result<(), JsValue>) {
        if let Err(err) = result {
            log::error!("Game listener threw: {:?}", err);
            self.error.get_or_insert(err);
        }
    }
}

impl GameListener for ListenerBridge<'_> {
    fn on_cells_opened(&mut self, cells: &[OpenedCell]) {
        let result = serde_json::to_string(cells)
            .map_err(|err| JsValue::from(JsError::new(&err.to_string())))
            .and_then(|json| js_sys::JSON::parse(&json))
            .and_then(|cells| self.listener.on_cells_opened(cells));
        self.record(result);
    }

    fn on_win(&mut self) {
        let result = self.listener.on_win_game();
        self.record(result);
    }

    fn on_lose(&mut self, mines: &[CellIndex]) {
        let result = self.listener.on_lose_game(mines.to_vec());
        self.record(result);
    }
}
