use crate::*;
pub use rejection::*;

mod rejection;

pub trait MineGenerator {
    fn generate(&mut self, config: GameConfig) -> MineLayout;
}
