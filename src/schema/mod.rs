pub mod conda;
pub mod pixi;
