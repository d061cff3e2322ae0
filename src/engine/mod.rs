// Engine-facing modules: environment contract, timing, input, scene data

pub mod environment;
pub mod game_loop;
pub mod input;
pub mod mesh;
pub mod physics;
pub mod sim;
