pub mod constants;
pub mod maze;
pub mod maze_store;
pub mod movement;
pub mod rng;
pub mod server_protocol;
pub mod server_utils;
pub mod types;
pub mod visibility;
pub mod world;
