use crate::types::Cell;

/// Ticks per wall-clock second. A player gets at most one committed move per
/// tick, which is the only pacing control the server applies.
pub const TIME_STEP: f64 = 4.0;

pub const DEFAULT_X_MAX: i32 = 15;
pub const DEFAULT_Y_MAX: i32 = 15;

/// The carving lattice needs at least a ring of boundary walls around one
/// open cell; anything smaller generates an all-wall grid with no finish.
pub const MIN_DIMENSION: i32 = 5;
pub const MAX_DIMENSION: i32 = 101;

/// Every player spawns at the fixed entry cell the maze is carved from.
pub const PLAYER_START: Cell = Cell { x: 1, y: 1 };
pub const PLAYER_RADIUS: i32 = 1;

pub const NAME_MAX_LEN: usize = 16;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HISTORY_DIR: &str = ".data/maze_history";
