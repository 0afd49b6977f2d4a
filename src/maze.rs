use crate::constants::MIN_DIMENSION;
use crate::rng::Rng;
use crate::types::{Cell, Direction};

pub const WALL: u8 = b'1';
pub const OPEN: u8 = b'0';

/// Output of maze generation: a row-major character grid (`'1'` wall, `'0'`
/// open) plus the chosen finish cell, if one exists.
#[derive(Clone, Debug)]
pub struct GeneratedMaze {
    pub x_max: i32,
    pub y_max: i32,
    pub rows: Vec<String>,
    pub finish: Option<Cell>,
}

impl GeneratedMaze {
    pub fn wall_at(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.x_max || y >= self.y_max {
            return true;
        }
        self.rows
            .get(y as usize)
            .and_then(|row| row.as_bytes().get(x as usize))
            .map(|c| *c == WALL)
            .unwrap_or(true)
    }
}

/// Carves a maze with an iterative depth-first backtracker starting at the
/// fixed entry cell `(1, 1)`, then picks the finish cell uniformly at random
/// from the passable cells in the penultimate row or column. Every open cell
/// is connected to the entry by construction, so a `Some` finish is always
/// reachable.
pub fn generate_maze(x_max: i32, y_max: i32, seed: u32) -> GeneratedMaze {
    let mut grid = vec![vec![WALL; x_max.max(0) as usize]; y_max.max(0) as usize];

    if x_max >= MIN_DIMENSION && y_max >= MIN_DIMENSION {
        carve_passages(&mut grid, x_max, y_max, seed);
    }

    let mut rng = Rng::new(seed.wrapping_add(1));
    let finish = pick_finish_cell(&grid, x_max, y_max, &mut rng);

    GeneratedMaze {
        x_max,
        y_max,
        rows: grid
            .into_iter()
            .map(|row| String::from_utf8(row).unwrap_or_default())
            .collect(),
        finish,
    }
}

fn carve_passages(grid: &mut [Vec<u8>], x_max: i32, y_max: i32, seed: u32) {
    let mut rng = Rng::new(seed);
    let start = Cell { x: 1, y: 1 };
    grid[start.y as usize][start.x as usize] = OPEN;

    let mut stack = vec![start];
    while let Some(&cell) = stack.last() {
        let mut dirs = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ];
        rng.shuffle(&mut dirs);

        let mut advanced = false;
        for dir in dirs {
            let mid = cell.offset(dir);
            let next = mid.offset(dir);
            if next.x < 1 || next.y < 1 || next.x >= x_max - 1 || next.y >= y_max - 1 {
                continue;
            }
            if grid[next.y as usize][next.x as usize] != WALL {
                continue;
            }
            grid[mid.y as usize][mid.x as usize] = OPEN;
            grid[next.y as usize][next.x as usize] = OPEN;
            stack.push(next);
            advanced = true;
            break;
        }

        if !advanced {
            stack.pop();
        }
    }
}

fn pick_finish_cell(grid: &[Vec<u8>], x_max: i32, y_max: i32, rng: &mut Rng) -> Option<Cell> {
    if x_max < 2 || y_max < 2 {
        return None;
    }

    let mut candidates = Vec::new();
    let band_y = y_max - 2;
    for x in 0..x_max {
        if grid[band_y as usize][x as usize] == OPEN {
            candidates.push(Cell { x, y: band_y });
        }
    }
    let band_x = x_max - 2;
    for y in 0..y_max {
        let cell = Cell { x: band_x, y };
        if cell.y != band_y && grid[y as usize][band_x as usize] == OPEN {
            candidates.push(cell);
        }
    }

    rng.pick(&candidates).copied()
}
