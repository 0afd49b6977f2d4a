use serde::Serialize;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn parse_move(value: &str) -> Option<Self> {
        match value {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn offset(self, dir: Direction) -> Cell {
        match dir {
            Direction::Left => Cell { x: self.x - 1, y: self.y },
            Direction::Right => Cell { x: self.x + 1, y: self.y },
            Direction::Up => Cell { x: self.x, y: self.y - 1 },
            Direction::Down => Cell { x: self.x, y: self.y + 1 },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Wall,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub id: u32,
    pub name: String,
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    pub kind: ObstacleKind,
    pub x: i32,
    pub y: i32,
}

/// Set exactly once when a player is found standing on the finish cell and
/// never reset afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GameStatus {
    pub over: bool,
    pub winner: Option<u32>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("unknown player id {0}")]
    UnknownPlayer(u32),

    #[error("generated maze has no reachable finish cell")]
    UnwinnableMaze,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_moves_exactly_one_cell_on_one_axis() {
        let cell = Cell { x: 3, y: 5 };
        assert_eq!(cell.offset(Direction::Left), Cell { x: 2, y: 5 });
        assert_eq!(cell.offset(Direction::Right), Cell { x: 4, y: 5 });
        assert_eq!(cell.offset(Direction::Up), Cell { x: 3, y: 4 });
        assert_eq!(cell.offset(Direction::Down), Cell { x: 3, y: 6 });
    }

    #[test]
    fn parse_move_rejects_unknown_directions() {
        assert_eq!(Direction::parse_move("left"), Some(Direction::Left));
        assert_eq!(Direction::parse_move("LEFT"), None);
        assert_eq!(Direction::parse_move("diagonal"), None);
        assert_eq!(Direction::parse_move(""), None);
    }

    #[test]
    fn status_defaults_to_not_over() {
        let status = GameStatus::default();
        assert!(!status.over);
        assert_eq!(status.winner, None);
    }
}
