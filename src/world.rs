use std::collections::{BTreeMap, HashMap, HashSet};

use crate::maze::{GeneratedMaze, WALL};
use crate::types::{Cell, GameStatus, ObstacleKind, ObstacleView, PlayerView, WorldError};

/// Tagged entity id stored in the occupancy index. The index holds ids only;
/// entity data lives in the registries, which are the single source of truth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OccupantId {
    Obstacle(u32),
    Player(u32),
}

#[derive(Clone, Debug)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub position: Cell,
    pub last_tick: u64,
    pub radius: i32,
}

#[derive(Clone, Debug)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub position: Cell,
}

/// The authoritative world: player and obstacle registries plus a derived
/// cell -> occupant index. Callers must serialize access (the server wraps
/// one instance in a single mutex); the struct itself assumes exclusive
/// access during any mutation.
#[derive(Clone, Debug)]
pub struct GameWorld {
    x_max: i32,
    y_max: i32,
    players: BTreeMap<u32, Player>,
    obstacles: BTreeMap<u32, Obstacle>,
    occupancy: HashMap<Cell, Vec<OccupantId>>,
    next_player_id: u32,
    next_obstacle_id: u32,
    finish: Option<Cell>,
    status: GameStatus,
    seen: HashMap<u32, HashSet<Cell>>,
}

impl GameWorld {
    /// Builds the world from a generated maze. A maze without a finish cell
    /// can never be won, which is a startup-fatal condition rather than a
    /// silently unwinnable game.
    pub fn new(maze: &GeneratedMaze) -> Result<Self, WorldError> {
        let finish = maze.finish.ok_or(WorldError::UnwinnableMaze)?;

        let mut world = Self {
            x_max: maze.x_max,
            y_max: maze.y_max,
            players: BTreeMap::new(),
            obstacles: BTreeMap::new(),
            occupancy: HashMap::new(),
            next_player_id: 0,
            next_obstacle_id: 0,
            finish: Some(finish),
            status: GameStatus::default(),
            seen: HashMap::new(),
        };

        for (y, row) in maze.rows.iter().enumerate() {
            for (x, byte) in row.bytes().enumerate() {
                if byte == WALL {
                    world.add_obstacle(ObstacleKind::Wall, Cell { x: x as i32, y: y as i32 });
                }
            }
        }

        Ok(world)
    }

    pub fn add_obstacle(&mut self, kind: ObstacleKind, cell: Cell) -> u32 {
        let id = self.next_obstacle_id;
        self.next_obstacle_id += 1;
        self.obstacles.insert(id, Obstacle { id, kind, position: cell });
        self.place(OccupantId::Obstacle(id), cell);
        id
    }

    /// Ids are monotonic and never reused, so a stale id held by a lagging
    /// client fails lookups instead of aliasing a newer player.
    pub fn add_player(&mut self, name: &str, cell: Cell, radius: i32, now_tick: u64) -> u32 {
        let id = self.next_player_id;
        self.next_player_id += 1;
        self.players.insert(
            id,
            Player {
                id,
                name: name.to_string(),
                position: cell,
                last_tick: now_tick,
                radius,
            },
        );
        self.place(OccupantId::Player(id), cell);
        self.seen.insert(id, HashSet::new());
        id
    }

    pub fn remove_player(&mut self, id: u32) -> Result<u32, WorldError> {
        let player = self.players.remove(&id).ok_or(WorldError::UnknownPlayer(id))?;
        self.displace(OccupantId::Player(id), player.position);
        self.seen.remove(&id);
        Ok(id)
    }

    pub fn is_obstacle(&self, kind: ObstacleKind, cell: Cell) -> bool {
        let Some(occupants) = self.occupancy.get(&cell) else {
            return false;
        };
        occupants.iter().any(|occ| match occ {
            OccupantId::Obstacle(id) => self
                .obstacles
                .get(id)
                .map(|obstacle| obstacle.kind == kind)
                .unwrap_or(false),
            OccupantId::Player(_) => false,
        })
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.x_max && cell.y < self.y_max
    }

    pub fn dimensions(&self) -> (i32, i32) {
        (self.x_max, self.y_max)
    }

    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn player_views(&self) -> Vec<PlayerView> {
        self.players
            .values()
            .map(|p| PlayerView {
                id: p.id,
                name: p.name.clone(),
                x: p.position.x,
                y: p.position.y,
            })
            .collect()
    }

    pub fn obstacle_views(&self) -> Vec<ObstacleView> {
        self.obstacles
            .values()
            .map(|o| ObstacleView {
                id: o.id,
                kind: o.kind,
                x: o.position.x,
                y: o.position.y,
            })
            .collect()
    }

    pub fn nr_players(&self) -> usize {
        self.players.len()
    }

    pub fn nr_obstacles(&self) -> usize {
        self.obstacles.len()
    }

    pub fn finish(&self) -> Option<Cell> {
        self.finish
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Monotonic: the first winner sticks, later calls are no-ops.
    pub(crate) fn mark_winner(&mut self, player_id: u32) {
        if !self.status.over {
            self.status = GameStatus {
                over: true,
                winner: Some(player_id),
            };
        }
    }

    /// Moves a player's registry entry and its occupancy mirror in one step.
    /// This is the only way movement touches the index, so the mirror cannot
    /// be half-updated by a bug in a caller.
    pub(crate) fn relocate_player(&mut self, id: u32, to: Cell, now_tick: u64) {
        let Some(player) = self.players.get_mut(&id) else {
            return;
        };
        let from = player.position;
        player.position = to;
        player.last_tick = now_tick;
        if from != to {
            self.displace(OccupantId::Player(id), from);
            self.place(OccupantId::Player(id), to);
        }
    }

    pub(crate) fn seen_cells_mut(&mut self, player_id: u32) -> &mut HashSet<Cell> {
        self.seen.entry(player_id).or_default()
    }

    pub fn seen_cells(&self, player_id: u32) -> Option<&HashSet<Cell>> {
        self.seen.get(&player_id)
    }

    fn place(&mut self, occupant: OccupantId, cell: Cell) {
        self.occupancy.entry(cell).or_default().push(occupant);
    }

    fn displace(&mut self, occupant: OccupantId, cell: Cell) {
        if let Some(occupants) = self.occupancy.get_mut(&cell) {
            if let Some(index) = occupants.iter().position(|occ| *occ == occupant) {
                occupants.swap_remove(index);
            }
            if occupants.is_empty() {
                self.occupancy.remove(&cell);
            }
        }
    }

    /// True when every registry entry has exactly one mirrored occupancy
    /// entry at its recorded cell and the index holds nothing else.
    pub fn mirror_is_consistent(&self) -> bool {
        let mut expected = 0usize;
        for player in self.players.values() {
            expected += 1;
            let matching = self
                .occupancy
                .get(&player.position)
                .map(|occupants| {
                    occupants
                        .iter()
                        .filter(|occ| **occ == OccupantId::Player(player.id))
                        .count()
                })
                .unwrap_or(0);
            if matching != 1 {
                return false;
            }
        }
        for obstacle in self.obstacles.values() {
            expected += 1;
            let matching = self
                .occupancy
                .get(&obstacle.position)
                .map(|occupants| {
                    occupants
                        .iter()
                        .filter(|occ| **occ == OccupantId::Obstacle(obstacle.id))
                        .count()
                })
                .unwrap_or(0);
            if matching != 1 {
                return false;
            }
        }
        let total: usize = self.occupancy.values().map(|occupants| occupants.len()).sum();
        total == expected
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::maze::{GeneratedMaze, OPEN, WALL};

    /// Builds a maze directly from an ASCII layout ('1' wall, anything else
    /// open), bypassing the carving algorithm.
    pub fn maze_from_layout(layout: &[&str], finish: Option<Cell>) -> GeneratedMaze {
        let y_max = layout.len() as i32;
        let x_max = layout.first().map(|row| row.len()).unwrap_or(0) as i32;
        let rows = layout
            .iter()
            .map(|row| {
                row.bytes()
                    .map(|c| if c == b'1' { WALL as char } else { OPEN as char })
                    .collect()
            })
            .collect();
        GeneratedMaze {
            x_max,
            y_max,
            rows,
            finish,
        }
    }

    /// 6x6 layout used by the movement and visibility tests: walled border,
    /// open interior except one wall at (2, 2), finish at (4, 4).
    pub fn small_world() -> GameWorld {
        let maze = maze_from_layout(
            &[
                "111111",
                "100001",
                "101001",
                "100001",
                "100001",
                "111111",
            ],
            Some(Cell { x: 4, y: 4 }),
        );
        GameWorld::new(&maze).expect("layout has a finish")
    }
}
