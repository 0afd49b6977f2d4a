use crate::constants::PLAYER_START;
use crate::types::{Cell, ObstacleKind, WorldError};
use crate::world::GameWorld;

pub const CH_WALL: char = '1';
pub const CH_OPEN: char = '0';
pub const CH_FINISH: char = 'P';
pub const CH_SELF: char = 'A';
pub const CH_UNKNOWN: char = '?';

impl GameWorld {
    /// Static debug/admin export of the whole maze: walls, finish, and the
    /// fixed entry marker at (1, 1). This is also the persisted snapshot
    /// format; it deliberately ignores live player positions.
    pub fn full_view(&self) -> Vec<String> {
        let (x_max, y_max) = self.dimensions();
        let mut rows = Vec::with_capacity(y_max as usize);
        for y in 0..y_max {
            let mut row = String::with_capacity(x_max as usize);
            for x in 0..x_max {
                let cell = Cell { x, y };
                if cell == PLAYER_START {
                    row.push(CH_SELF);
                } else if self.is_obstacle(ObstacleKind::Wall, cell) {
                    row.push(CH_WALL);
                } else if Some(cell) == self.finish() {
                    row.push(CH_FINISH);
                } else {
                    row.push(CH_OPEN);
                }
            }
            rows.push(row);
        }
        rows
    }

    /// Fog-of-war view for one player. Rows within one of the player's own
    /// row, plus the exterior boundary rows, show true content and extend
    /// that player's seen set; previously seen cells degrade to terrain-only;
    /// everything else is unknown. Recomputed from scratch on every query.
    pub fn player_view(&mut self, player_id: u32) -> Result<Vec<String>, WorldError> {
        let player = self
            .player(player_id)
            .ok_or(WorldError::UnknownPlayer(player_id))?;
        let own = player.position;
        let (x_max, y_max) = self.dimensions();

        // The seen set is taken out for the duration of the scan so the
        // world stays readable while it grows.
        let mut seen = std::mem::take(self.seen_cells_mut(player_id));

        let mut rows = Vec::with_capacity(y_max as usize);
        for y in 0..y_max {
            let visible = (y - own.y).abs() <= 1 || y == 0 || y == y_max - 1;
            let mut row = String::with_capacity(x_max as usize);
            for x in 0..x_max {
                let cell = Cell { x, y };
                if visible {
                    if self.is_obstacle(ObstacleKind::Wall, cell) {
                        row.push(CH_WALL);
                    } else if Some(cell) == self.finish() {
                        row.push(CH_FINISH);
                    } else if cell == own {
                        row.push(CH_SELF);
                    } else {
                        row.push(CH_OPEN);
                    }
                    seen.insert(cell);
                } else if seen.contains(&cell) {
                    row.push(if self.is_obstacle(ObstacleKind::Wall, cell) {
                        CH_WALL
                    } else {
                        CH_OPEN
                    });
                } else {
                    row.push(CH_UNKNOWN);
                }
            }
            rows.push(row);
        }

        *self.seen_cells_mut(player_id) = seen;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::test_support::small_world;

    fn char_at(rows: &[String], x: i32, y: i32) -> char {
        rows[y as usize].as_bytes()[x as usize] as char
    }

    #[test]
    fn full_view_shows_entry_walls_and_finish() {
        let world = small_world();
        let rows = world.full_view();
        assert_eq!(rows.len(), 6);
        assert_eq!(char_at(&rows, 1, 1), CH_SELF);
        assert_eq!(char_at(&rows, 0, 0), CH_WALL);
        assert_eq!(char_at(&rows, 2, 2), CH_WALL);
        assert_eq!(char_at(&rows, 4, 4), CH_FINISH);
        assert_eq!(char_at(&rows, 3, 1), CH_OPEN);
    }

    #[test]
    fn only_the_band_and_boundary_rows_are_visible() {
        let mut world = small_world();
        let id = world.add_player("a", Cell { x: 1, y: 1 }, 1, 0);
        let rows = world.player_view(id).expect("player exists");

        // Rows 0..=2 visible (band), row 5 visible (boundary), rows 3-4 not.
        assert_eq!(char_at(&rows, 1, 1), CH_SELF);
        assert_eq!(char_at(&rows, 2, 2), CH_WALL);
        assert_eq!(char_at(&rows, 2, 3), CH_UNKNOWN);
        assert_eq!(char_at(&rows, 4, 4), CH_UNKNOWN);
        assert_eq!(char_at(&rows, 0, 5), CH_WALL);
    }

    #[test]
    fn querying_player_sees_their_own_marker() {
        let mut world = small_world();
        let first = world.add_player("first", Cell { x: 1, y: 1 }, 1, 0);
        let second = world.add_player("second", Cell { x: 3, y: 3 }, 1, 0);

        let rows = world.player_view(second).expect("player exists");
        assert_eq!(char_at(&rows, 3, 3), CH_SELF);
        // The other player is not rendered at all.
        let rows = world.player_view(first).expect("player exists");
        assert_eq!(char_at(&rows, 1, 1), CH_SELF);
    }

    #[test]
    fn previously_seen_cells_degrade_to_terrain_never_back_to_unknown() {
        let mut world = small_world();
        let id = world.add_player("a", Cell { x: 1, y: 3 }, 1, 0);

        // From y=3 the band covers rows 2..=4, so (2, 2) and (4, 4) render true.
        let rows = world.player_view(id).expect("player exists");
        assert_eq!(char_at(&rows, 2, 2), CH_WALL);
        assert_eq!(char_at(&rows, 4, 4), CH_FINISH);

        // Move the player up; rows 3-4 leave the band but stay known terrain.
        world.relocate_player(id, Cell { x: 1, y: 1 }, 1);
        let rows = world.player_view(id).expect("player exists");
        assert_eq!(char_at(&rows, 1, 3), CH_OPEN);
        assert_eq!(char_at(&rows, 4, 4), CH_OPEN); // finish degrades to terrain
        assert_ne!(char_at(&rows, 1, 4), CH_UNKNOWN);
    }

    #[test]
    fn seen_sets_are_private_per_player() {
        let mut world = small_world();
        let scout = world.add_player("scout", Cell { x: 1, y: 3 }, 1, 0);
        let newcomer = world.add_player("newcomer", Cell { x: 1, y: 1 }, 1, 0);

        world.player_view(scout).expect("player exists");
        let rows = world.player_view(newcomer).expect("player exists");
        // The scout saw row 4; the newcomer has not.
        assert_eq!(char_at(&rows, 4, 4), CH_UNKNOWN);

        let scout_seen = world.seen_cells(scout).expect("scout has a seen set");
        let newcomer_seen = world.seen_cells(newcomer).expect("newcomer has a seen set");
        assert!(scout_seen.contains(&Cell { x: 4, y: 4 }));
        assert!(!newcomer_seen.contains(&Cell { x: 4, y: 4 }));
    }

    #[test]
    fn unknown_player_view_is_an_error() {
        let mut world = small_world();
        assert!(matches!(
            world.player_view(9),
            Err(WorldError::UnknownPlayer(9))
        ));
    }
}
