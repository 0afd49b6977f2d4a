use crate::types::{Cell, Direction, ObstacleKind, WorldError};
use crate::world::GameWorld;

/// Why a move did or did not change the player's position. Wall and tick
/// rejections are ordinary outcomes, not errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveVerdict {
    Applied,
    BlockedByWall,
    TickRejected,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveResult {
    pub position: Cell,
    pub verdict: MoveVerdict,
}

impl GameWorld {
    /// Arbitrates one requested move. `now_tick` is supplied by the caller
    /// (wall clock on the server, synthetic in tests and the simulator); a
    /// move commits only when the tick has advanced past the player's last
    /// committed tick, capping every player at one move per tick no matter
    /// how fast their connection round-trips.
    pub fn execute(
        &mut self,
        dir: Direction,
        player_id: u32,
        now_tick: u64,
    ) -> Result<MoveResult, WorldError> {
        let player = self
            .player(player_id)
            .ok_or(WorldError::UnknownPlayer(player_id))?;
        let position = player.position;
        let last_tick = player.last_tick;

        if self.status().over {
            return Ok(MoveResult {
                position,
                verdict: MoveVerdict::GameOver,
            });
        }

        // A player standing on the finish wins and stops moving for good.
        if Some(position) == self.finish() {
            self.mark_winner(player_id);
            return Ok(MoveResult {
                position,
                verdict: MoveVerdict::GameOver,
            });
        }

        let candidate = position.offset(dir);
        let blocked =
            !self.in_bounds(candidate) || self.is_obstacle(ObstacleKind::Wall, candidate);
        let next = if blocked { position } else { candidate };

        if now_tick <= last_tick {
            return Ok(MoveResult {
                position,
                verdict: MoveVerdict::TickRejected,
            });
        }

        // The tick is consumed even when the wall reverted the move; only
        // the committed tick advances, mirroring registry and index in one
        // step.
        self.relocate_player(player_id, next, now_tick);

        Ok(MoveResult {
            position: next,
            verdict: if blocked {
                MoveVerdict::BlockedByWall
            } else {
                MoveVerdict::Applied
            },
        })
    }
}
