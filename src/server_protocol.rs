use serde_json::Value;

use crate::types::Direction;

/// Requests a client may issue over the WebSocket, parsed from JSON text
/// messages with a `type` discriminator. Anything malformed parses to `None`
/// and is answered with an error message.
#[derive(Debug, PartialEq)]
pub enum ParsedClientMessage {
    /// Register a player; the server picks the spawn cell.
    Join { name: String },
    /// Move one cell in a direction, subject to wall and tick arbitration.
    Move { dir: Direction, player_id: u32 },
    GetPlayers,
    GetObstacles,
    GetFinish,
    GetStatus,
    GetDimension,
    /// Fog-of-war grid for one player.
    GetView { player_id: u32 },
    /// Full static maze export (debug).
    GetFullView,
    /// Last persisted maze snapshot.
    RequestMaze,
    Ping { t: f64 },
}

pub fn parse_client_message(raw: &str) -> Option<ParsedClientMessage> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let object = value.as_object()?;
    let message_type = object.get("type")?.as_str()?;

    match message_type {
        "join" => {
            let name = object.get("name")?.as_str()?.to_string();
            Some(ParsedClientMessage::Join { name })
        }
        "move" => {
            let dir = Direction::parse_move(object.get("dir")?.as_str()?)?;
            let player_id = parse_player_id(object.get("playerId"))?;
            Some(ParsedClientMessage::Move { dir, player_id })
        }
        "players" => Some(ParsedClientMessage::GetPlayers),
        "obstacles" => Some(ParsedClientMessage::GetObstacles),
        "finish" => Some(ParsedClientMessage::GetFinish),
        "status" => Some(ParsedClientMessage::GetStatus),
        "dimension" => Some(ParsedClientMessage::GetDimension),
        "view" => {
            let player_id = parse_player_id(object.get("playerId"))?;
            Some(ParsedClientMessage::GetView { player_id })
        }
        "full_view" => Some(ParsedClientMessage::GetFullView),
        "maze" => Some(ParsedClientMessage::RequestMaze),
        "ping" => {
            let t = object.get("t")?.as_f64()?;
            if !t.is_finite() {
                return None;
            }
            Some(ParsedClientMessage::Ping { t })
        }
        _ => None,
    }
}

fn parse_player_id(value: Option<&Value>) -> Option<u32> {
    u32::try_from(value?.as_u64()?).ok()
}
