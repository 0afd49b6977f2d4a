use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info};
use maze_race_server::constants::{
    DEFAULT_HISTORY_DIR, DEFAULT_PORT, DEFAULT_X_MAX, DEFAULT_Y_MAX, PLAYER_RADIUS, PLAYER_START,
};
use maze_race_server::maze::generate_maze;
use maze_race_server::maze_store::MazeStore;
use maze_race_server::server_protocol::{parse_client_message, ParsedClientMessage};
use maze_race_server::server_utils::{current_tick, now_ms, parse_dimension, sanitize_name};
use maze_race_server::world::GameWorld;
use rand::Rng;
use serde_json::{json, Value};
use tokio::sync::{mpsc, Mutex};

type SharedState = Arc<Mutex<ServerState>>;

struct ServerState {
    world: GameWorld,
    store: MazeStore,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let x_max = parse_dimension(std::env::var("MAZE_WIDTH").ok().as_deref(), DEFAULT_X_MAX);
    let y_max = parse_dimension(std::env::var("MAZE_HEIGHT").ok().as_deref(), DEFAULT_Y_MAX);
    let seed = std::env::var("MAZE_SEED")
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or_else(|| rand::rng().random::<u32>());
    let history_dir = std::env::var("MAZE_HISTORY_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_HISTORY_DIR));

    let maze = generate_maze(x_max, y_max, seed);
    let world = match GameWorld::new(&maze) {
        Ok(world) => world,
        Err(err) => {
            // An unwinnable maze must never be served.
            error!("refusing to start: {err} ({x_max}x{y_max}, seed {seed})");
            std::process::exit(1);
        }
    };
    info!(
        "generated {x_max}x{y_max} maze (seed {seed}), finish at {:?}",
        world.finish()
    );

    let store = MazeStore::new(history_dir);
    store.save_snapshot(&world.full_view());

    let state = Arc::new(Mutex::new(ServerState { world, store }));

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/ws", get(ws_handler))
        .with_state(state);

    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("failed to bind server socket");

    info!("listening on :{port}");
    axum::serve(listener, app)
        .await
        .expect("server runtime failed");
}

async fn healthz() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

async fn handle_socket(state: SharedState, socket: WebSocket) {
    let (tx, mut rx) = mpsc::channel::<String>(256);

    let (mut ws_sender, mut ws_receiver) = socket.split();
    let writer = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if ws_sender.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    // Every new connection is handed the last persisted maze snapshot before
    // anything else.
    {
        let guard = state.lock().await;
        let rows = guard
            .store
            .load_last()
            .unwrap_or_else(|| guard.world.full_view());
        send(&tx, &json!({ "type": "maze", "rows": rows })).await;
    }

    // The player this connection registered, removed again on disconnect.
    let mut bound_player: Option<u32> = None;

    while let Some(received) = ws_receiver.next().await {
        let Ok(message) = received else {
            break;
        };

        match message {
            Message::Text(raw) => {
                handle_client_message(&state, &tx, &mut bound_player, raw.to_string()).await;
            }
            Message::Binary(raw) => {
                if let Ok(text) = String::from_utf8(raw.to_vec()) {
                    handle_client_message(&state, &tx, &mut bound_player, text).await;
                } else {
                    send_error(&tx, "invalid utf8 message").await;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    if let Some(player_id) = bound_player {
        let mut guard = state.lock().await;
        match guard.world.remove_player(player_id) {
            Ok(id) => info!("player {id} disconnected and was removed"),
            Err(err) => debug!("disconnect cleanup skipped: {err}"),
        }
    }

    drop(tx);
    let _ = writer.await;
}

async fn handle_client_message(
    state: &SharedState,
    tx: &mpsc::Sender<String>,
    bound_player: &mut Option<u32>,
    raw: String,
) {
    let Some(message) = parse_client_message(&raw) else {
        send_error(tx, "invalid message").await;
        return;
    };

    match message {
        ParsedClientMessage::Join { name } => {
            let name = sanitize_name(&name);
            let mut guard = state.lock().await;
            let player_id =
                guard
                    .world
                    .add_player(&name, PLAYER_START, PLAYER_RADIUS, current_tick(now_ms()));
            *bound_player = Some(player_id);
            let (x_max, y_max) = guard.world.dimensions();
            info!("player {player_id} ({name}) joined at {PLAYER_START:?}");
            send(
                tx,
                &json!({
                    "type": "welcome",
                    "playerId": player_id,
                    "x": PLAYER_START.x,
                    "y": PLAYER_START.y,
                    "xMax": x_max,
                    "yMax": y_max,
                }),
            )
            .await;
        }
        ParsedClientMessage::Move { dir, player_id } => {
            let result = {
                let mut guard = state.lock().await;
                guard.world.execute(dir, player_id, current_tick(now_ms()))
            };
            match result {
                Ok(outcome) => {
                    send(
                        tx,
                        &json!({
                            "type": "position",
                            "playerId": player_id,
                            "x": outcome.position.x,
                            "y": outcome.position.y,
                        }),
                    )
                    .await;
                }
                Err(err) => send_error(tx, &err.to_string()).await,
            }
        }
        ParsedClientMessage::GetPlayers => {
            let players = state.lock().await.world.player_views();
            send(tx, &json!({ "type": "players", "players": players })).await;
        }
        ParsedClientMessage::GetObstacles => {
            let obstacles = state.lock().await.world.obstacle_views();
            send(tx, &json!({ "type": "obstacles", "obstacles": obstacles })).await;
        }
        ParsedClientMessage::GetFinish => {
            let finish = state.lock().await.world.finish();
            send(tx, &json!({ "type": "finish", "cell": finish })).await;
        }
        ParsedClientMessage::GetStatus => {
            let status = state.lock().await.world.status();
            send(
                tx,
                &json!({
                    "type": "status",
                    "over": status.over,
                    "winner": status.winner,
                }),
            )
            .await;
        }
        ParsedClientMessage::GetDimension => {
            let (x_max, y_max) = state.lock().await.world.dimensions();
            send(tx, &json!({ "type": "dimension", "xMax": x_max, "yMax": y_max })).await;
        }
        ParsedClientMessage::GetView { player_id } => {
            let view = state.lock().await.world.player_view(player_id);
            match view {
                Ok(rows) => {
                    send(
                        tx,
                        &json!({ "type": "view", "playerId": player_id, "rows": rows }),
                    )
                    .await;
                }
                Err(err) => send_error(tx, &err.to_string()).await,
            }
        }
        ParsedClientMessage::GetFullView => {
            let rows = state.lock().await.world.full_view();
            send(tx, &json!({ "type": "full_view", "rows": rows })).await;
        }
        ParsedClientMessage::RequestMaze => {
            let guard = state.lock().await;
            let rows = guard
                .store
                .load_last()
                .unwrap_or_else(|| guard.world.full_view());
            send(tx, &json!({ "type": "maze", "rows": rows })).await;
        }
        ParsedClientMessage::Ping { t } => {
            send(tx, &json!({ "type": "pong", "t": t })).await;
        }
    }
}

async fn send(tx: &mpsc::Sender<String>, message: &Value) {
    let _ = tx.send(message.to_string()).await;
}

async fn send_error(tx: &mpsc::Sender<String>, message: &str) {
    send(tx, &json!({ "type": "error", "message": message })).await;
}
