use clap::Parser;
use maze_race_server::constants::{DEFAULT_X_MAX, DEFAULT_Y_MAX, PLAYER_RADIUS, PLAYER_START};
use maze_race_server::maze::generate_maze;
use maze_race_server::movement::MoveVerdict;
use maze_race_server::rng::Rng;
use maze_race_server::server_utils::parse_dimension;
use maze_race_server::types::Direction;
use maze_race_server::world::GameWorld;
use serde_json::json;

/// Offline random-walk race: spawns a handful of players on a generated maze
/// and drives them one move per tick until somebody reaches the finish.
/// Useful for eyeballing maze fairness and movement arbitration without a
/// network in the loop.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    seed: Option<u32>,
    #[arg(long)]
    width: Option<i32>,
    #[arg(long, default_value_t = 4)]
    players: u32,
    #[arg(long, default_value_t = 50_000)]
    max_ticks: u64,
    #[arg(long)]
    height: Option<i32>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let seed = cli.seed.unwrap_or(1);
    let x_max = parse_dimension(cli.width.map(|w| w.to_string()).as_deref(), DEFAULT_X_MAX);
    let y_max = parse_dimension(cli.height.map(|h| h.to_string()).as_deref(), DEFAULT_Y_MAX);

    let maze = generate_maze(x_max, y_max, seed);
    let mut world = match GameWorld::new(&maze) {
        Ok(world) => world,
        Err(err) => {
            eprintln!("cannot simulate: {err}");
            std::process::exit(1);
        }
    };

    let mut walk_rng = Rng::new(seed.wrapping_mul(31).wrapping_add(7));
    let ids: Vec<u32> = (0..cli.players.max(1))
        .map(|i| world.add_player(&format!("bot-{i:02}"), PLAYER_START, PLAYER_RADIUS, 0))
        .collect();

    let dirs = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
    let mut applied = 0u64;
    let mut blocked = 0u64;
    let mut ticks_used = 0u64;

    'race: for tick in 1..=cli.max_ticks {
        ticks_used = tick;
        for &id in &ids {
            let dir = *walk_rng.pick(&dirs).unwrap_or(&Direction::Right);
            match world.execute(dir, id, tick) {
                Ok(outcome) => match outcome.verdict {
                    MoveVerdict::Applied => applied += 1,
                    MoveVerdict::BlockedByWall => blocked += 1,
                    MoveVerdict::TickRejected => {}
                    MoveVerdict::GameOver => break 'race,
                },
                Err(err) => {
                    eprintln!("simulation bug: {err}");
                    std::process::exit(1);
                }
            }
        }
    }

    let status = world.status();
    let positions: Vec<_> = world
        .players()
        .map(|p| json!({ "id": p.id, "name": p.name, "x": p.position.x, "y": p.position.y }))
        .collect();
    let summary = json!({
        "seed": seed,
        "width": x_max,
        "height": y_max,
        "players": ids.len(),
        "ticks": ticks_used,
        "movesApplied": applied,
        "movesBlocked": blocked,
        "over": status.over,
        "winner": status.winner,
        "finish": world.finish(),
        "positions": positions,
        "mirrorConsistent": world.mirror_is_consistent(),
    });
    println!("{summary}");
}
