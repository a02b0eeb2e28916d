mod ascii_renderer;
mod runner_config;
mod score_keeper;

use clap::{Parser, ValueEnum};
use common::games::SessionRng;
use common::games::snake::{BotController, GameMode, GameStatus, SnakeBotType, SnakeGame};
use common::{log, logger, warn};
use runner_config::{DEFAULT_CONFIG_FILE_NAME, DEFAULT_FRAME_INTERVAL, get_config_manager};
use score_keeper::ScoreKeeper;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Classic,
    Barriers,
    Campaign,
    Obstacles,
    RandomBarriers,
}

fn mode_arg_to_engine(mode: ModeArg) -> GameMode {
    match mode {
        ModeArg::Classic => GameMode::Classic,
        ModeArg::Barriers => GameMode::Barriers,
        ModeArg::Campaign => GameMode::Campaign,
        ModeArg::Obstacles => GameMode::Obstacles,
        ModeArg::RandomBarriers => GameMode::RandomBarriers,
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BotArg {
    Greedy,
    Random,
}

fn bot_arg_to_engine(bot: BotArg) -> SnakeBotType {
    match bot {
        BotArg::Greedy => SnakeBotType::Greedy,
        BotArg::Random => SnakeBotType::Random,
    }
}

#[derive(Parser)]
#[command(name = "snake_runner")]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE_NAME)]
    config: String,

    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many simulation ticks.
    #[arg(long)]
    max_ticks: Option<u64>,

    #[arg(long)]
    frame_ms: Option<u64>,

    #[arg(long, value_enum, default_value = "greedy")]
    bot: BotArg,

    /// Print the board after every tick.
    #[arg(long)]
    render: bool,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Runner".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let mut config = get_config_manager(&args.config).get_config()?;
    if let Some(mode) = args.mode {
        config.level.mode = mode_arg_to_engine(mode);
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    let rng = match config.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    log!(
        "Starting {:?} on a {}x{} board (seed {})",
        config.level.mode,
        config.level.board_size,
        config.level.board_size,
        rng.seed()
    );

    let mut bot_rng = SessionRng::new(rng.seed().wrapping_add(1));
    let mut game = SnakeGame::new(config.level.clone(), config.engine.clone(), rng);
    let mut score = ScoreKeeper::default();
    let bot_type = bot_arg_to_engine(args.bot);

    let frame = args
        .frame_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_FRAME_INTERVAL);
    let mut frames = interval(frame);
    frames.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_frame = Instant::now();
    let mut last_rendered_tick = game.ticks();

    loop {
        tokio::select! {
            _ = frames.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                log!("Interrupted, stopping");
                break;
            }
        }

        let now = Instant::now();
        let elapsed = now.duration_since(last_frame);
        last_frame = now;

        if let Some(direction) = BotController::calculate_move(bot_type, &game, &mut bot_rng) {
            game.queue_turn(direction);
        }

        let mode = game.level().mode;
        for event in game.update(elapsed) {
            score.apply(mode, &event);
        }

        if args.render && game.ticks() != last_rendered_tick {
            last_rendered_tick = game.ticks();
            print!("{}", ascii_renderer::render(&game.snapshot()));
        }

        if game.status() != GameStatus::Alive {
            break;
        }
        if let Some(max_ticks) = args.max_ticks
            && game.ticks() >= max_ticks
        {
            warn!("Tick limit {} reached", max_ticks);
            break;
        }
    }

    if let Some(reason) = score.collision {
        log!("Snake collided: {:?}", reason);
    } else if score.board_filled {
        log!("Snake filled the board");
    }
    log!(
        "Finished after {} ticks: status {:?}, length {}, apples {}, score {}, obstacle moves {}",
        game.ticks(),
        game.status(),
        game.snake().len(),
        score.apples,
        score.score,
        score.relocations
    );

    Ok(())
}
