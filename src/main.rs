/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::EnvFilter;

use config::{GameConfig, LogConfig};
use domain::entity::FrameInput;
use error::GameError;
use sim::event::GameEvent;
use sim::step;
use sim::world::{Phase, WorldState};
use ui::gamepad::{GamepadState, PadAction};
use ui::input::InputState;
use ui::renderer::{menu_button, Renderer};

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let (config, issues) = GameConfig::load();

    if let Err(e) = init_tracing(&config.log) {
        eprintln!("{e}");
        std::process::exit(1);
    }
    for issue in &issues {
        warn!(error = %issue, "config.toml ignored, using defaults");
    }

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        // Undo whatever part of the setup succeeded.
        let _ = renderer.cleanup();
        error!(error = %e, "terminal init failed");
        eprintln!("Terminal init failed: {e}");
        std::process::exit(1);
    }

    let clock = Instant::now();
    let seed = next_seed(&config);
    let mut world = WorldState::new(config, seed, 0);

    let result = game_loop(&mut world, &mut renderer, clock);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        error!(error = %e, "game loop aborted");
        eprintln!("Game error: {e}");
    }

    info!(score = world.score(), "exit");
    println!();
    println!("Thanks for playing Skyhop!");
    println!("Final Score: {}", world.score());
}

/// Send logs to the configured file; the terminal itself is in raw mode.
/// `RUST_LOG` overrides `[log] level`. An empty file name disables logging.
fn init_tracing(log: &LogConfig) -> Result<(), GameError> {
    if log.file.is_empty() {
        return Ok(());
    }
    let file = File::create(&log.file).map_err(|source| GameError::LogFile {
        path: log.file.clone(),
        source,
    })?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

/// Configured seed, or a fresh random one per run.
fn next_seed(config: &GameConfig) -> u64 {
    config.level.seed.unwrap_or_else(rand::random)
}

fn elapsed_ms(clock: Instant) -> u64 {
    clock.elapsed().as_millis() as u64
}

fn game_loop(world: &mut WorldState, renderer: &mut Renderer, clock: Instant) -> Result<(), GameError> {
    let mut kb = InputState::new();
    kb.honor_release = renderer.keyboard_enhanced();
    let mut gp = GamepadState::new();
    gp.load_button_config(&world.config.gamepad);
    let tick_rate = world.config.timing.tick_rate();
    let mut last_tick = Instant::now();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }
        let now_ms = elapsed_ms(clock);
        if handle_meta(world, &kb, &gp, now_ms) {
            break;
        }

        if last_tick.elapsed() >= tick_rate {
            if world.phase == Phase::Playing {
                let events = step::step(world, detect_frame_input(&kb, &gp), now_ms);
                log_events(&events);
                if world.phase == Phase::GameOver {
                    info!(score = world.score(), seed = world.seed, "run over");
                }
            }
            last_tick = Instant::now();
        }

        renderer.render(&world.snapshot(now_ms))?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match *event {
            GameEvent::ChestOpened { index, score } => info!(chest = index, score, "chest opened"),
            GameEvent::TimeUp { score } => info!(score, "time up"),
            GameEvent::EnemySpawned => debug!("enemy spawned"),
            GameEvent::EnemyCulled { count } => debug!(count, "enemies culled"),
            GameEvent::EnemyContact { index } => debug!(enemy = index, "enemy contact"),
            GameEvent::JumpStarted => trace!("jump"),
            GameEvent::Landed { platform } => trace!(?platform, "landed"),
        }
    }
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_JUMP: &[KeyCode] = &[KeyCode::Char(' ')];
const KEYS_INTERACT: &[KeyCode] = &[KeyCode::Char('e'), KeyCode::Char('E')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

fn key_active(kb: &InputState, keys: &[KeyCode]) -> bool {
    kb.any_held(keys) || kb.any_pressed(keys)
}

fn detect_frame_input(kb: &InputState, gp: &GamepadState) -> FrameInput {
    let mut input = FrameInput {
        left: key_active(kb, KEYS_LEFT),
        right: key_active(kb, KEYS_RIGHT),
        up: key_active(kb, KEYS_UP),
        down: key_active(kb, KEYS_DOWN),
        jump: key_active(kb, KEYS_JUMP),
        interact: key_active(kb, KEYS_INTERACT),
    };
    gp.merge_into(&mut input);
    input
}

/// Did a left click land on the current screen's button?
fn button_clicked(world: &WorldState, kb: &InputState) -> bool {
    let button = menu_button(world.phase, world.bounds.screen_width, world.bounds.screen_height);
    match button {
        Some((area, _)) => kb.clicks().iter().any(|&(col, row)| area.contains(col, row)),
        None => false,
    }
}

/// Phase transitions and quit. Returns true when the game should exit.
fn handle_meta(world: &mut WorldState, kb: &InputState, gp: &GamepadState, now_ms: u64) -> bool {
    if kb.any_pressed(KEYS_QUIT) || gp.pressed(PadAction::Cancel) {
        return true;
    }

    let confirm = kb.any_pressed(KEYS_CONFIRM) || gp.pressed(PadAction::Confirm) || button_clicked(world, kb);

    match world.phase {
        Phase::Title | Phase::GameOver => {
            if confirm {
                let seed = next_seed(&world.config);
                world.start_run(seed, now_ms);
            }
        }
        Phase::Playing => {}
    }

    false
}
