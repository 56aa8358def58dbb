/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to defaults if the file is missing or incomplete; a file that
/// cannot be read or parsed is reported back as a `ConfigError` so the caller
/// can log it once logging is up.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub screen: ScreenConfig,
    pub player: PlayerConfig,
    pub level: LevelConfig,
    pub enemy: EnemyConfig,
    pub timing: TimingConfig,
    pub log: LogConfig,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Copy, Debug)]
pub struct ScreenConfig {
    pub width: i32,
    pub height: i32,
}

impl ScreenConfig {
    /// The ground plane sits 50 px above the bottom of the screen.
    pub fn ground_level(&self) -> i32 {
        self.height - 50
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PlayerConfig {
    pub speed: i32,
    pub jump_power: i32,
    pub jump_forward_speed: i32,
    pub climb_speed: i32,
    pub gravity: i32,
    /// Gravity applications per frame. 2 reproduces the classic fall speed.
    pub gravity_passes: u32,
    pub scroll_speed: i32,
    pub jump_sprite_ms: u64,
}

#[derive(Clone, Copy, Debug)]
pub struct LevelConfig {
    pub platform_count: usize,
    /// Fixed layout seed; a fresh random seed per run when absent.
    pub seed: Option<u64>,
}

#[derive(Clone, Copy, Debug)]
pub struct EnemyConfig {
    pub speed: i32,
    pub spawn_interval_ms: u64,
    pub contact_ends_run: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct TimingConfig {
    pub fps: u32,
    /// Run length in ms; 0 = untimed.
    pub game_time_ms: u64,
}

impl TimingConfig {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    /// Empty = logging disabled.
    pub file: String,
    pub level: String,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub interact: Vec<String>,
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    screen: TomlScreen,
    #[serde(default)]
    player: TomlPlayer,
    #[serde(default)]
    level: TomlLevel,
    #[serde(default)]
    enemy: TomlEnemy,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    log: TomlLog,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlScreen {
    #[serde(default = "default_screen_width")]
    width: i32,
    #[serde(default = "default_screen_height")]
    height: i32,
}

#[derive(Deserialize, Debug)]
struct TomlPlayer {
    #[serde(default = "default_player_speed")]
    speed: i32,
    #[serde(default = "default_jump_power")]
    jump_power: i32,
    #[serde(default = "default_jump_forward")]
    jump_forward_speed: i32,
    #[serde(default = "default_climb_speed")]
    climb_speed: i32,
    #[serde(default = "default_gravity")]
    gravity: i32,
    #[serde(default = "default_gravity_passes")]
    gravity_passes: u32,
    #[serde(default = "default_scroll_speed")]
    scroll_speed: i32,
    #[serde(default = "default_jump_sprite_ms")]
    jump_sprite_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlLevel {
    #[serde(default = "default_platform_count")]
    platform_count: usize,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlEnemy {
    #[serde(default = "default_enemy_speed")]
    speed: i32,
    #[serde(default = "default_spawn_interval")]
    spawn_interval_ms: u64,
    #[serde(default)]
    contact_ends_run: bool,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_fps")]
    fps: u32,
    #[serde(default = "default_game_time")]
    game_time_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_file")]
    file: String,
    #[serde(default = "default_log_level")]
    level: String,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pad_jump")]
    jump: Vec<String>,
    #[serde(default = "default_pad_interact")]
    interact: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

// ── Defaults ──

fn default_screen_width() -> i32 { 800 }
fn default_screen_height() -> i32 { 600 }
fn default_player_speed() -> i32 { 7 }
fn default_jump_power() -> i32 { 17 }
fn default_jump_forward() -> i32 { 20 }
fn default_climb_speed() -> i32 { 5 }
fn default_gravity() -> i32 { 1 }
fn default_gravity_passes() -> u32 { 2 }
fn default_scroll_speed() -> i32 { 3 }
fn default_jump_sprite_ms() -> u64 { 200 }
fn default_platform_count() -> usize { 20 }
fn default_enemy_speed() -> i32 { 2 }
fn default_spawn_interval() -> u64 { 10_000 }
fn default_fps() -> u32 { 30 }
fn default_game_time() -> u64 { 30_000 }
fn default_log_file() -> String { "skyhop.log".into() }
fn default_log_level() -> String { "info".into() }

fn default_pad_jump() -> Vec<String> { vec!["A".into()] }
fn default_pad_interact() -> Vec<String> { vec!["X".into(), "B".into()] }
fn default_confirm() -> Vec<String> { vec!["Start".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlScreen {
    fn default() -> Self {
        TomlScreen { width: default_screen_width(), height: default_screen_height() }
    }
}

impl Default for TomlPlayer {
    fn default() -> Self {
        TomlPlayer {
            speed: default_player_speed(),
            jump_power: default_jump_power(),
            jump_forward_speed: default_jump_forward(),
            climb_speed: default_climb_speed(),
            gravity: default_gravity(),
            gravity_passes: default_gravity_passes(),
            scroll_speed: default_scroll_speed(),
            jump_sprite_ms: default_jump_sprite_ms(),
        }
    }
}

impl Default for TomlLevel {
    fn default() -> Self {
        TomlLevel { platform_count: default_platform_count(), seed: None }
    }
}

impl Default for TomlEnemy {
    fn default() -> Self {
        TomlEnemy {
            speed: default_enemy_speed(),
            spawn_interval_ms: default_spawn_interval(),
            contact_ends_run: false,
        }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming { fps: default_fps(), game_time_ms: default_game_time() }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog { file: default_log_file(), level: default_log_level() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_pad_jump(),
            interact: default_pad_interact(),
            confirm: default_confirm(),
            cancel: default_cancel(),
        }
    }
}

// ── Conversion (with sanitising) ──

impl From<TomlConfig> for GameConfig {
    fn from(t: TomlConfig) -> Self {
        GameConfig {
            screen: ScreenConfig {
                width: t.screen.width.max(1),
                height: t.screen.height.max(1),
            },
            player: PlayerConfig {
                speed: t.player.speed,
                jump_power: t.player.jump_power,
                jump_forward_speed: t.player.jump_forward_speed,
                climb_speed: t.player.climb_speed,
                gravity: t.player.gravity,
                gravity_passes: t.player.gravity_passes.max(1),
                scroll_speed: t.player.scroll_speed.max(0),
                jump_sprite_ms: t.player.jump_sprite_ms,
            },
            level: LevelConfig {
                platform_count: t.level.platform_count.max(1),
                seed: t.level.seed,
            },
            enemy: EnemyConfig {
                speed: t.enemy.speed,
                spawn_interval_ms: t.enemy.spawn_interval_ms,
                contact_ends_run: t.enemy.contact_ends_run,
            },
            timing: TimingConfig {
                fps: t.timing.fps.max(1),
                game_time_ms: t.timing.game_time_ms,
            },
            log: LogConfig { file: t.log.file, level: t.log.level },
            gamepad: GamepadConfig {
                jump: t.gamepad.jump,
                interact: t.gamepad.interact,
                confirm: t.gamepad.confirm,
                cancel: t.gamepad.cancel,
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> (Self, Vec<ConfigError>) {
        let search_dirs = candidate_dirs();
        let mut issues = vec![];

        for dir in &search_dirs {
            let path = dir.join("config.toml");
            if !path.exists() {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(text) => match Self::from_toml_str(&text, &path.display().to_string()) {
                    Ok(cfg) => return (cfg, issues),
                    Err(e) => {
                        issues.push(e);
                        return (GameConfig::default(), issues);
                    }
                },
                Err(source) => issues.push(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                }),
            }
        }

        (GameConfig::default(), issues)
    }

    /// Parse config text. `origin` only labels errors.
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str::<TomlConfig>(text)
            .map(GameConfig::from)
            .map_err(|source| ConfigError::Parse { path: origin.to_string(), source })
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds its config.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_toml_str("", "test").unwrap();
        assert_eq!(cfg.screen.width, 800);
        assert_eq!(cfg.screen.ground_level(), 550);
        assert_eq!(cfg.player.gravity_passes, 2);
        assert_eq!(cfg.level.platform_count, 20);
        assert_eq!(cfg.level.seed, None);
        assert_eq!(cfg.enemy.spawn_interval_ms, 10_000);
        assert_eq!(cfg.timing.game_time_ms, 30_000);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let text = r#"
            [level]
            seed = 42

            [player]
            gravity_passes = 1
        "#;
        let cfg = GameConfig::from_toml_str(text, "test").unwrap();
        assert_eq!(cfg.level.seed, Some(42));
        assert_eq!(cfg.level.platform_count, 20);
        assert_eq!(cfg.player.gravity_passes, 1);
        assert_eq!(cfg.player.jump_power, 17);
    }

    #[test]
    fn out_of_range_values_are_sanitised() {
        let text = r#"
            [timing]
            fps = 0
            [player]
            gravity_passes = 0
            [level]
            platform_count = 0
        "#;
        let cfg = GameConfig::from_toml_str(text, "test").unwrap();
        assert_eq!(cfg.timing.fps, 1);
        assert_eq!(cfg.timing.tick_rate(), Duration::from_millis(1000));
        assert_eq!(cfg.player.gravity_passes, 1);
        assert_eq!(cfg.level.platform_count, 1);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let err = GameConfig::from_toml_str("[level\nseed = ", "bad.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if path == "bad.toml"));
    }

    #[test]
    fn tick_rate_from_fps() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.timing.tick_rate(), Duration::from_millis(33));
    }
}
