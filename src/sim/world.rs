/// WorldState: everything one run owns.
///
/// ## Coordinates
///
/// All rects are kept in screen space. The camera only tracks `scroll_x`;
/// when it moves, platforms, ladders, chests and enemies are translated by
/// the applied delta while the player keeps its screen position.
///
/// ## Lifetime
///
/// A run is never reset in place. `start_run` rebuilds the whole state from
/// a fresh seed, so nothing from a previous run (collected chests, live
/// enemies, score) can leak into the next one.

use tracing::info;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GameConfig;
use crate::domain::camera::ScrollCamera;
use crate::domain::entity::{Chest, Ladder, Platform, Player, Sprite, VerticalMode};
use crate::domain::geometry::Rect;
use crate::domain::physics::Bounds;
use super::level;
use super::spawner::EnemySpawner;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Title,
    Playing,
    GameOver,
}

pub struct WorldState {
    pub config: GameConfig,
    pub phase: Phase,

    // ── Entities (screen space) ──
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub ladders: Vec<Ladder>,
    pub chests: Vec<Chest>,
    pub spawner: EnemySpawner,

    // ── Camera / bounds ──
    pub camera: ScrollCamera,
    pub bounds: Bounds,

    // ── Meta ──
    pub seed: u64,
    pub run_started_ms: u64,
    pub tick: u64,
}

// ── Construction ──

impl WorldState {
    /// Build a world for `seed`, sitting on the title screen.
    pub fn new(config: GameConfig, seed: u64, now_ms: u64) -> Self {
        let screen = config.screen;
        let ground_level = screen.ground_level();

        let mut rng = StdRng::seed_from_u64(seed);
        let layout = level::generate(&mut rng, config.level.platform_count, screen.height);

        WorldState {
            phase: Phase::Title,
            player: Player::new(screen.width, ground_level),
            platforms: layout.platforms,
            ladders: layout.ladders,
            chests: layout.chests,
            spawner: EnemySpawner::new(&config.enemy, screen.width, ground_level, now_ms),
            camera: ScrollCamera::new(screen.width, layout.level_width, config.player.scroll_speed),
            bounds: Bounds {
                screen_width: screen.width,
                screen_height: screen.height,
                ground_level,
            },
            seed,
            run_started_ms: now_ms,
            tick: 0,
            config,
        }
    }

    /// Throw away the current run and start a fresh one.
    pub fn start_run(&mut self, seed: u64, now_ms: u64) {
        let config = self.config.clone();
        *self = WorldState::new(config, seed, now_ms);
        self.phase = Phase::Playing;

        info!(
            seed,
            platforms = self.platforms.len(),
            ladders = self.ladders.len(),
            chests = self.chests.len(),
            level_width = self.camera.level_width(),
            "run started"
        );
    }
}

// ── Queries ──

impl WorldState {
    #[inline]
    pub fn score(&self) -> u32 {
        self.player.score
    }

    /// Time left in the run, or `None` when the run is untimed.
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        let budget = self.config.timing.game_time_ms;
        if budget == 0 {
            return None;
        }
        let elapsed = now_ms.saturating_sub(self.run_started_ms);
        Some(budget.saturating_sub(elapsed))
    }

    /// The run is over once elapsed time strictly exceeds the budget.
    pub fn time_exceeded(&self, now_ms: u64) -> bool {
        let budget = self.config.timing.game_time_ms;
        budget > 0 && now_ms.saturating_sub(self.run_started_ms) > budget
    }
}

// ══════════════════════════════════════════════════════════════
// Render snapshot
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DrawKind {
    Player { sprite: Sprite, mode: VerticalMode },
    Platform,
    Ladder,
    Chest { open: bool },
    Enemy,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DrawItem {
    pub kind: DrawKind,
    pub rect: Rect,
}

/// Owned, read-only view of one frame for the renderer.
///
/// Items are in paint order: scenery first, the player last.
#[derive(Clone, Debug)]
pub struct FrameSnapshot {
    pub phase: Phase,
    pub items: Vec<DrawItem>,
    pub score: u32,
    pub remaining_ms: Option<u64>,
    pub ground_level: i32,
    pub screen_width: i32,
    pub screen_height: i32,
}

impl WorldState {
    pub fn snapshot(&self, now_ms: u64) -> FrameSnapshot {
        let mut items = Vec::with_capacity(
            self.platforms.len() + self.ladders.len() + self.chests.len()
                + self.spawner.enemies.len() + 1,
        );

        items.extend(self.platforms.iter().map(|p| DrawItem { kind: DrawKind::Platform, rect: p.rect }));
        items.extend(self.ladders.iter().map(|l| DrawItem { kind: DrawKind::Ladder, rect: l.rect }));
        items.extend(self.chests.iter().map(|c| DrawItem {
            kind: DrawKind::Chest { open: c.collected },
            rect: c.rect,
        }));
        items.extend(self.spawner.enemies.iter().map(|e| DrawItem { kind: DrawKind::Enemy, rect: e.rect }));
        items.push(DrawItem {
            kind: DrawKind::Player {
                sprite: self.player.sprite,
                mode: self.player.mode(self.bounds.ground_level),
            },
            rect: self.player.rect,
        });

        FrameSnapshot {
            phase: self.phase,
            items,
            score: self.score(),
            remaining_ms: match self.phase {
                Phase::Playing => self.remaining_ms(now_ms),
                _ => None,
            },
            ground_level: self.bounds.ground_level,
            screen_width: self.bounds.screen_width,
            screen_height: self.bounds.screen_height,
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
