/// The step function: advances a run by one frame.
///
/// Processing order:
///   1. Run-over guard
///   2. Controls (walk / scroll request, jump, drop, climb)
///   3. Camera scroll (clamped delta)
///   4. Player motion: gravity passes, contact resolution, horizontal move
///   5. Chest interaction
///   6. Enemy spawner (move by speed + delta, cull, spawn)
///   7. Scenery translation by −delta
///   8. Enemy contact, sprite timer
///   9. Run-end check
///
/// The step never fails; everything is clamped. Events describe what
/// happened so the caller can log or react without inspecting state.

use crate::domain::entity::FrameInput;
use crate::domain::physics::{self, Contact};
use crate::domain::rules;
use super::event::GameEvent;
use super::world::{Phase, WorldState};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, input: FrameInput, now_ms: u64) -> Vec<GameEvent> {
    if world.phase != Phase::Playing { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    let scroll_request = resolve_controls(world, &input, now_ms, &mut events);
    let delta = world.camera.scroll_by(scroll_request);
    resolve_motion(world, &mut events);
    resolve_chests(world, input.interact, &mut events);
    resolve_enemies(world, now_ms, delta, &mut events);
    scroll_scenery(world, delta);
    let contact = resolve_enemy_contact(world, &mut events);
    rules::update_sprite(&mut world.player, now_ms, world.config.player.jump_sprite_ms);
    resolve_run_end(world, now_ms, contact, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

fn resolve_controls(
    world: &mut WorldState,
    input: &FrameInput,
    now_ms: u64,
    events: &mut Vec<GameEvent>,
) -> i32 {
    let outcome = rules::apply_input(
        &mut world.player,
        input,
        &world.camera,
        &world.ladders,
        &world.config.player,
        now_ms,
    );
    if outcome.jumped {
        events.push(GameEvent::JumpStarted);
    }
    outcome.horizontal.scroll
}

fn resolve_motion(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let airborne_before = !world.player.on_platform;

    physics::integrate(&mut world.player, &world.config.player, &world.bounds);
    // Landing checks use the center from before this frame's horizontal move.
    let contact = physics::resolve_contacts(&mut world.player, &world.platforms, &world.bounds);
    physics::move_horizontal(&mut world.player, &world.bounds);

    if airborne_before {
        match contact {
            Contact::Platform(i) => events.push(GameEvent::Landed { platform: Some(i) }),
            Contact::Ground => events.push(GameEvent::Landed { platform: None }),
            Contact::Airborne => {}
        }
    }
}

fn resolve_chests(world: &mut WorldState, interact: bool, events: &mut Vec<GameEvent>) {
    for index in rules::open_chests(&mut world.player, &mut world.chests, interact) {
        events.push(GameEvent::ChestOpened { index, score: world.player.score });
    }
}

// ══════════════════════════════════════════════════════════════
// Enemies / scenery
// ══════════════════════════════════════════════════════════════

fn resolve_enemies(world: &mut WorldState, now_ms: u64, delta: i32, events: &mut Vec<GameEvent>) {
    let tick = world.spawner.update(now_ms, delta);
    if tick.culled > 0 {
        events.push(GameEvent::EnemyCulled { count: tick.culled });
    }
    if tick.spawned {
        events.push(GameEvent::EnemySpawned);
    }
}

/// Platforms and their attachments share one translation, so ladders and
/// chests stay where generation put them relative to their platform.
fn scroll_scenery(world: &mut WorldState, delta: i32) {
    if delta == 0 { return; }
    for p in &mut world.platforms {
        p.translate_x(-delta);
    }
    for l in &mut world.ladders {
        l.rect.translate_x(-delta);
    }
    for c in &mut world.chests {
        c.rect.translate_x(-delta);
    }
}

fn resolve_enemy_contact(world: &WorldState, events: &mut Vec<GameEvent>) -> bool {
    let hits = rules::enemy_contacts(&world.player, &world.spawner.enemies);
    for &index in &hits {
        events.push(GameEvent::EnemyContact { index });
    }
    !hits.is_empty()
}

// ══════════════════════════════════════════════════════════════
// Run end
// ══════════════════════════════════════════════════════════════

fn resolve_run_end(world: &mut WorldState, now_ms: u64, contact: bool, events: &mut Vec<GameEvent>) {
    let caught = contact && world.config.enemy.contact_ends_run;
    if world.time_exceeded(now_ms) {
        events.push(GameEvent::TimeUp { score: world.score() });
        world.phase = Phase::GameOver;
    } else if caught {
        world.phase = Phase::GameOver;
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::entity::{Chest, Enemy, Platform, PLATFORM_HEIGHT};
    use crate::domain::geometry::Rect;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const FRAME_MS: u64 = 33;

    fn playing(seed: u64) -> WorldState {
        let mut w = WorldState::new(GameConfig::default(), seed, 0);
        w.start_run(seed, 0);
        w
    }

    /// A run with no scenery, so only the player and enemies matter.
    fn empty_run() -> WorldState {
        let mut w = playing(1);
        w.platforms.clear();
        w.ladders.clear();
        w.chests.clear();
        w.spawner.enemies.clear();
        w
    }

    fn keys(f: impl FnOnce(&mut FrameInput)) -> FrameInput {
        let mut input = FrameInput::default();
        f(&mut input);
        input
    }

    // ── Camera / dead-zone ──

    #[test]
    fn hold_right_walks_then_scrolls() {
        let mut w = playing(42);
        assert!(w.camera.max_scroll() > 0);
        let right = keys(|k| k.right = true);

        let mut now = 0;
        let mut scrolling_from = None;
        for frame in 0..120 {
            now += FRAME_MS;
            let x_before = w.player.rect.x;
            let scroll_before = w.camera.scroll_x;
            step(&mut w, right, now);

            if x_before < 600 {
                assert_eq!(w.camera.scroll_x, 0, "frame {frame}: scrolled inside dead-zone");
                assert_eq!(w.player.rect.x, x_before + 7);
            } else {
                scrolling_from.get_or_insert(frame);
                assert_eq!(w.camera.scroll_x, scroll_before + 3);
                assert_eq!(w.player.rect.x, x_before, "player must hold its screen x");
            }
        }
        assert!(scrolling_from.is_some());
    }

    #[test]
    fn scroll_stays_in_bounds_for_random_input() {
        for seed in 0..10 {
            let mut w = playing(seed);
            let mut rng = StdRng::seed_from_u64(seed + 100);
            let max = w.camera.max_scroll();
            for frame in 1..=600u64 {
                let input = FrameInput {
                    left: rng.gen_bool(0.4),
                    right: rng.gen_bool(0.5),
                    up: rng.gen_bool(0.1),
                    down: rng.gen_bool(0.05),
                    jump: rng.gen_bool(0.1),
                    interact: rng.gen_bool(0.2),
                };
                // stay inside the time budget
                step(&mut w, input, frame * 10);
                assert!((0..=max).contains(&w.camera.scroll_x), "seed {seed}, scroll {}", w.camera.scroll_x);
                assert!(w.player.rect.left() >= 0 && w.player.rect.right() <= 800);
                assert!(w.player.rect.bottom() <= 600);
            }
        }
    }

    #[test]
    fn scroll_moves_scenery_and_enemies() {
        let mut w = playing(5);
        w.player.rect.x = 610;
        let platforms: Vec<i32> = w.platforms.iter().map(|p| p.rect.x).collect();
        let ladders: Vec<i32> = w.ladders.iter().map(|l| l.rect.x).collect();
        let chests: Vec<i32> = w.chests.iter().map(|c| c.rect.x).collect();
        let enemy_x = w.spawner.enemies[0].rect.x;

        step(&mut w, keys(|k| k.right = true), FRAME_MS);

        assert_eq!(w.camera.scroll_x, 3);
        for (p, x) in w.platforms.iter().zip(&platforms) {
            assert_eq!(p.rect.x, x - 3);
            assert_eq!(p.body.x, p.rect.x);
        }
        for (l, x) in w.ladders.iter().zip(&ladders) {
            assert_eq!(l.rect.x, x - 3);
        }
        for (c, x) in w.chests.iter().zip(&chests) {
            assert_eq!(c.rect.x, x - 3);
        }
        assert_eq!(w.spawner.enemies[0].rect.x, enemy_x - 2 - 3);
    }

    #[test]
    fn left_at_start_never_scrolls() {
        let mut w = playing(5);
        w.player.rect.x = 100;
        step(&mut w, keys(|k| k.left = true), FRAME_MS);
        assert_eq!(w.camera.scroll_x, 0);
        assert_eq!(w.player.rect.x, 93);
    }

    // ── Player ──

    #[test]
    fn jump_then_land_on_ground() {
        let mut w = empty_run();
        let mut now = FRAME_MS;
        step(&mut w, FrameInput::default(), now);

        now += FRAME_MS;
        let events = step(&mut w, keys(|k| k.jump = true), now);
        assert!(events.contains(&GameEvent::JumpStarted));
        assert!(w.player.rect.bottom() < 550);

        let mut landed = false;
        for _ in 0..60 {
            now += FRAME_MS;
            if step(&mut w, FrameInput::default(), now).contains(&GameEvent::Landed { platform: None }) {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert_eq!(w.player.rect.bottom(), 550);
        assert!(!w.player.jumping && !w.player.falling);
    }

    #[test]
    fn falling_player_lands_on_platform() {
        let mut w = empty_run();
        w.platforms.push(Platform::new(330, 400, 150, PLATFORM_HEIGHT));
        w.player.rect.set_bottom(300);
        w.player.on_platform = false;

        let mut now = 0;
        let mut landed = None;
        for _ in 0..60 {
            now += FRAME_MS;
            let events = step(&mut w, FrameInput::default(), now);
            if let Some(e) = events.iter().find(|e| matches!(e, GameEvent::Landed { .. })) {
                landed = Some(*e);
                break;
            }
        }
        assert_eq!(landed, Some(GameEvent::Landed { platform: Some(0) }));
        assert_eq!(w.player.rect.bottom(), 400);
        assert_eq!(w.player.vy, 0);
    }

    #[test]
    fn landing_uses_center_before_horizontal_move() {
        let mut w = empty_run();
        w.platforms.push(Platform::new(300, 400, 150, PLATFORM_HEIGHT));
        w.player.rect.x = 445 - w.player.rect.w / 2;
        w.player.rect.set_bottom(380);
        w.player.vy = 5;
        w.player.falling = true;
        w.player.jumping = true;
        w.player.on_platform = false;

        let events = step(&mut w, keys(|k| k.right = true), FRAME_MS);

        assert!(events.contains(&GameEvent::Landed { platform: Some(0) }));
        assert_eq!(w.player.rect.bottom(), 400);
        assert_eq!(w.player.rect.center_x(), 452);
        assert!(w.player.on_platform);
    }

    #[test]
    fn jump_sprite_reverts_after_window() {
        let mut w = empty_run();
        step(&mut w, keys(|k| k.jump = true), 1_000);
        step(&mut w, FrameInput::default(), 1_200);
        assert_eq!(w.player.sprite, crate::domain::entity::Sprite::Jump);
        step(&mut w, FrameInput::default(), 1_201);
        assert_eq!(w.player.sprite, crate::domain::entity::Sprite::Idle);
    }

    // ── Chests ──

    #[test]
    fn chest_opens_once_across_frames() {
        let mut w = empty_run();
        w.chests.push(Chest { rect: Rect::new(w.player.rect.x, 475, 75, 75), collected: false });

        let interact = keys(|k| k.interact = true);
        let events = step(&mut w, interact, FRAME_MS);
        assert!(events.contains(&GameEvent::ChestOpened { index: 0, score: 10 }));
        assert_eq!(w.score(), 10);

        let events = step(&mut w, interact, 2 * FRAME_MS);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::ChestOpened { .. })));
        assert_eq!(w.score(), 10);
        assert!(w.chests[0].collected);
    }

    // ── Enemies ──

    #[test]
    fn second_enemy_after_interval() {
        let mut w = playing(2);
        let mut now = 0;
        let mut spawned = 0;
        while now < 10_001 {
            now = (now + FRAME_MS).min(10_001);
            spawned += step(&mut w, FrameInput::default(), now)
                .iter()
                .filter(|e| **e == GameEvent::EnemySpawned)
                .count();
        }
        assert_eq!(spawned, 1);
        assert_eq!(w.spawner.enemies.len(), 2);
    }

    #[test]
    fn enemy_contact_is_reported_only() {
        let mut w = empty_run();
        w.spawner.enemies.push(Enemy::new(w.player.rect.x + 20, 500, 2));
        let events = step(&mut w, FrameInput::default(), FRAME_MS);
        assert!(events.contains(&GameEvent::EnemyContact { index: 0 }));
        assert_eq!(w.phase, Phase::Playing);
    }

    #[test]
    fn enemy_contact_can_end_run() {
        let mut w = empty_run();
        w.config.enemy.contact_ends_run = true;
        w.spawner.enemies.push(Enemy::new(w.player.rect.x + 20, 500, 2));
        let events = step(&mut w, FrameInput::default(), FRAME_MS);
        assert!(events.contains(&GameEvent::EnemyContact { index: 0 }));
        assert_eq!(w.phase, Phase::GameOver);
    }

    // ── Run end ──

    #[test]
    fn time_up_ends_run() {
        let mut w = playing(3);
        assert!(step(&mut w, FrameInput::default(), 30_000).iter().all(|e| !matches!(e, GameEvent::TimeUp { .. })));
        assert_eq!(w.phase, Phase::Playing);

        let events = step(&mut w, FrameInput::default(), 30_001);
        assert!(events.contains(&GameEvent::TimeUp { score: 0 }));
        assert_eq!(w.phase, Phase::GameOver);

        let tick = w.tick;
        assert!(step(&mut w, keys(|k| k.right = true), 30_034).is_empty());
        assert_eq!(w.tick, tick);
    }

    #[test]
    fn untimed_run_keeps_going() {
        let mut cfg = GameConfig::default();
        cfg.timing.game_time_ms = 0;
        let mut w = WorldState::new(cfg, 3, 0);
        w.start_run(3, 0);
        step(&mut w, FrameInput::default(), 10_000_000);
        assert_eq!(w.phase, Phase::Playing);
    }

    #[test]
    fn title_screen_does_not_simulate() {
        let mut w = WorldState::new(GameConfig::default(), 3, 0);
        assert!(step(&mut w, keys(|k| k.right = true), FRAME_MS).is_empty());
        assert_eq!(w.tick, 0);
    }
}
