/// EnemySpawner: timed hazard generation and culling.
///
/// One enemy is spawned when the run starts and another whenever
/// `spawn_interval_ms` has elapsed since the previous spawn. The timer
/// restarts from the tick that spawned, not from the ideal schedule, so late
/// frames push every following spawn back.
///
/// Enemies enter at `(screen width + 50, ground − 50)`, walk left at their
/// own speed plus the frame's scroll delta, and are dropped once their right
/// edge reaches x = 0. There is no cap on live enemies.

use crate::config::EnemyConfig;
use crate::domain::entity::Enemy;

/// What one `update` call did.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SpawnerTick {
    pub spawned: bool,
    pub culled: usize,
}

#[derive(Clone, Debug)]
pub struct EnemySpawner {
    pub enemies: Vec<Enemy>,
    last_spawn_ms: u64,
    interval_ms: u64,
    spawn_x: i32,
    spawn_y: i32,
    speed: i32,
}

impl EnemySpawner {
    /// Create the spawner and its first enemy at `now_ms`.
    pub fn new(cfg: &EnemyConfig, screen_width: i32, ground_level: i32, now_ms: u64) -> Self {
        let mut spawner = EnemySpawner {
            enemies: vec![],
            last_spawn_ms: now_ms,
            interval_ms: cfg.spawn_interval_ms,
            spawn_x: screen_width + 50,
            spawn_y: ground_level - 50,
            speed: cfg.speed,
        };
        spawner.spawn(now_ms);
        spawner
    }

    fn spawn(&mut self, now_ms: u64) {
        self.enemies.push(Enemy::new(self.spawn_x, self.spawn_y, self.speed));
        self.last_spawn_ms = now_ms;
    }

    /// Advance one frame: move, cull off-screen enemies, spawn when due.
    pub fn update(&mut self, now_ms: u64, scroll_delta: i32) -> SpawnerTick {
        for enemy in &mut self.enemies {
            enemy.rect.translate_x(-(enemy.speed + scroll_delta));
        }

        let before = self.enemies.len();
        self.enemies.retain(|e| e.rect.right() > 0);
        let culled = before - self.enemies.len();

        let spawned = now_ms.saturating_sub(self.last_spawn_ms) >= self.interval_ms;
        if spawned {
            self.spawn(now_ms);
        }

        SpawnerTick { spawned, culled }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn spawner(now_ms: u64) -> EnemySpawner {
        EnemySpawner::new(&GameConfig::default().enemy, 800, 550, now_ms)
    }

    #[test]
    fn first_enemy_at_start() {
        let s = spawner(0);
        assert_eq!(s.enemies.len(), 1);
        assert_eq!(s.enemies[0].rect.x, 850);
        assert_eq!(s.enemies[0].rect.y, 500);
    }

    #[test]
    fn two_enemies_after_one_interval() {
        let mut s = spawner(0);
        let mut now = 0;
        while now < 10_001 {
            now += 33;
            s.update(now.min(10_001), 0);
        }
        // second spawn landed on the first frame at or past 10 000 ms
        assert_eq!(s.enemies.len(), 2);
    }

    #[test]
    fn spawns_exactly_on_interval() {
        let mut s = spawner(0);
        assert!(!s.update(9_999, 0).spawned);
        assert!(s.update(10_000, 0).spawned);
        assert!(!s.update(10_001, 0).spawned);
        assert_eq!(s.enemies.len(), 2);
    }

    #[test]
    fn timer_restarts_from_actual_spawn_tick() {
        let mut s = spawner(0);
        assert!(s.update(10_500, 0).spawned);
        // next one is due at 20 500, not 20 000
        assert!(!s.update(20_000, 0).spawned);
        assert!(s.update(20_500, 0).spawned);
    }

    #[test]
    fn moves_by_speed_plus_scroll() {
        let mut s = spawner(0);
        s.update(10, 0);
        assert_eq!(s.enemies[0].rect.x, 848);
        s.update(20, 3);
        assert_eq!(s.enemies[0].rect.x, 843);
    }

    #[test]
    fn culls_once_fully_off_left_edge() {
        let mut s = spawner(0);
        s.enemies[0].rect.x = -46; // right edge at 4
        assert_eq!(s.update(10, 0).culled, 0); // right edge 2: one column still visible
        assert_eq!(s.enemies.len(), 1);
        assert_eq!(s.update(20, 0).culled, 1); // right edge 0: nothing left on screen
        assert!(s.enemies.is_empty());
    }
}
