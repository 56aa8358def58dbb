/// Events emitted during a simulation step.
/// The main loop consumes these for logging and run-end handling.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    JumpStarted,
    /// Came to rest on a platform (by index) or on the ground (`None`).
    Landed { platform: Option<usize> },
    ChestOpened { index: usize, score: u32 },
    EnemySpawned,
    EnemyCulled { count: usize },
    EnemyContact { index: usize },
    TimeUp { score: u32 },
}
