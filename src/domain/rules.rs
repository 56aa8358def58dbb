/// PlayerController input rules, truth-table driven.
///
/// Pure functions over the player and the entities it can touch. They turn
/// held keys into velocity, flags and a scroll request; integration and
/// collision resolution live in `physics`.
///
/// ## Input Truth Table
///
/// ### Horizontal (decided by ScrollCamera)
/// ┌───────────────────────────────────────────┬─────────────────────┐
/// │ Condition                                  │ Result              │
/// ├───────────────────────────────────────────┼─────────────────────┤
/// │ Left,  x <= W/4   and scroll_x > 0         │ vx = 0, scroll −s   │
/// │ Left,  otherwise                            │ vx = −PLAYER_SPEED  │
/// │ Right, x >= 3W/4  and scroll_x < max       │ vx = 0, scroll +s   │
/// │ Right, otherwise                            │ vx = +PLAYER_SPEED  │
/// │ Neither                                    │ vx = 0              │
/// └───────────────────────────────────────────┴─────────────────────┘
///
/// ### Jump
/// ┌───────────────────────────────────────────┬─────────────────────┐
/// │ jumping or falling                         │ DENY                │
/// │ otherwise                                  │ vy = −JUMP_POWER    │
/// │   + Right held, camera not scrolling       │ vx += JUMP_FORWARD  │
/// │   + Left held,  camera not scrolling       │ vx −= JUMP_FORWARD  │
/// └───────────────────────────────────────────┴─────────────────────┘
///
/// ### Down / Up
/// ┌───────────────────────────────────────────┬─────────────────────┐
/// │ Down held                                  │ dropping = true     │
/// │ Up held and touching any ladder            │ vy = −CLIMB_SPEED   │
/// │                                            │ on_ladder = true    │
/// │ otherwise                                  │ on_ladder = false   │
/// └───────────────────────────────────────────┴─────────────────────┘
///
/// Ladder contact is re-evaluated every frame, never latched.

use super::camera::{Horizontal, ScrollCamera};
use super::entity::{Chest, Enemy, FrameInput, Ladder, Player, Sprite, CHEST_POINTS};
use super::geometry::Rect;
use crate::config::PlayerConfig;

/// What the input phase decided this frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ControlOutcome {
    pub horizontal: Horizontal,
    pub jumped: bool,
}

/// Apply held keys to the player. Returns the scroll request for the camera.
pub fn apply_input(
    player: &mut Player,
    input: &FrameInput,
    camera: &ScrollCamera,
    ladders: &[Ladder],
    cfg: &PlayerConfig,
    now_ms: u64,
) -> ControlOutcome {
    let horizontal = camera.horizontal(player.rect.x, input.left, input.right, cfg.speed);
    player.vx = horizontal.vx;

    let jumped = input.jump && can_jump(player);
    if jumped {
        start_jump(player, input, cfg, now_ms, horizontal.scroll == 0);
    }

    if input.down {
        player.dropping = true;
    }

    player.on_ladder = input.up && touching_ladder(&player.rect, ladders);
    if player.on_ladder {
        player.vy = -cfg.climb_speed;
    }

    ControlOutcome { horizontal, jumped }
}

/// A jump needs the player to be neither mid-jump nor falling.
#[inline]
pub fn can_jump(player: &Player) -> bool {
    !player.jumping && !player.falling
}

/// The forward boost is skipped while the camera scrolls; the screen x
/// stays fixed for that frame.
fn start_jump(player: &mut Player, input: &FrameInput, cfg: &PlayerConfig, now_ms: u64, boost: bool) {
    player.vy = -cfg.jump_power;
    if boost && input.right {
        player.vx += cfg.jump_forward_speed;
    } else if boost && input.left {
        player.vx -= cfg.jump_forward_speed;
    }
    player.jumping = true;
    player.on_platform = false;
    player.sprite = Sprite::Jump;
    player.jump_started_ms = now_ms;
}

pub fn touching_ladder(rect: &Rect, ladders: &[Ladder]) -> bool {
    ladders.iter().any(|l| rect.intersects(&l.rect))
}

/// Open every unopened chest the player overlaps while interact is held.
/// Returns the indices opened this frame; each adds `CHEST_POINTS`.
pub fn open_chests(player: &mut Player, chests: &mut [Chest], interact: bool) -> Vec<usize> {
    if !interact {
        return vec![];
    }
    let mut opened = vec![];
    for (i, chest) in chests.iter_mut().enumerate() {
        if player.rect.intersects(&chest.rect) && chest.open() {
            player.score += CHEST_POINTS;
            opened.push(i);
        }
    }
    opened
}

/// Indices of enemies overlapping the player. Detection only.
pub fn enemy_contacts(player: &Player, enemies: &[Enemy]) -> Vec<usize> {
    enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| player.rect.intersects(&e.rect))
        .map(|(i, _)| i)
        .collect()
}

/// Drop the jump sprite once its wall-clock window has passed.
pub fn update_sprite(player: &mut Player, now_ms: u64, window_ms: u64) {
    if player.sprite == Sprite::Jump && now_ms.saturating_sub(player.jump_started_ms) > window_ms {
        player.sprite = Sprite::Idle;
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
