/// Entities: Platform, Ladder, Chest, Enemy, Player.
///
/// Every rect is stored in SCREEN space. Scrolling moves the world by
/// translating these rects in place; nothing keeps a separate world copy.
///
/// Ladders and chests hold no reference to the platform they were placed on.
/// Their position is derived once at generation time and from then on they
/// are translated by the same per-frame delta as every platform.

use super::geometry::Rect;

pub const PLATFORM_HEIGHT: i32 = 20;
pub const LADDER_WIDTH: i32 = 20;
pub const LADDER_HEIGHT: i32 = 100;
pub const CHEST_SIZE: i32 = 75;
pub const ENEMY_SIZE: i32 = 50;
pub const PLAYER_SIZE: i32 = 100;
pub const CHEST_POINTS: u32 = 10;

/// Frame input: which actions are held this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    pub interact: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Platform {
    /// Collision footprint.
    pub rect: Rect,
    /// Footprint shrunk vertically by 10%: same horizontal span, used for
    /// span / occupancy tests.
    pub body: Rect,
}

impl Platform {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        let rect = Rect::new(x, y, w, h);
        Platform { rect, body: rect.inflate(0, -(h / 10)) }
    }

    /// Is the horizontal coordinate `x` over this platform (edges inclusive)?
    pub fn spans(&self, x: i32) -> bool {
        self.body.left() <= x && x <= self.body.right()
    }

    pub fn translate_x(&mut self, dx: i32) {
        self.rect.translate_x(dx);
        self.body.translate_x(dx);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ladder {
    pub rect: Rect,
}

impl Ladder {
    /// Ladder centered on `platform`, rising from its top.
    pub fn on(platform: &Platform) -> Self {
        let top = platform.rect.top();
        Ladder {
            rect: Rect::new(
                platform.rect.center_x() - LADDER_WIDTH / 2,
                top - LADDER_HEIGHT,
                LADDER_WIDTH,
                LADDER_HEIGHT,
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chest {
    pub rect: Rect,
    pub collected: bool,
}

impl Chest {
    /// Chest standing on `platform`, horizontally centered.
    pub fn on(platform: &Platform) -> Self {
        Chest {
            rect: Rect::from_midbottom(
                platform.rect.center_x(),
                platform.rect.top(),
                CHEST_SIZE,
                CHEST_SIZE,
            ),
            collected: false,
        }
    }

    /// Open the chest. Returns true only on the first call.
    pub fn open(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enemy {
    pub rect: Rect,
    /// Constant leftward speed in px per frame.
    pub speed: i32,
}

impl Enemy {
    pub fn new(x: i32, y: i32, speed: i32) -> Self {
        Enemy { rect: Rect::new(x, y, ENEMY_SIZE, ENEMY_SIZE), speed }
    }
}

/// Sprite tag handed to the presentation layer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sprite {
    Idle,
    Jump,
}

/// The authoritative vertical mode, derived from the player's flags.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum VerticalMode {
    Rising,
    Falling,
    OnGround,
    OnPlatform,
    OnLadder,
    Dropping,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub rect: Rect,
    pub vx: i32,
    pub vy: i32,
    /// Never decreases during a run.
    pub score: u32,
    pub jumping: bool,
    pub falling: bool,
    /// Resting on a platform or on the ground plane.
    pub on_platform: bool,
    pub dropping: bool,
    pub on_ladder: bool,
    pub sprite: Sprite,
    /// Run-clock time the jump sprite was shown.
    pub jump_started_ms: u64,
}

impl Player {
    /// Player standing on the ground, centered on the screen.
    pub fn new(screen_width: i32, ground_level: i32) -> Self {
        Player {
            rect: Rect::from_midbottom(screen_width / 2, ground_level, PLAYER_SIZE, PLAYER_SIZE),
            vx: 0,
            vy: 0,
            score: 0,
            jumping: false,
            falling: false,
            on_platform: false,
            dropping: false,
            on_ladder: false,
            sprite: Sprite::Idle,
            jump_started_ms: 0,
        }
    }

    /// Collapse the flag set into the single vertical mode.
    /// Priority: ladder, dropping, resting, then direction of travel.
    pub fn mode(&self, ground_level: i32) -> VerticalMode {
        if self.on_ladder {
            VerticalMode::OnLadder
        } else if self.dropping {
            VerticalMode::Dropping
        } else if self.on_platform && self.rect.bottom() >= ground_level {
            VerticalMode::OnGround
        } else if self.on_platform {
            VerticalMode::OnPlatform
        } else if self.vy < 0 {
            VerticalMode::Rising
        } else {
            VerticalMode::Falling
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chest_opens_exactly_once() {
        let p = Platform::new(100, 300, 150, PLATFORM_HEIGHT);
        let mut c = Chest::on(&p);
        assert!(c.open());
        assert!(c.collected);
        assert!(!c.open());
        assert!(c.collected);
    }

    #[test]
    fn attachments_sit_on_platform_top() {
        let p = Platform::new(100, 300, 150, PLATFORM_HEIGHT);
        let c = Chest::on(&p);
        assert_eq!(c.rect.bottom(), 300);
        assert_eq!(c.rect.center_x(), p.rect.center_x());

        let l = Ladder::on(&p);
        assert_eq!(l.rect.bottom(), 300);
        assert_eq!(l.rect.x, p.rect.center_x() - 10);
        assert_eq!(l.rect.w, LADDER_WIDTH);
        assert_eq!(l.rect.h, LADDER_HEIGHT);
    }

    #[test]
    fn platform_body_keeps_span() {
        let mut p = Platform::new(100, 300, 150, PLATFORM_HEIGHT);
        assert_eq!((p.body.x, p.body.w), (p.rect.x, p.rect.w));
        assert!(p.body.h < p.rect.h);
        assert!(p.spans(100));
        assert!(p.spans(250));
        assert!(!p.spans(251));
        p.translate_x(-30);
        assert!(p.spans(70));
        assert_eq!(p.body.x, p.rect.x);
    }

    #[test]
    fn mode_follows_flags() {
        let mut p = Player::new(800, 500);
        assert_eq!(p.rect.bottom(), 500);
        assert_eq!(p.mode(500), VerticalMode::Falling);
        p.on_platform = true;
        assert_eq!(p.mode(500), VerticalMode::OnGround);
        p.rect.set_bottom(300);
        assert_eq!(p.mode(500), VerticalMode::OnPlatform);
        p.on_platform = false;
        p.vy = -5;
        assert_eq!(p.mode(500), VerticalMode::Rising);
        p.on_ladder = true;
        assert_eq!(p.mode(500), VerticalMode::OnLadder);
    }
}
