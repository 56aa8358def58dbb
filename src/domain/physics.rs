/// Player physics: gravity integration and collision resolution.
///
/// ## Integration
///
/// Gravity runs in passes, each followed by `y += vy`:
///   - Pass 1 applies gravity unless the player is on a ladder, then clamps
///     the rect to the bottom of the screen (absolute safety floor).
///   - Every further pass applies gravity only while airborne
///     (`!on_platform || dropping`).
///
/// The classic tuning runs two passes, so a free-falling player gains
/// 2 × GRAVITY per frame and moves twice. `gravity_passes = 1` gives the
/// single-application variant.
///
/// ## Collision State Machine
///
/// ┌──────────────────────────────┬──────────────────────────────────────┐
/// │ Transition                    │ Condition                             │
/// ├──────────────────────────────┼──────────────────────────────────────┤
/// │ Airborne → OnPlatform         │ !dropping, vy > 0,                    │
/// │                               │ center_x within platform span,        │
/// │                               │ bottom in [top − 30, top + 50]        │
/// │                               │ → bottom = top, vy = 0                │
/// │ Airborne → OnGround           │ bottom >= ground level                │
/// │                               │ → bottom = ground, vy = 0,            │
/// │                               │   dropping cleared                    │
/// │ Resting → Airborne            │ no check succeeded and                │
/// │                               │ bottom < ground → jumping = true      │
/// │ Dropping                      │ platform check skipped until ground   │
/// └──────────────────────────────┴──────────────────────────────────────┘
///
/// The first platform in iteration order that matches wins; overlapping
/// platforms have no other tie-break.

use super::entity::{Platform, Player};
use crate::config::PlayerConfig;

/// Landing window above a platform's top edge.
pub const LAND_ABOVE: i32 = 30;
/// Landing window below a platform's top edge.
pub const LAND_BELOW: i32 = 50;

/// Fixed screen geometry the player is confined to.
#[derive(Clone, Copy, Debug)]
pub struct Bounds {
    pub screen_width: i32,
    pub screen_height: i32,
    pub ground_level: i32,
}

/// What the player came to rest on this frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Contact {
    Platform(usize),
    Ground,
    Airborne,
}

/// Apply gravity passes and vertical motion.
pub fn integrate(player: &mut Player, cfg: &PlayerConfig, bounds: &Bounds) {
    if !player.on_ladder {
        player.vy += cfg.gravity;
    }
    player.rect.y += player.vy;

    if player.rect.bottom() > bounds.screen_height {
        player.rect.set_bottom(bounds.screen_height);
        player.vy = 0;
    }

    let airborne = !player.on_platform || player.dropping;
    for _ in 1..cfg.gravity_passes {
        if airborne {
            player.vy += cfg.gravity;
        }
        player.rect.y += player.vy;
    }
    if airborne && player.vy > 0 {
        player.falling = true;
    }
}

/// First platform the player can land on, if any.
pub fn landing_platform(player: &Player, platforms: &[Platform]) -> Option<usize> {
    if player.dropping || player.vy <= 0 {
        return None;
    }
    let mid_x = player.rect.center_x();
    let bottom = player.rect.bottom();
    platforms.iter().position(|p| {
        let top = p.rect.top();
        p.spans(mid_x) && bottom >= top - LAND_ABOVE && bottom <= top + LAND_BELOW
    })
}

/// Resolve platform and ground contact, updating the player's flags.
pub fn resolve_contacts(player: &mut Player, platforms: &[Platform], bounds: &Bounds) -> Contact {
    let mut contact = Contact::Airborne;

    match landing_platform(player, platforms) {
        Some(i) => {
            player.rect.set_bottom(platforms[i].rect.top());
            player.vy = 0;
            player.jumping = false;
            player.falling = false;
            player.on_platform = true;
            contact = Contact::Platform(i);
        }
        None => player.on_platform = false,
    }

    if player.rect.bottom() >= bounds.ground_level {
        player.rect.set_bottom(bounds.ground_level);
        player.vy = 0;
        player.jumping = false;
        player.falling = false;
        player.on_platform = true;
        player.dropping = false;
        contact = Contact::Ground;
    }

    // Walked off an edge: block jumping until the next landing.
    if !player.on_platform && player.rect.bottom() < bounds.ground_level {
        player.jumping = true;
    }

    contact
}

/// Horizontal motion, confined to the screen.
pub fn move_horizontal(player: &mut Player, bounds: &Bounds) {
    player.rect.x += player.vx;
    player.rect.x = player.rect.x.max(0).min(bounds.screen_width - player.rect.w);
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
