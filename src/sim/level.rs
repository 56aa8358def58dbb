/// LevelGenerator: procedural platform / ladder / chest layout for a run.
///
/// ## Platforms
///   - Ground level = screen height − 50.
///   - First platform: x ∈ [50, 200], top = ground − 150.
///   - Each following platform starts 50–150 px after the previous one's
///     right edge, its top moves by −75..=75 px from the previous top and is
///     then clamped to [50, screen height − 150].
///   - Widths are sampled from [100, 200]; height is fixed at 20.
///
/// ## Ladders
///   A platform is ladder-eligible when its top is more than 160 px above
///   the ground. Eligible platforms alternate: ladder, none, ladder, ...
///   (counted over the eligible platforms only).
///
/// ## Chests
///   Platforms whose bottom edge is below y = 160 are chest-eligible.
///   Up to 7 of them are sampled without replacement, one chest each.
///
/// ## Level width
///   The right edge of the last platform.
///
/// All randomness comes from the caller's RNG, so a seeded RNG reproduces
/// the same layout.

use rand::seq::index;
use rand::Rng;

use crate::domain::entity::{Chest, Ladder, Platform, PLATFORM_HEIGHT};

const FIRST_X_MIN: i32 = 50;
const FIRST_X_MAX: i32 = 200;
const FIRST_HEIGHT_ABOVE_GROUND: i32 = 150;
const WIDTH_MIN: i32 = 100;
const WIDTH_MAX: i32 = 200;
const GAP_MIN: i32 = 50;
const GAP_MAX: i32 = 150;
const STEP_Y: i32 = 75;
const TOP_MARGIN: i32 = 50;
const BOTTOM_MARGIN: i32 = 150;

const LADDER_MIN_HEIGHT: i32 = 160;
const CHEST_MIN_BOTTOM: i32 = 160;
pub const MAX_CHESTS: usize = 7;

/// A generated level, in screen space with scroll 0.
#[derive(Clone, Debug)]
pub struct Layout {
    pub platforms: Vec<Platform>,
    pub ladders: Vec<Ladder>,
    pub chests: Vec<Chest>,
    pub level_width: i32,
}

#[inline]
pub fn ground_level(screen_height: i32) -> i32 {
    screen_height - 50
}

/// Generate `count` platforms (at least one) plus their ladders and chests.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, count: usize, screen_height: i32) -> Layout {
    let ground = ground_level(screen_height);
    let platforms = generate_platforms(rng, count, screen_height);
    let ladders = place_ladders(&platforms, ground);
    let chests = place_chests(rng, &platforms);
    let level_width = platforms.last().map_or(0, |p| p.rect.right());

    Layout { platforms, ladders, chests, level_width }
}

fn generate_platforms<R: Rng + ?Sized>(rng: &mut R, count: usize, screen_height: i32) -> Vec<Platform> {
    let ground = ground_level(screen_height);
    let mut platforms = Vec::with_capacity(count.max(1));

    let x = rng.gen_range(FIRST_X_MIN..=FIRST_X_MAX);
    let width = rng.gen_range(WIDTH_MIN..=WIDTH_MAX);
    platforms.push(Platform::new(x, ground - FIRST_HEIGHT_ABOVE_GROUND, width, PLATFORM_HEIGHT));

    for _ in 1..count {
        let (prev_right, prev_y) = match platforms.last() {
            Some(p) => (p.rect.right(), p.rect.y),
            None => break,
        };
        let x = prev_right + rng.gen_range(GAP_MIN..=GAP_MAX);
        let y = (prev_y + rng.gen_range(-STEP_Y..=STEP_Y))
            .min(screen_height - BOTTOM_MARGIN)
            .max(TOP_MARGIN);
        let width = rng.gen_range(WIDTH_MIN..=WIDTH_MAX);
        platforms.push(Platform::new(x, y, width, PLATFORM_HEIGHT));
    }

    platforms
}

#[inline]
pub fn ladder_eligible(platform: &Platform, ground: i32) -> bool {
    ground - platform.rect.top() > LADDER_MIN_HEIGHT
}

#[inline]
pub fn chest_eligible(platform: &Platform) -> bool {
    platform.rect.bottom() > CHEST_MIN_BOTTOM
}

/// Every other eligible platform gets a ladder, starting with the first.
fn place_ladders(platforms: &[Platform], ground: i32) -> Vec<Ladder> {
    let mut give = false;
    platforms
        .iter()
        .filter(|p| ladder_eligible(p, ground))
        .filter_map(|p| {
            give = !give;
            give.then(|| Ladder::on(p))
        })
        .collect()
}

/// Sample distinct eligible platforms for chests, kept in level order.
fn place_chests<R: Rng + ?Sized>(rng: &mut R, platforms: &[Platform]) -> Vec<Chest> {
    let eligible: Vec<&Platform> = platforms.iter().filter(|p| chest_eligible(p)).collect();
    let amount = eligible.len().min(MAX_CHESTS);
    let mut picked = index::sample(rng, eligible.len(), amount).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| Chest::on(eligible[i])).collect()
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
