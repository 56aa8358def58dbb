/// ScrollCamera: horizontal scroll offset with a dead-zone.
///
/// `scroll_x` is the world-space x of the screen's left edge and always
/// satisfies `0 <= scroll_x <= max_scroll()`.
///
/// Dead-zone: between one quarter and three quarters of the screen width the
/// player walks freely. Pushing past either edge (and only when the level
/// still has room on that side) scrolls the world instead: the player's own
/// screen x stays put and every other entity is translated by the delta.

#[derive(Clone, Debug)]
pub struct ScrollCamera {
    pub scroll_x: i32,
    screen_width: i32,
    level_width: i32,
    scroll_speed: i32,
}

/// Outcome of a horizontal input for one frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Horizontal {
    /// Player velocity on screen.
    pub vx: i32,
    /// Requested (unclamped) scroll change.
    pub scroll: i32,
}

impl ScrollCamera {
    pub fn new(screen_width: i32, level_width: i32, scroll_speed: i32) -> Self {
        ScrollCamera { scroll_x: 0, screen_width, level_width, scroll_speed }
    }

    /// Upper bound of `scroll_x`. A level narrower than the screen never scrolls.
    pub fn max_scroll(&self) -> i32 {
        (self.level_width - self.screen_width).max(0)
    }

    pub fn level_width(&self) -> i32 {
        self.level_width
    }

    fn left_edge(&self) -> i32 {
        self.screen_width / 4
    }

    fn right_edge(&self) -> i32 {
        self.screen_width * 3 / 4
    }

    /// Decide between walking and scrolling for the held direction.
    /// Left wins when both directions are held.
    pub fn horizontal(&self, player_x: i32, left: bool, right: bool, walk_speed: i32) -> Horizontal {
        if left {
            if player_x <= self.left_edge() && self.scroll_x > 0 {
                Horizontal { vx: 0, scroll: -self.scroll_speed }
            } else {
                Horizontal { vx: -walk_speed, scroll: 0 }
            }
        } else if right {
            if player_x >= self.right_edge() && self.scroll_x < self.max_scroll() {
                Horizontal { vx: 0, scroll: self.scroll_speed }
            } else {
                Horizontal { vx: walk_speed, scroll: 0 }
            }
        } else {
            Horizontal { vx: 0, scroll: 0 }
        }
    }

    /// Apply a scroll request, clamped to the level. Returns the delta
    /// actually applied (what entities must be shifted by).
    pub fn scroll_by(&mut self, delta: i32) -> i32 {
        let before = self.scroll_x;
        self.scroll_x = (self.scroll_x + delta).max(0).min(self.max_scroll());
        self.scroll_x - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cam(level_width: i32) -> ScrollCamera {
        ScrollCamera::new(800, level_width, 3)
    }

    #[test]
    fn dead_zone_walks() {
        let c = cam(5000);
        assert_eq!(c.horizontal(400, false, true, 7), Horizontal { vx: 7, scroll: 0 });
        assert_eq!(c.horizontal(400, true, false, 7), Horizontal { vx: -7, scroll: 0 });
        assert_eq!(c.horizontal(400, false, false, 7), Horizontal { vx: 0, scroll: 0 });
    }

    #[test]
    fn right_edge_scrolls() {
        let c = cam(5000);
        assert_eq!(c.horizontal(599, false, true, 7).scroll, 0);
        assert_eq!(c.horizontal(600, false, true, 7), Horizontal { vx: 0, scroll: 3 });
    }

    #[test]
    fn left_edge_needs_room() {
        let mut c = cam(5000);
        // scroll_x == 0: nothing to reveal on the left
        assert_eq!(c.horizontal(200, true, false, 7), Horizontal { vx: -7, scroll: 0 });
        c.scroll_by(30);
        assert_eq!(c.horizontal(200, true, false, 7), Horizontal { vx: 0, scroll: -3 });
        assert_eq!(c.horizontal(201, true, false, 7).scroll, 0);
    }

    #[test]
    fn right_stops_at_level_end() {
        let mut c = cam(1000);
        assert_eq!(c.max_scroll(), 200);
        c.scroll_by(199);
        assert_eq!(c.scroll_by(3), 1);
        assert_eq!(c.scroll_x, 200);
        assert_eq!(c.horizontal(700, false, true, 7), Horizontal { vx: 7, scroll: 0 });
    }

    #[test]
    fn clamp_both_ends() {
        let mut c = cam(1000);
        assert_eq!(c.scroll_by(-10), 0);
        assert_eq!(c.scroll_x, 0);
        assert_eq!(c.scroll_by(10_000), 200);
        assert_eq!(c.scroll_by(-10_000), -200);
        assert_eq!(c.scroll_x, 0);
    }

    #[test]
    fn narrow_level_never_scrolls() {
        let mut c = cam(500);
        assert_eq!(c.max_scroll(), 0);
        assert_eq!(c.scroll_by(3), 0);
        assert_eq!(c.horizontal(700, false, true, 7).scroll, 0);
    }
}
