/// Axis-aligned rectangles in integer pixel space.
///
/// Edges follow the usual raster convention: `right()` and `bottom()` are
/// one past the last covered pixel, so two rects that merely touch do not
/// intersect.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    /// Rect whose bottom edge is centered on `(cx, bottom)`.
    pub fn from_midbottom(cx: i32, bottom: i32, w: i32, h: i32) -> Self {
        Rect { x: cx - w / 2, y: bottom - h, w, h }
    }

    #[inline] pub fn left(&self) -> i32 { self.x }
    #[inline] pub fn right(&self) -> i32 { self.x + self.w }
    #[inline] pub fn top(&self) -> i32 { self.y }
    #[inline] pub fn bottom(&self) -> i32 { self.y + self.h }
    #[inline] pub fn center_x(&self) -> i32 { self.x + self.w / 2 }

    /// Move vertically so that `bottom() == bottom`.
    #[inline]
    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.h;
    }

    #[inline]
    pub fn translate_x(&mut self, dx: i32) {
        self.x += dx;
    }

    /// Overlap test. Zero-area rects never intersect anything.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.w <= 0 || self.h <= 0 || other.w <= 0 || other.h <= 0 {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Grow (or shrink, for negative values) around the center.
    pub fn inflate(&self, dw: i32, dh: i32) -> Rect {
        Rect {
            x: self.x - dw / 2,
            y: self.y - dh / 2,
            w: self.w + dw,
            h: self.h + dh,
        }
    }
}
