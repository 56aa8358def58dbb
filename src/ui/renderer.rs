/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The playfield is the game's pixel screen scaled down to terminal cells:
/// one column is `PX_PER_COL` pixels wide and one row is `PX_PER_ROW` pixels
/// tall. Row 0 holds the HUD; the playfield starts at `PLAY_ROW`.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{Sprite, VerticalMode};
use crate::domain::geometry::Rect;
use crate::sim::world::{DrawKind, FrameSnapshot, Phase};

pub const PX_PER_COL: i32 = 10;
pub const PX_PER_ROW: i32 = 20;

const HUD_ROW: usize = 0;
const PLAY_ROW: usize = 1;

// ── Palette ──

const SKY: Color = Color::Rgb { r: 22, g: 22, b: 35 };
const GROUND: Color = Color::Rgb { r: 70, g: 110, b: 40 };
const PLATFORM: Color = Color::Rgb { r: 150, g: 100, b: 60 };
const LADDER: Color = Color::Rgb { r: 230, g: 200, b: 90 };
const CHEST: Color = Color::Rgb { r: 255, g: 200, b: 50 };
const CHEST_OPEN: Color = Color::Rgb { r: 110, g: 90, b: 40 };
const ENEMY: Color = Color::Rgb { r: 255, g: 60, b: 60 };
const PLAYER: Color = Color::Rgb { r: 80, g: 160, b: 255 };
const PLAYER_JUMP: Color = Color::Rgb { r: 120, g: 255, b: 255 };
const ACCENT: Color = Color::Rgb { r: 80, g: 255, b: 80 };

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: SKY };

    /// Sentinel used to invalidate the back buffer so every cell is redrawn.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    const fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies one column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn fill(&mut self, area: CellRect, cell: Cell) {
        for row in area.row..area.row + area.height {
            for col in area.col..area.col + area.width {
                self.set(col as usize, row as usize, cell);
            }
        }
    }
}

// ── Pixel → cell mapping ──

/// A rectangle in terminal cells.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CellRect {
    pub col: u16,
    pub row: u16,
    pub width: u16,
    pub height: u16,
}

impl CellRect {
    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.col
            && col < self.col + self.width
            && row >= self.row
            && row < self.row + self.height
    }
}

/// Playfield size in cells for a pixel screen.
pub fn playfield_cells(screen_width: i32, screen_height: i32) -> (u16, u16) {
    let cols = (screen_width / PX_PER_COL).clamp(1, u16::MAX as i32);
    let rows = (screen_height / PX_PER_ROW).clamp(1, u16::MAX as i32);
    (cols as u16, rows as u16)
}

/// Cells covered by a pixel rect, clipped to the playfield.
/// Every non-empty visible rect covers at least one cell.
fn rect_to_cells(rect: &Rect, cols: u16, rows: u16) -> Option<CellRect> {
    if rect.w <= 0 || rect.h <= 0 {
        return None;
    }
    let c0 = rect.left().div_euclid(PX_PER_COL).max(0);
    let c1 = (rect.right() - 1).div_euclid(PX_PER_COL).min(cols as i32 - 1);
    let r0 = rect.top().div_euclid(PX_PER_ROW).max(0);
    let r1 = (rect.bottom() - 1).div_euclid(PX_PER_ROW).min(rows as i32 - 1);
    if c0 > c1 || r0 > r1 {
        return None;
    }
    Some(CellRect {
        col: c0 as u16,
        row: (r0 as usize + PLAY_ROW) as u16,
        width: (c1 - c0 + 1) as u16,
        height: (r1 - r0 + 1) as u16,
    })
}

/// The clickable button shown on the title and game-over screens.
pub fn menu_button(phase: Phase, screen_width: i32, screen_height: i32) -> Option<(CellRect, &'static str)> {
    let label = match phase {
        Phase::Title => "[  START  ]",
        Phase::GameOver => "[ RESTART ]",
        Phase::Playing => return None,
    };
    let (cols, rows) = playfield_cells(screen_width, screen_height);
    let width = label.chars().count() as u16;
    Some((
        CellRect {
            col: cols.saturating_sub(width) / 2,
            row: PLAY_ROW as u16 + rows / 2 + 2,
            width,
            height: 1,
        },
        label,
    ))
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
    keyboard_enhanced: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
            keyboard_enhanced: false,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture,
            SetBackgroundColor(SKY),
            Clear(ClearType::All)
        )?;

        // Release events are needed for reliable held-key tracking.
        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )?;
            self.keyboard_enhanced = true;
        }

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    /// Whether the terminal reports key releases.
    pub fn keyboard_enhanced(&self) -> bool {
        self.keyboard_enhanced
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.keyboard_enhanced {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.writer,
            DisableMouseCapture,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, snap: &FrameSnapshot) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(SKY), Clear(ClearType::All))?;
        }

        if self.last_phase != Some(snap.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(SKY), Clear(ClearType::All))?;
            self.last_phase = Some(snap.phase);
        }

        self.front.clear();
        match snap.phase {
            Phase::Title => self.compose_title(snap),
            Phase::Playing => self.compose_game(snap),
            Phase::GameOver => {
                self.compose_game(snap);
                self.compose_game_over(snap);
            }
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = SKY;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(self.writer, SetForegroundColor(Color::White), SetBackgroundColor(SKY))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;

                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_game(&mut self, snap: &FrameSnapshot) {
        let (cols, rows) = playfield_cells(snap.screen_width, snap.screen_height);

        // ground plane: everything from ground level to the bottom edge
        let ground = Rect::new(0, snap.ground_level, snap.screen_width, snap.screen_height - snap.ground_level);
        if let Some(area) = rect_to_cells(&ground, cols, rows) {
            self.front.fill(area, Cell::new('▒', GROUND, SKY));
        }

        for item in &snap.items {
            let area = match rect_to_cells(&item.rect, cols, rows) {
                Some(a) => a,
                None => continue,
            };
            let cell = match item.kind {
                DrawKind::Platform => Cell::new('▀', PLATFORM, SKY),
                DrawKind::Ladder => Cell::new('╫', LADDER, SKY),
                DrawKind::Chest { open: false } => Cell::new('■', CHEST, SKY),
                DrawKind::Chest { open: true } => Cell::new('□', CHEST_OPEN, SKY),
                DrawKind::Enemy => Cell::new('▲', ENEMY, SKY),
                DrawKind::Player { mode: VerticalMode::OnLadder, .. } => Cell::new('▓', PLAYER, SKY),
                DrawKind::Player { sprite: Sprite::Jump, .. } => Cell::new('█', PLAYER_JUMP, SKY),
                DrawKind::Player { sprite: Sprite::Idle, .. } => Cell::new('█', PLAYER, SKY),
            };
            self.front.fill(area, cell);
        }

        self.compose_hud(snap);
    }

    fn compose_hud(&mut self, snap: &FrameSnapshot) {
        let score = format!(" Score: {}", snap.score);
        self.front.put_str(0, HUD_ROW, &score, Color::White, SKY);

        if let Some(ms) = snap.remaining_ms {
            let time = format!("Time: {:>2}s ", (ms + 999) / 1000);
            let (cols, _) = playfield_cells(snap.screen_width, snap.screen_height);
            let x = (cols as usize).saturating_sub(time.chars().count());
            self.front.put_str(x, HUD_ROW, &time, Color::White, SKY);
        }
    }

    fn compose_button(&mut self, snap: &FrameSnapshot) {
        if let Some((area, label)) = menu_button(snap.phase, snap.screen_width, snap.screen_height) {
            self.front.put_str(area.col as usize, area.row as usize, label, Color::Black, ACCENT);
        }
    }

    fn compose_title(&mut self, snap: &FrameSnapshot) {
        let title = [
            r"  ___  _  __ __   __ _   _   ___   ___ ",
            r" / __|| |/ / \ \ / /| |_| | / _ \ | _ \",
            r" \__ \| ' <   \ V / |  _  || (_) ||  _/",
            r" |___/|_|\_\   |_|  |_| |_| \___/ |_|  ",
        ];
        let (cols, rows) = playfield_cells(snap.screen_width, snap.screen_height);
        let top = PLAY_ROW + (rows as usize / 2).saturating_sub(8);
        for (i, line) in title.iter().enumerate() {
            let x = (cols as usize).saturating_sub(line.len()) / 2;
            self.front.put_str(x, top + i, line, CHEST, SKY);
        }

        let help = [
            "←→ / AD  Walk     ↑ / W  Climb     ↓ / S  Drop",
            "SPACE  Jump       E  Open chest    ESC / Q  Quit",
        ];
        for (i, line) in help.iter().enumerate() {
            let x = (cols as usize).saturating_sub(line.chars().count()) / 2;
            self.front.put_str(x, top + title.len() + 1 + i, line, Color::DarkGrey, SKY);
        }

        self.compose_button(snap);

        let hint = "click START or press ENTER";
        if let Some((area, _)) = menu_button(snap.phase, snap.screen_width, snap.screen_height) {
            let x = (cols as usize).saturating_sub(hint.len()) / 2;
            self.front.put_str(x, area.row as usize + 2, hint, Color::DarkGrey, SKY);
        }
    }

    fn compose_game_over(&mut self, snap: &FrameSnapshot) {
        let (cols, rows) = playfield_cells(snap.screen_width, snap.screen_height);
        let box_w = 34_u16.min(cols);
        let area = CellRect {
            col: (cols - box_w) / 2,
            row: PLAY_ROW as u16 + (rows / 2).saturating_sub(3),
            width: box_w,
            height: 8.min(rows),
        };
        let shade = Color::Rgb { r: 40, g: 40, b: 40 };
        self.front.fill(area, Cell::new(' ', Color::White, shade));

        let lines = [
            ("GAME OVER".to_string(), ENEMY),
            (format!("Final Score: {}", snap.score), Color::White),
        ];
        for (i, (text, fg)) in lines.iter().enumerate() {
            let x = area.col as usize + (box_w as usize).saturating_sub(text.len()) / 2;
            self.front.put_str(x, area.row as usize + 1 + i, text, *fg, shade);
        }

        self.compose_button(snap);

        let hint = "ENTER restart   ESC quit";
        let x = area.col as usize + (box_w as usize).saturating_sub(hint.len()) / 2;
        self.front.put_str(x, area.row as usize + 6, hint, Color::DarkGrey, shade);
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
