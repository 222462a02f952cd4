/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// Each frame is built into the `front` buffer, compared cell-by-cell
/// against the `back` buffer (previous frame), and only the changed
/// cells are emitted. Commands are batched with `queue!` and flushed
/// once. A phase change or terminal resize invalidates the back buffer
/// so the whole screen redraws.
///
/// One board cell spans two terminal columns to compensate for the
/// 2:1 aspect ratio of terminal glyphs.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::item::ItemKind;
use crate::sim::world::{Phase, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BASE_BG: Color = Color::Rgb { r: 18, g: 20, b: 28 };

    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Cell::BASE_BG,
    };

    /// Sentinel used to invalidate the back buffer: differs from every
    /// real cell, so the next diff touches every position.
    const INVALID: Cell = Cell {
        ch: '\0',
        fg: Color::Magenta,
        bg: Color::Magenta,
    };

    fn new(ch: char, fg: Color) -> Self {
        Cell { ch, fg, bg: Cell::BASE_BG }
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
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
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

    fn invalidate(&mut self) {
        self.cells.fill(Cell::INVALID);
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

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell::new(ch, fg));
            cx += 1;
        }
    }
}

// ── Layout ──

/// Each board cell = 2 terminal columns.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const BOARD_ROW: usize = 2;

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
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
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All),
        )
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen,
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        let (tw, th) = terminal::size()?;
        let (tw, th) = (tw as usize, th as usize);

        let resized = tw != self.term_w || th != self.term_h;
        let phase_changed = self.last_phase != Some(world.phase);
        self.term_w = tw;
        self.term_h = th;
        self.last_phase = Some(world.phase);

        self.front.resize(tw, th);
        self.back.resize(tw, th);
        if resized || phase_changed {
            self.back.invalidate();
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        match world.phase {
            Phase::Title => self.draw_title(world),
            Phase::Playing => {
                self.draw_hud(world);
                self.draw_board(world);
                self.draw_message(world);
                if world.paused {
                    self.draw_overlay(world, "PAUSED", "[p] resume");
                }
            }
            Phase::GameOver => {
                self.draw_hud(world);
                self.draw_board(world);
                let score_line = format!("final score {}", world.score);
                self.draw_overlay(world, "GAME OVER", &score_line);
            }
        }

        self.flush_diff()
    }

    // ── Frame construction ──

    fn draw_hud(&mut self, world: &WorldState) {
        let hearts: String = std::iter::repeat('♥').take(world.lives as usize).collect();
        let mode = if world.slow_mode { "SLOW" } else { "NORMAL" };
        let hud = format!(
            " SCORE {:04}   HIGH {:04}   LIVES {:<5}   MODE {}",
            world.score, world.high_score, hearts, mode,
        );
        self.front.put_str(0, HUD_ROW, &hud, Color::White);
    }

    fn draw_board(&mut self, world: &WorldState) {
        let g = world.grid_size as usize;
        let inner_w = g * CELL_W;

        // Border
        let border_fg = Color::DarkGrey;
        self.front.set(0, BOARD_ROW, Cell::new('┌', border_fg));
        self.front.set(inner_w + 1, BOARD_ROW, Cell::new('┐', border_fg));
        self.front.set(0, BOARD_ROW + g + 1, Cell::new('└', border_fg));
        self.front.set(inner_w + 1, BOARD_ROW + g + 1, Cell::new('┘', border_fg));
        for x in 1..=inner_w {
            self.front.set(x, BOARD_ROW, Cell::new('─', border_fg));
            self.front.set(x, BOARD_ROW + g + 1, Cell::new('─', border_fg));
        }
        for y in 1..=g {
            self.front.set(0, BOARD_ROW + y, Cell::new('│', border_fg));
            self.front.set(inner_w + 1, BOARD_ROW + y, Cell::new('│', border_fg));
        }

        // Snake: head bright, body darker.
        for (i, seg) in world.snake.iter().enumerate() {
            let fg = if i == 0 { Color::Green } else { Color::DarkGreen };
            let (cx, cy) = board_to_term(seg.x, seg.y);
            self.front.set(cx, cy, Cell::new('█', fg));
            self.front.set(cx + 1, cy, Cell::new('█', fg));
        }

        // Item, pulsing on the simulation tick so it stands out.
        if let Some(item) = &world.item {
            let ch = item_glyph(item.kind);
            let fg = item_color(item.kind, world.tick);
            let (cx, cy) = board_to_term(item.position.x, item.position.y);
            self.front.set(cx, cy, Cell::new(ch, fg));
        }
    }

    fn draw_message(&mut self, world: &WorldState) {
        if world.message.is_empty() {
            return;
        }
        let row = BOARD_ROW + world.grid_size as usize + 3;
        self.front.put_str(1, row, &world.message, Color::Yellow);
    }

    /// Two centered lines on top of the board.
    fn draw_overlay(&mut self, world: &WorldState, line1: &str, line2: &str) {
        let g = world.grid_size as usize;
        let mid_y = BOARD_ROW + g / 2;
        let board_w = g * CELL_W + 2;
        let x1 = board_w.saturating_sub(line1.chars().count()) / 2;
        let x2 = board_w.saturating_sub(line2.chars().count()) / 2;
        self.front.put_str(x1, mid_y, line1, Color::Yellow);
        self.front.put_str(x2, mid_y + 1, line2, Color::Grey);
    }

    fn draw_title(&mut self, world: &WorldState) {
        let lines: [(&str, Color); 8] = [
            ("DESK VIPER", Color::Green),
            ("", Color::White),
            ("arrows / wasd  steer", Color::Grey),
            ("p              pause", Color::Grey),
            ("space          slow mode", Color::Grey),
            ("r              new game", Color::Grey),
            ("", Color::White),
            ("[enter] start    [q] quit", Color::White),
        ];
        let start_y = 3;
        for (i, (text, fg)) in lines.iter().enumerate() {
            let x = self.term_w.saturating_sub(text.chars().count()) / 2;
            self.front.put_str(x, start_y + i, text, *fg);
        }
        if world.high_score > 0 {
            let line = format!("session high score: {}", world.high_score);
            let x = self.term_w.saturating_sub(line.chars().count()) / 2;
            self.front.put_str(x, start_y + lines.len() + 1, &line, Color::Yellow);
        }
    }

    // ── Diff emit ──

    fn flush_diff(&mut self) -> io::Result<()> {
        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }
                queue!(
                    self.writer,
                    MoveTo(x as u16, y as u16),
                    SetForegroundColor(cell.fg),
                    SetBackgroundColor(cell.bg),
                    Print(cell.ch),
                )?;
            }
        }
        self.writer.flush()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }
}

/// Board cell → terminal position inside the border.
fn board_to_term(x: i32, y: i32) -> (usize, usize) {
    (1 + x as usize * CELL_W, BOARD_ROW + 1 + y as usize)
}

fn item_glyph(kind: ItemKind) -> char {
    match kind {
        ItemKind::Coffee => 'C',
        ItemKind::Laptop => 'L',
        ItemKind::Pencil => 'P',
        ItemKind::Folder => 'F',
        ItemKind::Cup => 'U',
    }
}

/// Item color pulses with the simulation tick: kind color on even
/// ticks, dimmed on odd. Freezes while paused, since ticks do.
fn item_color(kind: ItemKind, tick: u64) -> Color {
    if tick % 2 != 0 {
        return Color::DarkGrey;
    }
    match kind {
        ItemKind::Coffee => Color::DarkYellow,
        ItemKind::Laptop => Color::Cyan,
        ItemKind::Pencil => Color::White,
        ItemKind::Folder => Color::Magenta,
        ItemKind::Cup => Color::Blue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_pulse_follows_tick_parity() {
        let even = item_color(ItemKind::Coffee, 0);
        let odd = item_color(ItemKind::Coffee, 1);
        assert_ne!(even, odd);
        assert_eq!(even, item_color(ItemKind::Coffee, 2));
        assert_eq!(odd, item_color(ItemKind::Laptop, 3));
    }

    #[test]
    fn kinds_are_distinguishable() {
        // Each kind keeps its own glyph and bright color.
        let mut glyphs: Vec<char> = ItemKind::ALL.iter().map(|k| item_glyph(*k)).collect();
        glyphs.dedup();
        assert_eq!(glyphs.len(), ItemKind::ALL.len());
        assert_ne!(item_color(ItemKind::Coffee, 0), item_color(ItemKind::Laptop, 0));
    }
}
