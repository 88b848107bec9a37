/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into the `front` buffer (array of Cell)
///   2. Compare each cell with the `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::Mode;
use crate::sim::world::{Status, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Color::Reset,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: '?',
        fg: Color::Magenta,
        bg: Color::Magenta,
    };
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

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell { ch, fg, bg });
            cx += 1;
        }
    }
}

// ── Renderer ──

/// Vertical offsets
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, Clear(ClearType::All))?;
        }

        self.front.clear();
        self.compose(world);
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, w: &WorldState) {
        let buf_w = self.front.width;
        let hud_bg = Color::Rgb { r: 20, g: 20, b: 60 };

        // ── HUD row ──
        let mode_label = match w.modes.mode() {
            Mode::Scatter => "SCATTER",
            Mode::Chase => "CHASE",
            Mode::Frightened => "FRIGHTENED",
        };
        let hud = format!(
            " Score:{:<6}/{:<6}  Mode:{:<10} ",
            w.player.score, w.player.max_score, mode_label,
        );
        for x in 0..buf_w {
            self.front.set(x, HUD_ROW, Cell { ch: ' ', fg: Color::White, bg: hud_bg });
        }
        self.front.put_str(0, HUD_ROW, &hud, Color::White, hud_bg);

        // ── Map ──
        for (gy, line) in w.frame.iter().enumerate() {
            let row = MAP_ROW + gy;
            if row >= self.front.height {
                break;
            }
            for (gx, &ch) in line.iter().enumerate() {
                if gx >= buf_w {
                    break;
                }
                let fg = glyph_color(ch);
                self.front.set(gx, row, Cell { ch, fg, bg: Color::Reset });
            }
        }

        // ── Message bar ──
        let msg_row = MAP_ROW + w.rows + 1;
        if msg_row < self.front.height && !w.message.is_empty() {
            let msg = format!(" {} ", w.message);
            let bar_bg = Color::Rgb { r: 200, g: 180, b: 50 };
            for x in 0..buf_w {
                self.front.set(x, msg_row, Cell { ch: ' ', fg: Color::Black, bg: bar_bg });
            }
            self.front.put_str(0, msg_row, &msg, Color::Black, bar_bg);
        }

        // ── End-of-game banner ──
        let banner_row = MAP_ROW + w.rows + 2;
        if banner_row < self.front.height {
            match w.status() {
                Status::Won => {
                    self.front.put_str(
                        0,
                        banner_row,
                        " ★ YOU WIN! ★   [R] Restart  [Q] Quit ",
                        Color::Black,
                        Color::Rgb { r: 80, g: 255, b: 80 },
                    );
                }
                Status::Lost => {
                    self.front.put_str(
                        0,
                        banner_row,
                        " ✕ CAUGHT! ✕   [R] Restart  [Q] Quit ",
                        Color::White,
                        Color::Rgb { r: 180, g: 40, b: 40 },
                    );
                }
                Status::Running => {}
            }
        }

        // ── Help bar ──
        let help_row = MAP_ROW + w.rows + 4;
        if help_row < self.front.height {
            let help = " Arrows/WASD: Move   R: Restart   Q/ESC: Quit";
            self.front.put_str(0, help_row, help, Color::DarkGrey, Color::Reset);
        }
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Color::Reset;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Color::Reset),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                // Position cursor if needed
                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                // Set colors only if changed
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
}

/// Foreground color for one map glyph.
fn glyph_color(ch: char) -> Color {
    match ch {
        '#' | '|' | '-' | '*' => Color::DarkBlue,
        '.' => Color::Grey,
        '@' => Color::Yellow,
        '[' | ']' => Color::Green,
        '~' => Color::DarkGrey,
        'B' => Color::Red,
        'P' => Color::Magenta,
        'I' => Color::Cyan,
        'C' => Color::DarkYellow,
        'X' => Color::Blue,
        '^' | 'v' | '<' | '>' | 'o' => Color::Yellow,
        _ => Color::White,
    }
}
