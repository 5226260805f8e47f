/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only projects the
/// logical canvas onto character cells and emits terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use space_impact::entities::{Entity, EntityKind, GameState, GameStatus};
use space_impact::Scoreboard;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HIGH: Color = Color::Cyan;
const C_SHIP: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_PROJECTILE: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

const HINT: &str = "← → / A D : Move   SPACE : Shoot   Q : Quit";

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps canvas coordinates onto the play area inside the border.
///
/// Layout: row 0 HUD, row 1 top border, rows 2..rows-2 playfield,
/// row rows-2 bottom border, last row controls hint.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    canvas_w: f32,
    canvas_h: f32,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, state: &GameState) -> Self {
        Self {
            cols,
            rows,
            canvas_w: state.width,
            canvas_h: state.height,
        }
    }

    fn play_cols(&self) -> u16 {
        self.cols.saturating_sub(2).max(1)
    }

    fn play_rows(&self) -> u16 {
        self.rows.saturating_sub(4).max(1)
    }

    /// Cell rectangle `(col0, row0, col1, row1)` (exclusive end) covered by
    /// an entity, clipped to the playfield.  `None` when fully outside.
    fn cells(&self, e: &Entity) -> Option<(u16, u16, u16, u16)> {
        let pc = self.play_cols() as f32;
        let pr = self.play_rows() as f32;
        let sx = pc / self.canvas_w;
        let sy = pr / self.canvas_h;

        let c0 = (e.x * sx).floor().max(0.0);
        let r0 = (e.y * sy).floor().max(0.0);
        // Every live entity is at least one cell.
        let c1 = (e.right() * sx).ceil().max(c0 + 1.0).min(pc);
        let r1 = (e.bottom() * sy).ceil().max(r0 + 1.0).min(pr);
        if c0 >= pc || r0 >= pr || c1 <= c0 || r1 <= r0 {
            return None;
        }
        Some((
            1 + c0 as u16,
            2 + r0 as u16,
            1 + c1 as u16,
            2 + r1 as u16,
        ))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    view: &Viewport,
    state: &GameState,
    board: &Scoreboard,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_hud(out, view, state, board)?;

    for enemy in &state.enemies {
        draw_entity(out, view, enemy)?;
    }
    for projectile in &state.projectiles {
        draw_entity(out, view, projectile)?;
    }
    draw_entity(out, view, &state.ship)?;
    draw_controls_hint(out, view)?;

    if state.status == GameStatus::Over {
        draw_game_over(out, view, state, board)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    view: &Viewport,
    state: &GameState,
    board: &Scoreboard,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {}", state.score)))?;

    let high = format!("High Score: {}", board.high_score);
    let x = view.cols.saturating_sub(high.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(x, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HIGH))?;
    out.queue(Print(high))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_entity<W: Write>(out: &mut W, view: &Viewport, entity: &Entity) -> std::io::Result<()> {
    let Some((c0, r0, c1, r1)) = view.cells(entity) else {
        return Ok(());
    };
    let width = (c1 - c0) as usize;

    // Sprites point in their direction of travel:
    //   ship         enemy
    //   ▲▲▲  nose    ▓▓▓  hull
    //   ███  hull    ▼▼▼  nose
    let color = match entity.kind {
        EntityKind::Ship => C_SHIP,
        EntityKind::Projectile => C_PROJECTILE,
        EntityKind::Enemy => C_ENEMY,
    };

    out.queue(style::SetForegroundColor(color))?;
    for row in r0..r1 {
        let glyph = match entity.kind {
            EntityKind::Ship if row == r0 => "▲",
            EntityKind::Ship => "█",
            EntityKind::Projectile => "║",
            EntityKind::Enemy if row + 1 == r1 => "▼",
            EntityKind::Enemy => "▓",
        };
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print(glyph.repeat(width)))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(HINT))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    view: &Viewport,
    state: &GameState,
    board: &Scoreboard,
) -> std::io::Result<()> {
    let final_score = board.final_score.unwrap_or(state.score);
    let score_line = format!("Game Over! Final Score: {}", final_score);
    let new_best = board.new_best;
    let best_line = if new_best {
        format!("★ NEW BEST: {} ★", board.high_score)
    } else {
        format!("High Score: {}", board.high_score)
    };

    let mut lines: Vec<(String, Color)> = vec![
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER      ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        (score_line, Color::Yellow),
        (best_line, if new_best { Color::Yellow } else { Color::DarkGrey }),
    ];

    let board_lines = board.leaderboard_lines();
    if !board_lines.is_empty() {
        lines.push((String::new(), Color::White));
        lines.push(("Leaderboard:".to_string(), Color::Cyan));
        lines.extend(board_lines.into_iter().map(|l| (l, Color::White)));
    }
    lines.push((String::new(), Color::White));
    lines.push(("R - Play Again  Q - Quit".to_string(), Color::White));

    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2).max(2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        if row >= view.rows.saturating_sub(2) {
            break;
        }
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }

    Ok(())
}
