/// Terminal renderer.  All terminal output lives here.
///
/// Each function receives a mutable writer and an immutable snapshot of the
/// game.  No game logic is performed; this module only translates pixel-space
/// state into terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use face_shooter::config::Viewport;
use face_shooter::entities::{GameStatus, Lean};
use face_shooter::media::{MediaContext, Tint};
use face_shooter::snapshot::{EntityView, RenderSnapshot};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_BORDER_FLASH: Color = Color::Red;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_POWER: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_PLAYER_FIRING: Color = Color::Yellow;
const C_HEALTH: Color = Color::Green;
const C_HINT: Color = Color::DarkGrey;

// ── Screen geometry ───────────────────────────────────────────────────────────

/// Pixels covered by one terminal cell.
pub const PX_PER_COL: f32 = 10.0;
pub const PX_PER_ROW: f32 = 20.0;

/// Terminal size and the mapping between cells and simulation pixels.
/// Playfield spans columns 1..cols-1 and rows 2..rows-2.
#[derive(Clone, Copy, Debug)]
pub struct Screen {
    pub cols: u16,
    pub rows: u16,
}

impl Screen {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    fn play_cols(&self) -> u16 {
        self.cols.saturating_sub(2)
    }

    fn play_rows(&self) -> u16 {
        self.rows.saturating_sub(4)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.play_cols() as f32 * PX_PER_COL,
            self.play_rows() as f32 * PX_PER_ROW,
        )
    }

    /// Pixel position → cell, if it lands inside the playfield.
    pub fn to_cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let col = (x / PX_PER_COL) as u16;
        let row = (y / PX_PER_ROW) as u16;
        if col >= self.play_cols() || row >= self.play_rows() {
            return None;
        }
        Some((col + 1, row + 2))
    }

    /// Cell → normalized playfield position in [0, 1].
    pub fn normalize(&self, col: u16, row: u16) -> (f32, f32) {
        let nx = col.saturating_sub(1) as f32 / self.play_cols().max(1) as f32;
        let ny = row.saturating_sub(2) as f32 / self.play_rows().max(1) as f32;
        (nx.clamp(0.0, 1.0), ny.clamp(0.0, 1.0))
    }
}

fn tint_color(tint: Tint) -> Color {
    match tint {
        Tint::White => Color::White,
        Tint::Grey => Color::DarkGrey,
        Tint::Red => Color::Red,
        Tint::Green => Color::Green,
        Tint::Yellow => Color::Yellow,
        Tint::Blue => Color::Blue,
        Tint::Magenta => Color::Magenta,
        Tint::Cyan => Color::Cyan,
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    snap: &RenderSnapshot,
    media: &MediaContext,
    screen: &Screen,
    sensitivity: f32,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, snap, screen)?;
    draw_hud(out, snap, screen)?;

    for view in &snap.entities {
        draw_entity(out, view, media, screen)?;
    }

    draw_player(out, snap, screen)?;
    draw_banner(out, snap, screen)?;
    draw_controls_hint(out, screen, sensitivity)?;

    match snap.status {
        GameStatus::Start => draw_centered(out, screen, &[("SHOW YOUR FACE TO START", Color::Cyan)])?,
        GameStatus::GameOver => draw_game_over(out, snap, screen)?,
        GameStatus::Playing => {}
    }
    if snap.face_missing {
        draw_face_missing(out, screen)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, screen.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, snap: &RenderSnapshot, screen: &Screen) -> std::io::Result<()> {
    let w = screen.cols as usize;
    let h = screen.rows;

    out.queue(style::SetForegroundColor(if snap.damage_flash {
        C_BORDER_FLASH
    } else {
        C_BORDER
    }))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(screen.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, snap: &RenderSnapshot, screen: &Screen) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    if snap.high_score > 0 {
        out.queue(Print(format!("Score:{:>6}  Hi:{:>6}", snap.score, snap.high_score)))?;
    } else {
        out.queue(Print(format!("Score:{:>6}", snap.score)))?;
    }

    let level_str = format!("[ LEVEL {} ]", snap.level);
    let lx = (screen.cols / 2).saturating_sub(level_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(if snap.boss_active {
        Color::Magenta
    } else {
        Color::Green
    }))?;
    out.queue(Print(&level_str))?;

    let power_tag = format!("[PWR {}] ", "▮".repeat(snap.power_level as usize));
    let hearts = format!(
        "{}{}",
        "♥".repeat(snap.lives as usize),
        "·".repeat(snap.max_lives.saturating_sub(snap.lives) as usize)
    );
    let lives_str = format!("Lives:{}", hearts);
    let right_len = power_tag.chars().count() + lives_str.chars().count();

    let rx = screen.cols.saturating_sub(right_len as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_POWER))?;
    out.queue(Print(&power_tag))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_entity<W: Write>(
    out: &mut W,
    view: &EntityView,
    media: &MediaContext,
    screen: &Screen,
) -> std::io::Result<()> {
    let sprite = media.sprite_for(view);
    out.queue(style::SetForegroundColor(tint_color(sprite.tint)))?;
    for (i, line) in sprite.rows.iter().enumerate() {
        let y = view.y + i as f32 * PX_PER_ROW;
        if let Some((col, row)) = screen.to_cell(view.x, y) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print(line))?;
        }
    }

    // Health bar above damaged enemies
    if let (Some(life), Some(max)) = (view.life, view.max_life) {
        if max > 1 && life < max {
            if let Some((col, row)) = screen.to_cell(view.x, view.y - PX_PER_ROW) {
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(style::SetForegroundColor(C_HEALTH))?;
                out.queue(Print(format!(
                    "{}{}",
                    "█".repeat(life as usize),
                    "░".repeat((max - life) as usize)
                )))?;
            }
        }
    }
    Ok(())
}

fn draw_player<W: Write>(out: &mut W, snap: &RenderSnapshot, screen: &Screen) -> std::io::Result<()> {
    //   ▲      ← aim point
    //  /█\     ← wings lean with head movement
    let aim = snap.player.aim;
    let Some((col, row)) = screen.to_cell(aim.x, aim.y) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(if snap.player.mouth_open {
        C_PLAYER_FIRING
    } else {
        C_PLAYER
    }))?;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print("▲"))?;

    let wings = match snap.player.lean {
        Lean::Left => "<█\\",
        Lean::Center => "/█\\",
        Lean::Right => "/█>",
    };
    if row + 1 < screen.rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row + 1))?;
        out.queue(Print(wings))?;
    }
    Ok(())
}

// ── Banners & overlays ────────────────────────────────────────────────────────

fn draw_banner<W: Write>(out: &mut W, snap: &RenderSnapshot, screen: &Screen) -> std::io::Result<()> {
    // Pulse on alternating 8-frame windows
    let visible = (snap.frame / 8) % 2 == 0;
    let banner = if snap.boss_warning && visible {
        Some(("!! WARNING: BOSS APPROACHING !!", Color::Magenta))
    } else if snap.level_up {
        Some(("LEVEL UP!", Color::Green))
    } else {
        None
    };
    if let Some((msg, color)) = banner {
        let col = (screen.cols / 2).saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, 2))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, screen: &Screen, sensitivity: f32) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, screen.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(format!(
        "MOUSE: Aim  CLICK/SPACE: Mouth  F: Hide face  +/-: Gain {:.1}  R: Restart  Q: Quit",
        sensitivity
    )))?;
    Ok(())
}

fn draw_centered<W: Write>(out: &mut W, screen: &Screen, lines: &[(&str, Color)]) -> std::io::Result<()> {
    let cx = screen.cols / 2;
    let start_row = (screen.rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}

fn draw_face_missing<W: Write>(out: &mut W, screen: &Screen) -> std::io::Result<()> {
    let row = (screen.rows / 2).saturating_add(3);
    let msg = "FACE NOT DETECTED";
    out.queue(cursor::MoveTo((screen.cols / 2).saturating_sub(msg.len() as u16 / 2), row))?;
    out.queue(style::SetForegroundColor(Color::Red))?;
    out.queue(Print(msg))?;
    Ok(())
}

fn draw_game_over<W: Write>(out: &mut W, snap: &RenderSnapshot, screen: &Screen) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>6}", snap.score);
    let new_best = snap.score >= snap.high_score && snap.score > 0;
    let best_line = if new_best {
        format!("★ NEW BEST: {:>6} ★", snap.high_score)
    } else {
        format!("Best Score:  {:>6}", snap.high_score)
    };
    let level_line = format!("Reached level {}", snap.level);

    draw_centered(
        out,
        screen,
        &[
            ("╔════════════════════╗", Color::Red),
            ("║    GAME  OVER      ║", Color::Red),
            ("╚════════════════════╝", Color::Red),
            (score_line.as_str(), Color::Yellow),
            (best_line.as_str(), if new_best { Color::Yellow } else { Color::DarkGrey }),
            (level_line.as_str(), Color::DarkGrey),
            ("Look away and back (or R) to play again", Color::White),
        ],
    )
}
