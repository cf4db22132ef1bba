/// Terminal renderer for a run.
///
/// Each function receives a mutable writer and an immutable view of the run
/// state. No game logic is performed; this module only maps canvas pixels to
/// terminal cells and translates state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use sky_shooter::entities::{
    Boss, BossBullet, Bullet, Explosion, GameStatus, Obstacle, PowerUp, PowerUpKind, RunState,
    ShotKind,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_STAGE: Color = Color::Green;
const C_PLAYER: Color = Color::White;
const C_PLAYER_SHIELD: Color = Color::Blue;
const C_PLAYER_RAPID: Color = Color::DarkYellow;
const C_PLAYER_BOSS_GUN: Color = Color::Red;
const C_OBSTACLE: [Color; 3] = [Color::Green, Color::Cyan, Color::Magenta];
const C_OBSTACLE_TOUGH: Color = Color::Red;
const C_BULLET_NORMAL: Color = Color::Cyan;
const C_BULLET_RAPID: Color = Color::Yellow;
const C_BULLET_BOSS_GUN: Color = Color::Red;
const C_BOSS: Color = Color::DarkMagenta;
const C_BOSS_BULLET: Color = Color::Magenta;
const C_BOSS_BAR: Color = Color::Red;
const C_EXPLOSION: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

const OBSTACLE_SPRITES: [&str; 3] = ["«▼»", "(◎)", "<■>"];

/// Terminal area the play field is drawn into.
struct View {
    cols: u16,
    rows: u16,
    scale_x: f32,
    scale_y: f32,
}

impl View {
    fn new(state: &RunState, cols: u16, rows: u16) -> Self {
        let inner_w = cols.saturating_sub(2).max(1) as f32;
        let inner_h = rows.saturating_sub(4).max(1) as f32;
        View {
            cols,
            rows,
            scale_x: inner_w / state.width.max(1.0),
            scale_y: inner_h / state.height.max(1.0),
        }
    }

    /// Cell for a canvas point, or `None` outside the play area.
    fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let col = 1 + (x * self.scale_x).floor() as i32;
        let row = 2 + (y * self.scale_y).floor() as i32;
        let inside = col >= 1
            && col < self.cols as i32 - 1
            && row >= 2
            && row < self.rows as i32 - 2;
        inside.then_some((col as u16, row as u16))
    }

    /// Cell under the centre of a canvas box.
    fn centre(&self, x: f32, y: f32, width: f32, height: f32) -> Option<(u16, u16)> {
        self.cell(x + width / 2.0, y + height / 2.0)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &RunState,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let view = View::new(state, cols, rows);
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &view)?;
    draw_hud(out, state, &view)?;

    for obstacle in &state.obstacles {
        draw_obstacle(out, obstacle, &view)?;
    }
    for bullet in &state.bullets {
        draw_bullet(out, bullet, &view)?;
    }
    for power_up in &state.power_ups {
        draw_power_up(out, power_up, &view)?;
    }
    for explosion in &state.explosions {
        draw_explosion(out, explosion, &view)?;
    }
    if let Some(boss) = &state.boss {
        draw_boss(out, boss, &view)?;
        draw_boss_health_bar(out, boss, &view)?;
        for bullet in &state.boss_bullets {
            draw_boss_bullet(out, bullet, &view)?;
        }
    }

    draw_player(out, state, &view)?;
    draw_controls_hint(out, &view)?;

    match state.status {
        GameStatus::Won => draw_message(
            out,
            &view,
            "You Win!",
            Color::Green,
            &format!("You have defeated the boss! Your score: {}", state.score),
            "C - Continue   Q - Quit",
        )?,
        GameStatus::GameOver => draw_message(
            out,
            &view,
            "Game Over !!!",
            Color::Red,
            &format!("Your Score {}", state.score),
            "R - Play Again   M - Menu   Q - Quit",
        )?,
        GameStatus::Ready => draw_message(
            out,
            &view,
            "Ready",
            Color::Cyan,
            &format!("High Score {}", state.high_score),
            "R - Start   M - Menu   Q - Quit",
        )?,
        GameStatus::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &View) -> std::io::Result<()> {
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

fn draw_hud<W: Write>(out: &mut W, state: &RunState, view: &View) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!(
        "Score:{:>6}  High Score:{:>6}",
        state.score, state.high_score
    )))?;

    let stage_str = format!("[ STAGE {} ]", state.stage);
    let sx = (view.cols / 2).saturating_sub(stage_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(sx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_STAGE))?;
    out.queue(Print(&stage_str))?;

    let mut tags = String::new();
    if state.player.has_boss_gun {
        tags.push_str("[★ BOSS GUN] ");
    } else if state.player.rapid_fire_active {
        tags.push_str("[! RAPID] ");
    }
    if state.player.shielded {
        tags.push_str("[◈ SHIELD] ");
    }
    let lives_str = format!("Lives: {}", state.lives);
    let right_str = format!("{tags}{lives_str}");

    let rx = view
        .cols
        .saturating_sub(right_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    if !tags.is_empty() {
        out.queue(style::SetForegroundColor(C_PLAYER_RAPID))?;
        out.queue(Print(&tags))?;
    }
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, state: &RunState, view: &View) -> std::io::Result<()> {
    //   ▲       ← tip
    //  /█\      ← fuselage + wings
    let p = &state.player;
    let Some((col, row)) = view.cell(p.x + p.width / 2.0, p.y) else {
        return Ok(());
    };

    let color = if p.shielded {
        C_PLAYER_SHIELD
    } else {
        match p.shot_kind() {
            ShotKind::BossGun => C_PLAYER_BOSS_GUN,
            ShotKind::Rapid => C_PLAYER_RAPID,
            ShotKind::Normal => C_PLAYER,
        }
    };
    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print("▲"))?;

    let wing_row = row + 1;
    if wing_row < view.rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), wing_row))?;
        out.queue(Print("/█\\"))?;
    }
    Ok(())
}

fn draw_obstacle<W: Write>(out: &mut W, obstacle: &Obstacle, view: &View) -> std::io::Result<()> {
    let Some((col, row)) = view.centre(obstacle.x, obstacle.y, obstacle.width, obstacle.height)
    else {
        return Ok(());
    };
    let variant = obstacle.variant as usize % OBSTACLE_SPRITES.len();
    let color = if obstacle.tough && obstacle.hp > 1 {
        C_OBSTACLE_TOUGH
    } else {
        C_OBSTACLE[variant]
    };
    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row))?;
    out.queue(Print(OBSTACLE_SPRITES[variant]))?;
    Ok(())
}

fn draw_bullet<W: Write>(out: &mut W, bullet: &Bullet, view: &View) -> std::io::Result<()> {
    let Some((col, row)) = view.centre(bullet.x, bullet.y, bullet.width, bullet.height) else {
        return Ok(());
    };
    let (glyph, color) = match bullet.kind {
        ShotKind::Normal => ("║", C_BULLET_NORMAL),
        ShotKind::Rapid => ("|", C_BULLET_RAPID),
        ShotKind::BossGun => ("‖", C_BULLET_BOSS_GUN),
    };
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

/// Draw a falling power-up.
///
/// Symbols:
///   ◈  (blue)  Shield
///   !  (cyan)  RapidFire
///   ★  (red)   BossGun
fn draw_power_up<W: Write>(out: &mut W, power_up: &PowerUp, view: &View) -> std::io::Result<()> {
    let Some((col, row)) = view.centre(power_up.x, power_up.y, power_up.width, power_up.height)
    else {
        return Ok(());
    };
    let (glyph, color) = match power_up.kind {
        PowerUpKind::Shield => ("◈", Color::Blue),
        PowerUpKind::RapidFire => ("!", Color::Cyan),
        PowerUpKind::BossGun => ("★", Color::Red),
    };
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

fn draw_explosion<W: Write>(out: &mut W, explosion: &Explosion, view: &View) -> std::io::Result<()> {
    let size = explosion.size;
    let Some((col, row)) = view.centre(explosion.x, explosion.y, size, size) else {
        return Ok(());
    };
    let glyph = if size > 60.0 { "✹✹✹" } else { "✸" };
    let col = if glyph.chars().count() > 1 {
        col.saturating_sub(1).max(1)
    } else {
        col
    };
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(C_EXPLOSION))?;
    out.queue(Print(glyph))?;
    Ok(())
}

fn draw_boss<W: Write>(out: &mut W, boss: &Boss, view: &View) -> std::io::Result<()> {
    //  ╔═◉═◉═╗
    //  ╚╦═▼═╦╝
    let Some((col, row)) = view.centre(boss.x, boss.y, boss.width, boss.height) else {
        return Ok(());
    };
    let left = col.saturating_sub(3).max(1);
    out.queue(style::SetForegroundColor(C_BOSS))?;
    out.queue(cursor::MoveTo(left, row))?;
    out.queue(Print("╔═◉═◉═╗"))?;
    if row + 1 < view.rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(left, row + 1))?;
        out.queue(Print("╚╦═▼═╦╝"))?;
    }
    Ok(())
}

/// Health bar drawn over the top border.
fn draw_boss_health_bar<W: Write>(out: &mut W, boss: &Boss, view: &View) -> std::io::Result<()> {
    let bar_w = (view.cols as f32 * 0.6) as usize;
    let ratio = (boss.hp.max(0) as f32 / boss.max_hp.max(1) as f32).clamp(0.0, 1.0);
    let filled = (bar_w as f32 * ratio).round() as usize;
    let bar = format!(
        " BOSS [{}{}] ",
        "█".repeat(filled),
        "░".repeat(bar_w.saturating_sub(filled))
    );
    let x = (view.cols / 2).saturating_sub(bar.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(x, 1))?;
    out.queue(style::SetForegroundColor(C_BOSS_BAR))?;
    out.queue(Print(bar))?;
    Ok(())
}

fn draw_boss_bullet<W: Write>(out: &mut W, bullet: &BossBullet, view: &View) -> std::io::Result<()> {
    let Some((col, row)) = view.centre(bullet.x, bullet.y, bullet.width, bullet.height) else {
        return Ok(());
    };
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(C_BOSS_BULLET))?;
    out.queue(Print("●"))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &View) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("←↑↓→ / WASD : Move   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

// ── End-of-run overlay ────────────────────────────────────────────────────────

fn draw_message<W: Write>(
    out: &mut W,
    view: &View,
    title: &str,
    title_color: Color,
    body: &str,
    hint: &str,
) -> std::io::Result<()> {
    let inner = body.chars().count().max(title.chars().count()) + 4;
    let top = format!("╔{}╗", "═".repeat(inner));
    let middle = format!("║{:^inner$}║", title);
    let bottom = format!("╚{}╝", "═".repeat(inner));

    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(3);

    let lines: [(&str, Color); 5] = [
        (top.as_str(), title_color),
        (middle.as_str(), title_color),
        (bottom.as_str(), title_color),
        (body, Color::Yellow),
        (hint, Color::White),
    ];
    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
