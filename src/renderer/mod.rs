//! Terminal rendering
//!
//! The render context owns everything drawing needs: the output handle, the
//! terminal size and the star field. It reads the session and never changes
//! it. The 800x600 world is scaled onto the terminal grid below a one-row HUD.

pub mod starfield;

use std::io::Write;

use crossterm::{
    QueueableCommand, cursor,
    style::{self, Color, Print},
    terminal,
};
use glam::Vec2;

use crate::audio::AudioSink;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::leaderboard::ScoreSink;
use crate::palette::{self, Rgb};
use crate::quiz::Quiz;
use crate::session::{Screen, Session};
use crate::settings::QualityPreset;
use crate::sim::collision::Aabb;
use crate::sim::{GameState, Obstacle, ObstacleKind, Particle, Player, Powerup};

pub use starfield::{Star, Starfield};

/// Rows reserved above the playfield
const HUD_ROWS: u16 = 1;

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

/// Map a world point to a terminal cell, or `None` when off the playfield
pub fn project(pos: Vec2, cols: u16, rows: u16) -> Option<(u16, u16)> {
    if cols == 0 || rows <= HUD_ROWS {
        return None;
    }
    if pos.x < 0.0 || pos.x >= SCREEN_WIDTH || pos.y < 0.0 || pos.y >= SCREEN_HEIGHT {
        return None;
    }
    let field_rows = rows - HUD_ROWS;
    let col = (pos.x / SCREEN_WIDTH * cols as f32) as u16;
    let row = (pos.y / SCREEN_HEIGHT * field_rows as f32) as u16;
    Some((col.min(cols - 1), HUD_ROWS + row.min(field_rows - 1)))
}

/// Cell span `[start, end)` covered by a world interval along one axis
fn span(start: f32, end: f32, world: f32, cells: u16) -> Option<(u16, u16)> {
    if end <= 0.0 || start >= world || cells == 0 {
        return None;
    }
    let first = (start.max(0.0) / world * cells as f32).floor() as u16;
    let last = (end.min(world) / world * cells as f32).ceil() as u16;
    let first = first.min(cells - 1);
    Some((first, last.clamp(first + 1, cells)))
}

/// Owns the terminal output and per-frame drawing state
pub struct RenderContext<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    stars: Starfield,
}

impl<W: Write> RenderContext<W> {
    pub fn new(out: W, cols: u16, rows: u16, quality: QualityPreset, seed: u64) -> Self {
        log::debug!(
            "Render context {}x{} cells, {} quality",
            cols,
            rows,
            quality.as_str()
        );
        Self {
            out,
            cols,
            rows,
            stars: Starfield::new(quality.star_count(), seed),
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Draw one complete frame for the session's current screen
    pub fn draw<S: ScoreSink, A: AudioSink>(
        &mut self,
        session: &Session<S, A>,
    ) -> std::io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;

        // Stars hold still while a quiz has the game paused
        if !matches!(session.screen(), Screen::Quiz { .. }) {
            self.stars.advance();
        }
        self.draw_stars()?;

        match session.screen() {
            Screen::Idle => {}
            Screen::EnteringName { name } => self.draw_name_entry(name)?,
            Screen::Playing => self.draw_playfield(session.state())?,
            Screen::Quiz { quiz } => {
                self.draw_playfield(session.state())?;
                self.draw_quiz(quiz)?;
            }
            Screen::GameOver => self.draw_game_over(session.state())?,
            Screen::ViewingBoard => self.draw_board(session.leaderboard_page())?,
        }

        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()
    }

    // ── Screens ──────────────────────────────────────────────────────────────

    fn draw_name_entry(&mut self, name: &str) -> std::io::Result<()> {
        let mid = self.rows / 2;
        self.centered(mid.saturating_sub(3), "NEON RUNNER", palette::NEON_PINK)?;
        self.centered(
            mid,
            &format!("Enter Username: {}_", name),
            palette::NEON_BLUE,
        )?;
        self.centered(
            mid + 2,
            "Letters only, up to 4. Enter to start",
            palette::GREY,
        )?;
        self.centered(mid + 3, "Ctrl+C to quit", palette::GREY)
    }

    fn draw_stars(&mut self) -> std::io::Result<()> {
        for star in self.stars.stars().to_vec() {
            let (glyph, rgb) = star.glyph();
            self.plot(star.pos, glyph, rgb)?;
        }
        Ok(())
    }

    /// Once the run is over only the explosion is left on the field
    fn draw_playfield(&mut self, state: &GameState) -> std::io::Result<()> {
        if !state.is_over() {
            for obstacle in &state.obstacles {
                self.draw_obstacle(obstacle)?;
            }
            for powerup in &state.powerups {
                self.draw_powerup(powerup)?;
            }
            self.draw_player(&state.player)?;
        }
        for particle in &state.particles {
            self.draw_particle(particle)?;
        }
        self.draw_hud(state)
    }

    fn draw_hud(&mut self, state: &GameState) -> std::io::Result<()> {
        self.out.queue(cursor::MoveTo(1, 0))?;
        self.out.queue(style::SetForegroundColor(color(palette::WHITE)))?;
        self.out
            .queue(Print(format!("Score: {}", state.score as u64)))?;

        // Grazing pays nothing while the wall is up, so the multiplier is hidden
        if !state.fire_wall.is_active() {
            let combo = if state.combo.is_maxed() {
                palette::GOLD
            } else {
                palette::ORANGE
            };
            self.out.queue(style::SetForegroundColor(color(combo)))?;
            self.out
                .queue(Print(format!("  x{:.1}", state.combo.multiplier())))?;
        }

        if state.player.shield {
            let text = "[SHIELD]";
            let col = self.cols.saturating_sub(text.len() as u16 + 1);
            self.out.queue(cursor::MoveTo(col, 0))?;
            self.out
                .queue(style::SetForegroundColor(color(palette::GOLD)))?;
            self.out.queue(Print(text))?;
        }

        if state.fire_wall.warning_frames() > 0 {
            self.centered(0, "!! FIRE WALL !!", palette::RED)?;
        }
        Ok(())
    }

    fn draw_quiz(&mut self, quiz: &Quiz) -> std::io::Result<()> {
        let top = (self.rows / 2).saturating_sub(3);
        self.centered(top, quiz.question, palette::NEON_BLUE)?;
        for (i, option) in quiz.options.iter().enumerate() {
            let line = format!("{}. {}", i + 1, option);
            self.centered(top + 2 + i as u16, &line, palette::WHITE)?;
        }
        self.centered(top + 6, "Press 1, 2 or 3", palette::GREY)
    }

    fn draw_game_over(&mut self, state: &GameState) -> std::io::Result<()> {
        let mid = self.rows / 2;
        self.centered(mid.saturating_sub(3), "GAME OVER", palette::RED)?;
        self.centered(
            mid.saturating_sub(1),
            &format!("Final Score: {}", state.final_score()),
            palette::WHITE,
        )?;
        self.centered(mid + 1, "R to Play Again", palette::NEON_GREEN)?;
        self.centered(mid + 2, "H for High Scores", palette::NEON_BLUE)?;
        self.centered(mid + 4, "Ctrl+C to quit", palette::GREY)
    }

    fn draw_board(&mut self, page: &str) -> std::io::Result<()> {
        let mid = self.rows / 2;
        self.centered(mid.saturating_sub(3), "HIGH SCORES", palette::GOLD)?;
        self.centered(
            mid.saturating_sub(1),
            "Top scores are listed at:",
            palette::WHITE,
        )?;
        self.centered(mid, page, palette::NEON_BLUE)?;
        self.centered(mid + 2, "Esc or H to return", palette::GREY)
    }

    // ── Entities ─────────────────────────────────────────────────────────────

    fn draw_player(&mut self, player: &Player) -> std::io::Result<()> {
        for particle in &player.trail {
            self.draw_particle(particle)?;
        }
        let rgb = if player.shield {
            palette::GOLD
        } else {
            palette::NEON_BLUE
        };
        // Left tilt is positive
        let sprite = if player.tilt > 5.0 {
            "/▲-"
        } else if player.tilt < -5.0 {
            "-▲\\"
        } else {
            "/▲\\"
        };
        let center = Vec2::new(player.pos.x, player.pos.y + player.height / 2.0);
        if let Some((col, row)) = project(center, self.cols, self.rows) {
            self.out.queue(cursor::MoveTo(col.saturating_sub(1), row))?;
            self.out.queue(style::SetForegroundColor(color(rgb)))?;
            self.out.queue(Print(sprite))?;
        }
        Ok(())
    }

    fn draw_obstacle(&mut self, obstacle: &Obstacle) -> std::io::Result<()> {
        let hitbox = obstacle.hitbox();
        match &obstacle.kind {
            ObstacleKind::Asteroid { silhouette } => {
                self.fill(&hitbox, '#', palette::GREY)?;
                let center = obstacle.center();
                let rotation = Vec2::from_angle(obstacle.rotation.to_radians());
                for vertex in silhouette {
                    self.plot(center + rotation.rotate(*vertex), '*', palette::WHITE)?;
                }
            }
            ObstacleKind::Drone => {
                // Blinking running lights
                let rgb = if (obstacle.anim_timer / 15) % 2 == 0 {
                    palette::NEON_PINK
                } else {
                    palette::PURPLE
                };
                self.fill(&hitbox, '▣', rgb)?;
            }
            ObstacleKind::Scout { .. } => self.fill(&hitbox, 'V', palette::RED)?,
            ObstacleKind::FireWallSegment { .. } => self.fill(&hitbox, '▓', palette::ORANGE)?,
        }
        for particle in obstacle.particles() {
            self.draw_particle(particle)?;
        }
        Ok(())
    }

    fn draw_powerup(&mut self, powerup: &Powerup) -> std::io::Result<()> {
        let glyph = if powerup.glow > 5.0 { '◆' } else { '◇' };
        self.fill(&powerup.hitbox(), glyph, palette::NEON_GREEN)
    }

    fn draw_particle(&mut self, particle: &Particle) -> std::io::Result<()> {
        let glyph = if particle.size > 3.0 {
            '*'
        } else if particle.size > 1.5 {
            '+'
        } else {
            '·'
        };
        self.plot(particle.pos, glyph, particle.color)
    }

    // ── Primitives ───────────────────────────────────────────────────────────

    fn plot(&mut self, pos: Vec2, glyph: char, rgb: Rgb) -> std::io::Result<()> {
        if let Some((col, row)) = project(pos, self.cols, self.rows) {
            self.out.queue(cursor::MoveTo(col, row))?;
            self.out.queue(style::SetForegroundColor(color(rgb)))?;
            self.out.queue(Print(glyph))?;
        }
        Ok(())
    }

    fn fill(&mut self, area: &Aabb, glyph: char, rgb: Rgb) -> std::io::Result<()> {
        let max = area.max();
        let Some((col0, col1)) = span(area.min.x, max.x, SCREEN_WIDTH, self.cols) else {
            return Ok(());
        };
        let field_rows = self.rows.saturating_sub(HUD_ROWS);
        let Some((row0, row1)) = span(area.min.y, max.y, SCREEN_HEIGHT, field_rows) else {
            return Ok(());
        };

        let line: String = std::iter::repeat_n(glyph, (col1 - col0) as usize).collect();
        self.out.queue(style::SetForegroundColor(color(rgb)))?;
        for row in row0..row1 {
            self.out.queue(cursor::MoveTo(col0, HUD_ROWS + row))?;
            self.out.queue(Print(&line))?;
        }
        Ok(())
    }

    fn centered(&mut self, row: u16, text: &str, rgb: Rgb) -> std::io::Result<()> {
        let width = text.chars().count() as u16;
        let col = (self.cols / 2).saturating_sub(width / 2);
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetForegroundColor(color(rgb)))?;
        self.out.queue(Print(text))?;
        Ok(())
    }
}
