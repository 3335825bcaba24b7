//! Half-block terminal renderer.
//!
//! Each terminal cell shows two vertical pixels (`▀` with separate fg/bg
//! colours), so the buffer is `cols x rows*2`. The world is scaled
//! uniformly to fit and anchored to the bottom of the screen.

use std::io::Write;

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};

use crate::error::Result;
use crate::geometry::Rect;
use crate::obstacle::Bird;
use crate::player::Player;
use crate::session::Session;

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    const fn dim(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }

    fn term(self) -> CColor {
        CColor::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

const SKY_TOP: Rgb = Rgb(235, 240, 245);
const SKY_BOT: Rgb = Rgb(250, 250, 250);
const GROUND_LINE: Rgb = Rgb(136, 136, 136);
const SAND: Rgb = Rgb(230, 220, 190);
const SAND_DARK: Rgb = Rgb(205, 192, 160);
const PEBBLE: Rgb = Rgb(150, 140, 120);
const BLOCK_L: Rgb = Rgb(30, 100, 30);
const BLOCK_M: Rgb = Rgb(40, 140, 40);
const BLOCK_HI: Rgb = Rgb(90, 190, 80);
const BIRD_BODY: Rgb = Rgb(140, 80, 40);
const INK: Rgb = Rgb(20, 20, 20);
const SCORE_INK: Rgb = Rgb(60, 60, 60);
const BEST_INK: Rgb = Rgb(150, 150, 150);
const PANEL: Rgb = Rgb(250, 245, 230);
const PANEL_EDGE: Rgb = Rgb(120, 110, 90);
const ALERT: Rgb = Rgb(200, 40, 40);

// ── Pixel buffer ────────────────────────────────────────────────────────────

pub struct PixelBuf {
    w: usize,
    h: usize, // terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![SKY_TOP; w * h],
        }
    }

    /// Buffer for a terminal of `cols x rows` cells.
    pub fn for_terminal(cols: u16, rows: u16) -> Self {
        Self::new(cols as usize, rows as usize * 2)
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, SKY_TOP);
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    /// Bresenham segment, endpoints included.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, c: Rgb) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;
        loop {
            self.set(x, y, c);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    pub fn fill_ellipse(&mut self, cx: i32, cy: i32, rx: i32, ry: i32, c: Rgb) {
        let (rx, ry) = (rx.max(0), ry.max(0));
        if rx == 0 || ry == 0 {
            self.line(cx - rx, cy - ry, cx + rx, cy + ry, c);
            return;
        }
        for dy in -ry..=ry {
            for dx in -rx..=rx {
                let nx = dx as f64 / rx as f64;
                let ny = dy as f64 / ry as f64;
                if nx * nx + ny * ny <= 1.0 {
                    self.set(cx + dx, cy + dy, c);
                }
            }
        }
    }

    pub fn render(&self, out: &mut impl Write) -> Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut fg: Option<Rgb> = None;
        let mut bg: Option<Rgb> = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if bg != Some(bot) {
                    queue!(out, style::SetBackgroundColor(bot.term()))?;
                    bg = Some(bot);
                }
                if top == bot {
                    queue!(out, style::Print(' '))?;
                } else {
                    if fg != Some(top) {
                        queue!(out, style::SetForegroundColor(top.term()))?;
                        fg = Some(top);
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                fg = None;
                bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()?;
        Ok(())
    }
}

// ── 3x5 bitmap glyphs ───────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
fn letter(ch: char) -> Option<[u8; 15]> {
    Some(match ch {
        'A' => [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1],
        'E' => [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1],
        'G' => [0,1,1, 1,0,0, 1,0,1, 1,0,1, 0,1,1],
        'H' => [1,0,1, 1,0,1, 1,1,1, 1,0,1, 1,0,1],
        'I' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 1,1,1],
        'M' => [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1],
        'O' => [0,1,0, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        'R' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1],
        'S' => [0,1,1, 1,0,0, 0,1,0, 0,0,1, 1,1,0],
        'T' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0],
        'V' => [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        _ => return None,
    })
}

fn glyph(ch: char) -> Option<[u8; 15]> {
    match ch.to_digit(10) {
        Some(d) => Some(DIGITS[d as usize]),
        None => letter(ch),
    }
}

/// Draw text with 3x5 glyphs, 1px spacing. Unknown chars render as blanks.
fn draw_text(buf: &mut PixelBuf, x: i32, y: i32, text: &str, fg: Rgb) {
    for (i, ch) in text.chars().enumerate() {
        let Some(g) = glyph(ch) else { continue };
        let gx = x + i as i32 * 4;
        for row in 0..5 {
            for col in 0..3 {
                if g[row * 3 + col] == 1 {
                    buf.set(gx + col as i32, y + row as i32, fg);
                }
            }
        }
    }
}

fn text_width(text: &str) -> i32 {
    (text.chars().count() as i32 * 4 - 1).max(0)
}

// ── World to screen ─────────────────────────────────────────────────────────

/// Uniform scale from world pixels to buffer pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub scale: f64,
    pub ox: f64,
    pub oy: f64,
}

/// World rows shown below the ground line.
const UNDERGROUND: f64 = 20.0;

impl Projection {
    pub fn fit(buf_w: usize, buf_h: usize, field_w: f64, field_h: f64) -> Self {
        let world_h = field_h + UNDERGROUND;
        let scale = (buf_w as f64 / field_w).min(buf_h as f64 / world_h);
        Self {
            scale,
            ox: (buf_w as f64 - field_w * scale) / 2.0,
            oy: buf_h as f64 - world_h * scale,
        }
    }

    pub fn x(&self, wx: f64) -> i32 {
        (self.ox + wx * self.scale).round() as i32
    }

    pub fn y(&self, wy: f64) -> i32 {
        (self.oy + wy * self.scale).round() as i32
    }

    pub fn span(&self, w: f64) -> i32 {
        ((w * self.scale).round() as i32).max(1)
    }

    pub fn rect(&self, r: &Rect) -> (i32, i32, i32, i32) {
        let x0 = self.x(r.x);
        let y0 = self.y(r.y);
        let x1 = self.x(r.right());
        let y1 = self.y(r.bottom());
        (x0, y0, (x1 - x0).max(1), (y1 - y0).max(1))
    }
}

// ── Scene ───────────────────────────────────────────────────────────────────

pub fn draw(session: &Session, buf: &mut PixelBuf) {
    let cfg = session.config();
    let proj = Projection::fit(buf.width(), buf.height(), cfg.field_width, cfg.field_height);
    // Distance scrolled, for ground markings.
    let scroll = session.frames() as f64 * session.speed();

    draw_sky(buf, &proj, cfg.ground_line);
    draw_ground(buf, &proj, cfg.ground_line, cfg.field_width, scroll);
    for obstacle in session.obstacles() {
        for part in &obstacle.parts {
            draw_block(buf, &proj, part);
        }
    }
    for bird in session.birds() {
        draw_bird(buf, &proj, bird);
    }
    draw_player(buf, &proj, session.player(), cfg.leg_period);
    draw_score(buf, session.score(), session.best());

    if !session.is_running() {
        draw_game_over(buf, session.score(), session.best());
    }
}

fn draw_sky(buf: &mut PixelBuf, proj: &Projection, ground_line: f64) {
    let sky_h = proj.y(ground_line).clamp(0, buf.height() as i32);
    for y in 0..sky_h {
        let t = (y as u32 * 256 / sky_h.max(1) as u32) as u16;
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
        for x in 0..buf.width() as i32 {
            buf.set(x, y, c);
        }
    }
}

fn draw_ground(buf: &mut PixelBuf, proj: &Projection, ground_line: f64, field_w: f64, scroll: f64) {
    let gy = proj.y(ground_line);
    let w = buf.width() as i32;
    let h = buf.height() as i32;

    for y in (gy + 1)..h {
        for x in 0..w {
            let stripe = ((x as f64 + scroll * proj.scale * 0.5) as i32 + (y - gy) * 2) % 16 < 8;
            buf.set(x, y, if stripe { SAND } else { SAND_DARK });
        }
    }
    for x in 0..w {
        buf.set(x, gy, GROUND_LINE);
    }

    // Pebbles every 37 world px, scrolling with the field.
    let spacing = 37.0;
    let offset = scroll % spacing;
    let mut wx = -offset;
    while wx < field_w {
        let px = proj.x(wx);
        buf.set(px, gy + 2, PEBBLE);
        buf.set(px + 1, gy + 2, PEBBLE);
        wx += spacing;
    }
}

fn block_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return BLOCK_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 96 {
        Rgb::lerp(BLOCK_L, BLOCK_M, (t * 8 / 3).min(256))
    } else if t < 140 {
        Rgb::lerp(BLOCK_M, BLOCK_HI, ((t - 96) * 5).min(256))
    } else {
        Rgb::lerp(BLOCK_HI, BLOCK_L, ((t - 140) * 2).min(256))
    }
}

fn draw_block(buf: &mut PixelBuf, proj: &Projection, part: &Rect) {
    let (x, y, w, h) = proj.rect(part);
    for dx in 0..w {
        let c = block_shade(dx, w);
        for dy in 0..h {
            buf.set(x + dx, y + dy, c);
        }
    }
}

fn draw_bird(buf: &mut PixelBuf, proj: &Projection, bird: &Bird) {
    let r = &bird.rect;
    let cx = r.x + r.w / 2.0;
    let cy = r.y + r.h / 2.0;
    let (px, py) = (proj.x(cx), proj.y(cy));

    buf.fill_ellipse(px, py, proj.span(r.w / 2.0), proj.span(r.h / 2.0), BIRD_BODY);

    let tip_dy = if bird.wing_up { -8.0 } else { 8.0 };
    for side in [-1.0, 1.0] {
        buf.line(
            proj.x(cx + side * 8.0),
            py,
            proj.x(cx + side * 16.0),
            proj.y(cy + tip_dy),
            INK,
        );
    }
}

fn draw_player(buf: &mut PixelBuf, proj: &Projection, player: &Player, leg_period: u32) {
    let x = player.x + player.width / 2.0;
    let feet = player.y + player.height;
    // Crouch lowers the upper body.
    let drop = if player.ducking { 12.0 } else { 0.0 };
    let hip = feet - 10.0;
    let shoulder = feet - 30.0 + drop;
    let leg = if player.ducking { 9.0 } else { 12.0 };

    segment(buf, proj, (x, hip), (x, shoulder));

    let stride = player.stride(leg_period);
    for swing in [stride, -stride] {
        segment(buf, proj, (x, hip), (x + swing.sin() * leg, hip + swing.cos() * leg));
    }

    let (arm_from, arm_to) = if player.ducking {
        (feet - 16.0, feet - 8.0)
    } else {
        (feet - 25.0, feet - 20.0)
    };
    segment(buf, proj, (x, arm_from), (x - 10.0, arm_to));
    segment(buf, proj, (x, arm_from), (x + 10.0, arm_to));

    let r = proj.span(5.0);
    buf.fill_ellipse(proj.x(x), proj.y(feet - 35.0 + drop), r, r, INK);
}

fn segment(buf: &mut PixelBuf, proj: &Projection, a: (f64, f64), b: (f64, f64)) {
    buf.line(proj.x(a.0), proj.y(a.1), proj.x(b.0), proj.y(b.1), INK);
}

fn draw_score(buf: &mut PixelBuf, score: u64, best: u64) {
    let right = buf.width() as i32 - 2;
    let current = format!("{score:05}");
    draw_text(buf, right - text_width(&current), 2, &current, SCORE_INK);
    if best > 0 {
        let hi = format!("HI {best:05}");
        draw_text(
            buf,
            right - text_width(&current) - 4 - text_width(&hi),
            2,
            &hi,
            BEST_INK,
        );
    }
}

fn draw_game_over(buf: &mut PixelBuf, score: u64, best: u64) {
    for y in 0..buf.height() {
        for x in 0..buf.width() {
            let c = buf.get(x, y);
            buf.set(x as i32, y as i32, c.dim());
        }
    }

    let lines = [
        ("GAME OVER".to_string(), ALERT),
        (score.to_string(), INK),
        (format!("HI {best}"), SCORE_INK),
        ("R RESTART".to_string(), SCORE_INK),
    ];
    let panel_w = lines.iter().map(|(t, _)| text_width(t)).max().unwrap_or(0) + 8;
    let panel_h = lines.len() as i32 * 7 + 5;
    let cx = buf.width() as i32 / 2;
    let cy = buf.height() as i32 / 2;
    let px = cx - panel_w / 2;
    let py = cy - panel_h / 2;

    buf.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, PANEL_EDGE);
    buf.fill_rect(px, py, panel_w, panel_h, PANEL);
    for (i, (text, color)) in lines.iter().enumerate() {
        draw_text(buf, cx - text_width(text) / 2, py + 3 + i as i32 * 7, text, *color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::input::InputSnapshot;
    use crate::obstacle::Obstacle;

    #[test]
    fn set_ignores_out_of_bounds() {
        let mut buf = PixelBuf::new(4, 4);
        buf.set(-1, 0, INK);
        buf.set(0, 4, INK);
        buf.set(4, 0, INK);
        assert!((0..4).all(|y| (0..4).all(|x| buf.get(x, y) == SKY_TOP)));
    }

    #[test]
    fn line_hits_both_endpoints() {
        let mut buf = PixelBuf::new(10, 10);
        buf.line(1, 8, 7, 2, INK);
        assert_eq!(buf.get(1, 8), INK);
        assert_eq!(buf.get(7, 2), INK);
        assert_eq!(buf.get(4, 5), INK);
    }

    #[test]
    fn projection_keeps_aspect() {
        let proj = Projection::fit(400, 60, 800.0, 200.0);
        // 60 / 220 < 400 / 800, so height limits the scale.
        assert!((proj.scale - 60.0 / 220.0).abs() < 1e-9);
        assert_eq!(proj.y(220.0), 60);
        assert!(proj.ox > 0.0);

        let proj = Projection::fit(80, 200, 800.0, 200.0);
        assert!((proj.scale - 0.1).abs() < 1e-9);
        assert_eq!(proj.x(0.0), 0);
        assert_eq!(proj.x(800.0), 80);
    }

    #[test]
    fn projected_rects_are_never_empty() {
        let proj = Projection::fit(40, 20, 800.0, 200.0);
        let (_, _, w, h) = proj.rect(&Rect::new(100.0, 190.0, 2.0, 1.0));
        assert!(w >= 1 && h >= 1);
    }

    #[test]
    fn render_emits_one_line_per_row_pair() {
        let mut buf = PixelBuf::new(3, 4);
        buf.set(0, 0, INK);
        let mut out = Vec::new();
        buf.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("\r\n").count(), 1);
        assert!(text.contains('\u{2580}'));
    }

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn write_failures_surface_as_terminal_errors() {
        let buf = PixelBuf::new(3, 4);
        match buf.render(&mut Closed) {
            Err(crate::Error::Terminal(err)) => {
                assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe)
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn draws_obstacles_in_green() {
        let mut session = Session::new(GameConfig {
            seed: Some(1),
            ..GameConfig::default()
        });
        session.push_obstacle(Obstacle::new(vec![Rect::new(400.0, 150.0, 16.0, 50.0)]));
        let mut buf = PixelBuf::new(160, 48);
        draw(&session, &mut buf);

        let proj = Projection::fit(160, 48, 800.0, 200.0);
        let (x, y, w, h) = proj.rect(&session.obstacles()[0].parts[0]);
        let c = buf.get((x + w / 2) as usize, (y + h / 2) as usize);
        assert!(c.1 > c.0 && c.1 > c.2, "expected green, got {c:?}");
    }

    #[test]
    fn game_over_dims_the_scene() {
        let mut session = Session::new(GameConfig {
            seed: Some(1),
            ..GameConfig::default()
        });
        session.push_obstacle(Obstacle::new(vec![Rect::new(60.0, 170.0, 16.0, 30.0)]));
        session.step(&InputSnapshot::default());
        assert!(!session.is_running());

        let mut buf = PixelBuf::new(160, 48);
        draw(&session, &mut buf);
        assert_eq!(buf.get(0, 0), Rgb::lerp(SKY_TOP, SKY_BOT, 0).dim());
    }

    #[test]
    fn tiny_buffers_do_not_panic() {
        let session = Session::new(GameConfig::default());
        for (w, h) in [(0, 0), (1, 2), (3, 1), (10, 4)] {
            let mut buf = PixelBuf::new(w, h);
            draw(&session, &mut buf);
            buf.render(&mut Vec::new()).unwrap();
        }
    }
}
