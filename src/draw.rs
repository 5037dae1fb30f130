// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the stamp layer.
// 2) Stamps composited with their current scale and opacity.
// 3) A tiny 5x7 bitmap font for the loading indicator and HUD.

use crate::error::Error;
use crate::stamp::{Stamp, StampState};
use crate::surface::Surface;
use crate::types::{FrameBuffer, Point};
use minifb::{Key, MouseButton, MouseMode, Window, WindowOptions};
use std::time::Duration;

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window of the requested size, capped at ~60 frames per second.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we'll exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Pointer position in window pixels, None while it is outside the window.
    pub fn pointer(&self) -> Option<Point> {
        self.window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| Point::new(x, y))
    }

    /// Stands in for a touch contact in periodic mode.
    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }
}

/* ---------- Software drawing: pixels, stamps, tiny bitmap font ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Mix `src` (0..255 RGB) over the pixel at `idx` with coverage `a` in [0,1].
#[inline]
fn blend_pixel(fb: &mut FrameBuffer, idx: usize, src: [u8; 3], a: f32) {
    let old = fb.pixels[idx];
    let mix = |shift: u32, s: u8| {
        let d = ((old >> shift) & 0xFF) as f32;
        (d + (s as f32 - d) * a).round().clamp(0.0, 255.0) as u32
    };
    fb.pixels[idx] = (mix(16, src[0]) << 16) | (mix(8, src[1]) << 8) | mix(0, src[2]);
}

/// Draw one stamp scaled about its center, faded by its opacity.
/// Visual: hidden stamps draw nothing; fully faded ones draw nothing.
pub fn draw_stamp(fb: &mut FrameBuffer, stamp: &Stamp, now: Duration) {
    let (scale, opacity) = match stamp.state() {
        StampState::Created => return,
        // exit tweens stop at zero opacity; skip the work once they get there
        StampState::Exiting if stamp.opacity_at(now) <= 0.0 => return,
        StampState::Entering | StampState::Exiting => (stamp.scale_at(now), stamp.opacity_at(now)),
    };
    if scale <= 0.0 {
        return;
    }

    let src = stamp.image().pixels();
    let (sw, sh) = (src.width() as f32, src.height() as f32);
    let c = stamp.center();
    let (dw, dh) = (sw * scale, sh * scale);
    let left = c.x - dw / 2.0;
    let top = c.y - dh / 2.0;

    // Destination box, clipped to the framebuffer
    let x0 = left.floor().max(0.0) as i32;
    let y0 = top.floor().max(0.0) as i32;
    let x1 = ((left + dw).ceil() as i32).min(fb.width as i32);
    let y1 = ((top + dh).ceil() as i32).min(fb.height as i32);

    for y in y0..y1 {
        // Nearest source row for this destination row
        let v = ((y as f32 + 0.5 - top) / scale).floor();
        if v < 0.0 || v >= sh { continue; }
        for x in x0..x1 {
            let u = ((x as f32 + 0.5 - left) / scale).floor();
            if u < 0.0 || u >= sw { continue; }
            let p = src.get_pixel(u as u32, v as u32);
            let a = (p[3] as f32 / 255.0) * opacity;
            if a <= 0.0 { continue; }
            let idx = y as usize * fb.width + x as usize;
            blend_pixel(fb, idx, [p[0], p[1], p[2]], a);
        }
    }
}

/// Paint every stamp on the surface, oldest first so new ones land on top.
pub fn draw_surface(fb: &mut FrameBuffer, surface: &Surface, now: Duration) {
    for stamp in surface.iter() {
        draw_stamp(fb, stamp, now);
    }
}

/* ---------- 5x7 bitmap font (ASCII subset we need for "LOADING" and "STAMPS: 12  NEXT: 3") ---------- */

/// Return a 5x7 glyph bitmap for a limited character set.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        // Digits 0..9
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        // Uppercase letters we need: A D E G I L M N O P S T X
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b11001,0b10101,0b10011,0b10001,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),

        // Punctuation: space, colon, dot
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y), `px` screen pixels per font pixel.
/// Visual: a glyph with a 1-pixel black shadow for contrast.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32, px: i32) {
    let Some(rows) = glyph5x7(ch) else { return };
    // Shadow pass offset by one pixel in black, then the glyph itself
    for (off, c) in [(1, 0x00000000), (0, color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) == 0 { continue; }
                for dy in 0..px {
                    for dx in 0..px {
                        put_pixel(fb, x + (rx * px) + dx + off, y + (ry as i32 * px) + dy + off, c);
                    }
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs scaled by `px`.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32, px: i32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color, px);
        x += 6 * px; // 5 pixels glyph width + 1 pixel spacing
    }
}

/// Width in screen pixels of `text` drawn at scale `px`.
pub fn text_width(text: &str, px: i32) -> i32 {
    (text.chars().count() as i32 * 6 - 1).max(0) * px
}

/// The loading indicator: "LOADING" centered on screen.
pub fn draw_loading(fb: &mut FrameBuffer, color: u32) {
    let px = 4;
    let label = "LOADING";
    let x = (fb.width as i32 - text_width(label, px)) / 2;
    let y = (fb.height as i32 - 7 * px) / 2;
    draw_text_5x7(fb, x, y, label, color, px);
}
