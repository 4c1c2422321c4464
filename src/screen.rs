//! Module for writing output to the terminal.
//! Contains the [`Screen`] type and its public interface.

use std::io::{self, Write};

use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use image::{Rgba, RgbaImage};

use crate::{
    geometry::Rect,
    surface::{Canvas, Surface},
};

/// Pixels with an alpha value at or below this show the terminal background.
const ALPHA_THRESHOLD: u8 = 128;

const UPPER_HALF: char = '▀';
const LOWER_HALF: char = '▄';

/// A [`Surface`] shown in the terminal with 24-bit ANSI colors.
///
/// Every character cell shows two pixels stacked vertically using half block characters.
/// Every pixel a [`Surface::resize`] asks for is drawn as `zoom` by `zoom` screen pixels,
/// so after `resize(w, h)` the reported [`Surface::size`] is `(w * zoom, h * zoom)`.
///
/// The [`Screen::rasterize`] method can be used to generate bytes that can be written to
/// a terminal.
#[derive(Debug, Clone)]
pub struct Screen {
    canvas: Canvas,
    zoom: u32,
}

/// What to print for one character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Glyph {
    ch: char,
    fg: Color,
    bg: Color,
}

fn opaque(px: &Rgba<u8>) -> Option<Color> {
    let Rgba([r, g, b, a]) = *px;
    (a > ALPHA_THRESHOLD).then_some(Color::Rgb { r, g, b })
}

fn glyph(top: Option<Color>, bottom: Option<Color>) -> Glyph {
    match (top, bottom) {
        (Some(fg), Some(bg)) => Glyph {
            ch: UPPER_HALF,
            fg,
            bg,
        },
        (Some(fg), None) => Glyph {
            ch: UPPER_HALF,
            fg,
            bg: Color::Reset,
        },
        (None, Some(fg)) => Glyph {
            ch: LOWER_HALF,
            fg,
            bg: Color::Reset,
        },
        (None, None) => Glyph {
            ch: ' ',
            fg: Color::Reset,
            bg: Color::Reset,
        },
    }
}

impl Screen {
    /// Create a new empty screen drawing every surface pixel `zoom` times as large.
    /// A zoom of zero is treated as one.
    pub fn new(zoom: u32) -> Self {
        Self {
            canvas: Canvas::default(),
            zoom: zoom.max(1),
        }
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Width of the output in characters.
    pub fn cell_width(&self) -> u32 {
        self.canvas.size().0
    }

    /// Height of the output in lines. Each line holds two pixel rows.
    pub fn cell_height(&self) -> u32 {
        self.canvas.size().1.div_ceil(2)
    }

    /// Converts the screen to a utf-8 sequence of bytes that can be rendered in a terminal.
    /// Every line ends with `\r\n` so the output is also correct in raw mode.
    pub fn rasterize(&self) -> io::Result<Vec<u8>> {
        let pixels: &RgbaImage = self.canvas.pixels();
        let (width, height) = pixels.dimensions();
        let mut buf = Vec::with_capacity((width as usize * 24 + 8) * self.cell_height() as usize);
        for line in 0..self.cell_height() {
            let mut current: Option<(Color, Color)> = None;
            for x in 0..width {
                let y = line * 2;
                let top = opaque(pixels.get_pixel(x, y));
                let bottom = if y + 1 < height {
                    opaque(pixels.get_pixel(x, y + 1))
                } else {
                    None
                };
                let Glyph { ch, fg, bg } = glyph(top, bottom);
                if current != Some((fg, bg)) {
                    queue!(buf, SetForegroundColor(fg), SetBackgroundColor(bg))?;
                    current = Some((fg, bg));
                }
                queue!(buf, Print(ch))?;
            }
            queue!(buf, ResetColor, Print("\r\n"))?;
        }
        Ok(buf)
    }

    /// Switches to the alternate screen in raw mode and hides the cursor.
    ///
    /// Raw mode is switched off again if the alternate screen cannot be entered.
    pub fn enter_screen(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let entered = execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        );
        if entered.is_err() {
            let _ = terminal::disable_raw_mode();
        }
        entered
    }

    /// Restores the terminal to the state before [`Screen::enter_screen`].
    ///
    /// Every step is attempted; the first error is returned.
    pub fn exit_screen(&mut self) -> io::Result<()> {
        let left = execute!(io::stdout(), ResetColor, cursor::Show, terminal::LeaveAlternateScreen);
        let cooked = terminal::disable_raw_mode();
        left.and(cooked)
    }

    /// Writes the screen to stdout at the top left corner.
    pub fn render_screen(&self) -> io::Result<()> {
        self.render_to(&mut io::stdout().lock())
    }

    /// Writes the screen to `out` at the top left corner.
    pub fn render_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        out.write_all(&self.rasterize()?)?;
        out.flush()
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Surface for Screen {
    fn size(&self) -> (u32, u32) {
        self.canvas.size()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas
            .resize(width.saturating_mul(self.zoom), height.saturating_mul(self.zoom));
    }

    fn clear(&mut self) {
        self.canvas.clear();
    }

    fn draw_region(&mut self, image: &RgbaImage, src: Rect) {
        self.canvas.draw_region(image, src);
    }
}
