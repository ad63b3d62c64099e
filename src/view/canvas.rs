use std::io::{self, Write};

use termion::color;

use crate::{pos, Pos};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub rgb: (u8, u8, u8),
}

pub struct Canvas {
    glyphs: Vec<Option<Glyph>>,
    width: usize,
    height: usize,
    status: String,
}

impl Canvas {
    /// fills the terminal, keeping the last line for the status.
    pub fn from_screen() -> io::Result<Self> {
        let (width, height) = termion::terminal_size()?;
        Ok(Self::new(width as usize, height.saturating_sub(1) as usize))
    }

    pub fn new(width: usize, height: usize) -> Self {
        Self {
            glyphs: vec![None; width * height],
            width,
            height,
            status: String::new(),
        }
    }

    pub fn layer(&mut self, f: impl Fn(Pos) -> Option<Glyph>) {
        for y in 0..self.height {
            for x in 0..self.width {
                if let Some(glyph) = f(pos!(x as i32, y as i32)) {
                    self.glyphs[y * self.width + x] = Some(glyph);
                }
            }
        }
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn render(&self) -> String {
        let mut result = format!("{}", termion::clear::All);
        for (index, line) in self.glyphs.chunks(self.width.max(1)).enumerate() {
            result += &format!("{}", termion::cursor::Goto(1, index as u16 + 1));
            for glyph in line {
                match glyph {
                    Some(Glyph { ch, rgb: (r, g, b) }) => {
                        result += &format!("{}{ch}", color::Fg(color::Rgb(*r, *g, *b)))
                    }
                    None => result.push(' '),
                }
            }
        }
        let status: String = self.status.chars().take(self.width).collect();
        let goto = termion::cursor::Goto(1, self.height as u16 + 1);
        result += &format!("{goto}{}{status}", color::Fg(color::Reset));
        result
    }

    pub fn display(&self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(self.render().as_bytes())?;
        stdout.flush()
    }
}
