use std::{
    io::{self, stdin, stdout, Write},
    sync::mpsc,
    thread::{self, JoinHandle},
    time::Duration,
};

use termion::{event::Key, input::TermRead, raw::IntoRawMode};
use tracing::{debug, error};

use crate::{color::Hue, pos, world::neighborhood, Pos, SimCmd, SimHandle, State};

pub use canvas::{Canvas, Glyph};
mod canvas;

pub struct View {
    thread: JoinHandle<()>,
}

impl View {
    pub fn spawn(handle: SimHandle, refresh: Duration) -> Self {
        let thread = thread::spawn(move || view_loop(handle, refresh));
        Self { thread }
    }

    pub fn join(self) {
        if self.thread.join().is_err() {
            error!("view thread panicked");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCmd {
    Exit,
    Restart,
    Accelerate,
    Decelerate,
}

impl InputCmd {
    fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Char('q') | Key::Esc | Key::Ctrl('c') => Some(InputCmd::Exit),
            Key::Char('r') => Some(InputCmd::Restart),
            Key::Char('+') | Key::Char('=') => Some(InputCmd::Accelerate),
            Key::Char('-') => Some(InputCmd::Decelerate),
            _ => None,
        }
    }
}

fn input_loop(sender: mpsc::Sender<InputCmd>) {
    for key in stdin().keys() {
        let Ok(key) = key else { break };
        let Some(command) = InputCmd::from_key(key) else {
            continue;
        };
        if sender.send(command).is_err() {
            break;
        }
    }
}

fn view_loop(handle: SimHandle, refresh: Duration) {
    let raw = match stdout().into_raw_mode() {
        Ok(raw) => raw,
        Err(err) => {
            error!("cannot switch the terminal to raw mode: {err}");
            handle.send(SimCmd::Stop);
            return;
        }
    };
    let (sender, receiver) = mpsc::channel();
    let _input_handle = thread::spawn(|| input_loop(sender));

    while handle_inputs(&receiver, &handle) {
        let Some(state) = handle.snapshot() else {
            break;
        };
        if let Err(err) = display_state(&state) {
            error!("failed to draw: {err}");
            break;
        }
        thread::sleep(refresh);
    }

    handle.send(SimCmd::Stop);
    if let Err(err) = clear_screen(&mut stdout()) {
        error!("failed to clear the terminal: {err}");
    }
    drop(raw);
}

fn clear_screen(out: &mut impl Write) -> io::Result<()> {
    write!(out, "{}{}", termion::clear::All, termion::cursor::Goto(1, 1))?;
    out.flush()
}

/// forwards pending commands, returns `false` once the user asked to leave.
fn handle_inputs(receiver: &mpsc::Receiver<InputCmd>, handle: &SimHandle) -> bool {
    while let Ok(cmd) = receiver.try_recv() {
        debug!("input command {cmd:?}");
        let forwarded = match cmd {
            InputCmd::Exit => return false,
            InputCmd::Restart => SimCmd::Restart,
            InputCmd::Accelerate => SimCmd::Faster,
            InputCmd::Decelerate => SimCmd::Slower,
        };
        if !handle.send(forwarded) {
            return false;
        }
    }
    true
}

fn display_state(state: &State) -> io::Result<()> {
    let mut canvas = Canvas::from_screen()?;
    canvas.layer(|pos| glyph_at(state, pos));
    canvas.set_status(status_line(state));
    canvas.display()
}

/// the row slot drawn on screen line `line`: newest generation at the bottom.
pub fn slot_on_line(state: &State, line: usize) -> usize {
    let rows = state.rows() as u64;
    ((state.generation() + 1 + line as u64) % rows) as usize
}

const CELL_CHAR: char = '●';

pub fn glyph_at(state: &State, screen: Pos) -> Option<Glyph> {
    let (x, line) = (screen.x as usize, screen.y as usize);
    if x >= state.cols() || line >= state.rows() {
        return None;
    }
    let row = slot_on_line(state, line) as i32;
    let pos = pos!(screen.x, row);
    if !state.cell(pos).is_active() {
        return None;
    }

    let rgb = match state.mutation(pos) {
        Some(hue) => hue.to_rgb(1.0, 1.0),
        None => {
            let code = neighborhood(
                state.cell(pos + pos!(-1, 0)),
                state.cell(pos),
                state.cell(pos + pos!(1, 0)),
            );
            Hue::new(code as f32 * 360.0 / 7.0).to_rgb(0.8, 1.0)
        }
    };
    Some(Glyph { ch: CELL_CHAR, rgb })
}

pub fn status_line(state: &State) -> String {
    let (first, second) = state.rules();
    format!(
        "gen {} | {first} -> {second} | blend {:.2} | using {} ({}) | {} alive | {} | q quit, r restart, +/- speed",
        state.generation(),
        state.blend_factor(),
        state.rule(),
        state.rule().number(),
        state.grid().actives().len(),
        mutation_summary(state),
    )
}

fn mutation_summary(state: &State) -> String {
    let mutations = state.mutations();
    if mutations.is_empty() {
        "no mutations".to_string()
    } else {
        format!("{} mutations", mutations.len())
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{config::EngineConfig, Engine};

    fn engine(base_mutation_chance: f64) -> Engine {
        let config = EngineConfig {
            cols: 9,
            rows: 4,
            base_mutation_chance,
            adjacent_mutation_chance: 0.0,
            ..EngineConfig::default()
        };
        Engine::new(&config, StdRng::seed_from_u64(1)).unwrap()
    }

    #[test]
    fn newest_generation_is_on_the_bottom_line() {
        let mut engine = engine(0.0);
        assert_eq!(slot_on_line(engine.state(), 3), 0);
        assert_eq!(slot_on_line(engine.state(), 0), 1);
        for _ in 0..6 {
            engine.step();
        }
        let state = engine.state();
        assert_eq!(slot_on_line(state, 3), state.slot(state.generation()));
        assert_eq!(slot_on_line(state, 0), state.slot(state.generation() + 1));
    }

    #[test]
    fn seed_is_drawn_with_its_neighborhood_hue() {
        let engine = engine(0.0);
        let state = engine.state();
        let glyph = glyph_at(state, pos!(4, 3)).unwrap();
        assert_eq!(glyph.ch, CELL_CHAR);
        assert_eq!(glyph.rgb, Hue::new(2.0 * 360.0 / 7.0).to_rgb(0.8, 1.0));
        assert_eq!(glyph_at(state, pos!(3, 3)), None);
        assert_eq!(glyph_at(state, pos!(4, 2)), None);
        assert_eq!(glyph_at(state, pos!(20, 3)), None);
        assert_eq!(glyph_at(state, pos!(4, 10)), None);
    }

    #[test]
    fn mutated_cells_use_their_hue() {
        let mut engine = engine(1.0);
        engine.step();
        let state = engine.state();
        for x in 0..9 {
            let pos = pos!(x, 3);
            let row = slot_on_line(state, 3) as i32;
            let expected = state
                .cell(pos!(x, row))
                .is_active()
                .then(|| state.mutation(pos!(x, row)).unwrap().to_rgb(1.0, 1.0));
            assert_eq!(glyph_at(state, pos).map(|glyph| glyph.rgb), expected);
        }
    }

    #[test]
    fn status_names_the_rules() {
        let engine = engine(0.0);
        let status = status_line(engine.state());
        let (first, second) = engine.state().rules();
        assert!(status.starts_with("gen 0 | "));
        assert!(status.contains(&format!("{first} -> {second}")));
        assert!(status.contains(&format!("using {first}")));
        assert!(status.contains("| 1 alive |"));
        assert!(status.contains("| no mutations |"));
    }

    #[test]
    fn status_counts_mutations() {
        let mut engine = engine(1.0);
        engine.step();
        assert!(status_line(engine.state()).contains("| 9 mutations |"));
    }

    #[test]
    fn clear_screen_homes_the_cursor() {
        let mut out = Vec::new();
        clear_screen(&mut out).unwrap();
        let expected = format!("{}{}", termion::clear::All, termion::cursor::Goto(1, 1));
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(InputCmd::from_key(Key::Char('q')), Some(InputCmd::Exit));
        assert_eq!(InputCmd::from_key(Key::Char('r')), Some(InputCmd::Restart));
        assert_eq!(InputCmd::from_key(Key::Char('+')), Some(InputCmd::Accelerate));
        assert_eq!(InputCmd::from_key(Key::Char('-')), Some(InputCmd::Decelerate));
        assert_eq!(InputCmd::from_key(Key::Char('x')), None);
    }
}
