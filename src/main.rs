use std::{env::args, path::PathBuf, process::exit};

use rand::{rngs::StdRng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use utils::Pos;
mod utils;

pub use world::{Cell, Torus};
pub mod world;

pub use rule::{Rule, RuleRegistry};
mod rule;

pub use engine::{Engine, State};
mod engine;

pub use sim::{Driver, IntervalTicker, Sim, SimCmd, SimHandle};
mod sim;

pub use view::View;
mod view;

mod color;
mod config;
mod errors;
mod mutation;

fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("[error] {err}");
    exit(1);
}

/// fills zero dimensions from the terminal, keeping a line for the status.
fn fit_terminal(engine: &mut config::EngineConfig) {
    if engine.cols != 0 && engine.rows != 0 {
        return;
    }
    let (width, height) = termion::terminal_size().unwrap_or_else(|err| fail(err));
    if engine.cols == 0 {
        engine.cols = width as usize;
    }
    if engine.rows == 0 {
        engine.rows = height.saturating_sub(1) as usize;
    }
}

pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let path = args().nth(1).map(PathBuf::from);
    let mut config = config::load(path.as_deref()).unwrap_or_else(|err| fail(err));
    fit_terminal(&mut config.engine);

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let engine = Engine::new(&config.engine, rng).unwrap_or_else(|err| fail(err));
    info!(
        "{}x{} grid over {} rules",
        config.engine.cols,
        config.engine.rows,
        engine.registry().rules().len()
    );

    let ticker = IntervalTicker::new(config.display.tick());
    let driver = Driver::new(engine, ticker, config.display.stop_after);
    let simulation = Sim::spawn(driver);
    let view = View::spawn(simulation.handle(), config.display.refresh());

    view.join();
    simulation.join();
}
