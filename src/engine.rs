use rand::{rngs::StdRng, Rng};
use tracing::{debug, trace};

use crate::{
    color::Hue,
    config::EngineConfig,
    errors::Error,
    mutation::{Chances, Keying, MutationMap},
    pos,
    utils::wrap,
    Cell, Pos, Rule, RuleRegistry, Torus,
};

pub use blend::Blend;
mod blend;

/// Everything a renderer reads from the engine, cheap enough to clone per frame.
#[derive(Debug, Clone)]
pub struct State {
    grid: Torus,
    blend: Blend,
    mutations: MutationMap,
    generation: u64,
}

impl State {
    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn grid(&self) -> &Torus {
        &self.grid
    }

    pub fn cell(&self, pos: Pos) -> Cell {
        self.grid.get(pos)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// the row holding `generation`.
    pub fn slot(&self, generation: u64) -> usize {
        (generation % self.rows() as u64) as usize
    }

    /// the latest generation stored in `row`, if it was written since the last restart.
    pub fn generation_in_slot(&self, row: usize) -> Option<u64> {
        let rows = self.rows() as u64;
        let behind = (self.generation % rows + rows - row as u64 % rows) % rows;
        self.generation.checked_sub(behind)
    }

    /// the mutation hue of the cell at `pos`, taken as a grid slot.
    pub fn mutation(&self, pos: Pos) -> Option<Hue> {
        let col = wrap(pos.x, self.cols());
        let row = wrap(pos.y, self.rows());
        let generation = self.generation_in_slot(row).unwrap_or(row as u64);
        self.mutations.get(col, generation)
    }

    pub fn mutations(&self) -> &MutationMap {
        &self.mutations
    }

    pub fn rule(&self) -> &Rule {
        self.blend.effective()
    }

    pub fn blend_factor(&self) -> f64 {
        self.blend.factor()
    }

    pub fn rules(&self) -> (&Rule, &Rule) {
        self.blend.pair()
    }
}

#[derive(Debug)]
pub struct Engine<R = StdRng> {
    state: State,
    registry: RuleRegistry,
    chances: Chances,
    rng: R,
}

impl<R> Engine<R>
where
    R: Rng,
{
    pub fn new(config: &EngineConfig, rng: R) -> Result<Self, Error> {
        let registry = config.registry()?;
        let chances = Chances {
            base: config.base_mutation_chance,
            adjacent: config.adjacent_mutation_chance,
        };
        Self::with_registry(config, registry, chances, rng)
    }

    fn with_registry(
        config: &EngineConfig,
        registry: RuleRegistry,
        chances: Chances,
        mut rng: R,
    ) -> Result<Self, Error> {
        let grid = Torus::new(config.cols, config.rows)?;
        let step = config.step_increment;
        if !(step > 0.0 && step <= 1.0) {
            return Err(Error::StepIncrement(step));
        }
        check_chance("base_mutation_chance", chances.base)?;
        check_chance("adjacent_mutation_chance", chances.adjacent)?;

        let pair = registry.select_two_distinct(&mut rng);
        debug!("initial rules: {}, {}", pair.0, pair.1);
        let state = State {
            mutations: MutationMap::new(config.mutation_keying, grid.rows()),
            blend: Blend::new(pair, step),
            generation: 0,
            grid,
        };
        let mut engine = Self {
            state,
            registry,
            chances,
            rng,
        };
        engine.restart();
        Ok(engine)
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn snapshot(&self) -> State {
        self.state.clone()
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// clears the grid down to a single active cell in the middle of row 0.
    ///
    /// The rule pair and row-slot mutations carry over.
    pub fn restart(&mut self) {
        let state = &mut self.state;
        state.grid.clear();
        let middle = (state.cols() / 2) as i32;
        state.grid.set(pos!(middle, 0), Cell::active());
        state.generation = 0;
        if state.mutations.keying() == Keying::Generation {
            state.mutations.clear();
        }
        debug!("restarted with {} mutation records", state.mutations.len());
    }

    pub fn step(&mut self) {
        let state = &mut self.state;
        let consumed = state.generation;
        let from = state.slot(consumed);
        let to = state.slot(consumed + 1);
        state.grid.evolve(from, to, state.blend.effective());
        state.generation += 1;

        let registry = &self.registry;
        let rng = &mut self.rng;
        state.blend.advance(|| registry.select_two_distinct(rng));

        let cols = state.grid.cols();
        let spawned = state
            .mutations
            .spread(cols, consumed, self.chances, &mut self.rng);
        trace!(
            "generation {} under {} ({:.2}), {spawned} new mutations",
            state.generation,
            state.blend.effective(),
            state.blend.factor()
        );
    }
}

fn check_chance(name: &'static str, value: f64) -> Result<(), Error> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::Chance(name, value))
    }
}
