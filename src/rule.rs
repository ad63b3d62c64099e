use std::{array, fmt};

use rand::Rng;

use crate::{errors::Error, world::neighborhood, Cell};

/// An elementary rule: the next state for each of the 8 neighborhood codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    name: String,
    table: [Cell; 8],
}

impl Rule {
    /// builds the rule with the conventional Wolfram number, bit `code` giving `table[code]`.
    pub fn wolfram(number: u8) -> Self {
        let table = array::from_fn(|code| Cell::from((number >> code) & 1 == 1));
        Self {
            name: format!("rule{number}"),
            table,
        }
    }

    pub fn from_table(name: impl Into<String>, entries: &[u8]) -> Result<Self, Error> {
        let name = name.into();
        if entries.len() != 8 {
            return Err(Error::RuleLength(name, entries.len()));
        }
        let mut table = [Cell::inactive(); 8];
        for (slot, &entry) in table.iter_mut().zip(entries) {
            *slot = match Cell::from_bit(entry) {
                Some(cell) => cell,
                None => return Err(Error::RuleValue(name, entry)),
            };
        }
        Ok(Self { name, table })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &[Cell; 8] {
        &self.table
    }

    pub fn number(&self) -> u8 {
        self.table()
            .iter()
            .enumerate()
            .fold(0, |number, (code, cell)| number | cell.bit() << code)
    }

    pub fn apply(&self, left: Cell, me: Cell, right: Cell) -> Cell {
        self.table[neighborhood(left, me, right)]
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    /// true Wolfram rules; tables listed pattern-111-first would run 118 and 122 instead of 110 and 94.
    pub const DEFAULT_RULES: [u8; 4] = [110, 94, 102, 90];

    pub fn new(rules: Vec<Rule>) -> Result<Self, Error> {
        if rules.len() < 2 {
            return Err(Error::NotEnoughRules(rules.len()));
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// draws two different registry indices, retrying the second until it differs.
    pub fn pick_two(&self, rng: &mut impl Rng) -> (usize, usize) {
        let count = self.rules.len();
        let first = rng.gen_range(0..count);
        loop {
            let second = rng.gen_range(0..count);
            if second != first {
                return (first, second);
            }
        }
    }

    pub fn select_two_distinct(&self, rng: &mut impl Rng) -> (Rule, Rule) {
        let (first, second) = self.pick_two(rng);
        (self.rules[first].clone(), self.rules[second].clone())
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        let rules = Self::DEFAULT_RULES.into_iter().map(Rule::wolfram).collect();
        Self { rules }
    }
}
