use std::collections::HashMap;

use metrohash::MetroBuildHasher;
use rand::Rng;
use serde::Deserialize;

use crate::{color::Hue, utils::wrap};

/// How a mutation record is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Keying {
    /// `(col, generation mod rows)`: a record stays on its grid slot and is
    /// inherited by every later generation written there.
    #[default]
    RowSlot,
    /// `(col, generation)`: records belong to one generation and are pruned
    /// once it leaves the ring buffer.
    Generation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chances {
    pub base: f64,
    pub adjacent: f64,
}

impl Default for Chances {
    fn default() -> Self {
        Self {
            base: 0.01,
            adjacent: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Mark {
    col: usize,
    at: u64,
}

#[derive(Debug, Clone)]
pub struct MutationMap {
    keying: Keying,
    rows: usize,
    marks: HashMap<Mark, Hue, MetroBuildHasher>,
}

impl MutationMap {
    pub fn new(keying: Keying, rows: usize) -> Self {
        Self {
            keying,
            rows,
            marks: HashMap::default(),
        }
    }

    pub fn keying(&self) -> Keying {
        self.keying
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// the only place deciding which generations share a record.
    fn key(&self, col: usize, generation: u64) -> Mark {
        let at = match self.keying {
            Keying::RowSlot => generation % self.rows as u64,
            Keying::Generation => generation,
        };
        Mark { col, at }
    }

    pub fn get(&self, col: usize, generation: u64) -> Option<Hue> {
        self.marks.get(&self.key(col, generation)).copied()
    }

    pub fn insert(&mut self, col: usize, generation: u64, hue: Hue) {
        let key = self.key(col, generation);
        self.marks.insert(key, hue);
    }

    pub fn contains(&self, col: usize, generation: u64) -> bool {
        self.marks.contains_key(&self.key(col, generation))
    }

    /// forgets everything, used when generations restart from zero.
    pub fn clear(&mut self) {
        self.marks.clear();
    }

    /// rolls the mutations of generation `consumed + 1` from those of `consumed`.
    ///
    /// Every column decides against the records of `consumed` only; this
    /// generation's new records are merged after all columns are drawn.
    /// Returns how many records were added.
    pub fn spread(
        &mut self,
        cols: usize,
        consumed: u64,
        chances: Chances,
        rng: &mut impl Rng,
    ) -> usize {
        let next = consumed + 1;
        let mut spawned = Vec::new();
        for col in 0..cols {
            let left = wrap(col as i32 - 1, cols);
            let right = wrap(col as i32 + 1, cols);
            let has_mutated_neighbor =
                self.contains(left, consumed) || self.contains(right, consumed);
            let chance = if has_mutated_neighbor {
                chances.adjacent
            } else {
                chances.base
            };
            if rng.gen::<f64>() < chance {
                spawned.push((col, Hue::random(rng)));
            }
        }

        let count = spawned.len();
        for (col, hue) in spawned {
            self.insert(col, next, hue);
        }
        self.prune(next);
        count
    }

    fn prune(&mut self, current: u64) {
        if self.keying == Keying::Generation {
            let rows = self.rows as u64;
            self.marks.retain(|mark, _| mark.at + rows > current);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn hue() -> Hue {
        Hue::new(42.0)
    }

    #[test]
    fn row_slot_keys_alias_across_generations() {
        let mut map = MutationMap::new(Keying::RowSlot, 4);
        map.insert(3, 1, hue());
        assert_eq!(map.get(3, 1), Some(hue()));
        assert_eq!(map.get(3, 5), Some(hue()));
        assert_eq!(map.get(3, 2), None);
        assert_eq!(map.get(2, 1), None);
    }

    #[test]
    fn generation_keys_do_not_alias() {
        let mut map = MutationMap::new(Keying::Generation, 4);
        map.insert(3, 1, hue());
        assert_eq!(map.get(3, 1), Some(hue()));
        assert_eq!(map.get(3, 5), None);
    }

    #[test]
    fn generation_keying_prunes_scrolled_out_records() {
        let mut map = MutationMap::new(Keying::Generation, 4);
        map.insert(0, 0, hue());
        let never = Chances {
            base: 0.0,
            adjacent: 0.0,
        };
        let mut rng = StdRng::seed_from_u64(1);
        for consumed in 0..3 {
            map.spread(8, consumed, never, &mut rng);
            assert!(map.contains(0, 0));
        }
        map.spread(8, 3, never, &mut rng);
        assert!(map.is_empty());
    }

    #[test]
    fn row_slot_keying_keeps_records() {
        let mut map = MutationMap::new(Keying::RowSlot, 4);
        map.insert(0, 0, hue());
        let never = Chances {
            base: 0.0,
            adjacent: 0.0,
        };
        let mut rng = StdRng::seed_from_u64(1);
        for consumed in 0..20 {
            map.spread(8, consumed, never, &mut rng);
        }
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn spread_is_batched_per_generation() {
        let mut map = MutationMap::new(Keying::Generation, 8);
        map.insert(5, 0, hue());
        let only_adjacent = Chances {
            base: 0.0,
            adjacent: 1.0,
        };
        let mut rng = StdRng::seed_from_u64(2);
        let spawned = map.spread(12, 0, only_adjacent, &mut rng);
        assert_eq!(spawned, 2);
        let mutated: Vec<_> = (0..12).filter(|&col| map.contains(col, 1)).collect();
        assert_eq!(mutated, vec![4, 6]);
    }

    #[test]
    fn spread_wraps_neighbors() {
        let mut map = MutationMap::new(Keying::RowSlot, 2);
        map.insert(0, 0, hue());
        let only_adjacent = Chances {
            base: 0.0,
            adjacent: 1.0,
        };
        let mut rng = StdRng::seed_from_u64(3);
        map.spread(6, 0, only_adjacent, &mut rng);
        let mutated: Vec<_> = (0..6).filter(|&col| map.contains(col, 1)).collect();
        assert_eq!(mutated, vec![1, 5]);
    }

    #[test]
    fn base_rate_converges() {
        let cols = 40_000;
        let mut map = MutationMap::new(Keying::Generation, 2);
        let mut rng = StdRng::seed_from_u64(4);
        let spawned = map.spread(cols, 0, Chances::default(), &mut rng);
        let rate = spawned as f64 / cols as f64;
        assert!((rate - 0.01).abs() < 0.003, "base rate {rate}");
    }

    #[test]
    fn adjacent_rate_converges() {
        let cols = 40_000;
        let mut map = MutationMap::new(Keying::Generation, 2);
        for col in (0..cols).step_by(2) {
            map.insert(col, 0, hue());
        }
        let mut rng = StdRng::seed_from_u64(5);
        map.spread(cols, 0, Chances::default(), &mut rng);

        // odd columns sit between two mutated ones, even columns have none
        let odd = (1..cols).step_by(2).filter(|&col| map.contains(col, 1)).count();
        let even = (0..cols).step_by(2).filter(|&col| map.contains(col, 1)).count();
        let half = (cols / 2) as f64;
        let adjacent_rate = odd as f64 / half;
        let base_rate = even as f64 / half;
        assert!((adjacent_rate - 0.2).abs() < 0.02, "adjacent rate {adjacent_rate}");
        assert!((base_rate - 0.01).abs() < 0.005, "base rate {base_rate}");
    }
}
