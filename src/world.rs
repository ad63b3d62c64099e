#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    active: bool,
}

impl Cell {
    pub fn active() -> Self {
        Self { active: true }
    }

    pub fn inactive() -> Self {
        Self { active: false }
    }

    /// reads a cell from its `0`/`1` encoding.
    pub fn from_bit(bit: u8) -> Option<Self> {
        match bit {
            0 => Some(Self::inactive()),
            1 => Some(Self::active()),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn bit(&self) -> u8 {
        self.active as u8
    }
}

impl From<bool> for Cell {
    fn from(active: bool) -> Self {
        Self { active }
    }
}

/// packs a (left, self, right) neighborhood into its 3-bit code.
pub fn neighborhood(left: Cell, me: Cell, right: Cell) -> usize {
    (left.bit() as usize) << 2 | (me.bit() as usize) << 1 | right.bit() as usize
}

pub use torus::Torus;
mod torus;

#[test]
fn test_neighborhood() {
    let (off, on) = (Cell::inactive(), Cell::active());
    assert_eq!(neighborhood(off, off, off), 0);
    assert_eq!(neighborhood(off, off, on), 1);
    assert_eq!(neighborhood(off, on, off), 2);
    assert_eq!(neighborhood(on, off, off), 4);
    assert_eq!(neighborhood(on, on, on), 7);
}

#[test]
fn test_cell_from_bit() {
    assert_eq!(Cell::from_bit(0), Some(Cell::inactive()));
    assert_eq!(Cell::from_bit(1), Some(Cell::active()));
    assert_eq!(Cell::from_bit(2), None);
}
