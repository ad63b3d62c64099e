use crate::{errors::Error, pos, utils::wrap, Cell, Pos, Rule};

/// A `cols` x `rows` grid wrapping on both axes.
///
/// The row axis doubles as a ring buffer of generations, see [`crate::State::slot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Torus {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Torus {
    pub fn new(cols: usize, rows: usize) -> Result<Self, Error> {
        // indices are wrapped as i32, see `utils::wrap`
        let size = cols.checked_mul(rows).filter(|&size| size <= i32::MAX as usize);
        let size = match size {
            Some(size) if size > 0 => size,
            _ => return Err(Error::Dimensions(cols, rows)),
        };
        let cells = vec![Cell::inactive(); size];
        Ok(Self { cols, rows, cells })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn index(&self, Pos { x, y }: Pos) -> usize {
        wrap(y, self.rows) * self.cols + wrap(x, self.cols)
    }

    pub fn get(&self, pos: Pos) -> Cell {
        self.cells[self.index(pos)]
    }

    pub fn set(&mut self, pos: Pos, cell: Cell) {
        let index = self.index(pos);
        self.cells[index] = cell;
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        let start = (row % self.rows) * self.cols;
        &self.cells[start..start + self.cols]
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::inactive());
    }

    pub fn actives(&self) -> Vec<Pos> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_active())
            .map(|(index, _)| pos!((index % self.cols) as i32, (index / self.cols) as i32))
            .collect()
    }

    /// writes `rule` applied to row `from` into row `to`.
    ///
    /// The source row is copied first, so `from == to` reads no partial update.
    pub fn evolve(&mut self, from: usize, to: usize, rule: &Rule) {
        let source = self.row(from).to_vec();
        for i in 0..self.cols as i32 {
            let left = source[wrap(i - 1, self.cols)];
            let me = source[i as usize];
            let right = source[wrap(i + 1, self.cols)];
            self.set(pos!(i, to as i32), rule.apply(left, me, right));
        }
    }
}
