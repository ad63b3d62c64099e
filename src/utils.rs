use std::ops::Add;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

#[macro_export]
macro_rules! pos {
    ($x:expr, $y:expr) => {
        Pos { x: $x, y: $y }
    };
}

impl Add for Pos {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        pos!(self.x + rhs.x, self.y + rhs.y)
    }
}

/// wraps an index onto `0..len`, also for negative indices.
pub fn wrap(n: i32, len: usize) -> usize {
    let len = len as i32;
    (((n % len) + len) % len) as usize
}

#[test]
fn test_wrap() {
    assert_eq!(wrap(0, 10), 0);
    assert_eq!(wrap(9, 10), 9);
    assert_eq!(wrap(10, 10), 0);
    assert_eq!(wrap(-1, 10), 9);
    assert_eq!(wrap(-11, 10), 9);
    assert_eq!(wrap(-1, 1), 0);
}

#[test]
fn test_pos_add() {
    assert_eq!(pos!(1, 2) + pos!(-1, 3), pos!(0, 5));
}
