use mazeroute_core::Point;

/// Orthogonal moves, in the order the converter emits edges: up, left,
/// right, down.
pub const ORTHOGONAL: [Point; 4] = [
    Point::new(0, -1),
    Point::new(-1, 0),
    Point::new(1, 0),
    Point::new(0, 1),
];

/// Diagonal moves, emitted after [`ORTHOGONAL`]: up-left, down-left,
/// up-right, down-right.
pub const DIAGONAL: [Point; 4] = [
    Point::new(-1, -1),
    Point::new(-1, 1),
    Point::new(1, -1),
    Point::new(1, 1),
];

/// Cached neighbor computation helper.
///
/// Enumerates the 4-way or 8-way neighbors of a grid point in a fixed
/// order, filtered by a predicate.
pub struct Neighbors {
    buf: Vec<Point>,
}

impl Default for Neighbors {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbors {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(8),
        }
    }

    /// Orthogonal neighbors of `p` for which `keep` returns `true`.
    pub fn cardinal(&mut self, p: Point, keep: impl Fn(Point) -> bool) -> &[Point] {
        self.collect(p, &ORTHOGONAL, &[], keep)
    }

    /// Orthogonal then diagonal neighbors of `p` for which `keep` returns
    /// `true`.
    pub fn all(&mut self, p: Point, keep: impl Fn(Point) -> bool) -> &[Point] {
        self.collect(p, &ORTHOGONAL, &DIAGONAL, keep)
    }

    fn collect(
        &mut self,
        p: Point,
        first: &[Point],
        then: &[Point],
        keep: impl Fn(Point) -> bool,
    ) -> &[Point] {
        self.buf.clear();
        for &d in first.iter().chain(then) {
            let n = p + d;
            if keep(n) {
                self.buf.push(n);
            }
        }
        &self.buf
    }
}
