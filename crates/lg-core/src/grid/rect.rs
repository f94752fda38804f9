//! Grid positions and rectangles
//!
//! Rectangles are half-open: a rect covers `x..x + width` by `y..y + height`.

use serde::{Deserialize, Serialize};

/// A cell coordinate. `y` grows upward; row 0 is the bottom of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell directly below
    pub const fn below(&self) -> Self {
        Self::new(self.x, self.y - 1)
    }

    /// The cell directly above
    pub const fn above(&self) -> Self {
        Self::new(self.x, self.y + 1)
    }

    pub const fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan(&self, other: GridPos) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Chebyshev (king-move) distance
    pub fn chebyshev(&self, other: GridPos) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn distance(&self, other: GridPos) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn distance_sq(&self, other: GridPos) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    /// The four orthogonal neighbours (left, right, down, up)
    pub fn neighbors4(&self) -> [GridPos; 4] {
        [
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(0, 1),
        ]
    }
}

/// An axis-aligned rectangle of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridRect {
    /// Left x coordinate
    pub x: i32,
    /// Bottom y coordinate
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl GridRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rect containing both corners (inclusive)
    pub fn from_corners(a: GridPos, b: GridPos) -> Self {
        let lx = a.x.min(b.x);
        let ly = a.y.min(b.y);
        let hx = a.x.max(b.x);
        let hy = a.y.max(b.y);
        Self::new(lx, ly, hx - lx + 1, hy - ly + 1)
    }

    /// One past the rightmost column
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// One past the topmost row
    pub const fn top(&self) -> i32 {
        self.y + self.height
    }

    pub const fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Check if the rectangle has positive area
    pub const fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn center(&self) -> GridPos {
        GridPos::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn contains(&self, p: GridPos) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.top()
    }

    /// Check if this rectangle contains another
    pub fn contains_rect(&self, other: &GridRect) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && self.right() >= other.right()
            && self.top() >= other.top()
    }

    /// Check if this rectangle intersects another
    pub fn intersects(&self, other: &GridRect) -> bool {
        self.is_valid()
            && other.is_valid()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.top()
            && other.y < self.top()
    }

    /// Calculate the intersection of two rectangles
    pub fn intersection(&self, other: &GridRect) -> Option<GridRect> {
        if !self.intersects(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Some(GridRect::new(
            x,
            y,
            self.right().min(other.right()) - x,
            self.top().min(other.top()) - y,
        ))
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &GridRect) -> GridRect {
        if !self.is_valid() {
            return *other;
        }
        if !other.is_valid() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        GridRect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.top().max(other.top()) - y,
        )
    }

    /// Shrink by `margin` on every side (may become invalid)
    pub fn inset(&self, margin: i32) -> GridRect {
        GridRect::new(
            self.x + margin,
            self.y + margin,
            self.width - 2 * margin,
            self.height - 2 * margin,
        )
    }

    pub fn translate(&self, dx: i32, dy: i32) -> GridRect {
        GridRect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// The cell of this rectangle closest to `p`
    pub fn clamp_point(&self, p: GridPos) -> GridPos {
        GridPos::new(
            p.x.clamp(self.x, self.right() - 1),
            p.y.clamp(self.y, self.top() - 1),
        )
    }

    /// All cells, row by row from the bottom
    pub fn cells(&self) -> impl Iterator<Item = GridPos> + '_ {
        (self.y..self.top()).flat_map(move |y| (self.x..self.right()).map(move |x| GridPos::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_dimensions() {
        let r = GridRect::new(10, 20, 6, 4);
        assert_eq!(r.right(), 16);
        assert_eq!(r.top(), 24);
        assert_eq!(r.area(), 24);
        assert_eq!(r.center(), GridPos::new(13, 22));
    }

    #[test]
    fn test_rect_contains() {
        let outer = GridRect::new(0, 0, 20, 20);
        let inner = GridRect::new(5, 5, 5, 5);
        let outside = GridRect::new(25, 25, 5, 5);

        assert!(outer.contains_rect(&inner));
        assert!(!inner.contains_rect(&outer));
        assert!(!outer.contains_rect(&outside));
        assert!(outer.contains(GridPos::new(19, 19)));
        assert!(!outer.contains(GridPos::new(20, 0)));
    }

    #[test]
    fn test_rect_intersection() {
        let r1 = GridRect::new(0, 0, 10, 10);
        let r2 = GridRect::new(5, 5, 10, 10);
        let r3 = GridRect::new(10, 0, 5, 5);

        assert_eq!(r1.intersection(&r2), Some(GridRect::new(5, 5, 5, 5)));
        // Touching edges do not intersect (half-open)
        assert!(!r1.intersects(&r3));
        assert_eq!(r1.intersection(&r3), None);
    }

    #[test]
    fn test_rect_union_and_corners() {
        let a = GridRect::new(0, 0, 2, 2);
        let b = GridRect::new(5, -3, 1, 1);
        assert_eq!(a.union(&b), GridRect::new(0, -3, 6, 5));
        assert_eq!(
            GridRect::from_corners(GridPos::new(4, 1), GridPos::new(1, 3)),
            GridRect::new(1, 1, 4, 3)
        );
    }

    #[test]
    fn test_clamp_point() {
        let r = GridRect::new(10, 10, 5, 5);
        assert_eq!(r.clamp_point(GridPos::new(0, 12)), GridPos::new(10, 12));
        assert_eq!(r.clamp_point(GridPos::new(40, 40)), GridPos::new(14, 14));
        assert_eq!(r.clamp_point(GridPos::new(12, 12)), GridPos::new(12, 12));
    }

    #[test]
    fn test_cells_count() {
        let r = GridRect::new(-2, 3, 4, 3);
        assert_eq!(r.cells().count(), 12);
        assert!(r.cells().all(|p| r.contains(p)));
    }
}
