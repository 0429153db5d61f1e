//! Offset-based regions - the core coordinate type.
//!
//! A region is an (anchor, active) pair of character offsets into a linear
//! buffer. A cursor is simply an empty region. The `b` end is the "point"
//! in the Emacs sense; `a` is the anchor (or mark) end. Regions are allowed
//! to be reversed (`a > b`) to preserve direction.

/// An (anchor, active) pair of character offsets. `a` is the anchor end,
/// `b` is the active end (point).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub a: usize,
    pub b: usize,
}

impl Region {
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }

    /// An empty region (a plain cursor) at `pos`.
    pub fn point(pos: usize) -> Self {
        Self { a: pos, b: pos }
    }

    /// The smaller of the two ends.
    pub fn begin(&self) -> usize {
        self.a.min(self.b)
    }

    /// The larger of the two ends.
    pub fn end(&self) -> usize {
        self.a.max(self.b)
    }

    pub fn is_empty(&self) -> bool {
        self.a == self.b
    }

    pub fn size(&self) -> usize {
        self.end() - self.begin()
    }

    /// Whether `pos` falls within the region, ends included.
    pub fn contains(&self, pos: usize) -> bool {
        self.begin() <= pos && pos <= self.end()
    }

    /// The smallest region covering both `self` and `other`, keeping
    /// `self`'s direction.
    pub fn cover(&self, other: &Region) -> Region {
        let begin = self.begin().min(other.begin());
        let end = self.end().max(other.end());
        if self.a <= self.b {
            Region::new(begin, end)
        } else {
            Region::new(end, begin)
        }
    }

    /// Collapse to the active end.
    pub fn to_point(&self) -> Region {
        Region::point(self.b)
    }
}

impl From<usize> for Region {
    fn from(pos: usize) -> Self {
        Region::point(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_end_on_reversed_region() {
        let r = Region::new(10, 4);
        assert_eq!(r.begin(), 4);
        assert_eq!(r.end(), 10);
        assert_eq!(r.size(), 6);
        assert!(!r.is_empty());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let r = Region::new(2, 5);
        assert!(r.contains(2));
        assert!(r.contains(5));
        assert!(!r.contains(6));
    }

    #[test]
    fn test_cover_preserves_direction() {
        let fwd = Region::new(2, 5);
        let rev = Region::new(5, 2);
        let other = Region::new(8, 9);
        assert_eq!(fwd.cover(&other), Region::new(2, 9));
        assert_eq!(rev.cover(&other), Region::new(9, 2));
    }

}
