use nalgebra::Vector3;
use rand::Rng;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Waypoint set: fixed, ordered list of world positions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaypointSet {
    points: Vec<Vector3<f64>>,
}

impl WaypointSet {
    pub fn new(points: Vec<Vector3<f64>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<Vector3<f64>> {
        self.points.get(idx).copied()
    }

    pub fn first(&self) -> Option<Vector3<f64>> {
        self.points.first().copied()
    }

    /// Index of the final waypoint, if any.
    pub fn last_index(&self) -> Option<usize> {
        self.points.len().checked_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vector3<f64>> {
        self.points.iter()
    }
}

impl From<Vec<Vector3<f64>>> for WaypointSet {
    fn from(points: Vec<Vector3<f64>>) -> Self {
        Self::new(points)
    }
}

// ---------------------------------------------------------------------------
// Navigation cursor
// ---------------------------------------------------------------------------

/// How the cursor picks the next waypoint after an arrival.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Traversal {
    #[default]
    Sequential,
    Random,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationCursor {
    index: usize,
}

impl NavigationCursor {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Move to the next waypoint. Returns the new index, or `None` when
    /// there is nothing to advance over.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        len: usize,
        traversal: Traversal,
        rng: &mut R,
    ) -> Option<usize> {
        if len == 0 {
            return None;
        }
        self.index = match traversal {
            Traversal::Sequential => (self.index + 1) % len,
            Traversal::Random => rng.random_range(0..len),
        };
        Some(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sequential_wraps() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut c = NavigationCursor::default();
        let seq: Vec<usize> = (0..4)
            .map(|_| c.advance(3, Traversal::Sequential, &mut rng).unwrap())
            .collect();
        assert_eq!(seq, vec![1, 2, 0, 1]);
    }

    #[test]
    fn random_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut c = NavigationCursor::default();
        for _ in 0..200 {
            let i = c.advance(5, Traversal::Random, &mut rng).unwrap();
            assert!(i < 5);
        }
    }

    #[test]
    fn empty_set_does_not_advance() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut c = NavigationCursor::default();
        assert_eq!(c.advance(0, Traversal::Sequential, &mut rng), None);
        assert_eq!(c.index(), 0);
        assert_eq!(WaypointSet::default().last_index(), None);
    }
}
