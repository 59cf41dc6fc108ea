//! Point set owned by a regression session

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a point, never reused within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointId(pub u64);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self {
            id: PointId(id),
            x,
            y,
        }
    }
}

/// Ordered set of points with an id allocator
///
/// The allocator only moves forward, so ids stay unique even after a snapshot
/// restore brings back older points.
#[derive(Debug, Clone, Default)]
pub struct PointSet {
    points: Vec<Point>,
    next_id: u64,
}

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, id: PointId) -> Option<&Point> {
        self.points.iter().find(|p| p.id == id)
    }

    fn allocate(&mut self) -> PointId {
        self.next_id += 1;
        PointId(self.next_id)
    }

    /// Append a point; non-finite coordinates are rejected
    pub fn add(&mut self, x: f64, y: f64) -> Option<PointId> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let id = self.allocate();
        self.points.push(Point { id, x, y });
        Some(id)
    }

    /// Append many points, returning how many were accepted
    pub fn extend<I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        pairs
            .into_iter()
            .filter_map(|(x, y)| self.add(x, y))
            .count()
    }

    /// Edit a point in place; unknown ids are ignored
    pub fn update(&mut self, id: PointId, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        match self.points.iter_mut().find(|p| p.id == id) {
            Some(point) => {
                point.x = x;
                point.y = y;
                true
            }
            None => false,
        }
    }

    /// Remove a point; unknown ids are ignored
    pub fn delete(&mut self, id: PointId) -> bool {
        let before = self.points.len();
        self.points.retain(|p| p.id != id);
        self.points.len() != before
    }

    /// Replace every point with fresh ones
    pub fn replace_all<I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        self.points.clear();
        self.extend(pairs)
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Point list for a history snapshot
    pub fn snapshot(&self) -> Vec<Point> {
        self.points.clone()
    }

    /// Restore a snapshot without rewinding the id allocator
    pub fn restore(&mut self, points: &[Point]) {
        self.points = points.to_vec();
        let highest = self.points.iter().map(|p| p.id.0).max().unwrap_or(0);
        self.next_id = self.next_id.max(highest);
    }
}
