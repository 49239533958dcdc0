use std::fmt;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn near(&self, other: &Point, epsilon: f64) -> bool {
        self.distance(other) < epsilon
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Segment {
    pub src: Point,
    pub dst: Point,
}

impl Segment {
    pub fn points(&self) -> [Point; 2] {
        [self.src, self.dst]
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.src, self.dst)
    }
}

/// Polyline or contour; drawing order follows `points`.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct PointSequence {
    pub points: Vec<Point>,
}

impl PointSequence {
    pub fn new(points: Vec<Point>) -> PointSequence {
        PointSequence { points, }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns a copy ending at its first point. Sequences shorter than two
    /// points, or already closed, come back unchanged.
    pub fn closed(&self) -> PointSequence {
        let mut points = self.points.clone();
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 1 && first != last =>
                points.push(*first),
            _ =>
                (),
        }
        PointSequence { points, }
    }
}

impl fmt::Display for PointSequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "({})", point)?;
        }
        Ok(())
    }
}
