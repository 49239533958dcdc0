use thiserror::Error;

use crate::common::Point;

/// Padding applied on every side of a plot's data range.
pub const MARGIN: f64 = 5.;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("cannot compute bounds of an empty point set")]
pub struct EmptyInputError;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BoundingBox {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl BoundingBox {
    /// Tight box around `points`.
    pub fn of<'a, I>(points: I) -> Result<BoundingBox, EmptyInputError> where I: IntoIterator<Item = &'a Point> {
        let mut points = points.into_iter();
        let first = points.next().ok_or(EmptyInputError)?;
        let init = BoundingBox { x_min: first.x, x_max: first.x, y_min: first.y, y_max: first.y, };
        Ok(points.fold(init, |bbox, p| BoundingBox {
            x_min: bbox.x_min.min(p.x),
            x_max: bbox.x_max.max(p.x),
            y_min: bbox.y_min.min(p.y),
            y_max: bbox.y_max.max(p.y),
        }))
    }

    /// Box around `points` padded by [`MARGIN`].
    pub fn around<'a, I>(points: I) -> Result<BoundingBox, EmptyInputError> where I: IntoIterator<Item = &'a Point> {
        BoundingBox::of(points).map(|bbox| bbox.padded(MARGIN))
    }

    pub fn padded(&self, margin: f64) -> BoundingBox {
        BoundingBox {
            x_min: self.x_min - margin,
            x_max: self.x_max + margin,
            y_min: self.y_min - margin,
            y_max: self.y_max + margin,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    #[cfg(test)]
    pub fn contains(&self, point: &Point) -> bool {
        self.x_min <= point.x && point.x <= self.x_max && self.y_min <= point.y && point.y <= self.y_max
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point { x, y, }
    }

    #[test]
    fn empty_input_fails() {
        assert_eq!(BoundingBox::of(&[]), Err(EmptyInputError));
        assert_eq!(BoundingBox::around(Vec::<Point>::new().iter()), Err(EmptyInputError));
    }

    #[test]
    fn single_point_is_degenerate() {
        let bbox = BoundingBox::of(&[pt(3., -4.)]).unwrap();
        assert_eq!(bbox, BoundingBox { x_min: 3., x_max: 3., y_min: -4., y_max: -4., });
        assert_eq!(bbox.width(), 0.);
    }

    #[test]
    fn margin_is_applied_on_every_side() {
        let bbox = BoundingBox::around(&[pt(92.5, 92.5), pt(142.5, 142.5), pt(100., 120.)]).unwrap();
        assert_eq!(bbox, BoundingBox { x_min: 87.5, x_max: 147.5, y_min: 87.5, y_max: 147.5, });
        assert_eq!(bbox.width(), 60.);
        assert_eq!(bbox.height(), 60.);
    }

    #[test]
    fn random_points_are_contained() {
        let mut rng = rand::thread_rng();
        for _ in 0 .. 64 {
            let points: Vec<_> = (0 .. rng.gen_range(1 .. 50))
                .map(|_| pt(rng.gen_range(-500.0 .. 500.0), rng.gen_range(-500.0 .. 500.0)))
                .collect();
            let tight = BoundingBox::of(&points).unwrap();
            let padded = BoundingBox::around(&points).unwrap();
            for p in &points {
                assert!(tight.contains(p));
                assert!(padded.contains(p));
            }
            assert!(points.iter().any(|p| p.x == tight.x_min));
            assert!(points.iter().any(|p| p.y == tight.y_max));
        }
    }
}
