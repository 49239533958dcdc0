//! Joins unordered slice segments into closed contours.

use thiserror::Error;

use crate::common::{Point, Segment, PointSequence};

/// Endpoints closer than this are considered the same vertex.
pub const EPSILON: f64 = 0.001;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainError {
    #[error("no segments to chain")]
    Empty,
    #[error("contour {contour} is open: nothing continues at ({at}) after {placed} points")]
    Open {
        contour: usize,
        at: Point,
        placed: usize,
    },
}

/// Chains `segments` into closed contours. Segments may come in any order
/// and orientation; each contour is emitted without repeating its first
/// point, so a loop made of `n` segments yields `n` points.
pub fn chain_contours(segments: &[Segment]) -> Result<Vec<PointSequence>, ChainError> {
    if segments.is_empty() {
        return Err(ChainError::Empty);
    }

    let mut remaining = segments.to_vec();
    let mut contours = Vec::new();
    while !remaining.is_empty() {
        let Segment { src: start, dst, } = remaining.remove(0);
        let mut points = vec![start];
        let mut tail = dst;
        while !tail.near(&start, EPSILON) {
            let index = remaining.iter()
                .position(|s| s.src.near(&tail, EPSILON) || s.dst.near(&tail, EPSILON))
                .ok_or(ChainError::Open { contour: contours.len(), at: tail, placed: points.len(), })?;
            let next = remaining.remove(index);
            points.push(tail);
            tail = if next.src.near(&tail, EPSILON) { next.dst } else { next.src };
        }
        debug!("contour {} closed with {} points", contours.len(), points.len());
        contours.push(PointSequence::new(points));
    }
    Ok(contours)
}
