//! Freehand line stabilization and path smoothing.
//!
//! [`LineStabilizer`] smooths a pointer stream online: raw samples closer than
//! a minimum distance to the last output are dropped, the rest go into a
//! bounded window and each accepted sample emits the exponentially weighted
//! average of the window (weight `2^i`, newest heaviest). [`simplify`] and
//! [`catmull_rom`] are stateless post-processing helpers for captured paths.

use kurbo::{Point, Vec2};
use std::collections::VecDeque;

/// Largest smoothing window, reached at strength 100.
pub const MAX_WINDOW_SIZE: usize = 12;

/// Number of buffered points averaged for a given strength (0–100).
pub fn window_size(strength: f64) -> usize {
    let strength = strength.clamp(0.0, 100.0);
    (1.0 + (strength / 100.0) * (MAX_WINDOW_SIZE - 1) as f64).round() as usize
}

/// Minimum distance (percentage units) from the last output for a sample to count.
pub fn min_distance(strength: f64) -> f64 {
    let strength = strength.clamp(0.0, 100.0);
    0.2 + (strength / 100.0) * 0.8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StrokeState {
    Idle,
    Collecting,
}

/// Online smoother for a single freehand stroke.
#[derive(Debug, Clone)]
pub struct LineStabilizer {
    strength: f64,
    window_size: usize,
    min_distance: f64,
    buffer: VecDeque<Point>,
    output: Vec<Point>,
    state: StrokeState,
}

impl LineStabilizer {
    /// Create a stabilizer. `strength` is clamped to 0–100.
    pub fn new(strength: f64) -> Self {
        let strength = strength.clamp(0.0, 100.0);
        let window_size = window_size(strength);
        Self {
            strength,
            window_size,
            min_distance: min_distance(strength),
            buffer: VecDeque::with_capacity(window_size + 1),
            output: Vec::new(),
            state: StrokeState::Idle,
        }
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    /// Whether a stroke is in progress.
    pub fn is_collecting(&self) -> bool {
        self.state == StrokeState::Collecting
    }

    /// The smoothed points emitted so far.
    pub fn points(&self) -> &[Point] {
        &self.output
    }

    /// Begin a stroke at `point`, discarding any previous state.
    pub fn start_stroke(&mut self, point: Point) {
        self.buffer.clear();
        self.buffer.push_back(point);
        self.output.clear();
        self.output.push(point);
        self.state = StrokeState::Collecting;
    }

    /// Feed a raw sample. Returns the point appended to the output, if any.
    pub fn add_point(&mut self, point: Point) -> Option<Point> {
        if self.state != StrokeState::Collecting {
            self.start_stroke(point);
            return Some(point);
        }
        if self.strength == 0.0 {
            self.output.push(point);
            return Some(point);
        }
        if let Some(last) = self.output.last() {
            if (point - *last).hypot() < self.min_distance {
                return None;
            }
        }
        self.buffer.push_back(point);
        while self.buffer.len() > self.window_size {
            self.buffer.pop_front();
        }
        let smoothed = weighted_average(&self.buffer)?;
        self.output.push(smoothed);
        Some(smoothed)
    }

    /// Finish the stroke, draining the window so the end tapers into the
    /// last raw sample. Returns the complete smoothed stroke.
    pub fn end_stroke(&mut self) -> &[Point] {
        while self.buffer.len() > 1 {
            self.buffer.pop_front();
            let threshold = if self.buffer.len() == 1 {
                self.min_distance / 4.0
            } else {
                self.min_distance / 2.0
            };
            let Some(smoothed) = weighted_average(&self.buffer) else {
                break;
            };
            let far_enough = self
                .output
                .last()
                .is_none_or(|last| (smoothed - *last).hypot() >= threshold);
            if far_enough {
                self.output.push(smoothed);
            }
        }
        self.buffer.clear();
        self.state = StrokeState::Idle;
        &self.output
    }
}

/// Weighted mean of the buffer with weight `2^i` for the i-th oldest point.
fn weighted_average(points: &VecDeque<Point>) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let mut sum = Vec2::ZERO;
    let mut total = 0.0;
    let mut weight = 1.0;
    for p in points {
        sum += p.to_vec2() * weight;
        total += weight;
        weight *= 2.0;
    }
    Some((sum / total).to_point())
}

/// Ramer-Douglas-Peucker simplification.
pub fn simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let first = points[0];
    let last = points[points.len() - 1];

    let mut max_dist = 0.0;
    let mut max_index = 0;
    for (i, point) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let dist = perpendicular_distance(*point, first, last);
        if dist > max_dist {
            max_dist = dist;
            max_index = i;
        }
    }

    if max_dist > tolerance {
        let mut left = simplify(&points[..=max_index], tolerance);
        let right = simplify(&points[max_index..], tolerance);
        // The split point ends `left` and starts `right`.
        left.pop();
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

/// Perpendicular distance from `point` to the infinite line through the chord.
fn perpendicular_distance(point: Point, line_start: Point, line_end: Point) -> f64 {
    let chord = line_end - line_start;
    let offset = point - line_start;
    let len = chord.hypot();
    if len < f64::EPSILON {
        return offset.hypot();
    }
    chord.cross(offset).abs() / len
}

/// Catmull-Rom interpolation: `segments` points per span between each pair of
/// inner control points. Sequences shorter than four points are returned as-is.
pub fn catmull_rom(points: &[Point], segments: usize) -> Vec<Point> {
    if points.len() < 4 || segments == 0 {
        return points.to_vec();
    }
    let mut out = Vec::with_capacity((points.len() - 3) * segments + 3);
    out.push(points[0]);
    for w in points.windows(4) {
        for step in 0..segments {
            let t = step as f64 / segments as f64;
            out.push(catmull_rom_point(w[0], w[1], w[2], w[3], t));
        }
    }
    out.push(points[points.len() - 2]);
    out.push(points[points.len() - 1]);
    out
}

fn catmull_rom_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let t2 = t * t;
    let t3 = t2 * t;
    let blend = |a: f64, b: f64, c: f64, d: f64| {
        0.5 * ((2.0 * b)
            + (-a + c) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (-a + 3.0 * b - 3.0 * c + d) * t3)
    };
    Point::new(
        blend(p0.x, p1.x, p2.x, p3.x),
        blend(p0.y, p1.y, p2.y, p3.y),
    )
}
