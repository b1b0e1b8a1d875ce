//! Shift-key constraints applied while drawing.

use kurbo::Point;

/// Angle snap increment in degrees for lines and arrows.
pub const ANGLE_SNAP_INCREMENT: f64 = 45.0;

/// Snap an angle to the nearest increment, normalized to 0–360.
pub fn snap_angle(angle_degrees: f64, increment: f64) -> f64 {
    let snapped = (angle_degrees / increment).round() * increment;
    snapped.rem_euclid(360.0)
}

/// Snap a line endpoint to the nearest 45° from `start`, keeping its length.
pub fn snap_line_endpoint(start: Point, end: Point) -> Point {
    let delta = end - start;
    let distance = delta.hypot();
    if distance < 0.001 {
        return end;
    }
    let angle = delta.y.atan2(delta.x).to_degrees();
    let snapped = snap_angle(angle, ANGLE_SNAP_INCREMENT).to_radians();
    Point::new(
        start.x + distance * snapped.cos(),
        start.y + distance * snapped.sin(),
    )
}

/// Like [`snap_line_endpoint`], but shortens the line where the snapped ray
/// leaves percentage space so the angle survives. `start` must be on canvas.
pub fn snap_line_endpoint_in_canvas(start: Point, end: Point) -> Point {
    let snapped = snap_line_endpoint(start, end);
    let delta = snapped - start;
    let distance = delta.hypot();
    if distance < 0.001 {
        return clamp_to_canvas(snapped);
    }
    let dir = delta / distance;
    let limit = |from: f64, d: f64| {
        if d > 1e-12 {
            (100.0 - from) / d
        } else if d < -1e-12 {
            from / -d
        } else {
            f64::INFINITY
        }
    };
    let reach = distance
        .min(limit(start.x, dir.x))
        .min(limit(start.y, dir.y))
        .max(0.0);
    start + dir * reach
}

/// Constrain the box from `start` to `current` to a square, growing toward
/// the drag direction on each axis.
pub fn constrain_square(start: Point, current: Point) -> Point {
    let dx = current.x - start.x;
    let dy = current.y - start.y;
    let side = dx.abs().max(dy.abs());
    Point::new(
        start.x + side.copysign(dx),
        start.y + side.copysign(dy),
    )
}

/// Clamp a point into percentage space.
pub fn clamp_to_canvas(point: Point) -> Point {
    Point::new(point.x.clamp(0.0, 100.0), point.y.clamp(0.0, 100.0))
}
