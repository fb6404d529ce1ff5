//! Geometry Provider
//!
//! Resolves template-relative port positions into canvas coordinates,
//! derives the outward normal a wire should leave a port along, and builds
//! the axis-aligned rectangles the router treats as obstacles.
//!
//! Nothing here fails: an unknown port resolves to the instance origin and a
//! right-facing normal, so interactive dragging never has to handle errors.

use serde::{Deserialize, Serialize};

use crate::model::{DeviceInstance, DeviceTemplate, ExitDirection, InstanceSet, TemplateLibrary};

/// Coordinates closer than this are treated as equal
pub const EPSILON: f64 = 1e-6;

/// A point in canvas space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, direction: Vector, distance: f64) -> Point {
        Point::new(self.x + direction.x * distance, self.y + direction.y * distance)
    }

    pub fn manhattan_distance(self, other: Point) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn distance_to(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn approx_eq(self, other: Point) -> bool {
        (self.x - other.x).abs() < EPSILON && (self.y - other.y).abs() < EPSILON
    }
}

/// A 2D direction
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const UP: Vector = Vector::new(0.0, -1.0);
    pub const DOWN: Vector = Vector::new(0.0, 1.0);
    pub const LEFT: Vector = Vector::new(-1.0, 0.0);
    pub const RIGHT: Vector = Vector::new(1.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn between(from: Point, to: Point) -> Vector {
        Vector::new(to.x - from.x, to.y - from.y)
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn is_zero(self) -> bool {
        self.x.abs() < EPSILON && self.y.abs() < EPSILON
    }

    pub fn dot(self, other: Vector) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn cross(self, other: Vector) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn normalized(self) -> Vector {
        let len = self.length();
        if len < EPSILON {
            Vector::default()
        } else {
            Vector::new(self.x / len, self.y / len)
        }
    }

    /// Snap to the closest of the four axis directions.
    /// Horizontal wins a diagonal tie; a zero vector stays zero.
    pub fn snapped_to_axis(self) -> Vector {
        if self.is_zero() {
            return Vector::default();
        }
        if self.x.abs() >= self.y.abs() {
            Vector::new(self.x.signum(), 0.0)
        } else {
            Vector::new(0.0, self.y.signum())
        }
    }
}

impl From<ExitDirection> for Vector {
    fn from(direction: ExitDirection) -> Self {
        match direction {
            ExitDirection::Top => Vector::UP,
            ExitDirection::Bottom => Vector::DOWN,
            ExitDirection::Left => Vector::LEFT,
            ExitDirection::Right => Vector::RIGHT,
        }
    }
}

/// Axis-aligned rectangle; `x`/`y` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn inflate(&self, margin: f64) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// True if `p` lies strictly inside (edges excluded)
    pub fn contains_strict(&self, p: Point) -> bool {
        p.x > self.left() + EPSILON
            && p.x < self.right() - EPSILON
            && p.y > self.top() + EPSILON
            && p.y < self.bottom() - EPSILON
    }

    /// True if the axis-aligned segment `a`-`b` enters the interior.
    /// Running along an edge does not count.
    pub fn blocks_segment(&self, a: Point, b: Point) -> bool {
        if (a.y - b.y).abs() < EPSILON {
            let (lo, hi) = if a.x <= b.x { (a.x, b.x) } else { (b.x, a.x) };
            a.y > self.top() + EPSILON
                && a.y < self.bottom() - EPSILON
                && hi > self.left() + EPSILON
                && lo < self.right() - EPSILON
        } else if (a.x - b.x).abs() < EPSILON {
            let (lo, hi) = if a.y <= b.y { (a.y, b.y) } else { (b.y, a.y) };
            a.x > self.left() + EPSILON
                && a.x < self.right() - EPSILON
                && hi > self.top() + EPSILON
                && lo < self.bottom() - EPSILON
        } else {
            // Not axis-aligned: test the two L-shaped legs conservatively
            let corner = Point::new(b.x, a.y);
            self.blocks_segment(a, corner) || self.blocks_segment(corner, b)
        }
    }
}

/// Width and height an instance is drawn with
fn effective_size(instance: &DeviceInstance, template: Option<&DeviceTemplate>) -> (f64, f64) {
    let nominal_w = template.map(|t| t.width).unwrap_or(0.0);
    let nominal_h = template.map(|t| t.height).unwrap_or(0.0);
    (
        instance.width.unwrap_or(nominal_w),
        instance.height.unwrap_or(nominal_h),
    )
}

/// Absolute canvas position of a port.
///
/// The port's percentage position is scaled by the instance's effective size
/// (override, else template nominal). An unknown port id yields the instance
/// origin.
pub fn port_position(instance: &DeviceInstance, template: &DeviceTemplate, port_id: &str) -> Point {
    let Some(port) = template.port(port_id) else {
        return instance.position;
    };

    let (width, height) = effective_size(instance, Some(template));
    Point::new(
        instance.position.x + port.position.x / 100.0 * width,
        instance.position.y + port.position.y / 100.0 * height,
    )
}

/// Unit vector pointing away from the device body at a port.
///
/// Uses the port's exit direction when set, otherwise the edge of the
/// template bounds its percentage position is closest to (ties resolve
/// left, right, top, bottom). An unknown port id yields `Vector::RIGHT`.
pub fn port_normal(_instance: &DeviceInstance, template: &DeviceTemplate, port_id: &str) -> Vector {
    let Some(port) = template.port(port_id) else {
        return Vector::RIGHT;
    };

    if let Some(direction) = port.exit_direction {
        return direction.into();
    }

    let px = port.position.x;
    let py = port.position.y;
    let candidates = [
        (px, Vector::LEFT),
        (100.0 - px, Vector::RIGHT),
        (py, Vector::UP),
        (100.0 - py, Vector::DOWN),
    ];

    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.0 < best.0 {
            best = *candidate;
        }
    }
    best.1
}

/// Bounding box of an instance in canvas units. Rotation is not applied.
pub fn instance_rect(instance: &DeviceInstance, templates: &TemplateLibrary) -> Rect {
    let (width, height) = effective_size(instance, templates.template_for(instance));
    Rect::new(instance.position.x, instance.position.y, width, height)
}

/// Obstacle rectangles for one routing call, skipping the listed instances
/// and anything with no area.
pub fn obstacles_for(instances: &InstanceSet, templates: &TemplateLibrary, exclude: &[&str]) -> Vec<Rect> {
    instances
        .iter()
        .filter(|instance| !exclude.contains(&instance.id.as_str()))
        .map(|instance| instance_rect(instance, templates))
        .filter(|rect| rect.width > EPSILON && rect.height > EPSILON)
        .collect()
}
