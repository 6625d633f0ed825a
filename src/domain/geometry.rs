// Plain 2D geometry used by the motion and scoring systems.
// Screen coordinates: +x to the right, +y downwards.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Axis-aligned box; `min` is the upper left corner, `max` the lower right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

/// Horizontal chord of a circle on a single scan line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanBounds {
    pub x_min: f64,
    pub x_max: f64,
}

impl ScanBounds {
    pub fn len(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn intersects(&self, other: &ScanBounds) -> bool {
        self.x_min < other.x_max && self.x_max > other.x_min
    }

    /// Clip `self` to the extent of `outer`.
    pub fn clipped_to(&self, outer: &ScanBounds) -> ScanBounds {
        ScanBounds {
            x_min: self.x_min.max(outer.x_min),
            x_max: self.x_max.min(outer.x_max),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub r: f64,
}

impl Circle {
    pub const fn new(center: Point, r: f64) -> Self {
        Self { center, r }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            min: Point::new(self.center.x - self.r, self.center.y - self.r),
            max: Point::new(self.center.x + self.r, self.center.y + self.r),
        }
    }

    /// True when the horizontal line at `y` touches the circle's vertical span.
    pub fn spans_y(&self, y: f64) -> bool {
        self.center.y - self.r <= y && self.center.y + self.r >= y
    }

    /// Chord of the circle on the horizontal line at `y`.
    ///
    /// Returns `None` when the line misses the circle (the value under the
    /// square root is negative).
    pub fn scan_line_bounds(&self, y: f64) -> Option<ScanBounds> {
        let dy = y - self.center.y;
        let under_root = self.r * self.r - dy * dy;
        if under_root.is_nan() || under_root < 0.0 {
            return None;
        }
        let half = under_root.sqrt();
        Some(ScanBounds {
            x_min: self.center.x - half,
            x_max: self.center.x + half,
        })
    }
}
