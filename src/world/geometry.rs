use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

pub const TAU: f64 = PI * 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn from_angle(angle: f64) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: Vec2) -> f64 {
        (other - *self).length()
    }

    /// Unit vector, or `None` for a zero-length vector.
    pub fn normalized(&self) -> Option<Vec2> {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Some(Vec2::new(self.x / len, self.y / len))
        } else {
            None
        }
    }

    /// Rotated a quarter turn counter-clockwise.
    pub fn perpendicular(&self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Rescale to `max` when longer than `max`.
    pub fn clamp_length(&self, max: f64) -> Vec2 {
        let len = self.length();
        if len > max && len > 0.0 {
            *self * (max / len)
        } else {
            *self
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Wrap an angle difference into [-PI, PI].
pub fn wrap_angle(mut angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    while angle > PI {
        angle -= TAU;
    }
    while angle < -PI {
        angle += TAU;
    }
    angle
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
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

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    pub fn nearest_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.left(), self.right()),
            point.y.clamp(self.top(), self.bottom()),
        )
    }

    /// True when the segment `from -> to` touches any edge of the rectangle.
    ///
    /// A segment lying entirely inside the rectangle does not cross an edge and
    /// reports false, matching the edge-crossing test used for line of sight.
    pub fn intersects_segment(&self, from: Vec2, to: Vec2) -> bool {
        let (left, right, top, bottom) = (self.left(), self.right(), self.top(), self.bottom());

        if (from.x < left && to.x < left)
            || (from.x > right && to.x > right)
            || (from.y < top && to.y < top)
            || (from.y > bottom && to.y > bottom)
        {
            return false;
        }

        let dx = to.x - from.x;
        let dy = to.y - from.y;

        if dx != 0.0 {
            for edge_x in [left, right] {
                let t = (edge_x - from.x) / dx;
                if (0.0..=1.0).contains(&t) {
                    let y = from.y + t * dy;
                    if y >= top && y <= bottom {
                        return true;
                    }
                }
            }
        }

        if dy != 0.0 {
            for edge_y in [top, bottom] {
                let t = (edge_y - from.y) / dy;
                if (0.0..=1.0).contains(&t) {
                    let x = from.x + t * dx;
                    if x >= left && x <= right {
                        return true;
                    }
                }
            }
        }

        false
    }
}
