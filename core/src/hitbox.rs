//! Collision geometry shared by every simulated entity.
//!
//! Shapes come in exactly two flavours, axis-aligned boxes and circles. A
//! [`HitboxShape`] is the position-free descriptor an entity carries around;
//! [`HitboxShape::at`] places it in the world and yields a [`Hitbox`] that the
//! collision passes query.
//!
//! Shape-versus-shape overlap is strict: hitboxes that merely touch do not
//! overlap, so a mover snapped flush against an obstacle is not detected again
//! on the next axis pass. Point containment on circles is inclusive.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a hitbox shape cannot be constructed.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum GeometryError {
    /// Circle radius was zero, negative or not a finite number.
    #[error("circle radius must be positive and finite, got {radius}")]
    InvalidRadius {
        /// Offending radius.
        radius: f32,
    },
    /// Box width or height was zero, negative or not a finite number.
    #[error("box extents must be positive and finite, got {width}x{height}")]
    InvalidExtent {
        /// Offending width.
        width: f32,
        /// Offending height.
        height: f32,
    },
}

/// Position-free collision shape attached to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ShapeRepr", into = "ShapeRepr")]
pub struct HitboxShape(ShapeKind);

#[derive(Clone, Copy, Debug, PartialEq)]
enum ShapeKind {
    Rect { width: f32, height: f32 },
    Circle { radius: f32 },
}

impl HitboxShape {
    /// Creates an axis-aligned box shape.
    pub fn rect(width: f32, height: f32) -> Result<Self, GeometryError> {
        if valid_extent(width) && valid_extent(height) {
            Ok(Self(ShapeKind::Rect { width, height }))
        } else {
            Err(GeometryError::InvalidExtent { width, height })
        }
    }

    /// Creates a circular shape.
    pub fn circle(radius: f32) -> Result<Self, GeometryError> {
        if valid_extent(radius) {
            Ok(Self(ShapeKind::Circle { radius }))
        } else {
            Err(GeometryError::InvalidRadius { radius })
        }
    }

    pub(crate) const fn rect_unchecked(width: f32, height: f32) -> Self {
        Self(ShapeKind::Rect { width, height })
    }

    pub(crate) const fn circle_unchecked(radius: f32) -> Self {
        Self(ShapeKind::Circle { radius })
    }

    /// Half of the largest dimension; the separation used when pushing the
    /// shape out of a circle.
    #[must_use]
    pub fn half_extent(&self) -> f32 {
        match self.0 {
            ShapeKind::Rect { width, height } => width.max(height) / 2.0,
            ShapeKind::Circle { radius } => radius,
        }
    }

    /// Places the shape so that its center lies on `center`.
    #[must_use]
    pub fn at(&self, center: Vec2) -> Hitbox {
        match self.0 {
            ShapeKind::Rect { width, height } => Hitbox::Box(Aabb {
                left: center.x - width / 2.0,
                top: center.y - height / 2.0,
                width,
                height,
            }),
            ShapeKind::Circle { radius } => Hitbox::Circle(Circle { center, radius }),
        }
    }
}

fn valid_extent(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ShapeRepr {
    Rect { width: f32, height: f32 },
    Circle { radius: f32 },
}

impl TryFrom<ShapeRepr> for HitboxShape {
    type Error = GeometryError;

    fn try_from(repr: ShapeRepr) -> Result<Self, Self::Error> {
        match repr {
            ShapeRepr::Rect { width, height } => Self::rect(width, height),
            ShapeRepr::Circle { radius } => Self::circle(radius),
        }
    }
}

impl From<HitboxShape> for ShapeRepr {
    fn from(shape: HitboxShape) -> Self {
        match shape.0 {
            ShapeKind::Rect { width, height } => Self::Rect { width, height },
            ShapeKind::Circle { radius } => Self::Circle { radius },
        }
    }
}

/// Axis-aligned rectangle in world pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

impl Aabb {
    /// Creates a rectangle from its top-left corner and extents.
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Result<Self, GeometryError> {
        let _ = HitboxShape::rect(width, height)?;
        Ok(Self {
            left,
            top,
            width,
            height,
        })
    }

    /// Left edge.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.left
    }

    /// Top edge.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.top
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Geometric center.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Strict overlap test against another rectangle.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left < other.right()
            && self.right() > other.left
            && self.top < other.bottom()
            && self.bottom() > other.top
    }

    /// Reports whether the point lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    /// Point of the rectangle closest to `point`.
    #[must_use]
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.left, self.right()),
            point.y.clamp(self.top, self.bottom()),
        )
    }
}

/// Circle in world pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    center: Vec2,
    radius: f32,
}

impl Circle {
    /// Creates a circle, rejecting non-positive radii.
    pub fn new(center: Vec2, radius: f32) -> Result<Self, GeometryError> {
        let _ = HitboxShape::circle(radius)?;
        Ok(Self { center, radius })
    }

    /// Center point.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Inclusive point containment.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.distance_squared(self.center) <= self.radius * self.radius
    }

    /// Strict overlap test against another circle.
    #[must_use]
    pub fn overlaps_circle(&self, other: &Circle) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) < reach * reach
    }

    /// Strict overlap test against a rectangle.
    ///
    /// The center is clamped onto the rectangle and the squared distance to
    /// that closest point is compared to the squared radius.
    #[must_use]
    pub fn overlaps_aabb(&self, rect: &Aabb) -> bool {
        let closest = rect.closest_point(self.center);
        closest.distance_squared(self.center) < self.radius * self.radius
    }
}

/// Collision shape placed in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Hitbox {
    /// Axis-aligned rectangle.
    Box(Aabb),
    /// Circle.
    Circle(Circle),
}

impl Hitbox {
    /// Overlap test dispatched on both shape variants.
    #[must_use]
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        match (self, other) {
            (Self::Box(a), Self::Box(b)) => a.overlaps(b),
            (Self::Box(rect), Self::Circle(circle)) | (Self::Circle(circle), Self::Box(rect)) => {
                circle.overlaps_aabb(rect)
            }
            (Self::Circle(a), Self::Circle(b)) => a.overlaps_circle(b),
        }
    }

    /// Reports whether the point lies within the hitbox.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        match self {
            Self::Box(rect) => rect.contains_point(point),
            Self::Circle(circle) => circle.contains_point(point),
        }
    }

    /// Geometric center.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        match self {
            Self::Box(rect) => rect.center(),
            Self::Circle(circle) => circle.center,
        }
    }

    /// Leftmost extent.
    #[must_use]
    pub fn left(&self) -> f32 {
        match self {
            Self::Box(rect) => rect.left,
            Self::Circle(circle) => circle.center.x - circle.radius,
        }
    }

    /// Rightmost extent.
    #[must_use]
    pub fn right(&self) -> f32 {
        match self {
            Self::Box(rect) => rect.right(),
            Self::Circle(circle) => circle.center.x + circle.radius,
        }
    }

    /// Topmost extent.
    #[must_use]
    pub fn top(&self) -> f32 {
        match self {
            Self::Box(rect) => rect.top,
            Self::Circle(circle) => circle.center.y - circle.radius,
        }
    }

    /// Bottommost extent.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        match self {
            Self::Box(rect) => rect.bottom(),
            Self::Circle(circle) => circle.center.y + circle.radius,
        }
    }

    /// Moves the hitbox so that its center lies on `center`.
    pub fn set_center(&mut self, center: Vec2) {
        match self {
            Self::Box(rect) => {
                rect.left = center.x - rect.width / 2.0;
                rect.top = center.y - rect.height / 2.0;
            }
            Self::Circle(circle) => circle.center = center,
        }
    }

    /// Moves the hitbox so that its right extent lies on `x`.
    pub fn set_right(&mut self, x: f32) {
        match self {
            Self::Box(rect) => rect.left = x - rect.width,
            Self::Circle(circle) => circle.center.x = x - circle.radius,
        }
    }

    /// Moves the hitbox so that its left extent lies on `x`.
    pub fn set_left(&mut self, x: f32) {
        match self {
            Self::Box(rect) => rect.left = x,
            Self::Circle(circle) => circle.center.x = x + circle.radius,
        }
    }

    /// Moves the hitbox so that its bottom extent lies on `y`.
    pub fn set_bottom(&mut self, y: f32) {
        match self {
            Self::Box(rect) => rect.top = y - rect.height,
            Self::Circle(circle) => circle.center.y = y - circle.radius,
        }
    }

    /// Moves the hitbox so that its top extent lies on `y`.
    pub fn set_top(&mut self, y: f32) {
        match self {
            Self::Box(rect) => rect.top = y,
            Self::Circle(circle) => circle.center.y = y + circle.radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(left: f32, top: f32, width: f32, height: f32) -> Hitbox {
        Hitbox::Box(Aabb::new(left, top, width, height).expect("valid rect"))
    }

    fn circle(x: f32, y: f32, radius: f32) -> Hitbox {
        Hitbox::Circle(Circle::new(Vec2::new(x, y), radius).expect("valid circle"))
    }

    #[test]
    fn rejects_degenerate_shapes() {
        assert_eq!(
            HitboxShape::circle(0.0),
            Err(GeometryError::InvalidRadius { radius: 0.0 })
        );
        assert!(HitboxShape::circle(-3.0).is_err());
        assert!(HitboxShape::circle(f32::NAN).is_err());
        assert!(HitboxShape::rect(10.0, 0.0).is_err());
        assert!(HitboxShape::rect(-1.0, 4.0).is_err());
        assert!(Aabb::new(0.0, 0.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn touching_rectangles_do_not_overlap() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(10.0, 0.0, 10.0, 10.0);
        let c = rect(9.0, 9.0, 10.0, 10.0);

        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn circle_against_rect_uses_closest_point() {
        let wall = rect(0.0, 0.0, 10.0, 10.0);

        assert!(circle(14.0, 5.0, 5.0).overlaps(&wall));
        assert!(!circle(15.0, 5.0, 5.0).overlaps(&wall));
        // Diagonal from the corner: distance sqrt(18) > 4.
        assert!(!circle(13.0, 13.0, 4.0).overlaps(&wall));
        assert!(wall.overlaps(&circle(12.0, 12.0, 4.0)));
    }

    #[test]
    fn circles_overlap_inside_combined_radius() {
        assert!(circle(0.0, 0.0, 5.0).overlaps(&circle(8.0, 0.0, 4.0)));
        assert!(!circle(0.0, 0.0, 5.0).overlaps(&circle(9.0, 0.0, 4.0)));
    }

    #[test]
    fn circle_contains_boundary_point() {
        let body = circle(0.0, 0.0, 5.0);
        assert!(body.contains_point(Vec2::new(3.0, 4.0)));
        assert!(!body.contains_point(Vec2::new(4.0, 4.0)));
    }

    #[test]
    fn edge_setters_follow_shape() {
        let mut boxed = HitboxShape::rect(20.0, 10.0)
            .expect("valid")
            .at(Vec2::new(50.0, 50.0));
        boxed.set_right(100.0);
        assert_eq!(boxed.left(), 80.0);
        boxed.set_top(0.0);
        assert_eq!(boxed.center(), Vec2::new(90.0, 5.0));

        let mut round = HitboxShape::circle(4.0).expect("valid").at(Vec2::ZERO);
        round.set_bottom(10.0);
        assert_eq!(round.center(), Vec2::new(0.0, 6.0));
    }

    #[test]
    fn half_extent_uses_largest_dimension() {
        let shape = HitboxShape::rect(40.0, 24.0).expect("valid");
        assert_eq!(shape.half_extent(), 20.0);
        assert_eq!(HitboxShape::circle(7.0).expect("valid").half_extent(), 7.0);
    }
}
