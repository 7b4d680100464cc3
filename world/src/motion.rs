//! Axis-separated movement with collision response against static obstacles.

use aether_core::{Hitbox, HitboxShape};
use glam::Vec2;

const COINCIDENT_EPSILON: f32 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Position and hitbox of a mover after collision resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// Float position, re-synchronised to the hitbox center when snapped.
    pub position: Vec2,
    /// Hitbox placed at the resolved position.
    pub hitbox: Hitbox,
    /// Whether any obstacle pushed the mover back.
    pub collided: bool,
}

/// Moves a shape by `delta`, resolving the x axis then the y axis.
///
/// Each axis applies its component, tests the rounded hitbox against every
/// obstacle and pushes it out: rectangles snap the mover's leading edge to the
/// facing side, circles place the mover `radius + half_extent` away from their
/// center along the center-to-mover direction. A zero delta only re-centers
/// the hitbox.
#[must_use]
pub fn resolve(position: Vec2, shape: &HitboxShape, delta: Vec2, obstacles: &[Hitbox]) -> Motion {
    if delta == Vec2::ZERO {
        return Motion {
            position,
            hitbox: shape.at(position.round()),
            collided: false,
        };
    }

    let mut position = position;
    let mut collided = false;
    let mut hitbox = shape.at(position.round());
    for (axis, step) in [(Axis::Horizontal, delta.x), (Axis::Vertical, delta.y)] {
        if step == 0.0 {
            continue;
        }
        match axis {
            Axis::Horizontal => position.x += step,
            Axis::Vertical => position.y += step,
        }
        hitbox = shape.at(position.round());
        let placed = hitbox.center();
        for obstacle in obstacles {
            if hitbox.overlaps(obstacle) {
                push_out(&mut hitbox, shape, obstacle, axis, step);
            }
        }
        if hitbox.center() != placed {
            position = hitbox.center();
            collided = true;
        }
    }

    Motion {
        position,
        hitbox,
        collided,
    }
}

fn push_out(mover: &mut Hitbox, shape: &HitboxShape, obstacle: &Hitbox, axis: Axis, step: f32) {
    match obstacle {
        Hitbox::Box(_) => match (axis, step > 0.0) {
            (Axis::Horizontal, true) => mover.set_right(obstacle.left()),
            (Axis::Horizontal, false) => mover.set_left(obstacle.right()),
            (Axis::Vertical, true) => mover.set_bottom(obstacle.top()),
            (Axis::Vertical, false) => mover.set_top(obstacle.bottom()),
        },
        Hitbox::Circle(circle) => {
            let offset = mover.center() - circle.center();
            let direction = if offset.length() > COINCIDENT_EPSILON {
                offset.normalize()
            } else {
                let back = -step.signum();
                match axis {
                    Axis::Horizontal => Vec2::new(back, 0.0),
                    Axis::Vertical => Vec2::new(0.0, back),
                }
            };
            let separation = circle.radius() + shape.half_extent();
            mover.set_center(circle.center() + direction * separation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aether_core::Aabb;

    fn wall(left: f32, top: f32, width: f32, height: f32) -> Hitbox {
        Hitbox::Box(Aabb::new(left, top, width, height).expect("valid wall"))
    }

    fn square(side: f32) -> HitboxShape {
        HitboxShape::rect(side, side).expect("valid square")
    }

    #[test]
    fn zero_delta_only_recenters() {
        let obstacle = wall(0.0, 0.0, 100.0, 100.0);
        let motion = resolve(Vec2::new(10.4, 10.6), &square(10.0), Vec2::ZERO, &[obstacle]);

        assert_eq!(motion.position, Vec2::new(10.4, 10.6));
        assert_eq!(motion.hitbox.center(), Vec2::new(10.0, 11.0));
        assert!(!motion.collided);
    }

    #[test]
    fn horizontal_move_snaps_to_wall_face() {
        let obstacle = wall(100.0, 0.0, 64.0, 64.0);
        let motion = resolve(Vec2::new(80.0, 32.0), &square(20.0), Vec2::new(15.0, 0.0), &[obstacle]);

        assert!(motion.collided);
        assert_eq!(motion.hitbox.right(), 100.0);
        assert_eq!(motion.position, Vec2::new(90.0, 32.0));
        assert!(!motion.hitbox.overlaps(&obstacle));
    }

    #[test]
    fn vertical_move_snaps_upward_against_ceiling() {
        let obstacle = wall(0.0, 0.0, 64.0, 64.0);
        let motion = resolve(Vec2::new(32.0, 80.0), &square(20.0), Vec2::new(0.0, -12.0), &[obstacle]);

        assert_eq!(motion.hitbox.top(), 64.0);
        assert_eq!(motion.position.y, 74.0);
    }

    #[test]
    fn sliding_along_wall_keeps_free_axis() {
        let obstacle = wall(100.0, 0.0, 64.0, 640.0);
        let motion = resolve(Vec2::new(88.0, 100.0), &square(20.0), Vec2::new(5.0, 5.0), &[obstacle]);

        assert_eq!(motion.hitbox.right(), 100.0);
        assert_eq!(motion.position, Vec2::new(90.0, 105.0));
    }

    #[test]
    fn circle_push_out_places_mover_on_separation_ring() {
        let planet = Hitbox::Circle(aether_core::Circle::new(Vec2::new(200.0, 200.0), 50.0).expect("valid"));
        let shape = square(20.0);
        let motion = resolve(Vec2::new(140.0, 210.0), &shape, Vec2::new(10.0, 0.0), &[planet]);

        let distance = motion.hitbox.center().distance(Vec2::new(200.0, 200.0));
        assert!((distance - 60.0).abs() < 1e-3);
        assert!(motion.collided);
        assert_eq!(motion.position, motion.hitbox.center());
    }

    #[test]
    fn coincident_centers_push_against_movement() {
        let planet = Hitbox::Circle(aether_core::Circle::new(Vec2::new(100.0, 100.0), 30.0).expect("valid"));
        let motion = resolve(Vec2::new(96.0, 100.0), &square(10.0), Vec2::new(4.0, 0.0), &[planet]);

        assert_eq!(motion.hitbox.center(), Vec2::new(65.0, 100.0));
    }

    #[test]
    fn unobstructed_move_keeps_sub_pixel_position() {
        let motion = resolve(Vec2::new(10.0, 10.0), &square(8.0), Vec2::new(0.25, 1.5), &[]);

        assert_eq!(motion.position, Vec2::new(10.25, 11.5));
        assert_eq!(motion.hitbox.center(), Vec2::new(10.0, 12.0));
        assert!(!motion.collided);
    }
}
