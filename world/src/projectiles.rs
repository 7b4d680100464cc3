use aether_core::{
    heading_vector, Hitbox, ProjectileId, ProjectileOwner, ProjectileSnapshot, PROJECTILE_SHAPE,
};
use glam::Vec2;

/// Projectile travelling along a fixed heading from its spawn point.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Projectile {
    id: ProjectileId,
    owner: ProjectileOwner,
    origin: Vec2,
    position: Vec2,
    velocity: Vec2,
    damage: u32,
    max_distance: f32,
    traveled: f32,
}

impl Projectile {
    pub(crate) fn spawn(
        id: ProjectileId,
        origin: Vec2,
        angle_degrees: f32,
        owner: ProjectileOwner,
    ) -> Self {
        let tuning = owner.tuning();
        Self {
            id,
            owner,
            origin,
            position: origin,
            velocity: heading_vector(angle_degrees) * tuning.speed,
            damage: tuning.damage,
            max_distance: tuning.max_distance,
            traveled: 0.0,
        }
    }

    /// Moves one tick along the velocity and refreshes the distance from spawn.
    pub(crate) fn advance(&mut self) {
        self.position += self.velocity;
        self.traveled = self.position.distance(self.origin);
    }

    pub(crate) fn is_spent(&self) -> bool {
        self.traveled > self.max_distance
    }

    pub(crate) fn hitbox(&self) -> Hitbox {
        PROJECTILE_SHAPE.at(self.position)
    }

    pub(crate) const fn id(&self) -> ProjectileId {
        self.id
    }

    pub(crate) const fn owner(&self) -> ProjectileOwner {
        self.owner
    }

    pub(crate) const fn damage(&self) -> u32 {
        self.damage
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            owner: self.owner,
            position: self.position,
            velocity: self.velocity,
            traveled: self.traveled,
        }
    }
}
