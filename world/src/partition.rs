//! Chunked spatial index that decides which entities are simulated each tick.
//!
//! The world is divided into square chunks. Every entity is registered in the
//! general bucket of the chunk containing its position at insertion time, and
//! obstacles are additionally registered in a parallel obstacle bucket so the
//! collision passes can fetch blockers without filtering. The grid never
//! re-homes an entity on its own; callers opt in through
//! [`ChunkGrid::relocate`].

use std::collections::HashMap;

use aether_core::EntityId;
use glam::Vec2;

/// Integer coordinate of a chunk, `floor(position / chunk_size)` per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    x: i32,
    y: i32,
}

impl ChunkCoord {
    /// Creates a chunk coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal chunk index.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical chunk index.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    fn neighborhood(self) -> impl Iterator<Item = ChunkCoord> {
        (-1..=1).flat_map(move |dy| (-1..=1).map(move |dx| ChunkCoord::new(self.x + dx, self.y + dy)))
    }
}

/// Entities registered in the 3x3 block of chunks around a center.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Neighborhood {
    /// Every entity in the block, obstacles included.
    pub entities: Vec<EntityId>,
    /// Obstacles in the block.
    pub obstacles: Vec<EntityId>,
}

/// Spatial hash keyed by [`ChunkCoord`].
#[derive(Clone, Debug)]
pub struct ChunkGrid {
    chunk_size: f32,
    general: HashMap<ChunkCoord, Vec<EntityId>>,
    obstacles: HashMap<ChunkCoord, Vec<EntityId>>,
}

impl ChunkGrid {
    /// Creates an empty grid. Sizes below one pixel are raised to one.
    #[must_use]
    pub fn new(chunk_size: f32) -> Self {
        Self {
            chunk_size: if chunk_size.is_finite() {
                chunk_size.max(1.0)
            } else {
                1.0
            },
            general: HashMap::new(),
            obstacles: HashMap::new(),
        }
    }

    /// Edge length of a chunk in world pixels.
    #[must_use]
    pub const fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    /// Chunk containing the provided position.
    #[must_use]
    pub fn chunk_of(&self, position: Vec2) -> ChunkCoord {
        ChunkCoord::new(
            (position.x / self.chunk_size).floor() as i32,
            (position.y / self.chunk_size).floor() as i32,
        )
    }

    /// Registers an entity in the chunk containing `position`.
    pub fn insert(&mut self, entity: EntityId, position: Vec2, as_obstacle: bool) -> ChunkCoord {
        let chunk = self.chunk_of(position);
        self.general.entry(chunk).or_default().push(entity);
        if as_obstacle {
            self.obstacles.entry(chunk).or_default().push(entity);
        }
        chunk
    }

    /// Collects the entities of the 3x3 block of chunks around `center`.
    ///
    /// Chunks are visited row by row; entities keep their insertion order
    /// within a chunk.
    #[must_use]
    pub fn active_neighborhood(&self, center: Vec2) -> Neighborhood {
        let mut neighborhood = Neighborhood::default();
        for chunk in self.chunk_of(center).neighborhood() {
            if let Some(bucket) = self.general.get(&chunk) {
                neighborhood.entities.extend_from_slice(bucket);
            }
            if let Some(bucket) = self.obstacles.get(&chunk) {
                neighborhood.obstacles.extend_from_slice(bucket);
            }
        }
        neighborhood
    }

    /// Removes an entity from whichever buckets hold it.
    ///
    /// Returns `false` when the entity was not registered.
    pub fn evict(&mut self, entity: EntityId) -> bool {
        let removed = remove_from(&mut self.general, entity).is_some();
        let _ = remove_from(&mut self.obstacles, entity);
        removed
    }

    /// Moves an entity into the chunk containing `position`.
    ///
    /// Obstacle membership is preserved. Returns `true` when the entity
    /// changed chunk.
    pub fn relocate(&mut self, entity: EntityId, position: Vec2) -> bool {
        let target = self.chunk_of(position);
        let Some(current) = find_in(&self.general, entity) else {
            return false;
        };
        if current == target {
            return false;
        }
        let _ = remove_from(&mut self.general, entity);
        let was_obstacle = remove_from(&mut self.obstacles, entity).is_some();
        self.general.entry(target).or_default().push(entity);
        if was_obstacle {
            self.obstacles.entry(target).or_default().push(entity);
        }
        true
    }

    /// Chunk whose general bucket holds the entity.
    #[must_use]
    pub fn home_of(&self, entity: EntityId) -> Option<ChunkCoord> {
        find_in(&self.general, entity)
    }

    /// Entities registered in a single chunk.
    #[must_use]
    pub fn bucket(&self, chunk: ChunkCoord) -> &[EntityId] {
        self.general.get(&chunk).map_or(&[], Vec::as_slice)
    }

    /// Number of registered entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.general.values().map(Vec::len).sum()
    }

    /// Reports whether no entity is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.general.values().all(Vec::is_empty)
    }
}

fn find_in(buckets: &HashMap<ChunkCoord, Vec<EntityId>>, entity: EntityId) -> Option<ChunkCoord> {
    buckets
        .iter()
        .find(|(_, bucket)| bucket.contains(&entity))
        .map(|(chunk, _)| *chunk)
}

fn remove_from(
    buckets: &mut HashMap<ChunkCoord, Vec<EntityId>>,
    entity: EntityId,
) -> Option<ChunkCoord> {
    let chunk = find_in(buckets, entity)?;
    if let Some(bucket) = buckets.get_mut(&chunk) {
        bucket.retain(|candidate| *candidate != entity);
        if bucket.is_empty() {
            let _ = buckets.remove(&chunk);
        }
    }
    Some(chunk)
}
