use crate::aabb::AABB;
use crate::body::StaticBody;
use glam::IVec3;
use std::collections::HashMap;

/// Source of static collision geometry, e.g. a streamed voxel world.
///
/// Describes which static geometry is relevant to a region right now. It holds
/// no handles into a simulation.
pub trait GeometryProvider {
    /// Static collider AABBs that intersect `region`.
    fn query_colliders(&self, region: AABB) -> Vec<AABB>;
}

/// A block type that may or may not collide.
pub trait SolidBlock {
    /// Collision AABB relative to the block's origin (min corner at 0,0,0),
    /// or `None` for non-collidable blocks like air.
    fn relative_aabb(&self) -> Option<AABB>;

    fn world_aabb(&self, block_pos_world: IVec3) -> Option<AABB> {
        self.relative_aabb()
            .map(|rel_aabb| rel_aabb.translate(block_pos_world.as_vec3()))
    }
}

type Chunk<B, const N: usize> = Box<[[[B; N]; N]; N]>;

/// Cubic chunks of blocks keyed by chunk coordinate.
#[derive(Clone)]
pub struct ChunkedGeometry<B, const CHUNK_SIZE: usize>
where
    B: SolidBlock + Clone,
{
    chunks: HashMap<IVec3, Chunk<B, CHUNK_SIZE>>,
}

impl<B, const CHUNK_SIZE: usize> ChunkedGeometry<B, CHUNK_SIZE>
where
    B: SolidBlock + Clone,
{
    pub fn new() -> Self {
        const { assert!(CHUNK_SIZE > 0, "CHUNK_SIZE must be positive") }
        Self {
            chunks: HashMap::new(),
        }
    }

    pub fn load_chunk(&mut self, chunk_coord: IVec3, block_data: Chunk<B, CHUNK_SIZE>) {
        log::debug!("Loading geometry chunk: {:?}", chunk_coord);
        self.chunks.insert(chunk_coord, block_data);
    }

    pub fn unload_chunk(&mut self, chunk_coord: IVec3) {
        if self.chunks.remove(&chunk_coord).is_some() {
            log::debug!("Unloading geometry chunk: {:?}", chunk_coord);
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Splits a world block position into (chunk coordinate, local coordinate).
    #[inline]
    fn locate(world_pos: IVec3) -> (IVec3, IVec3) {
        let size = IVec3::splat(CHUNK_SIZE as i32);
        (world_pos.div_euclid(size), world_pos.rem_euclid(size))
    }

    pub fn block(&self, world_pos: IVec3) -> Option<&B> {
        let (chunk_coord, local) = Self::locate(world_pos);
        self.chunks
            .get(&chunk_coord)
            .map(|chunk| &chunk[local.x as usize][local.y as usize][local.z as usize])
    }
}

impl<B, const CHUNK_SIZE: usize> Default for ChunkedGeometry<B, CHUNK_SIZE>
where
    B: SolidBlock + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<B, const CHUNK_SIZE: usize> GeometryProvider for ChunkedGeometry<B, CHUNK_SIZE>
where
    B: SolidBlock + Clone,
{
    fn query_colliders(&self, region: AABB) -> Vec<AABB> {
        let mut colliders = Vec::new();

        let min_block = region.min.floor().as_ivec3();
        let max_block = region.max.floor().as_ivec3();

        for x in min_block.x..=max_block.x {
            for y in min_block.y..=max_block.y {
                for z in min_block.z..=max_block.z {
                    let block_pos = IVec3::new(x, y, z);
                    let Some(aabb) = self.block(block_pos).and_then(|b| b.world_aabb(block_pos))
                    else {
                        continue;
                    };
                    if region.intersects(&aabb) {
                        colliders.push(aabb);
                    }
                }
            }
        }

        colliders
    }
}

/// Wraps every collider the provider reports for `region` in a fresh
/// [`StaticBody`], ready to be linked into a world for one step.
pub fn static_bodies_in<P>(provider: &P, region: AABB) -> Vec<StaticBody>
where
    P: GeometryProvider + ?Sized,
{
    provider
        .query_colliders(region)
        .into_iter()
        .map(StaticBody::new)
        .collect()
}
