//! Spatial-hash broad phase and pairwise elastic resolution.
//!
//! The hash is rebuilt from scratch every pass; the population is bounded so
//! the O(n) rebuild is cheaper than maintaining it incrementally.

use crate::lantern::LanternInstance;
use fnv::FnvHashMap;
use glam::{IVec3, Vec3};
use smallvec::SmallVec;

type Bucket = SmallVec<[usize; 4]>;

pub struct SpatialHash {
    cell_size: f32,
    cells: FnvHashMap<IVec3, Bucket>,
}

impl SpatialHash {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: if cell_size > 0.0 { cell_size } else { 1.0 },
            cells: FnvHashMap::default(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn cell_of(&self, p: Vec3) -> IVec3 {
        (p / self.cell_size).floor().as_ivec3()
    }

    /// Bucket every lantern by its current cell.
    pub fn rebuild(&mut self, lanterns: &[LanternInstance]) {
        self.cells.clear();
        for (i, lantern) in lanterns.iter().enumerate() {
            let cell = self.cell_of(lantern.position);
            self.cells.entry(cell).or_default().push(i);
        }
    }

    pub fn bucket(&self, cell: IVec3) -> &[usize] {
        self.cells.get(&cell).map(|b| b.as_slice()).unwrap_or(&[])
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Separate overlapping lanterns and exchange momentum along the contact
    /// normal. All lanterns have unit mass. Returns the number of pairs that
    /// were pushed apart.
    pub fn resolve(
        &mut self,
        lanterns: &mut [LanternInstance],
        radius: f32,
        restitution: f32,
    ) -> usize {
        self.rebuild(lanterns);

        let min_dist = radius * 2.0;
        let min_dist_sq = min_dist * min_dist;
        let mut resolved = 0;

        for i in 0..lanterns.len() {
            let home = self.cell_of(lanterns[i].position);
            for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let Some(bucket) = self.cells.get(&(home + IVec3::new(dx, dy, dz)))
                        else {
                            continue;
                        };
                        for &j in bucket.iter() {
                            if j <= i {
                                continue;
                            }
                            let (head, tail) = lanterns.split_at_mut(j);
                            if resolve_pair(&mut head[i], &mut tail[0], min_dist, min_dist_sq, restitution) {
                                resolved += 1;
                            }
                        }
                    }
                }
            }
        }
        resolved
    }
}

/// Push `a` and `b` apart by half the overlap each, then apply an impulse if
/// they are still closing. Returns false when they do not overlap.
pub fn resolve_pair(
    a: &mut LanternInstance,
    b: &mut LanternInstance,
    min_dist: f32,
    min_dist_sq: f32,
    restitution: f32,
) -> bool {
    let delta = b.position - a.position;
    let dist_sq = delta.length_squared();
    // also rejects NaN
    if !(dist_sq > 0.0 && dist_sq <= min_dist_sq) {
        return false;
    }
    let dist = dist_sq.sqrt();
    let overlap = min_dist - dist;
    if overlap <= 0.0 {
        return false;
    }
    let normal = delta / dist;
    let half = normal * (overlap * 0.5);
    a.position -= half;
    b.position += half;

    let closing = (b.velocity - a.velocity).dot(normal);
    if closing > 0.0 {
        return true;
    }
    let impulse = normal * (-(1.0 + restitution) * closing * 0.5);
    a.velocity -= impulse;
    b.velocity += impulse;
    true
}
