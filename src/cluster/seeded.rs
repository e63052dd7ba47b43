//! Seeded grouping of foreground pixels in embedding space.

use super::options::ClusterParams;
use crate::error::LaneError;
use crate::image::embedding::squared_distance;
use crate::image::{EmbeddingMap, ForegroundMask, ImageView, LabelMap};
use crate::types::{LaneId, LaneInstance};
use log::{debug, trace};
use serde::Serialize;

/// Pixel counts describing one clustering run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStats {
    /// Foreground pixels in the input mask.
    pub foreground: usize,
    /// Foreground pixels dropped by the top band.
    pub masked_top_band: usize,
    /// Pixels assigned to a lane instance.
    pub assigned: usize,
    /// Pixels left unassigned once `max_lanes` was reached.
    pub noise: usize,
}

/// Lane partition produced by [`InstanceClusterer::cluster`].
#[derive(Clone, Debug)]
pub struct ClusterResult {
    /// Instances with ids `1..=k` in formation order.
    pub instances: Vec<LaneInstance>,
    /// The same partition materialised per pixel.
    pub labels: LabelMap,
    pub stats: ClusterStats,
}

impl ClusterResult {
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Greedy seeded clusterer.
///
/// Foreground pixels below the top band form the unassigned pool, kept in
/// raster order. Each round takes the first pooled pixel as seed, moves
/// every pooled pixel whose embedding lies strictly within
/// `distance_threshold` of the centre into a new instance, and stops once the
/// pool is empty or `max_lanes` instances exist. Ids follow formation order,
/// so identical inputs always produce identical labels.
pub struct InstanceClusterer {
    params: ClusterParams,
}

impl InstanceClusterer {
    pub fn new(params: ClusterParams) -> Result<Self, LaneError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ClusterParams {
        &self.params
    }

    pub fn cluster(
        &self,
        embedding: &EmbeddingMap,
        mask: &ForegroundMask,
    ) -> Result<ClusterResult, LaneError> {
        if embedding.size() != (mask.w, mask.h) {
            return Err(LaneError::DimensionMismatch {
                embedding: embedding.size(),
                mask: (mask.w, mask.h),
            });
        }
        let (w, h) = (mask.w, mask.h);
        let band = self.params.top_band_rows.min(h);

        let mut pool: Vec<usize> = Vec::new();
        let mut masked_top_band = 0usize;
        for (y, row) in mask.rows().enumerate() {
            for (x, _) in row.iter().enumerate().filter(|&(_, &v)| v != 0) {
                if y < band {
                    masked_top_band += 1;
                } else {
                    pool.push(embedding.pixel_index(x, y));
                }
            }
        }
        let foreground = pool.len() + masked_top_band;
        debug!(
            "InstanceClusterer::cluster start w={} h={} dim={} foreground={} masked={} max_lanes={} threshold={:.3}",
            w,
            h,
            embedding.dim,
            foreground,
            masked_top_band,
            self.params.max_lanes,
            self.params.distance_threshold
        );

        let thresh_sq = self.params.distance_threshold * self.params.distance_threshold;
        let mut instances: Vec<LaneInstance> = Vec::new();
        while !pool.is_empty() && instances.len() < self.params.max_lanes {
            let id = (instances.len() + 1) as LaneId;
            let members = take_group(
                embedding,
                &mut pool,
                thresh_sq,
                self.params.mean_shift_iterations,
            );
            trace!(
                "InstanceClusterer::cluster lane={} members={} remaining={}",
                id,
                members.len(),
                pool.len()
            );
            instances.push(LaneInstance {
                id,
                pixels: members.iter().map(|&i| [i % w, i / w]).collect(),
            });
        }

        let assigned = instances.iter().map(LaneInstance::len).sum();
        let stats = ClusterStats {
            foreground,
            masked_top_band,
            assigned,
            noise: pool.len(),
        };
        debug!(
            "InstanceClusterer::cluster done lanes={} assigned={} noise={}",
            instances.len(),
            stats.assigned,
            stats.noise
        );
        let labels = LabelMap::from_instances(w, h, &instances);
        Ok(ClusterResult {
            instances,
            labels,
            stats,
        })
    }
}

/// Remove one group from `pool` and return its pixel indices in raster order.
/// `pool` must be non-empty; the returned group is never empty.
fn take_group(
    embedding: &EmbeddingMap,
    pool: &mut Vec<usize>,
    thresh_sq: f32,
    mean_shift_iterations: usize,
) -> Vec<usize> {
    let mut center = embedding.vector_at(pool[0]).to_vec();
    // seed is at distance zero, so the first collection contains it
    let mut members = collect_within(embedding, pool, &center, thresh_sq);
    for _ in 0..mean_shift_iterations {
        mean_embedding(embedding, &members, &mut center);
        let next = collect_within(embedding, pool, &center, thresh_sq);
        if next.is_empty() || next == members {
            break;
        }
        members = next;
    }

    // members is an ordered subsequence of pool
    let mut taken = members.iter().peekable();
    pool.retain(|i| {
        if taken.peek() == Some(&i) {
            taken.next();
            false
        } else {
            true
        }
    });
    members
}

fn collect_within(
    embedding: &EmbeddingMap,
    pool: &[usize],
    center: &[f32],
    thresh_sq: f32,
) -> Vec<usize> {
    pool.iter()
        .copied()
        .filter(|&i| squared_distance(embedding.vector_at(i), center) < thresh_sq)
        .collect()
}

fn mean_embedding(embedding: &EmbeddingMap, members: &[usize], out: &mut [f32]) {
    out.fill(0.0);
    if members.is_empty() {
        return;
    }
    for &i in members {
        for (acc, v) in out.iter_mut().zip(embedding.vector_at(i)) {
            *acc += v;
        }
    }
    let inv = 1.0 / members.len() as f32;
    out.iter_mut().for_each(|v| *v *= inv);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BACKGROUND;

    fn map_from_fn(
        w: usize,
        h: usize,
        dim: usize,
        f: impl Fn(usize, usize) -> Vec<f32>,
    ) -> EmbeddingMap {
        let mut map = EmbeddingMap::new(w, h, dim);
        for y in 0..h {
            for x in 0..w {
                map.vector_mut(x, y).copy_from_slice(&f(x, y));
            }
        }
        map
    }

    #[test]
    fn empty_mask_yields_no_instances() {
        let emb = EmbeddingMap::new(8, 4, 2);
        let mask = ForegroundMask::new(8, 4);
        let clusterer = InstanceClusterer::new(ClusterParams::new(4, 1.0)).unwrap();
        let res = clusterer.cluster(&emb, &mask).unwrap();
        assert!(res.is_empty());
        assert_eq!(res.stats, ClusterStats::default());
        assert_eq!(res.labels.labelled_count(), 0);
    }

    #[test]
    fn mismatched_sizes_are_rejected() {
        let emb = EmbeddingMap::new(8, 4, 2);
        let mask = ForegroundMask::new(4, 8);
        let clusterer = InstanceClusterer::new(ClusterParams::new(4, 1.0)).unwrap();
        let err = clusterer.cluster(&emb, &mask).unwrap_err();
        assert_eq!(
            err,
            LaneError::DimensionMismatch {
                embedding: (8, 4),
                mask: (4, 8)
            }
        );
    }

    #[test]
    fn singletons_are_capped_and_rest_is_noise() {
        // every pixel gets its own far-away embedding
        let emb = map_from_fn(5, 1, 1, |x, _| vec![10.0 * x as f32]);
        let mask = ForegroundMask::from_fn(5, 1, |_, _| true);
        let clusterer = InstanceClusterer::new(ClusterParams::new(3, 1.0)).unwrap();
        let res = clusterer.cluster(&emb, &mask).unwrap();
        assert_eq!(res.instances.len(), 3);
        assert_eq!(res.stats.noise, 2);
        let ids: Vec<LaneId> = res.instances.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        // raster order seeds: pixels 0, 1, 2
        assert_eq!(res.instances[0].pixels, vec![[0, 0]]);
        assert_eq!(res.instances[2].pixels, vec![[2, 0]]);
        assert_eq!(res.labels.get(3, 0), BACKGROUND);
        assert_eq!(res.labels.get(4, 0), BACKGROUND);
    }

    #[test]
    fn top_band_pixels_never_reach_a_lane() {
        let emb = EmbeddingMap::new(4, 6, 2);
        let mask = ForegroundMask::from_fn(4, 6, |_, _| true);
        let params = ClusterParams::new(4, 0.5).with_top_band_rows(2);
        let res = InstanceClusterer::new(params)
            .unwrap()
            .cluster(&emb, &mask)
            .unwrap();
        assert_eq!(res.stats.masked_top_band, 8);
        assert_eq!(res.instances.len(), 1);
        assert!(res.instances[0].pixels.iter().all(|&[_, y]| y >= 2));
        assert_eq!(res.instances[0].len(), 16);
    }

    #[test]
    fn threshold_is_strict() {
        let emb = map_from_fn(2, 1, 1, |x, _| vec![x as f32]);
        let mask = ForegroundMask::from_fn(2, 1, |_, _| true);
        let res = InstanceClusterer::new(ClusterParams::new(4, 1.0))
            .unwrap()
            .cluster(&emb, &mask)
            .unwrap();
        assert_eq!(res.instances.len(), 2);
    }

    #[test]
    fn mean_shift_recentres_on_group() {
        // chain 0.0, 0.9, 1.8: the seed reaches 0.9 only, the mean (0.45)
        // still misses 1.8, so the group is stable at two pixels
        let values = [0.0f32, 0.9, 1.8];
        let emb = map_from_fn(3, 1, 1, |x, _| vec![values[x]]);
        let mask = ForegroundMask::from_fn(3, 1, |_, _| true);
        let params = ClusterParams::new(4, 1.0).with_mean_shift_iterations(5);
        let res = InstanceClusterer::new(params)
            .unwrap()
            .cluster(&emb, &mask)
            .unwrap();
        assert_eq!(res.instances.len(), 2);
        assert_eq!(res.instances[0].pixels, vec![[0, 0], [1, 0]]);
        assert_eq!(res.instances[1].pixels, vec![[2, 0]]);
    }

    #[test]
    fn recentred_group_can_leave_its_seed_behind() {
        // seed 0.0, eight pixels at 0.9, eight at 1.7: the second centre
        // (about 1.22) is out of the seed's reach
        let emb = map_from_fn(17, 1, 1, |x, _| match x {
            0 => vec![0.0],
            1..=8 => vec![0.9],
            _ => vec![1.7],
        });
        let mask = ForegroundMask::from_fn(17, 1, |_, _| true);
        let params = ClusterParams::new(4, 1.0).with_mean_shift_iterations(5);
        let res = InstanceClusterer::new(params)
            .unwrap()
            .cluster(&emb, &mask)
            .unwrap();
        assert_eq!(res.instances.len(), 2);
        assert_eq!(res.instances[0].id, 1);
        let expected: Vec<[usize; 2]> = (1..17).map(|x| [x, 0]).collect();
        assert_eq!(res.instances[0].pixels, expected);
        // the abandoned seed starts the next round on its own
        assert_eq!(res.instances[1].id, 2);
        assert_eq!(res.instances[1].pixels, vec![[0, 0]]);
        assert_eq!(res.labels.get(0, 0), 2);
        assert_eq!(res.stats.noise, 0);
        assert_eq!(res.stats.assigned, 17);
    }

    #[test]
    fn invalid_params_are_rejected() {
        assert!(InstanceClusterer::new(ClusterParams::new(0, 1.0)).is_err());
        assert!(InstanceClusterer::new(ClusterParams::new(4, 0.0)).is_err());
        assert!(InstanceClusterer::new(ClusterParams::new(4, f32::NAN)).is_err());
        assert!(InstanceClusterer::new(ClusterParams::new(300, 1.0)).is_err());
    }
}
