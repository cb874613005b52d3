use crate::echo_interface::{DetectionPoint, Track};
use crate::prelude::{ClusterConfig, PipelineResult};
use crate::telemetry::log::LogManager;

/// Streaming density clustering of detections into meteor tracks.
///
/// Detections are grouped with a DBSCAN-style rule in the scaled
/// (time, range, range-rate) space while memory stays bounded: a cluster is
/// flushed as soon as the stream has moved past it by more than the flush
/// horizon `eps * tscale`, at which point no future detection can still fall
/// within `eps` of it.
///
/// Precondition (documented, not runtime-checked): `addnext` must see points
/// in non-decreasing time order. The horizon eviction relies on it; feeding
/// points out of order gives undefined clustering results.
pub struct ClusteringEngine {
    config: ClusterConfig,
    /// Flush horizon in seconds, derived once at construction.
    horizon: f64,
    active: Vec<ActiveCluster>,
    logger: LogManager,
}

struct ActiveCluster {
    points: Vec<DetectionPoint>,
    /// Time of the most recently added point.
    last_t: f64,
}

impl ClusteringEngine {
    pub fn new(config: ClusterConfig) -> PipelineResult<Self> {
        config.validate()?;
        let horizon = config.eps * config.tscale;
        Ok(Self {
            config,
            horizon,
            active: Vec::new(),
            logger: LogManager::new(),
        })
    }

    /// Number of clusters still open.
    pub fn active_clusters(&self) -> usize {
        self.active.len()
    }

    fn scaled_distance(&self, p: &DetectionPoint, q: &DetectionPoint) -> f64 {
        let dt = (p.t - q.t) / self.config.tscale;
        let dr = (p.r - q.r) / self.config.rscale;
        let dv = (p.v - q.v) / self.config.vscale;
        (dt * dt + dr * dr + dv * dv).sqrt()
    }

    /// Feeds the next detection, returning any clusters completed by the
    /// stream moving past them.
    pub fn addnext(&mut self, point: DetectionPoint) -> Vec<Track> {
        let finished = self.evict_stale(point.t);

        let reachable: Vec<usize> = self
            .active
            .iter()
            .enumerate()
            .filter(|(_, cluster)| {
                cluster
                    .points
                    .iter()
                    .any(|q| self.scaled_distance(&point, q) <= self.config.eps)
            })
            .map(|(index, _)| index)
            .collect();

        match reachable.as_slice() {
            [] => self.active.push(ActiveCluster {
                last_t: point.t,
                points: vec![point],
            }),
            [index] => {
                let cluster = &mut self.active[*index];
                cluster.last_t = point.t;
                cluster.points.push(point);
            }
            // Density-connected components are transitively joined.
            indexes => self.merge_reachable(indexes, point),
        }

        finished
    }

    /// Drains every remaining cluster that meets the density condition.
    /// Terminal: construct a new engine to process another stream.
    pub fn finish(&mut self) -> Vec<Track> {
        let min_samples = self.config.min_samples;
        let mut finished = Vec::new();
        for cluster in self.active.drain(..) {
            if cluster.points.len() >= min_samples {
                finished.push(Track::from_points(cluster.points));
            }
        }
        finished
    }

    fn evict_stale(&mut self, now: f64) -> Vec<Track> {
        let mut finished = Vec::new();
        let mut index = 0;
        while index < self.active.len() {
            if now - self.active[index].last_t > self.horizon {
                let cluster = self.active.swap_remove(index);
                if cluster.points.len() >= self.config.min_samples {
                    finished.push(Track::from_points(cluster.points));
                } else {
                    self.logger.debug(&format!(
                        "discarding stale cluster of {} points below min_samples {}",
                        cluster.points.len(),
                        self.config.min_samples
                    ));
                }
            } else {
                index += 1;
            }
        }
        finished
    }

    fn merge_reachable(&mut self, indexes: &[usize], point: DetectionPoint) {
        let last_t = point.t;
        let mut merged = Vec::new();
        // descending order keeps earlier indexes valid across swap_remove
        for &index in indexes.iter().rev() {
            merged.extend(self.active.swap_remove(index).points);
        }
        merged.push(point);
        merged.sort_by(|a, b| a.t.total_cmp(&b.t).then(a.pulse_num.cmp(&b.pulse_num)));
        self.active.push(ActiveCluster {
            points: merged,
            last_t,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::PipelineError;

    fn unit_config(min_samples: usize) -> ClusterConfig {
        ClusterConfig {
            eps: 1.0,
            min_samples,
            tscale: 1.0,
            rscale: 1.0,
            vscale: 1.0,
        }
    }

    fn point(t: f64, r: f64, pulse_num: u64) -> DetectionPoint {
        DetectionPoint {
            t,
            r,
            v: 0.0,
            snr: 10.0,
            pulse_num,
        }
    }

    fn pulse_nums(track: &Track) -> Vec<u64> {
        track.points().iter().map(|p| p.pulse_num).collect()
    }

    #[test]
    fn invalid_config_fails_fast() {
        let mut config = unit_config(1);
        config.vscale = 0.0;
        assert!(matches!(
            ClusteringEngine::new(config),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn chain_of_neighbors_joins_one_cluster() {
        let mut engine = ClusteringEngine::new(unit_config(1)).unwrap();
        // adjacent distances 0.8 < eps, endpoint distance 1.6 > eps
        assert!(engine.addnext(point(0.0, 0.0, 0)).is_empty());
        assert!(engine.addnext(point(0.0, 0.8, 1)).is_empty());
        assert!(engine.addnext(point(0.0, 1.6, 2)).is_empty());
        let tracks = engine.finish();
        assert_eq!(tracks.len(), 1);
        assert_eq!(pulse_nums(&tracks[0]), vec![0, 1, 2]);
    }

    #[test]
    fn bridging_point_merges_separate_clusters() {
        let mut engine = ClusteringEngine::new(unit_config(1)).unwrap();
        // endpoints first: two clusters, then the midpoint reaches both
        engine.addnext(point(0.0, 0.0, 0));
        engine.addnext(point(0.0, 1.6, 1));
        assert_eq!(engine.active_clusters(), 2);
        engine.addnext(point(0.0, 0.8, 2));
        assert_eq!(engine.active_clusters(), 1);
        let tracks = engine.finish();
        assert_eq!(tracks.len(), 1);
        // merged members stay in time then pulse order
        assert_eq!(pulse_nums(&tracks[0]), vec![0, 1, 2]);
    }

    #[test]
    fn stale_cluster_is_emitted_when_stream_moves_past() {
        let mut engine = ClusteringEngine::new(unit_config(2)).unwrap();
        engine.addnext(point(0.0, 0.0, 0));
        engine.addnext(point(0.5, 0.0, 1));
        // horizon is eps * tscale = 1 s; t = 10 is far past it
        let tracks = engine.addnext(point(10.0, 100.0, 2));
        assert_eq!(tracks.len(), 1);
        assert_eq!(pulse_nums(&tracks[0]), vec![0, 1]);
        assert_eq!(engine.active_clusters(), 1);
    }

    #[test]
    fn sparse_stale_cluster_is_discarded() {
        let mut engine = ClusteringEngine::new(unit_config(2)).unwrap();
        engine.addnext(point(0.0, 0.0, 0));
        let tracks = engine.addnext(point(10.0, 100.0, 1));
        assert!(tracks.is_empty());
        // the lone new cluster also dies below min_samples at finish
        assert!(engine.finish().is_empty());
        assert_eq!(engine.active_clusters(), 0);
    }

    #[test]
    fn finish_drains_completely() {
        let mut engine = ClusteringEngine::new(unit_config(1)).unwrap();
        engine.addnext(point(0.0, 0.0, 0));
        engine.addnext(point(0.1, 10.0, 1));
        engine.addnext(point(0.2, 20.0, 2));
        let tracks = engine.finish();
        assert_eq!(tracks.len(), 3);
        assert_eq!(engine.active_clusters(), 0);
        let mut all: Vec<u64> = tracks.iter().flat_map(|t| pulse_nums(t)).collect();
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2]);
    }

    #[test]
    fn same_stream_clusters_deterministically() {
        let stream = [
            point(0.0, 0.0, 0),
            point(0.1, 0.5, 1),
            point(0.2, 5.0, 2),
            point(0.3, 0.9, 3),
            point(5.0, 5.2, 4),
            point(5.1, 5.4, 5),
        ];
        let run = || {
            let mut engine = ClusteringEngine::new(unit_config(1)).unwrap();
            let mut tracks = Vec::new();
            for p in &stream {
                tracks.extend(engine.addnext(p.clone()));
            }
            tracks.extend(engine.finish());
            let mut sets: Vec<Vec<u64>> = tracks.iter().map(pulse_nums).collect();
            sets.sort();
            sets
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn emitted_tracks_satisfy_density_invariant() {
        let mut engine = ClusteringEngine::new(unit_config(3)).unwrap();
        let stream = [
            point(0.0, 0.0, 0),
            point(0.3, 0.5, 1),
            point(0.6, 1.0, 2),
            point(0.9, 1.5, 3),
        ];
        let mut tracks = Vec::new();
        for p in &stream {
            tracks.extend(engine.addnext(p.clone()));
        }
        tracks.extend(engine.finish());
        assert_eq!(tracks.len(), 1);
        let track = &tracks[0];
        assert!(track.len() >= 3);
        // every member is within eps of some other member
        let config = unit_config(3);
        let probe = ClusteringEngine::new(config.clone()).unwrap();
        for (i, p) in track.points().iter().enumerate() {
            let connected = track
                .points()
                .iter()
                .enumerate()
                .any(|(j, q)| i != j && probe.scaled_distance(p, q) <= config.eps);
            assert!(connected);
        }
    }
}
