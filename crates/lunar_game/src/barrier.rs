//! Barrier spawning, movement, and culling.
//!
//! Spawn timing is accumulated run time rather than wall-clock, so a paused
//! or slow frame never bursts out a barrier cluster. Culling is a single
//! `retain` pass; removal never happens while indexing into the live list.

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barrier {
    /// Lane index 0..=2; the lateral offset is resolved through tuning.
    pub lane: usize,
    /// Position along the travel axis.
    pub z: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BarrierUpdate {
    pub spawned: bool,
    pub culled: u32,
    /// Sum of the random 1-10 increments for every barrier culled this frame.
    pub score_gain: u32,
}

#[derive(Debug, Clone)]
pub struct BarrierField {
    pub(crate) barriers: Vec<Barrier>,
    since_spawn: f32,
    pub spawn_interval: f32,
    pub spawn_z: f32,
    pub cull_z: f32,
}

impl BarrierField {
    pub fn new(spawn_interval: f32, spawn_z: f32, cull_z: f32) -> Self {
        Self {
            barriers: Vec::new(),
            since_spawn: 0.0,
            spawn_interval,
            spawn_z,
            cull_z,
        }
    }

    pub fn barriers(&self) -> &[Barrier] {
        &self.barriers
    }

    pub fn clear(&mut self) {
        self.barriers.clear();
    }

    /// Advance all barriers by `speed * dt`, spawn when the interval has
    /// elapsed, and cull everything behind the rear threshold.
    pub fn advance<R: Rng>(&mut self, speed: f32, dt: f32, rng: &mut R) -> BarrierUpdate {
        let mut update = BarrierUpdate::default();

        self.since_spawn += dt;
        if self.since_spawn > self.spawn_interval {
            self.barriers.push(Barrier {
                lane: rng.gen_range(0..3),
                z: self.spawn_z,
            });
            self.since_spawn = 0.0;
            update.spawned = true;
        }

        for barrier in &mut self.barriers {
            barrier.z -= speed * dt;
        }

        let cull_z = self.cull_z;
        self.barriers.retain(|barrier| {
            if barrier.z < cull_z {
                update.culled += 1;
                update.score_gain += rng.gen_range(1..=10);
                false
            } else {
                true
            }
        });

        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field() -> BarrierField {
        BarrierField::new(1.2, 70.0, -15.0)
    }

    #[test]
    fn no_spawn_before_interval_elapses() {
        let mut field = field();
        let mut rng = StdRng::seed_from_u64(1);
        let update = field.advance(8.0, 1.0, &mut rng);
        assert!(!update.spawned);
        assert!(field.barriers().is_empty());
    }

    #[test]
    fn spawns_once_interval_is_exceeded() {
        let mut field = field();
        let mut rng = StdRng::seed_from_u64(1);
        field.advance(8.0, 1.0, &mut rng);
        let update = field.advance(8.0, 0.3, &mut rng);
        assert!(update.spawned);
        assert_eq!(field.barriers().len(), 1);
        assert!(field.barriers()[0].lane < 3);
        // Spawned this frame, then advanced with everything else.
        assert!((field.barriers()[0].z - (70.0 - 8.0 * 0.3)).abs() < 1e-4);
    }

    #[test]
    fn spawn_timer_resets_after_spawn() {
        let mut field = field();
        let mut rng = StdRng::seed_from_u64(7);
        field.advance(8.0, 1.3, &mut rng);
        let update = field.advance(8.0, 1.0, &mut rng);
        assert!(!update.spawned, "timer must restart from zero after a spawn");
    }

    #[test]
    fn culled_barrier_yields_score_between_1_and_10() {
        for seed in 0..50u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut field = field();
            field.barriers.push(Barrier { lane: 1, z: -14.9 });
            let update = field.advance(8.0, 0.05, &mut rng);
            assert_eq!(update.culled, 1);
            assert!((1..=10).contains(&update.score_gain));
        }
    }

    #[test]
    fn cull_removes_only_barriers_behind_threshold() {
        let mut field = field();
        let mut rng = StdRng::seed_from_u64(3);
        field.barriers.push(Barrier { lane: 0, z: -14.9 });
        field.barriers.push(Barrier { lane: 1, z: 5.0 });
        field.barriers.push(Barrier { lane: 2, z: -14.95 });

        let update = field.advance(8.0, 0.05, &mut rng);
        assert_eq!(update.culled, 2);
        assert_eq!(field.barriers().len(), 1);
        assert_eq!(field.barriers()[0].lane, 1);
    }

    #[test]
    fn barriers_move_backward_by_speed_times_dt() {
        let mut field = field();
        let mut rng = StdRng::seed_from_u64(5);
        field.barriers.push(Barrier { lane: 1, z: 30.0 });
        field.advance(8.0, 0.05, &mut rng);
        assert!((field.barriers()[0].z - 29.6).abs() < 1e-4);
    }

    #[test]
    fn spawn_lane_distribution_covers_all_lanes() {
        let mut field = field();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let update = field.advance(0.0, 1.3, &mut rng);
            assert!(update.spawned);
            seen[field.barriers().last().expect("just spawned").lane] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }
}
