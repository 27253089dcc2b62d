//! Recyclable track segments: the ground tiles and road strips that scroll
//! toward the player and wrap to the back of the queue once they pass behind
//! the camera, giving the illusion of an endless track.
//!
//! The wrap rule places a recycled segment one length past the maximum
//! position the band held *before* this frame's movement, then applies this
//! frame's movement to it as well, so a recycled segment stays exactly in
//! step with its neighbors.

/// One band of equally sized segments along the travel axis.
#[derive(Debug, Clone)]
pub struct TrackBand {
    positions: Vec<f32>,
    pub segment_length: f32,
    /// Segments crossing behind this position are recycled.
    pub recycle_at: f32,
}

impl TrackBand {
    pub fn new(count: usize, segment_length: f32, recycle_at: f32, start_offset: f32) -> Self {
        let positions = (0..count)
            .map(|i| start_offset + i as f32 * segment_length)
            .collect();
        Self {
            positions,
            segment_length,
            recycle_at,
        }
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Scroll every segment backward by `speed * dt`, recycling any segment
    /// that crosses the threshold.
    pub fn advance(&mut self, speed: f32, dt: f32) {
        let step = speed * dt;
        let mut max = self
            .positions
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max);

        for pos in &mut self.positions {
            *pos -= step;
            if *pos < self.recycle_at {
                *pos = max + self.segment_length - step;
                max = *pos;
            }
        }
    }
}
