//! Candidate tile ranges for one axis of motion.

/// Ordered, inclusive range of tile indices a body could touch while moving
/// along one axis, from the start position towards the destination.
///
/// The range covers the body's footprint at both ends of the move: one tile
/// behind the lower edge and `span` tiles past the upper one, so a body that
/// moves more than a tile per tick still visits every tile in between.
/// Indices are clamped to `[0, boundary]`; callers filter candidates by
/// actual geometry, so clamping never produces false hits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AxisSweep {
    start: i32,
    end: i32,
}

impl AxisSweep {
    /// `current` / `proposed` are the body's minimum edge on this axis,
    /// `span` its size in whole tiles, `boundary` the last valid index.
    pub fn new(current: f32, proposed: f32, span: i32, boundary: i32, tile_size: f32) -> Self {
        debug_assert!(tile_size > 0.0, "non-positive tile size");
        let boundary = boundary.max(0);
        let clamp = |i: i32| i.clamp(0, boundary);
        let cur = (current / tile_size).floor() as i32;
        let dst = (proposed / tile_size).floor() as i32;
        if proposed > current {
            Self { start: clamp(cur - 1), end: clamp(dst + span) }
        } else {
            // Zero motion sweeps downwards so a resting body still sees its support.
            Self { start: clamp(cur + span), end: clamp(dst - 1) }
        }
    }

    pub fn is_ascending(&self) -> bool {
        self.end >= self.start
    }

    pub fn first(&self) -> i32 {
        self.start
    }

    pub fn last(&self) -> i32 {
        self.end
    }

    pub fn len(&self) -> usize {
        (self.end - self.start).unsigned_abs() as usize + 1
    }

    pub fn contains(&self, index: i32) -> bool {
        let (lo, hi) = if self.is_ascending() { (self.start, self.end) } else { (self.end, self.start) };
        (lo..=hi).contains(&index)
    }

    pub fn iter(&self) -> AxisSweepIter {
        AxisSweepIter { next: Some(self.start), end: self.end, step: if self.is_ascending() { 1 } else { -1 } }
    }
}

impl IntoIterator for AxisSweep {
    type Item = i32;
    type IntoIter = AxisSweepIter;

    fn into_iter(self) -> AxisSweepIter {
        self.iter()
    }
}

/// Iterator over an [`AxisSweep`] in travel order.
#[derive(Clone, Debug)]
pub struct AxisSweepIter {
    next: Option<i32>,
    end: i32,
    step: i32,
}

impl Iterator for AxisSweepIter {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        let cur = self.next?;
        self.next = (cur != self.end).then_some(cur + self.step);
        Some(cur)
    }
}
