//! Lane bookkeeping for one motion class
//!
//! Each lane only remembers its most recent occupant. That is sound because
//! comments arrive in ascending start time: any earlier occupant of the lane
//! left the stage no later than the most recent one.

/// Most recent comment seen in a lane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occupant {
    /// Placement serial, shared by every lane a multi-line comment spans
    pub id: usize,
    /// Start time in seconds
    pub start: f64,
    /// Pixel width of the text
    pub width: f64,
}

/// A bank of lanes numbered from the anchoring edge
#[derive(Debug, Clone)]
pub struct LaneBank {
    lanes: Vec<Option<Occupant>>,
}

impl LaneBank {
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            lanes: vec![None; count],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    #[must_use]
    pub fn occupant(&self, lane: usize) -> Option<&Occupant> {
        self.lanes.get(lane).and_then(Option::as_ref)
    }

    /// Count consecutive free lanes starting at `from`, up to `span`
    ///
    /// An occupant spanning several lanes is only tested once.
    pub fn free_run<F>(&self, from: usize, span: usize, is_free: F) -> usize
    where
        F: Fn(&Occupant) -> bool,
    {
        let mut run = 0;
        let mut last_checked = None;
        for slot in self.lanes.iter().skip(from).take(span) {
            if let Some(occupant) = slot {
                if last_checked != Some(occupant.id) {
                    last_checked = Some(occupant.id);
                    if !is_free(occupant) {
                        break;
                    }
                }
            }
            run += 1;
        }
        run
    }

    /// First lane where `span` consecutive lanes are free
    ///
    /// After a blocked attempt the scan resumes past the free lanes it
    /// already counted.
    pub fn find_run<F>(&self, span: usize, is_free: F) -> Option<usize>
    where
        F: Fn(&Occupant) -> bool,
    {
        let mut lane = 0;
        while lane + span <= self.lanes.len() {
            let free = self.free_run(lane, span, &is_free);
            if free >= span {
                return Some(lane);
            }
            lane += free.max(1);
        }
        None
    }

    /// Degraded choice when no run is free: the first never-used lane, else
    /// the lane whose occupant started earliest
    #[must_use]
    pub fn fallback_lane(&self, span: usize) -> usize {
        if self.lanes.is_empty() {
            return 0;
        }
        let last_start = self.lanes.len().saturating_sub(span);
        let mut best = 0;
        for lane in 0..=last_start {
            match (&self.lanes[lane], &self.lanes[best]) {
                (None, _) => return lane,
                (Some(candidate), Some(current)) if candidate.start < current.start => {
                    best = lane;
                }
                _ => {}
            }
        }
        best
    }

    /// Record `occupant` in `span` lanes starting at `lane`
    pub fn mark(&mut self, lane: usize, span: usize, occupant: Occupant) {
        for slot in self.lanes.iter_mut().skip(lane).take(span) {
            *slot = Some(occupant);
        }
    }
}
