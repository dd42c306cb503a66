//! Collision tests between two comments sharing a lane
//!
//! Both tests compare the most recent occupant of a lane (`prior`) with a
//! comment that starts no earlier (`candidate`).

/// Linear motion of a scrolling comment across the stage
///
/// The comment's leading edge enters at `start` and its trailing edge leaves
/// the far side at `start + duration`, so wider text moves faster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSegment {
    /// Seconds when the leading edge enters
    pub start: f64,
    /// Seconds from entering to fully leaving
    pub duration: f64,
    /// Pixel width of the text
    pub text_width: f64,
    /// Pixel width of the stage
    pub stage_width: f64,
}

impl ScrollSegment {
    #[must_use]
    pub const fn new(start: f64, duration: f64, text_width: f64, stage_width: f64) -> Self {
        Self {
            start,
            duration,
            text_width,
            stage_width,
        }
    }

    /// Pixels per second
    #[must_use]
    pub fn speed(&self) -> f64 {
        (self.stage_width + self.text_width) / self.duration
    }

    /// When the trailing edge has cleared the entry edge
    #[must_use]
    pub fn fully_entered_at(&self) -> f64 {
        self.start + self.text_width / self.speed()
    }

    /// When the trailing edge leaves the far edge
    #[must_use]
    pub fn exits_at(&self) -> f64 {
        self.start + self.duration
    }

    /// When the leading edge touches the far edge
    #[must_use]
    pub fn reaches_far_edge_at(&self) -> f64 {
        self.start + self.stage_width / self.speed()
    }
}

/// Whether `candidate` can follow `prior` in the same lane without touching it
///
/// Two conditions: the candidate may only enter once the prior comment has
/// fully entered, and the candidate's leading edge must not reach the far edge
/// before the prior comment has left it. Since both segments move linearly,
/// checking the two ends is enough to rule out a catch-up anywhere in between.
#[must_use]
pub fn scroll_eligible(prior: &ScrollSegment, candidate: &ScrollSegment) -> bool {
    candidate.start >= prior.fully_entered_at()
        && prior.exits_at() <= candidate.reaches_far_edge_at()
}

/// Whether a fixed comment starting at `candidate_start` can reuse a lane
///
/// The exact end of the prior comment's window counts as free.
#[must_use]
pub fn fixed_eligible(prior_start: f64, candidate_start: f64, duration_still: f64) -> bool {
    candidate_start >= prior_start + duration_still
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f64 = 1920.0;

    #[test]
    fn segment_timeline() {
        let seg = ScrollSegment::new(10.0, 8.0, 80.0, 1920.0);
        assert!((seg.speed() - 250.0).abs() < 1e-9);
        assert!((seg.fully_entered_at() - 10.32).abs() < 1e-9);
        assert!((seg.exits_at() - 18.0).abs() < 1e-9);
        assert!((seg.reaches_far_edge_at() - 17.68).abs() < 1e-9);
    }

    #[test]
    fn simultaneous_entries_collide() {
        let prior = ScrollSegment::new(0.0, 7.0, 25.0, W);
        let candidate = ScrollSegment::new(0.0, 7.0, 50.0, W);
        assert!(!scroll_eligible(&prior, &candidate));
    }

    #[test]
    fn after_exit_is_free() {
        let prior = ScrollSegment::new(0.0, 7.0, 500.0, W);
        let candidate = ScrollSegment::new(7.0, 7.0, 10.0, W);
        assert!(scroll_eligible(&prior, &candidate));
    }

    #[test]
    fn faster_follower_would_catch_up() {
        // short prior moves slowly; a long follower moves fast and overtakes
        let prior = ScrollSegment::new(0.0, 7.0, 20.0, W);
        let candidate = ScrollSegment::new(1.0, 7.0, 1500.0, W);
        assert!(candidate.start >= prior.fully_entered_at());
        assert!(!scroll_eligible(&prior, &candidate));
    }

    #[test]
    fn slower_follower_fits_once_prior_entered() {
        let prior = ScrollSegment::new(0.0, 7.0, 1000.0, W);
        let candidate = ScrollSegment::new(2.5, 7.0, 20.0, W);
        assert!(scroll_eligible(&prior, &candidate));
        let early = ScrollSegment::new(2.0, 7.0, 20.0, W);
        assert!(!scroll_eligible(&prior, &early));
    }

    #[test]
    fn fixed_boundary_is_eligible() {
        assert!(fixed_eligible(0.0, 5.0, 5.0));
        assert!(!fixed_eligible(0.0, 4.99, 5.0));
    }
}
