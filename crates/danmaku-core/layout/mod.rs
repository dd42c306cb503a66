//! Greedy lane layout for danmaku
//!
//! The engine walks comments in ascending start time and puts each one in the
//! topmost run of lanes (nearest its anchoring edge) where it does not collide
//! with anything still on screen. Already placed comments are never moved.
//!
//! # Precondition
//!
//! Input must be sorted ascending by `start_time`, as produced by
//! [`CommentParser`](crate::comment::CommentParser). Lanes only remember their
//! most recent occupant, so unsorted input silently breaks the collision
//! guarantee. Debug builds assert the order.

pub mod geometry;
pub mod lanes;
pub mod positioned;

pub use geometry::{fixed_eligible, scroll_eligible, ScrollSegment};
pub use lanes::{LaneBank, Occupant};
pub use positioned::{convert_flash_rotation, FlashProjection, ResolvedPath, ZoomFactor};

use crate::comment::escape::is_blank;
use crate::comment::{Comment, MotionClass};
use crate::config::CanvasConfig;
use crate::utils::Result;
use core::fmt;

/// Which edge a fixed comment is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
}

/// Pixel path of a placed comment
#[derive(Debug, Clone, PartialEq)]
pub enum Trajectory {
    /// Linear horizontal move of the text's left edge at a constant top `y`
    Scroll { from_x: f64, to_x: f64, y: f64 },
    /// Static text centred on `x`; `y` is the top (top edge) or bottom
    /// (bottom edge) of the block
    Anchored { x: f64, y: f64, edge: Edge },
    /// Explicit path of a positioned comment
    Positioned(ResolvedPath),
}

/// A comment with its lane and screen-time window
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedComment<'a> {
    pub comment: &'a Comment,
    /// First lane of the run, `None` for positioned comments
    pub lane: Option<usize>,
    pub start: f64,
    pub end: f64,
    pub trajectory: Trajectory,
    /// Placed over other comments because every lane was busy
    pub overlaid: bool,
}

/// Why a comment was not placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Screen time is zero, negative or not a number
    NonPositiveDuration,
    /// Nothing visible would be drawn
    EmptyText,
    /// Every lane was busy and overlaying is disabled
    CapacityExhausted,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NonPositiveDuration => "non-positive duration",
            Self::EmptyText => "empty text",
            Self::CapacityExhausted => "no free lane",
        })
    }
}

/// A comment the engine declined to place
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedComment {
    /// Position in the sorted comment list
    pub index: usize,
    pub start_time: f64,
    pub reason: DropReason,
}

/// Result of laying out a whole comment list
#[derive(Debug, Clone, Default)]
pub struct LayoutReport<'a> {
    pub placed: Vec<PlacedComment<'a>>,
    pub dropped: Vec<DroppedComment>,
}

impl LayoutReport<'_> {
    /// Number of comments that had to be drawn over others
    #[must_use]
    pub fn overlaid(&self) -> usize {
        self.placed.iter().filter(|p| p.overlaid).count()
    }
}

/// Outcome of placing a single comment
#[derive(Debug, Clone, PartialEq)]
pub enum Placement<'a> {
    Placed(PlacedComment<'a>),
    Dropped(DropReason),
}

/// Lane state for one conversion
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    stage_width: f64,
    stage_height: f64,
    reserve_blank: f64,
    lane_height: f64,
    duration_scroll: f64,
    duration_still: f64,
    reduced: bool,
    banks: [LaneBank; 4],
    next_id: usize,
    last_start: f64,
}

impl LayoutEngine {
    /// Create an engine with empty lanes for `config`
    ///
    /// # Errors
    ///
    /// Returns the validation error of `config`.
    ///
    /// A stage shorter than one lane still gets a single lane, so every
    /// comment there is overlaid (or dropped in reduced mode).
    pub fn new(config: &CanvasConfig) -> Result<Self> {
        config.validate()?;
        let lane_height = config.font_size;
        let lane_count =
            ((f64::from(config.usable_height()) / lane_height).floor() as usize).max(1);

        Ok(Self {
            stage_width: f64::from(config.width),
            stage_height: f64::from(config.height),
            reserve_blank: f64::from(config.reserve_blank),
            lane_height,
            duration_scroll: config.duration_scroll,
            duration_still: config.duration_still,
            reduced: config.reduced,
            banks: std::array::from_fn(|_| LaneBank::new(lane_count)),
            next_id: 0,
            last_start: f64::NEG_INFINITY,
        })
    }

    /// Number of lanes in every bank
    #[must_use]
    pub fn lane_count(&self) -> usize {
        self.banks[0].len()
    }

    /// Pixel height of one lane
    #[must_use]
    pub const fn lane_height(&self) -> f64 {
        self.lane_height
    }

    /// Place the next comment in start-time order
    pub fn place<'a>(&mut self, comment: &'a Comment) -> Placement<'a> {
        debug_assert!(
            comment.start_time >= self.last_start,
            "comments must be placed in ascending start time"
        );
        self.last_start = comment.start_time;

        // a special comment without a path travels like a plain scroll
        let duration = match &comment.positioned {
            Some(path) if comment.motion == MotionClass::Special => path.lifetime,
            _ if comment.motion.is_fixed() => self.duration_still,
            _ => self.duration_scroll,
        };
        if !duration.is_finite() || duration <= 0.0 {
            return Placement::Dropped(DropReason::NonPositiveDuration);
        }
        if is_blank(&comment.text) {
            return Placement::Dropped(DropReason::EmptyText);
        }

        let start = comment.start_time;
        let end = start + duration;

        if let (MotionClass::Special, Some(path)) = (comment.motion, &comment.positioned) {
            let resolved = ResolvedPath::resolve(
                path,
                comment.font_size,
                (self.stage_width, self.stage_height),
            );
            return Placement::Placed(PlacedComment {
                comment,
                lane: None,
                start,
                end,
                trajectory: Trajectory::Positioned(resolved),
                overlaid: false,
            });
        }

        let bank_index = bank_index(comment.motion);
        let span = ((comment.height / self.lane_height).ceil() as usize).max(1);
        let found = {
            let bank = &self.banks[bank_index];
            if comment.motion.is_fixed() {
                bank.find_run(span, |occupant| {
                    fixed_eligible(occupant.start, start, self.duration_still)
                })
            } else {
                let candidate =
                    ScrollSegment::new(start, duration, comment.width, self.stage_width);
                bank.find_run(span, |occupant| {
                    let prior = ScrollSegment::new(
                        occupant.start,
                        duration,
                        occupant.width,
                        self.stage_width,
                    );
                    scroll_eligible(&prior, &candidate)
                })
            }
        };

        let (lane, overlaid) = match found {
            Some(lane) => (lane, false),
            None if self.reduced => {
                return Placement::Dropped(DropReason::CapacityExhausted);
            }
            None => {
                let lane = self.banks[bank_index].fallback_lane(span);
                tracing::debug!(
                    lane,
                    start,
                    motion = %comment.motion,
                    "all lanes busy, overlaying comment"
                );
                (lane, true)
            }
        };

        let occupant = Occupant {
            id: self.next_id,
            start,
            width: comment.width,
        };
        self.next_id += 1;
        self.banks[bank_index].mark(lane, span, occupant);

        Placement::Placed(PlacedComment {
            comment,
            lane: Some(lane),
            start,
            end,
            trajectory: self.trajectory(comment, lane),
            overlaid,
        })
    }

    fn trajectory(&self, comment: &Comment, lane: usize) -> Trajectory {
        let offset = lane as f64 * self.lane_height;
        let tail = -comment.width.ceil();
        match comment.motion {
            MotionClass::FixedTop => Trajectory::Anchored {
                x: self.stage_width / 2.0,
                y: offset,
                edge: Edge::Top,
            },
            MotionClass::FixedBottom => Trajectory::Anchored {
                x: self.stage_width / 2.0,
                y: self.stage_height - self.reserve_blank - offset,
                edge: Edge::Bottom,
            },
            MotionClass::ScrollRight => Trajectory::Scroll {
                from_x: tail,
                to_x: self.stage_width,
                y: offset,
            },
            MotionClass::ScrollLeft | MotionClass::Special => Trajectory::Scroll {
                from_x: self.stage_width,
                to_x: tail,
                y: offset,
            },
        }
    }
}

const fn bank_index(motion: MotionClass) -> usize {
    match motion {
        MotionClass::ScrollLeft | MotionClass::Special => 0,
        MotionClass::ScrollRight => 1,
        MotionClass::FixedTop => 2,
        MotionClass::FixedBottom => 3,
    }
}

/// Lay out a sorted comment list on a fresh engine
///
/// # Errors
///
/// Fails only when `config` is invalid; problems with single comments are
/// reported in [`LayoutReport::dropped`].
#[tracing::instrument(level = "debug", skip_all, fields(comments = comments.len()))]
pub fn layout<'a>(config: &CanvasConfig, comments: &'a [Comment]) -> Result<LayoutReport<'a>> {
    let mut engine = LayoutEngine::new(config)?;
    let mut report = LayoutReport::default();
    for (index, comment) in comments.iter().enumerate() {
        match engine.place(comment) {
            Placement::Placed(placed) => report.placed.push(placed),
            Placement::Dropped(reason) => {
                tracing::warn!(index, start = comment.start_time, %reason, "dropping comment");
                report.dropped.push(DroppedComment {
                    index,
                    start_time: comment.start_time,
                    reason,
                });
            }
        }
    }
    Ok(report)
}
