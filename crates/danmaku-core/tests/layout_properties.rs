//! Property-based tests for the lane layout
//!
//! Uses proptest to check the collision, determinism and row minimality
//! guarantees over generated comment streams.

use danmaku_core::comment::escape_ass_text;
use danmaku_core::layout::{layout, ScrollSegment};
use danmaku_core::{CanvasConfig, Comment, LayoutReport, MotionClass};
use proptest::prelude::*;

const EPS: f64 = 1e-9;

fn arb_motion() -> impl Strategy<Value = MotionClass> {
    prop_oneof![
        Just(MotionClass::ScrollLeft),
        Just(MotionClass::ScrollRight),
        Just(MotionClass::FixedTop),
        Just(MotionClass::FixedBottom),
    ]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9]{1,16}",
        "[a-z]{1,8}\n[a-z]{1,8}",
        "[\u{4e00}-\u{4e80}]{1,10}",
    ]
}

/// Comments sorted by start time, quarter-second resolution
fn arb_comments(max: usize) -> impl Strategy<Value = Vec<Comment>> {
    prop::collection::vec(
        (0..240u32, arb_motion(), prop_oneof![Just(18.0), Just(25.0), Just(36.0)], arb_text()),
        0..max,
    )
    .prop_map(|entries| {
        let mut comments: Vec<Comment> = entries
            .into_iter()
            .map(|(quarter, motion, size, text)| {
                Comment::new(f64::from(quarter) / 4.0, motion, size, &text)
            })
            .collect();
        comments.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        comments
    })
}

fn lane_range(lane: usize, comment: &Comment, lane_height: f64) -> std::ops::Range<usize> {
    let span = ((comment.height / lane_height).ceil() as usize).max(1);
    lane..lane + span
}

fn ranges_overlap(a: &std::ops::Range<usize>, b: &std::ops::Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn lane_assignments(report: &LayoutReport<'_>) -> Vec<(Option<usize>, bool)> {
    report.placed.iter().map(|p| (p.lane, p.overlaid)).collect()
}

fn unescape(escaped: &str) -> String {
    let mut out = String::new();
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('N') => out.push('\n'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

proptest! {
    /// No two comments sharing lanes are on screen together
    #[test]
    fn placed_comments_never_collide(comments in arb_comments(40)) {
        let config = CanvasConfig::new(1920, 1080);
        let report = layout(&config, &comments).unwrap();
        prop_assume!(report.overlaid() == 0);

        let lane_height = config.font_size;
        for (i, earlier) in report.placed.iter().enumerate() {
            for later in &report.placed[i + 1..] {
                if earlier.comment.motion != later.comment.motion {
                    continue;
                }
                let (Some(a), Some(b)) = (earlier.lane, later.lane) else {
                    continue;
                };
                let ra = lane_range(a, earlier.comment, lane_height);
                let rb = lane_range(b, later.comment, lane_height);
                if !ranges_overlap(&ra, &rb) {
                    continue;
                }

                if later.comment.motion.is_fixed() {
                    prop_assert!(later.start + EPS >= earlier.end);
                } else {
                    let prior = ScrollSegment::new(
                        earlier.start,
                        config.duration_scroll,
                        earlier.comment.width,
                        1920.0,
                    );
                    let next = ScrollSegment::new(
                        later.start,
                        config.duration_scroll,
                        later.comment.width,
                        1920.0,
                    );
                    prop_assert!(next.start + EPS >= prior.fully_entered_at());
                    prop_assert!(prior.exits_at() <= next.reaches_far_edge_at() + EPS);
                }
            }
        }
    }

    /// Laying out the same input twice gives the same lanes
    #[test]
    fn layout_is_deterministic(comments in arb_comments(60)) {
        let config = CanvasConfig::new(1280, 360);
        let first = layout(&config, &comments).unwrap();
        let second = layout(&config, &comments).unwrap();
        prop_assert_eq!(lane_assignments(&first), lane_assignments(&second));
        prop_assert_eq!(first.dropped, second.dropped);
    }

    /// Comments that are never on screen together all use the top lane
    #[test]
    fn disjoint_comments_share_lane_zero(
        motion in arb_motion(),
        gaps in prop::collection::vec(0..20u32, 1..30),
        text in arb_text(),
    ) {
        let config = CanvasConfig::new(1920, 1080);
        let duration = if motion.is_fixed() {
            config.duration_still
        } else {
            config.duration_scroll
        };
        let mut start = 0.0;
        let mut comments = Vec::new();
        for gap in gaps {
            comments.push(Comment::new(start, motion, 25.0, &text));
            start += duration + f64::from(gap) / 4.0;
        }
        let report = layout(&config, &comments).unwrap();
        prop_assert_eq!(report.placed.len(), comments.len());
        for placed in &report.placed {
            prop_assert_eq!(placed.lane, Some(0));
        }
    }

    /// Escaped text decodes back to the original characters
    #[test]
    fn escaping_round_trips(
        lines in prop::collection::vec("[a-z\\\\{}]{1,12}", 1..4),
    ) {
        let text = lines.join("\n");
        let escaped = escape_ass_text(&text);
        prop_assert!(!escaped.contains('\n'));
        prop_assert_eq!(unescape(&escaped), text);
    }
}
