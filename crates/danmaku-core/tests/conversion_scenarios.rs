//! End-to-end conversion scenarios
//!
//! Drives [`Danmaku2Ass`] from raw records or XML documents and checks the
//! emitted `Dialogue:` lines.

use danmaku_core::layout::DropReason;
use danmaku_core::{CanvasConfig, Danmaku2Ass, RawComment};
use pretty_assertions::assert_eq;

fn dialogue_lines(document: &str) -> Vec<&str> {
    document
        .lines()
        .filter(|line| line.starts_with("Dialogue:"))
        .collect()
}

fn converter(width: u32, height: u32) -> Danmaku2Ass {
    Danmaku2Ass::new(CanvasConfig::new(width, height)).unwrap()
}

#[test]
fn simultaneous_scrolls_stack_then_reuse_top_lane() {
    let entries = vec![
        RawComment::new(0.0, 1, "A"),
        RawComment::new(0.0, 1, "BB"),
        RawComment::new(0.0, 1, "CCC"),
        RawComment::new(8.0, 1, "D"),
    ];
    let conversion = converter(1280, 720).convert_raw(&entries).unwrap();
    assert_eq!(
        dialogue_lines(&conversion.document),
        vec![
            r"Dialogue: 2,0:00:00.00,0:00:07.00,Danmaku,,0,0,0,,{\move(1280, 0, -25, 0)}A",
            r"Dialogue: 2,0:00:00.00,0:00:07.00,Danmaku,,0,0,0,,{\move(1280, 25, -50, 25)}BB",
            r"Dialogue: 2,0:00:00.00,0:00:07.00,Danmaku,,0,0,0,,{\move(1280, 50, -75, 50)}CCC",
            r"Dialogue: 2,0:00:08.00,0:00:15.00,Danmaku,,0,0,0,,{\move(1280, 0, -25, 0)}D",
        ]
    );
}

#[test]
fn fixed_bottom_lane_frees_exactly_at_still_duration() {
    let entries = vec![
        RawComment::new(0.0, 4, "X"),
        RawComment::new(4.99, 4, "Z"),
        RawComment::new(5.0, 4, "Y"),
    ];
    let conversion = converter(1280, 720).convert_raw(&entries).unwrap();
    assert_eq!(
        dialogue_lines(&conversion.document),
        vec![
            r"Dialogue: 2,0:00:00.00,0:00:05.00,Danmaku,,0,0,0,,{\an2\pos(640, 720)}X",
            r"Dialogue: 2,0:00:04.99,0:00:09.99,Danmaku,,0,0,0,,{\an2\pos(640, 695)}Z",
            r"Dialogue: 2,0:00:05.00,0:00:10.00,Danmaku,,0,0,0,,{\an2\pos(640, 720)}Y",
        ]
    );
}

#[test]
fn malformed_entries_are_skipped_and_counted() {
    let mut entries: Vec<RawComment> = (0..10)
        .map(|i| RawComment::new(f64::from(i), 1, &format!("comment {i}")))
        .collect();
    entries[3].time = None;
    entries[7].time = None;

    let conversion = converter(1920, 1080).convert_raw(&entries).unwrap();
    assert_eq!(dialogue_lines(&conversion.document).len(), 8);
    assert_eq!(conversion.summary.events, 8);
    assert_eq!(conversion.summary.warning_count(), 2);
    let indices: Vec<usize> = conversion.summary.skipped.iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![3, 7]);
}

#[test]
fn empty_input_yields_header_only() {
    let conversion = converter(1920, 1080).convert_raw(&[]).unwrap();
    assert!(conversion.document.starts_with("[Script Info]\n"));
    assert!(conversion.document.contains("[V4+ Styles]\n"));
    assert!(conversion.document.contains("[Events]\n"));
    assert!(dialogue_lines(&conversion.document).is_empty());
    assert_eq!(conversion.summary.events, 0);
    assert_eq!(conversion.summary.warning_count(), 0);
}

#[test]
fn override_characters_are_escaped_in_output() {
    let xml = r#"<i><d p="0,1,25,16777215,0">a{b}\c/nd</d></i>"#;
    let conversion = converter(1280, 720).convert_xml(xml).unwrap();
    assert_eq!(
        dialogue_lines(&conversion.document),
        vec![r"Dialogue: 2,0:00:00.00,0:00:07.00,Danmaku,,0,0,0,,{\move(1280, 0, -150, 0)}a\{b\}\\c\Nd"]
    );
}

#[test]
fn xml_document_end_to_end() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<i>
  <chatserver>chat.example</chatserver>
  <d p="2,5,25,16777215,1500000000,0,abc,1">&lt;3 &amp; more</d>
  <d p="1,8,25,0,1500000000,0,abc,2">scripted</d>
  <d p="3,9,25,0,1500000000,0,abc,3">unknown</d>
</i>"#;
    let conversion = converter(1920, 1080).convert_xml(xml).unwrap();
    assert_eq!(
        dialogue_lines(&conversion.document),
        vec![r"Dialogue: 2,0:00:02.00,0:00:07.00,Danmaku,,0,0,0,,{\an8\pos(960, 0)}<3 & more"]
    );
    assert_eq!(conversion.summary.skipped.len(), 2);
}

#[test]
fn reduced_mode_drops_instead_of_overlaying() {
    let entries = vec![
        RawComment::new(0.0, 1, "one"),
        RawComment::new(0.0, 1, "two"),
        RawComment::new(0.0, 1, "three"),
    ];

    let crowded = converter(640, 50).convert_raw(&entries).unwrap();
    assert_eq!(crowded.summary.events, 3);
    assert_eq!(crowded.summary.overlaid, 1);
    assert!(crowded.summary.dropped.is_empty());

    let reduced = Danmaku2Ass::new(CanvasConfig::new(640, 50).with_reduced(true))
        .unwrap()
        .convert_raw(&entries)
        .unwrap();
    assert_eq!(reduced.summary.events, 2);
    assert_eq!(reduced.summary.dropped.len(), 1);
    assert_eq!(reduced.summary.dropped[0].reason, DropReason::CapacityExhausted);
}

#[test]
fn reserve_blank_shrinks_usable_height() {
    let config = CanvasConfig::new(1280, 720).with_reserve_blank(100);
    let entries = vec![RawComment::new(0.0, 4, "lifted")];
    let conversion = Danmaku2Ass::new(config).unwrap().convert_raw(&entries).unwrap();
    assert_eq!(
        dialogue_lines(&conversion.document),
        vec![r"Dialogue: 2,0:00:00.00,0:00:05.00,Danmaku,,0,0,0,,{\an2\pos(640, 620)}lifted"]
    );
}

#[test]
fn stage_shorter_than_a_lane_still_converts() {
    let short = converter(640, 20);
    let empty = short.convert_raw(&[]).unwrap();
    assert!(dialogue_lines(&empty.document).is_empty());
    assert_eq!(empty.summary.events, 0);

    let entries = vec![RawComment::new(0.0, 1, "A"), RawComment::new(0.0, 1, "B")];
    let conversion = short.convert_raw(&entries).unwrap();
    assert_eq!(
        dialogue_lines(&conversion.document),
        vec![
            r"Dialogue: 2,0:00:00.00,0:00:07.00,Danmaku,,0,0,0,,{\move(640, 0, -25, 0)}A",
            r"Dialogue: 2,0:00:00.00,0:00:07.00,Danmaku,,0,0,0,,{\move(640, 0, -25, 0)}B",
        ]
    );
    assert_eq!(conversion.summary.overlaid, 1);
}

#[test]
fn oversized_motion_timing_is_clamped() {
    let entries = vec![RawComment::new(
        0.0,
        7,
        "[0,0,\"1\",1,\"x\",0,0,10,10,9223372036854775807,1]",
    )];
    let conversion = converter(1280, 720).convert_raw(&entries).unwrap();
    assert_eq!(conversion.summary.events, 1);
    let lines = dialogue_lines(&conversion.document);
    assert!(lines[0].contains(", 1, 86400001)"), "{}", lines[0]);
}
