use std::path::Path;
use std::process::{Command, Output};

fn danmaku_ass(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_danmaku-ass"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn cli_danmaku_writes_ass_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("danmaku.xml");
    let output = dir.path().join("danmaku.ass");
    std::fs::write(
        &input,
        r#"<?xml version="1.0" encoding="UTF-8"?><i>
<d p="0.5,1,25,16777215,0,0,u,1">first</d>
<d p="0.5,1,25,16777215,0,0,u,2">second</d>
<d p="1,8,25,16777215,0,0,u,3">script</d>
<d p="2,1,25,16777215,0,0,u,4">spoiler ahead</d>
</i>"#,
    )
    .unwrap();

    let out = danmaku_ass(&[
        "danmaku",
        "--in",
        arg(&input),
        "--out",
        arg(&output),
        "--width",
        "1280",
        "--height",
        "720",
        "--filter",
        "spoiler",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("2 events, 1 skipped, 0 dropped, 0 overlaid, 1 filtered"));
    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("PlayResX: 1280\n"));
    assert_eq!(written.matches("Dialogue:").count(), 2);
}

#[test]
fn cli_danmaku_reads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("danmaku.xml");
    let output = dir.path().join("danmaku.ass");
    let config = dir.path().join("canvas.toml");
    std::fs::write(&input, r#"<i><d p="0,5,25,16777215,0">top</d></i>"#).unwrap();
    std::fs::write(
        &config,
        "width = 800\nheight = 600\nfont_name = \"Arial\"\nopacity = 0.5\n",
    )
    .unwrap();

    let out = danmaku_ass(&[
        "danmaku",
        "--in",
        arg(&input),
        "--out",
        arg(&output),
        "--config",
        arg(&config),
        "--width",
        "1024",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("PlayResX: 1024\nPlayResY: 600\n"));
    assert!(written.contains("Style: Danmaku,Arial,25,&H7FFFFFFF,"));
    assert!(written.contains(r"{\an8\pos(512, 0)}top"));
}

#[test]
fn cli_danmaku_requires_stage_size() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("danmaku.xml");
    std::fs::write(&input, "<i></i>").unwrap();

    let out = danmaku_ass(&[
        "danmaku",
        "--in",
        arg(&input),
        "--out",
        arg(&dir.path().join("out.ass")),
    ]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("stage size is required"));
}

#[test]
fn cli_caption_converts_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("caption.json");
    let output = dir.path().join("caption.ass");
    std::fs::write(
        &input,
        r#"{"body":[{"from":1.0,"to":2.0,"content":"hello"}]}"#,
    )
    .unwrap();

    let out = danmaku_ass(&["caption", "--in", arg(&input), "--out", arg(&output)]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("1 events, 0 skipped"));
    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,hello"));
}

#[test]
fn cli_verbose_logs_written_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("subs.srt");
    let output = dir.path().join("subs.ass");
    std::fs::write(&input, "1\n00:00:01,000 --> 00:00:02,000\nhello\n").unwrap();

    let out = danmaku_ass(&["--verbose", "srt", "--in", arg(&input), "--out", arg(&output)]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stderr).contains("ass written"));

    let quiet = danmaku_ass(&["srt", "--in", arg(&input), "--out", arg(&output)]);
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("ass written"));
}
