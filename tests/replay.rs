use famiboy::config::{AppConfig, Cadence};
use famiboy::replay::Replay;
use famiboy::trace::{self, TraceError};
use famiboy_core::host::HostWrite;
use std::fs;
use tempfile::tempdir;

const PULSE_TRACE: &str = "\
# pulse 1, A4, full volume
w FF12 F0
w FF13 D6
w FF14 86
frame
frame 2
w FF26 00
frame
";

#[test]
fn pulse_trace_replays_to_host_writes() {
    let commands = trace::parse(PULSE_TRACE).unwrap();
    let mut replay = Replay::new(&AppConfig::default());
    let frames = replay.run(&commands, None);

    assert_eq!(replay.frames(), 4);
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].to_line(), "frame 0: $4000=BE $4002=FD $4001=0F $4003=F8");
    // Later frames repeat unchanged values and are filtered by the queue; the
    // power-off silence is flushed with the next frame.
    assert_eq!(frames[1].frame, 3);
    assert_eq!(frames[1].writes, vec![HostWrite::new(0x00, 0x30)]);
}

#[test]
fn trailing_writes_are_flushed_at_end_of_trace() {
    let commands = trace::parse("w FF12 F0\nw FF13 D6\nw FF14 86\nframe\nw FF26 00\n").unwrap();
    let mut replay = Replay::new(&AppConfig::default());
    let frames = replay.run(&commands, None);

    assert_eq!(replay.frames(), 1);
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[1].to_line(), "frame 1: $4000=30");
    assert!(replay.apu().sink().is_empty());
}

#[test]
fn non_differential_queue_repeats_every_frame() {
    let commands = trace::parse(PULSE_TRACE).unwrap();
    let cfg = AppConfig {
        differential: false,
        ..AppConfig::default()
    };
    let mut replay = Replay::new(&cfg);
    let frames = replay.run(&commands, None);
    let numbers: Vec<u64> = frames.iter().map(|f| f.frame).collect();
    assert_eq!(numbers, vec![0, 1, 2, 3]);
    assert_eq!(frames[1].to_line(), "frame 1: $4000=BE $4002=FD");
}

#[test]
fn frame_limit_stops_replay() {
    let commands = trace::parse(PULSE_TRACE).unwrap();
    let mut replay = Replay::new(&AppConfig::default());
    let frames = replay.run(&commands, Some(2));
    assert_eq!(replay.frames(), 2);
    assert_eq!(frames.len(), 1);
}

#[test]
fn image_holds_last_value_per_register() {
    let commands = trace::parse(PULSE_TRACE).unwrap();
    let mut replay = Replay::new(&AppConfig::default());
    replay.run(&commands, None);
    let image = replay.image();
    assert_eq!(
        image,
        vec![
            HostWrite::new(0x00, 0x30),
            HostWrite::new(0x01, 0x0F),
            HostWrite::new(0x02, 0xFD),
            HostWrite::new(0x03, 0xF8),
        ]
    );
}

#[test]
fn quarter_tick_config_is_honoured() {
    let commands = trace::parse(PULSE_TRACE).unwrap();
    let cfg = AppConfig {
        cadence: Cadence::QuarterTick,
        ..AppConfig::default()
    };
    let mut replay = Replay::new(&cfg);
    let frames = replay.run(&commands, Some(1));
    assert_eq!(frames[0].writes.len(), 4);
}

#[test]
fn trace_file_loads_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("song.trace");
    fs::write(&path, PULSE_TRACE).unwrap();
    assert_eq!(trace::load(&path).unwrap().len(), 7);
}

#[test]
fn missing_trace_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = trace::load(&dir.path().join("missing.trace")).unwrap_err();
    assert!(matches!(err, TraceError::Io { .. }));
    assert_eq!(err.line(), None);
}
