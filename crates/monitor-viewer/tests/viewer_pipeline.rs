//! Integration tests for the viewer pipeline.
//!
//! These tests run the application layer end-to-end against the in-memory
//! frame store: keyboard bridge + refresh + scheduler, with scripted input and
//! a recording sink standing in for the OS.

use std::sync::Arc;
use std::time::Duration;

use monitor_core::{
    ColorTable, FrameDecoder, FrameLayout, HostKey, JoystickEncoder, JoystickPort,
    KeyTransition, KeyboardMatrixEncoder, Transition,
};
use monitor_viewer::application::frame_store::FrameStore;
use monitor_viewer::application::keyboard_bridge::KeyboardBridgeUseCase;
use monitor_viewer::application::refresh_frame::RefreshFrameUseCase;
use monitor_viewer::application::scheduler::{Cadence, RedrawScheduler};
use monitor_viewer::infrastructure::input::line_protocol::parse_command;
use monitor_viewer::infrastructure::input::{forward_lines, ChannelInputSource};
use monitor_viewer::infrastructure::input::mock::ScriptedInputSource;
use monitor_viewer::infrastructure::render::mock::RecordingSink;
use monitor_viewer::infrastructure::shm::memory::MemoryFrameStore;
use tokio::sync::{mpsc, watch};

struct Viewer {
    store: Arc<MemoryFrameStore>,
    layout: FrameLayout,
    keyboard: KeyboardBridgeUseCase,
    refresh: RefreshFrameUseCase,
}

fn viewer(layout: FrameLayout) -> Viewer {
    let store = Arc::new(MemoryFrameStore::zeroed(layout.full_segment_len()));
    let shared = Arc::clone(&store) as Arc<dyn FrameStore>;
    Viewer {
        keyboard: KeyboardBridgeUseCase::new(
            Arc::clone(&shared),
            layout,
            KeyboardMatrixEncoder::default(),
        ),
        refresh: RefreshFrameUseCase::new(shared, FrameDecoder::new(layout, ColorTable::c64())),
        store,
        layout,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_zeroed_default_segment_renders_all_black() {
    // Arrange
    let mut v = viewer(FrameLayout::default());
    let mut sink = RecordingSink::new();

    // Act
    v.refresh.refresh(&mut sink).unwrap();

    // Assert
    let frame = sink.last().expect("one frame presented");
    assert_eq!((frame.width(), frame.height()), (402, 292));
    let black = ColorTable::c64().lookup(0);
    assert!(frame.cells().all(|&c| c == black));
}

#[test]
fn test_delete_key_sets_lowest_bits_at_emulator_offsets() {
    // Arrange
    let mut v = viewer(FrameLayout::default());

    // Act
    v.keyboard.apply_event(Transition::Down, HostKey::Delete).unwrap();

    // Assert
    assert_eq!(v.store.byte(117_384), 0b0000_0001);
    assert_eq!(v.store.byte(117_385), 0b0000_0001);
    assert!(v.store.bytes()[..117_384].iter().all(|&b| b == 0));

    v.keyboard.apply_event(Transition::Up, HostKey::Delete).unwrap();
    assert_eq!(v.store.byte(117_384), 0);
    assert_eq!(v.store.byte(117_385), 0);
}

#[test]
fn test_emulator_write_shows_up_in_next_redraw_only_on_divisor_tick() {
    // Arrange
    let mut v = viewer(FrameLayout::new(8, 4).unwrap());
    let mut input = ScriptedInputSource::new();
    let mut sink = RecordingSink::new();
    let mut scheduler = RedrawScheduler::new(Cadence {
        tick: Duration::from_millis(1),
        redraw_divisor: 10,
    })
    .unwrap();

    // Act: nine quiet ticks, then the emulator paints pixel (3, 2), then one more
    for _ in 0..9 {
        scheduler
            .step(&mut input, &mut v.keyboard, &mut v.refresh, &mut sink)
            .unwrap();
    }
    assert!(sink.frames.is_empty());
    v.store.set_byte(2 * 8 + 3, 0xF5);
    scheduler
        .step(&mut input, &mut v.keyboard, &mut v.refresh, &mut sink)
        .unwrap();

    // Assert: upper nibble ignored
    assert_eq!(sink.frames.len(), 1);
    assert_eq!(sink.frames[0][3][2], ColorTable::c64().lookup(5));
}

#[test]
fn test_typed_commands_drive_status_bytes() {
    // Arrange
    let mut v = viewer(FrameLayout::new(4, 4).unwrap());
    let mut input = ScriptedInputSource::new();
    let mut batch = parse_command("down LeftShift").unwrap();
    batch.extend(parse_command("down KeyW").unwrap());
    input.push_batch(batch);
    input.push_batch(parse_command("up LeftShift").unwrap());
    let mut sink = RecordingSink::new();
    let mut scheduler = RedrawScheduler::new(Cadence::default()).unwrap();

    // Act / Assert: shift (1,7) and W (1,1) share row 1
    scheduler
        .step(&mut input, &mut v.keyboard, &mut v.refresh, &mut sink)
        .unwrap();
    assert_eq!(v.store.byte(v.layout.row_status_offset()), 0b0000_0010);
    assert_eq!(v.store.byte(v.layout.col_status_offset()), 0b1000_0010);

    scheduler
        .step(&mut input, &mut v.keyboard, &mut v.refresh, &mut sink)
        .unwrap();
    assert_eq!(v.store.byte(v.layout.row_status_offset()), 0b0000_0010);
    assert_eq!(v.store.byte(v.layout.col_status_offset()), 0b0000_0010);
}

#[test]
fn test_tapped_key_stays_visible_for_one_tick() {
    // Arrange
    let mut v = viewer(FrameLayout::new(4, 4).unwrap());
    let (tx, rx) = mpsc::unbounded_channel();
    let mut input = ChannelInputSource::new(rx);
    forward_lines(&b"tap Return\n"[..], &tx);
    let mut sink = RecordingSink::new();
    let mut scheduler = RedrawScheduler::new(Cadence::default()).unwrap();
    let col = v.layout.col_status_offset();
    let row = v.layout.row_status_offset();

    // Act: the tick that applies the tap
    scheduler
        .step(&mut input, &mut v.keyboard, &mut v.refresh, &mut sink)
        .unwrap();

    // Assert: Return (0, 1) is still held when the tick ends
    assert_eq!(v.store.byte(row), 0b0000_0001);
    assert_eq!(v.store.byte(col), 0b0000_0010);

    scheduler
        .step(&mut input, &mut v.keyboard, &mut v.refresh, &mut sink)
        .unwrap();
    assert_eq!(v.store.byte(row), 0);
    assert_eq!(v.store.byte(col), 0);
    assert_eq!(v.store.write_log(), vec![col, row, col, row]);
}

#[test]
fn test_joystick_and_keyboard_share_segment_without_interference() {
    // Arrange
    let layout = FrameLayout::new(2, 2).unwrap();
    let mut v = viewer(layout);
    let mut keyboard = KeyboardBridgeUseCase::new(
        Arc::clone(&v.store) as Arc<dyn FrameStore>,
        layout,
        KeyboardMatrixEncoder::default(),
    )
    .with_joystick(JoystickEncoder::new(JoystickPort::One));

    // Act
    keyboard.apply_event(Transition::Down, HostKey::Keypad6).unwrap();
    keyboard.apply_event(Transition::Down, HostKey::Return).unwrap();

    // Assert
    assert_eq!(v.store.byte(layout.joystick_offset(1).unwrap()), 0b0000_1000);
    assert_eq!(v.store.byte(layout.joystick_offset(2).unwrap()), 0);
    assert_eq!(v.store.byte(layout.row_status_offset()), 0b0000_0001);

    keyboard.release_all().unwrap();
    assert_eq!(v.store.byte(layout.joystick_offset(1).unwrap()), 0);
    assert_eq!(v.store.byte(layout.col_status_offset()), 0);
    v.refresh.decode_frame().unwrap();
}

#[tokio::test]
async fn test_run_applies_input_and_stops_on_shutdown() {
    // Arrange
    let mut v = viewer(FrameLayout::new(4, 4).unwrap());
    let mut input = ScriptedInputSource::new();
    input.push_batch(vec![KeyTransition::down(HostKey::Escape)]);
    let mut sink = RecordingSink::new();
    let mut scheduler = RedrawScheduler::new(Cadence {
        tick: Duration::from_millis(2),
        redraw_divisor: 2,
    })
    .unwrap();
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(40)).await;
        let _ = tx.send(true);
    });

    // Act
    let summary = scheduler
        .run(&mut input, &mut v.keyboard, &mut v.refresh, &mut sink, rx)
        .await
        .unwrap();

    // Assert: Escape is (7, 7)
    assert_eq!(summary.events, 1);
    assert_eq!(summary.frames as usize, sink.frames.len());
    assert!(input.polls() >= 1);
    assert_eq!(v.store.byte(v.layout.col_status_offset()), 0x80);
    assert_eq!(v.store.byte(v.layout.row_status_offset()), 0x80);
}

#[tokio::test]
async fn test_sink_failure_ends_run_with_error() {
    let mut v = viewer(FrameLayout::new(2, 2).unwrap());
    let mut input = ScriptedInputSource::new();
    let mut sink = RecordingSink {
        fail_next: true,
        ..RecordingSink::default()
    };
    let mut scheduler = RedrawScheduler::new(Cadence {
        tick: Duration::from_millis(1),
        redraw_divisor: 1,
    })
    .unwrap();
    let (_tx, rx) = watch::channel(false);

    let result = scheduler
        .run(&mut input, &mut v.keyboard, &mut v.refresh, &mut sink, rx)
        .await;

    assert!(result.is_err());
    assert!(sink.frames.is_empty());
}
