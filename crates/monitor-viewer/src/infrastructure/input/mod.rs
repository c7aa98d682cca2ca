//! Input sources: where key transitions come from.
//!
//! The scheduler polls an [`InputSource`] once per tick and must never block,
//! so real input is read on its own thread and forwarded over an unbounded
//! channel.  [`ChannelInputSource`] is the receiving end; it drains whatever
//! has arrived with `try_recv`.
//!
//! ```text
//! stdin ──► reader thread (forward_lines) ──► mpsc ──► ChannelInputSource::poll
//! ```

pub mod line_protocol;
pub mod mock;

use std::collections::{BTreeSet, VecDeque};
use std::io::{self, BufRead};
use std::thread;

use monitor_core::{KeyTransition, Transition};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, info, trace, warn};

use crate::application::scheduler::InputSource;
use line_protocol::parse_command;

/// Drains key transitions forwarded from a reader thread.
///
/// A key released in the same poll it was pressed in (a `tap`, or a fast
/// typist) keeps its release queued until the next poll, so every press is
/// visible in the status bytes for at least one tick.  Later transitions wait
/// behind it to keep the order.
pub struct ChannelInputSource {
    rx: mpsc::UnboundedReceiver<KeyTransition>,
    pending: VecDeque<KeyTransition>,
    closed: bool,
}

impl ChannelInputSource {
    pub fn new(rx: mpsc::UnboundedReceiver<KeyTransition>) -> Self {
        Self {
            rx,
            pending: VecDeque::new(),
            closed: false,
        }
    }

    /// `true` once every sender has been dropped and the queue is empty.
    pub fn is_closed(&self) -> bool {
        self.closed && self.pending.is_empty()
    }

    fn drain_channel(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.pending.push_back(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.closed {
                        info!("input closed; display keeps running");
                        self.closed = true;
                    }
                    break;
                }
            }
        }
    }
}

impl InputSource for ChannelInputSource {
    fn poll(&mut self) -> Vec<KeyTransition> {
        self.drain_channel();

        let mut events = Vec::new();
        let mut pressed = BTreeSet::new();
        while let Some(&event) = self.pending.front() {
            match event.transition {
                Transition::Up if pressed.contains(&event.key) => {
                    trace!(key = %event.key, "release held until next tick");
                    break;
                }
                Transition::Down => {
                    pressed.insert(event.key);
                }
                Transition::Up => {}
            }
            events.push(event);
            self.pending.pop_front();
        }
        events
    }
}

/// Parses protocol lines from `reader` and forwards the resulting transitions
/// to `tx` until end of input, a read error, or the receiver being dropped.
///
/// Malformed lines are logged and skipped.  Returns the number of transitions
/// forwarded.
pub fn forward_lines<R: BufRead>(reader: R, tx: &mpsc::UnboundedSender<KeyTransition>) -> usize {
    let mut forwarded = 0;
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "input read failed; stopping reader");
                break;
            }
        };

        match parse_command(&line) {
            Ok(events) => {
                for event in events {
                    if tx.send(event).is_err() {
                        return forwarded;
                    }
                    forwarded += 1;
                }
            }
            Err(e) => warn!(line = %line.trim(), error = %e, "ignoring input line"),
        }
    }
    debug!(forwarded, "line reader finished");
    forwarded
}

/// Spawns a reader thread on the process's standard input.
///
/// The read blocks and cannot be cancelled, so it runs on a detached thread
/// outside the runtime.
///
/// # Errors
///
/// Returns the OS error if the thread cannot be spawned.
pub fn spawn_stdin_reader(
    tx: mpsc::UnboundedSender<KeyTransition>,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            forward_lines(io::stdin().lock(), &tx);
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use monitor_core::HostKey;

    #[test]
    fn test_forward_lines_sends_valid_lines_and_skips_bad_ones() {
        // Arrange
        let script: &[u8] = b"down A\nbogus line\ntap Return\n\nup A\n";
        let (tx, rx) = mpsc::unbounded_channel();
        let mut source = ChannelInputSource::new(rx);

        // Act
        let forwarded = forward_lines(script, &tx);
        let first = source.poll();
        let second = source.poll();

        // Assert: the tap's release waits one poll
        assert_eq!(forwarded, 4);
        assert_eq!(
            first,
            vec![
                KeyTransition::down(HostKey::KeyA),
                KeyTransition::down(HostKey::Return),
            ]
        );
        assert_eq!(
            second,
            vec![
                KeyTransition::up(HostKey::Return),
                KeyTransition::up(HostKey::KeyA),
            ]
        );
    }

    #[test]
    fn test_forward_lines_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        assert_eq!(forward_lines(&b"down A\ndown B\n"[..], &tx), 0);
    }

    #[test]
    fn test_release_of_key_pressed_earlier_passes_in_same_poll() {
        // Arrange
        let (tx, rx) = mpsc::unbounded_channel();
        let mut source = ChannelInputSource::new(rx);
        tx.send(KeyTransition::down(HostKey::KeyQ)).unwrap();
        source.poll();

        // Act
        tx.send(KeyTransition::up(HostKey::KeyQ)).unwrap();
        tx.send(KeyTransition::down(HostKey::KeyW)).unwrap();

        // Assert
        assert_eq!(
            source.poll(),
            vec![
                KeyTransition::up(HostKey::KeyQ),
                KeyTransition::down(HostKey::KeyW),
            ]
        );
    }

    #[test]
    fn test_queued_release_keeps_later_events_in_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut source = ChannelInputSource::new(rx);
        for line in ["tap Space", "tap Space"] {
            for event in line_protocol::parse_command(line).unwrap() {
                tx.send(event).unwrap();
            }
        }
        drop(tx);

        let down = KeyTransition::down(HostKey::Space);
        let up = KeyTransition::up(HostKey::Space);
        assert_eq!(source.poll(), vec![down]);
        assert!(!source.is_closed());
        assert_eq!(source.poll(), vec![up, down]);
        assert_eq!(source.poll(), vec![up]);
        assert!(source.is_closed());
    }

    #[test]
    fn test_poll_is_empty_when_nothing_pending() {
        let (_tx, rx) = mpsc::unbounded_channel();
        let mut source = ChannelInputSource::new(rx);
        assert!(source.poll().is_empty());
        assert!(!source.is_closed());
    }

    #[test]
    fn test_poll_drains_then_reports_closed() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut source = ChannelInputSource::new(rx);
        tx.send(KeyTransition::down(HostKey::Space)).unwrap();
        drop(tx);

        assert_eq!(source.poll(), vec![KeyTransition::down(HostKey::Space)]);
        assert!(source.is_closed());
        assert!(source.poll().is_empty());
    }
}
