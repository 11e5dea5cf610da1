/*!
 * Keypress Stream Controller
 * Single subscriber to raw terminal input, multiplexing between the
 * global key stream and transient single-key waits
 */

use std::io::IsTerminal;
use std::sync::Arc;

use nix::sys::termios::{self, SetArg, Termios};
use parking_lot::Mutex;
use tokio::io::AsyncReadExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::codes::synthesize;
use super::parser::KeypressParser;
use super::types::{InputError, KeyEvent};

/// Hard interrupt: always terminates the process, whatever the current
/// delivery mode.
const INTERRUPT_BYTE: char = '\u{3}';

/// Puts stdin into raw mode (no line buffering, no host echo) and
/// restores the saved configuration on drop.
pub struct RawModeGuard {
    saved: Termios,
}

impl RawModeGuard {
    pub fn enable() -> Result<Self, InputError> {
        let stdin = std::io::stdin();
        if !stdin.is_terminal() {
            return Err(InputError::Terminal("stdin is not a tty".to_string()));
        }

        let saved = termios::tcgetattr(&stdin)
            .map_err(|e| InputError::Terminal(format!("tcgetattr: {e}")))?;

        let mut raw = saved.clone();
        termios::cfmakeraw(&mut raw);
        termios::tcsetattr(&stdin, SetArg::TCSANOW, &raw)
            .map_err(|e| InputError::Terminal(format!("tcsetattr: {e}")))?;

        debug!("raw mode enabled");
        Ok(Self { saved })
    }

    fn restore_termios(saved: &Termios) {
        let stdin = std::io::stdin();
        if let Err(e) = termios::tcsetattr(&stdin, SetArg::TCSANOW, saved) {
            warn!(error = %e, "failed to restore terminal mode");
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        Self::restore_termios(&self.saved);
        debug!("raw mode restored");
    }
}

/// Who receives the next raw key.
///
/// Mode switch, not fan-out: while a waiter is registered the global
/// stream is suppressed, which prevents the double-delivery race between a
/// blocking key wait and the ambient input handler.
enum DeliveryMode {
    Streaming,
    Waiting(oneshot::Sender<KeyEvent>),
}

/// Delivery state machine shared between the reader task and callers.
pub(crate) struct Dispatcher {
    mode: Mutex<DeliveryMode>,
    stream: mpsc::UnboundedSender<KeyEvent>,
}

impl Dispatcher {
    fn new(stream: mpsc::UnboundedSender<KeyEvent>) -> Self {
        Self {
            mode: Mutex::new(DeliveryMode::Streaming),
            stream,
        }
    }

    /// Deliver one event to exactly one consumer: the registered waiter if
    /// any, else the global stream.
    fn dispatch(&self, event: KeyEvent) {
        let mut mode = self.mode.lock();
        match std::mem::replace(&mut *mode, DeliveryMode::Streaming) {
            DeliveryMode::Waiting(waiter) => {
                // One key satisfies the wait; mode already fell back to
                // Streaming above. A waiter whose receiver is gone (the
                // wait future was dropped) hands the event back; reroute
                // it so the key still reaches a consumer.
                if let Err(event) = waiter.send(event) {
                    debug!("key waiter dropped, rerouting to global stream");
                    if self.stream.send(event).is_err() {
                        debug!("global key stream closed, event dropped");
                    }
                }
            }
            DeliveryMode::Streaming => {
                if self.stream.send(event).is_err() {
                    debug!("global key stream closed, event dropped");
                }
            }
        }
    }

    /// Register the single transient waiter
    fn begin_wait(&self) -> Result<oneshot::Receiver<KeyEvent>, InputError> {
        let mut mode = self.mode.lock();
        if matches!(*mode, DeliveryMode::Waiting(_)) {
            return Err(InputError::WaitPending);
        }
        let (tx, rx) = oneshot::channel();
        *mode = DeliveryMode::Waiting(tx);
        Ok(rx)
    }

    /// Drop any registered waiter; its receiver observes cancellation
    /// rather than hanging forever.
    fn cancel_wait(&self) {
        let mut mode = self.mode.lock();
        if matches!(*mode, DeliveryMode::Waiting(_)) {
            *mode = DeliveryMode::Streaming;
        }
    }
}

/// The single subscriber to raw terminal input.
///
/// Spawns a background reader over raw stdin; parsed keys are synthesized
/// into [`KeyEvent`]s and dispatched per the current [`DeliveryMode`]. The
/// interrupt byte (0x03) bypasses both modes, restores the terminal, and
/// terminates the process.
pub struct KeypressController {
    dispatcher: Arc<Dispatcher>,
    reader: Mutex<Option<JoinHandle<()>>>,
    raw_guard: Mutex<Option<RawModeGuard>>,
}

impl KeypressController {
    /// Enable raw mode and start the reader task. Returns the controller
    /// and the long-lived global key stream for the virtual OS.
    pub fn spawn() -> Result<(Arc<Self>, mpsc::UnboundedReceiver<KeyEvent>), InputError> {
        let guard = RawModeGuard::enable()?;
        let saved = guard.saved.clone();

        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Arc::new(Dispatcher::new(tx));

        let reader = tokio::spawn(read_loop(Arc::clone(&dispatcher), saved));

        let controller = Arc::new(Self {
            dispatcher,
            reader: Mutex::new(Some(reader)),
            raw_guard: Mutex::new(Some(guard)),
        });
        Ok((controller, rx))
    }

    /// Block until exactly one key arrives, consuming it exclusively.
    ///
    /// While the wait is active the global stream receives nothing. A
    /// second concurrent wait is a caller contract violation and fails
    /// with [`InputError::WaitPending`].
    pub async fn wait_for_key(&self) -> Result<KeyEvent, InputError> {
        let rx = self.dispatcher.begin_wait()?;
        rx.await.map_err(|_| InputError::Cancelled)
    }

    /// Tear down: cancel any pending waiter, stop the reader, restore the
    /// terminal. Idempotent.
    pub fn shutdown(&self) {
        self.dispatcher.cancel_wait();
        if let Some(reader) = self.reader.lock().take() {
            reader.abort();
        }
        // Dropping the guard restores the saved termios
        self.raw_guard.lock().take();
    }
}

impl Drop for KeypressController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn read_loop(dispatcher: Arc<Dispatcher>, saved_termios: Termios) {
    let mut stdin = tokio::io::stdin();
    let mut parser = KeypressParser::new();
    let mut chunk = [0u8; 256];

    loop {
        let n = match stdin.read(&mut chunk).await {
            Ok(0) => {
                debug!("stdin closed, reader stopping");
                return;
            }
            Ok(n) => n,
            Err(e) => {
                warn!(error = %e, "stdin read failed, reader stopping");
                return;
            }
        };
        parser.push(&chunk[..n]);

        while let Some(keypress) = parser.next_key() {
            // Hard interrupt bypasses both delivery modes
            if keypress.raw.starts_with(INTERRUPT_BYTE) {
                info!("interrupt received, terminating");
                RawModeGuard::restore_termios(&saved_termios);
                std::process::exit(0);
            }

            dispatcher.dispatch(synthesize(&keypress.raw, &keypress.meta));
        }
    }
}
