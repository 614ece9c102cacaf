//! Transient "working" indicator shown while waiting on the network.

use colored::Colorize;
use std::io::{IsTerminal, Write};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

/// Animated spinner on stderr. Does nothing when stderr is not a terminal.
///
/// Must be started from inside a tokio runtime.
pub struct Spinner {
    stop_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    pub fn start(message: &str) -> Self {
        if !std::io::stderr().is_terminal() {
            return Self::inactive();
        }

        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let message = message.to_string();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(FRAME_INTERVAL);
            let mut frame = 0usize;
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = interval.tick() => {
                        let mut err = std::io::stderr();
                        let _ = write!(err, "\r{} {}", FRAMES[frame % FRAMES.len()].cyan(), message);
                        let _ = err.flush();
                        frame += 1;
                    }
                }
            }
            // Erase the spinner line.
            let mut err = std::io::stderr();
            let _ = write!(err, "\r\x1b[2K");
            let _ = err.flush();
        });

        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    fn inactive() -> Self {
        Self {
            stop_tx: None,
            handle: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Stops the animation and waits until the line has been cleared.
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_and_stop_completes() {
        let spinner = Spinner::start("Working...");
        tokio::time::sleep(Duration::from_millis(20)).await;
        spinner.stop().await;
    }

    #[tokio::test]
    async fn test_inactive_spinner_stops_immediately() {
        let spinner = Spinner::inactive();
        assert!(!spinner.is_active());
        spinner.stop().await;
    }
}
