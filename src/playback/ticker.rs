use std::{
    sync::mpsc::{self, RecvTimeoutError},
    thread::JoinHandle,
    time::Duration,
};

use anyhow::Context as _;

use crate::foundation::error::CasemapResult;

/// One-shot deferred callback: delivers `payload` on `deliver` after `delay` unless cancelled
/// first. Cancelled on drop.
///
/// A tick that was already delivered when `cancel` runs stays in the channel; receivers must
/// be prepared to discard it.
#[derive(Debug)]
pub struct Ticker {
    cancel: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn schedule<T: Send + 'static>(
        delay: Duration,
        payload: T,
        deliver: mpsc::Sender<T>,
    ) -> CasemapResult<Self> {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let handle = std::thread::Builder::new()
            .name("casemap-tick".to_string())
            .spawn(move || {
                if let Err(RecvTimeoutError::Timeout) = cancel_rx.recv_timeout(delay) {
                    // Receiver gone means the session was torn down.
                    let _ = deliver.send(payload);
                }
            })
            .context("spawn playback tick thread")?;

        Ok(Self {
            cancel: Some(cancel_tx),
            handle: Some(handle),
        })
    }

    /// Stop the pending tick (if it has not fired yet) and wait for the thread to exit.
    pub fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
