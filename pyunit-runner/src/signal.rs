// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Support for handling signals during discovery.

use crate::cancel::CancellationToken;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// The kind of signal handling to set up for a discovery run.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum SignalHandlerKind {
    /// The standard signal handler: Ctrl-C cancels discovery.
    Standard,

    /// A no-op signal handler. Useful for tests.
    Noop,
}

impl SignalHandlerKind {
    /// Installs the signal handler, cancelling `token` when a signal arrives.
    ///
    /// Must be called from within a Tokio runtime. The handler is removed when the returned
    /// [`SignalHandler`] is dropped.
    pub fn install(self, token: &CancellationToken) -> SignalHandler {
        match self {
            Self::Standard => SignalHandler::new(token.clone()),
            Self::Noop => SignalHandler::noop(),
        }
    }
}

/// A running signal handler.
#[derive(Debug)]
pub struct SignalHandler {
    task: Option<JoinHandle<()>>,
}

impl SignalHandler {
    fn new(token: CancellationToken) -> Self {
        let task = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("received interrupt, cancelling discovery");
                    token.cancel();
                }
                Err(error) => {
                    warn!("unable to listen for interrupts, Ctrl-C won't cancel discovery: {error}");
                }
            }
        });
        Self { task: Some(task) }
    }

    fn noop() -> Self {
        Self { task: None }
    }

    /// Returns true if this handler is listening for signals.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for SignalHandler {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
