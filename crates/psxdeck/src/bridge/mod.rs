//! Hands disk images over to the emulator

use std::{path::PathBuf, time::Duration};
use thiserror::Error;

pub mod blob;
pub mod process;

pub use blob::NamedBlob;
pub use process::ProcessFrame;

/// How long to wait for the emulator after asking it to reload, before trying once more
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Emulator is not ready to load games")]
    NotReady,
    #[error("Could not start emulator {}: {source}", command.display())]
    Spawn {
        command: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Entry points the emulator exposes to the front end
///
/// Only the loader is mandatory, the rest report whether they exist
pub trait EmulatorFrame {
    /// Loads a set of files into the emulator, failing with [BridgeError::NotReady] if it can't yet
    fn read_file(&self, files: &[NamedBlob]) -> Result<(), BridgeError>;

    /// Points the frame back at the emulator so the loader can come up
    fn reload_page(&self) {}

    fn reload_game(&self) -> bool {
        false
    }

    fn toggle_sound(&self) -> bool {
        false
    }
}

pub struct LaunchBridge<F> {
    frame: F,
    retry_delay: Duration,
}

impl<F: EmulatorFrame> LaunchBridge<F> {
    pub fn new(frame: F, retry_delay: Duration) -> Self {
        Self { frame, retry_delay }
    }

    pub fn frame(&self) -> &F {
        &self.frame
    }

    /// Gives the blob to the emulator, retrying exactly once if it was not ready
    pub async fn deliver(&self, blob: NamedBlob) -> Result<(), BridgeError> {
        let files = [blob];

        match self.frame.read_file(&files) {
            Err(BridgeError::NotReady) => {
                tracing::info!(
                    "Emulator not ready for {}, retrying in {:?}",
                    files[0].name,
                    self.retry_delay
                );

                self.frame.reload_page();
                tokio::time::sleep(self.retry_delay).await;
                self.frame.read_file(&files)
            }
            result => result,
        }
    }

    pub fn reset(&self) -> bool {
        self.frame.reload_game()
    }

    pub fn toggle_sound(&self) -> bool {
        self.frame.toggle_sound()
    }
}
