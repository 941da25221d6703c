use super::{BridgeError, EmulatorFrame, NamedBlob};
use std::{
    cell::RefCell,
    fs::{self, create_dir_all},
    io::ErrorKind,
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus},
};

/// Runs an external emulator program, handing it games as files in a staging directory
pub struct ProcessFrame {
    command: Option<PathBuf>,
    arguments: Vec<String>,
    staging_directory: PathBuf,
    running: RefCell<Option<Running>>,
}

struct Running {
    child: Child,
    files: Vec<PathBuf>,
}

impl ProcessFrame {
    pub fn new(
        command: Option<PathBuf>,
        arguments: Vec<String>,
        staging_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            command,
            arguments,
            staging_directory: staging_directory.into(),
            running: RefCell::new(None),
        }
    }

    fn stage(&self, blob: &NamedBlob) -> Result<PathBuf, BridgeError> {
        create_dir_all(&self.staging_directory)?;

        // Only the final component is used so names can't escape the staging directory
        let file_name = Path::new(&blob.name)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("game.bin"));
        let path = self.staging_directory.join(file_name);

        fs::write(&path, &blob.bytes)?;
        tracing::debug!("Staged {} ({} bytes) at {}", blob.name, blob.len(), path.display());

        Ok(path)
    }

    fn spawn(&self, files: Vec<PathBuf>) -> Result<(), BridgeError> {
        let Some(command) = &self.command else {
            return Err(BridgeError::NotReady);
        };

        self.stop();

        let child = match Command::new(command)
            .args(&self.arguments)
            .args(&files)
            .spawn()
        {
            Ok(child) => child,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::warn!("Emulator {} was not found", command.display());
                return Err(BridgeError::NotReady);
            }
            Err(source) => {
                return Err(BridgeError::Spawn {
                    command: command.clone(),
                    source,
                })
            }
        };

        tracing::info!("Started emulator {} (pid {})", command.display(), child.id());
        self.running.replace(Some(Running { child, files }));

        Ok(())
    }

    /// Blocks until the running emulator exits, returns immediately if none is running
    pub fn wait(&self) -> Result<Option<ExitStatus>, BridgeError> {
        match self.running.take() {
            Some(mut running) => Ok(Some(running.child.wait()?)),
            None => Ok(None),
        }
    }

    fn stop(&self) {
        if let Some(mut running) = self.running.take() {
            if let Err(err) = running.child.kill() {
                tracing::debug!("Emulator had already exited: {}", err);
            }
            let _ = running.child.wait();
        }
    }
}

impl EmulatorFrame for ProcessFrame {
    fn read_file(&self, files: &[NamedBlob]) -> Result<(), BridgeError> {
        if self.command.is_none() {
            return Err(BridgeError::NotReady);
        }

        let staged = files
            .iter()
            .map(|blob| self.stage(blob))
            .collect::<Result<Vec<_>, _>>()?;

        self.spawn(staged)
    }

    /// Restarts the emulator on the files it was last given
    fn reload_game(&self) -> bool {
        let files = self
            .running
            .borrow()
            .as_ref()
            .map(|running| running.files.clone());
        let Some(files) = files else {
            return false;
        };

        match self.spawn(files) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!("Could not restart emulator: {}", err);
                false
            }
        }
    }
}

impl Drop for ProcessFrame {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn without_command_is_not_ready() {
        let directory = tempfile::tempdir().unwrap();
        let frame = ProcessFrame::new(None, Vec::new(), directory.path());

        let result = frame.read_file(&[NamedBlob::new("game.bin", vec![1])]);

        assert!(matches!(result, Err(BridgeError::NotReady)));
        assert!(!frame.reload_game());
    }

    #[test]
    fn missing_program_is_not_ready() {
        let directory = tempfile::tempdir().unwrap();
        let frame = ProcessFrame::new(
            Some(directory.path().join("no-such-emulator")),
            Vec::new(),
            directory.path().join("staging"),
        );

        let result = frame.read_file(&[NamedBlob::new("game.bin", vec![1])]);

        assert!(matches!(result, Err(BridgeError::NotReady)));
    }

    #[test]
    fn staging_keeps_only_the_file_name() {
        let directory = tempfile::tempdir().unwrap();
        let frame = ProcessFrame::new(None, Vec::new(), directory.path());

        let path = frame
            .stage(&NamedBlob::new("../../escape.bin", vec![4, 5, 6]))
            .unwrap();

        assert_eq!(path, directory.path().join("escape.bin"));
        assert_eq!(fs::read(path).unwrap(), vec![4, 5, 6]);
    }
}
