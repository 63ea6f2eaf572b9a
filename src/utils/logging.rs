//! Transcript logging to a user-selected file.
//!
//! Distinct from the `tracing` diagnostics: this writes the visible
//! conversation, in display format, to a file the user names with `/log`
//! or `--log`.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct LoggingState {
    file_path: Option<String>,
    is_active: bool,
}

impl LoggingState {
    pub fn new(log_file: Option<String>) -> Self {
        let is_active = log_file.is_some();
        LoggingState {
            file_path: log_file,
            is_active,
        }
    }

    pub fn set_log_file(&mut self, path: String) -> Result<String, Box<dyn std::error::Error>> {
        self.test_file_access(&path)?;

        self.file_path = Some(path.clone());
        self.is_active = true;

        Ok(format!("Logging enabled to: {path}"))
    }

    pub fn toggle_logging(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        match &self.file_path {
            Some(path) => {
                self.is_active = !self.is_active;
                if self.is_active {
                    Ok(format!("Logging resumed to: {path}"))
                } else {
                    Ok(format!("Logging paused (file: {path})"))
                }
            }
            None => {
                Err("No log file specified. Use /log <filename> to enable logging first.".into())
            }
        }
    }

    pub fn log_message(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        if !self.is_active || self.file_path.is_none() {
            return Ok(());
        }

        self.write_to_log(content)
    }

    fn write_to_log(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        let file_path = self.file_path.as_ref().expect("checked by caller");

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;

        let mut writer = BufWriter::new(file);

        // Write each line of content, preserving the exact formatting
        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }

        // Empty line after each message for spacing, matching screen display
        writeln!(writer)?;

        writer.flush()?;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn get_status_string(&self) -> String {
        match (&self.file_path, self.is_active) {
            (None, _) => "disabled".to_string(),
            (Some(path), true) => format!(
                "active ({})",
                Path::new(path)
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            ),
            (Some(path), false) => format!(
                "paused ({})",
                Path::new(path)
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            ),
        }
    }

    fn test_file_access(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_without_file_is_an_error() {
        let mut logging = LoggingState::new(None);
        assert!(!logging.is_active());
        assert!(logging.toggle_logging().is_err());
    }

    #[test]
    fn messages_are_appended_with_spacing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("transcript.log");
        let mut logging = LoggingState::new(None);
        logging
            .set_log_file(path.to_string_lossy().into_owned())
            .expect("set log file");

        logging.log_message("You: hello").expect("log");
        logging.log_message("Hi there!").expect("log");

        let contents = std::fs::read_to_string(&path).expect("read log");
        assert_eq!(contents, "You: hello\n\nHi there!\n\n");
    }

    #[test]
    fn paused_logging_drops_messages() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("transcript.log");
        let mut logging = LoggingState::new(Some(path.to_string_lossy().into_owned()));
        assert!(logging.is_active());

        logging.toggle_logging().expect("pause");
        logging.log_message("dropped").expect("log");

        assert!(!path.exists() || std::fs::read_to_string(&path).expect("read").is_empty());
        assert!(logging.get_status_string().starts_with("paused"));
    }
}
