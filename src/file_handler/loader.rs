//! Initial input loading.
//!
//! The whole input is read into memory once, split on `\n` and normalised so that every stored
//! line is free of its line terminator (including a trailing `\r` from CRLF files).

use crate::error::{Result, TiloError};
use crate::file_handler::follow::{spawn_follow, FOLLOW_POLL_INTERVAL};
use log::debug;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc::Receiver;

/// Where the initial lines come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// Interpret a positional argument: `-` or nothing means stdin.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("-") => InputSource::Stdin,
            Some(path) => InputSource::File(PathBuf::from(path)),
        }
    }
}

/// Decode one raw line: drop a trailing `\r`, replace invalid UTF-8.
pub(crate) fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

/// Split a byte buffer into lines.
///
/// A final line without terminator is kept; a terminating newline does not produce an extra
/// empty line.
pub fn split_lines(bytes: &[u8]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut start = 0;
    for end in memchr::memchr_iter(b'\n', bytes) {
        lines.push(decode_line(&bytes[start..end]));
        start = end + 1;
    }
    if start < bytes.len() {
        lines.push(decode_line(&bytes[start..]));
    }
    lines
}

fn open_error(path: &Path, err: std::io::Error) -> TiloError {
    if err.kind() == std::io::ErrorKind::NotFound {
        TiloError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        TiloError::file_error(format!("cannot read {}", path.display()), err)
    }
}

/// Read every line of the given source.
pub async fn load_lines(source: &InputSource) -> Result<Vec<String>> {
    let bytes = match source {
        InputSource::Stdin => {
            let mut buf = Vec::new();
            tokio::io::stdin().read_to_end(&mut buf).await?;
            buf
        }
        InputSource::File(path) => tokio::fs::read(path)
            .await
            .map_err(|err| open_error(path, err))?,
    };
    let lines = split_lines(&bytes);
    debug!("loaded {} lines ({} bytes)", lines.len(), bytes.len());
    Ok(lines)
}

/// Read the current contents of `path` and keep tailing it.
///
/// Returns the initial lines plus the receiving end of the follow channel; the producer task
/// continues from exactly where the initial read stopped.
pub async fn load_and_follow(path: &Path) -> Result<(Vec<String>, Receiver<Vec<String>>)> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|err| open_error(path, err))?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)
        .await
        .map_err(|err| open_error(path, err))?;
    let lines = split_lines(&buf);
    debug!(
        "loaded {} lines from {}, following for more",
        lines.len(),
        path.display()
    );
    let (rx, _producer) = spawn_follow(file, FOLLOW_POLL_INTERVAL);
    Ok((lines, rx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn splits_and_normalises_crlf() {
        assert_eq!(
            split_lines(b"one\r\ntwo\nthree"),
            vec!["one".to_string(), "two".to_string(), "three".to_string()]
        );
    }

    #[test]
    fn trailing_newline_adds_no_empty_line() {
        assert_eq!(split_lines(b"a\nb\n"), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(split_lines(b"a\n\nb\n"), vec!["a", "", "b"]);
        assert!(split_lines(b"").is_empty());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let lines = split_lines(b"ok \xff here\n");
        assert_eq!(lines, vec!["ok \u{fffd} here".to_string()]);
    }

    #[test]
    fn input_source_from_arg() {
        assert_eq!(InputSource::from_arg(None), InputSource::Stdin);
        assert_eq!(InputSource::from_arg(Some("-")), InputSource::Stdin);
        assert_eq!(
            InputSource::from_arg(Some("app.log")),
            InputSource::File(PathBuf::from("app.log"))
        );
    }

    #[tokio::test]
    async fn loads_file_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "first\r\nsecond\n").unwrap();
        let lines = load_lines(&InputSource::File(file.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let err = load_lines(&InputSource::File(PathBuf::from("/no/such/tilo.log")))
            .await
            .unwrap_err();
        assert!(matches!(err, TiloError::FileNotFound { .. }));
    }
}
