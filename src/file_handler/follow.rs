//! Follow mode: tail a growing source and hand new lines to the viewer.
//!
//! The producer never touches viewer state. It only pushes single-line batches into a bounded
//! channel; when the consumer falls behind, `send` waits, so lines are delayed but never dropped.

use crate::file_handler::loader::decode_line;
use log::{debug, warn};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::task::JoinHandle;

/// Capacity of the hand-off queue between producer and viewer.
pub const FOLLOW_CHANNEL_CAPACITY: usize = 16;
/// How long to wait before retrying after reaching the current end of the source.
pub const FOLLOW_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Spawn a producer tailing `reader` from its current position.
///
/// The channel closes when the source errors or the receiver is dropped.
pub fn spawn_follow<R>(reader: R, poll_interval: Duration) -> (Receiver<Vec<String>>, JoinHandle<()>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(FOLLOW_CHANNEL_CAPACITY);
    let handle = tokio::spawn(follow_loop(reader, tx, poll_interval));
    (rx, handle)
}

async fn follow_loop<R>(reader: R, tx: Sender<Vec<String>>, poll_interval: Duration)
where
    R: AsyncRead + Unpin,
{
    debug!("follow producer started");
    let mut reader = BufReader::new(reader);
    let mut pending = Vec::new();

    loop {
        match reader.read_until(b'\n', &mut pending).await {
            Ok(_) if pending.last() == Some(&b'\n') => {
                pending.pop();
                let line = decode_line(&pending);
                pending.clear();
                if tx.send(vec![line]).await.is_err() {
                    debug!("follow consumer went away, stopping producer");
                    return;
                }
            }
            // End of the data written so far; a partial line stays buffered until its newline
            // shows up.
            Ok(_) => {
                if tx.is_closed() {
                    return;
                }
                tokio::time::sleep(poll_interval).await;
            }
            Err(err) => {
                warn!("follow producer stopped: {err}");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::time::timeout;

    const POLL: Duration = Duration::from_millis(5);

    async fn next_batch(rx: &mut Receiver<Vec<String>>) -> Vec<String> {
        timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("follow batch timed out")
            .expect("follow channel closed unexpectedly")
    }

    #[tokio::test]
    async fn emits_one_batch_per_complete_line() {
        let (mut writer, reader) = tokio::io::duplex(256);
        let (mut rx, _task) = spawn_follow(reader, POLL);

        writer.write_all(b"first\r\nsecond\n").await.unwrap();
        assert_eq!(next_batch(&mut rx).await, vec!["first".to_string()]);
        assert_eq!(next_batch(&mut rx).await, vec!["second".to_string()]);
    }

    #[tokio::test]
    async fn partial_line_waits_for_newline() {
        let (mut writer, reader) = tokio::io::duplex(256);
        let (mut rx, _task) = spawn_follow(reader, POLL);

        writer.write_all(b"half").await.unwrap();
        assert!(timeout(Duration::from_millis(50), rx.recv()).await.is_err());

        writer.write_all(b" done\n").await.unwrap();
        assert_eq!(next_batch(&mut rx).await, vec!["half done".to_string()]);
    }

    #[tokio::test]
    async fn full_queue_stalls_instead_of_dropping() {
        let (mut writer, reader) = tokio::io::duplex(4096);
        let (mut rx, _task) = spawn_follow(reader, POLL);

        let total = FOLLOW_CHANNEL_CAPACITY * 3;
        for i in 0..total {
            writer
                .write_all(format!("line {i}\n").as_bytes())
                .await
                .unwrap();
        }
        tokio::time::sleep(Duration::from_millis(50)).await;

        for i in 0..total {
            assert_eq!(next_batch(&mut rx).await, vec![format!("line {i}")]);
        }
    }
}
