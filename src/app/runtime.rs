use log::{debug, warn};
use std::io::{ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

const READ_CHUNK: usize = 1024;

/// Spawn a blocking thread that reads raw key bytes and forwards each chunk onto a channel.
///
/// The thread ends at end of input, when the receiver goes away, or on the first read after
/// `shutdown` is set. A thread blocked in `read` cannot be woken, so callers abandon it rather
/// than join it.
pub fn spawn_input_thread<R>(
    mut reader: R,
    tx: UnboundedSender<Vec<u8>>,
    shutdown: Arc<AtomicBool>,
) -> std::thread::JoinHandle<()>
where
    R: Read + Send + 'static,
{
    std::thread::spawn(move || {
        let mut buf = [0u8; READ_CHUNK];
        while !shutdown.load(Ordering::SeqCst) {
            match reader.read(&mut buf) {
                Ok(0) => {
                    debug!("input reader reached end of input");
                    break;
                }
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    warn!("input thread stopped: {err}");
                    break;
                }
            }
        }
    })
}
