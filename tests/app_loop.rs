use std::io::Write;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout, Duration};

use tilo::clipboard::Clipboard;
use tilo::file_handler::{load_and_follow, LineStore};
use tilo::render::{strip_ansi, MockState, MockUIRenderer, StatusPosition};
use tilo::viewer::Position;
use tilo::{Application, Highlighter, TiloError, Viewer, ViewerOptions};

const TIMEOUT: Duration = Duration::from_secs(5);

struct FailingClipboard;

impl Clipboard for FailingClipboard {
    fn write(&mut self, _text: &str) -> tilo::Result<()> {
        Err(TiloError::clipboard("no display"))
    }
}

fn application(lines: &[&str], renderer: MockUIRenderer) -> Application {
    let store = LineStore::new(lines.iter().map(|s| s.to_string()).collect());
    let viewer = Viewer::new(store, ViewerOptions::default());
    Application::new(
        viewer,
        Highlighter::plain(),
        Box::new(renderer),
        Box::new(FailingClipboard),
    )
}

fn scripted(bytes: &[&[u8]]) -> mpsc::UnboundedReceiver<Vec<u8>> {
    let (tx, rx) = mpsc::unbounded_channel();
    for chunk in bytes {
        tx.send(chunk.to_vec()).unwrap();
    }
    rx
}

fn last_frame_text(state: &Arc<Mutex<MockState>>) -> Vec<String> {
    let state = state.lock().unwrap();
    state
        .frames
        .last()
        .map(|frame| frame.rows.iter().map(|row| strip_ansi(row)).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn scripted_keys_run_until_quit() {
    let renderer = MockUIRenderer::new(40, 6);
    let state = renderer.state();
    let mut app = application(&["one", "two", "three"], renderer);

    timeout(TIMEOUT, app.run(scripted(&[b"j", b"j$", b"q", b"k"]), None))
        .await
        .expect("session did not quit")
        .unwrap();

    assert_eq!(app.viewer().cursor(), Position::new(2, 4));
    let state = state.lock().unwrap();
    // initial draw plus one per processed chunk
    assert_eq!(state.frames.len(), 3);
    assert_eq!(state.cleanup_count, 1);
    assert!(!state.is_initialized);
}

#[tokio::test]
async fn frames_fill_the_terminal() {
    let renderer = MockUIRenderer::new(30, 5);
    let state = renderer.state();
    let mut app = application(&["alpha", "beta"], renderer);

    app.run(scripted(&[b"q"]), None).await.unwrap();

    let rows = last_frame_text(&state);
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|row| row.chars().count() == 30));
    assert_eq!(rows[0].trim_end(), "1 alpha");
    assert!(rows[4].ends_with("1/2"));
}

#[tokio::test]
async fn status_bar_can_sit_on_top() {
    let renderer = MockUIRenderer::new(30, 5);
    let state = renderer.state();
    let mut app =
        application(&["alpha", "beta"], renderer).with_status_position(StatusPosition::Top);

    app.run(scripted(&[b"q"]), None).await.unwrap();

    let rows = last_frame_text(&state);
    assert!(rows[0].ends_with("1/2"));
    assert_eq!(rows[1].trim_end(), "1 alpha");
}

#[tokio::test]
async fn size_failure_falls_back_to_default_geometry() {
    let renderer = MockUIRenderer::without_size();
    let state = renderer.state();
    let mut app = application(&["only line"], renderer);

    app.run(scripted(&[b"q"]), None).await.unwrap();

    let rows = last_frame_text(&state);
    assert_eq!(rows.len(), 24);
    assert_eq!(rows[0].chars().count(), 80);
}

#[tokio::test]
async fn clipboard_failure_is_a_status_message() {
    let renderer = MockUIRenderer::new(60, 5);
    let state = renderer.state();
    let mut app = application(&["copy me"], renderer);

    app.run(scripted(&[b"v$y", b"q"]), None).await.unwrap();

    assert_eq!(
        app.viewer().status().message.as_deref(),
        Some("clipboard failed")
    );
    let rows = last_frame_text(&state);
    assert!(rows[4].contains("clipboard failed"));
}

#[tokio::test]
async fn closing_keyboard_input_ends_the_session() {
    let mut app = application(&["a"], MockUIRenderer::default());
    let (tx, rx) = mpsc::unbounded_channel::<Vec<u8>>();
    drop(tx);
    timeout(TIMEOUT, app.run(rx, None))
        .await
        .expect("session did not end")
        .unwrap();
}

#[tokio::test]
async fn followed_lines_reach_the_screen() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "first").unwrap();
    file.flush().unwrap();

    let (lines, follow) = load_and_follow(file.path()).await.unwrap();
    assert_eq!(lines, vec!["first".to_string()]);

    let renderer = MockUIRenderer::new(40, 6);
    let state = renderer.state();
    let store = LineStore::new(lines);
    let viewer = Viewer::new(store, ViewerOptions::default());
    let mut app = Application::new(
        viewer,
        Highlighter::plain(),
        Box::new(renderer),
        Box::new(FailingClipboard),
    );

    let (tx, rx) = mpsc::unbounded_channel();
    let path = file.path().to_path_buf();
    let driver = async move {
        let mut appender = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(appender, "appended").unwrap();
        appender.flush().unwrap();

        let seen = timeout(TIMEOUT, async {
            loop {
                if last_frame_text(&state)
                    .iter()
                    .any(|row| row.contains("appended"))
                {
                    break;
                }
                sleep(Duration::from_millis(20)).await;
            }
        })
        .await;
        // Enter adds a marker line while following, then quit
        tx.send(b"\r".to_vec()).unwrap();
        tx.send(b"q".to_vec()).unwrap();
        seen.is_ok()
    };

    let (result, seen) = tokio::join!(app.run(rx, Some(follow)), driver);
    result.unwrap();
    assert!(seen, "appended line never rendered");

    let lines: Vec<&str> = app.viewer().lines().iter().collect();
    assert_eq!(lines, vec!["first", "appended", ""]);
    assert_eq!(app.viewer().cursor(), Position::new(2, 0));
}
