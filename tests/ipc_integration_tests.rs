//! Control channel end-to-end tests
//!
//! Exercise the full path: client → Unix socket → server loop → dispatch
//! → logging collaborator / shutdown queue, over a real socket in a
//! temporary directory.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;
use tokio::time::timeout;

use dynalog::errors::Result;
use dynalog::system::ipc::client::{forward_args, ForwardOutcome};
use dynalog::system::ipc::endpoint::Endpoint;
use dynalog::system::ipc::handler::ServerContext;
use dynalog::system::ipc::server::ControlServer;
use dynalog::system::logging::LogControl;
use dynalog::system::shutdown::{shutdown_channel, QuitReason, ShutdownHandle};

const IO_TIMEOUT: Duration = Duration::from_millis(500);

/// Records every setter call instead of touching a real subscriber
#[derive(Default)]
struct RecordingLog {
    formats: Mutex<Vec<String>>,
    rules: Mutex<Vec<String>>,
}

impl LogControl for RecordingLog {
    fn set_message_format(&self, pattern: &str) {
        self.formats.lock().unwrap().push(pattern.to_string());
    }

    fn set_filter_rules(&self, rules: &str) -> Result<()> {
        self.rules.lock().unwrap().push(rules.to_string());
        Ok(())
    }
}

struct TestServer {
    _dir: TempDir,
    endpoint: Endpoint,
    log: Arc<RecordingLog>,
    shutdown: ShutdownHandle,
    task: tokio::task::JoinHandle<QuitReason>,
}

/// Claim a fresh endpoint in a temp dir and run the server loop on it
fn start_server() -> TestServer {
    let dir = TempDir::new().expect("temp dir");
    let endpoint = Endpoint::new(dir.path().join("dynalog-test.sock"));
    let listener = endpoint.claim().expect("claim fresh endpoint");

    let log = Arc::new(RecordingLog::default());
    let (handle, controller) = shutdown_channel();
    let ctx = ServerContext {
        log: log.clone(),
        shutdown: handle.clone(),
    };
    let server = ControlServer::new(listener, ctx, IO_TIMEOUT);
    // Long tick so it never interferes with the assertions
    let task = tokio::spawn(server.run(controller, Duration::from_secs(300)));

    TestServer {
        _dir: dir,
        endpoint,
        log,
        shutdown: handle,
        task,
    }
}

async fn send(server: &TestServer, args: &[&str]) -> ForwardOutcome {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    forward_args(&server.endpoint, &args, IO_TIMEOUT)
        .await
        .expect("forward")
}

/// Poll until `predicate` holds or the bound expires
async fn wait_for(mut predicate: impl FnMut() -> bool) {
    for _ in 0..200 {
        if predicate() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("condition not reached within bound");
}

#[tokio::test]
async fn format_command_reaches_the_collaborator_verbatim() {
    let server = start_server();

    let outcome = send(&server, &["-f", "%{time} %{message}"]).await;
    assert!(matches!(outcome, ForwardOutcome::Sent { bytes } if bytes > 0));

    let log = server.log.clone();
    wait_for(move || {
        log.formats
            .lock()
            .unwrap()
            .contains(&"%{time} %{message}".to_string())
    })
    .await;

    server.shutdown.request(QuitReason::ControlQuit);
    let _ = server.task.await;
}

#[tokio::test]
async fn filter_rules_arrive_with_newline_separators() {
    let server = start_server();

    send(&server, &["-r", "a.debug=false;b.info=true"]).await;

    let log = server.log.clone();
    wait_for(move || {
        log.rules
            .lock()
            .unwrap()
            .contains(&"a.debug=false\nb.info=true".to_string())
    })
    .await;

    server.shutdown.request(QuitReason::ControlQuit);
    let _ = server.task.await;
}

#[tokio::test]
async fn quit_command_stops_the_server() {
    let server = start_server();

    let outcome = send(&server, &["-q"]).await;
    assert!(matches!(outcome, ForwardOutcome::Sent { .. }));

    let reason = timeout(Duration::from_secs(5), server.task)
        .await
        .expect("server loop did not stop in time")
        .expect("server task panicked");
    assert_eq!(reason, QuitReason::ControlQuit);
}

#[tokio::test]
async fn silent_connection_does_not_block_the_next_client() {
    let server = start_server();

    // Opens a connection and never sends anything
    let silent = tokio::net::UnixStream::connect(server.endpoint.path())
        .await
        .expect("silent connect");

    send(&server, &["-f", "after-silent"]).await;

    // The server abandons the silent peer after the read bound and still
    // services the real command
    let log = server.log.clone();
    wait_for(move || {
        log.formats
            .lock()
            .unwrap()
            .contains(&"after-silent".to_string())
    })
    .await;
    drop(silent);

    server.shutdown.request(QuitReason::ControlQuit);
    let _ = server.task.await;
}

#[tokio::test]
async fn unknown_commands_are_ignored_and_service_continues() {
    let server = start_server();

    send(&server, &["-x", "whatever"]).await;
    send(&server, &["-f", "still-alive"]).await;

    let log = server.log.clone();
    wait_for(move || {
        log.formats
            .lock()
            .unwrap()
            .contains(&"still-alive".to_string())
    })
    .await;
    assert!(server.log.rules.lock().unwrap().is_empty());

    server.shutdown.request(QuitReason::ControlQuit);
    let _ = server.task.await;
}
