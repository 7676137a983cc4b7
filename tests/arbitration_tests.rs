//! Role arbitration and endpoint lifecycle tests
//!
//! Cover the startup decision point: mutual exclusion of the server
//! role, the no-argument fast exit, and stale-registration cleanup.

use std::time::Duration;

use tempfile::TempDir;
use tokio::io::AsyncReadExt;
use tokio::time::timeout;

use dynalog::system::arbitrator::{arbitrate, Arbitration};
use dynalog::system::ipc::client::ForwardOutcome;
use dynalog::system::ipc::endpoint::{ClaimError, Endpoint};

const IO_TIMEOUT: Duration = Duration::from_millis(500);

fn test_endpoint(dir: &TempDir) -> Endpoint {
    Endpoint::new(dir.path().join("dynalog-test.sock"))
}

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn at_most_one_claim_succeeds() {
    let dir = TempDir::new().expect("temp dir");
    let endpoint = test_endpoint(&dir);

    let _listener = endpoint.claim().expect("first claim");
    match endpoint.claim() {
        Err(ClaimError::AlreadyClaimed) => {}
        other => panic!("expected AlreadyClaimed, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn no_arguments_means_immediate_termination_without_contact() {
    let dir = TempDir::new().expect("temp dir");
    let endpoint = test_endpoint(&dir);
    let listener = endpoint.claim().expect("claim");

    let outcome = arbitrate(&endpoint, &[], IO_TIMEOUT).await.expect("arbitrate");
    assert!(matches!(outcome, Arbitration::AlreadyRunning));

    // The no-arg path never connects, so nothing shows up at the server
    assert!(
        timeout(Duration::from_millis(200), listener.accept())
            .await
            .is_err(),
        "no connection should have been made"
    );
}

#[tokio::test]
async fn arguments_are_forwarded_to_the_claim_holder() {
    let dir = TempDir::new().expect("temp dir");
    let endpoint = test_endpoint(&dir);
    let listener = endpoint.claim().expect("claim");

    let reader = tokio::spawn(async move {
        let (mut stream, _addr) = listener.accept().await.expect("accept");
        let mut payload = Vec::new();
        stream.read_to_end(&mut payload).await.expect("read");
        payload
    });

    let outcome = arbitrate(&endpoint, &args(&["-f", "%{message}"]), IO_TIMEOUT)
        .await
        .expect("arbitrate");
    match outcome {
        Arbitration::Forwarded(ForwardOutcome::Sent { bytes }) => {
            assert_eq!(bytes, "-f\u{8}%{message}".len());
        }
        other => panic!("expected Forwarded(Sent), got {:?}", other),
    }

    let payload = timeout(Duration::from_secs(2), reader)
        .await
        .expect("reader stalled")
        .expect("reader panicked");
    assert_eq!(payload, b"-f\x08%{message}");
}

#[tokio::test]
async fn stale_registration_is_cleaned_then_claimable() {
    let dir = TempDir::new().expect("temp dir");
    let endpoint = test_endpoint(&dir);

    // A crashed server leaves the socket file behind with nothing
    // accepting on it
    let stale = std::os::unix::net::UnixListener::bind(endpoint.path()).expect("bind stale");
    drop(stale);
    assert!(endpoint.path().exists());
    assert!(!endpoint.is_live());

    let outcome = arbitrate(&endpoint, &args(&["-q"]), IO_TIMEOUT)
        .await
        .expect("arbitrate");
    assert!(matches!(outcome, Arbitration::CleanedStale));
    assert!(!endpoint.path().exists(), "stale socket file must be gone");

    // The next launch can become the server
    let outcome = arbitrate(&endpoint, &[], IO_TIMEOUT).await.expect("arbitrate");
    assert!(matches!(outcome, Arbitration::Server(_)));
}

#[tokio::test]
async fn release_removes_the_registration() {
    let dir = TempDir::new().expect("temp dir");
    let endpoint = test_endpoint(&dir);

    let listener = endpoint.claim().expect("claim");
    assert!(endpoint.is_live());

    drop(listener);
    endpoint.release();
    assert!(!endpoint.path().exists());
    assert!(!endpoint.is_live());
}
