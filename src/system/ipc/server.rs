//! Control channel server
//!
//! Owns the claimed endpoint and the process's single event loop: the
//! periodic tick, queued shutdown requests, and the accept loop all run
//! in one `select!`. Connections are handled inline, one at a time, so
//! read → dispatch → close ordering is structural; the bounded read
//! keeps a silent client from stalling the loop for longer than the
//! configured timeout.

use bytes::BytesMut;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::{UnixListener, UnixStream};
use tokio::time::{timeout_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::handler::{dispatch, ServerContext};
use super::protocol::{self, MAX_MESSAGE_SIZE};
use crate::structs::SampleRecord;
use crate::system::shutdown::{QuitReason, ShutdownController};

pub struct ControlServer {
    listener: UnixListener,
    ctx: ServerContext,
    read_timeout: Duration,
}

impl ControlServer {
    pub fn new(listener: UnixListener, ctx: ServerContext, read_timeout: Duration) -> Self {
        Self {
            listener,
            ctx,
            read_timeout,
        }
    }

    /// Run until a shutdown request arrives; returns why the loop ended.
    ///
    /// The caller releases the endpoint afterwards.
    pub async fn run(self, mut shutdown: ShutdownController, tick_every: Duration) -> QuitReason {
        let mut ticker = tokio::time::interval(tick_every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let sample = SampleRecord::new(1234, "object_1234");

        info!("control server listening, tick every {:?}", tick_every);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    debug!("periodic tick {}", sample);
                }
                Some(reason) = shutdown.requested() => {
                    info!("shutdown requested ({:?}), leaving accept loop", reason);
                    break reason;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, _addr)) => self.handle_connection(stream).await,
                    Err(e) => warn!("failed to accept control connection: {}", e),
                }
            }
        }
    }

    /// One connection lifecycle: bounded read, dispatch, close.
    async fn handle_connection(&self, mut stream: UnixStream) {
        debug!("control connection accepted");
        if let Some(payload) = read_frame(&mut stream, self.read_timeout).await {
            let fields = protocol::decode(&payload);
            info!("{} byte(s) received: {}", payload.len(), fields.join(" "));
            dispatch(&self.ctx, &fields);
        }
        // dropping the stream closes the connection
    }
}

/// Read one frame: everything the peer sends until EOF, bounded by
/// `limit`.
///
/// On timeout, whatever has arrived so far is processed (the peer may
/// still hold the connection open); a connection that sent nothing
/// within the bound is abandoned with a warning. Oversize payloads are
/// dropped.
async fn read_frame(stream: &mut UnixStream, limit: Duration) -> Option<BytesMut> {
    let mut buf = BytesMut::with_capacity(256);
    let mut chunk = [0u8; 1024];
    let deadline = Instant::now() + limit;

    loop {
        match timeout_at(deadline, stream.read(&mut chunk)).await {
            Ok(Ok(0)) => break,
            Ok(Ok(n)) => {
                if buf.len() + n > MAX_MESSAGE_SIZE {
                    warn!(
                        "control message exceeds {} bytes, dropping connection",
                        MAX_MESSAGE_SIZE
                    );
                    return None;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            Ok(Err(e)) => {
                warn!("control connection read error: {}", e);
                return None;
            }
            Err(_) => {
                if buf.is_empty() {
                    warn!("cannot read data: nothing received within {:?}", limit);
                    return None;
                }
                break;
            }
        }
    }

    if buf.is_empty() {
        debug!("peer closed the connection without sending data");
        return None;
    }
    Some(buf)
}
