//! Line-delimited JSON-RPC over stdin/stdout.
//!
//! The smallest useful client transport: one client (slot 0), one
//! request per line in, one response/notification per line out. A
//! dedicated reader thread feeds [`EVENT_CHANNEL`]; the control loop
//! drains [`OUT_CHANNEL`] to stdout via [`flush_outbound`].

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use log::{debug, info};

use crate::bridge::channels::{ClientEvent, EVENT_CHANNEL, OUT_CHANNEL};
use crate::bridge::ports::ClientId;

/// The stdio client always occupies slot 0.
pub const STDIO_SLOT: ClientId = 0;

/// Retry interval when the event channel is momentarily full.
const SEND_RETRY: Duration = Duration::from_millis(1);

/// Spawn the stdin reader thread.
///
/// Emits `Connected` immediately, one `Message` per non-blank line,
/// and `Disconnected` on EOF or read error. Joins when stdin closes.
pub fn spawn_reader() -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("stdio-reader".into())
        .spawn(|| {
            info!("stdio client attached (slot {STDIO_SLOT})");
            push_event(ClientEvent::Connected {
                client_id: STDIO_SLOT,
            });

            for line in io::stdin().lock().lines() {
                let Ok(text) = line else { break };
                if text.trim().is_empty() {
                    continue;
                }
                debug!("stdio <- {text}");
                push_event(ClientEvent::Message {
                    client_id: STDIO_SLOT,
                    text,
                });
            }

            info!("stdin closed, detaching client");
            push_event(ClientEvent::Disconnected {
                client_id: STDIO_SLOT,
            });
        })
        .expect("spawning the stdio reader thread cannot fail")
}

/// Write every queued outbound message to stdout, one per line.
pub fn flush_outbound() -> io::Result<()> {
    let mut out = io::stdout().lock();
    let mut wrote = false;
    while let Ok(msg) = OUT_CHANNEL.try_receive() {
        debug!("stdio -> {}", msg.text);
        writeln!(out, "{}", msg.text)?;
        wrote = true;
    }
    if wrote {
        out.flush()?;
    }
    Ok(())
}

/// Deliver an event, waiting out momentary channel pressure. Requests
/// are never dropped — the reader thread has nothing better to do.
fn push_event(mut event: ClientEvent) {
    loop {
        match EVENT_CHANNEL.try_send(event) {
            Ok(()) => return,
            Err(embassy_sync::channel::TrySendError::Full(e)) => {
                event = e;
                thread::sleep(SEND_RETRY);
            }
        }
    }
}
