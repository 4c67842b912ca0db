// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::VecDeque;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use relink_core::{codec, ChannelState, Payload};

use crate::channel::{Channel, ChannelEvent, ChannelEvents};
use crate::cli::ConnectArgs;
use crate::config::Config;
use crate::error::{Error, Result};

/// How long to wait for the close handshake after stdin ends.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// Open a channel and pipe stdin/stdout through it until stdin ends.
pub async fn run(args: ConnectArgs) -> Result<()> {
    let config = Config::load(args.config.as_deref())?.resolve(args.overrides())?;
    info!(
        endpoint = %config.endpoint,
        interval_ms = config.reconnect_interval_ms,
        max_attempts = config.max_reconnect_attempts,
        "opening channel"
    );

    let (channel, events) = Channel::spawn(config);
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    pipe(
        &channel,
        events,
        stdin,
        &mut stdout,
        Duration::from_millis(args.linger_ms),
    )
    .await
}

/// Forward `input` lines to the channel and print inbound messages to
/// `output`, one JSON object per line.
///
/// Input is only read while the channel is open. A line the channel
/// refuses because the connection just dropped is held and sent, in order,
/// once the channel reopens. A line queued in the same instant the
/// connection drops is delivered at most once. Returns once input is
/// exhausted, every held line is sent and the linger period has passed, or
/// with [`Error::ConnectionFailed`] when the channel gives up.
pub async fn pipe<R, W>(
    channel: &Channel,
    mut events: ChannelEvents,
    input: R,
    output: &mut W,
    linger: Duration,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut state = channel.state();
    let mut line_number = 0usize;
    let mut held = VecDeque::new();
    let mut input_done = false;

    channel.connect();

    loop {
        if state == ChannelState::Open {
            flush(channel, &mut held);
        }
        if input_done && held.is_empty() {
            break;
        }

        let reading = !input_done && held.is_empty() && state == ChannelState::Open;
        tokio::select! {
            biased;

            event = events.recv() => match event {
                Some(event) => handle_event(event, &mut state, output).await?,
                None => return Ok(()),
            },
            line = lines.next_line(), if reading => match line? {
                Some(line) => {
                    line_number += 1;
                    if let Some(payload) = parse_line(line_number, &line) {
                        held.push_back(payload);
                    }
                }
                None => input_done = true,
            },
        }
    }

    debug!("input closed");
    if !linger.is_zero() {
        let deadline = tokio::time::sleep(linger);
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                _ = &mut deadline => break,
                event = events.recv() => match event {
                    Some(event) => handle_event(event, &mut state, output).await?,
                    None => return Ok(()),
                },
            }
        }
    }

    channel.disconnect();
    if state != ChannelState::Closed {
        let closed = wait_closed(&mut events, &mut state, output);
        if tokio::time::timeout(CLOSE_TIMEOUT, closed).await.is_err() {
            warn!("timed out waiting for the connection to close");
        }
    }
    Ok(())
}

async fn handle_event<W>(event: ChannelEvent, state: &mut ChannelState, output: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    match event {
        ChannelEvent::StateChanged(next) => {
            *state = next;
            info!("channel {}", next);
        }
        ChannelEvent::Message(payload) => write_message(output, &payload).await?,
        ChannelEvent::ReconnectScheduled { attempt, delay } => {
            warn!(
                "connection lost, reconnecting in {}ms (attempt {})",
                delay.as_millis(),
                attempt
            );
        }
        ChannelEvent::Failed { attempts } => return Err(Error::ConnectionFailed { attempts }),
    }
    Ok(())
}

async fn wait_closed<W>(
    events: &mut ChannelEvents,
    state: &mut ChannelState,
    output: &mut W,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(event) = events.recv().await {
        if let ChannelEvent::Message(payload) = &event {
            write_message(output, payload).await?;
        } else if let ChannelEvent::StateChanged(next) = event {
            *state = next;
            if next == ChannelState::Closed {
                break;
            }
        }
    }
    Ok(())
}

/// Parse one input line as a JSON object. Blank lines are skipped.
fn parse_line(line_number: usize, line: &str) -> Option<Payload> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match codec::decode(line) {
        Ok(payload) => Some(payload),
        Err(e) => {
            eprintln!("skipping input line {}: {}", line_number, e);
            None
        }
    }
}

/// Send held lines in order, stopping at the first one the channel refuses.
fn flush(channel: &Channel, held: &mut VecDeque<Payload>) {
    while let Some(payload) = held.front() {
        if !channel.send(payload) {
            debug!("holding {} input line(s) until the channel reopens", held.len());
            return;
        }
        held.pop_front();
    }
}

async fn write_message<W>(output: &mut W, payload: &Payload) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_string(payload)?;
    line.push('\n');
    output.write_all(line.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
#[path = "connect_tests.rs"]
mod tests;
