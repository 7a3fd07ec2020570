//! Drives a recording through to a consumer.
//!
//! A replay has two phases. First the structured records are decoded one by
//! one, forwarded unchanged and paced by their elapse clock. Once the
//! terminator tag (or the end of the file) is reached, whatever follows is
//! copied verbatim without interpretation.

use std::time::Duration;

use bve_recordparser::{read_record, RecordOutcome};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use crate::consumer::Consumer;
use crate::error::ReplayError;
use crate::pacer::Pacer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    HeaderParse,
    RawPassthrough,
    Done,
}

/// What a completed replay forwarded.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Records decoded, not counting the terminator.
    pub records: u64,
    pub timing_records: u64,
    /// Bytes forwarded while decoding records, terminator included.
    pub header_bytes: u64,
    /// Bytes copied verbatim after the records.
    pub passthrough_bytes: u64,
    pub saw_terminator: bool,
    /// Total time spent reproducing recorded gaps.
    pub paused: Duration,
}

impl ReplaySummary {
    pub fn total_bytes(&self) -> u64 {
        self.header_bytes + self.passthrough_bytes
    }
}

/// Replays a recording into a consumer it owns.
pub struct ReplayDriver<C> {
    consumer: C,
    pacer: Pacer,
}

impl<C: Consumer> ReplayDriver<C> {
    pub fn new(consumer: C) -> Self {
        Self {
            consumer,
            pacer: Pacer::new(),
        }
    }

    pub fn consumer(&self) -> &C {
        &self.consumer
    }

    pub fn into_consumer(self) -> C {
        self.consumer
    }

    /// Runs the replay to completion.
    ///
    /// The consumer is terminated before this returns, whether the replay
    /// finished, failed, or was cancelled through `token`.
    pub async fn run<R>(
        &mut self,
        source: &mut R,
        token: &CancellationToken,
    ) -> Result<ReplaySummary, ReplayError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let result = match self.consumer.sink() {
            Ok(sink) => tokio::select! {
                res = forward(&mut self.pacer, source, sink) => res,
                _ = token.cancelled() => Err(ReplayError::Cancelled),
            },
            Err(err) => Err(err.into()),
        };

        match self.consumer.terminate().await {
            Ok(()) => result,
            Err(err) => {
                log::error!("failed to terminate consumer: {}", err);
                // The replay outcome takes precedence over the cleanup failure.
                result.and(Err(err.into()))
            }
        }
    }
}

async fn forward<R, W>(
    pacer: &mut Pacer,
    source: &mut R,
    sink: &mut W,
) -> Result<ReplaySummary, ReplayError>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut summary = ReplaySummary::default();
    let mut phase = Phase::HeaderParse;

    while phase != Phase::Done {
        phase = match phase {
            Phase::HeaderParse => match read_record(source, sink).await? {
                RecordOutcome::Decoded(record) => {
                    summary.records += 1;
                    summary.header_bytes += record.len as u64;
                    if let Some(elapsed) = record.elapsed {
                        summary.timing_records += 1;
                        summary.paused += pacer.on_timing_record(elapsed).await;
                    }
                    Phase::HeaderParse
                }
                RecordOutcome::Terminator => {
                    summary.header_bytes += 1;
                    summary.saw_terminator = true;
                    log::debug!(records = summary.records; "end of records");
                    Phase::RawPassthrough
                }
                RecordOutcome::EndOfStream => {
                    log::debug!(records = summary.records; "recording ended without terminator");
                    Phase::RawPassthrough
                }
            },
            Phase::RawPassthrough => {
                summary.passthrough_bytes = tokio::io::copy(source, sink).await?;
                Phase::Done
            }
            Phase::Done => Phase::Done,
        };
    }

    sink.flush().await?;
    Ok(summary)
}
