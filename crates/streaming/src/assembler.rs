//! Reassembly of out-of-band binary chunks into contiguous frame buffers.
//!
//! Chunk boundaries on the wire are opaque; the assembler's only job is to
//! buffer arrivals while the downstream sink is busy and hand over one
//! contiguous buffer, in exact arrival order, as soon as it is free.
//! Readiness is re-checked on every chunk arrival, never on a timer.

use std::collections::VecDeque;

use foundation::time::Timestamp;

use crate::sink::StreamSink;
use crate::timing::FrameIntervalStats;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AssemblerState {
    Idle,
    Accumulating,
}

#[derive(Debug, Default)]
pub struct StreamAssembler {
    pending: VecDeque<Vec<u8>>,
    pending_bytes: usize,
    flushes: u64,
    last_flush: Option<Timestamp>,
    stats: FrameIntervalStats,
}

impl StreamAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AssemblerState {
        if self.pending.is_empty() {
            AssemblerState::Idle
        } else {
            AssemblerState::Accumulating
        }
    }

    pub fn pending_bytes(&self) -> usize {
        self.pending_bytes
    }

    pub fn flushes(&self) -> u64 {
        self.flushes
    }

    pub fn interval_stats(&self) -> &FrameIntervalStats {
        &self.stats
    }

    /// Diagnostic only; assembly never acts on this.
    pub fn is_stalled(&self, now: Timestamp) -> bool {
        self.last_flush
            .is_some_and(|t| self.stats.is_stall(now.millis_since(t)))
    }

    /// Accept one inbound chunk. The chunk is buffered unconditionally —
    /// back-pressure never drops data — and a flush is attempted right away.
    /// Returns true if a flush happened.
    pub fn on_chunk(&mut self, sink: &mut dyn StreamSink, chunk: Vec<u8>, now: Timestamp) -> bool {
        self.pending_bytes += chunk.len();
        self.pending.push_back(chunk);
        self.flush_when_ready(sink, now)
    }

    /// Hand all pending chunks to the sink as one contiguous buffer if it is
    /// not mid-update. Playback is level-triggered: every successful flush
    /// (re)starts a paused sink.
    pub fn flush_when_ready(&mut self, sink: &mut dyn StreamSink, now: Timestamp) -> bool {
        if self.pending.is_empty() || sink.is_consuming() {
            return false;
        }

        let mut buffer = Vec::with_capacity(self.pending_bytes);
        while let Some(chunk) = self.pending.pop_front() {
            buffer.extend_from_slice(&chunk);
        }
        self.pending_bytes = 0;
        sink.consume(buffer);

        if let Some(previous) = self.last_flush {
            self.stats.record(now.millis_since(previous));
        }
        self.last_flush = Some(now);
        self.flushes += 1;

        if !sink.is_playing() {
            sink.play();
        }
        true
    }
}
