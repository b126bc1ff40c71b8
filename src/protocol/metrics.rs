use std::sync::atomic::{AtomicU64, Ordering};

use super::Error;

/// Track codec and dispatch counters without external dependencies.
pub(crate) struct Metrics;

static PARAMS_ENCODED: AtomicU64 = AtomicU64::new(0);
static PARAMS_DECODED: AtomicU64 = AtomicU64::new(0);
static COMMANDS_ENCODED: AtomicU64 = AtomicU64::new(0);
static COMMANDS_DECODED: AtomicU64 = AtomicU64::new(0);
static COMMANDS_DISPATCHED: AtomicU64 = AtomicU64::new(0);

struct RejectionCounters {
    version_mismatch: AtomicU64,
    buffer_too_small: AtomicU64,
    truncated_payload: AtomicU64,
    unknown_opcode: AtomicU64,
    invalid_length: AtomicU64,
    unsupported: AtomicU64,
    other: AtomicU64,
}

static REJECTIONS: RejectionCounters = RejectionCounters::new();

impl RejectionCounters {
    const fn new() -> Self {
        Self {
            version_mismatch: AtomicU64::new(0),
            buffer_too_small: AtomicU64::new(0),
            truncated_payload: AtomicU64::new(0),
            unknown_opcode: AtomicU64::new(0),
            invalid_length: AtomicU64::new(0),
            unsupported: AtomicU64::new(0),
            other: AtomicU64::new(0),
        }
    }

    fn increment(&self, rejection: Rejection) {
        let counter = match rejection {
            Rejection::VersionMismatch => &self.version_mismatch,
            Rejection::BufferTooSmall => &self.buffer_too_small,
            Rejection::TruncatedPayload => &self.truncated_payload,
            Rejection::UnknownOpcode => &self.unknown_opcode,
            Rejection::InvalidLength => &self.invalid_length,
            Rejection::Unsupported => &self.unsupported,
            Rejection::Other => &self.other,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Reason a buffer or command was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Rejection {
    VersionMismatch,
    BufferTooSmall,
    TruncatedPayload,
    UnknownOpcode,
    InvalidLength,
    Unsupported,
    Other,
}

impl From<&Error> for Rejection {
    fn from(err: &Error) -> Self {
        match err {
            Error::VersionMismatch { .. } => Self::VersionMismatch,
            Error::BufferTooSmall { .. } => Self::BufferTooSmall,
            Error::TruncatedPayload { .. } => Self::TruncatedPayload,
            Error::UnknownOpcode { .. } => Self::UnknownOpcode,
            Error::InvalidLength { .. } => Self::InvalidLength,
            Error::UnsupportedCommand { .. } | Error::UnsupportedParam { .. } => Self::Unsupported,
            _ => Self::Other,
        }
    }
}

impl Metrics {
    #[inline]
    pub(crate) fn record_params_encoded() {
        PARAMS_ENCODED.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_params_decoded() {
        PARAMS_DECODED.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_command_encoded() {
        COMMANDS_ENCODED.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_command_decoded() {
        COMMANDS_DECODED.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_dispatch() {
        COMMANDS_DISPATCHED.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_rejection(rejection: Rejection) {
        REJECTIONS.increment(rejection);
    }

    #[inline]
    pub(crate) fn totals() -> CodecStats {
        CodecStats {
            params_encoded: PARAMS_ENCODED.load(Ordering::Relaxed),
            params_decoded: PARAMS_DECODED.load(Ordering::Relaxed),
            commands_encoded: COMMANDS_ENCODED.load(Ordering::Relaxed),
            commands_decoded: COMMANDS_DECODED.load(Ordering::Relaxed),
            commands_dispatched: COMMANDS_DISPATCHED.load(Ordering::Relaxed),
            rejected_version: REJECTIONS.version_mismatch.load(Ordering::Relaxed),
            rejected_buffer_too_small: REJECTIONS.buffer_too_small.load(Ordering::Relaxed),
            rejected_truncated: REJECTIONS.truncated_payload.load(Ordering::Relaxed),
            rejected_opcode: REJECTIONS.unknown_opcode.load(Ordering::Relaxed),
            rejected_length: REJECTIONS.invalid_length.load(Ordering::Relaxed),
            rejected_unsupported: REJECTIONS.unsupported.load(Ordering::Relaxed),
            rejected_other: REJECTIONS.other.load(Ordering::Relaxed),
        }
    }
}

/// Process-wide snapshot of codec counters.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct CodecStats {
    pub params_encoded: u64,
    pub params_decoded: u64,
    pub commands_encoded: u64,
    pub commands_decoded: u64,
    pub commands_dispatched: u64,
    pub rejected_version: u64,
    pub rejected_buffer_too_small: u64,
    pub rejected_truncated: u64,
    pub rejected_opcode: u64,
    pub rejected_length: u64,
    pub rejected_unsupported: u64,
    pub rejected_other: u64,
}

impl CodecStats {
    /// Read the current counters.
    #[must_use]
    pub fn snapshot() -> Self {
        Metrics::totals()
    }

    /// Total refused buffers and commands.
    #[must_use]
    pub fn total_rejected(&self) -> u64 {
        self.rejected_version
            + self.rejected_buffer_too_small
            + self.rejected_truncated
            + self.rejected_opcode
            + self.rejected_length
            + self.rejected_unsupported
            + self.rejected_other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_counted() {
        let before = CodecStats::snapshot();
        Metrics::record_rejection(Rejection::from(&Error::UnknownOpcode { opcode: 9 }));
        Metrics::record_rejection(Rejection::from(&Error::UnsupportedCommand { code: 9 }));
        let after = CodecStats::snapshot();

        assert!(after.rejected_opcode > before.rejected_opcode);
        assert!(after.rejected_unsupported > before.rejected_unsupported);
        assert!(after.total_rejected() >= before.total_rejected() + 2);
    }
}
