//! Communication failures.

use thiserror::Error;

use crate::comm::Tag;

/// A point-to-point or collective operation could not complete.
///
/// None of these is retried: each one means a peer died or the
/// protocol was violated, and the run is abandoned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CommError {
    /// The peer's endpoint is gone (its worker exited or panicked).
    #[error("peer {peer} disconnected")]
    Disconnected {
        /// Rank of the vanished peer.
        peer: usize,
    },
    /// A rank outside `[0, size)` was addressed.
    #[error("rank {rank} is outside a group of {size}")]
    InvalidRank {
        /// The addressed rank.
        rank: usize,
        /// The group size.
        size: usize,
    },
    /// A worker addressed itself; a rendezvous with oneself never completes.
    #[error("rank {rank} cannot exchange messages with itself")]
    SelfMessage {
        /// The worker's own rank.
        rank: usize,
    },
    /// A message arrived from the right peer but for the wrong operation.
    #[error("expected {expected:?} message from {peer}, got {found:?}")]
    TagMismatch {
        /// Sender rank.
        peer: usize,
        /// Tag the receiver was waiting for.
        expected: Tag,
        /// Tag actually received.
        found: Tag,
    },
    /// A message or buffer had the wrong length.
    #[error("expected {expected} bytes, got {found}")]
    LengthMismatch {
        /// Length the receiver expected.
        expected: usize,
        /// Length actually present.
        found: usize,
    },
}
