//! The transport seam between workers.
//!
//! Implementors provide two primitives: a rendezvous send that returns
//! only once the destination has taken the message, and a blocking
//! receive from a named source. [`broadcast`](Communicator::broadcast)
//! and [`gather`](Communicator::gather) are built from those, so every
//! transport gets the same collective semantics.

use halolife_core::WorkerTopology;

use crate::error::CommError;

/// Which operation a message belongs to.
///
/// Receivers check the tag, so a message from one phase consumed by
/// another fails loudly instead of corrupting a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Boundary row for the halo exchange.
    Halo,
    /// Setup broadcast from the root.
    Broadcast,
    /// Owned rows travelling to the gather root.
    Gather,
}

/// A worker's endpoint in a fixed-size group.
///
/// All operations block. There is no timeout: if a peer never posts the
/// matching operation the call waits forever, unless the transport can
/// tell the peer is gone, in which case it returns
/// [`CommError::Disconnected`].
pub trait Communicator {
    /// This endpoint's identity, fixed for its lifetime.
    fn topology(&self) -> WorkerTopology;

    /// Send `payload` to `dest`, returning once `dest` has received it.
    fn send(&self, payload: &[u8], dest: usize, tag: Tag) -> Result<(), CommError>;

    /// Receive the next message from `source`, which must carry `tag`.
    fn recv_vec(&self, source: usize, tag: Tag) -> Result<Vec<u8>, CommError>;

    /// This worker's rank.
    fn rank(&self) -> usize {
        self.topology().rank()
    }

    /// Number of workers in the group.
    fn size(&self) -> usize {
        self.topology().size()
    }

    /// Receive a message from `source` into `buffer`, whose length must
    /// match the message exactly.
    fn recv(&self, buffer: &mut [u8], source: usize, tag: Tag) -> Result<(), CommError> {
        let payload = self.recv_vec(source, tag)?;
        if payload.len() != buffer.len() {
            return Err(CommError::LengthMismatch {
                expected: buffer.len(),
                found: payload.len(),
            });
        }
        buffer.copy_from_slice(&payload);
        Ok(())
    }

    /// Replace `buffer` on every rank with the root's `buffer`.
    ///
    /// The root sends to the other ranks in ascending order.
    fn broadcast(&self, buffer: &mut Vec<u8>, root: usize) -> Result<(), CommError> {
        let topology = self.topology();
        check_rank(root, topology.size())?;
        if topology.rank() == root {
            for dest in (0..topology.size()).filter(|&r| r != root) {
                self.send(buffer.as_slice(), dest, Tag::Broadcast)?;
            }
        } else {
            *buffer = self.recv_vec(root, Tag::Broadcast)?;
        }
        Ok(())
    }

    /// Collect every rank's chunk into the root's `buffer`.
    ///
    /// `buffer` is laid out as `size` chunks of `chunk` bytes; rank `r`
    /// contributes `buffer[r * chunk..(r + 1) * chunk]` from its own
    /// buffer. On return the root's buffer holds all chunks in rank
    /// order. Non-root buffers are unchanged.
    fn gather(&self, buffer: &mut [u8], chunk: usize, root: usize) -> Result<(), CommError> {
        let topology = self.topology();
        let size = topology.size();
        check_rank(root, size)?;
        if buffer.len() != chunk * size {
            return Err(CommError::LengthMismatch {
                expected: chunk * size,
                found: buffer.len(),
            });
        }
        let rank = topology.rank();
        if rank == root {
            for source in (0..size).filter(|&r| r != root) {
                let slot = &mut buffer[source * chunk..(source + 1) * chunk];
                self.recv(slot, source, Tag::Gather)?;
            }
        } else {
            self.send(&buffer[rank * chunk..(rank + 1) * chunk], root, Tag::Gather)?;
        }
        Ok(())
    }
}

/// Reject ranks outside `[0, size)`.
pub(crate) fn check_rank(rank: usize, size: usize) -> Result<(), CommError> {
    if rank >= size {
        return Err(CommError::InvalidRank { rank, size });
    }
    Ok(())
}
