//! In-process transport for workers running as threads.
//!
//! [`LocalComm::group`] wires one zero-capacity crossbeam channel per
//! ordered pair of ranks. A zero-capacity send completes only when the
//! receiver takes the message, which gives the rendezvous semantics the
//! halo protocol relies on: a mis-ordered exchange deadlocks instead of
//! silently buffering.
//!
//! Each endpoint owns the sending half of its outgoing channels and the
//! receiving half of its incoming ones. When an endpoint is dropped its
//! peers' pending and future operations against it fail with
//! [`CommError::Disconnected`].

use crossbeam_channel::{bounded, Receiver, Sender};
use halolife_core::{TopologyError, WorkerTopology};

use crate::comm::{check_rank, Communicator, Tag};
use crate::error::CommError;

struct Envelope {
    tag: Tag,
    payload: Vec<u8>,
}

/// One worker's endpoint in an in-process group.
///
/// [`Send`] so it can be moved into its worker thread; not shared.
pub struct LocalComm {
    topology: WorkerTopology,
    /// `outbox[d]` carries messages to rank `d`.
    outbox: Vec<Sender<Envelope>>,
    /// `inbox[s]` carries messages from rank `s`.
    inbox: Vec<Receiver<Envelope>>,
}

impl LocalComm {
    /// Create the `size` endpoints of a fully connected group, in rank order.
    pub fn group(size: usize) -> Result<Vec<LocalComm>, TopologyError> {
        if size == 0 {
            return Err(TopologyError { rank: 0, size });
        }
        let mut outboxes: Vec<Vec<Sender<Envelope>>> = (0..size).map(|_| Vec::new()).collect();
        let mut inboxes: Vec<Vec<Receiver<Envelope>>> = (0..size).map(|_| Vec::new()).collect();
        for outbox in outboxes.iter_mut() {
            for inbox in inboxes.iter_mut() {
                let (tx, rx) = bounded(0);
                outbox.push(tx);
                inbox.push(rx);
            }
        }
        outboxes
            .into_iter()
            .zip(inboxes)
            .enumerate()
            .map(|(rank, (outbox, inbox))| {
                Ok(LocalComm {
                    topology: WorkerTopology::new(rank, size)?,
                    outbox,
                    inbox,
                })
            })
            .collect()
    }

    fn peer(&self, peer: usize) -> Result<(), CommError> {
        check_rank(peer, self.topology.size())?;
        if peer == self.topology.rank() {
            return Err(CommError::SelfMessage { rank: peer });
        }
        Ok(())
    }
}

impl Communicator for LocalComm {
    fn topology(&self) -> WorkerTopology {
        self.topology
    }

    fn send(&self, payload: &[u8], dest: usize, tag: Tag) -> Result<(), CommError> {
        self.peer(dest)?;
        let envelope = Envelope {
            tag,
            payload: payload.to_vec(),
        };
        self.outbox[dest]
            .send(envelope)
            .map_err(|_| CommError::Disconnected { peer: dest })
    }

    fn recv_vec(&self, source: usize, tag: Tag) -> Result<Vec<u8>, CommError> {
        self.peer(source)?;
        let envelope = self.inbox[source]
            .recv()
            .map_err(|_| CommError::Disconnected { peer: source })?;
        if envelope.tag != tag {
            return Err(CommError::TagMismatch {
                peer: source,
                expected: tag,
                found: envelope.tag,
            });
        }
        Ok(envelope.payload)
    }
}

impl std::fmt::Debug for LocalComm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalComm")
            .field("rank", &self.topology.rank())
            .field("size", &self.topology.size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn group_assigns_ranks_in_order() {
        let comms = LocalComm::group(3).unwrap();
        let ranks: Vec<_> = comms.iter().map(|c| (c.rank(), c.size())).collect();
        assert_eq!(ranks, vec![(0, 3), (1, 3), (2, 3)]);
    }

    #[test]
    fn empty_group_rejected() {
        assert!(LocalComm::group(0).is_err());
    }

    #[test]
    fn send_blocks_until_received() {
        let mut comms = LocalComm::group(2).unwrap();
        let b = comms.pop().unwrap();
        let a = comms.pop().unwrap();
        let receiver = thread::spawn(move || {
            let mut buf = [0u8; 3];
            b.recv(&mut buf, 0, Tag::Halo).unwrap();
            buf
        });
        a.send(&[1, 0, 1], 1, Tag::Halo).unwrap();
        assert_eq!(receiver.join().unwrap(), [1, 0, 1]);
    }

    #[test]
    fn self_message_rejected() {
        let comms = LocalComm::group(2).unwrap();
        assert_eq!(
            comms[0].send(&[1], 0, Tag::Halo),
            Err(CommError::SelfMessage { rank: 0 })
        );
    }

    #[test]
    fn out_of_range_peer_rejected() {
        let comms = LocalComm::group(2).unwrap();
        assert_eq!(
            comms[1].recv_vec(5, Tag::Halo),
            Err(CommError::InvalidRank { rank: 5, size: 2 })
        );
    }

    #[test]
    fn dropped_peer_disconnects() {
        let mut comms = LocalComm::group(2).unwrap();
        let b = comms.pop().unwrap();
        drop(b);
        assert_eq!(
            comms[0].send(&[0], 1, Tag::Halo),
            Err(CommError::Disconnected { peer: 1 })
        );
        assert_eq!(
            comms[0].recv_vec(1, Tag::Halo),
            Err(CommError::Disconnected { peer: 1 })
        );
    }

    #[test]
    fn wrong_tag_is_a_protocol_violation() {
        let mut comms = LocalComm::group(2).unwrap();
        let b = comms.pop().unwrap();
        let a = comms.pop().unwrap();
        let sender = thread::spawn(move || a.send(&[7], 1, Tag::Gather));
        assert_eq!(
            b.recv_vec(0, Tag::Halo),
            Err(CommError::TagMismatch {
                peer: 0,
                expected: Tag::Halo,
                found: Tag::Gather,
            })
        );
        sender.join().unwrap().unwrap();
    }

    #[test]
    fn recv_checks_length() {
        let mut comms = LocalComm::group(2).unwrap();
        let b = comms.pop().unwrap();
        let a = comms.pop().unwrap();
        let sender = thread::spawn(move || a.send(&[1, 1], 1, Tag::Halo));
        let mut buf = [0u8; 3];
        assert_eq!(
            b.recv(&mut buf, 0, Tag::Halo),
            Err(CommError::LengthMismatch {
                expected: 3,
                found: 2
            })
        );
        sender.join().unwrap().unwrap();
    }

    #[test]
    fn broadcast_reaches_every_rank() {
        let comms = LocalComm::group(4).unwrap();
        let handles: Vec<_> = comms
            .into_iter()
            .map(|comm| {
                thread::spawn(move || {
                    let mut buf = if comm.rank() == 2 {
                        vec![9, 8, 7]
                    } else {
                        Vec::new()
                    };
                    comm.broadcast(&mut buf, 2).unwrap();
                    buf
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), vec![9, 8, 7]);
        }
    }

    #[test]
    fn gather_places_chunks_in_rank_order() {
        let comms = LocalComm::group(3).unwrap();
        let handles: Vec<_> = comms
            .into_iter()
            .map(|comm| {
                thread::spawn(move || {
                    let rank = comm.rank();
                    let mut buf = vec![0u8; 6];
                    buf[rank * 2] = rank as u8 + 1;
                    buf[rank * 2 + 1] = rank as u8 + 1;
                    comm.gather(&mut buf, 2, 0).unwrap();
                    (rank, buf)
                })
            })
            .collect();
        for h in handles {
            let (rank, buf) = h.join().unwrap();
            if rank == 0 {
                assert_eq!(buf, vec![1, 1, 2, 2, 3, 3]);
            } else {
                let mut own = vec![0u8; 6];
                own[rank * 2] = rank as u8 + 1;
                own[rank * 2 + 1] = rank as u8 + 1;
                assert_eq!(buf, own);
            }
        }
    }

    #[test]
    fn gather_rejects_bad_buffer() {
        let comms = LocalComm::group(1).unwrap();
        let mut buf = vec![0u8; 5];
        assert_eq!(
            comms[0].gather(&mut buf, 2, 0),
            Err(CommError::LengthMismatch {
                expected: 2,
                found: 5
            })
        );
    }

    #[test]
    fn solo_collectives_are_local() {
        let comms = LocalComm::group(1).unwrap();
        let mut buf = vec![1, 2];
        comms[0].broadcast(&mut buf, 0).unwrap();
        assert_eq!(buf, vec![1, 2]);
        comms[0].gather(&mut buf, 2, 0).unwrap();
        assert_eq!(buf, vec![1, 2]);
    }
}
