//! Message passing between halolife workers.
//!
//! [`Communicator`] is the transport seam: blocking, rank-addressed,
//! rendezvous point-to-point messages plus the two collectives setup and
//! presentation need (broadcast and gather). [`LocalComm`] implements it
//! for workers running as threads in one process. [`HaloExchanger`]
//! runs the two-phase boundary-row exchange on top of any communicator.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod comm;
pub mod error;
pub mod halo;
pub mod local;

pub use comm::{Communicator, Tag};
pub use error::CommError;
pub use halo::{Exchange, HaloExchanger, Order};
pub use local::LocalComm;
