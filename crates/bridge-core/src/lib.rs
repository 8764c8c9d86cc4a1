//! The relay engine: per-domain pollers feed a router, which dispatches each
//! message to the voter responsible for its destination domain.

mod error;
mod metrics;
mod poller;
mod router;
mod transactor;
mod voter;

pub use error::{PollerError, TransactorError, VoterError};
pub use metrics::{NoopMetrics, RelayMetrics};
pub use poller::{DEFAULT_BLOCK_DELAY, DEFAULT_BLOCK_RETRY_INTERVAL, EventPoller};
pub use router::RelayerCore;
pub use transactor::Transactor;
pub use voter::{Voter, WriterChain};
