//! Bridge relayer entrypoint.
//!
//! Observes `Deposit` events on each configured chain and submits
//! corresponding `voteProposal` transactions on the message's destination
//! chain. See the crate-level docs for the module breakdown.

use std::process;

use bridge_relayer::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        process::exit(1);
    }
}
