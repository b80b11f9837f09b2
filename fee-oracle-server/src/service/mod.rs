//! Background ingestion of the upstream mempool feed

mod backoff;
mod mempool_listener;
mod messages;

pub use backoff::Backoff;
pub use mempool_listener::{ListenerConfig, ListenerError, MempoolListener};
pub use messages::{InboundFrame, ProjectedBlock, SubscribeRequest, TransactionEvent};
