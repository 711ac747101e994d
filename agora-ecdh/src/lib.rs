#![deny(clippy::all)]
#![deny(clippy::dbg_macro)]

pub mod channel;
pub mod config;
pub mod exchange;
pub mod knowledge;
pub mod participant;

pub use channel::{Agent, ListenerId, UnsecureChannel, EAVESDROPPER};
pub use exchange::{run_exchange, ExchangeOutcome, Stage};
pub use knowledge::{Knowledge, KnowledgeStore};
pub use participant::{random_private, Participant};
