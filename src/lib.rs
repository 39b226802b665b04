//! spamguard — terminal dashboard client for a remote spam
//! classification service.
//!
//! Three mutually exclusive views over one controller: Analyzer (submit
//! email text, see the verdict), History (the stored audit log), and
//! Analytics (the verdict distribution). The orchestration core lives in
//! [`controller`]; [`client`] owns the wire contract, [`verdict`] the
//! normalization of raw classifier responses.

pub mod cli;
pub mod client;
pub mod config;
pub mod controller;
pub mod render;
pub mod verdict;
