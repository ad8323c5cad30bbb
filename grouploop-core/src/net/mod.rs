//! Network processes
//!
//! One shared socket connection ([`connection`]) feeds two processes:
//! [`publish`] serializes outgoing sensor frames, [`receive`] drains
//! incoming command frames.

pub mod connection;
pub mod publish;
pub mod receive;

pub use connection::{ConnState, ConnectionManager};
pub use publish::PublishProcess;
pub use receive::ReceiveProcess;
