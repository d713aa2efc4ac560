//! Ports (trait boundaries) between the game core and its collaborators.
//!
//! Policies plug into the environment and trainer through [`Policy`];
//! observers receive training events through [`Observer`].

pub mod observer;
pub mod policy;

pub use observer::Observer;
pub use policy::{Policy, ValuePolicy};
