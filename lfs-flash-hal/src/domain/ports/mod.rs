//! Ports - Interfaces between the filesystem core and storage adapters.

mod block_ops;

pub use block_ops::BlockOps;
