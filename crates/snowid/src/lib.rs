//! Coordination-free, time-ordered 64-bit Snowflake IDs.
//!
//! Every ID packs, from most to least significant bit, a 41-bit millisecond
//! timestamp relative to a fixed epoch, an optional datacenter field, an
//! optional worker field, and a per-millisecond sequence filling the rest of
//! the 22 low bits. IDs from one [`IdGenerator`] strictly increase while the
//! clock does not move backward; IDs from generators with distinct
//! `(datacenter_id, worker_id)` pairs never collide.
//!
//! ```
//! use snowid::IdGenerator;
//!
//! // Single node: all 22 low bits are sequence bits.
//! let single = IdGenerator::single();
//! let a = single.next_id()?;
//! let b = single.next_id()?;
//! assert!(b > a);
//!
//! // 5 datacenter bits, 5 worker bits, 12 sequence bits.
//! let node = IdGenerator::cluster_with_datacenter(3, 5, 7, 5)?;
//! let parts = node.decode(node.next_id()?);
//! assert_eq!((parts.datacenter_id, parts.worker_id), (3, 7));
//! # Ok::<(), snowid::Error>(())
//! ```
//!
//! ## Feature flags
//!
//! - `parking-lot`: use `parking_lot::Mutex` (no lock poisoning)
//! - `cache-padded`: pad the generator state to a cache line
//! - `tracing`: emit `tracing` spans and events from the generator
//! - `serde`: (de)serialize [`SnowflakeId`], [`IdParts`], and
//!   [`GeneratorConfig`]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod generator;
mod id;
mod layout;
mod time;

pub use crate::error::*;
pub use crate::generator::{GeneratorConfig, IdGenStatus, IdGenerator};
pub use crate::id::*;
pub use crate::layout::*;
pub use crate::time::*;
