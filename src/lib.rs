#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod capacity;

mod error;

pub mod fnv;

/// A key-value map on top of the linear-probing table.
///
/// Keys implement [`Key`]; values can be any type. The map owns whatever its
/// type parameters own.
pub mod hash_map;

/// A set on top of the linear-probing table.
pub mod hash_set;

/// The raw open-addressing table shared by the map and the set.
///
/// Callers supply hashes and equality predicates themselves.
pub mod hash_table;

pub mod key;

pub use error::Error;
pub use error::InvalidArgument;
pub use fnv::FnvBuildHasher;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use key::Key;

/// A seeded hash builder for keys that may come from untrusted input.
#[cfg(feature = "foldhash")]
pub type FoldHashBuilder = foldhash::fast::RandomState;
