//! # secsend-store
//!
//! Content-addressed object store for the secsend relay: two-phase
//! (incomplete → complete) file objects, write-exclusion locking via
//! filesystem rendezvous, and TTL expiry checked on access. Every
//! invariant is anchored to the filesystem — there is no in-memory
//! registry (see `secsend-relay::state`).
//!
//! - [`store`] — [`store::ObjectStore`], the entry point for creating and
//!   opening objects.
//! - [`object`] — [`object::ObjectHandle`], the per-object operations.
//! - [`lock`] — [`lock::LockGuard`], the atomic-create write lock.
//! - [`paths`] — the content-addressed directory layout.
//! - [`ttl`] — `timeout_s`/`timeout_ts` bookkeeping and expiry checks.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod lock;
pub mod object;
pub mod paths;
pub mod store;
pub mod ttl;

pub use error::{Result, StoreError};
pub use lock::LockGuard;
pub use object::ObjectHandle;
pub use store::ObjectStore;
