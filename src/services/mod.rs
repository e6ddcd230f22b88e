// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod aggregation;
pub mod export;
pub mod placement;
pub mod sheets;
pub mod store;

pub use sheets::{SheetsSyncService, SyncBackfillResult, SyncError};
pub use store::{AddOutcome, EntryStore, StoreError, StoreEvent, SyncHook};
