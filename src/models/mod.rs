// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod entry;
pub mod goal;
pub mod placement;
pub mod snapshot;
pub mod stats;
pub mod sync;

pub use entry::{EggLogEntry, NewEggLog};
pub use goal::GoalSettings;
pub use placement::{Container, HarvestPolicy, PlacementInstruction};
pub use snapshot::StoreSnapshot;
pub use stats::{TotalCollections, TrendPoint, WeeklyStats};
pub use sync::{SyncAction, SyncStatus};
