pub mod cycle;
pub mod order;
pub mod recipe;
pub mod snapshot;

pub use cycle::{Cycle, NewCycle};
pub use order::{OrderRow, OrderTable, UsageRecord};
pub use recipe::{Recipe, SalesPlanEntry};
pub use snapshot::{MetadataColumns, Snapshot, SnapshotRow, UnifiedRow, UnifiedTable};
