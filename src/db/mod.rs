pub mod artifact;
pub mod cycles;
pub mod pool;
pub mod queries;

pub use cycles::{CycleRepository, IdGenerator, InMemoryCycleRepository, SequentialIds};
pub use pool::create_pool;
pub use queries::{init_schema, PgCycleRepository};
