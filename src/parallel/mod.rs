pub mod batch;
pub mod pool;

pub use batch::{batch_ranges, run_team_shards};
pub use pool::WorkerPool;
