pub mod swap_pipeline;
pub mod worker_pool;

pub use swap_pipeline::{Budget, CancelToken, Stage, SwapOutput, SwapPipeline, SwapRequest};
pub use worker_pool::SwapPool;
