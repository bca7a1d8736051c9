//! Benchmarks for complete voices and the voice pool.

mod pool;
mod voices;

pub use pool::bench_pool;
pub use voices::bench_voices;
