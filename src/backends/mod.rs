//! Segmenter backend implementations
//!
//! Real model runtimes implement [`crate::Segmenter`] outside this crate;
//! the mock backend here enables testing and debugging without model
//! files or an inference runtime.

mod mock;

pub use mock::MockSegmenter;
