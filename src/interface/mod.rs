//! Public interface for driving the aggregation core.

mod context;

pub use context::Context;
