//! Use cases: the round coordinator, split into a synchronous state
//! machine core and the async actor that owns it.

pub mod round_runtime;
pub mod round_session;
