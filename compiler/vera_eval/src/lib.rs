//! Constant-expression evaluation for the Vera HDL compiler.
//!
//! Elaboration needs parameter values, array bounds, generate conditions
//! and static assertions resolved before anything is simulated. This crate
//! runs the constant-evaluable subset of the language at compile time:
//!
//! - [`EvalContext`] owns the call stack, local storage, l-value stack,
//!   step counter and diagnostic log for one logical evaluation
//! - [`Frame`] is one activation record, addressed through stable
//!   [`LocalRef`] handles
//! - [`LValue`] names a place inside a local for in-flight assignments
//! - [`CachingDisabled`] scopes off result memoization
//! - the `exec` module walks `vera_ir` trees through the context
//!
//! # Usage
//!
//! ```text
//! let mut ctx = EvalContext::new(&unit, EvalFlags::CACHE_RESULTS);
//! let value = ctx.evaluate(expr);
//! if value.is_invalid() {
//!     ctx.report_diags(&mut queue);
//! }
//! ctx.reset();
//! ```
//!
//! # Debugging
//!
//! - `RUST_LOG=vera_eval=debug`: calls, limit hits, report flushes
//! - `RUST_LOG=vera_eval=trace`: every frame push/pop and cache hit

mod caching;
mod context;
mod exec;
mod flags;
mod frame;
mod limits;
mod lvalue;
mod stack;

use std::sync::Once;

pub use caching::CachingDisabled;
pub use context::EvalContext;
pub use exec::{EvalResult, Flow};
pub use flags::EvalFlags;
pub use frame::{Frame, LocalRef};
pub use limits::EvalLimits;
pub use lvalue::{LValue, Selector};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
