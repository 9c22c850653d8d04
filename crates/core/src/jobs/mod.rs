//! External analysis job layer.
//!
//! A job is one out-of-process invocation of an analysis script:
//!
//! 1. [`dispatcher`] spawns the interpreter with an argument vector and an
//!    optional stdin payload, and reports an [`dispatcher::Outcome`].
//! 2. [`extract`] recovers the JSON payload from the captured stdout.
//! 3. [`envelope`] folds both into the response shape callers see.
//!
//! [`interpreter`] resolves the interpreter path once at startup and
//! [`subprocess`] holds the spawn/drain/wait mechanics.

pub mod dispatcher;
pub mod envelope;
pub mod extract;
pub mod interpreter;
pub mod subprocess;
