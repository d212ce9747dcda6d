pub mod handler;
pub mod service;

pub use service::{DispatchError, DispatchOutcome, Dispatcher, TimeBudget};
