pub mod error;
pub mod events;
pub mod flow;
pub mod handler;
pub mod model;
pub mod paths;
pub mod service;

pub use error::SubmitError;
pub use model::{JobRequest, Submission};
pub use service::{AckPolicy, JobSubmitter};
