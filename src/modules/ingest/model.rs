use crate::infrastructure::media::FlowHandle;

/// Everything a flow needs, derived from one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub signed_source_url: String,
    pub import_path: String,
    pub transcode_directory: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Created(FlowHandle),
    /// The object is not a video; no flow was requested.
    Skipped {
        key: String,
        content_type: Option<String>,
    },
}
