/// Where imports and transcodes land on the media platform.
#[derive(Clone, Debug)]
pub struct PathPolicy {
    pub import_root: String,
    pub transcode_root: String,
    /// Replace an existing import at the same path instead of adding a new one.
    pub override_existing: bool,
    /// Set from configuration only when overriding is explicitly off.
    pub use_timestamp: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Destinations {
    pub import_path: String,
    pub transcode_directory: String,
}

impl PathPolicy {
    /// Overriding needs a stable path, so it disables the timestamp segment.
    pub fn stamps_paths(&self) -> bool {
        self.use_timestamp && !self.override_existing
    }

    pub fn destinations(&self, object_key: &str, timestamp_ms: i64) -> Destinations {
        let stamp = if self.stamps_paths() {
            format!("/{timestamp_ms}")
        } else {
            String::new()
        };

        Destinations {
            import_path: format!("{}{}/{}", self.import_root, stamp, object_key),
            transcode_directory: format!("{}{}", self.transcode_root, stamp),
        }
    }
}
