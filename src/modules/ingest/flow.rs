//! Flow requests for the media platform.
//!
//! A template is a JSON document whose string values may contain the
//! placeholders below. Rendering substitutes them inside the parsed document,
//! so signed URLs and paths never need JSON escaping.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use thiserror::Error;

use super::model::JobRequest;
use crate::infrastructure::media::CreateFlowRequest;

pub const IMPORT_URL: &str = "{importUrl}";
pub const IMPORT_DESTINATION: &str = "{importDestination}";
pub const TRANSCODE_DESTINATION: &str = "{transcodeDestination}";

pub const MIN_QUALITY: &str = "240p";
pub const MAX_QUALITY: &str = "1440p";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read flow template {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("flow template {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("flow template {0} must be a JSON object")]
    NotAnObject(PathBuf),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlowTemplate {
    document: Value,
}

impl FlowTemplate {
    /// Import from the signed url, then transcode across the quality ladder.
    pub fn builtin() -> Self {
        Self {
            document: json!({
                "flow": {
                    "import": {
                        "type": "file.import",
                        "specification": {
                            "sourceUrl": IMPORT_URL,
                            "destination": {
                                "path": IMPORT_DESTINATION,
                                "acl": "public"
                            }
                        },
                        "successors": ["transcode"]
                    },
                    "transcode": {
                        "type": "av.transcode",
                        "specification": {
                            "destination": {
                                "directory": TRANSCODE_DESTINATION,
                                "acl": "public"
                            },
                            "qualityRange": {
                                "minimum": MIN_QUALITY,
                                "maximum": MAX_QUALITY
                            }
                        },
                        "successors": []
                    }
                }
            }),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Value = serde_json::from_str(&raw).map_err(|source| TemplateError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if !document.is_object() {
            return Err(TemplateError::NotAnObject(path.to_path_buf()));
        }

        Ok(Self { document })
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn render(&self, job: &JobRequest) -> CreateFlowRequest {
        let mut document = self.document.clone();
        substitute(&mut document, job);
        CreateFlowRequest(document)
    }
}

fn substitute(value: &mut Value, job: &JobRequest) {
    match value {
        Value::String(s) => {
            if s.contains('{') {
                *s = s
                    .replace(IMPORT_URL, &job.signed_source_url)
                    .replace(IMPORT_DESTINATION, &job.import_path)
                    .replace(TRANSCODE_DESTINATION, &job.transcode_directory);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|v| substitute(v, job)),
        Value::Object(map) => map.values_mut().for_each(|v| substitute(v, job)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn job() -> JobRequest {
        JobRequest {
            signed_source_url: "https://bucket.s3.amazonaws.com/video.mp4?X-Amz-Signature=abc&X-Amz-Expires=1800".into(),
            import_path: "/imports/1700000000000/video.mp4".into(),
            transcode_directory: "/transcodes/1700000000000".into(),
        }
    }

    #[test]
    fn builtin_chains_import_into_transcode() {
        let request = FlowTemplate::builtin().render(&job()).0;
        let import = &request["flow"]["import"];
        let transcode = &request["flow"]["transcode"];

        assert_eq!(import["type"], "file.import");
        assert_eq!(import["specification"]["sourceUrl"], job().signed_source_url);
        assert_eq!(import["specification"]["destination"]["path"], job().import_path);
        assert_eq!(import["specification"]["destination"]["acl"], "public");
        assert_eq!(import["successors"], json!(["transcode"]));

        assert_eq!(transcode["type"], "av.transcode");
        assert_eq!(
            transcode["specification"]["destination"]["directory"],
            job().transcode_directory
        );
        assert_eq!(transcode["specification"]["destination"]["acl"], "public");
        assert_eq!(transcode["specification"]["qualityRange"]["minimum"], "240p");
        assert_eq!(transcode["specification"]["qualityRange"]["maximum"], "1440p");
    }

    #[test]
    fn render_leaves_template_untouched() {
        let template = FlowTemplate::builtin();
        let _ = template.render(&job());
        assert_eq!(
            template.document()["flow"]["import"]["specification"]["sourceUrl"],
            IMPORT_URL
        );
    }

    #[test]
    fn shipped_template_matches_builtin() {
        let template = FlowTemplate::from_file(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/templates/create_flow.json"
        ))
        .unwrap();
        assert_eq!(template, FlowTemplate::builtin());
    }

    #[test]
    fn file_template_substitutes_embedded_placeholders() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"flow": {{"import": {{"specification": {{"sourceUrl": "{{importUrl}}", "destination": {{"path": "{{importDestination}}"}}}}}}, "note": "into {{transcodeDestination}}/hls"}}}}"#
        )
        .unwrap();

        let request = FlowTemplate::from_file(file.path()).unwrap().render(&job()).0;
        assert_eq!(
            request["flow"]["import"]["specification"]["sourceUrl"],
            job().signed_source_url
        );
        assert_eq!(
            request["flow"]["import"]["specification"]["destination"]["path"],
            job().import_path
        );
        assert_eq!(request["flow"]["note"], "into /transcodes/1700000000000/hls");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = FlowTemplate::from_file("/nonexistent/flow.json").unwrap_err();
        assert!(matches!(err, TemplateError::Read { .. }));
    }

    #[test]
    fn non_object_template_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2, 3]").unwrap();

        let err = FlowTemplate::from_file(file.path()).unwrap_err();
        assert!(matches!(err, TemplateError::NotAnObject(_)));
    }
}
