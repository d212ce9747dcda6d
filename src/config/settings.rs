use crate::config::ConfigError;
use crate::config::env::{self, EnvKey, EnvSource, ProcessEnv};
use crate::infrastructure::media::MediaConfig;
use crate::modules::ingest::flow::FlowTemplate;
use crate::modules::ingest::paths::PathPolicy;

const DEFAULT_REGION: &str = "us-east-1";

#[derive(Clone, Debug)]
pub struct ConsumerConfig {
    pub queue_url: String,
    pub worker_function: String,
    pub region: String,
}

impl ConsumerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&ProcessEnv)
    }

    pub fn from_source(source: &dyn EnvSource) -> Result<Self, ConfigError> {
        Ok(Self {
            queue_url: env::get(source, EnvKey::TaskQueueUrl)?,
            worker_function: env::get(source, EnvKey::WorkerLambdaName)?,
            region: env::get_or(source, EnvKey::AwsRegion, DEFAULT_REGION),
        })
    }
}

#[derive(Clone, Debug)]
pub struct WorkerConfig {
    /// Absent only in local mode, where nothing is acknowledged.
    pub queue_url: Option<String>,
    pub region: String,
    pub media: MediaConfig,
    pub paths: PathPolicy,
    pub template: FlowTemplate,
    pub local_mode: bool,
    pub ack_skipped: bool,
}

impl WorkerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&ProcessEnv)
    }

    pub fn from_source(source: &dyn EnvSource) -> Result<Self, ConfigError> {
        let local_mode = env::is_set(source, EnvKey::LambdaLocal);
        let queue_url = env::get_opt(source, EnvKey::TaskQueueUrl);
        if queue_url.is_none() && !local_mode {
            return Err(ConfigError::Missing(EnvKey::TaskQueueUrl.as_str()));
        }

        let template = match env::get_opt(source, EnvKey::FlowTemplateFile) {
            Some(path) => FlowTemplate::from_file(path)?,
            None => FlowTemplate::builtin(),
        };

        Ok(Self {
            queue_url,
            region: env::get_or(source, EnvKey::AwsRegion, DEFAULT_REGION),
            media: MediaConfig {
                domain: env::get(source, EnvKey::WixmpDomain)?,
                app_id: env::get(source, EnvKey::WixmpAppId)?,
                shared_secret: env::get(source, EnvKey::WixmpSharedSecret)?,
            },
            paths: PathPolicy {
                import_root: env::get(source, EnvKey::ImportDestination)?,
                transcode_root: env::get(source, EnvKey::TranscodeDestination)?,
                override_existing: env::get_flag(source, EnvKey::OverrideExisting),
                // Timestamped paths need overriding explicitly turned off.
                use_timestamp: env::get_flag(source, EnvKey::UseTimestampInPath)
                    && env::is_off(source, EnvKey::OverrideExisting),
            },
            template,
            local_mode,
            ack_skipped: env::get_flag(source, EnvKey::AckSkippedMessages),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn worker_env() -> HashMap<String, String> {
        [
            ("TASK_QUEUE_URL", "https://sqs.us-east-1.amazonaws.com/123/tasks"),
            ("WIXMP_DOMAIN", "example.appspot.com"),
            ("WIXMP_APPID", "app"),
            ("WIXMP_SHARED_SECRET", "secret"),
            ("WIXMP_IMPORT_DESTINATION", "/imports"),
            ("WIXMP_TRANSCODE_DESTINATION", "/transcodes"),
            ("WIXMP_OVERRIDE_EXISTING", "false"),
            ("WIXMP_USE_TIMESTAMP_IN_PATH", "true"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn consumer_config_requires_queue_and_worker() {
        let mut source = HashMap::new();
        source.insert("TASK_QUEUE_URL".to_string(), "q".to_string());

        let err = ConsumerConfig::from_source(&source).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("WORKER_LAMBDA_NAME")));

        source.insert("WORKER_LAMBDA_NAME".to_string(), "worker".to_string());
        let config = ConsumerConfig::from_source(&source).unwrap();
        assert_eq!(config.worker_function, "worker");
        assert_eq!(config.region, "us-east-1");
    }

    #[test]
    fn worker_config_reads_flags() {
        let config = WorkerConfig::from_source(&worker_env()).unwrap();

        assert!(!config.paths.override_existing);
        assert!(config.paths.use_timestamp);
        assert!(!config.local_mode);
        assert!(!config.ack_skipped);
        assert_eq!(config.media.app_id, "app");
    }

    #[test]
    fn worker_config_needs_queue_url_outside_local_mode() {
        let mut source = worker_env();
        source.remove("TASK_QUEUE_URL");

        let err = WorkerConfig::from_source(&source).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("TASK_QUEUE_URL")));

        source.insert("LAMBDA_LOCAL".to_string(), "true".to_string());
        let config = WorkerConfig::from_source(&source).unwrap();
        assert!(config.local_mode);
        assert!(config.queue_url.is_none());
    }

    #[test]
    fn timestamp_needs_override_explicitly_off() {
        let mut source = worker_env();
        source.remove("WIXMP_OVERRIDE_EXISTING");

        let config = WorkerConfig::from_source(&source).unwrap();
        assert!(!config.paths.override_existing);
        assert!(!config.paths.use_timestamp);
        let d = config.paths.destinations("video.mp4", 123);
        assert_eq!(d.import_path, "/imports/video.mp4");
        assert_eq!(d.transcode_directory, "/transcodes");

        for value in ["FALSE", "no", "0"] {
            source.insert("WIXMP_OVERRIDE_EXISTING".to_string(), value.to_string());
            let config = WorkerConfig::from_source(&source).unwrap();
            assert!(!config.paths.override_existing, "override on for {value}");
            assert!(!config.paths.stamps_paths(), "stamped for {value}");
        }

        source.insert("WIXMP_OVERRIDE_EXISTING".to_string(), "false".to_string());
        let config = WorkerConfig::from_source(&source).unwrap();
        assert_eq!(
            config.paths.destinations("video.mp4", 123).import_path,
            "/imports/123/video.mp4"
        );
    }

    #[test]
    fn override_gate_only_for_literal_true() {
        let mut source = worker_env();
        for (value, expected) in [("true", true), ("TRUE", false), ("1", false), ("yes", false)] {
            source.insert("WIXMP_OVERRIDE_EXISTING".to_string(), value.to_string());
            let config = WorkerConfig::from_source(&source).unwrap();
            assert_eq!(config.paths.override_existing, expected, "value {value}");
            assert!(!config.paths.stamps_paths());
        }
    }

    #[test]
    fn local_mode_is_off_only_for_false_or_zero() {
        let mut source = worker_env();
        assert!(!WorkerConfig::from_source(&source).unwrap().local_mode);

        for (value, expected) in [
            ("true", true),
            ("1", true),
            ("yes", true),
            ("false", false),
            ("0", false),
            ("", false),
        ] {
            source.insert("LAMBDA_LOCAL".to_string(), value.to_string());
            let config = WorkerConfig::from_source(&source).unwrap();
            assert_eq!(config.local_mode, expected, "LAMBDA_LOCAL={value:?}");
        }
    }

    #[test]
    fn worker_config_loads_template_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"flow": {{"import": {{"type": "file.import", "specification": {{"sourceUrl": "{{importUrl}}"}}, "successors": []}}}}}}"#
        )
        .unwrap();

        let mut source = worker_env();
        source.insert(
            "WIXMP_FLOW_USE_JSON_FILE".to_string(),
            file.path().display().to_string(),
        );

        let config = WorkerConfig::from_source(&source).unwrap();
        assert!(config.template.document()["flow"]["import"].is_object());
    }

    #[test]
    fn worker_config_rejects_broken_template_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let mut source = worker_env();
        source.insert(
            "WIXMP_FLOW_USE_JSON_FILE".to_string(),
            file.path().display().to_string(),
        );

        assert!(matches!(
            WorkerConfig::from_source(&source),
            Err(ConfigError::Template(_))
        ));
    }
}
