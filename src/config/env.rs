use std::env;

pub enum EnvKey {
    TaskQueueUrl,
    WorkerLambdaName,
    AwsRegion,
    WixmpDomain,
    WixmpAppId,
    WixmpSharedSecret,
    ImportDestination,
    TranscodeDestination,
    OverrideExisting,
    UseTimestampInPath,
    FlowTemplateFile,
    LambdaLocal,
    AckSkippedMessages,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::TaskQueueUrl => "TASK_QUEUE_URL",
            EnvKey::WorkerLambdaName => "WORKER_LAMBDA_NAME",
            EnvKey::AwsRegion => "AWS_REGION",
            EnvKey::WixmpDomain => "WIXMP_DOMAIN",
            EnvKey::WixmpAppId => "WIXMP_APPID",
            EnvKey::WixmpSharedSecret => "WIXMP_SHARED_SECRET",
            EnvKey::ImportDestination => "WIXMP_IMPORT_DESTINATION",
            EnvKey::TranscodeDestination => "WIXMP_TRANSCODE_DESTINATION",
            EnvKey::OverrideExisting => "WIXMP_OVERRIDE_EXISTING",
            EnvKey::UseTimestampInPath => "WIXMP_USE_TIMESTAMP_IN_PATH",
            EnvKey::FlowTemplateFile => "WIXMP_FLOW_USE_JSON_FILE",
            EnvKey::LambdaLocal => "LAMBDA_LOCAL",
            EnvKey::AckSkippedMessages => "ACK_SKIPPED_MESSAGES",
        }
    }
}

/// Key/value source the settings are read from. The process environment in
/// production, a map in tests.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.is_empty())
    }
}

impl EnvSource for std::collections::HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned().filter(|v| !v.is_empty())
    }
}

pub fn get(source: &dyn EnvSource, key: EnvKey) -> Result<String, super::ConfigError> {
    source
        .var(key.as_str())
        .ok_or(super::ConfigError::Missing(key.as_str()))
}

pub fn get_opt(source: &dyn EnvSource, key: EnvKey) -> Option<String> {
    source.var(key.as_str())
}

pub fn get_or(source: &dyn EnvSource, key: EnvKey, default: &str) -> String {
    source
        .var(key.as_str())
        .unwrap_or_else(|| default.to_string())
}

/// Flags are only on when set to the literal string `true`.
pub fn get_flag(source: &dyn EnvSource, key: EnvKey) -> bool {
    source.var(key.as_str()).as_deref() == Some("true")
}

/// True only when the key is explicitly set to the literal string `false`.
/// Unset is not the same as off.
pub fn is_off(source: &dyn EnvSource, key: EnvKey) -> bool {
    source.var(key.as_str()).as_deref() == Some("false")
}

/// Presence flag: any value other than `false`/`0` turns it on.
pub fn is_set(source: &dyn EnvSource, key: EnvKey) -> bool {
    matches!(source.var(key.as_str()).as_deref(), Some(v) if v != "false" && v != "0")
}
