use serde::Deserialize;
use serde_json::Value;

use super::error::SubmitError;

/// The object a storage change notification refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageObject {
    pub bucket: String,
    /// Decoded object key.
    pub key: String,
}

#[derive(Debug, Deserialize)]
struct S3Notification {
    #[serde(rename = "Records", default)]
    records: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NotificationRecord {
    s3: S3Entity,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct S3Entity {
    bucket: BucketRef,
    object: ObjectRef,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BucketRef {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ObjectRef {
    key: Option<String>,
}

/// Extract the first record of an S3 notification carried in a queue message
/// body. The body may be the JSON document itself or a string holding it.
pub fn parse_notification(body: Option<&Value>) -> Result<StorageObject, SubmitError> {
    let document = match body {
        Some(Value::String(raw)) => serde_json::from_str::<Value>(raw).ok(),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.clone()),
    };
    let shown = document
        .as_ref()
        .map(Value::to_string)
        .unwrap_or_else(|| "null".to_string());

    let first = document
        .and_then(|doc| serde_json::from_value::<S3Notification>(doc).ok())
        .and_then(|n| n.records.into_iter().next())
        .filter(|record| !record.is_null())
        .ok_or_else(|| SubmitError::MalformedInput(format!("No event data received: {shown}")))?;

    let record: NotificationRecord = serde_json::from_value(first).unwrap_or_default();
    match (record.s3.bucket.name, record.s3.object.key) {
        (Some(bucket), Some(key)) if !bucket.is_empty() && !key.is_empty() => Ok(StorageObject {
            bucket,
            key: decode_key(&key)?,
        }),
        _ => Err(SubmitError::MalformedInput(format!(
            "bucketName or objectKey are not set in the event data {shown}"
        ))),
    }
}

/// S3 form-encodes keys in notifications: spaces arrive as `+`.
fn decode_key(raw: &str) -> Result<String, SubmitError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|k| k.into_owned())
        .map_err(|e| SubmitError::MalformedInput(format!("object key {raw} is not valid: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn s3_put(bucket: &str, key: &str) -> Value {
        json!({
            "Records": [{
                "eventSource": "aws:s3",
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": {"name": bucket, "arn": format!("arn:aws:s3:::{bucket}")},
                    "object": {"key": key, "size": 1024}
                }
            }]
        })
    }

    #[test]
    fn parses_string_body() {
        let body = Value::String(s3_put("my-bucket", "video.mp4").to_string());

        let object = parse_notification(Some(&body)).unwrap();
        assert_eq!(
            object,
            StorageObject {
                bucket: "my-bucket".into(),
                key: "video.mp4".into()
            }
        );
    }

    #[test]
    fn parses_structured_body() {
        let body = s3_put("my-bucket", "clips/a.mov");
        assert_eq!(parse_notification(Some(&body)).unwrap().key, "clips/a.mov");
    }

    #[test]
    fn decodes_object_key() {
        let body = s3_put("my-bucket", "my+holiday%2C+day+1.mp4");
        assert_eq!(
            parse_notification(Some(&body)).unwrap().key,
            "my holiday, day 1.mp4"
        );
    }

    #[test]
    fn missing_or_unparsable_body_is_malformed() {
        for body in [
            None,
            Some(Value::Null),
            Some(Value::String("".into())),
            Some(Value::String("not json".into())),
            Some(json!({"Records": []})),
            Some(json!({"Records": [null]})),
            Some(json!({"Records": "nope"})),
            Some(json!({"Service": "Amazon S3", "Event": "s3:TestEvent"})),
        ] {
            let err = parse_notification(body.as_ref()).unwrap_err();
            assert!(
                err.to_string().contains("No event data received"),
                "unexpected error for {body:?}: {err}"
            );
        }
    }

    #[test]
    fn record_without_bucket_or_key_is_malformed() {
        for body in [
            json!({"Records": [{"s3": {"bucket": {"name": "b"}}}]}),
            json!({"Records": [{"s3": {"object": {"key": "k.mp4"}}}]}),
            json!({"Records": [{"s3": {"bucket": {"name": ""}, "object": {"key": "k.mp4"}}}]}),
            json!({"Records": [42]}),
        ] {
            let err = parse_notification(Some(&body)).unwrap_err();
            assert!(matches!(err, SubmitError::MalformedInput(_)));
            assert!(err.to_string().contains("bucketName or objectKey are not set"));
        }
    }
}
