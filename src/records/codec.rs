//! Body encoding and kind classification
//!
//! Decoding runs an explicit chain over the parsed body:
//! 1. `_type` discriminator
//! 2. legacy workout shape (`type` and `duration`)
//! 3. legacy profile shape (`name`, no `type`, no `steps`)
//!
//! The first decoder that decides wins; otherwise the body is rejected.

use super::types::{DailyStat, UserProfile, Workout};
use super::{Record, RecordKind, WithId};
use crate::github::Issue;
use serde::Serialize;
use serde_json::{Map, Value};

/// Why an issue body did not decode into the requested record
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("body is not valid JSON: {0}")]
    Json(serde_json::Error),

    #[error("body does not match any record kind")]
    Unclassified,

    #[error("body is a {0} record")]
    OtherKind(RecordKind),

    #[error("body has the wrong shape for a {kind} record: {error}")]
    Shape {
        kind: RecordKind,
        error: serde_json::Error,
    },
}

enum Step {
    Match(RecordKind),
    Reject,
    Next,
}

type Decoder = fn(&Map<String, Value>) -> Step;

/// Decoders in order. A `_type` that is present but unknown (or not a
/// string) rejects the body outright; older readers let such bodies fall
/// through to the `type`/`duration` heuristic instead.
const DECODERS: [Decoder; 3] = [by_discriminator, legacy_workout, legacy_profile];

fn by_discriminator(content: &Map<String, Value>) -> Step {
    match content.get("_type") {
        None | Some(Value::Null) => Step::Next,
        Some(Value::String(tag)) => match RecordKind::from_discriminator(tag) {
            Some(kind) => Step::Match(kind),
            None => Step::Reject,
        },
        Some(_) => Step::Reject,
    }
}

fn legacy_workout(content: &Map<String, Value>) -> Step {
    if truthy(content.get("type")) && content.contains_key("duration") {
        Step::Match(RecordKind::Workout)
    } else {
        Step::Next
    }
}

fn legacy_profile(content: &Map<String, Value>) -> Step {
    if truthy(content.get("name")) && !truthy(content.get("type")) && !truthy(content.get("steps")) {
        Step::Match(RecordKind::Profile)
    } else {
        Step::Next
    }
}

/// JavaScript truthiness, which is what old bodies were checked with
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Parse an issue body; a missing or empty body is `{}`
pub fn parse_body(body: Option<&str>) -> Result<Value, DecodeError> {
    match body {
        None => Ok(Value::Object(Map::new())),
        Some(text) if text.is_empty() => Ok(Value::Object(Map::new())),
        Some(text) => serde_json::from_str(text).map_err(DecodeError::Json),
    }
}

/// Kind of a parsed body, if any decoder claims it
pub fn classify(content: &Value) -> Option<RecordKind> {
    let map = content.as_object()?;
    for decoder in DECODERS {
        match decoder(map) {
            Step::Match(kind) => return Some(kind),
            Step::Reject => return None,
            Step::Next => continue,
        }
    }
    None
}

/// Decode an issue as a record of type `T`
pub fn decode_issue<T: Record>(issue: &Issue) -> Result<T, DecodeError> {
    let content = parse_body(issue.body.as_deref())?;
    match classify(&content) {
        Some(kind) if kind == T::KIND => {}
        Some(kind) => return Err(DecodeError::OtherKind(kind)),
        None => return Err(DecodeError::Unclassified),
    }

    let mut record: T = serde_json::from_value(content).map_err(|error| DecodeError::Shape {
        kind: T::KIND,
        error,
    })?;
    record.attach(issue);
    Ok(record)
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    #[serde(flatten)]
    record: &'a T,
    #[serde(rename = "_type")]
    kind: RecordKind,
}

/// Pretty-printed body: the record's fields followed by `_type`
pub fn encode_body<T: Record>(record: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Tagged {
        record,
        kind: T::KIND,
    })
}

/// Any decoded record
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Workout(Workout),
    Profile(UserProfile),
    DailyStats(DailyStat),
}

impl Document {
    /// Decode an issue into whichever kind it classifies as
    pub fn from_issue(issue: &Issue) -> Result<Self, DecodeError> {
        let content = parse_body(issue.body.as_deref())?;
        match classify(&content).ok_or(DecodeError::Unclassified)? {
            RecordKind::Workout => decode_issue(issue).map(Document::Workout),
            RecordKind::Profile => decode_issue(issue).map(Document::Profile),
            RecordKind::DailyStats => decode_issue(issue).map(Document::DailyStats),
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            Document::Workout(_) => RecordKind::Workout,
            Document::Profile(_) => RecordKind::Profile,
            Document::DailyStats(_) => RecordKind::DailyStats,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            Document::Workout(w) => w.id,
            Document::Profile(p) => p.id,
            Document::DailyStats(s) => s.id,
        }
    }
}

impl Serialize for Document {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = self.kind();
        match self {
            Document::Workout(w) => Tagged { record: &WithId::new(w), kind }.serialize(serializer),
            Document::Profile(p) => Tagged { record: &WithId::new(p), kind }.serialize(serializer),
            Document::DailyStats(s) => Tagged { record: &WithId::new(s), kind }.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{IssueState, Label};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn issue(number: u64, body: Option<&str>) -> Issue {
        Issue {
            number,
            title: String::new(),
            body: body.map(str::to_string),
            labels: vec![Label {
                name: "activity".into(),
            }],
            state: IssueState::Open,
            created_at: Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap(),
            pull_request: None,
        }
    }

    #[test]
    fn test_discriminator_wins() {
        let content = json!({ "_type": "profile", "type": "Run", "duration": 30 });
        assert_eq!(classify(&content), Some(RecordKind::Profile));

        let content = json!({ "_type": "daily-stats", "steps": 100 });
        assert_eq!(classify(&content), Some(RecordKind::DailyStats));
    }

    #[test]
    fn test_unknown_discriminator_rejected() {
        assert_eq!(classify(&json!({ "_type": "meal", "name": "Ada" })), None);
        assert_eq!(classify(&json!({ "_type": 3, "type": "Run", "duration": 1 })), None);
    }

    #[test]
    fn test_legacy_workout_shape() {
        assert_eq!(
            classify(&json!({ "type": "Run", "duration": 30 })),
            Some(RecordKind::Workout)
        );
        // duration only needs to be present
        assert_eq!(
            classify(&json!({ "type": "Run", "duration": null })),
            Some(RecordKind::Workout)
        );
        assert_eq!(classify(&json!({ "type": "Run", "amount": 5 })), None);
        assert_eq!(classify(&json!({ "type": "", "duration": 30 })), None);
    }

    #[test]
    fn test_legacy_profile_shape() {
        assert_eq!(classify(&json!({ "name": "Ada", "age": 36 })), Some(RecordKind::Profile));
        assert_eq!(classify(&json!({ "name": "Ada", "steps": 0 })), Some(RecordKind::Profile));
        assert_eq!(classify(&json!({ "name": "Ada", "steps": 1200 })), None);
        assert_eq!(classify(&json!({ "name": "Ada", "type": "Run" })), None);
        assert_eq!(classify(&json!({ "name": "" })), None);
    }

    #[test]
    fn test_non_object_bodies() {
        assert_eq!(classify(&json!(42)), None);
        assert_eq!(classify(&json!(["workout"])), None);
        assert_eq!(classify(&parse_body(None).unwrap()), None);
        assert_eq!(classify(&parse_body(Some("")).unwrap()), None);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(parse_body(Some("Ran 5k today!")), Err(DecodeError::Json(_))));
        let result: Result<Workout, _> = decode_issue(&issue(1, Some("{oops")));
        assert!(matches!(result, Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_decode_attaches_issue_fields() {
        let workout: Workout =
            decode_issue(&issue(12, Some(r#"{"_type":"workout","type":"Swim","amount":1.5,"unit":"km"}"#)))
                .unwrap();
        assert_eq!(workout.id, 12);
        assert_eq!(workout.date, "2025-02-01T09:00:00+00:00");

        let workout: Workout = decode_issue(&issue(
            13,
            Some(r#"{"_type":"workout","type":"Swim","date":""}"#),
        ))
        .unwrap();
        assert_eq!(workout.date, "2025-02-01T09:00:00+00:00");
    }

    #[test]
    fn test_decode_wrong_kind() {
        let result: Result<UserProfile, _> =
            decode_issue(&issue(1, Some(r#"{"type":"Run","duration":20}"#)));
        assert!(matches!(result, Err(DecodeError::OtherKind(RecordKind::Workout))));
    }

    #[test]
    fn test_decode_shape_error() {
        let result: Result<UserProfile, _> =
            decode_issue(&issue(1, Some(r#"{"_type":"profile","name":7}"#)));
        assert!(matches!(result, Err(DecodeError::Shape { .. })));
    }

    #[test]
    fn test_encode_body_is_pretty_and_tagged() {
        let body = encode_body(&UserProfile::new("Ada")).unwrap();
        assert_eq!(body, "{\n  \"name\": \"Ada\",\n  \"_type\": \"profile\"\n}");
    }

    #[test]
    fn test_encoded_body_classifies_as_its_kind() {
        let body = encode_body(&DailyStat::new("2025-01-01").steps(4000.0)).unwrap();
        let content = parse_body(Some(&body)).unwrap();
        assert_eq!(classify(&content), Some(RecordKind::DailyStats));
    }

    #[test]
    fn test_document_from_issue() {
        let doc = Document::from_issue(&issue(4, Some(r#"{"name":"Ada"}"#))).unwrap();
        assert_eq!(doc.kind(), RecordKind::Profile);
        assert_eq!(doc.id(), 4);
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({ "id": 4, "name": "Ada", "_type": "profile" })
        );
        assert!(matches!(
            Document::from_issue(&issue(5, Some("{}"))),
            Err(DecodeError::Unclassified)
        ));
    }
}
