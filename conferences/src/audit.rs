use anyhow::Result;
use database::{action_log::{ActionLog, NewActionLog}, conference_speaker::ConferenceSpeakerValues};
use serde_json::{Map, Value};

use crate::{context::FormContext, speaker::ConferenceSpeaker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SpeakerAction {
    Create,
    Update,
    Delete,
}

/// Audit record of one change to a speaker, waiting for the speaker id.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub organization_id: i64,
    pub admin_id: i64,
    pub action: SpeakerAction,
    pub participatory_space_id: i64,
    pub changeset: Value,
}

impl AuditEntry {
    pub fn new(context: &FormContext, admin_id: i64, action: SpeakerAction, changeset: Value) -> Self {
        Self {
            organization_id: context.organization.id,
            admin_id,
            action,
            participatory_space_id: context.conference_id,
            changeset,
        }
    }

    pub fn into_action_log(self, speaker_id: i64) -> NewActionLog {
        NewActionLog {
            organization_id: self.organization_id,
            user_id: self.admin_id,
            action: self.action.to_string(),
            resource_type: ConferenceSpeaker::RESOURCE_TYPE.to_string(),
            resource_id: speaker_id,
            participatory_space_id: self.participatory_space_id,
            changeset: self.changeset,
        }
    }
}

/// Field-level changes as `{ "field": [before, after] }`, unchanged fields left out.
///
/// A missing side stands for a speaker that does not exist yet or anymore.
pub fn changeset(before: Option<&ConferenceSpeakerValues>, after: Option<&ConferenceSpeakerValues>) -> Result<Value> {
    let before = fields(before)?;
    let after = fields(after)?;

    let mut changes = Map::new();
    for key in before.keys().chain(after.keys()) {
        if changes.contains_key(key) {
            continue;
        }

        let old = before.get(key).cloned().unwrap_or(Value::Null);
        let new = after.get(key).cloned().unwrap_or(Value::Null);
        if old != new {
            changes.insert(key.clone(), Value::Array(vec![old, new]));
        }
    }

    Ok(Value::Object(changes))
}

fn fields(values: Option<&ConferenceSpeakerValues>) -> Result<Map<String, Value>> {
    match values.map(serde_json::to_value).transpose()? {
        Some(Value::Object(fields)) => Ok(fields),
        _ => Ok(Map::new()),
    }
}

/// One line describing a logged change, for the admin log.
pub fn present(log: &ActionLog) -> String {
    let verb = match log.action.parse::<SpeakerAction>() {
        Ok(SpeakerAction::Create) => "created",
        Ok(SpeakerAction::Update) => "updated",
        Ok(SpeakerAction::Delete) => "deleted",
        Err(_) => log.action.as_str(),
    };

    let fields = match &log.changeset.0 {
        Value::Object(changes) if !changes.is_empty() => {
            format!(" ({})", changes.keys().map(String::as_str).collect::<Vec<_>>().join(", "))
        },
        _ => String::new(),
    };

    format!(
        "user #{} {verb} conference speaker #{} in conference #{}{fields}",
        log.user_id, log.resource_id, log.participatory_space_id,
    )
}

#[cfg(test)]
mod tests {
    use database::Json;
    use serde_json::json;
    use time::macros::datetime;
    use uuid::Uuid;

    use super::*;

    fn values() -> ConferenceSpeakerValues {
        ConferenceSpeakerValues {
            conference_id: 1,
            full_name: "Ada Lovelace".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn changeset_only_lists_changed_fields() {
        let before = values();
        let after = ConferenceSpeakerValues {
            full_name: "Ada King".to_string(),
            twitter_handle: Some("ada".to_string()),
            ..before.clone()
        };

        let changes = changeset(Some(&before), Some(&after)).unwrap();

        assert_eq!(
            changes,
            json!({
                "full_name": ["Ada Lovelace", "Ada King"],
                "twitter_handle": [null, "ada"],
            }),
        );
    }

    #[test]
    fn changeset_of_unchanged_speaker_is_empty() {
        assert_eq!(changeset(Some(&values()), Some(&values())).unwrap(), json!({}));
    }

    #[test]
    fn changeset_of_deleted_speaker_clears_fields() {
        let changes = changeset(Some(&values()), None).unwrap();

        assert_eq!(changes["full_name"], json!(["Ada Lovelace", null]));
        assert_eq!(changes["conference_id"], json!([1, null]));
    }

    #[test]
    fn presents_logged_change() {
        let log = ActionLog {
            id: Uuid::nil(),
            organization_id: 1,
            user_id: 7,
            action: "update".to_string(),
            resource_type: ConferenceSpeaker::RESOURCE_TYPE.to_string(),
            resource_id: 3,
            participatory_space_id: 2,
            changeset: Json(json!({ "full_name": ["a", "b"] })),
            created_at: datetime!(2024-01-01 0:00 UTC),
        };

        assert_eq!(present(&log), "user #7 updated conference speaker #3 in conference #2 (full_name)");
    }
}
