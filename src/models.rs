use serde::Serialize;

use crate::{entities::favorite_entry, timestamps};

/// Whether an entry is a film or a series. Stored as its wire string in the
/// `kind` column.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum EntryKind {
    #[serde(rename = "Movie")]
    Movie,
    #[serde(rename = "TV Show")]
    TvShow,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Movie => "Movie",
            EntryKind::TvShow => "TV Show",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Movie" => Some(EntryKind::Movie),
            "TV Show" => Some(EntryKind::TvShow),
            _ => None,
        }
    }
}

/// A fully validated create payload.
#[derive(Clone, Debug, PartialEq)]
pub struct NewEntry {
    pub title: String,
    pub kind: EntryKind,
    pub director: String,
    pub budget: i64,
    pub location: String,
    pub duration: String,
    pub year: i32,
}

/// A validated partial update; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub kind: Option<EntryKind>,
    pub director: Option<String>,
    pub budget: Option<i64>,
    pub location: Option<String>,
    pub duration: Option<String>,
    pub year: Option<i32>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.kind.is_none()
            && self.director.is_none()
            && self.budget.is_none()
            && self.location.is_none()
            && self.duration.is_none()
            && self.year.is_none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageQuery {
    pub page: u64,
    pub limit: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchQuery {
    pub q: String,
    pub page: u64,
    pub limit: u64,
}

/// One entry as it appears on the wire, timestamps already rendered in IST.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    pub id: i32,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub director: String,
    pub budget: i64,
    pub location: String,
    pub duration: String,
    pub year: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<favorite_entry::Model> for EntryResponse {
    fn from(m: favorite_entry::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            kind: m.kind,
            director: m.director,
            budget: m.budget,
            location: m.location,
            duration: m.duration,
            year: m.year,
            created_at: timestamps::format_ist(m.created_at),
            updated_at: timestamps::format_ist(m.updated_at),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_entries: u64,
    pub movies_count: u64,
    pub tv_shows_count: u64,
    pub recent_entries: u64,
    pub avg_budget: i64,
    pub generated_at: String,
}

/// A single field-level failure inside the error list of the envelope.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self { field: Some(field.to_string()), message: message.into() }
    }

    pub fn bare(message: impl Into<String>) -> Self {
        Self { field: None, message: message.into() }
    }
}

/// The uniform response wrapper every endpoint replies with.
#[derive(Clone, Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ApiResponse {
    pub fn ok(message: &str, data: serde_json::Value) -> Self {
        Self { success: true, message: message.to_string(), data: Some(data), errors: None }
    }

    pub fn ok_empty(message: &str) -> Self {
        Self { success: true, message: message.to_string(), data: None, errors: None }
    }

    pub fn fail(message: &str) -> Self {
        Self { success: false, message: message.to_string(), data: None, errors: None }
    }

    pub fn fail_with(message: &str, errors: Vec<FieldError>) -> Self {
        Self { success: false, message: message.to_string(), data: None, errors: Some(errors) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_kind_round_trips_through_wire_strings() {
        assert_eq!(EntryKind::parse("Movie"), Some(EntryKind::Movie));
        assert_eq!(EntryKind::parse("TV Show"), Some(EntryKind::TvShow));
        assert_eq!(EntryKind::parse("Documentary"), None);
        assert_eq!(EntryKind::TvShow.as_str(), "TV Show");
    }

    #[test]
    fn envelope_omits_absent_sections() {
        let json = serde_json::to_value(ApiResponse::ok_empty("done")).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "message": "done"}));

        let json = serde_json::to_value(ApiResponse::fail_with(
            "bad",
            vec![FieldError::new("title", "Title is required")],
        ))
        .unwrap();
        assert_eq!(json["errors"][0]["field"], "title");
        assert_eq!(json["errors"][0]["message"], "Title is required");
    }

    #[test]
    fn bare_field_error_has_no_field_key() {
        let json = serde_json::to_value(FieldError::bare("Failed to create entry")).unwrap();
        assert!(json.get("field").is_none());
    }
}
