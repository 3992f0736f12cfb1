//! Schema validation for bodies and query params. Each validator collects
//! every field error in one pass and strips unknown fields rather than
//! rejecting them.

use std::collections::HashMap;

use serde_json::Value;

use crate::{
    models::{EntryKind, EntryPatch, FieldError, NewEntry, PageQuery, SearchQuery},
    timestamps,
};

const BUDGET_MAX: i64 = 999_999_999_999;
const YEAR_MIN: i64 = 1800;
const PAGE_DEFAULT: u64 = 1;
const LIMIT_DEFAULT: u64 = 10;
const LIMIT_MAX: u64 = 100;

type Errors = Vec<FieldError>;

struct StrRules {
    field: &'static str,
    required: &'static str,
    empty: &'static str,
    not_a_string: &'static str,
    too_long: &'static str,
    max_len: usize,
}

const TITLE: StrRules = StrRules {
    field: "title",
    required: "Title is required",
    empty: "Title cannot be empty",
    not_a_string: "Title must be a string",
    too_long: "Title cannot exceed 255 characters",
    max_len: 255,
};

const DIRECTOR: StrRules = StrRules {
    field: "director",
    required: "Director is required",
    empty: "Director name cannot be empty",
    not_a_string: "Director name must be a string",
    too_long: "Director name cannot exceed 255 characters",
    max_len: 255,
};

const LOCATION: StrRules = StrRules {
    field: "location",
    required: "Location is required",
    empty: "Location cannot be empty",
    not_a_string: "Location must be a string",
    too_long: "Location cannot exceed 255 characters",
    max_len: 255,
};

const DURATION: StrRules = StrRules {
    field: "duration",
    required: "Duration is required",
    empty: "Duration cannot be empty",
    not_a_string: "Duration must be a string",
    too_long: "Duration cannot exceed 100 characters",
    max_len: 100,
};

const SEARCH_Q: StrRules = StrRules {
    field: "q",
    required: "Search query is required",
    empty: "Search query cannot be empty",
    not_a_string: "Search query must be a string",
    too_long: "Search query cannot exceed 255 characters",
    max_len: 255,
};

const KIND_MESSAGE: &str = "Type must be either 'Movie' or 'TV Show'";

/// Loose string cast: JSON strings are trimmed, scalars are stringified.
fn as_trimmed_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Loose integer cast: accepts integer JSON numbers, whole floats, and
/// numeric strings. Anything else (or a fractional value) is rejected.
fn as_whole_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64).map(|f| f as i64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        }
        _ => None,
    }
}

fn check_string(value: &Value, rules: &StrRules, errors: &mut Errors) -> Option<String> {
    let Some(s) = as_trimmed_string(value) else {
        errors.push(FieldError::new(rules.field, rules.not_a_string));
        return None;
    };
    if s.is_empty() {
        errors.push(FieldError::new(rules.field, rules.empty));
        return None;
    }
    if s.chars().count() > rules.max_len {
        errors.push(FieldError::new(rules.field, rules.too_long));
        return None;
    }
    Some(s)
}

fn required_string(
    body: &serde_json::Map<String, Value>,
    rules: &StrRules,
    errors: &mut Errors,
) -> Option<String> {
    match body.get(rules.field) {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(rules.field, rules.required));
            None
        }
        Some(value) => check_string(value, rules, errors),
    }
}

fn check_kind(value: &Value, errors: &mut Errors) -> Option<EntryKind> {
    let kind = value.as_str().and_then(EntryKind::parse);
    if kind.is_none() {
        errors.push(FieldError::new("type", KIND_MESSAGE));
    }
    kind
}

fn check_budget(value: &Value, errors: &mut Errors) -> Option<i64> {
    let Some(budget) = as_whole_number(value) else {
        errors.push(FieldError::new("budget", "Budget must be a whole number"));
        return None;
    };
    if budget < 0 {
        errors.push(FieldError::new("budget", "Budget cannot be negative"));
        return None;
    }
    if budget > BUDGET_MAX {
        errors.push(FieldError::new("budget", "Budget value is too large"));
        return None;
    }
    Some(budget)
}

fn check_year(value: &Value, errors: &mut Errors) -> Option<i32> {
    let Some(year) = as_whole_number(value) else {
        errors.push(FieldError::new("year", "Year must be a whole number"));
        return None;
    };
    if year < YEAR_MIN {
        errors.push(FieldError::new("year", "Year must be after 1800"));
        return None;
    }
    if year > i64::from(timestamps::current_year()) + 10 {
        errors.push(FieldError::new("year", "Year cannot be more than 10 years in the future"));
        return None;
    }
    Some(year as i32)
}

/// Create payload: all seven business fields required.
pub fn validate_create(body: &Value) -> Result<NewEntry, Errors> {
    let Some(obj) = body.as_object() else {
        return Err(vec![FieldError::new("body", "Request body must be a valid object")]);
    };

    let mut errors = Errors::new();

    let title = required_string(obj, &TITLE, &mut errors);
    let kind = match obj.get("type") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("type", "Type is required"));
            None
        }
        Some(value) => check_kind(value, &mut errors),
    };
    let director = required_string(obj, &DIRECTOR, &mut errors);
    let budget = match obj.get("budget") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("budget", "Budget is required"));
            None
        }
        Some(value) => check_budget(value, &mut errors),
    };
    let location = required_string(obj, &LOCATION, &mut errors);
    let duration = required_string(obj, &DURATION, &mut errors);
    let year = match obj.get("year") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("year", "Year is required"));
            None
        }
        Some(value) => check_year(value, &mut errors),
    };

    match (title, kind, director, budget, location, duration, year) {
        (Some(title), Some(kind), Some(director), Some(budget), Some(location), Some(duration), Some(year))
            if errors.is_empty() =>
        {
            Ok(NewEntry { title, kind, director, budget, location, duration, year })
        }
        _ => Err(errors),
    }
}

/// Update payload: same per-field rules, all optional, but at least one
/// field must carry a meaningful (non-null, non-empty after trim) value.
pub fn validate_update(body: &Value) -> Result<EntryPatch, Errors> {
    let Some(obj) = body.as_object() else {
        return Err(vec![FieldError::new("body", "Request body must be a valid object")]);
    };

    let mut errors = Errors::new();
    let mut patch = EntryPatch::default();
    let mut meaningful = false;

    let mut note = |value: &Value| {
        meaningful |= !matches!(value, Value::Null)
            && value.as_str().map_or(true, |s| !s.trim().is_empty());
    };

    for rules in [&TITLE, &DIRECTOR, &LOCATION, &DURATION] {
        if let Some(value) = obj.get(rules.field).filter(|v| !v.is_null()) {
            note(value);
            let checked = check_string(value, rules, &mut errors);
            match rules.field {
                "title" => patch.title = checked,
                "director" => patch.director = checked,
                "location" => patch.location = checked,
                _ => patch.duration = checked,
            }
        }
    }
    if let Some(value) = obj.get("type").filter(|v| !v.is_null()) {
        note(value);
        patch.kind = check_kind(value, &mut errors);
    }
    if let Some(value) = obj.get("budget").filter(|v| !v.is_null()) {
        note(value);
        patch.budget = check_budget(value, &mut errors);
    }
    if let Some(value) = obj.get("year").filter(|v| !v.is_null()) {
        note(value);
        patch.year = check_year(value, &mut errors);
    }

    if !meaningful {
        errors.push(FieldError::bare("At least one field must be provided for update"));
    }

    if errors.is_empty() { Ok(patch) } else { Err(errors) }
}

fn check_page(query: &HashMap<String, String>, errors: &mut Errors) -> u64 {
    match query.get("page") {
        None => PAGE_DEFAULT,
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(page) if page >= 1 => page as u64,
            Ok(_) => {
                errors.push(FieldError::new("page", "Page must be at least 1"));
                PAGE_DEFAULT
            }
            Err(_) => {
                errors.push(FieldError::new("page", "Page must be a whole number"));
                PAGE_DEFAULT
            }
        },
    }
}

fn check_limit(query: &HashMap<String, String>, errors: &mut Errors) -> u64 {
    match query.get("limit") {
        None => LIMIT_DEFAULT,
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(limit) if limit < 1 => {
                errors.push(FieldError::new("limit", "Limit must be at least 1"));
                LIMIT_DEFAULT
            }
            Ok(limit) if limit as u64 > LIMIT_MAX => {
                errors.push(FieldError::new("limit", "Limit cannot exceed 100"));
                LIMIT_DEFAULT
            }
            Ok(limit) => limit as u64,
            Err(_) => {
                errors.push(FieldError::new("limit", "Limit must be a whole number"));
                LIMIT_DEFAULT
            }
        },
    }
}

/// List query params: `page` >= 1 (default 1), `limit` 1..=100 (default 10).
pub fn validate_pagination(query: &HashMap<String, String>) -> Result<PageQuery, Errors> {
    let mut errors = Errors::new();
    let page = check_page(query, &mut errors);
    let limit = check_limit(query, &mut errors);
    if errors.is_empty() { Ok(PageQuery { page, limit }) } else { Err(errors) }
}

/// Search params: required non-empty `q` plus the pagination fields.
pub fn validate_search(query: &HashMap<String, String>) -> Result<SearchQuery, Errors> {
    let mut errors = Errors::new();
    let q = match query.get("q") {
        None => {
            errors.push(FieldError::new(SEARCH_Q.field, SEARCH_Q.required));
            None
        }
        Some(raw) => check_string(&Value::String(raw.clone()), &SEARCH_Q, &mut errors),
    };
    let page = check_page(query, &mut errors);
    let limit = check_limit(query, &mut errors);
    match q {
        Some(q) if errors.is_empty() => Ok(SearchQuery { q, page, limit }),
        _ => Err(errors),
    }
}

/// Path id: a positive whole number.
pub fn validate_id(raw: &str) -> Result<i64, Errors> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        Ok(_) => Err(vec![FieldError::new("id", "ID must be a positive number")]),
        Err(_) => Err(vec![FieldError::new("id", "ID must be a whole number")]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "title": "The Dark Knight",
            "type": "Movie",
            "director": "Christopher Nolan",
            "budget": 185_000_000,
            "location": "Chicago, Illinois",
            "duration": "152 minutes",
            "year": 2008
        })
    }

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn create_accepts_a_complete_payload() {
        let entry = validate_create(&valid_body()).unwrap();
        assert_eq!(entry.title, "The Dark Knight");
        assert_eq!(entry.kind, EntryKind::Movie);
        assert_eq!(entry.budget, 185_000_000);
        assert_eq!(entry.year, 2008);
    }

    #[test]
    fn create_trims_strings() {
        let mut body = valid_body();
        body["title"] = json!("  Inception  ");
        let entry = validate_create(&body).unwrap();
        assert_eq!(entry.title, "Inception");
    }

    #[test]
    fn create_collects_all_errors_in_one_pass() {
        let errs = validate_create(&json!({"title": "", "budget": -1})).unwrap_err();
        let fields: Vec<_> = errs.iter().filter_map(|e| e.field.as_deref()).collect();
        assert_eq!(fields, ["title", "type", "director", "budget", "location", "duration", "year"]);
        assert_eq!(errs[0].message, "Title cannot be empty");
        assert_eq!(errs[3].message, "Budget cannot be negative");
    }

    #[test]
    fn create_rejects_non_string_values_for_string_fields() {
        let mut body = valid_body();
        body["title"] = json!({});
        let errs = validate_create(&body).unwrap_err();
        assert_eq!(errs[0].message, "Title must be a string");

        let mut body = valid_body();
        body["duration"] = json!([120]);
        let errs = validate_create(&body).unwrap_err();
        assert_eq!(errs[0].message, "Duration must be a string");
    }

    #[test]
    fn create_reports_missing_fields_as_required() {
        let errs = validate_create(&json!({})).unwrap_err();
        assert_eq!(errs.len(), 7);
        assert!(errs.iter().any(|e| e.message == "Title is required"));
        assert!(errs.iter().any(|e| e.message == "Year is required"));
    }

    #[test]
    fn create_rejects_unknown_kind() {
        let mut body = valid_body();
        body["type"] = json!("Documentary");
        let errs = validate_create(&body).unwrap_err();
        assert_eq!(errs[0].message, KIND_MESSAGE);
    }

    #[test]
    fn create_bounds_budget_and_year() {
        let mut body = valid_body();
        body["budget"] = json!(1_000_000_000_000_i64);
        let errs = validate_create(&body).unwrap_err();
        assert_eq!(errs[0].message, "Budget value is too large");

        let mut body = valid_body();
        body["year"] = json!(1799);
        let errs = validate_create(&body).unwrap_err();
        assert_eq!(errs[0].message, "Year must be after 1800");

        let mut body = valid_body();
        body["year"] = json!(timestamps::current_year() + 11);
        let errs = validate_create(&body).unwrap_err();
        assert_eq!(errs[0].message, "Year cannot be more than 10 years in the future");

        let mut body = valid_body();
        body["year"] = json!(timestamps::current_year() + 10);
        assert!(validate_create(&body).is_ok());
    }

    #[test]
    fn create_coerces_numeric_strings() {
        let mut body = valid_body();
        body["budget"] = json!("185000000");
        body["year"] = json!("2008");
        let entry = validate_create(&body).unwrap();
        assert_eq!(entry.budget, 185_000_000);
        assert_eq!(entry.year, 2008);
    }

    #[test]
    fn create_rejects_fractional_numbers() {
        let mut body = valid_body();
        body["year"] = json!(2008.5);
        let errs = validate_create(&body).unwrap_err();
        assert_eq!(errs[0].message, "Year must be a whole number");
    }

    #[test]
    fn create_ignores_unknown_fields() {
        let mut body = valid_body();
        body["rating"] = json!(9.0);
        assert!(validate_create(&body).is_ok());
    }

    #[test]
    fn update_requires_at_least_one_meaningful_field() {
        let errs = validate_update(&json!({})).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].field, None);
        assert_eq!(errs[0].message, "At least one field must be provided for update");

        // Whitespace-only strings do not count as meaningful.
        let errs = validate_update(&json!({"title": "   "})).unwrap_err();
        assert!(errs.iter().any(|e| e.message == "At least one field must be provided for update"));
        assert!(errs.iter().any(|e| e.message == "Title cannot be empty"));
    }

    #[test]
    fn update_accepts_a_single_field() {
        let patch = validate_update(&json!({"budget": 500})).unwrap();
        assert_eq!(patch.budget, Some(500));
        assert!(patch.title.is_none());
    }

    #[test]
    fn update_validates_provided_fields_only() {
        let errs = validate_update(&json!({"year": 1700, "title": "Metropolis"})).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].message, "Year must be after 1800");
    }

    #[test]
    fn update_rejects_non_string_values_without_calling_them_empty() {
        let errs = validate_update(&json!({"director": [1]})).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].message, "Director name must be a string");
    }

    #[test]
    fn update_rejects_non_object_bodies() {
        let errs = validate_update(&json!("nope")).unwrap_err();
        assert_eq!(errs[0].message, "Request body must be a valid object");
    }

    #[test]
    fn pagination_defaults_and_bounds() {
        let q = validate_pagination(&query(&[])).unwrap();
        assert_eq!((q.page, q.limit), (1, 10));

        let q = validate_pagination(&query(&[("page", "3"), ("limit", "50")])).unwrap();
        assert_eq!((q.page, q.limit), (3, 50));

        let errs = validate_pagination(&query(&[("page", "0")])).unwrap_err();
        assert_eq!(errs[0].message, "Page must be at least 1");

        let errs = validate_pagination(&query(&[("limit", "101")])).unwrap_err();
        assert_eq!(errs[0].message, "Limit cannot exceed 100");

        let errs = validate_pagination(&query(&[("page", "abc"), ("limit", "x")])).unwrap_err();
        assert_eq!(errs.len(), 2);
        assert_eq!(errs[0].message, "Page must be a whole number");
        assert_eq!(errs[1].message, "Limit must be a whole number");
    }

    #[test]
    fn search_requires_q() {
        let errs = validate_search(&query(&[])).unwrap_err();
        assert_eq!(errs[0].message, "Search query is required");

        let errs = validate_search(&query(&[("q", "  ")])).unwrap_err();
        assert_eq!(errs[0].message, "Search query cannot be empty");

        let s = validate_search(&query(&[("q", " matrix "), ("limit", "5")])).unwrap();
        assert_eq!(s.q, "matrix");
        assert_eq!((s.page, s.limit), (1, 5));
    }

    #[test]
    fn search_rejects_overlong_queries() {
        let long = "x".repeat(256);
        let errs = validate_search(&query(&[("q", &long)])).unwrap_err();
        assert_eq!(errs[0].message, "Search query cannot exceed 255 characters");
    }

    #[test]
    fn id_must_be_a_positive_whole_number() {
        assert_eq!(validate_id("42").unwrap(), 42);
        assert_eq!(validate_id("0").unwrap_err()[0].message, "ID must be a positive number");
        assert_eq!(validate_id("-3").unwrap_err()[0].message, "ID must be a positive number");
        assert_eq!(validate_id("abc").unwrap_err()[0].message, "ID must be a whole number");
        assert_eq!(validate_id("1.5").unwrap_err()[0].message, "ID must be a whole number");
    }
}
