//! Patch builder - turns sparse field changes into minimal update requests
//!
//! Pure functions, no I/O. Absent fields are left alone; an explicit `null`
//! clears the field.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::core::models::{Change, Priority, TaskId, TaskPatch, TaskStatus, UpdateRequest, parse_date};
use crate::error::ValidationError;

const TITLE: &str = "title";
const DESCRIPTION: &str = "description";
const LIST_TITLE: &str = "list_title";
const STATUS: &str = "status";
const PRIORITY: &str = "priority";
const DELIVERY_DATE: &str = "delivery_date";

/// Build the update request for a typed patch
///
/// The body holds exactly the fields the patch touches, under their wire
/// names. Fails on an empty patch or on changes that would break a required
/// field.
pub fn build_update(id: &TaskId, patch: &TaskPatch) -> Result<UpdateRequest, ValidationError> {
    if patch.is_empty() {
        return Err(ValidationError::NoFields);
    }

    let mut body = Map::new();

    match &patch.title {
        Change::Keep => {},
        Change::Set(title) if !title.trim().is_empty() => {
            body.insert(TITLE.to_string(), Value::from(title.as_str()));
        },
        Change::Set(_) | Change::Clear => return Err(ValidationError::EmptyTitle),
    }

    match &patch.list_title {
        Change::Keep => {},
        Change::Set(list) if !list.trim().is_empty() => {
            body.insert(LIST_TITLE.to_string(), Value::from(list.as_str()));
        },
        Change::Set(_) | Change::Clear => return Err(ValidationError::EmptyListTitle),
    }

    match patch.status {
        Change::Keep => {},
        Change::Set(status) => {
            body.insert(STATUS.to_string(), Value::from(status.as_str()));
        },
        Change::Clear => return Err(ValidationError::NotClearable(STATUS.to_string())),
    }

    insert_optional(&mut body, DESCRIPTION, &patch.description, |d| Value::from(d.as_str()));
    insert_optional(&mut body, PRIORITY, &patch.priority, |p| Value::from(p.as_str()));
    insert_optional(&mut body, DELIVERY_DATE, &patch.delivery_date, |d| {
        Value::from(d.format("%Y-%m-%d").to_string())
    });

    Ok(UpdateRequest {
        id: id.clone(),
        body,
    })
}

/// Build the update request straight from a raw field map
pub fn build_update_from_fields(
    id: &TaskId,
    fields: &Map<String, Value>,
) -> Result<UpdateRequest, ValidationError> {
    build_update(id, &parse_fields(fields)?)
}

/// Parse a raw field map into a typed patch
///
/// Accepts the wire names plus the camelCase spellings the board UI sends
/// (`listTitle`, `deliveryDate`). Status and priority are checked against
/// their closed sets here, so an invalid value never reaches the store.
pub fn parse_fields(fields: &Map<String, Value>) -> Result<TaskPatch, ValidationError> {
    if fields.is_empty() {
        return Err(ValidationError::NoFields);
    }

    let mut patch = TaskPatch::new();
    for (name, value) in fields {
        match canonical_name(name) {
            Some(TITLE) => patch.title = text_change(TITLE, value)?,
            Some(DESCRIPTION) => patch.description = text_change(DESCRIPTION, value)?,
            Some(LIST_TITLE) => patch.list_title = text_change(LIST_TITLE, value)?,
            Some(STATUS) => patch.status = status_change(value)?,
            Some(PRIORITY) => patch.priority = priority_change(value)?,
            Some(DELIVERY_DATE) => patch.delivery_date = date_change(value)?,
            _ => return Err(ValidationError::UnknownField(name.clone())),
        }
    }
    Ok(patch)
}

fn canonical_name(name: &str) -> Option<&'static str> {
    match name {
        "title" => Some(TITLE),
        "description" => Some(DESCRIPTION),
        "list_title" | "listTitle" => Some(LIST_TITLE),
        "status" => Some(STATUS),
        "priority" => Some(PRIORITY),
        "delivery_date" | "deliveryDate" => Some(DELIVERY_DATE),
        _ => None,
    }
}

fn insert_optional<T>(
    body: &mut Map<String, Value>,
    name: &str,
    change: &Change<T>,
    encode: impl FnOnce(&T) -> Value,
) {
    match change {
        Change::Keep => {},
        Change::Clear => {
            body.insert(name.to_string(), Value::Null);
        },
        Change::Set(value) => {
            body.insert(name.to_string(), encode(value));
        },
    }
}

fn text_change(field: &str, value: &Value) -> Result<Change<String>, ValidationError> {
    match value {
        Value::Null => Ok(Change::Clear),
        Value::String(s) => Ok(Change::Set(s.clone())),
        other => Err(invalid(field, other)),
    }
}

fn status_change(value: &Value) -> Result<Change<TaskStatus>, ValidationError> {
    match value {
        Value::Null => Err(ValidationError::NotClearable(STATUS.to_string())),
        Value::String(s) => TaskStatus::from_wire(s)
            .map(Change::Set)
            .ok_or_else(|| ValidationError::InvalidStatus(s.clone())),
        other => Err(ValidationError::InvalidStatus(other.to_string())),
    }
}

fn priority_change(value: &Value) -> Result<Change<Priority>, ValidationError> {
    match value {
        Value::Null => Ok(Change::Clear),
        Value::String(s) => s
            .parse()
            .map(Change::Set)
            .map_err(|_| ValidationError::InvalidPriority(s.clone())),
        other => Err(ValidationError::InvalidPriority(other.to_string())),
    }
}

fn date_change(value: &Value) -> Result<Change<NaiveDate>, ValidationError> {
    match value {
        Value::Null => Ok(Change::Clear),
        Value::String(s) => parse_date(s).map(Change::Set).ok_or_else(|| ValidationError::InvalidValue {
            field: DELIVERY_DATE.to_string(),
            reason: format!("not a date: {s}"),
        }),
        other => Err(invalid(DELIVERY_DATE, other)),
    }
}

fn invalid(field: &str, value: &Value) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        reason: format!("expected a string or null, got {value}"),
    }
}
