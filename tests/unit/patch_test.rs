//! Tests for patch building and applying

use chrono::NaiveDate;
use serde_json::{Map, Value, json};
use taskboard::core::models::{Change, Priority, TaskId, TaskPatch, TaskStatus};
use taskboard::core::services::{build_update, build_update_from_fields, parse_fields};
use taskboard::error::ValidationError;

use crate::common::fixtures::TaskBuilder;

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

fn id() -> TaskId {
    TaskId::remote("7")
}

// =============================================================================
// BUILD UPDATE
// =============================================================================

#[test]
fn test_body_holds_only_touched_fields() {
    let patch = TaskPatch::new().title("Renamed").clear_delivery_date();
    let req = build_update(&id(), &patch).unwrap();

    assert_eq!(req.id, id());
    assert_eq!(Value::Object(req.body), json!({"title": "Renamed", "delivery_date": null}));
}

#[test]
fn test_empty_patch_is_rejected() {
    assert_eq!(build_update(&id(), &TaskPatch::new()), Err(ValidationError::NoFields));
    assert_eq!(build_update_from_fields(&id(), &Map::new()), Err(ValidationError::NoFields));
}

#[test]
fn test_blank_title_is_rejected() {
    let err = build_update(&id(), &TaskPatch::new().title("  ")).unwrap_err();
    assert_eq!(err, ValidationError::EmptyTitle);
}

#[test]
fn test_blank_list_title_is_rejected() {
    let err = build_update(&id(), &TaskPatch::new().list_title("")).unwrap_err();
    assert_eq!(err, ValidationError::EmptyListTitle);
}

#[test]
fn test_status_cannot_be_cleared() {
    let patch = TaskPatch {
        status: Change::Clear,
        ..TaskPatch::new()
    };
    assert_eq!(build_update(&id(), &patch), Err(ValidationError::NotClearable("status".to_string())));
}

#[test]
fn test_values_use_wire_spelling() {
    let patch = TaskPatch::new()
        .status(TaskStatus::Done)
        .priority(Priority::High)
        .delivery_date(NaiveDate::from_ymd_opt(2025, 1, 9).unwrap());
    let req = build_update(&id(), &patch).unwrap();

    assert_eq!(req.body["status"], "Done");
    assert_eq!(req.body["priority"], "high");
    assert_eq!(req.body["delivery_date"], "2025-01-09");
}

// =============================================================================
// PARSE FIELDS
// =============================================================================

#[test]
fn test_invalid_status_is_rejected() {
    let err = parse_fields(&fields(json!({"status": "Blocked"}))).unwrap_err();
    assert_eq!(err, ValidationError::InvalidStatus("Blocked".to_string()));
}

#[test]
fn test_status_must_use_exact_wire_spelling() {
    let patch = parse_fields(&fields(json!({"status": "To Do"}))).unwrap();
    assert_eq!(patch.status, Change::Set(TaskStatus::ToDo));

    for loose in ["DONE", "to_do", "todo", "done "] {
        let err = parse_fields(&fields(json!({"status": loose}))).unwrap_err();
        assert_eq!(err, ValidationError::InvalidStatus(loose.to_string()));
    }
}

#[test]
fn test_invalid_priority_is_rejected() {
    let err = parse_fields(&fields(json!({"priority": "urgent"}))).unwrap_err();
    assert_eq!(err, ValidationError::InvalidPriority("urgent".to_string()));
}

#[test]
fn test_unknown_field_is_rejected() {
    let err = parse_fields(&fields(json!({"colour": "red"}))).unwrap_err();
    assert_eq!(err, ValidationError::UnknownField("colour".to_string()));
}

#[test]
fn test_wrong_type_is_rejected() {
    let err = parse_fields(&fields(json!({"description": 5}))).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "description"));
}

#[test]
fn test_camel_case_delivery_date() {
    let patch = parse_fields(&fields(json!({"deliveryDate": "2024-06-01"}))).unwrap();
    assert_eq!(patch.delivery_date, Change::Set(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));
}

#[test]
fn test_null_description_clears() {
    let patch = parse_fields(&fields(json!({"description": null}))).unwrap();
    assert_eq!(patch.description, Change::Clear);
    assert!(patch.title.is_keep());
}

// =============================================================================
// APPLY
// =============================================================================

#[test]
fn test_apply_touches_only_patched_fields() {
    let mut task = TaskBuilder::new("7").description("old").priority(Priority::Low).due(2024, 1, 1).build();
    let before = task.clone();

    TaskPatch::new().clear_description().list_title("Doing").apply_to(&mut task);

    assert_eq!(task.description, None);
    assert_eq!(task.list_title, "Doing");
    assert_eq!(task.title, before.title);
    assert_eq!(task.priority, before.priority);
    assert_eq!(task.delivery_date, before.delivery_date);
    assert_eq!(task.status, before.status);
}
