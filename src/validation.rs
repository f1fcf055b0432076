//! Field rules for todo-list requests.
//!
//! Rules are declared with the `validator` derive. When several fields fail, the
//! reported message belongs to the first failing field in [`FIELD_ORDER`], and within
//! a field to the first rule that failed.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::db::dao::{NewTodoList, TodoListPatch};
use crate::services::ServiceError;

/// Order in which failing fields are reported.
pub const FIELD_ORDER: [&str; 4] = ["owner_id", "title", "description", "scheduled_at"];

/// A create or update request after the caller's identity has been attached.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct TodoListRequest {
    #[validate(range(min = 1, message = "owner_id must be a positive id"))]
    pub owner_id: i64,
    #[validate(
        length(min = 1, max = 255, message = "title must be between 1 and 255 characters"),
        custom(function = "not_blank", message = "title must not be blank")
    )]
    pub title: String,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: String,
    pub scheduled_at: Option<DateTime<FixedOffset>>,
}

impl TodoListRequest {
    pub fn to_new(&self) -> NewTodoList {
        NewTodoList {
            owner_id: self.owner_id,
            title: self.title.clone(),
            description: self.description.clone(),
            scheduled_at: self.scheduled_at,
        }
    }

    /// Everything except the owner.
    pub fn to_patch(&self) -> TodoListPatch {
        TodoListPatch {
            title: self.title.clone(),
            description: self.description.clone(),
            scheduled_at: self.scheduled_at,
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

pub fn validate_payload(request: &TodoListRequest) -> Result<(), ServiceError> {
    match request.validate() {
        Ok(()) => Ok(()),
        Err(errors) => Err(ServiceError::InvalidPayload(first_violation(&errors))),
    }
}

/// Message of the first failing field, following [`FIELD_ORDER`] and then field name.
pub fn first_violation(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();
    let mut remaining: Vec<&str> = fields
        .keys()
        .map(|field| &**field)
        .filter(|field| !FIELD_ORDER.contains(field))
        .collect();
    remaining.sort_unstable();

    FIELD_ORDER
        .iter()
        .copied()
        .chain(remaining)
        .find_map(|field| {
            let first = fields.get(field)?.first()?;
            Some(message_for(field, first))
        })
        .unwrap_or_else(|| "invalid payload".to_string())
}

fn message_for(field: &str, error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => format!("{field} is invalid ({})", error.code),
    }
}
