use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::resources::kind::{Draft, ResourceKind, UpdateContext};
use crate::modules::storage::FieldFilter;
use crate::shared::patch::Patch;
use crate::shared::validation::{normalize_email, optional_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStatus {
    #[default]
    Pending,
    Reviewed,
    Resolved,
}

impl FeedbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackStatus::Pending => "pending",
            FeedbackStatus::Reviewed => "reviewed",
            FeedbackStatus::Resolved => "resolved",
        }
    }
}

impl fmt::Display for FeedbackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(FeedbackStatus::Pending),
            "reviewed" => Ok(FeedbackStatus::Reviewed),
            "resolved" => Ok(FeedbackStatus::Resolved),
            _ => Err(AppError::Validation(
                "Invalid status. Must be: pending, reviewed, or resolved".to_string(),
            )),
        }
    }
}

/// Message sent by a resident through the contact form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub status: FeedbackStatus,
    #[serde(default)]
    pub reviewed_by: Option<Uuid>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubmitFeedbackDto {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// Review outcome; the reviewing administrator and time are recorded
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackStatusDto {
    /// `pending`, `reviewed` or `resolved`
    pub status: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub admin_notes: Patch<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct FeedbackFilter {
    /// Exact status match
    pub status: Option<String>,
}

pub struct FeedbackKind;

impl ResourceKind for FeedbackKind {
    const COLLECTION: &'static str = "feedback";
    const LABEL: &'static str = "Feedback";
    const SOFT_DELETE: bool = false;

    type Document = Feedback;
    type Create = SubmitFeedbackDto;
    type Update = FeedbackStatusDto;
    type Filter = FeedbackFilter;

    fn create(dto: SubmitFeedbackDto) -> Result<Draft<Feedback>> {
        let (Some(name), Some(email), Some(subject), Some(message)) = (
            optional_text(dto.name),
            optional_text(dto.email),
            optional_text(dto.subject),
            optional_text(dto.message),
        ) else {
            return Err(AppError::Validation(
                "Name, email, subject, and message are required".to_string(),
            ));
        };

        Ok(Draft::new(
            Feedback {
                name,
                email: normalize_email(&email)?,
                phone: optional_text(dto.phone),
                subject,
                message,
                status: FeedbackStatus::Pending,
                reviewed_by: None,
                reviewed_at: None,
                admin_notes: None,
            },
            None,
        ))
    }

    fn apply_update(
        doc: &mut Feedback,
        _is_active: &mut bool,
        dto: FeedbackStatusDto,
        ctx: &UpdateContext,
    ) -> Result<()> {
        let status = dto.status.as_deref().unwrap_or_default().parse::<FeedbackStatus>()?;

        doc.status = status;
        doc.reviewed_by = Some(ctx.actor);
        doc.reviewed_at = Some(ctx.now);
        if let Some(notes) = dto.admin_notes.into_optional_text() {
            doc.admin_notes = notes;
        }
        Ok(())
    }

    fn filters(filter: &FeedbackFilter) -> Vec<FieldFilter> {
        optional_text(filter.status.clone())
            .map(|value| FieldFilter::Equals {
                field: "status",
                value,
            })
            .into_iter()
            .collect()
    }

    fn created_message() -> String {
        "Feedback submitted successfully. We will review it soon.".to_string()
    }

    fn updated_message() -> String {
        "Feedback status updated successfully".to_string()
    }

    fn deleted_message() -> String {
        "Feedback deleted successfully".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;

    fn submission() -> SubmitFeedbackDto {
        SubmitFeedbackDto {
            name: Some(Name().fake()),
            email: Some(SafeEmail().fake()),
            phone: None,
            subject: Some("Street light".to_string()),
            message: Some("The light near the school is broken".to_string()),
        }
    }

    #[test]
    fn test_submission_starts_pending() {
        let draft = FeedbackKind::create(submission()).unwrap();
        assert_eq!(draft.document.status, FeedbackStatus::Pending);
        assert!(draft.document.reviewed_by.is_none());
    }

    #[test]
    fn test_submission_requires_fields_and_valid_email() {
        let missing = SubmitFeedbackDto {
            subject: None,
            ..submission()
        };
        assert!(matches!(
            FeedbackKind::create(missing),
            Err(AppError::Validation(ref m)) if m == "Name, email, subject, and message are required"
        ));

        let bad_email = SubmitFeedbackDto {
            email: Some("resident-at-village".to_string()),
            ..submission()
        };
        assert!(FeedbackKind::create(bad_email).is_err());
    }

    #[test]
    fn test_status_update_stamps_reviewer() {
        let mut doc = FeedbackKind::create(submission()).unwrap().document;
        let mut active = true;
        let ctx = UpdateContext {
            actor: Uuid::now_v7(),
            now: Utc::now(),
        };

        FeedbackKind::apply_update(
            &mut doc,
            &mut active,
            FeedbackStatusDto {
                status: Some("resolved".to_string()),
                admin_notes: Patch::Value(" Fixed on Monday ".to_string()),
            },
            &ctx,
        )
        .unwrap();

        assert_eq!(doc.status, FeedbackStatus::Resolved);
        assert_eq!(doc.reviewed_by, Some(ctx.actor));
        assert_eq!(doc.reviewed_at, Some(ctx.now));
        assert_eq!(doc.admin_notes.as_deref(), Some("Fixed on Monday"));
    }

    #[test]
    fn test_invalid_status() {
        let mut doc = FeedbackKind::create(submission()).unwrap().document;
        let mut active = true;

        for status in [Some("closed".to_string()), None] {
            let err = FeedbackKind::apply_update(
                &mut doc,
                &mut active,
                FeedbackStatusDto {
                    status,
                    ..Default::default()
                },
                &UpdateContext {
                    actor: Uuid::now_v7(),
                    now: Utc::now(),
                },
            )
            .unwrap_err();
            assert!(
                matches!(err, AppError::Validation(ref m) if m == "Invalid status. Must be: pending, reviewed, or resolved")
            );
        }
        assert_eq!(doc.status, FeedbackStatus::Pending);
    }

    #[test]
    fn test_status_serialises_lowercase() {
        let doc = FeedbackKind::create(submission()).unwrap().document;
        let body = serde_json::to_value(&doc).unwrap();
        assert_eq!(body["status"], "pending");
        assert_eq!(FeedbackStatus::Reviewed.to_string(), "reviewed");
    }
}
