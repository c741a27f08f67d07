use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::Result;
use crate::features::resources::kind::{Draft, NoFilter, ResourceKind, UpdateContext};
use crate::shared::patch::Patch;
use crate::shared::validation::required_text;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Announcement {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnouncementDto {
    pub message: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnnouncementDto {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub message: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<bool>)]
    pub is_active: Patch<bool>,
}

/// Scrolling notice shown on the home page
pub struct Announcements;

impl ResourceKind for Announcements {
    const COLLECTION: &'static str = "announcements";
    const LABEL: &'static str = "Announcement";

    type Document = Announcement;
    type Create = CreateAnnouncementDto;
    type Update = UpdateAnnouncementDto;
    type Filter = NoFilter;

    fn create(dto: CreateAnnouncementDto) -> Result<Draft<Announcement>> {
        Ok(Draft::new(
            Announcement {
                message: required_text(dto.message, "Message")?,
            },
            dto.is_active,
        ))
    }

    fn apply_update(
        doc: &mut Announcement,
        is_active: &mut bool,
        dto: UpdateAnnouncementDto,
        _ctx: &UpdateContext,
    ) -> Result<()> {
        if let Some(message) = dto.message.into_required_text("Message")? {
            doc.message = message;
        }
        if let Some(active) = dto.is_active.into_required("isActive")? {
            *is_active = active;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_message_required() {
        let err = Announcements::create(CreateAnnouncementDto {
            message: Some("  ".to_string()),
            is_active: None,
        })
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Message is required"));
    }

    #[test]
    fn test_deactivate_only() {
        let mut doc = Announcement {
            message: "Tax camp on Friday".to_string(),
        };
        let mut active = true;
        let dto: UpdateAnnouncementDto = serde_json::from_str(r#"{"isActive": false}"#).unwrap();

        Announcements::apply_update(
            &mut doc,
            &mut active,
            dto,
            &UpdateContext {
                actor: Uuid::now_v7(),
                now: Utc::now(),
            },
        )
        .unwrap();

        assert!(!active);
        assert_eq!(doc.message, "Tax camp on Friday");
    }
}
