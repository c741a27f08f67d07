use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::Result;
use crate::features::resources::image::{ImageFields, StoredImage};
use crate::features::resources::kind::{Draft, NoFilter, ResourceKind, UpdateContext};
use crate::shared::dates::parse_date_time;
use crate::shared::patch::Patch;
use crate::shared::validation::{optional_text, required_text};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Award {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub image: StoredImage,
    pub award_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAwardDto {
    pub name: Option<String>,
    pub description: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`; defaults to now
    pub award_date: Option<String>,
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub image: ImageFields,
}

/// Sending all image fields replaces the image; sending none keeps it
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAwardDto {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub award_date: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<bool>)]
    pub is_active: Patch<bool>,
    #[serde(flatten)]
    pub image: ImageFields,
}

/// Recognition received by the village, newest award date first
pub struct Awards;

impl ResourceKind for Awards {
    const COLLECTION: &'static str = "awards";
    const LABEL: &'static str = "Award";

    type Document = Award;
    type Create = CreateAwardDto;
    type Update = UpdateAwardDto;
    type Filter = NoFilter;

    fn create(dto: CreateAwardDto) -> Result<Draft<Award>> {
        let name = required_text(dto.name, "Award name")?;
        let image = dto.image.into_required_image(Self::LABEL)?;
        let award_date = match optional_text(dto.award_date) {
            Some(raw) => parse_date_time(&raw, "Award date")?,
            None => Utc::now(),
        };

        Ok(Draft::new(
            Award {
                name,
                description: optional_text(dto.description),
                image,
                award_date,
            },
            dto.is_active,
        ))
    }

    fn apply_update(
        doc: &mut Award,
        is_active: &mut bool,
        dto: UpdateAwardDto,
        _ctx: &UpdateContext,
    ) -> Result<()> {
        if let Some(name) = dto.name.into_required_text("Award name")? {
            doc.name = name;
        }
        if let Some(description) = dto.description.into_optional_text() {
            doc.description = description;
        }
        if let Some(raw) = dto.award_date.into_required_text("Award date")? {
            doc.award_date = parse_date_time(&raw, "Award date")?;
        }
        if let Some(active) = dto.is_active.into_required("isActive")? {
            *is_active = active;
        }
        if let Some(image) = dto.image.into_image()? {
            doc.image = image;
        }
        Ok(())
    }

    fn sort_key(doc: &Award) -> Option<DateTime<Utc>> {
        Some(doc.award_date)
    }
}
