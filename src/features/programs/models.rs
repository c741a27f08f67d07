use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::features::resources::image::{ImageFields, StoredImage};
use crate::features::resources::kind::{Draft, NoFilter, ResourceKind, UpdateContext};
use crate::shared::patch::Patch;
use crate::shared::validation::optional_text;

/// Government scheme or village programme
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Program {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<StoredImage>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgramDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub image: ImageFields,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgramDto {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<bool>)]
    pub is_active: Patch<bool>,
    #[serde(flatten)]
    pub image: ImageFields,
}

pub struct Programs;

impl ResourceKind for Programs {
    const COLLECTION: &'static str = "programs";
    const LABEL: &'static str = "Program";

    type Document = Program;
    type Create = CreateProgramDto;
    type Update = UpdateProgramDto;
    type Filter = NoFilter;

    fn create(dto: CreateProgramDto) -> Result<Draft<Program>> {
        let (Some(name), Some(description)) =
            (optional_text(dto.name), optional_text(dto.description))
        else {
            return Err(AppError::Validation(
                "Name and description are required".to_string(),
            ));
        };

        Ok(Draft::new(
            Program {
                name,
                description,
                image: dto.image.into_image()?,
            },
            dto.is_active,
        ))
    }

    fn apply_update(
        doc: &mut Program,
        is_active: &mut bool,
        dto: UpdateProgramDto,
        _ctx: &UpdateContext,
    ) -> Result<()> {
        if let Some(name) = dto.name.into_required_text("Name")? {
            doc.name = name;
        }
        if let Some(description) = dto.description.into_required_text("Description")? {
            doc.description = description;
        }
        if let Some(active) = dto.is_active.into_required("isActive")? {
            *is_active = active;
        }
        if let Some(image) = dto.image.into_image()? {
            doc.image = Some(image);
        }
        Ok(())
    }

    fn deleted_message() -> String {
        "Program deleted successfully".to_string()
    }
}
