use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::Result;
use crate::features::resources::image::{ImageFields, StoredImage};
use crate::features::resources::kind::{Draft, NoFilter, ResourceKind, UpdateContext};
use crate::shared::patch::Patch;
use crate::shared::validation::{optional_text, required_text};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GalleryItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub image: StoredImage,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGalleryItemDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub image: ImageFields,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGalleryItemDto {
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

pub struct Gallery;

impl ResourceKind for Gallery {
    const COLLECTION: &'static str = "gallery_items";
    const LABEL: &'static str = "Gallery item";

    type Document = GalleryItem;
    type Create = CreateGalleryItemDto;
    type Update = UpdateGalleryItemDto;
    type Filter = NoFilter;

    fn create(dto: CreateGalleryItemDto) -> Result<Draft<GalleryItem>> {
        Ok(Draft::new(
            GalleryItem {
                name: required_text(dto.name, "Name")?,
                description: optional_text(dto.description),
                image: dto.image.into_required_image(Self::LABEL)?,
            },
            dto.is_active,
        ))
    }

    fn apply_update(
        doc: &mut GalleryItem,
        is_active: &mut bool,
        dto: UpdateGalleryItemDto,
        _ctx: &UpdateContext,
    ) -> Result<()> {
        if let Some(name) = dto.name.into_required_text("Name")? {
            doc.name = name;
        }
        if let Some(description) = dto.description.into_optional_text() {
            doc.description = description;
        }
        if let Some(active) = dto.is_active.into_required("isActive")? {
            *is_active = active;
        }
        if let Some(image) = dto.image.into_image()? {
            doc.image = image;
        }
        Ok(())
    }
}
