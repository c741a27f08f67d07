use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::error::{AppError, Result};
use crate::features::resources::image::{ImageFields, StoredImage};
use crate::features::resources::kind::{Draft, ResourceKind, UpdateContext};
use crate::modules::storage::FieldFilter;
use crate::shared::patch::Patch;
use crate::shared::validation::{normalize_email, optional_text};

/// Panchayat body member or staff
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Member {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub image: Option<StoredImage>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub image: ImageFields,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberDto {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub position: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub department: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub email: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub phone: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<bool>)]
    pub is_active: Patch<bool>,
    #[serde(flatten)]
    pub image: ImageFields,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct MemberFilter {
    /// Case-insensitive substring match on department
    pub department: Option<String>,
}

fn optional_email(value: Option<String>) -> Result<Option<String>> {
    optional_text(value)
        .map(|email| normalize_email(&email))
        .transpose()
}

pub struct Members;

impl ResourceKind for Members {
    const COLLECTION: &'static str = "members";
    const LABEL: &'static str = "Member";

    type Document = Member;
    type Create = CreateMemberDto;
    type Update = UpdateMemberDto;
    type Filter = MemberFilter;

    fn create(dto: CreateMemberDto) -> Result<Draft<Member>> {
        let (Some(name), Some(description)) =
            (optional_text(dto.name), optional_text(dto.description))
        else {
            return Err(AppError::Validation(
                "Name and description are required".to_string(),
            ));
        };

        Ok(Draft::new(
            Member {
                name,
                description,
                position: optional_text(dto.position),
                department: optional_text(dto.department),
                email: optional_email(dto.email)?,
                phone: optional_text(dto.phone),
                image: dto.image.into_image()?,
            },
            dto.is_active,
        ))
    }

    fn apply_update(
        doc: &mut Member,
        is_active: &mut bool,
        dto: UpdateMemberDto,
        _ctx: &UpdateContext,
    ) -> Result<()> {
        if let Some(name) = dto.name.into_required_text("Name")? {
            doc.name = name;
        }
        if let Some(description) = dto.description.into_required_text("Description")? {
            doc.description = description;
        }
        if let Some(position) = dto.position.into_optional_text() {
            doc.position = position;
        }
        if let Some(department) = dto.department.into_optional_text() {
            doc.department = department;
        }
        if let Some(email) = dto.email.into_optional_text() {
            doc.email = optional_email(email)?;
        }
        if let Some(phone) = dto.phone.into_optional_text() {
            doc.phone = phone;
        }
        if let Some(active) = dto.is_active.into_required("isActive")? {
            *is_active = active;
        }
        if let Some(image) = dto.image.into_image()? {
            doc.image = Some(image);
        }
        Ok(())
    }

    fn filters(filter: &MemberFilter) -> Vec<FieldFilter> {
        optional_text(filter.department.clone())
            .map(|value| FieldFilter::Contains {
                field: "department",
                value,
            })
            .into_iter()
            .collect()
    }
}
