use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::error::{AppError, Result};
use crate::features::resources::image::{ImageFields, StoredImage};
use crate::features::resources::kind::{Draft, NoFilter, ResourceKind, UpdateContext};
use crate::modules::storage::FieldFilter;
use crate::shared::dates::parse_date_time;
use crate::shared::validation::{normalize_email, optional_text, required_text};

// =============================================================================
// APPLICATIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl FromStr for ApplicationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            _ => Err(AppError::Validation(
                "Invalid status. Must be: pending, approved, or rejected".to_string(),
            )),
        }
    }
}

/// Certificate request filed by a resident
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SevaApplication {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub whatsapp_number: String,
    pub aadhaar_number: String,
    pub email: String,
    pub certificate_holder_name: String,
    pub date_of_birth: DateTime<Utc>,
    #[serde(default)]
    pub date_of_registration: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_screenshot: Option<StoredImage>,
    #[serde(default)]
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyDto {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub whatsapp_number: Option<String>,
    pub aadhaar_number: Option<String>,
    pub email: Option<String>,
    pub certificate_holder_name: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`
    pub date_of_birth: Option<String>,
    pub date_of_registration: Option<String>,
    pub payment_screenshot: Option<StoredImage>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ApplicationStatusDto {
    /// `pending`, `approved` or `rejected`
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ApplicationFilter {
    /// Exact status match
    pub status: Option<String>,
}

pub struct SevaApplications;

impl ResourceKind for SevaApplications {
    const COLLECTION: &'static str = "seva_applications";
    const LABEL: &'static str = "Application";
    const SOFT_DELETE: bool = false;

    type Document = SevaApplication;
    type Create = ApplyDto;
    type Update = ApplicationStatusDto;
    type Filter = ApplicationFilter;

    fn create(dto: ApplyDto) -> Result<Draft<SevaApplication>> {
        let date_of_birth = parse_date_time(
            &required_text(dto.date_of_birth, "Date of birth")?,
            "Date of birth",
        )?;
        let date_of_registration = optional_text(dto.date_of_registration)
            .map(|raw| parse_date_time(&raw, "Date of registration"))
            .transpose()?;
        let payment_screenshot = dto
            .payment_screenshot
            .map(|image| image.validated("Payment screenshot"))
            .transpose()?;

        Ok(Draft::new(
            SevaApplication {
                first_name: required_text(dto.first_name, "First name")?,
                middle_name: required_text(dto.middle_name, "Middle name")?,
                last_name: required_text(dto.last_name, "Last name")?,
                whatsapp_number: required_text(dto.whatsapp_number, "WhatsApp number")?,
                aadhaar_number: required_text(dto.aadhaar_number, "Aadhaar number")?,
                email: normalize_email(&required_text(dto.email, "Email")?)?,
                certificate_holder_name: required_text(
                    dto.certificate_holder_name,
                    "Certificate holder name",
                )?,
                date_of_birth,
                date_of_registration,
                payment_screenshot,
                status: ApplicationStatus::Pending,
            },
            None,
        ))
    }

    fn apply_update(
        doc: &mut SevaApplication,
        _is_active: &mut bool,
        dto: ApplicationStatusDto,
        _ctx: &UpdateContext,
    ) -> Result<()> {
        doc.status = dto.status.as_deref().unwrap_or_default().parse()?;
        Ok(())
    }

    fn filters(filter: &ApplicationFilter) -> Vec<FieldFilter> {
        optional_text(filter.status.clone())
            .map(|value| FieldFilter::Equals {
                field: "status",
                value,
            })
            .into_iter()
            .collect()
    }

    fn created_message() -> String {
        "Application submitted successfully".to_string()
    }

    fn updated_message() -> String {
        "Application status updated".to_string()
    }

    fn deleted_message() -> String {
        "Application deleted successfully".to_string()
    }
}

// =============================================================================
// HEADER
// =============================================================================

/// Banner shown above the application form; only the latest one is served
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SevaHeader {
    pub image: StoredImage,
}

pub struct SevaHeaders;

impl ResourceKind for SevaHeaders {
    const COLLECTION: &'static str = "seva_headers";
    const LABEL: &'static str = "Header";
    const SOFT_DELETE: bool = false;

    type Document = SevaHeader;
    type Create = ImageFields;
    type Update = ImageFields;
    type Filter = NoFilter;

    fn create(dto: ImageFields) -> Result<Draft<SevaHeader>> {
        Ok(Draft::new(
            SevaHeader {
                image: dto.into_required_image(Self::LABEL)?,
            },
            None,
        ))
    }

    fn apply_update(
        doc: &mut SevaHeader,
        _is_active: &mut bool,
        dto: ImageFields,
        _ctx: &UpdateContext,
    ) -> Result<()> {
        doc.image = dto.into_required_image(Self::LABEL)?;
        Ok(())
    }

    fn updated_message() -> String {
        "Header image updated successfully".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::{FirstName, LastName};
    use fake::Fake;
    use uuid::Uuid;

    fn application() -> ApplyDto {
        ApplyDto {
            first_name: Some(FirstName().fake()),
            middle_name: Some(FirstName().fake()),
            last_name: Some(LastName().fake()),
            whatsapp_number: Some("9876543210".to_string()),
            aadhaar_number: Some("123412341234".to_string()),
            email: Some(SafeEmail().fake()),
            certificate_holder_name: Some("Sita Patil".to_string()),
            date_of_birth: Some("1990-04-12".to_string()),
            date_of_registration: None,
            payment_screenshot: None,
        }
    }

    fn ctx() -> UpdateContext {
        UpdateContext {
            actor: Uuid::now_v7(),
            now: Utc::now(),
        }
    }

    #[test]
    fn test_application_defaults_to_pending() {
        let draft = SevaApplications::create(application()).unwrap();
        assert_eq!(draft.document.status, ApplicationStatus::Pending);
        assert_eq!(draft.document.date_of_birth.year(), 1990);
        assert!(draft.document.payment_screenshot.is_none());
    }

    #[test]
    fn test_application_required_fields() {
        let err = SevaApplications::create(ApplyDto {
            aadhaar_number: Some("  ".to_string()),
            ..application()
        })
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Aadhaar number is required"));

        let err = SevaApplications::create(ApplyDto {
            date_of_birth: Some("twelfth of april".to_string()),
            ..application()
        })
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_payment_screenshot_must_be_complete() {
        let screenshot = StoredImage {
            data: "aGVsbG8=".to_string(),
            content_type: "image/png".to_string(),
            filename: String::new(),
            size: 5,
        };
        assert!(SevaApplications::create(ApplyDto {
            payment_screenshot: Some(screenshot),
            ..application()
        })
        .is_err());
    }

    #[test]
    fn test_status_change() {
        let mut doc = SevaApplications::create(application()).unwrap().document;
        let mut active = true;

        SevaApplications::apply_update(
            &mut doc,
            &mut active,
            ApplicationStatusDto {
                status: Some("approved".to_string()),
            },
            &ctx(),
        )
        .unwrap();
        assert_eq!(doc.status, ApplicationStatus::Approved);

        let err = SevaApplications::apply_update(
            &mut doc,
            &mut active,
            ApplicationStatusDto {
                status: Some("reviewed".to_string()),
            },
            &ctx(),
        )
        .unwrap_err();
        assert!(
            matches!(err, AppError::Validation(ref m) if m == "Invalid status. Must be: pending, approved, or rejected")
        );
        assert_eq!(doc.status, ApplicationStatus::Approved);
    }

    #[test]
    fn test_header_requires_image() {
        assert!(SevaHeaders::create(ImageFields::default()).is_err());

        let header = SevaHeaders::create(ImageFields {
            image_data: Some("aGVsbG8=".to_string()),
            content_type: Some("image/jpeg".to_string()),
            filename: Some("banner.jpg".to_string()),
            size: Some(5),
        })
        .unwrap()
        .document;
        assert_eq!(header.image.filename, "banner.jpg");
    }
}
