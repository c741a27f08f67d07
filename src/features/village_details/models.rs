use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::error::{AppError, Result};
use crate::features::resources::image::{ImageFields, StoredImage};
use crate::features::resources::kind::{Draft, NoFilter, ResourceKind, UpdateContext};
use crate::shared::patch::Patch;
use crate::shared::validation::optional_text;

/// Supported content languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Mr,
}

impl Language {
    /// Unknown or missing codes fall back to English
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(|c| c.trim().to_ascii_lowercase()).as_deref() {
            Some("mr") => Language::Mr,
            _ => Language::En,
        }
    }
}

/// Text kept in English and Marathi
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LocalizedText {
    pub en: String,
    pub mr: String,
}

impl LocalizedText {
    pub fn resolve(&self, lang: Language) -> &str {
        match lang {
            Language::Mr if !self.mr.is_empty() => &self.mr,
            _ => &self.en,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LocalizedTextInput {
    pub en: Option<String>,
    pub mr: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LocalizedTextPatch {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub en: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub mr: Patch<String>,
}

impl LocalizedTextPatch {
    fn apply(self, target: &mut LocalizedText, field: &str) -> Result<()> {
        if let Some(en) = self.en.into_required_text(&format!("{} (English)", field))? {
            target.en = en;
        }
        if let Some(mr) = self.mr.into_required_text(&format!("{} (Marathi)", field))? {
            target.mr = mr;
        }
        Ok(())
    }
}

/// Section of the "about the village" page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VillageDetail {
    pub title: LocalizedText,
    pub description: LocalizedText,
    #[serde(default)]
    pub image: Option<StoredImage>,
}

/// A village detail with its text resolved to one language
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LocalizedVillageDetail {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<StoredImage>,
}

impl VillageDetail {
    pub fn localize(self, lang: Language) -> LocalizedVillageDetail {
        LocalizedVillageDetail {
            title: self.title.resolve(lang).to_string(),
            description: self.description.resolve(lang).to_string(),
            image: self.image,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct LangQuery {
    /// `en` (default) or `mr`
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVillageDetailDto {
    #[serde(default)]
    pub title: LocalizedTextInput,
    #[serde(default)]
    pub description: LocalizedTextInput,
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub image: ImageFields,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVillageDetailDto {
    #[serde(default)]
    #[schema(value_type = Option<LocalizedTextInput>)]
    pub title: Patch<LocalizedTextPatch>,
    #[serde(default)]
    #[schema(value_type = Option<LocalizedTextInput>)]
    pub description: Patch<LocalizedTextPatch>,
    #[serde(default)]
    #[schema(value_type = Option<bool>)]
    pub is_active: Patch<bool>,
    #[serde(flatten)]
    pub image: ImageFields,
}

fn required_pair(input: LocalizedTextInput) -> Option<LocalizedText> {
    Some(LocalizedText {
        en: optional_text(input.en)?,
        mr: optional_text(input.mr)?,
    })
}

pub struct VillageDetails;

impl ResourceKind for VillageDetails {
    const COLLECTION: &'static str = "village_details";
    const LABEL: &'static str = "Village detail";

    type Document = VillageDetail;
    type Create = CreateVillageDetailDto;
    type Update = UpdateVillageDetailDto;
    type Filter = NoFilter;

    fn create(dto: CreateVillageDetailDto) -> Result<Draft<VillageDetail>> {
        let (Some(title), Some(description)) =
            (required_pair(dto.title), required_pair(dto.description))
        else {
            return Err(AppError::Validation(
                "Title and description are required in English and Marathi".to_string(),
            ));
        };

        Ok(Draft::new(
            VillageDetail {
                title,
                description,
                image: dto.image.into_image()?,
            },
            dto.is_active,
        ))
    }

    fn apply_update(
        doc: &mut VillageDetail,
        is_active: &mut bool,
        dto: UpdateVillageDetailDto,
        _ctx: &UpdateContext,
    ) -> Result<()> {
        if let Some(title) = dto.title.into_required("Title")? {
            title.apply(&mut doc.title, "Title")?;
        }
        if let Some(description) = dto.description.into_required("Description")? {
            description.apply(&mut doc.description, "Description")?;
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
        "Village detail deleted permanently".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn detail() -> VillageDetail {
        VillageDetails::create(
            serde_json::from_value(serde_json::json!({
                "title": { "en": "History", "mr": "इतिहास" },
                "description": { "en": "Founded in 1850", "mr": "१८५० मध्ये स्थापना" }
            }))
            .unwrap(),
        )
        .unwrap()
        .document
    }

    #[test]
    fn test_language_fallback() {
        assert_eq!(Language::from_code(None), Language::En);
        assert_eq!(Language::from_code(Some("MR")), Language::Mr);
        assert_eq!(Language::from_code(Some("hi")), Language::En);
    }

    #[test]
    fn test_localize() {
        let marathi = detail().localize(Language::Mr);
        assert_eq!(marathi.title, "इतिहास");

        let english = detail().localize(Language::En);
        assert_eq!(english.description, "Founded in 1850");
    }

    #[test]
    fn test_both_languages_required() {
        let dto: CreateVillageDetailDto = serde_json::from_value(serde_json::json!({
            "title": { "en": "History" },
            "description": { "en": "Founded in 1850", "mr": "१८५०" }
        }))
        .unwrap();
        assert!(matches!(
            VillageDetails::create(dto),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_update_one_language() {
        let mut doc = detail();
        let mut active = true;
        let dto: UpdateVillageDetailDto =
            serde_json::from_str(r#"{"title": {"mr": "गावाचा इतिहास"}}"#).unwrap();

        VillageDetails::apply_update(
            &mut doc,
            &mut active,
            dto,
            &UpdateContext {
                actor: Uuid::now_v7(),
                now: Utc::now(),
            },
        )
        .unwrap();

        assert_eq!(doc.title.en, "History");
        assert_eq!(doc.title.mr, "गावाचा इतिहास");
        assert_eq!(doc.description.en, "Founded in 1850");
    }

    #[test]
    fn test_update_cannot_clear_title() {
        let mut doc = detail();
        let mut active = true;
        let dto: UpdateVillageDetailDto = serde_json::from_str(r#"{"title": null}"#).unwrap();

        let result = VillageDetails::apply_update(
            &mut doc,
            &mut active,
            dto,
            &UpdateContext {
                actor: Uuid::now_v7(),
                now: Utc::now(),
            },
        );
        assert!(result.is_err());
    }
}
