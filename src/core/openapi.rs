use utoipa::openapi::path::{HttpMethod, Operation, OperationBuilder, ParameterBuilder, ParameterIn};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityRequirement, SecurityScheme};
use utoipa::openapi::{Required, ResponseBuilder};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers, models as admin_models};
use crate::features::announcements::models as announcements_models;
use crate::features::awards::models as awards_models;
use crate::features::feedback::models as feedback_models;
use crate::features::gallery::models as gallery_models;
use crate::features::members::models as members_models;
use crate::features::nagrik_seva::{handlers as seva_handlers, models as seva_models};
use crate::features::programs::models as programs_models;
use crate::features::resources::image;
use crate::features::village_details::{handlers as village_handlers, models as village_models};
use crate::shared::types::ApiResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Admin
        admin_handlers::setup_status,
        admin_handlers::setup,
        admin_handlers::login,
        admin_handlers::get_profile,
        admin_handlers::update_profile,
        admin_handlers::logout,
        // Village details (localized reads)
        village_handlers::list_localized,
        village_handlers::get_localized,
        // Nagrik seva header
        seva_handlers::get_header,
        seva_handlers::upsert_header,
    ),
    components(
        schemas(
            image::StoredImage,
            image::ImageFields,
            // Admin
            admin_models::AdminProfile,
            admin_dtos::SetupStatusDto,
            admin_dtos::SetupAdminDto,
            admin_dtos::LoginDto,
            admin_dtos::UpdateProfileDto,
            admin_dtos::AuthSessionDto,
            ApiResponse<admin_dtos::SetupStatusDto>,
            ApiResponse<admin_dtos::AuthSessionDto>,
            ApiResponse<admin_models::AdminProfile>,
            // Content
            announcements_models::Announcement,
            announcements_models::CreateAnnouncementDto,
            announcements_models::UpdateAnnouncementDto,
            awards_models::Award,
            awards_models::CreateAwardDto,
            awards_models::UpdateAwardDto,
            gallery_models::GalleryItem,
            gallery_models::CreateGalleryItemDto,
            gallery_models::UpdateGalleryItemDto,
            members_models::Member,
            members_models::CreateMemberDto,
            members_models::UpdateMemberDto,
            programs_models::Program,
            programs_models::CreateProgramDto,
            programs_models::UpdateProgramDto,
            village_models::VillageDetail,
            village_models::LocalizedVillageDetail,
            village_models::CreateVillageDetailDto,
            village_models::UpdateVillageDetailDto,
            ApiResponse<Vec<village_models::LocalizedVillageDetail>>,
            ApiResponse<village_models::LocalizedVillageDetail>,
            // Feedback
            feedback_models::FeedbackStatus,
            feedback_models::Feedback,
            feedback_models::SubmitFeedbackDto,
            feedback_models::FeedbackStatusDto,
            // Nagrik seva
            seva_models::ApplicationStatus,
            seva_models::SevaApplication,
            seva_models::ApplyDto,
            seva_models::ApplicationStatusDto,
            seva_models::SevaHeader,
            ApiResponse<seva_models::SevaHeader>,
        )
    ),
    tags(
        (name = "admin", description = "Administrator setup, login and profile"),
        (name = "announcements", description = "Village announcements"),
        (name = "awards", description = "Awards received by the village"),
        (name = "gallery", description = "Photo gallery"),
        (name = "members", description = "Panchayat members and staff"),
        (name = "programs", description = "Government schemes and village programs"),
        (name = "village-details", description = "Bilingual village information"),
        (name = "feedback", description = "Resident feedback (public submit, admin review)"),
        (name = "nagrik-seva", description = "Citizen service applications"),
    ),
    modifiers(&SecurityAddon, &ResourcePathsAddon),
    info(
        title = "Gram Portal API",
        version = "0.1.0",
        description = "API documentation for the Gram Portal",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Collection served by the generic resource handlers
struct CollectionDoc {
    base: &'static str,
    tag: &'static str,
    label: &'static str,
}

const COLLECTIONS: &[CollectionDoc] = &[
    CollectionDoc {
        base: "/api/announcements",
        tag: "announcements",
        label: "announcement",
    },
    CollectionDoc {
        base: "/api/awards",
        tag: "awards",
        label: "award",
    },
    CollectionDoc {
        base: "/api/gallery",
        tag: "gallery",
        label: "gallery item",
    },
    CollectionDoc {
        base: "/api/members",
        tag: "members",
        label: "member",
    },
    CollectionDoc {
        base: "/api/programs",
        tag: "programs",
        label: "program",
    },
];

fn operation(tag: &str, summary: String, status: &str, with_id: bool, protected: bool) -> Operation {
    let mut builder = OperationBuilder::new()
        .tag(tag)
        .summary(Some(summary))
        .response(status, ResponseBuilder::new().description("Success").build());

    if with_id {
        builder = builder
            .parameter(
                ParameterBuilder::new()
                    .name("id")
                    .parameter_in(ParameterIn::Path)
                    .required(Required::True)
                    .build(),
            )
            .response("404", ResponseBuilder::new().description("Not found").build());
    }

    if protected {
        builder = builder
            .security(SecurityRequirement::new("bearer_auth", Vec::<String>::new()))
            .response("401", ResponseBuilder::new().description("Unauthorized").build());
    }

    builder.build()
}

/// Documents the routes mounted by `features::resources::routes` plus the
/// feedback and application review routes, which share the generic handlers.
struct ResourcePathsAddon;

impl Modify for ResourcePathsAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let paths = &mut openapi.paths;

        for c in COLLECTIONS {
            let item = format!("{}/{{id}}", c.base);
            paths.add_path_operation(
                c.base,
                vec![HttpMethod::Get],
                operation(c.tag, format!("List published {}s", c.label), "200", false, false),
            );
            paths.add_path_operation(
                c.base,
                vec![HttpMethod::Post],
                operation(c.tag, format!("Create {}", c.label), "201", false, true),
            );
            paths.add_path_operation(
                format!("{}/admin", c.base),
                vec![HttpMethod::Get],
                operation(c.tag, format!("List every {}", c.label), "200", false, true),
            );
            paths.add_path_operation(
                &item,
                vec![HttpMethod::Get],
                operation(c.tag, format!("Get {}", c.label), "200", true, false),
            );
            paths.add_path_operation(
                &item,
                vec![HttpMethod::Put],
                operation(c.tag, format!("Update {}", c.label), "200", true, true),
            );
            paths.add_path_operation(
                &item,
                vec![HttpMethod::Delete],
                operation(c.tag, format!("Delete {}", c.label), "200", true, true),
            );
        }

        paths.add_path_operation(
            "/api/village-details",
            vec![HttpMethod::Post],
            operation("village-details", "Create village detail".into(), "201", false, true),
        );
        paths.add_path_operation(
            "/api/village-details/admin",
            vec![HttpMethod::Get],
            operation("village-details", "List every village detail".into(), "200", false, true),
        );
        paths.add_path_operation(
            "/api/village-details/{id}",
            vec![HttpMethod::Put],
            operation("village-details", "Update village detail".into(), "200", true, true),
        );
        paths.add_path_operation(
            "/api/village-details/{id}",
            vec![HttpMethod::Delete],
            operation("village-details", "Delete village detail".into(), "200", true, true),
        );

        paths.add_path_operation(
            "/api/feedback",
            vec![HttpMethod::Post],
            operation("feedback", "Submit feedback".into(), "201", false, false),
        );
        paths.add_path_operation(
            "/api/feedback",
            vec![HttpMethod::Get],
            operation("feedback", "List feedback".into(), "200", false, true),
        );
        paths.add_path_operation(
            "/api/feedback/{id}",
            vec![HttpMethod::Get],
            operation("feedback", "Get feedback".into(), "200", true, true),
        );
        paths.add_path_operation(
            "/api/feedback/{id}",
            vec![HttpMethod::Delete],
            operation("feedback", "Delete feedback".into(), "200", true, true),
        );
        paths.add_path_operation(
            "/api/feedback/{id}/status",
            vec![HttpMethod::Put],
            operation("feedback", "Set feedback status".into(), "200", true, true),
        );

        paths.add_path_operation(
            "/api/nagrik-seva/apply",
            vec![HttpMethod::Post],
            operation("nagrik-seva", "Submit application".into(), "201", false, false),
        );
        paths.add_path_operation(
            "/api/nagrik-seva/applications",
            vec![HttpMethod::Get],
            operation("nagrik-seva", "List applications".into(), "200", false, true),
        );
        paths.add_path_operation(
            "/api/nagrik-seva/applications/{id}",
            vec![HttpMethod::Get],
            operation("nagrik-seva", "Get application".into(), "200", true, true),
        );
        paths.add_path_operation(
            "/api/nagrik-seva/applications/{id}",
            vec![HttpMethod::Delete],
            operation("nagrik-seva", "Delete application".into(), "200", true, true),
        );
        paths.add_path_operation(
            "/api/nagrik-seva/applications/{id}/status",
            vec![HttpMethod::Patch],
            operation("nagrik-seva", "Set application status".into(), "200", true, true),
        );
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
