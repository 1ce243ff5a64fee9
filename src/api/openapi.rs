//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    attestations, auth, departments, health, history, installations, requests, rooms, software,
    users,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CampusSoft API",
        version = "1.0.0",
        description = "University software installation request management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::me,
        // Departments
        departments::list,
        departments::get,
        departments::create,
        departments::update,
        departments::delete,
        // Rooms
        rooms::list,
        rooms::get,
        rooms::create,
        rooms::update,
        rooms::delete,
        rooms::installed_software,
        // Software
        software::list,
        software::get,
        software::create,
        software::update,
        software::deactivate,
        // Users
        users::list,
        users::get,
        users::create,
        users::create_teacher,
        users::create_it_service_member,
        users::create_administrator,
        users::update,
        users::deactivate,
        // Requests
        requests::list,
        requests::list_open,
        requests::get,
        requests::create,
        requests::update,
        requests::close,
        requests::mark_in_progress,
        requests::installation_summary,
        requests::resync,
        requests::check_consistency,
        // Installations
        installations::list_items,
        installations::get_item,
        installations::update_room_installation,
        installations::mark_all_installed,
        installations::update_item_installation,
        // Attestations
        attestations::list,
        attestations::get,
        attestations::get_by_request,
        attestations::create,
        attestations::confirm,
        attestations::expire,
        attestations::expire_due,
        attestations::list_due_for_reminder,
        attestations::mark_reminder_sent,
        attestations::run_campaign,
        // History
        history::list,
        history::list_by_request,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::MeResponse,
            // Departments
            crate::models::department::Department,
            crate::models::department::CreateDepartment,
            crate::models::department::UpdateDepartment,
            // Rooms
            crate::models::room::Room,
            crate::models::room::RoomDetails,
            crate::models::room::RoomShort,
            crate::models::room::CreateRoom,
            crate::models::room::UpdateRoom,
            // Software
            crate::models::software::Software,
            crate::models::software::CreateSoftware,
            crate::models::software::UpdateSoftware,
            // Users
            crate::models::user::User,
            crate::models::user::Teacher,
            crate::models::user::CreateUser,
            crate::models::user::CreateTeacher,
            crate::models::user::UpdateUser,
            users::TeacherResponse,
            // Requests
            crate::models::request::Request,
            crate::models::request::RequestDetails,
            crate::models::request::RequestItem,
            crate::models::request::RequestItemDetails,
            crate::models::request::RoomInstallation,
            crate::models::request::RoomInstallationDetails,
            crate::models::request::InstallationSummary,
            crate::models::request::ConsistencyReport,
            crate::models::request::ItemConsistency,
            crate::models::request::CreateRequest,
            crate::models::request::CreateRequestItem,
            crate::models::request::UpdateRequest,
            crate::models::request::CloseRequest,
            crate::models::request::UpdateRoomInstallation,
            crate::models::request::MarkAllInstalled,
            crate::models::request::UpdateItemInstallation,
            // Attestations
            crate::models::attestation::Attestation,
            crate::models::attestation::CreateAttestation,
            crate::models::attestation::ConfirmAttestation,
            crate::models::attestation::BulkAttestationResult,
            attestations::CampaignRequest,
            // History
            crate::models::history::HistoryEntry,
            // Enums
            crate::models::enums::RequestStatus,
            crate::models::enums::InstallationStatus,
            crate::models::enums::StatusPin,
            crate::models::enums::AttestationStatus,
            crate::models::enums::RoomType,
            crate::models::enums::UserRole,
            crate::models::enums::HistoryAction,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "departments", description = "Department management"),
        (name = "rooms", description = "Room management"),
        (name = "software", description = "Software catalog"),
        (name = "users", description = "User management"),
        (name = "requests", description = "Installation requests"),
        (name = "installations", description = "Installation tracking"),
        (name = "attestations", description = "Annual re-attestations"),
        (name = "history", description = "Audit trail")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
