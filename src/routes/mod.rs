pub mod auth;
pub mod inventory;
pub mod prescriptions;
pub mod feedback;
pub mod admin;
pub mod reception;
pub mod pharmacist;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        // Inventory
        .route("/api/inventory/search", get(inventory::search))
        .route("/api/inventory/all-medicines", get(inventory::all_medicines))
        .route("/api/inventory/medicines", get(inventory::available_medicines))
        .route("/api/inventory/add-medicine", post(inventory::add_medicine))
        .route("/api/inventory/my-inventory", get(inventory::my_inventory))
        .route("/api/inventory/update", post(inventory::update_stock))
        // Prescriptions
        .route("/api/prescriptions/issue", post(prescriptions::issue))
        .route(
            "/api/prescriptions/my-prescriptions/{email}",
            get(prescriptions::my_prescriptions),
        )
        .route(
            "/api/prescriptions/patient/{email}",
            get(prescriptions::patient_lookup),
        )
        .route("/api/prescriptions/{id}/fulfill", put(prescriptions::fulfill))
        .route("/api/prescriptions/{id}", delete(prescriptions::delete))
        // Feedback
        .route("/api/feedback/submit", post(feedback::submit))
        .route("/api/feedback/{pharmacy_id}", get(feedback::list_for_pharmacy))
        // Admin
        .route("/api/admin/pharmacies", get(admin::list_pharmacies))
        .route(
            "/api/admin/pharmacies/{id}/verify",
            put(admin::verify_pharmacy),
        )
        .route(
            "/api/admin/pharmacies/{id}/status",
            put(admin::update_pharmacy_status),
        )
        .route("/api/admin/pharmacies/{id}", delete(admin::delete_pharmacy))
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/search", get(admin::search_users))
        .route("/api/admin/users/{id}/status", put(admin::update_user_status))
        .route("/api/admin/users/{id}", delete(admin::delete_user))
        .route("/api/admin/doctors/{id}/verify", put(admin::verify_doctor))
        .route("/api/admin/feedback", get(admin::pending_feedback))
        .route("/api/admin/feedback/{id}", put(admin::moderate_feedback))
        .route("/api/admin/audit", get(admin::audit_log))
        // Reception
        .route(
            "/api/reception/recent-prescriptions",
            get(reception::recent_prescriptions),
        )
        .route(
            "/api/reception/patient-records/{email}",
            get(reception::patient_records),
        )
        // Pharmacist
        .route("/api/pharmacist/feedback", get(pharmacist::feedback))
}
