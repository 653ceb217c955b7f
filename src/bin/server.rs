//! Partecipa RSVP Server
//!
//! A small HTTP server exposing the RSVP submission and review
//! surface: guests submit a family reservation, the couple reviews
//! the merged guest list, deletes single guests, and reads the
//! summary statistics.
//!
//! # Configuration
//!
//! Environment variables:
//! - `PARTECIPA_PORT`: Port to listen on (default: 8080)
//! - `PARTECIPA_DATABASE_PATH`: SQLite database path
//!   (default: ~/.partecipa/partecipa.db)
//!
//! # Endpoints
//!
//! - `GET /health`: Health check endpoint
//! - `GET /guests?search=TERM`: Merged guest list, newest first
//! - `GET /stats`: Summary statistics over the merged list
//! - `POST /rsvps`: Register a new family reservation
//! - `DELETE /guests/{id}`: Remove one guest

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use partecipa::admin::{self, GuestStats, LockRegistry, RemovalOutcome};
use partecipa::db::{init_db, RsvpRepository};
use partecipa::error::RsvpError;
use partecipa::models::{
    CategoryCounts, Condition, CustomBucket, DietaryDraft, GuestCategory, GuestView, Roster,
    SubmissionRecord,
};

// ============================================================================
// Configuration
// ============================================================================

/// Server configuration
#[derive(Debug, Clone)]
struct Config {
    /// Port to listen on
    port: u16,
    /// SQLite database path
    database_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let port = std::env::var("PARTECIPA_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let database_path = std::env::var("PARTECIPA_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".partecipa").join("partecipa.db")
            });

        Self {
            port,
            database_path,
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    repo: Arc<RsvpRepository>,
    locks: Arc<LockRegistry>,
}

// ============================================================================
// Request / response types
// ============================================================================

/// One guest in a submission request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitGuest {
    name: String,
    #[serde(rename = "type")]
    category: GuestCategory,
    #[serde(default)]
    conditions: Vec<Condition>,
    #[serde(default)]
    custom_intolerances: Vec<String>,
    #[serde(default)]
    custom_allergies: Vec<String>,
}

/// A full submission request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest {
    main_guest: String,
    counts: CategoryCounts,
    #[serde(default)]
    notes: String,
    guests: Vec<SubmitGuest>,
}

#[derive(Serialize)]
struct SubmitResponse {
    id: String,
    total_people: usize,
}

#[derive(Deserialize)]
struct ListParams {
    search: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(err: RsvpError) -> Response {
    let status = match &err {
        RsvpError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        // Index races surface exactly like a vanished record.
        RsvpError::NotFound(_) | RsvpError::IndexOutOfRange { .. } => StatusCode::NOT_FOUND,
        RsvpError::Busy(_) => StatusCode::CONFLICT,
        RsvpError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("store failure: {}", err);
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Merged guest list, optionally filtered by name
async fn list_guests(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    match admin::fetch_views(&state.repo).await {
        Ok(views) => {
            let views: Vec<GuestView> = match params.search.as_deref() {
                Some(term) => {
                    let term = term.to_lowercase();
                    views
                        .into_iter()
                        .filter(|v| {
                            v.first_name.to_lowercase().contains(&term)
                                || v.last_name.to_lowercase().contains(&term)
                        })
                        .collect()
                }
                None => views,
            };
            Json(views).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Summary statistics over the merged guest list
async fn stats(State(state): State<AppState>) -> Response {
    match admin::fetch_views(&state.repo).await {
        Ok(views) => Json(GuestStats::aggregate(&views)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Register a new family reservation
async fn submit(State(state): State<AppState>, Json(request): Json<SubmitRequest>) -> Response {
    let record = match build_submission(request) {
        Ok(record) => record,
        Err(e) => return error_response(e),
    };

    match state.repo.insert_family(&record).await {
        Ok(id) => {
            tracing::info!(
                "registered RSVP {} for {} ({} guest(s))",
                id,
                record.main_guest,
                record.total_people
            );
            (
                StatusCode::CREATED,
                Json(SubmitResponse {
                    id,
                    total_people: record.total_people,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(RsvpError::Store(e)),
    }
}

/// Remove one guest by view id
async fn remove_guest(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match admin::remove_view(&state.repo, &state.locks, &id).await {
        Ok(outcome) => {
            match outcome {
                RemovalOutcome::RecordDeleted => {
                    tracing::info!("removed {} and its emptied reservation", id)
                }
                _ => tracing::info!("removed {}", id),
            }
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Turn a submission request into the storage record.
///
/// The request's guests must agree with the declared counts; they are
/// laid out on a reconciled roster (stable-sorted into fixed category
/// order) so the stored record has the same shape as one produced by
/// form entry, main-guest name sync included.
fn build_submission(request: SubmitRequest) -> Result<SubmissionRecord, RsvpError> {
    let counts = request.counts;

    let mut roster = Roster::default();
    roster.reconcile(&counts);

    if request.guests.len() != roster.len() {
        return Err(RsvpError::Validation(format!(
            "counts declare {} guest(s) but {} were provided",
            roster.len(),
            request.guests.len()
        )));
    }

    // Stable sort into fixed category order; within a category the
    // request order is preserved.
    let mut guests = request.guests;
    guests.sort_by_key(|g| category_rank(g.category));

    for (index, guest) in guests.iter().enumerate() {
        let slot = &roster.slots()[index];
        if slot.category != guest.category {
            return Err(RsvpError::Validation(
                "guest list does not match the declared counts".to_string(),
            ));
        }
        roster.slots_mut()[index].name = guest.name.trim().to_string();

        let mut draft = DietaryDraft::open(&roster.slots()[index]);
        for condition in &guest.conditions {
            draft.toggle(*condition);
        }
        for text in &guest.custom_intolerances {
            draft.add_custom(CustomBucket::Intolerance, text);
        }
        for text in &guest.custom_allergies {
            draft.add_custom(CustomBucket::Allergy, text);
        }
        draft.commit(&mut roster.slots_mut()[index]);
    }

    roster.set_main_guest_name(request.main_guest.trim());

    SubmissionRecord::encode(&roster, &counts, &request.notes, request.main_guest.trim())
}

fn category_rank(category: GuestCategory) -> usize {
    GuestCategory::ALL
        .iter()
        .position(|c| *c == category)
        .unwrap_or(GuestCategory::ALL.len())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "partecipa_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();

    tracing::info!("Database: {}", config.database_path.display());

    let pool = match init_db(config.database_path.clone()).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    // Build app state
    let state = AppState {
        repo: Arc::new(RsvpRepository::new(pool)),
        locks: Arc::new(LockRegistry::new()),
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/guests", get(list_guests))
        .route("/guests/{id}", delete(remove_guest))
        .route("/stats", get(stats))
        .route("/rsvps", post(submit))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
