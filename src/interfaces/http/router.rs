//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRef;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiResponse, EmptyData};
use super::dto::{BookingSummaryDto, EntityRefDto, ServiceLineDto};
use super::modules::health::{self, HealthState};
use super::modules::metrics::{self, MetricsState};
use super::modules::{events, payments, reservations, users, venues};
use crate::application::booking::CancellationPolicy;
use crate::application::{
    EventService, PaymentService, ReservationService, SharedEventBus, UserService, VenueService,
};
use crate::domain::RepositoryProvider;
use crate::shared::{BookingLocks, SharedClock};

/// Services shared by every API route. Handler states are carved out of it
/// through `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub venues: Arc<VenueService>,
    pub events: Arc<EventService>,
    pub users: Arc<UserService>,
    pub reservations: Arc<ReservationService>,
    pub payments: Arc<PaymentService>,
}

impl AppState {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        clock: SharedClock,
        locks: Arc<BookingLocks>,
        events: SharedEventBus,
        policy: CancellationPolicy,
    ) -> Self {
        Self {
            venues: Arc::new(VenueService::new(repos.clone(), locks.clone())),
            events: Arc::new(EventService::new(repos.clone(), locks.clone())),
            users: Arc::new(UserService::new(repos.clone(), locks.clone())),
            reservations: Arc::new(ReservationService::new(
                repos.clone(),
                clock,
                locks.clone(),
                events,
                policy,
            )),
            payments: Arc::new(PaymentService::new(repos, locks)),
        }
    }
}

impl FromRef<AppState> for venues::VenueHandlerState {
    fn from_ref(s: &AppState) -> Self {
        Self {
            venues: Arc::clone(&s.venues),
            reservations: Arc::clone(&s.reservations),
        }
    }
}

impl FromRef<AppState> for events::EventHandlerState {
    fn from_ref(s: &AppState) -> Self {
        Self {
            events: Arc::clone(&s.events),
        }
    }
}

impl FromRef<AppState> for users::UserHandlerState {
    fn from_ref(s: &AppState) -> Self {
        Self {
            users: Arc::clone(&s.users),
            reservations: Arc::clone(&s.reservations),
        }
    }
}

impl FromRef<AppState> for reservations::ReservationHandlerState {
    fn from_ref(s: &AppState) -> Self {
        Self {
            reservations: Arc::clone(&s.reservations),
            payments: Arc::clone(&s.payments),
        }
    }
}

impl FromRef<AppState> for payments::PaymentHandlerState {
    fn from_ref(s: &AppState) -> Self {
        Self {
            payments: Arc::clone(&s.payments),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Venues
        venues::register_venue,
        venues::list_venues,
        venues::get_venue,
        venues::update_venue,
        venues::delete_venue,
        venues::occupied_dates,
        venues::check_availability,
        venues::venue_reservations,
        // Events
        events::create_event,
        events::list_events,
        events::get_event,
        events::delete_event,
        // Users
        users::register_user,
        users::get_user,
        users::user_reservations,
        // Reservations
        reservations::create_reservation,
        reservations::get_reservation,
        reservations::cancel_reservation,
        reservations::complete_reservation,
        reservations::complete_elapsed,
        // Payments
        reservations::create_payment,
        reservations::get_payment,
        payments::complete_payment,
    ),
    components(
        schemas(
            ApiResponse<String>,
            EmptyData,
            EntityRefDto,
            ServiceLineDto,
            BookingSummaryDto,
            health::HealthResponse,
            health::ComponentHealth,
            venues::VenueRequest,
            venues::VenueDto,
            venues::DatesRequest,
            venues::AvailabilityResponse,
            venues::OccupiedDatesResponse,
            events::CreateEventRequest,
            events::EventDto,
            users::RegisterUserRequest,
            users::UserDto,
            reservations::CreateReservationRequest,
            reservations::ReservationDto,
            payments::PaymentDto,
            payments::PaymentLineDto,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and database reachability"),
        (name = "Venues", description = "Venue registration, soft-delete and date availability"),
        (name = "Events", description = "Occasions venues are booked for"),
        (name = "Users", description = "Users and their booking views"),
        (name = "Reservations", description = "Booking lifecycle: create, cancel, complete"),
        (name = "Payments", description = "One payment per reservation"),
    ),
    info(
        title = "Venue Booking API",
        version = "1.0.0",
        description = "Date-based venue reservations with availability checks and cancellation cascades",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

fn api_routes(state: AppState) -> Router {
    let venue_routes = Router::new()
        .route("/", get(venues::list_venues).post(venues::register_venue))
        .route(
            "/{id}",
            get(venues::get_venue)
                .put(venues::update_venue)
                .delete(venues::delete_venue),
        )
        .route("/{id}/occupied-dates", get(venues::occupied_dates))
        .route("/{id}/availability", post(venues::check_availability))
        .route("/{id}/reservations", get(venues::venue_reservations));

    let event_routes = Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route("/{id}", get(events::get_event).delete(events::delete_event));

    let user_routes = Router::new()
        .route("/", post(users::register_user))
        .route("/{id}", get(users::get_user))
        .route("/{id}/reservations", get(users::user_reservations));

    let reservation_routes = Router::new()
        .route("/", post(reservations::create_reservation))
        .route("/complete-elapsed", post(reservations::complete_elapsed))
        .route("/{id}", get(reservations::get_reservation))
        .route("/{id}/cancel", post(reservations::cancel_reservation))
        .route("/{id}/complete", post(reservations::complete_reservation))
        .route(
            "/{id}/payment",
            get(reservations::get_payment).post(reservations::create_payment),
        );

    let payment_routes = Router::new().route("/{id}/complete", post(payments::complete_payment));

    Router::new()
        .nest("/venues", venue_routes)
        .nest("/events", event_routes)
        .nest("/users", user_routes)
        .nest("/reservations", reservation_routes)
        .nest("/payments", payment_routes)
        .with_state(state)
}

/// Build the full HTTP surface: `/api/v1`, `/health`, `/metrics` and the
/// Swagger UI at `/docs`.
pub fn create_api_router(
    state: AppState,
    db: Option<DatabaseConnection>,
    prometheus: PrometheusHandle,
) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState {
            db,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(MetricsState { handle: prometheus });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/v1", api_routes(state))
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(middleware::from_fn(metrics::track_http_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::NaiveDate;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::application::create_event_bus;
    use crate::infrastructure::InMemoryStore;
    use crate::shared::FixedClock;

    const ADMIN: Option<(&str, &str)> = Some(("root", "ADMIN"));

    struct TestApi {
        router: Router,
        clock: Arc<FixedClock>,
    }

    impl TestApi {
        fn new(policy: CancellationPolicy) -> Self {
            let clock = Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()));
            let state = AppState::new(
                Arc::new(InMemoryStore::new()),
                clock.clone(),
                Arc::new(BookingLocks::new(std::time::Duration::from_millis(500))),
                create_event_bus(),
                policy,
            );
            let prometheus = PrometheusBuilder::new().build_recorder().handle();
            Self {
                router: create_api_router(state, None, prometheus),
                clock,
            }
        }

        async fn call(
            &self,
            method: &str,
            uri: &str,
            caller: Option<(&str, &str)>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut req = Request::builder().method(method).uri(uri);
            if let Some((id, role)) = caller {
                req = req.header("X-User-Id", id).header("X-User-Role", role);
            }
            let req = match body {
                Some(b) => req
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&b).unwrap())),
                None => req.body(Body::empty()),
            }
            .unwrap();

            let resp = self.router.clone().oneshot(req).await.unwrap();
            let status = resp.status();
            let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
                .await
                .unwrap();
            (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
        }

        async fn seed(&self) -> (String, String, String) {
            let (status, venue) = self
                .call(
                    "POST",
                    "/api/v1/venues",
                    ADMIN,
                    Some(json!({
                        "name": "Salon A", "city": "Lima", "capacity": 150,
                        "venue_type": "MEDIUM", "cost": "1000"
                    })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "{venue}");
            let (_, event) = self
                .call("POST", "/api/v1/events", ADMIN, Some(json!({"name": "Wedding"})))
                .await;
            let (_, user) = self
                .call(
                    "POST",
                    "/api/v1/users",
                    None,
                    Some(json!({"name": "Ana", "email": "ana@example.com"})),
                )
                .await;
            (
                venue["data"]["id"].as_str().unwrap().to_string(),
                event["data"]["id"].as_str().unwrap().to_string(),
                user["data"]["id"].as_str().unwrap().to_string(),
            )
        }

        async fn book(&self, venue: &str, event: &str, user: &str, dates: Value) -> (StatusCode, Value) {
            self.call(
                "POST",
                "/api/v1/reservations",
                Some((user, "CLIENT")),
                Some(json!({
                    "venue_id": venue, "event_id": event,
                    "dates": dates, "guest_count": 80
                })),
            )
            .await
        }
    }

    #[tokio::test]
    async fn booking_flow_over_http() {
        let api = TestApi::new(CancellationPolicy::Void);
        let (venue, event, user) = api.seed().await;

        let (status, created) = api
            .book(&venue, &event, &user, json!(["2025-12-11", "2025-12-10"]))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{created}");
        assert_eq!(created["data"]["status"], "PROGRAMADA");
        assert_eq!(created["data"]["dates"], json!(["2025-12-10", "2025-12-11"]));
        assert_eq!(created["data"]["total_cost"], "2000");
        let reservation = created["data"]["id"].as_str().unwrap().to_string();

        let (status, occupied) = api
            .call("GET", &format!("/api/v1/venues/{venue}/occupied-dates"), None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(occupied["data"]["dates"], json!(["2025-12-10", "2025-12-11"]));

        let (status, clash) = api.book(&venue, &event, &user, json!(["2025-12-11"])).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(clash["error"].as_str().unwrap().contains("2025-12-11"));

        let (status, available) = api
            .call(
                "POST",
                &format!("/api/v1/venues/{venue}/availability"),
                None,
                Some(json!({"dates": ["2025-12-11", "2025-12-12"]})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(available["data"]["available"], false);

        let (status, payment) = api
            .call(
                "POST",
                &format!("/api/v1/reservations/{reservation}/payment"),
                Some((&user, "CLIENT")),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(payment["data"]["status"], "PENDIENTE");

        let (status, cancelled) = api
            .call(
                "POST",
                &format!("/api/v1/reservations/{reservation}/cancel"),
                Some((&user, "CLIENT")),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cancelled["data"]["status"], "CANCELADA");

        let (_, payment) = api
            .call(
                "GET",
                &format!("/api/v1/reservations/{reservation}/payment"),
                Some((&user, "CLIENT")),
                None,
            )
            .await;
        assert_eq!(payment["data"]["status"], "CANCELADO");

        let (status, again) = api
            .call(
                "POST",
                &format!("/api/v1/reservations/{reservation}/cancel"),
                Some((&user, "CLIENT")),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(again["success"], false);

        let (_, user_view) = api
            .call("GET", &format!("/api/v1/users/{user}"), Some((&user, "CLIENT")), None)
            .await;
        assert_eq!(user_view["data"]["bookings"][0]["status"], "CANCELADA");
    }

    #[tokio::test]
    async fn reservations_require_a_caller() {
        let api = TestApi::new(CancellationPolicy::Void);
        let (status, body) = api
            .call(
                "POST",
                "/api/v1/reservations",
                None,
                Some(json!({"venue_id": "v", "event_id": "e", "dates": ["2025-12-10"], "guest_count": 1})),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn other_clients_are_forbidden() {
        let api = TestApi::new(CancellationPolicy::Void);
        let (venue, event, user) = api.seed().await;
        let (_, created) = api.book(&venue, &event, &user, json!(["2025-12-10"])).await;
        let reservation = created["data"]["id"].as_str().unwrap();

        let (status, _) = api
            .call(
                "POST",
                &format!("/api/v1/reservations/{reservation}/cancel"),
                Some(("someone-else", "CLIENT")),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = api
            .call(
                "GET",
                &format!("/api/v1/reservations/{reservation}"),
                Some(("root", "ADMIN")),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn capacity_and_date_errors_are_422() {
        let api = TestApi::new(CancellationPolicy::Void);
        let (status, body) = api
            .call(
                "POST",
                "/api/v1/venues",
                ADMIN,
                Some(json!({"name": "Tiny", "capacity": 51, "venue_type": "SMALL", "cost": 100})),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("between 1 and 50"));

        let (venue, event, user) = api.seed().await;
        let (status, _) = api.book(&venue, &event, &user, json!(["2025-12-01"])).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let (status, _) = api.book(&venue, &event, &user, json!([])).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn venue_delete_is_blocked_by_scheduled_bookings() {
        let api = TestApi::new(CancellationPolicy::Void);
        let (venue, event, user) = api.seed().await;
        let (_, created) = api.book(&venue, &event, &user, json!(["2025-12-10"])).await;
        let reservation = created["data"]["id"].as_str().unwrap().to_string();

        let uri = format!("/api/v1/venues/{venue}");
        let (status, _) = api.call("DELETE", &uri, ADMIN, None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        api.clock.set(NaiveDate::from_ymd_opt(2025, 12, 11).unwrap());
        let (status, swept) = api
            .call(
                "POST",
                "/api/v1/reservations/complete-elapsed",
                ADMIN,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(swept["data"][0]["id"], reservation.as_str());

        let (status, _) = api.call("DELETE", &uri, ADMIN, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = api.call("GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn sweep_is_admin_only() {
        let api = TestApi::new(CancellationPolicy::Void);
        let (status, _) = api
            .call(
                "POST",
                "/api/v1/reservations/complete-elapsed",
                Some(("u1", "CLIENT")),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn catalogue_and_billing_mutations_need_a_caller() {
        let api = TestApi::new(CancellationPolicy::Void);
        let (venue, event, user) = api.seed().await;
        let (_, created) = api.book(&venue, &event, &user, json!(["2025-12-10"])).await;
        let reservation = created["data"]["id"].as_str().unwrap().to_string();
        let (_, payment) = api
            .call(
                "POST",
                &format!("/api/v1/reservations/{reservation}/payment"),
                Some((&user, "CLIENT")),
                None,
            )
            .await;
        let payment = payment["data"]["id"].as_str().unwrap().to_string();

        let venue_body = json!({"name": "Salon B", "capacity": 20, "venue_type": "SMALL", "cost": 50});
        let requests = [
            ("POST", "/api/v1/venues".to_string(), Some(venue_body.clone())),
            ("PUT", format!("/api/v1/venues/{venue}"), Some(venue_body)),
            ("DELETE", format!("/api/v1/venues/{venue}"), None),
            ("GET", format!("/api/v1/venues/{venue}/reservations"), None),
            ("POST", "/api/v1/events".to_string(), Some(json!({"name": "Gala"}))),
            ("DELETE", format!("/api/v1/events/{event}"), None),
            ("POST", format!("/api/v1/payments/{payment}/complete"), None),
        ];
        for (method, uri, body) in &requests {
            let (status, _) = api.call(method, uri, None, body.clone()).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
            let (status, _) = api
                .call(method, uri, Some(("someone-else", "CLIENT")), body.clone())
                .await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
        }

        let (_, listed) = api
            .call("GET", &format!("/api/v1/venues/{venue}/reservations"), ADMIN, None)
            .await;
        assert_eq!(listed["data"][0]["id"], reservation.as_str());

        let (status, settled) = api
            .call(
                "POST",
                &format!("/api/v1/payments/{payment}/complete"),
                Some((&user, "CLIENT")),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(settled["data"]["status"], "COMPLETADO");
    }

    #[tokio::test]
    async fn health_reports_missing_database() {
        let api = TestApi::new(CancellationPolicy::Void);
        let (status, body) = api.call("GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"]["status"], "not_configured");
    }

    #[test]
    fn openapi_lists_booking_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/reservations/{id}/cancel"));
        assert!(doc.paths.paths.contains_key("/api/v1/venues/{id}/occupied-dates"));
    }
}
