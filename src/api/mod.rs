pub mod error;
pub mod planner;
pub mod routes;
pub mod timetable;

use axum::Router;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::planner::PlannerClient;
use crate::timetable::{RouteDirectory, TimetableHandle};

#[derive(Clone)]
pub struct AppState {
    pub timetable: TimetableHandle,
    pub routes: Arc<RouteDirectory>,
    pub planner: PlannerClient,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ferry Planner API",
        description = "Departure search, daily schedule and admin timetable for the ferry operator"
    ),
    tags(
        (name = "timetable", description = "Admin timetable editing and listing"),
        (name = "routes", description = "Route directory"),
        (name = "planner", description = "Rider-facing search and daily schedule")
    )
)]
pub struct ApiDoc;

/// Build the API router and its OpenAPI document
pub fn router(state: AppState) -> (Router, utoipa::openapi::OpenApi) {
    OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(timetable::router())
        .merge(routes::router())
        .merge(planner::router())
        .with_state(state)
        .split_for_parts()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::models::{DepartureRecord, DepartureType, RouteEntry, Weekday};
    use crate::timetable::TimetableStore;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tokio::sync::RwLock;
    use tower::ServiceExt;

    fn state() -> AppState {
        let store = TimetableStore::from_records(vec![
            DepartureRecord {
                id: 1,
                route_id: 5,
                weekday: Weekday::Monday,
                time: "08:00:00".parse().unwrap(),
                departure_type: DepartureType::Regular,
            },
            DepartureRecord {
                id: 2,
                route_id: 5,
                weekday: Weekday::Monday,
                time: "07:00:00".parse().unwrap(),
                departure_type: DepartureType::Cancelled,
            },
        ])
        .unwrap();

        let planner = PlannerClient::new(&PlannerConfig {
            // Nothing listens on the discard port
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            max_retries: 1,
        })
        .unwrap();

        AppState {
            timetable: Arc::new(RwLock::new(store)),
            routes: Arc::new(RouteDirectory::new(vec![RouteEntry {
                id: 5,
                num: 3,
                from: "Stavanger".to_string(),
                to: "Tau".to_string(),
            }])),
            planner,
        }
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn listing_excludes_cancelled_departures() {
        let (app, _) = router(state());
        let (status, body) = send(
            app,
            Method::GET,
            "/api/timetable?routeId=5&minTime=00:00&weekdays=MONDAY",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Rute 3: Stavanger → Tau");
        let rows = body["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], 1);
        assert_eq!(rows[0]["time"], "08:00");
    }

    #[tokio::test]
    async fn listing_rejects_bad_filters() {
        let (app, _) = router(state());
        let (status, _) = send(app.clone(), Method::GET, "/api/timetable?routeId=5&weekdays=FUNDAY", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(app.clone(), Method::GET, "/api/timetable?routeId=5&minTime=noon", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(app, Method::GET, "/api/timetable?routeId=99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn duplicate_submission_conflicts() {
        let (app, _) = router(state());
        let input = json!({ "routeId": 5, "weekday": "MONDAY", "time": "08:00", "type": "REGULAR" });

        let (status, body) = send(app.clone(), Method::POST, "/api/timetable", Some(input)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Avgang finnes allerede");

        let omitted = json!({ "routeId": 5, "weekday": "MONDAY", "time": "08:00", "type": "OMITTED" });
        let (status, body) = send(app, Method::POST, "/api/timetable", Some(omitted)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["record"]["id"], 3);
        assert_eq!(body["record"]["time"], "08:00:00");
        assert_eq!(body["notification"]["message"], "Avgang lagret");
        assert_eq!(body["notification"]["severity"], "success");
    }

    #[tokio::test]
    async fn edit_flow_replaces_the_record() {
        let state = state();
        let (app, _) = router(state.clone());

        let (status, body) = send(app.clone(), Method::GET, "/api/timetable/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["weekday"], "MONDAY");

        let edited = json!({ "routeId": 5, "weekday": "MONDAY", "time": "09:30", "type": "EXTRA" });
        let (status, body) = send(app.clone(), Method::PUT, "/api/timetable/1", Some(edited)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["record"]["id"], 3);

        let store = state.timetable.read().await;
        assert!(store.find_by_id(1).is_none());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn deleting_is_idempotent() {
        let state = state();
        let (app, _) = router(state.clone());

        let (status, body) = send(app.clone(), Method::DELETE, "/api/timetable/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["removed"], true);
        assert_eq!(body["notification"]["message"], "Avgang slettet");

        let (status, body) = send(app.clone(), Method::DELETE, "/api/timetable/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["removed"], false);

        let (status, _) = send(app, Method::GET, "/api/timetable/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(state.timetable.read().await.len(), 1);
    }

    #[tokio::test]
    async fn routes_are_listed() {
        let (app, _) = router(state());
        let (status, body) = send(app.clone(), Method::GET, "/api/routes", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["routes"][0]["num"], 3);

        let (status, _) = send(app, Method::GET, "/api/routes/6", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unreachable_planner_is_a_bad_gateway() {
        let (app, _) = router(state());
        let (status, body) = send(app, Method::GET, "/api/planner/stops", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], error::PLANNER_UNAVAILABLE);
    }

    #[test]
    fn openapi_documents_every_path() {
        let (_, api) = router(state());
        for path in [
            "/api/timetable",
            "/api/timetable/{id}",
            "/api/routes",
            "/api/routes/{route_id}",
            "/api/planner/stops",
            "/api/planner/search",
            "/api/planner/full-schedule",
        ] {
            assert!(api.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
