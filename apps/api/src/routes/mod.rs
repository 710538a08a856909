pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::eligibility::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/eligibility/score", post(handlers::handle_score))
        .route("/api/v1/eligibility/batch", post(handlers::handle_batch))
        .route(
            "/api/v1/eligibility/top-candidates",
            post(handlers::handle_top_candidates),
        )
        .route("/api/v1/eligibility/override", patch(handlers::handle_override))
        .route(
            "/api/v1/eligibility/jobs/:job_id/top-candidates",
            get(handlers::handle_stored_top_candidates),
        )
        .route(
            "/api/v1/eligibility/jobs/:job_id/distribution",
            get(handlers::handle_stored_distribution),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::config::Config;
    use crate::eligibility::cache::{InMemoryScoreCache, ScoreCache};
    use crate::eligibility::engine::EligibilityEngine;
    use crate::eligibility::skills::SkillMatchMode;

    fn test_state() -> AppState {
        test_state_with_cache().0
    }

    fn test_state_with_cache() -> (AppState, Arc<InMemoryScoreCache>) {
        let cache = Arc::new(InMemoryScoreCache::new(chrono::Duration::days(7)));
        let state = AppState {
            config: Config {
                port: 0,
                rust_log: "debug".to_string(),
                redis_url: None,
                score_cache_ttl_hours: 24,
                score_retention_hours: 168,
                top_candidates_limit: 20,
                skill_match_mode: SkillMatchMode::Substring,
            },
            engine: Arc::new(EligibilityEngine::default()),
            score_cache: cache.clone(),
        };
        (state, cache)
    }

    fn job_json() -> Value {
        json!({
            "mandatory_skills": ["JavaScript", "React", "Node.js"],
            "preferred_skills": [],
            "min_cgpa": 7.5,
            "eligible_branches": ["Computer Science"],
            "min_experience_months": 0
        })
    }

    fn candidate_json(cgpa: f64, branch: &str, skills: &[&str]) -> Value {
        json!({
            "technical_skills": skills,
            "cgpa": cgpa,
            "branch": branch,
            "work_history": [],
            "projects": [{"title": "Portfolio"}]
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn send_json(app: Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        send_json(app, "POST", uri, body).await
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    fn score_body(candidate_id: Uuid, job_id: Uuid, candidate: Value) -> Value {
        json!({
            "candidate_id": candidate_id,
            "job_id": job_id,
            "candidate": candidate,
            "job": job_json()
        })
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state());
        let (status, body) = get_json(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["scoring"]["weights"]["skill_match"], json!(0.4));
        assert_eq!(body["scoring"]["weights"]["experience"], json!(0.1));
        assert_eq!(body["scoring"]["skill_match_mode"], "substring");
    }

    #[tokio::test]
    async fn test_score_then_served_from_cache() {
        let app = build_router(test_state());
        let body = json!({
            "candidate_id": Uuid::new_v4(),
            "job_id": Uuid::new_v4(),
            "candidate": candidate_json(8.5, "Computer Science", &["JavaScript", "React", "Node.js"]),
            "job": job_json()
        });

        let (status, first) = post_json(app.clone(), "/api/v1/eligibility/score", body.clone()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["cached"], false);
        assert_eq!(first["score"]["overall_score"], 91);
        assert_eq!(first["score"]["eligibility_status"], "Eligible");

        let (_, second) = post_json(app.clone(), "/api/v1/eligibility/score", body.clone()).await;
        assert_eq!(second["cached"], true);
        assert_eq!(second["calculated_at"], first["calculated_at"]);

        let mut refresh = body;
        refresh["refresh"] = json!(true);
        let (_, third) = post_json(app, "/api/v1/eligibility/score", refresh).await;
        assert_eq!(third["cached"], false);
    }

    #[tokio::test]
    async fn test_score_merges_resume_skills() {
        let app = build_router(test_state());
        let body = json!({
            "candidate_id": Uuid::new_v4(),
            "job_id": Uuid::new_v4(),
            "candidate": candidate_json(8.5, "Computer Science", &["JavaScript"]),
            "job": job_json(),
            "resume_skills": ["React", "Node.js"]
        });
        let (status, response) = post_json(app, "/api/v1/eligibility/score", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            response["score"]["breakdown"]["skill_match"]["score"],
            json!(100.0)
        );
    }

    #[tokio::test]
    async fn test_score_rejects_out_of_range_cgpa() {
        let app = build_router(test_state());
        let body = json!({
            "candidate_id": Uuid::new_v4(),
            "job_id": Uuid::new_v4(),
            "candidate": candidate_json(10.5, "Computer Science", &[]),
            "job": job_json()
        });
        let (status, response) = post_json(app, "/api/v1/eligibility/score", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
        assert!(response["error"]["message"]
            .as_str()
            .unwrap()
            .contains("candidate.cgpa"));
    }

    #[tokio::test]
    async fn test_batch_ranks_and_summarizes() {
        let app = build_router(test_state());
        let strong = Uuid::new_v4();
        let body = json!({
            "job_id": Uuid::new_v4(),
            "job": job_json(),
            "candidates": [
                {"candidate_id": Uuid::new_v4(), "candidate": candidate_json(6.0, "Civil", &[])},
                {"candidate_id": strong, "candidate": candidate_json(9.0, "Computer Science", &["JavaScript", "React", "Node.js"])},
                {"candidate_id": Uuid::new_v4(), "candidate": candidate_json(-2.0, "Computer Science", &[])}
            ]
        });

        let (status, response) = post_json(app, "/api/v1/eligibility/batch", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["results"].as_array().unwrap().len(), 2);
        assert_eq!(response["results"][0]["candidate_id"], json!(strong));
        assert_eq!(response["summary"]["total"], 3);
        assert_eq!(response["summary"]["eligible"], 1);
        assert_eq!(response["summary"]["not_eligible"], 1);
        assert_eq!(response["summary"]["rejected"], 1);
        assert_eq!(response["rejected"][0]["field"], "candidate.cgpa");
        assert_eq!(response["distribution"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_batch_rejects_invalid_job() {
        let app = build_router(test_state());
        let mut job = job_json();
        job["min_experience_months"] = json!(-1);
        let body = json!({"job_id": Uuid::new_v4(), "job": job, "candidates": []});
        let (status, _) = post_json(app, "/api/v1/eligibility/batch", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_top_candidates_limit() {
        let app = build_router(test_state());
        let candidates: Vec<Value> = [9.8, 9.0, 8.0]
            .iter()
            .map(|cgpa| {
                json!({
                    "candidate_id": Uuid::new_v4(),
                    "candidate": candidate_json(*cgpa, "Computer Science", &["JavaScript", "React", "Node.js"])
                })
            })
            .chain(std::iter::once(json!({
                "candidate_id": Uuid::new_v4(),
                "candidate": candidate_json(9.9, "Mechanical", &[])
            })))
            .collect();
        let body = json!({"job_id": Uuid::new_v4(), "job": job_json(), "candidates": candidates});

        let (status, response) = post_json(
            app.clone(),
            "/api/v1/eligibility/top-candidates?limit=2",
            body.clone(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["limit"], 2);
        let top = response["candidates"].as_array().unwrap();
        assert_eq!(top.len(), 2);
        assert!(top[0]["score"]["overall_score"].as_u64() >= top[1]["score"]["overall_score"].as_u64());

        let (status, _) =
            post_json(app, "/api/v1/eligibility/top-candidates?limit=0", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stale_score_is_recalculated_and_counted() {
        let (state, cache) = test_state_with_cache();
        let app = build_router(state);
        let (candidate_id, job_id) = (Uuid::new_v4(), Uuid::new_v4());
        let body = score_body(
            candidate_id,
            job_id,
            candidate_json(8.5, "Computer Science", &["JavaScript", "React", "Node.js"]),
        );

        let (_, first) = post_json(app.clone(), "/api/v1/eligibility/score", body.clone()).await;
        assert_eq!(first["recalculation_count"], 0);
        assert!(first["last_recalculated_at"].is_null());

        let mut stale = cache.get(candidate_id, job_id).await.unwrap().unwrap();
        stale.calculated_at = chrono::Utc::now() - chrono::Duration::hours(30);
        cache.put(candidate_id, job_id, &stale).await.unwrap();

        let (_, second) = post_json(app.clone(), "/api/v1/eligibility/score", body.clone()).await;
        assert_eq!(second["cached"], false);
        assert_eq!(second["recalculation_count"], 1);
        assert_eq!(second["last_recalculated_at"], second["calculated_at"]);

        let (_, third) = post_json(app, "/api/v1/eligibility/score", body).await;
        assert_eq!(third["cached"], true);
        assert_eq!(third["recalculation_count"], 1);
    }

    #[tokio::test]
    async fn test_override_sets_effective_score() {
        let app = build_router(test_state());
        let (candidate_id, job_id) = (Uuid::new_v4(), Uuid::new_v4());
        let body = score_body(candidate_id, job_id, candidate_json(6.0, "Civil", &[]));
        let (_, scored) = post_json(app.clone(), "/api/v1/eligibility/score", body.clone()).await;
        assert_eq!(scored["effective_score"], scored["score"]["overall_score"]);
        assert!(scored["override"].is_null());

        let (status, overridden) = send_json(
            app.clone(),
            "PATCH",
            "/api/v1/eligibility/override",
            json!({
                "candidate_id": candidate_id,
                "job_id": job_id,
                "overridden_score": 85,
                "reason": "Cleared the technical interview"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(overridden["effective_score"], 85);
        assert_eq!(overridden["score"]["overall_score"], scored["score"]["overall_score"]);
        assert_eq!(overridden["override"]["reason"], "Cleared the technical interview");

        let mut refresh = body;
        refresh["refresh"] = json!(true);
        let (_, recalculated) = post_json(app, "/api/v1/eligibility/score", refresh).await;
        assert_eq!(recalculated["effective_score"], 85);
        assert_eq!(recalculated["recalculation_count"], 1);
    }

    #[tokio::test]
    async fn test_override_rejects_out_of_range_and_unknown_pairs() {
        let app = build_router(test_state());
        let (candidate_id, job_id) = (Uuid::new_v4(), Uuid::new_v4());

        for score in [-1, 101] {
            let (status, response) = send_json(
                app.clone(),
                "PATCH",
                "/api/v1/eligibility/override",
                json!({"candidate_id": candidate_id, "job_id": job_id, "overridden_score": score}),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
        }

        let (status, response) = send_json(
            app,
            "PATCH",
            "/api/v1/eligibility/override",
            json!({"candidate_id": candidate_id, "job_id": job_id, "overridden_score": 100}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(response["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_stored_views_read_batch_results() {
        let app = build_router(test_state());
        let job_id = Uuid::new_v4();
        let (strong, weak) = (Uuid::new_v4(), Uuid::new_v4());
        let body = json!({
            "job_id": job_id,
            "job": job_json(),
            "candidates": [
                {"candidate_id": strong, "candidate": candidate_json(9.0, "Computer Science", &["JavaScript", "React", "Node.js"])},
                {"candidate_id": weak, "candidate": candidate_json(8.0, "Computer Science", &["JavaScript"])},
                {"candidate_id": Uuid::new_v4(), "candidate": candidate_json(6.0, "Civil", &[])}
            ]
        });
        let (status, _) = post_json(app.clone(), "/api/v1/eligibility/batch", body).await;
        assert_eq!(status, StatusCode::OK);

        let uri = format!("/api/v1/eligibility/jobs/{job_id}/top-candidates?limit=5");
        let (status, top) = get_json(app.clone(), &uri).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<Value> = top["candidates"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["candidate_id"].clone())
            .collect();
        assert_eq!(ids, vec![json!(strong), json!(weak)]);

        send_json(
            app.clone(),
            "PATCH",
            "/api/v1/eligibility/override",
            json!({"candidate_id": weak, "job_id": job_id, "overridden_score": 99}),
        )
        .await;
        let (_, top) = get_json(app.clone(), &uri).await;
        assert_eq!(top["candidates"][0]["candidate_id"], json!(weak));

        let uri = format!("/api/v1/eligibility/jobs/{job_id}/distribution");
        let (status, distribution) = get_json(app.clone(), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(distribution["total"], 3);
        assert_eq!(distribution["distribution"][4]["range"], "90-100");
        assert_eq!(distribution["distribution"][4]["count"], 2);

        let uri = format!("/api/v1/eligibility/jobs/{}/distribution", Uuid::new_v4());
        let (_, empty) = get_json(app, &uri).await;
        assert_eq!(empty["total"], 0);
    }
}
