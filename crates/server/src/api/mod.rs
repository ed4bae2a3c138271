use axum::{
  Json, Router,
  routing::{get, post},
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::utils::AppState;

mod assessment;
mod evaluate;
mod health;
mod recommend;
mod role_roadmap;
mod startup_guidance;


pub use assessment::Assessment;
pub use evaluate::{Evaluate, Score};
pub use health::Health;
pub use recommend::Recommend;
pub use role_roadmap::{RoleRoadmap, RoleRoadmapResult};
pub use startup_guidance::{StartupGuidance, StartupGuidanceResult};

#[derive(OpenApi)]
#[openapi(
  info(
    title = "PathPilot API",
    version = "0.0.1",
    description = "Career recommendations, assessments and learning roadmaps"
  ),
  paths(
    health::health,
    recommend::recommend,
    assessment::assessment,
    evaluate::evaluate,
    startup_guidance::get_startup_guidance,
    role_roadmap::get_role_roadmap
  ),
  components(schemas(
    Health,
    Recommend,
    Assessment,
    Evaluate,
    Score,
    StartupGuidance,
    StartupGuidanceResult,
    RoleRoadmap,
    RoleRoadmapResult,
    pathpilot_core::Profile,
    pathpilot_core::ProjectDetails,
    pathpilot_shared::ErrorBody,
    pathpilot_shared::ErrorKind,
  ))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
  Json(ApiDoc::openapi())
}

pub fn app() -> Router<AppState> {
  Router::new()
    .route("/", get(health::health))
    .route("/recommend", post(recommend::recommend))
    .route("/assessment", post(assessment::assessment))
    .route("/evaluate", post(evaluate::evaluate))
    .route(
      "/get-startup-guidance",
      post(startup_guidance::get_startup_guidance),
    )
    .route("/get-role-roadmap", post(role_roadmap::get_role_roadmap))
    .route("/openapi.json", get(openapi_json))
    .merge(Scalar::with_url("/openapi/", ApiDoc::openapi()))
}
