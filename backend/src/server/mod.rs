//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use food_api::Trace;
#[cfg(debug_assertions)]
use food_api::doc::ApiDoc;
use food_api::inbound::http::configure_api;
use food_api::inbound::http::health::{HealthState, live, ready};
use food_api::inbound::http::state::HttpState;
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api/v1").configure(configure_api);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        bind_addr,
        db_pool,
        tokens,
    } = config;
    let http_state = build_http_state(&db_pool, &tokens);

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "listening");
    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::Utc;
    use food_api::domain::{
        CredentialLoginService, RecipeService, SessionService, TokenService, UserAccountService,
    };
    use food_api::inbound::http::state::HttpStatePorts;
    use food_api::middleware::trace::TRACE_ID_HEADER;
    use food_api::test_support::{
        InMemoryRecipeRepository, InMemoryUserRepository, MutableClock, test_signing_keys,
    };

    fn in_memory_dependencies() -> AppDependencies {
        let users = Arc::new(InMemoryUserRepository::default());
        let accounts = Arc::new(UserAccountService::new(users.clone()));
        let recipes = Arc::new(RecipeService::new(Arc::new(
            InMemoryRecipeRepository::default(),
        )));
        let tokens = TokenService::new(test_signing_keys(), Arc::new(MutableClock::new(Utc::now())));
        let http_state = HttpState::new(HttpStatePorts {
            login: Arc::new(CredentialLoginService::new(tokens.clone(), users.clone())),
            sessions: Arc::new(SessionService::new(tokens, users)),
            users: accounts.clone(),
            users_command: accounts,
            recipes: recipes.clone(),
            recipes_command: recipes,
        });
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: web::Data::new(http_state),
        }
    }

    #[actix_web::test]
    async fn api_routes_are_mounted_under_v1_with_trace_ids() {
        let app = test::init_service(build_app(in_memory_dependencies())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/recipes").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key(TRACE_ID_HEADER));
    }

    #[actix_web::test]
    async fn protected_routes_reject_anonymous_callers_with_trace_ids() {
        let app = test::init_service(build_app(in_memory_dependencies())).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/api/v1/self").to_request())
            .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let header = res
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .expect("trace id header");
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["traceId"], header.as_str());
    }

    #[actix_web::test]
    async fn health_probes_are_mounted_at_the_root() {
        let app = test::init_service(build_app(in_memory_dependencies())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/health/live").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
    }
}
