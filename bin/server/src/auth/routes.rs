//! Guarded login routes.

use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::CookieJar;
use portal_gate_admission::NavigationRequest;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{
    AppState,
    middleware::{apply_session_changes, session_cookie},
};
use crate::navigator::ResponseNavigator;

/// Which guard entry point a route activates.
#[derive(Debug, Clone, Copy)]
enum Activation {
    Route,
    Child,
}

/// Builds the router for the guarded login routes and the landing route.
pub fn router(state: Arc<AppState>) -> Router {
    let default_route = state.default_route.clone();
    Router::new()
        .route("/login", get(login))
        .route("/login/{*rest}", get(login_child))
        .route(&default_route, get(home))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the gate for the login route.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    jar: CookieJar,
    uri: Uri,
) -> Response {
    guarded(&state, params, jar, &uri, Activation::Route).await
}

/// Runs the gate for a nested child of the login route.
pub async fn login_child(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    jar: CookieJar,
    uri: Uri,
) -> Response {
    guarded(&state, params, jar, &uri, Activation::Child).await
}

/// Landing page for authenticated users.
pub async fn home() -> Html<&'static str> {
    Html("<!DOCTYPE html><html><body><h1>Portal</h1></body></html>")
}

async fn guarded(
    state: &AppState,
    params: HashMap<String, String>,
    jar: CookieJar,
    uri: &Uri,
    activation: Activation,
) -> Response {
    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string);
    let request = NavigationRequest::new(target).with_query_params(params);

    let store = Arc::new(state.session_store(session_cookie(&jar)));
    let gate = state.gate(store.clone());
    let navigator = ResponseNavigator::default();

    let admitted = match activation {
        Activation::Route => gate.guard(&request, &navigator).await,
        Activation::Child => gate.guard_child(&request, &navigator).await,
    };

    let jar = apply_session_changes(jar, &store, &state.session_config);

    if admitted {
        return (jar, login_page(state.notifier.take().as_deref())).into_response();
    }

    match navigator.into_redirect() {
        Some(redirect) => (jar, redirect).into_response(),
        None => (StatusCode::FORBIDDEN, jar, "Sign-off failed").into_response(),
    }
}

fn login_page(notice: Option<&str>) -> Html<String> {
    let banner = notice
        .map(|message| format!("<p role=\"alert\">{message}</p>"))
        .unwrap_or_default();
    // Local sign-in is served by the portal UI; this host only guards the route.
    Html(format!(
        "<!DOCTYPE html><html><body>{banner}<main id=\"login\"></main></body></html>"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::navigator::BannerNotifier;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, header};
    use chrono::Duration;
    use portal_gate_admission::{AppConfig, AuthMode, ConfigError, ConfigProvider, SessionUser};
    use portal_gate_core::{Result, SessionId};
    use portal_gate_sso::{IdpError, IdpUser, SessionRegistry, TokenValidator};
    use tower::ServiceExt;

    const LOGIN_URL: &str = "https://idp.example/#/login?service=harbor";

    struct StaticConfig(AppConfig);

    #[async_trait]
    impl ConfigProvider for StaticConfig {
        fn current(&self) -> AppConfig {
            self.0.clone()
        }

        async fn refresh(&self) -> Result<AppConfig, ConfigError> {
            Ok(self.0.clone())
        }
    }

    struct StaticValidator;

    #[async_trait]
    impl TokenValidator for StaticValidator {
        async fn validate_token(&self, token: &str) -> std::result::Result<IdpUser, IdpError> {
            if token != "abc123" {
                return Err(IdpError::InvalidToken {
                    reason: "unknown token".to_string(),
                });
            }
            Ok(IdpUser {
                id: 1,
                username: "alice".to_string(),
                email: None,
                nickname: None,
                department: None,
            })
        }
    }

    fn state(auth_mode: AuthMode) -> Arc<AppState> {
        Arc::new(AppState {
            registry: Arc::new(SessionRegistry::new(Duration::minutes(5))),
            validator: Arc::new(StaticValidator),
            config: Arc::new(StaticConfig(AppConfig::new(
                auth_mode,
                "https://idp.example",
                "harbor",
            ))),
            notifier: Arc::new(BannerNotifier::default()),
            session_config: SessionConfig::default(),
            default_route: "/harbor/default".to_string(),
            default_email_domain: None,
        })
    }

    async fn get(state: &Arc<AppState>, uri: &str, cookie: Option<SessionId>) -> Response {
        let mut request = Request::builder().uri(uri);
        if let Some(id) = cookie {
            request = request.header(header::COOKIE, format!("session={id}"));
        }
        router(state.clone())
            .oneshot(request.body(Body::empty()).expect("request"))
            .await
            .expect("response")
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION]
            .to_str()
            .expect("location")
    }

    #[tokio::test]
    async fn local_login_renders_form() {
        let state = state(AuthMode::Local);

        let response = get(&state, "/login", None).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn sso_login_redirects_to_identity_provider() {
        let state = state(AuthMode::Sso);

        let response = get(&state, "/login", None).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), LOGIN_URL);
    }

    #[tokio::test]
    async fn token_exchange_sets_session_cookie() {
        let state = state(AuthMode::Sso);

        let response = get(&state, "/login?token=abc123", None).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/harbor/default");
        let set_cookie = response.headers()[header::SET_COOKIE]
            .to_str()
            .expect("set-cookie");
        assert!(set_cookie.starts_with("session=sess_"));
        assert!(set_cookie.contains("HttpOnly"));
        assert_eq!(state.registry.len(), 1);
    }

    #[tokio::test]
    async fn existing_session_is_sent_home_from_child_route() {
        let state = state(AuthMode::Sso);
        let session = state.registry.create(SessionUser::new("alice"));

        let response = get(&state, "/login/reset", Some(session.id())).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/harbor/default");
    }

    #[tokio::test]
    async fn signout_removes_session_and_cookie() {
        let state = state(AuthMode::Local);
        let session = state.registry.create(SessionUser::new("alice"));

        let response = get(&state, "/login?signout=true", Some(session.id())).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), LOGIN_URL);
        let set_cookie = response.headers()[header::SET_COOKIE]
            .to_str()
            .expect("set-cookie");
        assert!(set_cookie.starts_with("session=;"));
        assert!(state.registry.is_empty());
    }

    #[tokio::test]
    async fn tampered_cookie_counts_as_no_session() {
        let state = state(AuthMode::Local);

        let response = router(state.clone())
            .oneshot(
                Request::builder()
                    .uri("/login")
                    .header(header::COOKIE, "session=forged")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn pending_notice_is_shown_on_login_page() {
        use portal_gate_admission::Notifier;

        let state = state(AuthMode::Local);
        state.notifier.notify("load config error");

        let response = get(&state, "/login", None).await;
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");

        assert!(String::from_utf8_lossy(&body).contains("load config error"));
    }

    #[tokio::test]
    async fn login_page_renders_placeholder() {
        let state = state(AuthMode::Local);

        let response = get(&state, "/login", None).await;
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = String::from_utf8_lossy(&body);

        assert!(!body.contains("<form"));
        assert!(body.contains("id=\"login\""));
    }

    #[tokio::test]
    async fn post_to_login_is_not_routed() {
        let state = state(AuthMode::Local);

        let response = router(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/login")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn landing_route_is_served() {
        let response = get(&state(AuthMode::Local), "/harbor/default", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
