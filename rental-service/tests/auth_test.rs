mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, PASSWORD};
use serde_json::json;

#[tokio::test]
async fn test_owner_registration_returns_token_and_user() {
    let app = TestApp::spawn().await;

    let res = app
        .post(
            "/auth/registro",
            None,
            json!({"nombre": "Olga", "email": "Olga@Example.com", "password": PASSWORD}),
        )
        .await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["usuario"]["rol"], "owner");
    assert_eq!(res.body["usuario"]["email"], "olga@example.com");
    assert!(res.body["usuario"].get("password_hash").is_none());
    assert!(res.body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_self_registration_as_tenant_is_forbidden() {
    let app = TestApp::spawn().await;

    for rol in ["tenant", "inquilino", "admin"] {
        let res = app
            .post(
                "/auth/registro",
                None,
                json!({"nombre": "Tomás", "email": "t@example.com", "password": PASSWORD, "rol": rol}),
            )
            .await;
        assert_eq!(res.status, StatusCode::FORBIDDEN, "{rol}");
    }

    let res = app
        .post(
            "/auth/registro",
            None,
            json!({"nombre": "Olga", "email": "o@example.com", "password": PASSWORD, "rol": "propietario"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let app = TestApp::spawn().await;
    app.register_owner("olga@example.com").await;

    let res = app
        .post(
            "/auth/registro",
            None,
            json!({"nombre": "Otra", "email": "OLGA@example.com", "password": PASSWORD}),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "El email ya está registrado");
}

#[tokio::test]
async fn test_registration_validation_errors_are_400() {
    let app = TestApp::spawn().await;

    let res = app
        .post(
            "/auth/registro",
            None,
            json!({"nombre": "Olga", "email": "not-an-email", "password": "123"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Datos inválidos");
    assert!(res.body["details"].is_string());

    let res = app
        .request(Method::POST, "/auth/registro", None, None)
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_rejects_wrong_password_and_unknown_email_alike() {
    let app = TestApp::spawn().await;
    app.register_owner("olga@example.com").await;

    let wrong = app
        .post(
            "/auth/login",
            None,
            json!({"email": "olga@example.com", "password": "incorrecta"}),
        )
        .await;
    let unknown = app
        .post(
            "/auth/login",
            None,
            json!({"email": "nadie@example.com", "password": PASSWORD}),
        )
        .await;

    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["error"], unknown.body["error"]);
}

#[tokio::test]
async fn test_login_with_expected_role_mismatch_is_forbidden() {
    let app = TestApp::spawn().await;
    let (_, owner_token) = app.register_owner("olga@example.com").await;
    app.create_tenant(&owner_token, "tomas@example.com").await;

    let res = app
        .post(
            "/auth/login",
            None,
            json!({"email": "tomas@example.com", "password": PASSWORD, "rolEsperado": "owner"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["error"], "Este usuario no está registrado como propietario");

    // Matching expectation logs in normally.
    app.login("tomas@example.com", Some("inquilino")).await;
}

#[tokio::test]
async fn test_me_and_dashboard_branch_on_role() {
    let app = TestApp::spawn().await;
    let (owner_id, owner_token) = app.register_owner("olga@example.com").await;
    app.create_tenant(&owner_token, "t1@example.com").await;
    let (_, _, tenant_token) = app.create_tenant(&owner_token, "t2@example.com").await;

    let me = app.get("/auth/me", &owner_token).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["usuario"]["id"], owner_id);

    let owner_dash = app.get("/auth/dashboard", &owner_token).await;
    assert_eq!(owner_dash.status, StatusCode::OK);
    assert_eq!(owner_dash.body["rol"], "owner");
    assert_eq!(owner_dash.body["total_inquilinos"], 2);

    let tenant_dash = app.get("/auth/dashboard", &tenant_token).await;
    assert_eq!(tenant_dash.status, StatusCode::OK);
    assert_eq!(tenant_dash.body["rol"], "tenant");
    assert!(tenant_dash.body.get("total_inquilinos").is_none());
}

#[tokio::test]
async fn test_protected_routes_require_a_valid_bearer_token() {
    let app = TestApp::spawn().await;

    let missing = app.request(Method::GET, "/auth/me", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["error"], "Token de acceso requerido");

    let garbage = app.get("/auth/me", "not.a.jwt").await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.body["error"], "Token inválido");

    // Guard runs before the role check: no token on an owner route is 401, not 403.
    let owner_route = app.request(Method::GET, "/pagos", None, None).await;
    assert_eq!(owner_route.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_another_secret_is_rejected() {
    let app = TestApp::spawn().await;
    let (owner_id, _) = app.register_owner("olga@example.com").await;

    let foreign = rental_service::services::JwtService::new(&secrecy::Secret::new(
        "some-other-secret-some-other-secret!".to_string(),
    ))
    .issue(owner_id, "olga@example.com", rental_service::models::Role::Owner)
    .unwrap();

    let res = app.get("/auth/me", &foreign).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_role_gates() {
    let app = TestApp::spawn().await;
    let (_, owner_token) = app.register_owner("olga@example.com").await;
    let (_, _, tenant_token) = app.create_tenant(&owner_token, "tomas@example.com").await;

    for path in ["/pagos", "/inquilinos", "/contratos", "/incidencias"] {
        let res = app.get(path, &tenant_token).await;
        assert_eq!(res.status, StatusCode::FORBIDDEN, "{path}");
        assert_eq!(res.body["error"], "Acceso denegado: solo para propietarios");
    }

    for path in ["/tenant/dashboard", "/tenant/profile", "/tenant/payments"] {
        let res = app.get(path, &owner_token).await;
        assert_eq!(res.status, StatusCode::FORBIDDEN, "{path}");
        assert_eq!(res.body["error"], "Acceso denegado: solo para inquilinos");
    }

    let res = app
        .post(
            "/auth/crear-inquilino",
            Some(&tenant_token),
            json!({"nombre": "X", "email": "x@example.com", "password": PASSWORD}),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_owner_lists_only_own_tenants() {
    let app = TestApp::spawn().await;
    let (_, olga) = app.register_owner("olga@example.com").await;
    let (_, pablo) = app.register_owner("pablo@example.com").await;
    app.create_tenant(&olga, "t1@example.com").await;
    app.create_tenant(&olga, "t2@example.com").await;
    app.create_tenant(&pablo, "t3@example.com").await;

    let res = app.get("/inquilinos", &olga).await;
    assert_eq!(res.status, StatusCode::OK);
    let emails: Vec<&str> = res.body["inquilinos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails.len(), 2);
    assert!(!emails.contains(&"t3@example.com"));
}

#[tokio::test]
async fn test_login_is_rate_limited_per_ip() {
    let mut config = common::test_config();
    config.rate_limit.login_attempts = 2;
    config.rate_limit.login_window_seconds = 3600;
    let app = TestApp::with_config(config).await;

    let body = json!({"email": "nadie@example.com", "password": PASSWORD});
    assert_eq!(app.post("/auth/login", None, body.clone()).await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.post("/auth/login", None, body.clone()).await.status, StatusCode::UNAUTHORIZED);

    let limited = app.post("/auth/login", None, body).await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
    assert!(limited.headers.contains_key("retry-after"));
}
