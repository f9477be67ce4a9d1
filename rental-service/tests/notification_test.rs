mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

async fn setup() -> (TestApp, String, i64, String) {
    let app = TestApp::spawn().await;
    let (_, owner) = app.register_owner("olga@example.com").await;
    let (_, tenant_user_id, tenant) = app.create_tenant(&owner, "tomas@example.com").await;
    (app, owner, tenant_user_id, tenant)
}

async fn send(app: &TestApp, owner: &str, user_id: i64, titulo: &str) -> i64 {
    let res = app
        .post(
            "/notificaciones",
            Some(owner),
            json!({"id_usuario": user_id, "titulo": titulo, "mensaje": "Recuerde el pago", "tipo": "payment_reminder"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{:?}", res.body);
    res.body["notificacion"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_owner_sends_to_own_tenant_only() {
    let (app, owner, tenant_user_id, tenant) = setup().await;

    let id = send(&app, &owner, tenant_user_id, "Aviso").await;
    let inbox = app.get("/notificaciones", &tenant).await;
    assert_eq!(inbox.status, StatusCode::OK);
    assert_eq!(inbox.body["notificaciones"][0]["id"], id);
    assert_eq!(inbox.body["notificaciones"][0]["tipo"], "payment_reminder");
    assert_eq!(inbox.body["notificaciones"][0]["prioridad"], "medium");

    let (_, intruder) = app.register_owner("pablo@example.com").await;
    let res = app
        .post(
            "/notificaciones",
            Some(&intruder),
            json!({"id_usuario": tenant_user_id, "titulo": "Hola", "mensaje": "Spam"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app
        .post(
            "/notificaciones",
            Some(&tenant),
            json!({"id_usuario": tenant_user_id, "titulo": "Hola", "mensaje": "Yo"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_inbox_is_newest_first_with_unread_count() {
    let (app, owner, tenant_user_id, tenant) = setup().await;
    // The contract-free setup leaves the inbox empty.
    let empty = app.get("/notificaciones", &tenant).await;
    assert_eq!(empty.body["no_leidas"], 0);

    let first = send(&app, &owner, tenant_user_id, "Primera").await;
    let second = send(&app, &owner, tenant_user_id, "Segunda").await;

    let inbox = app.get("/notificaciones", &tenant).await;
    let ids: Vec<i64> = inbox.body["notificaciones"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second, first]);
    assert_eq!(inbox.body["no_leidas"], 2);
}

#[tokio::test]
async fn test_mark_read_keeps_first_read_time() {
    let (app, owner, tenant_user_id, tenant) = setup().await;
    let id = send(&app, &owner, tenant_user_id, "Aviso").await;
    let uri = format!("/notificaciones/{id}/leer");

    let first = app.patch(&uri, &tenant, None).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["notificacion"]["estado"], "read");
    let read_at = first.body["notificacion"]["fecha_lectura"].clone();
    assert!(read_at.is_string());

    let second = app.patch(&uri, &tenant, None).await;
    assert_eq!(second.body["notificacion"]["fecha_lectura"], read_at);

    // Someone else's notification looks absent.
    assert_eq!(app.patch(&uri, &owner, None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mark_all_read_twice() {
    let (app, owner, tenant_user_id, tenant) = setup().await;
    let id = send(&app, &owner, tenant_user_id, "Uno").await;
    send(&app, &owner, tenant_user_id, "Dos").await;

    let single = app
        .patch(&format!("/notificaciones/{id}/leer"), &tenant, None)
        .await;
    let read_at = single.body["notificacion"]["fecha_lectura"].clone();

    let res = app.patch("/notificaciones/leer-todas", &tenant, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["actualizadas"], 1);

    let res = app.patch("/notificaciones/leer-todas", &tenant, None).await;
    assert_eq!(res.body["actualizadas"], 0);

    let inbox = app.get("/notificaciones", &tenant).await;
    assert_eq!(inbox.body["no_leidas"], 0);
    let earlier = inbox.body["notificaciones"]
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["id"] == id)
        .cloned()
        .unwrap();
    assert_eq!(earlier["fecha_lectura"], read_at);
}

#[tokio::test]
async fn test_archived_notifications_are_hidden_unless_requested() {
    let (app, owner, tenant_user_id, tenant) = setup().await;
    let id = send(&app, &owner, tenant_user_id, "Archivar").await;
    send(&app, &owner, tenant_user_id, "Mantener").await;

    let res = app
        .patch(&format!("/notificaciones/{id}/archivar"), &tenant, None)
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["notificacion"]["estado"], "archived");

    let default_view = app.get("/notificaciones", &tenant).await;
    assert_eq!(default_view.body["notificaciones"].as_array().unwrap().len(), 1);

    let full_view = app
        .get("/notificaciones?incluir_archivadas=true", &tenant)
        .await;
    assert_eq!(full_view.body["notificaciones"].as_array().unwrap().len(), 2);
}
