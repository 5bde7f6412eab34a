mod common;

use common::{
    context_with, context_with_config, make_token, seed_token, test_config, test_keypair,
};
use shopkit_hub::HubError;
use shopkit_licensing::{LicenseState, LicensingError};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token_response(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "licenseToken": token }))
}

// ── Activation ───────────────────────────────────────────────────

#[tokio::test]
async fn activation_persists_token_and_reports_grant() {
    let server = MockServer::start().await;
    let (sk, _) = test_keypair();
    Mock::given(method("POST"))
        .and(path("/licenses/activate"))
        .respond_with(token_response(&make_token(&sk, 0, 30 * 86_400, 7)))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let context = context_with(&server.uri(), &dir);
    let service = context.service();

    let activation = service.activate(Some("SK-1234-5678")).await.unwrap();
    assert_eq!(activation.plan, "retail-pro");
    assert_eq!(activation.grace_days, 7);
    assert!(activation.entitlements.contains("inventory"));

    let claims = service.stored_claims().expect("credential persisted");
    assert_eq!(claims.plan, "retail-pro");

    let status = service.check_status(false).await;
    assert_eq!(status.state, LicenseState::Active);
    assert!(status.valid);
    assert!(status.cached);
}

#[tokio::test]
async fn activation_not_found_is_distinct_from_invalid_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/licenses/activate"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "message": "license not found" })),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let context = context_with(&server.uri(), &dir);

    let err = context.service().activate(Some("SK-0000")).await.unwrap_err();
    assert!(matches!(
        err,
        LicensingError::Hub(HubError::LicenseNotFound(_))
    ));
    assert!(!matches!(
        err,
        LicensingError::Hub(HubError::InvalidParameters(_))
    ));
}

#[tokio::test]
async fn activation_bad_request_maps_to_invalid_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/licenses/activate"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "message": "deviceId is required" })),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let context = context_with(&server.uri(), &dir);

    let err = context.service().activate(Some("SK-0000")).await.unwrap_err();
    assert!(matches!(
        err,
        LicensingError::Hub(HubError::InvalidParameters(_))
    ));
}

#[tokio::test]
async fn failed_activation_never_grants() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/licenses/activate"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let context = context_with(&server.uri(), &dir);
    let service = context.service();

    assert!(service.activate(Some("SK-0000")).await.is_err());
    assert!(service.stored_claims().is_none());

    let status = service.check_status(false).await;
    assert_eq!(status.state, LicenseState::NotLicensed);
    assert!(!status.valid);
}

#[tokio::test]
async fn failed_activation_never_revokes_existing_credential() {
    let server = MockServer::start().await;
    let (sk, _) = test_keypair();
    Mock::given(method("POST"))
        .and(path("/licenses/activate"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    seed_token(&dir, &make_token(&sk, -86_400, 30 * 86_400, 7));
    let context = context_with(&server.uri(), &dir);
    let service = context.service();

    let before = service.check_status(false).await;
    assert_eq!(before.state, LicenseState::Active);

    assert!(service.activate(Some("SK-0000")).await.is_err());

    let after = service.check_status(false).await;
    assert_eq!(after.state, LicenseState::Active);
    assert_eq!(after.expires_at, before.expires_at);
}

#[tokio::test]
async fn hub_token_signed_by_unknown_key_is_rejected_without_persisting() {
    let server = MockServer::start().await;
    let rogue = ed25519_dalek::SigningKey::from_bytes(&[3u8; 32]);
    Mock::given(method("POST"))
        .and(path("/licenses/activate"))
        .respond_with(token_response(&make_token(&rogue, 0, 30 * 86_400, 7)))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let context = context_with(&server.uri(), &dir);
    let service = context.service();

    let err = service.activate(Some("SK-1234")).await.unwrap_err();
    assert!(matches!(err, LicensingError::Token(_)));
    assert!(service.stored_claims().is_none());
}

// ── Status checks ────────────────────────────────────────────────

#[tokio::test]
async fn refresh_extends_expiry_and_clears_cached_flag() {
    let server = MockServer::start().await;
    let (sk, _) = test_keypair();
    Mock::given(method("POST"))
        .and(path("/licenses/activate"))
        .respond_with(token_response(&make_token(&sk, 0, 60 * 86_400, 7)))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    seed_token(&dir, &make_token(&sk, -86_400, 3_600, 7));
    let context = context_with(&server.uri(), &dir);
    let service = context.service();

    let before = service.check_status(false).await;
    assert!(before.cached);

    let refreshed = service.check_status(true).await;
    assert_eq!(refreshed.state, LicenseState::Active);
    assert!(!refreshed.cached);
    assert!(refreshed.expires_at.unwrap() > before.expires_at.unwrap());
}

#[tokio::test]
async fn refresh_failure_keeps_previous_status() {
    // Nothing listens here; every refresh attempt fails fast.
    let dir = TempDir::new().unwrap();
    let (sk, _) = test_keypair();
    seed_token(&dir, &make_token(&sk, -86_400, 3_600, 7));
    let context = context_with("http://127.0.0.1:9", &dir);
    let service = context.service();

    let status = service.check_status(true).await;
    assert_eq!(status.state, LicenseState::Active);
    assert!(status.valid);
    assert!(status.cached);
}

#[tokio::test]
async fn garbage_stored_token_fails_closed() {
    let dir = TempDir::new().unwrap();
    seed_token(&dir, "not.a-real-token");
    let context = context_with("http://127.0.0.1:9", &dir);

    let status = context.service().check_status(false).await;
    assert_eq!(status.state, LicenseState::NotLicensed);
    assert!(!status.valid);
    assert!(status.needs_setup);
}

#[tokio::test]
async fn token_for_other_device_fails_closed() {
    let dir = TempDir::new().unwrap();
    let (sk, _) = test_keypair();
    // Signed correctly, but the claims name a different device.
    let token = common::sign_token(
        &sk,
        &format!(
            r#"{{"tenantId":"acme","deviceId":"till-9","plan":"retail-pro","entitlements":[],"iat":{iat},"exp":{exp},"graceDays":7,"iss":"hub.shopkit.io"}}"#,
            iat = chrono::Utc::now().timestamp(),
            exp = chrono::Utc::now().timestamp() + 86_400,
        ),
    );
    seed_token(&dir, &token);
    let context = context_with("http://127.0.0.1:9", &dir);

    assert!(context.service().stored_claims().is_none());
    let status = context.service().check_status(false).await;
    assert_eq!(status.state, LicenseState::NotLicensed);
}

#[tokio::test]
async fn development_mode_short_circuits_everything() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config("http://127.0.0.1:9", None);
    config.enforced = Some(false);
    let context = context_with_config(config, &dir);

    let status = context.service().check_status(false).await;
    assert_eq!(status.state, LicenseState::Development);
    assert!(status.valid);
}

// ── Install status ───────────────────────────────────────────────

#[tokio::test]
async fn install_status_without_token_needs_setup() {
    let dir = TempDir::new().unwrap();
    let context = context_with("http://127.0.0.1:9", &dir);

    let install = context.service().install_status();
    assert!(install.needs_setup);
    assert_eq!(install.status, LicenseState::NotLicensed);
}

#[tokio::test]
async fn install_status_without_tenant_is_not_registered() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config("http://127.0.0.1:9", None);
    config.tenant_id = None;
    let context = context_with_config(config, &dir);

    let install = context.service().install_status();
    assert!(install.needs_setup);
    assert_eq!(install.status, LicenseState::NotRegistered);
}

// ── Deactivation ─────────────────────────────────────────────────

#[tokio::test]
async fn deactivation_removes_credential() {
    let server = MockServer::start().await;
    let (sk, _) = test_keypair();
    Mock::given(method("POST"))
        .and(path("/licenses/activate"))
        .respond_with(token_response(&make_token(&sk, 0, 30 * 86_400, 7)))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let context = context_with(&server.uri(), &dir);
    let service = context.service();

    service.activate(Some("SK-1234")).await.unwrap();
    assert!(service.stored_claims().is_some());

    service.deactivate().unwrap();
    assert!(service.stored_claims().is_none());
    assert_eq!(
        service.check_status(false).await.state,
        LicenseState::NotLicensed
    );
}

// ── Snapshot ─────────────────────────────────────────────────────

#[tokio::test]
async fn snapshot_tracks_last_answer() {
    let dir = TempDir::new().unwrap();
    let (sk, _) = test_keypair();
    seed_token(&dir, &make_token(&sk, -86_400, 3_600, 7));
    let context = context_with("http://127.0.0.1:9", &dir);
    let service = context.service();

    assert!(service.last_known_status().is_none());
    let status = service.check_status(false).await;
    assert_eq!(service.last_known_status(), Some(status));
}
