use shopkit_licensing::LicensingConfig;
use std::env;
use std::time::Duration;

#[test]
fn defaults_are_sane() {
    let config = LicensingConfig::default();
    assert_eq!(config.hub_base_url, "http://localhost:3000");
    assert_eq!(config.enforced, None);
    assert_eq!(config.offline_grace_days, 7);
    assert_eq!(config.renew_interval_hours, 6);
    assert!(config.public_key_pem.is_none());
    assert!(config.tenant_id.is_none());
    assert!(config.device_id.is_none());
}

#[test]
fn renew_interval_is_hours() {
    let config = LicensingConfig {
        renew_interval_hours: 6,
        ..LicensingConfig::default()
    };
    assert_eq!(config.renew_interval(), Duration::from_secs(6 * 3_600));
}

/// All environment manipulation lives in this one test; tests run in
/// parallel threads and the environment is process-global.
#[test]
fn from_env_reads_recognized_options() {
    unsafe {
        env::set_var("HUB_BASE_URL", "https://hub.example.com");
        env::set_var("LICENSING_ENFORCED", "false");
        env::set_var("OFFLINE_GRACE_DAYS", "14");
        env::set_var("RENEW_INTERVAL_HOURS", "12");
        env::set_var("TENANT_ID", "acme");
        env::set_var("DEVICE_ID", "till-1");
    }

    let config = LicensingConfig::from_env();
    assert_eq!(config.hub_base_url, "https://hub.example.com");
    assert_eq!(config.enforced, Some(false));
    assert_eq!(config.offline_grace_days, 14);
    assert_eq!(config.renew_interval_hours, 12);
    assert_eq!(config.tenant_id.as_ref().map(|t| t.as_str()), Some("acme"));
    assert_eq!(config.device_id.as_ref().map(|d| d.as_str()), Some("till-1"));

    // Unparseable numbers fall back to defaults instead of aborting.
    unsafe {
        env::set_var("OFFLINE_GRACE_DAYS", "soon");
        env::set_var("LICENSING_ENFORCED", "maybe");
    }
    let config = LicensingConfig::from_env();
    assert_eq!(config.offline_grace_days, 7);
    assert_eq!(config.enforced, None);

    unsafe {
        env::remove_var("HUB_BASE_URL");
        env::remove_var("LICENSING_ENFORCED");
        env::remove_var("OFFLINE_GRACE_DAYS");
        env::remove_var("RENEW_INTERVAL_HOURS");
        env::remove_var("TENANT_ID");
        env::remove_var("DEVICE_ID");
    }
}
