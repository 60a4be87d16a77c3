use filegate::config::{AppConfig, S3Section};

#[test]
fn defaults_disable_s3_and_use_media_root() {
    let config = AppConfig::default();

    assert!(!config.storage.use_s3);
    assert_eq!(config.storage.local_root, "media");
    assert_eq!(config.s3.region, "us-east-2");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8000);
}

#[test]
fn static_credentials_must_come_as_a_pair() {
    let section = S3Section {
        access_key_id: Some("AKIAEXAMPLE".into()),
        ..Default::default()
    };
    assert!(section.validate().is_err());

    let section = S3Section {
        secret_access_key: Some("secret".into()),
        ..Default::default()
    };
    assert!(section.validate().is_err());

    let section = S3Section {
        access_key_id: Some("AKIAEXAMPLE".into()),
        secret_access_key: Some("secret".into()),
        ..Default::default()
    };
    assert!(section.validate().is_ok());

    assert!(S3Section::default().validate().is_ok());
}

#[test]
fn blank_credential_strings_count_as_absent() {
    let section = S3Section {
        access_key_id: Some("  ".into()),
        secret_access_key: None,
        ..Default::default()
    };
    assert!(section.validate().is_ok());
}

#[test]
fn environment_overrides_apply() {
    // Every env mutation lives in this single test so concurrent tests
    // in this binary never observe a half-configured environment.
    let temp_dir = tempfile::TempDir::new().unwrap();
    let missing_config = temp_dir.path().join("absent.toml");

    std::env::set_var("FILEGATE_CONFIG", &missing_config);
    std::env::set_var("FILEGATE_USE_S3", "true");
    std::env::set_var("FILEGATE_LOCAL_ROOT", "alt-media");
    std::env::set_var("FILEGATE_S3_REGION", "eu-west-1");

    let config = AppConfig::load().unwrap();
    assert!(config.storage.use_s3);
    assert_eq!(config.storage.local_root, "alt-media");
    assert_eq!(config.s3.region, "eu-west-1");

    std::env::set_var("FILEGATE_USE_S3", "not-a-bool");
    assert!(AppConfig::load().is_err());

    std::env::remove_var("FILEGATE_CONFIG");
    std::env::remove_var("FILEGATE_USE_S3");
    std::env::remove_var("FILEGATE_LOCAL_ROOT");
    std::env::remove_var("FILEGATE_S3_REGION");
}
