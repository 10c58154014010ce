#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Jail;
use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};

use hive_api::{Credentials, TlsMode, UrlTemplates};
use hive_config::{Config, ConfigError, load_config_from, resolve_token, save_config_to, to_client_config};

#[test]
fn missing_file_yields_defaults() {
    Jail::expect_with(|_jail| {
        let cfg = load_config_from(Path::new("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.timeout, 10);
        assert_eq!(cfg.base_url, "https://beekeeper.hivehome.com/1.0");
        Ok(())
    });
}

#[test]
fn file_values_override_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
                timeout = 25
                home_id = "home-abc"
                base_url = "https://beekeeper-uk.hivehome.com/1.0"

                [urls]
                weather = "https://weather.example/{0}"
            "#,
        )?;

        let cfg = load_config_from(Path::new("config.toml")).unwrap();
        assert_eq!(cfg.timeout, 25);
        assert_eq!(cfg.home_id.as_deref(), Some("home-abc"));
        assert_eq!(cfg.base_url, "https://beekeeper-uk.hivehome.com/1.0");
        assert_eq!(cfg.urls.weather, "https://weather.example/{0}");
        // Untouched templates keep their defaults.
        assert_eq!(cfg.urls.all, UrlTemplates::default().all);
        Ok(())
    });
}

#[test]
fn environment_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "timeout = 25\ninsecure = false\n")?;
        jail.set_env("HIVE_TIMEOUT", "40");
        jail.set_env("HIVE_INSECURE", "true");
        jail.set_env("HIVE_HOME_ID", "home-env");

        let cfg = load_config_from(Path::new("config.toml")).unwrap();
        assert_eq!(cfg.timeout, 40);
        assert!(cfg.insecure);
        assert_eq!(cfg.home_id.as_deref(), Some("home-env"));
        Ok(())
    });
}

#[test]
fn raw_token_env_is_not_merged_into_config() {
    Jail::expect_with(|jail| {
        jail.set_env("HIVE_TOKEN", "from-env");

        let cfg = load_config_from(Path::new("config.toml")).unwrap();
        assert_eq!(cfg.token, None);
        Ok(())
    });
}

#[test]
fn save_then_load_keeps_values() {
    Jail::expect_with(|jail| {
        let path = jail.directory().join("nested").join("config.toml");
        let cfg = Config {
            timeout: 15,
            home_id: Some("home-saved".into()),
            ca_cert: Some(PathBuf::from("/etc/hive/ca.pem")),
            ..Config::default()
        };

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, cfg);
        Ok(())
    });
}

#[test]
fn named_token_env_wins_over_default_variable() {
    Jail::expect_with(|jail| {
        jail.set_env("MY_HIVE_TOKEN", "named");
        jail.set_env("HIVE_TOKEN", "default");

        let cfg = Config {
            token_env: Some("MY_HIVE_TOKEN".into()),
            token: Some("plaintext".into()),
            ..Config::default()
        };
        let token = resolve_token(&cfg).unwrap();
        assert_eq!(token.expose_secret(), "named");
        Ok(())
    });
}

#[test]
fn default_token_variable_wins_over_plaintext() {
    Jail::expect_with(|jail| {
        jail.set_env("HIVE_TOKEN", "default");

        let cfg = Config {
            token_env: Some("UNSET_HIVE_VARIABLE".into()),
            token: Some("plaintext".into()),
            ..Config::default()
        };
        let token = resolve_token(&cfg).unwrap();
        assert_eq!(token.expose_secret(), "default");
        Ok(())
    });
}

#[test]
fn client_config_carries_platform_and_home() {
    let cfg = Config {
        timeout: 30,
        home_id: Some("home-1".into()),
        base_url: "http://localhost:8080/1.0".into(),
        camera_base_url: "cam.local".into(),
        ..Config::default()
    };

    let client_cfg = to_client_config(&cfg, Some(SecretString::from("tok".to_owned()))).unwrap();
    assert_eq!(client_cfg.platform.base_url, "http://localhost:8080/1.0");
    assert_eq!(client_cfg.platform.camera_base_url, "cam.local");
    assert_eq!(client_cfg.home_id.as_deref(), Some("home-1"));
    assert_eq!(client_cfg.transport.timeout, Duration::from_secs(30));
    assert!(matches!(client_cfg.transport.tls, TlsMode::System));
    assert!(matches!(client_cfg.credentials, Credentials::Token(_)));
}

#[test]
fn client_config_without_token_is_anonymous() {
    let client_cfg = to_client_config(&Config::default(), None).unwrap();
    assert!(matches!(client_cfg.credentials, Credentials::Anonymous));
}

#[test]
fn client_config_tls_modes() {
    let insecure = Config {
        insecure: true,
        ca_cert: Some(PathBuf::from("/ca.pem")),
        ..Config::default()
    };
    let cfg = to_client_config(&insecure, None).unwrap();
    assert!(matches!(cfg.transport.tls, TlsMode::DangerAcceptInvalid));

    let custom = Config {
        ca_cert: Some(PathBuf::from("/ca.pem")),
        ..Config::default()
    };
    let cfg = to_client_config(&custom, None).unwrap();
    assert!(matches!(cfg.transport.tls, TlsMode::CustomCa(ref p) if p == Path::new("/ca.pem")));
}

#[test]
fn client_config_rejects_bad_values() {
    let bad_url = Config {
        base_url: "not a url".into(),
        ..Config::default()
    };
    let err = to_client_config(&bad_url, None).unwrap_err();
    assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "base_url"));

    let zero = Config {
        timeout: 0,
        ..Config::default()
    };
    let err = to_client_config(&zero, None).unwrap_err();
    assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "timeout"));
}
