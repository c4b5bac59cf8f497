use figment::Jail;
use hwv_config::{ConfigError, HwvConfig};
use hwv_core::enums::RecalcPolicy;

#[test]
fn env_overrides_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("HWV_SERVER__BIND", "0.0.0.0:9000");
        jail.set_env("HWV_RECALC__POLICY", "coalesce");
        jail.set_env("HWV_RECALC__INTERVAL_SECS", "300");

        let config = HwvConfig::load().expect("config loads");
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.recalc.policy, RecalcPolicy::Coalesce);
        assert_eq!(config.recalc.interval_secs, 300);
        assert!(config.recalc.is_scheduled());
        Ok(())
    });
}

#[test]
fn env_beats_project_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".hwv")?;
        jail.create_file(
            ".hwv/config.toml",
            r#"
            [database]
            path = "from-toml.db"
            "#,
        )?;
        jail.set_env("HWV_DATABASE__PATH", "from-env.db");

        let config = HwvConfig::load().expect("config loads");
        assert_eq!(config.database.path, "from-env.db");
        Ok(())
    });
}

#[test]
fn invalid_env_value_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("HWV_RECALC__DEVICE_KEY_POINTER", "deviceId");

        let result = HwvConfig::load();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        Ok(())
    });
}

#[test]
fn unknown_policy_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.set_env("HWV_RECALC__POLICY", "drop");

        let result = HwvConfig::load();
        assert!(matches!(result, Err(ConfigError::Figment(_))));
        Ok(())
    });
}
