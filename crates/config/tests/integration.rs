//! Integration tests for config

#[cfg(test)]
mod tests {
    use scorm_config::*;
    use scorm_types::{ColorChoice, OutputFormat};
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_VARS: [&str; 6] = [
        "SCORM_OUTPUT",
        "SCORM_COLOR",
        "SCORM_STORAGE_ROOT",
        "SCORM_LOCATION",
        "SCORM_EXTRACT_CONCURRENCY",
        "SCORM_DB_PATH",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[general]
default_output = "plain"
color = "never"

[storage]
root = "/srv/scorm"

[ingest]
extract_concurrency = 8
max_archive_bytes = 1048576
max_extracted_bytes = 8388608
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.general.default_output, OutputFormat::Plain);
        assert_eq!(config.general.color, ColorChoice::Never);
        assert_eq!(config.storage.root, PathBuf::from("/srv/scorm"));
        // Unset keys keep their defaults
        assert_eq!(config.storage.location, "scorm");
        assert_eq!(config.ingest.extract_concurrency, 8);
        assert_eq!(config.ingest.max_archive_bytes, Some(1_048_576));
        assert_eq!(config.ingest.max_extracted_bytes, 8_388_608);
        assert_eq!(config.proxy.route_prefix, "/scorm-proxy");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from_file(&dir.path().join("nope.toml"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            scorm_errors::Error::Config(scorm_errors::ConfigError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_parse_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[ingest]\nextract_concurrency = \"many\"").unwrap();
        let err = Config::load_from_file(temp_file.path()).await.unwrap_err();
        assert!(matches!(
            err,
            scorm_errors::Error::Config(scorm_errors::ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.storage.location, "scorm");
        assert_eq!(config.ingest.extract_concurrency, 4);
        assert_eq!(config.ingest.max_archive_bytes, None);
        assert_eq!(config.ingest.max_extracted_bytes, 1 << 30);
        assert_eq!(config.db_path(), PathBuf::from("./scorm-data/state.sqlite"));
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("SCORM_OUTPUT", "json");
        std::env::set_var("SCORM_COLOR", "always");
        std::env::set_var("SCORM_LOCATION", "/assets/");
        std::env::set_var("SCORM_EXTRACT_CONCURRENCY", "0");
        std::env::set_var("SCORM_DB_PATH", "/tmp/scorm.sqlite");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.general.default_output, OutputFormat::Json);
        assert_eq!(config.general.color, ColorChoice::Always);
        assert_eq!(config.storage.location, "assets");
        assert_eq!(config.ingest.extract_concurrency, 0);
        assert_eq!(config.extract_concurrency(), 1);
        assert_eq!(config.db_path(), PathBuf::from("/tmp/scorm.sqlite"));

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("SCORM_EXTRACT_CONCURRENCY", "lots");

        let mut config = Config::default();
        let result = config.merge_env();
        assert!(matches!(
            result,
            Err(scorm_errors::Error::Config(
                scorm_errors::ConfigError::InvalidValue { .. }
            ))
        ));

        clear_env();
    }
}
