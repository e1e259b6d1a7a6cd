//! Integration tests for error types

#[cfg(test)]
mod tests {
    use scorm_errors::*;

    #[test]
    fn test_error_conversion() {
        let err: Error = PackageError::missing_manifest().into();
        assert!(matches!(err, Error::Package(_)));
        assert!(err.is_user_correctable());
    }

    #[test]
    fn test_missing_manifest_message() {
        let err: Error = PackageError::missing_manifest().into();
        assert_eq!(
            err.user_message(),
            "Invalid package: could not find 'imsmanifest.xml' file at the root of the zip file"
        );
        assert_eq!(err.user_code(), Some("package.invalid_package"));
    }

    #[test]
    fn test_storage_errors_are_not_user_correctable() {
        let err: Error = StorageError::IoError {
            message: "backend down".into(),
        }
        .into();
        assert!(!err.is_user_correctable());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = StorageError::PathNotFound {
            path: "scorm/block/abc/index.html".into(),
        };
        assert_eq!(err.to_string(), "path not found: scorm/block/abc/index.html");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_io_error_conversion_with_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let storage_err = StorageError::from_io_with_path(&io_err, "a/b");
        assert!(matches!(storage_err, StorageError::PathNotFound { .. }));
    }
}
