//! Integration tests for events

#[cfg(test)]
mod tests {
    use scorm_errors::PackageError;
    use scorm_events::*;

    #[tokio::test]
    async fn test_event_sender_emit() {
        let (tx, mut rx) = channel();

        tx.emit_error("test error");
        tx.emit_debug("test debug");

        let first = rx.recv().await.unwrap();
        assert!(matches!(
            first.event,
            AppEvent::General(GeneralEvent::Error { .. })
        ));
        assert_eq!(first.meta.level, EventLevel::Error);
        assert_eq!(first.meta.source, EventSource::GENERAL);

        let second = rx.recv().await.unwrap();
        assert!(matches!(
            second.event,
            AppEvent::General(GeneralEvent::DebugLog { .. })
        ));
        assert_eq!(second.meta.level, EventLevel::Debug);
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit_warning("ignored");
    }

    #[tokio::test]
    async fn test_package_events_carry_block_correlation() {
        let (tx, mut rx) = channel();
        tx.emit_package(PackageEvent::Fingerprinted {
            block_id: "block-7".into(),
            content_hash: "ab".repeat(32),
        });

        let message = rx.recv().await.unwrap();
        assert_eq!(message.meta.correlation_id.as_deref(), Some("block-7"));
        assert_eq!(message.meta.source, EventSource::PACKAGE);
    }

    #[test]
    fn test_rejected_upload_is_not_an_error_level_event() {
        let failure = FailureContext::from_error(&PackageError::missing_manifest());
        assert_eq!(failure.code.as_deref(), Some("package.invalid_package"));
        assert!(!failure.retryable);

        let event = AppEvent::Package(PackageEvent::IngestRejected {
            block_id: "b".into(),
            failure,
        });
        assert_eq!(event.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_event_serialization_shape() {
        let event = AppEvent::Grade(GradingEvent::Published {
            block_id: "b".into(),
            learner_id: "l".into(),
            value: 0.5,
            max_value: 1,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["domain"], "grade");
        assert_eq!(json["event"]["type"], "Published");
        assert_eq!(json["event"]["max_value"], 1);
    }

    #[tokio::test]
    async fn test_optional_sender() {
        let none: Option<EventSender> = None;
        none.emit_debug("nowhere");

        let (tx, mut rx) = channel();
        Some(tx).emit_debug("somewhere");
        assert!(rx.recv().await.is_some());
    }
}
