//! Integration tests for types

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use scorm_types::*;

    #[test]
    fn test_block_settings_defaults() {
        let settings = BlockSettings::new(BlockLocation::new("org", "course", "scorm", "b1"));
        assert_eq!(settings.display_name, "Scorm");
        assert!(settings.has_score);
        assert_eq!(settings.weight, 1);
        assert_eq!(settings.height, 650);
        assert_eq!(settings.width, None);
        assert_eq!(settings.icon_class, "problem");
        assert_eq!(settings.version_scorm, ScormVersion::Scorm12);
        assert!(settings.path_index_page.is_empty());
        assert!(settings.content_hash().is_none());
    }

    #[test]
    fn test_block_settings_fill_missing_fields() {
        let json = r#"{"location": {"org": "o", "course": "c", "block_type": "scorm", "block_id": "b"}}"#;
        let settings: BlockSettings = serde_json::from_str(json).unwrap();
        assert_eq!(
            settings,
            BlockSettings::new(BlockLocation::new("o", "c", "scorm", "b"))
        );
    }

    #[test]
    fn test_location_display() {
        let loc = BlockLocation::new("org", "course", "scorm", "block");
        assert_eq!(loc.to_string(), "org/course/scorm/block");
    }

    proptest! {
        #[test]
        fn extension_is_suffix_of_name(stem in "[a-z]{1,8}", ext in "[a-z0-9]{1,4}") {
            let name = format!("{stem}.{ext}");
            let expected = format!(".{ext}");
            prop_assert_eq!(original_extension(&name), expected.as_str());
        }

        #[test]
        fn extension_never_contains_separator(name in "[a-z./]{0,16}") {
            let ext = original_extension(&name);
            prop_assert!(!ext.contains('/'));
            prop_assert!(ext.is_empty() || ext.starts_with('.'));
            prop_assert!(name.ends_with(ext));
        }
    }
}
