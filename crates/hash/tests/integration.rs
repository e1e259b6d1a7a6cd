//! Integration tests for hash crate

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use scorm_hash::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_empty_input() {
        let (hash, size) = Hash::hash_reader(Cursor::new(Vec::new())).await.unwrap();
        assert_eq!(size, 0);
        assert_eq!(hash.to_hex(), blake3::hash(b"").to_hex().as_str());
    }

    #[tokio::test]
    async fn test_hex_is_lowercase_and_fixed_width() {
        let (hash, _) = Hash::hash_reader(Cursor::new(b"course.zip")).await.unwrap();
        let hex = hash.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    proptest! {
        #[test]
        fn fingerprint_matches_one_shot_digest(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let (first, size) = rt.block_on(Hash::hash_reader(Cursor::new(data.clone()))).unwrap();
            let (second, _) = rt.block_on(Hash::hash_reader(Cursor::new(data.clone()))).unwrap();
            prop_assert_eq!(first, second);
            prop_assert_eq!(size, data.len() as u64);
            prop_assert_eq!(first.to_hex(), blake3::hash(&data).to_hex().to_string());
        }
    }
}
