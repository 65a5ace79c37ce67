use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

/// URL-safe random string built from `n` random bytes (256 when `n` is 0).
///
/// Used to give test resources names that cannot collide across runs.
pub fn random_token(n: usize) -> String {
    let n = if n == 0 { 256 } else { n };
    let mut data = vec![0u8; n];
    rand::thread_rng().fill_bytes(&mut data);
    URL_SAFE_NO_PAD.encode(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_token_length() {
        // 12 bytes encode to exactly 16 characters without padding
        assert_eq!(random_token(12).len(), 16);
        // 256 bytes -> ceil(256 * 4 / 3)
        assert_eq!(random_token(0).len(), 342);
    }

    #[test]
    fn test_random_token_is_url_safe() {
        let token = random_token(64);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_random_tokens_differ() {
        assert_ne!(random_token(16), random_token(16));
    }
}
