use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Redacts an email address as `<hex(HMAC-SHA256(secret, address))>`.
///
/// Keyed hashing keeps the digest stable within a run (the same address
/// always maps to the same token) without revealing the address itself.
pub fn keyed_email_digest(secret: &str, address: &str) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
    mac.update(address.as_bytes());
    format!("<{}>", hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::keyed_email_digest;

    #[test]
    fn digest_is_hex_wrapped_in_angle_brackets() {
        let digest = keyed_email_digest("secret", "a@b.com");
        assert!(digest.starts_with('<') && digest.ends_with('>'));
        let hex_part = &digest[1..digest.len() - 1];
        assert_eq!(hex_part.len(), 64);
        assert!(hex_part.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn digest_is_deterministic_and_keyed() {
        assert_eq!(
            keyed_email_digest("secret", "a@b.com"),
            keyed_email_digest("secret", "a@b.com")
        );
        assert_ne!(
            keyed_email_digest("secret", "a@b.com"),
            keyed_email_digest("other", "a@b.com")
        );
        assert_ne!(
            keyed_email_digest("secret", "a@b.com"),
            keyed_email_digest("secret", "c@d.com")
        );
    }
}
