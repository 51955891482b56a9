use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Privacy-preserving landlord identity hasher.
///
/// Produces a deterministic HMAC-SHA256 digest of a normalized phone
/// number under a server-held secret. The raw phone number is never
/// persisted or logged; equivalent formattings of the same number yield
/// the same digest.
#[derive(Clone)]
pub struct LandlordHasher {
    secret: Vec<u8>,
}

impl std::fmt::Debug for LandlordHasher {
    // Never leak the secret through Debug output
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LandlordHasher").finish_non_exhaustive()
    }
}

impl LandlordHasher {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
        }
    }

    /// Hash a raw phone number into a stable hex identity key.
    pub fn hash(&self, raw_phone: &str) -> String {
        let normalized = normalize_phone(raw_phone);

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC can take a key of any size");
        mac.update(normalized.as_bytes());

        hex::encode(mac.finalize().into_bytes())
    }
}

/// Canonicalize a phone number before hashing.
///
/// Strips spaces, dashes, dots and parentheses, rewrites the `00`
/// international prefix as `+`, and drops every remaining non-digit
/// except a leading `+`. `+49 151 123-4567`, `0049 151 1234567` and
/// `+49(151)1234567` all collapse to the same canonical form.
pub fn normalize_phone(raw: &str) -> String {
    let trimmed = raw.trim();

    let mut digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    let has_plus = trimmed.starts_with('+');

    if digits.starts_with("00") {
        let tail = digits.split_off(2);
        return format!("+{tail}");
    }

    if has_plus {
        format!("+{digits}")
    } else {
        digits
    }
}
