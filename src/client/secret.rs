//! One-way hashing of secret values.
//!
//! Mirrors `seed.hash` in the client library: the first round digests
//! `pepper ‖ value ‖ ram`, and every further round (up to `cpu`) digests
//! `previous ‖ pepper`. The result is lowercase hex.

use sha2::{Digest, Sha256};

use super::variable::SecretParams;

/// Hash `value` with `params`.
pub fn hash_secret(value: &str, params: &SecretParams) -> String {
    let mut hasher = Sha256::new();
    hasher.update(params.pepper.as_bytes());
    hasher.update(value.as_bytes());
    hasher.update(params.ram.to_string().as_bytes());
    let mut digest = hasher.finalize();

    for _ in 1..params.cpu.max(1) {
        let mut hasher = Sha256::new();
        hasher.update(digest);
        hasher.update(params.pepper.as_bytes());
        digest = hasher.finalize();
    }
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_round_matches_plain_sha256() {
        let params = SecretParams::new("").with_cpu(1).with_ram(0);
        // sha256("abc0")
        let expected = hex::encode(Sha256::digest(b"abc0"));
        assert_eq!(hash_secret("abc", &params), expected);
    }

    #[test]
    fn hash_is_deterministic_and_hex() {
        let params = SecretParams::new("pepper");
        let a = hash_secret("hunter2", &params);
        let b = hash_secret("hunter2", &params);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn parameters_change_the_hash() {
        let base = SecretParams::new("p").with_cpu(2).with_ram(8);
        let h = hash_secret("x", &base);
        assert_ne!(h, hash_secret("x", &base.clone().with_cpu(3)));
        assert_ne!(h, hash_secret("x", &base.clone().with_ram(9)));
        assert_ne!(h, hash_secret("x", &SecretParams::new("q").with_cpu(2).with_ram(8)));
        assert_ne!(h, hash_secret("y", &base));
    }

    #[test]
    fn zero_cpu_is_one_round() {
        let one = SecretParams::new("p").with_cpu(1);
        let zero = SecretParams::new("p").with_cpu(0);
        assert_eq!(hash_secret("x", &one), hash_secret("x", &zero));
    }
}
