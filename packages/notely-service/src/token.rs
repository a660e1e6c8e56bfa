use uuid::Uuid;

/// A fresh bearer token: 64 lowercase hex characters drawn from two v4 UUIDs.
pub(crate) fn generate() -> String {
	format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// The form a token is stored in. The raw token never reaches the store.
pub(crate) fn digest(token: &str) -> String {
	blake3::hash(token.as_bytes()).to_hex().to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tokens_are_unique_hex() {
		let a = generate();
		let b = generate();

		assert_eq!(a.len(), 64);
		assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
		assert_ne!(a, b);
	}

	#[test]
	fn digest_is_stable_and_hides_the_token() {
		let token = generate();

		assert_eq!(digest(&token), digest(&token));
		assert_ne!(digest(&token), token);
		assert_eq!(digest(&token).len(), 64);
	}
}
