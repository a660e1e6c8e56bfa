//! Argon2id password hashing in PHC string form.

use argon2::{
	Argon2,
	password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::{Error, Result};

pub(crate) fn hash_password(password: &str) -> Result<String> {
	let salt = SaltString::generate(&mut OsRng);
	let hash = Argon2::default().hash_password(password.as_bytes(), &salt).map_err(|err| {
		Error::Storage { message: format!("Failed to hash password: {err}.") }
	})?;

	Ok(hash.to_string())
}

/// Returns `false` on mismatch and on a stored hash that does not parse.
pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
	let Ok(parsed) = PasswordHash::new(hash) else {
		tracing::warn!("Stored password hash is not a valid PHC string.");

		return false;
	};

	Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn verifies_only_the_hashed_password() {
		let hash = hash_password("correct horse").expect("Failed to hash password.");

		assert!(hash.starts_with("$argon2id$"));
		assert!(verify_password("correct horse", &hash));
		assert!(!verify_password("battery staple", &hash));
		assert!(!verify_password("correct horse", "not-a-hash"));
	}
}
