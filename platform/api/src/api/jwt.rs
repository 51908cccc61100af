use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use jwt::{Claims, Header, Token, VerifyWithKey};
use sha2::Sha256;

use crate::config::IdentityConfig;
use crate::global::ApiGlobal;

/// The caller as asserted by the identity provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
	/// The provider's id for the caller, the `sub` claim.
	pub subject: String,
	pub email: Option<String>,
	pub username: Option<String>,
	pub issued_at: DateTime<Utc>,
	pub expiration: Option<DateTime<Utc>>,
	pub not_before: Option<DateTime<Utc>>,
	pub audience: Option<String>,
}

pub trait JwtState: Sized {
	fn from_claims(claims: &Claims) -> Option<Self>;

	fn verify<G: ApiGlobal>(global: &Arc<G>, token: &str) -> Option<Self> {
		let config = global.config::<IdentityConfig>();

		let key = Hmac::<Sha256>::new_from_slice(config.secret.as_bytes()).ok()?;
		let token: Token<Header, Claims, _> = token.verify_with_key(&key).ok()?;

		let claims = token.claims();

		if claims.registered.issuer.as_ref() != Some(&config.issuer) {
			return None;
		}

		if config.audience.is_some() && claims.registered.audience != config.audience {
			return None;
		}

		let now = Utc::now();

		let iat = timestamp(claims.registered.issued_at?)?;
		if iat > now {
			return None;
		}

		if let Some(nbf) = claims.registered.not_before.and_then(timestamp) {
			if nbf > now {
				return None;
			}
		}

		if let Some(exp) = claims.registered.expiration.and_then(timestamp) {
			if exp < now {
				return None;
			}
		}

		Self::from_claims(claims)
	}
}

fn timestamp(secs: u64) -> Option<DateTime<Utc>> {
	Utc.timestamp_opt(secs as i64, 0).single()
}

impl JwtState for Identity {
	fn from_claims(claims: &Claims) -> Option<Self> {
		let private = |key: &str| claims.private.get(key).and_then(|v| v.as_str()).map(str::to_string);

		Some(Self {
			subject: claims.registered.subject.clone().filter(|s| !s.is_empty())?,
			email: private("email"),
			username: private("username"),
			issued_at: timestamp(claims.registered.issued_at?)?,
			expiration: claims.registered.expiration.and_then(timestamp),
			not_before: claims.registered.not_before.and_then(timestamp),
			audience: claims.registered.audience.clone(),
		})
	}
}
