//! Strongly typed identifiers enforced across the broker domain.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal, $validate:path) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				$validate($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				$validate($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 64;
// u64::MAX has 20 decimal digits.
const STEAM_ID_MAX_DIGITS: usize = 20;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (provider, steam).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (provider, steam).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (provider, steam).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
	/// The identifier must be a decimal numeral.
	#[error("{kind} identifier must contain only ASCII digits.")]
	NotNumeric {
		/// Kind of identifier (provider, steam).
		kind: &'static str,
	},
}

def_id! {
	ProviderId,
	"Identifier under which a provider registers with the host.",
	"Provider",
	validate_view
}
def_id! {
	SteamId,
	"Decimal SteamID confirmed by Steam's OpenID endpoint.",
	"Steam",
	validate_numeral
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

fn validate_numeral(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if !view.bytes().all(|b| b.is_ascii_digit()) {
		return Err(IdentifierError::NotNumeric { kind });
	}
	if view.len() > STEAM_ID_MAX_DIGITS {
		return Err(IdentifierError::TooLong { kind, max: STEAM_ID_MAX_DIGITS });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	#[test]
	fn provider_identifiers_validate() {
		assert!(ProviderId::new(" steam").is_err(), "Leading whitespace must be rejected.");
		assert!(ProviderId::new("").is_err());
		assert!(ProviderId::new("a".repeat(IDENTIFIER_MAX_LEN + 1)).is_err());

		let provider = ProviderId::new("steam").expect("Provider fixture should be valid.");

		assert_eq!(provider.as_ref(), "steam");
		assert_eq!(format!("{provider:?}"), "Provider(steam)");
	}

	#[test]
	fn steam_ids_must_be_ascii_numerals() {
		let steam_id =
			SteamId::new("76561197960287930").expect("SteamID fixture should be valid.");

		assert_eq!(&*steam_id, "76561197960287930");
		assert!(matches!(SteamId::new(""), Err(IdentifierError::Empty { .. })));
		assert!(matches!(SteamId::new("7656x"), Err(IdentifierError::NotNumeric { .. })));
		// Arabic-Indic digits are numeric in Unicode but not ASCII.
		assert!(matches!(SteamId::new("٧٦٥"), Err(IdentifierError::NotNumeric { .. })));
		assert!(matches!(
			SteamId::new("1".repeat(STEAM_ID_MAX_DIGITS + 1)),
			Err(IdentifierError::TooLong { .. })
		));
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let steam_id: SteamId = serde_json::from_str("\"76561197960287930\"")
			.expect("SteamID should deserialize successfully.");

		assert_eq!(steam_id.as_ref(), "76561197960287930");
		assert!(serde_json::from_str::<SteamId>("\"not-a-number\"").is_err());
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<SteamId, u8> = HashMap::from_iter([(
			SteamId::new("76561197960287930").expect("SteamID used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("76561197960287930"), Some(&7));
	}
}
