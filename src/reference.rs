//! Static reference data published by the card API.

// self
use crate::_prelude::*;

/// ISO 3166-1 alpha-2 codes of the countries cards can be issued in.
pub const COUNTRIES: &[&str] = &[
	"AX", "AL", "AD", "AI", "AG", "AR", "AM", "AW", "AU", "AT", "AZ", "BS", "BH", "BB", "BY", "BE",
	"BZ", "BM", "BT", "BQ", "BA", "BR", "BN", "BG", "CA", "KY", "CL", "CN", "CO", "CR", "HR", "CY",
	"CZ", "DK", "DM", "DO", "EC", "SV", "EE", "FK", "FO", "FI", "FR", "GF", "GE", "DE", "GI", "GR",
	"GL", "GD", "GP", "GT", "GG", "GY", "HK", "HU", "IS", "ID", "IE", "IM", "IL", "IT", "JM", "JP",
	"JE", "JO", "KZ", "KR", "QZ", "KW", "LV", "LI", "LT", "LU", "MK", "MY", "MV", "MT", "MQ", "MU",
	"MX", "MD", "MC", "MN", "ME", "MA", "NP", "NL", "NZ", "NI", "NO", "OM", "PA", "PG", "PY", "PE",
	"PH", "PL", "PT", "QA", "RO", "RU", "BL", "KN", "LC", "MF", "VC", "SM", "SA", "RS", "SC", "SG",
	"SX", "SK", "SI", "SB", "ZA", "ES", "SR", "SE", "CH", "TW", "TH", "TT", "TR", "TC", "UA", "AE",
	"GB", "UY", "VG",
];

/// Returns `true` if cards can be issued in `code` (case-insensitive).
pub fn is_supported_country(code: &str) -> bool {
	COUNTRIES.iter().any(|country| country.eq_ignore_ascii_case(code))
}

macro_rules! def_card_status {
	($($variant:ident => $code:literal, $doc:literal;)+) => {
		/// Card status codes understood by the status-change endpoint.
		#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "&'static str")]
		pub enum CardStatus {
			$(
				#[doc = $doc]
				$variant,
			)+
		}
		impl CardStatus {
			/// Every status, in the card API's documented order.
			pub const ALL: &'static [CardStatus] = &[$(CardStatus::$variant),+];

			/// Returns the wire code.
			pub const fn as_str(self) -> &'static str {
				match self {
					$(CardStatus::$variant => $code,)+
				}
			}
		}
	};
}

def_card_status! {
	ReadyToActive => "READY_TO_ACTIVE", "Issued, awaiting activation.";
	ReadyForAe => "READY_FOR_AE", "Ready for account enablement.";
	IntermediateAssignment => "Intermediate_Assignment", "Assigned, pending completion.";
	Active => "ACTIVE", "Usable.";
	Expired => "EXPIRED", "Past its expiry date.";
	Lost => "LOST", "Reported lost.";
	Stolen => "STOLEN", "Reported stolen.";
	Destroyed => "DESTROYED", "Destroyed.";
	Damaged => "DAMAGED", "Damaged.";
	Dormant => "DORMANT", "Inactive for an extended period.";
	Closed => "CLOSED", "Closed.";
	Replaced => "REPLACED", "Superseded by a replacement card.";
	Suspended => "SUSPENDED", "Temporarily suspended.";
	Sactive => "SACTIVE", "Active after suspension.";
	Revoked => "REVOKED", "Revoked.";
	Cclosed => "CCLOSED", "Closed by the cardholder.";
	Mbclosed => "MBCLOSED", "Closed by the member bank.";
	Fraud => "FRAUD", "Blocked for confirmed fraud.";
	Pfraud => "PFRAUD", "Blocked for suspected fraud.";
	Chargeoff => "CHARGEOFF", "Charged off.";
	Deceased => "DECEASED", "Cardholder deceased.";
	Warning => "WARNING", "Flagged with a warning.";
	Muclosed => "MUCLOSED", "Closed by the program manager.";
	Void => "VOID", "Voided.";
	Nonrenewal => "NONRENEWAL", "Will not be renewed.";
	LastStmt => "LAST_STMT", "Final statement issued.";
	Inactive => "INACTIVE", "Inactive.";
	Blocked => "BLOCKED", "Blocked.";
	Deactivate => "DEACTIVATE", "Deactivation request.";
	Enable => "ENABLE", "Enable request.";
	Unsuspend => "UNSUSPEND", "Lift a suspension.";
}

/// Error returned when a status code is not recognized.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Card status `{0}` is not recognized.")]
pub struct UnknownCardStatus(pub String);

impl Display for CardStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for CardStatus {
	type Err = UnknownCardStatus;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		CardStatus::ALL
			.iter()
			.copied()
			.find(|status| status.as_str() == s)
			.ok_or_else(|| UnknownCardStatus(s.to_owned()))
	}
}
impl TryFrom<String> for CardStatus {
	type Error = UnknownCardStatus;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}
impl From<CardStatus> for &'static str {
	fn from(value: CardStatus) -> Self {
		value.as_str()
	}
}
