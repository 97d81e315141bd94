use serde::{Deserialize, Serialize};

/// Federal filing status.
///
/// The four statuses the engine distinguishes. Qualifying surviving spouses
/// file under the married-filing-jointly tables and are represented as such.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingStatus {
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
}

impl FilingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedFilingJointly => "MFJ",
            Self::MarriedFilingSeparately => "MFS",
            Self::HeadOfHousehold => "HOH",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "S" => Some(Self::Single),
            "MFJ" => Some(Self::MarriedFilingJointly),
            "MFS" => Some(Self::MarriedFilingSeparately),
            "HOH" => Some(Self::HeadOfHousehold),
            _ => None,
        }
    }

    /// Whether the status is one of the two married statuses.
    pub fn is_married(&self) -> bool {
        matches!(
            self,
            Self::MarriedFilingJointly | Self::MarriedFilingSeparately
        )
    }

    pub const ALL: [FilingStatus; 4] = [
        Self::Single,
        Self::MarriedFilingJointly,
        Self::MarriedFilingSeparately,
        Self::HeadOfHousehold,
    ];
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn as_str_round_trips_through_parse() {
        for status in FilingStatus::ALL {
            assert_eq!(FilingStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn parse_rejects_unknown_codes() {
        assert_eq!(FilingStatus::parse("QSS"), None);
        assert_eq!(FilingStatus::parse(""), None);
    }

    #[test]
    fn married_statuses_are_flagged() {
        assert!(FilingStatus::MarriedFilingJointly.is_married());
        assert!(FilingStatus::MarriedFilingSeparately.is_married());
        assert!(!FilingStatus::Single.is_married());
        assert!(!FilingStatus::HeadOfHousehold.is_married());
    }
}
