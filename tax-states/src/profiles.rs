//! 2025 state profiles.
//!
//! Each function builds one state's declarative profile. Flat-tax and
//! no-tax states are one-liners; progressive states carry their bracket
//! schedules per filing status. Amounts in cents.

use std::collections::BTreeMap;

use rust_decimal_macros::dec;
use tax_engine::calc::BracketSchedule;
use tax_engine::money::{from_dollars, Cents};
use tax_engine::rules::StatusTable;

use crate::special::WashingtonExcise;
use crate::strategy::{
    DeductionRule, EitcMatch, ProfileCalculator, StateCalculator, StateProfile, Surtax, TaxBase,
    TaxShape,
};

const fn d(dollars: i64) -> Cents {
    from_dollars(dollars)
}

fn untaxed(code: &'static str, name: &'static str) -> StateProfile {
    StateProfile {
        code,
        name,
        tax_year: 2025,
        base: TaxBase::FederalAgi,
        shape: TaxShape::Untaxed,
        deduction: DeductionRule::None,
        exemption_per_dependent: 0,
        surtax: None,
        eitc_match: None,
        county_rates: BTreeMap::new(),
    }
}

fn texas() -> StateProfile {
    untaxed("TX", "Texas")
}

fn florida() -> StateProfile {
    untaxed("FL", "Florida")
}

/// Colorado: flat rate on federal taxable income.
fn colorado() -> StateProfile {
    StateProfile {
        code: "CO",
        name: "Colorado",
        tax_year: 2025,
        base: TaxBase::FederalTaxableIncome,
        shape: TaxShape::Flat(dec!(0.044)),
        deduction: DeductionRule::None,
        exemption_per_dependent: 0,
        surtax: None,
        eitc_match: Some(EitcMatch {
            rate: dec!(0.38),
            refundable: true,
        }),
        county_rates: BTreeMap::new(),
    }
}

fn illinois() -> StateProfile {
    StateProfile {
        code: "IL",
        name: "Illinois",
        tax_year: 2025,
        base: TaxBase::FederalAgi,
        shape: TaxShape::Flat(dec!(0.0495)),
        deduction: DeductionRule::Fixed(StatusTable {
            single: d(2_850),
            married_joint: d(5_700),
            married_separate: d(2_850),
            head_of_household: d(2_850),
        }),
        exemption_per_dependent: d(2_850),
        surtax: None,
        eitc_match: Some(EitcMatch {
            rate: dec!(0.20),
            refundable: true,
        }),
        county_rates: BTreeMap::new(),
    }
}

/// Pennsylvania: flat rate, no deduction or exemptions.
fn pennsylvania() -> StateProfile {
    StateProfile {
        code: "PA",
        name: "Pennsylvania",
        tax_year: 2025,
        base: TaxBase::FederalAgi,
        shape: TaxShape::Flat(dec!(0.0307)),
        deduction: DeductionRule::None,
        exemption_per_dependent: 0,
        surtax: None,
        eitc_match: None,
        county_rates: BTreeMap::new(),
    }
}

/// Indiana: flat state rate plus county income taxes.
fn indiana() -> StateProfile {
    let mut counties = BTreeMap::new();
    counties.insert("marion".to_string(), dec!(0.0202));
    counties.insert("hamilton".to_string(), dec!(0.011));
    counties.insert("allen".to_string(), dec!(0.0148));
    StateProfile {
        code: "IN",
        name: "Indiana",
        tax_year: 2025,
        base: TaxBase::FederalAgi,
        shape: TaxShape::Flat(dec!(0.03)),
        deduction: DeductionRule::None,
        exemption_per_dependent: d(1_500),
        surtax: None,
        eitc_match: Some(EitcMatch {
            rate: dec!(0.10),
            refundable: true,
        }),
        county_rates: counties,
    }
}

/// Massachusetts: flat rate with the millionaire surtax.
fn massachusetts() -> StateProfile {
    StateProfile {
        code: "MA",
        name: "Massachusetts",
        tax_year: 2025,
        base: TaxBase::FederalAgi,
        shape: TaxShape::Flat(dec!(0.05)),
        deduction: DeductionRule::None,
        exemption_per_dependent: d(1_000),
        surtax: Some(Surtax {
            threshold: d(1_083_150),
            rate: dec!(0.04),
        }),
        eitc_match: Some(EitcMatch {
            rate: dec!(0.40),
            refundable: true,
        }),
        county_rates: BTreeMap::new(),
    }
}

/// California: progressive schedule, 1% mental health surtax over $1M,
/// refundable CalEITC.
fn california() -> StateProfile {
    let single = BracketSchedule::from_steps(
        &[
            (d(10_756), dec!(0.01)),
            (d(25_499), dec!(0.02)),
            (d(40_245), dec!(0.04)),
            (d(55_866), dec!(0.06)),
            (d(70_606), dec!(0.08)),
            (d(360_659), dec!(0.093)),
            (d(432_787), dec!(0.103)),
            (d(721_314), dec!(0.113)),
        ],
        dec!(0.123),
    );
    let joint = BracketSchedule::from_steps(
        &[
            (d(21_512), dec!(0.01)),
            (d(50_998), dec!(0.02)),
            (d(80_490), dec!(0.04)),
            (d(111_732), dec!(0.06)),
            (d(141_212), dec!(0.08)),
            (d(721_318), dec!(0.093)),
            (d(865_574), dec!(0.103)),
            (d(1_442_628), dec!(0.113)),
        ],
        dec!(0.123),
    );
    StateProfile {
        code: "CA",
        name: "California",
        tax_year: 2025,
        base: TaxBase::FederalAgi,
        shape: TaxShape::Progressive(StatusTable {
            single: single.clone(),
            married_joint: joint,
            married_separate: single.clone(),
            head_of_household: single,
        }),
        deduction: DeductionRule::Fixed(StatusTable {
            single: d(5_540),
            married_joint: d(11_080),
            married_separate: d(5_540),
            head_of_household: d(11_080),
        }),
        exemption_per_dependent: d(446),
        surtax: Some(Surtax {
            threshold: d(1_000_000),
            rate: dec!(0.01),
        }),
        eitc_match: Some(EitcMatch {
            rate: dec!(0.85),
            refundable: true,
        }),
        county_rates: BTreeMap::new(),
    }
}

fn new_york() -> StateProfile {
    let single = BracketSchedule::from_steps(
        &[
            (d(8_500), dec!(0.04)),
            (d(11_700), dec!(0.045)),
            (d(13_900), dec!(0.0525)),
            (d(80_650), dec!(0.055)),
            (d(215_400), dec!(0.06)),
            (d(1_077_550), dec!(0.0685)),
            (d(5_000_000), dec!(0.0965)),
            (d(25_000_000), dec!(0.103)),
        ],
        dec!(0.109),
    );
    let joint = BracketSchedule::from_steps(
        &[
            (d(17_150), dec!(0.04)),
            (d(23_600), dec!(0.045)),
            (d(27_900), dec!(0.0525)),
            (d(161_550), dec!(0.055)),
            (d(323_200), dec!(0.06)),
            (d(2_155_350), dec!(0.0685)),
            (d(5_000_000), dec!(0.0965)),
            (d(25_000_000), dec!(0.103)),
        ],
        dec!(0.109),
    );
    StateProfile {
        code: "NY",
        name: "New York",
        tax_year: 2025,
        base: TaxBase::FederalAgi,
        shape: TaxShape::Progressive(StatusTable {
            single: single.clone(),
            married_joint: joint,
            married_separate: single.clone(),
            head_of_household: single,
        }),
        deduction: DeductionRule::Fixed(StatusTable {
            single: d(8_000),
            married_joint: d(16_050),
            married_separate: d(8_000),
            head_of_household: d(11_200),
        }),
        exemption_per_dependent: d(1_000),
        surtax: None,
        eitc_match: Some(EitcMatch {
            rate: dec!(0.30),
            refundable: true,
        }),
        county_rates: BTreeMap::new(),
    }
}

/// Maryland: progressive state schedule plus county income taxes.
fn maryland() -> StateProfile {
    let single = BracketSchedule::from_steps(
        &[
            (d(1_000), dec!(0.02)),
            (d(2_000), dec!(0.03)),
            (d(3_000), dec!(0.04)),
            (d(100_000), dec!(0.0475)),
            (d(125_000), dec!(0.05)),
            (d(150_000), dec!(0.0525)),
            (d(250_000), dec!(0.055)),
        ],
        dec!(0.0575),
    );
    let joint = BracketSchedule::from_steps(
        &[
            (d(1_000), dec!(0.02)),
            (d(2_000), dec!(0.03)),
            (d(3_000), dec!(0.04)),
            (d(150_000), dec!(0.0475)),
            (d(175_000), dec!(0.05)),
            (d(225_000), dec!(0.0525)),
            (d(300_000), dec!(0.055)),
        ],
        dec!(0.0575),
    );
    let mut counties = BTreeMap::new();
    counties.insert("montgomery".to_string(), dec!(0.032));
    counties.insert("baltimore".to_string(), dec!(0.032));
    counties.insert("anne arundel".to_string(), dec!(0.0281));
    StateProfile {
        code: "MD",
        name: "Maryland",
        tax_year: 2025,
        base: TaxBase::FederalAgi,
        shape: TaxShape::Progressive(StatusTable {
            single: single.clone(),
            married_joint: joint.clone(),
            married_separate: single,
            head_of_household: joint,
        }),
        deduction: DeductionRule::Fixed(StatusTable {
            single: d(2_700),
            married_joint: d(5_450),
            married_separate: d(2_700),
            head_of_household: d(2_700),
        }),
        exemption_per_dependent: d(3_200),
        surtax: None,
        eitc_match: Some(EitcMatch {
            rate: dec!(0.45),
            refundable: true,
        }),
        county_rates: counties,
    }
}

/// Wisconsin: progressive schedule with a sliding standard deduction that
/// phases out as income rises.
fn wisconsin() -> StateProfile {
    let single = BracketSchedule::from_steps(
        &[
            (d(14_680), dec!(0.035)),
            (d(29_370), dec!(0.044)),
            (d(323_290), dec!(0.053)),
        ],
        dec!(0.0765),
    );
    let joint = BracketSchedule::from_steps(
        &[
            (d(19_580), dec!(0.035)),
            (d(39_150), dec!(0.044)),
            (d(431_060), dec!(0.053)),
        ],
        dec!(0.0765),
    );
    StateProfile {
        code: "WI",
        name: "Wisconsin",
        tax_year: 2025,
        base: TaxBase::FederalAgi,
        shape: TaxShape::Progressive(StatusTable {
            single: single.clone(),
            married_joint: joint.clone(),
            married_separate: single.clone(),
            head_of_household: single,
        }),
        deduction: DeductionRule::PhaseOut {
            max: StatusTable {
                single: d(13_230),
                married_joint: d(24_490),
                married_separate: d(11_630),
                head_of_household: d(13_230),
            },
            threshold: StatusTable {
                single: d(19_110),
                married_joint: d(27_630),
                married_separate: d(13_110),
                head_of_household: d(19_110),
            },
            rate: dec!(0.1216),
        },
        exemption_per_dependent: d(700),
        surtax: None,
        eitc_match: Some(EitcMatch {
            rate: dec!(0.11),
            refundable: true,
        }),
        county_rates: BTreeMap::new(),
    }
}

/// Every built-in state calculator for 2025.
pub fn all_2025() -> Vec<Box<dyn StateCalculator>> {
    vec![
        Box::new(ProfileCalculator::new(texas())),
        Box::new(ProfileCalculator::new(florida())),
        Box::new(ProfileCalculator::new(colorado())),
        Box::new(ProfileCalculator::new(illinois())),
        Box::new(ProfileCalculator::new(pennsylvania())),
        Box::new(ProfileCalculator::new(indiana())),
        Box::new(ProfileCalculator::new(massachusetts())),
        Box::new(ProfileCalculator::new(california())),
        Box::new(ProfileCalculator::new(new_york())),
        Box::new(ProfileCalculator::new(maryland())),
        Box::new(ProfileCalculator::new(wisconsin())),
        Box::new(WashingtonExcise::new_2025()),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn all_codes_are_unique() {
        let calculators = all_2025();
        let codes: BTreeSet<_> = calculators.iter().map(|c| c.code().to_string()).collect();

        assert_eq!(codes.len(), calculators.len());
    }

    #[test]
    fn twelve_states_are_built_in() {
        assert_eq!(all_2025().len(), 12);
    }
}
