//! Tax year 2025 rule table.
//!
//! Sources: Rev. Proc. 2024-40 inflation adjustments plus the 2025 standard
//! deduction amounts. All amounts in cents.

use rust_decimal_macros::dec;

use super::{
    AdoptionRules, AmtRules, ChildCreditRules, DependentCareRules, EducationRules, EitcRules,
    EitcTable, MedicareSurtaxRules, NiitRules, PremiumBreakpoint, PremiumRules, QbiRules, RuleSet,
    SaversRules, SaversTier, SeRules, StatusTable,
};
use crate::calc::brackets::BracketSchedule;
use crate::money::{Cents, from_dollars};

const fn d(dollars: i64) -> Cents {
    from_dollars(dollars)
}

fn ordinary_brackets() -> StatusTable<BracketSchedule> {
    StatusTable {
        single: BracketSchedule::from_steps(
            &[
                (d(11_925), dec!(0.10)),
                (d(48_475), dec!(0.12)),
                (d(103_350), dec!(0.22)),
                (d(197_300), dec!(0.24)),
                (d(250_525), dec!(0.32)),
                (d(626_350), dec!(0.35)),
            ],
            dec!(0.37),
        ),
        married_joint: BracketSchedule::from_steps(
            &[
                (d(23_850), dec!(0.10)),
                (d(96_950), dec!(0.12)),
                (d(206_700), dec!(0.22)),
                (d(394_600), dec!(0.24)),
                (d(501_050), dec!(0.32)),
                (d(751_600), dec!(0.35)),
            ],
            dec!(0.37),
        ),
        married_separate: BracketSchedule::from_steps(
            &[
                (d(11_925), dec!(0.10)),
                (d(48_475), dec!(0.12)),
                (d(103_350), dec!(0.22)),
                (d(197_300), dec!(0.24)),
                (d(250_525), dec!(0.32)),
                (d(375_800), dec!(0.35)),
            ],
            dec!(0.37),
        ),
        head_of_household: BracketSchedule::from_steps(
            &[
                (d(17_000), dec!(0.10)),
                (d(64_850), dec!(0.12)),
                (d(103_350), dec!(0.22)),
                (d(197_300), dec!(0.24)),
                (d(250_500), dec!(0.32)),
                (d(626_350), dec!(0.35)),
            ],
            dec!(0.37),
        ),
    }
}

fn capital_gains_brackets() -> StatusTable<BracketSchedule> {
    StatusTable {
        single: BracketSchedule::from_steps(
            &[(d(48_350), dec!(0)), (d(533_400), dec!(0.15))],
            dec!(0.20),
        ),
        married_joint: BracketSchedule::from_steps(
            &[(d(96_700), dec!(0)), (d(600_050), dec!(0.15))],
            dec!(0.20),
        ),
        married_separate: BracketSchedule::from_steps(
            &[(d(48_350), dec!(0)), (d(300_000), dec!(0.15))],
            dec!(0.20),
        ),
        head_of_household: BracketSchedule::from_steps(
            &[(d(64_750), dec!(0)), (d(566_700), dec!(0.15))],
            dec!(0.20),
        ),
    }
}

pub(super) fn rules() -> RuleSet {
    RuleSet {
        tax_year: 2025,
        brackets: ordinary_brackets(),
        capital_gains_brackets: capital_gains_brackets(),
        standard_deduction: StatusTable {
            single: d(15_750),
            married_joint: d(31_500),
            married_separate: d(15_750),
            head_of_household: d(23_625),
        },
        aged_blind_addon: StatusTable {
            single: d(2_000),
            married_joint: d(1_600),
            married_separate: d(1_600),
            head_of_household: d(2_000),
        },
        salt_cap: d(10_000),
        medical_agi_floor: dec!(0.075),
        nol_limit_rate: dec!(0.80),
        child_credit: ChildCreditRules {
            credit_per_child: d(2_200),
            other_dependent_credit: d(500),
            phaseout_threshold: StatusTable {
                single: d(200_000),
                married_joint: d(400_000),
                married_separate: d(200_000),
                head_of_household: d(200_000),
            },
            phaseout_per_thousand: d(50),
            refundable_limit_per_child: d(1_700),
            refundable_rate: dec!(0.15),
            earned_income_floor: d(2_500),
        },
        eitc: EitcRules {
            investment_income_limit: d(11_950),
            tables: [
                EitcTable {
                    phase_in_rate: dec!(0.0765),
                    earned_income_amount: d(8_490),
                    max_credit: d(649),
                    phaseout_rate: dec!(0.0765),
                    phaseout_threshold: d(10_620),
                    phaseout_threshold_mfj: d(17_730),
                },
                EitcTable {
                    phase_in_rate: dec!(0.34),
                    earned_income_amount: d(12_730),
                    max_credit: d(4_328),
                    phaseout_rate: dec!(0.1598),
                    phaseout_threshold: d(23_350),
                    phaseout_threshold_mfj: d(30_470),
                },
                EitcTable {
                    phase_in_rate: dec!(0.40),
                    earned_income_amount: d(17_880),
                    max_credit: d(7_152),
                    phaseout_rate: dec!(0.2106),
                    phaseout_threshold: d(23_350),
                    phaseout_threshold_mfj: d(30_470),
                },
                EitcTable {
                    phase_in_rate: dec!(0.45),
                    earned_income_amount: d(17_880),
                    max_credit: d(8_046),
                    phaseout_rate: dec!(0.2106),
                    phaseout_threshold: d(23_350),
                    phaseout_threshold_mfj: d(30_470),
                },
            ],
        },
        education: EducationRules {
            aotc_first_tier: d(2_000),
            aotc_second_rate: dec!(0.25),
            aotc_second_tier: d(2_000),
            aotc_refundable_share: dec!(0.40),
            llc_rate: dec!(0.20),
            llc_expense_cap: d(10_000),
            phaseout_start: d(80_000),
            phaseout_end: d(90_000),
            phaseout_start_mfj: d(160_000),
            phaseout_end_mfj: d(180_000),
        },
        dependent_care: DependentCareRules {
            expense_cap_one: d(3_000),
            expense_cap_two_or_more: d(6_000),
            base_rate: dec!(0.35),
            min_rate: dec!(0.20),
            agi_threshold: d(15_000),
            agi_step: d(2_000),
            rate_step: dec!(0.01),
        },
        savers: SaversRules {
            contribution_cap: d(2_000),
            tiers: StatusTable {
                single: savers_tiers(d(23_750), d(25_500), d(39_500)),
                married_joint: savers_tiers(d(47_500), d(51_000), d(79_000)),
                married_separate: savers_tiers(d(23_750), d(25_500), d(39_500)),
                head_of_household: savers_tiers(d(35_625), d(38_250), d(59_250)),
            },
        },
        qbi: QbiRules {
            rate: dec!(0.20),
            threshold: StatusTable {
                single: d(197_300),
                married_joint: d(394_600),
                married_separate: d(197_300),
                head_of_household: d(197_300),
            },
            phase_in_range: StatusTable {
                single: d(50_000),
                married_joint: d(100_000),
                married_separate: d(50_000),
                head_of_household: d(50_000),
            },
            w2_wage_rate: dec!(0.50),
            w2_wage_ubia_rate: dec!(0.25),
            ubia_rate: dec!(0.025),
        },
        adoption: AdoptionRules {
            max_per_child: d(17_280),
            phaseout_start: d(259_190),
            phaseout_end: d(299_190),
        },
        premium: PremiumRules {
            breakpoints: vec![
                PremiumBreakpoint {
                    fpl_ratio: dec!(1.50),
                    rate: dec!(0),
                },
                PremiumBreakpoint {
                    fpl_ratio: dec!(2.00),
                    rate: dec!(0.02),
                },
                PremiumBreakpoint {
                    fpl_ratio: dec!(2.50),
                    rate: dec!(0.04),
                },
                PremiumBreakpoint {
                    fpl_ratio: dec!(3.00),
                    rate: dec!(0.06),
                },
                PremiumBreakpoint {
                    fpl_ratio: dec!(4.00),
                    rate: dec!(0.085),
                },
            ],
        },
        self_employment: SeRules {
            wage_base: d(176_100),
            social_security_rate: dec!(0.124),
            medicare_rate: dec!(0.029),
            net_earnings_factor: dec!(0.9235),
            deduction_factor: dec!(0.50),
            min_threshold: d(400),
        },
        niit: NiitRules {
            rate: dec!(0.038),
            agi_threshold: StatusTable {
                single: d(200_000),
                married_joint: d(250_000),
                married_separate: d(125_000),
                head_of_household: d(200_000),
            },
        },
        additional_medicare: MedicareSurtaxRules {
            rate: dec!(0.009),
            threshold: StatusTable {
                single: d(200_000),
                married_joint: d(250_000),
                married_separate: d(125_000),
                head_of_household: d(200_000),
            },
        },
        amt: AmtRules {
            exemption: StatusTable {
                single: d(88_100),
                married_joint: d(137_000),
                married_separate: d(68_500),
                head_of_household: d(88_100),
            },
            exemption_phaseout_threshold: StatusTable {
                single: d(626_350),
                married_joint: d(1_252_700),
                married_separate: d(626_350),
                head_of_household: d(626_350),
            },
            exemption_phaseout_rate: dec!(0.25),
            low_rate: dec!(0.26),
            high_rate: dec!(0.28),
            rate_breakpoint: StatusTable {
                single: d(239_100),
                married_joint: d(239_100),
                married_separate: d(119_550),
                head_of_household: d(239_100),
            },
        },
    }
}

fn savers_tiers(
    full: Cents,
    mid: Cents,
    upper: Cents,
) -> [SaversTier; 3] {
    [
        SaversTier {
            agi_limit: full,
            rate: dec!(0.50),
        },
        SaversTier {
            agi_limit: mid,
            rate: dec!(0.20),
        },
        SaversTier {
            agi_limit: upper,
            rate: dec!(0.10),
        },
    ]
}
