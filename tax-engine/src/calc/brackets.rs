//! Progressive bracket tax calculator.
//!
//! One generic marginal-walk evaluator shared by the federal ordinary and
//! preferential-rate schedules and by every progressive-rate state. A
//! [`BracketSchedule`] is a non-overlapping, gap-free, ascending sequence
//! whose first lower bound is zero and whose last bracket is unbounded; the
//! invariant is enforced at construction so `tax_for` never fails.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::{Cents, mul_rate, sum};

/// One tax bracket: `[min, max)` bounds in cents, decimal rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub min: Cents,
    /// `None` for the unbounded top bracket.
    pub max: Option<Cents>,
    pub rate: Decimal,
}

/// Errors rejected by [`BracketSchedule::new`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("bracket schedule is empty")]
    Empty,

    #[error("first bracket must start at 0, got {0}")]
    FirstNotZero(Cents),

    #[error("bracket starting at {min} does not continue from previous bound {prev_max}")]
    Gap { prev_max: Cents, min: Cents },

    #[error("bracket starting at {0} has max <= min")]
    EmptySpan(Cents),

    #[error("only the last bracket may be unbounded")]
    UnboundedMiddle,

    #[error("last bracket must be unbounded")]
    BoundedTop,
}

/// An ordered, validated bracket list for one filing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSchedule {
    brackets: Vec<Bracket>,
}

impl BracketSchedule {
    /// Validates and wraps an ordered bracket list.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] if the list is empty, does not start at
    /// zero, has gaps or overlaps, or is not terminated by an unbounded
    /// bracket.
    pub fn new(brackets: Vec<Bracket>) -> Result<Self, ScheduleError> {
        let Some(first) = brackets.first() else {
            return Err(ScheduleError::Empty);
        };
        if first.min != 0 {
            return Err(ScheduleError::FirstNotZero(first.min));
        }
        for (i, bracket) in brackets.iter().enumerate() {
            let is_last = i + 1 == brackets.len();
            match bracket.max {
                None if !is_last => return Err(ScheduleError::UnboundedMiddle),
                Some(max) if max <= bracket.min => {
                    return Err(ScheduleError::EmptySpan(bracket.min));
                }
                Some(_) if is_last => return Err(ScheduleError::BoundedTop),
                _ => {}
            }
            if i > 0 {
                // Unwrap is safe: every non-last bracket was checked bounded.
                let prev_max = brackets[i - 1].max.unwrap_or(0);
                if bracket.min != prev_max {
                    return Err(ScheduleError::Gap {
                        prev_max,
                        min: bracket.min,
                    });
                }
            }
        }
        Ok(Self { brackets })
    }

    /// Builds a schedule from ascending `(upper_bound, rate)` steps plus the
    /// rate of the unbounded top bracket.
    ///
    /// Contiguity holds by construction: each bracket's lower bound is the
    /// previous step's upper bound. Used for in-code rule tables.
    pub fn from_steps(
        steps: &[(Cents, Decimal)],
        top_rate: Decimal,
    ) -> Self {
        let mut brackets = Vec::with_capacity(steps.len() + 1);
        let mut lower = 0;
        for &(upper, rate) in steps {
            brackets.push(Bracket {
                min: lower,
                max: Some(upper),
                rate,
            });
            lower = upper;
        }
        brackets.push(Bracket {
            min: lower,
            max: None,
            rate: top_rate,
        });
        Self { brackets }
    }

    /// A single flat-rate schedule.
    pub fn flat(rate: Decimal) -> Self {
        Self::from_steps(&[], rate)
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    /// Marginal rate of the unbounded top bracket.
    pub fn top_rate(&self) -> Decimal {
        // Non-empty by construction.
        self.brackets
            .last()
            .map(|b| b.rate)
            .unwrap_or(Decimal::ZERO)
    }

    /// Tax on `income` by the marginal walk.
    ///
    /// Walks brackets in ascending order, taxing the slice of income that
    /// falls inside each. Income at or below zero is taxed at zero. The
    /// result is monotone in income, never exceeds income, and implies an
    /// effective rate no greater than the top marginal rate.
    pub fn tax_for(
        &self,
        income: i64,
    ) -> Cents {
        if income <= 0 {
            return 0;
        }
        sum(self.brackets.iter().map(|bracket| {
            let upper = bracket.max.unwrap_or(income).min(income);
            let span = upper - bracket.min;
            if span > 0 {
                mul_rate(span, bracket.rate)
            } else {
                0
            }
        }))
    }
}

/// Stacked preferential-rate computation for qualified dividends and net
/// long-term capital gain.
///
/// The preferential slice sits on top of ordinary income: ordinary brackets
/// tax the ordinary slice, and the preferential schedule taxes the band from
/// the top of the ordinary slice to total taxable income. The result never
/// exceeds the all-ordinary tax.
#[derive(Debug, Clone)]
pub struct QualifiedRateWorksheet<'a> {
    ordinary: &'a BracketSchedule,
    preferential: &'a BracketSchedule,
}

impl<'a> QualifiedRateWorksheet<'a> {
    pub fn new(
        ordinary: &'a BracketSchedule,
        preferential: &'a BracketSchedule,
    ) -> Self {
        Self {
            ordinary,
            preferential,
        }
    }

    /// Tax on `taxable_income` of which `preferential_income` is taxed at
    /// the preferential rates.
    pub fn tax_for(
        &self,
        taxable_income: Cents,
        preferential_income: Cents,
    ) -> Cents {
        if taxable_income <= 0 {
            return 0;
        }
        let preferential = preferential_income.clamp(0, taxable_income);
        if preferential == 0 {
            return self.ordinary.tax_for(taxable_income);
        }
        let ordinary_slice = taxable_income - preferential;
        let ordinary_tax = self.ordinary.tax_for(ordinary_slice);
        let preferential_tax =
            self.preferential.tax_for(taxable_income) - self.preferential.tax_for(ordinary_slice);
        (ordinary_tax + preferential_tax).min(self.ordinary.tax_for(taxable_income))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::money::from_dollars;

    /// 2025 single ordinary schedule.
    fn single_schedule() -> BracketSchedule {
        BracketSchedule::from_steps(
            &[
                (from_dollars(11_925), dec!(0.10)),
                (from_dollars(48_475), dec!(0.12)),
                (from_dollars(103_350), dec!(0.22)),
                (from_dollars(197_300), dec!(0.24)),
                (from_dollars(250_525), dec!(0.32)),
                (from_dollars(626_350), dec!(0.35)),
            ],
            dec!(0.37),
        )
    }

    fn single_cg_schedule() -> BracketSchedule {
        BracketSchedule::from_steps(
            &[
                (from_dollars(48_350), dec!(0)),
                (from_dollars(533_400), dec!(0.15)),
            ],
            dec!(0.20),
        )
    }

    // =========================================================================
    // validation tests
    // =========================================================================

    #[test]
    fn new_accepts_valid_schedule() {
        let result = BracketSchedule::new(vec![
            Bracket {
                min: 0,
                max: Some(100),
                rate: dec!(0.10),
            },
            Bracket {
                min: 100,
                max: None,
                rate: dec!(0.20),
            },
        ]);

        assert!(result.is_ok());
    }

    #[test]
    fn new_rejects_empty_list() {
        assert_eq!(BracketSchedule::new(vec![]), Err(ScheduleError::Empty));
    }

    #[test]
    fn new_rejects_nonzero_start() {
        let result = BracketSchedule::new(vec![Bracket {
            min: 100,
            max: None,
            rate: dec!(0.10),
        }]);

        assert_eq!(result, Err(ScheduleError::FirstNotZero(100)));
    }

    #[test]
    fn new_rejects_gap() {
        let result = BracketSchedule::new(vec![
            Bracket {
                min: 0,
                max: Some(100),
                rate: dec!(0.10),
            },
            Bracket {
                min: 200,
                max: None,
                rate: dec!(0.20),
            },
        ]);

        assert_eq!(
            result,
            Err(ScheduleError::Gap {
                prev_max: 100,
                min: 200
            })
        );
    }

    #[test]
    fn new_rejects_bounded_top() {
        let result = BracketSchedule::new(vec![Bracket {
            min: 0,
            max: Some(100),
            rate: dec!(0.10),
        }]);

        assert_eq!(result, Err(ScheduleError::BoundedTop));
    }

    #[test]
    fn new_rejects_unbounded_middle() {
        let result = BracketSchedule::new(vec![
            Bracket {
                min: 0,
                max: None,
                rate: dec!(0.10),
            },
            Bracket {
                min: 100,
                max: None,
                rate: dec!(0.20),
            },
        ]);

        assert_eq!(result, Err(ScheduleError::UnboundedMiddle));
    }

    #[test]
    fn from_steps_is_contiguous_and_validates() {
        let schedule = single_schedule();

        assert!(BracketSchedule::new(schedule.brackets().to_vec()).is_ok());
        assert_eq!(schedule.top_rate(), dec!(0.37));
    }

    // =========================================================================
    // tax_for tests
    // =========================================================================

    #[test]
    fn tax_for_zero_or_negative_income_is_zero() {
        let schedule = single_schedule();

        assert_eq!(schedule.tax_for(0), 0);
        assert_eq!(schedule.tax_for(-from_dollars(5_000)), 0);
    }

    #[test]
    fn tax_for_first_bracket_only() {
        let schedule = single_schedule();

        // $10,000 × 10% = $1,000
        assert_eq!(schedule.tax_for(from_dollars(10_000)), from_dollars(1_000));
    }

    #[test]
    fn tax_for_spans_two_brackets() {
        let schedule = single_schedule();

        // $34,250: 10% × 11,925 + 12% × 22,325 = 1,192.50 + 2,679.00
        assert_eq!(schedule.tax_for(from_dollars(34_250)), 387_150);
    }

    #[test]
    fn tax_for_reaches_top_bracket() {
        let schedule = single_schedule();

        // $700,000: base through $626,350 is $188,769.75, plus 37% of $73,650
        let expected = 18_876_975 + mul_rate(from_dollars(73_650), dec!(0.37));
        assert_eq!(schedule.tax_for(from_dollars(700_000)), expected);
    }

    #[test]
    fn tax_for_exact_bracket_boundary() {
        let schedule = single_schedule();

        // Exactly $11,925 is taxed entirely at 10%.
        assert_eq!(schedule.tax_for(from_dollars(11_925)), 119_250);
    }

    #[test]
    fn tax_is_monotone_in_income() {
        let schedule = single_schedule();

        let mut prev = 0;
        for dollars in (0..=1_000_000).step_by(7_919) {
            let tax = schedule.tax_for(from_dollars(dollars));
            assert!(tax >= prev, "tax fell at income {dollars}");
            prev = tax;
        }
    }

    #[test]
    fn tax_never_exceeds_income() {
        let schedule = single_schedule();

        for dollars in [1, 100, 11_925, 48_475, 250_000, 5_000_000] {
            let income = from_dollars(dollars);
            let tax = schedule.tax_for(income);
            assert!(tax <= income);
        }
    }

    #[test]
    fn effective_rate_bounded_by_top_rate() {
        let schedule = single_schedule();

        for dollars in [1_000, 50_000, 700_000, 10_000_000] {
            let income = from_dollars(dollars);
            let tax = schedule.tax_for(income);
            assert!(mul_rate(income, schedule.top_rate()) >= tax);
        }
    }

    #[test]
    fn flat_schedule_taxes_everything_at_one_rate() {
        let schedule = BracketSchedule::flat(dec!(0.0495));

        assert_eq!(schedule.tax_for(from_dollars(60_000)), 297_000);
    }

    // =========================================================================
    // QualifiedRateWorksheet tests
    // =========================================================================

    #[test]
    fn worksheet_with_no_preferential_matches_ordinary() {
        let ordinary = single_schedule();
        let cg = single_cg_schedule();
        let worksheet = QualifiedRateWorksheet::new(&ordinary, &cg);

        assert_eq!(
            worksheet.tax_for(from_dollars(85_000), 0),
            ordinary.tax_for(from_dollars(85_000))
        );
    }

    #[test]
    fn worksheet_taxes_gain_in_zero_band_at_zero() {
        let ordinary = single_schedule();
        let cg = single_cg_schedule();
        let worksheet = QualifiedRateWorksheet::new(&ordinary, &cg);

        // $40,000 ordinary + $5,000 gain; the gain band tops out at $45,000,
        // under the $48,350 zero-rate ceiling.
        let tax = worksheet.tax_for(from_dollars(45_000), from_dollars(5_000));
        assert_eq!(tax, ordinary.tax_for(from_dollars(40_000)));
    }

    #[test]
    fn worksheet_taxes_gain_above_zero_band_at_fifteen() {
        let ordinary = single_schedule();
        let cg = single_cg_schedule();
        let worksheet = QualifiedRateWorksheet::new(&ordinary, &cg);

        // $60,000 ordinary + $20,000 gain: band [60,000, 80,000] all at 15%.
        let tax = worksheet.tax_for(from_dollars(80_000), from_dollars(20_000));
        let expected = ordinary.tax_for(from_dollars(60_000))
            + mul_rate(from_dollars(20_000), dec!(0.15));
        assert_eq!(tax, expected);
    }

    #[test]
    fn worksheet_never_exceeds_all_ordinary_tax() {
        let ordinary = single_schedule();
        let cg = single_cg_schedule();
        let worksheet = QualifiedRateWorksheet::new(&ordinary, &cg);

        for (income, pref) in [(30_000, 10_000), (120_000, 60_000), (700_000, 650_000)] {
            let stacked = worksheet.tax_for(from_dollars(income), from_dollars(pref));
            assert!(stacked <= ordinary.tax_for(from_dollars(income)));
        }
    }

    #[test]
    fn worksheet_clamps_preferential_to_taxable_income() {
        let ordinary = single_schedule();
        let cg = single_cg_schedule();
        let worksheet = QualifiedRateWorksheet::new(&ordinary, &cg);

        // Preferential larger than taxable income: whole amount preferential.
        let tax = worksheet.tax_for(from_dollars(40_000), from_dollars(90_000));
        assert_eq!(tax, 0); // under the $48,350 zero band
    }
}
