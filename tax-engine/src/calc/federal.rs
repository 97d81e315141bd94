//! Federal calculation orchestrator.
//!
//! Runs the worksheet calculators in statutory order: self-employment tax
//! feeds AGI through its half-tax deduction, deductions and the QBI
//! deduction produce taxable income, the preferential-rate worksheet
//! produces tax before credits, the non-refundable credits apply with the
//! child credit last against the liability the others left, and the
//! refundable credits and additional taxes settle the balance.
//!
//! Invariants held on every result:
//! `total_tax = max(0, tax_before_credits - nonrefundable) + additional`
//! and `refund_or_owe = payments + refundable - total_tax`.

use tracing::{debug, info};

use crate::calc::additional::{
    AmtCalculator, AmtInput, MedicareSurtaxCalculator, MedicareSurtaxInput, NiitCalculator,
    NiitInput, SelfEmploymentCalculator, SelfEmploymentInput,
};
use crate::calc::brackets::QualifiedRateWorksheet;
use crate::calc::credits::{
    AdoptionCalculator, AdoptionInput, ChildCreditCalculator, ChildCreditInput,
    DependentCareCalculator, DependentCareInput, EducationCalculator, EducationInput,
    EitcCalculator, EitcInput, ForeignCreditCalculator, ForeignCreditInput, PremiumCalculator,
    SaversCalculator, SaversInput,
};
use crate::calc::deductions::DeductionResolver;
use crate::calc::qbi::{QbiCalculator, QbiInput};
use crate::model::{
    AdditionalTaxes, Carryovers, CreditsBreakdown, Diagnostic, FederalResult, TaxpayerInput,
    has_errors,
};
use crate::money::{Cents, clamp_zero, mul_rate};
use crate::rules::RuleSet;
use crate::validate;

/// Age below which a dependent counts for the dependent care credit.
const DEPENDENT_CARE_AGE_LIMIT: i32 = 13;

pub struct FederalCalculator<'a> {
    rules: &'a RuleSet,
}

impl<'a> FederalCalculator<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Computes one federal return.
    ///
    /// Validation errors short-circuit to a zeroed [`FederalResult`] that
    /// carries only the diagnostics.
    pub fn calculate(
        &self,
        input: &TaxpayerInput,
    ) -> FederalResult {
        let mut diagnostics = validate::validate(input);
        if has_errors(&diagnostics) {
            info!(
                count = diagnostics.len(),
                "input rejected by validation, skipping calculation"
            );
            return FederalResult::rejected(input.tax_year, input.filing_status, diagnostics);
        }

        // Self-employment tax first: its half-tax deduction feeds AGI.
        let se = SelfEmploymentCalculator::new(&self.rules.self_employment).calculate(
            &SelfEmploymentInput {
                business_income: input.income.business_income,
                wages: input.income.wages,
            },
        );
        diagnostics.extend(se.notes.iter().cloned());

        let total_income = self.total_income(input);
        let agi = total_income - input.above_line_adjustments - se.deduction;
        let earned_income = input.income.wages + se.net_earnings;
        debug!(total_income, agi, "income aggregated");

        let deduction = DeductionResolver::new(self.rules).resolve(input, agi);
        diagnostics.extend(deduction.notes.iter().cloned());

        let preferential =
            input.income.qualified_dividends + input.income.net_capital_gain.max(0);

        // The NOL deduction comes off between AGI and taxable income,
        // limited to a share of the income left after the deduction; the
        // unused remainder carries forward.
        let income_after_deduction = clamp_zero(agi - deduction.deduction);
        let nol_deduction = input
            .nol_carryforward
            .min(mul_rate(income_after_deduction, self.rules.nol_limit_rate));
        if nol_deduction < input.nol_carryforward {
            diagnostics.push(Diagnostic::info(
                "NOL_LIMITED",
                "net operating loss deduction limited by current-year income",
            ));
        }
        let taxable_before_qbi = clamp_zero(income_after_deduction - nol_deduction);
        let qbi = QbiCalculator::new(&self.rules.qbi).calculate(&QbiInput {
            filing_status: input.filing_status,
            taxable_income: taxable_before_qbi,
            net_capital_gain: preferential,
            businesses: &input.qbi_businesses,
        });
        diagnostics.extend(qbi.notes.iter().cloned());
        let taxable_income = clamp_zero(taxable_before_qbi - qbi.deduction);

        let worksheet = QualifiedRateWorksheet::new(
            self.rules.brackets.get(input.filing_status),
            self.rules.capital_gains_brackets.get(input.filing_status),
        );
        let tax_before_credits = worksheet.tax_for(taxable_income, preferential);
        debug!(taxable_income, tax_before_credits, "regular tax computed");

        let mut credits = CreditsBreakdown::default();
        let mut additional = AdditionalTaxes::default();
        let mut carryovers = Carryovers {
            net_operating_loss: input.nol_carryforward - nol_deduction,
            ..Carryovers::default()
        };

        // Foreign tax credit runs first; the AMT comparison uses regular
        // tax net of it.
        let ftc = ForeignCreditCalculator::calculate(&ForeignCreditInput {
            foreign_income: &input.foreign_income,
            taxable_income,
            tax_before_credits,
        });
        diagnostics.extend(ftc.notes.iter().cloned());
        credits.foreign_tax = ftc.credit;
        carryovers.foreign_tax_credit = ftc.carryover;

        let amt = AmtCalculator::new(&self.rules.amt).calculate(&AmtInput {
            filing_status: input.filing_status,
            taxable_income,
            deduction_addback: if deduction.itemizing {
                deduction.salt_deducted
            } else {
                deduction.deduction
            },
            items: &input.amt_items,
            regular_tax: clamp_zero(tax_before_credits - ftc.credit),
        });
        diagnostics.extend(amt.notes.iter().cloned());
        additional.alternative_minimum = amt.amt;
        credits.prior_minimum_tax = amt.credit_used;
        carryovers.minimum_tax_credit = amt.credit_carryforward;

        self.nonrefundable_credits(input, agi, earned_income, &mut credits, &mut diagnostics);

        // The child credit caps against whatever liability the other
        // non-refundable credits left standing.
        let remaining_liability = clamp_zero(tax_before_credits - credits.nonrefundable_total());
        let child = ChildCreditCalculator::new(&self.rules.child_credit).calculate(
            &ChildCreditInput {
                qualifying_children: self.qualifying_children(input),
                other_dependents: self.other_dependents(input),
                agi,
                earned_income,
                phaseout_threshold: *self
                    .rules
                    .child_credit
                    .phaseout_threshold
                    .get(input.filing_status),
                remaining_liability,
            },
        );
        diagnostics.extend(child.notes.iter().cloned());
        credits.child_credit = child.child_credit;
        credits.other_dependent_credit = child.other_dependent_credit;
        credits.additional_child_credit = child.additional_credit;

        let eitc = EitcCalculator::new(&self.rules.eitc).calculate(&EitcInput {
            filing_status: input.filing_status,
            earned_income,
            agi,
            investment_income: input.income.investment_income(),
            qualifying_children: input
                .dependents
                .iter()
                .filter(|d| d.is_qualifying_child)
                .count(),
        });
        diagnostics.extend(eitc.notes.iter().cloned());
        credits.earned_income_credit = eitc.credit;

        if let Some(premium_input) = &input.premium_tax {
            let premium = PremiumCalculator::new(&self.rules.premium).calculate(premium_input);
            diagnostics.extend(premium.notes.iter().cloned());
            credits.premium_credit = premium.net_credit;
            additional.premium_repayment = premium.repayment;
        }

        additional.self_employment = se.tax;
        additional.net_investment_income = NiitCalculator::new(&self.rules.niit)
            .calculate(&NiitInput {
                filing_status: input.filing_status,
                net_investment_income: input.income.investment_income(),
                magi: agi,
            })
            .tax;
        additional.additional_medicare = MedicareSurtaxCalculator::new(
            &self.rules.additional_medicare,
        )
        .calculate(&MedicareSurtaxInput {
            filing_status: input.filing_status,
            wages: input.income.wages,
            se_net_earnings: se.net_earnings,
        })
        .tax;

        let total_tax =
            clamp_zero(tax_before_credits - credits.nonrefundable_total()) + additional.total();
        let total_payments = input.payments.total();
        let refund_or_owe = total_payments + credits.refundable_total() - total_tax;
        info!(total_tax, refund_or_owe, "federal calculation complete");

        FederalResult {
            tax_year: input.tax_year,
            filing_status: input.filing_status,
            total_income,
            agi,
            deduction_used: deduction.deduction,
            itemizing: deduction.itemizing,
            qbi_deduction: qbi.deduction,
            nol_deduction,
            taxable_income,
            tax_before_credits,
            credits,
            additional_taxes: additional,
            total_tax,
            total_payments,
            refund_or_owe,
            earned_income,
            carryovers,
            diagnostics,
        }
    }

    fn total_income(
        &self,
        input: &TaxpayerInput,
    ) -> i64 {
        let income = &input.income;
        income.wages
            + income.interest
            + income.ordinary_dividends
            + income.net_capital_gain
            + income.business_income
            + income.k1_income
            + income.other_income
    }

    /// Non-refundable credits other than the child credit, in statutory
    /// order. Each lands in its own breakdown slot.
    fn nonrefundable_credits(
        &self,
        input: &TaxpayerInput,
        agi: i64,
        earned_income: Cents,
        credits: &mut CreditsBreakdown,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let education = EducationCalculator::new(&self.rules.education).calculate(
            &EducationInput {
                filing_status: input.filing_status,
                magi: agi,
                students: &input.education,
            },
        );
        diagnostics.extend(education.notes.iter().cloned());
        credits.education_nonrefundable = education.nonrefundable;
        credits.education_refundable = education.refundable;

        let care_persons = input
            .dependents
            .iter()
            .filter(|d| {
                d.is_qualifying_child && d.age_at_year_end(input.tax_year) < DEPENDENT_CARE_AGE_LIMIT
            })
            .count();
        let care = DependentCareCalculator::new(&self.rules.dependent_care).calculate(
            &DependentCareInput {
                qualifying_persons: care_persons,
                expenses: input.dependent_care_expenses,
                agi,
                earned_income,
            },
        );
        diagnostics.extend(care.notes.iter().cloned());
        credits.dependent_care = care.credit;

        let savers = SaversCalculator::new(&self.rules.savers).calculate(
            &SaversInput {
                filing_status: input.filing_status,
                agi,
                contributions: input.retirement_contributions,
            },
        );
        diagnostics.extend(savers.notes.iter().cloned());
        credits.savers = savers.credit;

        let adoption = AdoptionCalculator::new(&self.rules.adoption).calculate(&AdoptionInput {
            magi: agi,
            adoptions: &input.adoptions,
        });
        diagnostics.extend(adoption.notes.iter().cloned());
        credits.adoption = adoption.credit;
    }

    fn qualifying_children(
        &self,
        input: &TaxpayerInput,
    ) -> usize {
        input
            .dependents
            .iter()
            .filter(|d| d.qualifies_for_child_credit(input.tax_year))
            .count()
    }

    fn other_dependents(
        &self,
        input: &TaxpayerInput,
    ) -> usize {
        input.dependents.len() - self.qualifying_children(input)
    }
}
