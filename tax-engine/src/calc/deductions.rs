//! Standard-vs-itemized deduction resolver.
//!
//! Computes the standard deduction (base by filing status plus the aged/blind
//! add-ons) and the itemized total (SALT cap and AGI-floored medical applied
//! first), then selects the greater unless itemizing is forced.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Diagnostic, TaxpayerInput};
use crate::money::{Cents, clamp_zero, mul_rate};
use crate::rules::RuleSet;

/// Resolved deduction with both candidates for transparency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionResult {
    pub standard: Cents,
    pub itemized: Cents,
    /// The deduction actually used.
    pub deduction: Cents,
    pub itemizing: bool,
    /// SALT component after the cap, as deducted.
    pub salt_deducted: Cents,
    pub notes: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct DeductionResolver<'a> {
    rules: &'a RuleSet,
}

impl<'a> DeductionResolver<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    pub fn resolve(
        &self,
        input: &TaxpayerInput,
        agi: i64,
    ) -> DeductionResult {
        let mut notes = Vec::new();

        let standard = self.standard_deduction(input);
        let (itemized, salt_deducted) = self.itemized_total(input, agi, &mut notes);

        // Itemizing wins only on a strict comparison, or when forced.
        let itemizing = input.force_itemize || (input.itemized.is_some() && itemized > standard);
        if input.force_itemize && itemized <= standard {
            notes.push(Diagnostic::info(
                "FORCED_ITEMIZING",
                "itemizing was forced although the standard deduction is at least as large",
            ));
        }
        let deduction = if itemizing { itemized } else { standard };
        debug!(standard, itemized, itemizing, "deduction resolved");

        DeductionResult {
            standard,
            itemized,
            deduction,
            itemizing,
            salt_deducted: if itemizing { salt_deducted } else { 0 },
            notes,
        }
    }

    /// Base amount by filing status plus one add-on per age-65/blind
    /// condition for the taxpayer and, when present, the spouse.
    fn standard_deduction(
        &self,
        input: &TaxpayerInput,
    ) -> Cents {
        let base = *self.rules.standard_deduction.get(input.filing_status);
        let addon = *self.rules.aged_blind_addon.get(input.filing_status);

        let mut conditions = 0;
        if input.primary.is_65_or_older(input.tax_year) {
            conditions += 1;
        }
        if input.primary.blind {
            conditions += 1;
        }
        if let Some(spouse) = &input.spouse {
            if spouse.is_65_or_older(input.tax_year) {
                conditions += 1;
            }
            if spouse.blind {
                conditions += 1;
            }
        }

        base + addon * conditions
    }

    /// Itemized total with the SALT cap and medical AGI floor applied
    /// before any comparison against the standard deduction.
    fn itemized_total(
        &self,
        input: &TaxpayerInput,
        agi: i64,
        notes: &mut Vec<Diagnostic>,
    ) -> (Cents, Cents) {
        let Some(itemized) = &input.itemized else {
            return (0, 0);
        };

        let salt = itemized.state_local_taxes.min(self.rules.salt_cap);
        if itemized.state_local_taxes > self.rules.salt_cap {
            notes.push(
                Diagnostic::info("SALT_CAP_APPLIED", "state and local tax deduction was capped")
                    .with_field("itemized.state_local_taxes"),
            );
        }

        let medical_floor = mul_rate(clamp_zero(agi), self.rules.medical_agi_floor);
        let medical = clamp_zero(itemized.medical_expenses - medical_floor);

        let total = salt
            + itemized.mortgage_interest
            + itemized.charitable_contributions
            + medical
            + itemized.other;
        (total, salt)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{FilingStatus, ItemizedDeductions, PersonProfile};
    use crate::money::from_dollars;
    use crate::rules::RuleRegistry;

    fn resolve(input: &TaxpayerInput, agi: i64) -> DeductionResult {
        let registry = RuleRegistry::builtin();
        let rules = registry.rules_for(2025).unwrap();
        DeductionResolver::new(rules).resolve(input, agi)
    }

    fn single_input() -> TaxpayerInput {
        TaxpayerInput::new(2025, FilingStatus::Single)
    }

    // =========================================================================
    // standard deduction tests
    // =========================================================================

    #[test]
    fn base_standard_deduction_for_single() {
        let result = resolve(&single_input(), from_dollars(50_000));

        assert_eq!(result.standard, from_dollars(15_750));
        assert!(!result.itemizing);
    }

    #[test]
    fn aged_taxpayer_gets_one_addon() {
        let mut input = single_input();
        input.primary.birth_date = NaiveDate::from_ymd_opt(1955, 3, 10);

        let result = resolve(&input, from_dollars(50_000));

        assert_eq!(result.standard, from_dollars(15_750 + 2_000));
    }

    #[test]
    fn aged_and_blind_taxpayer_gets_two_addons() {
        let mut input = single_input();
        input.primary.birth_date = NaiveDate::from_ymd_opt(1955, 3, 10);
        input.primary.blind = true;

        let result = resolve(&input, from_dollars(50_000));

        assert_eq!(result.standard, from_dollars(15_750 + 4_000));
    }

    #[test]
    fn married_couple_addons_use_married_amount() {
        let mut input = TaxpayerInput::new(2025, FilingStatus::MarriedFilingJointly);
        input.primary.birth_date = NaiveDate::from_ymd_opt(1955, 3, 10);
        input.spouse = Some(PersonProfile {
            birth_date: NaiveDate::from_ymd_opt(1954, 7, 2),
            blind: true,
            ..Default::default()
        });

        let result = resolve(&input, from_dollars(80_000));

        // Base 31,500 + three conditions × 1,600.
        assert_eq!(result.standard, from_dollars(31_500 + 4_800));
    }

    // =========================================================================
    // itemized tests
    // =========================================================================

    #[test]
    fn salt_is_capped_with_note() {
        let mut input = single_input();
        input.itemized = Some(ItemizedDeductions {
            state_local_taxes: from_dollars(25_000),
            mortgage_interest: from_dollars(12_000),
            ..Default::default()
        });

        let result = resolve(&input, from_dollars(200_000));

        // 10,000 capped SALT + 12,000 mortgage = 22,000 > 15,750 standard.
        assert!(result.itemizing);
        assert_eq!(result.itemized, from_dollars(22_000));
        assert_eq!(result.salt_deducted, from_dollars(10_000));
        assert!(result.notes.iter().any(|n| n.code == "SALT_CAP_APPLIED"));
    }

    #[test]
    fn medical_is_floored_by_agi_percentage() {
        let mut input = single_input();
        input.itemized = Some(ItemizedDeductions {
            medical_expenses: from_dollars(20_000),
            mortgage_interest: from_dollars(10_000),
            ..Default::default()
        });

        let result = resolve(&input, from_dollars(100_000));

        // Medical over the floor: 20,000 - 7.5% × 100,000 = 12,500.
        assert_eq!(result.itemized, from_dollars(22_500));
        assert!(result.itemizing);
    }

    #[test]
    fn medical_below_floor_contributes_nothing() {
        let mut input = single_input();
        input.itemized = Some(ItemizedDeductions {
            medical_expenses: from_dollars(5_000),
            ..Default::default()
        });

        let result = resolve(&input, from_dollars(100_000));

        assert_eq!(result.itemized, 0);
        assert!(!result.itemizing);
    }

    #[test]
    fn equal_totals_prefer_standard() {
        let mut input = single_input();
        input.itemized = Some(ItemizedDeductions {
            mortgage_interest: from_dollars(15_750),
            ..Default::default()
        });

        let result = resolve(&input, from_dollars(50_000));

        assert_eq!(result.itemized, result.standard);
        assert!(!result.itemizing);
        assert_eq!(result.deduction, result.standard);
    }

    #[test]
    fn force_itemize_overrides_comparison() {
        let mut input = single_input();
        input.force_itemize = true;
        input.itemized = Some(ItemizedDeductions {
            mortgage_interest: from_dollars(4_000),
            ..Default::default()
        });

        let result = resolve(&input, from_dollars(50_000));

        assert!(result.itemizing);
        assert_eq!(result.deduction, from_dollars(4_000));
        assert!(result.notes.iter().any(|n| n.code == "FORCED_ITEMIZING"));
    }
}
