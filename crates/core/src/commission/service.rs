//! Commission calculation and fan-out.

use rust_decimal::Decimal;

use super::error::CommissionError;
use super::types::{
    Beneficiary, CommissionInputs, CommissionRole, CommissionShare, PercentageSplit,
};

/// Fixed showroom-manager commission percentage.
fn showroom_manager_percentage() -> Decimal {
    Decimal::new(16, 0)
}

/// Commission calculator.
///
/// Pure arithmetic over a quotation's resolved total; persistence of the
/// resulting shares is the caller's concern.
pub struct CommissionCalculator;

impl CommissionCalculator {
    /// Computes a commission amount: `total * percentage / 100`.
    ///
    /// Decimal arithmetic throughout; no binary floating-point drift.
    #[must_use]
    pub fn compute(total: Decimal, percentage: Decimal) -> Decimal {
        total * (percentage / Decimal::ONE_HUNDRED)
    }

    /// Fans a quotation out into its commission shares.
    ///
    /// Every qualifying (beneficiary, role, percentage) produces exactly one
    /// share; roles never aggregate or net against each other.
    ///
    /// # Errors
    ///
    /// Returns an error if any percentage is negative or above 100.
    pub fn plan(inputs: &CommissionInputs) -> Result<Vec<CommissionShare>, CommissionError> {
        let total = inputs.project_total;
        let mut shares = Vec::new();

        if let Some(architect) = &inputs.architect {
            // Main-project-manager classification splits ride on the
            // architect flag; one share per split.
            if let Some(main_pm) = architect.main_project_manager {
                for split in &architect.classification_splits {
                    shares.push(Self::share(
                        Beneficiary::User(main_pm),
                        CommissionRole::Architect,
                        split.percentage,
                        total,
                    )?);
                }
            }

            shares.push(Self::share(
                Beneficiary::Named(architect.architect_name.clone()),
                CommissionRole::Architect,
                architect.percentage,
                total,
            )?);
        }

        if let Some((customer, percentage)) = inputs.referenced_customer {
            shares.push(Self::share(
                Beneficiary::User(customer),
                CommissionRole::ReferencedCustomer,
                percentage,
                total,
            )?);
        }

        for manager in &inputs.project_managers {
            for split in &manager.splits {
                shares.push(Self::share(
                    Beneficiary::User(manager.user_id),
                    CommissionRole::ProjectManager,
                    split.percentage,
                    total,
                )?);
            }
        }

        if let Some(showroom_manager) = inputs.showroom_manager {
            shares.push(Self::share(
                Beneficiary::User(showroom_manager),
                CommissionRole::ShowroomManager,
                showroom_manager_percentage(),
                total,
            )?);
        }

        for designer in &inputs.designers {
            for split in &designer.splits {
                shares.push(Self::share(
                    Beneficiary::User(designer.user_id),
                    CommissionRole::Designer,
                    split.percentage,
                    total,
                )?);
            }
        }

        Ok(shares)
    }

    fn share(
        beneficiary: Beneficiary,
        role: CommissionRole,
        percentage: Decimal,
        total: Decimal,
    ) -> Result<CommissionShare, CommissionError> {
        Self::validate_percentage(percentage)?;
        Ok(CommissionShare {
            beneficiary,
            role,
            percentage,
            amount: Self::compute(total, percentage),
            project_total: total,
        })
    }

    /// Validates a commission percentage.
    ///
    /// # Errors
    ///
    /// Returns an error for negative percentages or percentages above 100.
    pub fn validate_percentage(percentage: Decimal) -> Result<(), CommissionError> {
        if percentage < Decimal::ZERO {
            return Err(CommissionError::NegativePercentage(percentage));
        }
        if percentage > Decimal::ONE_HUNDRED {
            return Err(CommissionError::PercentageAboveHundred(percentage));
        }
        Ok(())
    }

    /// Expected number of shares for a set of inputs, used by callers to
    /// size batch inserts.
    #[must_use]
    pub fn share_count(inputs: &CommissionInputs) -> usize {
        let architect = inputs.architect.as_ref().map_or(0, |a| {
            let splits = if a.main_project_manager.is_some() {
                a.classification_splits.len()
            } else {
                0
            };
            splits + 1
        });
        let managers: usize = inputs.project_managers.iter().map(|m| m.splits.len()).sum();
        let designers: usize = inputs.designers.iter().map(|d| d.splits.len()).sum();

        architect
            + usize::from(inputs.referenced_customer.is_some())
            + managers
            + usize::from(inputs.showroom_manager.is_some())
            + designers
    }
}

/// Convenience constructor for splits without a classification label.
#[must_use]
pub fn flat_split(percentage: Decimal) -> PercentageSplit {
    PercentageSplit {
        classification: None,
        percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commission::types::{ArchitectCommission, StakeholderSplits};
    use mobilia_shared::types::UserId;
    use rust_decimal_macros::dec;

    fn split(pct: Decimal) -> PercentageSplit {
        flat_split(pct)
    }

    #[test]
    fn test_compute_basic() {
        assert_eq!(
            CommissionCalculator::compute(dec!(10000), dec!(5)),
            dec!(500)
        );
    }

    #[test]
    fn test_compute_fractional_percentage() {
        assert_eq!(
            CommissionCalculator::compute(dec!(10000), dec!(2.5)),
            dec!(250.0)
        );
    }

    #[test]
    fn test_showroom_manager_is_fixed_sixteen_percent() {
        let inputs = CommissionInputs {
            project_total: dec!(10000),
            showroom_manager: Some(UserId::new()),
            ..CommissionInputs::default()
        };
        let shares = CommissionCalculator::plan(&inputs).unwrap();
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].role, CommissionRole::ShowroomManager);
        assert_eq!(shares[0].percentage, dec!(16));
        assert_eq!(shares[0].amount, dec!(1600));
    }

    #[test]
    fn test_architect_emits_flat_share_and_split_shares() {
        let main_pm = UserId::new();
        let inputs = CommissionInputs {
            project_total: dec!(20000),
            architect: Some(ArchitectCommission {
                architect_name: "Estudio Reforma".to_string(),
                percentage: dec!(10),
                main_project_manager: Some(main_pm),
                classification_splits: vec![split(dec!(3)), split(dec!(2))],
            }),
            ..CommissionInputs::default()
        };
        let shares = CommissionCalculator::plan(&inputs).unwrap();
        assert_eq!(shares.len(), 3);

        // Two split shares for the main PM, then the flat named share.
        assert_eq!(shares[0].beneficiary, Beneficiary::User(main_pm));
        assert_eq!(shares[0].amount, dec!(600));
        assert_eq!(shares[1].amount, dec!(400));
        assert_eq!(
            shares[2].beneficiary,
            Beneficiary::Named("Estudio Reforma".to_string())
        );
        assert_eq!(shares[2].amount, dec!(2000));
        assert!(shares.iter().all(|s| s.role == CommissionRole::Architect));
    }

    #[test]
    fn test_roles_are_not_mutually_exclusive() {
        let pm = UserId::new();
        let designer = UserId::new();
        let inputs = CommissionInputs {
            project_total: dec!(10000),
            referenced_customer: Some((UserId::new(), dec!(4))),
            project_managers: vec![StakeholderSplits {
                user_id: pm,
                splits: vec![split(dec!(2)), split(dec!(1))],
            }],
            designers: vec![StakeholderSplits {
                user_id: designer,
                splits: vec![split(dec!(1.5))],
            }],
            showroom_manager: Some(UserId::new()),
            ..CommissionInputs::default()
        };
        let shares = CommissionCalculator::plan(&inputs).unwrap();
        assert_eq!(shares.len(), 5);
        assert_eq!(shares.len(), CommissionCalculator::share_count(&inputs));

        let designer_share = shares
            .iter()
            .find(|s| s.role == CommissionRole::Designer)
            .unwrap();
        assert_eq!(designer_share.amount, dec!(150.0));
    }

    #[test]
    fn test_negative_percentage_rejected() {
        let inputs = CommissionInputs {
            project_total: dec!(10000),
            referenced_customer: Some((UserId::new(), dec!(-1))),
            ..CommissionInputs::default()
        };
        assert_eq!(
            CommissionCalculator::plan(&inputs).unwrap_err(),
            CommissionError::NegativePercentage(dec!(-1))
        );
    }

    #[test]
    fn test_percentage_above_hundred_rejected() {
        assert!(CommissionCalculator::validate_percentage(dec!(101)).is_err());
        assert!(CommissionCalculator::validate_percentage(dec!(100)).is_ok());
    }

    #[test]
    fn test_no_roles_no_shares() {
        let inputs = CommissionInputs {
            project_total: dec!(10000),
            ..CommissionInputs::default()
        };
        assert!(CommissionCalculator::plan(&inputs).unwrap().is_empty());
    }
}
