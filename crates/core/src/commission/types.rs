//! Commission domain types.

use mobilia_shared::types::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stakeholder roles that earn a commission on a project.
///
/// Roles are independent and not mutually exclusive: a project can pay an
/// architect, a referenced customer, several project managers, several
/// designers, and the showroom manager at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommissionRole {
    /// Architect or design studio that brought the project in.
    #[serde(rename = "ARQUITECTO")]
    Architect,
    /// Customer who referred the sale.
    #[serde(rename = "CLIENTE_REFERENCIADO")]
    ReferencedCustomer,
    /// Assigned project manager.
    #[serde(rename = "PROJECT_MANAGER")]
    ProjectManager,
    /// Assigned designer.
    #[serde(rename = "PROYECTISTA")]
    Designer,
    /// Showroom manager; always a fixed percentage.
    #[serde(rename = "SHOWROOM_MANAGER")]
    ShowroomManager,
}

/// Who receives a commission share.
///
/// Architects are often external and tracked by name only; everyone else is
/// a registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Beneficiary {
    /// A registered user.
    User(UserId),
    /// An external party identified by name.
    Named(String),
}

/// One classification split of a stakeholder's commission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentageSplit {
    /// Optional classification label for the split.
    pub classification: Option<String>,
    /// Percentage of the project total.
    pub percentage: Decimal,
}

/// A stakeholder with their classification splits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeholderSplits {
    /// The stakeholder.
    pub user_id: UserId,
    /// Their splits; each yields one commission share.
    pub splits: Vec<PercentageSplit>,
}

/// Architect commission facts.
///
/// When an architect is involved the quotation carries a flat named share
/// and, for the main-project-manager variant, per-classification splits.
/// The two source revisions disagreed on whether the splits collapse into
/// one record; this build emits one share per split (pending product
/// confirmation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectCommission {
    /// Architect or studio name.
    pub architect_name: String,
    /// Flat percentage for the architect.
    pub percentage: Decimal,
    /// The main project manager, when the variant applies.
    pub main_project_manager: Option<UserId>,
    /// Classification splits credited to the main project manager.
    pub classification_splits: Vec<PercentageSplit>,
}

/// Everything the calculator needs from a quotation.
#[derive(Debug, Clone, Default)]
pub struct CommissionInputs {
    /// The authoritative project total.
    pub project_total: Decimal,
    /// Architect facts, when the architect flag is set.
    pub architect: Option<ArchitectCommission>,
    /// Referenced customer and their percentage, when flagged.
    pub referenced_customer: Option<(UserId, Decimal)>,
    /// Project managers with their splits, when flagged.
    pub project_managers: Vec<StakeholderSplits>,
    /// Designers with their splits, when flagged.
    pub designers: Vec<StakeholderSplits>,
    /// Showroom manager, when assigned.
    pub showroom_manager: Option<UserId>,
}

/// One immutable commission payment to record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionShare {
    /// Who gets paid.
    pub beneficiary: Beneficiary,
    /// In which role.
    pub role: CommissionRole,
    /// Percentage of the project total.
    pub percentage: Decimal,
    /// The resulting amount in the authoritative currency.
    pub amount: Decimal,
    /// The project total the share was computed from.
    pub project_total: Decimal,
}
