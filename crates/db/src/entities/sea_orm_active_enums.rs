//! Postgres enum mappings shared by the entities.
//!
//! Status values stay on the Spanish wire strings the business uses.

use mobilia_core::funding::{ProductKind, SettlementStatus};
use mobilia_core::schedule;
use mobilia_shared::types::Currency;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Settlement currency column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "currency_code")]
pub enum CurrencyCode {
    /// Euro.
    #[sea_orm(string_value = "EUR")]
    Eur,
    /// US dollar.
    #[sea_orm(string_value = "USD")]
    Usd,
    /// Mexican peso.
    #[sea_orm(string_value = "MXN")]
    Mxn,
}

impl From<Currency> for CurrencyCode {
    fn from(value: Currency) -> Self {
        match value {
            Currency::Eur => Self::Eur,
            Currency::Usd => Self::Usd,
            Currency::Mxn => Self::Mxn,
        }
    }
}

impl From<CurrencyCode> for Currency {
    fn from(value: CurrencyCode) -> Self {
        match value {
            CurrencyCode::Eur => Self::Eur,
            CurrencyCode::Usd => Self::Usd,
            CurrencyCode::Mxn => Self::Mxn,
        }
    }
}

/// Payment-record settlement column (`PENDIENTE` / `PAGADO`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "settlement_status")]
pub enum PaymentStatus {
    /// Awaiting settlement.
    #[sea_orm(string_value = "PENDIENTE")]
    Pendiente,
    /// Settled; immutable.
    #[sea_orm(string_value = "PAGADO")]
    Pagado,
}

impl From<SettlementStatus> for PaymentStatus {
    fn from(value: SettlementStatus) -> Self {
        match value {
            SettlementStatus::Pendiente => Self::Pendiente,
            SettlementStatus::Pagado => Self::Pagado,
        }
    }
}

impl From<PaymentStatus> for SettlementStatus {
    fn from(value: PaymentStatus) -> Self {
        match value {
            PaymentStatus::Pendiente => Self::Pendiente,
            PaymentStatus::Pagado => Self::Pagado,
        }
    }
}

/// Purchase-order lifecycle column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "purchase_order_status")]
pub enum OrderStatus {
    /// Sketched before funding.
    #[sea_orm(string_value = "PENDIENTE")]
    Pendiente,
    /// Funded, awaiting provider confirmation.
    #[sea_orm(string_value = "NUEVA")]
    Nueva,
    /// In production.
    #[sea_orm(string_value = "EN_PRODUCCION")]
    EnProduccion,
    /// Ready for collection.
    #[sea_orm(string_value = "EN_RECOLECCION")]
    EnRecoleccion,
    /// In transit.
    #[sea_orm(string_value = "EN_TRANSITO")]
    EnTransito,
    /// Delivered.
    #[sea_orm(string_value = "ENTREGADO")]
    Entregado,
}

impl From<schedule::PurchaseOrderStatus> for OrderStatus {
    fn from(value: schedule::PurchaseOrderStatus) -> Self {
        use schedule::PurchaseOrderStatus as S;
        match value {
            S::Pendiente => Self::Pendiente,
            S::Nueva => Self::Nueva,
            S::EnProduccion => Self::EnProduccion,
            S::EnRecoleccion => Self::EnRecoleccion,
            S::EnTransito => Self::EnTransito,
            S::Entregado => Self::Entregado,
        }
    }
}

impl From<OrderStatus> for schedule::PurchaseOrderStatus {
    fn from(value: OrderStatus) -> Self {
        use schedule::PurchaseOrderStatus as S;
        match value {
            OrderStatus::Pendiente => S::Pendiente,
            OrderStatus::Nueva => S::Nueva,
            OrderStatus::EnProduccion => S::EnProduccion,
            OrderStatus::EnRecoleccion => S::EnRecoleccion,
            OrderStatus::EnTransito => S::EnTransito,
            OrderStatus::Entregado => S::Entregado,
        }
    }
}

/// Container lifecycle column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "container_status")]
pub enum ContainerStatus {
    /// Being consolidated at origin.
    #[sea_orm(string_value = "EN_CONSOLIDACION")]
    EnConsolidacion,
    /// On the water.
    #[sea_orm(string_value = "EN_TRANSITO")]
    EnTransito,
    /// Delivered.
    #[sea_orm(string_value = "ENTREGADO")]
    Entregado,
}

impl From<schedule::ContainerStatus> for ContainerStatus {
    fn from(value: schedule::ContainerStatus) -> Self {
        use schedule::ContainerStatus as S;
        match value {
            S::EnConsolidacion => Self::EnConsolidacion,
            S::EnTransito => Self::EnTransito,
            S::Entregado => Self::Entregado,
        }
    }
}

impl From<ContainerStatus> for schedule::ContainerStatus {
    fn from(value: ContainerStatus) -> Self {
        use schedule::ContainerStatus as S;
        match value {
            ContainerStatus::EnConsolidacion => S::EnConsolidacion,
            ContainerStatus::EnTransito => S::EnTransito,
            ContainerStatus::Entregado => S::Entregado,
        }
    }
}

/// Project lifecycle column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "project_status")]
pub enum ProjectStatus {
    /// Active.
    #[sea_orm(string_value = "EN_PROCESO")]
    EnProceso,
    /// Closed out.
    #[sea_orm(string_value = "CERRADO")]
    Cerrado,
}

/// Quotation-product fulfillment column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "product_status")]
pub enum ProductStatus {
    /// Still only quoted.
    #[sea_orm(string_value = "COTIZADO")]
    Cotizado,
    /// Ordered (the quotation became a project).
    #[sea_orm(string_value = "PEDIDO")]
    Pedido,
    /// Delivered to the customer.
    #[sea_orm(string_value = "ENTREGADO")]
    Entregado,
}

/// Whether a product ships from stock or is made to order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "product_kind")]
pub enum ProductKindColumn {
    /// Showroom stock.
    #[sea_orm(string_value = "STOCK")]
    Stock,
    /// Made to order.
    #[sea_orm(string_value = "PEDIDO")]
    SpecialOrder,
}

impl From<ProductKind> for ProductKindColumn {
    fn from(value: ProductKind) -> Self {
        match value {
            ProductKind::Stock => Self::Stock,
            ProductKind::SpecialOrder => Self::SpecialOrder,
        }
    }
}

impl From<ProductKindColumn> for ProductKind {
    fn from(value: ProductKindColumn) -> Self {
        match value {
            ProductKindColumn::Stock => Self::Stock,
            ProductKindColumn::SpecialOrder => Self::SpecialOrder,
        }
    }
}

/// Commission role column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "commission_role")]
pub enum CommissionRoleColumn {
    /// Architect or studio.
    #[sea_orm(string_value = "ARQUITECTO")]
    Architect,
    /// Referring customer.
    #[sea_orm(string_value = "CLIENTE_REFERENCIADO")]
    ReferencedCustomer,
    /// Project manager.
    #[sea_orm(string_value = "PROJECT_MANAGER")]
    ProjectManager,
    /// Designer.
    #[sea_orm(string_value = "PROYECTISTA")]
    Designer,
    /// Showroom manager.
    #[sea_orm(string_value = "SHOWROOM_MANAGER")]
    ShowroomManager,
}

impl From<mobilia_core::commission::CommissionRole> for CommissionRoleColumn {
    fn from(value: mobilia_core::commission::CommissionRole) -> Self {
        use mobilia_core::commission::CommissionRole as R;
        match value {
            R::Architect => Self::Architect,
            R::ReferencedCustomer => Self::ReferencedCustomer,
            R::ProjectManager => Self::ProjectManager,
            R::Designer => Self::Designer,
            R::ShowroomManager => Self::ShowroomManager,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_roundtrip() {
        for currency in Currency::ALL {
            let column: CurrencyCode = currency.into();
            assert_eq!(Currency::from(column), currency);
        }
    }

    #[test]
    fn test_order_status_roundtrip() {
        use mobilia_core::schedule::PurchaseOrderStatus as S;
        for status in [
            S::Pendiente,
            S::Nueva,
            S::EnProduccion,
            S::EnRecoleccion,
            S::EnTransito,
            S::Entregado,
        ] {
            let column: OrderStatus = status.into();
            assert_eq!(S::from(column), status);
        }
    }
}
