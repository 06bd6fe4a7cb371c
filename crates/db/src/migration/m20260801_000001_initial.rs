//! Initial database migration.
//!
//! Creates all enums, tables, and the uniqueness backstops behind the
//! financial invariants (one proforma per provider/brand per project, one
//! purchase order per payable/proforma pair).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: DIRECTORY & CATALOG
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(CUSTOMERS_SQL).await?;
        db.execute_unprepared(PROVIDERS_SQL).await?;
        db.execute_unprepared(BRANDS_SQL).await?;

        // ============================================================
        // PART 3: QUOTATIONS & PROJECTS
        // ============================================================
        db.execute_unprepared(QUOTATIONS_SQL).await?;
        db.execute_unprepared(PROOF_PAYMENTS_SQL).await?;
        db.execute_unprepared(QUOTATION_STAKEHOLDERS_SQL).await?;
        db.execute_unprepared(PROJECTS_SQL).await?;

        // ============================================================
        // PART 4: RECEIVABLES
        // ============================================================
        db.execute_unprepared(ACCOUNTS_RECEIVABLE_SQL).await?;
        db.execute_unprepared(ADVANCE_PAYMENT_RECORDS_SQL).await?;

        // ============================================================
        // PART 5: PROFORMAS & PAYABLES
        // ============================================================
        db.execute_unprepared(PROFORMAS_SQL).await?;
        db.execute_unprepared(ACCOUNTS_PAYABLE_SQL).await?;
        db.execute_unprepared(ACCOUNT_PAYABLE_HISTORIES_SQL).await?;

        // ============================================================
        // PART 6: FULFILLMENT
        // ============================================================
        db.execute_unprepared(CONTAINERS_SQL).await?;
        db.execute_unprepared(COLLECTIONS_SQL).await?;
        db.execute_unprepared(PURCHASE_ORDERS_SQL).await?;
        db.execute_unprepared(QUOTATION_PRODUCTS_SQL).await?;
        db.execute_unprepared(DELIVERY_REQUESTS_SQL).await?;

        // ============================================================
        // PART 7: COMMISSIONS & DOCUMENTS
        // ============================================================
        db.execute_unprepared(COMMISSION_PAYMENT_RECORDS_SQL).await?;
        db.execute_unprepared(DOCUMENTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE currency_code AS ENUM ('EUR', 'USD', 'MXN');

CREATE TYPE settlement_status AS ENUM ('PENDIENTE', 'PAGADO');

CREATE TYPE purchase_order_status AS ENUM (
    'PENDIENTE',
    'NUEVA',
    'EN_PRODUCCION',
    'EN_RECOLECCION',
    'EN_TRANSITO',
    'ENTREGADO'
);

CREATE TYPE container_status AS ENUM ('EN_CONSOLIDACION', 'EN_TRANSITO', 'ENTREGADO');

CREATE TYPE project_status AS ENUM ('EN_PROCESO', 'CERRADO');

CREATE TYPE product_status AS ENUM ('COTIZADO', 'PEDIDO', 'ENTREGADO');

CREATE TYPE product_kind AS ENUM ('STOCK', 'PEDIDO');

CREATE TYPE commission_role AS ENUM (
    'ARQUITECTO',
    'CLIENTE_REFERENCIADO',
    'PROJECT_MANAGER',
    'PROYECTISTA',
    'SHOWROOM_MANAGER'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT,
    email TEXT NOT NULL UNIQUE,
    is_admin BOOLEAN NOT NULL DEFAULT FALSE,
    is_logistics BOOLEAN NOT NULL DEFAULT FALSE,
    is_national_logistics BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    last_name TEXT,
    email TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const PROVIDERS_SQL: &str = r"
CREATE TABLE providers (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    advance_condition_percentage NUMERIC(5,2),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const BRANDS_SQL: &str = r"
CREATE TABLE brands (
    id UUID PRIMARY KEY,
    provider_id UUID REFERENCES providers(id),
    brand_name TEXT NOT NULL,
    production_time_days INTEGER,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const QUOTATIONS_SQL: &str = r"
CREATE TABLE quotations (
    id UUID PRIMARY KEY,
    customer_id UUID REFERENCES customers(id),
    branch TEXT,
    price_sheet JSONB NOT NULL DEFAULT '{}',
    percentage_iva NUMERIC(5,2),
    is_fractionate BOOLEAN NOT NULL DEFAULT FALSE,
    fractional_eur BOOLEAN NOT NULL DEFAULT FALSE,
    fractional_usd BOOLEAN NOT NULL DEFAULT FALSE,
    fractional_mxn BOOLEAN NOT NULL DEFAULT FALSE,
    is_architect BOOLEAN NOT NULL DEFAULT FALSE,
    architect_name TEXT,
    commission_percentage_architect NUMERIC(5,2),
    is_referenced_customer BOOLEAN NOT NULL DEFAULT FALSE,
    reference_customer_id UUID REFERENCES users(id),
    commission_percentage_referenced_customer NUMERIC(5,2),
    is_project_manager BOOLEAN NOT NULL DEFAULT FALSE,
    is_designer BOOLEAN NOT NULL DEFAULT FALSE,
    main_project_manager_id UUID REFERENCES users(id),
    main_pm_classification_splits JSONB NOT NULL DEFAULT '[]',
    showroom_manager_id UUID REFERENCES users(id),
    closing_date DATE,
    is_draft BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const PROOF_PAYMENTS_SQL: &str = r"
CREATE TABLE proof_payments (
    id UUID PRIMARY KEY,
    quotation_id UUID NOT NULL REFERENCES quotations(id),
    payment_date DATE,
    payment_method TEXT,
    amount NUMERIC(14,2) NOT NULL,
    currency currency_code NOT NULL,
    converted_advance NUMERIC(14,2),
    parity NUMERIC(14,6),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const QUOTATION_STAKEHOLDERS_SQL: &str = r"
CREATE TABLE quotation_stakeholders (
    id UUID PRIMARY KEY,
    quotation_id UUID NOT NULL REFERENCES quotations(id),
    user_id UUID NOT NULL REFERENCES users(id),
    role commission_role NOT NULL,
    splits JSONB NOT NULL DEFAULT '[]',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const PROJECTS_SQL: &str = r"
CREATE TABLE projects (
    id UUID PRIMARY KEY,
    folio TEXT NOT NULL,
    reference TEXT,
    sequence BIGINT NOT NULL,
    quotation_id UUID NOT NULL REFERENCES quotations(id),
    customer_id UUID REFERENCES customers(id),
    branch TEXT,
    status project_status NOT NULL DEFAULT 'EN_PROCESO',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_projects_quotation UNIQUE (quotation_id),
    CONSTRAINT uq_projects_sequence UNIQUE (sequence)
);
";

const ACCOUNTS_RECEIVABLE_SQL: &str = r"
CREATE TABLE accounts_receivable (
    id UUID PRIMARY KEY,
    project_id UUID NOT NULL REFERENCES projects(id),
    quotation_id UUID NOT NULL REFERENCES quotations(id),
    customer_id UUID REFERENCES customers(id),
    currency currency_code NOT NULL,
    total_sale NUMERIC(14,2) NOT NULL DEFAULT 0,
    total_paid NUMERIC(14,2) NOT NULL DEFAULT 0,
    updated_total NUMERIC(14,2) NOT NULL DEFAULT 0,
    balance NUMERIC(14,2) NOT NULL DEFAULT 0,
    is_paid BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_receivable_project_currency UNIQUE (project_id, currency)
);
";

const ADVANCE_PAYMENT_RECORDS_SQL: &str = r"
CREATE TABLE advance_payment_records (
    id UUID PRIMARY KEY,
    accounts_receivable_id UUID NOT NULL REFERENCES accounts_receivable(id),
    project_id UUID NOT NULL REFERENCES projects(id),
    consecutive_id INTEGER NOT NULL,
    payment_date DATE,
    payment_method TEXT,
    amount_paid NUMERIC(14,2) NOT NULL,
    payment_currency currency_code NOT NULL,
    parity NUMERIC(14,6),
    percentage_iva NUMERIC(5,2),
    currency_apply currency_code NOT NULL,
    converted_amount NUMERIC(14,2) NOT NULL,
    subtotal_amount NUMERIC(14,2),
    payment_percentage NUMERIC(7,4),
    sales_deviation NUMERIC(14,2) NOT NULL DEFAULT 0,
    status settlement_status NOT NULL DEFAULT 'PENDIENTE',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_advance_consecutive UNIQUE (accounts_receivable_id, consecutive_id)
);
";

const PROFORMAS_SQL: &str = r"
CREATE TABLE proformas (
    id UUID PRIMARY KEY,
    project_id UUID NOT NULL REFERENCES projects(id),
    provider_id UUID NOT NULL REFERENCES providers(id),
    brand_id UUID NOT NULL REFERENCES brands(id),
    amount NUMERIC(14,2) NOT NULL,
    currency currency_code NOT NULL,
    proforma_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    -- One provider+brand quote per project.
    CONSTRAINT uq_proforma_project_provider_brand UNIQUE (project_id, provider_id, brand_id)
);
";

const ACCOUNTS_PAYABLE_SQL: &str = r"
CREATE TABLE accounts_payable (
    id UUID PRIMARY KEY,
    proforma_id UUID REFERENCES proformas(id),
    project_id UUID REFERENCES projects(id),
    currency currency_code NOT NULL,
    total NUMERIC(14,2) NOT NULL DEFAULT 0,
    total_paid NUMERIC(14,2) NOT NULL DEFAULT 0,
    balance NUMERIC(14,2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_payable_proforma UNIQUE (proforma_id)
);
";

const ACCOUNT_PAYABLE_HISTORIES_SQL: &str = r"
CREATE TABLE account_payable_histories (
    id UUID PRIMARY KEY,
    account_payable_id UUID NOT NULL REFERENCES accounts_payable(id),
    provider_id UUID REFERENCES providers(id),
    amount NUMERIC(14,2) NOT NULL,
    currency currency_code NOT NULL,
    converted_amount NUMERIC(14,2),
    payment_date DATE,
    status settlement_status NOT NULL DEFAULT 'PENDIENTE',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CONTAINERS_SQL: &str = r"
CREATE TABLE containers (
    id UUID PRIMARY KEY,
    container_number TEXT NOT NULL,
    status container_status NOT NULL DEFAULT 'EN_CONSOLIDACION',
    pedimento TEXT,
    etd_date DATE,
    eta_date DATE,
    arrival_date TIMESTAMPTZ,
    shipping_date TIMESTAMPTZ,
    arrival_date_warehouse DATE,
    gross_weight NUMERIC(12,3),
    number_boxes INTEGER,
    measures TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const COLLECTIONS_SQL: &str = r"
CREATE TABLE collections (
    id UUID PRIMARY KEY,
    container_id UUID REFERENCES containers(id),
    name TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const PURCHASE_ORDERS_SQL: &str = r"
CREATE TABLE purchase_orders (
    id UUID PRIMARY KEY,
    account_payable_id UUID REFERENCES accounts_payable(id),
    proforma_id UUID REFERENCES proformas(id),
    accounts_receivable_id UUID REFERENCES accounts_receivable(id),
    project_id UUID REFERENCES projects(id),
    provider_id UUID REFERENCES providers(id),
    status purchase_order_status NOT NULL DEFAULT 'NUEVA',
    quantity INTEGER,
    total NUMERIC(14,2),
    production_end_date DATE,
    production_real_end_date DATE,
    production_start_date DATE,
    arrival_date DATE,
    collection_id UUID REFERENCES collections(id),
    is_paid BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- At most one funded purchase order per (payable, proforma) pair. This is
-- the backstop behind the check-then-create guard against concurrent
-- payment events. Pre-funding PENDIENTE sketches carry a NULL proforma and
-- stay outside the constraint.
CREATE UNIQUE INDEX uq_purchase_order_pair
    ON purchase_orders (account_payable_id, proforma_id)
    WHERE proforma_id IS NOT NULL;
";

const QUOTATION_PRODUCTS_SQL: &str = r"
CREATE TABLE quotation_products (
    id UUID PRIMARY KEY,
    quotation_id UUID NOT NULL REFERENCES quotations(id),
    provider_id UUID NOT NULL REFERENCES providers(id),
    brand_id UUID NOT NULL REFERENCES brands(id),
    description TEXT NOT NULL,
    sku TEXT,
    quantity INTEGER NOT NULL DEFAULT 1,
    currency currency_code NOT NULL,
    price NUMERIC(14,2),
    subtotal NUMERIC(14,2),
    status product_status NOT NULL DEFAULT 'COTIZADO',
    kind product_kind NOT NULL DEFAULT 'PEDIDO',
    proforma_id UUID REFERENCES proformas(id),
    purchase_order_id UUID REFERENCES purchase_orders(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX ix_quotation_products_quotation ON quotation_products (quotation_id);
CREATE INDEX ix_quotation_products_proforma ON quotation_products (proforma_id);
CREATE INDEX ix_quotation_products_provider_brand ON quotation_products (provider_id, brand_id);
";

const DELIVERY_REQUESTS_SQL: &str = r"
CREATE TABLE delivery_requests (
    id UUID PRIMARY KEY,
    project_id UUID NOT NULL REFERENCES projects(id),
    purchase_order_id UUID REFERENCES purchase_orders(id),
    delivery_day DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX ix_delivery_requests_day ON delivery_requests (delivery_day);
";

const COMMISSION_PAYMENT_RECORDS_SQL: &str = r"
CREATE TABLE commission_payment_records (
    id UUID PRIMARY KEY,
    project_id UUID NOT NULL REFERENCES projects(id),
    user_id UUID REFERENCES users(id),
    user_name TEXT,
    role commission_role NOT NULL,
    commission_percentage NUMERIC(5,2) NOT NULL,
    commission_amount NUMERIC(14,2) NOT NULL,
    project_total NUMERIC(14,2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const DOCUMENTS_SQL: &str = r"
CREATE TABLE documents (
    id UUID PRIMARY KEY,
    file_url TEXT NOT NULL,
    name TEXT NOT NULL,
    extension TEXT,
    proforma_id UUID REFERENCES proformas(id),
    project_id UUID REFERENCES projects(id),
    advance_payment_record_id UUID REFERENCES advance_payment_records(id),
    account_payable_history_id UUID REFERENCES account_payable_histories(id),
    container_id UUID REFERENCES containers(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS documents;
DROP TABLE IF EXISTS commission_payment_records;
DROP TABLE IF EXISTS delivery_requests;
DROP TABLE IF EXISTS quotation_products;
DROP TABLE IF EXISTS purchase_orders;
DROP TABLE IF EXISTS collections;
DROP TABLE IF EXISTS containers;
DROP TABLE IF EXISTS account_payable_histories;
DROP TABLE IF EXISTS accounts_payable;
DROP TABLE IF EXISTS proformas;
DROP TABLE IF EXISTS advance_payment_records;
DROP TABLE IF EXISTS accounts_receivable;
DROP TABLE IF EXISTS projects;
DROP TABLE IF EXISTS quotation_stakeholders;
DROP TABLE IF EXISTS proof_payments;
DROP TABLE IF EXISTS quotations;
DROP TABLE IF EXISTS brands;
DROP TABLE IF EXISTS providers;
DROP TABLE IF EXISTS customers;
DROP TABLE IF EXISTS users;

DROP TYPE IF EXISTS commission_role;
DROP TYPE IF EXISTS product_kind;
DROP TYPE IF EXISTS product_status;
DROP TYPE IF EXISTS project_status;
DROP TYPE IF EXISTS container_status;
DROP TYPE IF EXISTS purchase_order_status;
DROP TYPE IF EXISTS settlement_status;
DROP TYPE IF EXISTS currency_code;
";
