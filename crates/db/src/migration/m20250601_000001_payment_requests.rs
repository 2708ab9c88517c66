//! Payment request schema.
//!
//! Creates the move, shipment and service item tables the engine reads, and
//! the payment request tables it writes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(SCHEMA_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const SCHEMA_SQL: &str = r"
CREATE TABLE moves (
    id UUID PRIMARY KEY,
    locator VARCHAR(6) NOT NULL UNIQUE,
    reference_id VARCHAR(9),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE mto_shipments (
    id UUID PRIMARY KEY,
    move_id UUID NOT NULL REFERENCES moves(id),
    sit_days_allowance INTEGER,
    prime_actual_weight INTEGER,
    uses_external_vendor BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_mto_shipments_move ON mto_shipments(move_id);

CREATE TABLE re_services (
    id UUID PRIMARY KEY,
    code VARCHAR(20) NOT NULL UNIQUE,
    name VARCHAR(80) NOT NULL,
    priority INTEGER NOT NULL DEFAULT 99,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE mto_service_items (
    id UUID PRIMARY KEY,
    move_id UUID NOT NULL REFERENCES moves(id),
    mto_shipment_id UUID REFERENCES mto_shipments(id),
    re_service_id UUID NOT NULL REFERENCES re_services(id),
    status VARCHAR(20) NOT NULL,
    sit_entry_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_mto_service_items_move ON mto_service_items(move_id);
CREATE INDEX idx_mto_service_items_shipment ON mto_service_items(mto_shipment_id);

CREATE TABLE service_item_param_keys (
    id UUID PRIMARY KEY,
    key VARCHAR(80) NOT NULL UNIQUE,
    description VARCHAR(255) NOT NULL,
    param_type VARCHAR(20) NOT NULL,
    origin VARCHAR(10) NOT NULL CHECK (origin IN ('SYSTEM', 'PRIME', 'PRICER')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE service_params (
    id UUID PRIMARY KEY,
    service_id UUID NOT NULL REFERENCES re_services(id),
    service_item_param_key_id UUID NOT NULL REFERENCES service_item_param_keys(id),
    is_optional BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_service_params UNIQUE (service_id, service_item_param_key_id)
);

CREATE TABLE payment_requests (
    id UUID PRIMARY KEY,
    move_id UUID NOT NULL REFERENCES moves(id),
    is_final BOOLEAN NOT NULL DEFAULT FALSE,
    rejection_reason VARCHAR(255),
    status VARCHAR(40) NOT NULL CHECK (status IN (
        'PENDING',
        'REVIEWED',
        'REVIEWED_AND_ALL_SERVICE_ITEMS_REJECTED',
        'SENT_TO_GEX',
        'RECEIVED_BY_GEX',
        'PAID',
        'EDI_ERROR',
        'DEPRECATED'
    )),
    requested_at TIMESTAMPTZ NOT NULL,
    reviewed_at TIMESTAMPTZ,
    sent_to_gex_at TIMESTAMPTZ,
    received_by_gex_at TIMESTAMPTZ,
    paid_at TIMESTAMPTZ,
    payment_request_number VARCHAR(40) NOT NULL UNIQUE,
    sequence_number INTEGER NOT NULL CHECK (sequence_number >= 1),
    recalculation_of_payment_request_id UUID REFERENCES payment_requests(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_payment_requests_sequence UNIQUE (move_id, sequence_number)
);

CREATE INDEX idx_payment_requests_move_status ON payment_requests(move_id, status);

CREATE TABLE payment_service_items (
    id UUID PRIMARY KEY,
    payment_request_id UUID NOT NULL REFERENCES payment_requests(id),
    mto_service_item_id UUID NOT NULL REFERENCES mto_service_items(id),
    status VARCHAR(20) NOT NULL CHECK (status IN (
        'REQUESTED', 'APPROVED', 'DENIED', 'SENT_TO_GEX', 'PAID', 'EDI_ERROR'
    )),
    price_cents BIGINT,
    rejection_reason VARCHAR(255),
    requested_at TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_payment_service_items_request ON payment_service_items(payment_request_id);
CREATE INDEX idx_payment_service_items_mto_item ON payment_service_items(mto_service_item_id);

CREATE TABLE payment_service_item_params (
    id UUID PRIMARY KEY,
    payment_service_item_id UUID NOT NULL REFERENCES payment_service_items(id),
    service_item_param_key_id UUID NOT NULL REFERENCES service_item_param_keys(id),
    value VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_payment_service_item_params UNIQUE (payment_service_item_id, service_item_param_key_id)
);

CREATE TABLE proof_of_service_docs (
    id UUID PRIMARY KEY,
    payment_request_id UUID NOT NULL REFERENCES payment_requests(id),
    is_weight_ticket BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_proof_of_service_docs_request ON proof_of_service_docs(payment_request_id);

CREATE TABLE prime_uploads (
    id UUID PRIMARY KEY,
    proof_of_service_docs_id UUID NOT NULL REFERENCES proof_of_service_docs(id),
    contractor_id UUID NOT NULL,
    upload_id UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ
);

CREATE INDEX idx_prime_uploads_doc ON prime_uploads(proof_of_service_docs_id);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS prime_uploads CASCADE;
DROP TABLE IF EXISTS proof_of_service_docs CASCADE;
DROP TABLE IF EXISTS payment_service_item_params CASCADE;
DROP TABLE IF EXISTS payment_service_items CASCADE;
DROP TABLE IF EXISTS payment_requests CASCADE;
DROP TABLE IF EXISTS service_params CASCADE;
DROP TABLE IF EXISTS service_item_param_keys CASCADE;
DROP TABLE IF EXISTS mto_service_items CASCADE;
DROP TABLE IF EXISTS re_services CASCADE;
DROP TABLE IF EXISTS mto_shipments CASCADE;
DROP TABLE IF EXISTS moves CASCADE;
";
