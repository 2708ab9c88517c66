//! SIT balances for the shipments billed on a payment request.

use relo_core::payment_request::{PaymentRequestError, PaymentRequestStatus, ReServiceCode};
use relo_core::sit::{ShipmentPaymentSitBalance, SitBalanceCalculator, SitParam, SitServiceItem};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums;
use crate::entities::{mto_service_items, payment_requests, payment_service_items, re_services};

use super::payment_request::{ServiceItemDetail, load_payment_request, load_service_items};

/// Reports SIT days authorized, billed and remaining per shipment.
#[derive(Clone)]
pub struct ShipmentPaymentSitBalanceService {
    db: DatabaseConnection,
}

impl ShipmentPaymentSitBalanceService {
    /// Creates a new balance service.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists SIT balances for the shipments with additional-day SIT on the request.
    ///
    /// Returns `None` when the request bills no additional-day SIT.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown request, `SitBalance` when stored
    /// SIT dates or day counts cannot be parsed, and `Query` on database failure.
    #[instrument(skip(self))]
    pub async fn list_shipment_payment_sit_balance(
        &self,
        payment_request_id: Uuid,
    ) -> Result<Option<Vec<ShipmentPaymentSitBalance>>, PaymentRequestError> {
        let current = load_payment_request(&self.db, payment_request_id).await?;

        let pending = sit_items(&current.service_items);
        if !SitBalanceCalculator::has_additional_day_sit(&pending) {
            return Ok(None);
        }

        let codes = ReServiceCode::ADDITIONAL_DAY_SIT.map(|code| code.as_str());
        let reviewed_rows = payment_service_items::Entity::find()
            .join(
                JoinType::InnerJoin,
                payment_service_items::Relation::PaymentRequests.def(),
            )
            .join(
                JoinType::InnerJoin,
                payment_service_items::Relation::MtoServiceItems.def(),
            )
            .join(JoinType::InnerJoin, mto_service_items::Relation::ReServices.def())
            .filter(payment_requests::Column::MoveId.eq(current.request.move_id))
            .filter(payment_requests::Column::Id.ne(payment_request_id))
            .filter(payment_requests::Column::Status.eq(
                sea_orm_active_enums::PaymentRequestStatus::from(PaymentRequestStatus::Reviewed),
            ))
            .filter(re_services::Column::Code.is_in(codes))
            .order_by_asc(payment_requests::Column::CreatedAt)
            .order_by_asc(mto_service_items::Column::SitEntryDate)
            .order_by_asc(payment_service_items::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PaymentRequestError::query("PaymentServiceItem", e))?;

        let reviewed = sit_items(&load_service_items(&self.db, reviewed_rows).await?);
        debug!(
            pending = pending.len(),
            reviewed = reviewed.len(),
            "calculating SIT balances"
        );

        Ok(Some(SitBalanceCalculator::calculate(&reviewed, &pending)?))
    }
}

/// Additional-day SIT items with a shipment. Other items carry no balance.
fn sit_items(details: &[ServiceItemDetail]) -> Vec<SitServiceItem> {
    details
        .iter()
        .filter_map(|detail| {
            let code = detail.code().filter(ReServiceCode::is_additional_day_sit)?;
            let shipment = detail.shipment.as_ref()?;
            Some(SitServiceItem {
                shipment_id: shipment.id,
                sit_days_allowance: shipment.sit_days_allowance,
                code,
                status: detail.item.status.into(),
                params: detail
                    .params
                    .iter()
                    .map(|p| SitParam::new(p.key.key.clone(), p.param.value.clone()))
                    .collect(),
            })
        })
        .collect()
}
