//! Resolving which parameters a service item needs for pricing.

use std::sync::Arc;

use relo_core::payment_request::{
    MissingServiceParams, PaymentRequestError, ReServiceCode, RequiredServiceParam,
    ServiceCodeSwaps, valid_service_param_list,
};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::debug;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::ServiceItemParamOrigin;
use crate::entities::{re_services, service_item_param_keys, service_params};

/// A service parameter requirement with its key.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceParamWithKey {
    /// The requirement row.
    pub service_param: service_params::Model,
    /// The key it requires.
    pub key: service_item_param_keys::Model,
}

impl ServiceParamWithKey {
    /// The requirement as checked by parameter validation.
    pub fn requirement(&self) -> RequiredServiceParam {
        RequiredServiceParam {
            service_id: self.service_param.service_id,
            key: self.key.key.clone(),
            is_optional: self.service_param.is_optional,
        }
    }
}

/// Looks up pricing parameter requirements, honouring service code swaps.
#[derive(Debug, Clone)]
pub struct PriceLookupService {
    swaps: Arc<ServiceCodeSwaps>,
}

impl PriceLookupService {
    /// Creates a lookup service with the given swap table.
    #[must_use]
    pub fn new(swaps: Arc<ServiceCodeSwaps>) -> Self {
        Self { swaps }
    }

    /// Returns the service whose parameter set prices `service`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the swap target is not stored.
    pub async fn resolve_service_for_lookup<C: ConnectionTrait>(
        &self,
        db: &C,
        service: &re_services::Model,
    ) -> Result<re_services::Model, PaymentRequestError> {
        let Some(target) = ReServiceCode::parse(&service.code).and_then(|c| self.swaps.swap_for(c))
        else {
            return Ok(service.clone());
        };

        debug!(from = %service.code, to = %target, "pricing with swapped service params");
        re_services::Entity::find()
            .filter(re_services::Column::Code.eq(target.as_str()))
            .one(db)
            .await
            .map_err(|e| PaymentRequestError::query("ReService", e))?
            .ok_or_else(|| {
                PaymentRequestError::not_found(
                    service.id,
                    format!("ReService with code {target} used to price {}", service.code),
                )
            })
    }

    /// Returns the priced-as service and its non-pricer parameter requirements.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the swap target is not stored, or `Query` on
    /// database failure.
    pub async fn fetch_service_param_list<C: ConnectionTrait>(
        &self,
        db: &C,
        service: &re_services::Model,
    ) -> Result<(re_services::Model, Vec<ServiceParamWithKey>), PaymentRequestError> {
        let priced_as = self.resolve_service_for_lookup(db, service).await?;

        let rows = service_params::Entity::find()
            .filter(service_params::Column::ServiceId.eq(priced_as.id))
            .find_also_related(service_item_param_keys::Entity)
            .order_by_asc(service_params::Column::CreatedAt)
            .order_by_asc(service_params::Column::Id)
            .all(db)
            .await
            .map_err(|e| PaymentRequestError::query("ServiceParam", e))?;

        let params = rows
            .into_iter()
            .filter_map(|(service_param, key)| {
                key.map(|key| ServiceParamWithKey { service_param, key })
            })
            .filter(|p| p.key.origin != ServiceItemParamOrigin::Pricer)
            .collect();

        Ok((priced_as, params))
    }

    /// Checks that every requirement is met by the supplied keys.
    ///
    /// # Errors
    ///
    /// Returns the missing keys when any requirement is unmet.
    pub fn valid_service_param_list<'a>(
        &self,
        mto_service_item_id: Uuid,
        priced_as: &re_services::Model,
        required: &[ServiceParamWithKey],
        supplied_keys: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), MissingServiceParams> {
        let requirements: Vec<RequiredServiceParam> =
            required.iter().map(ServiceParamWithKey::requirement).collect();
        valid_service_param_list(mto_service_item_id, priced_as.id, &requirements, supplied_keys)
    }
}

impl Default for PriceLookupService {
    fn default() -> Self {
        Self::new(Arc::new(ServiceCodeSwaps::standard()))
    }
}
