//! SIT balance calculation.

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::payment_request::types::{PaymentServiceItemStatus, param_keys};
use crate::sit::error::SitBalanceError;
use crate::sit::types::{ShipmentPaymentSitBalance, SitParam, SitServiceItem};

const SIT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Value written by pricers that cannot produce SIT dates yet.
const NOT_IMPLEMENTED: &str = "NOT IMPLEMENTED";

/// Dates and day count billed by one SIT service item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct BilledSit {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    days: i32,
}

impl BilledSit {
    fn from_params(params: &[SitParam]) -> Result<Self, SitBalanceError> {
        let mut billed = Self::default();
        let mut days_seen = false;

        for param in params {
            match param.key.as_str() {
                param_keys::SIT_PAYMENT_REQUEST_START => {
                    billed.start = parse_date(param_keys::SIT_PAYMENT_REQUEST_START, &param.value)?;
                }
                param_keys::SIT_PAYMENT_REQUEST_END => {
                    billed.end = parse_date(param_keys::SIT_PAYMENT_REQUEST_END, &param.value)?;
                }
                param_keys::NUMBER_DAYS_SIT if !days_seen => {
                    days_seen = true;
                    billed.days = parse_days(&param.value)?;
                }
                _ => {}
            }
        }

        Ok(billed)
    }
}

fn parse_days(value: &str) -> Result<i32, SitBalanceError> {
    let days: i32 = value
        .trim()
        .parse()
        .map_err(|source| SitBalanceError::InvalidDayCount {
            value: value.to_string(),
            source,
        })?;
    if days < 0 {
        return Err(SitBalanceError::NegativeDayCount {
            value: value.to_string(),
        });
    }
    Ok(days)
}

fn parse_date(key: &'static str, value: &str) -> Result<Option<NaiveDate>, SitBalanceError> {
    if value == NOT_IMPLEMENTED {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, SIT_DATE_FORMAT)
        .map(Some)
        .map_err(|source| SitBalanceError::InvalidDate {
            key,
            value: value.to_string(),
            source,
        })
}

/// Per-shipment balances in the order shipments were first seen.
#[derive(Debug, Default)]
struct Balances(Vec<ShipmentPaymentSitBalance>);

impl Balances {
    fn entry(&mut self, item: &SitServiceItem) -> &mut ShipmentPaymentSitBalance {
        let index = match self.position(item.shipment_id) {
            Some(index) => index,
            None => {
                self.0.push(ShipmentPaymentSitBalance::new(
                    item.shipment_id,
                    item.sit_days_allowance,
                ));
                self.0.len() - 1
            }
        };
        &mut self.0[index]
    }

    fn position(&self, shipment_id: Uuid) -> Option<usize> {
        self.0.iter().position(|b| b.shipment_id == shipment_id)
    }
}

/// Stateless calculator for shipment SIT balances.
pub struct SitBalanceCalculator;

impl SitBalanceCalculator {
    /// Returns true if any item bills additional days of SIT.
    #[must_use]
    pub fn has_additional_day_sit(items: &[SitServiceItem]) -> bool {
        items.iter().any(|item| item.code.is_additional_day_sit())
    }

    /// Computes one balance per shipment.
    ///
    /// `reviewed` holds the additional-day SIT items of previously reviewed
    /// requests, oldest request first. `pending` holds the items of the request
    /// under review. Denied reviewed items contribute nothing; pending items
    /// count whatever their status.
    pub fn calculate(
        reviewed: &[SitServiceItem],
        pending: &[SitServiceItem],
    ) -> Result<Vec<ShipmentPaymentSitBalance>, SitBalanceError> {
        let mut balances = Balances::default();

        for item in reviewed {
            if item.status != PaymentServiceItemStatus::Approved
                || !item.code.is_additional_day_sit()
            {
                continue;
            }
            let billed = BilledSit::from_params(&item.params)?;
            let balance = balances.entry(item);

            let billed_days = balance
                .previously_billed_days
                .unwrap_or(0)
                .checked_add(billed.days)
                .ok_or_else(|| overflow(item))?;
            balance.previously_billed_days = Some(billed_days);
            balance.previously_billed_end_date = balance.previously_billed_end_date.max(billed.end);
            if item.sit_days_allowance.is_some() {
                balance.total_sit_days_remaining = balance
                    .total_sit_days_authorized
                    .checked_sub(billed_days)
                    .ok_or_else(|| overflow(item))?;
            }
        }

        for item in pending {
            if !item.code.is_additional_day_sit() {
                continue;
            }
            let billed = BilledSit::from_params(&item.params)?;
            let balance = balances.entry(item);

            balance.pending_sit_days_invoiced = billed.days;
            balance.pending_billed_start_date = billed.start;
            balance.pending_billed_end_date = billed.end;
            if item.sit_days_allowance.is_some() {
                balance.total_sit_days_remaining = balance
                    .total_sit_days_remaining
                    .checked_sub(billed.days)
                    .ok_or_else(|| overflow(item))?;
                let remaining = i64::from(balance.total_sit_days_remaining);
                balance.total_sit_end_date = billed
                    .end
                    .and_then(|end| end.checked_add_signed(Duration::days(remaining + 1)));
            }
        }

        Ok(balances.0)
    }
}

fn overflow(item: &SitServiceItem) -> SitBalanceError {
    SitBalanceError::DayCountOverflow {
        shipment_id: item.shipment_id,
    }
}
