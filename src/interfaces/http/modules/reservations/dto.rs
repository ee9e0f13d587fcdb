//! Reservation DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::UnitReservation;

/// Hold a unit for the configured window while the deposit is paid
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    pub unit_id: i32,
    pub intended_move_in_date: NaiveDate,
    #[validate(length(max = 1000, message = "notes must be at most 1000 characters"))]
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationDto {
    pub id: i32,
    pub unit_id: i32,
    pub tenant_id: String,
    /// `pending`, `confirmed`, `cancelled` or `expired`
    pub status: String,
    pub status_display: String,
    pub reservation_date: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Whole seconds left on a pending hold
    pub seconds_remaining: i64,
    pub intended_move_in_date: NaiveDate,
    pub security_deposit_paid: bool,
    pub payment_reference: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub notes: String,
}

impl From<UnitReservation> for ReservationDto {
    fn from(r: UnitReservation) -> Self {
        let now = Utc::now();
        let status = r.effective_status(now);
        let seconds_remaining = if r.is_live(now) {
            (r.expires_at - now).num_seconds().max(0)
        } else {
            0
        };
        Self {
            status: status.as_str().to_string(),
            status_display: status.display_name().to_string(),
            seconds_remaining,
            id: r.id,
            unit_id: r.unit_id,
            tenant_id: r.tenant_id,
            reservation_date: r.reservation_date,
            expires_at: r.expires_at,
            intended_move_in_date: r.intended_move_in_date,
            security_deposit_paid: r.security_deposit_paid,
            payment_reference: r.payment_reference,
            payment_date: r.payment_date,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListReservationsParams {
    /// Status filter, e.g. `pending`
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn lapsed_hold_reads_as_expired() {
        let move_in = NaiveDate::from_ymd_opt(2026, 11, 1).unwrap();
        let mut r = UnitReservation::new(7, "tenant-1", move_in, "", Duration::hours(24));
        let live = ReservationDto::from(r.clone());
        assert_eq!(live.status, "pending");
        assert!(live.seconds_remaining > 23 * 3600);

        r.expires_at = Utc::now() - Duration::minutes(5);
        let lapsed = ReservationDto::from(r);
        assert_eq!(lapsed.status, "expired");
        assert_eq!(lapsed.seconds_remaining, 0);
    }
}
