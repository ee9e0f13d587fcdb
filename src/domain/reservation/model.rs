//! Unit reservation entity

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::domain::{DomainError, DomainResult};

/// Default hold before an unpaid reservation lapses.
pub const DEFAULT_HOLD_HOURS: i64 = 24;

/// Reservation status
///
/// ```text
/// Pending ──► Confirmed   (deposit paid before expiry)
///    ├──────► Cancelled
///    └──────► Expired     (time)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    /// Waiting for the security deposit
    Pending,
    /// Deposit paid, unit assigned
    Confirmed,
    /// Cancelled by tenant or staff
    Cancelled,
    /// Hold ran out before payment
    Expired,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending Payment",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
            Self::Expired => "Expired",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tenant's hold on a rental unit
#[derive(Debug, Clone)]
pub struct UnitReservation {
    pub id: i32,
    pub unit_id: i32,
    pub tenant_id: String,
    pub status: ReservationStatus,
    pub reservation_date: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub intended_move_in_date: NaiveDate,
    pub security_deposit_paid: bool,
    pub payment_reference: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub notes: String,
    pub updated_at: DateTime<Utc>,
}

impl UnitReservation {
    pub fn new(
        unit_id: i32,
        tenant_id: impl Into<String>,
        intended_move_in_date: NaiveDate,
        notes: impl Into<String>,
        hold: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            unit_id,
            tenant_id: tenant_id.into(),
            status: ReservationStatus::Pending,
            reservation_date: now,
            expires_at: now + hold,
            intended_move_in_date,
            security_deposit_paid: false,
            payment_reference: None,
            payment_date: None,
            notes: notes.into(),
            updated_at: now,
        }
    }

    pub fn is_past_expiry(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Status as seen at `now`; a lapsed pending hold reads as expired.
    pub fn effective_status(&self, now: DateTime<Utc>) -> ReservationStatus {
        match self.status {
            ReservationStatus::Pending if self.is_past_expiry(now) => ReservationStatus::Expired,
            s => s,
        }
    }

    /// Pending and still inside its hold window.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.effective_status(now) == ReservationStatus::Pending
    }

    pub fn cancel(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.transition(ReservationStatus::Cancelled, now)
    }

    pub fn expire(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == ReservationStatus::Pending && !self.is_past_expiry(now) {
            return Err(DomainError::Validation(
                "Reservation has not reached its expiry time".into(),
            ));
        }
        self.status = self.checked(ReservationStatus::Expired)?;
        self.updated_at = now;
        Ok(())
    }

    /// Record the deposit payment and confirm.
    pub fn confirm(&mut self, payment_reference: &str, now: DateTime<Utc>) -> DomainResult<()> {
        self.transition(ReservationStatus::Confirmed, now)?;
        self.security_deposit_paid = true;
        self.payment_reference = Some(payment_reference.to_string());
        self.payment_date = Some(now);
        Ok(())
    }

    fn transition(&mut self, next: ReservationStatus, now: DateTime<Utc>) -> DomainResult<()> {
        if self.effective_status(now) == ReservationStatus::Expired {
            return Err(DomainError::Validation("Reservation has expired".into()));
        }
        self.status = self.checked(next)?;
        self.updated_at = now;
        Ok(())
    }

    fn checked(&self, next: ReservationStatus) -> DomainResult<ReservationStatus> {
        if self.status == ReservationStatus::Pending && next != ReservationStatus::Pending {
            Ok(next)
        } else {
            Err(DomainError::Validation(format!(
                "Cannot change reservation status from {} to {}",
                self.status, next
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_reservation() -> UnitReservation {
        UnitReservation::new(
            3,
            "tenant-1",
            Utc::now().date_naive(),
            "",
            Duration::hours(DEFAULT_HOLD_HOURS),
        )
    }

    #[test]
    fn new_reservation_holds_for_a_day() {
        let r = sample_reservation();
        assert_eq!(r.status, ReservationStatus::Pending);
        assert_eq!(r.expires_at - r.reservation_date, Duration::hours(24));
        assert!(r.is_live(Utc::now()));
        assert!(!r.security_deposit_paid);
    }

    #[test]
    fn lapsed_pending_reads_as_expired() {
        let r = sample_reservation();
        let later = r.expires_at + Duration::seconds(1);
        assert_eq!(r.effective_status(later), ReservationStatus::Expired);
        assert!(!r.is_live(later));
        assert_eq!(r.status, ReservationStatus::Pending);
    }

    #[test]
    fn confirm_records_payment() {
        let mut r = sample_reservation();
        r.confirm("PAY-0A1B2C3D", Utc::now()).unwrap();
        assert_eq!(r.status, ReservationStatus::Confirmed);
        assert!(r.security_deposit_paid);
        assert_eq!(r.payment_reference.as_deref(), Some("PAY-0A1B2C3D"));
        assert!(r.payment_date.is_some());
    }

    #[test]
    fn cannot_confirm_after_expiry() {
        let mut r = sample_reservation();
        let later = r.expires_at + Duration::minutes(5);
        assert!(r.confirm("PAY-1", later).is_err());
        assert_eq!(r.status, ReservationStatus::Pending);
    }

    #[test]
    fn only_pending_can_be_cancelled() {
        let mut r = sample_reservation();
        r.cancel(Utc::now()).unwrap();
        assert_eq!(r.status, ReservationStatus::Cancelled);
        assert!(r.cancel(Utc::now()).is_err());
        assert!(r.confirm("PAY-1", Utc::now()).is_err());
    }

    #[test]
    fn expire_requires_lapsed_hold() {
        let mut r = sample_reservation();
        assert!(r.expire(Utc::now()).is_err());
        let later = r.expires_at + Duration::seconds(1);
        r.expire(later).unwrap();
        assert_eq!(r.status, ReservationStatus::Expired);
        assert!(r.expire(later).is_err());
    }

    #[test]
    fn confirmed_cannot_expire() {
        let mut r = sample_reservation();
        r.confirm("PAY-1", Utc::now()).unwrap();
        assert!(r.expire(r.expires_at + Duration::hours(1)).is_err());
    }

    #[test]
    fn status_parse() {
        assert_eq!(ReservationStatus::parse("Pending"), Some(ReservationStatus::Pending));
        assert_eq!(ReservationStatus::parse("used"), None);
    }
}
