//! Payment gateway port and its simulated adapter
//!
//! The simulated gateway never moves money. It hands back request ids so
//! that the payment record looks like a real STK push or card
//! authorisation; settlement happens when staff update the payment status.

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::DomainResult;

/// Ids returned when an MPesa STK push is accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StkPushRequest {
    pub merchant_request_id: String,
    pub checkout_request_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardAuthorization {
    pub authorization_code: String,
    pub cvv_verified: bool,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Ask the wallet at `phone_number` to approve a charge.
    async fn stk_push(
        &self,
        phone_number: &str,
        amount: Decimal,
        reference: &str,
    ) -> DomainResult<StkPushRequest>;

    /// Authorise a card charge. Only the last four digits and the CVV
    /// outcome leave this call.
    async fn authorize_card(
        &self,
        card_last4: &str,
        cvv: &str,
        amount: Decimal,
        reference: &str,
    ) -> DomainResult<CardAuthorization>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedGateway;

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn stk_push(
        &self,
        phone_number: &str,
        amount: Decimal,
        reference: &str,
    ) -> DomainResult<StkPushRequest> {
        let mut rng = rand::thread_rng();
        let request = StkPushRequest {
            merchant_request_id: format!(
                "{}-{}-1",
                rng.gen_range(10_000..100_000),
                rng.gen_range(10_000_000..100_000_000)
            ),
            checkout_request_id: format!(
                "ws_CO_{}{}",
                Utc::now().format("%d%m%Y%H%M%S"),
                rng.gen_range(100..1_000)
            ),
        };
        debug!(phone_number, %amount, reference, checkout = %request.checkout_request_id, "Simulated STK push");
        Ok(request)
    }

    async fn authorize_card(
        &self,
        card_last4: &str,
        cvv: &str,
        amount: Decimal,
        reference: &str,
    ) -> DomainResult<CardAuthorization> {
        let code: u32 = rand::thread_rng().gen_range(0..0x100_0000);
        let authorization = CardAuthorization {
            authorization_code: format!("{:06X}", code),
            cvv_verified: matches!(cvv.len(), 3 | 4) && cvv.bytes().all(|b| b.is_ascii_digit()),
        };
        debug!(card_last4, %amount, reference, "Simulated card authorisation");
        Ok(authorization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn simulated_stk_push_ids() {
        let req = SimulatedGateway
            .stk_push("254712345678", Decimal::from(100), "PAY-1")
            .await
            .unwrap();
        assert!(req.checkout_request_id.starts_with("ws_CO_"));
        assert_eq!(req.merchant_request_id.split('-').count(), 3);
    }

    #[tokio::test]
    async fn simulated_card_authorisation() {
        let auth = SimulatedGateway
            .authorize_card("4242", "123", Decimal::from(100), "PAY-1")
            .await
            .unwrap();
        assert_eq!(auth.authorization_code.len(), 6);
        assert!(auth.cvv_verified);

        let auth = SimulatedGateway
            .authorize_card("4242", "12a", Decimal::from(100), "PAY-1")
            .await
            .unwrap();
        assert!(!auth.cvv_verified);
    }
}
