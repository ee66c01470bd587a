//! Credit balance and checkout payment methods

use super::client::WalletClient;
use super::types::{CreditBalance, PaymentStatus};
use crate::utils::error::{Result, WalletError};
use crate::utils::net::{PollOutcome, PollPolicy, poll_until};
use crate::utils::sys::CancelFlag;
use reqwest::Method;
use tracing::{debug, info, warn};

impl WalletClient {
    /// Current credit balance
    pub async fn credit_balance(&self) -> Result<u64> {
        let request = self.authorized(Method::GET, self.endpoint(&["credits", "balance"])?)?;
        let balance: CreditBalance = self.send_json(request).await?;
        debug!("Credit balance: {}", balance.credits);
        Ok(balance.credits)
    }

    /// Status of a checkout session
    pub async fn payment_status(&self, checkout_session_id: &str) -> Result<PaymentStatus> {
        let url = self.endpoint(&["payments", "session", checkout_session_id])?;
        let request = self.authorized(Method::GET, url)?;
        self.send_json(request).await
    }

    /// Poll a checkout session until it is paid.
    ///
    /// A `failed` or `expired` status ends polling with a payment error.
    /// Transient request failures are logged and count as an attempt.
    pub async fn await_payment(
        &self,
        checkout_session_id: &str,
        policy: &PollPolicy,
        cancel: &CancelFlag,
    ) -> Result<PollOutcome<PaymentStatus>> {
        info!("Waiting for payment of checkout {}", checkout_session_id);

        poll_until(policy, cancel, |attempt| async move {
            match self.payment_status(checkout_session_id).await {
                Ok(status) if status.is_paid() => Ok(Some(status)),
                Ok(status) if status.is_failed() => Err(WalletError::payment(format!(
                    "Checkout {} ended with status '{}'",
                    checkout_session_id, status.status
                ))),
                Ok(status) => {
                    debug!(
                        "Checkout {} still '{}' (attempt {})",
                        checkout_session_id, status.status, attempt
                    );
                    Ok(None)
                }
                Err(e) if e.is_retryable() => {
                    warn!("Payment status check failed (attempt {}): {}", attempt, e);
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        })
        .await
    }

    /// Poll the balance until it differs from `previous`
    pub async fn await_credit_change(
        &self,
        previous: u64,
        policy: &PollPolicy,
        cancel: &CancelFlag,
    ) -> Result<PollOutcome<u64>> {
        poll_until(policy, cancel, |attempt| async move {
            match self.credit_balance().await {
                Ok(credits) if credits != previous => {
                    info!("Credit balance changed: {} -> {}", previous, credits);
                    Ok(Some(credits))
                }
                Ok(_) => Ok(None),
                Err(e) if e.is_retryable() => {
                    warn!("Balance check failed (attempt {}): {}", attempt, e);
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        })
        .await
    }
}
