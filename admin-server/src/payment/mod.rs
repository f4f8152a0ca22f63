//! Payment gateway
//!
//! [`PaymentGateway`] is the seam the order routes charge through; the
//! production implementation is [`OpenpayGateway`].

mod openpay;

pub use openpay::OpenpayGateway;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderStatus, PaymentRequest};

#[derive(Debug, Error)]
pub enum PaymentError {
    /// The gateway answered and refused the operation (declined card, ...)
    #[error("payment rejected ({code}): {message}")]
    Rejected { code: i64, message: String },

    /// Transport failure or unexpected response
    #[error("payment gateway error: {0}")]
    Gateway(String),
}

impl From<reqwest::Error> for PaymentError {
    fn from(e: reqwest::Error) -> Self {
        PaymentError::Gateway(e.to_string())
    }
}

impl From<PaymentError> for AppError {
    fn from(e: PaymentError) -> Self {
        match e {
            PaymentError::Rejected { code, message } => {
                tracing::warn!(gateway_code = code, message = %message, "Payment rejected");
                AppError::with_message(ErrorCode::PaymentFailed, message)
                    .with_detail("gateway_code", code)
            }
            PaymentError::Gateway(message) => {
                tracing::error!(error = %message, "Payment gateway error");
                AppError::with_message(
                    ErrorCode::PaymentGatewayError,
                    "El servicio de pagos no está disponible",
                )
            }
        }
    }
}

/// Card charge against an existing customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeRequest {
    /// Amount in cents
    pub amount: i64,
    pub description: String,
    /// Our order id, used by the gateway for idempotency
    pub order_id: String,
    /// Card token from the client-side library
    pub source_id: String,
    pub device_session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Charge {
    pub id: String,
    pub status: String,
    /// Amount in cents
    pub amount: i64,
}

impl Charge {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Register a customer and return the gateway's customer id
    async fn create_customer(&self, name: &str, email: &str) -> Result<String, PaymentError>;

    async fn create_charge(
        &self,
        customer_id: &str,
        request: &ChargeRequest,
    ) -> Result<Charge, PaymentError>;
}

/// Only pending orders can be charged
pub fn ensure_payable(order: &Order) -> Result<(), AppError> {
    match order.status {
        OrderStatus::Pending => Ok(()),
        OrderStatus::Cancelled => Err(AppError::new(ErrorCode::OrderCancelled)),
        OrderStatus::Paid | OrderStatus::Shipped | OrderStatus::Delivered => {
            Err(AppError::new(ErrorCode::OrderAlreadyPaid))
        }
    }
}

/// Charge the frozen total of `order` to `customer_id`
///
/// A charge the gateway accepted but did not complete counts as failed.
pub async fn charge_order(
    gateway: &dyn PaymentGateway,
    customer_id: &str,
    order: &Order,
    payment: &PaymentRequest,
) -> Result<Charge, AppError> {
    ensure_payable(order)?;

    let request = ChargeRequest {
        amount: order.total,
        description: format!("Pedido {}", order.id),
        order_id: order.id.to_string(),
        source_id: payment.source_id.clone(),
        device_session_id: payment.device_session_id.clone(),
    };
    let charge = gateway.create_charge(customer_id, &request).await?;

    if !charge.is_completed() {
        tracing::warn!(order_id = %order.id, charge_id = %charge.id, status = %charge.status, "Charge not completed");
        return Err(AppError::with_message(ErrorCode::PaymentFailed, "El pago no se completó")
            .with_detail("charge_status", charge.status.as_str()));
    }
    if charge.amount != order.total {
        tracing::warn!(
            order_id = %order.id,
            charged = charge.amount,
            expected = order.total,
            "Charged amount differs from order total"
        );
    }
    Ok(charge)
}
