//! Openpay integration via REST API (no SDK dependency)
//!
//! Authentication is HTTP basic with the private key as user name.
//! Amounts travel as decimal pesos (MXN).

use async_trait::async_trait;
use rust_decimal::prelude::*;
use serde_json::{Value, json};

use super::{Charge, ChargeRequest, PaymentError, PaymentGateway};
use crate::pricing::money::cents_to_units;

const SANDBOX_URL: &str = "https://sandbox-api.openpay.mx/v1";
const PRODUCTION_URL: &str = "https://api.openpay.mx/v1";
const CURRENCY: &str = "MXN";

#[derive(Clone)]
pub struct OpenpayGateway {
    client: reqwest::Client,
    /// `{api}/{merchant_id}`
    base_url: String,
    private_key: String,
}

impl OpenpayGateway {
    pub fn new(merchant_id: &str, private_key: impl Into<String>, sandbox: bool) -> Self {
        let api = if sandbox { SANDBOX_URL } else { PRODUCTION_URL };
        Self {
            client: reqwest::Client::new(),
            base_url: format!("{api}/{merchant_id}"),
            private_key: private_key.into(),
        }
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, PaymentError> {
        let resp = self
            .client
            .post(format!("{}{path}", self.base_url))
            .basic_auth(&self.private_key, None::<&str>)
            .json(body)
            .send()
            .await?;
        let status = resp.status();
        let body: Value = resp.json().await?;
        parse_response(status.as_u16(), body)
    }
}

/// Split a gateway reply into success payload or [`PaymentError`]
fn parse_response(status: u16, body: Value) -> Result<Value, PaymentError> {
    if (200..300).contains(&status) {
        return Ok(body);
    }
    match body["error_code"].as_i64() {
        // 1xxx: request/auth problems on our side, 2xxx+: card/customer rejections
        Some(code) if code >= 2000 => Err(PaymentError::Rejected {
            code,
            message: body["description"]
                .as_str()
                .unwrap_or("Pago rechazado")
                .to_string(),
        }),
        _ => Err(PaymentError::Gateway(format!("HTTP {status}: {body}"))),
    }
}

fn charge_body(request: &ChargeRequest) -> Value {
    let amount = cents_to_units(request.amount).to_f64().unwrap_or_default();
    json!({
        "method": "card",
        "source_id": request.source_id,
        "amount": amount,
        "currency": CURRENCY,
        "description": request.description,
        "order_id": request.order_id,
        "device_session_id": request.device_session_id,
    })
}

fn parse_charge(body: &Value) -> Result<Charge, PaymentError> {
    let id = body["id"]
        .as_str()
        .ok_or_else(|| PaymentError::Gateway(format!("charge without id: {body}")))?;
    let amount = body["amount"]
        .as_f64()
        .and_then(Decimal::from_f64)
        .and_then(|units| {
            (units * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .ok_or_else(|| PaymentError::Gateway(format!("charge without amount: {body}")))?;

    Ok(Charge {
        id: id.to_string(),
        status: body["status"].as_str().unwrap_or("unknown").to_string(),
        amount,
    })
}

#[async_trait]
impl PaymentGateway for OpenpayGateway {
    async fn create_customer(&self, name: &str, email: &str) -> Result<String, PaymentError> {
        let resp = self
            .post(
                "/customers",
                &json!({ "name": name, "email": email, "requires_account": false }),
            )
            .await?;

        resp["id"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| PaymentError::Gateway(format!("create_customer failed: {resp}")))
    }

    async fn create_charge(
        &self,
        customer_id: &str,
        request: &ChargeRequest,
    ) -> Result<Charge, PaymentError> {
        let resp = self
            .post(
                &format!("/customers/{customer_id}/charges"),
                &charge_body(request),
            )
            .await?;
        parse_charge(&resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ChargeRequest {
        ChargeRequest {
            amount: 17_400,
            description: "Pedido 99".into(),
            order_id: "99".into(),
            source_id: "tok_123".into(),
            device_session_id: "dev_1".into(),
        }
    }

    #[test]
    fn test_base_url() {
        let sandbox = OpenpayGateway::new("m1", "sk", true);
        assert_eq!(sandbox.base_url, "https://sandbox-api.openpay.mx/v1/m1");
        let live = OpenpayGateway::new("m1", "sk", false);
        assert_eq!(live.base_url, "https://api.openpay.mx/v1/m1");
    }

    #[test]
    fn test_charge_body_uses_currency_units() {
        let body = charge_body(&request());
        assert_eq!(body["amount"], json!(174.0));
        assert_eq!(body["currency"], "MXN");
        assert_eq!(body["method"], "card");
        assert_eq!(body["order_id"], "99");
    }

    #[test]
    fn test_parse_charge() {
        let charge = parse_charge(&json!({
            "id": "tr_abc",
            "status": "completed",
            "amount": 174.01
        }))
        .unwrap();
        assert_eq!(charge.amount, 17_401);
        assert!(charge.is_completed());
    }

    #[test]
    fn test_parse_response_errors() {
        let declined = parse_response(
            402,
            json!({ "error_code": 3001, "description": "The card was declined" }),
        );
        assert!(matches!(
            declined,
            Err(PaymentError::Rejected { code: 3001, .. })
        ));

        let auth = parse_response(401, json!({ "error_code": 1002 }));
        assert!(matches!(auth, Err(PaymentError::Gateway(_))));

        assert!(parse_response(200, json!({ "id": "x" })).is_ok());
    }
}
