use anyhow::{Context, Result};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::Sha256;
use tracing::{error, info, warn};

use super::{
    CaptureOutcome, CaptureRequest, CreateProviderOrder, PaymentGateway, PaymentProvider,
    ProviderOrder,
};
use crate::common::config::{RazorpayConfig, RazorpayMode};

type HmacSha256 = Hmac<Sha256>;

const BASE_URL: &str = "https://api.razorpay.com/v1";

/// Razorpay Orders/Payments API client built on reqwest.
pub struct RazorpayClient {
    http: reqwest::Client,
    config: RazorpayConfig,
}

#[derive(Debug, Deserialize)]
struct RazorpayOrder {
    id: String,
    amount: i64,
    currency: String,
    receipt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RazorpayPayment {
    pub id: String,
    pub order_id: Option<String>,
    pub status: String,
    pub amount: i64,
    pub currency: String,
    pub method: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorEnvelope {
    error: RazorpayErrorDetails,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorDetails {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct CapturePaymentBody<'a> {
    amount: i64,
    currency: &'a str,
}

/// What a fetched payment means for the order it should settle.
#[derive(Debug, PartialEq)]
pub(crate) enum PaymentCheck {
    Captured,
    NeedsCapture,
    Rejected(String),
}

pub(crate) fn check_payment(payment: &RazorpayPayment, provider_order_id: &str) -> PaymentCheck {
    if payment.order_id.as_deref() != Some(provider_order_id) {
        return PaymentCheck::Rejected("Payment does not match order ID".into());
    }
    match payment.status.as_str() {
        "captured" => PaymentCheck::Captured,
        "authorized" => PaymentCheck::NeedsCapture,
        other => PaymentCheck::Rejected(format!("Payment is {other}")),
    }
}

/// Checks the `razorpay_signature` the checkout widget hands back:
/// hex HMAC-SHA256 of `"{order_id}|{payment_id}"` keyed with the key secret.
pub fn verify_signature(key_secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(key_secret.as_bytes()) else {
        return false;
    };
    mac.update(format!("{order_id}|{payment_id}").as_bytes());
    mac.verify_slice(&expected).is_ok()
}

/// Razorpay takes amounts in the currency's minor unit (paise for INR).
fn to_minor_units(amount: i64) -> i64 {
    amount * 100
}

impl RazorpayClient {
    pub fn new(http: reqwest::Client, config: RazorpayConfig) -> Self {
        Self { http, config }
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let (error_code, error_description) =
            match serde_json::from_str::<RazorpayErrorEnvelope>(&body) {
                Ok(envelope) => (envelope.error.code, envelope.error.description),
                Err(_) => (None, None),
            };

        error!(
            status = %status,
            razorpay_error_code = ?error_code,
            razorpay_error_description = ?error_description,
            response_body = %body,
            context = %context,
            "razorpay api request failed"
        );

        anyhow::bail!("Razorpay API request failed: {} (status {})", context, status);
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<RazorpayPayment> {
        let resp = self
            .http
            .get(format!("{BASE_URL}/payments/{payment_id}"))
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .send()
            .await
            .context("Failed to reach Razorpay")?;

        Self::ensure_success(resp, "fetch payment")
            .await?
            .json()
            .await
            .context("Failed to parse Razorpay payment")
    }

    async fn capture_payment(&self, payment: &RazorpayPayment) -> Result<RazorpayPayment> {
        let resp = self
            .http
            .post(format!("{BASE_URL}/payments/{}/capture", payment.id))
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&CapturePaymentBody {
                amount: payment.amount,
                currency: &payment.currency,
            })
            .send()
            .await
            .context("Failed to reach Razorpay")?;

        Self::ensure_success(resp, "capture payment")
            .await?
            .json()
            .await
            .context("Failed to parse Razorpay payment")
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    fn provider(&self) -> PaymentProvider {
        PaymentProvider::Razorpay
    }

    fn public_key(&self) -> Option<String> {
        Some(self.config.key_id.clone())
    }

    fn requires_payment_id(&self) -> bool {
        true
    }

    async fn create_order(&self, request: CreateProviderOrder) -> Result<ProviderOrder> {
        let environment = match self.config.mode {
            RazorpayMode::Live => "production",
            RazorpayMode::Test => "test",
        };

        let body = json!({
            "amount": to_minor_units(request.amount),
            "currency": request.currency,
            "receipt": request.receipt,
            "payment_capture": 1,
            "notes": {
                "description": request.description,
                "environment": environment,
            },
        });

        let resp = self
            .http
            .post(format!("{BASE_URL}/orders"))
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&body)
            .send()
            .await
            .context("Failed to reach Razorpay")?;

        let order: RazorpayOrder = Self::ensure_success(resp, "create order")
            .await?
            .json()
            .await
            .context("Failed to parse Razorpay order")?;

        info!(
            razorpay_order_id = %order.id,
            amount = order.amount,
            currency = %order.currency,
            receipt = ?order.receipt,
            "Razorpay order created"
        );

        Ok(ProviderOrder { id: order.id })
    }

    async fn capture(&self, request: CaptureRequest) -> Result<CaptureOutcome> {
        let payment_id = request
            .payment_id
            .as_deref()
            .context("Razorpay capture needs a payment id")?;

        if let Some(signature) = request.signature.as_deref() {
            if !verify_signature(
                &self.config.key_secret,
                &request.provider_order_id,
                payment_id,
                signature,
            ) {
                warn!(razorpay_order_id = %request.provider_order_id, "Razorpay signature mismatch");
                return Ok(CaptureOutcome::Rejected {
                    reason: "Signature mismatch".into(),
                });
            }
        }

        let payment = self.fetch_payment(payment_id).await?;
        let payment = match check_payment(&payment, &request.provider_order_id) {
            PaymentCheck::Captured => payment,
            PaymentCheck::NeedsCapture => self.capture_payment(&payment).await?,
            PaymentCheck::Rejected(reason) => return Ok(CaptureOutcome::Rejected { reason }),
        };

        if payment.status != "captured" {
            return Ok(CaptureOutcome::Rejected {
                reason: format!("Payment is {}", payment.status),
            });
        }

        info!(
            razorpay_order_id = %request.provider_order_id,
            razorpay_payment_id = %payment.id,
            method = ?payment.method,
            "Razorpay payment captured"
        );

        Ok(CaptureOutcome::Captured {
            payment_id: payment.id,
        })
    }
}
