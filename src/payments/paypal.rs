use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use super::{
    CaptureOutcome, CaptureRequest, CreateProviderOrder, PaymentGateway, PaymentProvider,
    ProviderOrder,
};
use crate::common::config::PaypalConfig;

/// PayPal Orders v2 client built on reqwest.
pub struct PaypalClient {
    http: reqwest::Client,
    config: PaypalConfig,
}

#[derive(Debug, Deserialize)]
struct AccessToken {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct PaypalOrder {
    id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CaptureResponse {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub purchase_units: Vec<PurchaseUnit>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PurchaseUnit {
    #[serde(default)]
    pub payments: Option<UnitPayments>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UnitPayments {
    #[serde(default)]
    pub captures: Vec<Capture>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Capture {
    pub id: String,
    pub status: String,
}

/// PayPal expects decimal strings with two fraction digits.
fn format_amount(amount: i64) -> String {
    format!("{amount}.00")
}

pub(crate) fn capture_outcome(response: CaptureResponse) -> CaptureOutcome {
    if response.status != "COMPLETED" {
        return CaptureOutcome::Rejected {
            reason: format!("Order status is {}", response.status),
        };
    }

    let capture = response
        .purchase_units
        .into_iter()
        .filter_map(|unit| unit.payments)
        .flat_map(|payments| payments.captures)
        .next();

    match capture {
        Some(capture) if capture.status == "COMPLETED" || capture.status == "PENDING" => {
            CaptureOutcome::Captured {
                payment_id: capture.id,
            }
        }
        Some(capture) => CaptureOutcome::Rejected {
            reason: format!("Capture status is {}", capture.status),
        },
        None => CaptureOutcome::Captured {
            payment_id: response.id,
        },
    }
}

impl PaypalClient {
    pub fn new(http: reqwest::Client, config: PaypalConfig) -> Self {
        Self { http, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.environment.base_url(), path)
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let debug_id = resp
            .headers()
            .get("paypal-debug-id")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        error!(
            status = %status,
            paypal_debug_id = ?debug_id,
            response_body = %body,
            context = %context,
            "paypal api request failed"
        );

        anyhow::bail!(
            "PayPal API request failed: {} (status {}, debug_id={:?})",
            context,
            status,
            debug_id
        );
    }

    async fn access_token(&self) -> Result<String> {
        let resp = self
            .http
            .post(self.url("/v1/oauth2/token"))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await
            .context("Failed to reach PayPal")?;

        let token: AccessToken = Self::ensure_success(resp, "obtain access token")
            .await?
            .json()
            .await
            .context("Failed to parse PayPal access token")?;

        Ok(token.access_token)
    }
}

#[async_trait]
impl PaymentGateway for PaypalClient {
    fn provider(&self) -> PaymentProvider {
        PaymentProvider::Paypal
    }

    fn public_key(&self) -> Option<String> {
        Some(self.config.client_id.clone())
    }

    fn requires_payment_id(&self) -> bool {
        false
    }

    async fn create_order(&self, request: CreateProviderOrder) -> Result<ProviderOrder> {
        let token = self.access_token().await?;

        let body = json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "custom_id": request.receipt,
                "description": request.description,
                "amount": {
                    "currency_code": request.currency,
                    "value": format_amount(request.amount),
                },
            }],
        });

        let resp = self
            .http
            .post(self.url("/v2/checkout/orders"))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .context("Failed to reach PayPal")?;

        let order: PaypalOrder = Self::ensure_success(resp, "create order")
            .await?
            .json()
            .await
            .context("Failed to parse PayPal order")?;

        info!(paypal_order_id = %order.id, status = %order.status, "PayPal order created");

        Ok(ProviderOrder { id: order.id })
    }

    async fn capture(&self, request: CaptureRequest) -> Result<CaptureOutcome> {
        let token = self.access_token().await?;

        let resp = self
            .http
            .post(self.url(&format!(
                "/v2/checkout/orders/{}/capture",
                request.provider_order_id
            )))
            .bearer_auth(&token)
            .json(&json!({}))
            .send()
            .await
            .context("Failed to reach PayPal")?;

        let response: CaptureResponse = Self::ensure_success(resp, "capture order")
            .await?
            .json()
            .await
            .context("Failed to parse PayPal capture")?;

        let outcome = capture_outcome(response);
        info!(
            paypal_order_id = %request.provider_order_id,
            outcome = ?outcome,
            "PayPal capture finished"
        );
        Ok(outcome)
    }
}
