//! Payment gateway clients.
//!
//! Both gateways follow the same two-step contract: open a provider order for
//! an amount, then verify or capture the payment the customer approved in the
//! provider's widget.

pub mod paypal;
pub mod razorpay;

use std::{fmt, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::{app_error::AppError, config::AppConfig};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentProvider {
    Razorpay,
    Paypal,
}

impl PaymentProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentProvider::Razorpay => "razorpay",
            PaymentProvider::Paypal => "paypal",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentProvider::Razorpay => "Razorpay",
            PaymentProvider::Paypal => "PayPal",
        }
    }
}

impl fmt::Display for PaymentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amounts are whole currency units; gateways convert to their own representation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProviderOrder {
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub receipt: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderOrder {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRequest {
    pub provider_order_id: String,
    pub payment_id: Option<String>,
    pub signature: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    Captured { payment_id: String },
    Rejected { reason: String },
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    fn provider(&self) -> PaymentProvider;

    /// Key the client-side widget is initialised with, when the provider needs one.
    fn public_key(&self) -> Option<String>;

    /// Whether `capture` needs the payment id the client widget returned.
    /// A capture request without one is malformed and never reaches the provider.
    fn requires_payment_id(&self) -> bool;

    async fn create_order(&self, request: CreateProviderOrder) -> Result<ProviderOrder>;

    /// Confirms the payment against the provider's own records. `Err` means the
    /// provider could not be asked; `Rejected` means it answered "not paid".
    async fn capture(&self, request: CaptureRequest) -> Result<CaptureOutcome>;
}

/// The gateways enabled by configuration. A provider without credentials is absent.
#[derive(Clone, Default)]
pub struct PaymentGateways {
    razorpay: Option<Arc<dyn PaymentGateway>>,
    paypal: Option<Arc<dyn PaymentGateway>>,
}

impl PaymentGateways {
    pub fn new(
        razorpay: Option<Arc<dyn PaymentGateway>>,
        paypal: Option<Arc<dyn PaymentGateway>>,
    ) -> Self {
        Self { razorpay, paypal }
    }

    pub fn from_config(config: &AppConfig, http_client: reqwest::Client) -> Self {
        let razorpay = config.razorpay.clone().map(|settings| {
            tracing::info!(mode = ?settings.mode, "Razorpay enabled");
            Arc::new(razorpay::RazorpayClient::new(http_client.clone(), settings))
                as Arc<dyn PaymentGateway>
        });
        let paypal = config.paypal.clone().map(|settings| {
            tracing::info!(environment = ?settings.environment, "PayPal enabled");
            Arc::new(paypal::PaypalClient::new(http_client.clone(), settings))
                as Arc<dyn PaymentGateway>
        });

        if razorpay.is_none() && paypal.is_none() {
            tracing::warn!("No payment provider is configured; checkout is disabled");
        }

        Self::new(razorpay, paypal)
    }

    pub fn get(&self, provider: PaymentProvider) -> Result<Arc<dyn PaymentGateway>, AppError> {
        let gateway = match provider {
            PaymentProvider::Razorpay => self.razorpay.clone(),
            PaymentProvider::Paypal => self.paypal.clone(),
        };
        gateway.ok_or_else(|| {
            AppError::BadRequest(format!("{} payments are not enabled", provider.display_name()))
        })
    }
}
