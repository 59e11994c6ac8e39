use std::str::FromStr;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::Deserialize;

use crate::external::price_provider::{PriceProvider, PriceProviderError, Quote};

pub struct TwelveDataProvider {
    client: reqwest::Client,
    api_key: String,
}

impl TwelveDataProvider {
    pub fn from_env() -> Result<Self, PriceProviderError> {
        let api_key = std::env::var("TWELVEDATA_API_KEY")
            .map_err(|_| PriceProviderError::BadResponse("TWELVEDATA_API_KEY not set".into()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TwelveDataQuoteResponse {
    symbol: Option<String>,
    close: Option<String>,

    // Error responses come back as {code, status, message}.
    code: Option<u32>,
    status: Option<String>,
    message: Option<String>,
}

#[async_trait]
impl PriceProvider for TwelveDataProvider {
    async fn latest_quote(&self, symbol: &str) -> Result<Quote, PriceProviderError> {
        let url = "https://api.twelvedata.com/quote";

        let resp = self
            .client
            .get(url)
            .query(&[("symbol", symbol), ("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        if resp.status().as_u16() == 429 {
            return Err(PriceProviderError::RateLimited);
        }

        let body: TwelveDataQuoteResponse = resp
            .json()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        if body.status.as_deref() == Some("error") {
            return match body.code {
                Some(429) => Err(PriceProviderError::RateLimited),
                Some(400) | Some(404) => Err(PriceProviderError::UnknownSymbol(symbol.to_string())),
                _ => Err(PriceProviderError::BadResponse(
                    body.message.unwrap_or_else(|| "unknown provider error".into()),
                )),
            };
        }

        let close = body
            .close
            .ok_or_else(|| PriceProviderError::BadResponse("missing close field".into()))?;
        let price = BigDecimal::from_str(&close)
            .map_err(|e| PriceProviderError::Parse(format!("close {close:?}: {e}")))?;

        Ok(Quote {
            symbol: body.symbol.unwrap_or_else(|| symbol.to_string()),
            price,
            as_of: chrono::Utc::now(),
        })
    }
}
