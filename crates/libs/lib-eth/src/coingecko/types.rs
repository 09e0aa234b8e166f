use serde::Deserialize;

/// `simple/price?ids=ethereum&vs_currencies=usd,inr`
#[derive(Debug, Deserialize)]
pub(super) struct SimplePriceResponse {
    pub ethereum: Option<SimplePrice>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SimplePrice {
    pub usd: Option<f64>,
    pub inr: Option<f64>,
}
