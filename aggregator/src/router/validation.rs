// Pre-routing validation module
// Validates a quote request before any provider is queried
//
// Numan Thabit 2025 Nov

use crate::errors::RouterError;
use crate::venues::QuoteRequest;

/// Collected validation problems for a request
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }

    pub fn into_result(self) -> Result<(), RouterError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(RouterError::InvalidRequest(self.errors.join("; ")))
        }
    }
}

pub fn validate_request(req: &QuoteRequest) -> ValidationResult {
    let mut result = ValidationResult::new();

    let base = req.base.trim();
    let quote = req.quote.trim();
    if base.is_empty() {
        result.add_error("base asset is required".to_string());
    }
    if quote.is_empty() {
        result.add_error("quote asset is required".to_string());
    }
    if !base.is_empty() && base.eq_ignore_ascii_case(quote) {
        result.add_error(format!("base and quote must differ (got {base}/{quote})"));
    }
    if !req.notional_usd.is_finite() || req.notional_usd <= 0.0 {
        result.add_error(format!(
            "notional must be a positive amount of USD (got {})",
            req.notional_usd
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venues::Side;

    #[test]
    fn accepts_well_formed_request() {
        let req = QuoteRequest::new("XRP", "USDT", Side::Buy, 500.0);
        assert!(validate_request(&req).into_result().is_ok());
    }

    #[test]
    fn collects_every_problem() {
        let req = QuoteRequest::new(" ", "", Side::Sell, f64::NAN);
        let result = validate_request(&req);
        assert_eq!(result.errors.len(), 3);
        let err = result.into_result().unwrap_err();
        assert_eq!(err.code(), "INVALID_REQUEST");
    }

    #[test]
    fn rejects_same_asset_pair() {
        let req = QuoteRequest::new("usdt", "USDT", Side::Buy, 10.0);
        assert!(!validate_request(&req).is_valid());
    }

    #[test]
    fn rejects_non_positive_notional() {
        let req = QuoteRequest::new("XRP", "USDT", Side::Buy, 0.0);
        assert!(!validate_request(&req).is_valid());
        let req = QuoteRequest::new("XRP", "USDT", Side::Buy, -5.0);
        assert!(!validate_request(&req).is_valid());
    }
}
