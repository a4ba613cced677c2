// Pre-quote validation module
// Validates request arguments before any venue is queried
//
// Numan Thabit 2025 Nov

use crate::asset::Asset;
use crate::errors::{AggrError, Result};

/// Validation result collecting every problem with a request
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(AggrError::InvalidArgument(self.errors.join("; ")))
        }
    }
}

/// Validate a quote request: granularity bound and distinct assets
pub fn validate_quote_request(
    source: &Asset,
    dest: &Asset,
    parts: u32,
    max_parts: u32,
) -> ValidationResult {
    let mut result = ValidationResult::new();

    if parts > max_parts {
        result.add_error(format!("parts {parts} exceeds maximum {max_parts}"));
    }

    if source == dest {
        result.add_error(format!("source and destination are both {source}"));
    }

    result
}

/// Validate a distribution handed back for execution
pub fn validate_distribution(distribution: &[u32], venues: usize) -> ValidationResult {
    let mut result = ValidationResult::new();

    if distribution.len() != venues {
        result.add_error(format!(
            "distribution has {} entries for {venues} venues",
            distribution.len()
        ));
    }

    let parts: u64 = distribution.iter().map(|&d| u64::from(d)).sum();
    if parts > u64::from(u32::MAX) {
        result.add_error(format!("distribution allocates {parts} parts"));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_all_errors() {
        let a = Asset::NATIVE;
        let res = validate_quote_request(&a, &a, 101, 100);
        assert!(!res.is_valid);
        assert_eq!(res.errors.len(), 2);
        let err = res.into_result().unwrap_err();
        assert!(matches!(err, AggrError::InvalidArgument(ref m) if m.contains("parts 101")));
    }

    #[test]
    fn accepts_valid_request() {
        let b = Asset::from_bytes([9; 20]);
        assert!(validate_quote_request(&Asset::NATIVE, &b, 100, 100).is_valid);
        assert!(validate_quote_request(&Asset::NATIVE, &b, 0, 100).is_valid);
    }

    #[test]
    fn distribution_length_must_match() {
        assert!(!validate_distribution(&[1, 2], 3).is_valid);
        assert!(validate_distribution(&[1, 2, 0], 3).is_valid);
    }
}
