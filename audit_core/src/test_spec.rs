//! Compact audit test definitions (`a500b100c50`).

use crate::error::SimError;
use serde::{Deserialize, Serialize};

/// One requested audit test: a label and how many ballots it samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSpec {
    pub label: char,
    pub sample_size: u64,
}

impl TestSpec {
    pub fn new(label: char, sample_size: u64) -> Self {
        Self { label, sample_size }
    }

    /// Parses a test definition string into specs, preserving input order.
    ///
    /// Grammar: one or more `<ASCII letter><decimal digits>` groups with no
    /// separators. Duplicate labels are kept as independent specs.
    pub fn parse_list(input: &str) -> Result<Vec<TestSpec>, SimError> {
        if input.is_empty() {
            return Err(SimError::malformed(input, "empty test string"));
        }

        let bytes = input.as_bytes();
        let mut specs = Vec::new();
        let mut pos = 0;

        while pos < bytes.len() {
            let label = bytes[pos];
            if label.is_ascii_digit() {
                return Err(SimError::malformed(
                    input,
                    format!("digits at offset {} are not preceded by a label", pos),
                ));
            }
            if !label.is_ascii_alphabetic() {
                // Everything before pos is ASCII, so pos is a char boundary
                let found = input[pos..].chars().next().unwrap_or('?');
                return Err(SimError::malformed(
                    input,
                    format!("unexpected character {:?} at offset {}", found, pos),
                ));
            }
            pos += 1;

            let digits_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos == digits_start {
                return Err(SimError::malformed(
                    input,
                    format!("label '{}' is not followed by a sample size", label as char),
                ));
            }

            let digits = &input[digits_start..pos];
            let sample_size: u64 = digits.parse().map_err(|_| {
                SimError::malformed(input, format!("sample size {} is out of range", digits))
            })?;
            if sample_size == 0 {
                return Err(SimError::malformed(
                    input,
                    format!("test '{}' has a sample size of zero", label as char),
                ));
            }

            specs.push(TestSpec::new(label as char, sample_size));
        }

        Ok(specs)
    }

    /// Renders specs back into the compact form.
    pub fn to_shorthand(specs: &[TestSpec]) -> String {
        specs.iter().map(|s| s.to_string()).collect()
    }
}

impl std::fmt::Display for TestSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.label, self.sample_size)
    }
}
