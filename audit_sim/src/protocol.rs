//! Request and response shapes of the JSON protocol.
//!
//! Field names are the stable external contract and must not change.

use audit_core::{ConfusionMatrix, Election, IntersectionGroup, TestRun};
use serde::{Deserialize, Deserializer, Serialize};

/// Commands understood by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SimCommand {
    /// Generate the election for a seed
    Election,

    /// Run audit tests against the election
    RunTests,

    /// Compromised ballots shared between tests
    Intersections,

    /// Confusion matrix per test
    ConfusionMatrices,

    /// Everything above in one response
    FullSimulation,
}

impl SimCommand {
    /// Returns the wire name of the command.
    pub fn name(&self) -> &'static str {
        match self {
            SimCommand::Election => "election",
            SimCommand::RunTests => "run-tests",
            SimCommand::Intersections => "intersections",
            SimCommand::ConfusionMatrices => "confusion-matrices",
            SimCommand::FullSimulation => "full-simulation",
        }
    }

    /// True for commands that need a test string.
    pub fn requires_tests(&self) -> bool {
        !matches!(self, SimCommand::Election)
    }
}

impl std::fmt::Display for SimCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One simulator request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub command: SimCommand,

    /// Omitted seeds are drawn at random and echoed back
    #[serde(
        default,
        deserialize_with = "deserialize_seed",
        skip_serializing_if = "Option::is_none"
    )]
    pub seed: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<String>,
}

/// Accepts any JSON integer as a seed.
///
/// Negative seeds wrap into the unsigned range, so their low 32 bits are the
/// same as a 32-bit unsigned conversion of the original value.
fn deserialize_seed<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum WireSeed {
        Unsigned(u64),
        Signed(i64),
    }

    Ok(Option::<WireSeed>::deserialize(deserializer)?.map(|seed| match seed {
        WireSeed::Unsigned(seed) => seed,
        WireSeed::Signed(seed) => seed as u64,
    }))
}

impl Request {
    pub fn new(command: SimCommand) -> Self {
        Self {
            command,
            seed: None,
            tests: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_tests(mut self, tests: impl Into<String>) -> Self {
        self.tests = Some(tests.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionResponse {
    pub seed: u64,
    pub election: Election,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTestsResponse {
    pub seed: u64,
    pub tests: String,
    pub total_compromises_seen: u64,
    pub test_runs: Vec<TestRun>,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntersectionsResponse {
    pub seed: u64,
    pub tests: String,
    pub intersections: Vec<IntersectionGroup>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfusionMatricesResponse {
    pub seed: u64,
    pub tests: String,
    pub confusion_matrices: Vec<ConfusionMatrix>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullSimulationResponse {
    pub seed: u64,
    pub tests: String,
    pub election: Election,
    pub test_runs: Vec<TestRun>,
    pub total_compromises_seen: u64,
    pub intersections: Vec<IntersectionGroup>,
    pub confusion_matrices: Vec<ConfusionMatrix>,
    pub total_cost: f64,
}

/// Command-specific response body, serialized without a tag.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    Election(ElectionResponse),
    RunTests(RunTestsResponse),
    Intersections(IntersectionsResponse),
    ConfusionMatrices(ConfusionMatricesResponse),
    FullSimulation(FullSimulationResponse),
}

/// Body written to stderr when a request fails.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub kind: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            kind: kind.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_decoding() {
        let req: Request =
            serde_json::from_str(r#"{"command": "run-tests", "seed": 12345, "tests": "a500b100c50"}"#)
                .unwrap();

        assert_eq!(
            req,
            Request::new(SimCommand::RunTests)
                .with_seed(12345)
                .with_tests("a500b100c50")
        );
    }

    #[test]
    fn test_request_optional_fields() {
        let req: Request = serde_json::from_str(r#"{"command": "election"}"#).unwrap();

        assert_eq!(req.command, SimCommand::Election);
        assert_eq!(req.seed, None);
        assert_eq!(req.tests, None);
    }

    #[test]
    fn test_all_command_names() {
        for (name, command) in [
            ("election", SimCommand::Election),
            ("run-tests", SimCommand::RunTests),
            ("intersections", SimCommand::Intersections),
            ("confusion-matrices", SimCommand::ConfusionMatrices),
            ("full-simulation", SimCommand::FullSimulation),
        ] {
            let json = format!(r#"{{"command": "{}"}}"#, name);
            let req: Request = serde_json::from_str(&json).unwrap();
            assert_eq!(req.command, command);
            assert_eq!(command.name(), name);
        }
    }

    #[test]
    fn test_unknown_command_rejected() {
        let result: Result<Request, _> = serde_json::from_str(r#"{"command": "recount"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_seed_wraps() {
        let req: Request = serde_json::from_str(r#"{"command": "election", "seed": -5}"#).unwrap();
        assert_eq!(req.seed, Some(u64::MAX - 4));
        assert_eq!(req.seed.map(|s| s as u32), Some(4_294_967_291));
    }

    #[test]
    fn test_large_and_null_seeds() {
        let req: Request =
            serde_json::from_str(r#"{"command": "election", "seed": 18446744073709551615}"#)
                .unwrap();
        assert_eq!(req.seed, Some(u64::MAX));

        let req: Request = serde_json::from_str(r#"{"command": "election", "seed": null}"#).unwrap();
        assert_eq!(req.seed, None);
    }

    #[test]
    fn test_fractional_seed_rejected() {
        let result: Result<Request, _> =
            serde_json::from_str(r#"{"command": "election", "seed": 1.5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_error_response_shape() {
        let value = serde_json::to_value(ErrorResponse::new("boom", "InvalidParameter")).unwrap();

        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "boom");
        assert_eq!(value["kind"], "InvalidParameter");
    }
}
