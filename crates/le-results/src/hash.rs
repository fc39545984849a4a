//! Content-based hashing for run IDs.

use le_project::RunConfig;
use sha2::{Digest, Sha256};

use crate::ResultsResult;

/// Run id over the configuration, the raw series file and the pipeline version.
pub fn compute_run_id(
    config: &RunConfig,
    series_bytes: &[u8],
    pipeline_version: &str,
) -> ResultsResult<String> {
    let mut hasher = Sha256::new();

    let config_json = serde_json::to_string(config)?;
    hasher.update(config_json.as_bytes());
    hasher.update(series_bytes);
    hasher.update(pipeline_version.as_bytes());

    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use le_project::*;

    fn config(name: &str) -> RunConfig {
        let yaml = format!(
            r#"
version: 1
name: {name}
processing_path: work
simulation_start: 2020-01-01
multiplication_factors: [1.0]
concentrations: series.json
simulator:
  executable: sim
model:
  type: CatchmentGUTSSD
  toxicokinetics:
    dominant_rate_constant: 0.5
    background_hazard_rate: 0.0
  sd:
    threshold: 1.0
    killing_rate: 0.1
"#
        );
        serde_yaml::from_str(&yaml).unwrap()
    }

    #[test]
    fn hash_stability() {
        let a = compute_run_id(&config("a"), b"[1]", "v1").unwrap();
        let b = compute_run_id(&config("a"), b"[1]", "v1").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let base = compute_run_id(&config("a"), b"[1]", "v1").unwrap();
        assert_ne!(base, compute_run_id(&config("b"), b"[1]", "v1").unwrap());
        assert_ne!(base, compute_run_id(&config("a"), b"[2]", "v1").unwrap());
        assert_ne!(base, compute_run_id(&config("a"), b"[1]", "v2").unwrap());
    }
}
