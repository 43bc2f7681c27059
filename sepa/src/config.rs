//! Configuration for SEPA generation and export

use bursary_core::{Bic, Iban};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// SEPA configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Account holder initiating the transfers
    pub initiator: InitiatorConfig,

    /// Output directory for generated pain.001 files
    pub output_dir: PathBuf,

    /// Prefix for generated message IDs
    pub message_id_prefix: String,
}

/// The union's own account details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiatorConfig {
    /// Account holder name as it appears at the bank
    pub name: String,

    /// Debtor account
    pub iban: Iban,

    /// Debtor agent
    pub bic: Bic,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initiator: InitiatorConfig {
                name: "Student Union Treasury".to_string(),
                iban: Iban::new("DE02120300000000202051"),
                bic: Bic::new("BYLADEM1001"),
            },
            output_dir: PathBuf::from("./data/sepa"),
            message_id_prefix: "BURSARY".to_string(),
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(name) = std::env::var("SEPA_INITIATOR_NAME") {
            config.initiator.name = name;
        }

        if let Ok(iban) = std::env::var("SEPA_INITIATOR_IBAN") {
            config.initiator.iban = Iban::new(iban);
        }

        if let Ok(bic) = std::env::var("SEPA_INITIATOR_BIC") {
            config.initiator.bic = Bic::new(bic);
        }

        if let Ok(dir) = std::env::var("SEPA_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}
