pub mod admin;
pub mod config;
pub mod doctor;
pub mod pid;
pub mod resolve;

use clap::{Parser, Subcommand};

/// Redverse identity service — resolution, detection, reconciliation.
#[derive(Debug, Parser)]
#[command(name = "redverse", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the identity gateway server (default when no subcommand is given).
    Serve,
    /// Run diagnostic checks against the current configuration.
    Doctor,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Resolve a single identifier and print the result.
    Resolve {
        /// The user identifier to resolve.
        id: String,
        /// Output the full record as JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },
    /// Administrative migration tooling (offline batch operations).
    #[command(subcommand)]
    Admin(AdminCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Bulk-create directory users from a CSV export of the legacy environment.
    ImportUsers {
        /// Path to the CSV export (columns: id, email, first_name, last_name).
        #[arg(long)]
        csv: String,
        /// Path for the JSON results file.
        #[arg(long, default_value = "import-users-results.json")]
        results: String,
    },
    /// Bulk-populate the side-mapping store from the same CSV export.
    SeedMappings {
        /// Path to the CSV export (columns: id, email, first_name, last_name).
        #[arg(long)]
        csv: String,
        /// Path for the JSON results file.
        #[arg(long, default_value = "seed-mappings-results.json")]
        results: String,
    },
    /// Scan forward mappings and record users re-registered in the directory.
    DetectReregistered {
        /// Path for the JSON results file.
        #[arg(long, default_value = "detect-reregistered-results.json")]
        results: String,
    },
    /// Bulk-migrate ownership rows for recorded re-registrations.
    MigrateReregistered {
        /// Path for the JSON results file.
        #[arg(long, default_value = "migrate-reregistered-results.json")]
        results: String,
        /// Report what would be migrated without touching the datastore.
        #[arg(long)]
        dry_run: bool,
    },
    /// Probe the side-mapping and ownership tables for one email.
    Check {
        email: String,
    },
    /// Rewrite ownership rows from one identifier to another.
    Migrate {
        old_id: String,
        new_id: String,
    },
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path specified by `RV_CONFIG` (or
/// `config.toml` by default). Returns the parsed
/// [`Config`](rv_domain::config::Config) and the path that was used.
///
/// This is shared by every subcommand so the logic lives in one place.
pub fn load_config() -> anyhow::Result<(rv_domain::config::Config, String)> {
    let config_path = std::env::var("RV_CONFIG").unwrap_or_else(|_| "config.toml".into());

    let config = if std::path::Path::new(&config_path).exists() {
        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
        toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))?
    } else {
        rv_domain::config::Config::default()
    };

    Ok((config, config_path))
}
