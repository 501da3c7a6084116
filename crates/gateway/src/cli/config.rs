use rv_domain::config::{Config, ConfigSeverity};

/// Print all validation issues. Returns `false` when at least one issue is
/// an error.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = config.validate();

    println!("config: {config_path}");
    if issues.is_empty() {
        println!("  no issues");
        return true;
    }

    let mut valid = true;
    for issue in &issues {
        println!("  {issue}");
        if issue.severity == ConfigSeverity::Error {
            valid = false;
        }
    }
    valid
}

/// Dump the resolved configuration (defaults applied) as TOML.
pub fn show(config: &Config) {
    match toml::to_string_pretty(config) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => eprintln!("failed to serialize config: {e}"),
    }
}
