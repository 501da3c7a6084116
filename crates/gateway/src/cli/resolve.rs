//! One-off resolution from the command line.

use std::sync::Arc;

use rv_domain::config::Config;
use rv_resolver::IdentityResolver;

use crate::bootstrap;

pub async fn run(config: Arc<Config>, id: String, json: bool) -> anyhow::Result<()> {
    let directory = bootstrap::build_directory(&config)?;
    let mapping = bootstrap::build_mapping(&config).await?;
    // No detector for one-shot runs — a spawned detection task would race
    // process exit.
    let resolver = IdentityResolver::new(directory, mapping);

    match resolver.resolve(&id).await {
        Some(record) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("{} <{}>", record.display_name(), record.email);
            }
            Ok(())
        }
        None => {
            eprintln!("not found: {id}");
            std::process::exit(1);
        }
    }
}
