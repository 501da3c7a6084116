use rv_domain::config::{Config, ConfigSeverity, MappingBackend};
use rv_mapping::redis_store::RedisMappingStore;

/// Run all diagnostic checks and print a summary.
///
/// Returns `Ok(true)` when every check passes, `Ok(false)` when at least
/// one check failed.
pub async fn run(config: &Config, config_path: &str) -> anyhow::Result<bool> {
    println!("redverse doctor");
    println!("===============\n");

    let mut all_passed = true;

    // 1. Config file
    check_config_file(config_path, &mut all_passed);

    // 2. Config validation
    check_config_validation(config, &mut all_passed);

    // 3. Secrets present
    check_secret(&config.directory.secret_key_env, "Directory secret key", &mut all_passed);
    check_secret(&config.datastore.service_key_env, "Datastore service key", &mut all_passed);

    // 4. Directory connectivity
    check_directory(config, &mut all_passed).await;

    // 5. Side-mapping store connectivity
    check_mapping_store(config, &mut all_passed).await;

    // 6. Datastore connectivity
    check_datastore(config, &mut all_passed).await;

    // Summary
    println!();
    if all_passed {
        println!("All checks passed.");
    } else {
        println!("Some checks failed. Review the output above.");
    }

    Ok(all_passed)
}

// ── Individual checks ─────────────────────────────────────────────────

fn check_config_file(config_path: &str, all_passed: &mut bool) {
    let exists = std::path::Path::new(config_path).exists();
    print_check(
        "Config file exists",
        exists,
        if exists {
            config_path.to_owned()
        } else {
            format!("{config_path} not found (using defaults)")
        },
    );
    if !exists {
        *all_passed = false;
    }
}

fn check_config_validation(config: &Config, all_passed: &mut bool) {
    let issues = config.validate();
    let error_count = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();

    if issues.is_empty() {
        print_check("Config validation", true, "no issues".into());
    } else {
        print_check(
            "Config validation",
            error_count == 0,
            format!("{} issue(s) ({} error(s))", issues.len(), error_count),
        );
        for issue in &issues {
            println!("      {issue}");
        }
        if error_count > 0 {
            *all_passed = false;
        }
    }
}

fn check_secret(env_name: &str, label: &str, all_passed: &mut bool) {
    let present = std::env::var(env_name).map(|v| !v.is_empty()).unwrap_or(false);
    print_check(
        label,
        present,
        if present {
            format!("{env_name} set")
        } else {
            format!("{env_name} not set")
        },
    );
    if !present {
        *all_passed = false;
    }
}

async fn check_directory(config: &Config, all_passed: &mut bool) {
    let url = &config.directory.base_url;
    let reachable = probe(url).await;

    print_check(
        "Directory reachable",
        reachable,
        if reachable {
            url.clone()
        } else {
            format!("{url} (unreachable)")
        },
    );
    if !reachable {
        *all_passed = false;
    }
}

async fn check_mapping_store(config: &Config, all_passed: &mut bool) {
    match config.mapping_store.backend {
        MappingBackend::Memory => {
            print_check(
                "Side-mapping store",
                true,
                "memory backend (no external store)".into(),
            );
        }
        MappingBackend::Redis => {
            let url = &config.mapping_store.redis_url;
            let reachable = match RedisMappingStore::connect(&config.mapping_store).await {
                Ok(store) => store.ping().await.is_ok(),
                Err(_) => false,
            };
            print_check(
                "Side-mapping store reachable",
                reachable,
                if reachable {
                    url.clone()
                } else {
                    format!("{url} (unreachable)")
                },
            );
            if !reachable {
                *all_passed = false;
            }
        }
    }
}

async fn check_datastore(config: &Config, all_passed: &mut bool) {
    let url = &config.datastore.base_url;
    let reachable = probe(url).await;

    print_check(
        "Datastore reachable",
        reachable,
        if reachable {
            url.clone()
        } else {
            format!("{url} (unreachable)")
        },
    );
    if !reachable {
        *all_passed = false;
    }
}

/// Plain reachability probe — any HTTP response counts, status ignored.
async fn probe(url: &str) -> bool {
    match reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
    {
        Ok(client) => client.get(url).send().await.is_ok(),
        Err(_) => false,
    }
}

// ── Formatting helper ─────────────────────────────────────────────────

fn print_check(name: &str, passed: bool, detail: String) {
    let status = if passed { "PASS" } else { "FAIL" };
    println!("  [{status}] {name}: {detail}");
}
