use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Primary directory connection
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default = "d_dir_url")]
    pub base_url: String,
    /// Environment variable holding the directory API secret key.
    #[serde(default = "d_secret_env")]
    pub secret_key_env: String,
    #[serde(default = "d_8000")]
    pub timeout_ms: u64,
    #[serde(default = "d_3")]
    pub max_retries: u32,
    /// Page size for list-by-email queries (re-registration detection).
    #[serde(default = "d_5")]
    pub email_page_size: u32,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: d_dir_url(),
            secret_key_env: d_secret_env(),
            timeout_ms: 8000,
            max_retries: 3,
            email_page_size: 5,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_dir_url() -> String {
    "https://api.clerk.com".into()
}
fn d_secret_env() -> String {
    "RV_DIRECTORY_SECRET_KEY".into()
}
fn d_8000() -> u64 {
    8000
}
fn d_3() -> u32 {
    3
}
fn d_5() -> u32 {
    5
}
