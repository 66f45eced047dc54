//! User-Agent header for upstream requests.

use std::sync::OnceLock;

const CRATE_NAME: &str = "zoomsync";

const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

static USER_AGENT: OnceLock<String> = OnceLock::new();

/// Returns the User-Agent string sent with every upstream request.
///
/// Format: `zoomsync/0.1.0 (rust/1.92; linux/x86_64)`
pub fn user_agent() -> &'static str {
    USER_AGENT.get_or_init(|| {
        format!(
            "{}/{} ({}; {}/{})",
            CRATE_NAME,
            CRATE_VERSION,
            concat!("rust/", env!("CARGO_PKG_RUST_VERSION")),
            os_name(),
            std::env::consts::ARCH,
        )
    })
}

fn os_name() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        os => os,
    }
}
