//! Shared provider traits for dependency injection.
//!
//! Facts about the host are read fresh on every invocation and fed into the
//! system prompt. They sit behind [`HostProvider`] so callers can substitute
//! fixed values in tests.

use serde::Serialize;

/// Facts about the machine the generated commands will run on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostContext {
    /// Platform family, e.g. `linux`, `macos`, `windows`.
    pub platform_name: String,
    /// Kernel release string.
    pub os_release: String,
    /// Kernel type, e.g. `Linux`, `Darwin`.
    pub os_kind: String,
    /// CPU architecture, e.g. `x86_64`, `aarch64`.
    pub architecture: String,
}

impl HostContext {
    /// Pretty-printed JSON blob for embedding in a prompt.
    pub fn to_prompt_blob(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

/// Trait for capturing host facts.
///
/// # Example
///
/// ```
/// use incanto::providers::{HostProvider, SystemHostProvider};
///
/// let host = SystemHostProvider.capture();
/// assert!(!host.platform_name.is_empty());
/// ```
pub trait HostProvider: Send + Sync {
    fn capture(&self) -> HostContext;
}

/// Reads host facts from the running system.
pub struct SystemHostProvider;

impl HostProvider for SystemHostProvider {
    fn capture(&self) -> HostContext {
        let (os_kind, os_release) = kernel_info();
        HostContext {
            platform_name: std::env::consts::OS.to_string(),
            os_release,
            os_kind,
            architecture: std::env::consts::ARCH.to_string(),
        }
    }
}

#[cfg(unix)]
fn kernel_info() -> (String, String) {
    match nix::sys::utsname::uname() {
        Ok(uts) => (
            uts.sysname().to_string_lossy().into_owned(),
            uts.release().to_string_lossy().into_owned(),
        ),
        Err(e) => {
            tracing::warn!("uname failed: {}", e);
            (std::env::consts::OS.to_string(), "unknown".to_string())
        }
    }
}

#[cfg(not(unix))]
fn kernel_info() -> (String, String) {
    let kind = match std::env::consts::OS {
        "windows" => "Windows_NT",
        other => other,
    };
    (kind.to_string(), "unknown".to_string())
}
