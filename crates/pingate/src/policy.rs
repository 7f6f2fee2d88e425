//! Static gate policy: the constants that are rules, not configuration.

use std::time::Duration;

/// Commands a frozen player may still run. Everything else is blocked
/// until they authenticate.
///
/// This is a policy constant by design — making it configurable would
/// invite "helpful" additions that punch holes in the gate.
pub const EXEMPT_COMMANDS: [&str; 3] = ["login", "setpin", "resetpin"];

/// How long a frozen player has to authenticate before the deferred
/// check asks the host to disconnect them.
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(60);

/// Whether `command` is on the exempt allowlist.
///
/// Comparison is ASCII-case-insensitive because game servers generally
/// treat `/LOGIN` and `/login` as the same command.
pub fn is_exempt_command(command: &str) -> bool {
    EXEMPT_COMMANDS
        .iter()
        .any(|exempt| command.eq_ignore_ascii_case(exempt))
}
