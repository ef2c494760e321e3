/// Process-wide execution mode, built once from CLI flags at startup.
///
/// There is deliberately no way to mutate a `Mode` after construction:
/// every component receives it (or a copy) explicitly, so the gate rules
/// in [`crate::guard::gate`] depend only on their inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mode {
    /// Simulate the whole pipeline; every gate decision is forced to Deny
    /// after the intended action has been logged.
    pub dry_run: bool,

    /// Answer "yes" to Confirm-tier prompts. Never applies to Dangerous
    /// operations.
    pub auto_yes: bool,

    /// Suppress interactive prompts; Confirm-tier operations are denied
    /// instead of asked about.
    pub quiet: bool,

    /// Allow Dangerous operations to reach the typed-keyword prompt at all.
    pub dangerous_enabled: bool,

    /// Skip the persistent audit log; decisions are echoed to the console
    /// only.
    pub no_log: bool,
}

impl Mode {
    /// Mode for a real, fully interactive run. Used as a baseline in tests.
    pub fn interactive() -> Self {
        Self::default()
    }
}
