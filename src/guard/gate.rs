use super::op::{Operation, RiskTier};
use super::prompt::Prompter;
use crate::audit::AuditLogger;
use crate::common::Mode;

/// Outcome of consulting the gate for one operation. Derived fresh per
/// operation and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationDecision {
    Allow,
    Deny,
    /// The caller must collect exactly this keyword from the operator for
    /// the decision to convert to Allow.
    RequireTypedKeyword(String),
}

/// Decides, from the immutable mode flags, whether an operation may
/// proceed and what kind of confirmation it needs.
///
/// Dry-run is handled here and nowhere else: every decision becomes Deny
/// after the intended action is logged, which makes the whole pipeline
/// side-effect-free by construction rather than by special-casing call
/// sites.
pub struct ConfirmationGate {
    mode: Mode,
}

impl ConfirmationGate {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn decide(
        &self,
        op: &Operation,
        prompter: &mut dyn Prompter,
        log: &mut AuditLogger,
    ) -> ConfirmationDecision {
        if self.mode.dry_run {
            log.record(&format!(
                "[dry-run] '{}': would confirm and {}",
                op.id,
                op.action.describe()
            ));
            return ConfirmationDecision::Deny;
        }

        match op.risk {
            RiskTier::Safe => ConfirmationDecision::Allow,

            RiskTier::Confirm => {
                if self.mode.auto_yes {
                    return ConfirmationDecision::Allow;
                }
                if self.mode.quiet {
                    log.record(&format!(
                        "'{}' needs confirmation; denied in quiet mode",
                        op.id
                    ));
                    return ConfirmationDecision::Deny;
                }
                if prompter.confirm(&format!("{}. Proceed?", op.description)) {
                    ConfirmationDecision::Allow
                } else {
                    ConfirmationDecision::Deny
                }
            }

            // auto_yes never applies here.
            RiskTier::Dangerous => {
                if !self.mode.dangerous_enabled {
                    log.record(&format!(
                        "'{}' is disabled unless the --dangerous flag is passed",
                        op.id
                    ));
                    return ConfirmationDecision::Deny;
                }
                ConfirmationDecision::RequireTypedKeyword(op.required_keyword())
            }
        }
    }

    /// Ad-hoc Confirm-tier question outside any registered operation, used
    /// for the "delete unencrypted intermediates" offer after a successful
    /// encryption. Follows the same rules as a Confirm-tier operation.
    pub fn confirm_extra(
        &self,
        question: &str,
        prompter: &mut dyn Prompter,
        log: &mut AuditLogger,
    ) -> bool {
        if self.mode.dry_run {
            log.record(&format!("[dry-run] would ask: {}", question));
            return false;
        }
        if self.mode.auto_yes {
            return true;
        }
        if self.mode.quiet {
            return false;
        }
        prompter.confirm(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::op::OpAction;

    /// Prompter that panics if consulted; for cases where no prompt may
    /// happen.
    struct NoPrompt;
    impl Prompter for NoPrompt {
        fn confirm(&mut self, _q: &str) -> bool {
            panic!("prompter must not be consulted");
        }
        fn read_line(&mut self, _p: &str) -> Option<String> {
            panic!("prompter must not be consulted");
        }
    }

    struct Scripted(Vec<bool>);
    impl Prompter for Scripted {
        fn confirm(&mut self, _q: &str) -> bool {
            self.0.remove(0)
        }
        fn read_line(&mut self, _p: &str) -> Option<String> {
            None
        }
    }

    fn op(risk: RiskTier) -> Operation {
        Operation::new("test-op", "Test operation", risk, OpAction::RemovePaths(vec![]))
    }

    fn mode(dry_run: bool, auto_yes: bool, quiet: bool, dangerous: bool) -> Mode {
        Mode {
            dry_run,
            auto_yes,
            quiet,
            dangerous_enabled: dangerous,
            no_log: true,
        }
    }

    #[test]
    fn test_dry_run_denies_every_tier_without_prompting() {
        let gate = ConfirmationGate::new(mode(true, true, false, true));
        let mut log = AuditLogger::console_only();
        for tier in [RiskTier::Safe, RiskTier::Confirm, RiskTier::Dangerous] {
            let decision = gate.decide(&op(tier), &mut NoPrompt, &mut log);
            assert_eq!(decision, ConfirmationDecision::Deny);
        }
    }

    #[test]
    fn test_safe_always_allowed() {
        let gate = ConfirmationGate::new(mode(false, false, true, false));
        let mut log = AuditLogger::console_only();
        let decision = gate.decide(&op(RiskTier::Safe), &mut NoPrompt, &mut log);
        assert_eq!(decision, ConfirmationDecision::Allow);
    }

    #[test]
    fn test_confirm_auto_yes_allows_without_prompt() {
        let gate = ConfirmationGate::new(mode(false, true, false, false));
        let mut log = AuditLogger::console_only();
        let decision = gate.decide(&op(RiskTier::Confirm), &mut NoPrompt, &mut log);
        assert_eq!(decision, ConfirmationDecision::Allow);
    }

    #[test]
    fn test_confirm_quiet_denies_without_prompt() {
        let gate = ConfirmationGate::new(mode(false, false, true, false));
        let mut log = AuditLogger::console_only();
        let decision = gate.decide(&op(RiskTier::Confirm), &mut NoPrompt, &mut log);
        assert_eq!(decision, ConfirmationDecision::Deny);
    }

    #[test]
    fn test_confirm_prompt_maps_answer() {
        let gate = ConfirmationGate::new(mode(false, false, false, false));
        let mut log = AuditLogger::console_only();

        let decision = gate.decide(&op(RiskTier::Confirm), &mut Scripted(vec![true]), &mut log);
        assert_eq!(decision, ConfirmationDecision::Allow);

        let decision = gate.decide(&op(RiskTier::Confirm), &mut Scripted(vec![false]), &mut log);
        assert_eq!(decision, ConfirmationDecision::Deny);
    }

    #[test]
    fn test_dangerous_denied_when_not_enabled_even_with_auto_yes() {
        let gate = ConfirmationGate::new(mode(false, true, false, false));
        let mut log = AuditLogger::console_only();
        let decision = gate.decide(&op(RiskTier::Dangerous), &mut NoPrompt, &mut log);
        assert_eq!(decision, ConfirmationDecision::Deny);
    }

    #[test]
    fn test_dangerous_enabled_requires_keyword() {
        let gate = ConfirmationGate::new(mode(false, true, false, true));
        let mut log = AuditLogger::console_only();
        let op = op(RiskTier::Dangerous).with_keyword("RESET-MSFDB");
        let decision = gate.decide(&op, &mut NoPrompt, &mut log);
        assert_eq!(
            decision,
            ConfirmationDecision::RequireTypedKeyword("RESET-MSFDB".to_string())
        );
    }
}
