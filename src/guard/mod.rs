pub mod executor;
pub mod gate;
pub mod op;
pub mod prompt;
pub mod registry;

pub use executor::{GuardedExecutor, OpOutcome, OpStatus, RunReport};
pub use gate::{ConfirmationDecision, ConfirmationGate};
pub use op::{OpAction, Operation, RiskTier};
pub use prompt::{Prompter, TerminalPrompter};
pub use registry::OperationRegistry;
