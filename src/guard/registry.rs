use super::op::Operation;

/// Insertion-ordered catalog of operations.
///
/// The executor runs operations strictly in registration order; later
/// operations may assume earlier ones completed (the final
/// archive-and-encrypt step relies on all prior backups already sitting in
/// the backup directory).
#[derive(Default)]
pub struct OperationRegistry {
    ops: Vec<Operation>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operation. A duplicate id is a bug in the catalog, not
    /// a runtime condition, and fails fast.
    pub fn register(&mut self, op: Operation) {
        if self.ops.iter().any(|o| o.id == op.id) {
            panic!("duplicate operation id '{}'", op.id);
        }
        self.ops.push(op);
    }

    pub fn all(&self) -> &[Operation] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// External programs the registered actions depend on, deduplicated in
    /// first-use order. Used by the preflight check.
    pub fn required_programs(&self) -> Vec<&str> {
        let mut programs: Vec<&str> = Vec::new();
        for op in &self.ops {
            if let Some(program) = op.action.program() {
                if !programs.contains(&program) {
                    programs.push(program);
                }
            }
        }
        programs
    }
}
