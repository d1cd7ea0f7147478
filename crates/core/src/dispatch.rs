//! Splits parsed commands into the automation batch and the set the caller
//! handles through its own collaborators.

use crate::command::{Command, CommandKind};

/// Result of partitioning one parsed command sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchPlan {
    /// Commands for the concurrent executor, in input order.
    pub automation: Vec<Command>,
    /// Chat, realtime, image and exit commands, in input order.
    pub delegated: Vec<Command>,
}

impl DispatchPlan {
    /// True when the sequence requested an exit.
    pub fn wants_exit(&self) -> bool {
        self.delegated
            .iter()
            .any(|c| c.kind == CommandKind::Exit)
    }
}

/// Partition commands by kind. Pure: no handler is invoked here.
///
/// An `Exit` command ends the scan; anything after it is discarded.
pub fn dispatch(commands: Vec<Command>) -> DispatchPlan {
    let mut plan = DispatchPlan::default();

    for command in commands {
        let is_exit = command.kind == CommandKind::Exit;
        if command.kind.is_delegated() {
            plan.delegated.push(command);
        } else {
            plan.automation.push(command);
        }
        if is_exit {
            break;
        }
    }

    plan
}
