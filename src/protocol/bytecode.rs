//! Traversal bytecode
//!
//! A traversal program is a list of source instructions (configuring the
//! traversal source) followed by step instructions.

use crate::structure::GValue;
use std::fmt;

/// One operator with its arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub operator: String,
    pub arguments: Vec<GValue>,
}

impl Instruction {
    pub fn new(operator: impl Into<String>, arguments: Vec<GValue>) -> Self {
        Instruction {
            operator: operator.into(),
            arguments,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.arguments.iter().map(|a| a.to_string()).collect();
        write!(f, "{}({})", self.operator, args.join(", "))
    }
}

/// A traversal program
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bytecode {
    sources: Vec<Instruction>,
    steps: Vec<Instruction>,
}

impl Bytecode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Program committing the current remote transaction
    pub fn tx_commit() -> Self {
        let mut bytecode = Bytecode::new();
        bytecode.add_source("tx", vec!["commit".into()]);
        bytecode
    }

    /// Program rolling back the current remote transaction
    pub fn tx_rollback() -> Self {
        let mut bytecode = Bytecode::new();
        bytecode.add_source("tx", vec!["rollback".into()]);
        bytecode
    }

    pub fn add_source(&mut self, operator: impl Into<String>, arguments: Vec<GValue>) {
        self.sources.push(Instruction::new(operator, arguments));
    }

    pub fn add_step(&mut self, operator: impl Into<String>, arguments: Vec<GValue>) {
        self.steps.push(Instruction::new(operator, arguments));
    }

    pub fn sources(&self) -> &[Instruction] {
        &self.sources
    }

    pub fn steps(&self) -> &[Instruction] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.steps.is_empty()
    }
}

impl fmt::Display for Bytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |list: &[Instruction]| {
            list.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
        };
        write!(f, "[[{}], [{}]]", join(&self.sources), join(&self.steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_program() {
        let mut bc = Bytecode::new();
        assert!(bc.is_empty());
        bc.add_step("V", vec![]);
        bc.add_step("has", vec!["name".into(), "marko".into()]);
        assert_eq!(bc.steps().len(), 2);
        assert_eq!(bc.to_string(), "[[], [V(), has(name, marko)]]");
    }

    #[test]
    fn test_tx_programs() {
        assert_eq!(Bytecode::tx_commit().to_string(), "[[tx(commit)], []]");
        assert_eq!(Bytecode::tx_rollback().sources()[0].arguments, vec![GValue::from("rollback")]);
    }
}
