//! Instruction parser: base instruction string → nested block tree.
//!
//! Characters outside the base alphabet are ignored, so hand-written `.bf`
//! files may carry free-form comments.  Brackets must balance.

use std::fmt;

use crate::error::{Bracket, Error, Result};

/// One node of the block tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `+`
    Increment,
    /// `-`
    Decrement,
    /// `<`
    MoveLeft,
    /// `>`
    MoveRight,
    /// `.`
    Output,
    /// `,`
    Input,
    /// `~`
    Dump,
    /// `[ … ]`
    Loop(Vec<Instruction>),
}

impl Instruction {
    /// Leaf instruction for a base symbol; `None` for brackets and other text.
    fn leaf(c: char) -> Option<Self> {
        Some(match c {
            '+' => Instruction::Increment,
            '-' => Instruction::Decrement,
            '<' => Instruction::MoveLeft,
            '>' => Instruction::MoveRight,
            '.' => Instruction::Output,
            ',' => Instruction::Input,
            '~' => Instruction::Dump,
            _ => return None,
        })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Instruction::Increment => '+',
            Instruction::Decrement => '-',
            Instruction::MoveLeft => '<',
            Instruction::MoveRight => '>',
            Instruction::Output => '.',
            Instruction::Input => ',',
            Instruction::Dump => '~',
            Instruction::Loop(body) => {
                f.write_str("[")?;
                for instr in body {
                    write!(f, "{instr}")?;
                }
                return f.write_str("]");
            }
        };
        write!(f, "{c}")
    }
}

/// A parsed program: the top-level block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    body: Vec<Instruction>,
}

impl Program {
    pub fn instructions(&self) -> &[Instruction] {
        &self.body
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instr in &self.body {
            write!(f, "{instr}")?;
        }
        Ok(())
    }
}

/// Parse an instruction string into a [`Program`].
pub fn parse(src: &str) -> Result<Program> {
    // Each open loop keeps its body plus the offset of its `[`.
    let mut top: Vec<Instruction> = Vec::new();
    let mut open: Vec<(Vec<Instruction>, usize)> = Vec::new();

    for (offset, c) in src.chars().enumerate() {
        let current = open.last_mut().map_or(&mut top, |(body, _)| body);
        if let Some(leaf) = Instruction::leaf(c) {
            current.push(leaf);
            continue;
        }
        match c {
            '[' => open.push((Vec::new(), offset)),
            ']' => {
                let Some((body, _)) = open.pop() else {
                    return Err(Error::UnmatchedBracket {
                        bracket: Bracket::Close,
                        offset,
                    });
                };
                let parent = open.last_mut().map_or(&mut top, |(body, _)| body);
                parent.push(Instruction::Loop(body));
            }
            _ => {}
        }
    }

    if let Some((_, offset)) = open.pop() {
        return Err(Error::UnmatchedBracket {
            bracket: Bracket::Open,
            offset,
        });
    }
    Ok(Program { body: top })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
