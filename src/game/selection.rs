//! Candidate actions and priority-ordered selection

use std::fmt;

use crate::comms::protocol::Action;

/// Lower is more urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub u8);

impl Priority {
    pub const BOUNDARY: Priority = Priority(0);
    /// Shared by dodging and powerup pursuit; dodge is queued first
    pub const EVADE_OR_COLLECT: Priority = Priority(1);
    pub const UNSTICK: Priority = Priority(3);
    pub const RETREAT: Priority = Priority(4);
    pub const RECENTER: Priority = Priority(5);
}

/// What produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    BoundaryAvoidance,
    Dodge,
    Powerup,
    Unstick,
    Retreat,
    Recenter,
}

impl CandidateKind {
    /// Priority each kind is queued at
    pub fn priority(self) -> Priority {
        match self {
            Self::BoundaryAvoidance => Priority::BOUNDARY,
            Self::Dodge | Self::Powerup => Priority::EVADE_OR_COLLECT,
            Self::Unstick => Priority::UNSTICK,
            Self::Retreat => Priority::RETREAT,
            Self::Recenter => Priority::RECENTER,
        }
    }
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BoundaryAvoidance => "boundary_avoidance",
            Self::Dodge => "dodge",
            Self::Powerup => "powerup",
            Self::Unstick => "unstick",
            Self::Retreat => "retreat",
            Self::Recenter => "recenter",
        };
        f.write_str(name)
    }
}

/// One proposed action for this turn
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub kind: CandidateKind,
    pub priority: Priority,
    pub action: Action,
}

impl Candidate {
    pub fn new(kind: CandidateKind, action: Action) -> Self {
        Self {
            kind,
            priority: kind.priority(),
            action,
        }
    }
}

/// Candidates ordered by priority, then by insertion
#[derive(Debug, Default)]
pub struct CandidateQueue {
    entries: Vec<(u32, Candidate)>,
    next_seq: u32,
}

impl CandidateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, candidate: Candidate) {
        self.entries.push((self.next_seq, candidate));
        self.next_seq += 1;
    }

    /// Remove and return the most urgent candidate
    pub fn pop(&mut self) -> Option<Candidate> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .min_by_key(|(_, (seq, c))| (c.priority, *seq))
            .map(|(idx, _)| idx)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
impl CandidateQueue {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when a candidate of `kind` is queued
    pub fn contains(&self, kind: CandidateKind) -> bool {
        self.find(kind).is_some()
    }

    /// First queued candidate of `kind`
    pub fn find(&self, kind: CandidateKind) -> Option<&Candidate> {
        self.entries
            .iter()
            .map(|(_, c)| c)
            .find(|c| c.kind == kind)
    }
}
