//! # Rewriting Module
//!
//! Applies a list of [`Identity`] rules to a [`Term`] until nothing changes or a round limit
//! is reached.
//!
//! ## Algorithm
//!
//! One **round** walks the tree bottom-up:
//!
//! 1. **Children First**: both operands of a binary node are rewritten before the node itself,
//!    and the node is rebuilt only when an operand actually changed
//! 2. **Unification**: every identity is tried in order against the current node. Pattern
//!    constants match equal constants, pattern variables bind the subterm they meet (a repeated
//!    variable must meet a structurally equal subterm), pattern operators match the same operator
//! 3. **Substitution**: on a match the node is replaced by the right side of the identity with
//!    the bindings plugged in, and the remaining identities are tried against the replacement
//!
//! A node whose identities reproduce it bit for bit counts as unchanged, so its parent is not
//! rebuilt. Rounds repeat until a round leaves the tree unchanged (a fixed point) or the caller's
//! maximum number of rounds is spent. Identity sets are not guaranteed to terminate
//! (`x + y == y + x` flips forever), so the cap is a stop condition, not an error.
//!
//! The binding buffer is owned by a [`Rewriter`]; every rewrite call gets its own, so
//! concurrent rewrites never share scratch state.

use crate::symbolic::identity::Identity;
use crate::symbolic::term::Term;
use log::{debug, info, trace};

/// Round limit meaning "until convergence".
pub const UNBOUNDED: usize = usize::MAX;

/// Outcome of a rewrite run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// rounds performed, the last one included
    pub rounds: usize,
    /// how many times an identity fired
    pub applications: usize,
    /// `true` when the run stopped at a fixed point rather than at the round limit
    pub converged: bool,
}

/// Unification and substitution engine.
#[derive(Debug, Clone)]
pub struct Rewriter {
    max_rounds: usize,
    bindings: Vec<Option<Term>>,
    applications: usize,
}

impl Default for Rewriter {
    fn default() -> Self {
        Rewriter::new()
    }
}

impl Rewriter {
    /// Rewriter running until convergence.
    pub fn new() -> Self {
        Rewriter::with_max_rounds(UNBOUNDED)
    }

    pub fn with_max_rounds(max_rounds: usize) -> Self {
        Rewriter {
            max_rounds,
            bindings: Vec::new(),
            applications: 0,
        }
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    /// Rewrites `term` with `identities`, returning the result and the run statistics.
    /// `max_rounds == 0` returns the term untouched.
    pub fn run(&mut self, term: &Term, identities: &[Identity]) -> (Term, RewriteStats) {
        let mut stats = RewriteStats::default();
        if identities.is_empty() {
            stats.converged = true;
            return (term.clone(), stats);
        }

        let width = identities
            .iter()
            .map(Identity::arity)
            .chain(std::iter::once(term.arity()))
            .max()
            .unwrap_or(0);
        self.bindings.clear();
        self.bindings.resize(width, None);
        self.applications = 0;

        let mut current = term.clone();
        while stats.rounds < self.max_rounds {
            stats.rounds += 1;
            match self.rewrite_node(&current, identities) {
                None => {
                    stats.converged = true;
                }
                Some(next) if next.identical(&current) => {
                    stats.converged = true;
                }
                Some(next) => {
                    debug!(
                        "round {}: {} nodes -> {} nodes",
                        stats.rounds,
                        current.node_count(),
                        next.node_count()
                    );
                    current = next;
                }
            }
            if stats.converged {
                break;
            }
        }
        stats.applications = self.applications;

        if stats.converged {
            info!(
                "rewrite reached a fixed point after {} round(s), {} application(s)",
                stats.rounds, stats.applications
            );
        } else {
            info!(
                "rewrite stopped at the round limit {} with {} application(s)",
                self.max_rounds, stats.applications
            );
        }
        (current, stats)
    }

    /// One bottom-up pass. `None` means the subtree is unchanged.
    fn rewrite_node(&mut self, node: &Term, identities: &[Identity]) -> Option<Term> {
        let rebuilt = match node {
            Term::Binary(binary) => {
                let left = self.rewrite_node(binary.left(), identities);
                let right = self.rewrite_node(binary.right(), identities);
                if left.is_none() && right.is_none() {
                    None
                } else {
                    Some(Term::binary(
                        binary.op(),
                        left.unwrap_or_else(|| binary.left().clone()),
                        right.unwrap_or_else(|| binary.right().clone()),
                    ))
                }
            }
            Term::Const(_) | Term::Var(_) => None,
        };

        let mut changed = rebuilt.is_some();
        let mut current = rebuilt.unwrap_or_else(|| node.clone());
        let mut fired = false;
        for identity in identities {
            self.bindings.fill(None);
            if unify(identity.left(), &current, &mut self.bindings) {
                let replacement = substitute(identity.right(), &self.bindings);
                trace!("{} fired: {} -> {}", identity, current, replacement);
                current = replacement;
                fired = true;
                self.applications += 1;
            }
        }
        // identities that reproduce their input leave the node unchanged
        if fired {
            changed = !current.identical(node);
        }
        changed.then_some(current)
    }
}

/// Syntactic unification of `pattern` against `candidate`. Bindings made by a failed
/// attempt are left in the buffer; callers clear it before each attempt.
fn unify(pattern: &Term, candidate: &Term, bindings: &mut [Option<Term>]) -> bool {
    match pattern {
        Term::Const(value) => matches!(candidate, Term::Const(c) if c == value),
        Term::Var(index) => {
            let slot = &mut bindings[index.as_usize()];
            match slot {
                Some(bound) => bound == candidate,
                None => {
                    *slot = Some(candidate.clone());
                    true
                }
            }
        }
        Term::Binary(pat) => match candidate {
            Term::Binary(cand) => {
                pat.op() == cand.op()
                    && unify(pat.left(), cand.left(), bindings)
                    && unify(pat.right(), cand.right(), bindings)
            }
            Term::Const(_) | Term::Var(_) => false,
        },
    }
}

/// Plugs the bindings into `template`. Nodes are rebuilt without constant folding.
fn substitute(template: &Term, bindings: &[Option<Term>]) -> Term {
    match template {
        Term::Const(_) => template.clone(),
        // identities guarantee every right-side variable was bound by the left side
        Term::Var(index) => bindings
            .get(index.as_usize())
            .and_then(Option::clone)
            .unwrap_or_else(|| template.clone()),
        Term::Binary(node) => Term::unfolded(
            node.op(),
            substitute(node.left(), bindings),
            substitute(node.right(), bindings),
        ),
    }
}

/// Rewrites `term` with `identities` for at most `max_rounds` rounds (use [`UNBOUNDED`] to run
/// until convergence).
pub fn rewrite(term: &Term, identities: &[Identity], max_rounds: usize) -> Term {
    Rewriter::with_max_rounds(max_rounds).run(term, identities).0
}
