//! Rewrite rules. An [`Identity`] `left == right` is applied left to right: wherever `left`
//! unifies with a subterm, the subterm is replaced by `right` with the bound variables
//! substituted. Every variable of `right` must occur in `left`, otherwise the substitution
//! would be undefined.

use crate::symbolic::term::{Term, default_name};
use std::fmt;

/// Errors raised while building an identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The right side references variables (bitset `unbound`) that the left side never binds
    InvalidIdentity { unbound: u32 },
}

impl IdentityError {
    /// Indices of the offending variables.
    pub fn unbound_variables(&self) -> Vec<u8> {
        match self {
            IdentityError::InvalidIdentity { unbound } => (0..u32::BITS as u8)
                .filter(|index| unbound & (1u32 << index) != 0)
                .collect(),
        }
    }
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IdentityError::InvalidIdentity { .. } => {
                let names: Vec<String> = self
                    .unbound_variables()
                    .into_iter()
                    .map(default_name)
                    .collect();
                write!(
                    f,
                    "Invalid identity: right side uses variables not bound by the left side: {}",
                    names.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for IdentityError {}

/// Left-to-right rewrite rule between two terms.
#[derive(Clone, Debug, PartialEq)]
pub struct Identity {
    left: Term,
    right: Term,
    names: Vec<String>,
}

impl Identity {
    /// Builds the rule `left == right`.
    ///
    /// # Errors
    /// [`IdentityError::InvalidIdentity`] when `right` references a variable absent from `left`.
    pub fn new(left: Term, right: Term) -> Result<Identity, IdentityError> {
        let unbound = right.var_mask() & !left.var_mask();
        if unbound != 0 {
            return Err(IdentityError::InvalidIdentity { unbound });
        }
        Ok(Identity {
            left,
            right,
            names: Vec::new(),
        })
    }

    /// Attaches display names for the pattern variables.
    pub fn with_names<I, S>(mut self, names: I) -> Identity
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn left(&self) -> &Term {
        &self.left
    }

    pub fn right(&self) -> &Term {
        &self.right
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of binding slots the pattern needs.
    pub fn arity(&self) -> usize {
        self.left.arity()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} == {}",
            self.left.named(&self.names),
            self.right.named(&self.names)
        )
    }
}

/// `identity(left, right)`, see [`Identity::new`].
pub fn identity(left: Term, right: Term) -> Result<Identity, IdentityError> {
    Identity::new(left, right)
}
