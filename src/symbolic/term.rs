//! # Term Module
//!
//! The expression tree of the crate. A [`Term`] is an immutable value: a numeric constant,
//! a reference to the i-th function parameter, or a binary arithmetic operation over two
//! sub-terms. Binary nodes are reference counted, so cloning a term and sharing subtrees
//! between terms is cheap and safe across threads.
//!
//! ## Main Structures and Methods
//!
//! - [`Term`] - the tree itself (`Const`, `Var`, `Binary`)
//! - [`BinOp`] - the closed set of binary operators (`+ - * / ^`)
//! - [`Term::binary`] - the folding constructor used by every arithmetic combinator
//! - [`Term::var_mask`], [`Term::node_count`], [`Term::arity`] - attributes cached at construction
//! - [`display`] - fully parenthesised infix printing with caller supplied parameter names
//!
//! ## Interesting Code Features
//!
//! 1. **Constant Folding at Construction**: `3.0 + 4.0` never builds an `Add` node, the
//!    combinators evaluate two constant operands immediately with plain `f64` arithmetic
//!    (IEEE-754 semantics, so `1/0` is `inf`, not an error).
//!
//! 2. **Operator Overloading**: `std::ops` traits are implemented for owned terms, borrowed
//!    terms and `f64` operands, so `3.0 * (x + 1.0)` or `&x * &x` read like the math.
//!
//! 3. **Variable Mask**: every node carries the bitset of parameters referenced below it,
//!    which gives the arity of a compiled function and the well-formedness check of identities
//!    without walking the tree again.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;
use strum_macros::{Display, EnumIter};

/// Maximum number of distinct variables, the bit width of the variable mask.
pub const MAX_VARS: usize = u32::BITS as usize;

/// Index of a function parameter. Only indices below [`MAX_VARS`] can be represented, so every
/// `Term::Var` has a bit in the variable mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarIndex(u8);

impl VarIndex {
    /// `None` when `index` is not below [`MAX_VARS`].
    pub fn new(index: u8) -> Option<VarIndex> {
        ((index as usize) < MAX_VARS).then_some(VarIndex(index))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// The bit of this parameter in a variable mask.
    pub fn bit(self) -> u32 {
        1u32 << self.0
    }
}

impl fmt::Display for VarIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Binary arithmetic operators. `Display` prints the infix symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum BinOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "^")]
    Pow,
}

impl BinOp {
    /// Evaluates the operator on two doubles with the host IEEE-754 semantics.
    #[inline(always)]
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinOp::Add => lhs + rhs,
            BinOp::Sub => lhs - rhs,
            BinOp::Mul => lhs * rhs,
            BinOp::Div => lhs / rhs,
            BinOp::Pow => lhs.powf(rhs),
        }
    }
}

/// Payload of a binary node. Fields are private so that the cached attributes always
/// agree with the children.
#[derive(Debug)]
pub struct Binary {
    op: BinOp,
    left: Term,
    right: Term,
    var_mask: u32,
    node_count: u32,
}

impl Binary {
    pub fn op(&self) -> BinOp {
        self.op
    }

    pub fn left(&self) -> &Term {
        &self.left
    }

    pub fn right(&self) -> &Term {
        &self.right
    }
}

/// Expression tree node.
///
/// # Examples
/// ```rust, ignore
/// use RustedAlgebra::symbolic::term::Term;
/// let x = Term::var(0);
/// let t = 3.0 * (&x + 1.0);
/// assert_eq!(t.to_string(), "(3 * (x0 + 1))");
/// ```
#[derive(Clone, Debug)]
pub enum Term {
    /// Numerical constant value
    Const(f64),
    /// Function parameter; build it with [`Term::var`]
    Var(VarIndex),
    /// Binary operation, built through [`Term::binary`]
    Binary(Arc<Binary>),
}

impl Term {
    //___________________________________CONSTRUCTION____________________________________

    pub fn constant(value: f64) -> Term {
        Term::Const(value)
    }

    /// Creates the variable standing for the parameter at `index`.
    ///
    /// # Panics
    /// If `index` is not below [`MAX_VARS`].
    pub fn var(index: u8) -> Term {
        match VarIndex::new(index) {
            Some(index) => Term::Var(index),
            None => panic!(
                "variable index {} out of range, at most {} variables are supported",
                index, MAX_VARS
            ),
        }
    }

    /// Builds `lhs op rhs`, folding the operation when both operands are constants.
    pub fn binary(op: BinOp, lhs: Term, rhs: Term) -> Term {
        match (&lhs, &rhs) {
            (Term::Const(a), Term::Const(b)) => Term::Const(op.apply(*a, *b)),
            _ => Term::unfolded(op, lhs, rhs),
        }
    }

    /// Builds a binary node without folding. Used by identity substitution, which is purely
    /// syntactic: the rewritten tree keeps the shape the identity prescribes.
    pub(crate) fn unfolded(op: BinOp, left: Term, right: Term) -> Term {
        let var_mask = left.var_mask() | right.var_mask();
        let node_count = 1u32
            .saturating_add(left.node_count())
            .saturating_add(right.node_count());
        Term::Binary(Arc::new(Binary {
            op,
            left,
            right,
            var_mask,
            node_count,
        }))
    }

    /// Raises the term to a power; folds when both sides are constants.
    pub fn pow<E: Into<Term>>(&self, exponent: E) -> Term {
        Term::binary(BinOp::Pow, self.clone(), exponent.into())
    }

    /// `-a`: a constant is negated directly, anything else becomes `0 - a`.
    pub fn negate(&self) -> Term {
        match self {
            Term::Const(v) => Term::Const(-v),
            _ => Term::binary(BinOp::Sub, Term::Const(0.0), self.clone()),
        }
    }

    //___________________________________ATTRIBUTES____________________________________

    /// Bitset of the parameter indices referenced by this term.
    pub fn var_mask(&self) -> u32 {
        match self {
            Term::Const(_) => 0,
            Term::Var(index) => index.bit(),
            Term::Binary(node) => node.var_mask,
        }
    }

    /// Number of nodes in the tree, saturating at `u32::MAX`.
    pub fn node_count(&self) -> u32 {
        match self {
            Term::Const(_) | Term::Var(_) => 1,
            Term::Binary(node) => node.node_count,
        }
    }

    /// One more than the greatest referenced variable index, 0 for a closed term.
    pub fn arity(&self) -> usize {
        (u32::BITS - self.var_mask().leading_zeros()) as usize
    }

    /// Referenced variable indices in ascending order.
    pub fn variables(&self) -> Vec<u8> {
        let mask = self.var_mask();
        (0..MAX_VARS as u8)
            .filter(|index| mask & (1u32 << index) != 0)
            .collect()
    }

    pub fn contains_var(&self, index: u8) -> bool {
        (index as usize) < MAX_VARS && self.var_mask() & (1u32 << index) != 0
    }

    pub fn is_const(&self) -> bool {
        matches!(self, Term::Const(_))
    }

    pub fn as_const(&self) -> Option<f64> {
        match self {
            Term::Const(v) => Some(*v),
            _ => None,
        }
    }

    /// Reference interpreter: walks the tree and evaluates it for `args`.
    ///
    /// # Panics
    /// If a referenced parameter has no argument.
    pub fn eval(&self, args: &[f64]) -> f64 {
        match self {
            Term::Const(v) => *v,
            Term::Var(index) => args[index.as_usize()],
            Term::Binary(node) => node.op.apply(node.left.eval(args), node.right.eval(args)),
        }
    }

    /// Same tree bit for bit: constants are compared through `f64::to_bits`, so a `NaN` constant
    /// is identical to a copy of itself (unlike `==`) and `0.0` differs from `-0.0`.
    pub fn identical(&self, other: &Term) -> bool {
        match (self, other) {
            (Term::Const(a), Term::Const(b)) => a.to_bits() == b.to_bits(),
            (Term::Var(a), Term::Var(b)) => a == b,
            (Term::Binary(a), Term::Binary(b)) => {
                Arc::ptr_eq(a, b)
                    || (a.op == b.op
                        && a.var_mask == b.var_mask
                        && a.node_count == b.node_count
                        && a.left.identical(&b.left)
                        && a.right.identical(&b.right))
            }
            _ => false,
        }
    }

    /// Display adapter printing variables with the given parameter names.
    pub fn named<'a, S: AsRef<str>>(&'a self, names: &'a [S]) -> Named<'a, S> {
        Named { term: self, names }
    }
}

/// Structural equality: same shape, same operators, same variable indices, constants compared
/// with IEEE `==` (a `NaN` constant is unequal to everything, itself included). Two handles to
/// the same binary node are equal without descending.
impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Term::Const(a), Term::Const(b)) => a == b,
            (Term::Var(a), Term::Var(b)) => a == b,
            (Term::Binary(a), Term::Binary(b)) => {
                Arc::ptr_eq(a, b)
                    || a.op == b.op
                        && a.var_mask == b.var_mask
                        && a.node_count == b.node_count
                        && a.left == b.left
                        && a.right == b.right
            }
            _ => false,
        }
    }
}

impl From<f64> for Term {
    fn from(value: f64) -> Self {
        Term::Const(value)
    }
}

impl From<&Term> for Term {
    fn from(term: &Term) -> Self {
        term.clone()
    }
}

//___________________________________PRINTING____________________________________

/// Default name of the parameter at `index`.
pub fn default_name(index: u8) -> String {
    format!("x{}", index)
}

/// Term paired with parameter names, see [`Term::named`].
pub struct Named<'a, S> {
    term: &'a Term,
    names: &'a [S],
}

impl<S: AsRef<str>> Named<'_, S> {
    fn write(&self, term: &Term, f: &mut fmt::Formatter) -> fmt::Result {
        match term {
            Term::Const(v) => write!(f, "{}", v),
            Term::Var(index) => match self.names.get(index.as_usize()) {
                Some(name) => f.write_str(name.as_ref()),
                None => write!(f, "{}", default_name(index.get())),
            },
            Term::Binary(node) => {
                f.write_str("(")?;
                self.write(&node.left, f)?;
                write!(f, " {} ", node.op)?;
                if node.op == BinOp::Pow {
                    f.write_str("(")?;
                    self.write(&node.right, f)?;
                    f.write_str("))")
                } else {
                    self.write(&node.right, f)?;
                    f.write_str(")")
                }
            }
        }
    }
}

impl<S: AsRef<str>> fmt::Display for Named<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write(self.term, f)
    }
}

/// Prints with the default names `x0, x1, ...`.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.named::<&str>(&[]), f)
    }
}

/// Fully parenthesised infix form of `term`. Variables without a name in `names` fall back
/// to `x<i>`. `Pow` prints as `(left ^ (right))`.
pub fn display<S: AsRef<str>>(term: &Term, names: &[S]) -> String {
    term.named(names).to_string()
}

//___________________________________COMBINATORS____________________________________

pub fn constant(value: f64) -> Term {
    Term::constant(value)
}

pub fn variable(index: u8) -> Term {
    Term::var(index)
}

pub fn add(lhs: Term, rhs: Term) -> Term {
    Term::binary(BinOp::Add, lhs, rhs)
}

pub fn sub(lhs: Term, rhs: Term) -> Term {
    Term::binary(BinOp::Sub, lhs, rhs)
}

pub fn mul(lhs: Term, rhs: Term) -> Term {
    Term::binary(BinOp::Mul, lhs, rhs)
}

pub fn div(lhs: Term, rhs: Term) -> Term {
    Term::binary(BinOp::Div, lhs, rhs)
}

pub fn pow(base: Term, exponent: Term) -> Term {
    Term::binary(BinOp::Pow, base, exponent)
}

pub fn negate(term: Term) -> Term {
    term.negate()
}

// owned, borrowed and f64 operands on either side
macro_rules! impl_binary_ops {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait<Term> for Term {
            type Output = Term;
            fn $method(self, rhs: Term) -> Term {
                Term::binary($op, self, rhs)
            }
        }
        impl $trait<&Term> for Term {
            type Output = Term;
            fn $method(self, rhs: &Term) -> Term {
                Term::binary($op, self, rhs.clone())
            }
        }
        impl $trait<Term> for &Term {
            type Output = Term;
            fn $method(self, rhs: Term) -> Term {
                Term::binary($op, self.clone(), rhs)
            }
        }
        impl $trait<&Term> for &Term {
            type Output = Term;
            fn $method(self, rhs: &Term) -> Term {
                Term::binary($op, self.clone(), rhs.clone())
            }
        }
        impl $trait<f64> for Term {
            type Output = Term;
            fn $method(self, rhs: f64) -> Term {
                Term::binary($op, self, Term::Const(rhs))
            }
        }
        impl $trait<f64> for &Term {
            type Output = Term;
            fn $method(self, rhs: f64) -> Term {
                Term::binary($op, self.clone(), Term::Const(rhs))
            }
        }
        impl $trait<Term> for f64 {
            type Output = Term;
            fn $method(self, rhs: Term) -> Term {
                Term::binary($op, Term::Const(self), rhs)
            }
        }
        impl $trait<&Term> for f64 {
            type Output = Term;
            fn $method(self, rhs: &Term) -> Term {
                Term::binary($op, Term::Const(self), rhs.clone())
            }
        }
    };
}

impl_binary_ops!(Add, add, BinOp::Add);
impl_binary_ops!(Sub, sub, BinOp::Sub);
impl_binary_ops!(Mul, mul, BinOp::Mul);
impl_binary_ops!(Div, div, BinOp::Div);

impl Neg for Term {
    type Output = Term;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl Neg for &Term {
    type Output = Term;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

/// Hands out `Var(0)`, `Var(1)`, ... in order. Backs the `function!` and `identity!` macros.
#[derive(Debug, Default)]
pub struct VarSequence {
    next: u8,
}

impl VarSequence {
    pub fn new() -> Self {
        VarSequence { next: 0 }
    }

    /// # Panics
    /// When more than [`MAX_VARS`] variables are requested.
    pub fn next_var(&mut self) -> Term {
        let var = Term::var(self.next);
        self.next += 1;
        var
    }
}
