//! # Functions
//!
//! A [`Function`] is a body [`Term`] plus the ordered names of its parameters. Names only
//! matter for printing; the body refers to parameters by index. Rewriting returns a new
//! function, compiling returns a [`NativeFn`] that owns everything it needs.
//!
//! The [`function!`](crate::function) and [`identity!`](crate::identity) macros take the
//! parameter names from a closure-like header, so `function!(|x, y| 3.0 * x + 3.0 * y)`
//! prints as `((3 * x) + (3 * y))`.

use crate::symbolic::identity::Identity;
use crate::symbolic::lambdify::{Backend, NativeFn, compile_with};
use crate::symbolic::rewrite::{RewriteStats, Rewriter, UNBOUNDED};
use crate::symbolic::term::{Term, display};
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    body: Term,
    names: Vec<String>,
}

impl Function {
    pub fn new<B, I, S>(body: B, names: I) -> Function
    where
        B: Into<Term>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Function {
            body: body.into(),
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn body(&self) -> &Term {
        &self.body
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of declared parameters, never below what the body references.
    pub fn arity(&self) -> usize {
        self.names.len().max(self.body.arity())
    }

    /// Rewrites until a fixed point.
    pub fn rewrite(&self, identities: &[Identity]) -> Function {
        self.rewrite_rounds(UNBOUNDED, identities)
    }

    /// Rewrites for at most `rounds` rounds.
    pub fn rewrite_rounds(&self, rounds: usize, identities: &[Identity]) -> Function {
        self.rewrite_with(&mut Rewriter::with_max_rounds(rounds), identities)
            .0
    }

    /// Rewrites with a caller configured [`Rewriter`] and reports the run statistics.
    pub fn rewrite_with(
        &self,
        rewriter: &mut Rewriter,
        identities: &[Identity],
    ) -> (Function, RewriteStats) {
        let (body, stats) = rewriter.run(&self.body, identities);
        let rewritten = Function {
            body,
            names: self.names.clone(),
        };
        (rewritten, stats)
    }

    pub fn compile(&self) -> NativeFn {
        self.compile_with(Backend::default())
    }

    pub fn compile_with(&self, backend: Backend) -> NativeFn {
        compile_with(&self.body, self.arity(), backend)
    }
}

impl From<Term> for Function {
    fn from(body: Term) -> Self {
        Function {
            body,
            names: Vec::new(),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&display(&self.body, &self.names))
    }
}

/// Builds a [`Function`] from a closure-like header. Each parameter is bound to a `&Term`
/// variable in declaration order and its identifier becomes the display name.
///
/// # Examples
/// ```
/// use RustedAlgebra::function;
/// let f = function!(|x| 2.0 * x + 1.0);
/// assert_eq!(f.to_string(), "((2 * x) + 1)");
/// assert_eq!(f.compile().call(&[3.0]), 7.0);
/// ```
#[macro_export]
macro_rules! function {
    (|$($var:ident),+ $(,)?| $body:expr) => {{
        let mut seq = $crate::symbolic::term::VarSequence::new();
        $(
            #[allow(unused_variables)]
            let $var = &seq.next_var();
        )+
        $crate::symbolic::function::Function::new($body, [$(stringify!($var)),+])
    }};
}

/// Builds an [`Identity`] `left == right` from a closure-like header; evaluates to
/// `Result<Identity, IdentityError>`.
///
/// # Examples
/// ```
/// use RustedAlgebra::{function, identity};
/// let comm = identity!(|x, y| x + y => y + x).unwrap();
/// let f = function!(|x| 1.0 + x);
/// assert_eq!(f.rewrite_rounds(1, &[comm]).to_string(), "(x + 1)");
/// ```
#[macro_export]
macro_rules! identity {
    (|$($var:ident),+ $(,)?| $left:expr => $right:expr) => {{
        let mut seq = $crate::symbolic::term::VarSequence::new();
        $(
            #[allow(unused_variables)]
            let $var = &seq.next_var();
        )+
        $crate::symbolic::identity::Identity::new(
            $crate::symbolic::term::Term::from($left),
            $crate::symbolic::term::Term::from($right),
        )
        .map(|e| e.with_names([$(stringify!($var)),+]))
    }};
}
