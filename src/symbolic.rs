#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// # Terms
/// the expression tree: constants, parameters and binary arithmetic, folded at construction
///
///# Example
/// ```
/// use RustedAlgebra::symbolic::term::{Term, display};
/// let x = Term::var(0);
/// let t = 3.0 * (&x + 1.0) + (2.0 + 2.0);
/// assert_eq!(display(&t, &["x"]), "((3 * (x + 1)) + 4)");
/// assert_eq!(t.var_mask(), 0b1);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod term;
#[cfg(test)]
mod term_tests;
///____________________________________________________________________________________________________________________________
/// # Identities
/// rewrite rules `left == right`; every variable of the right side must occur on the left
///# Example
/// ```
/// use RustedAlgebra::symbolic::identity::identity;
/// use RustedAlgebra::symbolic::term::Term;
/// let (x, y) = (Term::var(0), Term::var(1));
/// assert!(identity(&x + &y, &y + &x).is_ok());
/// assert!(identity(x.clone(), &x + &y).is_err());
/// ```
pub mod identity;
///____________________________________________________________________________________________________________________________
/// # Rewriting
/// bottom-up unification and substitution, repeated to a fixed point or a round limit
///# Example
/// ```
/// use RustedAlgebra::symbolic::identity::identity;
/// use RustedAlgebra::symbolic::rewrite::{rewrite, UNBOUNDED};
/// use RustedAlgebra::symbolic::term::Term;
/// let x = Term::var(0);
/// let unit = identity(&x * 1.0, x.clone()).unwrap();
/// let t = (&x * 1.0) * 1.0;
/// assert_eq!(rewrite(&t, &[unit], UNBOUNDED), x);
/// ```
pub mod rewrite;
///____________________________________________________________________________________________________________________________
/// # Lambdify
/// turns a term into a callable numeric routine (closure tree or stack program)
///# Example
/// ```
/// use RustedAlgebra::symbolic::lambdify::compile;
/// use RustedAlgebra::symbolic::term::Term;
/// let x = Term::var(0);
/// let f = compile(&(&x * &x + 1.0), 1);
/// assert_eq!(f.call(&[3.0]), 10.0);
/// ```
pub mod lambdify;
///____________________________________________________________________________________________________________________________
/// # Functions
/// named parameters on top of a term, plus the `function!` and `identity!` macros
pub mod function;
