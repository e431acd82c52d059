// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
pub mod Utils;
pub mod symbolic;

pub use symbolic::function::Function;
pub use symbolic::identity::{Identity, IdentityError, identity};
pub use symbolic::lambdify::{Backend, NativeFn, compile, compile_with};
pub use symbolic::rewrite::{RewriteStats, Rewriter, UNBOUNDED, rewrite};
pub use symbolic::term::{BinOp, Term, VarIndex, constant, display, variable};
