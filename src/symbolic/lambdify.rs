use crate::symbolic::term::{BinOp, Term};
use log::{info, warn};
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};

/// Lowering strategy. Both give bit-identical results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Backend {
    /// tree of boxed closures calling each other
    #[default]
    Closure,
    /// flat post-order instruction list run on a value stack
    Program,
}

type Routine = Box<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// Compiled numeric routine over a fixed number of `f64` parameters.
pub struct NativeFn {
    arity: usize,
    backend: Backend,
    routine: Routine,
}

impl NativeFn {
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Evaluates the routine. Arguments past the arity are ignored.
    ///
    /// # Panics
    /// If fewer than [`NativeFn::arity`] arguments are given.
    #[inline(always)]
    pub fn call(&self, args: &[f64]) -> f64 {
        assert!(
            args.len() >= self.arity,
            "compiled function takes {} argument(s), {} given",
            self.arity,
            args.len()
        );
        (self.routine)(args)
    }

    /// Single-argument view, mirrors a `Fn(f64) -> f64`.
    ///
    /// # Panics
    /// If the routine needs more than one argument.
    pub fn as_fn1(&self) -> impl Fn(f64) -> f64 + '_ {
        assert!(
            self.arity <= 1,
            "as_fn1 used on a function of {} arguments",
            self.arity
        );
        move |x| (self.routine)(&[x])
    }

    pub fn as_fn2(&self) -> impl Fn(f64, f64) -> f64 + '_ {
        assert!(
            self.arity <= 2,
            "as_fn2 used on a function of {} arguments",
            self.arity
        );
        move |x, y| (self.routine)(&[x, y])
    }

    pub fn as_fn3(&self) -> impl Fn(f64, f64, f64) -> f64 + '_ {
        assert!(
            self.arity <= 3,
            "as_fn3 used on a function of {} arguments",
            self.arity
        );
        move |x, y, z| (self.routine)(&[x, y, z])
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NativeFn")
            .field("arity", &self.arity)
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

//___________________________________CLOSURE BACKEND____________________________________

fn lower(term: &Term) -> Routine {
    match term {
        Term::Const(val) => {
            let val = *val;
            Box::new(move |_| val)
        }
        Term::Var(index) => {
            let index = index.as_usize();
            Box::new(move |args| args[index])
        }
        Term::Binary(node) => {
            let lf = lower(node.left());
            let rf = lower(node.right());
            match node.op() {
                BinOp::Add => Box::new(move |args| lf(args) + rf(args)),
                BinOp::Sub => Box::new(move |args| lf(args) - rf(args)),
                BinOp::Mul => Box::new(move |args| lf(args) * rf(args)),
                BinOp::Div => Box::new(move |args| lf(args) / rf(args)),
                BinOp::Pow => Box::new(move |args| lf(args).powf(rf(args))),
            }
        }
    }
}

//___________________________________PROGRAM BACKEND____________________________________

/// Stack machine instruction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Instr {
    Push(f64),
    Load(u8),
    Apply(BinOp),
}

/// Post-order instruction list of a term.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    code: Vec<Instr>,
    max_depth: usize,
}

impl Program {
    pub fn emit(term: &Term) -> Program {
        let mut code = Vec::with_capacity(term.node_count() as usize);
        let mut max_depth = 0;
        emit_into(term, &mut code, 0, &mut max_depth);
        Program { code, max_depth }
    }

    pub fn instructions(&self) -> &[Instr] {
        &self.code
    }

    /// Deepest value stack the program needs.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn eval(&self, args: &[f64]) -> f64 {
        let mut stack: Vec<f64> = Vec::with_capacity(self.max_depth);
        for instr in &self.code {
            match *instr {
                Instr::Push(val) => stack.push(val),
                Instr::Load(index) => stack.push(args[index as usize]),
                Instr::Apply(op) => {
                    let top = stack.len() - 1;
                    let rhs = stack[top];
                    stack.truncate(top);
                    stack[top - 1] = op.apply(stack[top - 1], rhs);
                }
            }
        }
        stack[0]
    }
}

fn emit_into(term: &Term, code: &mut Vec<Instr>, depth: usize, max_depth: &mut usize) {
    match term {
        Term::Const(val) => {
            code.push(Instr::Push(*val));
            *max_depth = (*max_depth).max(depth + 1);
        }
        Term::Var(index) => {
            code.push(Instr::Load(index.get()));
            *max_depth = (*max_depth).max(depth + 1);
        }
        Term::Binary(node) => {
            emit_into(node.left(), code, depth, max_depth);
            emit_into(node.right(), code, depth + 1, max_depth);
            code.push(Instr::Apply(node.op()));
        }
    }
}

//___________________________________ENTRY POINTS____________________________________

/// Compiles `term` into a routine of `arity` parameters with the default backend.
pub fn compile(term: &Term, arity: usize) -> NativeFn {
    compile_with(term, arity, Backend::default())
}

/// Compiles `term` with the chosen backend. A declared arity below the term's own arity
/// (one past its highest variable index) is raised to it.
pub fn compile_with(term: &Term, arity: usize, backend: Backend) -> NativeFn {
    let required = term.arity();
    let arity = if arity < required {
        warn!(
            "declared arity {} is below the {} parameter(s) the term references, using {}",
            arity, required, required
        );
        required
    } else {
        arity
    };
    let routine: Routine = match backend {
        Backend::Closure => lower(term),
        Backend::Program => {
            let program = Program::emit(term);
            Box::new(move |args| program.eval(args))
        }
    };
    info!(
        "compiled {} node(s) into a {}-ary routine with the {} backend",
        term.node_count(),
        arity,
        backend
    );
    NativeFn {
        arity,
        backend,
        routine,
    }
}
