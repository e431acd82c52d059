//___________________________________PROPERTY TESTS____________________________________
// random trees checked against the term, rewrite and lambdify invariants

#[cfg(test)]
mod tests {
    use crate::symbolic::identity::{Identity, identity};
    use crate::symbolic::lambdify::{Backend, Program, compile_with};
    use crate::symbolic::rewrite::{Rewriter, UNBOUNDED, rewrite};
    use crate::symbolic::term::{BinOp, Term, display};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use strum::IntoEnumIterator;

    const CASES: usize = 200;

    fn random_op(rng: &mut StdRng) -> BinOp {
        let ops: Vec<BinOp> = BinOp::iter().collect();
        ops[rng.random_range(0..ops.len())]
    }

    /// Random term over `vars` variables. Folded constants that are not finite are replaced
    /// by 1 so that structural equality stays reflexive.
    fn random_term(rng: &mut StdRng, depth: usize, vars: u8) -> Term {
        if depth == 0 || rng.random_bool(0.3) {
            return if vars > 0 && rng.random_bool(0.6) {
                Term::var(rng.random_range(0..vars))
            } else {
                Term::constant(rng.random_range(1..=4) as f64)
            };
        }
        let left = random_term(rng, depth - 1, vars);
        let right = random_term(rng, depth - 1, vars);
        match Term::binary(random_op(rng), left, right) {
            Term::Const(v) if !v.is_finite() => Term::constant(1.0),
            term => term,
        }
    }

    /// Mask recomputed by walking the tree.
    fn walk_mask(term: &Term) -> u32 {
        match term {
            Term::Const(_) => 0,
            Term::Var(index) => 1 << index.get(),
            Term::Binary(node) => walk_mask(node.left()) | walk_mask(node.right()),
        }
    }

    fn walk_count(term: &Term) -> u32 {
        match term {
            Term::Const(_) | Term::Var(_) => 1,
            Term::Binary(node) => 1 + walk_count(node.left()) + walk_count(node.right()),
        }
    }

    fn has_constant_pair(term: &Term) -> bool {
        match term {
            Term::Const(_) | Term::Var(_) => false,
            Term::Binary(node) => {
                (node.left().is_const() && node.right().is_const())
                    || has_constant_pair(node.left())
                    || has_constant_pair(node.right())
            }
        }
    }

    fn same_value(a: f64, b: f64) -> bool {
        a == b || (a.is_nan() && b.is_nan())
    }

    /// Structural equality where a NaN constant matches another NaN; rewriting can fold
    /// `(x - x) / (x - x)` into one.
    fn same_term(a: &Term, b: &Term) -> bool {
        match (a, b) {
            (Term::Const(x), Term::Const(y)) => same_value(*x, *y),
            (Term::Var(i), Term::Var(j)) => i == j,
            (Term::Binary(l), Term::Binary(r)) => {
                l.op() == r.op()
                    && same_term(l.left(), r.left())
                    && same_term(l.right(), r.right())
            }
            _ => false,
        }
    }

    fn simplifying_identities() -> Vec<Identity> {
        let x = Term::var(0);
        vec![
            identity(&x * 1.0, x.clone()).unwrap(),
            identity(1.0 * &x, x.clone()).unwrap(),
            identity(&x + 0.0, x.clone()).unwrap(),
            identity(0.0 + &x, x.clone()).unwrap(),
            identity(&x - &x, Term::constant(0.0)).unwrap(),
            identity(x.pow(1.0), x.clone()).unwrap(),
        ]
    }

    #[test]
    fn prop_var_mask_is_union_of_descendants() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..CASES {
            let t = random_term(&mut rng, 6, 5);
            assert_eq!(t.var_mask(), walk_mask(&t), "{}", t);
            assert_eq!(t.node_count(), walk_count(&t), "{}", t);
            assert_eq!(t.arity(), (32 - walk_mask(&t).leading_zeros()) as usize);
        }
    }

    #[test]
    fn prop_combinators_never_leave_two_constants() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..CASES {
            let t = random_term(&mut rng, 6, 3);
            assert!(!has_constant_pair(&t), "{}", t);
        }
    }

    #[test]
    fn prop_structural_equality_is_reflexive_and_clone_stable() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..CASES {
            let t = random_term(&mut rng, 6, 4);
            assert_eq!(t, t.clone());
            assert_eq!(t, rebuild(&t));
        }
    }

    /// deep copy that shares no node with the input
    fn rebuild(term: &Term) -> Term {
        match term {
            Term::Const(v) => Term::constant(*v),
            Term::Var(index) => Term::var(index.get()),
            Term::Binary(node) => {
                Term::binary(node.op(), rebuild(node.left()), rebuild(node.right()))
            }
        }
    }

    #[test]
    fn prop_rewrite_without_identities_is_identity() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..CASES {
            let t = random_term(&mut rng, 6, 4);
            let rounds = rng.random_range(0..10);
            assert_eq!(rewrite(&t, &[], rounds), t);
            assert_eq!(rewrite(&t, &[], UNBOUNDED), t);
        }
    }

    #[test]
    fn prop_rewriting_converges_and_stops_early() {
        let identities = simplifying_identities();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..CASES {
            let t = random_term(&mut rng, 6, 3);
            let (r, stats) = Rewriter::new().run(&t, &identities);
            assert!(stats.converged, "{}", t);
            assert!(stats.rounds <= t.node_count() as usize + 1);
            let n = stats.rounds;
            assert!(same_term(&rewrite(&t, &identities, n), &r), "{}", t);
            assert!(same_term(&rewrite(&t, &identities, n + 1), &r), "{}", t);
        }
    }

    /// Random term whose leaves are sometimes `NaN`; nothing is scrubbed.
    fn random_term_with_nan(rng: &mut StdRng, depth: usize) -> Term {
        if depth == 0 || rng.random_bool(0.3) {
            return match rng.random_range(0..3) {
                0 => Term::var(rng.random_range(0..3)),
                1 => Term::constant(f64::NAN),
                _ => Term::constant(rng.random_range(0..=2) as f64),
            };
        }
        let left = random_term_with_nan(rng, depth - 1);
        let right = random_term_with_nan(rng, depth - 1);
        Term::binary(random_op(rng), left, right)
    }

    #[test]
    fn prop_rewriting_converges_with_nan_constants() {
        let x = Term::var(0);
        let y = Term::var(1);
        let mut identities = simplifying_identities();
        identities.push(identity(&x * &y, &x * &y).unwrap());
        let mut rng = StdRng::seed_from_u64(10);
        for _ in 0..CASES {
            let t = random_term_with_nan(&mut rng, 6);
            let (r, stats) = Rewriter::with_max_rounds(10_000).run(&t, &identities);
            assert!(stats.converged, "{}", t);
            assert!(stats.rounds <= t.node_count() as usize + 1, "{}", t);
            assert!(same_term(&rewrite(&t, &identities, stats.rounds + 1), &r), "{}", t);
        }
    }

    #[test]
    fn prop_backends_agree_with_reference_eval() {
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..CASES {
            let t = random_term(&mut rng, 6, 3);
            let args: Vec<f64> = (0..3).map(|_| rng.random_range(-4.0..4.0)).collect();
            let expected = t.eval(&args);
            for backend in Backend::iter() {
                let f = compile_with(&t, 3, backend);
                let got = f.call(&args);
                assert!(
                    same_value(got, expected),
                    "{} via {}: {} vs {}",
                    t,
                    backend,
                    got,
                    expected
                );
            }
            assert!(same_value(Program::emit(&t).eval(&args), expected));
        }
    }

    #[test]
    fn prop_program_length_is_node_count() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..CASES {
            let t = random_term(&mut rng, 6, 3);
            let program = Program::emit(&t);
            assert_eq!(program.instructions().len(), t.node_count() as usize);
            assert!(program.max_depth() >= 1);
        }
    }

    #[test]
    fn prop_display_is_fully_parenthesised() {
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..CASES {
            let t = random_term(&mut rng, 5, 2);
            let s = display(&t, &["x", "y"]);
            let open = s.matches('(').count();
            let close = s.matches(')').count();
            assert_eq!(open, close, "{}", s);
            let binaries = t.node_count() as usize - count_leaves(&t);
            let pows = count_pow(&t);
            assert_eq!(open, binaries + pows, "{}", s);
        }
    }

    fn count_leaves(term: &Term) -> usize {
        match term {
            Term::Const(_) | Term::Var(_) => 1,
            Term::Binary(node) => count_leaves(node.left()) + count_leaves(node.right()),
        }
    }

    fn count_pow(term: &Term) -> usize {
        match term {
            Term::Const(_) | Term::Var(_) => 0,
            Term::Binary(node) => {
                usize::from(node.op() == BinOp::Pow)
                    + count_pow(node.left())
                    + count_pow(node.right())
            }
        }
    }

    #[test]
    fn prop_concurrent_rewrites_are_independent() {
        let identities = simplifying_identities();
        let mut rng = StdRng::seed_from_u64(9);
        let terms: Vec<Term> = (0..16).map(|_| random_term(&mut rng, 6, 3)).collect();
        let sequential: Vec<Term> = terms
            .iter()
            .map(|t| rewrite(t, &identities, UNBOUNDED))
            .collect();
        let parallel: Vec<Term> = std::thread::scope(|scope| {
            let handles: Vec<_> = terms
                .iter()
                .map(|t| {
                    let identities = &identities;
                    scope.spawn(move || rewrite(t, identities, UNBOUNDED))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(sequential.len(), parallel.len());
        for (s, p) in sequential.iter().zip(&parallel) {
            assert!(same_term(s, p), "{} vs {}", s, p);
        }
    }
}
