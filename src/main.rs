#![allow(non_snake_case)]
use RustedAlgebra::Utils::config::RewriteConfig;
use RustedAlgebra::Utils::logger::init_logger;
use RustedAlgebra::symbolic::function::Function;
use RustedAlgebra::symbolic::identity::{Identity, IdentityError};
use RustedAlgebra::symbolic::rewrite::{Rewriter, UNBOUNDED};
use RustedAlgebra::{function, identity};
use log::{error, info};
use std::env;
use std::process::ExitCode;

/// usage: RustedAlgebra [config.toml]
fn main() -> ExitCode {
    let config = match env::args().nth(1) {
        Some(path) => match RewriteConfig::from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{}: {}", path, err);
                return ExitCode::FAILURE;
            }
        },
        None => RewriteConfig::default(),
    };
    if let Err(err) = init_logger(&config.log) {
        eprintln!("cannot open the log file: {}", err);
        return ExitCode::FAILURE;
    }
    info!("configuration: {:?}", config);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &RewriteConfig) -> Result<(), IdentityError> {
    let example = 0;
    match example {
        0 => {
            for (name, rounds, f, identities) in scenarios()? {
                // commuting identities never converge, those scenarios carry their own limit
                let mut rewriter = Rewriter::with_max_rounds(rounds.min(config.max_rounds));
                let (g, stats) = f.rewrite_with(&mut rewriter, &identities);
                let native = g.compile_with(config.backend);
                let args: Vec<f64> = (1..=native.arity()).map(|i| i as f64).collect();
                println!(
                    "{:<12} {}  =>  {}   [{} round(s), {} application(s){}]  f{:?} = {}",
                    name,
                    f,
                    g,
                    stats.rounds,
                    stats.applications,
                    if stats.converged { ", converged" } else { "" },
                    args,
                    native.call(&args)
                );
            }
        }
        1 => {
            let associative = identity!(|x| x + 1.0 => 1.0 + x)?;
            let mul_eq_add = identity!(|x| 2.0 * x => x + x)?;
            println!("{}\n{}", associative, mul_eq_add);
        }
        _ => {
            println!("example not found");
        }
    }
    Ok(())
}

type Scenario = (&'static str, usize, Function, Vec<Identity>);

fn scenarios() -> Result<Vec<Scenario>, IdentityError> {
    Ok(vec![
        ("plus1", UNBOUNDED, function!(|x| x + 1.0), vec![]),
        ("plusX", UNBOUNDED, function!(|x, y| x + y), vec![]),
        ("mulX", UNBOUNDED, function!(|x, y| x * y), vec![]),
        ("powX", UNBOUNDED, function!(|x, y| x.pow(y)), vec![]),
        (
            "associative",
            1,
            function!(|x| 1.0 + x),
            vec![identity!(|x, y| x + y => y + x)?],
        ),
        (
            "distributive",
            1,
            function!(|x| 3.0 * (x + 1.0)),
            vec![identity!(|x, y, z| z * (x + y) => z * y + z * x)?],
        ),
        (
            "factor",
            1,
            function!(|x, y| 3.0 * x + 3.0 * y),
            vec![identity!(|x, y, z| z * y + z * x => z * (x + y))?],
        ),
        (
            "negate",
            2,
            function!(|x, y| -(3.0 + x + y)),
            vec![identity!(|x, y| -(x + y) => -x - y)?],
        ),
        (
            "square",
            2,
            function!(|x| (x + 1.0) * (x + 1.0)),
            vec![identity!(|x| x * x => x.pow(2.0))?],
        ),
        (
            "readme",
            1,
            function!(|x| 2.0 * x + 1.0),
            vec![
                identity!(|x| x + 1.0 => 1.0 + x)?,
                identity!(|x| 2.0 * x => x + x)?,
            ],
        ),
        (
            "unit",
            UNBOUNDED,
            function!(|x| (x * 1.0 + 0.0) * 1.0),
            vec![
                identity!(|x| x * 1.0 => x)?,
                identity!(|x| x + 0.0 => x)?,
            ],
        ),
    ])
}
