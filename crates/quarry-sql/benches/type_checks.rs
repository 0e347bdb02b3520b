//! Type layer benchmarks using divan
//!
//! Benchmarks for type interning, rule lookups, least-restrictive resolution
//! and operand checking.

use quarry_sql::types::{can_cast, type_name::NUMERIC_TYPES};
use quarry_sql::{OperandList, SqlType, TypeFactory, TypeName, strategies};

fn main() {
    divan::main();
}

fn scalar(factory: &TypeFactory, name: TypeName) -> SqlType {
    factory
        .create_sql_type(name, None, None)
        .expect("scalar type")
}

// === Factory Benchmarks ===

mod factory {
    use super::*;

    #[divan::bench]
    fn intern_existing(bencher: divan::Bencher) {
        let factory = TypeFactory::new();
        bencher.bench_local(|| {
            factory.create_sql_type(divan::black_box(TypeName::Varchar), Some(20), None)
        });
    }

    #[divan::bench]
    fn intern_fresh_precisions(bencher: divan::Bencher) {
        bencher.bench_local(|| {
            let factory = TypeFactory::new();
            for p in 1..=64 {
                let _ = factory.create_sql_type(TypeName::Varchar, Some(p), None);
            }
            factory.interned_count()
        });
    }
}

// === Rule Benchmarks ===

mod rules {
    use super::*;

    #[divan::bench]
    fn cast_numeric_grid(bencher: divan::Bencher) {
        let factory = TypeFactory::new();
        let types: Vec<SqlType> = NUMERIC_TYPES.iter().map(|n| scalar(&factory, *n)).collect();
        bencher.bench_local(|| {
            let mut allowed = 0;
            for to in &types {
                for from in &types {
                    if can_cast(to, from, divan::black_box(true)).unwrap_or(false) {
                        allowed += 1;
                    }
                }
            }
            allowed
        });
    }

    #[divan::bench]
    fn least_restrictive_numeric(bencher: divan::Bencher) {
        let factory = TypeFactory::new();
        let types: Vec<SqlType> = NUMERIC_TYPES.iter().map(|n| scalar(&factory, *n)).collect();
        bencher.bench_local(|| factory.least_restrictive(divan::black_box(&types)));
    }
}

// === Checker Benchmarks ===

mod checkers {
    use super::*;

    #[divan::bench]
    fn plus_numeric(bencher: divan::Bencher) {
        let factory = TypeFactory::new();
        let call = OperandList::new(&factory, "+", [
            scalar(&factory, TypeName::Integer),
            scalar(&factory, TypeName::Double),
        ]);
        let checker = strategies::plus();
        bencher.bench_local(|| checker.check_operand_types(divan::black_box(&call), false));
    }

    #[divan::bench]
    fn plus_mismatch_with_error(bencher: divan::Bencher) {
        let factory = TypeFactory::new();
        let call = OperandList::new(&factory, "+", [
            scalar(&factory, TypeName::Boolean),
            scalar(&factory, TypeName::Date),
        ]);
        let checker = strategies::plus();
        bencher.bench_local(|| checker.check_operand_types(divan::black_box(&call), true));
    }

    #[divan::bench]
    fn infer_concat(bencher: divan::Bencher) {
        let factory = TypeFactory::new();
        let call = OperandList::new(&factory, "||", [
            factory.create_sql_type(TypeName::Char, Some(8), None).expect("char"),
            factory.create_sql_type(TypeName::Varchar, Some(32), None).expect("varchar"),
        ]);
        let rule = strategies::nullable_varying_dyadic_string_sum_precision();
        bencher.bench_local(|| rule.infer_return_type(divan::black_box(&call)));
    }
}
