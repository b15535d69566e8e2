//! Integration tests: incremental code updates and field arithmetic.

use fusion_erasure::{CodeConfig, Fusion, Symbol, build_matrix, encode, update_single};
use fusion_integration_tests::{random_symbols, test_symbols_seeded};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_update_single_matches_full_reencode() {
    for (m, k, w) in [(3, 2, 8), (4, 4, 16), (6, 2, 32), (2, 1, 4)] {
        let matrix = build_matrix(m, k, w).unwrap();
        let mut rng = StdRng::seed_from_u64((m * 100 + k * 10) as u64 + u64::from(w));
        let mut data = random_symbols(&mut rng, m);
        let mut code = encode(&matrix, &data).unwrap();

        for _ in 0..50 {
            let position = rng.random_range(0..m);
            let new = Symbol(rng.random());
            for (code_index, c) in code.iter_mut().enumerate() {
                *c = update_single(&matrix, position, data[position], new, code_index, *c)
                    .unwrap();
            }
            data[position] = new;
            assert_eq!(code, encode(&matrix, &data).unwrap(), "m={m} k={k} w={w}");
        }
    }
}

#[test]
fn test_updates_commute() {
    let fusion = Fusion::new(CodeConfig::new(4, 3, 16)).unwrap();
    let data = test_symbols_seeded(4, 11);
    let replacement = test_symbols_seeded(4, 12);
    let code = fusion.encode(&data).unwrap();

    let apply = |order: &[usize]| -> Vec<Symbol> {
        let mut code = code.clone();
        for &position in order {
            for (code_index, c) in code.iter_mut().enumerate() {
                *c = fusion
                    .updated_code(*c, code_index, data[position], replacement[position], position)
                    .unwrap();
            }
        }
        code
    };

    let forward = apply(&[0, 1, 2, 3]);
    let backward = apply(&[3, 2, 1, 0]);
    assert_eq!(forward, backward);
    assert_eq!(forward, fusion.encode(&replacement).unwrap());
}

#[test]
fn test_update_with_no_change_is_noop() {
    let matrix = build_matrix(3, 3, 16).unwrap();
    let code = Symbol(41169);
    assert_eq!(
        update_single(&matrix, 1, Symbol(222), Symbol(222), 1, code).unwrap(),
        code
    );
}

#[test]
fn test_field_closure_and_inverses() {
    let mut rng = StdRng::seed_from_u64(42);
    for w in [1u32, 2, 4, 8, 13, 16, 20, 31, 32] {
        let mask = if w == 32 { u32::MAX } else { (1u32 << w) - 1 };
        for _ in 0..200 {
            let a = rng.random::<u32>() & mask;
            let b = rng.random::<u32>() & mask;

            let product = fusion_field::multiply(a, b, w).unwrap();
            assert!(u64::from(product) < 1u64 << w);
            assert_eq!(fusion_field::add(a, b), a ^ b);

            if b != 0 {
                let quotient = fusion_field::divide(product, b, w).unwrap();
                assert_eq!(quotient, a, "w={w} a={a} b={b}");
            } else {
                assert!(fusion_field::divide(a, b, w).is_err());
            }
        }
    }
}
