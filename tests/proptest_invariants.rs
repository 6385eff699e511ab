
use proptest::prelude::*;
use strategies::{arb_chain, GenChain};

// ---------------------------------------------------------------------------
// Invariant 1: Declaration order does not matter
//
// However the chain is declared, it resolves and parses the same input to
// the same value.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn any_declaration_order_resolves(chain in arb_chain(), digit in 0_u8..10) {
        let grammar = chain.build();
        let input = chain.input(digit);
        let parsed = grammar.parse("r0", &input, &()).unwrap().unwrap();

        let depth = chain.len - 1;
        let expected = format!("{}{digit}{}", "(".repeat(depth), ")".repeat(depth));
        prop_assert_eq!(parsed.value, expected);
        prop_assert_eq!(parsed.rest, "");
    }

    #[test]
    fn parsing_is_deterministic(chain in arb_chain(), digit in 0_u8..10) {
        let grammar = chain.build();
        let input = chain.input(digit);
        let first = grammar.try_parse("r0", &input, &()).unwrap();
        for _ in 0..3 {
            prop_assert_eq!(&first, &grammar.try_parse("r0", &input, &()).unwrap());
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Resolution order is topological
//
// Every rule becomes resolved only after the rule it references.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn resolution_order_is_topological(chain in arb_chain()) {
        let grammar = chain.build();
        let order = grammar.resolution_order();
        prop_assert_eq!(order.len(), chain.len);

        let position = |name: &str| order.iter().position(|n| *n == name).unwrap();
        for i in 0..chain.len.saturating_sub(1) {
            let dependent = GenChain::name(i);
            let dependency = GenChain::name(i + 1);
            prop_assert!(
                position(&dependency) < position(&dependent),
                "{} resolved before {}", dependent, dependency
            );
        }
    }

    #[test]
    fn every_rule_reports_its_reference(chain in arb_chain()) {
        let grammar = chain.build();
        for i in 0..chain.len {
            let deps = grammar.dependencies_of(&GenChain::name(i)).unwrap();
            if i + 1 == chain.len {
                prop_assert!(deps.is_empty());
            } else {
                let next = GenChain::name(i + 1);
                prop_assert_eq!(deps, vec![next.as_str()]);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Structural mismatch is never an error
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn wrong_shape_is_no_match(chain in arb_chain(), junk in "[a-z<>]{0,8}") {
        let grammar = chain.build();
        let outcome = grammar.try_parse("r0", &junk, &()).unwrap();
        prop_assert!(outcome.is_no_match());
    }
}
