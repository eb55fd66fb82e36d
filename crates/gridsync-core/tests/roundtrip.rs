//! Codec laws: round trip, empty query, null marker.

use gridsync_core::{NULL_MARKER, decode, encode};
use gridsync_model::{
    ColumnId, ColumnPredicate, ColumnSet, FilterCondition, NumberFilter, NumberOperator,
    PredicateSet, QueryString, SortDirective, TextFilter, TextOperator,
};
use proptest::prelude::*;
use serde_json::json;

fn arb_sort() -> impl Strategy<Value = Option<SortDirective>> {
    prop_oneof![
        Just(None),
        Just(Some(SortDirective::Ascending)),
        Just(Some(SortDirective::Descending)),
    ]
}

fn arb_text() -> impl Strategy<Value = FilterCondition> {
    (
        prop::sample::select(TextOperator::ALL.to_vec()),
        prop::option::of("[ -~]{0,12}|[äöüéñ€]{1,4}"),
    )
        .prop_map(|(kind, filter)| FilterCondition::Text(TextFilter { kind, filter }))
}

fn arb_number() -> impl Strategy<Value = FilterCondition> {
    (
        prop::sample::select(NumberOperator::ALL.to_vec()),
        prop::option::of(-1_000_000_000i64..1_000_000_000),
        prop::option::of(-1_000_000i64..1_000_000),
    )
        .prop_map(|(kind, filter, filter_to)| {
            // Whole numbers and halves are exact in both f64 and JSON text.
            let filter = NumberFilter::try_new(
                kind,
                filter.map(|n| n as f64 / 2.0),
                filter_to.map(|n| n as f64),
            );
            FilterCondition::Number(filter.expect("generated bounds are finite"))
        })
}

fn arb_opaque() -> impl Strategy<Value = FilterCondition> {
    prop_oneof![
        "[a-zA-Z &%+=?]{0,10}".prop_map(|s| json!(s)),
        any::<i32>().prop_map(|n| json!(n)),
        any::<bool>().prop_map(|b| json!(b)),
        "[a-z]{1,6}".prop_map(|s| json!({
            "filterType": "text",
            "operator": "OR",
            "conditions": [{"filterType": "text", "type": "contains", "filter": s}]
        })),
        "[a-z]{1,6}".prop_map(|s| json!({"filterType": "set", "values": [s]})),
    ]
    .prop_map(|value| {
        FilterCondition::from_value(value)
            .expect("generated values carry no reserved keys")
            .expect("generated values are never null")
    })
}

fn arb_predicate() -> impl Strategy<Value = ColumnPredicate> {
    (
        prop::option::of(prop_oneof![arb_text(), arb_number(), arb_opaque()]),
        arb_sort(),
    )
        .prop_map(|(filter, sort)| ColumnPredicate { filter, sort })
}

fn arb_predicate_set() -> impl Strategy<Value = PredicateSet> {
    prop::collection::vec(
        (prop::sample::select(vec!["make", "model", "price"]), arb_predicate()),
        0..4,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|(column, predicate)| (ColumnId::new(column).unwrap(), predicate))
            .collect()
    })
}

proptest! {
    #[test]
    fn decode_inverts_encode(set in arb_predicate_set()) {
        let columns = ColumnSet::default();
        let query = encode(&columns, &set);
        prop_assert_eq!(query.len(), columns.len());
        let decoded = decode(&columns, &query).unwrap();
        prop_assert_eq!(decoded, Some(set));
    }

    #[test]
    fn round_trip_survives_the_address_bar(set in arb_predicate_set()) {
        let columns = ColumnSet::default();
        let address = encode(&columns, &set).to_query();
        let decoded = decode(&columns, &QueryString::parse(&address)).unwrap();
        prop_assert_eq!(decoded, Some(set));
    }
}

#[test]
fn empty_query_decodes_to_nothing() {
    assert_eq!(decode(&ColumnSet::default(), &QueryString::new()).unwrap(), None);
}

#[test]
fn absent_column_encodes_as_null_marker() {
    let mut set = PredicateSet::new();
    set.insert(
        ColumnId::new("make").unwrap(),
        ColumnPredicate::sorted(SortDirective::Ascending),
    );
    let query = encode(&ColumnSet::default(), &set);
    assert_eq!(query.get("price"), Some(NULL_MARKER));
    assert_eq!(query.len(), 3);
}

#[test]
fn address_bar_snapshot() {
    let mut set = PredicateSet::new();
    set.insert(
        ColumnId::new("make").unwrap(),
        ColumnPredicate::sorted(SortDirective::Descending),
    );
    let query = encode(&ColumnSet::default(), &set);
    insta::assert_snapshot!(query.get("make").unwrap(), @"%7B%22sort%22%3A%22desc%22%7D");
    insta::assert_snapshot!(query.to_query(), @"make=%257B%2522sort%2522%253A%2522desc%2522%257D&model=null&price=null");
}
