use openapi_examples::correlate::{build_schema_example_map, derive_schema_location};
use openapi_examples::path::{LocationPath, PathSegment};
use proptest::prelude::*;

/// Strategy for path segments that never spell `examples`.
fn arb_segment() -> impl Strategy<Value = PathSegment> {
    prop_oneof![
        "[a-z/~{}]{1,8}"
            .prop_filter("not the marker", |s| s != "examples")
            .prop_map(PathSegment::Name),
        (0usize..20).prop_map(PathSegment::Index),
    ]
}

fn arb_example_location() -> impl Strategy<Value = (Vec<PathSegment>, LocationPath)> {
    (
        prop::collection::vec(arb_segment(), 0..6),
        prop::collection::vec(arb_segment(), 0..3),
    )
        .prop_map(|(prefix, suffix)| {
            let mut segments = prefix.clone();
            segments.push(PathSegment::Name("examples".to_string()));
            segments.extend(suffix);
            (prefix, LocationPath::new(segments))
        })
}

proptest! {
    #[test]
    fn derived_location_is_prefix_plus_schema((prefix, example) in arb_example_location()) {
        let derived = derive_schema_location(&example);
        let mut expected = prefix;
        expected.push(PathSegment::Name("schema".to_string()));
        prop_assert_eq!(derived.segments(), expected.as_slice());
    }

    #[test]
    fn pointer_form_parses_back_to_the_same_names((_, example) in arb_example_location()) {
        let reparsed = LocationPath::parse_pointer(&example.to_pointer()).unwrap();
        prop_assert_eq!(reparsed.segments().len(), example.segments().len());
        for (a, b) in reparsed.segments().iter().zip(example.segments()) {
            let expected = match b {
                PathSegment::Name(n) => n.clone(),
                PathSegment::Index(i) => i.to_string(),
            };
            prop_assert_eq!(a, &PathSegment::Name(expected));
        }
    }

    #[test]
    fn map_holds_one_entry_per_derived_location(
        locations in prop::collection::vec(arb_example_location().prop_map(|(_, l)| l), 0..12)
    ) {
        let map = build_schema_example_map(&locations);
        for (schema, example) in &map {
            prop_assert_eq!(&derive_schema_location(example), schema);
            // the mapped example is the last one deriving this schema location
            let last = locations
                .iter()
                .rev()
                .find(|l| &derive_schema_location(l) == schema)
                .unwrap();
            prop_assert_eq!(example, last);
        }
    }
}
