//! Pairing of example locations with the schema locations that govern them.

use indexmap::IndexMap;

use crate::path::{LocationPath, PathSegment};

/// Segment under which examples are declared.
pub const EXAMPLES_SEGMENT: &str = "examples";

/// Segment naming the schema next to the examples.
pub const SCHEMA_SEGMENT: &str = "schema";

/// Replaces the last `examples` segment, and everything after it, with
/// `schema`.
///
/// # Panics
///
/// Panics if `example_location` has no `examples` segment. Locations produced
/// by the examples locators always have one.
pub fn derive_schema_location(example_location: &LocationPath) -> LocationPath {
    let idx = example_location
        .rposition(EXAMPLES_SEGMENT)
        .unwrap_or_else(|| panic!("example location {example_location} has no 'examples' segment"));
    example_location.truncate_and_push(idx, PathSegment::Name(SCHEMA_SEGMENT.to_string()))
}

/// Maps each derived schema location to its example location.
///
/// When several examples derive the same schema location the last one in
/// traversal order wins; its entry keeps the position of the first.
pub fn build_schema_example_map(
    example_locations: &[LocationPath],
) -> IndexMap<LocationPath, LocationPath> {
    let mut map = IndexMap::new();
    for example_location in example_locations {
        map.insert(
            derive_schema_location(example_location),
            example_location.clone(),
        );
    }
    map
}
