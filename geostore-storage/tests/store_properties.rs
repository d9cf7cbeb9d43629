//! Property-based tests for the entity store.
//!
//! The store is driven with random create/update/delete sequences next to a
//! simple model. After every run:
//! - the entity map and the spatial index agree
//! - `list` returns the model's live ids in ascending order
//! - ids are never reused

use geostore_geometry::{Geometry, Point, Polygon};
use geostore_model::{Attributes, EntityPatch};
use geostore_storage::SpatialStore;
use geostore_types::EntityId;
use proptest::prelude::*;
use std::collections::BTreeSet;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Create(Geometry),
    Move(usize, Geometry),
    Delete(usize),
}

fn point_strategy() -> impl Strategy<Value = Geometry> {
    (-180.0f64..=180.0, -90.0f64..=90.0).prop_map(|(lon, lat)| Point::new(lon, lat).unwrap().into())
}

fn square_strategy() -> impl Strategy<Value = Geometry> {
    (-170.0f64..170.0, -80.0f64..80.0, 0.01f64..5.0).prop_map(|(lon, lat, side)| {
        Polygon::from_coords(&[
            [lon, lat],
            [lon + side, lat],
            [lon + side, lat + side],
            [lon, lat + side],
            [lon, lat],
        ])
        .unwrap()
        .into()
    })
}

fn geometry_strategy() -> impl Strategy<Value = Geometry> {
    prop_oneof![point_strategy(), square_strategy()]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => geometry_strategy().prop_map(Op::Create),
        1 => (any::<usize>(), geometry_strategy()).prop_map(|(i, g)| Op::Move(i, g)),
        1 => any::<usize>().prop_map(Op::Delete),
    ]
}

fn pick(live: &BTreeSet<EntityId>, i: usize) -> Option<EntityId> {
    if live.is_empty() {
        None
    } else {
        live.iter().nth(i % live.len()).copied()
    }
}

// =============================================================================
// STORE PROPERTY TESTS
// =============================================================================

mod store_properties {
    use super::*;

    proptest! {
        #[test]
        fn random_ops_keep_map_and_index_in_step(
            ops in prop::collection::vec(op_strategy(), 1..120),
        ) {
            let store = SpatialStore::new();
            let mut live = BTreeSet::new();
            let mut issued = BTreeSet::new();

            for op in ops {
                match op {
                    Op::Create(geometry) => {
                        let id = store.create(geometry, Attributes::new()).unwrap();
                        prop_assert!(issued.insert(id), "id {} reused", id);
                        live.insert(id);
                    }
                    Op::Move(i, geometry) => {
                        if let Some(id) = pick(&live, i) {
                            let updated = store
                                .update(id, EntityPatch { geometry: Some(geometry.clone()), attributes: None })
                                .unwrap();
                            prop_assert_eq!(updated.geometry, geometry);
                        }
                    }
                    Op::Delete(i) => {
                        if let Some(id) = pick(&live, i) {
                            store.delete(id).unwrap();
                            live.remove(&id);
                        }
                    }
                }
            }

            prop_assert!(!store.verify_consistency().unwrap(), "store needed a rebuild");
            let listed: Vec<_> = store.list(None).into_iter().map(|e| e.id).collect();
            prop_assert_eq!(listed, live.iter().copied().collect::<Vec<_>>());
        }
    }
}
