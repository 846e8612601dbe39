//! Item registry and storage hierarchy: uniqueness, assignment
//! preconditions, the set-null delete policy, and the repair pass.

mod common;

use assert_matches::assert_matches;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};

use quartermaster_api::entities::item;
use quartermaster_api::errors::ServiceError;
use quartermaster_api::services::inventory::{ItemFilter, NewItem, UpdateItem};
use quartermaster_api::services::locations::{NewContainer, NewShelf, NewUnit};
use quartermaster_api::services::reservations::NewReservation;

fn new_item(name: &str, unit_id: Option<i32>) -> NewItem {
    NewItem {
        name: name.to_string(),
        description: format!("{name} for chapter use"),
        unit_id,
        quantity: 1,
    }
}

fn new_unit(name: &str) -> NewUnit {
    NewUnit {
        name: name.to_string(),
        location: "basement".to_string(),
    }
}

#[tokio::test]
async fn duplicate_item_names_are_rejected() {
    let h = common::harness().await;
    h.inventory
        .create_item(new_item("Drill", None))
        .await
        .expect("first create");
    let result = h.inventory.create_item(new_item("Drill", None)).await;
    assert_matches!(result, Err(ServiceError::Duplicate(_)));

    // Renaming another item onto a taken name is the same violation.
    h.inventory
        .create_item(new_item("Tent", None))
        .await
        .expect("second create");
    let tent = h
        .inventory
        .list_items(ItemFilter::All)
        .await
        .expect("list")
        .into_iter()
        .find(|i| i.name == "Tent")
        .expect("tent exists");
    let result = h
        .inventory
        .edit_item(
            tent.id,
            UpdateItem {
                name: "Drill".to_string(),
                description: tent.description.clone(),
                unit_id: None,
                quantity: 1,
            },
        )
        .await;
    assert_matches!(result, Err(ServiceError::Duplicate(_)));
}

#[tokio::test]
async fn shelf_assignment_requires_a_unit_and_does_not_mutate_on_failure() {
    let h = common::harness().await;
    let unit = h.locations.create_unit(new_unit("Garage Rack")).await.expect("unit");
    let shelf = h
        .locations
        .create_shelf(unit.id, NewShelf { name: "Top".to_string() })
        .await
        .expect("shelf");

    let item = h
        .inventory
        .create_item(new_item("Drill", None))
        .await
        .expect("item");

    let result = h.inventory.assign_shelf(item.id, shelf.id).await;
    assert_matches!(result, Err(ServiceError::Precondition(_)));

    let unchanged = h.inventory.get_item(item.id).await.expect("get");
    assert_eq!(unchanged.unit_id, None);
    assert_eq!(unchanged.shelf_id, None);
}

#[tokio::test]
async fn shelf_assignment_needs_candidates_in_the_items_unit() {
    let h = common::harness().await;
    let u1 = h.locations.create_unit(new_unit("Garage Rack")).await.expect("u1");
    let u2 = h.locations.create_unit(new_unit("Attic Rack")).await.expect("u2");
    let foreign_shelf = h
        .locations
        .create_shelf(u2.id, NewShelf { name: "Top".to_string() })
        .await
        .expect("shelf in u2");

    let item = h
        .inventory
        .create_item(new_item("Drill", Some(u1.id)))
        .await
        .expect("item");

    // u1 has no shelves at all.
    let result = h.inventory.assign_shelf(item.id, foreign_shelf.id).await;
    assert_matches!(result, Err(ServiceError::NoCandidates(_)));

    // u1 now has a shelf, but the requested one lives in u2.
    h.locations
        .create_shelf(u1.id, NewShelf { name: "Bottom".to_string() })
        .await
        .expect("shelf in u1");
    let result = h.inventory.assign_shelf(item.id, foreign_shelf.id).await;
    assert_matches!(result, Err(ServiceError::Validation(_)));
}

#[tokio::test]
async fn reassigning_the_unit_clears_the_shelf_and_is_stable() {
    let h = common::harness().await;
    let u1 = h.locations.create_unit(new_unit("Garage Rack")).await.expect("u1");
    let u2 = h.locations.create_unit(new_unit("Attic Rack")).await.expect("u2");
    let s1 = h
        .locations
        .create_shelf(u1.id, NewShelf { name: "Top".to_string() })
        .await
        .expect("s1");

    let item = h
        .inventory
        .create_item(new_item("Drill", Some(u1.id)))
        .await
        .expect("item");
    let shelved = h
        .inventory
        .assign_shelf(item.id, s1.id)
        .await
        .expect("shelf assigned");
    assert_eq!(shelved.shelf_id, Some(s1.id));

    let update = |unit_id| UpdateItem {
        name: "Drill".to_string(),
        description: "Drill for chapter use".to_string(),
        unit_id: Some(unit_id),
        quantity: 1,
    };

    let moved = h
        .inventory
        .edit_item(item.id, update(u2.id))
        .await
        .expect("moved to u2");
    assert_eq!(moved.unit_id, Some(u2.id));
    assert_eq!(moved.shelf_id, None);

    // Re-submitting the same unit is a stable no-op on the shelf.
    let again = h
        .inventory
        .edit_item(item.id, update(u2.id))
        .await
        .expect("same unit again");
    assert_eq!(again.unit_id, Some(u2.id));
    assert_eq!(again.shelf_id, None);
}

#[tokio::test]
async fn unit_assignment_requires_candidates() {
    let h = common::harness().await;
    let item = h
        .inventory
        .create_item(new_item("Drill", None))
        .await
        .expect("item");
    let result = h.inventory.assign_unit(item.id, 1).await;
    assert_matches!(result, Err(ServiceError::NoCandidates(_)));
}

#[tokio::test]
async fn container_removal_is_an_error_when_nothing_is_assigned() {
    let h = common::harness().await;
    let item = h
        .inventory
        .create_item(new_item("Drill", None))
        .await
        .expect("item");

    let result = h.inventory.remove_from_container(item.id).await;
    assert_matches!(result, Err(ServiceError::NoOp(_)));

    let container = h
        .locations
        .create_container(NewContainer {
            name: "Tote A".to_string(),
            shelf_id: None,
            unit_id: None,
        })
        .await
        .expect("container");
    h.inventory
        .assign_container(item.id, container.id)
        .await
        .expect("assigned");
    let cleared = h
        .inventory
        .remove_from_container(item.id)
        .await
        .expect("removed");
    assert_eq!(cleared.container_id, None);
}

#[tokio::test]
async fn container_on_a_shelf_adopts_the_shelfs_unit() {
    let h = common::harness().await;
    let unit = h.locations.create_unit(new_unit("Garage Rack")).await.expect("unit");
    let shelf = h
        .locations
        .create_shelf(unit.id, NewShelf { name: "Top".to_string() })
        .await
        .expect("shelf");

    let container = h
        .locations
        .create_container(NewContainer {
            name: "Tote A".to_string(),
            shelf_id: Some(shelf.id),
            unit_id: None,
        })
        .await
        .expect("container");
    assert_eq!(container.unit_id, Some(unit.id));
    assert_eq!(container.shelf_id, Some(shelf.id));
}

#[tokio::test]
async fn container_shelf_assignment_follows_the_same_precondition() {
    let h = common::harness().await;
    let unit = h.locations.create_unit(new_unit("Garage Rack")).await.expect("unit");
    let shelf = h
        .locations
        .create_shelf(unit.id, NewShelf { name: "Top".to_string() })
        .await
        .expect("shelf");

    let unplaced = h
        .locations
        .create_container(NewContainer {
            name: "Tote A".to_string(),
            shelf_id: None,
            unit_id: None,
        })
        .await
        .expect("container");

    let result = h.locations.assign_shelf_container(unplaced.id, shelf.id).await;
    assert_matches!(result, Err(ServiceError::Precondition(_)));

    h.locations
        .assign_unit_container(unplaced.id, unit.id)
        .await
        .expect("unit assigned");
    let placed = h
        .locations
        .assign_shelf_container(unplaced.id, shelf.id)
        .await
        .expect("shelf assigned");
    assert_eq!(placed.shelf_id, Some(shelf.id));
}

#[tokio::test]
async fn deleting_a_unit_nulls_links_instead_of_cascading() {
    let h = common::harness().await;
    let unit = h.locations.create_unit(new_unit("Garage Rack")).await.expect("unit");
    let shelf = h
        .locations
        .create_shelf(unit.id, NewShelf { name: "Top".to_string() })
        .await
        .expect("shelf");
    let container = h
        .locations
        .create_container(NewContainer {
            name: "Tote A".to_string(),
            shelf_id: Some(shelf.id),
            unit_id: None,
        })
        .await
        .expect("container");
    let item = h
        .inventory
        .create_item(new_item("Drill", Some(unit.id)))
        .await
        .expect("item");

    h.locations.delete_unit(unit.id).await.expect("unit deleted");

    assert_eq!(h.locations.get_shelf(shelf.id).await.expect("shelf").unit_id, None);
    assert_eq!(
        h.locations
            .get_container(container.id)
            .await
            .expect("container")
            .unit_id,
        None
    );
    assert_eq!(h.inventory.get_item(item.id).await.expect("item").unit_id, None);
}

#[tokio::test]
async fn deleting_an_item_keeps_the_reservation_snapshot() {
    let h = common::harness().await;
    let member = common::register_member(&h, "joe@example.com", "joesmith", "Joe", "Smith").await;
    let drill = h
        .inventory
        .create_item(new_item("Drill", None))
        .await
        .expect("item");

    let today = Utc::now().date_naive();
    let reservation = h
        .reservations
        .create(
            &member,
            NewReservation {
                reason: "retreat".to_string(),
                from_date: today,
                to_date: today.succ_opt().expect("tomorrow exists"),
                item_id: drill.id,
            },
        )
        .await
        .expect("reservation");

    h.inventory.delete_item(drill.id).await.expect("item deleted");

    let survivor = h.reservations.get(reservation.id).await.expect("still there");
    assert_eq!(survivor.item_id, None);
    assert_eq!(survivor.item_name, "Drill");
}

#[tokio::test]
async fn repair_pass_reconciles_stale_shelf_links_and_reads_stay_pure() {
    let h = common::harness().await;
    let unit = h.locations.create_unit(new_unit("Garage Rack")).await.expect("unit");
    let shelf = h
        .locations
        .create_shelf(unit.id, NewShelf { name: "Top".to_string() })
        .await
        .expect("shelf");

    // An item shelved without a unit of its own: the repair pass should
    // adopt the shelf's unit.
    let adoptee = h
        .inventory
        .create_item(new_item("Drill", None))
        .await
        .expect("adoptee");
    let mut active: item::ActiveModel = adoptee.clone().into();
    active.shelf_id = Set(Some(shelf.id));
    active.update(h.db.as_ref()).await.expect("stale link staged");

    // An item left pointing at a shelf whose unit is gone: the repair pass
    // should clear the link.
    let orphan_unit = h.locations.create_unit(new_unit("Attic Rack")).await.expect("u2");
    let orphan_shelf = h
        .locations
        .create_shelf(orphan_unit.id, NewShelf { name: "Loose".to_string() })
        .await
        .expect("orphan shelf");
    let orphan = h
        .inventory
        .create_item(new_item("Tent", Some(orphan_unit.id)))
        .await
        .expect("orphan");
    h.inventory
        .assign_shelf(orphan.id, orphan_shelf.id)
        .await
        .expect("shelved");
    h.locations.delete_unit(orphan_unit.id).await.expect("unit deleted");

    // Listing scoped to the shelf is a pure read: the stale state survives.
    let listed = h
        .inventory
        .list_items(ItemFilter::ByShelf(shelf.id))
        .await
        .expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(
        h.inventory.get_item(adoptee.id).await.expect("get").unit_id,
        None,
        "a list must not write"
    );

    let report = h.inventory.repair_locations().await.expect("repair");
    assert_eq!(report.examined, 2);
    assert_eq!(report.units_adopted, 1);
    assert_eq!(report.shelves_cleared, 1);

    let adopted = h.inventory.get_item(adoptee.id).await.expect("get");
    assert_eq!(adopted.unit_id, Some(unit.id));
    assert_eq!(adopted.shelf_id, Some(shelf.id));

    let cleared = h.inventory.get_item(orphan.id).await.expect("get");
    assert_eq!(cleared.shelf_id, None);
}
