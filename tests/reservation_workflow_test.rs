//! Reservation ledger workflow: date invariants, approval state machine,
//! notification ordering, and the edit-policy asymmetry.

mod common;

use assert_matches::assert_matches;
use chrono::Utc;

use quartermaster_api::errors::ServiceError;
use quartermaster_api::services::inventory::NewItem;
use quartermaster_api::services::reservations::{
    ApprovalPolicy, NewReservation, ReservationFilter, UpdateReservation,
};

fn reservation_input(item_id: i32) -> NewReservation {
    let today = Utc::now().date_naive();
    NewReservation {
        reason: "chapter retreat".to_string(),
        from_date: today,
        to_date: today.succ_opt().expect("tomorrow exists"),
        item_id,
    }
}

#[tokio::test]
async fn rejects_date_range_violations_without_persisting() {
    let h = common::harness().await;
    let member = common::register_member(&h, "reserver@example.com", "reserver", "Joe", "Smith").await;
    let item = h
        .inventory
        .create_item(NewItem {
            name: "Canopy Tent".to_string(),
            description: "10x10 canopy".to_string(),
            unit_id: None,
            quantity: 1,
        })
        .await
        .expect("item created");

    let today = Utc::now().date_naive();
    let yesterday = today.pred_opt().expect("yesterday exists");
    let tomorrow = today.succ_opt().expect("tomorrow exists");

    // from_date in the past
    let result = h
        .reservations
        .create(
            &member,
            NewReservation {
                reason: "retreat".to_string(),
                from_date: yesterday,
                to_date: tomorrow,
                item_id: item.id,
            },
        )
        .await;
    assert_matches!(result, Err(ServiceError::Validation(_)));

    // to_date before from_date
    let result = h
        .reservations
        .create(
            &member,
            NewReservation {
                reason: "retreat".to_string(),
                from_date: tomorrow,
                to_date: today,
                item_id: item.id,
            },
        )
        .await;
    assert_matches!(result, Err(ServiceError::Validation(_)));

    // blank reason
    let result = h
        .reservations
        .create(
            &member,
            NewReservation {
                reason: "   ".to_string(),
                from_date: today,
                to_date: tomorrow,
                item_id: item.id,
            },
        )
        .await;
    assert_matches!(result, Err(ServiceError::Validation(_)));

    let all = h
        .reservations
        .list(ReservationFilter::All)
        .await
        .expect("list");
    assert!(all.is_empty(), "no rejected submission may be persisted");
}

#[tokio::test]
async fn create_snapshots_names_and_starts_unapproved() {
    let h = common::harness().await;
    let member = common::register_member(&h, "reserver@example.com", "reserver", "Joe", "Smith").await;
    let item = h
        .inventory
        .create_item(NewItem {
            name: "Drill".to_string(),
            description: "cordless drill".to_string(),
            unit_id: None,
            quantity: 1,
        })
        .await
        .expect("item created");

    let created = h
        .reservations
        .create(&member, reservation_input(item.id))
        .await
        .expect("reservation created");

    assert!(!created.approved);
    assert_eq!(created.reserved_by, "Joe Smith");
    assert_eq!(created.item_name, "Drill");
    assert_eq!(created.brother_id, Some(member.id));
    assert_eq!(created.item_id, Some(item.id));
}

#[tokio::test]
async fn approve_then_revoke_leaves_unapproved_and_sends_two_mails_in_order() {
    let h = common::harness().await;
    let member = common::register_member(&h, "reserver@example.com", "reserver", "Joe", "Smith").await;
    let item = h
        .inventory
        .create_item(NewItem {
            name: "Drill".to_string(),
            description: "cordless drill".to_string(),
            unit_id: None,
            quantity: 1,
        })
        .await
        .expect("item created");
    let created = h
        .reservations
        .create(&member, reservation_input(item.id))
        .await
        .expect("reservation created");
    h.mailer.clear();

    let approved = h.reservations.approve(created.id).await.expect("approve");
    assert!(approved.approved);

    let revoked = h.reservations.revoke(created.id).await.expect("revoke");
    assert!(!revoked.approved);

    let sent = h.mailer.sent();
    assert_eq!(sent.len(), 2, "exactly one mail per state change");
    assert_eq!(sent[0].to, "reserver@example.com");
    assert!(sent[0].body.contains("approved"));
    assert!(sent[1].body.contains("revoked"));
    assert!(sent[0].subject.contains("Drill"));
}

#[tokio::test]
async fn re_approving_is_state_idempotent_but_re_sends_the_notification() {
    let h = common::harness().await;
    let member = common::register_member(&h, "reserver@example.com", "reserver", "Joe", "Smith").await;
    let item = h
        .inventory
        .create_item(NewItem {
            name: "Drill".to_string(),
            description: "cordless drill".to_string(),
            unit_id: None,
            quantity: 1,
        })
        .await
        .expect("item created");
    let created = h
        .reservations
        .create(&member, reservation_input(item.id))
        .await
        .expect("reservation created");
    h.mailer.clear();

    h.reservations.approve(created.id).await.expect("approve");
    let again = h.reservations.approve(created.id).await.expect("approve again");
    assert!(again.approved);
    assert_eq!(h.mailer.sent().len(), 2);
}

#[tokio::test]
async fn edit_policy_controls_whether_approval_survives() {
    let h = common::harness().await;
    let member = common::register_member(&h, "reserver@example.com", "reserver", "Joe", "Smith").await;
    let item = h
        .inventory
        .create_item(NewItem {
            name: "Drill".to_string(),
            description: "cordless drill".to_string(),
            unit_id: None,
            quantity: 1,
        })
        .await
        .expect("item created");
    let created = h
        .reservations
        .create(&member, reservation_input(item.id))
        .await
        .expect("reservation created");
    h.reservations.approve(created.id).await.expect("approve");

    let today = Utc::now().date_naive();
    let update = UpdateReservation {
        reason: "retreat, one more day".to_string(),
        from_date: today,
        to_date: today.succ_opt().expect("tomorrow exists"),
    };

    // Admin edit keeps the standing approval.
    let edited = h
        .reservations
        .edit(created.id, update.clone(), ApprovalPolicy::Preserve)
        .await
        .expect("admin edit");
    assert!(edited.approved);

    // Member edit sends it back for re-approval.
    let edited = h
        .reservations
        .edit(created.id, update, ApprovalPolicy::Reset)
        .await
        .expect("member edit");
    assert!(!edited.approved);
}

#[tokio::test]
async fn edit_revalidates_the_date_invariant() {
    let h = common::harness().await;
    let member = common::register_member(&h, "reserver@example.com", "reserver", "Joe", "Smith").await;
    let item = h
        .inventory
        .create_item(NewItem {
            name: "Drill".to_string(),
            description: "cordless drill".to_string(),
            unit_id: None,
            quantity: 1,
        })
        .await
        .expect("item created");
    let created = h
        .reservations
        .create(&member, reservation_input(item.id))
        .await
        .expect("reservation created");

    let today = Utc::now().date_naive();
    let result = h
        .reservations
        .edit(
            created.id,
            UpdateReservation {
                reason: "retreat".to_string(),
                from_date: today.pred_opt().expect("yesterday exists"),
                to_date: today,
            },
            ApprovalPolicy::Reset,
        )
        .await;
    assert_matches!(result, Err(ServiceError::Validation(_)));
}

#[tokio::test]
async fn list_filters_by_item_and_brother_in_id_order() {
    let h = common::harness().await;
    let joe = common::register_member(&h, "joe@example.com", "joesmith", "Joe", "Smith").await;
    let amos = common::register_member(&h, "amos@example.com", "amosb", "Amos", "Burton").await;
    let drill = h
        .inventory
        .create_item(NewItem {
            name: "Drill".to_string(),
            description: "cordless drill".to_string(),
            unit_id: None,
            quantity: 1,
        })
        .await
        .expect("item created");
    let tent = h
        .inventory
        .create_item(NewItem {
            name: "Tent".to_string(),
            description: "4-person tent".to_string(),
            unit_id: None,
            quantity: 2,
        })
        .await
        .expect("item created");

    let r1 = h
        .reservations
        .create(&joe, reservation_input(drill.id))
        .await
        .expect("r1");
    let r2 = h
        .reservations
        .create(&amos, reservation_input(drill.id))
        .await
        .expect("r2");
    let r3 = h
        .reservations
        .create(&joe, reservation_input(tent.id))
        .await
        .expect("r3");

    let all = h.reservations.list(ReservationFilter::All).await.expect("all");
    assert_eq!(
        all.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![r1.id, r2.id, r3.id]
    );

    let by_drill = h
        .reservations
        .list(ReservationFilter::ByItem(drill.id))
        .await
        .expect("by item");
    assert_eq!(by_drill.len(), 2);

    let by_joe = h
        .reservations
        .list(ReservationFilter::ByBrother(joe.id))
        .await
        .expect("by brother");
    assert_eq!(by_joe.iter().map(|r| r.id).collect::<Vec<_>>(), vec![r1.id, r3.id]);
}

#[tokio::test]
async fn delete_removes_the_reservation() {
    let h = common::harness().await;
    let member = common::register_member(&h, "reserver@example.com", "reserver", "Joe", "Smith").await;
    let item = h
        .inventory
        .create_item(NewItem {
            name: "Drill".to_string(),
            description: "cordless drill".to_string(),
            unit_id: None,
            quantity: 1,
        })
        .await
        .expect("item created");
    let created = h
        .reservations
        .create(&member, reservation_input(item.id))
        .await
        .expect("reservation created");

    h.reservations.delete(created.id).await.expect("delete");
    assert_matches!(
        h.reservations.get(created.id).await,
        Err(ServiceError::NotFound(_))
    );
}
