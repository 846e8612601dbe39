//! Member directory: registration rules, confirmation and reset flows,
//! admin role changes, and the reservation cascade on delete.

mod common;

use assert_matches::assert_matches;
use chrono::Utc;

use quartermaster_api::errors::ServiceError;
use quartermaster_api::services::brothers::NewBrother;
use quartermaster_api::services::inventory::NewItem;
use quartermaster_api::services::reservations::{NewReservation, ReservationFilter};

fn registration(email: &str, username: &str, password: &str) -> NewBrother {
    NewBrother {
        email: email.to_string(),
        username: username.to_string(),
        first_name: "Joe".to_string(),
        last_name: "Smith".to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn password_rule_rejects_missing_classes() {
    let h = common::harness().await;

    // no uppercase, no symbol
    let result = h
        .brothers
        .register(registration("joe@example.com", "joesmith", "abc12345"))
        .await;
    assert_matches!(result, Err(ServiceError::Validation(_)));

    // too short
    let result = h
        .brothers
        .register(registration("joe@example.com", "joesmith", "Ab1$x"))
        .await;
    assert_matches!(result, Err(ServiceError::Validation(_)));

    // passes all classes
    let created = h
        .brothers
        .register(registration("joe@example.com", "joesmith", "Abc123$x"))
        .await
        .expect("valid password registers");
    assert!(!created.is_admin);
    assert!(!created.email_confirmed);
}

#[tokio::test]
async fn duplicate_email_and_username_are_typed_conflicts() {
    let h = common::harness().await;
    h.brothers
        .register(registration("joe@example.com", "joesmith", "Abc123$x"))
        .await
        .expect("first registration");

    let result = h
        .brothers
        .register(registration("joe@example.com", "otherjoe", "Abc123$x"))
        .await;
    assert_matches!(result, Err(ServiceError::Duplicate(_)));

    let result = h
        .brothers
        .register(registration("joe2@example.com", "joesmith", "Abc123$x"))
        .await;
    assert_matches!(result, Err(ServiceError::Duplicate(_)));
}

#[tokio::test]
async fn login_requires_a_confirmed_email() {
    let h = common::harness().await;
    h.brothers
        .register(registration("joe@example.com", "joesmith", "Abc123$x"))
        .await
        .expect("registered");

    // Wrong password is indistinguishable from an unknown account.
    let result = h.brothers.authenticate("joe@example.com", "wrong").await;
    assert_matches!(result, Err(ServiceError::Auth(_)));

    // Right password, unconfirmed email.
    let result = h.brothers.authenticate("joe@example.com", "Abc123$x").await;
    assert_matches!(result, Err(ServiceError::Auth(_)));

    // Confirm via the mailed token, then login succeeds.
    let confirmation = h
        .mailer
        .sent()
        .into_iter()
        .find(|m| m.subject.contains("Confirm"))
        .expect("confirmation mail sent");
    let token = common::extract_token(&confirmation.body, "/api/v1/auth/confirm-email/");
    let confirmed = h.brothers.confirm_email(&token).await.expect("confirmed");
    assert!(confirmed.email_confirmed);

    // Confirmation is idempotent.
    h.brothers.confirm_email(&token).await.expect("second confirm is fine");

    let (session, brother) = h
        .brothers
        .authenticate("joe@example.com", "Abc123$x")
        .await
        .expect("login");
    let claims = h.auth.verify_session(&session).expect("session verifies");
    assert_eq!(claims.sub, brother.id);
    assert!(!claims.is_admin);
}

#[tokio::test]
async fn tampered_confirmation_tokens_are_rejected() {
    let h = common::harness().await;
    h.brothers
        .register(registration("joe@example.com", "joesmith", "Abc123$x"))
        .await
        .expect("registered");
    let confirmation = h.mailer.sent().last().cloned().expect("mail sent");
    let token = common::extract_token(&confirmation.body, "/api/v1/auth/confirm-email/");

    let tampered = token.replacen("joe", "eve", 1);
    assert_matches!(
        h.brothers.confirm_email(&tampered).await,
        Err(ServiceError::Auth(_))
    );
}

#[tokio::test]
async fn password_reset_round_trip() {
    let h = common::harness().await;
    h.brothers
        .register(registration("joe@example.com", "joesmith", "Abc123$x"))
        .await
        .expect("registered");
    let confirmation = h.mailer.sent().last().cloned().expect("mail sent");
    let token = common::extract_token(&confirmation.body, "/api/v1/auth/confirm-email/");
    h.brothers.confirm_email(&token).await.expect("confirmed");
    h.mailer.clear();

    assert_matches!(
        h.brothers.request_password_reset("nobody@example.com").await,
        Err(ServiceError::NotFound(_))
    );

    h.brothers
        .request_password_reset("joe@example.com")
        .await
        .expect("reset requested");
    let reset_mail = h.mailer.sent().last().cloned().expect("reset mail sent");
    let reset_token = common::extract_token(&reset_mail.body, "/api/v1/auth/password-reset/");

    // The replacement password still has to pass the complexity rule.
    assert_matches!(
        h.brothers.reset_password(&reset_token, "weakpass").await,
        Err(ServiceError::Validation(_))
    );

    h.brothers
        .reset_password(&reset_token, "Xyz789!a")
        .await
        .expect("password replaced");

    assert_matches!(
        h.brothers.authenticate("joe@example.com", "Abc123$x").await,
        Err(ServiceError::Auth(_))
    );
    h.brothers
        .authenticate("joe@example.com", "Xyz789!a")
        .await
        .expect("login with the new password");
}

#[tokio::test]
async fn admin_grant_and_revoke_notify_the_member() {
    let h = common::harness().await;
    let joe = common::register_member(&h, "joe@example.com", "joesmith", "Joe", "Smith").await;
    h.mailer.clear();

    let granted = h.brothers.grant_admin(joe.id).await.expect("granted");
    assert!(granted.is_admin);

    let revoked = h.brothers.revoke_admin(joe.id).await.expect("revoked");
    assert!(!revoked.is_admin);

    let sent = h.mailer.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].body.contains("made an admin"));
    assert!(sent[1].body.contains("removed as an admin"));
    assert_eq!(sent[0].to, "joe@example.com");
}

#[tokio::test]
async fn deleting_a_brother_cascades_to_exactly_their_reservations() {
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
        .expect("item");

    let today = Utc::now().date_naive();
    let input = |item_id| NewReservation {
        reason: "retreat".to_string(),
        from_date: today,
        to_date: today.succ_opt().expect("tomorrow exists"),
        item_id,
    };
    h.reservations.create(&joe, input(drill.id)).await.expect("joe r1");
    h.reservations.create(&joe, input(drill.id)).await.expect("joe r2");
    let amos_r = h
        .reservations
        .create(&amos, input(drill.id))
        .await
        .expect("amos r1");

    let removed = h.brothers.delete(joe.id).await.expect("delete joe");
    assert_eq!(removed, 2);

    let remaining = h
        .reservations
        .list(ReservationFilter::All)
        .await
        .expect("list");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, amos_r.id);

    assert_matches!(h.brothers.get(joe.id).await, Err(ServiceError::NotFound(_)));
}
