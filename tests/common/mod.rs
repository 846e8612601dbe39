#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use quartermaster_api::{
    auth::AuthService,
    db::run_migrations,
    entities::brother,
    mail::{MailError, Mailer},
    services::{
        brothers::{BrotherService, NewBrother},
        inventory::InventoryService,
        locations::LocationService,
        reservations::ReservationService,
    },
};

/// A mail captured by [`RecordingMailer`].
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Test transport that records every message instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().expect("mailer lock").clone()
    }

    pub fn clear(&self) {
        self.sent.lock().expect("mailer lock").clear();
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
        self.sent.lock().expect("mailer lock").push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: html_body.to_string(),
        });
        Ok(())
    }
}

pub struct TestHarness {
    pub db: Arc<DatabaseConnection>,
    pub mailer: Arc<RecordingMailer>,
    pub auth: AuthService,
    pub brothers: BrotherService,
    pub inventory: InventoryService,
    pub locations: LocationService,
    pub reservations: ReservationService,
}

/// Fresh in-memory database with migrations applied, plus the full service
/// set wired to a recording mailer. One pooled connection keeps the memory
/// store private to this harness.
pub async fn harness() -> TestHarness {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_owned());
    opts.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.expect("sqlite connect");
    run_migrations(&db).await.expect("migrations apply");
    let db = Arc::new(db);

    let mailer = Arc::new(RecordingMailer::default());
    let auth = AuthService::new(
        "integration_test_secret_key_that_is_long_enough",
        "integration_test_token_salt",
        3600,
    );
    let brothers = BrotherService::new(
        db.clone(),
        auth.clone(),
        mailer.clone(),
        "http://localhost:8080",
    );
    let inventory = InventoryService::new(db.clone());
    let locations = LocationService::new(db.clone());
    let reservations = ReservationService::new(db.clone(), mailer.clone());

    TestHarness {
        db,
        mailer,
        auth,
        brothers,
        inventory,
        locations,
        reservations,
    }
}

/// Registers a member with a rule-passing password.
pub async fn register_member(
    harness: &TestHarness,
    email: &str,
    username: &str,
    first_name: &str,
    last_name: &str,
) -> brother::Model {
    harness
        .brothers
        .register(NewBrother {
            email: email.to_string(),
            username: username.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            password: "Abc123$x".to_string(),
        })
        .await
        .expect("registration succeeds")
}

/// Pulls the one-time token out of a mailed confirmation or reset link.
pub fn extract_token(body: &str, path_marker: &str) -> String {
    let start = body
        .find(path_marker)
        .map(|idx| idx + path_marker.len())
        .expect("mail body contains the link path");
    body[start..]
        .split('"')
        .next()
        .expect("link is quote-terminated")
        .to_string()
}
