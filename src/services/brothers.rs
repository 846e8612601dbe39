//! Member directory: registration, email confirmation, credentials, admin
//! role changes, and member removal.

use std::sync::Arc;

use chrono::Duration;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{AuthService, TokenPurpose};
use crate::entities::{brother, reservation};
use crate::errors::ServiceError;
use crate::mail::{templates, Mailer};
use crate::validation;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewBrother {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 4, max = 20))]
    pub username: String,
    #[validate(length(min = 1, max = 60))]
    pub first_name: String,
    #[validate(length(min = 1, max = 60))]
    pub last_name: String,
    pub password: String,
}

#[derive(Clone)]
pub struct BrotherService {
    db: Arc<DatabaseConnection>,
    auth: AuthService,
    mailer: Arc<dyn Mailer>,
    public_base_url: String,
}

impl BrotherService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        auth: AuthService,
        mailer: Arc<dyn Mailer>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            db,
            auth,
            mailer,
            public_base_url: public_base_url.into(),
        }
    }

    fn check_password(password: &str) -> Result<(), ServiceError> {
        validation::length(password, 6, Some(16))
            .and_then(|()| validation::password_complexity(password))
            .map_err(|violation| ServiceError::Validation(format!("password {violation}")))
    }

    /// Registers a new member and mails a confirmation link. Accounts start
    /// unconfirmed and without the admin role.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: NewBrother) -> Result<brother::Model, ServiceError> {
        input.validate()?;
        Self::check_password(&input.password)?;

        if brother::Entity::find()
            .filter(brother::Column::Email.eq(&input.email))
            .one(self.db.as_ref())
            .await?
            .is_some()
        {
            return Err(ServiceError::Duplicate("email is already in use".to_string()));
        }
        if brother::Entity::find()
            .filter(brother::Column::Username.eq(&input.username))
            .one(self.db.as_ref())
            .await?
            .is_some()
        {
            return Err(ServiceError::Duplicate(
                "username is already in use".to_string(),
            ));
        }

        let password_hash = self.auth.hash_password(&input.password)?;
        let created = brother::ActiveModel {
            email: Set(input.email),
            username: Set(input.username),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            password_hash: Set(password_hash),
            is_admin: Set(false),
            email_confirmed: Set(false),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        let token =
            self.auth
                .issue_signed_token(TokenPurpose::ConfirmEmail, &created.email, Duration::hours(24));
        let confirm_url = format!(
            "{}/api/v1/auth/confirm-email/{token}",
            self.public_base_url
        );
        let (subject, body) = templates::confirm_email(&confirm_url);
        self.mailer.send(&created.email, &subject, &body).await?;

        info!(brother_id = created.id, "brother registered");
        Ok(created)
    }

    /// Confirms an email address. Already-confirmed accounts are left as-is.
    pub async fn confirm_email(&self, token: &str) -> Result<brother::Model, ServiceError> {
        let email = self
            .auth
            .verify_signed_token(TokenPurpose::ConfirmEmail, token)?;
        let existing = self.find_by_email(&email).await?.ok_or_else(|| {
            ServiceError::Auth("confirmation link does not match a registered account".to_string())
        })?;

        if existing.email_confirmed {
            return Ok(existing);
        }
        let mut active: brother::ActiveModel = existing.into();
        active.email_confirmed = Set(true);
        let updated = active.update(self.db.as_ref()).await?;
        info!(brother_id = updated.id, "email confirmed");
        Ok(updated)
    }

    /// Verifies credentials and issues a session token. Unconfirmed accounts
    /// cannot log in.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(String, brother::Model), ServiceError> {
        let invalid = || ServiceError::Auth("invalid email or password".to_string());
        let existing = self.find_by_email(email).await?.ok_or_else(invalid)?;
        if !self.auth.verify_password(password, &existing.password_hash)? {
            return Err(invalid());
        }
        if !existing.email_confirmed {
            return Err(ServiceError::Auth(
                "unable to login until email is confirmed".to_string(),
            ));
        }
        let token = self.auth.issue_session(&existing)?;
        Ok((token, existing))
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<(), ServiceError> {
        let existing = self
            .find_by_email(email)
            .await?
            .ok_or_else(|| ServiceError::NotFound("no account with that email".to_string()))?;

        let token = self.auth.issue_signed_token(
            TokenPurpose::PasswordReset,
            &existing.email,
            Duration::minutes(30),
        );
        let reset_url = format!(
            "{}/api/v1/auth/password-reset/{token}",
            self.public_base_url
        );
        let (subject, body) = templates::password_reset(&reset_url);
        self.mailer.send(&existing.email, &subject, &body).await?;
        info!(brother_id = existing.id, "password reset requested");
        Ok(())
    }

    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<brother::Model, ServiceError> {
        let email = self
            .auth
            .verify_signed_token(TokenPurpose::PasswordReset, token)?;
        Self::check_password(new_password)?;

        let existing = self.find_by_email(&email).await?.ok_or_else(|| {
            ServiceError::Auth("reset link does not match a registered account".to_string())
        })?;
        let mut active: brother::ActiveModel = existing.into();
        active.password_hash = Set(self.auth.hash_password(new_password)?);
        let updated = active.update(self.db.as_ref()).await?;
        info!(brother_id = updated.id, "password reset");
        Ok(updated)
    }

    /// Grants the admin role and notifies the member by mail.
    #[instrument(skip(self))]
    pub async fn grant_admin(&self, id: i32) -> Result<brother::Model, ServiceError> {
        self.set_admin(id, true).await
    }

    /// Revokes the admin role and notifies the member by mail.
    #[instrument(skip(self))]
    pub async fn revoke_admin(&self, id: i32) -> Result<brother::Model, ServiceError> {
        self.set_admin(id, false).await
    }

    async fn set_admin(&self, id: i32, is_admin: bool) -> Result<brother::Model, ServiceError> {
        let existing = self.get(id).await?;
        let mut active: brother::ActiveModel = existing.into();
        active.is_admin = Set(is_admin);
        let updated = active.update(self.db.as_ref()).await?;

        let (subject, body) = if is_admin {
            templates::admin_granted()
        } else {
            templates::admin_revoked()
        };
        self.mailer.send(&updated.email, &subject, &body).await?;

        info!(brother_id = id, is_admin, "admin role updated");
        Ok(updated)
    }

    /// Removes a member and, explicitly, every reservation they own. Returns
    /// how many reservations went with them.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<u64, ServiceError> {
        let existing = self.get(id).await?;

        let removed = reservation::Entity::delete_many()
            .filter(reservation::Column::BrotherId.eq(id))
            .exec(self.db.as_ref())
            .await?
            .rows_affected;

        existing.delete(self.db.as_ref()).await?;
        info!(brother_id = id, reservations_removed = removed, "brother deleted");
        Ok(removed)
    }

    pub async fn get(&self, id: i32) -> Result<brother::Model, ServiceError> {
        brother::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("brother {id} not found")))
    }

    pub async fn list(&self) -> Result<Vec<brother::Model>, ServiceError> {
        Ok(brother::Entity::find()
            .order_by_asc(brother::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<brother::Model>, ServiceError> {
        Ok(brother::Entity::find()
            .filter(brother::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await?)
    }
}
