use std::{collections::BTreeMap, sync::Arc};

use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use argon2::Argon2;
use chrono::{DateTime, FixedOffset, Utc};
use entity::app_user;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, SqlErr,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{AuthnError, AuthnResult};

const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;
const MAX_NAME_LEN: usize = 128;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Public view of an account; never carries the password hash.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<FixedOffset>,
}

impl From<app_user::Model> for UserProfile {
    fn from(model: app_user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            created_at: model.created_at,
        }
    }
}

#[derive(Clone)]
pub struct AccountService {
    db: Arc<DatabaseConnection>,
}

impl AccountService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(name = "authn.register", skip_all)]
    pub async fn register(&self, input: Registration) -> AuthnResult<UserProfile> {
        let mut errors = BTreeMap::new();
        let name = input.name.trim().to_string();
        if name.is_empty() {
            errors.insert("name".to_string(), "Name is required".to_string());
        } else if name.chars().count() > MAX_NAME_LEN {
            errors.insert(
                "name".to_string(),
                format!("Name must be at most {MAX_NAME_LEN} characters"),
            );
        }
        let email = normalize_email(&input.email);
        if !entity::email::is_valid(&email) {
            errors.insert("email".to_string(), "Please enter a valid email".to_string());
        }
        let password_len = input.password.chars().count();
        if password_len < MIN_PASSWORD_LEN {
            errors.insert(
                "password".to_string(),
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            );
        } else if password_len > MAX_PASSWORD_LEN {
            errors.insert(
                "password".to_string(),
                format!("Password must be at most {MAX_PASSWORD_LEN} characters"),
            );
        }
        if !errors.contains_key("email") && self.find_by_email(&email).await?.is_some() {
            errors.insert("email".to_string(), "Email already registered".to_string());
        }
        if !errors.is_empty() {
            return Err(AuthnError::InvalidRegistration(errors));
        }

        let now: DateTime<FixedOffset> = Utc::now().into();
        let model = app_user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            email: Set(email),
            password_hash: Set(hash_password(&input.password)?),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await
        .map_err(registration_conflict)?;
        info!(user_id = %model.id, "account registered");
        Ok(model.into())
    }

    /// Every failure mode collapses into `InvalidCredentials` so callers cannot probe accounts.
    #[instrument(name = "authn.login", skip_all)]
    pub async fn login(&self, credentials: Credentials) -> AuthnResult<UserProfile> {
        let email = normalize_email(&credentials.email);
        let Some(user) = self.find_by_email(&email).await? else {
            return Err(AuthnError::InvalidCredentials);
        };
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|err| AuthnError::Hash(err.to_string()))?;
        if Argon2::default()
            .verify_password(credentials.password.as_bytes(), &parsed_hash)
            .is_err()
        {
            return Err(AuthnError::InvalidCredentials);
        }
        Ok(user.into())
    }

    pub async fn find(&self, user_id: Uuid) -> AuthnResult<Option<UserProfile>> {
        let user = app_user::Entity::find_by_id(user_id)
            .one(self.db.as_ref())
            .await?;
        Ok(user.map(UserProfile::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<app_user::Model>, DbErr> {
        app_user::Entity::find()
            .filter(app_user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
    }
}

fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

fn registration_conflict(err: DbErr) -> AuthnError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            let mut errors = BTreeMap::new();
            errors.insert("email".to_string(), "Email already registered".to_string());
            AuthnError::InvalidRegistration(errors)
        }
        _ => AuthnError::Database(err),
    }
}

fn hash_password(password: &str) -> AuthnResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthnError::Hash(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn service() -> AccountService {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        AccountService::new(Arc::new(db))
    }

    fn registration(email: &str) -> Registration {
        Registration {
            name: "Ann Lee".into(),
            email: email.into(),
            password: "correct horse".into(),
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let accounts = service().await;
        let user = accounts.register(registration("Ann@X.com")).await.unwrap();
        assert_eq!(user.email, "ann@x.com");

        let logged_in = accounts
            .login(Credentials {
                email: " ANN@x.com ".into(),
                password: "correct horse".into(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);
        assert_eq!(accounts.find(user.id).await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let accounts = service().await;
        accounts.register(registration("ann@x.com")).await.unwrap();

        let wrong = accounts
            .login(Credentials {
                email: "ann@x.com".into(),
                password: "wrong password".into(),
            })
            .await;
        assert!(matches!(wrong, Err(AuthnError::InvalidCredentials)));

        let unknown = accounts
            .login(Credentials {
                email: "bob@x.com".into(),
                password: "correct horse".into(),
            })
            .await;
        assert!(matches!(unknown, Err(AuthnError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn duplicate_and_invalid_registrations_report_fields() {
        let accounts = service().await;
        accounts.register(registration("ann@x.com")).await.unwrap();

        let Err(AuthnError::InvalidRegistration(errors)) =
            accounts.register(registration("ANN@x.com")).await
        else {
            panic!("duplicate email should be rejected");
        };
        assert_eq!(errors["email"], "Email already registered");

        let Err(AuthnError::InvalidRegistration(errors)) = accounts
            .register(Registration {
                name: " ".into(),
                email: "nope".into(),
                password: "short".into(),
            })
            .await
        else {
            panic!("invalid registration should be rejected");
        };
        assert_eq!(errors.len(), 3);
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("password"));
    }

    #[tokio::test]
    async fn registration_uses_the_directory_email_syntax() {
        let accounts = service().await;
        for bad in ["ann@x", "a@b@c.com", "josé@x.com"] {
            let Err(AuthnError::InvalidRegistration(errors)) =
                accounts.register(registration(bad)).await
            else {
                panic!("{bad} should be rejected");
            };
            assert_eq!(errors["email"], "Please enter a valid email");
        }
        assert!(accounts.register(registration("ann.lee@corp.io")).await.is_ok());
    }
}
