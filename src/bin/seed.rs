//! Database seed
//!
//! Provisions the three canonical accounts. Safe to run repeatedly:
//! existing emails are left untouched.

use gereja_api::auth::{self, Role};
use gereja_api::domain::NewUser;
use gereja_api::store::{PgStore, RecordStore};
use gereja_api::{db, AppError, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let pool = db::create_pool(&config).await?;
    let store = PgStore::new(pool.clone());

    let accounts = [
        ("Admin Gereja", "admin@gmail.com", Role::Admin),
        ("Sekretaris Gereja", "sekretaris@gmail.com", Role::Sekretaris),
        ("Bendahara Gereja", "bendahara@gmail.com", Role::Bendahara),
    ];

    for (nama, email, role) in accounts {
        let user = NewUser {
            nama: nama.to_string(),
            email: email.to_string(),
            password: auth::hash_password("password123")?,
            role,
        };

        match store.create_user(user).await {
            Ok(created) => {
                tracing::info!(id = created.id, email, role = %role, "user seeded");
            }
            Err(AppError::Conflict(_)) => {
                tracing::info!(email, "user already exists, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }

    pool.close().await;
    Ok(())
}
