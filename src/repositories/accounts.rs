use anyhow::{Context, Result};
use async_trait::async_trait;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;

use super::AccountRepository;
use crate::{
    common::aliases::DbPool,
    models::{
        CreateFeedbackEntity, CreateUserEntity, FeedbackEntity, ProfileEntity, UserEntity,
    },
    schema::{feedback, user_profiles, users},
};

pub struct PgAccountRepository {
    db_pool: DbPool,
}

impl PgAccountRepository {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn sync_user(&self, user: CreateUserEntity) -> Result<UserEntity> {
        let conn = &mut self
            .db_pool
            .get()
            .await
            .context("Failed to obtain a DB connection pool")?;

        diesel::insert_into(users::table)
            .values(&user)
            .on_conflict(users::uid)
            .do_nothing()
            .execute(conn)
            .await
            .context("Failed to save user")?;

        users::table
            .find(&user.uid)
            .select(UserEntity::as_select())
            .get_result(conn)
            .await
            .context("Failed to get user")
    }

    async fn find_profile(&self, user_id: &str) -> Result<Option<ProfileEntity>> {
        let conn = &mut self
            .db_pool
            .get()
            .await
            .context("Failed to obtain a DB connection pool")?;

        user_profiles::table
            .find(user_id)
            .select(ProfileEntity::as_select())
            .get_result(conn)
            .await
            .optional()
            .context("Failed to get profile")
    }

    async fn upsert_profile(&self, profile: ProfileEntity) -> Result<ProfileEntity> {
        let conn = &mut self
            .db_pool
            .get()
            .await
            .context("Failed to obtain a DB connection pool")?;

        diesel::insert_into(user_profiles::table)
            .values(&profile)
            .on_conflict(user_profiles::user_id)
            .do_update()
            .set((&profile, user_profiles::updated_at.eq(diesel::dsl::now)))
            .returning(ProfileEntity::as_returning())
            .get_result(conn)
            .await
            .context("Failed to save profile")
    }

    async fn create_feedback(&self, entry: CreateFeedbackEntity) -> Result<FeedbackEntity> {
        let conn = &mut self
            .db_pool
            .get()
            .await
            .context("Failed to obtain a DB connection pool")?;

        diesel::insert_into(feedback::table)
            .values(entry)
            .returning(FeedbackEntity::as_returning())
            .get_result(conn)
            .await
            .context("Failed to save feedback")
    }
}
