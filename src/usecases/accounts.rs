use std::sync::Arc;

use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    common::{app_error::AppError, auth::AuthUser},
    models::{CreateFeedbackEntity, CreateUserEntity, FeedbackEntity, ProfileEntity, UserEntity},
    repositories::AccountRepository,
};

/// Partial profile update; absent fields keep their stored value.
#[derive(Deserialize, Debug, Default, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub phones: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub emails: Option<Vec<String>>,
    pub age: Option<String>,
    pub health_issues: Option<Vec<String>>,
    pub emergency_contacts: Option<Vec<String>>,
    pub profile_picture: Option<String>,
}

impl ProfilePatch {
    fn apply(self, mut profile: ProfileEntity) -> ProfileEntity {
        fn merge<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        merge(&mut profile.name, self.name);
        merge(&mut profile.phones, self.phones);
        merge(&mut profile.address, self.address);
        merge(&mut profile.bio, self.bio);
        merge(&mut profile.emails, self.emails);
        merge(&mut profile.age, self.age);
        merge(&mut profile.health_issues, self.health_issues);
        merge(&mut profile.emergency_contacts, self.emergency_contacts);
        merge(&mut profile.profile_picture, self.profile_picture);
        profile
    }
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct SubmitFeedback {
    pub feedback: String,
    pub rating: i32,
}

pub struct AccountUseCase<T>
where
    T: AccountRepository + Send + Sync,
{
    account_repository: Arc<T>,
}

impl<T> AccountUseCase<T>
where
    T: AccountRepository + Send + Sync,
{
    pub fn new(account_repository: Arc<T>) -> Self {
        Self { account_repository }
    }

    pub async fn sync_user(&self, user: &AuthUser) -> Result<UserEntity, AppError> {
        let name = user
            .name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "Anonymous".to_string());

        let stored = self
            .account_repository
            .sync_user(CreateUserEntity {
                uid: user.user_id.clone(),
                name,
                email: user.email.clone(),
            })
            .await?;

        Ok(stored)
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<ProfileEntity, AppError> {
        let profile = self
            .account_repository
            .find_profile(user_id)
            .await?
            .unwrap_or_else(|| ProfileEntity::empty(user_id));

        Ok(profile.with_list_defaults())
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        patch: ProfilePatch,
    ) -> Result<ProfileEntity, AppError> {
        let current = self
            .account_repository
            .find_profile(user_id)
            .await?
            .unwrap_or_else(|| ProfileEntity::empty(user_id));

        let saved = self
            .account_repository
            .upsert_profile(patch.apply(current).with_list_defaults())
            .await?;

        tracing::info!(user_id, "Profile updated");
        Ok(saved)
    }

    pub async fn submit_feedback(
        &self,
        user: &AuthUser,
        request: SubmitFeedback,
    ) -> Result<FeedbackEntity, AppError> {
        let feedback = request.feedback.trim();
        if feedback.is_empty() {
            return Err(AppError::BadRequest("Feedback must not be empty".into()));
        }
        if !(1..=5).contains(&request.rating) {
            return Err(AppError::BadRequest("Rating must be between 1 and 5".into()));
        }

        let entry = self
            .account_repository
            .create_feedback(CreateFeedbackEntity {
                user_id: user.user_id.clone(),
                user_name: user.display_name(),
                feedback: feedback.to_string(),
                rating: request.rating,
            })
            .await?;

        tracing::info!(user_id = %user.user_id, rating = entry.rating, "Feedback received");
        Ok(entry)
    }
}
