//! Profile form model and its submission pipeline

use crate::error::SubmitError;
use crate::feedback::{Notice, Notify};
use crate::identity::{Session, UserProfile};
use crate::state::{FieldSpec, FormController, SubmitHandler, SubmitPayload};
use crate::upload::{PendingFile, UploadCoordinator};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

/// Storage folder for avatar uploads
pub const AVATAR_FOLDER: &str = "profile";

pub const SUCCESS_MESSAGE: &str = "Profile updated!";

/// Values of the profile form
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    /// Avatar pending when `submit()` was called; not a form field
    #[serde(skip)]
    pub avatar: Option<PendingFile>,
}

impl ProfileForm {
    /// Field registrations seeded from the signed-in identity
    pub fn fields(user: &UserProfile) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("name")
                .label("Name")
                .required()
                .initial(user.display_name.as_str()),
            FieldSpec::new("email")
                .label("Email")
                .required()
                .disabled()
                .initial(user.email.as_str()),
        ]
    }

    pub fn register(form: &FormController<ProfileForm>, user: &UserProfile) {
        for spec in Self::fields(user) {
            form.register(spec);
        }
    }
}

/// Updates the display name, then uploads and links a pending avatar
pub struct ProfileSubmitHandler {
    session: Session,
    coordinator: Arc<UploadCoordinator>,
    feedback: Arc<dyn Notify>,
}

impl ProfileSubmitHandler {
    pub fn new(
        session: Session,
        coordinator: Arc<UploadCoordinator>,
        feedback: Arc<dyn Notify>,
    ) -> Self {
        Self {
            session,
            coordinator,
            feedback,
        }
    }

    async fn apply(&self, values: &ProfileForm) -> Result<(), SubmitError> {
        self.session.update_display_name(&values.name).await?;

        let Some(file) = &values.avatar else {
            return Ok(());
        };
        let url = self.coordinator.upload(file, AVATAR_FOLDER).await?;
        self.session.update_avatar_reference(&url).await?;
        // Both mutations landed; a stale cache is not a failed submission.
        if let Err(e) = self.session.reload().await {
            tracing::warn!(error = %e, "identity reload after avatar update failed");
        }
        self.coordinator.clear_if(file.id);
        Ok(())
    }
}

#[async_trait]
impl SubmitHandler<ProfileForm> for ProfileSubmitHandler {
    fn prepare(&self, values: &mut ProfileForm) {
        values.avatar = self.coordinator.pending();
    }

    async fn on_submit(&self, payload: SubmitPayload<ProfileForm>) {
        if payload.valid {
            match self.apply(&payload.values).await {
                Ok(()) => self.feedback.notify(Notice::success(SUCCESS_MESSAGE)),
                Err(e) => {
                    tracing::error!(kind = e.as_label(), error = %e, "profile update failed");
                    self.feedback.notify(Notice::error(e.to_string()));
                }
            }
        } else {
            tracing::debug!("invalid profile submission skipped");
        }
        payload.finish();
    }
}
