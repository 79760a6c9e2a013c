//! Application state and core logic

use crate::config::AppConfig;
use crate::feedback::{AlertChannel, Notice, Notify};
use crate::identity::{IdentityProvider, LocalIdentityProvider, Session};
use crate::platform::is_shortcut;
use crate::profile::{ProfileForm, ProfileSubmitHandler};
use crate::state::{FieldValue, FormController, FormField};
use crate::storage::{LocalObjectStore, ObjectStore};
use crate::upload::{FileChooser, SelectedFile, Selection, UploadCoordinator};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

/// Field order on the profile screen
pub const FIELD_ORDER: &[&str] = &["name", "email"];

/// Which element has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(usize),
    Submit,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Field(i) if i + 1 < FIELD_ORDER.len() => Focus::Field(i + 1),
            Focus::Field(_) => Focus::Submit,
            Focus::Submit => Focus::Field(0),
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Field(0) => Focus::Submit,
            Focus::Field(i) => Focus::Field(i - 1),
            Focus::Submit => Focus::Field(FIELD_ORDER.len() - 1),
        }
    }
}

/// File chooser backed by a path typed into the prompt
pub struct PathChooser {
    path: String,
}

impl PathChooser {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FileChooser for PathChooser {
    async fn choose(&self) -> Result<Option<SelectedFile>> {
        let path = self.path.trim();
        if path.is_empty() {
            return Ok(None);
        }
        let file = SelectedFile::read(&PathBuf::from(path)).await?;
        Ok(Some(file))
    }
}

/// Main application struct
pub struct App {
    pub form: FormController<ProfileForm>,
    pub coordinator: Arc<UploadCoordinator>,
    pub session: Session,
    feedback: Arc<dyn Notify>,
    notices: UnboundedReceiver<Notice>,
    /// Latest notice shown in the toast line
    pub toast: Option<Notice>,
    pub focus: Focus,
    /// Path prompt contents while the file chooser is open
    pub prompt: Option<String>,
    /// Handle of the most recent submission
    pub submission: Option<JoinHandle<()>>,
    quit: bool,
}

impl App {
    /// Create a new App from the user's configuration
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let provider: Arc<dyn IdentityProvider> =
            Arc::new(LocalIdentityProvider::open(config.identity_path_or_default()).await?);
        let root = config.storage_root_or_default();
        let store: Arc<dyn ObjectStore> = match &config.public_base_url {
            Some(url) => Arc::new(LocalObjectStore::new(root, url.clone())),
            None => Arc::new(LocalObjectStore::with_file_urls(root)),
        };
        Self::with_collaborators(config, provider, store).await
    }

    /// Wire the form engine to explicit collaborators
    pub async fn with_collaborators(
        config: &AppConfig,
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn ObjectStore>,
    ) -> Result<Self> {
        let session = Session::acquire(provider).await?;
        let user = session.user()?;

        let (channel, notices) = AlertChannel::new();
        let feedback: Arc<dyn Notify> = Arc::new(channel);
        let coordinator = Arc::new(UploadCoordinator::new(
            config.avatar_constraints(),
            store,
            session.clone(),
            Arc::clone(&feedback),
        ));
        let handler = ProfileSubmitHandler::new(
            session.clone(),
            Arc::clone(&coordinator),
            Arc::clone(&feedback),
        );
        let form = FormController::<ProfileForm>::new(Arc::new(handler));
        ProfileForm::register(&form, &user);

        Ok(Self {
            form,
            coordinator,
            session,
            feedback,
            notices,
            toast: None,
            focus: Focus::Field(0),
            prompt: None,
            submission: None,
            quit: false,
        })
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Pull pending notices into the toast line
    pub fn tick(&mut self) {
        while let Ok(notice) = self.notices.try_recv() {
            self.toast = Some(notice);
        }
    }

    /// Field under focus, if focus is on a field
    pub fn active_field(&self) -> Option<FormField> {
        match self.focus {
            Focus::Field(i) => FIELD_ORDER.get(i).and_then(|name| self.form.field(name)),
            Focus::Submit => None,
        }
    }

    /// Current avatar: the pending file name or the stored reference
    pub fn avatar_label(&self) -> String {
        if let Some(file) = self.coordinator.pending() {
            return format!("{} ({}x{}, not yet uploaded)", file.name, file.width, file.height);
        }
        self.session
            .user()
            .ok()
            .and_then(|user| user.avatar_url)
            .unwrap_or_else(|| "(no avatar)".to_string())
    }

    /// Submit when the form is valid; no-op while a submission is in flight
    pub fn submit(&mut self) {
        if !self.form.valid() {
            tracing::debug!("submit blocked: form invalid");
            return;
        }
        if let Some(handle) = self.form.submit() {
            self.submission = Some(handle);
        }
    }

    /// Open the file chooser prompt. The previous file is discarded first.
    pub fn open_chooser(&mut self) {
        self.coordinator.clear();
        self.prompt = Some(String::new());
    }

    /// Handle keyboard input
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.prompt.is_some() {
            return self.handle_prompt_key(key).await;
        }

        if is_shortcut(key.modifiers) {
            match key.code {
                KeyCode::Char('s') => self.submit(),
                KeyCode::Char('o') => self.open_chooser(),
                KeyCode::Char('x') => self.coordinator.clear(),
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Enter => match self.focus {
                Focus::Submit => self.submit(),
                Focus::Field(_) => self.focus = self.focus.next(),
            },
            KeyCode::Char(c) => self.edit_active(|text| text.push(c)),
            KeyCode::Backspace => self.edit_active(|text| {
                text.pop();
            }),
            _ => {}
        }
        Ok(())
    }

    async fn handle_prompt_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(prompt) = self.prompt.as_mut() else {
            return Ok(());
        };
        match key.code {
            KeyCode::Esc => self.prompt = None,
            KeyCode::Enter => {
                let chooser = PathChooser::new(prompt.clone());
                self.prompt = None;
                match self.coordinator.select(&chooser).await {
                    Ok(Selection::Accepted(file)) => {
                        tracing::debug!(file = %file.name, "avatar staged");
                    }
                    // Rejections already produced a notice.
                    Ok(Selection::Rejected(_)) | Ok(Selection::Cancelled) => {}
                    Err(e) => self
                        .feedback
                        .notify(Notice::error(format!("Could not read file: {e}"))),
                }
            }
            KeyCode::Backspace => {
                prompt.pop();
            }
            KeyCode::Char(c) => prompt.push(c),
            _ => {}
        }
        Ok(())
    }

    fn edit_active(&mut self, edit: impl FnOnce(&mut String)) {
        let Some(field) = self.active_field() else {
            return;
        };
        if field.disabled {
            return;
        }
        let mut text = field.value().as_text().to_string();
        edit(&mut text);
        self.form.set_value(&field.name, FieldValue::Text(text));
    }
}
