use futures::future::{AbortHandle, AbortRegistration};

use crate::app::media::check_media;
use crate::app::posts::{encode, PostPayload, PostService};
use crate::app::preview::{PreviewTicket, Previews};
use crate::app::registry;
use crate::app::validation::validate;
use crate::domain::draft::{DraftField, FieldError, PostDraft, MIN_POLL_OPTIONS};
use crate::domain::media::{Attachment, MediaKind};
use crate::domain::post::{PostType, ServerPost};
use crate::http::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting,
    Succeeded,
}

/// A validated draft, encoded and ready to send.
pub struct PreparedSubmission {
    pub payload: PostPayload,
    pub abort_registration: AbortRegistration,
}

/// Drives one create-post form from first keystroke to created post.
pub struct FormController {
    draft: PostDraft,
    phase: FormPhase,
    errors: Vec<FieldError>,
    submitted_once: bool,
    previews: Previews,
    in_flight: Option<AbortHandle>,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    pub fn new() -> Self {
        Self {
            draft: PostDraft::default(),
            phase: FormPhase::Editing,
            errors: Vec::new(),
            submitted_once: false,
            previews: Previews::default(),
            in_flight: None,
        }
    }

    pub fn draft(&self) -> &PostDraft {
        &self.draft
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Errors from the last submit attempt, refreshed on type changes.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn error_for(&self, field: DraftField) -> Option<&str> {
        self.errors
            .iter()
            .find(|err| err.field == field)
            .map(|err| err.message.as_str())
    }

    pub fn visible_fields(&self) -> Vec<DraftField> {
        registry::visible_fields(&self.draft)
    }

    pub fn preview(&self, kind: MediaKind) -> Option<&str> {
        self.previews.get(kind)
    }

    fn begin_mutation(&mut self) -> Result<(), AppError> {
        match self.phase {
            FormPhase::Submitting => Err(AppError::SubmissionInFlight),
            FormPhase::Succeeded => {
                self.phase = FormPhase::Editing;
                Ok(())
            }
            FormPhase::Editing => Ok(()),
        }
    }

    pub fn edit<F>(&mut self, apply: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut PostDraft),
    {
        self.begin_mutation()?;
        apply(&mut self.draft);
        Ok(())
    }

    /// Switches the type. Values entered for other types are kept.
    pub fn set_post_type(&mut self, post_type: PostType) -> Result<(), AppError> {
        self.begin_mutation()?;
        self.draft.post_type = post_type;
        if self.submitted_once {
            self.errors = self.collect_errors().0;
        }
        Ok(())
    }

    pub fn add_poll_option(&mut self) -> Result<(), AppError> {
        self.begin_mutation()?;
        self.draft.poll_options.push(String::new());
        Ok(())
    }

    pub fn remove_poll_option(&mut self, index: usize) -> Result<(), AppError> {
        self.begin_mutation()?;
        if self.draft.poll_options.len() > MIN_POLL_OPTIONS && index < self.draft.poll_options.len()
        {
            self.draft.poll_options.remove(index);
        }
        Ok(())
    }

    pub fn update_poll_option(&mut self, index: usize, value: impl Into<String>) -> Result<(), AppError> {
        self.begin_mutation()?;
        if let Some(option) = self.draft.poll_options.get_mut(index) {
            *option = value.into();
        }
        Ok(())
    }

    /// Stores the attachment and returns the ticket its preview must present.
    pub fn attach(&mut self, kind: MediaKind, attachment: Attachment) -> Result<PreviewTicket, AppError> {
        self.begin_mutation()?;
        *self.draft.attachment_mut(kind) = Some(attachment);
        Ok(self.previews.begin(kind))
    }

    pub fn clear_attachment(&mut self, kind: MediaKind) -> Result<(), AppError> {
        self.begin_mutation()?;
        *self.draft.attachment_mut(kind) = None;
        self.previews.begin(kind);
        Ok(())
    }

    /// Returns false when a newer selection superseded `ticket`.
    pub fn apply_preview(&mut self, ticket: PreviewTicket, data_url: String) -> bool {
        self.previews.apply(ticket, data_url)
    }

    fn collect_errors(&self) -> (Vec<FieldError>, bool) {
        let mut errors = Vec::new();
        let mut invalid_fields = false;
        if let Err(found) = validate(&self.draft) {
            invalid_fields = true;
            errors.extend(found);
        }
        if let Err(found) = check_media(&self.draft, self.draft.post_type) {
            errors.extend(found);
        }
        (errors, invalid_fields)
    }

    /// Validates the draft and, when it passes, moves to `Submitting`.
    pub fn prepare_submit(&mut self) -> Result<PreparedSubmission, AppError> {
        if self.phase == FormPhase::Submitting {
            return Err(AppError::SubmissionInFlight);
        }
        self.phase = FormPhase::Editing;
        self.submitted_once = true;

        let (errors, invalid_fields) = self.collect_errors();
        self.errors = errors.clone();
        if !errors.is_empty() {
            tracing::debug!(post_type = %self.draft.post_type, errors = errors.len(), "draft rejected");
            return Err(if invalid_fields {
                AppError::Validation(errors)
            } else {
                AppError::MediaConstraint(errors)
            });
        }

        let (handle, abort_registration) = AbortHandle::new_pair();
        self.in_flight = Some(handle);
        self.phase = FormPhase::Submitting;
        Ok(PreparedSubmission {
            payload: encode(&self.draft),
            abort_registration,
        })
    }

    /// Settles the in-flight submission.
    pub fn finish_submit(
        &mut self,
        result: Result<ServerPost, AppError>,
    ) -> Result<ServerPost, AppError> {
        self.in_flight = None;
        match result {
            Ok(post) => {
                self.draft = PostDraft::default();
                self.errors.clear();
                self.submitted_once = false;
                self.previews.reset();
                self.phase = FormPhase::Succeeded;
                Ok(post)
            }
            Err(err) => {
                tracing::warn!(error = %err, "post submission failed");
                self.phase = FormPhase::Editing;
                Err(err)
            }
        }
    }

    /// Aborts the in-flight request, if any.
    pub fn cancel_submit(&mut self) -> bool {
        match self.in_flight.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Handle that aborts the current request from elsewhere.
    pub fn abort_handle(&self) -> Option<AbortHandle> {
        self.in_flight.clone()
    }

    pub async fn submit(&mut self, posts: &PostService) -> Result<ServerPost, AppError> {
        let prepared = self.prepare_submit()?;
        let result = posts
            .submit_abortable(prepared.payload, prepared.abort_registration)
            .await;
        self.finish_submit(result)
    }
}
