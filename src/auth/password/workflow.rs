//! Change-password form workflow.
//!
//! An explicit state machine replaces the usual loading/confirming flags:
//!
//! ```text
//! Editing --submit(valid, confirmation required)--> AwaitingConfirmation
//! Editing --submit(valid)--> Submitting
//! AwaitingConfirmation --confirm--> Submitting
//! AwaitingConfirmation --cancel--> Editing
//! Submitting --complete(Ok)--> Succeeded
//! Submitting --complete(Err)--> Failed --> Editing
//! ```
//!
//! At most one change-password call is outstanding per workflow: a second
//! submit while Submitting is rejected with [`WorkflowError::InFlight`].

use crate::auth::dto::ChangePasswordRequest;
use crate::auth::password::validator::{PasswordRules, PolicyResult};
use crate::types::ApiError;
use crate::utils::error_handler::{normalize_error, GENERIC_ERROR_MESSAGE};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

pub const MSG_CURRENT_REQUIRED: &str = "Vui lòng nhập mật khẩu hiện tại";
pub const MSG_NEW_REQUIRED: &str = "Vui lòng nhập mật khẩu mới";
pub const MSG_CONFIRM_REQUIRED: &str = "Vui lòng xác nhận mật khẩu mới";
pub const MSG_CONFIRM_MISMATCH: &str = "Mật khẩu xác nhận không khớp";
pub const MSG_CHANGED: &str = "Đổi mật khẩu thành công";

/// Remote side of the workflow
#[async_trait]
pub trait PasswordChanger: Send + Sync {
    /// Changes the password, returning the server's success message if any
    async fn change_password(&self, request: &ChangePasswordRequest) -> Result<Option<String>, ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PasswordField {
    CurrentPassword,
    NewPassword,
    ConfirmPassword,
}

impl PasswordField {
    pub const ALL: [PasswordField; 3] =
        [PasswordField::CurrentPassword, PasswordField::NewPassword, PasswordField::ConfirmPassword];

    /// Field name used in request bodies and validation responses
    pub fn wire_name(&self) -> &'static str {
        match self {
            PasswordField::CurrentPassword => "currentPassword",
            PasswordField::NewPassword => "newPassword",
            PasswordField::ConfirmPassword => "confirmPassword",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.wire_name() == name)
    }
}

impl fmt::Display for PasswordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Editing,
    AwaitingConfirmation,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("A password change is already in progress")]
    InFlight,

    #[error("The password has already been changed")]
    Finished,

    #[error("Action not allowed in state {0:?}")]
    InvalidTransition(WorkflowState),
}

/// What a submit did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStep {
    /// Validation failed, field errors are set
    Invalid,
    /// Waiting for the user to confirm; nothing was sent
    ConfirmationRequired,
    /// Now Submitting; send this request and pass the result to `complete`
    Ready(ChangePasswordRequest),
}

/// Transient message for the notification area
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

/// How a remote call ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Password changed, form cleared
    Succeeded { message: String },
    /// Server rejected specific fields; errors are on the form. Messages for
    /// fields the form does not have are joined into `unmatched`.
    FieldErrors { unmatched: Option<String> },
    /// General failure, form kept for retry
    Failed { message: String },
    /// Session is gone; the caller should send the user to login
    SessionExpired { message: String },
}

impl Completion {
    pub fn notification(&self) -> Option<Notification> {
        match self {
            Completion::Succeeded {
                message,
            } => Some(Notification::Success(message.clone())),
            Completion::Failed {
                message,
            }
            | Completion::SessionExpired {
                message,
            } => Some(Notification::Error(message.clone())),
            Completion::FieldErrors {
                unmatched,
            } => unmatched.clone().map(Notification::Error),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct FormValues {
    current_password: String,
    new_password: String,
    confirm_password: String,
}

impl FormValues {
    fn get(&self, field: PasswordField) -> &str {
        match field {
            PasswordField::CurrentPassword => &self.current_password,
            PasswordField::NewPassword => &self.new_password,
            PasswordField::ConfirmPassword => &self.confirm_password,
        }
    }

    fn slot(&mut self, field: PasswordField) -> &mut String {
        match field {
            PasswordField::CurrentPassword => &mut self.current_password,
            PasswordField::NewPassword => &mut self.new_password,
            PasswordField::ConfirmPassword => &mut self.confirm_password,
        }
    }
}

/// One change-password form activation
pub struct ChangePasswordWorkflow {
    rules: PasswordRules,
    require_confirmation: bool,
    state: WorkflowState,
    values: FormValues,
    errors: BTreeMap<PasswordField, String>,
}

impl fmt::Debug for ChangePasswordWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangePasswordWorkflow")
            .field("state", &self.state)
            .field("require_confirmation", &self.require_confirmation)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

impl ChangePasswordWorkflow {
    pub fn new(rules: PasswordRules, require_confirmation: bool) -> Self {
        Self {
            rules,
            require_confirmation,
            state: WorkflowState::Editing,
            values: FormValues::default(),
            errors: BTreeMap::new(),
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn value(&self, field: PasswordField) -> &str {
        self.values.get(field)
    }

    pub fn error(&self, field: PasswordField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<PasswordField, String> {
        &self.errors
    }

    /// Submit controls are disabled while a call is outstanding or after success
    pub fn can_submit(&self) -> bool {
        matches!(
            self.state,
            WorkflowState::Editing | WorkflowState::AwaitingConfirmation | WorkflowState::Failed
        )
    }

    /// Strength meter for the new password as currently typed
    pub fn strength(&self) -> PolicyResult {
        self.rules.evaluate(&self.values.new_password)
    }

    fn transition(&mut self, next: WorkflowState) {
        log::debug!("change-password workflow: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn guard_editable(&self) -> Result<(), WorkflowError> {
        match self.state {
            WorkflowState::Editing | WorkflowState::Failed => Ok(()),
            WorkflowState::Submitting => Err(WorkflowError::InFlight),
            WorkflowState::Succeeded => Err(WorkflowError::Finished),
            WorkflowState::AwaitingConfirmation => Err(WorkflowError::InvalidTransition(self.state)),
        }
    }

    /// Updates one field and clears only that field's error
    pub fn set_field(&mut self, field: PasswordField, value: impl Into<String>) -> Result<(), WorkflowError> {
        self.guard_editable()?;
        *self.values.slot(field) = value.into();
        self.errors.remove(&field);
        Ok(())
    }

    fn validate(&self) -> BTreeMap<PasswordField, String> {
        let mut errors = BTreeMap::new();
        let values = &self.values;

        if values.current_password.is_empty() {
            errors.insert(PasswordField::CurrentPassword, MSG_CURRENT_REQUIRED.to_string());
        }

        if values.new_password.is_empty() {
            errors.insert(PasswordField::NewPassword, MSG_NEW_REQUIRED.to_string());
        } else {
            let policy = self.rules.evaluate(&values.new_password);
            if !policy.is_valid() {
                errors.insert(PasswordField::NewPassword, policy.joined_violations());
            }
        }

        if values.confirm_password.is_empty() {
            errors.insert(PasswordField::ConfirmPassword, MSG_CONFIRM_REQUIRED.to_string());
        } else if values.confirm_password != values.new_password {
            errors.insert(PasswordField::ConfirmPassword, MSG_CONFIRM_MISMATCH.to_string());
        }

        errors
    }

    fn request(&self) -> ChangePasswordRequest {
        ChangePasswordRequest {
            current_password: self.values.current_password.clone(),
            new_password: self.values.new_password.clone(),
            confirm_password: self.values.confirm_password.clone(),
        }
    }

    /// Submit button handler
    pub fn submit(&mut self) -> Result<SubmitStep, WorkflowError> {
        match self.state {
            WorkflowState::AwaitingConfirmation => return self.confirm().map(SubmitStep::Ready),
            WorkflowState::Submitting => return Err(WorkflowError::InFlight),
            WorkflowState::Succeeded => return Err(WorkflowError::Finished),
            WorkflowState::Editing | WorkflowState::Failed => {},
        }

        let errors = self.validate();
        if !errors.is_empty() {
            log::debug!("change-password form invalid: {} field(s)", errors.len());
            self.errors = errors;
            self.transition(WorkflowState::Editing);
            return Ok(SubmitStep::Invalid);
        }

        self.errors.clear();
        if self.require_confirmation {
            self.transition(WorkflowState::AwaitingConfirmation);
            return Ok(SubmitStep::ConfirmationRequired);
        }

        self.transition(WorkflowState::Submitting);
        Ok(SubmitStep::Ready(self.request()))
    }

    /// User confirmed the change
    pub fn confirm(&mut self) -> Result<ChangePasswordRequest, WorkflowError> {
        match self.state {
            WorkflowState::AwaitingConfirmation => {
                self.transition(WorkflowState::Submitting);
                Ok(self.request())
            },
            WorkflowState::Submitting => Err(WorkflowError::InFlight),
            state => Err(WorkflowError::InvalidTransition(state)),
        }
    }

    /// User dismissed the confirmation; values are kept
    pub fn cancel(&mut self) -> Result<(), WorkflowError> {
        match self.state {
            WorkflowState::AwaitingConfirmation => {
                self.transition(WorkflowState::Editing);
                Ok(())
            },
            WorkflowState::Submitting => Err(WorkflowError::InFlight),
            state => Err(WorkflowError::InvalidTransition(state)),
        }
    }

    /// Applies the result of the remote call started by `submit`/`confirm`
    pub fn complete(&mut self, result: Result<Option<String>, ApiError>) -> Result<Completion, WorkflowError> {
        if self.state != WorkflowState::Submitting {
            return Err(WorkflowError::InvalidTransition(self.state));
        }

        match result {
            Ok(message) => {
                self.values = FormValues::default();
                self.errors.clear();
                self.transition(WorkflowState::Succeeded);
                log::info!("Password changed");
                Ok(Completion::Succeeded {
                    message: message
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| MSG_CHANGED.to_string()),
                })
            },
            Err(error) => {
                self.transition(WorkflowState::Failed);
                let completion = self.absorb_failure(&error);
                self.transition(WorkflowState::Editing);
                Ok(completion)
            },
        }
    }

    fn absorb_failure(&mut self, error: &ApiError) -> Completion {
        log::warn!("Password change failed: {}", error);

        if error.is_unauthenticated() {
            return Completion::SessionExpired {
                message: error.server_message().unwrap_or(GENERIC_ERROR_MESSAGE).to_string(),
            };
        }

        let normalized = normalize_error(error);
        let mut unknown = Vec::new();
        let mut errors = BTreeMap::new();
        for (name, message) in normalized.field_errors {
            match PasswordField::from_wire_name(&name) {
                Some(field) => {
                    errors.insert(field, message);
                },
                None => unknown.push(message),
            }
        }

        if !errors.is_empty() {
            if !unknown.is_empty() {
                log::warn!("Server reported errors for unknown fields: {}", unknown.join(", "));
            }
            self.errors = errors;
            return Completion::FieldErrors {
                unmatched: (!unknown.is_empty()).then(|| unknown.join(", ")),
            };
        }

        let message = normalized
            .general_message
            .or_else(|| (!unknown.is_empty()).then(|| unknown.join(", ")))
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
        Completion::Failed {
            message,
        }
    }

    /// Drives one submit through to completion
    ///
    /// Returns `None` when the submit stopped before any remote call (invalid
    /// form or confirmation pending). Call again to confirm.
    pub async fn run(&mut self, changer: &dyn PasswordChanger) -> Result<Option<Completion>, WorkflowError> {
        let request = match self.submit()? {
            SubmitStep::Ready(request) => request,
            SubmitStep::Invalid | SubmitStep::ConfirmationRequired => return Ok(None),
        };
        let result = changer.change_password(&request).await;
        self.complete(result).map(Some)
    }

    /// Back to an empty Editing form, e.g. after an abandoned call
    pub fn reset(&mut self) {
        self.values = FormValues::default();
        self.errors.clear();
        self.transition(WorkflowState::Editing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldError;
    use crate::utils::error_handler::NETWORK_ERROR_MESSAGE;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedChanger {
        calls: AtomicUsize,
        response: Mutex<Option<Result<Option<String>, ApiError>>>,
    }

    impl ScriptedChanger {
        fn new(response: Result<Option<String>, ApiError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Mutex::new(Some(response)),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PasswordChanger for ScriptedChanger {
        async fn change_password(&self, _request: &ChangePasswordRequest) -> Result<Option<String>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.lock().unwrap().take().unwrap_or(Ok(None))
        }
    }

    fn filled(require_confirmation: bool) -> ChangePasswordWorkflow {
        let mut workflow = ChangePasswordWorkflow::new(PasswordRules::default(), require_confirmation);
        workflow.set_field(PasswordField::CurrentPassword, "OldPass1").unwrap();
        workflow.set_field(PasswordField::NewPassword, "NewPass1").unwrap();
        workflow.set_field(PasswordField::ConfirmPassword, "NewPass1").unwrap();
        workflow
    }

    #[test]
    fn test_weak_new_password_blocked() {
        let mut workflow = ChangePasswordWorkflow::new(PasswordRules::default(), true);
        workflow.set_field(PasswordField::CurrentPassword, "OldPass1").unwrap();
        workflow.set_field(PasswordField::NewPassword, "abc").unwrap();
        workflow.set_field(PasswordField::ConfirmPassword, "abc").unwrap();

        assert_eq!(workflow.submit().unwrap(), SubmitStep::Invalid);
        assert_eq!(workflow.state(), WorkflowState::Editing);
        assert_eq!(
            workflow.error(PasswordField::NewPassword),
            Some("at least 6 characters, at least one uppercase letter, at least one digit")
        );
        assert_eq!(workflow.error(PasswordField::CurrentPassword), None);
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let mut workflow = ChangePasswordWorkflow::new(PasswordRules::default(), false);
        assert_eq!(workflow.submit().unwrap(), SubmitStep::Invalid);
        assert_eq!(workflow.error(PasswordField::CurrentPassword), Some(MSG_CURRENT_REQUIRED));
        assert_eq!(workflow.error(PasswordField::NewPassword), Some(MSG_NEW_REQUIRED));
        assert_eq!(workflow.error(PasswordField::ConfirmPassword), Some(MSG_CONFIRM_REQUIRED));
    }

    #[test]
    fn test_mismatched_confirmation() {
        let mut workflow = filled(false);
        workflow.set_field(PasswordField::ConfirmPassword, "NewPass2").unwrap();
        assert_eq!(workflow.submit().unwrap(), SubmitStep::Invalid);
        assert_eq!(workflow.error(PasswordField::ConfirmPassword), Some(MSG_CONFIRM_MISMATCH));
    }

    #[test]
    fn test_editing_clears_only_that_field() {
        let mut workflow = ChangePasswordWorkflow::new(PasswordRules::default(), false);
        workflow.submit().unwrap();
        assert_eq!(workflow.errors().len(), 3);

        workflow.set_field(PasswordField::NewPassword, "N").unwrap();
        assert_eq!(workflow.error(PasswordField::NewPassword), None);
        assert!(workflow.error(PasswordField::CurrentPassword).is_some());
        assert!(workflow.error(PasswordField::ConfirmPassword).is_some());
    }

    #[test]
    fn test_confirmation_then_cancel_keeps_values() {
        let mut workflow = filled(true);
        assert_eq!(workflow.submit().unwrap(), SubmitStep::ConfirmationRequired);
        assert_eq!(workflow.state(), WorkflowState::AwaitingConfirmation);
        assert!(workflow.set_field(PasswordField::NewPassword, "x").is_err());

        workflow.cancel().unwrap();
        assert_eq!(workflow.state(), WorkflowState::Editing);
        assert_eq!(workflow.value(PasswordField::NewPassword), "NewPass1");
    }

    #[test]
    fn test_second_submit_while_submitting_rejected() {
        let mut workflow = filled(false);
        assert!(matches!(workflow.submit().unwrap(), SubmitStep::Ready(_)));
        assert_eq!(workflow.state(), WorkflowState::Submitting);
        assert!(!workflow.can_submit());

        assert_eq!(workflow.submit(), Err(WorkflowError::InFlight));
        assert_eq!(workflow.confirm(), Err(WorkflowError::InFlight));
        assert_eq!(
            workflow.set_field(PasswordField::CurrentPassword, "x"),
            Err(WorkflowError::InFlight)
        );
    }

    #[test]
    fn test_complete_outside_submitting_rejected() {
        let mut workflow = filled(false);
        assert_eq!(
            workflow.complete(Ok(None)),
            Err(WorkflowError::InvalidTransition(WorkflowState::Editing))
        );
    }

    #[tokio::test]
    async fn test_confirmed_submit_makes_exactly_one_call() {
        let changer = ScriptedChanger::new(Ok(Some("Đổi mật khẩu thành công!".to_string())));
        let mut workflow = filled(true);

        assert_eq!(workflow.run(&changer).await.unwrap(), None);
        assert_eq!(workflow.state(), WorkflowState::AwaitingConfirmation);
        assert_eq!(changer.calls(), 0);

        let completion = workflow.run(&changer).await.unwrap().unwrap();
        assert_eq!(changer.calls(), 1);
        assert_eq!(
            completion.notification(),
            Some(Notification::Success("Đổi mật khẩu thành công!".to_string()))
        );
        assert_eq!(workflow.state(), WorkflowState::Succeeded);
        for field in PasswordField::ALL {
            assert_eq!(workflow.value(field), "");
        }
        assert_eq!(workflow.submit(), Err(WorkflowError::Finished));
    }

    #[tokio::test]
    async fn test_duplicate_password_failure_becomes_field_error() {
        let changer = ScriptedChanger::new(Err(ApiError::Rejected {
            status: 400,
            message: "Mật khẩu mới không được trùng với mật khẩu cũ".to_string(),
        }));
        let mut workflow = filled(true);
        workflow.submit().unwrap();

        let completion = workflow.run(&changer).await.unwrap().unwrap();
        assert_eq!(completion, Completion::FieldErrors { unmatched: None });
        assert_eq!(completion.notification(), None);
        assert_eq!(workflow.state(), WorkflowState::Editing);
        assert_eq!(
            workflow.error(PasswordField::NewPassword),
            Some("Mật khẩu mới không được trùng với mật khẩu cũ")
        );
        assert_eq!(workflow.value(PasswordField::CurrentPassword), "OldPass1");
    }

    #[test]
    fn test_server_field_errors_populate_form() {
        let mut workflow = filled(false);
        workflow.submit().unwrap();
        let completion = workflow
            .complete(Err(ApiError::Validation {
                status: 422,
                message: "Validation failed".to_string(),
                errors: vec![FieldError::new("currentPassword", "Mật khẩu hiện tại không đúng")],
            }))
            .unwrap();

        assert_eq!(completion, Completion::FieldErrors { unmatched: None });
        assert_eq!(
            workflow.error(PasswordField::CurrentPassword),
            Some("Mật khẩu hiện tại không đúng")
        );
    }

    #[test]
    fn test_network_failure_keeps_form_for_retry() {
        let mut workflow = filled(false);
        workflow.submit().unwrap();
        let completion = workflow.complete(Err(ApiError::Network("timed out".to_string()))).unwrap();

        assert_eq!(
            completion,
            Completion::Failed {
                message: NETWORK_ERROR_MESSAGE.to_string()
            }
        );
        assert_eq!(workflow.state(), WorkflowState::Editing);
        assert_eq!(workflow.value(PasswordField::CurrentPassword), "OldPass1");
        assert!(workflow.errors().is_empty());
        assert!(matches!(workflow.submit().unwrap(), SubmitStep::Ready(_)));
    }

    #[test]
    fn test_unknown_server_fields_surface_as_general_message() {
        let mut workflow = filled(false);
        workflow.submit().unwrap();
        let completion = workflow
            .complete(Err(ApiError::Validation {
                status: 422,
                message: "Validation failed".to_string(),
                errors: vec![FieldError::new("userId", "Không tìm thấy người dùng")],
            }))
            .unwrap();
        assert_eq!(
            completion,
            Completion::Failed {
                message: "Không tìm thấy người dùng".to_string()
            }
        );
    }

    #[test]
    fn test_mixed_server_fields_keep_unmatched_messages() {
        let mut workflow = filled(false);
        workflow.submit().unwrap();
        let completion = workflow
            .complete(Err(ApiError::Validation {
                status: 422,
                message: "Validation failed".to_string(),
                errors: vec![
                    FieldError::new("currentPassword", "Mật khẩu hiện tại không đúng"),
                    FieldError::new("userId", "Không tìm thấy người dùng"),
                ],
            }))
            .unwrap();

        assert_eq!(
            completion,
            Completion::FieldErrors {
                unmatched: Some("Không tìm thấy người dùng".to_string())
            }
        );
        assert_eq!(
            completion.notification(),
            Some(Notification::Error("Không tìm thấy người dùng".to_string()))
        );
        assert_eq!(
            workflow.error(PasswordField::CurrentPassword),
            Some("Mật khẩu hiện tại không đúng")
        );
    }

    #[test]
    fn test_unauthenticated_failure_expires_session() {
        let mut workflow = filled(false);
        workflow.submit().unwrap();
        let completion = workflow
            .complete(Err(ApiError::Unauthenticated("Phiên đăng nhập đã hết hạn".to_string())))
            .unwrap();
        assert!(matches!(completion, Completion::SessionExpired { .. }));
        assert!(workflow.errors().is_empty());
    }

    #[test]
    fn test_relaxed_rules_accept_lowercase_password() {
        let mut workflow = ChangePasswordWorkflow::new(PasswordRules::relaxed(), false);
        workflow.set_field(PasswordField::CurrentPassword, "old").unwrap();
        workflow.set_field(PasswordField::NewPassword, "abc123").unwrap();
        workflow.set_field(PasswordField::ConfirmPassword, "abc123").unwrap();
        assert!(matches!(workflow.submit().unwrap(), SubmitStep::Ready(_)));
    }

    #[test]
    fn test_reset_recovers_from_abandoned_call() {
        let mut workflow = filled(false);
        workflow.submit().unwrap();
        workflow.reset();
        assert_eq!(workflow.state(), WorkflowState::Editing);
        assert_eq!(workflow.value(PasswordField::NewPassword), "");
    }
}
