//! Password rules and the change-password form workflow

pub mod validator;
pub mod workflow;

pub use validator::{evaluate, LetterRule, PasswordRules, PolicyResult, StrengthLabel};
pub use workflow::{
    ChangePasswordWorkflow, Completion, Notification, PasswordChanger, PasswordField, SubmitStep,
    WorkflowError, WorkflowState,
};
