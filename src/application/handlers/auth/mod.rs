//! Account handlers - registration, login, email verification, and
//! password reset.

mod forgot_password;
mod get_current_user;
mod login;
mod register;
mod resend_verification;
mod reset_password;
mod verify_email;

pub use forgot_password::ForgotPasswordHandler;
pub use get_current_user::CurrentUser;
pub use login::{LoginCommand, LoginHandler};
pub use register::{RegisterCommand, RegisterHandler};
pub use resend_verification::ResendVerificationHandler;
pub use reset_password::{ResetPasswordCommand, ResetPasswordHandler};
pub use verify_email::{VerifyEmailHandler, VerifyEmailOutcome};
