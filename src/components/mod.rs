mod choose_account;
mod error_message;
mod login;
mod redirect;
mod welcome;

pub use choose_account::ChooseAccountScreen;
pub use error_message::ErrorMessage;
pub use login::LoginScreen;
pub use redirect::{LoadingScreen, RedirectScreen};
pub use welcome::WelcomeScreen;
