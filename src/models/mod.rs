//! Domain model types shared between the db layer and the controllers.

mod note;
mod session;
mod user;

pub use note::Note;
pub use session::Session;
pub use user::User;
