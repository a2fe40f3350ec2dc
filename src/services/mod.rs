pub mod auth;
pub mod conversations;
pub mod messages;
pub mod notify;
pub mod users;

pub use conversations::{ConversationError, ConversationService};
pub use messages::{MessageError, MessageService};
pub use notify::{ConsoleNotifier, Notifier, NotifyError};
pub use users::{IssuedToken, UserError, UserService};
