pub mod config;
pub mod input;
pub mod intake;
pub mod interaction;
pub mod popup;
pub mod session;
pub mod shortcuts;

pub use config::EditorConfig;
pub use input::{ClickTarget, InputEvent, Modifiers};
pub use interaction::{Command, Interaction, Overlay, Selection};
pub use popup::{DetailPopup, PopupField};
pub use session::{EditorSession, Outcome};
