// TxtUrl library exports

pub mod codec;
pub mod config;
pub mod debounce;
pub mod export;
pub mod render;
pub mod session;
pub mod share;
pub mod status_manager;
pub mod surface;

pub use codec::{Codec, DeflateCodec};
pub use config::Config;
pub use session::{Session, SessionEvent};
pub use share::{ClipboardContent, ShareLocation};
pub use status_manager::StatusManager;
pub use surface::{EditorSurface, HeadlessSurface};
