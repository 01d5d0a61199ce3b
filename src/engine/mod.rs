//! Frame loop and scene management

pub mod frame_loop;
pub mod scene;
pub mod session;

pub use frame_loop::FrameLoop;
pub use scene::{Scene, SceneChange, SceneCommand, SceneManager};
pub use session::Session;
