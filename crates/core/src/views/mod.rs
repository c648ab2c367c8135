pub mod frame;

pub use frame::{FrameSpec, render_frame};
