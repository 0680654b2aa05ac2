// Console output: messages, prompts and the status view

pub mod formatters;
pub mod prompts;
pub mod status_display;

pub use formatters::{format_missing_frames, format_node_status, format_progress};
pub use prompts::{
    error, prompt_frame_range, prompt_render_dir, success, validate_render_dir, warn,
};
pub use status_display::StatusDisplay;
