// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for finding the `whitebox_tools` executable,
//! building its argument lists, and running it with `tokio::process::Command`.
//!
//! - [`locate`] resolves the executable directory and file name.
//! - [`args`] builds argument lists in the exact form the tool expects.
//! - [`cancel`] holds the cooperative [`CancelFlag`].
//! - [`process`] spawns the child and relays its merged output.

pub mod args;
pub mod cancel;
pub mod locate;
pub mod process;

pub use args::{CommandLine, InfoFlag};
pub use cancel::CancelFlag;
pub use locate::{BUILD_DIR_ENV_VAR, EXE_STEM, executable_file_name, resolve_exe_dir};
pub use process::{
    EXIT_CANCELLED, EXIT_LOCAL_ERROR, EXIT_SUCCESS, Invocation, ToolOutcome, stream_output,
};
