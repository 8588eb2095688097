// src/lib.rs

//! Run the `whitebox_tools` geospatial executable as a subprocess.
//!
//! ```no_run
//! # async fn demo() -> whitebox_runner::errors::Result<()> {
//! use whitebox_runner::ToolRunner;
//!
//! let mut runner = ToolRunner::new(None)?;
//! runner.set_working_directory("/data/dem");
//!
//! let code = runner
//!     .run_tool("Slope", &["--dem=dem.tif", "--output=slope.tif"], |line| {
//!         println!("{line}")
//!     })
//!     .await;
//! assert_eq!(code, 0);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod runner;

pub use errors::{ErrorKind, Result, RunnerError};
pub use exec::{CancelFlag, Invocation, ToolOutcome};
pub use runner::{ToolRunner, print_line};
