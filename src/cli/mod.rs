//! # CLI Module
//!
//! User-facing commands of ytmb. Each function here loads what it needs
//! through [`crate::management`], runs the engine or a program, and reports
//! back with the colored output macros and `tabled` tables. Fatal problems
//! end the process through [`crate::error!`].
//!
//! ## Usage Patterns
//!
//! ```bash
//! ytmb users add alice --snapshot alice.json
//! ytmb playlists alice
//! ytmb mixtape --user alice --source PL1 --source PL2 --target PL3
//! ytmb blend --user alice --with alice --with bob --create "Blend" --save weekly
//! ytmb routines run weekly
//! ```

mod playlists;
mod programs;
mod routines;
mod users;

pub use playlists::clear_playlist;
pub use playlists::list_playlists;
pub use programs::RunOptions;
pub use programs::run_program;
pub use routines::list_routines;
pub use routines::remove_routine;
pub use routines::run_routine;
pub use users::add_user;
pub use users::list_users;
