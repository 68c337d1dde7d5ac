//! sftp-put client main loop
// (c) 2026 The sftp-put authors

mod main_loop;
mod progress;

pub(crate) use main_loop::client_main;
pub(crate) use progress::{progress_bar_for, MAX_UPDATE_FPS};
