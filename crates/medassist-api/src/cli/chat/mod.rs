//! Interactive terminal chat.
//!
//! Banner, slash commands, async line input and the loop that drives the
//! chat controller. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
