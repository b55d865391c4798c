//! Long-running tasks that keep running alongside a broadcast.

pub mod chat;
