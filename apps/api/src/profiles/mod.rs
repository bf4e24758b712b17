// Profile registry: personality profiles used to steer generated replies.

pub mod handlers;
pub mod prompts;
pub mod registry;
