use clap::Parser;

use crate::speaker::avatar::{AvatarPolicy, DEFAULT_MAXIMUM_AVATAR_SIZE};

#[derive(Debug, Parser)]
pub struct AvatarConfig {
    #[arg(long, env, default_value_t = DEFAULT_MAXIMUM_AVATAR_SIZE, help = "bytes an avatar may take at most")]
    pub maximum_avatar_size: u64,
}

impl AvatarConfig {
    pub fn policy(&self) -> AvatarPolicy {
        AvatarPolicy {
            maximum_size: self.maximum_avatar_size,
        }
    }
}
