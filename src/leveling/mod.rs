//! Level-up notifications.
//!
//! The leveling flow is the main caller of the tag engine: when a member
//! crosses a level threshold, a guild-configurable message is rendered with
//! `user`, `server`, `reward`, `level` and `oldLevel` bound as tags.

mod context;
mod xp;

pub use context::{
    render_level_up, LevelUpContext, LevelUpReward, LevelUpServer, LevelUpUser,
    DEFAULT_LEVEL_UP_MESSAGE,
};
pub use xp::{
    random_xp, target_xp, total_xp, LevelProgress, MultiplierKind, XpMultiplier, XpRates,
    XP_PER_MESSAGE,
};
