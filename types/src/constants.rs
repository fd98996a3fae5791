/// Session token lifetime in seconds (7 days).
pub const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Upper bound on the defeated-monster count a game client may report.
pub const MAX_DEFEATED_MONSTERS: u32 = 500;

/// Kills required before a client-asserted victory is honored.
pub const DEFAULT_TOTAL_REQUIRED: u32 = 100;

/// Extra reward packs granted on a confirmed victory.
pub const DEFAULT_VICTORY_BONUS_PACKS: u32 = 3;

/// Default kill-count thresholds and the pack count each unlocks.
/// Overridable at startup; must stay sorted ascending by threshold.
pub const DEFAULT_REWARD_STEPS: [(u32, u32); 5] = [(1, 1), (10, 2), (25, 3), (50, 4), (100, 5)];

/// Character granted to every account at registration.
pub const DEFAULT_CHARACTER_ID: i64 = 1;

/// Maximum username length accepted at registration.
pub const MAX_USERNAME_LENGTH: usize = 32;

/// Maximum self-introduction length accepted on profile edits.
pub const MAX_INTRODUCTION_LENGTH: usize = 500;
