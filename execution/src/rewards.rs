//! Reward resolver: maps a reported game outcome to a set of grants.
//!
//! The resolver is pure apart from the injected randomness source; the
//! caller owns the ledger write (and skips it when the outcome is zero).

use rand::Rng;
use serde::{Deserialize, Serialize};
use snackquest_types::{
    GrantSet, SnackKind, DEFAULT_REWARD_STEPS, DEFAULT_TOTAL_REQUIRED,
    DEFAULT_VICTORY_BONUS_PACKS, MAX_DEFEATED_MONSTERS,
};

/// Pack thresholds and victory rules. Injected at startup; the step
/// table maps a kill count to a pack count and must be monotonic, which
/// [`RewardSchedule::new`] enforces by sorting the thresholds and raising
/// each pack count to the running maximum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardSchedule {
    /// `(minimum kills, packs unlocked)` pairs, ascending by threshold.
    pub steps: Vec<(u32, u32)>,
    /// Kills required before a client-asserted victory is honored.
    pub total_required: u32,
    /// Packs added on a confirmed victory.
    pub victory_bonus_packs: u32,
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            steps: DEFAULT_REWARD_STEPS.to_vec(),
            total_required: DEFAULT_TOTAL_REQUIRED,
            victory_bonus_packs: DEFAULT_VICTORY_BONUS_PACKS,
        }
    }
}

impl RewardSchedule {
    pub fn new(mut steps: Vec<(u32, u32)>, total_required: u32, victory_bonus_packs: u32) -> Self {
        steps.sort_unstable();
        // A higher threshold never unlocks fewer packs than a lower one,
        // whatever the configured table says.
        let mut floor = 0;
        for (_, packs) in &mut steps {
            floor = (*packs).max(floor);
            *packs = floor;
        }
        Self {
            steps,
            total_required,
            victory_bonus_packs,
        }
    }

    /// Kill-based pack count for a (pre-clamped) defeated count: the pack
    /// value of the highest threshold reached. Monotonic in `defeated`.
    pub fn kill_packs(&self, defeated: u32) -> u32 {
        self.steps
            .iter()
            .take_while(|(threshold, _)| *threshold <= defeated)
            .map(|(_, packs)| *packs)
            .last()
            .unwrap_or(0)
    }
}

/// Resolved outcome: pack counts plus the rolled grants, with kill-based
/// and victory-bonus grants reported separately for client display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardOutcome {
    /// The defeated count actually honored (after clamping).
    pub defeated_monsters: u32,
    pub kill_packs: u32,
    pub bonus_packs: u32,
    pub kill_grant: GrantSet,
    pub bonus_grant: GrantSet,
}

impl RewardOutcome {
    /// Merged grant set for ledger application.
    pub fn total_grant(&self) -> GrantSet {
        self.kill_grant.merged(&self.bonus_grant)
    }

    pub fn is_zero(&self) -> bool {
        self.kill_packs == 0 && self.bonus_packs == 0
    }
}

/// Resolve a reported outcome into grants.
///
/// `defeated` is clamped to `[0, 500]`. The victory flag is honored only
/// when the clamped count reaches the schedule's `total_required`; a
/// purely client-asserted win earns no bonus. Each pack rolls one of the
/// four snacks uniformly from `rng`.
pub fn resolve_outcome<R: Rng>(
    schedule: &RewardSchedule,
    defeated: u32,
    victory: bool,
    rng: &mut R,
) -> RewardOutcome {
    let defeated = defeated.min(MAX_DEFEATED_MONSTERS);
    let confirmed_victory = victory && defeated >= schedule.total_required;

    let kill_packs = schedule.kill_packs(defeated);
    let bonus_packs = if confirmed_victory {
        schedule.victory_bonus_packs
    } else {
        0
    };

    RewardOutcome {
        defeated_monsters: defeated,
        kill_packs,
        bonus_packs,
        kill_grant: roll_packs(kill_packs, rng),
        bonus_grant: roll_packs(bonus_packs, rng),
    }
}

fn roll_packs<R: Rng>(packs: u32, rng: &mut R) -> GrantSet {
    let mut grant = GrantSet::default();
    for _ in 0..packs {
        let snack = SnackKind::ALL[rng.gen_range(0..SnackKind::ALL.len())];
        grant.add_snack(snack, 1);
    }
    grant
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn pack_count_is_monotonic_in_kill_count() {
        let schedule = RewardSchedule::default();
        let mut previous = 0;
        for defeated in 0..=MAX_DEFEATED_MONSTERS {
            let packs = schedule.kill_packs(defeated);
            assert!(packs >= previous, "packs regressed at {defeated}");
            previous = packs;
        }
    }

    #[test]
    fn victory_below_threshold_earns_no_bonus() {
        let schedule = RewardSchedule::default();
        let asserted = resolve_outcome(&schedule, 50, true, &mut rng());
        let honest = resolve_outcome(&schedule, 50, false, &mut rng());
        assert_eq!(asserted.kill_packs, honest.kill_packs);
        assert_eq!(asserted.bonus_packs, 0);
    }

    #[test]
    fn confirmed_victory_adds_the_bonus_packs() {
        let schedule = RewardSchedule::default();
        let outcome = resolve_outcome(&schedule, 100, true, &mut rng());
        assert_eq!(outcome.kill_packs, 5);
        assert_eq!(outcome.bonus_packs, 3);
        // Totals are the invariant; per-snack distribution is the rng's business.
        assert_eq!(outcome.kill_grant.total(), 5);
        assert_eq!(outcome.bonus_grant.total(), 3);
        assert_eq!(outcome.total_grant().total(), 8);
        assert_eq!(outcome.total_grant().points, 0);
    }

    #[test]
    fn zero_outcome_is_well_formed() {
        let schedule = RewardSchedule::default();
        let outcome = resolve_outcome(&schedule, 0, false, &mut rng());
        assert!(outcome.is_zero());
        assert!(outcome.total_grant().is_zero());
        assert_eq!(outcome.defeated_monsters, 0);
    }

    #[test]
    fn reported_kill_count_is_clamped() {
        let schedule = RewardSchedule::default();
        let clamped = resolve_outcome(&schedule, 10_000, false, &mut rng());
        let limit = resolve_outcome(&schedule, MAX_DEFEATED_MONSTERS, false, &mut rng());
        assert_eq!(clamped.defeated_monsters, MAX_DEFEATED_MONSTERS);
        assert_eq!(clamped.kill_packs, limit.kill_packs);
    }

    #[test]
    fn regressive_step_tables_are_raised_to_the_running_maximum() {
        // A configured table may pay fewer packs at a higher threshold;
        // normalization keeps the pack function monotonic anyway.
        let schedule = RewardSchedule::new(vec![(10, 5), (20, 2)], 100, 3);
        assert_eq!(schedule.kill_packs(10), 5);
        assert_eq!(schedule.kill_packs(20), 5);

        let mut previous = 0;
        for defeated in 0..=MAX_DEFEATED_MONSTERS {
            let packs = schedule.kill_packs(defeated);
            assert!(packs >= previous, "packs regressed at {defeated}");
            previous = packs;
        }
    }

    #[test]
    fn unsorted_step_tables_are_normalized() {
        let schedule = RewardSchedule::new(vec![(50, 4), (1, 1), (10, 2)], 100, 3);
        assert_eq!(schedule.kill_packs(0), 0);
        assert_eq!(schedule.kill_packs(1), 1);
        assert_eq!(schedule.kill_packs(49), 2);
        assert_eq!(schedule.kill_packs(400), 4);
    }
}
