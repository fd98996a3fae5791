use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The four snack currencies a reward pack can resolve to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnackKind {
    Cola,
    Chips,
    Candy,
    Gum,
}

impl SnackKind {
    pub const ALL: [SnackKind; 4] = [
        SnackKind::Cola,
        SnackKind::Chips,
        SnackKind::Candy,
        SnackKind::Gum,
    ];
}

/// Per-user ledger balances. Absent rows read as all-zero; counters are
/// only ever moved by non-negative deltas or an administrative reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Balances {
    pub cola: i64,
    pub chips: i64,
    pub candy: i64,
    pub gum: i64,
    pub points: i64,
}

/// A non-negative set of deltas to apply to a ledger row in one atomic step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantSet {
    pub cola: i64,
    pub chips: i64,
    pub candy: i64,
    pub gum: i64,
    pub points: i64,
}

impl GrantSet {
    /// A grant of `amount` generic points and nothing else.
    pub fn points(amount: i64) -> Self {
        Self {
            points: amount,
            ..Self::default()
        }
    }

    pub fn add_snack(&mut self, snack: SnackKind, amount: i64) {
        match snack {
            SnackKind::Cola => self.cola += amount,
            SnackKind::Chips => self.chips += amount,
            SnackKind::Candy => self.candy += amount,
            SnackKind::Gum => self.gum += amount,
        }
    }

    pub fn merged(&self, other: &GrantSet) -> GrantSet {
        GrantSet {
            cola: self.cola + other.cola,
            chips: self.chips + other.chips,
            candy: self.candy + other.candy,
            gum: self.gum + other.gum,
            points: self.points + other.points,
        }
    }

    /// Sum of all five deltas. A zero total means the ledger write
    /// should be skipped entirely.
    pub fn total(&self) -> i64 {
        self.cola + self.chips + self.candy + self.gum + self.points
    }

    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }
}

/// One entry of the seeded, immutable character catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Character {
    pub id: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_sums_every_counter() {
        let mut kill = GrantSet::default();
        kill.add_snack(SnackKind::Cola, 2);
        kill.add_snack(SnackKind::Gum, 1);
        let bonus = GrantSet::points(5);

        let total = kill.merged(&bonus);
        assert_eq!(total.cola, 2);
        assert_eq!(total.gum, 1);
        assert_eq!(total.points, 5);
        assert_eq!(total.total(), 8);
        assert!(!total.is_zero());
    }

    #[test]
    fn default_grant_is_zero() {
        assert!(GrantSet::default().is_zero());
    }
}
