//! Weighted random bot selection.
//!
//! Selection walks the roster in registration order, subtracting each
//! bot's weight from a roll drawn in `[0, total_weight)`. A bot with weight
//! 9 in a pool totalling 10 wins ~90% of draws.

use rand::Rng;
use waggle_types::bot::{Bot, BotStatus};

/// Walk `eligible` subtracting weights from `roll`; the first bot that
/// drives the roll to zero or below wins.
///
/// If floating-point rounding leaves the roll positive after the walk, the
/// first eligible bot wins.
pub(crate) fn pick_weighted<'a>(eligible: &[&'a Bot], mut roll: f64) -> Option<&'a Bot> {
    for bot in eligible {
        roll -= f64::from(bot.weight);
        if roll <= 0.0 {
            return Some(bot);
        }
    }
    eligible.first().copied()
}

/// Weighted random selection over online bots, in registration order.
///
/// Bots in `exclude` or not online are skipped. Returns `None` when no bot
/// is eligible.
pub fn select_weighted<'a>(bots: &'a [Bot], exclude: &[String]) -> Option<&'a Bot> {
    let eligible: Vec<&Bot> = bots
        .iter()
        .filter(|b| b.status == BotStatus::Online && !exclude.iter().any(|id| id == &b.id))
        .collect();

    if eligible.is_empty() {
        return None;
    }

    let total: f64 = eligible.iter().map(|b| f64::from(b.weight)).sum();
    let roll = rand::thread_rng().gen_range(0.0..total);
    pick_weighted(&eligible, roll)
}
