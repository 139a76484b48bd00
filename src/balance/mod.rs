//! Nets a group's expenses into per-participant balances.

mod core;
mod group_balances;

pub use core::{Balance, compute_balances, net_totals};
pub use group_balances::{GroupBalances, get_group_balances, get_group_balances_endpoint};
