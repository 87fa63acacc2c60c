//! Trading symbols the watcher knows how to poll.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Set of supported exchange symbols.
///
/// A running watcher tracks exactly one of them; the others exist so the
/// deployment can be pointed at a different market from the command line.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    Hash,
    Eq,
    PartialEq,
)]
#[clap(rename_all = "lower")]
#[strum(ascii_case_insensitive)]
pub enum Symbol {
    #[default]
    XRPUSDT,
    BTCUSDT,
    ETHUSDT,
}
