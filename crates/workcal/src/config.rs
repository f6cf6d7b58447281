//! Serializable calendar definitions.
//!
//! Frames are listed as arrays so registration order survives formats whose
//! maps are unordered:
//!
//! ```toml
//! [[time_frames]]
//! name = "day"
//! start = "09:00"
//! end = "18:00"
//! default = true
//!
//! [[date_frames]]
//! name = "weekend"
//! evaluator = { weekdays = ["Sat", "Sun"] }
//! targets = ["closed"]
//! ```

use serde::{Deserialize, Serialize};

use crate::dateframe::DateFrameDef;
use crate::timeframe::TimeFrameDef;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarDefinition {
    #[serde(default)]
    pub time_frames: Vec<NamedTimeFrame>,
    #[serde(default)]
    pub date_frames: Vec<NamedDateFrame>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedTimeFrame {
    pub name: String,
    #[serde(flatten)]
    pub frame: TimeFrameDef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedDateFrame {
    pub name: String,
    #[serde(flatten)]
    pub frame: DateFrameDef,
}
