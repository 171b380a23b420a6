//! Notifications published by a session for renderers and audio.
//!
//! Events accumulate in the session in the order they happen and are
//! drained by whoever is listening; the engine never interprets them.

use serde::{Deserialize, Serialize};

use crate::board::Pos;
use crate::combo::ComboKind;
use crate::tiles::Special;

/// Something that happened while resolving a swap
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A swap was accepted and the cascade started
    SwapAccepted { a: Pos, b: Pos },
    /// Two specials were swapped into each other
    ComboFired { kind: ComboKind, a: Pos, b: Pos },
    /// Points scored by one resolution step
    ScoreDelta { amount: u64, cleared: usize },
    /// A match group left a special tile behind
    SpecialCreated { pos: Pos, kind: Special },
    /// A special tile went off
    SpecialTriggered { pos: Pos, kind: Special },
    /// The cascade finished; the board is ready for the next swap
    BoardStable { score: u64 },
}

impl EngineEvent {
    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            EngineEvent::SwapAccepted { .. } => "swap_accepted",
            EngineEvent::ComboFired { .. } => "combo_fired",
            EngineEvent::ScoreDelta { .. } => "score_delta",
            EngineEvent::SpecialCreated { .. } => "special_created",
            EngineEvent::SpecialTriggered { .. } => "special_triggered",
            EngineEvent::BoardStable { .. } => "board_stable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_is_tagged() {
        let event = EngineEvent::SpecialCreated {
            pos: Pos::new(2, 4),
            kind: Special::StripedRow,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"special_created\""));
        let back: EngineEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.label(), "special_created");
    }
}
