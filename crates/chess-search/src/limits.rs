//! Search limits.

use std::time::Duration;

/// Constraints for one search. Every field is optional; with none set the
/// search runs until stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub white_time: Option<Duration>,
    pub black_time: Option<Duration>,
    pub white_increment: Option<Duration>,
    pub black_increment: Option<Duration>,
    pub moves_to_go: Option<u32>,
    /// Maximum depth in plies.
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    /// Stop once a mate in this many moves has been found.
    pub mate: Option<u32>,
    pub move_time: Option<Duration>,
    /// Search until stopped, whatever else is set.
    pub infinite: bool,
    /// Search on the opponent's time until `ponder_hit` or `stop`.
    pub ponder: bool,
    /// Restricts the root to these moves, in coordinate notation.
    pub search_moves: Vec<String>,
}

impl SearchLimits {
    pub fn depth(depth: u32) -> Self {
        SearchLimits {
            depth: Some(depth),
            ..Default::default()
        }
    }

    pub fn move_time(time: Duration) -> Self {
        SearchLimits {
            move_time: Some(time),
            ..Default::default()
        }
    }

    pub fn nodes(nodes: u64) -> Self {
        SearchLimits {
            nodes: Some(nodes),
            ..Default::default()
        }
    }

    pub fn infinite() -> Self {
        SearchLimits {
            infinite: true,
            ..Default::default()
        }
    }

    /// True if some clock or budget will end the search on its own.
    pub fn is_bounded(&self) -> bool {
        !self.infinite
            && (self.white_time.is_some()
                || self.black_time.is_some()
                || self.depth.is_some()
                || self.nodes.is_some()
                || self.mate.is_some()
                || self.move_time.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        assert_eq!(SearchLimits::depth(6).depth, Some(6));
        assert!(SearchLimits::depth(6).is_bounded());
        assert!(!SearchLimits::infinite().is_bounded());
        assert!(!SearchLimits::default().is_bounded());
        let mut limits = SearchLimits::nodes(1000);
        limits.infinite = true;
        assert!(!limits.is_bounded());
    }
}
