//! Notifications produced by [`PortalSystem::update`](super::PortalSystem::update).

/// A change observed while tracking the camera through the sector graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalEvent {
    /// The camera moved into the sector with this ID.
    SectorEntered(String),
    /// The camera left the sector with this ID.
    SectorExited(String),
    /// The visible set was recomputed; carries the new set in traversal order.
    VisibilityChanged(Vec<String>),
}

impl PortalEvent {
    /// Returns the sector ID for enter/exit events.
    pub fn sector(&self) -> Option<&str> {
        match self {
            Self::SectorEntered(id) | Self::SectorExited(id) => Some(id),
            Self::VisibilityChanged(_) => None,
        }
    }

    pub fn is_sector_change(&self) -> bool {
        matches!(self, Self::SectorEntered(_) | Self::SectorExited(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_accessor() {
        assert_eq!(PortalEvent::SectorEntered("a".into()).sector(), Some("a"));
        assert_eq!(PortalEvent::SectorExited("b".into()).sector(), Some("b"));
        assert_eq!(PortalEvent::VisibilityChanged(vec![]).sector(), None);
    }

    #[test]
    fn sector_change_classification() {
        assert!(PortalEvent::SectorEntered("a".into()).is_sector_change());
        assert!(!PortalEvent::VisibilityChanged(vec!["a".into()]).is_sector_change());
    }
}
