//! Host environment probes.
//!
//! Subscribing while the machine is locked or offline is wasted work, so the
//! supervisor consults the host before every reconnect attempt. The desktop
//! shell wires these to its power-monitor and connectivity signals.

/// System idle state as reported by the host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleState {
    Active,
    Idle,
    Locked,
}

/// Connectivity and idle probes supplied by the host shell.
pub trait HostEnvironment: Send + Sync {
    /// Current system idle state.
    fn idle_state(&self) -> IdleState;

    /// Whether the host currently has network connectivity.
    fn is_online(&self) -> bool;

    /// Whether a subscribe attempt is worthwhile right now.
    ///
    /// Locked or offline hosts skip the attempt; merely idle hosts still
    /// subscribe.
    fn allows_subscribe(&self) -> bool {
        self.is_online() && self.idle_state() != IdleState::Locked
    }
}

/// Host environment with fixed answers (useful for tests and headless use).
#[derive(Debug, Clone, Copy)]
pub struct StaticHost {
    idle: IdleState,
    online: bool,
}

impl StaticHost {
    /// Create a host reporting the given state on every probe.
    #[must_use]
    pub const fn new(idle: IdleState, online: bool) -> Self {
        Self { idle, online }
    }

    /// A host that is always active and online.
    #[must_use]
    pub const fn always_active() -> Self {
        Self::new(IdleState::Active, true)
    }
}

impl HostEnvironment for StaticHost {
    fn idle_state(&self) -> IdleState {
        self.idle
    }

    fn is_online(&self) -> bool {
        self.online
    }
}
