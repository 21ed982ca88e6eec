//! Read-only stat access for the movement core.

/// Source of the actor's current movement-speed attribute.
///
/// The attribute is an integer percentage-style stat; the core divides it
/// by [`MovementConfig::speed_divisor`](crate::config::MovementConfig) to
/// get a speed multiplier.
pub trait StatsProvider: Send {
    /// Current movement-speed attribute.
    fn movement_speed(&self) -> i64;
}

impl<T: StatsProvider + ?Sized> StatsProvider for Box<T> {
    fn movement_speed(&self) -> i64 {
        (**self).movement_speed()
    }
}

/// Fixed stat block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicStats {
    /// Movement-speed attribute (100 = base speed)
    pub movement_speed: i64,
}

impl BasicStats {
    /// Stats with the given movement-speed attribute.
    #[must_use]
    pub const fn new(movement_speed: i64) -> Self {
        Self { movement_speed }
    }
}

impl Default for BasicStats {
    fn default() -> Self {
        Self::new(100)
    }
}

impl StatsProvider for BasicStats {
    fn movement_speed(&self) -> i64 {
        self.movement_speed
    }
}
