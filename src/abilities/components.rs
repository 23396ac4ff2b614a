//! Abilities domain: booster phases and continuation slots.

/// Speed-booster phase. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoosterPhase {
    #[default]
    Idle,
    ChargingBoost,
    ActiveBoost,
    StoringEnergy,
    ChargingShinespark,
    ActiveShinespark,
    ImpactCooldown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbilityTask {
    Charge,
    Crouch,
    StoredEnergyCooldown,
    ShinesparkCharge,
    DashImpact,
    ImpactCooldown,
    /// Holds `ActiveBoost` until the speed break has run out
    BreakWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityCondition {
    DashBreak,
    SpeedBreakFinished,
}
