#![cfg_attr(not(test), no_std)]

use core::sync::atomic::{AtomicBool, Ordering};

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod clocks;
pub mod pac;
pub mod port;
pub mod systick;

#[cfg(test)]
mod testing;

use clocks::McgMode;

pub use clocks::{ClockConfig, Clocks};
pub use pac::{Bus, Mmio};

/// Initialize the HAL.
///
/// Runs the board early-init hook, brings the clocks up to PEE and starts the
/// scheduler tick, in that order. Both configurations, and the MCG being in
/// its reset mode, are checked before the hook runs or any register is
/// written.
///
/// It's guaranteed that this will only be able to run once.
pub fn init<B: Bus + ?Sized, E: EarlyInit>(bus: &B, config: Config<E>) -> Result<Clocks, Error> {
    // Enforce single use of init.
    static TAKEN: AtomicBool = AtomicBool::new(false);
    if Ok(false) != TAKEN.compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed) {
        panic!("HAL initialized multiple times");
    }

    bring_up(bus, config)
}

fn bring_up<B: Bus + ?Sized, E: EarlyInit>(bus: &B, config: Config<E>) -> Result<Clocks, Error> {
    let plan = config.clocks.validate()?;
    let tick = systick::TickConfig::new(plan.clocks().core_hz, config.tick_hz, config.tick_priority)?;

    if !config.clocks.no_init && clocks::mode(bus) != Some(McgMode::Fei) {
        return Err(Error::AlreadyConfigured);
    }

    config.early_init.early_init(bus);

    let clocks = clocks::init(bus, &config.clocks)?;
    systick::apply(bus, &tick);

    Ok(clocks)
}

/// Board hook run before anything else in [`init`].
pub trait EarlyInit {
    fn early_init<B: Bus + ?Sized>(&self, bus: &B);
}

/// The default hook, see [`platform_early_init`].
#[derive(Copy, Clone, Debug, Default)]
pub struct NoEarlyInit;

impl EarlyInit for NoEarlyInit {
    fn early_init<B: Bus + ?Sized>(&self, bus: &B) {
        platform_early_init(bus);
    }
}

/// Platform early initialization. Does nothing on KL2x.
pub fn platform_early_init<B: Bus + ?Sized>(_bus: &B) {}

/// System configuration.
pub struct Config<E: EarlyInit = NoEarlyInit> {
    pub clocks: ClockConfig,
    /// Scheduler tick rate.
    pub tick_hz: u32,
    /// SysTick exception priority, 0 to 3.
    pub tick_priority: u8,
    pub early_init: E,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clocks: ClockConfig::default(),
            tick_hz: 1000,
            tick_priority: 2,
            early_init: NoEarlyInit,
        }
    }
}

/// Configuration errors. All of them are reported before any register is
/// written.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// Target MCG mode other than PEE.
    UnsupportedMode,
    /// Crystal outside 3 MHz to 32 MHz.
    CrystalOutOfRange,
    /// No FRDIV puts the FLL reference between 31.25 kHz and 39.0625 kHz.
    FllReferenceOutOfRange,
    /// A divider or multiplier the registers cannot encode.
    InvalidDivider,
    /// PLL reference outside 2 MHz to 4 MHz.
    PllReferenceOutOfRange,
    /// PLL output outside 48 MHz to 100 MHz.
    VcoOutOfRange,
    /// Core clock above 48 MHz.
    CoreClockTooFast,
    /// Bus clock above 24 MHz.
    BusClockTooFast,
    /// MCG has already left FEI.
    AlreadyConfigured,
    /// Tick rate of zero, or too close to the core clock.
    InvalidTickRate,
    /// Tick period does not fit the 24 bit reload register.
    ReloadOutOfRange,
    /// Priority beyond the implemented priority bits.
    InvalidPriority,
}
