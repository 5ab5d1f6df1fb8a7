//! SysTick time base.
//!
//! Programs the Cortex-M SysTick timer to underflow at the scheduler tick
//! rate, clocked from the core clock. The interrupt itself belongs to the
//! scheduler.

use crate::pac::scb::SHPR3;
use crate::pac::syst::{CSR, CVR, RVR};
use crate::pac::{self, Bus};
use crate::Error;

/// Priority bits implemented by the Cortex-M0+ NVIC.
pub const PRIORITY_BITS: u8 = 2;

/// RVR is 24 bits wide.
pub const MAX_RELOAD: u32 = 0x00ff_ffff;

/// Derived SysTick settings.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
pub struct TickConfig {
    /// RVR value, `core_hz / tick_hz - 1`.
    pub reload: u32,
    /// Exception priority, `0` is the most urgent.
    pub priority: u8,
}

impl TickConfig {
    /// Derive the reload value for `tick_hz` from `core_hz`.
    ///
    /// The division truncates. When `tick_hz` does not divide `core_hz` the
    /// tick runs slightly fast and is not corrected.
    pub const fn new(core_hz: u32, tick_hz: u32, priority: u8) -> Result<Self, Error> {
        if tick_hz == 0 || core_hz / tick_hz < 2 {
            return Err(Error::InvalidTickRate);
        }

        let reload = core_hz / tick_hz - 1;
        if reload > MAX_RELOAD {
            return Err(Error::ReloadOutOfRange);
        }

        if priority >= 1 << PRIORITY_BITS {
            return Err(Error::InvalidPriority);
        }

        Ok(Self { reload, priority })
    }

    /// Tick rate the reload value actually produces.
    pub const fn actual_hz(&self, core_hz: u32) -> u32 {
        core_hz / (self.reload + 1)
    }

    /// Priority byte as stored in SHPR3, implemented bits left-aligned.
    const fn priority_byte(&self) -> u8 {
        self.priority << (8 - PRIORITY_BITS)
    }
}

/// Program SysTick from a validated [`TickConfig`] and start it.
pub fn apply<B: Bus + ?Sized>(bus: &B, tick: &TickConfig) {
    pac::SCB
        .shpr3()
        .modify(bus, SHPR3::PRI_15.val(tick.priority_byte() as u32));

    pac::SYST.rvr().write(bus, RVR::RELOAD.val(tick.reload));
    pac::SYST.cvr().write(bus, CVR::CURRENT.val(0));
    pac::SYST
        .csr()
        .write(bus, CSR::CLKSOURCE::Core + CSR::TICKINT::SET + CSR::ENABLE::SET);
}

/// Start the scheduler tick.
///
/// `core_hz` must be the frequency established by [`crate::clocks::init`];
/// running this earlier computes the reload against the reset clock. Nothing
/// is written when the arguments are rejected.
pub fn init<B: Bus + ?Sized>(
    bus: &B,
    core_hz: u32,
    tick_hz: u32,
    priority: u8,
) -> Result<TickConfig, Error> {
    let tick = TickConfig::new(core_hz, tick_hz, priority)?;

    debug!("systick reload {} priority {}", tick.reload, tick.priority);
    apply(bus, &tick);

    Ok(tick)
}
