//! Clock module for KL2x
//!
//! Currently supported:
//! - bring-up from reset (FEI) to PLL Engaged External (PEE), once per boot
//! - 3 MHz to 32 MHz crystal on EXTAL0/XTAL0 (PTA18/PTA19)
//! - OUTDIV1 (core/system) and OUTDIV4 (bus/flash) output dividers
//! - TPM clock from MCGPLLCLK/2, ERCLK32K from the system oscillator
//!
//! With [`ClockConfig::no_init`] set, the clock tree is left as a bootloader
//! configured it and [`init`] only reports the configured frequencies.
//!
//! The MCG passes FEI -> FBE -> PBE -> PEE in that order. Each transition is
//! confirmed on MCG_S before the next one starts, and every one of those waits
//! is unbounded: a crystal that never starts or a PLL that never locks keeps
//! [`init`] spinning forever.
//!
//! Not implemented, per KL25 reference manual 24.5.3.1:
//! - waiting for S[OSCINIT0] after selecting the crystal
//! - waiting for S[PLLST] before S[LOCK0]
//! - C2[HGO0] high-gain crystal operation

use crate::pac::mcg::C1::CLKS::Value as Clks;
use crate::pac::mcg::C2::RANGE0::Value as Range;
use crate::pac::mcg::{C1, C2, C4, C5, C6, S};
use crate::pac::sim::{CLKDIV1, SOPT1, SOPT2};
use crate::pac::{self, Bus};
use crate::port::{Mux, Pin, Port};
use crate::Error;

/// EXTAL0
const EXTAL0: Pin = Pin::new(Port::A, 18);
/// XTAL0
const XTAL0: Pin = Pin::new(Port::A, 19);

/// FLL reference window when running from the external reference.
const FLL_REF_MIN_HZ: u32 = 31_250;
/// Upper bound is 39.0625 kHz, compared as twice the frequency.
const FLL_REF_MAX_HZ_X2: u32 = 78_125;

const PLL_REF_MIN_HZ: u32 = 2_000_000;
const PLL_REF_MAX_HZ: u32 = 4_000_000;
const VCO_MIN_HZ: u32 = 48_000_000;
const VCO_MAX_HZ: u32 = 100_000_000;
const CORE_MAX_HZ: u32 = 48_000_000;
const BUS_MAX_HZ: u32 = 24_000_000;

/// FRDIV divide factors for RANGE0 other than `Low`.
const FRDIV_FACTORS: [u32; 8] = [32, 64, 128, 256, 512, 1024, 1280, 1536];

/// MCG operating modes visited during bring-up.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
pub enum McgMode {
    /// FLL Engaged Internal, the reset mode.
    Fei,
    /// FLL Bypassed External.
    Fbe,
    /// PLL Bypassed External.
    Pbe,
    /// PLL Engaged External.
    Pee,
}

/// Board clock configuration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
pub struct ClockConfig {
    /// Crystal frequency on EXTAL0/XTAL0.
    pub xtal_hz: u32,
    /// PLL reference divide factor, 1 to 25.
    pub pll_divider: u8,
    /// PLL multiply factor, 24 to 55.
    pub pll_multiplier: u8,
    /// OUTDIV1 divide factor, 1 to 16.
    pub core_divider: u8,
    /// OUTDIV4 divide factor, 1 to 8. Applied on top of OUTDIV1.
    pub bus_divider: u8,
    /// Mode to end up in. Only [`McgMode::Pee`] is implemented.
    pub mode: McgMode,
    /// Leave MCG and SIM untouched, for boards whose bootloader already
    /// brought the clocks up. The rest of the configuration must still
    /// describe the tree that is running.
    pub no_init: bool,
}

impl ClockConfig {
    /// 8 MHz crystal, 96 MHz MCGOUTCLK, 48 MHz core, 24 MHz bus.
    pub const XTAL_8MHZ_CORE_48MHZ: ClockConfig = ClockConfig {
        xtal_hz: 8_000_000,
        pll_divider: 2,
        pll_multiplier: 24,
        core_divider: 2,
        bus_divider: 2,
        mode: McgMode::Pee,
        no_init: false,
    };

    /// Check the configuration and derive its register encodings.
    ///
    /// Nothing is written to hardware. All bring-up errors are found here.
    pub const fn validate(&self) -> Result<ClockPlan, Error> {
        if !matches!(self.mode, McgMode::Pee) {
            return Err(Error::UnsupportedMode);
        }

        let range = if self.xtal_hz >= 8_000_000 && self.xtal_hz <= 32_000_000 {
            Range::VeryHigh
        } else if self.xtal_hz >= 3_000_000 && self.xtal_hz < 8_000_000 {
            Range::High
        } else {
            return Err(Error::CrystalOutOfRange);
        };

        let frdiv = match fll_reference_divider(self.xtal_hz) {
            Some(frdiv) => frdiv,
            None => return Err(Error::FllReferenceOutOfRange),
        };

        if self.pll_divider < 1
            || self.pll_divider > 25
            || self.pll_multiplier < 24
            || self.pll_multiplier > 55
            || self.core_divider < 1
            || self.core_divider > 16
            || self.bus_divider < 1
            || self.bus_divider > 8
        {
            return Err(Error::InvalidDivider);
        }

        let pll_ref_hz = self.xtal_hz / self.pll_divider as u32;
        if pll_ref_hz < PLL_REF_MIN_HZ || pll_ref_hz > PLL_REF_MAX_HZ {
            return Err(Error::PllReferenceOutOfRange);
        }

        let mcgout_hz = pll_ref_hz * self.pll_multiplier as u32;
        if mcgout_hz < VCO_MIN_HZ || mcgout_hz > VCO_MAX_HZ {
            return Err(Error::VcoOutOfRange);
        }

        let core_hz = mcgout_hz / self.core_divider as u32;
        if core_hz > CORE_MAX_HZ {
            return Err(Error::CoreClockTooFast);
        }

        let bus_hz = core_hz / self.bus_divider as u32;
        if bus_hz > BUS_MAX_HZ {
            return Err(Error::BusClockTooFast);
        }

        Ok(ClockPlan {
            range,
            frdiv,
            prdiv0: self.pll_divider - 1,
            vdiv0: self.pll_multiplier - 24,
            outdiv1: self.core_divider - 1,
            outdiv4: self.bus_divider - 1,
            clocks: Clocks {
                mcgout_hz,
                core_hz,
                bus_hz,
                pllfll_hz: mcgout_hz / 2,
            },
        })
    }

    /// Identity on a valid configuration, panics otherwise.
    ///
    /// Used in a `const` item this turns an unsupported board configuration
    /// into a build error:
    ///
    /// ```ignore
    /// use kl2x_hal::clocks::{ClockConfig, McgMode};
    ///
    /// const BOARD: ClockConfig = ClockConfig {
    ///     xtal_hz: 8_000_000,
    ///     pll_divider: 2,
    ///     pll_multiplier: 24,
    ///     core_divider: 2,
    ///     bus_divider: 2,
    ///     mode: McgMode::Pee,
    ///     no_init: false,
    /// }
    /// .checked();
    /// # let _ = BOARD;
    /// ```
    pub const fn checked(self) -> Self {
        match self.validate() {
            Ok(_) => self,
            Err(Error::UnsupportedMode) => panic!("unimplemented MCG mode"),
            Err(_) => panic!("invalid clock configuration"),
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::XTAL_8MHZ_CORE_48MHZ
    }
}

/// Smallest FRDIV that puts the FLL reference inside its window.
const fn fll_reference_divider(xtal_hz: u32) -> Option<u8> {
    let mut frdiv = 0;
    while frdiv < FRDIV_FACTORS.len() {
        let factor = FRDIV_FACTORS[frdiv];
        if xtal_hz >= FLL_REF_MIN_HZ * factor && xtal_hz * 2 <= FLL_REF_MAX_HZ_X2 * factor {
            return Some(frdiv as u8);
        }
        frdiv += 1;
    }
    None
}

/// Register encodings of a validated [`ClockConfig`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ClockPlan {
    range: Range,
    frdiv: u8,
    prdiv0: u8,
    vdiv0: u8,
    outdiv1: u8,
    outdiv4: u8,
    clocks: Clocks,
}

impl ClockPlan {
    /// Frequencies in effect once the plan is applied.
    pub const fn clocks(&self) -> Clocks {
        self.clocks
    }

    /// C1[FRDIV] encoding.
    pub const fn frdiv(&self) -> u8 {
        self.frdiv
    }
}

/// Clock frequencies after bring-up.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
pub struct Clocks {
    /// MCGOUTCLK, the PLL output.
    pub mcgout_hz: u32,
    /// Core and system clock.
    pub core_hz: u32,
    /// Bus and flash clock.
    pub bus_hz: u32,
    /// MCGPLLCLK/2, the TPM clock.
    pub pllfll_hz: u32,
}

mod mcg {
    use super::*;

    /// FLL Engaged Internal.
    pub(super) struct Fei {
        _private: (),
    }

    /// FLL Bypassed External.
    pub(super) struct Fbe {
        _private: (),
    }

    /// PLL Bypassed External.
    pub(super) struct Pbe {
        _private: (),
    }

    /// PLL Engaged External.
    pub(super) struct Pee {
        _private: (),
    }

    impl Fei {
        /// Only valid when MCG is still in its reset configuration.
        pub(super) fn from_reset() -> Self {
            Self { _private: () }
        }

        /// Switch MCGOUTCLK to the crystal, FLL bypassed.
        pub(super) fn use_xtal<B: Bus + ?Sized>(self, bus: &B, plan: &ClockPlan) -> Fbe {
            pac::OSC0.cr().set(bus, 0);

            pac::MCG
                .c2()
                .write(bus, C2::RANGE0.val(plan.range as u8) + C2::EREFS0::SET);
            // IREFS cleared by the write: FLL runs from the divided crystal
            pac::MCG
                .c1()
                .write(bus, C1::CLKS::External + C1::FRDIV.val(plan.frdiv));
            pac::MCG
                .c4()
                .modify(bus, C4::DMX32::CLEAR + C4::DRST_DRS.val(0));
            pac::MCG.c5().write(bus, C5::PRDIV0.val(plan.prdiv0));
            pac::MCG.c6().set(bus, 0);

            pac::wait_until(bus, |bus| !pac::MCG.s().is_set(bus, S::IREFST));
            pac::wait_until(bus, |bus| {
                pac::MCG.s().read(bus).matches_all(S::CLKST::External)
            });

            Fbe { _private: () }
        }
    }

    impl Fbe {
        /// Start the PLL while MCGOUTCLK stays on the crystal.
        pub(super) fn enable_pll<B: Bus + ?Sized>(self, bus: &B, plan: &ClockPlan) -> Pbe {
            pac::MCG
                .c6()
                .write(bus, C6::PLLS::SET + C6::VDIV0.val(plan.vdiv0));

            pac::wait_until(bus, |bus| pac::MCG.s().is_set(bus, S::LOCK0));

            Pbe { _private: () }
        }
    }

    impl Pbe {
        /// Switch MCGOUTCLK to the PLL output.
        pub(super) fn use_pll<B: Bus + ?Sized>(self, bus: &B, plan: &ClockPlan) -> Pee {
            pac::MCG
                .c1()
                .write(bus, C1::CLKS::PllFll + C1::FRDIV.val(plan.frdiv));

            pac::wait_until(bus, |bus| pac::MCG.s().read(bus).matches_all(S::CLKST::Pll));

            Pee { _private: () }
        }
    }
}

/// Decode the MCG mode from its control registers.
///
/// Returns `None` for any mode outside the bring-up path (FEE, FBI, BLPI,
/// BLPE) and for combinations the MCG does not define.
pub fn mode<B: Bus + ?Sized>(bus: &B) -> Option<McgMode> {
    let c1 = pac::MCG.c1().read(bus);
    let clks: Clks = c1.read_as_enum(C1::CLKS)?;
    let irefs = c1.is_set(C1::IREFS);
    let plls = pac::MCG.c6().is_set(bus, C6::PLLS);
    let lp = pac::MCG.c2().is_set(bus, C2::LP);

    match (clks, irefs, plls, lp) {
        (Clks::PllFll, true, false, _) => Some(McgMode::Fei),
        (Clks::External, false, false, false) => Some(McgMode::Fbe),
        (Clks::External, false, true, false) => Some(McgMode::Pbe),
        (Clks::PllFll, false, true, _) => Some(McgMode::Pee),
        _ => None,
    }
}

/// Initialize and configure clocks
///
/// - disable the COP watchdog
/// - gate PORTA on and hand PTA18/PTA19 to the crystal
/// - program OUTDIV1/OUTDIV4 ahead of the switch
/// - route ERCLK32K to the system oscillator, TPM to MCGPLLCLK/2
/// - FEI -> FBE -> PBE -> PEE
///
/// The configuration is validated before the first register write, so an
/// `Err` leaves the hardware untouched. Must run once, before anything reads
/// a clock frequency.
pub fn init<B: Bus + ?Sized>(bus: &B, config: &ClockConfig) -> Result<Clocks, Error> {
    let plan = config.validate()?;

    if config.no_init {
        info!("clock init skipped, core {} Hz", plan.clocks.core_hz);
        return Ok(plan.clocks);
    }

    if mode(bus) != Some(McgMode::Fei) {
        return Err(Error::AlreadyConfigured);
    }

    // COP would trip during the slow crystal start
    debug!("disable cop");
    pac::SIM.copc().set(bus, 0);

    debug!("hand PTA18/PTA19 to osc0");
    crate::port::enable_clock(bus, Port::A);
    EXTAL0.set_mux(bus, Mux::Analog);
    XTAL0.set_mux(bus, Mux::Analog);

    debug!("set outdiv1 {} outdiv4 {}", plan.outdiv1, plan.outdiv4);
    pac::SIM.clkdiv1().write(
        bus,
        CLKDIV1::OUTDIV1.val(plan.outdiv1 as u32) + CLKDIV1::OUTDIV4.val(plan.outdiv4 as u32),
    );

    pac::SIM
        .sopt1()
        .modify(bus, SOPT1::OSC32KSEL::Osc32kclk);
    pac::SIM
        .sopt2()
        .write(bus, SOPT2::TPMSRC::PllFll + SOPT2::PLLFLLSEL::SET);

    debug!("fei -> fbe");
    let fbe = mcg::Fei::from_reset().use_xtal(bus, &plan);
    debug!("fbe -> pbe");
    let pbe = fbe.enable_pll(bus, &plan);
    debug!("pbe -> pee");
    let _pee = pbe.use_pll(bus, &plan);

    info!(
        "clocks up: mcgout {} Hz, core {} Hz, bus {} Hz",
        plan.clocks.mcgout_hz,
        plan.clocks.core_hz,
        plan.clocks.bus_hz
    );

    Ok(plan.clocks)
}

pub mod diag {
    //! Clock diagnostics module

    use super::*;

    /// Print the MCG control and status registers via the logger.
    pub fn inspect<B: Bus + ?Sized>(bus: &B) {
        let c1 = pac::MCG.c1().get(bus);
        let c2 = pac::MCG.c2().get(bus);
        let c5 = pac::MCG.c5().get(bus);
        let c6 = pac::MCG.c6().get(bus);
        let s = pac::MCG.s().read(bus);
        info!("MCG C1 {:#x} C2 {:#x} C5 {:#x} C6 {:#x}", c1, c2, c5, c6);
        info!(
            "MCG S {:#x}: lock0 {} irefst {} oscinit0 {}",
            s.get(),
            s.is_set(S::LOCK0),
            s.is_set(S::IREFST),
            s.is_set(S::OSCINIT0)
        );
        match mode(bus) {
            Some(mode) => info!("MCG mode {:?}", mode),
            None => warn!("MCG outside the bring-up path"),
        }
    }
}
