//! Register model of a KL2x for host tests.
//!
//! Registers live in a map keyed by address. MCG_S follows the control
//! registers after a configurable number of polls, the way the silicon needs
//! time for the crystal to start and the PLL to lock. IREFST trails the other
//! status bits by a few more polls, so CLKST alone never vouches for it. Every poll goes through
//! [`Bus::relax`], which is bounded here so a status bit that never asserts
//! fails the test instead of hanging it.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use tock_registers::{LocalRegisterCopy, RegisterLongName};

use crate::clocks::{self, McgMode};
use crate::pac::mcg::C1::CLKS::Value as Clks;
use crate::pac::mcg::S::CLKST::Value as Clkst;
use crate::pac::mcg::{C1, C2, C5, C6, S};
use crate::pac::{self, Bus};

const POLL_BUDGET: u32 = 10_000;
const IREFST: u8 = 1 << 4;

/// Hardware that misbehaves.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Fault {
    /// OSC0 never starts, so MCGOUTCLK never moves to the external reference.
    CrystalDead,
    /// The PLL never reports lock.
    PllNeverLocks,
}

pub(crate) struct Kl2x {
    regs: RefCell<BTreeMap<usize, u32>>,
    writes: RefCell<Vec<(usize, u32)>>,
    modes: RefCell<Vec<McgMode>>,
    settle_polls: u32,
    /// Polls left until MCG_S reflects the control registers.
    settling: Cell<u32>,
    /// Same for S[IREFST].
    irefst_settling: Cell<u32>,
    polls: Cell<u32>,
    fault: Option<Fault>,
}

impl Kl2x {
    pub(crate) const DEFAULT_SETTLE_POLLS: u32 = 3;
    /// Extra polls S[IREFST] takes after the rest of MCG_S has settled.
    pub(crate) const IREFST_LAG: u32 = 4;

    pub(crate) fn new() -> Self {
        Self::build(Self::DEFAULT_SETTLE_POLLS, None)
    }

    pub(crate) fn with_settle_polls(settle_polls: u32) -> Self {
        Self::build(settle_polls, None)
    }

    pub(crate) fn with_fault(fault: Fault) -> Self {
        Self::build(Self::DEFAULT_SETTLE_POLLS, Some(fault))
    }

    fn build(settle_polls: u32, fault: Option<Fault>) -> Self {
        let mut regs = BTreeMap::new();
        // Reset values, KL25 reference manual
        regs.insert(pac::MCG.c1().addr(), 0x04);
        regs.insert(pac::MCG.c2().addr(), 0x80);
        regs.insert(pac::MCG.s().addr(), 0x10);
        regs.insert(pac::SIM.sopt1().addr(), 0x8000_0000);
        regs.insert(pac::SIM.scgc5().addr(), 0x0000_0182);
        regs.insert(pac::SIM.clkdiv1().addr(), 0x0001_0000);
        regs.insert(pac::SIM.copc().addr(), 0x0000_000c);

        let dev = Self {
            regs: RefCell::new(regs),
            writes: RefCell::new(Vec::new()),
            modes: RefCell::new(Vec::new()),
            settle_polls,
            settling: Cell::new(0),
            irefst_settling: Cell::new(0),
            polls: Cell::new(0),
            fault,
        };
        dev.record_mode();
        dev
    }

    /// Raw register value, without going through the bus.
    pub(crate) fn peek(&self, addr: usize) -> u32 {
        self.regs.borrow().get(&addr).copied().unwrap_or(0)
    }

    /// Every store, in order.
    pub(crate) fn writes(&self) -> Vec<(usize, u32)> {
        self.writes.borrow().clone()
    }

    /// MCG modes decoded after each MCG write, consecutive repeats folded.
    pub(crate) fn modes(&self) -> Vec<McgMode> {
        self.modes.borrow().clone()
    }

    pub(crate) fn polls(&self) -> u32 {
        self.polls.get()
    }

    /// MCGOUTCLK derived from the status the hardware reports.
    pub(crate) fn mcgout_hz(&self, xtal_hz: u32) -> Option<u32> {
        let s = pac::MCG.s().read(self);
        let prdiv0 = pac::MCG.c5().read(self).read(C5::PRDIV0) as u32;
        let vdiv0 = pac::MCG.c6().read(self).read(C6::VDIV0) as u32;
        let clkst: Option<Clkst> = s.read_as_enum(S::CLKST);
        match clkst {
            Some(Clkst::Pll) => Some(xtal_hz / (prdiv0 + 1) * (vdiv0 + 24)),
            Some(Clkst::External) => Some(xtal_hz),
            _ => None,
        }
    }

    fn is_mcg(addr: usize) -> bool {
        (pac::MCG.c1().addr()..pac::MCG.s().addr()).contains(&addr)
    }

    fn record_mode(&self) {
        let Some(mode) = clocks::mode(self) else {
            return;
        };
        let mut modes = self.modes.borrow_mut();
        if modes.last() != Some(&mode) {
            modes.push(mode);
        }
    }

    fn local<R: RegisterLongName>(&self, addr: usize) -> LocalRegisterCopy<u8, R> {
        LocalRegisterCopy::new(self.peek(addr) as u8)
    }

    /// Refuse source switches the status does not back up yet.
    fn check_switch(&self, addr: usize, val: u8) {
        let s = pac::MCG.s().read(self);
        if addr == pac::MCG.c6().addr()
            && LocalRegisterCopy::<u8, C6::Register>::new(val).is_set(C6::PLLS)
        {
            assert!(
                !s.is_set(S::IREFST) && s.matches_all(S::CLKST::External),
                "PLL selected before FBE was confirmed"
            );
        }
        if addr == pac::MCG.c1().addr()
            && LocalRegisterCopy::<u8, C1::Register>::new(val).matches_all(C1::CLKS::PllFll)
        {
            assert!(
                !pac::MCG.c6().is_set(self, C6::PLLS) || s.is_set(S::LOCK0),
                "PLL output selected before lock"
            );
        }
    }

    /// MCG_S once everything has settled.
    fn settled_status(&self) -> u8 {
        let c1 = self.local::<C1::Register>(pac::MCG.c1().addr());
        let c2 = self.local::<C2::Register>(pac::MCG.c2().addr());
        let c5 = self.local::<C5::Register>(pac::MCG.c5().addr());
        let c6 = self.local::<C6::Register>(pac::MCG.c6().addr());
        let previous = self.local::<S::Register>(pac::MCG.s().addr());

        let plls = c6.is_set(C6::PLLS);
        let osc_running = c2.is_set(C2::EREFS0) && self.fault != Some(Fault::CrystalDead);
        let locked = plls
            && osc_running
            && c5.read(C5::PRDIV0) < 25
            && self.fault != Some(Fault::PllNeverLocks);

        let clks: Option<Clks> = c1.read_as_enum(C1::CLKS);
        let clkst = match clks {
            Some(Clks::PllFll) if plls && locked => S::CLKST::Pll,
            Some(Clks::PllFll) if plls => S::CLKST.val(previous.read(S::CLKST)),
            Some(Clks::PllFll) => S::CLKST::Fll,
            Some(Clks::Internal) => S::CLKST::Internal,
            Some(Clks::External) if osc_running => S::CLKST::External,
            _ => S::CLKST.val(previous.read(S::CLKST)),
        };

        let mut s = LocalRegisterCopy::<u8, S::Register>::new(0);
        s.write(
            S::LOCK0.val(locked as u8)
                + S::PLLST.val(plls as u8)
                + S::IREFST.val(c1.is_set(C1::IREFS) as u8)
                + clkst
                + S::OSCINIT0.val(osc_running as u8),
        );
        s.get()
    }

    /// Move MCG_S to the settled state, IREFST only when `irefst` is set.
    fn settle_status(&self, irefst: bool) {
        let settled = self.settled_status();
        let current = self.peek(pac::MCG.s().addr()) as u8;
        let s = if irefst {
            settled
        } else {
            (settled & !IREFST) | (current & IREFST)
        };
        self.regs.borrow_mut().insert(pac::MCG.s().addr(), s as u32);
    }
}

impl Bus for Kl2x {
    fn read_u8(&self, addr: usize) -> u8 {
        self.peek(addr) as u8
    }

    fn write_u8(&self, addr: usize, val: u8) {
        assert!(addr != pac::MCG.s().addr(), "write to read-only MCG_S");
        if Self::is_mcg(addr) {
            self.check_switch(addr, val);
        }

        self.writes.borrow_mut().push((addr, val as u32));
        self.regs.borrow_mut().insert(addr, val as u32);

        if Self::is_mcg(addr) {
            self.settling.set(self.settle_polls);
            self.irefst_settling.set(self.settle_polls + Self::IREFST_LAG);
            if self.settle_polls == 0 {
                self.settle_status(false);
            }
            self.record_mode();
        }
    }

    fn read_u32(&self, addr: usize) -> u32 {
        self.peek(addr)
    }

    fn write_u32(&self, addr: usize, val: u32) {
        self.writes.borrow_mut().push((addr, val));
        self.regs.borrow_mut().insert(addr, val);
    }

    fn relax(&self) {
        let polls = self.polls.get() + 1;
        self.polls.set(polls);
        assert!(polls <= POLL_BUDGET, "MCG never settled: S = {:#04x}", self.peek(pac::MCG.s().addr()));

        let left = self.settling.get().saturating_sub(1);
        self.settling.set(left);
        let irefst_left = self.irefst_settling.get().saturating_sub(1);
        self.irefst_settling.set(irefst_left);
        if left == 0 {
            self.settle_status(irefst_left == 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_state_is_fei() {
        let dev = Kl2x::new();
        assert_eq!(clocks::mode(&dev), Some(McgMode::Fei));
        assert_eq!(dev.modes(), [McgMode::Fei]);
        assert!(dev.writes().is_empty());
    }

    #[test]
    fn status_lags_behind_control() {
        let dev = Kl2x::new();
        pac::MCG.c2().write(&dev, C2::EREFS0::SET);
        pac::MCG.c1().write(&dev, C1::CLKS::External);

        assert!(pac::MCG.s().is_set(&dev, S::IREFST));
        for _ in 0..Kl2x::DEFAULT_SETTLE_POLLS {
            dev.relax();
        }
        let s = pac::MCG.s().read(&dev);
        assert!(s.is_set(S::OSCINIT0));
        assert!(s.matches_all(S::CLKST::External));
    }

    #[test]
    fn irefst_clears_after_clkst() {
        let dev = Kl2x::new();
        pac::MCG.c2().write(&dev, C2::EREFS0::SET);
        pac::MCG.c1().write(&dev, C1::CLKS::External);

        for _ in 0..Kl2x::DEFAULT_SETTLE_POLLS {
            dev.relax();
        }
        assert!(pac::MCG.s().read(&dev).matches_all(S::CLKST::External));
        assert!(pac::MCG.s().is_set(&dev, S::IREFST));

        for _ in 0..Kl2x::IREFST_LAG {
            dev.relax();
        }
        assert!(!pac::MCG.s().is_set(&dev, S::IREFST));
    }
}
