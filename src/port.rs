//! Port control: pin multiplexing and port clock gates.

use tock_registers::fields::Field;

use crate::pac::port::PCR;
use crate::pac::sim::SCGC5;
use crate::pac::{self, Bus};

/// A port instance.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
}

impl Port {
    const fn regs(self) -> pac::port::Port {
        match self {
            Port::A => pac::PORTA,
            Port::B => pac::PORTB,
            Port::C => pac::PORTC,
            Port::D => pac::PORTD,
            Port::E => pac::PORTE,
        }
    }

    /// Clock gate of the port in SIM_SCGC5.
    fn gate(self) -> Field<u32, SCGC5::Register> {
        match self {
            Port::A => SCGC5::PORTA,
            Port::B => SCGC5::PORTB,
            Port::C => SCGC5::PORTC,
            Port::D => SCGC5::PORTD,
            Port::E => SCGC5::PORTE,
        }
    }
}

/// Pin mux selection, PCR[MUX].
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(all(feature = "defmt", not(test)), derive(defmt::Format))]
pub enum Mux {
    /// Pin disabled, analog or oscillator function.
    Analog = 0,
    Gpio = 1,
    Alt2 = 2,
    Alt3 = 3,
    Alt4 = 4,
    Alt5 = 5,
    Alt6 = 6,
    Alt7 = 7,
}

impl Mux {
    const fn from_bits(val: u32) -> Mux {
        match val & 0x07 {
            0 => Mux::Analog,
            1 => Mux::Gpio,
            2 => Mux::Alt2,
            3 => Mux::Alt3,
            4 => Mux::Alt4,
            5 => Mux::Alt5,
            6 => Mux::Alt6,
            _ => Mux::Alt7,
        }
    }
}

/// Ungate the clock to a port. PCR accesses fault while the gate is off.
pub fn enable_clock<B: Bus + ?Sized>(bus: &B, port: Port) {
    pac::SIM.scgc5().modify(bus, port.gate().val(1));
}

/// Returns `true` if the port clock is ungated.
pub fn clock_enabled<B: Bus + ?Sized>(bus: &B, port: Port) -> bool {
    pac::SIM.scgc5().is_set(bus, port.gate())
}

/// A single pin.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Pin {
    port: Port,
    num: u8,
}

impl Pin {
    // The PCR array only has 32 entries, enforce it for compile errors.
    pub const fn new(port: Port, num: u8) -> Self {
        assert!(num < 32, "Not a valid pin number");
        Self { port, num }
    }

    #[inline(always)]
    pub const fn port(&self) -> Port {
        self.port
    }

    #[inline(always)]
    pub const fn num(&self) -> u8 {
        self.num
    }

    /// Select the pin function.
    ///
    /// Only MUX changes. ISF is written back as zero, which leaves a pending
    /// flag set, and pull, drive and filter settings are kept.
    #[inline(always)]
    pub fn set_mux<B: Bus + ?Sized>(&self, bus: &B, mux: Mux) {
        self.port
            .regs()
            .pcr(self.num as usize)
            .modify(bus, PCR::MUX.val(mux as u32) + PCR::ISF::CLEAR);
    }

    /// Currently selected function.
    #[inline(always)]
    pub fn mux<B: Bus + ?Sized>(&self, bus: &B) -> Mux {
        Mux::from_bits(self.port.regs().pcr(self.num as usize).read(bus).read(PCR::MUX))
    }
}
