//! System oscillator.

use tock_registers::register_bitfields;

use super::{ReadWrite, Reg};

pub const OSC0: Osc = Osc::from_addr(0x4006_5000);

#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Osc {
    base: usize,
}

impl Osc {
    #[inline(always)]
    pub const fn from_addr(base: usize) -> Self {
        Self { base }
    }

    /// OSC Control Register
    #[inline(always)]
    pub const fn cr(self) -> Reg<u8, CR::Register, ReadWrite> {
        Reg::from_addr(self.base)
    }
}

register_bitfields![u8,
    pub CR [
        /// External reference enable (OSCERCLK)
        ERCLKEN OFFSET(7) NUMBITS(1) [],
        /// External reference stays enabled in Stop mode
        EREFSTEN OFFSET(5) NUMBITS(1) [],
        /// Load capacitors, 2/4/8/16 pF in bits 3..0
        SCP OFFSET(0) NUMBITS(4) []
    ]
];
