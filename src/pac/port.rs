//! Port control and interrupts.

use tock_registers::register_bitfields;

use super::{ReadWrite, Reg};

pub const PORTA: Port = Port::from_addr(0x4004_9000);
pub const PORTB: Port = Port::from_addr(0x4004_a000);
pub const PORTC: Port = Port::from_addr(0x4004_b000);
pub const PORTD: Port = Port::from_addr(0x4004_c000);
pub const PORTE: Port = Port::from_addr(0x4004_d000);

#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Port {
    base: usize,
}

impl Port {
    #[inline(always)]
    pub const fn from_addr(base: usize) -> Self {
        Self { base }
    }

    /// Pin Control Register `n`, `n` in `0..32`.
    #[inline(always)]
    pub const fn pcr(self, n: usize) -> Reg<u32, PCR::Register, ReadWrite> {
        assert!(n < 32);
        Reg::from_addr(self.base + n * 4)
    }
}

register_bitfields![u32,
    pub PCR [
        /// Interrupt status flag, write one to clear
        ISF OFFSET(24) NUMBITS(1) [],
        IRQC OFFSET(16) NUMBITS(4) [],
        /// Pin function, zero is the analog function
        MUX OFFSET(8) NUMBITS(3) [],
        DSE OFFSET(6) NUMBITS(1) [],
        PFE OFFSET(4) NUMBITS(1) [],
        SRE OFFSET(2) NUMBITS(1) [],
        /// Pull enable
        PE OFFSET(1) NUMBITS(1) [],
        /// Pull select, set is pull-up
        PS OFFSET(0) NUMBITS(1) []
    ]
];
