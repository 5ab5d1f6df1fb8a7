//! System Control Block, system handler priorities only.

use tock_registers::register_bitfields;

use super::{ReadWrite, Reg};

pub const SCB: Scb = Scb::from_addr(0xe000_ed00);

#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Scb {
    base: usize,
}

impl Scb {
    #[inline(always)]
    pub const fn from_addr(base: usize) -> Self {
        Self { base }
    }

    /// System Handler Priority Register 3. Word access only on ARMv6-M.
    #[inline(always)]
    pub const fn shpr3(self) -> Reg<u32, SHPR3::Register, ReadWrite> {
        Reg::from_addr(self.base + 0x20)
    }
}

register_bitfields![u32,
    pub SHPR3 [
        /// Priority byte of SysTick (exception 15)
        PRI_15 OFFSET(24) NUMBITS(8) [],
        /// Priority byte of PendSV (exception 14)
        PRI_14 OFFSET(16) NUMBITS(8) []
    ]
];
