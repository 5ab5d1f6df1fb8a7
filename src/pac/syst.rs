//! SysTick timer.

use tock_registers::register_bitfields;

use super::{ReadWrite, Reg};

pub const SYST: Syst = Syst::from_addr(0xe000_e010);

#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Syst {
    base: usize,
}

impl Syst {
    #[inline(always)]
    pub const fn from_addr(base: usize) -> Self {
        Self { base }
    }

    /// Control and Status Register
    #[inline(always)]
    pub const fn csr(self) -> Reg<u32, CSR::Register, ReadWrite> {
        Reg::from_addr(self.base)
    }

    /// Reload Value Register
    #[inline(always)]
    pub const fn rvr(self) -> Reg<u32, RVR::Register, ReadWrite> {
        Reg::from_addr(self.base + 0x04)
    }

    /// Current Value Register
    #[inline(always)]
    pub const fn cvr(self) -> Reg<u32, CVR::Register, ReadWrite> {
        Reg::from_addr(self.base + 0x08)
    }
}

register_bitfields![u32,
    pub CSR [
        COUNTFLAG OFFSET(16) NUMBITS(1) [],
        CLKSOURCE OFFSET(2) NUMBITS(1) [
            External = 0,
            Core = 1
        ],
        TICKINT OFFSET(1) NUMBITS(1) [],
        ENABLE OFFSET(0) NUMBITS(1) []
    ],
    pub RVR [
        RELOAD OFFSET(0) NUMBITS(24) []
    ],
    pub CVR [
        CURRENT OFFSET(0) NUMBITS(24) []
    ]
];
