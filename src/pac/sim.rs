//! System Integration Module.

use tock_registers::register_bitfields;

use super::{ReadWrite, Reg};

pub const SIM: Sim = Sim::from_addr(0x4004_7000);

#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Sim {
    base: usize,
}

impl Sim {
    #[inline(always)]
    pub const fn from_addr(base: usize) -> Self {
        Self { base }
    }

    /// System Options Register 1
    #[inline(always)]
    pub const fn sopt1(self) -> Reg<u32, SOPT1::Register, ReadWrite> {
        Reg::from_addr(self.base)
    }

    /// System Options Register 2
    #[inline(always)]
    pub const fn sopt2(self) -> Reg<u32, SOPT2::Register, ReadWrite> {
        Reg::from_addr(self.base + 0x1004)
    }

    /// System Clock Gating Control Register 5
    #[inline(always)]
    pub const fn scgc5(self) -> Reg<u32, SCGC5::Register, ReadWrite> {
        Reg::from_addr(self.base + 0x1038)
    }

    /// System Clock Divider Register 1
    #[inline(always)]
    pub const fn clkdiv1(self) -> Reg<u32, CLKDIV1::Register, ReadWrite> {
        Reg::from_addr(self.base + 0x1044)
    }

    /// COP Control Register
    #[inline(always)]
    pub const fn copc(self) -> Reg<u32, COPC::Register, ReadWrite> {
        Reg::from_addr(self.base + 0x1100)
    }
}

register_bitfields![u32,
    pub SOPT1 [
        /// ERCLK32K source
        OSC32KSEL OFFSET(18) NUMBITS(2) [
            Osc32kclk = 0,
            RtcClkin = 2,
            Lpo = 3
        ]
    ],
    pub SOPT2 [
        /// TPM counter clock source
        TPMSRC OFFSET(24) NUMBITS(2) [
            Disabled = 0,
            PllFll = 1,
            Oscerclk = 2,
            Mcgirclk = 3
        ],
        /// MCGPLLCLK/2 instead of MCGFLLCLK
        PLLFLLSEL OFFSET(16) NUMBITS(1) []
    ],
    pub SCGC5 [
        PORTE OFFSET(13) NUMBITS(1) [],
        PORTD OFFSET(12) NUMBITS(1) [],
        PORTC OFFSET(11) NUMBITS(1) [],
        PORTB OFFSET(10) NUMBITS(1) [],
        PORTA OFFSET(9) NUMBITS(1) []
    ],
    pub CLKDIV1 [
        /// Core/system clock divider, factor minus one
        OUTDIV1 OFFSET(28) NUMBITS(4) [],
        /// Bus/flash clock divider, factor minus one
        OUTDIV4 OFFSET(16) NUMBITS(3) []
    ],
    pub COPC [
        /// Watchdog timeout, zero disables
        COPT OFFSET(2) NUMBITS(2) []
    ]
];
