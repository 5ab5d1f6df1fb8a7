//! Multipurpose Clock Generator.

use tock_registers::register_bitfields;

use super::{ReadOnly, ReadWrite, Reg};

pub const MCG: Mcg = Mcg::from_addr(0x4006_4000);

#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Mcg {
    base: usize,
}

impl Mcg {
    #[inline(always)]
    pub const fn from_addr(base: usize) -> Self {
        Self { base }
    }

    #[inline(always)]
    pub const fn c1(self) -> Reg<u8, C1::Register, ReadWrite> {
        Reg::from_addr(self.base)
    }

    #[inline(always)]
    pub const fn c2(self) -> Reg<u8, C2::Register, ReadWrite> {
        Reg::from_addr(self.base + 0x01)
    }

    #[inline(always)]
    pub const fn c4(self) -> Reg<u8, C4::Register, ReadWrite> {
        Reg::from_addr(self.base + 0x03)
    }

    #[inline(always)]
    pub const fn c5(self) -> Reg<u8, C5::Register, ReadWrite> {
        Reg::from_addr(self.base + 0x04)
    }

    #[inline(always)]
    pub const fn c6(self) -> Reg<u8, C6::Register, ReadWrite> {
        Reg::from_addr(self.base + 0x05)
    }

    #[inline(always)]
    pub const fn s(self) -> Reg<u8, S::Register, ReadOnly> {
        Reg::from_addr(self.base + 0x06)
    }
}

register_bitfields![u8,
    pub C1 [
        /// MCGOUTCLK source
        CLKS OFFSET(6) NUMBITS(2) [
            PllFll = 0,
            Internal = 1,
            External = 2
        ],
        /// FLL external reference divider
        FRDIV OFFSET(3) NUMBITS(3) [],
        /// FLL reference is the slow internal clock
        IREFS OFFSET(2) NUMBITS(1) []
    ],
    pub C2 [
        /// Crystal frequency range
        RANGE0 OFFSET(4) NUMBITS(2) [
            Low = 0,
            High = 1,
            VeryHigh = 2
        ],
        /// High-gain oscillator
        HGO0 OFFSET(3) NUMBITS(1) [],
        /// External reference is the crystal oscillator
        EREFS0 OFFSET(2) NUMBITS(1) [],
        /// FLL/PLL disabled in bypass modes
        LP OFFSET(1) NUMBITS(1) []
    ],
    pub C4 [
        DMX32 OFFSET(7) NUMBITS(1) [],
        /// DCO range
        DRST_DRS OFFSET(5) NUMBITS(2) []
    ],
    pub C5 [
        /// PLL external reference divider, factor minus one
        PRDIV0 OFFSET(0) NUMBITS(5) []
    ],
    pub C6 [
        /// PLL selected
        PLLS OFFSET(6) NUMBITS(1) [],
        /// VCO multiplier, factor minus 24
        VDIV0 OFFSET(0) NUMBITS(5) []
    ],
    pub S [
        LOCK0 OFFSET(6) NUMBITS(1) [],
        /// PLLS clock source status
        PLLST OFFSET(5) NUMBITS(1) [],
        /// FLL reference status
        IREFST OFFSET(4) NUMBITS(1) [],
        /// MCGOUTCLK source status
        CLKST OFFSET(2) NUMBITS(2) [
            Fll = 0,
            Internal = 1,
            External = 2,
            Pll = 3
        ],
        OSCINIT0 OFFSET(1) NUMBITS(1) []
    ]
];
