//! Register access for the KL2x blocks touched during bring-up.
//!
//! One module per block. Each holds an address handle with one method per
//! register and the field layout declared with `register_bitfields!`. Nothing
//! here dereferences a raw address on its own: every load and store goes
//! through a [`Bus`] handle, so the same driver code runs against [`Mmio`] on
//! silicon and against a register model in tests. Values come back as
//! [`LocalRegisterCopy`] and are updated with the usual `FieldValue` algebra.

use core::marker::PhantomData;

use tock_registers::fields::{Field, FieldValue};
use tock_registers::{LocalRegisterCopy, RegisterLongName, UIntLike};

pub mod mcg;
pub mod osc;
pub mod port;
pub mod scb;
pub mod sim;
pub mod syst;

pub use mcg::MCG;
pub use osc::OSC0;
pub use port::{PORTA, PORTB, PORTC, PORTD, PORTE};
pub use scb::SCB;
pub use sim::SIM;
pub use syst::SYST;

/// Memory-mapped register surface.
pub trait Bus {
    fn read_u8(&self, addr: usize) -> u8;
    fn write_u8(&self, addr: usize, val: u8);
    fn read_u32(&self, addr: usize) -> u32;
    fn write_u32(&self, addr: usize, val: u32);

    /// Called once per iteration of every status poll.
    fn relax(&self) {
        core::hint::spin_loop();
    }
}

/// Volatile access to the real register blocks.
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    ///
    /// Grants unrestricted access to every peripheral register. The caller
    /// must be the only code touching the clock, port, SIM and SysTick blocks
    /// while the handle is in use.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl Bus for Mmio {
    #[inline(always)]
    fn read_u8(&self, addr: usize) -> u8 {
        unsafe { core::ptr::read_volatile(addr as *const u8) }
    }

    #[inline(always)]
    fn write_u8(&self, addr: usize, val: u8) {
        unsafe { core::ptr::write_volatile(addr as *mut u8, val) }
    }

    #[inline(always)]
    fn read_u32(&self, addr: usize) -> u32 {
        unsafe { core::ptr::read_volatile(addr as *const u32) }
    }

    #[inline(always)]
    fn write_u32(&self, addr: usize, val: u32) {
        unsafe { core::ptr::write_volatile(addr as *mut u32, val) }
    }

    #[inline(always)]
    fn relax(&self) {
        #[cfg(target_arch = "arm")]
        cortex_m::asm::nop();
        #[cfg(not(target_arch = "arm"))]
        core::hint::spin_loop();
    }
}

/// Spin until `ready` holds.
///
/// There is no timeout. A status bit that never asserts keeps the caller here
/// forever.
#[inline]
pub fn wait_until<B: Bus + ?Sized>(bus: &B, mut ready: impl FnMut(&B) -> bool) {
    while !ready(bus) {
        bus.relax();
    }
}

/// Native access width of a register.
pub trait Word: UIntLike {
    fn load<B: Bus + ?Sized>(bus: &B, addr: usize) -> Self;
    fn store<B: Bus + ?Sized>(self, bus: &B, addr: usize);
}

impl Word for u8 {
    #[inline(always)]
    fn load<B: Bus + ?Sized>(bus: &B, addr: usize) -> Self {
        bus.read_u8(addr)
    }

    #[inline(always)]
    fn store<B: Bus + ?Sized>(self, bus: &B, addr: usize) {
        bus.write_u8(addr, self)
    }
}

impl Word for u32 {
    #[inline(always)]
    fn load<B: Bus + ?Sized>(bus: &B, addr: usize) -> Self {
        bus.read_u32(addr)
    }

    #[inline(always)]
    fn store<B: Bus + ?Sized>(self, bus: &B, addr: usize) {
        bus.write_u32(addr, self)
    }
}

pub trait Access {}
pub trait Readable: Access {}
pub trait Writeable: Access {}

pub struct ReadOnly;
pub struct WriteOnly;
pub struct ReadWrite;

impl Access for ReadOnly {}
impl Access for WriteOnly {}
impl Access for ReadWrite {}
impl Readable for ReadOnly {}
impl Readable for ReadWrite {}
impl Writeable for WriteOnly {}
impl Writeable for ReadWrite {}

/// A register at a fixed address.
pub struct Reg<T: Word, R: RegisterLongName, A: Access> {
    addr: usize,
    phantom: PhantomData<(T, R, A)>,
}

impl<T: Word, R: RegisterLongName, A: Access> Copy for Reg<T, R, A> {}
impl<T: Word, R: RegisterLongName, A: Access> Clone for Reg<T, R, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Word, R: RegisterLongName, A: Access> Reg<T, R, A> {
    #[inline(always)]
    pub const fn from_addr(addr: usize) -> Self {
        Self {
            addr,
            phantom: PhantomData,
        }
    }

    #[inline(always)]
    pub const fn addr(&self) -> usize {
        self.addr
    }
}

impl<T: Word, R: RegisterLongName, A: Readable> Reg<T, R, A> {
    /// Raw register value.
    #[inline(always)]
    pub fn get<B: Bus + ?Sized>(&self, bus: &B) -> T {
        T::load(bus, self.addr)
    }

    #[inline(always)]
    pub fn read<B: Bus + ?Sized>(&self, bus: &B) -> LocalRegisterCopy<T, R> {
        LocalRegisterCopy::new(self.get(bus))
    }

    #[inline(always)]
    pub fn is_set<B: Bus + ?Sized>(&self, bus: &B, field: Field<T, R>) -> bool {
        self.read(bus).is_set(field)
    }
}

impl<T: Word, R: RegisterLongName, A: Writeable> Reg<T, R, A> {
    #[inline(always)]
    pub fn set<B: Bus + ?Sized>(&self, bus: &B, value: T) {
        value.store(bus, self.addr)
    }

    /// Write `value`, every field it does not name is zero.
    #[inline(always)]
    pub fn write<B: Bus + ?Sized>(&self, bus: &B, value: FieldValue<T, R>) {
        let mut reg = LocalRegisterCopy::<T, R>::new(T::zero());
        reg.write(value);
        self.set(bus, reg.get())
    }
}

impl<T: Word, R: RegisterLongName, A: Readable + Writeable> Reg<T, R, A> {
    /// Read-modify-write of the fields named in `value`.
    #[inline(always)]
    pub fn modify<B: Bus + ?Sized>(&self, bus: &B, value: FieldValue<T, R>) {
        let mut reg = self.read(bus);
        reg.modify(value);
        self.set(bus, reg.get())
    }
}
