use super::Cpu;
use crate::bus::Bus;

impl Cpu {
    /// Push a word: high byte at SP-1, low byte at SP-2. SP wraps.
    pub fn push16<B: Bus>(&mut self, bus: &mut B, val: u16) {
        let [hi, lo] = val.to_be_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write(self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write(self.regs.sp, lo);
    }

    pub fn pop16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = bus.read(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let hi = bus.read(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        u16::from_be_bytes([hi, lo])
    }

    pub(super) fn call<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        let return_pc = self.regs.pc;
        self.push16(bus, return_pc);
        self.regs.pc = addr;
    }

    pub(super) fn ret<B: Bus>(&mut self, bus: &mut B) {
        self.regs.pc = self.pop16(bus);
    }
}
