use super::Cpu;
use super::decode::{self, CbOp};
use crate::alu;
use crate::bus::Bus;
use crate::cycles;

impl Cpu {
    /// Second half of an 0xCB instruction: fetch the sub-opcode, charge its
    /// cost on top of the prefix and apply it.
    pub(super) fn execute_cb<B: Bus>(&mut self, bus: &mut B) {
        let opcode = self.fetch8(bus);
        self.last_instruction_cycles += cycles::cb_clocks(opcode);

        let (op, operand) = decode::classify_cb(opcode);
        let val = self.read_operand(bus, operand);
        match op {
            CbOp::Shift(shift) => {
                let (res, flags) = shift.apply(val, self.regs.flags().c());
                self.write_operand(bus, operand, res);
                self.regs.set_flags(flags);
            }
            CbOp::Bit(index) => {
                let flags = alu::bit(index, val, self.regs.flags());
                self.regs.set_flags(flags);
            }
            CbOp::Res(index) => self.write_operand(bus, operand, val & !(1 << index)),
            CbOp::Set(index) => self.write_operand(bus, operand, val | (1 << index)),
        }
    }
}
