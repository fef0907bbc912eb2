use super::decode::{self, Cond, Group, Indirect, Operand, Pair, StackPair};
use super::{Cpu, Model};
use crate::alu::{self, AluOp, ShiftOp};
use crate::bus::Bus;
use crate::cycles::{CALL_RET_TAKEN_BONUS, JUMP_TAKEN_BONUS};
use crate::error::CpuError;

impl Cpu {
    pub(super) fn read_operand<B: Bus>(&mut self, bus: &mut B, operand: Operand) -> u8 {
        match operand {
            Operand::B => self.regs.b,
            Operand::C => self.regs.c,
            Operand::D => self.regs.d,
            Operand::E => self.regs.e,
            Operand::H => self.regs.h,
            Operand::L => self.regs.l,
            Operand::MemHl => bus.read(self.regs.hl()),
            Operand::A => self.regs.a,
        }
    }

    pub(super) fn write_operand<B: Bus>(&mut self, bus: &mut B, operand: Operand, val: u8) {
        match operand {
            Operand::B => self.regs.b = val,
            Operand::C => self.regs.c = val,
            Operand::D => self.regs.d = val,
            Operand::E => self.regs.e = val,
            Operand::H => self.regs.h = val,
            Operand::L => self.regs.l = val,
            Operand::MemHl => bus.write(self.regs.hl(), val),
            Operand::A => self.regs.a = val,
        }
    }

    fn pair(&self, pair: Pair) -> u16 {
        match pair {
            Pair::Bc => self.regs.bc(),
            Pair::De => self.regs.de(),
            Pair::Hl => self.regs.hl(),
            Pair::Sp => self.regs.sp,
        }
    }

    fn set_pair(&mut self, pair: Pair, val: u16) {
        match pair {
            Pair::Bc => self.regs.set_bc(val),
            Pair::De => self.regs.set_de(val),
            Pair::Hl => self.regs.set_hl(val),
            Pair::Sp => self.regs.sp = val,
        }
    }

    /// Address for the `(BC)/(DE)/(HL+)/(HL-)` forms, applying the HL
    /// post-increment or post-decrement.
    fn indirect_addr(&mut self, src: Indirect) -> u16 {
        match src {
            Indirect::Bc => self.regs.bc(),
            Indirect::De => self.regs.de(),
            Indirect::HlInc => {
                let addr = self.regs.hl();
                self.regs.set_hl(addr.wrapping_add(1));
                addr
            }
            Indirect::HlDec => {
                let addr = self.regs.hl();
                self.regs.set_hl(addr.wrapping_sub(1));
                addr
            }
        }
    }

    fn alu(&mut self, op: AluOp, operand: u8) {
        let (res, flags) = op.apply(self.regs.a, operand, self.regs.flags());
        self.regs.a = res;
        self.regs.set_flags(flags);
    }

    /// RLCA/RRCA/RLA/RRA: the CB rotate with Z forced clear.
    fn rotate_a(&mut self, op: ShiftOp) {
        let (res, flags) = op.apply(self.regs.a, self.regs.flags().c());
        self.regs.a = res;
        self.regs.set_flags(flags.with_z(false));
    }

    fn jump_relative<B: Bus>(&mut self, bus: &mut B, cond: Option<Cond>) {
        let offset = self.fetch8(bus) as i8;
        if self.branch_taken(cond, JUMP_TAKEN_BONUS) {
            self.regs.pc = self.regs.pc.wrapping_add(offset as u16);
        }
    }

    fn jump_absolute<B: Bus>(&mut self, bus: &mut B, cond: Option<Cond>) {
        let addr = self.fetch16(bus);
        if self.branch_taken(cond, JUMP_TAKEN_BONUS) {
            self.regs.pc = addr;
        }
    }

    fn call_absolute<B: Bus>(&mut self, bus: &mut B, cond: Option<Cond>) {
        let addr = self.fetch16(bus);
        if self.branch_taken(cond, CALL_RET_TAKEN_BONUS) {
            self.call(bus, addr);
        }
    }

    fn ret_conditional<B: Bus>(&mut self, bus: &mut B, cond: Cond) {
        if self.branch_taken(Some(cond), CALL_RET_TAKEN_BONUS) {
            self.ret(bus);
        }
    }

    /// Unconditional forms carry their full cost in the base table; the
    /// conditional forms pay `bonus` only when taken.
    fn branch_taken(&mut self, cond: Option<Cond>, bonus: u32) -> bool {
        match cond {
            None => true,
            Some(cond) if cond.holds(self.regs.flags()) => {
                self.last_instruction_cycles += bonus;
                true
            }
            Some(_) => false,
        }
    }

    fn stop<B: Bus>(&mut self, bus: &mut B) {
        // STOP is two bytes; the second is expected to be 0x00 but is never
        // checked.
        let _ = self.fetch8(bus);
        self.halted = true;
        if self.model != Model::Cgb {
            log::debug!("STOP at {:04X}", self.regs.pc.wrapping_sub(2));
            return;
        }

        self.stopped = true;
        if bus.speed_switch_armed() {
            self.double_speed = !self.double_speed;
            bus.complete_speed_switch(self.double_speed);
            self.halted = false;
            self.stopped = false;
            log::debug!(
                "speed switch: {} speed",
                if self.double_speed { "double" } else { "normal" }
            );
        }
    }

    pub(super) fn execute<B: Bus>(
        &mut self,
        opcode: u8,
        pc: u16,
        bus: &mut B,
    ) -> Result<(), CpuError> {
        match decode::classify(opcode) {
            Group::Halt => {
                self.halted = true;
                log::debug!("HALT at {pc:04X}");
            }
            Group::Load { dst, src } => {
                let val = self.read_operand(bus, src);
                self.write_operand(bus, dst, val);
            }
            Group::Alu { op, src } => {
                let val = self.read_operand(bus, src);
                self.alu(op, val);
            }
            Group::LoadImmediate(dst) => {
                let val = self.fetch8(bus);
                self.write_operand(bus, dst, val);
            }
            Group::AluImmediate(op) => {
                let val = self.fetch8(bus);
                self.alu(op, val);
            }
            Group::LoadA(src) => {
                let addr = self.indirect_addr(src);
                self.regs.a = bus.read(addr);
            }
            Group::StoreA(dst) => {
                let addr = self.indirect_addr(dst);
                bus.write(addr, self.regs.a);
            }
            Group::Inc(target) => {
                let val = self.read_operand(bus, target);
                let (res, flags) = alu::inc(val, self.regs.flags());
                self.write_operand(bus, target, res);
                self.regs.set_flags(flags);
            }
            Group::Dec(target) => {
                let val = self.read_operand(bus, target);
                let (res, flags) = alu::dec(val, self.regs.flags());
                self.write_operand(bus, target, res);
                self.regs.set_flags(flags);
            }
            Group::Other => return self.execute_other(opcode, pc, bus),
        }
        Ok(())
    }

    fn execute_other<B: Bus>(
        &mut self,
        opcode: u8,
        pc: u16,
        bus: &mut B,
    ) -> Result<(), CpuError> {
        match opcode {
            0x00 => {}
            0x01 | 0x11 | 0x21 | 0x31 => {
                let val = self.fetch16(bus);
                self.set_pair(Pair::from_bits(opcode >> 4), val);
            }
            0x03 | 0x13 | 0x23 | 0x33 => {
                let pair = Pair::from_bits(opcode >> 4);
                self.set_pair(pair, self.pair(pair).wrapping_add(1));
            }
            0x0B | 0x1B | 0x2B | 0x3B => {
                let pair = Pair::from_bits(opcode >> 4);
                self.set_pair(pair, self.pair(pair).wrapping_sub(1));
            }
            0x09 | 0x19 | 0x29 | 0x39 => {
                let operand = self.pair(Pair::from_bits(opcode >> 4));
                let (res, flags) = alu::add16(self.regs.hl(), operand, self.regs.flags());
                self.regs.set_hl(res);
                self.regs.set_flags(flags);
            }
            0x07 => self.rotate_a(ShiftOp::Rlc),
            0x0F => self.rotate_a(ShiftOp::Rrc),
            0x17 => self.rotate_a(ShiftOp::Rl),
            0x1F => self.rotate_a(ShiftOp::Rr),
            0x08 => {
                let addr = self.fetch16(bus);
                let [hi, lo] = self.regs.sp.to_be_bytes();
                bus.write(addr, lo);
                bus.write(addr.wrapping_add(1), hi);
            }
            0x10 => self.stop(bus),
            0x18 => self.jump_relative(bus, None),
            0x20 | 0x28 | 0x30 | 0x38 => {
                self.jump_relative(bus, Some(Cond::from_bits(opcode >> 3)));
            }
            0x27 => {
                let (res, flags) = alu::daa(self.regs.a, self.regs.flags());
                self.regs.a = res;
                self.regs.set_flags(flags);
            }
            0x2F => {
                self.regs.a = !self.regs.a;
                let flags = self.regs.flags().with_n(true).with_h(true);
                self.regs.set_flags(flags);
            }
            0x37 => {
                let flags = self.regs.flags().with_n(false).with_h(false).with_c(true);
                self.regs.set_flags(flags);
            }
            0x3F => {
                let flags = self.regs.flags();
                self.regs
                    .set_flags(flags.with_n(false).with_h(false).with_c(!flags.c()));
            }
            0xC0 | 0xC8 | 0xD0 | 0xD8 => {
                self.ret_conditional(bus, Cond::from_bits(opcode >> 3));
            }
            0xC1 | 0xD1 | 0xE1 | 0xF1 => {
                let val = self.pop16(bus);
                match StackPair::from_bits(opcode >> 4) {
                    StackPair::Bc => self.regs.set_bc(val),
                    StackPair::De => self.regs.set_de(val),
                    StackPair::Hl => self.regs.set_hl(val),
                    StackPair::Af => self.regs.set_af(val),
                }
            }
            0xC5 | 0xD5 | 0xE5 | 0xF5 => {
                let val = match StackPair::from_bits(opcode >> 4) {
                    StackPair::Bc => self.regs.bc(),
                    StackPair::De => self.regs.de(),
                    StackPair::Hl => self.regs.hl(),
                    StackPair::Af => self.regs.af(),
                };
                self.push16(bus, val);
            }
            0xC2 | 0xCA | 0xD2 | 0xDA => {
                self.jump_absolute(bus, Some(Cond::from_bits(opcode >> 3)));
            }
            0xC3 => self.jump_absolute(bus, None),
            0xC4 | 0xCC | 0xD4 | 0xDC => {
                self.call_absolute(bus, Some(Cond::from_bits(opcode >> 3)));
            }
            0xCD => self.call_absolute(bus, None),
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
                self.call(bus, (opcode & 0x38) as u16);
            }
            0xC9 => self.ret(bus),
            0xD9 => {
                // Unlike EI there is no delay: IME is on for the very next
                // instruction.
                self.ret(bus);
                self.ime = true;
            }
            0xCB => self.execute_cb(bus),
            0xE0 => {
                let addr = 0xFF00 | self.fetch8(bus) as u16;
                bus.write(addr, self.regs.a);
            }
            0xF0 => {
                let addr = 0xFF00 | self.fetch8(bus) as u16;
                self.regs.a = bus.read_high_ram(addr);
            }
            0xE2 => bus.write(0xFF00 | self.regs.c as u16, self.regs.a),
            0xF2 => self.regs.a = bus.read(0xFF00 | self.regs.c as u16),
            0xE8 => {
                let offset = self.fetch8(bus) as i8;
                let (res, flags) = alu::add16_signed(self.regs.sp, offset);
                self.regs.sp = res;
                self.regs.set_flags(flags);
            }
            0xF8 => {
                let offset = self.fetch8(bus) as i8;
                let (res, flags) = alu::add16_signed(self.regs.sp, offset);
                self.regs.set_hl(res);
                self.regs.set_flags(flags);
            }
            0xE9 => self.regs.pc = self.regs.hl(),
            0xF9 => self.regs.sp = self.regs.hl(),
            0xEA => {
                let addr = self.fetch16(bus);
                bus.write(addr, self.regs.a);
            }
            0xFA => {
                let addr = self.fetch16(bus);
                self.regs.a = bus.read(addr);
            }
            0xF3 => {
                self.ime = false;
                self.ime_pending = false;
            }
            0xFB => self.ime_pending = true,
            _ => return Err(CpuError::UnknownOpcode { opcode, pc }),
        }
        Ok(())
    }
}
