//! Arithmetic/logic primitives.
//!
//! Every function is pure: it takes operands (and the incoming flags where an
//! instruction reads or preserves them) and returns the result together with
//! the complete new flag register. Callers decide where the result is stored.

use crate::registers::Flags;

/// 8-bit accumulator operations, in the order encoded by bits 3-5 of the
/// 0x80-0xBF and 0xC6-0xFE opcode blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbc,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            _ => AluOp::Cp,
        }
    }

    /// Apply the operation to the accumulator. `Cp` returns `a` unchanged.
    pub fn apply(self, a: u8, operand: u8, flags: Flags) -> (u8, Flags) {
        match self {
            AluOp::Add => add(a, operand, false),
            AluOp::Adc => add(a, operand, flags.c()),
            AluOp::Sub => sub(a, operand, false),
            AluOp::Sbc => sub(a, operand, flags.c()),
            AluOp::And => and(a, operand),
            AluOp::Xor => xor(a, operand),
            AluOp::Or => or(a, operand),
            AluOp::Cp => (a, cp(a, operand)),
        }
    }
}

/// CB-prefixed rotate/shift operations, in the order encoded by bits 3-5 of
/// the 0x00-0x3F CB block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl ShiftOp {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => ShiftOp::Rlc,
            1 => ShiftOp::Rrc,
            2 => ShiftOp::Rl,
            3 => ShiftOp::Rr,
            4 => ShiftOp::Sla,
            5 => ShiftOp::Sra,
            6 => ShiftOp::Swap,
            _ => ShiftOp::Srl,
        }
    }

    /// `carry` is the current C flag, consumed only by `Rl` and `Rr`.
    pub fn apply(self, val: u8, carry: bool) -> (u8, Flags) {
        match self {
            ShiftOp::Rlc => rlc(val),
            ShiftOp::Rrc => rrc(val),
            ShiftOp::Rl => rl(val, carry),
            ShiftOp::Rr => rr(val, carry),
            ShiftOp::Sla => sla(val),
            ShiftOp::Sra => sra(val),
            ShiftOp::Swap => swap(val),
            ShiftOp::Srl => srl(val),
        }
    }
}

pub fn add(a: u8, b: u8, carry_in: bool) -> (u8, Flags) {
    let carry = carry_in as u16;
    let sum = a as u16 + b as u16 + carry;
    let res = sum as u8;
    let half = (a & 0x0F) as u16 + (b & 0x0F) as u16 + carry > 0x0F;
    (res, Flags::new(res == 0, false, half, sum > 0xFF))
}

pub fn sub(a: u8, b: u8, carry_in: bool) -> (u8, Flags) {
    let carry = carry_in as i16;
    let diff = a as i16 - b as i16 - carry;
    let res = diff as u8;
    let half = (a & 0x0F) as i16 - (b & 0x0F) as i16 - carry < 0;
    (res, Flags::new(res == 0, true, half, diff < 0))
}

pub fn and(a: u8, b: u8) -> (u8, Flags) {
    let res = a & b;
    (res, Flags::new(res == 0, false, true, false))
}

pub fn or(a: u8, b: u8) -> (u8, Flags) {
    let res = a | b;
    (res, Flags::new(res == 0, false, false, false))
}

pub fn xor(a: u8, b: u8) -> (u8, Flags) {
    let res = a ^ b;
    (res, Flags::new(res == 0, false, false, false))
}

/// Compare: the flags of `a - b` with the result discarded.
pub fn cp(a: u8, b: u8) -> Flags {
    sub(a, b, false).1
}

/// C is carried over from `flags`.
pub fn inc(val: u8, flags: Flags) -> (u8, Flags) {
    let res = val.wrapping_add(1);
    (res, Flags::new(res == 0, false, val & 0x0F == 0x0F, flags.c()))
}

/// C is carried over from `flags`.
pub fn dec(val: u8, flags: Flags) -> (u8, Flags) {
    let res = val.wrapping_sub(1);
    (res, Flags::new(res == 0, true, val & 0x0F == 0x00, flags.c()))
}

/// `ADD HL,rr`. Z is carried over from `flags`.
pub fn add16(base: u16, operand: u16, flags: Flags) -> (u16, Flags) {
    let sum = base as u32 + operand as u32;
    let half = (base & 0x0FFF) + (operand & 0x0FFF) > 0x0FFF;
    (
        sum as u16,
        Flags::new(flags.z(), false, half, sum > 0xFFFF),
    )
}

/// `ADD SP,e` / `LD HL,SP+e`. H and C come from the low byte of the addition.
pub fn add16_signed(base: u16, offset: i8) -> (u16, Flags) {
    let operand = offset as i16 as u16;
    let res = base.wrapping_add(operand);
    let carries = base ^ operand ^ res;
    (
        res,
        Flags::new(false, false, carries & 0x0010 != 0, carries & 0x0100 != 0),
    )
}

/// Decimal-adjust the accumulator after a BCD add or subtract.
pub fn daa(a: u8, flags: Flags) -> (u8, Flags) {
    let mut res = a;
    let mut carry = flags.c();
    if !flags.n() {
        if flags.c() || a > 0x99 {
            res = res.wrapping_add(0x60);
            carry = true;
        }
        if flags.h() || a & 0x0F > 0x09 {
            res = res.wrapping_add(0x06);
        }
    } else if flags.c() && flags.h() {
        res = res.wrapping_add(0x9A);
    } else if flags.c() {
        res = res.wrapping_add(0xA0);
    } else if flags.h() {
        res = res.wrapping_add(0xFA);
    }
    (res, Flags::new(res == 0, flags.n(), false, carry))
}

#[inline]
fn shifted(res: u8, carry_out: bool) -> (u8, Flags) {
    (res, Flags::new(res == 0, false, false, carry_out))
}

pub fn rlc(val: u8) -> (u8, Flags) {
    shifted(val.rotate_left(1), val & 0x80 != 0)
}

pub fn rrc(val: u8) -> (u8, Flags) {
    shifted(val.rotate_right(1), val & 0x01 != 0)
}

pub fn rl(val: u8, carry: bool) -> (u8, Flags) {
    shifted((val << 1) | carry as u8, val & 0x80 != 0)
}

pub fn rr(val: u8, carry: bool) -> (u8, Flags) {
    shifted((val >> 1) | ((carry as u8) << 7), val & 0x01 != 0)
}

pub fn sla(val: u8) -> (u8, Flags) {
    shifted(val << 1, val & 0x80 != 0)
}

pub fn sra(val: u8) -> (u8, Flags) {
    shifted((val >> 1) | (val & 0x80), val & 0x01 != 0)
}

pub fn srl(val: u8) -> (u8, Flags) {
    shifted(val >> 1, val & 0x01 != 0)
}

pub fn swap(val: u8) -> (u8, Flags) {
    shifted(val.rotate_left(4), false)
}

/// `BIT b,val`. C is carried over from `flags`.
pub fn bit(index: u8, val: u8, flags: Flags) -> Flags {
    Flags::new(val & (1 << (index & 0x07)) == 0, false, true, flags.c())
}
