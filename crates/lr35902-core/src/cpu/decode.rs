//! Bit-field decoding of the primary and CB opcode tables.
//!
//! The regular parts of the instruction set are recognized from their bit
//! patterns; everything else is reported as [`Group::Other`] and handled one
//! opcode at a time by the dispatcher.

use crate::alu::{AluOp, ShiftOp};
use crate::registers::Flags;

/// 8-bit operand selected by a 3-bit field, in encoding order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    B,
    C,
    D,
    E,
    H,
    L,
    /// The byte at address HL.
    MemHl,
    A,
}

impl Operand {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Operand::B,
            1 => Operand::C,
            2 => Operand::D,
            3 => Operand::E,
            4 => Operand::H,
            5 => Operand::L,
            6 => Operand::MemHl,
            _ => Operand::A,
        }
    }
}

/// Register pair selected by bits 4-5 in the 16-bit load/arithmetic opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pair {
    Bc,
    De,
    Hl,
    Sp,
}

impl Pair {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Pair::Bc,
            1 => Pair::De,
            2 => Pair::Hl,
            _ => Pair::Sp,
        }
    }
}

/// Register pair selected by bits 4-5 in PUSH/POP, where SP's slot is AF.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackPair {
    Bc,
    De,
    Hl,
    Af,
}

impl StackPair {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => StackPair::Bc,
            1 => StackPair::De,
            2 => StackPair::Hl,
            _ => StackPair::Af,
        }
    }
}

/// Branch condition selected by bits 3-4.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cond {
    Nz,
    Z,
    Nc,
    C,
}

impl Cond {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Cond::Nz,
            1 => Cond::Z,
            2 => Cond::Nc,
            _ => Cond::C,
        }
    }

    pub const fn holds(self, flags: Flags) -> bool {
        match self {
            Cond::Nz => !flags.z(),
            Cond::Z => flags.z(),
            Cond::Nc => !flags.c(),
            Cond::C => flags.c(),
        }
    }
}

/// Address source of the `LD A,(rr)` / `LD (rr),A` family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indirect {
    Bc,
    De,
    /// HL, incremented after the access.
    HlInc,
    /// HL, decremented after the access.
    HlDec,
}

impl Indirect {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Indirect::Bc,
            1 => Indirect::De,
            2 => Indirect::HlInc,
            _ => Indirect::HlDec,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Group {
    Halt,
    /// `LD dst,src` (0x40-0x7F except 0x76).
    Load { dst: Operand, src: Operand },
    /// `op A,src` (0x80-0xBF).
    Alu { op: AluOp, src: Operand },
    /// `LD dst,n`.
    LoadImmediate(Operand),
    /// `op A,n`.
    AluImmediate(AluOp),
    /// `LD A,(rr)`.
    LoadA(Indirect),
    /// `LD (rr),A`.
    StoreA(Indirect),
    Inc(Operand),
    Dec(Operand),
    /// No bit-field rule applies.
    Other,
}

/// Classify a primary opcode by its bit fields.
pub const fn classify(opcode: u8) -> Group {
    if opcode == 0x76 {
        return Group::Halt;
    }
    let y = (opcode >> 3) & 0x07;
    let z = opcode & 0x07;
    match opcode & 0xC0 {
        0x40 => {
            return Group::Load {
                dst: Operand::from_bits(y),
                src: Operand::from_bits(z),
            };
        }
        0x80 => {
            return Group::Alu {
                op: AluOp::from_bits(y),
                src: Operand::from_bits(z),
            };
        }
        _ => {}
    }
    match opcode & 0xC7 {
        0x04 => return Group::Inc(Operand::from_bits(y)),
        0x05 => return Group::Dec(Operand::from_bits(y)),
        0x06 => return Group::LoadImmediate(Operand::from_bits(y)),
        0xC6 => return Group::AluImmediate(AluOp::from_bits(y)),
        _ => {}
    }
    match opcode & 0xCF {
        0x0A => Group::LoadA(Indirect::from_bits(opcode >> 4)),
        0x02 => Group::StoreA(Indirect::from_bits(opcode >> 4)),
        _ => Group::Other,
    }
}

/// Operation half of a CB-prefixed opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CbOp {
    Shift(ShiftOp),
    Bit(u8),
    Res(u8),
    Set(u8),
}

/// Split a CB-prefixed opcode into its operation (bits 3-7) and operand
/// (bits 0-2).
pub const fn classify_cb(opcode: u8) -> (CbOp, Operand) {
    let y = (opcode >> 3) & 0x07;
    let op = match opcode >> 6 {
        0 => CbOp::Shift(ShiftOp::from_bits(y)),
        1 => CbOp::Bit(y),
        2 => CbOp::Res(y),
        _ => CbOp::Set(y),
    };
    (op, Operand::from_bits(opcode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_block_decodes_destination_and_source() {
        assert_eq!(
            classify(0x41),
            Group::Load {
                dst: Operand::B,
                src: Operand::C
            }
        );
        assert_eq!(
            classify(0x77),
            Group::Load {
                dst: Operand::MemHl,
                src: Operand::A
            }
        );
        assert_eq!(
            classify(0x7E),
            Group::Load {
                dst: Operand::A,
                src: Operand::MemHl
            }
        );
        assert_eq!(classify(0x76), Group::Halt);
    }

    #[test]
    fn alu_blocks_decode_operation() {
        assert_eq!(
            classify(0x86),
            Group::Alu {
                op: AluOp::Add,
                src: Operand::MemHl
            }
        );
        assert_eq!(
            classify(0xAF),
            Group::Alu {
                op: AluOp::Xor,
                src: Operand::A
            }
        );
        assert_eq!(classify(0xFE), Group::AluImmediate(AluOp::Cp));
        assert_eq!(classify(0xD6), Group::AluImmediate(AluOp::Sub));
    }

    #[test]
    fn column_groups() {
        assert_eq!(classify(0x36), Group::LoadImmediate(Operand::MemHl));
        assert_eq!(classify(0x3E), Group::LoadImmediate(Operand::A));
        assert_eq!(classify(0x3C), Group::Inc(Operand::A));
        assert_eq!(classify(0x35), Group::Dec(Operand::MemHl));
        assert_eq!(classify(0x0A), Group::LoadA(Indirect::Bc));
        assert_eq!(classify(0x3A), Group::LoadA(Indirect::HlDec));
        assert_eq!(classify(0x22), Group::StoreA(Indirect::HlInc));
        assert_eq!(classify(0x12), Group::StoreA(Indirect::De));
    }

    #[test]
    fn irregular_opcodes_fall_through() {
        for op in [0x00, 0x01, 0x07, 0x10, 0x18, 0x27, 0xC3, 0xCB, 0xCD, 0xE0, 0xF3, 0xFB, 0xD3] {
            assert_eq!(classify(op), Group::Other, "{op:02X}");
        }
    }

    #[test]
    fn cb_split() {
        assert_eq!(classify_cb(0x37), (CbOp::Shift(ShiftOp::Swap), Operand::A));
        assert_eq!(classify_cb(0x0E), (CbOp::Shift(ShiftOp::Rrc), Operand::MemHl));
        assert_eq!(classify_cb(0x7C), (CbOp::Bit(7), Operand::H));
        assert_eq!(classify_cb(0x86), (CbOp::Res(0), Operand::MemHl));
        assert_eq!(classify_cb(0xFF), (CbOp::Set(7), Operand::A));
    }

    #[test]
    fn conditions_read_z_and_c() {
        let z = Flags::default().with_z(true);
        assert!(Cond::Z.holds(z));
        assert!(!Cond::Nz.holds(z));
        assert!(Cond::Nc.holds(z));
        assert!(Cond::from_bits(3).holds(Flags::default().with_c(true)));
    }
}
