use crate::alu::{AluOp, ShiftOp};
use crate::cpu::decode::{self, CbOp, Cond, Group, Indirect, Operand, Pair, StackPair};

fn operand(op: Operand) -> &'static str {
    match op {
        Operand::B => "B",
        Operand::C => "C",
        Operand::D => "D",
        Operand::E => "E",
        Operand::H => "H",
        Operand::L => "L",
        Operand::MemHl => "(HL)",
        Operand::A => "A",
    }
}

fn pair(p: Pair) -> &'static str {
    match p {
        Pair::Bc => "BC",
        Pair::De => "DE",
        Pair::Hl => "HL",
        Pair::Sp => "SP",
    }
}

fn stack_pair(p: StackPair) -> &'static str {
    match p {
        StackPair::Bc => "BC",
        StackPair::De => "DE",
        StackPair::Hl => "HL",
        StackPair::Af => "AF",
    }
}

fn cond(c: Cond) -> &'static str {
    match c {
        Cond::Nz => "NZ",
        Cond::Z => "Z",
        Cond::Nc => "NC",
        Cond::C => "C",
    }
}

fn indirect(i: Indirect) -> &'static str {
    match i {
        Indirect::Bc => "(BC)",
        Indirect::De => "(DE)",
        Indirect::HlInc => "(HL+)",
        Indirect::HlDec => "(HL-)",
    }
}

fn alu(op: AluOp) -> &'static str {
    match op {
        AluOp::Add => "ADD A,",
        AluOp::Adc => "ADC A,",
        AluOp::Sub => "SUB ",
        AluOp::Sbc => "SBC A,",
        AluOp::And => "AND ",
        AluOp::Xor => "XOR ",
        AluOp::Or => "OR ",
        AluOp::Cp => "CP ",
    }
}

fn shift(op: ShiftOp) -> &'static str {
    match op {
        ShiftOp::Rlc => "RLC",
        ShiftOp::Rrc => "RRC",
        ShiftOp::Rl => "RL",
        ShiftOp::Rr => "RR",
        ShiftOp::Sla => "SLA",
        ShiftOp::Sra => "SRA",
        ShiftOp::Swap => "SWAP",
        ShiftOp::Srl => "SRL",
    }
}

/// Decode the instruction at the start of `bytes`.
///
/// `addr` is the address of the first byte and is only used to resolve
/// relative jump targets. Missing trailing bytes read as zero. Returns the
/// mnemonic and the instruction length in bytes.
pub fn decode(bytes: &[u8], addr: u16) -> (String, u16) {
    let get = |offset: usize| bytes.get(offset).copied().unwrap_or(0);
    let op = get(0);
    let imm8 = get(1);
    let imm16 = u16::from_le_bytes([get(1), get(2)]);

    match decode::classify(op) {
        Group::Halt => ("HALT".to_string(), 1),
        Group::Load { dst, src } => (format!("LD {},{}", operand(dst), operand(src)), 1),
        Group::Alu { op, src } => (format!("{}{}", alu(op), operand(src)), 1),
        Group::LoadImmediate(dst) => (format!("LD {},${imm8:02X}", operand(dst)), 2),
        Group::AluImmediate(op) => (format!("{}${imm8:02X}", alu(op)), 2),
        Group::LoadA(src) => (format!("LD A,{}", indirect(src)), 1),
        Group::StoreA(dst) => (format!("LD {},A", indirect(dst)), 1),
        Group::Inc(target) => (format!("INC {}", operand(target)), 1),
        Group::Dec(target) => (format!("DEC {}", operand(target)), 1),
        Group::Other => decode_other(op, imm8, imm16, addr),
    }
}

/// Decode the instruction at `addr` in a full 64 KiB memory image, wrapping
/// operand bytes past 0xFFFF.
pub fn decode_at(mem: &[u8], addr: u16) -> (String, u16) {
    let window: [u8; 3] = std::array::from_fn(|i| {
        mem.get(addr.wrapping_add(i as u16) as usize)
            .copied()
            .unwrap_or(0)
    });
    decode(&window, addr)
}

fn decode_other(op: u8, imm8: u8, imm16: u16, addr: u16) -> (String, u16) {
    let y = (op >> 3) & 0x07;
    let selected_pair = Pair::from_bits(op >> 4);
    let relative = |mnemonic: String| {
        let dest = addr.wrapping_add(2).wrapping_add(imm8 as i8 as u16);
        (format!("{mnemonic}${dest:04X}"), 2)
    };

    match op {
        0x00 => ("NOP".to_string(), 1),
        0x01 | 0x11 | 0x21 | 0x31 => (format!("LD {},${imm16:04X}", pair(selected_pair)), 3),
        0x03 | 0x13 | 0x23 | 0x33 => (format!("INC {}", pair(selected_pair)), 1),
        0x0B | 0x1B | 0x2B | 0x3B => (format!("DEC {}", pair(selected_pair)), 1),
        0x09 | 0x19 | 0x29 | 0x39 => (format!("ADD HL,{}", pair(selected_pair)), 1),
        0x07 => ("RLCA".to_string(), 1),
        0x0F => ("RRCA".to_string(), 1),
        0x17 => ("RLA".to_string(), 1),
        0x1F => ("RRA".to_string(), 1),
        0x08 => (format!("LD (${imm16:04X}),SP"), 3),
        0x10 => ("STOP".to_string(), 2),
        0x18 => relative("JR ".to_string()),
        0x20 | 0x28 | 0x30 | 0x38 => relative(format!("JR {},", cond(Cond::from_bits(y)))),
        0x27 => ("DAA".to_string(), 1),
        0x2F => ("CPL".to_string(), 1),
        0x37 => ("SCF".to_string(), 1),
        0x3F => ("CCF".to_string(), 1),
        0xC0 | 0xC8 | 0xD0 | 0xD8 => (format!("RET {}", cond(Cond::from_bits(y))), 1),
        0xC1 | 0xD1 | 0xE1 | 0xF1 => {
            (format!("POP {}", stack_pair(StackPair::from_bits(op >> 4))), 1)
        }
        0xC5 | 0xD5 | 0xE5 | 0xF5 => {
            (format!("PUSH {}", stack_pair(StackPair::from_bits(op >> 4))), 1)
        }
        0xC2 | 0xCA | 0xD2 | 0xDA => {
            (format!("JP {},${imm16:04X}", cond(Cond::from_bits(y))), 3)
        }
        0xC3 => (format!("JP ${imm16:04X}"), 3),
        0xC4 | 0xCC | 0xD4 | 0xDC => {
            (format!("CALL {},${imm16:04X}", cond(Cond::from_bits(y))), 3)
        }
        0xCD => (format!("CALL ${imm16:04X}"), 3),
        0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
            (format!("RST ${:02X}", op & 0x38), 1)
        }
        0xC9 => ("RET".to_string(), 1),
        0xD9 => ("RETI".to_string(), 1),
        0xCB => (decode_cb(imm8), 2),
        0xE0 => (format!("LDH ($FF{imm8:02X}),A"), 2),
        0xF0 => (format!("LDH A,($FF{imm8:02X})"), 2),
        0xE2 => ("LD ($FF00+C),A".to_string(), 1),
        0xF2 => ("LD A,($FF00+C)".to_string(), 1),
        0xE8 => (format!("ADD SP,{}", imm8 as i8), 2),
        0xF8 => (format!("LD HL,SP{:+}", imm8 as i8), 2),
        0xE9 => ("JP HL".to_string(), 1),
        0xF9 => ("LD SP,HL".to_string(), 1),
        0xEA => (format!("LD (${imm16:04X}),A"), 3),
        0xFA => (format!("LD A,(${imm16:04X})"), 3),
        0xF3 => ("DI".to_string(), 1),
        0xFB => ("EI".to_string(), 1),
        _ => (format!("DB ${op:02X}"), 1),
    }
}

fn decode_cb(op: u8) -> String {
    let (cb, target) = decode::classify_cb(op);
    let target = operand(target);
    match cb {
        CbOp::Shift(s) => format!("{} {target}", shift(s)),
        CbOp::Bit(b) => format!("BIT {b},{target}"),
        CbOp::Res(b) => format!("RES {b},{target}"),
        CbOp::Set(b) => format!("SET {b},{target}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_groups() {
        assert_eq!(decode(&[0x78], 0), ("LD A,B".to_string(), 1));
        assert_eq!(decode(&[0x36, 0x42], 0), ("LD (HL),$42".to_string(), 2));
        assert_eq!(decode(&[0xAF], 0), ("XOR A".to_string(), 1));
        assert_eq!(decode(&[0xCE, 0x01], 0), ("ADC A,$01".to_string(), 2));
        assert_eq!(decode(&[0x2A], 0), ("LD A,(HL+)".to_string(), 1));
        assert_eq!(decode(&[0x76], 0), ("HALT".to_string(), 1));
    }

    #[test]
    fn relative_jumps_show_target() {
        assert_eq!(decode(&[0x20, 0xFB], 0x0200), ("JR NZ,$01FD".to_string(), 2));
        assert_eq!(decode(&[0x18, 0x00], 0x0150), ("JR $0152".to_string(), 2));
    }

    #[test]
    fn immediates_are_little_endian() {
        assert_eq!(decode(&[0xCD, 0x34, 0x12], 0), ("CALL $1234".to_string(), 3));
        assert_eq!(decode(&[0x31, 0xFE, 0xFF], 0), ("LD SP,$FFFE".to_string(), 3));
        assert_eq!(decode(&[0xC2, 0x00, 0x80], 0), ("JP NZ,$8000".to_string(), 3));
    }

    #[test]
    fn cb_prefix_is_two_bytes() {
        assert_eq!(decode(&[0xCB, 0x37], 0), ("SWAP A".to_string(), 2));
        assert_eq!(decode(&[0xCB, 0x46], 0), ("BIT 0,(HL)".to_string(), 2));
        assert_eq!(decode(&[0xCB, 0xFF], 0), ("SET 7,A".to_string(), 2));
    }

    #[test]
    fn undefined_bytes_render_as_data() {
        for op in [0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD] {
            assert_eq!(decode(&[op], 0), (format!("DB ${op:02X}"), 1));
        }
    }

    #[test]
    fn decode_at_wraps_operands() {
        let mut mem = vec![0u8; 0x10000];
        mem[0xFFFF] = 0xC3;
        mem[0x0000] = 0x50;
        mem[0x0001] = 0x01;
        assert_eq!(decode_at(&mem, 0xFFFF), ("JP $0150".to_string(), 3));
        assert_eq!(decode(&[0xF8, 0xFE], 0), ("LD HL,SP-2".to_string(), 2));
    }
}
