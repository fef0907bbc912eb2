// CPU flag bits as documented in gbdev.io/pandocs/The_CPU_Flags.html
pub const FLAG_Z: u8 = 0x80; // Zero
pub const FLAG_N: u8 = 0x40; // Subtract
pub const FLAG_H: u8 = 0x20; // Half Carry
pub const FLAG_C: u8 = 0x10; // Carry

/// Bits 0-3 of F do not exist in hardware and always read back as zero.
const F_MASK: u8 = 0xF0;

/// Contents of the flag register.
///
/// The low nibble is masked off on construction, so a `Flags` value can
/// always be stored into F as-is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Flags(u8);

impl Flags {
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & F_MASK)
    }

    pub const fn new(z: bool, n: bool, h: bool, c: bool) -> Self {
        let mut bits = 0;
        if z {
            bits |= FLAG_Z;
        }
        if n {
            bits |= FLAG_N;
        }
        if h {
            bits |= FLAG_H;
        }
        if c {
            bits |= FLAG_C;
        }
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn z(self) -> bool {
        self.0 & FLAG_Z != 0
    }

    #[inline]
    pub const fn n(self) -> bool {
        self.0 & FLAG_N != 0
    }

    #[inline]
    pub const fn h(self) -> bool {
        self.0 & FLAG_H != 0
    }

    #[inline]
    pub const fn c(self) -> bool {
        self.0 & FLAG_C != 0
    }

    #[inline]
    const fn with(self, mask: u8, on: bool) -> Self {
        if on {
            Self(self.0 | mask)
        } else {
            Self(self.0 & !mask)
        }
    }

    pub const fn with_z(self, on: bool) -> Self {
        self.with(FLAG_Z, on)
    }

    pub const fn with_n(self, on: bool) -> Self {
        self.with(FLAG_N, on)
    }

    pub const fn with_h(self, on: bool) -> Self {
        self.with(FLAG_H, on)
    }

    pub const fn with_c(self, on: bool) -> Self {
        self.with(FLAG_C, on)
    }
}

/// The LR35902 register file.
///
/// The eight 8-bit registers pair up as AF, BC, DE and HL. F is private so
/// that every write goes through the low-nibble mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}

impl Registers {
    #[inline]
    pub fn f(&self) -> u8 {
        self.f
    }

    #[inline]
    pub fn set_f(&mut self, val: u8) {
        self.f = val & F_MASK;
    }

    #[inline]
    pub fn flags(&self) -> Flags {
        Flags::from_bits(self.f)
    }

    #[inline]
    pub fn set_flags(&mut self, flags: Flags) {
        self.f = flags.bits();
    }

    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.a, self.f])
    }

    pub fn set_af(&mut self, val: u16) {
        let [a, f] = val.to_be_bytes();
        self.a = a;
        self.set_f(f);
    }

    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    pub fn set_bc(&mut self, val: u16) {
        [self.b, self.c] = val.to_be_bytes();
    }

    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    pub fn set_de(&mut self, val: u16) {
        [self.d, self.e] = val.to_be_bytes();
    }

    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    pub fn set_hl(&mut self, val: u16) {
        [self.h, self.l] = val.to_be_bytes();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn af_write_masks_low_nibble() {
        let mut regs = Registers::default();
        regs.set_af(0x12FF);
        assert_eq!(regs.a, 0x12);
        assert_eq!(regs.f(), 0xF0);
        assert_eq!(regs.af(), 0x12F0);

        regs.set_f(0x3C);
        assert_eq!(regs.f(), 0x30);
    }

    #[test]
    fn pairs_split_high_and_low_bytes() {
        let mut regs = Registers::default();
        regs.set_bc(0x1234);
        regs.set_de(0x5678);
        regs.set_hl(0x9ABC);
        assert_eq!((regs.b, regs.c), (0x12, 0x34));
        assert_eq!((regs.d, regs.e), (0x56, 0x78));
        assert_eq!((regs.h, regs.l), (0x9A, 0xBC));

        regs.l = 0xFF;
        assert_eq!(regs.hl(), 0x9AFF);
    }

    #[test]
    fn flag_builders_touch_single_bits() {
        let flags = Flags::default().with_z(true).with_c(true);
        assert_eq!(flags.bits(), FLAG_Z | FLAG_C);
        assert!(!flags.n());
        assert!(!flags.h());

        let flags = flags.with_z(false).with_h(true);
        assert_eq!(flags.bits(), FLAG_H | FLAG_C);
        assert_eq!(Flags::from_bits(0xFF).bits(), 0xF0);
        assert_eq!(Flags::new(true, true, true, true).bits(), 0xF0);
    }
}
