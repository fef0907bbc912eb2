/// Interrupt enable register.
pub const IE_ADDR: u16 = 0xFFFF;
/// Interrupt request register.
pub const IF_ADDR: u16 = 0xFF0F;
/// CGB speed switch register.
pub const KEY1_ADDR: u16 = 0xFF4D;

/// Byte-addressable memory as seen by the CPU.
///
/// Implemented by whatever owns the memory map (cartridge, video, audio,
/// timers). The CPU never caches memory contents, so every access goes
/// through this trait in program order.
pub trait Bus {
    fn read(&mut self, addr: u16) -> u8;

    fn write(&mut self, addr: u16, val: u8);

    /// Read used by `LDH A,(n)`. Memory maps that block ordinary reads of the
    /// 0xFF00 page during certain video modes must let this one through.
    fn read_high_ram(&mut self, addr: u16) -> u8 {
        self.read(addr)
    }

    /// Interrupt lines that are both requested and enabled (`IE & IF`).
    fn pending_interrupts(&mut self) -> u8 {
        self.read(IE_ADDR) & self.read(IF_ADDR) & 0x1F
    }

    /// Clear the request bits in `mask` once the CPU has taken the interrupt.
    fn acknowledge_interrupt(&mut self, mask: u8) {
        let requested = self.read(IF_ADDR);
        self.write(IF_ADDR, requested & !mask);
    }

    /// Whether software armed a CGB speed switch (KEY1 bit 0).
    fn speed_switch_armed(&mut self) -> bool {
        self.read(KEY1_ADDR) & 0x01 != 0
    }

    /// Called by STOP after toggling speed: disarms the switch and publishes
    /// the current speed in KEY1 bit 7.
    fn complete_speed_switch(&mut self, double_speed: bool) {
        self.write(KEY1_ADDR, if double_speed { 0x80 } else { 0x00 });
    }
}

/// A flat, fully writable 64 KiB address space.
///
/// There is no banking and no I/O behavior; it is meant for tests and for
/// running raw program images.
#[derive(Clone)]
pub struct FlatBus {
    mem: Box<[u8; 0x10000]>,
}

impl FlatBus {
    pub fn new() -> Self {
        Self {
            mem: Box::new([0; 0x10000]),
        }
    }

    /// Build a bus with `bytes` copied in starting at `origin`.
    pub fn with_program(origin: u16, bytes: &[u8]) -> Self {
        let mut bus = Self::new();
        bus.load(origin, bytes);
        bus
    }

    /// Copy `bytes` into memory starting at `origin`, wrapping past 0xFFFF.
    /// Returns the number of bytes copied, which is capped at 64 KiB.
    pub fn load(&mut self, origin: u16, bytes: &[u8]) -> usize {
        let len = bytes.len().min(self.mem.len());
        for (i, &b) in bytes[..len].iter().enumerate() {
            self.mem[origin.wrapping_add(i as u16) as usize] = b;
        }
        len
    }

    pub fn memory(&self) -> &[u8] {
        &self.mem[..]
    }
}

impl Default for FlatBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for FlatBus {
    #[inline]
    fn read(&mut self, addr: u16) -> u8 {
        self.mem[addr as usize]
    }

    #[inline]
    fn write(&mut self, addr: u16, val: u8) {
        self.mem[addr as usize] = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_wraps_at_top_of_memory() {
        let mut bus = FlatBus::new();
        assert_eq!(bus.load(0xFFFE, &[1, 2, 3]), 3);
        assert_eq!(bus.read(0xFFFE), 1);
        assert_eq!(bus.read(0xFFFF), 2);
        assert_eq!(bus.read(0x0000), 3);
    }

    #[test]
    fn interrupt_helpers_use_ie_and_if() {
        let mut bus = FlatBus::new();
        bus.write(IE_ADDR, 0x05);
        bus.write(IF_ADDR, 0xE7);
        assert_eq!(bus.pending_interrupts(), 0x05);

        bus.acknowledge_interrupt(0x01);
        assert_eq!(bus.read(IF_ADDR), 0xE6);
        assert_eq!(bus.pending_interrupts(), 0x04);
    }

    #[test]
    fn speed_switch_handshake_goes_through_key1() {
        let mut bus = FlatBus::new();
        assert!(!bus.speed_switch_armed());
        bus.write(KEY1_ADDR, 0x01);
        assert!(bus.speed_switch_armed());
        bus.complete_speed_switch(true);
        assert!(!bus.speed_switch_armed());
        assert_eq!(bus.read(KEY1_ADDR), 0x80);
        assert_eq!(bus.read_high_ram(KEY1_ADDR), 0x80);
    }
}
