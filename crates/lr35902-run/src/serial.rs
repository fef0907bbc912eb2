use lr35902_core::bus::IF_ADDR;
use lr35902_core::{Bus, FlatBus};

/// Serial transfer data.
pub const SB_ADDR: u16 = 0xFF01;
/// Serial transfer control.
pub const SC_ADDR: u16 = 0xFF02;

const SC_START_INTERNAL: u8 = 0x81;
const SERIAL_INTERRUPT: u8 = 0x08;

/// Flat memory plus a loopback serial port.
///
/// Writing 0x81 to SC "sends" the byte in SB: it is appended to the
/// captured output, the transfer completes at once (SC bit 7 clears) and the
/// serial interrupt is requested. This is the protocol test ROMs use to
/// report results.
pub struct SerialBus {
    mem: FlatBus,
    output: Vec<u8>,
    echo: bool,
}

impl SerialBus {
    pub fn new(mem: FlatBus, echo: bool) -> Self {
        Self {
            mem,
            output: Vec::new(),
            echo,
        }
    }

    pub fn memory(&self) -> &[u8] {
        self.mem.memory()
    }

    /// Every byte sent so far.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    fn transfer(&mut self) {
        let byte = self.mem.read(SB_ADDR);
        self.output.push(byte);
        if self.echo {
            print!("{}", printable(byte));
        }
        log::debug!("serial out {byte:02X}");

        self.mem.write(SC_ADDR, SC_START_INTERNAL & 0x7F);
        let requested = self.mem.read(IF_ADDR);
        self.mem.write(IF_ADDR, requested | SERIAL_INTERRUPT);
    }
}

/// Render a serial byte for the terminal, escaping anything that isn't
/// printable ASCII or a newline.
pub fn printable(byte: u8) -> String {
    if byte.is_ascii_graphic() || byte == b' ' || byte == b'\n' {
        (byte as char).to_string()
    } else {
        format!("\\x{byte:02X}")
    }
}

impl Bus for SerialBus {
    #[inline]
    fn read(&mut self, addr: u16) -> u8 {
        self.mem.read(addr)
    }

    fn write(&mut self, addr: u16, val: u8) {
        self.mem.write(addr, val);
        if addr == SC_ADDR && val == SC_START_INTERNAL {
            self.transfer();
        }
    }
}
