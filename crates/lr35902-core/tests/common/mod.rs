#![allow(dead_code)]

use lr35902_core::{Bus, Cpu, FlatBus, Model};

/// CPU in post-boot state with `program` loaded at `origin` and PC pointing
/// at it.
pub fn setup(model: Model, origin: u16, program: &[u8]) -> (Cpu, FlatBus) {
    let mut cpu = Cpu::new(model);
    cpu.regs.pc = origin;
    (cpu, FlatBus::with_program(origin, program))
}

pub fn dmg(program: &[u8]) -> (Cpu, FlatBus) {
    setup(Model::Dmg, 0x0100, program)
}

pub fn step(cpu: &mut Cpu, bus: &mut FlatBus) -> u32 {
    cpu.step(bus).expect("instruction should decode")
}

/// Step until HALT, returning the clock cycles spent.
pub fn run_to_halt(cpu: &mut Cpu, bus: &mut FlatBus, limit: usize) -> u64 {
    let start = cpu.cycles;
    for _ in 0..limit {
        if cpu.halted {
            return cpu.cycles - start;
        }
        step(cpu, bus);
    }
    panic!("program did not halt within {limit} instructions");
}

pub fn peek(bus: &mut FlatBus, addr: u16) -> u8 {
    bus.read(addr)
}
